use std::path::{Path, PathBuf};

use engine::{resolve_app_paths, LoopConfig, Scene, StartupError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::gameplay::{GameState, GameplayScene};
use super::level::{LevelConfig, LevelError};

const LEVEL_ENV_VAR: &str = "ISOCOIN_LEVEL";
const DEFAULT_LEVEL_FILE: &str = "level.json";

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Level(#[from] LevelError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Isocoin Startup ===");

    let app_paths = resolve_app_paths()?;
    let level_path = level_path_from_env(&app_paths.base_assets_dir);
    info!(path = %level_path.display(), "level_selected");

    let level = LevelConfig::load_file(&level_path)?;
    let (config, scene) = wire_level(&level, &app_paths.base_assets_dir)?;
    Ok(AppWiring {
        config,
        scene: Box::new(scene),
    })
}

fn wire_level(
    level: &LevelConfig,
    base_dir: &Path,
) -> Result<(LoopConfig, GameplayScene), LevelError> {
    let map = level.load_map(base_dir)?;
    let state = GameState::new(map, level)?;
    let config = LoopConfig {
        window_title: level.window.title.clone(),
        window_width: level.window.width,
        window_height: level.window.height,
        ..LoopConfig::default()
    };
    let scene = GameplayScene::new(level.window.title.clone(), level.cursor_tile, state);
    Ok((config, scene))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn level_path_from_env(base_dir: &Path) -> PathBuf {
    let override_path = std::env::var(LEVEL_ENV_VAR)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty());
    resolve_level_path(base_dir, override_path.as_deref())
}

fn resolve_level_path(base_dir: &Path, override_path: Option<&str>) -> PathBuf {
    match override_path {
        Some(raw) => {
            let path = Path::new(raw);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                base_dir.join(path)
            }
        }
        None => base_dir.join(DEFAULT_LEVEL_FILE),
    }
}
