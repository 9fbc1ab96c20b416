use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine::{
    parse_blocked_tiles, validate_sprite_key, GridPos, MapGrid, MapParseError, SpriteKeyError,
    Vec2,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub(crate) enum LevelError {
    #[error("read level file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse level json: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
    #[error("parse level json at {path}: {source}")]
    ParseAt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Map(#[from] MapParseError),
    #[error("{what} cell ({column}, {row}) is outside the {width}x{height} map")]
    CellOutsideMap {
        what: &'static str,
        column: i32,
        row: i32,
        width: u32,
        height: u32,
    },
    #[error("{what} sprite key '{key}' is invalid: {source}")]
    InvalidSpriteKey {
        what: &'static str,
        key: String,
        #[source]
        source: SpriteKeyError,
    },
    #[error("cursor tile {index} is not in the {tile_count}-tile tileset")]
    CursorTileOutOfRange { index: u32, tile_count: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SpriteSheetConfig {
    pub(crate) sprite_key: String,
    pub(crate) rows: u32,
    pub(crate) frames: u32,
    #[serde(default = "default_scale")]
    pub(crate) scale: f32,
    #[serde(default)]
    pub(crate) draw_lift_px: f32,
}

impl SpriteSheetConfig {
    fn new(sprite_key: &str, rows: u32, frames: u32, scale: f32, draw_lift_px: f32) -> Self {
        Self {
            sprite_key: sprite_key.to_string(),
            rows,
            frames,
            scale,
            draw_lift_px,
        }
    }

    pub(crate) fn size_px(&self, tile_width: u32, tile_height: u32) -> Vec2 {
        Vec2::new(
            tile_width as f32 * self.scale,
            tile_height as f32 * self.scale,
        )
    }
}

fn default_scale() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    pub(crate) title: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Isocoin".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LevelConfig {
    pub(crate) map_path: String,
    pub(crate) blocked_tiles_path: String,
    pub(crate) player_start: GridPos,
    pub(crate) coins: Vec<GridPos>,
    /// Defaults to the last cell of the map.
    pub(crate) flag: Option<GridPos>,
    pub(crate) origin: Vec2,
    pub(crate) player_sprite: SpriteSheetConfig,
    pub(crate) coin_sprite: SpriteSheetConfig,
    pub(crate) flag_sprite: SpriteSheetConfig,
    pub(crate) cursor_tile: u32,
    pub(crate) coin_pickup_radius_px: f32,
    pub(crate) flag_reach_radius_px: f32,
    pub(crate) animation_cadence_ms: u64,
    pub(crate) window: WindowConfig,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            map_path: "maps/map.txt".to_string(),
            blocked_tiles_path: "maps/blocked_tiles.txt".to_string(),
            player_start: GridPos::new(0, 0),
            coins: vec![
                GridPos::new(1, 1),
                GridPos::new(3, 2),
                GridPos::new(5, 3),
                GridPos::new(2, 4),
                GridPos::new(4, 5),
            ],
            flag: None,
            origin: Vec2::new(397.0, 128.5),
            player_sprite: SpriteSheetConfig::new("sprites/player", 4, 6, 1.0, 0.0),
            coin_sprite: SpriteSheetConfig::new("sprites/coin", 1, 10, 0.5, 10.0),
            flag_sprite: SpriteSheetConfig::new("sprites/flag", 1, 5, 0.77, 10.0),
            cursor_tile: 6,
            coin_pickup_radius_px: 20.0,
            flag_reach_radius_px: 30.0,
            animation_cadence_ms: 100,
            window: WindowConfig::default(),
        }
    }
}

impl LevelConfig {
    pub(crate) fn load_file(path: &Path) -> Result<Self, LevelError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "level_file_missing_using_defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(LevelError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse_json(&raw)
    }

    pub(crate) fn parse_json(raw: &str) -> Result<Self, LevelError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        serde_path_to_error::deserialize::<_, LevelConfig>(&mut deserializer).map_err(|error| {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                LevelError::Parse { source }
            } else {
                LevelError::ParseAt { path, source }
            }
        })
    }

    pub(crate) fn animation_cadence(&self) -> Duration {
        Duration::from_millis(self.animation_cadence_ms)
    }

    pub(crate) fn load_map(&self, base_dir: &Path) -> Result<MapGrid, LevelError> {
        let map_path = base_dir.join(&self.map_path);
        let mut map = MapGrid::load_file(&map_path)?;

        let blocked_path = base_dir.join(&self.blocked_tiles_path);
        match fs::read_to_string(&blocked_path) {
            Ok(raw) => {
                let blocked = map.apply_blocked_tiles(parse_blocked_tiles(&raw));
                info!(path = %blocked_path.display(), blocked, "blocked_tiles_applied");
            }
            Err(error) => {
                warn!(
                    path = %blocked_path.display(),
                    error = %error,
                    "blocked_tiles_unavailable_all_walkable"
                );
            }
        }

        info!(
            path = %map_path.display(),
            width = map.width(),
            height = map.height(),
            tiles = map.tile_count(),
            "map_loaded"
        );
        Ok(map)
    }

    pub(crate) fn flag_cell(&self, map: &MapGrid) -> GridPos {
        self.flag.unwrap_or_else(|| {
            GridPos::new(map.width() as i32 - 1, map.height() as i32 - 1)
        })
    }

    pub(crate) fn validate_against(&self, map: &MapGrid) -> Result<(), LevelError> {
        ensure_on_map(map, "player start", self.player_start)?;
        for coin in &self.coins {
            ensure_on_map(map, "coin", *coin)?;
        }
        ensure_on_map(map, "flag", self.flag_cell(map))?;
        ensure_sprite_key("tileset", map.tileset_key())?;
        ensure_sprite_key("player", &self.player_sprite.sprite_key)?;
        ensure_sprite_key("coin", &self.coin_sprite.sprite_key)?;
        ensure_sprite_key("flag", &self.flag_sprite.sprite_key)?;
        if map.tile_type(self.cursor_tile).is_none() {
            return Err(LevelError::CursorTileOutOfRange {
                index: self.cursor_tile,
                tile_count: map.tile_count(),
            });
        }
        Ok(())
    }
}

fn ensure_sprite_key(what: &'static str, key: &str) -> Result<(), LevelError> {
    validate_sprite_key(key).map_err(|source| LevelError::InvalidSpriteKey {
        what,
        key: key.to_string(),
        source,
    })
}

fn ensure_on_map(map: &MapGrid, what: &'static str, cell: GridPos) -> Result<(), LevelError> {
    if map.contains(cell) {
        return Ok(());
    }
    Err(LevelError::CellOutsideMap {
        what,
        column: cell.column,
        row: cell.row,
        width: map.width(),
        height: map.height(),
    })
}
