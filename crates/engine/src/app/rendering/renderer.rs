use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use thiserror::Error;
use tracing::warn;
use winit::window::Window;

use crate::sprite_keys::{validate_sprite_key, SpriteKeyError};

use super::{DrawList, PlaceholderShape, QuadDraw};

const CLEAR_COLOR: [u8; 4] = [0, 0, 0, 255];

#[derive(Debug, Error)]
pub enum ResourceLoadFailure {
    #[error("invalid sprite key '{key}': {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: SpriteKeyError,
    },
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

struct LoadedSprite {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

pub struct Renderer {
    window: &'static Window,
    pixels: Pixels<'static>,
    buffer_width: u32,
    buffer_height: u32,
    asset_root: PathBuf,
    sprite_cache: HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprite_keys: HashSet<String>,
}

impl Renderer {
    pub fn new(
        window: &'static Window,
        buffer_width: u32,
        buffer_height: u32,
        asset_root: PathBuf,
    ) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(window, buffer_width, buffer_height, size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            buffer_width,
            buffer_height,
            asset_root,
            sprite_cache: HashMap::new(),
            warned_missing_sprite_keys: HashSet::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(
            self.window,
            self.buffer_width,
            self.buffer_height,
            width,
            height,
        )?;
        Ok(())
    }

    fn build_pixels(
        window: &'static Window,
        buffer_width: u32,
        buffer_height: u32,
        surface_width: u32,
        surface_height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(surface_width, surface_height, window);
        Pixels::new(buffer_width, buffer_height, surface)
    }

    pub fn render(&mut self, draw_list: &DrawList) -> Result<(), Error> {
        let width = self.buffer_width;
        let height = self.buffer_height;
        let asset_root = self.asset_root.as_path();
        let sprite_cache = &mut self.sprite_cache;
        let warned_missing_sprite_keys = &mut self.warned_missing_sprite_keys;
        let frame = self.pixels.frame_mut();

        for chunk in frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&CLEAR_COLOR);
        }

        for quad in draw_list.quads() {
            match resolve_cached_sprite(
                sprite_cache,
                warned_missing_sprite_keys,
                asset_root,
                &quad.sprite_key,
            ) {
                Some(sprite) => draw_quad_from_sheet(frame, width, height, sprite, quad),
                None => draw_placeholder(frame, width, height, quad),
            }
        }

        self.pixels.render()
    }
}

fn resolve_cached_sprite<'a>(
    cache: &'a mut HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprite_keys: &mut HashSet<String>,
    asset_root: &Path,
    key: &str,
) -> Option<&'a LoadedSprite> {
    if !cache.contains_key(key) {
        let sprite = match load_sprite_sheet(asset_root, key) {
            Ok(sprite) => Some(sprite),
            Err(failure) => {
                warn_sprite_load_once(warned_missing_sprite_keys, key, &failure);
                None
            }
        };
        cache.insert(key.to_string(), sprite);
    }
    cache.get(key).and_then(Option::as_ref)
}

fn resolve_sprite_image_path(asset_root: &Path, key: &str) -> Result<PathBuf, ResourceLoadFailure> {
    validate_sprite_key(key).map_err(|source| ResourceLoadFailure::InvalidKey {
        key: key.to_string(),
        source,
    })?;
    Ok(asset_root
        .join("base")
        .join("sprites")
        .join(format!("{key}.png")))
}

fn load_sprite_sheet(asset_root: &Path, key: &str) -> Result<LoadedSprite, ResourceLoadFailure> {
    let path = resolve_sprite_image_path(asset_root, key)?;
    load_sprite_rgba(&path)
}

fn load_sprite_rgba(path: &Path) -> Result<LoadedSprite, ResourceLoadFailure> {
    let reader = ImageReader::open(path).map_err(|source| ResourceLoadFailure::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader
        .decode()
        .map_err(|source| ResourceLoadFailure::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    let image = decoded.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

fn warn_sprite_load_once(
    warned_keys: &mut HashSet<String>,
    key: &str,
    failure: &ResourceLoadFailure,
) {
    if !warned_keys.insert(key.to_string()) {
        return;
    }
    warn!(
        sprite_key = key,
        error = %failure,
        "renderer_sprite_load_failed_using_placeholder"
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScreenRectPx {
    left: i32,
    top: i32,
    width: i32,
    height: i32,
}

fn quad_screen_rect(quad: &QuadDraw) -> Option<ScreenRectPx> {
    if !quad.size.x.is_finite() || !quad.size.y.is_finite() {
        return None;
    }
    let width = quad.size.x.round() as i32;
    let height = quad.size.y.round() as i32;
    if width <= 0 || height <= 0 {
        return None;
    }
    Some(ScreenRectPx {
        left: (quad.center.x - quad.size.x / 2.0).round() as i32,
        top: (quad.center.y - quad.size.y / 2.0).round() as i32,
        width,
        height,
    })
}

fn source_texel(
    sheet_extent: u32,
    uv_offset: f32,
    uv_extent: f32,
    dest_offset: i32,
    dest_extent: i32,
) -> u32 {
    let region_start = (uv_offset * sheet_extent as f32).floor().max(0.0);
    let region_len = (uv_extent * sheet_extent as f32).max(1.0);
    let region_end = (region_start + region_len).min(sheet_extent as f32);
    let progress = (dest_offset as f32 + 0.5) / dest_extent as f32;
    let texel = (region_start + progress * region_len).floor();
    let last = (region_end - 1.0).max(region_start);
    texel.clamp(region_start, last) as u32
}

fn draw_quad_from_sheet(
    frame: &mut [u8],
    width: u32,
    height: u32,
    sprite: &LoadedSprite,
    quad: &QuadDraw,
) {
    if sprite.width == 0 || sprite.height == 0 || width == 0 || height == 0 {
        return;
    }
    let expected_rgba_len = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() < expected_rgba_len {
        return;
    }
    let Some(rect) = quad_screen_rect(quad) else {
        return;
    };

    let draw_left = rect.left.max(0);
    let draw_top = rect.top.max(0);
    let draw_right = (rect.left + rect.width).min(width as i32);
    let draw_bottom = (rect.top + rect.height).min(height as i32);
    if draw_left >= draw_right || draw_top >= draw_bottom {
        return;
    }

    let frame_width = width as usize;
    let sprite_width = sprite.width as usize;

    for out_y in draw_top..draw_bottom {
        let src_y = source_texel(
            sprite.height,
            quad.uv_offset.1,
            quad.uv_extent.1,
            out_y - rect.top,
            rect.height,
        ) as usize;
        let src_row_offset = src_y * sprite_width * 4;
        let dst_row_offset = out_y as usize * frame_width * 4;

        for out_x in draw_left..draw_right {
            let src_x = source_texel(
                sprite.width,
                quad.uv_offset.0,
                quad.uv_extent.0,
                out_x - rect.left,
                rect.width,
            ) as usize;
            let src_offset = src_row_offset + src_x * 4;
            let alpha = sprite.rgba[src_offset + 3];
            if alpha == 0 {
                continue;
            }
            let dst_offset = dst_row_offset + out_x as usize * 4;
            frame[dst_offset] = sprite.rgba[src_offset];
            frame[dst_offset + 1] = sprite.rgba[src_offset + 1];
            frame[dst_offset + 2] = sprite.rgba[src_offset + 2];
            frame[dst_offset + 3] = alpha;
        }
    }
}

fn draw_placeholder(frame: &mut [u8], width: u32, height: u32, quad: &QuadDraw) {
    let Some(rect) = quad_screen_rect(quad) else {
        return;
    };
    let half_w = rect.width as f32 / 2.0;
    let half_h = rect.height as f32 / 2.0;
    for y in rect.top..rect.top + rect.height {
        if y < 0 || y >= height as i32 {
            continue;
        }
        for x in rect.left..rect.left + rect.width {
            if x < 0 || x >= width as i32 {
                continue;
            }
            if quad.placeholder.shape == PlaceholderShape::Diamond {
                let dx = ((x - rect.left) as f32 + 0.5 - half_w).abs() / half_w;
                let dy = ((y - rect.top) as f32 + 0.5 - half_h).abs() / half_h;
                if dx + dy > 1.0 {
                    continue;
                }
            }
            write_pixel_rgba_clipped(frame, width as usize, x, y, quad.placeholder.color);
        }
    }
}

fn write_pixel_rgba_clipped(frame: &mut [u8], width: usize, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 {
        return;
    }
    let x = x as usize;
    let y = y as usize;
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }
    frame[byte_offset..end].copy_from_slice(&color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::rendering::Placeholder;
    use crate::app::Vec2;
    use tempfile::TempDir;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];
    const FILL: [u8; 4] = [10, 20, 30, 255];

    /// 3x1 sheet: red, green, transparent.
    fn strip_sheet() -> LoadedSprite {
        let mut rgba = Vec::new();
        rgba.extend_from_slice(&RED);
        rgba.extend_from_slice(&GREEN);
        rgba.extend_from_slice(&CLEAR);
        LoadedSprite {
            width: 3,
            height: 1,
            rgba,
        }
    }

    fn quad(center: Vec2, size: Vec2, column: u32, shape: PlaceholderShape) -> QuadDraw {
        QuadDraw {
            sprite_key: "test/sheet".to_string(),
            center,
            size,
            uv_offset: (column as f32 / 3.0, 0.0),
            uv_extent: (1.0 / 3.0, 1.0),
            placeholder: Placeholder { shape, color: FILL },
        }
    }

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = (y * width + x) as usize * 4;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn source_texel_stays_inside_selected_cell() {
        for dest in 0..8 {
            let texel = source_texel(30, 1.0 / 3.0, 1.0 / 3.0, dest, 8);
            assert!((10..20).contains(&texel), "dest={dest} texel={texel}");
        }
        assert_eq!(source_texel(30, 1.0 / 3.0, 1.0 / 3.0, 0, 10), 10);
        assert_eq!(source_texel(30, 1.0 / 3.0, 1.0 / 3.0, 9, 10), 19);
    }

    #[test]
    fn uv_offset_selects_sheet_cell() {
        let sheet = strip_sheet();
        let mut frame = vec![0u8; 4 * 4 * 4];

        draw_quad_from_sheet(
            &mut frame,
            4,
            4,
            &sheet,
            &quad(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0), 1, PlaceholderShape::Rect),
        );

        assert_eq!(pixel(&frame, 4, 0, 0), GREEN);
        assert_eq!(pixel(&frame, 4, 1, 1), GREEN);
        assert_eq!(pixel(&frame, 4, 2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn transparent_texels_leave_frame_untouched() {
        let sheet = strip_sheet();
        let mut frame = Vec::new();
        for _ in 0..4 {
            frame.extend_from_slice(&BLUE);
        }

        draw_quad_from_sheet(
            &mut frame,
            2,
            2,
            &sheet,
            &quad(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0), 2, PlaceholderShape::Rect),
        );

        assert!(frame.chunks_exact(4).all(|px| px == BLUE));
    }

    #[test]
    fn quads_are_clipped_to_the_frame() {
        let sheet = strip_sheet();
        let mut frame = vec![0u8; 2 * 2 * 4];

        draw_quad_from_sheet(
            &mut frame,
            2,
            2,
            &sheet,
            &quad(Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0), 0, PlaceholderShape::Rect),
        );

        assert_eq!(pixel(&frame, 2, 0, 0), RED);
        assert_eq!(pixel(&frame, 2, 1, 1), RED);
    }

    #[test]
    fn diamond_placeholder_leaves_corners_empty() {
        let mut frame = vec![0u8; 8 * 4 * 4];
        draw_placeholder(
            &mut frame,
            8,
            4,
            &quad(Vec2::new(4.0, 2.0), Vec2::new(8.0, 4.0), 0, PlaceholderShape::Diamond),
        );

        assert_eq!(pixel(&frame, 8, 4, 2), FILL);
        assert_eq!(pixel(&frame, 8, 0, 0), [0, 0, 0, 0]);
        assert_eq!(pixel(&frame, 8, 7, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn rect_placeholder_fills_whole_quad() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        draw_placeholder(
            &mut frame,
            4,
            4,
            &quad(Vec2::new(2.0, 2.0), Vec2::new(4.0, 4.0), 0, PlaceholderShape::Rect),
        );
        assert!(frame.chunks_exact(4).all(|px| px == FILL));
    }

    #[test]
    fn degenerate_quads_draw_nothing() {
        let sheet = strip_sheet();
        let mut frame = vec![0u8; 4 * 4 * 4];
        for size in [Vec2::new(0.0, 2.0), Vec2::new(f32::NAN, 2.0), Vec2::new(-3.0, 2.0)] {
            let quad = quad(Vec2::new(2.0, 2.0), size, 0, PlaceholderShape::Rect);
            draw_quad_from_sheet(&mut frame, 4, 4, &sheet, &quad);
            draw_placeholder(&mut frame, 4, 4, &quad);
        }
        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn sprite_sheets_load_from_asset_root_and_failures_are_cached() {
        let temp = TempDir::new().expect("tempdir");
        let sprites_dir = temp.path().join("base").join("sprites").join("fx");
        std::fs::create_dir_all(&sprites_dir).expect("sprites dir");
        let image = image::RgbaImage::from_pixel(6, 2, image::Rgba(RED));
        image.save(sprites_dir.join("coin.png")).expect("save png");

        let mut cache = HashMap::new();
        let mut warned = HashSet::new();

        let sprite = resolve_cached_sprite(&mut cache, &mut warned, temp.path(), "fx/coin")
            .expect("sprite");
        assert_eq!((sprite.width, sprite.height), (6, 2));

        assert!(resolve_cached_sprite(&mut cache, &mut warned, temp.path(), "fx/missing").is_none());
        assert!(resolve_cached_sprite(&mut cache, &mut warned, temp.path(), "fx/missing").is_none());
        assert_eq!(warned.len(), 1);
        assert!(matches!(cache.get("fx/missing"), Some(None)));
    }

    #[test]
    fn load_failures_are_classified() {
        let temp = TempDir::new().expect("tempdir");
        assert!(matches!(
            load_sprite_sheet(temp.path(), "Bad.Key"),
            Err(ResourceLoadFailure::InvalidKey { .. })
        ));
        assert!(matches!(
            load_sprite_sheet(temp.path(), "missing"),
            Err(ResourceLoadFailure::Open { .. })
        ));

        let sprites_dir = temp.path().join("base").join("sprites");
        std::fs::create_dir_all(&sprites_dir).expect("sprites dir");
        std::fs::write(sprites_dir.join("broken.png"), b"not a png").expect("write");
        assert!(matches!(
            load_sprite_sheet(temp.path(), "broken"),
            Err(ResourceLoadFailure::Decode { .. })
        ));
    }
}
