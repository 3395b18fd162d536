use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use crate::sim::{Banner, Entity, EntityKind, PropRole, Rect, SceneWorld};
use crate::sprite_keys::validate_sprite_key;

use super::transform::{rect_to_screen, ScreenRect, Viewport};

const CLEAR_COLOR: [u8; 4] = [18, 16, 24, 255];
const DECOR_COLOR: [u8; 4] = [62, 58, 70, 255];
const OBSTACLE_COLOR: [u8; 4] = [120, 104, 92, 255];
const FOLIAGE_COLOR: [u8; 4] = [56, 120, 64, 255];
const WIN_TRIGGER_COLOR: [u8; 4] = [236, 196, 64, 255];
const PLAYER_COLOR: [u8; 4] = [90, 170, 240, 255];
const MOTHER_COLOR: [u8; 4] = [232, 120, 170, 255];
const MOTHER_EMPTY_COLOR: [u8; 4] = [150, 110, 130, 255];
const GUARD_COLOR: [u8; 4] = [70, 80, 200, 255];
const GUARD_CHASING_COLOR: [u8; 4] = [230, 60, 60, 255];
const ANIMATED_COLOR: [u8; 4] = [200, 200, 210, 255];
const BANNER_ALPHA: u8 = 140;

struct LoadedSprite {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    sprite_root: PathBuf,
    sprite_cache: HashMap<String, Option<LoadedSprite>>,
    draw_order: Vec<usize>,
}

impl Renderer {
    /// Sheets are read lazily from `<asset_root>/sprites/<key>.png`.
    pub fn new(window: Arc<Window>, asset_root: &Path) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            sprite_root: asset_root.join("sprites"),
            sprite_cache: HashMap::new(),
            draw_order: Vec::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    /// Draws every visible entity back to front, shifted by the player's
    /// camera, then the banner tint.
    pub(crate) fn render_world(&mut self, world: &SceneWorld) -> Result<(), Error> {
        let viewport = self.viewport;
        if viewport.width == 0 || viewport.height == 0 {
            return Ok(());
        }

        let sprite_root = self.sprite_root.as_path();
        let sprite_cache = &mut self.sprite_cache;
        let draw_order = &mut self.draw_order;
        let frame = self.pixels.frame_mut();
        for chunk in frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&CLEAR_COLOR);
        }

        let camera = world.camera_translation();
        world.collect_draw_order(draw_order);
        for index in draw_order.iter().copied() {
            let entity = &world.entities()[index];
            let dest = rect_to_screen(entity.body.bounding_box(), camera);
            let Some(clipped) = dest.clipped_to(viewport) else {
                continue;
            };

            let drawn = match sprite_source(entity) {
                Some((key, source)) => {
                    match resolve_cached_sprite(sprite_cache, sprite_root, key) {
                        Some(sprite) => {
                            blit_region(frame, viewport, dest, sprite, source);
                            true
                        }
                        None => false,
                    }
                }
                None => false,
            };
            if !drawn {
                fill_rect(frame, viewport, clipped, placeholder_color(entity));
            }
            if entity.shaded {
                shade_rect(frame, viewport, clipped);
            }
        }

        if let Some(banner) = world.visual_state().banner {
            tint_frame(frame, banner_color(banner));
        }

        self.pixels.render()
    }
}

/// Sheet key and source rectangle for an entity, if it has art.
fn sprite_source(entity: &Entity) -> Option<(&str, Option<Rect>)> {
    if let Some(animation) = entity.animation() {
        return Some((animation.sheet(), Some(animation.source_rect())));
    }
    match &entity.kind {
        EntityKind::Static(prop) => prop.sprite.as_deref().map(|key| (key, None)),
        _ => None,
    }
}

fn placeholder_color(entity: &Entity) -> [u8; 4] {
    match &entity.kind {
        EntityKind::Static(prop) => match prop.role {
            PropRole::Decor => DECOR_COLOR,
            PropRole::Obstacle => OBSTACLE_COLOR,
            PropRole::Foliage => FOLIAGE_COLOR,
            PropRole::WinTrigger => WIN_TRIGGER_COLOR,
        },
        EntityKind::Animated(_) => ANIMATED_COLOR,
        EntityKind::Player(_) => PLAYER_COLOR,
        EntityKind::Mother(mother) if mother.has_candy() => MOTHER_COLOR,
        EntityKind::Mother(_) => MOTHER_EMPTY_COLOR,
        EntityKind::Guard(guard) if guard.is_chasing() => GUARD_CHASING_COLOR,
        EntityKind::Guard(_) => GUARD_COLOR,
    }
}

fn banner_color(banner: Banner) -> [u8; 4] {
    match banner {
        Banner::Title => [20, 20, 60, BANNER_ALPHA],
        Banner::Paused => [0, 0, 0, BANNER_ALPHA],
        Banner::Won => [40, 160, 60, BANNER_ALPHA],
        Banner::Lost => [170, 30, 30, BANNER_ALPHA],
    }
}

fn resolve_cached_sprite<'a>(
    cache: &'a mut HashMap<String, Option<LoadedSprite>>,
    sprite_root: &Path,
    key: &str,
) -> Option<&'a LoadedSprite> {
    if !cache.contains_key(key) {
        let loaded = load_sprite(sprite_root, key);
        if let Err(reason) = &loaded {
            warn!(
                sprite_key = key,
                reason = reason.as_str(),
                "renderer_sprite_load_failed_using_placeholder"
            );
        }
        cache.insert(key.to_string(), loaded.ok());
    }
    cache.get(key).and_then(Option::as_ref)
}

fn load_sprite(sprite_root: &Path, key: &str) -> Result<LoadedSprite, String> {
    validate_sprite_key(key).map_err(|error| format!("invalid_key:{error}"))?;
    let path = sprite_root.join(format!("{key}.png"));
    let reader = ImageReader::open(&path)
        .map_err(|error| format!("file_open_failed:{}:{error}", path.display()))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

fn fill_rect(frame: &mut [u8], viewport: Viewport, rect: ScreenRect, color: [u8; 4]) {
    let Some(rect) = rect.clipped_to(viewport) else {
        return;
    };
    let row_bytes = viewport.width as usize * 4;
    for y in rect.top..rect.bottom {
        let row = y as usize * row_bytes;
        let start = row + rect.left as usize * 4;
        let end = row + rect.right as usize * 4;
        let Some(pixels) = frame.get_mut(start..end) else {
            return;
        };
        for pixel in pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }
}

fn shade_rect(frame: &mut [u8], viewport: Viewport, rect: ScreenRect) {
    let Some(rect) = rect.clipped_to(viewport) else {
        return;
    };
    let row_bytes = viewport.width as usize * 4;
    for y in rect.top..rect.bottom {
        let row = y as usize * row_bytes;
        let start = row + rect.left as usize * 4;
        let end = row + rect.right as usize * 4;
        let Some(pixels) = frame.get_mut(start..end) else {
            return;
        };
        for pixel in pixels.chunks_exact_mut(4) {
            for channel in &mut pixel[..3] {
                *channel /= 2;
            }
        }
    }
}

fn tint_frame(frame: &mut [u8], color: [u8; 4]) {
    let alpha = color[3] as u16;
    let keep = 255 - alpha;
    for pixel in frame.chunks_exact_mut(4) {
        for (channel, tint) in pixel[..3].iter_mut().zip(color) {
            *channel = ((*channel as u16 * keep + tint as u16 * alpha) / 255) as u8;
        }
    }
}

/// Copies `source` (or the whole sprite) to `dest`'s top-left corner 1:1,
/// skipping transparent texels. Clips against the sheet, `dest` and the
/// viewport.
fn blit_region(
    frame: &mut [u8],
    viewport: Viewport,
    dest: ScreenRect,
    sprite: &LoadedSprite,
    source: Option<Rect>,
) {
    let expected_rgba_len = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() < expected_rgba_len {
        return;
    }
    let source = source.unwrap_or(Rect::new(0, 0, sprite.width as i32, sprite.height as i32));
    let src_left = source.left().max(0);
    let src_top = source.top().max(0);
    let src_right = source.right().min(sprite.width as i32);
    let src_bottom = source.bottom().min(sprite.height as i32);

    let region = ScreenRect {
        left: dest.left,
        top: dest.top,
        right: dest.left + (src_right - src_left).min(dest.width()),
        bottom: dest.top + (src_bottom - src_top).min(dest.height()),
    };
    let Some(clipped) = region.clipped_to(viewport) else {
        return;
    };

    let frame_width = viewport.width as usize;
    let sprite_width = sprite.width as usize;
    for out_y in clipped.top..clipped.bottom {
        let src_y = (src_top + out_y - dest.top) as usize;
        let src_row_offset = src_y * sprite_width * 4;
        let dst_row_offset = out_y as usize * frame_width * 4;

        for out_x in clipped.left..clipped.right {
            let src_x = (src_left + out_x - dest.left) as usize;
            let src_offset = src_row_offset + src_x * 4;
            let alpha = sprite.rgba[src_offset + 3];
            if alpha == 0 {
                continue;
            }
            let dst_offset = dst_row_offset + out_x as usize * 4;
            frame[dst_offset..dst_offset + 4]
                .copy_from_slice(&sprite.rgba[src_offset..src_offset + 4]);
        }
    }
}
