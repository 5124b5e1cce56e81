use crate::app::SceneContext;
use crate::assets::{AssetRegistry, FrameRect, Texture};
use crate::display::{DisplayObject, FillStyle, Graphics, Image, Rect, Text};
use crate::physics::{Aabb, ArcadeWorld};

use super::font::{glyph_advance, glyph_rows, glyph_scale, text_extent, GLYPH_WIDTH};

const DEBUG_STATIC_COLOR: [u8; 4] = [0, 255, 0, 255];
const DEBUG_DYNAMIC_COLOR: [u8; 4] = [255, 0, 255, 255];
const DEBUG_VELOCITY_COLOR: [u8; 4] = [0, 200, 255, 255];
const DEBUG_VELOCITY_SCALE: f32 = 0.1;

pub(crate) struct Canvas<'a> {
    pub frame: &'a mut [u8],
    pub width: u32,
    pub height: u32,
}

impl Canvas<'_> {
    fn blend_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(offset..offset + 4) else {
            return;
        };
        match color[3] {
            0 => {}
            255 => dst.copy_from_slice(&color),
            alpha => {
                let a = u32::from(alpha);
                for channel in 0..3 {
                    let src = u32::from(color[channel]);
                    let old = u32::from(dst[channel]);
                    dst[channel] = ((src * a + old * (255 - a) + 127) / 255) as u8;
                }
                dst[3] = 255;
            }
        }
    }

    pub(crate) fn clear(&mut self, color: u32) {
        let rgba = FillStyle::new(color, 1.0).rgba();
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) {
        let (left, width) = normalize_span(rect.x, rect.width);
        let (top, height) = normalize_span(rect.y, rect.height);
        let start_x = left.round().max(0.0) as i32;
        let start_y = top.round().max(0.0) as i32;
        let end_x = ((left + width).round() as i32).min(self.width as i32);
        let end_y = ((top + height).round() as i32).min(self.height as i32);
        for y in start_y..end_y {
            for x in start_x..end_x {
                self.blend_pixel(x, y, color);
            }
        }
    }

    fn outline_rect(&mut self, aabb: Aabb, color: [u8; 4]) {
        let left = aabb.left().round() as i32;
        let right = aabb.right().round() as i32 - 1;
        let top = aabb.top().round() as i32;
        let bottom = aabb.bottom().round() as i32 - 1;
        for x in left..=right {
            self.blend_pixel(x, top, color);
            self.blend_pixel(x, bottom, color);
        }
        for y in top..=bottom {
            self.blend_pixel(left, y, color);
            self.blend_pixel(right, y, color);
        }
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: [u8; 4]) {
        let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).ceil() as i32;
        if steps == 0 {
            self.blend_pixel(from.0.round() as i32, from.1.round() as i32, color);
            return;
        }
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = from.0 + (to.0 - from.0) * t;
            let y = from.1 + (to.1 - from.1) * t;
            self.blend_pixel(x.round() as i32, y.round() as i32, color);
        }
    }
}

fn normalize_span(start: f32, length: f32) -> (f32, f32) {
    if length < 0.0 {
        (start + length, -length)
    } else {
        (start, length)
    }
}

pub(crate) fn draw_scene(canvas: &mut Canvas<'_>, ctx: &SceneContext) {
    canvas.clear(ctx.config().background_color);
    for (_, object) in ctx.display().iter() {
        match object {
            DisplayObject::Image(image) => draw_image(canvas, image, ctx.assets()),
            DisplayObject::Graphics(graphics) => draw_graphics(canvas, graphics),
            DisplayObject::Text(text) => draw_text(canvas, text),
        }
    }
    if ctx.physics().is_debug() {
        draw_physics_debug(canvas, ctx.physics());
    }
}

fn draw_graphics(canvas: &mut Canvas<'_>, graphics: &Graphics) {
    for (rect, style) in graphics.rects() {
        canvas.fill_rect(*rect, style.rgba());
    }
}

fn draw_image(canvas: &mut Canvas<'_>, image: &Image, assets: &AssetRegistry) {
    if !image.visible {
        return;
    }
    let texture = assets.get_or_placeholder(&image.texture_key);
    let Some(source) = texture
        .frame_rect(image.frame)
        .or_else(|| texture.frame_rect(0))
    else {
        return;
    };
    blit_scaled(canvas, texture, source, image);
}

fn blit_scaled(canvas: &mut Canvas<'_>, texture: &Texture, source: FrameRect, image: &Image) {
    if source.width == 0 || source.height == 0 {
        return;
    }
    let scale_x = sanitize_scale(image.scale.x);
    let scale_y = sanitize_scale(image.scale.y);
    let out_width = (source.width as f32 * scale_x).round().max(1.0);
    let out_height = (source.height as f32 * scale_y).round().max(1.0);
    let left = (image.position.x - out_width * 0.5).round() as i32;
    let top = (image.position.y - out_height * 0.5).round() as i32;

    let draw_left = left.max(0);
    let draw_top = top.max(0);
    let draw_right = (left + out_width as i32).min(canvas.width as i32);
    let draw_bottom = (top + out_height as i32).min(canvas.height as i32);
    let rgba = texture.rgba();
    let stride = texture.width() as usize;

    for out_y in draw_top..draw_bottom {
        let local_y = ((out_y - top) as f32 / scale_y).floor() as u32;
        let src_y = source.y + local_y.min(source.height - 1);
        for out_x in draw_left..draw_right {
            let mut local_x = ((out_x - left) as f32 / scale_x).floor() as u32;
            local_x = local_x.min(source.width - 1);
            if image.flip_x {
                local_x = source.width - 1 - local_x;
            }
            let src_x = source.x + local_x;
            let offset = (src_y as usize * stride + src_x as usize) * 4;
            let Some(pixel) = rgba.get(offset..offset + 4) else {
                continue;
            };
            canvas.blend_pixel(out_x, out_y, [pixel[0], pixel[1], pixel[2], pixel[3]]);
        }
    }
}

fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

fn draw_text(canvas: &mut Canvas<'_>, text: &Text) {
    let scale = glyph_scale(text.size_px);
    let (width, height) = text_extent(&text.text, scale);
    let left = (text.position.x - text.origin.x * width as f32).round() as i32;
    let top = (text.position.y - text.origin.y * height as f32).round() as i32;
    let color = FillStyle::new(text.color, 1.0).rgba();
    let scale = scale as i32;

    for (index, ch) in text.text.chars().enumerate() {
        let glyph_left = left + index as i32 * glyph_advance(scale as u32) as i32;
        for (row, bits) in glyph_rows(ch).iter().enumerate() {
            for column in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - column)) == 0 {
                    continue;
                }
                let x = glyph_left + column as i32 * scale;
                let y = top + row as i32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        canvas.blend_pixel(x + dx, y + dy, color);
                    }
                }
            }
        }
    }
}

fn draw_physics_debug(canvas: &mut Canvas<'_>, world: &ArcadeWorld) {
    for body in world.static_bodies() {
        canvas.outline_rect(body.aabb(), DEBUG_STATIC_COLOR);
    }
    for body in world.dynamic_bodies() {
        let aabb = body.aabb();
        canvas.outline_rect(aabb, DEBUG_DYNAMIC_COLOR);
        let from = (aabb.center.x, aabb.center.y);
        let to = (
            from.0 + body.velocity.x * DEBUG_VELOCITY_SCALE,
            from.1 + body.velocity.y * DEBUG_VELOCITY_SCALE,
        );
        canvas.line(from, to, DEBUG_VELOCITY_COLOR);
    }
}
