use ab_glyph::PxScale;
use image::{Pixel, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;

use crate::fonts::Fonts;
use crate::geometry::Rgb;

pub(crate) fn rgba(c: Rgb) -> Rgba<u8> {
    Rgba([c[0], c[1], c[2], 255])
}

/// Fills `[x0, x1) x [y0, y1)`, clipped to the image.
pub(crate) fn fill_rect(img: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    let x1 = x1.min(img.width());
    let y1 = y1.min(img.height());
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let rect = Rect::at(x0 as i32, y0 as i32).of_size(x1 - x0, y1 - y0);
    draw_filled_rect_mut(img, rect, color);
}

/// Rectangle outline drawn inside `[x0, x1) x [y0, y1)`.
pub(crate) fn stroke_rect(
    img: &mut RgbaImage,
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
    width: u32,
    color: Rgba<u8>,
) {
    let w = width.max(1);
    fill_rect(img, x0, y0, x1, y0 + w, color);
    fill_rect(img, x0, y1.saturating_sub(w), x1, y1, color);
    fill_rect(img, x0, y0, x0 + w, y1, color);
    fill_rect(img, x1.saturating_sub(w), y0, x1, y1, color);
}

/// Composites a translucent color over `[x0, x1) x [y0, y1)`.
pub(crate) fn blend_rect(img: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    let x1 = x1.min(img.width());
    let y1 = y1.min(img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            img.get_pixel_mut(x, y).blend(&color);
        }
    }
}

/// Sinusoidal stroke from `x0` to `x1` around `baseline`.
pub(crate) fn wavy_line(
    img: &mut RgbaImage,
    x0: u32,
    x1: u32,
    baseline: u32,
    amplitude: f32,
    wavelength: f32,
    width: u32,
    color: Rgba<u8>,
) {
    let wavelength = wavelength.max(1.0);
    let y_at = |x: f32| {
        let phase = (x - x0 as f32) / wavelength * std::f32::consts::TAU;
        baseline as f32 + amplitude * phase.sin()
    };
    let mut x = x0 as f32;
    while x < x1 as f32 {
        let next = (x + 1.0).min(x1 as f32);
        for t in 0..width.max(1) {
            let dy = t as f32;
            draw_line_segment_mut(img, (x, y_at(x) + dy), (next, y_at(next) + dy), color);
        }
        x = next;
    }
}

pub(crate) fn disc(img: &mut RgbaImage, cx: u32, cy: u32, radius: u32, color: Rgba<u8>) {
    draw_filled_circle_mut(img, (cx as i32, cy as i32), radius as i32, color);
}

/// Draws `text` with its top-left corner at `(x, y)`. No-op without a font.
pub(crate) fn text(img: &mut RgbaImage, fonts: &Fonts, x: u32, y: u32, size: f32, color: Rgba<u8>, s: &str) {
    let Some(font) = fonts.glyph() else {
        return;
    };
    if s.is_empty() {
        return;
    }
    draw_text_mut(img, color, x as i32, y as i32, PxScale::from(size), font, s);
}

/// Draws `s` centered on `(cx, cy)`.
pub(crate) fn text_centered(
    img: &mut RgbaImage,
    fonts: &Fonts,
    cx: u32,
    cy: u32,
    size: f32,
    color: Rgba<u8>,
    s: &str,
) {
    let Some(font) = fonts.glyph() else {
        return;
    };
    let scale = PxScale::from(size);
    let (w, h) = text_size(scale, font, s);
    let x = cx as i32 - w as i32 / 2;
    let y = cy as i32 - h as i32 / 2;
    draw_text_mut(img, color, x, y, scale, font, s);
}
