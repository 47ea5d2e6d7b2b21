//! Numbered badge images for hotspots drawn in numbered mode.
//!
//! The number is rasterized from a bundled DejaVu Sans Bold outline, so the
//! badges look the same on every host regardless of installed fonts.

use ab_glyph::{point, Font, FontRef, Glyph, OutlinedGlyph, PxScale, Rect, ScaleFont};

use crate::config::Color;
use crate::renderer::RgbaImage;

/// Edge length of a badge image in pixels.
pub const BADGE_SIZE: u32 = 64;

const RADIUS: f32 = 30.0;
const BORDER: f32 = 3.0;
/// Widest the number may be drawn; longer numbers are set smaller.
const TEXT_BOX: f32 = 40.0;
const FONT_PX: f32 = 36.0;
const TEXT_RGB: [u8; 3] = [255, 255, 255];

const LABEL_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Circular badge filled with `fill`, white rim, and `number` in white.
#[must_use]
pub fn render_badge(number: usize, fill: Color) -> RgbaImage {
    let mut image = RgbaImage::new(BADGE_SIZE, BADGE_SIZE);
    let center = BADGE_SIZE as f32 / 2.0;
    let [r, g, b, _] = fill.to_rgba8();

    for y in 0..BADGE_SIZE {
        for x in 0..BADGE_SIZE {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            let d = (dx * dx + dy * dy).sqrt();
            // one pixel of coverage falloff at the edge
            let coverage = (RADIUS + 0.5 - d).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }
            let alpha = (coverage * 255.0).round() as u8;
            let rgb = if d > RADIUS - BORDER { [255, 255, 255] } else { [r, g, b] };
            image.put(x, y, [rgb[0], rgb[1], rgb[2], alpha]);
        }
    }

    match FontRef::try_from_slice(LABEL_FONT) {
        Ok(font) => draw_label(&mut image, &font, &number.to_string()),
        Err(e) => log::error!("badge font unreadable, badge {number} drawn blank: {e}"),
    }
    image
}

/// Glyphs for `text` on a baseline at y = 0, and their total advance.
fn layout(font: &FontRef<'_>, text: &str, px: f32) -> (Vec<Glyph>, f32) {
    let scaled = font.as_scaled(PxScale::from(px));
    let mut caret = 0.0;
    let glyphs = text
        .chars()
        .map(|c| {
            let id = font.glyph_id(c);
            let glyph = id.with_scale_and_position(px, point(caret, 0.0));
            caret += scaled.h_advance(id);
            glyph
        })
        .collect();
    (glyphs, caret)
}

fn draw_label(image: &mut RgbaImage, font: &FontRef<'_>, text: &str) {
    let (_, width) = layout(font, text, FONT_PX);
    let px = if width > TEXT_BOX {
        FONT_PX * TEXT_BOX / width
    } else {
        FONT_PX
    };

    let outlines: Vec<OutlinedGlyph> = layout(font, text, px)
        .0
        .into_iter()
        .filter_map(|glyph| font.outline_glyph(glyph))
        .collect();
    let Some(ink) = outlines.iter().map(OutlinedGlyph::px_bounds).reduce(union) else {
        return;
    };

    // center the inked box, not the advance box
    let center = BADGE_SIZE as f32 / 2.0;
    let dx = (center - (ink.min.x + ink.max.x) / 2.0).round() as i32;
    let dy = (center - (ink.min.y + ink.max.y) / 2.0).round() as i32;

    for outline in &outlines {
        let bounds = outline.px_bounds();
        let left = bounds.min.x as i32 + dx;
        let top = bounds.min.y as i32 + dy;
        outline.draw(|x, y, coverage| {
            let (px, py) = (left + x as i32, top + y as i32);
            if px >= 0 && py >= 0 {
                blend_text(image, px as u32, py as u32, coverage);
            }
        });
    }
}

fn union(a: Rect, b: Rect) -> Rect {
    Rect {
        min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
        max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
    }
}

fn blend_text(image: &mut RgbaImage, x: u32, y: u32, coverage: f32) {
    let Some([r, g, b, a]) = image.pixel(x, y) else {
        return;
    };
    let c = coverage.clamp(0.0, 1.0);
    let mix = |under: u8, over: u8| {
        (f32::from(under) + (f32::from(over) - f32::from(under)) * c).round() as u8
    };
    image.put(
        x,
        y,
        [
            mix(r, TEXT_RGB[0]),
            mix(g, TEXT_RGB[1]),
            mix(b, TEXT_RGB[2]),
            a.max((c * 255.0).round() as u8),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pixels where the white label shows through a blue fill.
    fn ink(image: &RgbaImage) -> Vec<(u32, u32)> {
        (0..BADGE_SIZE)
            .flat_map(|y| (0..BADGE_SIZE).map(move |x| (x, y)))
            .filter(|&(x, y)| {
                // the rim is white too; only look inside it
                let dx = x as f32 + 0.5 - 32.0;
                let dy = y as f32 + 0.5 - 32.0;
                (dx * dx + dy * dy).sqrt() < RADIUS - BORDER - 1.0
                    && image.pixel(x, y).is_some_and(|p| p[0] > 128)
            })
            .collect()
    }

    #[test]
    fn badge_is_round_and_transparent_outside() {
        let image = render_badge(3, Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(image.width, BADGE_SIZE);
        assert_eq!(image.pixel(0, 0).unwrap()[3], 0);
        assert_eq!(image.pixel(BADGE_SIZE - 1, BADGE_SIZE - 1).unwrap()[3], 0);
        // inside the circle, outside the label: fill color
        assert_eq!(image.pixel(8, 32), Some([255, 0, 0, 255]));
        // rim
        assert_eq!(image.pixel(3, 32), Some([255, 255, 255, 255]));
    }

    #[test]
    fn label_is_drawn_near_the_center() {
        let image = render_badge(1, Color::rgb(0.0, 0.0, 1.0));
        let ink = ink(&image);
        assert!(ink.len() > 50, "only {} label pixels", ink.len());

        let n = ink.len() as f32;
        let cx = ink.iter().map(|&(x, _)| x as f32 + 0.5).sum::<f32>() / n;
        let cy = ink.iter().map(|&(_, y)| y as f32 + 0.5).sum::<f32>() / n;
        assert!((cx - 32.0).abs() < 6.0, "label centroid x = {cx}");
        assert!((cy - 32.0).abs() < 6.0, "label centroid y = {cy}");
    }

    #[test]
    fn two_digits_fit_inside_the_text_box() {
        let image = render_badge(12, Color::rgb(0.0, 0.0, 1.0));
        let ink = ink(&image);
        assert!(!ink.is_empty());
        let min_x = ink.iter().map(|&(x, _)| x).min().unwrap();
        let max_x = ink.iter().map(|&(x, _)| x).max().unwrap();
        assert!(max_x - min_x <= TEXT_BOX as u32);
        assert!(min_x >= 10 && max_x <= 54);
        // nothing drawn in the transparent corners
        assert_eq!(image.pixel(1, 1).unwrap()[3], 0);
    }

    #[test]
    fn numbers_render_differently() {
        let fill = Color::rgb(0.0, 0.0, 1.0);
        assert_ne!(render_badge(1, fill), render_badge(7, fill));
    }
}
