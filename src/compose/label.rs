//! Date label rendering.
//!
//! Which renderer is used is decided once per batch from [`LabelConfig`]:
//! a TrueType font when one is configured and loads, otherwise whatever the
//! [`FontFallback`] policy asks for.

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;
use crate::config::{FontFallback, LabelConfig};
use crate::error::PreconditionError;

/// Draws short single-line text onto a report crop, clipping at its edges
pub trait LabelRenderer: Send + Sync {
    /// Draw `text` with its top-left corner at (`x`, `y`)
    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>);

    /// Human-readable name (used in log output)
    fn name(&self) -> &str;

    /// Whether `c` can be drawn; whitespace is always accepted
    fn supports(&self, _c: char) -> bool {
        true
    }
}

/// Characters of `text` the renderer would leave blank
pub fn unsupported_chars(renderer: &dyn LabelRenderer, text: &str) -> Vec<char> {
    text.chars()
        .filter(|c| !c.is_whitespace() && !renderer.supports(*c))
        .collect()
}

/// Text rendered with a TrueType/OpenType font
pub struct GlyphRenderer {
    font: FontVec,
    scale: PxScale,
}

impl GlyphRenderer {
    pub fn load(path: &Path, size: f32) -> Result<Self, PreconditionError> {
        let font_error = |reason: String| PreconditionError::Font {
            path: path.to_path_buf(),
            reason,
        };
        let bytes = std::fs::read(path).map_err(|e| font_error(e.to_string()))?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| font_error(e.to_string()))?;
        Ok(Self {
            font,
            scale: PxScale::from(size),
        })
    }
}

impl LabelRenderer for GlyphRenderer {
    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }

    fn name(&self) -> &str {
        "TrueType font"
    }
}

/// Built-in 3x5 bitmap glyphs: digits, Latin letters (drawn upper-case) and date punctuation
pub struct BlockRenderer {
    cell: u32,
}

const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;

impl BlockRenderer {
    /// Glyphs are scaled so that a 5-row glyph is roughly `size` pixels tall
    pub fn new(size: f32) -> Self {
        let cell = (size / 6.0).round().max(1.0) as u32;
        Self { cell }
    }

    /// Height in pixels of a rendered line
    pub fn line_height(&self) -> u32 {
        GLYPH_HEIGHT * self.cell
    }

    fn glyph(c: char) -> Option<[u8; 5]> {
        let rows = match c.to_ascii_uppercase() {
            '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
            '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
            '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
            '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
            '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
            '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
            '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
            '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
            '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
            '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
            '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
            '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
            '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
            ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
            ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
            'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
            'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
            'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
            'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
            'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
            'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
            'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
            'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
            'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
            'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
            'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
            'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
            'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
            'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
            'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
            'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
            'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
            'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
            'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
            'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
            'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
            'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
            'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
            'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
            'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
            'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
            _ => return None,
        };
        Some(rows)
    }

    fn fill_cell(&self, canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
        let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));
        for dy in 0..i64::from(self.cell) {
            for dx in 0..i64::from(self.cell) {
                let (px, py) = (x + dx, y + dy);
                if px >= 0 && py >= 0 && px < width && py < height {
                    canvas.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }
}

impl LabelRenderer for BlockRenderer {
    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        let cell = i64::from(self.cell);
        let advance = i64::from(GLYPH_WIDTH + 1) * cell;

        for (i, c) in text.chars().enumerate() {
            let Some(rows) = Self::glyph(c) else {
                continue; // blank (spaces and unsupported characters)
            };
            let origin_x = i64::from(x) + i as i64 * advance;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (0b100 >> col) != 0 {
                        self.fill_cell(
                            canvas,
                            origin_x + i64::from(col) * cell,
                            i64::from(y) + row as i64 * cell,
                            color,
                        );
                    }
                }
            }
        }
    }

    fn name(&self) -> &str {
        "built-in block glyphs"
    }

    fn supports(&self, c: char) -> bool {
        Self::glyph(c).is_some()
    }
}

/// Pick the label renderer for a batch.
///
/// `Ok(None)` means labels are switched off by the `omit` policy.
pub fn resolve_renderer(
    config: &LabelConfig,
) -> Result<Option<Arc<dyn LabelRenderer>>, PreconditionError> {
    if let Some(path) = &config.font_path {
        match GlyphRenderer::load(path, config.font_size) {
            Ok(renderer) => return Ok(Some(Arc::new(renderer))),
            Err(err) if config.fallback == FontFallback::Fail => return Err(err),
            Err(err) => warn!("{err}; falling back to {:?} policy", config.fallback),
        }
    }

    match config.fallback {
        FontFallback::Builtin => Ok(Some(Arc::new(BlockRenderer::new(config.font_size)))),
        FontFallback::Omit => Ok(None),
        FontFallback::Fail => Err(PreconditionError::NoFont),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink(img: &RgbImage) -> usize {
        img.pixels().filter(|p| p.0 == [0, 0, 0]).count()
    }

    #[test]
    fn block_text_is_drawn_and_clipped() {
        let renderer = BlockRenderer::new(18.0);
        assert_eq!(renderer.line_height(), 15);

        let mut canvas = RgbImage::from_pixel(40, 10, Rgb([255, 255, 255]));
        renderer.draw(&mut canvas, -2, 4, "18-10", Rgb([0, 0, 0]));

        assert_eq!(canvas.dimensions(), (40, 10));
        assert!(ink(&canvas) > 0);
    }

    #[test]
    fn unsupported_characters_are_blank_and_reported() {
        let renderer = BlockRenderer::new(6.0);
        let mut canvas = RgbImage::from_pixel(20, 20, Rgb([255, 255, 255]));
        renderer.draw(&mut canvas, 0, 0, "\u{e9}\u{b7} #", Rgb([0, 0, 0]));
        assert_eq!(ink(&canvas), 0);

        assert_eq!(
            unsupported_chars(&renderer, "18 \u{e9}t\u{e9} #"),
            vec!['\u{e9}', '\u{e9}', '#']
        );
        assert!(unsupported_chars(&renderer, "18 Oct, 2026").is_empty());
    }

    #[test]
    fn month_names_are_drawn() {
        let config = LabelConfig {
            format: "[day] [month repr:short] [year]".to_string(),
            ..LabelConfig::default()
        };
        let text = config.format_date(time::macros::datetime!(2026-10-18 9:30 UTC)).unwrap();
        assert_eq!(text, "18 Oct 2026");

        let renderer = BlockRenderer::new(18.0);
        let mut with_month = RgbImage::from_pixel(220, 20, Rgb([255, 255, 255]));
        renderer.draw(&mut with_month, 0, 0, &text, Rgb([0, 0, 0]));
        let mut digits_only = RgbImage::from_pixel(220, 20, Rgb([255, 255, 255]));
        renderer.draw(&mut digits_only, 0, 0, "18     2026", Rgb([0, 0, 0]));

        assert!(ink(&with_month) > ink(&digits_only));
        assert!(unsupported_chars(&renderer, &text).is_empty());
    }

    #[test]
    fn fallback_policy_decides_without_a_font() {
        let mut config = LabelConfig::default();
        assert!(resolve_renderer(&config).unwrap().is_some());

        config.fallback = FontFallback::Omit;
        assert!(resolve_renderer(&config).unwrap().is_none());

        config.fallback = FontFallback::Fail;
        assert!(matches!(resolve_renderer(&config), Err(PreconditionError::NoFont)));
    }

    #[test]
    fn missing_font_file_respects_policy() {
        let mut config = LabelConfig {
            font_path: Some("/nonexistent/arialbd.ttf".into()),
            ..LabelConfig::default()
        };
        assert!(resolve_renderer(&config).unwrap().is_some());

        config.fallback = FontFallback::Fail;
        assert!(matches!(resolve_renderer(&config), Err(PreconditionError::Font { .. })));
    }
}
