//! Built-in 5x7 bitmap font, used to rasterize headlines without a browser.

use super::config::{FieldConfig, HeadlineStyle};
use super::error::FieldError;
use super::mask::{ensure_ready, HeadlineLayout, MaskBuffer, Rgba, TextRasterizer};

const GLYPH_ROWS: usize = 7;
const GLYPH_COLS: u32 = 5;
/// Cap height relative to the font size, close to a heavy grotesque.
const CAP_HEIGHT: f32 = 0.72;

type Glyph = [u8; GLYPH_ROWS];

#[rustfmt::skip]
fn glyph(c: char) -> Glyph {
    match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '\'' => [0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        ' ' => [0; GLYPH_ROWS],
        _ => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
    }
}

/// Rasterizes headlines with the built-in bitmap font.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitmapRasterizer;

impl TextRasterizer for BitmapRasterizer {
    fn rasterize(
        &mut self,
        config: &FieldConfig,
        style: &HeadlineStyle,
    ) -> Result<MaskBuffer, FieldError> {
        ensure_ready(config)?;

        let background = Rgba::opaque(style.background);
        let mut mask = MaskBuffer::filled(config.width, config.height, background);
        let ink = Rgba::opaque(style.ink);
        let layout = HeadlineLayout::new(config, style.lines.len());
        let cell = (layout.font_size * CAP_HEIGHT / GLYPH_ROWS as f32).max(1.0);
        let advance = cell * (GLYPH_COLS + 1) as f32;

        for (line, center_y) in style.lines.iter().zip(&layout.line_centers) {
            let chars = line.chars().count();
            if chars == 0 {
                continue;
            }
            let line_width = advance * chars as f32 - cell;
            let left = layout.center_x - line_width / 2.0;
            let top = center_y - cell * GLYPH_ROWS as f32 / 2.0;

            for (i, c) in line.chars().enumerate() {
                let glyph_left = left + advance * i as f32;
                for (row, bits) in glyph(c).iter().enumerate() {
                    for col in 0..GLYPH_COLS {
                        if bits & (1 << (GLYPH_COLS - 1 - col)) == 0 {
                            continue;
                        }
                        let x0 = (glyph_left + cell * col as f32).round() as i64;
                        let x1 = (glyph_left + cell * (col + 1) as f32).round() as i64;
                        let y0 = (top + cell * row as f32).round() as i64;
                        let y1 = (top + cell * (row + 1) as f32).round() as i64;
                        mask.fill_rect(x0, y0, x1 - x0, y1 - y0, ink);
                    }
                }
            }
        }

        Ok(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::BitmapRasterizer;
    use crate::particles::config::{FieldConfig, HeadlineStyle, SamplingConfig, INK};
    use crate::particles::error::FieldError;
    use crate::particles::mask::{Rgba, TextRasterizer};

    fn config(width: f64, height: f64) -> FieldConfig {
        let style = HeadlineStyle::default();
        FieldConfig::derive(width, height, 1.0, &style, &SamplingConfig::default())
    }

    #[test]
    fn zero_size_is_not_ready() {
        let err = BitmapRasterizer
            .rasterize(&config(0.0, 0.0), &HeadlineStyle::default())
            .unwrap_err();
        assert_eq!(err, FieldError::NotReady { width: 0, height: 0 });
    }

    #[test]
    fn headline_ink_is_centered() {
        let config = config(800.0, 400.0);
        let mask = BitmapRasterizer
            .rasterize(&config, &HeadlineStyle::default())
            .unwrap();

        let ink = Rgba::opaque(INK);
        let (mut sum_x, mut sum_y, mut count) = (0u64, 0u64, 0u64);
        for y in 0..mask.height() {
            for x in 0..mask.width() {
                if mask.pixel(x, y) == Some(ink) {
                    sum_x += x as u64;
                    sum_y += y as u64;
                    count += 1;
                }
            }
        }
        assert!(count > 1_000);
        let cx = sum_x as f32 / count as f32;
        let cy = sum_y as f32 / count as f32;
        assert!((cx - 400.0).abs() < 40.0, "ink centroid x = {cx}");
        assert!((cy - 200.0).abs() < 40.0, "ink centroid y = {cy}");
    }

    #[test]
    fn blank_lines_leave_only_background() {
        let style = HeadlineStyle {
            lines: vec![String::new(), "   ".to_string()],
            ..HeadlineStyle::default()
        };
        let mask = BitmapRasterizer.rasterize(&config(200.0, 100.0), &style).unwrap();
        assert!(mask.pixels().iter().all(|p| *p == Rgba::opaque(style.background)));
    }
}
