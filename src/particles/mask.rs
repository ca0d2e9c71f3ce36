//! Headline text masks.
//!
//! A [`MaskBuffer`] is the RGBA readback of the headline drawn over the
//! background color. It is sampled by the field builder and never displayed.

use bytemuck::{cast_slice, Pod, Zeroable};

use super::config::{Color, FieldConfig, HeadlineStyle};
use super::error::FieldError;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn opaque(color: Color) -> Self {
        Self {
            r: color.r,
            g: color.g,
            b: color.b,
            a: 255,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaskBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl MaskBuffer {
    pub fn filled(width: u32, height: u32, fill: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    /// Wraps a row-major RGBA byte buffer such as a canvas `ImageData`.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, FieldError> {
        let expected = width as usize * height as usize;
        if bytes.len() != expected * 4 {
            return Err(FieldError::MaskSize {
                expected,
                got: bytes.len() / 4,
            });
        }
        Ok(Self {
            width,
            height,
            pixels: cast_slice::<u8, Rgba>(bytes).to_vec(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Fills the intersection of the rectangle with the buffer. A rectangle
    /// with a non-positive width or height fills nothing.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgba) {
        let x0 = x.clamp(0, self.width as i64) as usize;
        let y0 = y.clamp(0, self.height as i64) as usize;
        let x1 = x.saturating_add(w).clamp(0, self.width as i64) as usize;
        let y1 = y.saturating_add(h).clamp(0, self.height as i64) as usize;
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let stride = self.width as usize;
        for row in y0..y1 {
            self.pixels[row * stride + x0..row * stride + x1].fill(color);
        }
    }
}

/// Line placement for a headline centered as a block.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlineLayout {
    pub center_x: f32,
    /// Vertical middle of each line, top to bottom.
    pub line_centers: Vec<f32>,
    pub font_size: f32,
    pub line_height: f32,
}

impl HeadlineLayout {
    pub fn new(config: &FieldConfig, line_count: usize) -> Self {
        let block = config.line_height * line_count as f32;
        let first = (config.height as f32 - block) / 2.0 + config.line_height / 2.0;
        Self {
            center_x: config.width as f32 / 2.0,
            line_centers: (0..line_count)
                .map(|i| first + config.line_height * i as f32)
                .collect(),
            font_size: config.font_size,
            line_height: config.line_height,
        }
    }
}

/// Draws the headline off screen and reads the pixels back.
///
/// Implementations must return [`FieldError::NotReady`] for a zero-size
/// field instead of producing a buffer.
pub trait TextRasterizer {
    fn rasterize(
        &mut self,
        config: &FieldConfig,
        style: &HeadlineStyle,
    ) -> Result<MaskBuffer, FieldError>;
}

pub fn ensure_ready(config: &FieldConfig) -> Result<(), FieldError> {
    if config.is_ready() {
        Ok(())
    } else {
        Err(FieldError::NotReady {
            width: config.width,
            height: config.height,
        })
    }
}
