use std::io::{self, Write};

use bytemuck::cast_slice;
use rand::Rng;

use super::config::{Color, PhysicsConfig};
use super::mask::Rgba;
use super::pointer::PointerState;
use super::simulation::ParticleField;

/// Anything a frame can be painted on.
pub trait Surface {
    fn size(&self) -> (u32, u32);
    fn fill_background(&mut self, color: Color);
    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Color);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePalette {
    pub background: Color,
    pub ink: Color,
}

/// Full repaint, then update and draw every particle in array order.
pub fn render_frame<S, R>(
    surface: &mut S,
    field: &mut ParticleField,
    pointer: &PointerState,
    physics: &PhysicsConfig,
    palette: FramePalette,
    rng: &mut R,
) where
    S: Surface + ?Sized,
    R: Rng + ?Sized,
{
    surface.fill_background(palette.background);
    field.step_each(pointer, physics, rng, |particle| {
        surface.fill_circle(particle.position, particle.radius, palette.ink);
    });
}

/// In-memory RGBA surface.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    pub fn count(&self, color: Color) -> usize {
        let target = Rgba::opaque(color);
        self.pixels.iter().filter(|p| **p == target).count()
    }

    pub fn as_bytes(&self) -> &[u8] {
        cast_slice(&self.pixels)
    }

    /// Binary PPM (P6); alpha is dropped.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let rgb: Vec<u8> = self
            .as_bytes()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        out.write_all(&rgb)?;
        out.flush()
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_background(&mut self, color: Color) {
        self.pixels.fill(Rgba::opaque(color));
    }

    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Color) {
        if radius <= 0.0 || !center[0].is_finite() || !center[1].is_finite() {
            return;
        }
        let fill = Rgba::opaque(color);
        let x0 = (center[0] - radius).floor().max(0.0) as u32;
        let y0 = (center[1] - radius).floor().max(0.0) as u32;
        let x1 = ((center[0] + radius).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((center[1] + radius).ceil().max(0.0) as u32).min(self.height);
        let r2 = radius * radius;
        let stride = self.width as usize;

        for y in y0..y1 {
            let dy = y as f32 + 0.5 - center[1];
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - center[0];
                if dx * dx + dy * dy <= r2 {
                    self.pixels[y as usize * stride + x as usize] = fill;
                }
            }
        }
    }
}
