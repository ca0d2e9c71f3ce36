use serde::{Deserialize, Serialize};

use super::error::FieldError;

/// Opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_css(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

pub const PAPER: Color = Color::rgb(0xF5, 0xF5, 0xF7);
pub const INK: Color = Color::rgb(0x1D, 0x1D, 0x1F);

/// Off-canvas pointer position. Far enough that no particle is ever inside
/// the interaction radius.
pub const POINTER_SENTINEL: f32 = -9999.0;

/// Largest accepted interaction radius in CSS pixels. Even at a device pixel
/// ratio of 4 the scaled radius stays short of the sentinel.
pub const MAX_INTERACTION_RADIUS: f32 = 1000.0;

fn invalid(field: &'static str, reason: &'static str) -> FieldError {
    FieldError::InvalidOption { field, reason }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Velocity multiplier applied every frame. Must stay below 1.
    pub friction: f32,
    /// Spring coefficient pulling a particle back to its origin.
    pub homing: f32,
    pub repulsion_strength: f32,
    /// Per-frame random multiplier range for the repulsion force.
    pub variance_min: f32,
    pub variance_max: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction: 0.90,
            homing: 0.05,
            repulsion_strength: 65.0,
            variance_min: 0.5,
            variance_max: 2.0,
        }
    }
}

impl PhysicsConfig {
    /// Rejects values that would let the field diverge or pull particles
    /// toward the pointer. NaN fails every check.
    pub fn validate(&self) -> Result<(), FieldError> {
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(invalid("physics.friction", "must be in (0, 1)"));
        }
        if !(self.homing >= 0.0 && self.homing.is_finite()) {
            return Err(invalid("physics.homing", "must be finite and >= 0"));
        }
        if !(self.repulsion_strength >= 0.0 && self.repulsion_strength.is_finite()) {
            return Err(invalid("physics.repulsion_strength", "must be finite and >= 0"));
        }
        if !(self.variance_min >= 0.0) {
            return Err(invalid("physics.variance_min", "must be >= 0"));
        }
        if !(self.variance_max >= self.variance_min && self.variance_max.is_finite()) {
            return Err(invalid("physics.variance_max", "must be finite and >= variance_min"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Grid step in CSS pixels, scaled by the device pixel ratio.
    pub base_gap: f32,
    /// Lower bound of the scaled grid step, in device pixels.
    pub min_gap: f32,
    pub radius_ratio: f32,
    /// Jitter spread as a fraction of the grid step. `0.0` disables jitter.
    pub jitter_ratio: f32,
    pub alpha_threshold: u8,
    pub red_threshold: u8,
    /// Pointer interaction radius in CSS pixels.
    pub interaction_radius: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            base_gap: 3.0,
            min_gap: 2.0,
            radius_ratio: 0.6,
            jitter_ratio: 0.5,
            alpha_threshold: 128,
            red_threshold: 200,
            interaction_radius: 70.0,
        }
    }
}

impl SamplingConfig {
    pub fn validate(&self) -> Result<(), FieldError> {
        if !(self.base_gap > 0.0 && self.base_gap.is_finite()) {
            return Err(invalid("sampling.base_gap", "must be finite and > 0"));
        }
        if !(self.min_gap > 0.0 && self.min_gap.is_finite()) {
            return Err(invalid("sampling.min_gap", "must be finite and > 0"));
        }
        if !(self.radius_ratio > 0.0 && self.radius_ratio.is_finite()) {
            return Err(invalid("sampling.radius_ratio", "must be finite and > 0"));
        }
        if !(self.jitter_ratio >= 0.0 && self.jitter_ratio.is_finite()) {
            return Err(invalid("sampling.jitter_ratio", "must be finite and >= 0"));
        }
        let radius = self.interaction_radius;
        if !(radius >= 0.0 && radius <= MAX_INTERACTION_RADIUS) {
            return Err(invalid("sampling.interaction_radius", "must be in [0, 1000]"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlineStyle {
    pub lines: Vec<String>,
    pub font_family: String,
    pub font_weight: u16,
    /// Font size as a fraction of the canvas width.
    pub width_ratio: f32,
    /// Font size cap in CSS pixels.
    pub max_font_px: f32,
    pub line_height_ratio: f32,
    pub background: Color,
    pub ink: Color,
}

impl Default for HeadlineStyle {
    fn default() -> Self {
        Self {
            lines: vec!["I'M".to_string(), "LARRON".to_string()],
            font_family: "'Inter', -apple-system, BlinkMacSystemFont, sans-serif".to_string(),
            font_weight: 900,
            width_ratio: 0.2,
            max_font_px: 220.0,
            line_height_ratio: 0.95,
            background: PAPER,
            ink: INK,
        }
    }
}

impl HeadlineStyle {
    pub fn css_font(&self, font_size: f32) -> String {
        format!("{} {}px {}", self.font_weight, font_size, self.font_family)
    }
}

/// Geometry of one field build, derived from the container's rendered size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConfig {
    pub dpr: f32,
    pub width: u32,
    pub height: u32,
    pub gap: f32,
    pub particle_radius: f32,
    pub font_size: f32,
    pub line_height: f32,
    pub interaction_radius: f32,
}

impl FieldConfig {
    pub fn derive(
        css_width: f64,
        css_height: f64,
        dpr: f64,
        style: &HeadlineStyle,
        sampling: &SamplingConfig,
    ) -> Self {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr as f32 } else { 1.0 };
        let width = (css_width.max(0.0) * dpr as f64).floor() as u32;
        let height = (css_height.max(0.0) * dpr as f64).floor() as u32;

        let gap = (sampling.base_gap * dpr).max(sampling.min_gap).max(1.0);
        let font_size = (width as f32 * style.width_ratio).min(style.max_font_px * dpr);

        Self {
            dpr,
            width,
            height,
            gap,
            particle_radius: gap * sampling.radius_ratio,
            font_size,
            line_height: font_size * style.line_height_ratio,
            interaction_radius: sampling.interaction_radius * dpr,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
