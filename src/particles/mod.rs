pub mod builder;
pub mod config;
pub mod error;
pub mod glyphs;
pub mod mask;
pub mod pointer;
pub mod render;
pub mod scene;
pub mod simulation;

pub use builder::{build_particles, is_ink};
pub use config::{Color, FieldConfig, HeadlineStyle, PhysicsConfig, SamplingConfig};
pub use error::FieldError;
pub use glyphs::BitmapRasterizer;
pub use mask::{HeadlineLayout, MaskBuffer, Rgba, TextRasterizer};
pub use pointer::{CanvasRect, PointerState};
pub use render::{render_frame, FramePalette, PixelSurface, Surface};
pub use scene::{ContainerSize, HeroOptions, HeroScene};
pub use simulation::{Particle, ParticleField, Repulsion};
