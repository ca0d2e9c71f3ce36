//! Particle-field hero.
//!
//! A headline is rasterized into a pixel mask, the mask's ink pixels seed a
//! field of particles, and each animation frame the particles are pushed
//! away from the pointer and pulled back home. [`particles`] holds the
//! platform-independent engine; `web` binds it to a browser canvas.

pub mod particles;

#[cfg(target_arch = "wasm32")]
pub mod web;
