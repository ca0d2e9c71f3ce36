use rand::Rng;

use super::config::{FieldConfig, SamplingConfig};
use super::mask::{MaskBuffer, Rgba};
use super::simulation::Particle;

/// Opaque and dark: part of the rendered text rather than the background.
pub fn is_ink(pixel: Rgba, sampling: &SamplingConfig) -> bool {
    pixel.a > sampling.alpha_threshold && pixel.r < sampling.red_threshold
}

/// Samples the mask on a regular grid and seeds one particle per ink sample.
///
/// Grid points are `gap` apart starting at the origin; each particle origin
/// is offset from its grid point by `(u - 0.5) * gap * jitter_ratio` on both
/// axes. The returned particles are at rest on their origins.
pub fn build_particles<R: Rng + ?Sized>(
    mask: &MaskBuffer,
    config: &FieldConfig,
    sampling: &SamplingConfig,
    rng: &mut R,
) -> Vec<Particle> {
    let gap = config.gap.max(1.0);
    let spread = gap * sampling.jitter_ratio;
    let width = mask.width() as f32;
    let height = mask.height() as f32;
    let mut particles = Vec::new();

    let mut y = 0.0f32;
    while y < height {
        let mut x = 0.0f32;
        while x < width {
            let ink = mask
                .pixel(x.floor() as u32, y.floor() as u32)
                .is_some_and(|pixel| is_ink(pixel, sampling));
            if ink {
                let (jx, jy) = if spread > 0.0 {
                    (
                        (rng.random::<f32>() - 0.5) * spread,
                        (rng.random::<f32>() - 0.5) * spread,
                    )
                } else {
                    (0.0, 0.0)
                };
                particles.push(Particle::at_rest([x + jx, y + jy], config.particle_radius));
            }
            x += gap;
        }
        y += gap;
    }

    particles
}
