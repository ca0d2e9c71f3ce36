use rand::Rng;

use super::config::PhysicsConfig;
use super::pointer::PointerState;

/// Below this pointer distance the repulsion direction is undefined and the
/// push is skipped for the frame.
pub const MIN_REPULSION_DISTANCE: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub radius: f32,
    origin: [f32; 2],
}

impl Particle {
    pub fn at_rest(origin: [f32; 2], radius: f32) -> Self {
        Self {
            position: origin,
            velocity: [0.0, 0.0],
            radius,
            origin,
        }
    }

    pub fn origin(&self) -> [f32; 2] {
        self.origin
    }

    pub fn distance_from_origin(&self) -> f32 {
        length(sub(self.origin, self.position))
    }

    /// Advances one frame: pointer repulsion, homing, friction, integration.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        pointer: &PointerState,
        physics: &PhysicsConfig,
        rng: &mut R,
    ) {
        if let Some(push) = repulsion_direction(self.position, pointer) {
            let variance = sample_variance(physics, rng);
            let magnitude = push.falloff * variance * physics.repulsion_strength;
            let kick = mul_scalar(push.direction, magnitude);
            self.velocity = add(self.velocity, kick);
        }

        let home = sub(self.origin, self.position);
        self.velocity = add(self.velocity, mul_scalar(home, physics.homing));
        self.velocity = mul_scalar(self.velocity, physics.friction);
        self.position = add(self.position, self.velocity);
    }
}

/// Unit direction away from the pointer and the quadratic falloff at the
/// particle's distance, before variance and strength scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repulsion {
    pub direction: [f32; 2],
    pub falloff: f32,
}

/// `None` when the particle is outside the interaction radius or sits
/// exactly under the pointer.
pub fn repulsion_direction(position: [f32; 2], pointer: &PointerState) -> Option<Repulsion> {
    let to_pointer = sub(pointer.position(), position);
    let distance = length(to_pointer);
    if distance >= pointer.radius() || distance < MIN_REPULSION_DISTANCE {
        return None;
    }
    Some(Repulsion {
        direction: mul_scalar(to_pointer, -distance.recip()),
        falloff: falloff(distance, pointer.radius()),
    })
}

/// `(1 - d / radius)^2`: 1 under the pointer, 0 at the boundary and beyond.
pub fn falloff(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    let d = (distance / radius).clamp(0.0, 1.0);
    (1.0 - d) * (1.0 - d)
}

fn sample_variance<R: Rng + ?Sized>(physics: &PhysicsConfig, rng: &mut R) -> f32 {
    let span = (physics.variance_max - physics.variance_min).max(0.0);
    physics.variance_min + rng.random::<f32>() * span
}

/// Every particle of one field build. The count is fixed until the next
/// rebuild replaces the whole field.
#[derive(Debug, Default, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn step<R: Rng + ?Sized>(
        &mut self,
        pointer: &PointerState,
        physics: &PhysicsConfig,
        rng: &mut R,
    ) {
        for particle in &mut self.particles {
            particle.update(pointer, physics, rng);
        }
    }

    /// Updates then visits each particle, in array order.
    pub fn step_each<R: Rng + ?Sized, F: FnMut(&Particle)>(
        &mut self,
        pointer: &PointerState,
        physics: &PhysicsConfig,
        rng: &mut R,
        mut visit: F,
    ) {
        for particle in &mut self.particles {
            particle.update(pointer, physics, rng);
            visit(particle);
        }
    }

    pub fn mean_displacement(&self) -> f32 {
        if self.particles.is_empty() {
            return 0.0;
        }
        let total: f32 = self.particles.iter().map(Particle::distance_from_origin).sum();
        total / self.particles.len() as f32
    }
}

fn add(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [a[0] + b[0], a[1] + b[1]]
}

fn sub(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

fn mul_scalar(v: [f32; 2], s: f32) -> [f32; 2] {
    [v[0] * s, v[1] * s]
}

fn length(v: [f32; 2]) -> f32 {
    (v[0] * v[0] + v[1] * v[1]).sqrt()
}
