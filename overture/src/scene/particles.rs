use crate::foundation::core::{Point, Viewport};
use rand::Rng;

/// Number of background particles in a field.
pub const PARTICLE_COUNT: usize = 80;

/// One background star, positioned relative to the viewport centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Horizontal offset from centre, in `[-width, width)`.
    pub x: f64,
    /// Vertical offset from centre, in `[-height, height)`.
    pub y: f64,
    /// Depth factor in `[0.5, 2.5)`; larger values sit further away.
    pub z: f64,
    /// Dot radius in logical pixels, in `[0, 1.5)`.
    pub size: f64,
}

impl Particle {
    /// Screen position for global `progress`: the field zooms out by up to 80% as the intro runs.
    pub fn project(&self, center: Point, progress: f64) -> Point {
        let scale = 1.0 + progress * 0.8;
        Point::new(
            center.x + self.x * scale / self.z,
            center.y + self.y * scale / self.z,
        )
    }
}

/// Immutable particle field generated for one viewport size.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleField {
    particles: Vec<Particle>,
    width: u32,
    height: u32,
}

impl ParticleField {
    /// Generate a fresh field of [`PARTICLE_COUNT`] particles for `viewport`.
    pub fn generate(viewport: &Viewport, rng: &mut impl Rng) -> Self {
        let w = f64::from(viewport.width);
        let h = f64::from(viewport.height);
        let particles = (0..PARTICLE_COUNT)
            .map(|_| Particle {
                x: (rng.r#gen::<f64>() - 0.5) * w * 2.0,
                y: (rng.r#gen::<f64>() - 0.5) * h * 2.0,
                z: rng.r#gen::<f64>() * 2.0 + 0.5,
                size: rng.r#gen::<f64>() * 1.5,
            })
            .collect();
        Self {
            particles,
            width: viewport.width,
            height: viewport.height,
        }
    }

    /// Borrow the particles in generation order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particles (always [`PARTICLE_COUNT`]).
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Return `true` when the field is empty (never, for generated fields).
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Logical viewport size this field was generated for.
    pub fn generated_for(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/particles.rs"]
mod tests;
