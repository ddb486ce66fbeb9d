use glam::Vec3;

/// Point mass simulated by the position-based solver.
///
/// An `inverse_mass` of zero pins the particle in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub inverse_mass: f32,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Position at the start of the current step.
    pub previous_position: Vec3,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            inverse_mass: 1.0,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            previous_position: Vec3::ZERO,
        }
    }
}

impl Particle {
    pub fn new(position: Vec3, mass: f32) -> Self {
        Self {
            inverse_mass: if mass > 0.0 { mass.recip() } else { 0.0 },
            position,
            previous_position: position,
            ..Self::default()
        }
    }

    pub fn pinned(position: Vec3) -> Self {
        Self {
            inverse_mass: 0.0,
            ..Self::new(position, 0.0)
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn is_pinned(&self) -> bool {
        self.inverse_mass == 0.0
    }
}
