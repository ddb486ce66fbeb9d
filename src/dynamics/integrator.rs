use glam::Vec3;

use crate::{
    core::{particle::Particle, rigidbody::RigidBody},
    utils::{angular_velocity_between, integrate_rotation},
};

/// Prediction and velocity reconstruction around the position solve.
///
/// Prediction is symplectic Euler: velocity first, then position with the new
/// velocity. After the solve, velocities are re-derived from the change in
/// pose over the step.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    pub gravity: Vec3,
    pub dt: f32,
}

impl Integrator {
    pub fn new(gravity: Vec3, dt: f32) -> Self {
        Self { gravity, dt }
    }

    pub fn predict_particle(&self, particle: &mut Particle) {
        particle.previous_position = particle.position;
        if particle.inverse_mass > 0.0 {
            particle.velocity += self.gravity * self.dt;
        }
        particle.position += particle.velocity * self.dt;
    }

    pub fn predict_body(&self, body: &mut RigidBody) {
        body.previous_transform = body.transform;
        body.previous_velocity = body.velocity;
        if !body.is_kinematic() {
            body.velocity.linear += self.gravity * self.dt;
        }
        body.transform.position += body.velocity.linear * self.dt;
        body.transform.rotation =
            integrate_rotation(body.transform.rotation, body.velocity.angular * self.dt);
    }

    /// Pinned particles keep whatever velocity the caller gave them.
    pub fn update_particle_velocity(&self, particle: &mut Particle) {
        if particle.inverse_mass > 0.0 {
            particle.velocity = (particle.position - particle.previous_position) / self.dt;
        }
    }

    /// Kinematic bodies keep their prescribed velocity.
    pub fn update_body_velocity(&self, body: &mut RigidBody) {
        if body.is_kinematic() {
            return;
        }
        let previous = body.previous_transform;
        body.velocity.linear = (body.transform.position - previous.position) / self.dt;
        body.velocity.angular =
            angular_velocity_between(previous.rotation, body.transform.rotation, self.dt);
    }
}
