use crate::{
    collision::Shape,
    core::{particle::Particle, rigidbody::RigidBody},
};

/// Pushes a particle out of a kinematic body so it ends at least `margin`
/// outside the surface.
///
/// Returns `true` if the particle was moved.
pub fn project_particle(
    particle: &mut Particle,
    body: &RigidBody,
    shape: &Shape,
    margin: f32,
) -> bool {
    if particle.inverse_mass == 0.0 {
        return false;
    }
    let (distance, outward) = shape.signed_distance(&body.transform, particle.position);
    if distance >= margin {
        return false;
    }
    particle.position += outward * (margin - distance);
    true
}
