use crate::{
    config::GEOMETRY_EPSILON,
    core::{constraints::SpringConstraint, particle::Particle},
    utils::get2_mut,
};

/// One XPBD projection of a distance constraint.
///
/// Springs collapsed below [`GEOMETRY_EPSILON`] have no usable gradient and
/// are left alone.
pub fn project(spring: &SpringConstraint, particles: &mut [Particle], lambda: &mut f32, dt: f32) {
    let [i, j] = spring.particles;
    let Some((p1, p2)) = get2_mut(particles, i, j) else {
        return;
    };

    let delta = p2.position - p1.position;
    let length = delta.length();
    if length < GEOMETRY_EPSILON {
        return;
    }
    let direction = delta / length;

    let alpha = spring.compliance / (dt * dt);
    let denominator = p1.inverse_mass + p2.inverse_mass + alpha;
    if denominator <= 0.0 {
        return;
    }
    let c = length - spring.rest_length;
    let delta_lambda = -(c + alpha * *lambda) / denominator;

    p1.position -= direction * (p1.inverse_mass * delta_lambda);
    p2.position += direction * (p2.inverse_mass * delta_lambda);
    *lambda += delta_lambda;
}
