use glam::Vec3;

use crate::core::{constraints::ContactLambda, rigidbody::RigidBody};

/// Position-level static friction for one contact.
///
/// Cancels the tangential slip of the contact points since the start of the
/// step. The correction is rejected outright when the accumulated tangential
/// multiplier would leave the friction cone `μs · |λn|`; dynamic friction
/// then handles the contact at velocity level.
pub fn apply_static_friction(
    body_a: &mut RigidBody,
    body_b: &mut RigidBody,
    local_a: Vec3,
    local_b: Vec3,
    normal: Vec3,
    static_friction: f32,
    lambda: &mut ContactLambda,
) {
    let point_a = body_a.transform.transform_point(local_a);
    let point_b = body_b.transform.transform_point(local_b);
    let previous_a = body_a.previous_transform.transform_point(local_a);
    let previous_b = body_b.previous_transform.transform_point(local_b);

    let slip = (point_a - previous_a) - (point_b - previous_b);
    let tangential = slip - normal * slip.dot(normal);
    let length = tangential.length();
    if length <= f32::EPSILON {
        return;
    }
    let tangent = tangential / length;

    let r_a = point_a - body_a.transform.position;
    let r_b = point_b - body_b.transform.position;
    let w = body_a.generalized_inverse_mass(r_a, tangent)
        + body_b.generalized_inverse_mass(r_b, tangent);
    if w <= f32::EPSILON {
        return;
    }

    let delta_lambda = -length / w;
    if (lambda.tangent + delta_lambda).abs() > static_friction * lambda.normal.abs() {
        return;
    }
    lambda.tangent += delta_lambda;

    let impulse = tangent * delta_lambda;
    body_a.apply_position_impulse(impulse, r_a);
    body_b.apply_position_impulse(-impulse, r_b);
}

/// Velocity change that removes tangential sliding, limited by the normal
/// multiplier.
pub fn dynamic_friction_delta(
    tangential_velocity: Vec3,
    dynamic_friction: f32,
    normal_lambda: f32,
    dt: f32,
) -> Vec3 {
    let speed = tangential_velocity.length();
    if speed <= f32::EPSILON {
        return Vec3::ZERO;
    }
    let limit = dynamic_friction * normal_lambda.abs() / dt;
    -tangential_velocity / speed * limit.min(speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MassProperties, Transform};
    use crate::utils::ShapeId;
    use approx::assert_abs_diff_eq;

    fn ground() -> RigidBody {
        RigidBody::kinematic(ShapeId::default(), Transform::default())
    }

    fn sliding_ball() -> RigidBody {
        let mut ball = RigidBody::dynamic(
            ShapeId::default(),
            &MassProperties::for_sphere(0.5),
            1.0,
            Transform::from_position(Vec3::new(0.0, 0.5, 0.0)),
        );
        ball.transform.position.x += 0.01;
        ball
    }

    #[test]
    fn small_slip_is_cancelled_inside_cone() {
        let mut a = sliding_ball();
        let mut b = ground();
        let mut lambda = ContactLambda {
            normal: -1.0,
            tangent: 0.0,
        };
        let local_a = Vec3::new(0.0, -0.5, 0.0);
        let local_b = Vec3::ZERO;
        apply_static_friction(&mut a, &mut b, local_a, local_b, Vec3::NEG_Y, 1.0, &mut lambda);
        assert!(lambda.tangent != 0.0);
        let slip = a.transform.transform_point(local_a)
            - a.previous_transform.transform_point(local_a);
        assert_abs_diff_eq!(slip.x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn slip_outside_cone_is_rejected() {
        let mut a = sliding_ball();
        let mut b = ground();
        let mut lambda = ContactLambda {
            normal: -1e-6,
            tangent: 0.0,
        };
        let before = a.transform;
        apply_static_friction(
            &mut a,
            &mut b,
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::ZERO,
            Vec3::NEG_Y,
            0.5,
            &mut lambda,
        );
        assert_eq!(lambda.tangent, 0.0);
        assert_eq!(a.transform, before);
    }

    #[test]
    fn dynamic_friction_clamps_to_speed() {
        let delta = dynamic_friction_delta(Vec3::new(0.2, 0.0, 0.0), 1.0, -10.0, 0.01);
        assert_abs_diff_eq!(delta.x, -0.2, epsilon = 1e-6);
        let delta = dynamic_friction_delta(Vec3::new(2.0, 0.0, 0.0), 0.5, -0.001, 0.01);
        assert_abs_diff_eq!(delta.x, -0.05, epsilon = 1e-6);
    }
}
