//! Rigid contact projection: non-penetration and static friction at position
//! level, then restitution and dynamic friction at velocity level.

use glam::Vec3;

use super::friction::{apply_static_friction, dynamic_friction_delta};
use crate::{
    core::{
        constraints::{ContactConstraint, ContactLambda},
        rigidbody::RigidBody,
        types::Material,
    },
    utils::get2_mut,
};

/// World-space contact points and their offsets from each centre of mass.
struct ContactFrame {
    point_a: Vec3,
    point_b: Vec3,
    r_a: Vec3,
    r_b: Vec3,
}

impl ContactFrame {
    fn new(constraint: &ContactConstraint, a: &RigidBody, b: &RigidBody) -> Self {
        let point_a = a.transform.transform_point(constraint.contact.contact1);
        let point_b = b.transform.transform_point(constraint.contact.contact2);
        Self {
            point_a,
            point_b,
            r_a: point_a - a.transform.position,
            r_b: point_b - b.transform.position,
        }
    }
}

/// Relative velocity `v_B − v_A` at the contact points along the normal.
pub fn relative_normal_velocity(constraint: &ContactConstraint, bodies: &[RigidBody]) -> f32 {
    let [ia, ib] = constraint.bodies;
    let (a, b) = (&bodies[ia], &bodies[ib]);
    let frame = ContactFrame::new(constraint, a, b);
    (b.velocity_at(frame.r_b) - a.velocity_at(frame.r_a)).dot(constraint.contact.normal)
}

/// One position-level pass over a contact.
///
/// Does nothing while the bodies are separated along the normal.
pub fn project_contact(
    constraint: &ContactConstraint,
    bodies: &mut [RigidBody],
    lambda: &mut ContactLambda,
) {
    let [ia, ib] = constraint.bodies;
    let Some((a, b)) = get2_mut(bodies, ia, ib) else {
        return;
    };
    let normal = constraint.contact.normal;
    let frame = ContactFrame::new(constraint, a, b);

    let depth = (frame.point_a - frame.point_b).dot(normal);
    if depth <= 0.0 {
        return;
    }

    let w = a.generalized_inverse_mass(frame.r_a, normal)
        + b.generalized_inverse_mass(frame.r_b, normal);
    if w <= f32::EPSILON {
        return;
    }
    let delta_lambda = -depth / w;
    lambda.normal += delta_lambda;

    let impulse = normal * delta_lambda;
    a.apply_position_impulse(impulse, frame.r_a);
    b.apply_position_impulse(-impulse, frame.r_b);

    let static_friction = Material::combine(&a.material, &b.material).static_friction;
    apply_static_friction(
        a,
        b,
        constraint.contact.contact1,
        constraint.contact.contact2,
        normal,
        static_friction,
        lambda,
    );
}

/// Velocity-level pass for a contact that was active during the position solve.
///
/// Restitution is measured against the relative normal velocity recorded
/// before the solve and disabled below `2·|g|·dt` so resting contacts do not
/// jitter.
pub fn solve_contact_velocity(
    constraint: &ContactConstraint,
    bodies: &mut [RigidBody],
    lambda: &ContactLambda,
    gravity: Vec3,
    dt: f32,
) {
    if lambda.normal == 0.0 {
        return;
    }
    let [ia, ib] = constraint.bodies;
    let Some((a, b)) = get2_mut(bodies, ia, ib) else {
        return;
    };
    let normal = constraint.contact.normal;
    let frame = ContactFrame::new(constraint, a, b);
    let pair = Material::combine(&a.material, &b.material);

    let relative = b.velocity_at(frame.r_b) - a.velocity_at(frame.r_a);
    let normal_speed = normal.dot(relative);
    let tangential = relative - normal * normal_speed;

    let mut delta_v = dynamic_friction_delta(tangential, pair.dynamic_friction, lambda.normal, dt);

    let pre_solve = constraint.pre_solve_normal_velocity;
    let restitution = if pre_solve.abs() <= 2.0 * gravity.length() * dt {
        0.0
    } else {
        pair.restitution
    };
    let target = (-restitution * pre_solve).max(0.0);
    delta_v += normal * (target - normal_speed);

    let magnitude = delta_v.length();
    if magnitude <= f32::EPSILON {
        return;
    }
    let direction = delta_v / magnitude;
    let w = a.generalized_inverse_mass(frame.r_a, direction)
        + b.generalized_inverse_mass(frame.r_b, direction);
    if w <= f32::EPSILON {
        return;
    }
    let impulse = delta_v / w;
    b.apply_velocity_impulse(impulse, frame.r_b);
    a.apply_velocity_impulse(-impulse, frame.r_a);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collision::Contact,
        core::types::{MassProperties, Transform},
        utils::ShapeId,
    };
    use approx::assert_abs_diff_eq;

    fn ball_on_ground(height: f32) -> (Vec<RigidBody>, ContactConstraint) {
        let ball = RigidBody::dynamic(
            ShapeId::default(),
            &MassProperties::for_sphere(0.5),
            1.0,
            Transform::from_position(Vec3::new(0.0, height, 0.0)),
        );
        let ground = RigidBody::kinematic(ShapeId::default(), Transform::default());
        let constraint = ContactConstraint {
            bodies: [0, 1],
            contact: Contact {
                contact1: Vec3::new(0.0, -0.5, 0.0),
                contact2: Vec3::ZERO,
                normal: Vec3::NEG_Y,
            },
            pre_solve_normal_velocity: 0.0,
        };
        (vec![ball, ground], constraint)
    }

    #[test]
    fn penetrating_ball_is_pushed_out() {
        let (mut bodies, constraint) = ball_on_ground(0.4);
        let mut lambda = ContactLambda::default();
        project_contact(&constraint, &mut bodies, &mut lambda);
        assert_abs_diff_eq!(bodies[0].transform.position.y, 0.5, epsilon = 1e-5);
        assert!(lambda.normal < 0.0);
        assert_eq!(bodies[1].transform.position, Vec3::ZERO);
    }

    #[test]
    fn separated_contact_is_ignored() {
        let (mut bodies, constraint) = ball_on_ground(0.7);
        let mut lambda = ContactLambda::default();
        project_contact(&constraint, &mut bodies, &mut lambda);
        assert_eq!(lambda, ContactLambda::default());
        assert_abs_diff_eq!(bodies[0].transform.position.y, 0.7);
    }

    #[test]
    fn restitution_reflects_approach_velocity() {
        let (mut bodies, mut constraint) = ball_on_ground(0.5);
        bodies[0].material.restitution = 1.0;
        bodies[0].velocity.linear = Vec3::ZERO;
        // Ball was falling at 3 m/s: B (ground) approaches A along +n.
        constraint.pre_solve_normal_velocity = -3.0;
        let lambda = ContactLambda {
            normal: -0.05,
            tangent: 0.0,
        };
        let gravity = Vec3::new(0.0, -9.81, 0.0);
        solve_contact_velocity(&constraint, &mut bodies, &lambda, gravity, 1.0 / 60.0);
        assert_abs_diff_eq!(bodies[0].velocity.linear.y, 3.0, epsilon = 1e-4);
    }
}
