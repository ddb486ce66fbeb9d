//! Dihedral bending between two triangles sharing an edge.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::{config::GEOMETRY_EPSILON, core::constraints::BendConstraint, core::particle::Particle};

/// Signed angle between the wings `(x0, x1, x2)` and `(x0, x1, x3)` about the
/// shared edge `x0 → x1`. Zero when the two triangles are coplanar and on
/// opposite sides of the edge.
pub fn dihedral_angle(x0: Vec3, x1: Vec3, x2: Vec3, x3: Vec3) -> Option<f32> {
    let edge = x1 - x0;
    let n1 = edge.cross(x2 - x0);
    let n2 = (x3 - x0).cross(edge);
    if edge.length() < GEOMETRY_EPSILON
        || n1.length() < GEOMETRY_EPSILON
        || n2.length() < GEOMETRY_EPSILON
    {
        return None;
    }
    let e = edge.normalize();
    Some(n1.cross(n2).dot(e).atan2(n1.dot(n2)))
}

/// Maps an angle difference into `(-π, π]` with at most one shift.
fn wrap_angle(c: f32) -> f32 {
    if c > PI {
        c - TAU
    } else if c <= -PI {
        c + TAU
    } else {
        c
    }
}

/// Gradients of the dihedral angle with respect to the four positions.
fn angle_gradients(x: [Vec3; 4]) -> Option<(f32, [Vec3; 4])> {
    let edge = x[1] - x[0];
    let a = x[2] - x[0];
    let b = x[3] - x[0];
    let n1 = edge.cross(a);
    let n2 = b.cross(edge);
    let edge_length = edge.length();
    if edge_length < GEOMETRY_EPSILON
        || n1.length() < GEOMETRY_EPSILON
        || n2.length() < GEOMETRY_EPSILON
    {
        return None;
    }
    let e = edge / edge_length;

    let s = n1.cross(n2).dot(e);
    let c = n1.dot(n2);
    let norm = s * s + c * c;
    if norm <= f32::EPSILON {
        return None;
    }

    let g_n1 = (n2.cross(e) * c - n2 * s) / norm;
    let g_n2 = (e.cross(n1) * c - n1 * s) / norm;
    let g_e = n1.cross(n2) * (c / norm);

    let g_edge = a.cross(g_n1) + g_n2.cross(b) + (g_e - e * e.dot(g_e)) / edge_length;
    let g_a = g_n1.cross(edge);
    let g_b = edge.cross(g_n2);
    let g_x0 = -(g_edge + g_a + g_b);

    Some((s.atan2(c), [g_x0, g_edge, g_a, g_b]))
}

/// One XPBD projection of a bending constraint.
pub fn project(bend: &BendConstraint, particles: &mut [Particle], lambda: &mut f32, dt: f32) {
    let indices = bend.particles;
    let positions = indices.map(|i| particles[i].position);
    let Some((angle, gradients)) = angle_gradients(positions) else {
        return;
    };

    let alpha = bend.compliance / (dt * dt);
    let weights = indices.map(|i| particles[i].inverse_mass);
    let denominator: f32 = weights
        .iter()
        .zip(&gradients)
        .map(|(w, g)| w * g.length_squared())
        .sum::<f32>()
        + alpha;
    if denominator <= f32::EPSILON {
        return;
    }

    let c = wrap_angle(angle - bend.rest_angle);
    let delta_lambda = -(c + alpha * *lambda) / denominator;
    for ((&i, w), g) in indices.iter().zip(weights).zip(gradients) {
        particles[i].position += g * (w * delta_lambda);
    }
    *lambda += delta_lambda;
}
