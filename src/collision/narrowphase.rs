//! Pairwise contact generation dispatched on the shape variants.
//!
//! Operands are ordered by [`Shape::rank`] before dispatch; a swapped pair
//! gets its contact mirrored back so the normal always points from the first
//! argument to the second.

use glam::Vec3;

use super::{
    contact::Contact,
    epa,
    gjk::{self, PolyhedronPair, Simplex},
    polyhedron::ConvexPolyhedron,
    shapes::Shape,
};
use crate::{core::types::Transform, utils::closest_point_on_triangle};

/// Vertices this close to the deepest one share the plane contact.
const FLAT_SUPPORT_TOLERANCE: f32 = 1e-3;

/// Deepest contact between two placed shapes, or `None` if they do not touch.
pub fn detect_collision(
    shape_a: &Shape,
    tf_a: &Transform,
    shape_b: &Shape,
    tf_b: &Transform,
) -> Option<Contact> {
    let mut simplex = Simplex::default();
    detect_collision_with_simplex(shape_a, tf_a, shape_b, tf_b, &mut simplex)
}

/// Same as [`detect_collision`], reusing `simplex` to warm-start GJK for
/// polyhedron pairs.
pub fn detect_collision_with_simplex(
    shape_a: &Shape,
    tf_a: &Transform,
    shape_b: &Shape,
    tf_b: &Transform,
    simplex: &mut Simplex,
) -> Option<Contact> {
    if shape_a.rank() > shape_b.rank() {
        return dispatch(shape_b, tf_b, shape_a, tf_a, simplex).map(|contact| contact.swapped());
    }
    dispatch(shape_a, tf_a, shape_b, tf_b, simplex)
}

fn dispatch(
    shape_a: &Shape,
    tf_a: &Transform,
    shape_b: &Shape,
    tf_b: &Transform,
    simplex: &mut Simplex,
) -> Option<Contact> {
    match (shape_a, shape_b) {
        (Shape::Sphere { radius: ra }, Shape::Sphere { radius: rb }) => {
            sphere_sphere(*ra, tf_a, *rb, tf_b)
        }
        (Shape::Sphere { radius }, Shape::Plane { normal }) => {
            sphere_plane(*radius, tf_a, *normal, tf_b)
        }
        (Shape::Sphere { radius }, Shape::ConvexPolyhedron(poly)) => {
            sphere_polyhedron(*radius, tf_a, poly, tf_b)
        }
        (Shape::Plane { .. }, Shape::Plane { .. }) => None,
        (Shape::Plane { normal }, Shape::ConvexPolyhedron(poly)) => {
            plane_polyhedron(*normal, tf_a, poly, tf_b)
        }
        (Shape::ConvexPolyhedron(a), Shape::ConvexPolyhedron(b)) => {
            polyhedron_polyhedron(a, tf_a, b, tf_b, simplex)
        }
        _ => None,
    }
}

fn sphere_sphere(ra: f32, tf_a: &Transform, rb: f32, tf_b: &Transform) -> Option<Contact> {
    let offset = tf_b.position - tf_a.position;
    let distance = offset.length();
    if distance >= ra + rb {
        return None;
    }
    let normal = if distance > f32::EPSILON { offset / distance } else { Vec3::Y };
    Some(Contact::from_world(
        tf_a,
        tf_a.position + normal * ra,
        tf_b,
        tf_b.position - normal * rb,
        normal,
    ))
}

fn sphere_plane(
    radius: f32,
    tf_a: &Transform,
    plane_normal: Vec3,
    tf_b: &Transform,
) -> Option<Contact> {
    let up = tf_b.transform_vector(plane_normal);
    let height = (tf_a.position - tf_b.position).dot(up);
    if height >= radius {
        return None;
    }
    Some(Contact::from_world(
        tf_a,
        tf_a.position - up * radius,
        tf_b,
        tf_a.position - up * height,
        -up,
    ))
}

fn sphere_polyhedron(
    radius: f32,
    tf_a: &Transform,
    poly: &ConvexPolyhedron,
    tf_b: &Transform,
) -> Option<Contact> {
    let centre = tf_b.inverse_transform_point(tf_a.position);
    let (face_distance, face) = poly.max_face_distance(centre);

    if face_distance <= f32::EPSILON {
        // Centre inside: leave through the shallowest face.
        if face_distance >= radius {
            return None;
        }
        let outward = tf_b.transform_vector(face.normal);
        return Some(Contact::from_world(
            tf_a,
            tf_a.position - outward * radius,
            tf_b,
            tf_a.position - outward * face_distance,
            -outward,
        ));
    }

    let vertices = poly.vertices();
    let closest = poly
        .faces()
        .iter()
        .map(|f| {
            let [a, b, c] = f.indices.map(|i| vertices[i]);
            closest_point_on_triangle(centre, a, b, c)
        })
        .min_by(|p, q| p.distance_squared(centre).total_cmp(&q.distance_squared(centre)))?;
    let distance = closest.distance(centre);
    if distance >= radius {
        return None;
    }
    let normal = tf_b.transform_vector((closest - centre) / distance);
    Some(Contact::from_world(
        tf_a,
        tf_a.position + normal * radius,
        tf_b,
        tf_b.transform_point(closest),
        normal,
    ))
}

fn plane_polyhedron(
    plane_normal: Vec3,
    tf_a: &Transform,
    poly: &ConvexPolyhedron,
    tf_b: &Transform,
) -> Option<Contact> {
    let up = tf_a.transform_vector(plane_normal);
    let local_down = tf_b.inverse_transform_vector(-up);
    let deepest = tf_b.transform_point(poly.support_centroid(local_down, FLAT_SUPPORT_TOLERANCE));
    let height = (deepest - tf_a.position).dot(up);
    if height >= 0.0 {
        return None;
    }
    Some(Contact::from_world(tf_a, deepest - up * height, tf_b, deepest, up))
}

fn polyhedron_polyhedron(
    a: &ConvexPolyhedron,
    tf_a: &Transform,
    b: &ConvexPolyhedron,
    tf_b: &Transform,
    simplex: &mut Simplex,
) -> Option<Contact> {
    let pair = PolyhedronPair::new(a, tf_a, b, tf_b);
    if !gjk::intersect(&pair, simplex) {
        return None;
    }
    let result = epa::penetration(&pair, simplex)?;
    Some(result.contact(&pair))
}
