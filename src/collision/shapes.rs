use glam::Vec3;

use super::polyhedron::ConvexPolyhedron;
use crate::core::types::Transform;

/// Collision geometry shared between bodies through the world's shape arena.
///
/// Variant order matters: pairwise dispatch always puts the lower-ranked
/// variant first.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    /// Solid half-space below the plane through the body origin with the given
    /// local unit `normal`.
    Plane { normal: Vec3 },
    ConvexPolyhedron(ConvexPolyhedron),
}

impl Shape {
    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere { radius }
    }

    pub fn plane(normal: Vec3) -> Self {
        Shape::Plane {
            normal: normal.normalize_or(Vec3::Y),
        }
    }

    /// Position in the double-dispatch ordering.
    pub fn rank(&self) -> u8 {
        match self {
            Shape::Sphere { .. } => 0,
            Shape::Plane { .. } => 1,
            Shape::ConvexPolyhedron(_) => 2,
        }
    }

    /// Signed distance from a world point to the surface of the shape placed at
    /// `transform`, with the outward direction at the closest surface feature.
    ///
    /// For polyhedra this is the largest face-plane distance, which is exact
    /// inside and a lower bound outside.
    pub fn signed_distance(&self, transform: &Transform, point: Vec3) -> (f32, Vec3) {
        let local = transform.inverse_transform_point(point);
        match self {
            Shape::Sphere { radius } => {
                let length = local.length();
                let direction = if length > f32::EPSILON { local / length } else { Vec3::Y };
                (length - radius, transform.transform_vector(direction))
            }
            Shape::Plane { normal } => (local.dot(*normal), transform.transform_vector(*normal)),
            Shape::ConvexPolyhedron(poly) => {
                let (distance, face) = poly.max_face_distance(local);
                (distance, transform.transform_vector(face.normal))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::Quat;

    #[test]
    fn rank_follows_variant_order() {
        let (cube, _) = ConvexPolyhedron::cuboid(Vec3::ONE).expect("cube");
        assert!(Shape::sphere(1.0).rank() < Shape::plane(Vec3::Y).rank());
        assert!(Shape::plane(Vec3::Y).rank() < Shape::ConvexPolyhedron(cube).rank());
    }

    #[test]
    fn plane_distance_uses_rotated_normal() {
        let plane = Shape::plane(Vec3::Y);
        let tf = Transform::new(
            Vec3::new(0.0, 1.0, 0.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        );
        let (distance, normal) = plane.signed_distance(&tf, Vec3::new(-2.0, 1.0, 0.0));
        assert_abs_diff_eq!(distance, 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(normal.x, -1.0, epsilon = 1e-5);
    }
}
