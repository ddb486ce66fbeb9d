//! Separating axis test between two convex polyhedra.

use glam::Vec3;

use super::polyhedron::ConvexPolyhedron;
use crate::core::types::Transform;

/// Axis of largest signed separation between two polyhedra.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatResult {
    /// Unit axis pointing from A to B.
    pub axis: Vec3,
    /// Gap along `axis`; negative values are overlap.
    pub separation: f32,
}

impl SatResult {
    pub fn is_separated(&self) -> bool {
        self.separation > 0.0
    }

    pub fn penetration_depth(&self) -> f32 {
        (-self.separation).max(0.0)
    }
}

const PARALLEL_EDGE_EPSILON: f32 = 1e-8;

/// Tests every face normal of both shapes and the cross product of every pair
/// of unique edges, keeping the axis with the largest separation.
pub fn separating_axis(
    a: &ConvexPolyhedron,
    transform_a: &Transform,
    b: &ConvexPolyhedron,
    transform_b: &Transform,
) -> SatResult {
    let mut best = SatResult {
        axis: Vec3::X,
        separation: f32::NEG_INFINITY,
    };
    let mut test = |axis: Vec3| {
        let pa = a.project_onto_axis_with_transform(axis, transform_a);
        let pb = b.project_onto_axis_with_transform(axis, transform_b);
        let forward = pb.min - pa.max;
        let backward = pa.min - pb.max;
        let candidate = if forward >= backward {
            SatResult {
                axis,
                separation: forward,
            }
        } else {
            SatResult {
                axis: -axis,
                separation: backward,
            }
        };
        if candidate.separation > best.separation {
            best = candidate;
        }
    };

    for normal in a.unique_face_normals() {
        test(transform_a.transform_vector(*normal));
    }
    for normal in b.unique_face_normals() {
        test(transform_b.transform_vector(*normal));
    }
    for edge_a in a.unique_edges() {
        let edge_a = transform_a.transform_vector(*edge_a);
        for edge_b in b.unique_edges() {
            let axis = edge_a.cross(transform_b.transform_vector(*edge_b));
            let length_squared = axis.length_squared();
            if length_squared < PARALLEL_EDGE_EPSILON {
                continue;
            }
            test(axis / length_squared.sqrt());
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::Quat;

    #[test]
    fn overlapping_boxes_report_x_axis() {
        let (cube, _) = ConvexPolyhedron::cuboid(Vec3::splat(0.5)).expect("box");
        let tf_a = Transform::default();
        let tf_b = Transform::from_position(Vec3::new(0.5, 0.1, 0.0));
        let result = separating_axis(&cube, &tf_a, &cube, &tf_b);
        assert!(!result.is_separated());
        assert_abs_diff_eq!(result.penetration_depth(), 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(result.axis.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn edge_axis_separates_crossed_boxes() {
        let (cube, _) = ConvexPolyhedron::cuboid(Vec3::splat(0.5)).expect("box");
        let tf_a = Transform::new(Vec3::ZERO, Quat::from_rotation_z(std::f32::consts::FRAC_PI_4));
        let tf_b = Transform::new(
            Vec3::new(0.0, 1.5, 0.0),
            Quat::from_rotation_x(std::f32::consts::FRAC_PI_4),
        );
        let result = separating_axis(&cube, &tf_a, &cube, &tf_b);
        assert!(result.is_separated());
        assert!(result.axis.y > 0.0);
    }
}
