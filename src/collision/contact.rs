use glam::Vec3;

use crate::core::types::Transform;

/// Single contact between two shapes.
///
/// Points are stored in each body's local frame so the solver can re-evaluate
/// them as the bodies move during an iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Deepest point of shape A, local to A.
    pub contact1: Vec3,
    /// Deepest point of shape B, local to B.
    pub contact2: Vec3,
    /// World-space unit normal pointing from A to B.
    pub normal: Vec3,
}

impl Contact {
    pub(crate) fn from_world(
        tf_a: &Transform,
        point_a: Vec3,
        tf_b: &Transform,
        point_b: Vec3,
        normal: Vec3,
    ) -> Self {
        Self {
            contact1: tf_a.inverse_transform_point(point_a),
            contact2: tf_b.inverse_transform_point(point_b),
            normal,
        }
    }

    /// Penetration along the normal for the given poses; positive means overlap.
    pub fn penetration_depth(&self, tf_a: &Transform, tf_b: &Transform) -> f32 {
        (tf_a.transform_point(self.contact1) - tf_b.transform_point(self.contact2)).dot(self.normal)
    }

    /// The same contact seen with the operands exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            contact1: self.contact2,
            contact2: self.contact1,
            normal: -self.normal,
        }
    }
}
