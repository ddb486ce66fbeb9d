//! Expanding polytope penetration query, seeded from a GJK tetrahedron.

use glam::Vec3;
use log::debug;

use super::{
    contact::Contact,
    gjk::{PolyhedronPair, Simplex, VertexId},
    hull::IncrementalHull,
};
use crate::{config::EPA_TOLERANCE, utils::barycentric};

/// Face of the expanded polytope closest to the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpaResult {
    /// Minkowski-difference positions of the face vertices.
    pub vertices: [Vec3; 3],
    /// Shape vertex indices each face vertex was built from.
    pub ids: [VertexId; 3],
    /// Outward face normal, pointing from A to B.
    pub normal: Vec3,
    pub penetration_depth: f32,
}

impl EpaResult {
    /// World-space witness points on A and B, from the barycentric
    /// coordinates of the origin's projection onto the face.
    pub fn witness_points(&self, pair: &PolyhedronPair) -> (Vec3, Vec3) {
        let [p0, p1, p2] = self.vertices;
        let weights = barycentric(self.normal * self.penetration_depth, p0, p1, p2);
        let mut point_a = Vec3::ZERO;
        let mut point_b = Vec3::ZERO;
        for (weight, (ia, ib)) in weights.to_array().into_iter().zip(self.ids) {
            point_a += pair.point_a(ia) * weight;
            point_b += pair.point_b(ib) * weight;
        }
        (point_a, point_b)
    }

    pub fn contact(&self, pair: &PolyhedronPair) -> Contact {
        let (point_a, point_b) = self.witness_points(pair);
        Contact::from_world(pair.transform_a, point_a, pair.transform_b, point_b, self.normal)
    }
}

/// Expands the tetrahedron found by [`crate::collision::gjk::intersect`].
///
/// Returns `None` if `simplex` is not a tetrahedron. When the nearest face
/// ends up on the wrong side of the origin the expansion stops early and the
/// current face is reported as is.
pub fn penetration(pair: &PolyhedronPair, simplex: &Simplex) -> Option<EpaResult> {
    let ids: [VertexId; 4] = simplex.ids().try_into().ok()?;
    let mut hull = IncrementalHull::from_tetrahedron(ids.map(|id| pair.point(id)), EPA_TOLERANCE);
    let mut hull_ids = ids.to_vec();

    for _ in 0..pair.vertex_count_product() {
        let face = *hull.nearest_face()?;
        if face.distance < 0.0 {
            debug!("EPA nearest face has negative distance {}", face.distance);
            break;
        }
        let id = pair.support(face.normal);
        let point = pair.point(id);
        if point.dot(face.normal) - face.distance <= EPA_TOLERANCE {
            break;
        }
        match hull.insert(point) {
            Some(_) => hull_ids.push(id),
            None => break,
        }
    }

    let face = *hull.nearest_face()?;
    Some(EpaResult {
        vertices: face.indices.map(|i| hull.points()[i]),
        ids: face.indices.map(|i| hull_ids[i]),
        normal: face.normal,
        penetration_depth: face.distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collision::{gjk::intersect, polyhedron::ConvexPolyhedron},
        core::types::Transform,
    };
    use approx::assert_abs_diff_eq;

    #[test]
    fn boxes_overlapping_along_x() {
        let (cube, _) = ConvexPolyhedron::cuboid(Vec3::splat(0.5)).expect("box");
        let tf_a = Transform::default();
        let tf_b = Transform::from_position(Vec3::new(0.5, 0.0, 0.0));
        let pair = PolyhedronPair::new(&cube, &tf_a, &cube, &tf_b);
        let mut simplex = Simplex::default();
        assert!(intersect(&pair, &mut simplex));

        let result = penetration(&pair, &simplex).expect("tetrahedron");
        assert_abs_diff_eq!(result.normal.x.abs(), 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(result.penetration_depth, 0.5, epsilon = 1e-3);

        let contact = result.contact(&pair);
        assert_abs_diff_eq!(contact.penetration_depth(&tf_a, &tf_b), 0.5, epsilon = 1e-3);
    }

    #[test]
    fn rejects_incomplete_simplex() {
        let (cube, _) = ConvexPolyhedron::cuboid(Vec3::ONE).expect("box");
        let tf = Transform::default();
        let pair = PolyhedronPair::new(&cube, &tf, &cube, &tf);
        assert!(penetration(&pair, &Simplex::default()).is_none());
    }
}
