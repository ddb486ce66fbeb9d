//! Gilbert-Johnson-Keerthi intersection test over pairs of convex polyhedra.
//!
//! The simplex grows from a point to a tetrahedron, then walks towards the
//! origin by replacing the vertex opposite a face that sees the origin. Each
//! simplex vertex is a pair of vertex indices, so a simplex stays meaningful
//! across steps and can warm-start the next query on the same pair.

use glam::Vec3;
use log::debug;

use super::polyhedron::ConvexPolyhedron;
use crate::{core::types::Transform, utils::any_perpendicular};

/// `(vertex index in A, vertex index in B)`.
pub type VertexId = (usize, usize);

/// Two placed polyhedra seen through their Minkowski difference `A − B`.
#[derive(Debug, Clone, Copy)]
pub struct PolyhedronPair<'a> {
    pub a: &'a ConvexPolyhedron,
    pub transform_a: &'a Transform,
    pub b: &'a ConvexPolyhedron,
    pub transform_b: &'a Transform,
}

impl<'a> PolyhedronPair<'a> {
    pub fn new(
        a: &'a ConvexPolyhedron,
        transform_a: &'a Transform,
        b: &'a ConvexPolyhedron,
        transform_b: &'a Transform,
    ) -> Self {
        Self {
            a,
            transform_a,
            b,
            transform_b,
        }
    }

    /// Minkowski-difference support along a world direction.
    pub fn support(&self, direction: Vec3) -> VertexId {
        let ia = self.a.support_index(self.transform_a.inverse_transform_vector(direction));
        let ib = self.b.support_index(self.transform_b.inverse_transform_vector(-direction));
        (ia, ib)
    }

    pub fn point_a(&self, index: usize) -> Vec3 {
        self.transform_a.transform_point(self.a.vertices()[index])
    }

    pub fn point_b(&self, index: usize) -> Vec3 {
        self.transform_b.transform_point(self.b.vertices()[index])
    }

    /// World position of a Minkowski-difference vertex.
    pub fn point(&self, id: VertexId) -> Vec3 {
        self.point_a(id.0) - self.point_b(id.1)
    }

    pub fn vertex_count_product(&self) -> usize {
        self.a.vertices().len() * self.b.vertices().len()
    }

    fn contains(&self, id: VertexId) -> bool {
        id.0 < self.a.vertices().len() && id.1 < self.b.vertices().len()
    }
}

/// Up to four Minkowski-difference vertices, oldest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Simplex {
    ids: [VertexId; 4],
    len: usize,
}

impl Simplex {
    pub fn ids(&self) -> &[VertexId] {
        &self.ids[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    fn push(&mut self, id: VertexId) {
        self.ids[self.len] = id;
        self.len += 1;
    }

    fn remove(&mut self, slot: usize) {
        self.ids.copy_within(slot + 1..self.len, slot);
        self.len -= 1;
    }

    fn contains(&self, id: VertexId) -> bool {
        self.ids().contains(&id)
    }
}

/// Outcome of extending the simplex by one support point.
enum Advance {
    Added(VertexId),
    Separated,
}

fn advance(pair: &PolyhedronPair, simplex: &Simplex, direction: Vec3) -> Advance {
    let id = pair.support(direction);
    if pair.point(id).dot(direction) < 0.0 || simplex.contains(id) {
        Advance::Separated
    } else {
        Advance::Added(id)
    }
}

/// Tests whether the two polyhedra overlap.
///
/// `simplex` is both the warm start and the result: on `true` it holds a
/// tetrahedron enclosing the origin, ready for EPA.
pub fn intersect(pair: &PolyhedronPair, simplex: &mut Simplex) -> bool {
    if simplex.ids().iter().any(|&id| !pair.contains(id)) {
        simplex.clear();
    }

    let max_iterations = pair.vertex_count_product().max(16);
    // Slot most recently written in the tetrahedron stage.
    let mut newest = simplex.len().checked_sub(1);
    let mut skip_face: Option<usize> = None;

    for _ in 0..max_iterations {
        let points: Vec<Vec3> = simplex.ids().iter().map(|&id| pair.point(id)).collect();
        let direction = match points.len() {
            0 => {
                let d = pair.transform_a.position - pair.transform_b.position;
                let d = if d.length_squared() > f32::EPSILON { d } else { Vec3::X };
                simplex.push(pair.support(d));
                newest = Some(0);
                continue;
            }
            1 => -points[0],
            2 => {
                let ab = points[0] - points[1];
                let ao = -points[1];
                let d = ab.cross(ao).cross(ab);
                if d.length_squared() > f32::EPSILON * ab.length_squared() {
                    d
                } else {
                    any_perpendicular(ab)
                }
            }
            3 => {
                let e1 = points[1] - points[0];
                let e2 = points[2] - points[0];
                let n = e1.cross(e2);
                if n.length() <= 1e-6 * e1.length() * e2.length() {
                    drop_newest(simplex, &mut newest);
                    continue;
                }
                if n.dot(-points[0]) < 0.0 {
                    -n
                } else {
                    n
                }
            }
            _ => {
                let e1 = points[1] - points[0];
                let e2 = points[2] - points[0];
                let e3 = points[3] - points[0];
                let volume = e1.dot(e2.cross(e3));
                if volume.abs() <= 1e-6 * e1.length() * e2.length() * e3.length() {
                    skip_face = None;
                    drop_newest(simplex, &mut newest);
                    continue;
                }

                let Some((slot, normal)) = face_facing_origin(&points, skip_face) else {
                    return true;
                };
                match advance(pair, simplex, normal) {
                    Advance::Added(id) => {
                        simplex.ids[slot] = id;
                        newest = Some(slot);
                        skip_face = Some(slot);
                        continue;
                    }
                    Advance::Separated => return false,
                }
            }
        };

        match advance(pair, simplex, direction) {
            Advance::Added(id) => {
                simplex.push(id);
                newest = Some(simplex.len() - 1);
            }
            Advance::Separated => return false,
        }
    }

    debug!("GJK gave up after {max_iterations} iterations");
    false
}

fn drop_newest(simplex: &mut Simplex, newest: &mut Option<usize>) {
    let slot = newest.unwrap_or(simplex.len() - 1).min(simplex.len() - 1);
    simplex.remove(slot);
    *newest = simplex.len().checked_sub(1);
}

/// Finds a tetrahedron face with the origin strictly on its outer side.
///
/// Faces are identified by the slot of their opposite vertex. Returns that
/// slot and the face's outward normal.
fn face_facing_origin(points: &[Vec3], skip: Option<usize>) -> Option<(usize, Vec3)> {
    for opposite in 0..4 {
        if skip == Some(opposite) {
            continue;
        }
        let [i, j, k] = match opposite {
            0 => [1, 2, 3],
            1 => [0, 2, 3],
            2 => [0, 1, 3],
            _ => [0, 1, 2],
        };
        let mut normal = (points[j] - points[i]).cross(points[k] - points[i]);
        if normal.dot(points[opposite] - points[i]) > 0.0 {
            normal = -normal;
        }
        if normal.dot(-points[i]) > 0.0 {
            return Some((opposite, normal));
        }
    }
    None
}
