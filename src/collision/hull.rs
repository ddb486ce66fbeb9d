//! Incremental 3D convex hull shared by shape baking and EPA.
//!
//! Faces are kept with consistent outward winding so horizon edges can be
//! found by looking for edges whose reverse is not owned by another visible
//! face.

use glam::Vec3;

/// Triangle of the hull with its outward plane `normal · x = distance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullFace {
    pub indices: [usize; 3],
    pub normal: Vec3,
    pub distance: f32,
}

impl HullFace {
    fn new(points: &[Vec3], indices: [usize; 3], interior: Vec3) -> Self {
        let [a, b, c] = indices.map(|i| points[i]);
        let cross = (b - a).cross(c - a);
        let length = cross.length();
        let (normal, distance) = if length > 0.0 {
            (cross / length, cross.dot(a) / length)
        } else {
            (Vec3::ZERO, 0.0)
        };
        let face = Self {
            indices,
            normal,
            distance,
        };
        if face.signed_distance(interior) > 0.0 {
            face.flipped()
        } else {
            face
        }
    }

    fn flipped(self) -> Self {
        let [a, b, c] = self.indices;
        Self {
            indices: [a, c, b],
            normal: -self.normal,
            distance: -self.distance,
        }
    }

    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    pub fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.indices;
        [(a, b), (b, c), (c, a)]
    }
}

#[derive(Debug, Clone)]
pub struct IncrementalHull {
    points: Vec<Vec3>,
    faces: Vec<HullFace>,
    interior: Vec3,
    epsilon: f32,
}

impl IncrementalHull {
    /// Starts a hull from a non-degenerate tetrahedron.
    ///
    /// `epsilon` is the distance a point must lie outside a face for that face
    /// to count as visible.
    pub fn from_tetrahedron(tetrahedron: [Vec3; 4], epsilon: f32) -> Self {
        let points = tetrahedron.to_vec();
        let interior = tetrahedron.iter().copied().sum::<Vec3>() * 0.25;
        let faces = [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]]
            .into_iter()
            .map(|indices| HullFace::new(&points, indices, interior))
            .collect();
        Self {
            points,
            faces,
            interior,
            epsilon,
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn faces(&self) -> &[HullFace] {
        &self.faces
    }

    /// Face whose plane is closest to the origin.
    pub fn nearest_face(&self) -> Option<&HullFace> {
        self.faces
            .iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Grows the hull to contain `point`.
    ///
    /// Returns the index of the new hull point, or `None` if the point was
    /// already inside and the hull is unchanged.
    pub fn insert(&mut self, point: Vec3) -> Option<usize> {
        let visible: Vec<usize> = self
            .faces
            .iter()
            .enumerate()
            .filter(|(_, face)| face.signed_distance(point) > self.epsilon)
            .map(|(i, _)| i)
            .collect();
        if visible.is_empty() {
            return None;
        }

        let mut horizon = Vec::new();
        for &fi in &visible {
            for (e0, e1) in self.faces[fi].edges() {
                let shared = visible
                    .iter()
                    .any(|&other| other != fi && self.faces[other].edges().contains(&(e1, e0)));
                if !shared {
                    horizon.push((e0, e1));
                }
            }
        }

        for &fi in visible.iter().rev() {
            self.faces.swap_remove(fi);
        }

        let index = self.points.len();
        self.points.push(point);
        for (e0, e1) in horizon {
            let face = HullFace::new(&self.points, [e0, e1, index], self.interior);
            self.faces.push(face);
        }
        Some(index)
    }
}

/// Picks four points spanning a volume: the farthest pair, the point farthest
/// from their line, then the point farthest from that plane.
///
/// Returns `None` when the cloud is coincident, collinear or coplanar within
/// `epsilon`.
pub fn seed_tetrahedron(points: &[Vec3], epsilon: f32) -> Option<[usize; 4]> {
    if points.len() < 4 {
        return None;
    }

    let (mut i0, mut i1, mut best) = (0, 0, 0.0);
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let d = points[i].distance_squared(points[j]);
            if d > best {
                (i0, i1, best) = (i, j, d);
            }
        }
    }
    if best.sqrt() <= epsilon {
        return None;
    }

    let line = (points[i1] - points[i0]).normalize();
    let (mut i2, mut best) = (0, 0.0);
    for (i, p) in points.iter().enumerate() {
        let d = line.cross(*p - points[i0]).length();
        if d > best {
            (i2, best) = (i, d);
        }
    }
    if best <= epsilon {
        return None;
    }

    let normal = (points[i1] - points[i0]).cross(points[i2] - points[i0]).normalize();
    let (mut i3, mut best) = (0, 0.0);
    for (i, p) in points.iter().enumerate() {
        let d = normal.dot(*p - points[i0]).abs();
        if d > best {
            (i3, best) = (i, d);
        }
    }
    if best <= epsilon {
        return None;
    }

    Some([i0, i1, i2, i3])
}
