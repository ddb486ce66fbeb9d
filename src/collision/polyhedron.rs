use glam::{Mat3, Vec3};

use crate::{
    collision::hull::{seed_tetrahedron, IncrementalHull},
    config::HULL_MERGE_COSINE,
    core::types::{MassProperties, Transform},
    error::{PhysicsError, Result},
    utils::outer,
};

/// Triangle of a baked polyhedron with its outward plane `normal · x = offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyFace {
    pub indices: [usize; 3],
    pub normal: Vec3,
    pub offset: f32,
}

/// Extent of a shape along an axis and the vertices that attain it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub min: f32,
    pub max: f32,
    pub argmin: usize,
    pub argmax: usize,
}

/// Convex hull collision proxy with its vertices centred on the centre of mass.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolyhedron {
    vertices: Vec<Vec3>,
    faces: Vec<PolyFace>,
    unique_face_normals: Vec<Vec3>,
    unique_edges: Vec<Vec3>,
}

impl ConvexPolyhedron {
    /// Builds the convex hull of `points` and integrates its mass properties.
    ///
    /// The returned polyhedron is re-centred so its centre of mass is the
    /// origin; [`MassProperties::center_of_mass`] reports where that centre
    /// lay in the input coordinates.
    pub fn bake(points: &[Vec3]) -> Result<(Self, MassProperties)> {
        if points.len() < 4 {
            return Err(PhysicsError::DegenerateHull(format!(
                "need at least 4 points, got {}",
                points.len()
            )));
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(PhysicsError::DegenerateHull("non-finite point".into()));
        }

        let extent = points.iter().fold(0.0f32, |acc, p| acc.max(p.abs().max_element()));
        let epsilon = extent.max(1.0) * 1e-6;
        let seed = seed_tetrahedron(points, epsilon)
            .ok_or_else(|| PhysicsError::DegenerateHull("points do not span a volume".into()))?;

        let mut hull = IncrementalHull::from_tetrahedron(seed.map(|i| points[i]), epsilon);
        for (i, p) in points.iter().enumerate() {
            if !seed.contains(&i) {
                hull.insert(*p);
            }
        }

        // Keep only the points referenced by the final faces.
        let mut remap = vec![usize::MAX; hull.points().len()];
        let mut vertices = Vec::new();
        let mut triangles = Vec::with_capacity(hull.faces().len());
        for face in hull.faces() {
            let indices = face.indices.map(|i| {
                if remap[i] == usize::MAX {
                    remap[i] = vertices.len();
                    vertices.push(hull.points()[i]);
                }
                remap[i]
            });
            triangles.push(indices);
        }

        let mass = integrate_mass_properties(&vertices, &triangles);
        if !(mass.volume > epsilon * epsilon * epsilon) {
            return Err(PhysicsError::DegenerateHull(format!("volume {} too small", mass.volume)));
        }

        for v in &mut vertices {
            *v -= mass.center_of_mass;
        }
        Ok((Self::from_triangles(vertices, &triangles), mass))
    }

    /// Box with the given half extents centred on the origin.
    pub fn cuboid(half_extents: Vec3) -> Result<(Self, MassProperties)> {
        let mut corners = Vec::with_capacity(8);
        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    corners.push(half_extents * Vec3::new(sx, sy, sz));
                }
            }
        }
        Self::bake(&corners)
    }

    fn from_triangles(vertices: Vec<Vec3>, triangles: &[[usize; 3]]) -> Self {
        let faces: Vec<PolyFace> = triangles
            .iter()
            .map(|&indices| {
                let [a, b, c] = indices.map(|i| vertices[i]);
                let normal = (b - a).cross(c - a).normalize_or_zero();
                PolyFace {
                    indices,
                    normal,
                    offset: normal.dot(a),
                }
            })
            .collect();

        let mut unique_face_normals: Vec<Vec3> = Vec::new();
        for face in &faces {
            if !unique_face_normals.iter().any(|n| n.dot(face.normal) > HULL_MERGE_COSINE) {
                unique_face_normals.push(face.normal);
            }
        }

        // Triangle edges shared by two coplanar faces are diagonals of a
        // polygon, not edges of the polyhedron.
        let mut unique_edges: Vec<Vec3> = Vec::new();
        for face in &faces {
            let [a, b, c] = face.indices;
            for (e0, e1) in [(a, b), (b, c), (c, a)] {
                let neighbour = faces
                    .iter()
                    .find(|other| {
                        let [x, y, z] = other.indices;
                        [(x, y), (y, z), (z, x)].contains(&(e1, e0))
                    });
                if neighbour.is_some_and(|n| n.normal.dot(face.normal) > HULL_MERGE_COSINE) {
                    continue;
                }
                let direction = (vertices[e1] - vertices[e0]).normalize_or_zero();
                if direction == Vec3::ZERO {
                    continue;
                }
                if !unique_edges.iter().any(|e| e.dot(direction).abs() > HULL_MERGE_COSINE) {
                    unique_edges.push(direction);
                }
            }
        }

        Self {
            vertices,
            faces,
            unique_face_normals,
            unique_edges,
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[PolyFace] {
        &self.faces
    }

    pub fn unique_face_normals(&self) -> &[Vec3] {
        &self.unique_face_normals
    }

    pub fn unique_edges(&self) -> &[Vec3] {
        &self.unique_edges
    }

    /// Index of the vertex farthest along `direction` (local space).
    pub fn support_index(&self, direction: Vec3) -> usize {
        let mut best = 0;
        let mut best_dot = f32::NEG_INFINITY;
        for (i, v) in self.vertices.iter().enumerate() {
            let d = v.dot(direction);
            if d > best_dot {
                best = i;
                best_dot = d;
            }
        }
        best
    }

    pub fn support_vertex(&self, direction: Vec3) -> Vec3 {
        self.vertices[self.support_index(direction)]
    }

    /// Centroid of the vertices lying within `tolerance` of the support
    /// plane along `direction`. A face or edge turned towards `direction`
    /// yields its centre rather than an arbitrary corner.
    pub fn support_centroid(&self, direction: Vec3, tolerance: f32) -> Vec3 {
        let direction = direction.normalize_or_zero();
        let reach = self.support_vertex(direction).dot(direction);
        let (sum, count) = self
            .vertices
            .iter()
            .filter(|v| v.dot(direction) >= reach - tolerance)
            .fold((Vec3::ZERO, 0u32), |(sum, count), v| (sum + *v, count + 1));
        sum / count.max(1) as f32
    }

    pub fn project_onto_axis(&self, axis: Vec3) -> Projection {
        project(self.vertices.iter().copied(), axis)
    }

    /// Projection of the polyhedron placed at `transform` onto a world axis.
    pub fn project_onto_axis_with_transform(
        &self,
        axis: Vec3,
        transform: &Transform,
    ) -> Projection {
        let local_axis = transform.inverse_transform_vector(axis);
        let offset = transform.position.dot(axis);
        let local = self.project_onto_axis(local_axis);
        Projection {
            min: local.min + offset,
            max: local.max + offset,
            ..local
        }
    }

    /// Largest signed distance from `point` to any face plane (local space).
    ///
    /// Negative values mean the point is inside; the returned face is the
    /// shallowest way out.
    pub fn max_face_distance(&self, point: Vec3) -> (f32, &PolyFace) {
        let mut best = &self.faces[0];
        let mut best_distance = f32::NEG_INFINITY;
        for face in &self.faces {
            let d = face.normal.dot(point) - face.offset;
            if d > best_distance {
                best = face;
                best_distance = d;
            }
        }
        (best_distance, best)
    }
}

fn project(points: impl Iterator<Item = Vec3>, axis: Vec3) -> Projection {
    let mut projection = Projection {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
        argmin: 0,
        argmax: 0,
    };
    for (i, p) in points.enumerate() {
        let d = p.dot(axis);
        if d < projection.min {
            projection.min = d;
            projection.argmin = i;
        }
        if d > projection.max {
            projection.max = d;
            projection.argmax = i;
        }
    }
    projection
}

/// Volume, centre of mass and inertia of a closed outward-wound triangle mesh,
/// summed over signed tetrahedra from the origin.
fn integrate_mass_properties(vertices: &[Vec3], triangles: &[[usize; 3]]) -> MassProperties {
    let mut volume = 0.0;
    let mut first_moment = Vec3::ZERO;
    let mut covariance = Mat3::ZERO;

    for &[ia, ib, ic] in triangles {
        let (a, b, c) = (vertices[ia], vertices[ib], vertices[ic]);
        let det = a.dot(b.cross(c));
        let sum = a + b + c;
        volume += det / 6.0;
        first_moment += sum * (det / 24.0);
        covariance += (outer(a, a) + outer(b, b) + outer(c, c) + outer(sum, sum)) * (det / 120.0);
    }

    let center_of_mass = if volume.abs() > f32::EPSILON {
        first_moment / volume
    } else {
        Vec3::ZERO
    };
    let central = covariance - outer(center_of_mass, center_of_mass) * volume;
    let trace = central.x_axis.x + central.y_axis.y + central.z_axis.z;

    MassProperties {
        volume,
        center_of_mass,
        inertia_per_unit_density: Mat3::from_diagonal(Vec3::splat(trace)) - central,
    }
}
