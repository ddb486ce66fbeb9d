use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use glam::Vec3;

use super::{
    constraints::{BendConstraint, FaceConstraint, ShellMaterial, SpringConstraint},
    particle::Particle,
};
use crate::{
    error::{check_particle_indices, Result},
    world::PhysicsWorld,
};

/// Turns a triangle mesh into particles and the constraints that hold it
/// together.
///
/// Every unique edge can become a spring, every triangle a membrane face and
/// every edge shared by exactly two triangles a dihedral bend. Each kind is
/// opt-in.
#[derive(Debug, Clone)]
pub struct ClothBuilder {
    vertices: Vec<Vec3>,
    triangles: Vec<[usize; 3]>,
    particle_mass: f32,
    pinned: Vec<usize>,
    spring_compliance: Option<f32>,
    membrane: Option<ShellMaterial>,
    bend_compliance: Option<f32>,
}

impl ClothBuilder {
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            triangles,
            particle_mass: 1.0,
            pinned: Vec::new(),
            spring_compliance: None,
            membrane: None,
            bend_compliance: None,
        }
    }

    /// Regular sheet spanning `origin + s·u + t·v` for `s, t` in `[0, 1]`,
    /// with `resolution` quads per side. Vertex `(i, j)` has index
    /// `j·(resolution + 1) + i`.
    pub fn grid(origin: Vec3, u: Vec3, v: Vec3, resolution: usize) -> Self {
        let resolution = resolution.max(1);
        let width = resolution + 1;
        let step = 1.0 / resolution as f32;
        let mut vertices = Vec::with_capacity(width * width);
        for j in 0..width {
            for i in 0..width {
                vertices.push(origin + u * (i as f32 * step) + v * (j as f32 * step));
            }
        }
        let mut triangles = Vec::with_capacity(2 * resolution * resolution);
        for j in 0..resolution {
            for i in 0..resolution {
                let a = j * width + i;
                let b = a + 1;
                let c = a + width;
                let d = c + 1;
                triangles.push([a, b, c]);
                triangles.push([b, d, c]);
            }
        }
        Self::new(vertices, triangles)
    }

    /// Merges vertices that fall in the same `epsilon`-sized grid cell.
    pub fn weld_vertices(mut self, epsilon: f32) -> Self {
        if epsilon <= 0.0 || self.vertices.is_empty() {
            return self;
        }

        let inv = 1.0 / epsilon;
        let mut cells: HashMap<(i32, i32, i32), usize> = HashMap::new();
        let mut welded: Vec<Vec3> = Vec::new();
        let mut remap: Vec<usize> = Vec::with_capacity(self.vertices.len());

        for v in &self.vertices {
            let key = (
                (v.x * inv).round() as i32,
                (v.y * inv).round() as i32,
                (v.z * inv).round() as i32,
            );
            let index = *cells.entry(key).or_insert_with(|| {
                welded.push(*v);
                welded.len() - 1
            });
            remap.push(index);
        }

        for tri in &mut self.triangles {
            *tri = tri.map(|i| remap.get(i).copied().unwrap_or(i));
        }
        for pin in &mut self.pinned {
            *pin = remap.get(*pin).copied().unwrap_or(*pin);
        }
        self.vertices = welded;
        self
    }

    pub fn particle_mass(mut self, mass: f32) -> Self {
        self.particle_mass = mass;
        self
    }

    /// Makes the vertex at `index` immovable.
    pub fn pin(mut self, index: usize) -> Self {
        self.pinned.push(index);
        self
    }

    pub fn springs(mut self, compliance: f32) -> Self {
        self.spring_compliance = Some(compliance);
        self
    }

    pub fn membrane(mut self, material: ShellMaterial) -> Self {
        self.membrane = Some(material);
        self
    }

    pub fn bending(mut self, compliance: f32) -> Self {
        self.bend_compliance = Some(compliance);
        self
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Adds the cloth to `world` and returns the range of its particle indices.
    ///
    /// Nothing is added if any triangle or pin is out of range or a
    /// constraint has a degenerate rest shape.
    pub fn build(self, world: &mut PhysicsWorld) -> Result<Range<usize>> {
        let count = self.vertices.len();
        for tri in &self.triangles {
            check_particle_indices(tri, count)?;
        }
        check_particle_indices(&self.pinned, count)?;

        let particles: Vec<Particle> = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, &position)| {
                if self.pinned.contains(&i) {
                    Particle::pinned(position)
                } else {
                    Particle::new(position, self.particle_mass)
                }
            })
            .collect();

        // Constraints are built against the local particles, then shifted.
        let edges = edge_wings(&self.triangles);
        let mut springs = Vec::new();
        if let Some(compliance) = self.spring_compliance {
            for &(a, b) in edges.keys() {
                springs.push(SpringConstraint::new(&particles, a, b, compliance)?);
            }
        }
        let mut faces = Vec::new();
        if let Some(material) = self.membrane {
            for &tri in &self.triangles {
                faces.push(FaceConstraint::new(&particles, tri, material)?);
            }
        }
        let mut bends = Vec::new();
        if let Some(compliance) = self.bend_compliance {
            for (&(a, b), wings) in &edges {
                if let [left, right] = wings[..] {
                    bends.push(BendConstraint::new(&particles, [a, b, left, right], compliance)?);
                }
            }
        }

        let base = world.particles.len();
        world.particles.extend(particles);
        world.spring_constraints.extend(springs.into_iter().map(|mut spring| {
            spring.particles = spring.particles.map(|i| base + i);
            spring
        }));
        world.face_constraints.extend(faces.into_iter().map(|mut face| {
            face.particles = face.particles.map(|i| base + i);
            face
        }));
        world.bend_constraints.extend(bends.into_iter().map(|mut bend| {
            bend.particles = bend.particles.map(|i| base + i);
            bend
        }));
        Ok(base..base + count)
    }
}

/// Opposite vertices of the triangles adjacent to each undirected edge.
fn edge_wings(triangles: &[[usize; 3]]) -> BTreeMap<(usize, usize), Vec<usize>> {
    let mut edges: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
    for &[a, b, c] in triangles {
        for (e0, e1, opposite) in [(a, b, c), (b, c, a), (c, a, b)] {
            edges.entry((e0.min(e1), e0.max(e1))).or_default().push(opposite);
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhysicsError;

    #[test]
    fn grid_topology() {
        let builder = ClothBuilder::grid(Vec3::ZERO, Vec3::X, Vec3::Z, 2);
        assert_eq!(builder.vertices().len(), 9);
        assert_eq!(builder.triangles().len(), 8);
        let edges = edge_wings(builder.triangles());
        // 12 grid edges plus 4 diagonals; only interior edges have two wings.
        assert_eq!(edges.len(), 16);
        assert_eq!(edges.values().filter(|wings| wings.len() == 2).count(), 8);
    }

    #[test]
    fn build_adds_requested_constraints() {
        let mut world = PhysicsWorld::new();
        world.add_particle(Particle::new(Vec3::splat(9.0), 1.0));
        let range = ClothBuilder::grid(Vec3::ZERO, Vec3::X, Vec3::Z, 2)
            .pin(0)
            .springs(0.0)
            .bending(1e-3)
            .build(&mut world)
            .expect("valid cloth");

        assert_eq!(range, 1..10);
        assert!(world.particles[1].is_pinned());
        assert_eq!(world.spring_constraints.len(), 16);
        assert_eq!(world.bend_constraints.len(), 8);
        assert!(world.face_constraints.is_empty());
        assert!(world.validate().is_ok());
    }

    #[test]
    fn welding_merges_shared_corners() {
        let vertices = vec![
            Vec3::ZERO,
            Vec3::X,
            Vec3::Z,
            Vec3::X,
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::Z,
        ];
        let builder = ClothBuilder::new(vertices, vec![[0, 1, 2], [3, 4, 5]]).weld_vertices(1e-3);
        assert_eq!(builder.vertices().len(), 4);
        assert_eq!(builder.triangles()[1], [1, 3, 2]);
    }

    #[test]
    fn out_of_range_triangle_leaves_world_untouched() {
        let mut world = PhysicsWorld::new();
        let result = ClothBuilder::new(vec![Vec3::ZERO, Vec3::X, Vec3::Z], vec![[0, 1, 3]])
            .springs(0.0)
            .build(&mut world);
        assert_eq!(result, Err(PhysicsError::InvalidParticleIndex { index: 3, count: 3 }));
        assert!(world.particles.is_empty());
        assert!(world.spring_constraints.is_empty());
    }
}
