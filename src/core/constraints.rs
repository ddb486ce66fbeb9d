//! Constraint records: rest data fixed at creation plus the indices they act on.

use glam::Vec3;

use super::particle::Particle;
use crate::{
    collision::Contact,
    config::GEOMETRY_EPSILON,
    dynamics::bend::dihedral_angle,
    error::{check_particle_indices, PhysicsError, Result},
    utils::{Matrix, Vector},
};

/// Distance constraint between two particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConstraint {
    pub particles: [usize; 2],
    pub rest_length: f32,
    /// Inverse stiffness; zero makes the spring rigid.
    pub compliance: f32,
}

impl SpringConstraint {
    /// Spring whose rest length is the current distance between the particles.
    pub fn new(particles: &[Particle], a: usize, b: usize, compliance: f32) -> Result<Self> {
        check_particle_indices(&[a, b], particles.len())?;
        Ok(Self {
            particles: [a, b],
            rest_length: particles[a].position.distance(particles[b].position),
            compliance,
        })
    }
}

/// Elastic material of a thin shell triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellMaterial {
    pub young_modulus: f32,
    pub poisson_ratio: f32,
    pub thickness: f32,
}

impl ShellMaterial {
    /// Isotropic stiffness relating the six Green-strain components
    /// `(xx, yy, zz, yz, xz, xy)` to stress.
    pub fn stiffness(&self) -> Result<Matrix<6, 6>> {
        let (e, nu) = (self.young_modulus, self.poisson_ratio);
        if !(e > 0.0) || !(self.thickness > 0.0) {
            return Err(PhysicsError::InvalidMaterial(format!(
                "Young's modulus {e} and thickness {} must be positive",
                self.thickness
            )));
        }
        if !(nu > -1.0 && nu < 0.5) {
            return Err(PhysicsError::InvalidMaterial(format!(
                "Poisson ratio {nu} outside (-1, 0.5)"
            )));
        }
        let lambda = e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu));
        let mu = e / (2.0 * (1.0 + nu));

        let mut k = Matrix::<6, 6>::zeros();
        for i in 0..3 {
            for j in 0..3 {
                k[(i, j)] = if i == j { lambda + 2.0 * mu } else { lambda };
            }
            k[(i + 3, i + 3)] = 4.0 * mu;
        }
        Ok(k)
    }
}

/// FEM membrane triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceConstraint {
    pub particles: [usize; 3],
    /// Inverse of the rest shape matrix in the triangle's own frame.
    pub inverse_rest: Matrix<3, 3>,
    /// `(K · area · thickness)⁻¹`.
    pub compliance: Matrix<6, 6>,
    /// Gauss-Seidel starting guess; persists across the iterations of a step.
    pub warm_start: Vector<6>,
}

impl FaceConstraint {
    pub fn new(
        particles: &[Particle],
        indices: [usize; 3],
        material: ShellMaterial,
    ) -> Result<Self> {
        check_particle_indices(&indices, particles.len())?;
        let [x0, x1, x2] = indices.map(|i| particles[i].position);
        let e1 = x1 - x0;
        let e2 = x2 - x0;
        let normal = e1.cross(e2);
        let area = 0.5 * normal.length();
        if area <= GEOMETRY_EPSILON * GEOMETRY_EPSILON || e1.length() <= GEOMETRY_EPSILON {
            return Err(PhysicsError::DegenerateConstraint(format!(
                "face {indices:?} has zero area"
            )));
        }

        let u = e1.normalize();
        let v = normal.normalize().cross(u);
        let rest = Matrix::from_cols3(
            Vec3::new(e1.length(), 0.0, 0.0),
            Vec3::new(e2.dot(u), e2.dot(v), 0.0),
            Vec3::Z,
        );
        let stiffness = material.stiffness()? * (area * material.thickness);

        Ok(Self {
            particles: indices,
            inverse_rest: rest.lu().invert(),
            compliance: stiffness.lu().invert(),
            warm_start: Vector::zeros(),
        })
    }
}

/// Dihedral angle constraint across the edge `particles[0]–particles[1]`
/// shared by triangles `(0, 1, 2)` and `(0, 1, 3)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BendConstraint {
    pub particles: [usize; 4],
    pub rest_angle: f32,
    pub compliance: f32,
}

impl BendConstraint {
    /// Constraint whose rest angle is the current dihedral angle.
    pub fn new(particles: &[Particle], indices: [usize; 4], compliance: f32) -> Result<Self> {
        check_particle_indices(&indices, particles.len())?;
        let [x0, x1, x2, x3] = indices.map(|i| particles[i].position);
        let rest_angle = dihedral_angle(x0, x1, x2, x3).ok_or_else(|| {
            PhysicsError::DegenerateConstraint(format!("bend {indices:?} has a degenerate wing"))
        })?;
        Ok(Self {
            particles: indices,
            rest_angle,
            compliance,
        })
    }
}

/// Contact between two bodies found in the current step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactConstraint {
    pub bodies: [usize; 2],
    pub contact: Contact,
    /// Relative normal velocity `n · (v_B − v_A)` before the position solve.
    pub pre_solve_normal_velocity: f32,
}

/// Multipliers accumulated for one contact during a step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContactLambda {
    pub normal: f32,
    pub tangent: f32,
}
