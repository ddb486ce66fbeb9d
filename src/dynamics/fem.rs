//! Green-strain membrane projection for triangles (XPBD FEM).
//!
//! The deformation gradient uses the normal-augmented shape matrix
//! `[e1, e2, n̂]`, so the out-of-plane strain rows are identically zero and
//! only the in-plane rows move particles.

use glam::{Mat3, Vec3};

use crate::{
    config::{FaceSolveMode, GEOMETRY_EPSILON},
    core::{constraints::FaceConstraint, particle::Particle},
    utils::{gauss_seidel_step, outer, skew, Matrix, Vector},
};

/// Voigt index pairs of the packed strain: `(xx, yy, zz, yz, xz, xy)`.
const STRAIN_COMPONENTS: [(usize, usize); 6] = [(0, 0), (1, 1), (2, 2), (1, 2), (0, 2), (0, 1)];

/// Green strain `½(FᵀF − I)` packed into six components.
pub fn green_strain(f: &Matrix<3, 3>) -> Vector<6> {
    let ftf = f.transpose() * *f;
    let mut strain = Vector::<6>::zeros();
    for (row, &(i, j)) in STRAIN_COMPONENTS.iter().enumerate() {
        let delta = if i == j { 1.0 } else { 0.0 };
        strain[row] = 0.5 * (ftf[(i, j)] - delta);
    }
    strain
}

/// `∂E/∂vec(F)` with column-major `vec(F)[k + 3l] = F[k][l]`.
fn strain_derivative(f: &Matrix<3, 3>) -> Matrix<6, 9> {
    let mut out = Matrix::<6, 9>::zeros();
    for (row, &(i, j)) in STRAIN_COMPONENTS.iter().enumerate() {
        for k in 0..3 {
            out[(row, k + 3 * i)] += 0.5 * f[(k, j)];
            out[(row, k + 3 * j)] += 0.5 * f[(k, i)];
        }
    }
    out
}

/// `∂vec([e1, e2, n̂])/∂[x0, x1, x2]`.
fn shape_derivative(e1: Vec3, e2: Vec3, normal: Vec3) -> Matrix<9, 9> {
    let length = normal.length();
    let unit = normal / length;
    let projector = Mat3::IDENTITY - outer(unit, unit);
    let n1 = Matrix::from_mat3(projector * -skew(e2) * (1.0 / length));
    let n2 = Matrix::from_mat3(projector * skew(e1) * (1.0 / length));
    let identity = Matrix::<3, 3>::identity();

    let mut out = Matrix::<9, 9>::zeros();
    out.set_block(0, 0, &-identity);
    out.set_block(0, 3, &identity);
    out.set_block(3, 0, &-identity);
    out.set_block(3, 6, &identity);
    out.set_block(6, 0, &-(n1 + n2));
    out.set_block(6, 3, &n1);
    out.set_block(6, 6, &n2);
    out
}

/// Strain and its 6×9 Jacobian for the current particle positions.
pub fn strain_and_jacobian(
    face: &FaceConstraint,
    positions: [Vec3; 3],
) -> Option<(Vector<6>, Matrix<6, 9>)> {
    let [x0, x1, x2] = positions;
    let e1 = x1 - x0;
    let e2 = x2 - x0;
    let normal = e1.cross(e2);
    if normal.length() < GEOMETRY_EPSILON {
        return None;
    }

    let shape = Matrix::from_cols3(e1, e2, normal.normalize());
    let f = shape * face.inverse_rest;
    let vec_f_by_shape: Matrix<9, 9> =
        face.inverse_rest.transpose().kronecker(&Matrix::<3, 3>::identity());
    let jacobian = strain_derivative(&f) * vec_f_by_shape * shape_derivative(e1, e2, normal);
    Some((green_strain(&f), jacobian))
}

/// One XPBD projection of a membrane triangle.
///
/// `lambda` is the step's accumulated multiplier; `face.warm_start` seeds the
/// single Gauss-Seidel sweep and is overwritten with this iteration's update.
pub fn project(
    face: &mut FaceConstraint,
    particles: &mut [Particle],
    lambda: &mut Vector<6>,
    dt: f32,
    mode: FaceSolveMode,
) {
    let indices = face.particles;
    let positions = indices.map(|i| particles[i].position);
    let Some((strain, jacobian)) = strain_and_jacobian(face, positions) else {
        return;
    };

    let mut weighted_transpose = jacobian.transpose();
    for (vertex, &i) in indices.iter().enumerate() {
        let w = particles[i].inverse_mass;
        for row in 3 * vertex..3 * vertex + 3 {
            for col in 0..6 {
                weighted_transpose[(row, col)] *= w;
            }
        }
    }

    let alpha = face.compliance * (1.0 / (dt * dt));
    let system = jacobian.mul_symmetric(&weighted_transpose) + alpha;
    let rhs = -(strain + alpha * *lambda);

    let delta_lambda = match mode {
        FaceSolveMode::Exact => system.lu().solve(&rhs),
        FaceSolveMode::GaussSeidel => {
            let mut x = face.warm_start;
            gauss_seidel_step(&system, &rhs, &mut x);
            x
        }
    };
    if !delta_lambda.is_finite() {
        return;
    }
    face.warm_start = delta_lambda;

    let correction = weighted_transpose * delta_lambda;
    for (vertex, &i) in indices.iter().enumerate() {
        particles[i].position += correction.vec3_at(3 * vertex);
    }
    *lambda += delta_lambda;
}
