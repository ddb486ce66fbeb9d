//! Global configuration constants and per-world solver settings.

use serde::{Deserialize, Serialize};

/// Default gravity vector applied in the physics world (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

/// Default integration timestep (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Number of solver iterations performed per step.
pub const DEFAULT_SOLVER_ITERATIONS: u32 = 10;

/// Minimum expansion of the EPA polytope required to keep iterating.
pub const EPA_TOLERANCE: f32 = 1e-6;

/// Cosine similarity above which face normals / edge directions are merged.
pub const HULL_MERGE_COSINE: f32 = 0.999;

/// Distance kept between particles and the surface of kinematic bodies.
pub const DEFAULT_PARTICLE_CONTACT_MARGIN: f32 = 0.0;

/// Lengths below this are treated as degenerate by the projectors.
pub const GEOMETRY_EPSILON: f32 = 1e-6;

/// How the 6×6 strain system of a face constraint is solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FaceSolveMode {
    /// One warm-started Gauss-Seidel sweep per iteration.
    #[default]
    GaussSeidel,
    /// Exact solve through an LU factorisation.
    Exact,
}

/// Tunables owned by a [`crate::PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub face_solve_mode: FaceSolveMode,
    pub particle_contact_margin: f32,
    /// Reuse the previous step's GJK simplex for each polyhedron pair.
    pub warm_start_gjk: bool,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            face_solve_mode: FaceSolveMode::default(),
            particle_contact_margin: DEFAULT_PARTICLE_CONTACT_MARGIN,
            warm_start_gjk: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: SolverSettings =
            serde_json::from_str(r#"{ "face_solve_mode": "Exact" }"#).expect("valid settings");
        assert_eq!(settings.face_solve_mode, FaceSolveMode::Exact);
        assert!(settings.warm_start_gjk);
        assert_eq!(settings.particle_contact_margin, DEFAULT_PARTICLE_CONTACT_MARGIN);
    }
}
