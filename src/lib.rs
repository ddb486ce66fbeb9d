//! XPBD Engine – position-based particle and rigid-body simulation for Rust.
//!
//! The crate pairs an extended position-based dynamics solver (springs, FEM
//! membrane triangles, dihedral bending, rigid contacts with friction and
//! restitution) with a narrow-phase collision layer built on GJK, EPA and SAT
//! over spheres, planes and convex polyhedra.
//!
//! Everything the solver touches lives in a [`PhysicsWorld`]; one call to
//! [`PhysicsWorld::timestep`] advances it.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod utils;
pub mod world;

pub use glam::{Mat3, Quat, Vec3};

pub use collision::{
    detect_collision, epa::penetration, gjk::intersect, separating_axis, Contact, ConvexPolyhedron,
    PolyhedronPair, SatResult, Shape, Simplex,
};
pub use config::{FaceSolveMode, SolverSettings};
pub use core::{
    BendConstraint, ClothBuilder, ContactConstraint, ContactLambda, FaceConstraint, MassProperties,
    Material, Particle, RigidBody, ShellMaterial, SpringConstraint, Transform, Velocity,
};
pub use dynamics::Integrator;
pub use error::PhysicsError;
pub use utils::allocator::{Arena, ShapeId};
pub use world::PhysicsWorld;
