//! Simulation dynamics: integration and the XPBD constraint projectors.

pub mod bend;
pub mod fem;
pub mod friction;
pub mod integrator;
pub mod particle_collision;
pub mod solver;
pub mod spring;

pub use integrator::Integrator;
