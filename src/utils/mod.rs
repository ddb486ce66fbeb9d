//! Utility helpers: the fixed-size linear-algebra kernel, math extensions,
//! the shape arena, and logging.

pub mod allocator;
pub mod logging;
pub mod lu;
pub mod math;
pub mod matrix;

pub use allocator::{get2_mut, Arena, ShapeId};
pub use lu::{gauss_seidel_step, Lu};
pub use math::*;
pub use matrix::{Matrix, Vector};
