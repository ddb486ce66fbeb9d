//! Narrow-phase collision detection: shapes, convex hulls, GJK, EPA and SAT.

pub mod contact;
pub mod epa;
pub mod gjk;
pub mod hull;
pub mod narrowphase;
pub mod polyhedron;
pub mod sat;
pub mod shapes;

pub use contact::Contact;
pub use epa::EpaResult;
pub use gjk::{PolyhedronPair, Simplex, VertexId};
pub use narrowphase::{detect_collision, detect_collision_with_simplex};
pub use polyhedron::{ConvexPolyhedron, PolyFace, Projection};
pub use sat::{separating_axis, SatResult};
pub use shapes::Shape;
