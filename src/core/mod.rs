//! Core simulation entities: particles, rigid bodies, constraint records and
//! the cloth builder that wires them together.

pub mod cloth;
pub mod constraints;
pub mod particle;
pub mod rigidbody;
pub mod types;

pub use cloth::ClothBuilder;
pub use constraints::{
    BendConstraint, ContactConstraint, ContactLambda, FaceConstraint, ShellMaterial,
    SpringConstraint,
};
pub use particle::Particle;
pub use rigidbody::RigidBody;
pub use types::{MassProperties, Material, MaterialPairProperties, Transform, Velocity};
