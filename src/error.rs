//! Error types for set-up operations.
//!
//! The per-step path never fails: collision queries return `Option` and
//! numerical degeneracy is handled best-effort. Only building shapes and
//! constraints, or validating a world, can report a [`PhysicsError`].

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// The point cloud does not span a volume (too few, coplanar or coincident points).
    DegenerateHull(String),
    /// A constraint references a particle that does not exist.
    InvalidParticleIndex { index: usize, count: usize },
    /// A constraint references a body that does not exist.
    InvalidBodyIndex { index: usize, count: usize },
    /// A body references a shape handle that is not in the arena.
    InvalidShape { body: usize },
    /// Rest configuration of a constraint has no well-defined gradient.
    DegenerateConstraint(String),
    /// Material parameters outside their physical range.
    InvalidMaterial(String),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::DegenerateHull(msg) => write!(f, "Degenerate hull: {msg}"),
            Self::InvalidParticleIndex { index, count } => {
                write!(f, "Particle index {index} out of range (count={count})")
            }
            Self::InvalidBodyIndex { index, count } => {
                write!(f, "Body index {index} out of range (count={count})")
            }
            Self::InvalidShape { body } => write!(f, "Body {body} references a missing shape"),
            Self::DegenerateConstraint(msg) => write!(f, "Degenerate constraint: {msg}"),
            Self::InvalidMaterial(msg) => write!(f, "Invalid material: {msg}"),
        }
    }
}

impl std::error::Error for PhysicsError {}

/// Convenience alias for set-up results.
pub type Result<T> = std::result::Result<T, PhysicsError>;

/// Checks that every index refers to an element of a collection of `count` particles.
pub(crate) fn check_particle_indices(indices: &[usize], count: usize) -> Result<()> {
    match indices.iter().find(|&&index| index >= count) {
        Some(&index) => Err(PhysicsError::InvalidParticleIndex { index, count }),
        None => Ok(()),
    }
}
