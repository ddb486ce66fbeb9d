use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};

/// Position and orientation of a rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Maps a body-space point into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Maps a world-space point into body space.
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.rotation.conjugate() * (world - self.position)
    }

    pub fn transform_vector(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    pub fn inverse_transform_vector(&self, world: Vec3) -> Vec3 {
        self.rotation.conjugate() * world
    }
}

/// Linear and angular velocity of a rigid body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

/// Density-independent mass data produced when a shape is baked.
///
/// Scale by a density with [`MassProperties::mass`] and
/// [`MassProperties::inertia`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub volume: f32,
    /// Centre of mass in the coordinates of the original point cloud.
    pub center_of_mass: Vec3,
    /// Inertia tensor about the centre of mass for a density of one.
    pub inertia_per_unit_density: Mat3,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self {
            volume: 1.0,
            center_of_mass: Vec3::ZERO,
            inertia_per_unit_density: Mat3::IDENTITY,
        }
    }
}

impl MassProperties {
    /// Solid sphere of the given radius centred on the origin.
    pub fn for_sphere(radius: f32) -> Self {
        let volume = 4.0 / 3.0 * std::f32::consts::PI * radius * radius * radius;
        Self {
            volume,
            center_of_mass: Vec3::ZERO,
            inertia_per_unit_density: Mat3::from_diagonal(Vec3::splat(
                0.4 * volume * radius * radius,
            )),
        }
    }

    pub fn mass(&self, density: f32) -> f32 {
        self.volume * density
    }

    pub fn inertia(&self, density: f32) -> Mat3 {
        self.inertia_per_unit_density * density
    }
}

/// Material coefficients that affect contact response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub static_friction: f32,
    pub dynamic_friction: f32,
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            static_friction: 0.5,
            dynamic_friction: 0.3,
            restitution: 0.1,
        }
    }
}

impl Material {
    pub fn new(static_friction: f32, dynamic_friction: f32, restitution: f32) -> Result<Self> {
        if !(static_friction >= 0.0 && dynamic_friction >= 0.0) {
            return Err(PhysicsError::InvalidMaterial(format!(
                "friction coefficients must be non-negative \
                 (static={static_friction}, dynamic={dynamic_friction})"
            )));
        }
        if !(0.0..=1.0).contains(&restitution) {
            return Err(PhysicsError::InvalidMaterial(format!(
                "restitution {restitution} outside [0, 1]"
            )));
        }
        Ok(Self {
            static_friction,
            dynamic_friction,
            restitution,
        })
    }

    pub fn rubber() -> Self {
        Self {
            static_friction: 1.2,
            dynamic_friction: 1.0,
            restitution: 0.8,
        }
    }

    pub fn steel() -> Self {
        Self {
            static_friction: 0.58,
            dynamic_friction: 0.44,
            restitution: 0.4,
        }
    }

    pub fn ice() -> Self {
        Self {
            static_friction: 0.05,
            dynamic_friction: 0.03,
            restitution: 0.05,
        }
    }

    /// Coefficients used for a contact between two materials: the smaller
    /// friction coefficients and the larger restitution.
    pub fn combine(a: &Self, b: &Self) -> MaterialPairProperties {
        MaterialPairProperties {
            static_friction: a.static_friction.min(b.static_friction),
            dynamic_friction: a.dynamic_friction.min(b.dynamic_friction),
            restitution: a.restitution.max(b.restitution),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialPairProperties {
    pub static_friction: f32,
    pub dynamic_friction: f32,
    pub restitution: f32,
}
