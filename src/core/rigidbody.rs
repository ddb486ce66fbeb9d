use super::types::{MassProperties, Material, Transform, Velocity};
use crate::utils::{integrate_rotation, world_inverse_inertia, ShapeId};
use glam::{Mat3, Vec3};

/// Rigid body state and the properties the solver needs.
///
/// The transform's position is the centre of mass. A body with
/// `inverse_mass == 0` is kinematic: it ignores gravity and contacts but still
/// moves with its own velocity.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub inverse_mass: f32,
    /// Inverse inertia tensor in body space.
    pub inverse_inertia: Mat3,
    pub material: Material,
    pub transform: Transform,
    pub velocity: Velocity,
    pub previous_transform: Transform,
    pub previous_velocity: Velocity,
    pub shape: ShapeId,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            inverse_mass: 1.0,
            inverse_inertia: Mat3::IDENTITY,
            material: Material::default(),
            transform: Transform::default(),
            velocity: Velocity::default(),
            previous_transform: Transform::default(),
            previous_velocity: Velocity::default(),
            shape: ShapeId::default(),
        }
    }
}

impl RigidBody {
    /// Dynamic body whose mass and inertia come from baked mass properties.
    pub fn dynamic(
        shape: ShapeId,
        mass_properties: &MassProperties,
        density: f32,
        transform: Transform,
    ) -> Self {
        let mut body = Self {
            shape,
            transform,
            previous_transform: transform,
            ..Self::default()
        };
        body.set_mass_properties(mass_properties, density);
        body
    }

    /// Body with infinite mass driven only by its own velocity.
    pub fn kinematic(shape: ShapeId, transform: Transform) -> Self {
        Self {
            inverse_mass: 0.0,
            inverse_inertia: Mat3::ZERO,
            shape,
            transform,
            previous_transform: transform,
            ..Self::default()
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_velocity(mut self, linear: Vec3, angular: Vec3) -> Self {
        self.velocity = Velocity { linear, angular };
        self
    }

    pub fn set_mass_properties(&mut self, props: &MassProperties, density: f32) {
        let mass = props.mass(density);
        self.inverse_mass = if mass.abs() < f32::EPSILON { 0.0 } else { mass.recip() };
        let inertia = props.inertia(density);
        let singular = inertia.determinant().abs() < f32::EPSILON;
        self.inverse_inertia = if self.inverse_mass == 0.0 || singular {
            Mat3::ZERO
        } else {
            inertia.inverse()
        };
    }

    pub fn is_kinematic(&self) -> bool {
        self.inverse_mass == 0.0
    }

    pub fn world_inverse_inertia(&self) -> Mat3 {
        world_inverse_inertia(self.inverse_inertia, self.transform.rotation)
    }

    /// Generalised inverse mass `1/m + (r×n)ᵀ I⁻¹ (r×n)` for a unit
    /// direction `n` applied at world-space offset `r` from the centre of mass.
    pub fn generalized_inverse_mass(&self, r: Vec3, n: Vec3) -> f32 {
        if self.is_kinematic() {
            return 0.0;
        }
        let rn = r.cross(n);
        self.inverse_mass + rn.dot(self.world_inverse_inertia() * rn)
    }

    /// Applies a positional impulse `p` at world-space offset `r`.
    pub fn apply_position_impulse(&mut self, p: Vec3, r: Vec3) {
        if self.is_kinematic() {
            return;
        }
        let rotation_delta = self.world_inverse_inertia() * r.cross(p);
        self.transform.position += p * self.inverse_mass;
        self.transform.rotation = integrate_rotation(self.transform.rotation, rotation_delta);
    }

    /// Applies a velocity impulse `p` at world-space offset `r`.
    pub fn apply_velocity_impulse(&mut self, p: Vec3, r: Vec3) {
        if self.is_kinematic() {
            return;
        }
        self.velocity.linear += p * self.inverse_mass;
        self.velocity.angular += self.world_inverse_inertia() * r.cross(p);
    }

    /// Velocity of the material point at world-space offset `r`.
    pub fn velocity_at(&self, r: Vec3) -> Vec3 {
        self.velocity.linear + self.velocity.angular.cross(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn kinematic_body_ignores_impulses() {
        let mut body = RigidBody::kinematic(ShapeId::default(), Transform::default());
        body.apply_position_impulse(Vec3::X, Vec3::Y);
        body.apply_velocity_impulse(Vec3::X, Vec3::Y);
        assert_eq!(body.transform.position, Vec3::ZERO);
        assert_eq!(body.velocity.linear, Vec3::ZERO);
        assert_eq!(body.generalized_inverse_mass(Vec3::Y, Vec3::X), 0.0);
    }

    #[test]
    fn off_centre_impulse_adds_spin() {
        let props = MassProperties::for_sphere(0.5);
        let mut body = RigidBody::dynamic(ShapeId::default(), &props, 1.0, Transform::default());
        let w_centre = body.generalized_inverse_mass(Vec3::ZERO, Vec3::X);
        let w_edge = body.generalized_inverse_mass(Vec3::Y * 0.5, Vec3::X);
        assert_abs_diff_eq!(w_centre, body.inverse_mass, epsilon = 1e-6);
        assert!(w_edge > w_centre);

        body.apply_velocity_impulse(Vec3::X, Vec3::Y * 0.5);
        assert!(body.velocity.angular.z < 0.0);
    }
}
