use std::collections::HashMap;

use crate::{
    collision::{detect_collision_with_simplex, Shape, Simplex},
    config::{SolverSettings, DEFAULT_GRAVITY},
    core::{
        constraints::{
            BendConstraint, ContactConstraint, ContactLambda, FaceConstraint, ShellMaterial,
            SpringConstraint,
        },
        particle::Particle,
        rigidbody::RigidBody,
    },
    dynamics::{
        bend, fem,
        integrator::Integrator,
        particle_collision::project_particle,
        solver::{project_contact, relative_normal_velocity, solve_contact_velocity},
        spring,
    },
    error::{check_particle_indices, PhysicsError, Result},
    utils::{
        allocator::{Arena, ShapeId},
        logging::{warn_if_step_budget_exceeded, ScopedTimer},
        Vector,
    },
};
use glam::Vec3;
use log::debug;

/// Central simulation container: owns every particle, body, shape and
/// constraint, and advances them with [`PhysicsWorld::timestep`].
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    pub particles: Vec<Particle>,
    pub bodies: Vec<RigidBody>,
    pub shapes: Arena<Shape>,
    pub spring_constraints: Vec<SpringConstraint>,
    pub face_constraints: Vec<FaceConstraint>,
    pub bend_constraints: Vec<BendConstraint>,
    /// Contacts found by the last step, rebuilt from scratch every step.
    pub contact_constraints: Vec<ContactConstraint>,
    pub gravity: Vec3,
    pub settings: SolverSettings,
    spring_lambdas: Vec<f32>,
    face_lambdas: Vec<Vector<6>>,
    bend_lambdas: Vec<f32>,
    contact_lambdas: Vec<ContactLambda>,
    simplex_cache: HashMap<(usize, usize), Simplex>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::with_settings(SolverSettings::default())
    }

    pub fn with_settings(settings: SolverSettings) -> Self {
        Self {
            particles: Vec::new(),
            bodies: Vec::new(),
            shapes: Arena::new(),
            spring_constraints: Vec::new(),
            face_constraints: Vec::new(),
            bend_constraints: Vec::new(),
            contact_constraints: Vec::new(),
            gravity: Vec3::from_slice(&DEFAULT_GRAVITY),
            settings,
            spring_lambdas: Vec::new(),
            face_lambdas: Vec::new(),
            bend_lambdas: Vec::new(),
            contact_lambdas: Vec::new(),
            simplex_cache: HashMap::new(),
        }
    }

    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        self.shapes.insert(shape)
    }

    /// Adds a body and returns its index.
    pub fn add_body(&mut self, body: RigidBody) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Adds a particle and returns its index.
    pub fn add_particle(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        self.particles.len() - 1
    }

    /// Adds a spring whose rest length is the current distance between `a` and `b`.
    pub fn add_spring(&mut self, a: usize, b: usize, compliance: f32) -> Result<usize> {
        let spring = SpringConstraint::new(&self.particles, a, b, compliance)?;
        self.spring_constraints.push(spring);
        Ok(self.spring_constraints.len() - 1)
    }

    /// Adds a membrane triangle at its current shape.
    pub fn add_face(&mut self, indices: [usize; 3], material: ShellMaterial) -> Result<usize> {
        let face = FaceConstraint::new(&self.particles, indices, material)?;
        self.face_constraints.push(face);
        Ok(self.face_constraints.len() - 1)
    }

    /// Adds a dihedral bend over the edge `indices[0]`–`indices[1]`.
    pub fn add_bend(&mut self, indices: [usize; 4], compliance: f32) -> Result<usize> {
        let bend = BendConstraint::new(&self.particles, indices, compliance)?;
        self.bend_constraints.push(bend);
        Ok(self.bend_constraints.len() - 1)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Multipliers accumulated by the last step, parallel to `contact_constraints`.
    pub fn contact_lambdas(&self) -> &[ContactLambda] {
        &self.contact_lambdas
    }

    /// Checks every constraint index and shape handle.
    ///
    /// [`PhysicsWorld::timestep`] assumes a world that validates; fields are
    /// public, so callers that edit them directly should call this first.
    pub fn validate(&self) -> Result<()> {
        let count = self.particles.len();
        for spring in &self.spring_constraints {
            check_particle_indices(&spring.particles, count)?;
        }
        for face in &self.face_constraints {
            check_particle_indices(&face.particles, count)?;
        }
        for bend in &self.bend_constraints {
            check_particle_indices(&bend.particles, count)?;
        }
        let body_count = self.bodies.len();
        for contact in &self.contact_constraints {
            if let Some(&index) = contact.bodies.iter().find(|&&index| index >= body_count) {
                return Err(PhysicsError::InvalidBodyIndex {
                    index,
                    count: body_count,
                });
            }
        }
        match self.bodies.iter().position(|body| !self.shapes.contains(body.shape)) {
            Some(body) => Err(PhysicsError::InvalidShape { body }),
            None => Ok(()),
        }
    }

    /// Advances the simulation by `dt` seconds with `iterations` solver passes.
    pub fn timestep(&mut self, dt: f32, iterations: u32) {
        if !(dt > 0.0) {
            debug!("Ignoring timestep with non-positive dt {dt}");
            return;
        }
        let step_timer = ScopedTimer::new("timestep");
        let integrator = Integrator::new(self.gravity, dt);

        {
            let _timer = ScopedTimer::new("predict");
            self.predict(&integrator);
        }
        {
            let _timer = ScopedTimer::new("collide");
            self.collide();
        }
        {
            let _timer = ScopedTimer::new("solve::positions");
            self.reset_multipliers();
            for _ in 0..iterations {
                self.solve_positions(dt);
            }
        }
        {
            let _timer = ScopedTimer::new("velocities::update");
            for particle in &mut self.particles {
                integrator.update_particle_velocity(particle);
            }
            for body in &mut self.bodies {
                integrator.update_body_velocity(body);
            }
        }
        {
            let _timer = ScopedTimer::new("solve::velocities");
            self.solve_velocities(dt);
        }

        warn_if_step_budget_exceeded(step_timer.elapsed(), dt * 1000.0);
    }

    fn predict(&mut self, integrator: &Integrator) {
        for particle in &mut self.particles {
            integrator.predict_particle(particle);
        }
        for body in &mut self.bodies {
            integrator.predict_body(body);
        }
    }

    fn collide(&mut self) {
        self.contact_constraints.clear();
        let count = self.bodies.len();
        self.simplex_cache.retain(|&(_, j), _| j < count);

        for i in 0..count {
            for j in i + 1..count {
                let (body_a, body_b) = (&self.bodies[i], &self.bodies[j]);
                if body_a.is_kinematic() && body_b.is_kinematic() {
                    continue;
                }
                let (Some(shape_a), Some(shape_b)) =
                    (self.shapes.get(body_a.shape), self.shapes.get(body_b.shape))
                else {
                    continue;
                };

                let mut scratch = Simplex::default();
                let simplex = if self.settings.warm_start_gjk {
                    self.simplex_cache.entry((i, j)).or_default()
                } else {
                    &mut scratch
                };
                let Some(contact) = detect_collision_with_simplex(
                    shape_a,
                    &body_a.transform,
                    shape_b,
                    &body_b.transform,
                    simplex,
                ) else {
                    continue;
                };

                let mut constraint = ContactConstraint {
                    bodies: [i, j],
                    contact,
                    pre_solve_normal_velocity: 0.0,
                };
                constraint.pre_solve_normal_velocity =
                    relative_normal_velocity(&constraint, &self.bodies);
                self.contact_constraints.push(constraint);
            }
        }
    }

    fn reset_multipliers(&mut self) {
        self.spring_lambdas.clear();
        self.spring_lambdas.resize(self.spring_constraints.len(), 0.0);
        self.face_lambdas.clear();
        self.face_lambdas.resize(self.face_constraints.len(), Vector::zeros());
        self.bend_lambdas.clear();
        self.bend_lambdas.resize(self.bend_constraints.len(), 0.0);
        self.contact_lambdas.clear();
        self.contact_lambdas.resize(self.contact_constraints.len(), ContactLambda::default());
        for face in &mut self.face_constraints {
            face.warm_start = Vector::zeros();
        }
    }

    fn solve_positions(&mut self, dt: f32) {
        for (constraint, lambda) in self.contact_constraints.iter().zip(&mut self.contact_lambdas) {
            project_contact(constraint, &mut self.bodies, lambda);
        }

        let margin = self.settings.particle_contact_margin;
        for body in self.bodies.iter().filter(|body| body.is_kinematic()) {
            let Some(shape) = self.shapes.get(body.shape) else {
                continue;
            };
            for particle in &mut self.particles {
                project_particle(particle, body, shape, margin);
            }
        }

        for (constraint, lambda) in self.spring_constraints.iter().zip(&mut self.spring_lambdas) {
            spring::project(constraint, &mut self.particles, lambda, dt);
        }
        let mode = self.settings.face_solve_mode;
        for (constraint, lambda) in self.face_constraints.iter_mut().zip(&mut self.face_lambdas) {
            fem::project(constraint, &mut self.particles, lambda, dt, mode);
        }
        for (constraint, lambda) in self.bend_constraints.iter().zip(&mut self.bend_lambdas) {
            bend::project(constraint, &mut self.particles, lambda, dt);
        }
    }

    fn solve_velocities(&mut self, dt: f32) {
        for (constraint, lambda) in self.contact_constraints.iter().zip(&self.contact_lambdas) {
            solve_contact_velocity(constraint, &mut self.bodies, lambda, self.gravity, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MassProperties, Transform};
    use approx::assert_abs_diff_eq;

    fn ground_and_ball(world: &mut PhysicsWorld, height: f32) -> usize {
        let plane = world.add_shape(Shape::plane(Vec3::Y));
        let sphere = world.add_shape(Shape::sphere(0.5));
        world.add_body(RigidBody::kinematic(plane, Transform::default()));
        world.add_body(RigidBody::dynamic(
            sphere,
            &MassProperties::for_sphere(0.5),
            1.0,
            Transform::from_position(Vec3::new(0.0, height, 0.0)),
        ))
    }

    #[test]
    fn resting_ball_gets_one_contact_per_step() {
        let mut world = PhysicsWorld::new();
        let ball = ground_and_ball(&mut world, 0.49);
        world.timestep(1.0 / 60.0, 10);
        assert_eq!(world.contact_constraints.len(), 1);
        assert_eq!(world.contact_lambdas().len(), 1);
        assert!(world.contact_lambdas()[0].normal != 0.0);
        assert!(world.bodies[ball].transform.position.y > 0.49);

        world.timestep(1.0 / 60.0, 10);
        assert_eq!(world.contact_constraints.len(), 1);
    }

    #[test]
    fn kinematic_pairs_are_skipped() {
        let mut world = PhysicsWorld::new();
        let sphere = world.add_shape(Shape::sphere(1.0));
        world.add_body(RigidBody::kinematic(sphere, Transform::default()));
        world.add_body(RigidBody::kinematic(sphere, Transform::from_position(Vec3::X)));
        world.timestep(1.0 / 60.0, 4);
        assert!(world.contact_constraints.is_empty());
    }

    #[test]
    fn rigid_spring_holds_rest_length() {
        let mut world = PhysicsWorld::new();
        let anchor = world.add_particle(Particle::pinned(Vec3::ZERO));
        let bob = world.add_particle(Particle::new(Vec3::new(1.0, 0.0, 0.0), 1.0));
        world.add_spring(anchor, bob, 0.0).expect("valid spring");
        for _ in 0..30 {
            world.timestep(1.0 / 60.0, 20);
        }
        let length = world.particles[bob].position.distance(world.particles[anchor].position);
        assert_abs_diff_eq!(length, 1.0, epsilon = 1e-3);
        assert!(world.particles[bob].position.y < 0.0);
        assert_eq!(world.particles[anchor].position, Vec3::ZERO);
    }

    #[test]
    fn validate_reports_broken_references() {
        let mut world = PhysicsWorld::new();
        world.add_particle(Particle::new(Vec3::ZERO, 1.0));
        world.add_particle(Particle::new(Vec3::X, 1.0));
        world.add_spring(0, 1, 0.0).expect("valid spring");
        assert!(world.validate().is_ok());

        world.spring_constraints[0].particles[1] = 4;
        assert_eq!(
            world.validate(),
            Err(PhysicsError::InvalidParticleIndex { index: 4, count: 2 })
        );

        world.spring_constraints.clear();
        let sphere = world.add_shape(Shape::sphere(1.0));
        world.add_body(RigidBody::kinematic(sphere, Transform::default()));
        world.shapes.remove(sphere);
        assert_eq!(world.validate(), Err(PhysicsError::InvalidShape { body: 0 }));
    }

    #[test]
    fn non_positive_dt_is_ignored() {
        let mut world = PhysicsWorld::new();
        world.add_particle(Particle::new(Vec3::ONE, 1.0));
        world.timestep(0.0, 10);
        assert_eq!(world.particles[0].position, Vec3::ONE);
    }
}
