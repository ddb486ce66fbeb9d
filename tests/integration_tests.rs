use approx::assert_abs_diff_eq;
use xpbd_engine::*;

const DT: f32 = 1.0 / 60.0;

fn drop_ball(restitution: f32, drop_height: f32, radius: f32) -> (PhysicsWorld, usize) {
    let material = Material::new(0.5, 0.3, restitution).expect("valid material");
    let mut world = PhysicsWorld::new();
    let plane = world.add_shape(Shape::plane(Vec3::Y));
    let sphere = world.add_shape(Shape::sphere(radius));
    world.add_body(RigidBody::kinematic(plane, Transform::default()).with_material(material));
    let ball = world.add_body(
        RigidBody::dynamic(
            sphere,
            &MassProperties::for_sphere(radius),
            1000.0,
            Transform::from_position(Vec3::new(0.0, radius + drop_height, 0.0)),
        )
        .with_material(material),
    );
    world.validate().expect("consistent world");
    (world, ball)
}

#[test]
fn free_particle_follows_discrete_recurrence() {
    let mut world = PhysicsWorld::new();
    let start = Vec3::new(0.0, 10.0, 0.0);
    let v0 = Vec3::new(1.0, 2.0, 0.0);
    let index = world.add_particle(Particle::new(start, 1.0).with_velocity(v0));

    let steps = 20;
    for _ in 0..steps {
        world.timestep(DT, 5);
    }

    // v_n = v0 + n·g·dt, x_n = x0 + n·v0·dt + g·dt²·n(n+1)/2
    let n = steps as f32;
    let g = world.gravity;
    let expected_velocity = v0 + g * DT * n;
    let expected_position = start + v0 * DT * n + g * DT * DT * n * (n + 1.0) * 0.5;
    let particle = &world.particles[index];
    assert_abs_diff_eq!(particle.velocity.y, expected_velocity.y, epsilon = 1e-3);
    assert_abs_diff_eq!(particle.position.x, expected_position.x, epsilon = 1e-4);
    assert_abs_diff_eq!(particle.position.y, expected_position.y, epsilon = 1e-3);
}

#[test]
fn inelastic_ball_settles_without_bounce_or_penetration() {
    let radius = 0.1;
    let (mut world, ball) = drop_ball(0.0, 1.0, radius);

    let mut touched = false;
    for _ in 0..180 {
        world.timestep(DT, 10);
        let y = world.bodies[ball].transform.position.y;
        assert!(y > radius - 1e-3, "ball sank to {y}");
        if touched {
            assert!(y < radius + 1e-3, "ball bounced to {y}");
        }
        touched |= !world.contact_constraints.is_empty();
    }

    assert!(touched);
    let body = &world.bodies[ball];
    assert_abs_diff_eq!(body.transform.position.y, radius, epsilon = 1e-3);
    assert!(body.velocity.linear.length() < 0.2);
}

#[test]
fn elastic_ball_rebounds_to_drop_height() {
    let radius = 0.1;
    let drop_height = 1.0;
    let (mut world, ball) = drop_ball(1.0, drop_height, radius);

    let mut bounced = false;
    let mut apex = 0.0f32;
    for _ in 0..120 {
        world.timestep(DT, 10);
        let body = &world.bodies[ball];
        if !bounced && !world.contact_constraints.is_empty() {
            bounced = true;
            assert!(body.velocity.linear.y > 0.0);
        }
        if bounced {
            apex = apex.max(body.transform.position.y - radius);
        }
    }

    assert!(bounced);
    assert!(
        (apex - drop_height).abs() < 0.15 * drop_height,
        "rebound apex {apex} vs drop height {drop_height}"
    );
}

#[test]
fn sliding_ball_is_slowed_by_friction() {
    let mut world = PhysicsWorld::new();
    let plane = world.add_shape(Shape::plane(Vec3::Y));
    let sphere = world.add_shape(Shape::sphere(0.5));
    world.add_body(RigidBody::kinematic(plane, Transform::default()));
    let sliding = world.add_body(
        RigidBody::dynamic(
            sphere,
            &MassProperties::for_sphere(0.5),
            1.0,
            Transform::from_position(Vec3::new(0.0, 0.5, 0.0)),
        )
        .with_material(Material::new(0.4, 0.4, 0.0).expect("valid material"))
        .with_velocity(Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO),
    );

    for _ in 0..30 {
        world.timestep(DT, 10);
    }

    let body = &world.bodies[sliding];
    assert!(body.velocity.linear.x < 3.0, "friction did not act: {}", body.velocity.linear.x);
    assert!(body.velocity.linear.x > 0.0);
    // Friction at the contact point spins the ball forward about -z.
    assert!(body.velocity.angular.z < 0.0);
    assert!(body.transform.position.y > 0.49);
}

#[test]
fn box_resting_on_its_face_stays_still() {
    let mut world = PhysicsWorld::new();
    let (cube, props) = ConvexPolyhedron::cuboid(Vec3::splat(0.5)).expect("cube");
    let plane = world.add_shape(Shape::plane(Vec3::Y));
    let shape = world.add_shape(Shape::ConvexPolyhedron(cube));
    world.add_body(RigidBody::kinematic(plane, Transform::default()));
    let resting = world.add_body(RigidBody::dynamic(
        shape,
        &props,
        1000.0,
        Transform::from_position(Vec3::new(0.0, 0.5, 0.0)),
    ));

    for step in 0..300 {
        world.timestep(DT, 10);
        let body = &world.bodies[resting];
        assert!(
            body.velocity.angular.length() < 1e-4,
            "step {step}: box spins at {:?}",
            body.velocity.angular
        );
    }

    let body = &world.bodies[resting];
    assert!(body.transform.rotation.angle_between(Quat::IDENTITY) < 1e-3);
    assert_abs_diff_eq!(body.transform.position.x, 0.0, epsilon = 1e-4);
    assert_abs_diff_eq!(body.transform.position.z, 0.0, epsilon = 1e-4);
    assert_abs_diff_eq!(body.transform.position.y, 0.5, epsilon = 2e-3);
}
