use log::{info, LevelFilter};
use xpbd_engine::*;

fn main() -> Result<(), PhysicsError> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut world = PhysicsWorld::new();

    let ground = world.add_shape(Shape::plane(Vec3::Y));
    world.add_body(
        RigidBody::kinematic(ground, Transform::default()).with_material(Material::steel()),
    );

    let ball_shape = world.add_shape(Shape::sphere(0.5));
    let ball = world.add_body(
        RigidBody::dynamic(
            ball_shape,
            &MassProperties::for_sphere(0.5),
            1.0,
            Transform::from_position(Vec3::new(0.0, 3.0, 0.0)),
        )
        .with_material(Material::rubber()),
    );

    let (cube, cube_props) = ConvexPolyhedron::cuboid(Vec3::splat(0.5))?;
    let cube_shape = world.add_shape(Shape::ConvexPolyhedron(cube));
    let cube = world.add_body(RigidBody::dynamic(
        cube_shape,
        &cube_props,
        1.0,
        Transform::new(Vec3::new(2.0, 2.0, 0.0), Quat::from_rotation_z(0.4)),
    ));

    world.validate()?;

    for frame in 0..180 {
        world.timestep(config::DEFAULT_TIME_STEP, config::DEFAULT_SOLVER_ITERATIONS);
        if frame % 30 == 0 {
            info!(
                "frame {frame}: ball y = {:.3}, box y = {:.3}, contacts = {}",
                world.bodies[ball].transform.position.y,
                world.bodies[cube].transform.position.y,
                world.contact_constraints.len()
            );
        }
    }

    println!(
        "Ball came to {:?}, box to {:?} after 3 seconds",
        world.bodies[ball].transform.position,
        world.bodies[cube].transform.position
    );
    Ok(())
}
