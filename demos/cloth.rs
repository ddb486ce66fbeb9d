use log::{info, LevelFilter};
use xpbd_engine::*;

fn main() -> Result<(), PhysicsError> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut world = PhysicsWorld::with_settings(SolverSettings {
        particle_contact_margin: 0.01,
        ..SolverSettings::default()
    });

    let sphere = world.add_shape(Shape::sphere(0.4));
    let centre = Transform::from_position(Vec3::new(0.0, 0.5, 0.0));
    world.add_body(RigidBody::kinematic(sphere, centre));

    let resolution = 20;
    let origin = Vec3::new(-0.75, 1.2, -0.75);
    let cloth = ClothBuilder::grid(origin, Vec3::X * 1.5, Vec3::Z * 1.5, resolution)
        .particle_mass(0.005)
        .springs(1e-7)
        .membrane(ShellMaterial {
            young_modulus: 5.0e4,
            poisson_ratio: 0.3,
            thickness: 0.001,
        })
        .bending(1e-2)
        .build(&mut world)?;
    info!(
        "cloth: {} particles, {} springs, {} faces, {} bends",
        cloth.len(),
        world.spring_constraints.len(),
        world.face_constraints.len(),
        world.bend_constraints.len()
    );

    for frame in 0..240 {
        world.timestep(config::DEFAULT_TIME_STEP, config::DEFAULT_SOLVER_ITERATIONS);
        if frame % 60 == 0 {
            let lowest = world.particles[cloth.clone()]
                .iter()
                .map(|p| p.position.y)
                .fold(f32::INFINITY, f32::min);
            info!("frame {frame}: lowest cloth point y = {lowest:.3}");
        }
    }

    let centre = cloth.start + (resolution / 2) * (resolution + 1) + resolution / 2;
    println!("Cloth centre rests at {:?}", world.particles[centre].position);
    Ok(())
}
