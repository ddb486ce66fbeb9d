use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use xpbd_engine::*;

fn cuboid(half_extents: Vec3) -> ConvexPolyhedron {
    ConvexPolyhedron::cuboid(half_extents).expect("box hull").0
}

#[test]
fn separated_boxes_do_not_intersect() {
    let cube = cuboid(Vec3::splat(0.5));
    let tf_a = Transform::default();
    let tf_b = Transform::from_position(Vec3::new(1.2, 0.3, 0.0));
    let pair = PolyhedronPair::new(&cube, &tf_a, &cube, &tf_b);

    let mut simplex = Simplex::default();
    assert!(!intersect(&pair, &mut simplex));
    assert!(separating_axis(&cube, &tf_a, &cube, &tf_b).is_separated());
}

#[test]
fn identical_boxes_intersect() {
    let cube = cuboid(Vec3::ONE);
    let tf = Transform::default();
    let pair = PolyhedronPair::new(&cube, &tf, &cube, &tf);
    let mut simplex = Simplex::default();
    assert!(intersect(&pair, &mut simplex));
    assert_eq!(simplex.len(), 4);
}

#[test]
fn epa_finds_half_unit_overlap_along_x() {
    let cube = cuboid(Vec3::splat(0.5));
    let tf_a = Transform::default();
    let tf_b = Transform::from_position(Vec3::new(0.5, 0.0, 0.0));
    let pair = PolyhedronPair::new(&cube, &tf_a, &cube, &tf_b);

    let mut simplex = Simplex::default();
    assert!(intersect(&pair, &mut simplex));
    let result = penetration(&pair, &simplex).expect("epa result");
    assert_abs_diff_eq!(result.normal.x, 1.0, epsilon = 1e-3);
    assert_abs_diff_eq!(result.penetration_depth, 0.5, epsilon = 1e-3);
}

#[test]
fn detect_collision_mirrors_swapped_operands() {
    let plane = Shape::plane(Vec3::Y);
    let sphere = Shape::sphere(1.0);
    let ground = Transform::default();
    let ball = Transform::from_position(Vec3::new(0.0, 0.75, 0.0));

    let forward = detect_collision(&sphere, &ball, &plane, &ground).expect("touching");
    let backward = detect_collision(&plane, &ground, &sphere, &ball).expect("touching");

    assert_abs_diff_eq!(forward.normal.y, -1.0, epsilon = 1e-6);
    assert_eq!(backward, forward.swapped());
    assert_abs_diff_eq!(forward.penetration_depth(&ball, &ground), 0.25, epsilon = 1e-5);
}

#[test]
fn box_resting_on_plane_reports_lowest_vertex() {
    let plane = Shape::plane(Vec3::Y);
    let cube = Shape::ConvexPolyhedron(cuboid(Vec3::splat(0.5)));
    let ground = Transform::default();
    let tf = Transform::new(
        Vec3::new(0.0, 0.6, 0.0),
        Quat::from_rotation_z(std::f32::consts::FRAC_PI_4),
    );

    let contact = detect_collision(&cube, &tf, &plane, &ground).expect("corner below the plane");
    let expected_depth = 0.5 * std::f32::consts::SQRT_2 - 0.6;
    assert_abs_diff_eq!(contact.penetration_depth(&tf, &ground), expected_depth, epsilon = 1e-4);
}

#[test]
fn warm_started_simplex_is_reused_across_calls() {
    let cube = Shape::ConvexPolyhedron(cuboid(Vec3::splat(0.5)));
    let tf_a = Transform::default();
    let mut simplex = Simplex::default();
    for step in 0..5 {
        let tf_b = Transform::from_position(Vec3::new(0.6 + 0.01 * step as f32, 0.1, 0.0));
        let contact =
            collision::detect_collision_with_simplex(&cube, &tf_a, &cube, &tf_b, &mut simplex)
            .expect("still overlapping");
        let depth = 0.4 - 0.01 * step as f32;
        assert_abs_diff_eq!(contact.penetration_depth(&tf_a, &tf_b), depth, epsilon = 1e-3);
    }
}

fn rotation() -> impl Strategy<Value = Quat> {
    prop::array::uniform3(-std::f32::consts::PI..std::f32::consts::PI)
        .prop_map(|[x, y, z]| {
            Quat::from_rotation_x(x) * Quat::from_rotation_y(y) * Quat::from_rotation_z(z)
        })
}

fn placement(reach: f32) -> impl Strategy<Value = Transform> {
    (prop::array::uniform3(-reach..reach), rotation())
        .prop_map(|(p, q)| Transform::new(Vec3::from_array(p), q))
}

fn random_box() -> impl Strategy<Value = ConvexPolyhedron> {
    prop::array::uniform3(0.3f32..1.2).prop_map(|h| cuboid(Vec3::from_array(h)))
}

fn random_hull() -> impl Strategy<Value = ConvexPolyhedron> {
    prop::collection::vec(prop::array::uniform3(-1.0f32..1.0), 8..16).prop_filter_map(
        "degenerate cloud",
        |points| {
            let points: Vec<Vec3> = points.into_iter().map(Vec3::from_array).collect();
            ConvexPolyhedron::bake(&points).ok().map(|(hull, _)| hull)
        },
    )
}

/// GJK must agree with SAT on whether the pair overlaps, and for overlapping
/// pairs EPA must find the SAT depth along the SAT axis. Where two axes tie on
/// depth, EPA may pick either, so the EPA normal is accepted if the shapes
/// overlap by that same depth along it.
fn check_against_sat(
    a: &ConvexPolyhedron,
    tf_a: &Transform,
    b: &ConvexPolyhedron,
    tf_b: &Transform,
) -> Result<(), TestCaseError> {
    let sat = separating_axis(a, tf_a, b, tf_b);
    // Grazing contacts sit inside the tolerance of both queries.
    prop_assume!(sat.separation.abs() > 1e-3);

    let pair = PolyhedronPair::new(a, tf_a, b, tf_b);
    let mut simplex = Simplex::default();
    let overlapping = intersect(&pair, &mut simplex);
    prop_assert_eq!(overlapping, !sat.is_separated(), "sat separation {}", sat.separation);
    if !overlapping {
        return Ok(());
    }

    let epa = penetration(&pair, &simplex).expect("tetrahedron");
    let depth = sat.penetration_depth();
    prop_assert!(
        (epa.penetration_depth - depth).abs() < 1e-3,
        "epa {} vs sat {}",
        epa.penetration_depth,
        depth
    );
    let along_normal = a.project_onto_axis_with_transform(epa.normal, tf_a).max
        - b.project_onto_axis_with_transform(epa.normal, tf_b).min;
    prop_assert!(
        epa.normal.dot(sat.axis) > 1.0 - 1e-3 || (along_normal - depth).abs() < 1e-3,
        "epa normal {:?} vs sat axis {:?}",
        epa.normal,
        sat.axis
    );
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn sat_and_epa_agree_on_rotated_boxes(
        a in random_box(),
        b in random_box(),
        tf_a in placement(0.5),
        tf_b in placement(1.5),
    ) {
        check_against_sat(&a, &tf_a, &b, &tf_b)?;
    }

    #[test]
    fn sat_and_epa_agree_on_baked_hulls(
        a in random_hull(),
        b in random_box(),
        tf_a in placement(0.5),
        tf_b in placement(1.5),
    ) {
        check_against_sat(&a, &tf_a, &b, &tf_b)?;
    }
}
