//! Assembling primitives into composite entities

use sprite_forge::gfx::scene::create_part;
use sprite_forge::prelude::*;

#[test]
fn single_part_of_every_kind_keeps_its_bounds() {
    for kind in PrimitiveKind::ALL {
        let transform = Transform::at(1.0, -2.0, 0.5)
            .rotated(30.0, 0.0, 60.0)
            .scaled(1.5, 1.0, 0.5);
        let part = create_part(kind, SizeParams::default_for(kind), transform, "Probe_Part").unwrap();
        let expected = part.world_bounds().unwrap();

        let mut assembly = Assembly::begin("Probe");
        assembly.add_part(part).unwrap();
        let entity = assembly.finish().unwrap();

        assert_eq!(entity.materials().len(), 1, "{kind}");
        assert!(entity.bounds().unwrap().approx_eq(&expected, 1e-4), "{kind}");
    }
}

#[test]
fn any_number_of_parts_merges_into_one_entity() {
    for count in 1..=5 {
        let mut scene = Scene::new();
        let mut assembly = Assembly::begin("Tower");
        for i in 0..count {
            assembly.add_indexed("Floor", i, SizeParams::cube(1.0), Transform::at(0.0, 0.0, i as f32));
        }
        let expected_triangles: usize = assembly
            .parts()
            .iter()
            .map(|p| p.world_geometry().triangle_count())
            .sum();

        let entity = scene.finish(assembly).unwrap();
        assert_eq!(entity.name(), "Tower");
        assert_eq!(entity.mesh().triangle_count(), expected_triangles);
        assert_eq!(scene.len(), 1);
    }
}

#[test]
fn tank_parts_merge_under_the_prefix() {
    let mut scene = Scene::new();
    let mut tank = Assembly::begin("Tank");
    tank.create_part(
        PrimitiveKind::Box,
        SizeParams::cube(1.0),
        Transform::default().scaled(1.5, 2.0, 0.6),
        "Tank_Body",
    )
    .unwrap();
    tank.create_part(
        PrimitiveKind::Box,
        SizeParams::cube(0.5),
        Transform::at(0.8, 0.0, 0.1),
        "Tank_Track_1",
    )
    .unwrap();

    scene.finish(tank).unwrap();

    assert_eq!(scene.names(), ["Tank"]);
    assert!(scene.entity("Tank_Body").is_none());
}

#[test]
fn empty_assembly_is_rejected() {
    let mut scene = Scene::new();
    let err = scene.finish(Assembly::begin("Ghost")).unwrap_err();
    assert!(matches!(err, ForgeError::EmptyAssembly { ref prefix } if prefix == "Ghost"));
    assert!(scene.is_empty());
}

#[test]
fn foreign_parts_are_rejected() {
    let mut tank = Assembly::begin("Tank");
    let err = tank
        .create_part(PrimitiveKind::Box, SizeParams::cube(1.0), Transform::default(), "Jeep_Body")
        .unwrap_err();
    assert!(matches!(err, ForgeError::PartOutsideAssembly { .. }));
    assert!(tank.is_empty());
}

#[test]
fn unknown_kind_names_fail_to_parse() {
    let err = "pyramid".parse::<PrimitiveKind>().unwrap_err();
    assert!(matches!(err, ForgeError::InvalidPrimitiveKind(ref name) if name == "pyramid"));
    assert_eq!("uv_sphere".parse::<PrimitiveKind>().unwrap(), PrimitiveKind::Sphere);
}

#[test]
fn material_binding_replaces_the_slot() {
    let mut scene = Scene::new();
    let red = scene.define_material("Red", [1.0, 0.0, 0.0, 1.0], 0.0, 0.5);
    let blue = scene.define_material("Blue", [0.0, 0.0, 1.0, 1.0], 0.0, 0.5);

    let mut assembly = Assembly::begin("Flag");
    assembly.add("Cloth", SizeParams::plane(1.0), Transform::default());
    assembly.bind_material(&red).bind_material(&blue);
    let entity = scene.finish(assembly).unwrap();

    assert_eq!(entity.materials(), [blue]);
}
