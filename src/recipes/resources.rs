//! Resource deposits and the worker units that harvest them
//!
//! Deposits scatter their pieces with a seeded generator and are captured from one angle.

use rand::Rng;

use crate::capture::AngleSet;
use crate::error::Result;
use crate::gfx::scene::{Assembly, Scene, SizeParams, Transform};

use super::{seeded_rng, Category, Recipe};

pub fn recipes() -> Vec<Recipe> {
    let deposit = |name, label, build| {
        Recipe::new(name, label, Category::Resource, build)
            .with_angles(AngleSet::Single)
            .in_subdir("resources")
    };

    vec![
        deposit("WoodDeposit", "Wood deposit", wood_deposit as super::BuildFn),
        deposit("StoneDeposit", "Stone deposit", stone_deposit),
        deposit("IronDeposit", "Iron deposit", iron_deposit),
        Recipe::new("Gatherer", "Gatherer", Category::Unit, gatherer).in_subdir("units"),
        Recipe::new("Engineer", "Engineer", Category::Unit, engineer).in_subdir("units"),
    ]
}

/// Stacked logs with a few twigs around the base
pub fn wood_deposit(scene: &mut Scene) -> Result<Assembly> {
    let material = scene.define_material("WoodDeposit_Material", [0.35, 0.2, 0.05, 1.0], 0.0, 0.8);
    let mut rng = seeded_rng("WoodDeposit");
    let mut deposit = Assembly::begin("WoodDeposit");

    for i in 0..5 {
        let x = rng.random_range(-0.2..0.2);
        let tilt = rng.random_range(-0.2_f32..0.2).to_degrees();
        let heading = rng.random_range(0.0..180.0);
        deposit.add_indexed(
            "Log",
            i,
            SizeParams::cylinder(0.2, 2.0),
            Transform::at(x, 0.0, 0.2 * i as f32).rotated(0.0, tilt, heading),
        );
    }

    for i in 0..3 {
        let angle = i as f32 * 120.0;
        let (sin, cos) = angle.to_radians().sin_cos();
        let rx = rng.random_range(0.0_f32..0.5).to_degrees();
        let ry = rng.random_range(0.0_f32..0.5).to_degrees();
        deposit.add_indexed(
            "Twig",
            i,
            SizeParams::cylinder(0.1, 1.0),
            Transform::at(0.8 * cos, 0.8 * sin, 0.1).rotated(rx, ry, angle),
        );
    }

    deposit.bind_material(&material);
    Ok(deposit)
}

/// A ring of low-poly boulders around a central one
pub fn stone_deposit(scene: &mut Scene) -> Result<Assembly> {
    let material = scene.define_material("StoneDeposit_Material", [0.4, 0.4, 0.4, 1.0], 0.0, 0.9);
    let mut rng = seeded_rng("StoneDeposit");
    let mut deposit = Assembly::begin("StoneDeposit");

    for i in 0..7 {
        let radius = 0.3 + rng.random_range(-0.1..0.1);
        let angle = (i as f32 * 360.0 / 7.0).to_radians();
        let ring = if i > 0 { 0.4 } else { 0.0 };
        let height = if i > 3 { 0.2 } else { 0.0 };
        let rotation = [
            rng.random_range(0.0..180.0),
            rng.random_range(0.0..180.0),
            rng.random_range(0.0..180.0),
        ];
        let scale = 0.8 + rng.random_range(0.0..0.4);
        deposit.add_indexed(
            "Rock",
            i,
            SizeParams::Sphere { radius, segments: 8, rings: 5 },
            Transform::at(ring * angle.cos(), ring * angle.sin(), height)
                .rotated(rotation[0], rotation[1], rotation[2])
                .scaled(scale, scale, scale),
        );
    }

    deposit.bind_material(&material);
    Ok(deposit)
}

/// Rusty slab with ore chunks on top
pub fn iron_deposit(scene: &mut Scene) -> Result<Assembly> {
    let material = scene.define_material("IronDeposit_Material", [0.2, 0.05, 0.05, 1.0], 0.8, 0.5);
    let mut rng = seeded_rng("IronDeposit");
    let mut deposit = Assembly::begin("IronDeposit");

    deposit.add("Base", SizeParams::cube(1.0), Transform::at(0.0, 0.0, 0.25).scaled(1.0, 1.0, 0.5));
    for i in 0..5 {
        let angle = (i as f32 * 72.0).to_radians();
        let rx = rng.random_range(0.0_f32..0.5).to_degrees();
        let ry = rng.random_range(0.0_f32..0.5).to_degrees();
        let rz = rng.random_range(0.0..90.0);
        let scale: [f32; 3] = std::array::from_fn(|_| 0.7 + rng.random_range(0.0..0.5));
        deposit.add_indexed(
            "Ore",
            i,
            SizeParams::cube(0.4),
            Transform::at(0.4 * angle.cos(), 0.4 * angle.sin(), 0.6)
                .rotated(rx, ry, rz)
                .scaled(scale[0], scale[1], scale[2]),
        );
    }

    deposit.bind_material(&material);
    Ok(deposit)
}

pub fn gatherer(scene: &mut Scene) -> Result<Assembly> {
    let material = scene.define_material("Gatherer_Material", [0.3, 0.25, 0.2, 1.0], 0.0, 0.7);
    let mut unit = Assembly::begin("Gatherer");

    unit.add("Torso", SizeParams::cylinder(0.3, 0.6), Transform::at(0.0, 0.0, 0.6));
    unit.add("Head", SizeParams::sphere(0.2), Transform::at(0.0, 0.0, 1.1));
    unit.add("Helmet", SizeParams::cylinder(0.22, 0.15), Transform::at(0.0, 0.0, 1.25));
    unit.add(
        "Lamp",
        SizeParams::cylinder(0.05, 0.1),
        Transform::at(0.0, 0.22, 1.25).rotated(90.0, 0.0, 0.0),
    );
    for side in [-1, 1] {
        let s = side as f32;
        unit.add_indexed("Leg", side, SizeParams::cylinder(0.1, 0.5), Transform::at(s * 0.2, 0.0, 0.3));
        unit.add_indexed(
            "Arm",
            side,
            SizeParams::cylinder(0.08, 0.4),
            Transform::at(s * 0.35, 0.0, 0.8).rotated(0.0, 90.0, 0.0),
        );
    }
    unit.add(
        "PickHandle",
        SizeParams::cylinder(0.05, 0.6),
        Transform::at(0.4, 0.3, 0.8).rotated(45.0, 0.0, 0.0),
    );
    unit.add(
        "PickHead",
        SizeParams::cone(0.1, 0.0, 0.2),
        Transform::at(0.4, 0.6, 0.9).rotated(0.0, 90.0, 0.0),
    );
    unit.add(
        "Backpack",
        SizeParams::cube(0.4),
        Transform::at(0.0, -0.25, 0.7).scaled(0.6, 0.3, 0.8),
    );
    for side in [-1, 1] {
        unit.add_indexed(
            "Strap",
            side,
            SizeParams::cube(0.1),
            Transform::at(side as f32 * 0.15, -0.15, 0.7).scaled(0.2, 2.0, 0.5),
        );
    }

    unit.bind_material(&material);
    Ok(unit)
}

pub fn engineer(scene: &mut Scene) -> Result<Assembly> {
    let material = scene.define_material("Engineer_Material", [0.2, 0.2, 0.3, 1.0], 0.0, 0.7);
    let mut unit = Assembly::begin("Engineer");

    unit.add("Torso", SizeParams::cylinder(0.35, 0.7), Transform::at(0.0, 0.0, 0.65));
    unit.add("Head", SizeParams::sphere(0.22), Transform::at(0.0, 0.0, 1.15));
    unit.add(
        "Cap",
        SizeParams::Cylinder { radius: 0.25, depth: 0.2, vertices: 8 },
        Transform::at(0.0, 0.0, 1.3),
    );
    unit.add(
        "Goggles",
        SizeParams::torus(0.1, 0.03),
        Transform::at(0.0, 0.15, 1.15).rotated(90.0, 0.0, 0.0),
    );
    for side in [-1, 1] {
        let s = side as f32;
        unit.add_indexed("Leg", side, SizeParams::cylinder(0.12, 0.6), Transform::at(s * 0.2, 0.0, 0.3));
        unit.add_indexed(
            "Arm",
            side,
            SizeParams::cylinder(0.1, 0.5),
            Transform::at(s * 0.4, 0.0, 0.85).rotated(0.0, 90.0, 0.0),
        );
    }
    unit.add("ToolBelt", SizeParams::cylinder(0.4, 0.1), Transform::at(0.0, 0.0, 0.5));
    for i in 0..4 {
        let angle = i as f32 * 90.0;
        let (sin, cos) = angle.to_radians().sin_cos();
        unit.add_indexed(
            "Tool",
            i,
            SizeParams::cube(0.1),
            Transform::at(0.3 * cos, 0.3 * sin, 0.5)
                .rotated(0.0, 0.0, angle)
                .scaled(0.5, 0.2, 1.0),
        );
    }
    unit.add("WrenchHandle", SizeParams::cylinder(0.05, 0.3), Transform::at(0.55, 0.1, 0.85));
    unit.add(
        "WrenchHead",
        SizeParams::Torus {
            major_radius: 0.1,
            minor_radius: 0.03,
            major_segments: 6,
            minor_segments: 12,
        },
        Transform::at(0.55, 0.3, 0.85),
    );
    unit.add(
        "Blueprint",
        SizeParams::cube(0.1),
        Transform::at(-0.55, 0.2, 0.85).scaled(0.3, 0.4, 0.01),
    );

    unit.bind_material(&material);
    Ok(unit)
}
