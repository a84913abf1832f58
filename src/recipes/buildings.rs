//! Base structures
//!
//! Buildings are captured at eight angles with index naming, from a wider camera.

use crate::capture::FilenameTemplate;
use crate::error::Result;
use crate::gfx::resources::MaterialDescriptor;
use crate::gfx::scene::{Assembly, Scene, SizeParams, Transform};

use super::{Category, Recipe};

const BUILDING_DISTANCE: f32 = 12.0;

pub fn recipes() -> Vec<Recipe> {
    let building = |name, label, build, subdir| {
        Recipe::new(name, label, Category::Building, build)
            .with_template(FilenameTemplate::Index)
            .with_camera_distance(BUILDING_DISTANCE)
            .in_subdir(subdir)
    };

    vec![
        building(
            "CommandCenter",
            "Command center",
            command_center as super::BuildFn,
            "buildings/command_center",
        ),
        building("Barracks", "Barracks", barracks, "buildings/barracks"),
        building("Factory", "Factory", factory, "buildings/factory"),
        building("PowerPlant", "Power plant", power_plant, "buildings/power_plant"),
        Recipe::new("SteampunkBase", "Steampunk mobile base", Category::Building, steampunk_base)
            .with_camera_distance(15.0)
            .in_subdir("buildings"),
    ]
}

fn painted(scene: &mut Scene, prefix: &str, color: [f32; 3]) -> MaterialDescriptor {
    scene.define_material(
        &format!("{prefix}_Material"),
        [color[0], color[1], color[2], 1.0],
        0.0,
        0.6,
    )
}

pub fn command_center(scene: &mut Scene) -> Result<Assembly> {
    let material = painted(scene, "CommandCenter", [0.8, 0.2, 0.2]);
    let mut building = Assembly::begin("CommandCenter");

    building.add("Main", SizeParams::cube(1.0), Transform::default().scaled(2.0, 2.0, 1.0));
    building.add(
        "Antenna",
        SizeParams::Cylinder { radius: 0.1, depth: 1.0, vertices: 6 },
        Transform::at(0.0, 0.0, 1.5),
    );
    building.add(
        "Dome",
        SizeParams::sphere(0.8),
        Transform::at(0.0, 0.0, 1.0).scaled(1.0, 1.0, 0.6),
    );

    building.bind_material(&material);
    Ok(building)
}

pub fn barracks(scene: &mut Scene) -> Result<Assembly> {
    let material = painted(scene, "Barracks", [0.2, 0.2, 0.8]);
    let mut building = Assembly::begin("Barracks");

    building.add("Main", SizeParams::cube(1.0), Transform::default().scaled(2.5, 1.5, 0.8));
    // Four-sided cone with equal radii: a square prism turned 45° about Z
    building.add(
        "Roof",
        SizeParams::Cone { radius1: 1.5, radius2: 1.5, depth: 2.5, vertices: 4 },
        Transform::at(0.0, 0.0, 0.8).rotated(0.0, 0.0, 45.0),
    );

    building.bind_material(&material);
    Ok(building)
}

pub fn factory(scene: &mut Scene) -> Result<Assembly> {
    let material = painted(scene, "Factory", [0.4, 0.4, 0.4]);
    let mut building = Assembly::begin("Factory");

    building.add("Main", SizeParams::cube(1.0), Transform::default().scaled(2.0, 3.0, 1.2));
    building.add(
        "Smokestack",
        SizeParams::Cylinder { radius: 0.3, depth: 1.5, vertices: 8 },
        Transform::at(1.0, 0.0, 1.6),
    );
    building.add("Roof", SizeParams::cube(1.0), Transform::at(0.0, 0.0, 1.7).scaled(2.2, 3.2, 0.1));

    building.bind_material(&material);
    Ok(building)
}

pub fn power_plant(scene: &mut Scene) -> Result<Assembly> {
    let material = painted(scene, "PowerPlant", [0.8, 0.8, 0.2]);
    let mut building = Assembly::begin("PowerPlant");

    building.add(
        "Main",
        SizeParams::Cylinder { radius: 1.5, depth: 1.0, vertices: 12 },
        Transform::default(),
    );
    for side in [-1, 1] {
        building.add_indexed(
            "CoolingTower",
            side,
            SizeParams::Cylinder { radius: 0.5, depth: 1.5, vertices: 8 },
            Transform::at(side as f32 * 0.8, 0.0, 1.0),
        );
    }

    building.bind_material(&material);
    Ok(building)
}

/// Tracked mobile base: platform, dome, chimney, four track pods and an antenna
pub fn steampunk_base(scene: &mut Scene) -> Result<Assembly> {
    let material =
        scene.define_material("SteampunkBase_Material", [0.75, 0.65, 0.5, 1.0], 0.7, 0.3);
    let mut base = Assembly::begin("SteampunkBase");

    base.add("Base", SizeParams::cube(1.0), Transform::at(0.0, 0.0, 0.25).scaled(4.0, 4.0, 0.5));
    base.add(
        "Dome",
        SizeParams::Sphere { radius: 2.0, segments: 16, rings: 8 },
        Transform::at(0.0, 0.0, 2.0).scaled(1.0, 1.0, 0.6),
    );
    base.add(
        "Chimney",
        SizeParams::Cylinder { radius: 0.4, depth: 2.0, vertices: 8 },
        Transform::at(1.5, 1.5, 2.0),
    );
    for (index, (x, y)) in [(-1.8, -1.8), (-1.8, 1.8), (1.8, -1.8), (1.8, 1.8)]
        .into_iter()
        .enumerate()
    {
        base.add_indexed(
            "Track",
            index,
            SizeParams::cube(1.0),
            Transform::at(x, y, 0.0).scaled(0.7, 0.7, 0.3),
        );
    }
    base.add(
        "Antenna",
        SizeParams::Cylinder { radius: 0.1, depth: 3.0, vertices: 6 },
        Transform::at(-1.0, 0.0, 3.0),
    );

    base.bind_material(&material);
    Ok(base)
}
