//! Ground vehicles and aircraft

use rand::Rng;

use crate::capture::FilenameTemplate;
use crate::error::Result;
use crate::gfx::scene::{Assembly, Scene, SizeParams, Transform};

use super::{seeded_rng, Category, Recipe};

/// Large tanks are built at twice the usual size
const LARGE_TANK_SCALE: f32 = 2.0;

pub fn recipes() -> Vec<Recipe> {
    vec![
        Recipe::new("SimpleTank", "Simple tank", Category::Unit, simple_tank)
            .with_camera_distance(8.0)
            .in_subdir("units"),
        Recipe::new("AATank", "Anti-air tank", Category::Unit, aa_tank).in_subdir("units"),
        Recipe::new("LargeTank", "Very large tank", Category::Unit, large_tank)
            .with_camera_distance(15.0)
            .in_subdir("units"),
        Recipe::new("LandTank", "Tank", Category::Unit, land_tank)
            .with_template(FilenameTemplate::Index)
            .in_subdir("units/tank"),
        Recipe::new("Artillery", "Artillery", Category::Unit, artillery)
            .with_template(FilenameTemplate::Index)
            .in_subdir("units/artillery"),
        Recipe::new("Harvester", "Harvester", Category::Unit, harvester)
            .with_template(FilenameTemplate::Index)
            .in_subdir("units/harvester"),
        Recipe::new("Fighter", "Fighter", Category::Aircraft, fighter)
            .with_template(FilenameTemplate::Index)
            .with_camera_distance(8.0)
            .in_subdir("air_units/fighter"),
        Recipe::new("Bomber", "Bomber", Category::Aircraft, bomber)
            .with_template(FilenameTemplate::Index)
            .with_camera_distance(8.0)
            .in_subdir("air_units/bomber"),
        Recipe::new("LargeAircraft", "Large aircraft", Category::Aircraft, large_aircraft)
            .with_template(FilenameTemplate::Index)
            .with_camera_distance(8.0)
            .in_subdir("air_units/large_aircraft"),
    ]
}

/// Body, turret, cannon and two tracks in a light blue
pub fn simple_tank(scene: &mut Scene) -> Result<Assembly> {
    let material = scene.define_material("SimpleTank_Material", [0.2, 0.6, 0.8, 1.0], 0.0, 0.5);
    let mut tank = Assembly::begin("SimpleTank");

    tank.add("Body", SizeParams::cube(1.0), Transform::at(0.0, 0.0, 0.3).scaled(1.5, 2.0, 0.6));
    tank.add(
        "Turret",
        SizeParams::Cylinder { radius: 0.5, depth: 0.4, vertices: 12 },
        Transform::at(0.0, 0.0, 0.7),
    );
    tank.add(
        "Cannon",
        SizeParams::Cylinder { radius: 0.1, depth: 1.0, vertices: 8 },
        Transform::at(0.0, 0.7, 0.7).rotated(90.0, 0.0, 0.0),
    );
    for side in [-1, 1] {
        tank.add_indexed(
            "Track",
            side,
            SizeParams::cube(0.5),
            Transform::at(side as f32 * 0.8, 0.0, 0.1).scaled(1.8, 0.3, 0.2),
        );
    }

    tank.bind_material(&material);
    Ok(tank)
}

/// Tank hull with twin barrels raised toward the sky, a gun mount and a flattened radar dish
pub fn aa_tank(scene: &mut Scene) -> Result<Assembly> {
    let material = scene.define_material("AATank_Material", [0.15, 0.15, 0.2, 1.0], 0.0, 0.5);
    let mut tank = Assembly::begin("AATank");

    tank.add("Body", SizeParams::cube(1.5), Transform::at(0.0, 0.0, 0.3).scaled(1.5, 2.0, 0.6));
    tank.add("Turret", SizeParams::cylinder(0.6, 0.3), Transform::at(0.0, 0.0, 0.8));
    for side in [-1, 1] {
        tank.add_indexed(
            "Barrel",
            side,
            SizeParams::cylinder(0.08, 1.0),
            Transform::at(side as f32 * 0.2, 0.0, 1.3).rotated(0.0, 30.0, 0.0),
        );
    }
    tank.add("Mount", SizeParams::cylinder(0.3, 0.2), Transform::at(0.0, 0.0, 1.0));
    for side in [-1, 1] {
        tank.add_indexed(
            "Track",
            side,
            SizeParams::cube(0.5),
            Transform::at(side as f32 * 0.8, 0.0, 0.1).scaled(1.8, 0.3, 0.2),
        );
    }
    tank.add(
        "FrontArmor",
        SizeParams::cube(0.4),
        Transform::at(0.0, 1.1, 0.3).rotated(30.0, 0.0, 0.0).scaled(1.4, 0.2, 0.5),
    );
    tank.add(
        "Radar",
        SizeParams::Sphere { radius: 0.3, segments: 8, rings: 8 },
        Transform::at(0.0, -0.6, 1.1).scaled(1.0, 1.0, 0.2),
    );
    for i in 0..2 {
        tank.add_indexed(
            "Pipe",
            i,
            SizeParams::cylinder(0.05, 0.3),
            Transform::at(0.3 * (i * 2 - 1) as f32, -0.4, 0.8),
        );
    }

    tank.bind_material(&material);
    Ok(tank)
}

/// Double-size tank with twin cannons, side skirts, secondary turrets and smokestacks
pub fn large_tank(scene: &mut Scene) -> Result<Assembly> {
    let k = LARGE_TANK_SCALE;
    let material = scene.define_material("LargeTank_Material", [0.1, 0.1, 0.1, 1.0], 0.6, 0.4);
    let mut rng = seeded_rng("LargeTank");
    let mut tank = Assembly::begin("LargeTank");

    tank.add("Body", SizeParams::cube(1.5 * k), Transform::at(0.0, 0.0, 0.3 * k).scaled(1.0, 1.3, 0.4));
    tank.add("Turret", SizeParams::cylinder(0.5 * k, 0.4 * k), Transform::at(0.0, 0.0, 0.8 * k));
    for side in [-0.3_f32, 0.3] {
        tank.add_indexed(
            "Cannon",
            side,
            SizeParams::cylinder(0.1 * k, 1.5 * k),
            Transform::at(side * k, 0.8 * k, 0.8 * k).rotated(90.0, 0.0, 0.0),
        );
    }
    for side in [-1, 1] {
        tank.add_indexed(
            "Track",
            side,
            SizeParams::cube(0.5 * k),
            Transform::at(side as f32 * 0.8 * k, 0.0, 0.1 * k).scaled(2.0, 0.3, 0.2),
        );
    }
    tank.add(
        "FrontArmor",
        SizeParams::cube(0.4 * k),
        Transform::at(0.0, 1.1 * k, 0.3 * k).rotated(30.0, 0.0, 0.0).scaled(1.4, 0.2, 0.5),
    );
    for side in [-1, 1] {
        tank.add_indexed(
            "Skirt",
            side,
            SizeParams::cube(0.2 * k),
            Transform::at(side as f32 * k, 0.0, 0.3 * k).scaled(2.0, 1.0, 0.1),
        );
    }
    for pos in [-0.7_f32, 0.7] {
        tank.add_indexed(
            "SmallTurret",
            pos,
            SizeParams::cylinder(0.2 * k, 0.2 * k),
            Transform::at(pos * k, 0.5 * k, 0.6 * k),
        );
        tank.add_indexed(
            "SmallGun",
            pos,
            SizeParams::cylinder(0.05 * k, 0.5 * k),
            Transform::at(pos * k, 0.7 * k, 0.6 * k).rotated(90.0, 0.0, 0.0),
        );
    }
    for i in 0..2 {
        tank.add_indexed(
            "Stack",
            i,
            SizeParams::cylinder(0.1 * k, 0.6 * k),
            Transform::at((-0.4 + i as f32 * 0.8) * k, -0.5 * k, 0.7 * k),
        );
    }
    for i in 0..4 {
        let depth = 0.4 * k + rng.random_range(0.0..0.3 * k);
        let rx = rng.random_range(0.0..45.0);
        let ry = rng.random_range(0.0..45.0);
        let x = rng.random_range(-0.8..0.8) * k;
        let y = rng.random_range(-0.8..0.5) * k;
        tank.add_indexed(
            "Pipe",
            i,
            SizeParams::cylinder(0.05 * k, depth),
            Transform::at(x, y, 0.6 * k).rotated(rx, ry, 0.0),
        );
    }

    tank.bind_material(&material);
    Ok(tank)
}

/// Common chassis handling for the ground units: material plus a forward marker cone
fn ground_unit(
    scene: &mut Scene,
    prefix: &str,
    size: f32,
    color: [f32; 3],
    parts: impl FnOnce(&mut Assembly),
) -> Assembly {
    let material = scene.define_material(
        &format!("{prefix}_Material"),
        [color[0], color[1], color[2], 1.0],
        0.0,
        0.5,
    );
    let mut unit = Assembly::begin(prefix);
    parts(&mut unit);
    unit.add(
        "Arrow",
        SizeParams::Cone { radius1: 0.2, radius2: 0.0, depth: 0.5, vertices: 8 },
        Transform::at(0.0, 1.2 * size, 0.4).rotated(0.0, -90.0, 0.0),
    );
    unit.bind_material(&material);
    unit
}

pub fn land_tank(scene: &mut Scene) -> Result<Assembly> {
    let size = 1.0;
    Ok(ground_unit(scene, "LandTank", size, [0.6, 0.6, 0.2], |unit| {
        unit.add("Body", SizeParams::cube(size), Transform::at(0.0, 0.0, 0.3).scaled(1.5, 2.0, 0.6));
        unit.add(
            "Turret",
            SizeParams::Cylinder { radius: 0.6, depth: 0.4, vertices: 8 },
            Transform::at(0.0, 0.0, 0.7),
        );
        unit.add(
            "Barrel",
            SizeParams::Cylinder { radius: 0.1, depth: 1.2, vertices: 6 },
            Transform::at(0.0, 0.8, 0.7).rotated(90.0, 0.0, 0.0),
        );
    }))
}

pub fn artillery(scene: &mut Scene) -> Result<Assembly> {
    let size = 1.2;
    Ok(ground_unit(scene, "Artillery", size, [0.4, 0.4, 0.4], |unit| {
        unit.add("Body", SizeParams::cube(size), Transform::default().scaled(1.5, 1.5, 0.5));
        unit.add(
            "Barrel",
            SizeParams::Cylinder { radius: 0.2, depth: 2.0, vertices: 8 },
            Transform::at(0.0, 0.8, 0.3).rotated(15.0, 0.0, 0.0),
        );
    }))
}

pub fn harvester(scene: &mut Scene) -> Result<Assembly> {
    let size = 1.1;
    Ok(ground_unit(scene, "Harvester", size, [0.8, 0.5, 0.1], |unit| {
        unit.add("Body", SizeParams::cube(size), Transform::default().scaled(1.2, 1.8, 0.8));
        unit.add(
            "Scoop",
            SizeParams::Cone { radius1: 0.8, radius2: 0.1, depth: 1.0, vertices: 8 },
            Transform::at(0.0, -1.2, 0.2).rotated(90.0, 0.0, 0.0),
        );
    }))
}

pub fn fighter(scene: &mut Scene) -> Result<Assembly> {
    let material = scene.define_material("Fighter_Material", [0.4, 0.4, 0.5, 1.0], 0.3, 0.4);
    let mut fighter = Assembly::begin("Fighter");

    fighter.add(
        "Fuselage",
        SizeParams::cube(1.0),
        Transform::at(0.0, 0.0, 0.5).scaled(1.5, 0.3, 0.3),
    );
    fighter.add("Wings", SizeParams::plane(1.0), Transform::at(0.0, 0.0, 0.5).scaled(1.0, 2.0, 1.0));
    fighter.add(
        "Tail",
        SizeParams::plane(0.5),
        Transform::at(-1.2, 0.0, 0.7).rotated(90.0, 0.0, 0.0).scaled(0.3, 0.3, 0.5),
    );
    fighter.add(
        "Cockpit",
        SizeParams::cube(0.5),
        Transform::at(0.3, 0.0, 0.65).scaled(0.3, 0.4, 0.2),
    );

    fighter.bind_material(&material);
    Ok(fighter)
}

pub fn bomber(scene: &mut Scene) -> Result<Assembly> {
    let material = scene.define_material("Bomber_Material", [0.3, 0.3, 0.35, 1.0], 0.3, 0.5);
    let mut bomber = Assembly::begin("Bomber");

    bomber.add("Body", SizeParams::cube(1.0), Transform::at(0.0, 0.0, 0.6).scaled(1.8, 0.5, 0.25));
    bomber.add("Wings", SizeParams::plane(1.0), Transform::at(0.0, 0.0, 0.6).scaled(1.2, 2.5, 1.0));
    for side in [-1, 1] {
        bomber.add_indexed(
            "Tail",
            side,
            SizeParams::plane(0.5),
            Transform::at(-1.4, side as f32 * 0.3, 0.75)
                .rotated(90.0, 0.0, 0.0)
                .scaled(0.2, 0.2, 0.4),
        );
    }
    bomber.add("BombBay", SizeParams::cube(0.5), Transform::at(0.0, 0.0, 0.4).scaled(0.8, 0.8, 0.2));

    bomber.bind_material(&material);
    Ok(bomber)
}

pub fn large_aircraft(scene: &mut Scene) -> Result<Assembly> {
    let material =
        scene.define_material("LargeAircraft_Material", [0.35, 0.35, 0.4, 1.0], 0.3, 0.5);
    let mut aircraft = Assembly::begin("LargeAircraft");

    aircraft.add("Body", SizeParams::cube(1.0), Transform::at(0.0, 0.0, 1.0).scaled(3.0, 1.0, 0.4));
    aircraft.add("Wings", SizeParams::plane(1.0), Transform::at(0.0, 0.0, 1.0).scaled(2.0, 4.0, 1.0));
    aircraft.add("Tail", SizeParams::cube(0.5), Transform::at(-2.5, 0.0, 1.2).scaled(0.6, 0.3, 0.8));
    for side in [-1, 1] {
        aircraft.add_indexed(
            "Engine",
            side,
            SizeParams::Cylinder { radius: 0.3, depth: 0.8, vertices: 8 },
            Transform::at(1.0, side as f32 * 1.2, 0.8).rotated(0.0, 90.0, 0.0),
        );
    }

    aircraft.bind_material(&material);
    Ok(aircraft)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tank_part_names() {
        let mut scene = Scene::new();
        let tank = simple_tank(&mut scene).unwrap();
        let names: Vec<&str> = tank.parts().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "SimpleTank_Body",
                "SimpleTank_Turret",
                "SimpleTank_Cannon",
                "SimpleTank_Track_-1",
                "SimpleTank_Track_1"
            ]
        );
        assert_eq!(tank.material().unwrap().base_color, [0.2, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn test_simple_tank_sits_on_the_ground() {
        let mut scene = Scene::new();
        let assembly = simple_tank(&mut scene).unwrap();
        let tank = scene.finish(assembly).unwrap();
        let bounds = tank.bounds().unwrap();
        assert!(bounds.min.z.abs() < 1e-4);
        assert!((bounds.max.z - 0.9).abs() < 1e-4);
    }

    #[test]
    fn test_aa_tank_barrels_point_up_and_sideways() {
        let mut scene = Scene::new();
        let tank = aa_tank(&mut scene).unwrap();
        let barrels: Vec<_> = tank
            .parts()
            .iter()
            .filter(|p| p.name.starts_with("AATank_Barrel_"))
            .collect();
        assert_eq!(barrels.len(), 2);
        assert!(barrels.iter().all(|b| b.transform.rotation.y == 30.0));
        assert!(tank.parts().iter().any(|p| p.name == "AATank_Radar"));
    }

    #[test]
    fn test_large_tank_is_reproducible_and_double_size() {
        let first = large_tank(&mut Scene::new()).unwrap();
        let second = large_tank(&mut Scene::new()).unwrap();
        assert_eq!(first.parts(), second.parts());
        assert!(first.parts().iter().any(|p| p.name == "LargeTank_SmallTurret_-0.7"));
        assert_eq!(first.material().unwrap().metallic, 0.6);

        let recipe = recipes().into_iter().find(|r| r.name == "LargeTank").unwrap();
        assert_eq!(recipe.camera_distance, 15.0);

        let mut scene = Scene::new();
        let assembly = large_tank(&mut scene).unwrap();
        let size = scene.finish(assembly).unwrap().bounds().unwrap().size();
        // Body is 3 x 3.9 before the tracks and skirts widen it
        assert!(size.y >= 3.9 - 1e-3, "length {}", size.y);
    }

    #[test]
    fn test_ground_units_carry_a_forward_marker() {
        let mut scene = Scene::new();
        for build in [land_tank, artillery, harvester] {
            let unit = build(&mut scene).unwrap();
            let arrow = unit.parts().last().unwrap();
            assert!(arrow.name.ends_with("_Arrow"));
            assert!(arrow.transform.position.y > 1.0);
        }
    }

    #[test]
    fn test_unit_materials_land_in_scene_library() {
        let mut scene = Scene::new();
        for recipe in recipes() {
            recipe.build(&mut scene).unwrap();
        }
        assert!(scene.materials.get_material("Bomber_Material").is_some());
        assert_eq!(scene.materials.len(), recipes().len() + 1);
    }
}
