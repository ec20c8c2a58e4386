use crate::camera::Camera;
use crate::light::Light;
use crate::material::{Colour, Material};
use crate::math::{Point3, Vec3};
use crate::primitive::Primitive;
use crate::scene::Scene;
use rand::Rng;

/// Built-in scenes, standing in for the external scene-file loader this
/// crate doesn't implement: each preset builds a fully populated [`Scene`]
/// (geometry, materials, lights, camera) at a given resolution so the CLI
/// is exercisable without authoring a scene description by hand.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ScenePreset {
    /// A handful of primitives of every kind, lit by two lights — good for
    /// a first look at shading, reflection and refraction together.
    Showcase,
    /// A glass and a mirror sphere over a tiled floor, to inspect
    /// refraction/reflection blending and transparent shadows.
    Optics,
    /// A single sphere on a plane — fast to render, useful for timing runs.
    Minimal,
    /// A grid of spheres with randomized material parameters.
    Stress,
}

impl ScenePreset {
    pub fn name(self) -> &'static str {
        match self {
            ScenePreset::Showcase => "Showcase",
            ScenePreset::Optics => "Optics",
            ScenePreset::Minimal => "Minimal",
            ScenePreset::Stress => "Stress",
        }
    }

    pub fn build(self, width: u32, height: u32, max_depth: u32, supersamples: u32) -> Scene {
        match self {
            ScenePreset::Showcase => build_showcase(width, height, max_depth, supersamples),
            ScenePreset::Optics => build_optics(width, height, max_depth, supersamples),
            ScenePreset::Minimal => build_minimal(width, height, max_depth, supersamples),
            ScenePreset::Stress => build_stress(width, height, max_depth, supersamples),
        }
    }
}

fn push_material(scene: &mut Scene, material: Material) -> usize {
    scene.materials.push(material);
    scene.materials.len() - 1
}

fn build_showcase(width: u32, height: u32, max_depth: u32, supersamples: u32) -> Scene {
    let camera = Camera::new(
        Point3::new(0.0, 3.0, -9.0),
        Point3::new(0.0, 1.0, 0.0),
        Vec3::unit_y(),
        width,
        height,
    );
    let mut scene = Scene::new(camera, width, height, max_depth, supersamples);

    let floor_mat = push_material(
        &mut scene,
        Material::new("floor", 0.1, 0.0, 1.0, Colour::new(0.55, 0.55, 0.6, 1.0), Colour::new(0.2, 0.2, 0.2, 1.0)),
    );
    scene.primitives.push(Primitive::plane(Point3::zero(), Vec3::unit_y(), floor_mat));

    let glass = push_material(
        &mut scene,
        Material::new("glass", 0.05, 0.9, 1.5, Colour::new(0.9, 0.95, 1.0, 1.0), Colour::new(1.0, 1.0, 1.0, 1.0)),
    );
    scene.primitives.push(Primitive::sphere(Point3::new(-1.6, 1.0, 0.0), 1.0, glass));

    let mirror = push_material(
        &mut scene,
        Material::new("mirror", 0.85, 0.0, 1.0, Colour::new(0.1, 0.1, 0.12, 1.0), Colour::new(0.9, 0.9, 0.9, 1.0)),
    );
    scene.primitives.push(Primitive::sphere(Point3::new(1.6, 1.0, 0.0), 1.0, mirror));

    let matte_red = push_material(
        &mut scene,
        Material::new("matte_red", 0.05, 0.0, 1.0, Colour::new(0.7, 0.12, 0.12, 1.0), Colour::new(0.3, 0.3, 0.3, 1.0)),
    );
    scene.primitives.push(Primitive::cone(
        Point3::new(0.0, 0.0, 2.2),
        Vec3::unit_y(),
        30.0_f64.to_radians(),
        1.6,
        matte_red,
    ));

    let brass = push_material(
        &mut scene,
        Material::new("brass", 0.3, 0.0, 1.0, Colour::new(0.6, 0.45, 0.1, 1.0), Colour::new(0.8, 0.7, 0.4, 1.0)),
    );
    scene.primitives.push(Primitive::cylinder(
        Point3::new(0.0, 0.6, -2.5),
        Vec3::unit_y(),
        0.6,
        0.6,
        brass,
    ));

    scene.lights.push(Light::new(Point3::new(-4.0, 6.0, -5.0), (1.0, 0.98, 0.92), 900.0, 20.0));
    scene.lights.push(Light::new(Point3::new(4.0, 4.0, -2.0), (0.5, 0.7, 1.0), 400.0, 15.0));

    scene
}

fn build_optics(width: u32, height: u32, max_depth: u32, supersamples: u32) -> Scene {
    let camera = Camera::new(
        Point3::new(0.0, 2.0, -6.0),
        Point3::new(0.0, 0.8, 0.0),
        Vec3::unit_y(),
        width,
        height,
    );
    let mut scene = Scene::new(camera, width, height, max_depth, supersamples);

    let floor_mat = push_material(
        &mut scene,
        Material::new("checker_floor", 0.0, 0.0, 1.0, Colour::new(0.85, 0.85, 0.85, 1.0), Colour::black()),
    );
    scene.primitives.push(Primitive::disk(Point3::zero(), Vec3::unit_y(), 6.0, floor_mat));

    let glass = push_material(
        &mut scene,
        Material::new("glass_sphere", 0.08, 0.92, 1.5, Colour::new(0.95, 0.97, 1.0, 1.0), Colour::new(1.0, 1.0, 1.0, 1.0)),
    );
    scene.primitives.push(Primitive::sphere(Point3::new(-1.1, 0.8, 0.0), 0.8, glass));

    let mirror = push_material(
        &mut scene,
        Material::new("mirror_dome", 0.9, 0.0, 1.0, Colour::black(), Colour::new(1.0, 1.0, 1.0, 1.0)),
    );
    scene.primitives.push(Primitive::hemisphere(Point3::new(1.1, 0.0, 0.0), Vec3::unit_y(), 0.8, mirror));

    scene.lights.push(Light::new(Point3::new(0.0, 5.0, -4.0), (1.0, 1.0, 1.0), 700.0, 18.0));

    scene
}

fn build_minimal(width: u32, height: u32, max_depth: u32, supersamples: u32) -> Scene {
    let camera = Camera::new(
        Point3::new(0.0, 1.5, -4.0),
        Point3::new(0.0, 0.5, 0.0),
        Vec3::unit_y(),
        width,
        height,
    );
    let mut scene = Scene::new(camera, width, height, max_depth, supersamples);

    let floor_mat = push_material(
        &mut scene,
        Material::new("floor", 0.0, 0.0, 1.0, Colour::new(0.6, 0.6, 0.6, 1.0), Colour::black()),
    );
    scene.primitives.push(Primitive::plane(Point3::zero(), Vec3::unit_y(), floor_mat));

    let sphere_mat = push_material(
        &mut scene,
        Material::new("sphere", 0.2, 0.0, 1.0, Colour::new(0.2, 0.4, 0.9, 1.0), Colour::new(0.5, 0.5, 0.5, 1.0)),
    );
    scene.primitives.push(Primitive::sphere(Point3::new(0.0, 0.6, 0.0), 0.6, sphere_mat));

    scene.lights.push(Light::new(Point3::new(-3.0, 4.0, -3.0), (1.0, 1.0, 1.0), 500.0, 12.0));

    scene
}

fn build_stress(width: u32, height: u32, max_depth: u32, supersamples: u32) -> Scene {
    let camera = Camera::new(
        Point3::new(0.0, 8.0, -14.0),
        Point3::zero(),
        Vec3::unit_y(),
        width,
        height,
    );
    let mut scene = Scene::new(camera, width, height, max_depth, supersamples);

    let floor_mat = push_material(
        &mut scene,
        Material::new("floor", 0.0, 0.0, 1.0, Colour::new(0.3, 0.3, 0.35, 1.0), Colour::black()),
    );
    scene.primitives.push(Primitive::plane(Point3::zero(), Vec3::unit_y(), floor_mat));

    let mut rng = rand::thread_rng();
    for gx in -4..4 {
        for gz in -4..4 {
            let colour = Colour::new(rng.gen_range(0.2..1.0), rng.gen_range(0.2..1.0), rng.gen_range(0.2..1.0), 1.0);
            let reflect = rng.gen_range(0.0..0.6);
            let mat = push_material(&mut scene, Material::new("stress", reflect, 0.0, 1.0, colour, Colour::new(0.4, 0.4, 0.4, 1.0)));
            let center = Point3::new(gx as f64 * 1.4, 0.4, gz as f64 * 1.4);
            scene.primitives.push(Primitive::sphere(center, 0.4, mat));
        }
    }

    scene.lights.push(Light::new(Point3::new(0.0, 10.0, -10.0), (1.0, 0.95, 0.9), 2500.0, 25.0));
    scene.lights.push(Light::new(Point3::new(-8.0, 6.0, 6.0), (0.6, 0.7, 1.0), 900.0, 20.0));

    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_produces_at_least_one_primitive_and_light() {
        for preset in [ScenePreset::Showcase, ScenePreset::Optics, ScenePreset::Minimal, ScenePreset::Stress] {
            let scene = preset.build(64, 64, 4, 1);
            assert!(!scene.primitives.is_empty(), "{} has no primitives", preset.name());
            assert!(!scene.lights.is_empty(), "{} has no lights", preset.name());
            assert_eq!(scene.materials[0].name, "DEFAULT");
        }
    }
}
