use crate::light::Light;
use crate::material::Material;
use crate::math::{pow50, Point3, Ray, Vec3, EPSILON};
use crate::mesh::intersect_mesh;
use crate::primitive::{intersect_primitive, IntersectOutcome};
use crate::scene::Scene;
use crate::stats::ThreadStats;

/// Casts a shadow ray from `point` toward `light` and returns how much of
/// the light's contribution survives: 1.0 means fully lit, 0.0 means fully
/// occluded. Each occluder multiplies the running transmittance by its
/// material's `refract` coefficient (an opaque occluder has `refract ==
/// 0.0` and immediately zeroes it), so a pane of tinted glass dims a shadow
/// rather than blacking it out entirely. Exits early once the accumulated
/// transmittance drops below [`EPSILON`] — further occluders cannot matter.
/// A mesh can only contribute once regardless of how many of its faces the
/// shadow ray crosses, since [`intersect_mesh`] reports only the nearest.
pub fn shadow_transmittance(scene: &Scene, point: Point3, light: &Light, stats: &mut ThreadStats) -> f64 {
    stats.shadow_rays += 1;
    stats.intersection_tests += (scene.primitives.len() + scene.meshes.len()) as u64;

    let to_light = light.loc - point;
    let dist = to_light.length();
    let dir = to_light / dist;
    let ray = Ray::new(point + dir * EPSILON, dir);

    let mut transmit = 1.0;

    for prim in &scene.primitives {
        let hit_t = match intersect_primitive(&ray, prim) {
            IntersectOutcome::Front(t) | IntersectOutcome::Inside(t) => Some(t),
            IntersectOutcome::Miss => None,
        };
        if let Some(t) = hit_t {
            if t < dist {
                transmit *= scene.material(prim.material_index).refract;
                if transmit < EPSILON {
                    return 0.0;
                }
            }
        }
    }

    for mesh in &scene.meshes {
        if let Some((_, t)) = intersect_mesh(&ray, mesh) {
            if t < dist {
                transmit *= scene.material(mesh.material_index).refract;
                if transmit < EPSILON {
                    return 0.0;
                }
            }
        }
    }

    transmit
}

/// Smooth inverse-square falloff: `lumens * half / (half + d^2)`, where
/// `half` is the distance at which the attenuation reaches 50%. Avoids the
/// singularity of a bare `1/d^2` term at the light's own location.
#[inline]
fn attenuation(light: &Light, dist_squared: f64) -> f64 {
    light.lumens * light.half / (light.half + dist_squared)
}

/// Blinn-Phong direct lighting at a shaded point: diffuse term from the
/// surface normal and light direction, specular term from the halfway
/// vector raised to the fixed exponent 50, both scaled by the light's
/// attenuation and tested against shadowing. `view_dir` must point from the
/// surface back toward the ray's origin (i.e. `-ray.direction`).
pub fn shade_point(
    scene: &Scene,
    point: Point3,
    normal: Vec3,
    view_dir: Vec3,
    material: &Material,
    stats: &mut ThreadStats,
) -> Vec3 {
    let mut result = Vec3::zero();

    for light in &scene.lights {
        let to_light = light.loc - point;
        let dist_squared = to_light.length_squared();
        if dist_squared < EPSILON {
            continue;
        }
        let light_dir = to_light / dist_squared.sqrt();
        let n_dot_l = normal.dot(light_dir);
        if n_dot_l <= 0.0 {
            continue;
        }

        let transmit = shadow_transmittance(scene, point, light, stats);
        if transmit < EPSILON {
            continue;
        }

        let atten = attenuation(light, dist_squared) * transmit;
        let light_colour = Vec3::new(light.colour.0, light.colour.1, light.colour.2);

        let diffuse = material.diff.weighted() * (n_dot_l * atten);
        result += diffuse.hadamard(light_colour);

        let half_vec = (light_dir + view_dir).normalized();
        let n_dot_h = normal.dot(half_vec).max(0.0);
        if n_dot_h > 0.0 {
            let specular = material.spec.weighted() * (pow50(n_dot_h) * atten);
            result += specular.hadamard(light_colour);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::material::Colour;
    use crate::primitive::Primitive;
    use crate::scene::Scene;

    fn test_camera() -> Camera {
        Camera::new(Point3::new(0.0, 0.0, -5.0), Point3::zero(), Vec3::unit_y(), 32, 32)
    }

    #[test]
    fn unoccluded_point_light_is_fully_lit() {
        let scene = Scene::new(test_camera(), 32, 32, 1, 1);
        let light = Light::new(Point3::new(0.0, 0.0, -10.0), (1.0, 1.0, 1.0), 100.0, 10.0);
        let mut stats = ThreadStats::default();
        assert_eq!(shadow_transmittance(&scene, Point3::zero(), &light, &mut stats), 1.0);
        assert_eq!(stats.shadow_rays, 1);
    }

    #[test]
    fn opaque_occluder_blocks_light_entirely() {
        let mut scene = Scene::new(test_camera(), 32, 32, 1, 1);
        scene.materials.push(Material::new("opaque", 0.0, 0.0, 1.0, Colour::black(), Colour::black()));
        scene.primitives.push(Primitive::sphere(Point3::new(0.0, 0.0, -5.0), 1.0, 1));
        let light = Light::new(Point3::new(0.0, 0.0, -10.0), (1.0, 1.0, 1.0), 100.0, 10.0);
        let mut stats = ThreadStats::default();
        assert_eq!(shadow_transmittance(&scene, Point3::zero(), &light, &mut stats), 0.0);
    }

    #[test]
    fn tinted_glass_dims_but_does_not_black_out() {
        let mut scene = Scene::new(test_camera(), 32, 32, 1, 1);
        scene
            .materials
            .push(Material::new("glass", 0.0, 0.5, 1.5, Colour::black(), Colour::black()));
        scene.primitives.push(Primitive::sphere(Point3::new(0.0, 0.0, -5.0), 1.0, 1));
        let light = Light::new(Point3::new(0.0, 0.0, -10.0), (1.0, 1.0, 1.0), 100.0, 10.0);
        let mut stats = ThreadStats::default();
        let t = shadow_transmittance(&scene, Point3::zero(), &light, &mut stats);
        assert!((t - 0.5).abs() < 1e-9);
    }

    #[test]
    fn shading_with_no_lights_is_black() {
        let scene = Scene::new(test_camera(), 32, 32, 1, 1);
        let material = Material::default_material();
        let mut stats = ThreadStats::default();
        let result = shade_point(&scene, Point3::zero(), Vec3::unit_z(), -Vec3::unit_z(), &material, &mut stats);
        assert_eq!(result, Vec3::zero());
    }
}
