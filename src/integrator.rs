use crate::math::{Point3, Ray, Vec3, EPSILON};
use crate::scene::Scene;
use crate::shading::shade_point;
use crate::stats::ThreadStats;

/// Background seen by a primary (camera) ray that hits nothing: `0x7F7F7F`
/// packed grey, expressed here as the equivalent `[0,1]` float triple.
pub const PRIMARY_MISS_COLOUR: Vec3 = Vec3::new(0x7F as f64 / 255.0, 0x7F as f64 / 255.0, 0x7F as f64 / 255.0);

/// Background seen by a secondary (reflected/refracted) ray that hits
/// nothing — a plain mid-grey `{0.5, 0.5, 0.5}`. Subtly different from
/// [`PRIMARY_MISS_COLOUR`] (`0x7F/255 ≈ 0.498`) even though both read as
/// "mid grey" — the two paths used separate constants in the original
/// renderer and this keeps that distinction rather than unifying them.
pub const RECURSIVE_MISS_COLOUR: Vec3 = Vec3::new(0.5, 0.5, 0.5);

/// Mirror-reflects `dir` about `normal` (which must already face back
/// toward the incoming ray).
fn reflect(dir: Vec3, normal: Vec3) -> Vec3 {
    dir - normal * (2.0 * dir.dot(normal))
}

/// Refracts `dir` through a surface with outward-facing `normal` from a
/// medium of index `n1` into one of index `n2`, using Snell's law. Returns
/// `None` on total internal reflection, in which case the caller should
/// fall back to [`reflect`].
fn refract(dir: Vec3, normal: Vec3, n1: f64, n2: f64) -> Option<Vec3> {
    let cosi = (-normal.dot(dir)).clamp(-1.0, 1.0);
    let eta = n1 / n2;
    let sin2t = eta * eta * (1.0 - cosi * cosi);
    if sin2t > 1.0 {
        return None;
    }
    let cost = (1.0 - sin2t).sqrt();
    Some(dir * eta + normal * (eta * cosi - cost))
}

/// Spawns the reflection ray at a hit point. The medium (`ior`/`inside`)
/// carries over unchanged — reflection never crosses a material boundary.
fn spawn_reflection(incoming: &Ray, point: Point3, normal: Vec3) -> Ray {
    let dir = reflect(incoming.direction, normal);
    let mut ray = Ray::new(point + dir * EPSILON, dir);
    ray.ior = incoming.ior;
    ray.inside = incoming.inside;
    ray
}

/// Spawns the refraction ray at a hit point, or `None` on total internal
/// reflection (callers should spawn a reflection ray instead in that case).
/// Toggles `inside` and swaps `ior` to the destination medium's index —
/// vacuum (1.0) when leaving a solid, `material_ior` when entering one.
fn spawn_refraction(incoming: &Ray, point: Point3, normal: Vec3, material_ior: f64) -> Option<Ray> {
    let (n1, n2) = if incoming.inside {
        (incoming.ior, 1.0)
    } else {
        (incoming.ior, material_ior)
    };
    let dir = refract(incoming.direction, normal, n1, n2)?;
    let mut ray = Ray::new(point + dir * EPSILON, dir);
    ray.ior = n2;
    ray.inside = !incoming.inside;
    Some(ray)
}

/// Traces one ray through the scene, returning its shaded colour. Recurses
/// for reflection and refraction up to `scene.max_depth` bounces; beyond
/// that (or on a miss) it returns the appropriate background colour.
/// Refraction is blended into the surface's base (direct-lit) colour
/// first, then reflection is blended into that combined result — the
/// order the original shader evaluates the two recursive terms in.
pub fn trace(scene: &Scene, ray: &Ray, depth: u32, is_primary: bool, stats: &mut ThreadStats) -> Vec3 {
    if depth == 0 && is_primary {
        stats.primary_rays += 1;
    }
    stats.intersection_tests += (scene.primitives.len() + scene.meshes.len()) as u64;

    let Some(hit) = scene.intersect(ray) else {
        return if is_primary {
            PRIMARY_MISS_COLOUR
        } else {
            RECURSIVE_MISS_COLOUR
        };
    };

    let point = ray.at(hit.t);
    let normal = scene.normal_at(ray, &hit);
    let material = scene.material_of(hit.kind);
    let view_dir = -ray.direction.normalized();

    let mut colour = shade_point(scene, point, normal, view_dir, material, stats);

    if depth < scene.max_depth {
        if material.refract > EPSILON {
            stats.refraction_rays += 1;
            let refracted_ray = spawn_refraction(ray, point, normal, material.ior)
                .unwrap_or_else(|| spawn_reflection(ray, point, normal));
            let refracted_colour = trace(scene, &refracted_ray, depth + 1, false, stats);
            colour = colour.lerp(refracted_colour, material.refract);
        }

        if material.reflect > EPSILON {
            stats.reflection_rays += 1;
            let reflected_ray = spawn_reflection(ray, point, normal);
            let reflected_colour = trace(scene, &reflected_ray, depth + 1, false, stats);
            colour = colour.lerp(reflected_colour, material.reflect);
        }
    }

    colour
}

/// Flat-shading shortcut for preview mode: returns the hit surface's base
/// diffuse colour with no lighting, shadowing or recursive bounces at all.
pub fn trace_preview(scene: &Scene, ray: &Ray, stats: &mut ThreadStats) -> Vec3 {
    stats.primary_rays += 1;
    stats.intersection_tests += (scene.primitives.len() + scene.meshes.len()) as u64;
    match scene.intersect(ray) {
        Some(hit) => scene.material_of(hit.kind).diff.weighted(),
        None => PRIMARY_MISS_COLOUR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_off_flat_mirror_flips_perpendicular_component() {
        let dir = Vec3::new(1.0, -1.0, 0.0).normalized();
        let normal = Vec3::unit_y();
        let r = reflect(dir, normal);
        assert!((r.x - dir.x).abs() < 1e-9);
        assert!((r.y + dir.y).abs() < 1e-9);
    }

    #[test]
    fn refract_straight_through_normal_incidence_keeps_direction() {
        let dir = Vec3::unit_z();
        let normal = -Vec3::unit_z();
        let out = refract(dir, normal, 1.0, 1.5).expect("should refract, not TIR");
        assert!((out.normalized() - dir).length() < 1e-9);
    }

    #[test]
    fn refract_grazing_angle_dense_to_sparse_totally_internally_reflects() {
        let dir = Vec3::new(0.999, 0.0447, 0.0).normalized();
        let normal = -Vec3::unit_x();
        assert!(refract(dir, normal, 1.5, 1.0).is_none());
    }

    #[test]
    fn primary_and_recursive_miss_colours_are_both_mid_grey_but_distinct() {
        assert!((PRIMARY_MISS_COLOUR.x - 0.5).abs() < 0.01);
        assert_ne!(PRIMARY_MISS_COLOUR, RECURSIVE_MISS_COLOUR);
    }
}
