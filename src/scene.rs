use crate::camera::Camera;
use crate::light::Light;
use crate::material::Material;
use crate::math::{IntersectionKind, Point3, Ray, Vec3};
use crate::mesh::{intersect_mesh, Mesh};
use crate::primitive::{intersect_primitive, IntersectOutcome, Primitive, PrimitiveKind};

/// Identifies which kind of geometry a [`HitRecord`] refers to, so the
/// shading and normal-resolution code can go back and look the surface up
/// without re-testing every primitive in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Primitive(usize),
    Face(usize, usize),
}

/// The nearest-hit result of a scene traversal: distance, which surface was
/// hit, and whether the ray struck it from outside or was already inside
/// (meaningless for triangles, which have no interior).
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    pub t: f64,
    pub kind: HitKind,
    pub intersection_kind: IntersectionKind,
}

/// A complete scene: geometry, materials, lights and the camera that views
/// it, plus the render parameters spec.md ties to the scene itself
/// (`max_depth`, `supersamples`) rather than to the CLI.
#[derive(Debug, Clone)]
pub struct Scene {
    pub primitives: Vec<Primitive>,
    pub meshes: Vec<Mesh>,
    pub lights: Vec<Light>,
    pub materials: Vec<Material>,
    pub camera: Camera,
    pub width: u32,
    pub height: u32,
    pub max_depth: u32,
    pub supersamples: u32,
}

impl Scene {
    /// `materials[0]` is always the DEFAULT fallback, pushed here so callers
    /// building a scene can index materials they push afterward starting at 1.
    pub fn new(camera: Camera, width: u32, height: u32, max_depth: u32, supersamples: u32) -> Self {
        Self {
            primitives: Vec::new(),
            meshes: Vec::new(),
            lights: Vec::new(),
            materials: vec![Material::default_material()],
            camera,
            width,
            height,
            max_depth,
            supersamples,
        }
    }

    pub fn material(&self, index: usize) -> &Material {
        self.materials.get(index).unwrap_or(&self.materials[0])
    }

    pub fn material_of(&self, kind: HitKind) -> &Material {
        match kind {
            HitKind::Primitive(i) => self.material(self.primitives[i].material_index),
            HitKind::Face(mesh_i, _) => self.material(self.meshes[mesh_i].material_index),
        }
    }

    /// Finds the nearest surface a ray hits, testing every primitive and
    /// every mesh (AABB-culled first) with no acceleration structure beyond
    /// that per-mesh bounding box — a linear scan over the scene's geometry.
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        let mut nearest: Option<HitRecord> = None;

        for (i, prim) in self.primitives.iter().enumerate() {
            let outcome = intersect_primitive(ray, prim);
            let (t, kind) = match outcome {
                IntersectOutcome::Miss => continue,
                IntersectOutcome::Front(t) => (t, IntersectionKind::Front),
                IntersectOutcome::Inside(t) => (t, IntersectionKind::Inside),
            };
            if nearest.map_or(true, |h| t < h.t) {
                nearest = Some(HitRecord {
                    t,
                    kind: HitKind::Primitive(i),
                    intersection_kind: kind,
                });
            }
        }

        for (mesh_i, mesh) in self.meshes.iter().enumerate() {
            if let Some((face_i, t)) = intersect_mesh(ray, mesh) {
                if nearest.map_or(true, |h| t < h.t) {
                    nearest = Some(HitRecord {
                        t,
                        kind: HitKind::Face(mesh_i, face_i),
                        intersection_kind: IntersectionKind::Front,
                    });
                }
            }
        }

        nearest
    }

    /// Resolves the surface normal at a hit, oriented so it faces back
    /// toward the incoming ray — flipped for quadratic primitives using the
    /// `Inside`/`Front` tag (an inside hit means the geometric normal points
    /// away from the ray's current medium) and flipped for planar surfaces
    /// (which have no interior notion) via a direct dot-product test instead.
    pub fn normal_at(&self, ray: &Ray, hit: &HitRecord) -> Vec3 {
        match hit.kind {
            HitKind::Primitive(i) => primitive_normal(&self.primitives[i], ray, hit),
            HitKind::Face(mesh_i, face_i) => {
                let mesh = &self.meshes[mesh_i];
                let face = mesh.faces[face_i];
                let n = mesh.face_normal(&face);
                if n.dot(ray.direction) > 0.0 {
                    -n
                } else {
                    n
                }
            }
        }
    }
}

fn primitive_normal(prim: &Primitive, ray: &Ray, hit: &HitRecord) -> Vec3 {
    let p = ray.at(hit.t);
    let n = match prim.kind {
        PrimitiveKind::Sphere | PrimitiveKind::Hemisphere => (p - prim.loc).normalized(),
        PrimitiveKind::Plane | PrimitiveKind::Disk => prim.normal,
        PrimitiveKind::Cylinder => {
            let axial = prim.dir * (p - prim.loc).dot(prim.dir);
            (p - prim.loc - axial).normalized()
        }
        PrimitiveKind::Cone => cone_normal(prim, p),
    };

    match prim.kind {
        PrimitiveKind::Plane | PrimitiveKind::Disk => {
            if n.dot(ray.direction) > 0.0 {
                -n
            } else {
                n
            }
        }
        _ => {
            if hit.intersection_kind == IntersectionKind::Inside {
                -n
            } else {
                n
            }
        }
    }
}

/// Cone normal via Rodrigues rotation: the radial vector from the axis to
/// the hit point is tilted toward the axis by the cone's half-angle, about
/// the tangent perpendicular to both. `tangent.cross(radial)` collapses to
/// `dir` (radial and dir are already orthonormal), so the rotated vector
/// reduces to `radial * cos(angle) + dir * sin(angle)`.
fn cone_normal(prim: &Primitive, p: Point3) -> Vec3 {
    let to_hit = p - prim.loc;
    let axial_len = to_hit.dot(prim.dir);
    let axial = prim.dir * axial_len;
    let radial = (to_hit - axial).normalized();
    let tangent = prim.dir.cross(radial);
    (radial * prim.cos_angle + tangent.cross(radial) * prim.sin_angle).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;

    fn test_camera() -> Camera {
        Camera::new(Point3::new(0.0, 0.0, -5.0), Point3::zero(), Vec3::unit_y(), 64, 64)
    }

    #[test]
    fn sphere_normal_points_outward() {
        let mut scene = Scene::new(test_camera(), 64, 64, 1, 1);
        scene.primitives.push(Primitive::sphere(Point3::zero(), 1.0, 0));
        let ray = Ray::new(Point3::new(0.0, 0.0, -3.0), Vec3::unit_z());
        let hit = scene.intersect(&ray).expect("ray should hit sphere");
        let n = scene.normal_at(&ray, &hit);
        assert!((n - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-9);
    }

    #[test]
    fn inside_hit_flips_sphere_normal() {
        let mut scene = Scene::new(test_camera(), 64, 64, 1, 1);
        scene.primitives.push(Primitive::sphere(Point3::zero(), 1.0, 0));
        let ray = Ray::new(Point3::zero(), Vec3::unit_z());
        let hit = scene.intersect(&ray).expect("ray from center should hit");
        assert_eq!(hit.intersection_kind, IntersectionKind::Inside);
        let n = scene.normal_at(&ray, &hit);
        assert!((n - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-9);
    }

    #[test]
    fn nearest_of_two_overlapping_primitives_wins() {
        let mut scene = Scene::new(test_camera(), 64, 64, 1, 1);
        scene.primitives.push(Primitive::sphere(Point3::new(0.0, 0.0, 5.0), 1.0, 0));
        scene.primitives.push(Primitive::sphere(Point3::new(0.0, 0.0, 2.0), 1.0, 0));
        let ray = Ray::new(Point3::zero(), Vec3::unit_z());
        let hit = scene.intersect(&ray).unwrap();
        assert_eq!(hit.kind, HitKind::Primitive(1));
    }

    #[test]
    fn cone_normal_is_unit_length() {
        let prim = Primitive::cone(Point3::zero(), Vec3::unit_y(), std::f64::consts::FRAC_PI_4, 2.0, 0);
        let p = Point3::new(1.0, 1.0, 0.0);
        let n = cone_normal(&prim, p);
        assert!((n.length() - 1.0).abs() < 1e-9);
    }
}
