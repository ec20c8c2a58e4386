use crate::math::{Aabb, Point3, Ray, Vec3, EPSILON};

/// One triangular face: three indices into the owning [`Mesh`]'s vertex pool
/// plus one index into its normal pool. Faces own no geometry directly —
/// this is the owned-index-pool design noted in the data model (no raw
/// pointer aliasing into a shared vertex buffer).
#[derive(Debug, Clone, Copy)]
pub struct Face {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
    pub n: usize,
}

/// A triangle mesh: an owned vertex pool, an owned (typically per-face or
/// per-vertex) normal pool, a face list indexing both, a precomputed
/// bounding box for whole-mesh culling, and the material every face shares.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Point3>,
    pub normals: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub bounds: Aabb,
    pub material_index: usize,
}

impl Mesh {
    /// Builds a mesh from owned vertex/normal pools and faces, precomputing
    /// the bounding box. Panics if `vertices` is empty — a mesh with no
    /// vertices has no bounds to compute.
    pub fn new(vertices: Vec<Point3>, normals: Vec<Vec3>, faces: Vec<Face>, material_index: usize) -> Self {
        let bounds = Aabb::enclosing(&vertices);
        Self {
            vertices,
            normals,
            faces,
            bounds,
            material_index,
        }
    }

    #[inline]
    pub fn face_vertices(&self, face: &Face) -> (Point3, Point3, Point3) {
        (self.vertices[face.v0], self.vertices[face.v1], self.vertices[face.v2])
    }

    #[inline]
    pub fn face_normal(&self, face: &Face) -> Vec3 {
        self.normals[face.n]
    }
}

/// Möller-Trumbore ray/triangle intersection. Returns the hit distance `t`
/// (always a front-style hit — triangles have no "inside" notion) or `None`
/// for a miss, a near-parallel ray/plane, a hit behind the ray origin, or
/// barycentric coordinates outside the triangle.
pub fn intersect_triangle(ray: &Ray, v0: Point3, v1: Point3, v2: Point3) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let pvec = ray.direction.cross(edge2);
    let det = edge1.dot(pvec);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = ray.origin - v0;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(edge1);
    let v = ray.direction.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(qvec) * inv_det;
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Tests every face in the mesh, first rejecting the whole mesh via the
/// precomputed AABB (boolean-only slab test — no BVH/KD-tree subdivision,
/// per the no-acceleration-structure design). Returns the index of the
/// nearest-hit face and its distance.
pub fn intersect_mesh(ray: &Ray, mesh: &Mesh) -> Option<(usize, f64)> {
    if !mesh.bounds.hit(ray) {
        return None;
    }
    let mut nearest: Option<(usize, f64)> = None;
    for (i, face) in mesh.faces.iter().enumerate() {
        let (v0, v1, v2) = mesh.face_vertices(face);
        if let Some(t) = intersect_triangle(ray, v0, v1, v2) {
            if nearest.map_or(true, |(_, best_t)| t < best_t) {
                nearest = Some((i, t));
            }
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> (Point3, Point3, Point3) {
        (
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn ray_through_triangle_centroid_hits() {
        let (v0, v1, v2) = unit_triangle();
        let centroid = Point3::new(1.0 / 3.0, 1.0 / 3.0, 0.0);
        let ray = Ray::new(centroid + Vec3::unit_z(), -Vec3::unit_z());
        assert!(intersect_triangle(&ray, v0, v1, v2).is_some());
    }

    #[test]
    fn ray_outside_triangle_edge_misses() {
        let (v0, v1, v2) = unit_triangle();
        let ray = Ray::new(Point3::new(2.0, 2.0, 1.0), -Vec3::unit_z());
        assert!(intersect_triangle(&ray, v0, v1, v2).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let (v0, v1, v2) = unit_triangle();
        let ray = Ray::new(Point3::new(0.2, 0.2, 1.0), Vec3::unit_x());
        assert!(intersect_triangle(&ray, v0, v1, v2).is_none());
    }

    #[test]
    fn mesh_culled_by_bounds_before_per_face_scan() {
        let mesh = Mesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![Vec3::unit_z()],
            vec![Face { v0: 0, v1: 1, v2: 2, n: 0 }],
            0,
        );
        let ray = Ray::new(Point3::new(100.0, 100.0, 100.0), Vec3::unit_z());
        assert!(intersect_mesh(&ray, &mesh).is_none());
    }

    #[test]
    fn mesh_hit_returns_nearest_face() {
        let mesh = Mesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![Vec3::unit_z()],
            vec![Face { v0: 0, v1: 1, v2: 2, n: 0 }],
            0,
        );
        let ray = Ray::new(Point3::new(0.2, 0.2, 5.0), -Vec3::unit_z());
        let hit = intersect_mesh(&ray, &mesh);
        assert!(matches!(hit, Some((0, t)) if (t - 5.0).abs() < 1e-9));
    }
}
