use crate::math::{Point3, Ray, Vec3};

/// The focal distance (in an arbitrary internal unit) positioning the
/// virtual image plane in front of the camera. Kept as a named constant
/// rather than inlined, matching how fixed it is upstream.
pub const DEFAULT_FOCAL_LENGTH: f64 = 2.175;

/// 35mm-film-equivalent half-height of the image plane, in the same unit as
/// [`DEFAULT_FOCAL_LENGTH`]: `18 * focal / 35`.
fn film_half_height(focal: f64) -> f64 {
    18.0 * focal / 35.0
}

/// Vertical field of view, in degrees, implied by [`DEFAULT_FOCAL_LENGTH`]
/// and the 35mm-equivalent film half-height: `2 * atan(half_height /
/// focal)`. Since `half_height` is itself proportional to `focal`
/// (`18 * focal / 35`), the ratio — and so the angle — is independent of the
/// focal distance actually chosen; it comes out to `2 * atan(18 / 35) ≈
/// 54.5°`. Reported in the CLI header as the effective field of view.
pub fn default_vfov_degrees() -> f64 {
    2.0 * (film_half_height(DEFAULT_FOCAL_LENGTH) / DEFAULT_FOCAL_LENGTH).atan().to_degrees()
}

/// A pinhole camera. Builds an orthonormal basis (u right, v up, n back)
/// from look-from / look-at / up, then positions the image plane a fixed
/// focal distance ([`DEFAULT_FOCAL_LENGTH`]) in front of the eye along the
/// reverse-view axis, sized by the 35mm-film-equivalent half-height/width —
/// there is no separately configurable field of view. No depth of field or
/// lens aperture — `super` (supersampling) is the only jitter this renderer
/// applies to a primary ray, spread across sub-pixel offsets rather than
/// across a lens disk.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    origin: Point3,
    lower_left: Point3,
    u: Vec3,
    v: Vec3,
    step_x: f64,
    step_y: f64,
}

impl Camera {
    /// `width`/`height` set the aspect ratio of the image plane and the
    /// per-pixel step size.
    pub fn new(look_from: Point3, look_at: Point3, vup: Vec3, width: u32, height: u32) -> Self {
        let focal = DEFAULT_FOCAL_LENGTH;
        let half_height = film_half_height(focal);
        let half_width = half_height * (width as f64 / height as f64);

        let n = (look_from - look_at).normalized();
        let u = vup.cross(n).normalized();
        let v = n.cross(u);

        let lower_left = look_from - n * focal - u * half_width + v * half_height;
        let step_x = (2.0 * half_width) / width as f64;
        let step_y = (2.0 * half_height) / height as f64;

        Self {
            origin: look_from,
            lower_left,
            u,
            v,
            step_x,
            step_y,
        }
    }

    /// Generates the primary ray for pixel `(x, y)` (row 0 at the top,
    /// growing downward, matching the framebuffer's row-major layout) with a
    /// sub-pixel jitter offset `(jx, jy)` in `[0, 1)` supplied by the
    /// caller's per-tile PRNG for supersampling.
    pub fn get_ray(&self, x: u32, y: u32, jx: f64, jy: f64) -> Ray {
        let px = x as f64 + jx;
        let py = y as f64 + jy;
        let point_on_plane = self.lower_left + self.u * (px * self.step_x) - self.v * (py * self.step_y);
        let direction = point_on_plane - self.origin;
        Ray::new(self.origin, direction.normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_pixel_ray_points_toward_look_at() {
        let camera = Camera::new(Point3::new(0.0, 0.0, -5.0), Point3::zero(), Vec3::unit_y(), 64, 64);
        let ray = camera.get_ray(32, 32, 0.5, 0.5);
        assert!(ray.direction.dot(Vec3::unit_z()) > 0.99);
    }

    #[test]
    fn default_vfov_matches_35mm_film_derivation() {
        let expected = 2.0 * (18.0_f64 / 35.0).atan().to_degrees();
        assert!((default_vfov_degrees() - expected).abs() < 1e-9);
        assert!((default_vfov_degrees() - 54.5).abs() < 0.5);
    }

    #[test]
    fn top_row_ray_points_above_bottom_row_ray() {
        let camera = Camera::new(Point3::new(0.0, 0.0, -5.0), Point3::zero(), Vec3::unit_y(), 64, 64);
        let top = camera.get_ray(32, 0, 0.5, 0.5);
        let bottom = camera.get_ray(32, 63, 0.5, 0.5);
        assert!(top.direction.y > bottom.direction.y);
    }
}
