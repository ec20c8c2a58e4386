use crate::math::Vec3;

/// An RGB colour in `[0, 1]` per channel plus an `intensity` weight (also in
/// `[0, 1]`) that modulates how strongly this colour contributes during
/// shading — e.g. a material's `diff`/`spec` colours are scaled by their own
/// intensity before being multiplied by the light's attenuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub intensity: f64,
}

impl Colour {
    pub const fn new(r: f64, g: f64, b: f64, intensity: f64) -> Self {
        Self { r, g, b, intensity }
    }

    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// The colour as a plain vector, scaled by its own intensity — this is
    /// the value diffuse/specular shading actually multiplies against the
    /// per-light attenuation.
    #[inline]
    pub fn weighted(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b) * self.intensity
    }
}

impl From<Vec3> for Colour {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z, 1.0)
    }
}

/// A surface material, addressed by a stable `usize` index into
/// [`crate::scene::Scene::materials`]. Index 0 is reserved for the DEFAULT
/// fallback material used whenever a primitive or mesh references a name
/// that no material bears — its diffuse colour is an intentionally
/// conspicuous hot pink so unresolved material names are visually obvious
/// rather than silently wrong.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub reflect: f64,
    pub refract: f64,
    pub ior: f64,
    pub diff: Colour,
    pub spec: Colour,
}

impl Material {
    pub fn new(name: impl Into<String>, reflect: f64, refract: f64, ior: f64, diff: Colour, spec: Colour) -> Self {
        Self {
            name: name.into(),
            reflect,
            refract,
            ior,
            diff,
            spec,
        }
    }

    /// The universal fallback for unresolved material references: opaque,
    /// non-reflective, vivid magenta diffuse.
    pub fn default_material() -> Self {
        Self::new(
            "DEFAULT",
            0.0,
            0.0,
            1.0,
            Colour::new(1.0, 0.0, 0.870588235294, 1.0),
            Colour::black(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_material_is_hot_pink_and_inert() {
        let m = Material::default_material();
        assert_eq!(m.reflect, 0.0);
        assert_eq!(m.refract, 0.0);
        assert!((m.diff.r - 1.0).abs() < 1e-12);
        assert!((m.diff.g - 0.0).abs() < 1e-12);
        assert!((m.diff.b - 0.870588235294).abs() < 1e-12);
    }
}
