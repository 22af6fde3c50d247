//! Surface materials.

use prism_math::Color;
use serde::Deserialize;

/// Refractive index of air, used as the outside medium for every refraction.
pub const AIR_REFRACTIVE_INDEX: f32 = 1.0002926;

/// Phong-style material with Oren-Nayar roughness and mirror/transmission terms.
///
/// Every field is optional in a scene file. Colours and exponents default to
/// zero and the refractive index to that of air.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Ambient reflectance, multiplied by the scene's ambient light
    pub ambient: Color,

    /// Diffuse reflectance (Oren-Nayar)
    pub diffuse: Color,

    /// Specular reflectance (Blinn)
    pub specular: Color,

    /// Specular exponent
    pub shininess: f32,

    /// Oren-Nayar sigma (0 = Lambertian)
    pub roughness: f32,

    /// Mirror reflectance
    pub reflective: Color,

    /// Transmittance
    pub transmissive: Color,

    /// Index of refraction
    #[serde(rename = "refraction")]
    pub refractive_index: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Color::ZERO,
            diffuse: Color::ZERO,
            specular: Color::ZERO,
            shininess: 0.0,
            roughness: 0.0,
            reflective: Color::ZERO,
            transmissive: Color::ZERO,
            refractive_index: AIR_REFRACTIVE_INDEX,
        }
    }
}

impl Material {
    /// Plain diffuse material.
    pub fn diffuse(color: Color) -> Self {
        Self {
            diffuse: color,
            ..Default::default()
        }
    }

    /// True if any channel of the reflective colour is non-zero.
    pub fn is_reflective(&self) -> bool {
        self.reflective != Color::ZERO
    }

    /// True if any channel of the transmissive colour is non-zero.
    pub fn is_transmissive(&self) -> bool {
        self.transmissive != Color::ZERO
    }

    /// Field-by-field arithmetic mean of two materials.
    pub fn average(a: &Material, b: &Material) -> Material {
        Material {
            ambient: (a.ambient + b.ambient) * 0.5,
            diffuse: (a.diffuse + b.diffuse) * 0.5,
            specular: (a.specular + b.specular) * 0.5,
            shininess: (a.shininess + b.shininess) * 0.5,
            roughness: (a.roughness + b.roughness) * 0.5,
            reflective: (a.reflective + b.reflective) * 0.5,
            transmissive: (a.transmissive + b.transmissive) * 0.5,
            refractive_index: (a.refractive_index + b.refractive_index) * 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material() {
        let m = Material::default();
        assert_eq!(m.diffuse, Color::ZERO);
        assert_eq!(m.shininess, 0.0);
        assert_eq!(m.refractive_index, AIR_REFRACTIVE_INDEX);
        assert!(!m.is_reflective());
        assert!(!m.is_transmissive());
    }

    #[test]
    fn test_single_channel_counts() {
        let m = Material {
            reflective: Color::new(0.0, 0.0, 0.1),
            ..Default::default()
        };
        assert!(m.is_reflective());
    }

    #[test]
    fn test_average() {
        let a = Material {
            diffuse: Color::new(1.0, 0.0, 0.0),
            shininess: 10.0,
            refractive_index: 1.5,
            ..Default::default()
        };
        let b = Material {
            diffuse: Color::new(0.0, 0.0, 1.0),
            shininess: 30.0,
            refractive_index: 2.5,
            ..Default::default()
        };

        let avg = Material::average(&a, &b);
        assert_eq!(avg.diffuse, Color::new(0.5, 0.0, 0.5));
        assert_eq!(avg.shininess, 20.0);
        assert_eq!(avg.refractive_index, 2.0);
    }

    #[test]
    fn test_deserialize_partial() {
        let m: Material =
            serde_json::from_str(r#"{ "diffuse": [0.2, 0.4, 0.6], "refraction": 1.33 }"#)
                .unwrap();
        assert_eq!(m.diffuse, Color::new(0.2, 0.4, 0.6));
        assert_eq!(m.refractive_index, 1.33);
        assert_eq!(m.specular, Color::ZERO);
    }
}
