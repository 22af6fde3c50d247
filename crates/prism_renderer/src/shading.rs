//! Direct lighting.
//!
//! Oren-Nayar diffuse plus Blinn specular, summed over every light that is
//! not shadowed, on top of the ambient term.

use prism_core::Material;
use prism_math::{Color, Interval, Ray, Vec3};

use crate::hittable::{Hittable, HIT_EPSILON};
use crate::World;

/// Light kinds that cast shadow rays; they differ in how far an occluder may be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    Point,
    Directional,
    Spot,
}

impl LightKind {
    /// Parameter range in which a hit blocks the light.
    ///
    /// Shadow rays run from the surface (`t = 0`) to the light (`t = 1`).
    /// Directional lights are infinitely far, so anything past the
    /// surface blocks them.
    pub fn shadow_interval(self) -> Interval {
        match self {
            LightKind::Point | LightKind::Spot => Interval::new(HIT_EPSILON, 1.0),
            LightKind::Directional => Interval::new(HIT_EPSILON, f32::INFINITY),
        }
    }
}

/// Oren-Nayar A and B coefficients for a roughness sigma.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrenNayar {
    pub a: f32,
    pub b: f32,
}

impl OrenNayar {
    pub fn new(sigma: f32) -> Self {
        let s2 = sigma * sigma;
        Self {
            a: 1.0 - 0.5 * s2 / (s2 + 0.33),
            b: 0.45 * s2 / (s2 + 0.09),
        }
    }
}

/// Per-hit quantities that do not depend on the light.
struct ShadingFrame {
    normal: Vec3,
    view: Vec3,
    theta_r: f32,
    view_tangent: Vec3,
    oren_nayar: OrenNayar,
}

impl ShadingFrame {
    fn new(normal: Vec3, view: Vec3, roughness: f32) -> Self {
        let n_dot_v = normal.dot(view);
        Self {
            normal,
            view,
            theta_r: n_dot_v.clamp(-1.0, 1.0).acos(),
            view_tangent: (view - normal * n_dot_v.clamp(0.0, 1.0)).normalize_or_zero(),
            oren_nayar: OrenNayar::new(roughness),
        }
    }

    /// Diffuse plus specular from one unshadowed light arriving along `light_dir`.
    fn contribution(&self, material: &Material, light_dir: Vec3, light_color: Color) -> Color {
        let n = self.normal;
        let n_dot_l = n.dot(light_dir);

        let theta_i = n_dot_l.clamp(-1.0, 1.0).acos();
        let alpha = theta_i.max(self.theta_r);
        let beta = theta_i.min(self.theta_r);
        let light_tangent = (light_dir - n * n_dot_l.clamp(0.0, 1.0)).normalize_or_zero();

        let OrenNayar { a, b } = self.oren_nayar;
        let oren_nayar =
            a + b * self.view_tangent.dot(light_tangent).max(0.0) * alpha.sin() * beta.tan();
        let mut color = material.diffuse * n_dot_l.max(0.0) * oren_nayar * light_color;

        if n_dot_l >= 0.0 {
            let half = (light_dir + self.view).normalize_or_zero();
            color += light_color * material.specular * n.dot(half).max(0.0).powf(material.shininess);
        }

        color
    }
}

impl World {
    /// Whether anything in the bounded-shape list blocks the way from
    /// `point` towards `target`.
    ///
    /// Shadow rays test the shape list directly, without the octree. Planes
    /// are not in that list and never cast shadows.
    pub fn is_shadowed(&self, point: Vec3, target: Vec3, kind: LightKind) -> bool {
        self.stats().record_shadow_test();
        let ray = Ray::through(point, target);
        let bound = kind.shadow_interval();
        let scene = self.scene();
        scene
            .bounded()
            .iter()
            .any(|&id| scene.shape(id).occludes(&ray, bound))
    }

    /// Direct lighting at `point` seen from direction `view` (towards the viewer).
    pub fn shade(&self, material: &Material, point: Vec3, normal: Vec3, view: Vec3) -> Color {
        let lighting = &self.scene().lighting;
        let frame = ShadingFrame::new(normal, view, material.roughness);

        let mut color = lighting.ambient * material.ambient;

        for light in &lighting.points {
            if self.is_shadowed(point, light.position, LightKind::Point) {
                continue;
            }
            let light_dir = (light.position - point).normalize();
            color += frame.contribution(material, light_dir, light.color);
        }

        for light in &lighting.directionals {
            if self.is_shadowed(point, point - light.direction, LightKind::Directional) {
                continue;
            }
            let light_dir = -light.direction.normalize();
            color += frame.contribution(material, light_dir, light.color);
        }

        for light in &lighting.spots {
            if !light.illuminates(point)
                || self.is_shadowed(point, light.position, LightKind::Spot)
            {
                continue;
            }
            let light_dir = -light.direction.normalize();
            color += frame.contribution(material, light_dir, light.color);
        }

        color
    }
}
