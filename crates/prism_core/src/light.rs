//! Light sources.
//!
//! [`Light`] is the form a scene file describes. [`Lighting`] is what the
//! shader consumes: one ambient colour plus flat lists of point, directional
//! and spot lights, with every area light already expanded into points.

use prism_math::{Color, Vec3};
use serde::Deserialize;

/// Grid spacing used when expanding an area light into point lights.
pub const AREA_LIGHT_SPACING: f32 = 0.1;

/// A light as written in a scene file.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Light {
    Ambient {
        color: Color,
    },
    Directional {
        color: Color,
        direction: Vec3,
    },
    Point {
        color: Color,
        position: Vec3,
    },
    Spot {
        color: Color,
        position: Vec3,
        direction: Vec3,
        /// Half-angle of the cone, in degrees
        cutoff: f32,
    },
    Area {
        color: Color,
        start: Vec3,
        end: Vec3,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub position: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    /// Direction the light travels in (not towards the light)
    pub direction: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub color: Color,
    pub position: Vec3,
    pub direction: Vec3,
    pub cutoff_degrees: f32,
}

impl SpotLight {
    /// Whether `point` lies inside the cone. The boundary counts as inside.
    pub fn illuminates(&self, point: Vec3) -> bool {
        let to_point = point - self.position;
        let cos = self.direction.dot(to_point) / (self.direction.length() * to_point.length());
        cos.clamp(-1.0, 1.0).acos() <= self.cutoff_degrees.to_radians()
    }
}

/// Expand an area light spanning `start`..`end` into a grid of point lights.
///
/// `x` runs up from `start.x` to `end.x` and `z` runs down from `start.z`
/// to `end.z`, both at [`AREA_LIGHT_SPACING`], at height `start.y`. Each
/// point gets the area colour divided by the number of spacing steps along
/// each axis. The caller must ensure `end.x > start.x` and `start.z > end.z`.
pub fn expand_area_light(color: Color, start: Vec3, end: Vec3) -> Vec<PointLight> {
    let span_x = (end.x - start.x) / AREA_LIGHT_SPACING;
    let span_z = (start.z - end.z) / AREA_LIGHT_SPACING;
    let per_light = color / (span_x * span_z);

    // Integer step counts so rounding in the loop cannot add or drop a row
    let steps_x = (span_x + 1e-3).floor() as usize;
    let steps_z = (span_z + 1e-3).floor() as usize;

    let mut lights = Vec::with_capacity((steps_x + 1) * (steps_z + 1));
    for i in 0..=steps_x {
        let x = start.x + i as f32 * AREA_LIGHT_SPACING;
        for j in 0..=steps_z {
            let z = start.z - j as f32 * AREA_LIGHT_SPACING;
            lights.push(PointLight {
                color: per_light,
                position: Vec3::new(x, start.y, z),
            });
        }
    }
    lights
}

/// All light in a scene, ready for shading.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lighting {
    pub ambient: Color,
    pub points: Vec<PointLight>,
    pub directionals: Vec<DirectionalLight>,
    pub spots: Vec<SpotLight>,
}

impl Lighting {
    /// Add a light. A later ambient light replaces an earlier one; area
    /// lights are expanded into point lights.
    pub fn add(&mut self, light: Light) {
        match light {
            Light::Ambient { color } => self.ambient = color,
            Light::Directional { color, direction } => {
                self.directionals.push(DirectionalLight { color, direction })
            }
            Light::Point { color, position } => self.points.push(PointLight { color, position }),
            Light::Spot {
                color,
                position,
                direction,
                cutoff,
            } => self.spots.push(SpotLight {
                color,
                position,
                direction,
                cutoff_degrees: cutoff,
            }),
            Light::Area { color, start, end } => {
                self.points.extend(expand_area_light(color, start, end))
            }
        }
    }

    /// Number of non-ambient lights.
    pub fn len(&self) -> usize {
        self.points.len() + self.directionals.len() + self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
