//! JSON scene loading.
//!
//! A scene file has three top-level sections, all optional:
//!
//! ```json
//! {
//!   "camera":  { "field": 60, "background": [0, 0, 0], "eye": [0, 0, 0] },
//!   "lights":  [ { "type": "point", "color": [1, 1, 1], "position": [0, 5, 0] } ],
//!   "objects": [ { "type": "sphere", "position": [0, 0, -4], "radius": 1,
//!                  "material": { "diffuse": [0.8, 0.2, 0.2] } } ]
//! }
//! ```
//!
//! Meshes are flattened into triangles after their transformation is applied,
//! and area lights are expanded into point lights.

use std::path::Path;

use prism_math::{Color, Mat3, Vec3};
use serde::Deserialize;
use thiserror::Error;

use crate::light::Light;
use crate::material::Material;
use crate::scene::Scene;
use crate::shape::{Composite, CsgOp, Plane, Sphere, Triangle};

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid object: {0}")]
    InvalidObject(String),

    #[error("Invalid light: {0}")]
    InvalidLight(String),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Deserialize)]
struct SceneFile {
    #[serde(default)]
    camera: CameraDesc,
    #[serde(default)]
    lights: Vec<Light>,
    #[serde(default)]
    objects: Vec<ObjectDesc>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CameraDesc {
    field: Option<f32>,
    background: Option<Color>,
    eye: Option<Vec3>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ObjectDesc {
    Sphere(SphereDesc),
    Plane {
        position: Vec3,
        normal: Vec3,
        #[serde(default)]
        material: Material,
    },
    Mesh {
        triangles: Vec<[Vec3; 3]>,
        #[serde(default)]
        material: Material,
        transformation: Option<MeshTransform>,
    },
    Intersection {
        objects: Vec<SphereDesc>,
    },
    Union {
        objects: Vec<SphereDesc>,
    },
    Difference {
        objects: Vec<SphereDesc>,
    },
}

#[derive(Deserialize)]
struct SphereDesc {
    position: Vec3,
    radius: f32,
    #[serde(default)]
    material: Material,
}

/// Mesh placement: rotate and scale about the barycenter, then translate.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct MeshTransform {
    /// Rotation angle in degrees
    pub rotation: f32,
    /// 1 = X, 2 = Y, anything else = Z
    #[serde(rename = "axisOfrotation")]
    pub axis: u32,
    pub scale: Vec3,
    pub translation: Vec3,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            axis: 3,
            scale: Vec3::ONE,
            translation: Vec3::ZERO,
        }
    }
}

impl MeshTransform {
    fn rotation_axis(&self) -> Vec3 {
        match self.axis {
            1 => Vec3::X,
            2 => Vec3::Y,
            _ => Vec3::Z,
        }
    }

    /// Apply the transform in place, pivoting about the mean of all vertices.
    pub fn apply(&self, triangles: &mut [[Vec3; 3]]) {
        let count = triangles.len() * 3;
        if count == 0 {
            return;
        }
        let barycenter = triangles.iter().flatten().copied().sum::<Vec3>() / count as f32;

        let linear = Mat3::from_diagonal(self.scale)
            * Mat3::from_axis_angle(self.rotation_axis(), self.rotation.to_radians());

        for vertex in triangles.iter_mut().flatten() {
            *vertex = linear * (*vertex - barycenter) + barycenter + self.translation;
        }
    }
}

/// Load a scene from a JSON file.
///
/// The scene is named after the file stem.
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<Scene> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");

    let json = std::fs::read_to_string(path)?;
    load_scene_from_str(&json, name)
}

/// Load a scene from a JSON string.
pub fn load_scene_from_str(json: &str, name: &str) -> LoadResult<Scene> {
    let file: SceneFile = serde_json::from_str(json)?;
    let mut scene = Scene::new(name);

    if let Some(fov) = file.camera.field {
        scene.fov = fov;
    }
    if let Some(background) = file.camera.background {
        scene.background = background;
    }
    if let Some(eye) = file.camera.eye {
        scene.eye = eye;
    }
    log::debug!(
        "Camera: fov {}, background {:?}, eye {:?}",
        scene.fov,
        scene.background,
        scene.eye
    );

    for light in file.lights {
        validate_light(&light)?;
        scene.add_light(light);
    }

    for (index, object) in file.objects.into_iter().enumerate() {
        add_object(&mut scene, index, object)?;
    }

    log::info!(
        "Loaded scene '{}': {} shapes ({} planes), {} lights",
        scene.name,
        scene.shape_count(),
        scene.planes().len(),
        scene.lighting.len()
    );

    Ok(scene)
}

fn validate_light(light: &Light) -> LoadResult<()> {
    if let Light::Area { start, end, .. } = light {
        if end.x <= start.x || start.z <= end.z {
            return Err(LoadError::InvalidLight(format!(
                "area light must span +x and -z, got start {start:?} end {end:?}"
            )));
        }
    }
    Ok(())
}

fn add_object(scene: &mut Scene, index: usize, object: ObjectDesc) -> LoadResult<()> {
    match object {
        ObjectDesc::Sphere(desc) => {
            scene.add_shape(build_sphere(index, desc)?);
        }
        ObjectDesc::Plane {
            position,
            normal,
            material,
        } => {
            if normal == Vec3::ZERO {
                return Err(LoadError::InvalidObject(format!(
                    "object {index}: plane normal is zero"
                )));
            }
            scene.add_shape(Plane::new(position, normal, material));
        }
        ObjectDesc::Mesh {
            mut triangles,
            material,
            transformation,
        } => {
            if let Some(transform) = transformation {
                transform.apply(&mut triangles);
            }
            log::debug!("Object {index}: mesh with {} triangles", triangles.len());
            for [v0, v1, v2] in triangles {
                scene.add_shape(Triangle::new(v0, v1, v2, material));
            }
        }
        ObjectDesc::Intersection { objects } => {
            scene.add_shape(build_composite(index, CsgOp::Intersection, objects)?);
        }
        ObjectDesc::Union { objects } => {
            scene.add_shape(build_composite(index, CsgOp::Union, objects)?);
        }
        ObjectDesc::Difference { objects } => {
            scene.add_shape(build_composite(index, CsgOp::Difference, objects)?);
        }
    }
    Ok(())
}

fn build_sphere(index: usize, desc: SphereDesc) -> LoadResult<Sphere> {
    if desc.radius <= 0.0 {
        return Err(LoadError::InvalidObject(format!(
            "object {index}: sphere radius must be positive, got {}",
            desc.radius
        )));
    }
    Ok(Sphere::new(desc.position, desc.radius, desc.material))
}

fn build_composite(index: usize, op: CsgOp, objects: Vec<SphereDesc>) -> LoadResult<Composite> {
    let count = objects.len();
    let mut spheres = objects.into_iter();
    match (spheres.next(), spheres.next(), spheres.next()) {
        (Some(first), Some(second), None) => Ok(Composite::new(
            op,
            build_sphere(index, first)?,
            build_sphere(index, second)?,
        )),
        _ => Err(LoadError::InvalidObject(format!(
            "object {index}: {op:?} needs exactly two spheres, got {count}"
        ))),
    }
}
