//! Prism Core - scene model and scene file loading.
//!
//! This crate provides:
//!
//! - **Scene model**: `Scene`, `Shape` (sphere, triangle, plane, CSG composite),
//!   `Material` and the light types
//! - **Loader**: JSON scene files, with mesh transformation and area-light
//!   expansion applied at load time
//!
//! # Example
//!
//! ```ignore
//! use prism_core::load_scene;
//!
//! let scene = load_scene("scenes/spheres.json")?;
//! println!("{} shapes, {} planes", scene.shape_count(), scene.planes().len());
//! ```

pub mod light;
pub mod loader;
pub mod material;
pub mod scene;
pub mod shape;

// Re-export commonly used types
pub use light::{DirectionalLight, Light, Lighting, PointLight, SpotLight};
pub use loader::{load_scene, load_scene_from_str, LoadError, LoadResult};
pub use material::{Material, AIR_REFRACTIVE_INDEX};
pub use scene::{Scene, ShapeId};
pub use shape::{Composite, CsgOp, Plane, Shape, Sphere, Triangle};
