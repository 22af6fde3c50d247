//! Prism Renderer - Whitted-style ray tracing
//!
//! Evaluates rays against a [`prism_core::Scene`] through an octree, with
//! Oren-Nayar/Blinn direct lighting, shadow rays, bounded mirror recursion
//! and single-bounce refraction with a Fresnel blend.

mod bucket;
mod camera;
mod hittable;
mod octree;
mod renderer;
mod shading;
mod stats;
mod tracer;

pub use bucket::{generate_buckets, render_bucket, Bucket, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use hittable::{closest_hit, Geometry, Hittable, SurfaceSample, FAR_LIMIT, HIT_EPSILON};
pub use octree::{LeafVisit, Node, NodeId, Octree, OctreeStats, MIN_NODE_EXTENT};
pub use renderer::{color_to_rgba, render, render_pixel, ImageBuffer, RenderConfig, RenderError};
pub use shading::{LightKind, OrenNayar};
pub use stats::{RayCounts, RayStats};
pub use tracer::{mirror_direction, refract, schlick, Sample, World, MIRROR_DEPTH};

/// Re-export common math types from prism_math
pub use prism_math::{Aabb, Color, Interval, Ray, Vec3};
