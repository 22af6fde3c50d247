//! Scene container.
//!
//! Shapes live in a single arena addressed by [`ShapeId`]. The scene keeps
//! the ids of bounded shapes (spheres, triangles, composites) apart from the
//! ids of planes, since only the former go into the spatial index.

use prism_math::{Aabb, Color, Vec3};

use crate::light::{Light, Lighting};
use crate::shape::Shape;

/// Default vertical field of view, in degrees.
pub const DEFAULT_FOV: f32 = 60.0;

/// Index of a shape in its [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub usize);

#[derive(Clone, Debug)]
pub struct Scene {
    /// Scene name (file stem when loaded from disk)
    pub name: String,

    /// Vertical field of view in degrees
    pub fov: f32,

    /// Colour returned for rays that hit nothing
    pub background: Color,

    /// Logical viewpoint used to correct the view direction at hit points
    pub eye: Vec3,

    pub lighting: Lighting,

    shapes: Vec<Shape>,
    bounded: Vec<ShapeId>,
    planes: Vec<ShapeId>,
    bounds: Option<Aabb>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fov: DEFAULT_FOV,
            background: Color::ZERO,
            eye: Vec3::ZERO,
            lighting: Lighting::default(),
            shapes: Vec::new(),
            bounded: Vec::new(),
            planes: Vec::new(),
            bounds: None,
        }
    }

    /// Add a shape and return its id.
    pub fn add_shape(&mut self, shape: impl Into<Shape>) -> ShapeId {
        let shape = shape.into();
        let id = ShapeId(self.shapes.len());

        match shape.bounding_box() {
            Some(bbox) => {
                self.bounds = Some(match self.bounds {
                    Some(bounds) => Aabb::surrounding(&bounds, &bbox),
                    None => bbox,
                });
                self.bounded.push(id);
            }
            None => self.planes.push(id),
        }

        self.shapes.push(shape);
        id
    }

    pub fn add_light(&mut self, light: Light) {
        self.lighting.add(light);
    }

    /// Get a shape by id.
    ///
    /// Panics if the id did not come from this scene.
    pub fn shape(&self, id: ShapeId) -> &Shape {
        &self.shapes[id.0]
    }

    /// All shapes in insertion order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Ids of shapes that have a bounding box.
    pub fn bounded(&self) -> &[ShapeId] {
        &self.bounded
    }

    /// Ids of planes.
    pub fn planes(&self) -> &[ShapeId] {
        &self.planes
    }

    /// Union of every bounded shape's box, `None` when there are none.
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }
}
