//! Scene geometry.
//!
//! Every bounded shape computes its bounding box once, at construction, and
//! keeps it private so it can never drift from the geometry. Planes are
//! unbounded and report no box.

use prism_math::{Aabb, Vec3};

use crate::material::Material;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
    bbox: Aabb,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A triangle with counter-clockwise winding.
///
/// The geometric normal is `normalize((v1 - v0) x (v2 - v1))`. A degenerate
/// triangle ends up with a NaN normal and is never hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    vertices: [Vec3; 3],
    normal: Vec3,
    material: Material,
    bbox: Aabb,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        let normal = (v1 - v0).cross(v2 - v1).normalize();
        let bbox = Aabb::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2));

        Self {
            vertices: [v0, v1, v2],
            normal,
            material,
            bbox,
        }
    }

    pub fn vertices(&self) -> &[Vec3; 3] {
        &self.vertices
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    /// Inside test for a point already on the triangle's plane: every edge
    /// must turn strictly the same way as the normal.
    pub fn contains(&self, point: Vec3) -> bool {
        let [v0, v1, v2] = self.vertices;
        [(v0, v1), (v1, v2), (v2, v0)]
            .iter()
            .all(|&(a, b)| (b - a).cross(point - a).dot(self.normal) > 0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    material: Material,
}

impl Plane {
    /// The normal is normalised here.
    pub fn new(point: Vec3, normal: Vec3, material: Material) -> Self {
        Self {
            point,
            normal: normal.normalize(),
            material,
        }
    }

    pub fn point(&self) -> Vec3 {
        self.point
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

/// Boolean operator of a composite shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CsgOp {
    Intersection,
    Union,
    /// First minus second
    Difference,
}

/// Boolean combination of two spheres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Composite {
    op: CsgOp,
    first: Sphere,
    second: Sphere,
    bbox: Aabb,
}

impl Composite {
    pub fn new(op: CsgOp, first: Sphere, second: Sphere) -> Self {
        let bbox = Aabb::surrounding(&first.bounding_box(), &second.bounding_box());
        Self {
            op,
            first,
            second,
            bbox,
        }
    }

    pub fn op(&self) -> CsgOp {
        self.op
    }

    pub fn first(&self) -> &Sphere {
        &self.first
    }

    pub fn second(&self) -> &Sphere {
        &self.second
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Any shape the tracer can intersect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Triangle(Triangle),
    Plane(Plane),
    Composite(Composite),
}

impl Shape {
    /// Bounding box, or `None` for unbounded shapes.
    pub fn bounding_box(&self) -> Option<Aabb> {
        match self {
            Shape::Sphere(s) => Some(s.bounding_box()),
            Shape::Triangle(t) => Some(t.bounding_box()),
            Shape::Composite(c) => Some(c.bounding_box()),
            Shape::Plane(_) => None,
        }
    }

    pub fn is_bounded(&self) -> bool {
        !matches!(self, Shape::Plane(_))
    }

    /// Short lowercase name, for logs and pick reports.
    pub fn label(&self) -> &'static str {
        match self {
            Shape::Sphere(_) => "sphere",
            Shape::Triangle(_) => "triangle",
            Shape::Plane(_) => "plane",
            Shape::Composite(c) => match c.op() {
                CsgOp::Intersection => "intersection",
                CsgOp::Union => "union",
                CsgOp::Difference => "difference",
            },
        }
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<Triangle> for Shape {
    fn from(t: Triangle) -> Self {
        Shape::Triangle(t)
    }
}

impl From<Plane> for Shape {
    fn from(p: Plane) -> Self {
        Shape::Plane(p)
    }
}

impl From<Composite> for Shape {
    fn from(c: Composite) -> Self {
        Shape::Composite(c)
    }
}
