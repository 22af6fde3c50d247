//! Hittable trait and SurfaceSample for ray-shape intersection.
//!
//! Ray directions are never normalised: a ray built with [`Ray::through`]
//! reaches its target at `t = 1`. Only the smaller root of a sphere is ever
//! considered, so a ray starting inside a sphere does not see its far wall.

use prism_core::{Composite, CsgOp, Material, Plane, Shape, Sphere, Triangle};
use prism_math::{Interval, Ray, Vec3};

/// Minimum parameter for a hit to count, to stop surfaces shadowing themselves.
pub const HIT_EPSILON: f32 = 0.001;

/// Initial upper bound on `t` for closest-hit queries.
pub const FAR_LIMIT: f32 = 10000.0;

/// Geometry of the hit surface needed by refraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Spheres and composites: refraction solves for the far-side exit point.
    Sphere { center: Vec3, radius: f32 },
    /// Triangles and planes refract once at the hit point.
    Flat,
}

/// Record of a ray-shape intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Geometric surface normal (outward, not flipped towards the ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: Material,
    pub geometry: Geometry,
}

/// Trait for shapes that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// The intersection with `t` strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<SurfaceSample>;

    /// Whether the shape blocks the ray somewhere strictly inside `ray_t`.
    fn occludes(&self, ray: &Ray, ray_t: Interval) -> bool;
}

/// Smaller root of the ray-sphere quadratic, if the line meets the sphere.
fn nearest_root(center: Vec3, radius: f32, ray: &Ray) -> Option<f32> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    if a == 0.0 {
        return None;
    }
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    Some((h - discriminant.sqrt()) / a)
}

fn sphere_sample(sphere: &Sphere, ray: &Ray, t: f32) -> SurfaceSample {
    let point = ray.at(t);
    SurfaceSample {
        t,
        point,
        normal: (point - sphere.center()).normalize(),
        material: *sphere.material(),
        geometry: Geometry::Sphere {
            center: sphere.center(),
            radius: sphere.radius(),
        },
    }
}

fn sphere_root(sphere: &Sphere, ray: &Ray, ray_t: Interval) -> Option<f32> {
    nearest_root(sphere.center(), sphere.radius(), ray).filter(|t| ray_t.surrounds(*t))
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<SurfaceSample> {
        sphere_root(self, ray, ray_t).map(|t| sphere_sample(self, ray, t))
    }

    fn occludes(&self, ray: &Ray, ray_t: Interval) -> bool {
        sphere_root(self, ray, ray_t).is_some()
    }
}

/// Parameter at which the ray crosses the plane through `point` with `normal`.
fn plane_root(point: Vec3, normal: Vec3, ray: &Ray) -> Option<f32> {
    let denom = normal.dot(ray.direction());
    if denom == 0.0 {
        return None;
    }
    Some(normal.dot(point - ray.origin()) / denom)
}

fn triangle_root(triangle: &Triangle, ray: &Ray, ray_t: Interval) -> Option<f32> {
    let t = plane_root(triangle.vertices()[0], triangle.normal(), ray)?;
    if !ray_t.surrounds(t) || !triangle.contains(ray.at(t)) {
        return None;
    }
    Some(t)
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<SurfaceSample> {
        let t = triangle_root(self, ray, ray_t)?;
        Some(SurfaceSample {
            t,
            point: ray.at(t),
            normal: self.normal(),
            material: *self.material(),
            geometry: Geometry::Flat,
        })
    }

    fn occludes(&self, ray: &Ray, ray_t: Interval) -> bool {
        triangle_root(self, ray, ray_t).is_some()
    }
}

fn infinite_plane_root(plane: &Plane, ray: &Ray, ray_t: Interval) -> Option<f32> {
    plane_root(plane.point(), plane.normal(), ray).filter(|t| ray_t.surrounds(*t))
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<SurfaceSample> {
        let t = infinite_plane_root(self, ray, ray_t)?;
        Some(SurfaceSample {
            t,
            point: ray.at(t),
            normal: self.normal(),
            material: *self.material(),
            geometry: Geometry::Flat,
        })
    }

    fn occludes(&self, ray: &Ray, ray_t: Interval) -> bool {
        infinite_plane_root(self, ray, ray_t).is_some()
    }
}

impl Hittable for Composite {
    /// Each sub-sphere is solved on its own against `ray_t`.
    ///
    /// When both sub-spheres count, the hit takes the nearer `t` and the
    /// averaged material, while its normal, center and radius come from the
    /// first sphere (normal evaluated at the first sphere's own root).
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<SurfaceSample> {
        let (a, b) = (self.first(), self.second());
        let ta = sphere_root(a, ray, ray_t);
        let tb = sphere_root(b, ray, ray_t);

        match (self.op(), ta, tb) {
            (CsgOp::Intersection | CsgOp::Union, Some(ta), Some(tb)) => {
                let mut sample = sphere_sample(a, ray, ta);
                sample.t = ta.min(tb);
                sample.point = ray.at(sample.t);
                sample.material = Material::average(a.material(), b.material());
                Some(sample)
            }
            (CsgOp::Union | CsgOp::Difference, Some(ta), None) => Some(sphere_sample(a, ray, ta)),
            (CsgOp::Union, None, Some(tb)) => Some(sphere_sample(b, ray, tb)),
            _ => None,
        }
    }

    fn occludes(&self, ray: &Ray, ray_t: Interval) -> bool {
        let ha = self.first().occludes(ray, ray_t);
        let hb = self.second().occludes(ray, ray_t);
        match self.op() {
            CsgOp::Intersection => ha && hb,
            CsgOp::Union => ha || hb,
            CsgOp::Difference => ha && !hb,
        }
    }
}

impl Hittable for Shape {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<SurfaceSample> {
        match self {
            Shape::Sphere(s) => s.hit(ray, ray_t),
            Shape::Triangle(t) => t.hit(ray, ray_t),
            Shape::Plane(p) => p.hit(ray, ray_t),
            Shape::Composite(c) => c.hit(ray, ray_t),
        }
    }

    fn occludes(&self, ray: &Ray, ray_t: Interval) -> bool {
        match self {
            Shape::Sphere(s) => s.occludes(ray, ray_t),
            Shape::Triangle(t) => t.occludes(ray, ray_t),
            Shape::Plane(p) => p.occludes(ray, ray_t),
            Shape::Composite(c) => c.occludes(ray, ray_t),
        }
    }
}

/// Nearest hit among `shapes` with `HIT_EPSILON < t < FAR_LIMIT`.
///
/// Shapes are tested in order, each against the closest `t` found so far.
pub fn closest_hit<'a>(
    ray: &Ray,
    shapes: impl IntoIterator<Item = &'a Shape>,
) -> Option<SurfaceSample> {
    let mut closest_so_far = FAR_LIMIT;
    let mut best = None;

    for shape in shapes {
        if let Some(sample) = shape.hit(ray, Interval::new(HIT_EPSILON, closest_so_far)) {
            closest_so_far = sample.t;
            best = Some(sample);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_math::Color;

    fn red() -> Material {
        Material::diffuse(Color::new(1.0, 0.0, 0.0))
    }

    fn blue() -> Material {
        Material::diffuse(Color::new(0.0, 0.0, 1.0))
    }

    fn open() -> Interval {
        Interval::new(HIT_EPSILON, FAR_LIMIT)
    }

    #[test]
    fn test_sphere_straight_on() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, red());
        let ray = Ray::through(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let hit = sphere.hit(&ray, open()).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-4);
        assert!((hit.normal.length() - 1.0).abs() < 1e-5);
        assert!(hit.normal.dot(hit.point - sphere.center()) > 0.0);
        assert_eq!(
            hit.geometry,
            Geometry::Sphere {
                center: sphere.center(),
                radius: 1.0
            }
        );
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, red());
        let ray = Ray::through(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, open()).is_none());
    }

    #[test]
    fn test_sphere_from_inside_sees_nothing() {
        // Smaller root is behind the origin; the far wall is never reported
        let sphere = Sphere::new(Vec3::ZERO, 2.0, red());
        let ray = Ray::through(Vec3::ZERO, Vec3::X);
        assert!(sphere.hit(&ray, open()).is_none());
    }

    #[test]
    fn test_zero_length_ray() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, red());
        let ray = Ray::through(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, 3.0));
        assert!(sphere.hit(&ray, open()).is_none());
    }

    #[test]
    fn test_triangle_hit_and_miss() {
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, -3.0),
            Vec3::new(1.0, -1.0, -3.0),
            Vec3::new(0.0, 1.0, -3.0),
            red(),
        );

        let hit = tri
            .hit(&Ray::through(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0)), open())
            .unwrap();
        assert!((hit.t - 3.0).abs() < 1e-5);
        assert_eq!(hit.geometry, Geometry::Flat);

        let outside = Ray::through(Vec3::ZERO, Vec3::new(0.9, 0.9, -3.0));
        assert!(tri.hit(&outside, open()).is_none());

        // Parallel to the triangle's plane
        let parallel = Ray::through(Vec3::ZERO, Vec3::X);
        assert!(tri.hit(&parallel, open()).is_none());
    }

    #[test]
    fn test_plane_hit() {
        let floor = Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 2.0, 0.0), red());
        let ray = Ray::through(Vec3::ZERO, Vec3::new(0.0, -0.5, -1.0));

        let hit = floor.hit(&ray, open()).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Y);
        assert!((hit.point.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_closest_hit_picks_nearest() {
        let near = Shape::from(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 0.5, red()));
        let far = Shape::from(Sphere::new(Vec3::new(0.0, 0.0, -8.0), 0.5, blue()));
        let ray = Ray::through(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        // Order of testing does not matter for plain spheres
        for shapes in [[&far, &near], [&near, &far]] {
            let hit = closest_hit(&ray, shapes).unwrap();
            assert!((hit.t - 2.5).abs() < 1e-4);
            assert_eq!(hit.material, red());
        }
    }

    #[test]
    fn test_closest_hit_respects_far_limit() {
        let distant = Shape::from(Sphere::new(Vec3::new(0.0, 0.0, -20000.0), 1.0, red()));
        let ray = Ray::through(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(closest_hit(&ray, [&distant]).is_none());
    }

    // Two unit spheres overlapping around the origin along x, viewed from +z.
    fn pair(op: CsgOp) -> Composite {
        Composite::new(
            op,
            Sphere::new(Vec3::new(-0.5, 0.0, -5.0), 1.0, red()),
            Sphere::new(Vec3::new(0.5, 0.0, -5.0), 1.0, blue()),
        )
    }

    fn ray_at_x(x: f32) -> Ray {
        Ray::through(Vec3::new(x, 0.0, 0.0), Vec3::new(x, 0.0, -1.0))
    }

    #[test]
    fn test_union() {
        let union = pair(CsgOp::Union);

        let left = union.hit(&ray_at_x(-1.2), open()).unwrap();
        assert_eq!(left.material, red());

        let right = union.hit(&ray_at_x(1.2), open()).unwrap();
        assert_eq!(right.material, blue());
        assert_eq!(
            right.geometry,
            Geometry::Sphere {
                center: Vec3::new(0.5, 0.0, -5.0),
                radius: 1.0
            }
        );

        let both = union.hit(&ray_at_x(0.0), open()).unwrap();
        assert_eq!(both.material.diffuse, Color::new(0.5, 0.0, 0.5));

        assert!(union.hit(&ray_at_x(2.0), open()).is_none());
    }

    #[test]
    fn test_intersection() {
        let lens = pair(CsgOp::Intersection);

        assert!(lens.hit(&ray_at_x(-1.2), open()).is_none());
        assert!(lens.hit(&ray_at_x(1.2), open()).is_none());

        let hit = lens.hit(&ray_at_x(0.2), open()).unwrap();
        // Nearer of the two roots; geometry from the first sphere
        let ta = nearest_root(Vec3::new(-0.5, 0.0, -5.0), 1.0, &ray_at_x(0.2)).unwrap();
        let tb = nearest_root(Vec3::new(0.5, 0.0, -5.0), 1.0, &ray_at_x(0.2)).unwrap();
        assert_eq!(hit.t, ta.min(tb));
        assert!(matches!(hit.geometry, Geometry::Sphere { center, .. } if center.x == -0.5));
    }

    #[test]
    fn test_difference() {
        let diff = pair(CsgOp::Difference);

        // Only A
        let hit = diff.hit(&ray_at_x(-1.2), open()).unwrap();
        assert_eq!(hit.material, red());

        // A and B overlap here, so A - B is empty along this ray
        assert!(diff.hit(&ray_at_x(0.0), open()).is_none());

        // Only B
        assert!(diff.hit(&ray_at_x(1.2), open()).is_none());
    }

    #[test]
    fn test_occludes_respects_bound() {
        let blocker = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, red());
        let ray = Ray::through(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0));

        assert!(blocker.occludes(&ray, Interval::new(HIT_EPSILON, 1.0)));

        // Light closer than the blocker
        let short = Ray::through(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));
        assert!(!blocker.occludes(&short, Interval::new(HIT_EPSILON, 1.0)));
        assert!(blocker.occludes(&short, Interval::new(HIT_EPSILON, f32::INFINITY)));
    }

    #[test]
    fn test_composite_occludes() {
        let ray = ray_at_x(1.2);
        let bound = Interval::new(HIT_EPSILON, f32::INFINITY);

        assert!(pair(CsgOp::Union).occludes(&ray, bound));
        assert!(!pair(CsgOp::Intersection).occludes(&ray, bound));
        assert!(!pair(CsgOp::Difference).occludes(&ray, bound));
        assert!(pair(CsgOp::Difference).occludes(&ray_at_x(-1.2), bound));
    }
}
