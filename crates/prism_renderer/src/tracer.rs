//! Ray evaluation: primary hit, Fresnel split, mirror recursion and refraction.

use prism_core::{Material, Scene, AIR_REFRACTIVE_INDEX};
use prism_math::{Color, Ray, Vec3};

use crate::hittable::{closest_hit, Geometry, SurfaceSample};
use crate::octree::{LeafVisit, Octree};
use crate::stats::RayStats;

/// Mirror bounces followed after the first reflection.
pub const MIRROR_DEPTH: u32 = 3;

/// Result of evaluating one ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub hit: bool,
    pub color: Color,
}

/// An immutable scene together with its octree.
///
/// Shared by reference between render threads.
#[derive(Debug)]
pub struct World {
    scene: Scene,
    octree: Octree,
    stats: RayStats,
}

impl World {
    pub fn new(scene: Scene) -> Self {
        let octree = Octree::build(&scene);
        let tree = octree.stats();
        log::info!(
            "Built octree for '{}': {} nodes, {} leaves, depth {}",
            scene.name,
            tree.nodes,
            tree.leaves,
            tree.max_depth
        );

        Self {
            scene,
            octree,
            stats: RayStats::default(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn octree(&self) -> &Octree {
        &self.octree
    }

    pub fn stats(&self) -> &RayStats {
        &self.stats
    }

    /// Nearest hit along `ray`, testing only the shapes the octree returns.
    pub fn closest_hit(&self, ray: &Ray) -> Option<SurfaceSample> {
        self.stats.record_hit_test();
        let candidates = self.octree.candidates(ray);
        closest_hit(ray, candidates.iter().map(|&id| self.scene.shape(id)))
    }

    /// Colour seen along the ray from `origin` through `target`.
    pub fn evaluate(&self, origin: Vec3, target: Vec3) -> Sample {
        self.stats.record_primary();

        let mut ray = Ray::through(origin, target);
        let Some(hit) = self.closest_hit(&ray) else {
            return Sample {
                hit: false,
                color: self.scene.background,
            };
        };

        if self.scene.eye != ray.origin() {
            ray = shift_to_eye(&ray, hit.point, self.scene.eye);
        }
        let view = (ray.origin() - ray.target()).normalize();

        let mut material = hit.material;
        if material.is_transmissive() {
            let r = schlick(hit.normal.dot(view), material.refractive_index);
            material.reflective = Color::splat(r);
            material.transmissive = Color::splat(1.0 - r);
        }

        let mut color = self.reflect(&hit, &material, view, ray.origin());

        if material.is_transmissive() {
            if let Some(exit) = self.transmit(&hit, &material, ray.origin()) {
                color = (Color::ONE - material.transmissive) * color + material.transmissive * exit;
            }
        }

        Sample { hit: true, color }
    }

    /// Surface colour at a primary hit, with mirror reflection when the
    /// material reflects and the mirror ray finds something.
    fn reflect(&self, hit: &SurfaceSample, material: &Material, view: Vec3, eye: Vec3) -> Color {
        if material.is_reflective() {
            let mirror = Ray::through(hit.point, hit.point + mirror_direction(hit.normal, view));
            if self.closest_hit(&mirror).is_some() {
                return self.mirror_reflection(mirror, MIRROR_DEPTH, material, hit.normal, eye);
            }
        }
        self.shade(material, hit.point, hit.normal, view)
    }

    /// Colour of a reflective surface at `ray.origin()`, viewed from
    /// `last_point`, tinted by what its mirror ray `ray` sees.
    ///
    /// `material` and `normal` belong to the surface at `ray.origin()`.
    /// Follows at most `depth` further bounces, so one call casts at most
    /// `depth + 1` hit-test rays.
    pub fn mirror_reflection(
        &self,
        ray: Ray,
        depth: u32,
        material: &Material,
        normal: Vec3,
        last_point: Vec3,
    ) -> Color {
        let origin = ray.origin();
        let to_viewer = (last_point - origin).normalize();
        let own = self.shade(material, origin, normal, to_viewer);

        let Some(hit) = self.closest_hit(&ray) else {
            return own;
        };

        let back = (origin - hit.point).normalize();
        let child = if depth > 0 && hit.material.is_reflective() {
            let bounce = Ray::through(hit.point, hit.point + mirror_direction(hit.normal, back));
            self.mirror_reflection(bounce, depth - 1, &hit.material, hit.normal, origin)
        } else {
            Color::ZERO
        };
        let seen = child + self.shade(&hit.material, hit.point, hit.normal, back);

        let light_dir = (hit.point - origin).normalize();
        let half = (light_dir + to_viewer).normalize_or_zero();
        let mut tint = material.reflective * seen * material.diffuse * normal.dot(light_dir).max(0.0);
        if light_dir.dot(normal) >= 0.0 {
            tint += material.reflective
                * seen
                * material.specular
                * normal.dot(half).max(0.0).powf(material.shininess);
        }

        own + tint
    }

    /// Colour seen through a transmissive surface, or `None` when refraction
    /// yields nothing to blend.
    fn transmit(&self, hit: &SurfaceSample, material: &Material, eye: Vec3) -> Option<Color> {
        let incident = (hit.point - eye).normalize();
        let ior = material.refractive_index;

        match hit.geometry {
            Geometry::Sphere { center, radius } => {
                let inside = refract(incident, hit.normal, ior)?.normalize();
                let exit_point = far_crossing(hit.point, inside, center, radius)?;
                let exit_dir = refract(inside, (exit_point - center).normalize(), ior);
                Some(self.exit_color(exit_point, exit_dir))
            }
            Geometry::Flat => Some(self.exit_color(hit.point, refract(incident, hit.normal, ior))),
        }
    }

    fn exit_color(&self, from: Vec3, direction: Option<Vec3>) -> Color {
        let Some(direction) = direction.map(Vec3::normalize) else {
            return self.scene.background;
        };
        match self.closest_hit(&Ray::through(from, from + direction)) {
            Some(hit) => self.shade(&hit.material, hit.point, hit.normal, -direction),
            None => self.scene.background,
        }
    }

    /// Every octree leaf the ray's line crosses, logged at info level.
    pub fn pick(&self, origin: Vec3, target: Vec3) -> Vec<LeafVisit> {
        let visits = self.octree.pick(&Ray::through(origin, target));
        log::info!("Pick ray {origin:?} -> {target:?}: {} leaves", visits.len());
        for visit in &visits {
            let labels: Vec<String> = visit
                .shapes
                .iter()
                .map(|&id| format!("{}#{}", self.scene.shape(id).label(), id.0))
                .collect();
            log::info!("  leaf {:?}: {}", visit.bbox.to_array(), labels.join(", "));
        }
        visits
    }
}

/// Re-aim `ray` so it appears to come from `eye`.
///
/// The target moves parallel to the origin shift, scaled by how far the
/// target sits from `hit` relative to the origin.
fn shift_to_eye(ray: &Ray, hit: Vec3, eye: Vec3) -> Ray {
    let scale = hit.distance(ray.target()) / hit.distance(ray.origin());
    let shifted = ray.target() + scale * (eye - ray.origin());
    Ray::through(eye, shifted)
}

/// Mirror of `view` about `normal`. Views from behind the surface fold onto `-view`.
pub fn mirror_direction(normal: Vec3, view: Vec3) -> Vec3 {
    (2.0 * normal.dot(view).max(0.0) * normal - view).normalize()
}

/// Schlick's approximation of Fresnel reflectance between air and `ior`.
///
/// `cos_theta` is the dot product of the surface normal and the view
/// direction.
pub fn schlick(cos_theta: f32, ior: f32) -> f32 {
    let r0 = ((AIR_REFRACTIVE_INDEX - ior) / (AIR_REFRACTIVE_INDEX + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos_theta).powi(5)
}

/// Refract `incident` through a surface with outward `normal` between air and
/// `ior`. Exiting rays (incident along the normal) swap the two media.
///
/// Returns `None` on total internal reflection. The result is not normalised.
pub fn refract(incident: Vec3, normal: Vec3, ior: f32) -> Option<Vec3> {
    let mut cos_i = incident.dot(normal).clamp(-1.0, 1.0);
    let (mut eta_i, mut eta_t) = (AIR_REFRACTIVE_INDEX, ior);
    let mut n = normal;

    if cos_i < 0.0 {
        cos_i = -cos_i;
    } else {
        std::mem::swap(&mut eta_i, &mut eta_t);
        n = -normal;
    }

    let eta = eta_i / eta_t;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some(eta * incident + (eta * cos_i - k.sqrt()) * n)
}

/// Where a ray leaving `point` in `direction` from inside the sphere crosses
/// its surface again (the larger root).
fn far_crossing(point: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<Vec3> {
    let pc = point - center;
    let a = direction.dot(direction);
    let b = direction.dot(pc);
    let discriminant = b * b - a * (pc.dot(pc) - radius * radius);
    if discriminant < 0.0 {
        return None;
    }
    let t = (-b + discriminant.sqrt()) / a;
    Some(point + t * direction)
}
