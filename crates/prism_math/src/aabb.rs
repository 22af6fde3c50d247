use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box used by the octree and the scene bounds.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// Boxes are not padded: a flat triangle lying in an axis plane gets a box of
/// zero thickness on that axis, which the inclusive slab test still hits.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));
        Self { x, y, z }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Edge lengths along each axis.
    pub fn extent(&self) -> Vec3 {
        Vec3::new(self.x.size(), self.y.size(), self.z.size())
    }

    /// True when the closed boxes share at least one point on every axis.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x.overlaps(&other.x) && self.y.overlaps(&other.y) && self.z.overlaps(&other.z)
    }

    /// Split the box into eight equal octants at its midpoint.
    ///
    /// The upper-z octants come first, then the lower-z ones; within each
    /// z layer the order is (lo y, lo x), (lo y, hi x), (hi y, lo x), (hi y, hi x).
    pub fn octants(&self) -> [Aabb; 8] {
        let [x_lo, x_hi] = self.x.halves();
        let [y_lo, y_hi] = self.y.halves();
        let [z_lo, z_hi] = self.z.halves();

        let mut out = [*self; 8];
        let mut i = 0;
        for z in [z_hi, z_lo] {
            for y in [y_lo, y_hi] {
                for x in [x_lo, x_hi] {
                    out[i] = Aabb::new(x, y, z);
                    i += 1;
                }
            }
        }
        out
    }

    /// Test if the line through `r` crosses this box within `ray_t`.
    ///
    /// Slab method. Touching intervals count as a hit (rejection only when
    /// the running interval becomes strictly empty). Pass
    /// [`Interval::UNIVERSE`] to test the whole line, including points
    /// behind the ray origin.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        let ray_orig = r.origin;
        let ray_dir = r.direction;

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / ray_dir[axis];
            let mut t0 = (slab.min - ray_orig[axis]) * adinv;
            let mut t1 = (slab.max - ray_orig[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            // f32::max/min ignore a NaN operand, so an origin lying on a slab
            // face of a parallel ray leaves the running interval unchanged.
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return false;
            }
        }

        true
    }

    /// Flattened `[min.x, max.x, min.y, max.y, min.z, max.z]`.
    pub fn to_array(&self) -> [f32; 6] {
        [
            self.x.min, self.x.max, self.y.min, self.y.max, self.z.min, self.z.max,
        ]
    }

    /// An empty AABB (contains nothing).
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}
