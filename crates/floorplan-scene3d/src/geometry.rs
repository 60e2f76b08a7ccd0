//! Mesh primitives, bounding boxes and ray tests.

use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box that any union replaces.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Bounds of this box after an affine transform.
    pub fn transformed(&self, m: &Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let mut out = Aabb::EMPTY;
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = m.transform_point3(corner);
            out.min = out.min.min(p);
            out.max = out.max.max(p);
        }
        out
    }

    /// Slab test. Returns the entry distance along the ray, or the exit
    /// distance when the origin is inside.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let o = ray.origin[axis];
            let d = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        if t_max < 0.0 {
            None
        } else if t_min >= 0.0 {
            Some(t_min)
        } else {
            Some(t_max)
        }
    }
}

/// A ray. The direction is not required to be unit length; distances are
/// in multiples of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray expressed in another space. Distances are preserved.
    pub fn transformed(&self, m: &Mat4) -> Ray {
        Ray {
            origin: m.transform_point3(self.origin),
            direction: m.transform_vector3(self.direction),
        }
    }
}

/// Solid primitives, centered on their local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Width (x), height (y), depth (z).
    Box { size: Vec3 },
    /// Vertical cylinder, possibly tapered.
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
    },
    /// Cone with its apex up; `segments` is the number of radial sides.
    Cone {
        radius: f32,
        height: f32,
        segments: u32,
    },
    /// Sphere or a slice of one. `theta` is measured from +y.
    Sphere {
        radius: f32,
        phi_start: f32,
        phi_length: f32,
        theta_start: f32,
        theta_length: f32,
    },
    /// Flat rectangle in the local XY plane.
    Plane { width: f32, height: f32 },
}

impl Primitive {
    pub fn cuboid(x: f32, y: f32, z: f32) -> Self {
        Primitive::Box {
            size: Vec3::new(x, y, z),
        }
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32) -> Self {
        Primitive::Cylinder {
            radius_top,
            radius_bottom,
            height,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Primitive::Sphere {
            radius,
            phi_start: 0.0,
            phi_length: std::f32::consts::TAU,
            theta_start: 0.0,
            theta_length: std::f32::consts::PI,
        }
    }

    /// Upper half of a sphere.
    pub fn dome(radius: f32) -> Self {
        Primitive::Sphere {
            radius,
            phi_start: 0.0,
            phi_length: std::f32::consts::TAU,
            theta_start: 0.0,
            theta_length: std::f32::consts::FRAC_PI_2,
        }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        Primitive::Plane { width, height }
    }

    /// Local bounds. Partial spheres are bounded on the vertical axis only.
    pub fn local_bounds(&self) -> Aabb {
        match *self {
            Primitive::Box { size } => Aabb::from_center_size(Vec3::ZERO, size),
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => {
                let r = radius_top.max(radius_bottom);
                Aabb::from_center_size(Vec3::ZERO, Vec3::new(2.0 * r, height, 2.0 * r))
            }
            Primitive::Cone { radius, height, .. } => {
                Aabb::from_center_size(Vec3::ZERO, Vec3::new(2.0 * radius, height, 2.0 * radius))
            }
            Primitive::Sphere {
                radius,
                theta_start,
                theta_length,
                ..
            } => {
                let theta_end = (theta_start + theta_length).min(std::f32::consts::PI);
                let top = radius * theta_start.cos();
                let bottom = radius * theta_end.cos();
                Aabb::new(Vec3::new(-radius, bottom, -radius), Vec3::new(radius, top, radius))
            }
            Primitive::Plane { width, height } => {
                Aabb::from_center_size(Vec3::ZERO, Vec3::new(width, height, 0.0))
            }
        }
    }

    /// Ray hit distance in local space. Exact for boxes and planes; curved
    /// solids use their bounds.
    pub fn intersect_local(&self, ray: &Ray) -> Option<f32> {
        match *self {
            Primitive::Plane { width, height } => {
                if ray.direction.z.abs() < f32::EPSILON {
                    return None;
                }
                let t = -ray.origin.z / ray.direction.z;
                if t < 0.0 {
                    return None;
                }
                let p = ray.at(t);
                (p.x.abs() <= width / 2.0 && p.y.abs() <= height / 2.0).then_some(t)
            }
            _ => self.local_bounds().intersect(ray),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_bounds() {
        let b = Primitive::cuboid(100.0, 120.0, 12.0).local_bounds();
        assert_eq!(b.min, Vec3::new(-50.0, -60.0, -6.0));
        assert_eq!(b.size(), Vec3::new(100.0, 120.0, 12.0));
    }

    #[test]
    fn test_dome_bounds() {
        let b = Primitive::dome(10.0).local_bounds();
        assert!((b.max.y - 10.0).abs() < 1e-5);
        assert!(b.min.y.abs() < 1e-5);
    }

    #[test]
    fn test_ray_hits_box() {
        let b = Primitive::cuboid(2.0, 2.0, 2.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(b.intersect_local(&ray), Some(9.0));
        let miss = Ray::new(Vec3::new(5.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(b.intersect_local(&miss), None);
        let behind = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(b.intersect_local(&behind), None);
    }

    #[test]
    fn test_ray_from_inside_box() {
        let b = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(b.intersect(&ray), Some(1.0));
    }

    #[test]
    fn test_plane_hit_inside_only() {
        let plane = Primitive::plane(10.0, 4.0);
        let down = Ray::new(Vec3::new(1.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(plane.intersect_local(&down), Some(5.0));
        let outside = Ray::new(Vec3::new(1.0, 3.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(plane.intersect_local(&outside), None);
    }

    #[test]
    fn test_transformed_bounds() {
        let b = Aabb::from_center_size(Vec3::ZERO, Vec3::new(10.0, 2.0, 2.0));
        let m = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let r = b.transformed(&m);
        assert!((r.size().z - 10.0).abs() < 1e-4);
        assert!((r.size().x - 2.0).abs() < 1e-4);
    }
}
