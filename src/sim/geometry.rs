//! Wall geometry for course collision
//!
//! Two shapes cover every course feature:
//! - `BoxShape`: axis-aligned prism given by centre and half extents
//! - `PlaneSegment`: finite vertical rectangle given by centre, yaw, length and height
//!
//! Plus the ray queries needed to pick the ball from a screen point.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangular prism
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl BoxShape {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Closest point on (or in) the box to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min(), self.max())
    }

    /// For a point inside the box: the horizontal face it is nearest to.
    ///
    /// Returns the outward face normal and the distance from `p` to that face.
    /// Only x and z faces are considered; the ball rolls on the ground plane so
    /// escaping through the top or bottom is never the right answer.
    pub fn nearest_side_face(&self, p: Vec3) -> (Vec3, f32) {
        let local = p - self.center;
        let to_x = self.half_extents.x - local.x.abs();
        let to_z = self.half_extents.z - local.z.abs();

        if to_x <= to_z {
            let sign = if local.x < 0.0 { -1.0 } else { 1.0 };
            (Vec3::new(sign, 0.0, 0.0), to_x)
        } else {
            let sign = if local.z < 0.0 { -1.0 } else { 1.0 };
            (Vec3::new(0.0, 0.0, sign), to_z)
        }
    }
}

/// A finite vertical plane, used for diagonal course features
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneSegment {
    /// Centre of the rectangle
    pub center: Vec3,
    /// Rotation about +Y (radians); yaw 0 runs along +X with normal +Z.
    /// Authored in degrees.
    #[serde(rename = "yaw_deg", with = "degrees")]
    pub yaw: f32,
    /// Extent along the wall
    pub length: f32,
    /// Vertical extent
    pub height: f32,
}

impl PlaneSegment {
    pub fn new(center: Vec3, yaw: f32, length: f32, height: f32) -> Self {
        Self {
            center,
            yaw,
            length,
            height,
        }
    }

    #[inline]
    fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Unit vector along the wall
    #[inline]
    pub fn tangent(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }

    /// Unit normal of the plane (one of its two sides)
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }

    /// Signed distance from `p` to the infinite plane
    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        (p - self.center).dot(self.normal())
    }

    /// Project `p` onto the plane and express it in wall coordinates
    /// (x = along the wall, y = up), relative to the centre
    pub fn to_local(&self, p: Vec3) -> Vec2 {
        let projected = p - self.normal() * self.signed_distance(p);
        let rel = projected - self.center;
        Vec2::new(rel.dot(self.tangent()), rel.y)
    }

    /// Whether a local point lies on the finite rectangle, grown by `margin`
    pub fn within_extents(&self, local: Vec2, margin: f32) -> bool {
        local.x.abs() <= self.length * 0.5 + margin && local.y.abs() <= self.height * 0.5 + margin
    }

    /// Ground-level endpoints of the wall
    pub fn endpoints(&self) -> (Vec3, Vec3) {
        let half = self.tangent() * (self.length * 0.5);
        let base = Vec3::new(self.center.x, self.center.y - self.height * 0.5, self.center.z);
        (base - half, base + half)
    }
}

/// Serde adapter: radians in memory, degrees in course files
pub(crate) mod degrees {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(radians: &f32, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f32(radians.to_degrees())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f32, D::Error> {
        Ok(f32::deserialize(d)?.to_radians())
    }
}

/// A half-line used for pointer picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

}

/// Nearest non-negative hit distance of `ray` against a sphere
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t0 = -b - sqrt_disc;
    let t1 = -b + sqrt_disc;
    if t0 >= 0.0 {
        Some(t0)
    } else if t1 >= 0.0 {
        // Origin inside the sphere
        Some(t1)
    } else {
        None
    }
}
