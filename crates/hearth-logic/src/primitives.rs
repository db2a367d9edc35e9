//! Geometry primitives handed to the rendering/collision collaborator.
//!
//! Everything here is plain data: positions, scales, colors and opaque asset
//! tokens. The host engine decides how a `Primitive` is actually drawn.

use serde::{Deserialize, Serialize};

/// 3D vector. +Y is up; floors lie in the XZ plane.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0, z: 1.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Rotate about +Y by `degrees` (counter-clockwise seen from above).
    pub fn rotate_y(&self, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            x: self.x * cos + self.z * sin,
            y: self.y,
            z: -self.x * sin + self.z * cos,
        }
    }

    pub fn abs(&self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Linear RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Self = Self::rgb(0.5, 0.5, 0.5);
    pub const LIGHT_GRAY: Self = Self::rgb(0.75, 0.75, 0.75);
    pub const DARK_GRAY: Self = Self::rgb(0.25, 0.25, 0.25);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);
    pub const ORANGE: Self = Self::rgb(1.0, 0.5, 0.0);
    pub const SADDLE_BROWN: Self = Self::rgb(0.545, 0.271, 0.075);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// From 0–255 channel values, fully opaque.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Scale the color channels by `intensity`, leaving alpha unchanged.
    pub fn scaled(&self, intensity: f32) -> Self {
        Self {
            r: self.r * intensity,
            g: self.g * intensity,
            b: self.b * intensity,
            a: self.a,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Opaque texture/model identifier, passed through to the host unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef(pub String);

impl AssetRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Mesh used for a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Cube,
    /// Horizontal plane; scale.y is only used for collider thickness.
    Plane,
    /// Vertical textured quad facing its local -Z.
    Quad,
}

/// One placed box/plane/quad.
///
/// `position` is the center, `scale` the full extents before rotation,
/// `yaw` the rotation about +Y in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub label: String,
    pub shape: Shape,
    pub position: Vec3,
    pub scale: Vec3,
    pub yaw: f32,
    pub color: Color,
    pub texture: Option<AssetRef>,
    pub collider: bool,
    pub unlit: bool,
}

impl Primitive {
    /// Solid collidable box.
    pub fn cube(label: impl Into<String>, position: Vec3, scale: Vec3, color: Color) -> Self {
        Self {
            label: label.into(),
            shape: Shape::Cube,
            position,
            scale,
            yaw: 0.0,
            color,
            texture: None,
            collider: true,
            unlit: false,
        }
    }

    /// Collidable floor plane of the given footprint.
    pub fn plane(label: impl Into<String>, position: Vec3, width: f32, depth: f32, color: Color) -> Self {
        Self {
            label: label.into(),
            shape: Shape::Plane,
            position,
            scale: Vec3::new(width, 1.0, depth),
            yaw: 0.0,
            color,
            texture: None,
            collider: true,
            unlit: false,
        }
    }

    /// Non-colliding textured quad.
    pub fn quad(label: impl Into<String>, position: Vec3, width: f32, height: f32, texture: AssetRef) -> Self {
        Self {
            label: label.into(),
            shape: Shape::Quad,
            position,
            scale: Vec3::new(width, height, 0.01),
            yaw: 0.0,
            color: Color::WHITE,
            texture: Some(texture),
            collider: false,
            unlit: false,
        }
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn with_texture(mut self, texture: AssetRef) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_collider(mut self, collider: bool) -> Self {
        self.collider = collider;
        self
    }

    pub fn unlit(mut self) -> Self {
        self.unlit = true;
        self
    }

    /// Extents actually occupied in space. Planes are treated as thin slabs.
    pub fn extents(&self) -> Vec3 {
        match self.shape {
            Shape::Plane => Vec3::new(self.scale.x, 0.0, self.scale.z),
            _ => self.scale,
        }
    }

    /// World-space bounds, accounting for yaw.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_rotated(self.position, self.extents(), self.yaw)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec3, extents: Vec3) -> Self {
        let half = extents * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Bounds of a box of `extents` centered at `center` and rotated by `yaw`.
    pub fn from_rotated(center: Vec3, extents: Vec3, yaw: f32) -> Self {
        let half = extents * 0.5;
        let mut min = Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let mut max = Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    let corner = Vec3::new(half.x * sx, half.y * sy, half.z * sz).rotate_y(yaw);
                    min = Vec3::new(min.x.min(corner.x), min.y.min(corner.y), min.z.min(corner.z));
                    max = Vec3::new(max.x.max(corner.x), max.y.max(corner.y), max.z.max(corner.z));
                }
            }
        }
        Self {
            min: center + min,
            max: center + max,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains(&self, point: &Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Strict overlap, shrunk by `tolerance` so touching faces don't count.
    pub fn overlaps(&self, other: &Aabb, tolerance: f32) -> bool {
        self.min.x + tolerance < other.max.x
            && other.min.x + tolerance < self.max.x
            && self.min.y + tolerance < other.max.y
            && other.min.y + tolerance < self.max.y
            && self.min.z + tolerance < other.max.z
            && other.min.z + tolerance < self.max.z
    }

    /// Slab test. Returns the entry distance along `direction` if the ray
    /// hits within `max_distance`.
    pub fn ray_distance(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = max_distance;
        let axes = [
            (origin.x, direction.x, self.min.x, self.max.x),
            (origin.y, direction.y, self.min.y, self.max.y),
            (origin.z, direction.z, self.min.z, self.max.z),
        ];
        for (o, d, lo, hi) in axes {
            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (t0, t1) = {
                let a = (lo - o) * inv;
                let b = (hi - o) * inv;
                if a < b {
                    (a, b)
                } else {
                    (b, a)
                }
            };
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!((b - a).x, 3.0);
        assert_eq!((a * 2.0).y, 4.0);
        assert_eq!((-a).z, -3.0);
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        let v = Vec3::new(1.0, 0.0, 0.0).rotate_y(90.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.z + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_color_scaled_keeps_alpha() {
        let c = Color::rgba(0.8, 0.6, 0.4, 0.5).scaled(0.5);
        assert!((c.r - 0.4).abs() < 1e-6);
        assert!((c.b - 0.2).abs() < 1e-6);
        assert_eq!(c.a, 0.5);
    }

    #[test]
    fn test_rotated_bounds_swap_extents() {
        let bb = Aabb::from_rotated(Vec3::ZERO, Vec3::new(4.0, 1.0, 0.2), 90.0);
        let size = bb.size();
        assert!((size.x - 0.2).abs() < 1e-4);
        assert!((size.z - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_aabb_overlap_touching_is_not_overlap() {
        let a = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(!a.overlaps(&b, 0.01));
        let c = Aabb::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(2.0, 2.0, 2.0));
        assert!(a.overlaps(&c, 0.01));
    }

    #[test]
    fn test_ray_hits_box_in_front() {
        let bb = Aabb::from_center(Vec3::new(0.0, 0.0, 3.0), Vec3::ONE);
        let d = bb.ray_distance(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 5.0);
        assert!((d.unwrap() - 2.5).abs() < 1e-5);
        assert!(bb.ray_distance(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 5.0).is_none());
        assert!(bb.ray_distance(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 2.0).is_none());
    }
}
