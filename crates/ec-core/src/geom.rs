use core::ops::Sub;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3f {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn distance(self, other: Self) -> f32 {
        (self - other).norm()
    }
}

impl From<[f32; 3]> for Point3f {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Point3f> for [f32; 3] {
    fn from(p: Point3f) -> Self {
        p.to_array()
    }
}

impl Vec3f {
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn norm_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn norm(self) -> f32 {
        self.norm_squared().sqrt()
    }
}

impl Sub<Point3f> for Point3f {
    type Output = Vec3f;

    fn sub(self, rhs: Point3f) -> Self::Output {
        Vec3f {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

/// Axis-aligned bounding box. `min <= max` per axis for any box built from
/// a non-empty point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3f {
    pub min: Point3f,
    pub max: Point3f,
}

impl Aabb3f {
    /// Returns `None` for an empty slice.
    pub fn from_points(points: &[Point3f]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for p in rest {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Some(Self { min, max })
    }

    pub fn extent(&self) -> Vec3f {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::{Aabb3f, Point3f, Vec3f};

    #[test]
    fn vec_dot_and_norm() {
        let a = Vec3f {
            x: 2.0,
            y: 3.0,
            z: 6.0,
        };
        let b = Vec3f {
            x: 1.0,
            y: -2.0,
            z: 0.5,
        };

        assert!((a.dot(b) + 1.0).abs() < 1e-6);
        assert!((a.norm() - 7.0).abs() < 1e-6);
    }

    #[test]
    fn point_distance_is_symmetric() {
        let p = Point3f::new(1.0, 2.0, 2.0);
        let q = Point3f::default();

        assert!((p.distance(q) - 3.0).abs() < 1e-6);
        assert_eq!(p.distance(q), q.distance(p));
        assert_eq!((p - q).norm_squared(), 9.0);
    }

    #[test]
    fn aabb_covers_all_points() {
        assert!(Aabb3f::from_points(&[]).is_none());

        let pts = [
            Point3f::new(0.5, -1.0, 2.0),
            Point3f::new(-3.0, 4.0, 0.0),
            Point3f::new(1.0, 0.0, -2.0),
        ];
        let bb = Aabb3f::from_points(&pts).expect("non-empty");
        assert_eq!(bb.min, Point3f::new(-3.0, -1.0, -2.0));
        assert_eq!(bb.max, Point3f::new(1.0, 4.0, 2.0));
        assert_eq!(bb.extent(), Vec3f { x: 4.0, y: 5.0, z: 4.0 });
    }
}
