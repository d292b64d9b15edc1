//! Planar and 3D helpers shared by mesh construction and path
//! planning.

use geo::{geometry::Point, EuclideanDistance};
use num_traits::{Float, FromPrimitive};

/// A point or offset in scene space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Projection onto the xy plane.
    pub fn planar(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Euclidean distance between two points in the xy plane, z ignored.
pub fn planar_distance(a: Vec3, b: Vec3) -> f64 {
    a.planar().euclidean_distance(&b.planar())
}

/// Componentwise midpoint of two points.
pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(
        (a.x + b.x) / 2.0,
        (a.y + b.y) / 2.0,
        (a.z + b.z) / 2.0,
    )
}

/// Smallest non-NaN value, or `None` when every value is NaN.
pub fn nan_min<T, I>(values: I) -> Option<T>
where
    T: Float,
    I: IntoIterator<Item = T>,
{
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: T| m.min(v))))
}

/// Largest non-NaN value, or `None` when every value is NaN.
pub fn nan_max<T, I>(values: I) -> Option<T>
where
    T: Float,
    I: IntoIterator<Item = T>,
{
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: T| m.max(v))))
}

/// Mean of the non-NaN values, or `None` when every value is NaN.
pub fn nan_mean<T, I>(values: I) -> Option<T>
where
    T: Float + FromPrimitive,
    I: IntoIterator<Item = T>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((T::zero(), 0_usize), |(sum, count), v| {
            (sum + v, count + 1)
        });
    match count {
        0 => None,
        _ => T::from_usize(count).map(|n| sum / n),
    }
}
