//! Planar value types shared by every entity in the simulation.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Two dimensional vector expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vec2 {
    /// Vector with both components set to zero.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Multiplies both components by `factor`.
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn magnitude(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).magnitude()
    }

    /// Returns a unit vector pointing in the same direction.
    ///
    /// A zero-length vector has no direction, so it normalizes to
    /// [`Vec2::ZERO`] instead of producing `NaN` components.
    #[must_use]
    pub fn normalize(self) -> Self {
        let magnitude = self.magnitude();
        if magnitude <= f32::EPSILON || !magnitude.is_finite() {
            return Self::ZERO;
        }
        Self::new(self.x / magnitude, self.y / magnitude)
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

/// Axis-aligned rectangle anchored at its center.
///
/// Serializes as `{x, y, width, height}` where `x`/`y` name the center, not
/// the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    /// Horizontal coordinate of the center.
    pub x: f32,
    /// Vertical coordinate of the center.
    pub y: f32,
    /// Extent along the horizontal axis.
    pub width: f32,
    /// Extent along the vertical axis.
    pub height: f32,
}

impl Bbox {
    /// Creates a rectangle centered on `center`.
    #[must_use]
    pub const fn new(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            x: center.x,
            y: center.y,
            width,
            height,
        }
    }

    /// Center of the rectangle.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Moves the rectangle so that it is centered on `center`.
    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x;
        self.y = center.y;
    }

    /// Reports whether `point` lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        point.x >= self.x - half_width
            && point.x <= self.x + half_width
            && point.y >= self.y - half_height
            && point.y <= self.y + half_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizing_zero_vector_yields_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
        assert_eq!(Vec2::new(0.0, -0.0).normalize(), Vec2::ZERO);
    }

    #[test]
    fn normalize_produces_unit_length() {
        let unit = Vec2::new(3.0, 4.0).normalize();
        assert!((unit.magnitude() - 1.0).abs() < 1e-6);
        assert!((unit.x - 0.6).abs() < 1e-6);
        assert!((unit.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(4.0, 5.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn bbox_contains_is_center_origin() {
        let zone = Bbox::new(Vec2::new(10.0, 10.0), 4.0, 2.0);
        assert!(zone.contains(Vec2::new(10.0, 10.0)));
        assert!(zone.contains(Vec2::new(8.0, 9.0)));
        assert!(zone.contains(Vec2::new(12.0, 11.0)));
        assert!(!zone.contains(Vec2::new(12.5, 10.0)));
        assert!(!zone.contains(Vec2::new(10.0, 8.5)));
    }

    #[test]
    fn bbox_serializes_as_plain_rectangle() {
        let body = Bbox::new(Vec2::new(1.5, 2.0), 1.0, 3.0);
        let json = serde_json::to_value(body).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"x": 1.5, "y": 2.0, "width": 1.0, "height": 3.0})
        );
    }
}
