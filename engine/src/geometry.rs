//! Normalized display-space geometry shared by the classifier and the
//! interaction controllers.
//!
//! All coordinates are in [0, 1] with y growing downward, already mirrored
//! for a front-facing camera where they come from a pinch position.

use std::ops::{Add, Sub};

/// A 2-D point in normalized display space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Both components are finite (no NaN or infinity).
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Midpoint between two points.
    pub fn midpoint(a: Point, b: Point) -> Point {
        Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle in normalized display space.
///
/// Edges are inclusive on the left/top and exclusive on the right/bottom,
/// except that a region reaching 1.0 also contains points exactly on 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Region {
    /// The whole normalized frame.
    pub const FULL: Region = Region {
        left: 0.0,
        top: 0.0,
        right: 1.0,
        bottom: 1.0,
    };

    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        (self.right - self.left).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.bottom - self.top).max(0.0)
    }

    /// Whether `p` lies inside this region.
    pub fn contains(&self, p: Point) -> bool {
        if !p.is_finite() {
            return false;
        }
        let in_x = p.x >= self.left && (p.x < self.right || (self.right >= 1.0 && p.x <= 1.0));
        let in_y = p.y >= self.top && (p.y < self.bottom || (self.bottom >= 1.0 && p.y <= 1.0));
        in_x && in_y
    }

    /// The band covering the bottom `fraction` of this region's height.
    pub fn bottom_band(&self, fraction: f32) -> Region {
        let fraction = fraction.clamp(0.0, 1.0);
        Region {
            left: self.left,
            top: self.bottom - self.height() * fraction,
            right: self.right,
            bottom: self.bottom,
        }
    }

    /// Render as an s-expression list `(left top right bottom)`.
    pub fn to_sexp(&self) -> String {
        format!("({} {} {} {})", self.left, self.top, self.right, self.bottom)
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::FULL
    }
}
