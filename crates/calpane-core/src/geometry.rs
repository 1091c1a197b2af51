#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixel space.

/// A client-space position in CSS pixels (origin at the viewport top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement from `origin` to `self`.
    #[inline]
    #[must_use]
    pub fn delta_from(self, origin: Self) -> Delta {
        Delta {
            dx: self.x - origin.x,
            dy: self.y - origin.y,
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Signed displacement between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Delta {
    pub dx: f64,
    pub dy: f64,
}

impl Delta {
    /// Create a new delta.
    #[inline]
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Larger of the two absolute components (Chebyshev length).
    #[inline]
    #[must_use]
    pub fn max_abs(self) -> f64 {
        self.dx.abs().max(self.dy.abs())
    }

    /// Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
