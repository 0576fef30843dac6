#![forbid(unsafe_code)]

//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// Horizontal extent of the element hosting both panes.
///
/// Uses logical pixels as reported by the host (fractional values allowed).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerRect {
    /// Left edge in viewport coordinates.
    pub left: f64,
    /// Width in logical pixels.
    pub width: f64,
}

impl ContainerRect {
    /// Create a new container rectangle.
    #[inline]
    pub const fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Whether both coordinates are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.width.is_finite()
    }

    /// A rectangle that cannot anchor a width computation: zero, negative or
    /// non-finite width, or a non-finite left edge.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !self.is_finite() || self.width <= 0.0
    }

    /// Share of the container lying right of `pointer_x`, in percent.
    ///
    /// Returns `None` for degenerate rectangles or a non-finite pointer.
    /// The result is not clamped.
    #[must_use]
    pub fn percent_right_of(&self, pointer_x: f64) -> Option<f64> {
        if self.is_degenerate() || !pointer_x.is_finite() {
            return None;
        }
        let raw = ((self.width - (pointer_x - self.left)) / self.width) * 100.0;
        raw.is_finite().then_some(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_edge() {
        let rect = ContainerRect::new(100.0, 800.0);
        assert_eq!(rect.right(), 900.0);
    }

    #[test]
    fn zero_width_is_degenerate() {
        assert!(ContainerRect::new(0.0, 0.0).is_degenerate());
        assert!(ContainerRect::new(0.0, -5.0).is_degenerate());
        assert!(ContainerRect::new(f64::NAN, 100.0).is_degenerate());
        assert!(!ContainerRect::new(0.0, 1.0).is_degenerate());
    }

    #[test]
    fn percent_right_of_pointer() {
        let rect = ContainerRect::new(0.0, 1000.0);
        assert_eq!(rect.percent_right_of(50.0), Some(95.0));
        assert_eq!(rect.percent_right_of(1000.0), Some(0.0));
        assert_eq!(rect.percent_right_of(0.0), Some(100.0));
    }

    #[test]
    fn percent_accounts_for_left_offset() {
        let rect = ContainerRect::new(200.0, 1000.0);
        assert_eq!(rect.percent_right_of(700.0), Some(50.0));
    }

    #[test]
    fn percent_rejects_bad_input() {
        let rect = ContainerRect::new(0.0, 1000.0);
        assert_eq!(rect.percent_right_of(f64::NAN), None);
        assert_eq!(rect.percent_right_of(f64::INFINITY), None);
        assert_eq!(ContainerRect::new(0.0, 0.0).percent_right_of(10.0), None);
    }
}
