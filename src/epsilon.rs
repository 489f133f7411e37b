//! Tolerance-based floating point comparisons
//!
//! Every place where the sweep needs to decide whether two coordinates are
//! "the same" goes through a [`Tolerance`]. Keeping the constants in one value
//! makes the numerical policy easy to audit and to tune per diagram.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default comparison and quantization grid
pub const EPSILON: f64 = 1e-9;

/// Default signed-area threshold below which a circle event is accepted
pub const CIRCLE_EVENT_EPSILON: f64 = 2e-12;

/// Default radius within which pending circle events share one vertex
pub const VERTEX_MERGE_EPSILON: f64 = 1e-9;

/// Tuned constants used by the geometric predicates
///
/// # Example
///
/// ```
/// use rust_voronoi_diagram::Tolerance;
///
/// let tol = Tolerance::default();
/// assert!(tol.approx_eq(1.0, 1.0 + 1e-12));
/// assert!(tol.less_than(1.0, 1.1));
/// assert!(!tol.less_than(1.0, 1.0 + 1e-12));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Comparison tolerance, also the grid input sites are snapped to
    pub epsilon: f64,
    /// A circle event is rejected when its signed-area discriminant is `>= -circle_event`
    pub circle_event: f64,
    /// Two pending circle events closer than this collapse into the same vertex
    pub vertex_merge: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            circle_event: CIRCLE_EVENT_EPSILON,
            vertex_merge: VERTEX_MERGE_EPSILON,
        }
    }
}

impl Tolerance {
    /// `|a - b| < epsilon`
    #[inline]
    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.epsilon
    }

    /// `a` is smaller than `b` by more than epsilon
    #[inline]
    pub fn less_than(&self, a: f64, b: f64) -> bool {
        b - a > self.epsilon
    }

    /// `a` is larger than `b` by more than epsilon
    #[inline]
    pub fn greater_than(&self, a: f64, b: f64) -> bool {
        a - b > self.epsilon
    }

    /// `a` is not larger than `b` by epsilon or more
    #[inline]
    pub fn less_or_eq(&self, a: f64, b: f64) -> bool {
        a - b < self.epsilon
    }

    /// `a` is not smaller than `b` by epsilon or more
    #[inline]
    pub fn greater_or_eq(&self, a: f64, b: f64) -> bool {
        b - a < self.epsilon
    }

    /// Both coordinates are approximately equal
    #[inline]
    pub fn points_eq(&self, a: DVec2, b: DVec2) -> bool {
        self.approx_eq(a.x, b.x) && self.approx_eq(a.y, b.y)
    }

    /// Snap a coordinate down to an integer multiple of epsilon
    ///
    /// Negative zero comes out as `0.0`.
    #[inline]
    pub fn quantize(&self, value: f64) -> f64 {
        (value / self.epsilon).floor() * self.epsilon + 0.0
    }

    /// Snap both coordinates of a point
    #[inline]
    pub fn quantize_point(&self, point: DVec2) -> DVec2 {
        DVec2::new(self.quantize(point.x), self.quantize(point.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let tol = Tolerance::default();
        assert_eq!(tol.epsilon, 1e-9);
        assert_eq!(tol.circle_event, 2e-12);
        assert_eq!(tol.vertex_merge, 1e-9);
    }

    #[test]
    fn test_comparisons() {
        let tol = Tolerance::default();

        assert!(tol.approx_eq(3.0, 3.0 + 5e-10));
        assert!(!tol.approx_eq(3.0, 3.0 + 5e-9));

        assert!(tol.greater_than(2.0, 1.0));
        assert!(!tol.greater_than(1.0 + 1e-12, 1.0));

        // Within tolerance counts as both <= and >=
        assert!(tol.less_or_eq(1.0 + 1e-12, 1.0));
        assert!(tol.greater_or_eq(1.0 - 1e-12, 1.0));
        assert!(!tol.less_or_eq(1.1, 1.0));
        assert!(!tol.greater_or_eq(0.9, 1.0));
    }

    #[test]
    fn test_quantize_collapses_near_duplicates() {
        let tol = Tolerance::default();
        let a = tol.quantize_point(DVec2::new(4.0 + 3e-10, 7.25 + 3e-10));
        let b = tol.quantize_point(DVec2::new(4.0 + 6e-10, 7.25 + 6e-10));
        assert_eq!(a, b);
        assert!(tol.points_eq(a, DVec2::new(4.0, 7.25)));
    }

    #[test]
    fn test_quantize_drops_negative_zero() {
        let tol = Tolerance::default();
        let q = tol.quantize(-0.0);
        assert_eq!(q, 0.0);
        assert!(q.is_sign_positive());
        assert_eq!(tol.quantize(-0.0).total_cmp(&tol.quantize(0.0)), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_custom_epsilon() {
        let tol = Tolerance {
            epsilon: 0.5,
            ..Default::default()
        };
        assert_eq!(tol.quantize(1.7), 1.5);
        assert!(tol.approx_eq(1.0, 1.4));
    }
}
