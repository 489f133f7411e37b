//! Planar geometry shared by the sweep and the diagram queries
//!
//! Coordinates are in screen space: `min.y` is the top side of a bounding box
//! and `max.y` the bottom side.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};

/// Axis-aligned bounding rectangle
///
/// # Example
///
/// ```
/// use rust_voronoi_diagram::{BoundingBox, DVec2};
///
/// let bbox = BoundingBox::from_size(800.0, 600.0).unwrap();
/// assert_eq!(bbox.area(), 480_000.0);
/// assert!(bbox.contains(DVec2::new(400.0, 300.0)));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Left (`x`) and top (`y`) limits
    pub min: DVec2,
    /// Right (`x`) and bottom (`y`) limits
    pub max: DVec2,
}

impl BoundingBox {
    /// Create a bounding box from its corners
    ///
    /// # Errors
    ///
    /// Returns `InvalidBoundingBox` if a coordinate is not finite or the box has
    /// no area.
    pub fn new(min: DVec2, max: DVec2) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(VoronoiError::InvalidBoundingBox(format!(
                "corners must be finite (got {} and {})",
                min, max
            )));
        }
        if max.x <= min.x || max.y <= min.y {
            return Err(VoronoiError::InvalidBoundingBox(format!(
                "max corner must lie strictly right of and below min corner (got {} and {})",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Create a `width` x `height` box anchored at the origin
    pub fn from_size(width: f64, height: f64) -> Result<Self> {
        Self::new(DVec2::ZERO, DVec2::new(width, height))
    }

    /// Smallest box enclosing all points, `None` for an empty iterator
    ///
    /// The result is not validated, so it may be degenerate.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = DVec2>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Length of the diagonal
    #[inline]
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).length()
    }

    /// Inclusive point containment
    #[inline]
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Corners in border-walk order: top-left, bottom-left, bottom-right, top-right
    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            DVec2::new(self.min.x, self.max.y),
            self.max,
            DVec2::new(self.max.x, self.min.y),
        ]
    }
}

/// Center of the circle through three points, `None` if they are collinear
pub fn circumcenter(a: DVec2, b: DVec2, c: DVec2) -> Option<DVec2> {
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * ab.perp_dot(ac);
    if d == 0.0 {
        return None;
    }
    let hb = ab.length_squared();
    let hc = ac.length_squared();
    Some(DVec2::new(
        (ac.y * hb - ab.y * hc) / d + a.x,
        (ab.x * hc - ac.x * hb) / d + a.y,
    ))
}

/// X coordinate where two parabolas sharing a directrix intersect
///
/// `left` and `right` are the foci of the arcs on either side of the breakpoint.
/// A focus lying on the directrix degenerates its parabola into a vertical ray,
/// so the breakpoint is that focus' x.
pub fn parabola_intersection_x(left: DVec2, right: DVec2, directrix: f64) -> f64 {
    let pby2 = right.y - directrix;
    if pby2 == 0.0 {
        return right.x;
    }
    let plby2 = left.y - directrix;
    if plby2 == 0.0 {
        return left.x;
    }
    let hl = left.x - right.x;
    let aby2 = 1.0 / pby2 - 1.0 / plby2;
    let b = hl / plby2;
    if aby2 != 0.0 {
        let c = hl * hl / (-2.0 * plby2) - left.y + plby2 / 2.0 + right.y - pby2 / 2.0;
        (-b + (b * b - 2.0 * aby2 * c).sqrt()) / aby2 + right.x
    } else {
        // Both foci equally far from the directrix
        (left.x + right.x) / 2.0
    }
}

/// Area-weighted centroid of a polygon by fan triangulation from its first vertex
///
/// Works for either winding. Returns `None` for polygons with (near) zero area.
pub fn polygon_centroid(polygon: &[DVec2]) -> Option<DVec2> {
    let (&origin, rest) = polygon.split_first()?;
    let mut weighted = DVec2::ZERO;
    let mut total = 0.0;
    for pair in rest.windows(2) {
        let (p, q) = (pair[0], pair[1]);
        let area = (p - origin).perp_dot(q - origin) * 0.5;
        weighted += (origin + p + q) / 3.0 * area;
        total += area;
    }
    if total.abs() < f64::EPSILON {
        return None;
    }
    Some(weighted / total)
}

/// Unsigned polygon area (shoelace)
pub fn polygon_area(polygon: &[DVec2]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let twice: f64 = polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(p, q)| p.perp_dot(*q))
        .sum();
    twice.abs() * 0.5
}
