//! Voronoi Cell Structure
//!
//! Represents one finalized cell of a diagram: its site, its ordered boundary
//! and the queries downstream code runs against it.

use glam::DVec2;

use crate::epsilon::Tolerance;
use crate::geometry::{polygon_area, polygon_centroid, BoundingBox};

/// Directed view of an edge from one of its two adjacent cells
///
/// Vertex fields index into [`Diagram::vertices`](crate::Diagram::vertices).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfEdge {
    /// Index of the underlying edge in [`Diagram::edges`](crate::Diagram::edges)
    pub edge: usize,
    /// Vertex where this half-edge starts when walking the cell boundary
    pub start: usize,
    /// Vertex where this half-edge ends; equals the next half-edge's `start`
    pub end: usize,
    /// Cell on the other side, `None` for a segment of the bounding box
    pub neighbor: Option<usize>,
    /// Direction from the site towards the neighbor (or the outward normal of a
    /// border segment); only used to order the boundary
    pub angle: f64,
}

/// Result of a point-in-cell test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Containment {
    Inside,
    OnBoundary,
    Outside,
}

/// A single cell of a finalized Voronoi diagram
///
/// The half-edges are sorted by descending angle, which walks the boundary
/// counter-clockwise on screen (y grows downward). Every point of the cell is
/// on the right-hand side of each half-edge in a y-up frame.
///
/// A cell whose site lies outside the bounding box may end up with no
/// half-edges at all.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Unique identifier for this cell (0 to cell_count-1)
    ///
    /// Cells are numbered in sweep order, ascending by (y, x) of their sites.
    pub id: usize,

    /// Generating site, snapped to the tolerance grid
    pub site: DVec2,

    /// Index of the generating point in the caller's input list
    ///
    /// Preserved across Lloyd relaxation so cells can be traced back to the
    /// points they came from.
    pub source_index: usize,

    /// Closed boundary, ordered as described on [`Cell`]
    pub half_edges: Vec<HalfEdge>,
}

impl Cell {
    /// Create a new cell
    ///
    /// This is typically called when a diagram is finalized, not by user code.
    pub fn new(id: usize, site: DVec2, source_index: usize, half_edges: Vec<HalfEdge>) -> Self {
        Self {
            id,
            site,
            source_index,
            half_edges,
        }
    }

    /// IDs of the adjacent cells, in boundary order
    pub fn neighbors(&self) -> impl Iterator<Item = usize> + '_ {
        self.half_edges.iter().filter_map(|h| h.neighbor)
    }

    /// Get the number of neighboring cells
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors().count()
    }

    /// Check if this cell shares an edge with another cell
    #[inline]
    pub fn is_neighbor_of(&self, other_cell_id: usize) -> bool {
        self.neighbors().any(|n| n == other_cell_id)
    }

    /// Whether any boundary segment lies on the bounding box
    pub fn touches_border(&self) -> bool {
        self.half_edges.iter().any(|h| h.neighbor.is_none())
    }

    /// Get the vertex count (polygon complexity)
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.half_edges.len()
    }

    /// Boundary polygon, one point per half-edge start
    pub fn polygon(&self, vertices: &[DVec2]) -> Vec<DVec2> {
        self.half_edges.iter().map(|h| vertices[h.start]).collect()
    }

    /// Area of the cell polygon
    pub fn area(&self, vertices: &[DVec2]) -> f64 {
        polygon_area(&self.polygon(vertices))
    }

    /// Area-weighted centroid, `None` for an empty or degenerate cell
    pub fn centroid(&self, vertices: &[DVec2]) -> Option<DVec2> {
        polygon_centroid(&self.polygon(vertices))
    }

    /// Smallest axis-aligned box around the cell's vertices
    pub fn bounding_box(&self, vertices: &[DVec2]) -> Option<BoundingBox> {
        BoundingBox::enclosing(self.half_edges.iter().map(|h| vertices[h.start]))
    }

    /// Locate `point` relative to this cell
    ///
    /// Voronoi cells are convex, so the point is inside when it lies on the
    /// interior side of every boundary segment.
    pub fn contains_point(&self, vertices: &[DVec2], point: DVec2, tolerance: &Tolerance) -> Containment {
        if self.half_edges.is_empty() {
            return Containment::Outside;
        }
        let mut on_boundary = false;
        for half_edge in &self.half_edges {
            let p0 = vertices[half_edge.start];
            let p1 = vertices[half_edge.end];
            let r = (p1 - p0).perp_dot(point - p0);
            if tolerance.approx_eq(r, 0.0) {
                on_boundary = true;
            } else if r > 0.0 {
                return Containment::Outside;
            }
        }
        if on_boundary {
            Containment::OnBoundary
        } else {
            Containment::Inside
        }
    }
}
