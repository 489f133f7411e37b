//! Mutable diagram under construction
//!
//! The sweep creates cells, edges and vertices through the factory methods
//! here. Once the beachline is exhausted the finishing passes connect dangling
//! edges to the bounding box, clip them, close the cells along the box and
//! freeze everything into a [`Diagram`].

use glam::DVec2;
use tracing::warn;

use crate::cell::{Cell, HalfEdge};
use crate::epsilon::Tolerance;
use crate::geometry::BoundingBox;

use super::{Diagram, Edge};

#[derive(Debug, Clone)]
struct CellData {
    site: DVec2,
    source_index: usize,
    half_edges: Vec<HalfEdgeData>,
    close_me: bool,
}

#[derive(Debug, Clone, Copy)]
struct HalfEdgeData {
    edge: usize,
    angle: f64,
}

#[derive(Debug, Clone)]
struct EdgeData {
    left: usize,
    right: Option<usize>,
    start: Option<usize>,
    end: Option<usize>,
    alive: bool,
}

/// Sides of the bounding box in the order the border walk visits them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    MinX,
    MaxY,
    MaxX,
    MinY,
}

const WALK: [Side; 4] = [Side::MinX, Side::MaxY, Side::MaxX, Side::MinY];

/// Pools for everything the sweep creates
#[derive(Debug)]
pub(crate) struct DiagramBuilder {
    bbox: BoundingBox,
    tolerance: Tolerance,
    cells: Vec<CellData>,
    edges: Vec<EdgeData>,
    vertices: Vec<DVec2>,
}

impl DiagramBuilder {
    pub(crate) fn new(bbox: BoundingBox, tolerance: Tolerance, site_capacity: usize) -> Self {
        Self {
            bbox,
            tolerance,
            cells: Vec::with_capacity(site_capacity),
            // A Voronoi diagram of n sites has at most 3n - 6 edges
            edges: Vec::with_capacity(site_capacity * 3),
            vertices: Vec::with_capacity(site_capacity * 2),
        }
    }

    /// Position of the site generating `cell`
    #[inline]
    pub(crate) fn site(&self, cell: usize) -> DVec2 {
        self.cells[cell].site
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn create_cell(&mut self, site: DVec2, source_index: usize) -> usize {
        self.cells.push(CellData {
            site,
            source_index,
            half_edges: Vec::new(),
            close_me: false,
        });
        self.cells.len() - 1
    }

    pub(crate) fn create_vertex(&mut self, point: DVec2) -> usize {
        self.vertices.push(point);
        self.vertices.len() - 1
    }

    /// Create the edge separating `left` and `right` and give each cell its half-edge
    pub(crate) fn create_edge(
        &mut self,
        left: usize,
        right: usize,
        start: Option<usize>,
        end: Option<usize>,
    ) -> usize {
        self.edges.push(EdgeData {
            left,
            right: Some(right),
            start: None,
            end: None,
            alive: true,
        });
        let edge = self.edges.len() - 1;
        if let Some(start) = start {
            self.set_edge_start_point(edge, left, right, start);
        }
        if let Some(end) = end {
            self.set_edge_end_point(edge, left, right, end);
        }
        let left_half = self.half_edge(left, edge);
        self.cells[left].half_edges.push(left_half);
        let right_half = self.half_edge(right, edge);
        self.cells[right].half_edges.push(right_half);
        edge
    }

    /// Create a segment of the bounding box owned by `cell` alone
    ///
    /// The caller places the half-edge in the cell boundary.
    pub(crate) fn create_border_edge(&mut self, cell: usize, start: usize, end: usize) -> usize {
        self.edges.push(EdgeData {
            left: cell,
            right: None,
            start: Some(start),
            end: Some(end),
            alive: true,
        });
        self.edges.len() - 1
    }

    /// Fix one end of an edge as seen walking from `left` to `right`
    ///
    /// The first vertex an edge receives becomes its start and pins the edge's
    /// orientation to `(left, right)`; later calls fill whichever end matches.
    pub(crate) fn set_edge_start_point(&mut self, edge: usize, left: usize, right: usize, vertex: usize) {
        let data = &mut self.edges[edge];
        if data.start.is_none() && data.end.is_none() {
            data.start = Some(vertex);
            data.left = left;
            data.right = Some(right);
        } else if data.left == right {
            data.end = Some(vertex);
        } else {
            data.start = Some(vertex);
        }
    }

    pub(crate) fn set_edge_end_point(&mut self, edge: usize, left: usize, right: usize, vertex: usize) {
        self.set_edge_start_point(edge, right, left, vertex);
    }

    fn half_edge(&self, cell: usize, edge: usize) -> HalfEdgeData {
        let data = &self.edges[edge];
        let angle = match data.right {
            Some(right) => {
                let other = if data.left == cell { right } else { data.left };
                let d = self.cells[other].site - self.cells[cell].site;
                d.y.atan2(d.x)
            }
            None => {
                // Border segments point their angle along the outward normal
                let (va, vb) = match (data.start, data.end) {
                    (Some(a), Some(b)) => (self.vertices[a], self.vertices[b]),
                    _ => (self.cells[cell].site, self.cells[cell].site),
                };
                if data.left == cell {
                    (vb.x - va.x).atan2(va.y - vb.y)
                } else {
                    (va.x - vb.x).atan2(vb.y - va.y)
                }
            }
        };
        HalfEdgeData { edge, angle }
    }

    fn half_edge_start(&self, cell: usize, half_edge: &HalfEdgeData) -> Option<usize> {
        let edge = &self.edges[half_edge.edge];
        if edge.left == cell {
            edge.start
        } else {
            edge.end
        }
    }

    fn half_edge_end(&self, cell: usize, half_edge: &HalfEdgeData) -> Option<usize> {
        let edge = &self.edges[half_edge.edge];
        if edge.left == cell {
            edge.end
        } else {
            edge.start
        }
    }

    /// Extend a dangling edge to the bounding box
    ///
    /// Returns `false` when the bisector never enters the box on the side the
    /// edge is still open to.
    fn connect_edge(&mut self, edge: usize) -> bool {
        let EdgeData {
            left,
            right,
            start,
            end,
            ..
        } = self.edges[edge];
        if end.is_some() {
            return true;
        }
        let Some(right) = right else {
            return true;
        };

        // Whatever happens to this edge, both cells now have a gap to close
        self.cells[left].close_me = true;
        self.cells[right].close_me = true;

        let (xl, xr, yt, yb) = (self.bbox.min.x, self.bbox.max.x, self.bbox.min.y, self.bbox.max.y);
        let l = self.cells[left].site;
        let r = self.cells[right].site;
        let fx = (l.x + r.x) / 2.0;
        let fy = (l.y + r.y) / 2.0;
        let mut va = start.map(|v| self.vertices[v]);

        let (new_start, new_end) = if r.y == l.y {
            // Vertical bisector
            if fx < xl || fx >= xr {
                return false;
            }
            if l.x > r.x {
                match va {
                    Some(p) if p.y >= yb => return false,
                    Some(p) if p.y >= yt => {}
                    _ => va = None,
                }
                (va.unwrap_or(DVec2::new(fx, yt)), DVec2::new(fx, yb))
            } else {
                match va {
                    Some(p) if p.y < yt => return false,
                    Some(p) if p.y <= yb => {}
                    _ => va = None,
                }
                (va.unwrap_or(DVec2::new(fx, yb)), DVec2::new(fx, yt))
            }
        } else {
            let fm = (l.x - r.x) / (r.y - l.y);
            let fb = fy - fm * fx;
            if !(-1.0..=1.0).contains(&fm) {
                // Closer to vertical: exit through the top or bottom side
                if l.x > r.x {
                    match va {
                        Some(p) if p.y >= yb => return false,
                        Some(p) if p.y >= yt => {}
                        _ => va = None,
                    }
                    (
                        va.unwrap_or(DVec2::new((yt - fb) / fm, yt)),
                        DVec2::new((yb - fb) / fm, yb),
                    )
                } else {
                    match va {
                        Some(p) if p.y < yt => return false,
                        Some(p) if p.y <= yb => {}
                        _ => va = None,
                    }
                    (
                        va.unwrap_or(DVec2::new((yb - fb) / fm, yb)),
                        DVec2::new((yt - fb) / fm, yt),
                    )
                }
            } else if l.y < r.y {
                // Closer to horizontal, heading right
                match va {
                    Some(p) if p.x >= xr => return false,
                    Some(p) if p.x >= xl => {}
                    _ => va = None,
                }
                (
                    va.unwrap_or(DVec2::new(xl, fm * xl + fb)),
                    DVec2::new(xr, fm * xr + fb),
                )
            } else {
                // Closer to horizontal, heading left
                match va {
                    Some(p) if p.x < xl => return false,
                    Some(p) if p.x <= xr => {}
                    _ => va = None,
                }
                (
                    va.unwrap_or(DVec2::new(xr, fm * xr + fb)),
                    DVec2::new(xl, fm * xl + fb),
                )
            }
        };

        let start = match (start, va) {
            (Some(existing), Some(_)) => existing,
            _ => self.create_vertex(new_start),
        };
        let end = self.create_vertex(new_end);
        let data = &mut self.edges[edge];
        data.start = Some(start);
        data.end = Some(end);
        true
    }

    /// Liang-Barsky clipping of a connected edge against the bounding box
    ///
    /// Clipped ends get fresh vertices since vertices are shared between edges.
    fn clip_edge(&mut self, edge: usize) -> bool {
        let (Some(start), Some(end)) = (self.edges[edge].start, self.edges[edge].end) else {
            return false;
        };
        let a = self.vertices[start];
        let b = self.vertices[end];
        let d = b - a;
        let bbox = self.bbox;

        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;
        let slabs = [
            (-d.x, a.x - bbox.min.x),
            (d.x, bbox.max.x - a.x),
            (-d.y, a.y - bbox.min.y),
            (d.y, bbox.max.y - a.y),
        ];
        for (p, q) in slabs {
            if p == 0.0 {
                if q < 0.0 {
                    return false;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return false;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return false;
                }
                t1 = t1.min(r);
            }
        }

        // Clipped ends lie on the box up to rounding, snap them onto it
        if t0 > 0.0 {
            let v = self.create_vertex((a + d * t0).clamp(bbox.min, bbox.max));
            self.edges[edge].start = Some(v);
        }
        if t1 < 1.0 {
            let v = self.create_vertex((a + d * t1).clamp(bbox.min, bbox.max));
            self.edges[edge].end = Some(v);
        }
        if t0 > 0.0 || t1 < 1.0 {
            let EdgeData { left, right, .. } = self.edges[edge];
            self.cells[left].close_me = true;
            if let Some(right) = right {
                self.cells[right].close_me = true;
            }
        }
        true
    }

    /// Connect, clip and cull every edge produced by the sweep
    pub(crate) fn clip_edges(&mut self) {
        for edge in (0..self.edges.len()).rev() {
            if !self.edges[edge].alive {
                continue;
            }
            let keep = self.connect_edge(edge) && self.clip_edge(edge) && !self.is_degenerate(edge);
            if !keep {
                self.drop_edge(edge);
            }
        }
    }

    fn is_degenerate(&self, edge: usize) -> bool {
        match (self.edges[edge].start, self.edges[edge].end) {
            (Some(a), Some(b)) => self.tolerance.points_eq(self.vertices[a], self.vertices[b]),
            _ => true,
        }
    }

    fn drop_edge(&mut self, edge: usize) {
        let data = &mut self.edges[edge];
        data.alive = false;
        data.start = None;
        data.end = None;
        let (left, right) = (data.left, data.right);
        self.cells[left].half_edges.retain(|h| h.edge != edge);
        if let Some(right) = right {
            self.cells[right].half_edges.retain(|h| h.edge != edge);
        }
    }

    /// Order every boundary and fill the gaps of open cells with box segments
    pub(crate) fn close_cells(&mut self) {
        for cell in 0..self.cells.len() {
            self.cells[cell]
                .half_edges
                .sort_by(|a, b| b.angle.total_cmp(&a.angle));

            if self.cells[cell].half_edges.is_empty() {
                // Nothing else reaches into the box: the cell is the whole box
                if self.bbox.contains(self.cells[cell].site) {
                    self.wrap_in_bounds(cell);
                }
                continue;
            }
            if !self.cells[cell].close_me {
                continue;
            }

            let mut i = 0;
            while i < self.cells[cell].half_edges.len() {
                let count = self.cells[cell].half_edges.len();
                let current = self.cells[cell].half_edges[i];
                let following = self.cells[cell].half_edges[(i + 1) % count];
                if let (Some(va), Some(vz)) = (
                    self.half_edge_end(cell, &current),
                    self.half_edge_start(cell, &following),
                ) {
                    if !self.tolerance.points_eq(self.vertices[va], self.vertices[vz]) {
                        i = self.close_gap(cell, i, va, vz);
                    }
                }
                i += 1;
            }
            self.cells[cell].close_me = false;
        }
    }

    /// Which side a border walk leaving from `point` follows first
    fn exit_side(&self, point: DVec2) -> Option<Side> {
        let tol = &self.tolerance;
        let (xl, xr, yt, yb) = (self.bbox.min.x, self.bbox.max.x, self.bbox.min.y, self.bbox.max.y);
        WALK.into_iter().find(|side| match side {
            Side::MinX => tol.approx_eq(point.x, xl) && tol.less_than(point.y, yb),
            Side::MaxY => tol.approx_eq(point.y, yb) && tol.less_than(point.x, xr),
            Side::MaxX => tol.approx_eq(point.x, xr) && tol.greater_than(point.y, yt),
            Side::MinY => tol.approx_eq(point.y, yt) && tol.greater_than(point.x, xl),
        })
    }

    /// Walk the box from `va` to `vz`, inserting border half-edges after index `at`
    ///
    /// Returns the index of the last inserted half-edge.
    fn close_gap(&mut self, cell: usize, at: usize, mut va: usize, vz: usize) -> usize {
        let target = self.vertices[vz];
        let Some(exit) = self.exit_side(self.vertices[va]) else {
            warn!(
                cell,
                x = self.vertices[va].x,
                y = self.vertices[va].y,
                "open cell boundary does not end on the bounding box"
            );
            return at;
        };
        let first = WALK.iter().position(|&s| s == exit).unwrap_or(0);
        let (xl, xr, yt, yb) = (self.bbox.min.x, self.bbox.max.x, self.bbox.min.y, self.bbox.max.y);
        let mut index = at;

        // From a partial side, three full sides and another partial side at most
        for step in 0..5 {
            let side = WALK[(first + step) % WALK.len()];
            let (last, corner) = match side {
                Side::MinX => (self.tolerance.approx_eq(target.x, xl), DVec2::new(xl, yb)),
                Side::MaxY => (self.tolerance.approx_eq(target.y, yb), DVec2::new(xr, yb)),
                Side::MaxX => (self.tolerance.approx_eq(target.x, xr), DVec2::new(xr, yt)),
                Side::MinY => (self.tolerance.approx_eq(target.y, yt), DVec2::new(xl, yt)),
            };
            let vb = if last { vz } else { self.create_vertex(corner) };
            let edge = self.create_border_edge(cell, va, vb);
            let half_edge = self.half_edge(cell, edge);
            index += 1;
            self.cells[cell].half_edges.insert(index, half_edge);
            if last {
                return index;
            }
            va = vb;
        }

        warn!(cell, "border walk did not reach the next boundary vertex");
        index
    }

    /// Give a cell that owns the whole box the four box sides as its boundary
    fn wrap_in_bounds(&mut self, cell: usize) {
        let corners = self.bbox.corners().map(|c| self.create_vertex(c));
        for i in 0..corners.len() {
            let edge = self.create_border_edge(cell, corners[i], corners[(i + 1) % corners.len()]);
            let half_edge = self.half_edge(cell, edge);
            self.cells[cell].half_edges.push(half_edge);
        }
    }

    /// Freeze the pools into an immutable diagram
    ///
    /// Dropped edges and vertices no surviving edge uses are discarded; the
    /// remaining objects keep their creation order.
    pub(crate) fn finalize(self) -> Diagram {
        let mut edge_map = vec![usize::MAX; self.edges.len()];
        let mut vertex_map = vec![usize::MAX; self.vertices.len()];
        let mut vertices = Vec::new();
        let mut edges = Vec::new();

        let mut remap_vertex = |v: usize, vertices: &mut Vec<DVec2>| {
            if vertex_map[v] == usize::MAX {
                vertex_map[v] = vertices.len();
                vertices.push(self.vertices[v]);
            }
            vertex_map[v]
        };

        for (index, data) in self.edges.iter().enumerate() {
            let (true, Some(start), Some(end)) = (data.alive, data.start, data.end) else {
                continue;
            };
            edge_map[index] = edges.len();
            edges.push(Edge {
                left: data.left,
                right: data.right,
                start: remap_vertex(start, &mut vertices),
                end: remap_vertex(end, &mut vertices),
            });
        }

        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(id, data)| {
                let half_edges = data
                    .half_edges
                    .iter()
                    .filter(|h| edge_map[h.edge] != usize::MAX)
                    .map(|h| {
                        let edge = &edges[edge_map[h.edge]];
                        let (start, end, neighbor) = if edge.left == id {
                            (edge.start, edge.end, edge.right)
                        } else {
                            (edge.end, edge.start, Some(edge.left))
                        };
                        HalfEdge {
                            edge: edge_map[h.edge],
                            start,
                            end,
                            neighbor,
                            angle: h.angle,
                        }
                    })
                    .collect();
                Cell::new(id, data.site, data.source_index, half_edges)
            })
            .collect();

        Diagram::from_parts(self.bbox, self.tolerance, cells, edges, vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> DiagramBuilder {
        DiagramBuilder::new(
            BoundingBox::from_size(10.0, 10.0).unwrap(),
            Tolerance::default(),
            4,
        )
    }

    #[test]
    fn test_create_edge_adds_mirrored_half_edges() {
        let mut b = builder();
        let left = b.create_cell(DVec2::new(3.0, 5.0), 0);
        let right = b.create_cell(DVec2::new(7.0, 5.0), 1);
        let edge = b.create_edge(left, right, None, None);

        assert_eq!(b.cells[left].half_edges.len(), 1);
        assert_eq!(b.cells[right].half_edges.len(), 1);
        assert_eq!(b.cells[left].half_edges[0].edge, edge);
        assert!((b.cells[left].half_edges[0].angle - 0.0).abs() < 1e-12);
        assert!((b.cells[right].half_edges[0].angle - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_set_edge_points_respect_orientation() {
        let mut b = builder();
        let a = b.create_cell(DVec2::new(3.0, 5.0), 0);
        let c = b.create_cell(DVec2::new(7.0, 5.0), 1);
        let edge = b.create_edge(a, c, None, None);
        let v0 = b.create_vertex(DVec2::new(5.0, 2.0));
        let v1 = b.create_vertex(DVec2::new(5.0, 8.0));

        // First vertex pins the orientation to (c, a)
        b.set_edge_start_point(edge, c, a, v0);
        assert_eq!(b.edges[edge].left, c);
        assert_eq!(b.edges[edge].start, Some(v0));

        // Seen from (a, c) the same vertex role is the far end
        b.set_edge_start_point(edge, a, c, v1);
        assert_eq!(b.edges[edge].end, Some(v1));
    }

    #[test]
    fn test_connect_vertical_bisector() {
        let mut b = builder();
        let a = b.create_cell(DVec2::new(3.0, 5.0), 0);
        let c = b.create_cell(DVec2::new(7.0, 5.0), 1);
        let edge = b.create_edge(a, c, None, None);

        assert!(b.connect_edge(edge));
        let start = b.vertices[b.edges[edge].start.unwrap()];
        let end = b.vertices[b.edges[edge].end.unwrap()];
        assert_eq!(start, DVec2::new(5.0, 10.0));
        assert_eq!(end, DVec2::new(5.0, 0.0));
        assert!(b.cells[a].close_me && b.cells[c].close_me);
    }

    #[test]
    fn test_connect_rejects_bisector_outside_box() {
        let mut b = builder();
        let a = b.create_cell(DVec2::new(20.0, 5.0), 0);
        let c = b.create_cell(DVec2::new(30.0, 5.0), 1);
        let edge = b.create_edge(a, c, None, None);
        assert!(!b.connect_edge(edge));
    }

    #[test]
    fn test_clip_edge_replaces_outside_vertices() {
        let mut b = builder();
        let a = b.create_cell(DVec2::new(3.0, 5.0), 0);
        let c = b.create_cell(DVec2::new(7.0, 5.0), 1);
        let outside_start = b.create_vertex(DVec2::new(5.0, -4.0));
        let inside_end = b.create_vertex(DVec2::new(5.0, 6.0));
        let edge = b.create_edge(a, c, Some(outside_start), Some(inside_end));

        assert!(b.clip_edge(edge));
        let start = b.edges[edge].start.unwrap();
        assert_ne!(start, outside_start);
        assert!((b.vertices[start] - DVec2::new(5.0, 0.0)).length() < 1e-12);
        assert_eq!(b.edges[edge].end, Some(inside_end));
        // The shared vertex itself is untouched
        assert_eq!(b.vertices[outside_start], DVec2::new(5.0, -4.0));
    }

    #[test]
    fn test_clip_edge_snaps_onto_box() {
        let mut b = builder();
        let a = b.create_cell(DVec2::new(3.0, 5.0), 0);
        let c = b.create_cell(DVec2::new(7.0, 5.0), 1);
        let barely_above = b.create_vertex(DVec2::new(70.0 / 9.0, -2.220446049250313e-16));
        let below = b.create_vertex(DVec2::new(1.0 / 3.0, 10.0 + 1e-15));
        let edge = b.create_edge(a, c, Some(barely_above), Some(below));

        assert!(b.clip_edge(edge));
        let start = b.vertices[b.edges[edge].start.unwrap()];
        let end = b.vertices[b.edges[edge].end.unwrap()];
        assert!(b.bbox.contains(start), "{start} left the box");
        assert!(b.bbox.contains(end), "{end} left the box");
        assert_eq!(start.y, 0.0);
        assert_eq!(end.y, 10.0);
    }

    #[test]
    fn test_clip_edge_rejects_segment_outside() {
        let mut b = builder();
        let a = b.create_cell(DVec2::new(3.0, 5.0), 0);
        let c = b.create_cell(DVec2::new(7.0, 5.0), 1);
        let v0 = b.create_vertex(DVec2::new(12.0, 1.0));
        let v1 = b.create_vertex(DVec2::new(15.0, 9.0));
        let edge = b.create_edge(a, c, Some(v0), Some(v1));
        assert!(!b.clip_edge(edge));
    }

    #[test]
    fn test_clip_edges_drops_failed_edges_and_half_edges() {
        let mut b = builder();
        let a = b.create_cell(DVec2::new(20.0, 5.0), 0);
        let c = b.create_cell(DVec2::new(30.0, 5.0), 1);
        let edge = b.create_edge(a, c, None, None);
        b.clip_edges();

        assert!(!b.edges[edge].alive);
        assert!(b.cells[a].half_edges.is_empty());
        assert!(b.cells[c].half_edges.is_empty());
    }

    #[test]
    fn test_single_cell_wraps_whole_box() {
        let mut b = builder();
        b.create_cell(DVec2::new(4.0, 6.0), 0);
        b.clip_edges();
        b.close_cells();
        let diagram = b.finalize();

        let cell = diagram.get_cell(0).unwrap();
        assert_eq!(cell.half_edges.len(), 4);
        assert!((cell.area(diagram.vertices()) - 100.0).abs() < 1e-9);
        assert_eq!(cell.neighbor_count(), 0);
        assert!(cell.touches_border());
    }

    #[test]
    fn test_finalize_compacts_dropped_edges() {
        let mut b = builder();
        let a = b.create_cell(DVec2::new(3.0, 5.0), 0);
        let c = b.create_cell(DVec2::new(7.0, 5.0), 1);
        let far = b.create_cell(DVec2::new(40.0, 40.0), 2);
        b.create_edge(a, c, None, None);
        b.create_edge(c, far, None, None);
        b.clip_edges();
        b.close_cells();
        let diagram = b.finalize();

        // The bisector between c and the far site misses the box
        assert_eq!(diagram.edges().iter().filter(|e| e.right.is_some()).count(), 1);
        for edge in diagram.edges() {
            assert!(edge.start < diagram.vertices().len());
            assert!(edge.end < diagram.vertices().len());
        }
        assert!(diagram.get_cell(far).unwrap().half_edges.is_empty());
    }
}
