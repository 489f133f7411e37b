//! Finalized Voronoi diagram and its query surface

mod builder;

pub(crate) use builder::DiagramBuilder;

use std::collections::{HashSet, VecDeque};

use glam::DVec2;

use crate::cell::{Cell, Containment};
use crate::config::DiagramConfig;
use crate::epsilon::Tolerance;
use crate::error::{Result, VoronoiError};
use crate::generation::{generate_diagram, VoronoiGenerator};
use crate::geometry::BoundingBox;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Segment of the diagram separating two cells, or bounding one cell along the box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Cell on the left of the segment walking from `start` to `end`
    pub left: usize,
    /// Cell on the other side, `None` for a border segment
    pub right: Option<usize>,
    pub start: usize,
    pub end: usize,
}

impl Edge {
    /// Whether this edge lies on the bounding box
    #[inline]
    pub fn is_border(&self) -> bool {
        self.right.is_none()
    }

    /// The cell across this edge as seen from `cell`
    pub fn other_cell(&self, cell: usize) -> Option<usize> {
        if self.left == cell {
            self.right
        } else if self.right == Some(cell) {
            Some(self.left)
        } else {
            None
        }
    }
}

/// A Voronoi diagram clipped to a bounding box
///
/// Produced by [`VoronoiGenerator::compute`] or [`Diagram::generate`] and
/// immutable afterwards. Cells, edges and vertices reference each other by
/// index into the slices returned by [`cells`](Self::cells),
/// [`edges`](Self::edges) and [`vertices`](Self::vertices).
///
/// # Examples
///
/// ```
/// use rust_voronoi_diagram::*;
///
/// let bbox = BoundingBox::from_size(10.0, 10.0).unwrap();
/// let sites = [DVec2::new(3.0, 5.0), DVec2::new(7.0, 5.0)];
/// let diagram = VoronoiGenerator::default().compute(&sites, bbox);
///
/// assert_eq!(diagram.cell_count(), 2);
/// assert_eq!(diagram.get_neighbors(0).unwrap(), vec![1]);
/// assert!((diagram.cell_area(0).unwrap() - 50.0).abs() < 1e-6);
/// ```
#[derive(Clone)]
pub struct Diagram {
    cells: Vec<Cell>,
    edges: Vec<Edge>,
    vertices: Vec<DVec2>,
    bbox: BoundingBox,
    tolerance: Tolerance,

    /// KD-tree over the cell sites, `None` for a diagram without cells
    #[cfg(feature = "spatial-index")]
    spatial_index: Option<SpatialIndex>,
}

impl std::fmt::Debug for Diagram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagram")
            .field("cells", &self.cells.len())
            .field("edges", &self.edges.len())
            .field("vertices", &self.vertices.len())
            .field("bbox", &self.bbox)
            .finish()
    }
}

impl Diagram {
    pub(crate) fn from_parts(
        bbox: BoundingBox,
        tolerance: Tolerance,
        cells: Vec<Cell>,
        edges: Vec<Edge>,
        vertices: Vec<DVec2>,
    ) -> Self {
        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let sites: Vec<DVec2> = cells.iter().map(|c| c.site).collect();
            SpatialIndex::new(&sites)
        };

        Self {
            cells,
            edges,
            vertices,
            bbox,
            tolerance,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        }
    }

    /// Generate sites from a configuration, compute their diagram and relax it
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_diagram::*;
    ///
    /// let config = DiagramConfigBuilder::new()
    ///     .seed(7)
    ///     .site_count(64)
    ///     .unwrap()
    ///     .lloyd_iterations(2)
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    ///
    /// let diagram = Diagram::generate(&config).unwrap();
    /// assert_eq!(diagram.cell_count(), 64);
    /// ```
    pub fn generate(config: &DiagramConfig) -> Result<Self> {
        generate_diagram(config)
    }

    /// Run one Lloyd iteration: move every site to its cell's centroid and recompute
    pub fn relax(&self) -> Diagram {
        VoronoiGenerator::new(self.tolerance).relax(self)
    }

    #[inline]
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    #[inline]
    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// All cells, indexed by cell ID
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// Get a cell by ID
    ///
    /// # Errors
    ///
    /// Returns `CellNotFound` if the ID is out of bounds.
    #[inline]
    pub fn get_cell(&self, id: usize) -> Result<&Cell> {
        self.cells.get(id).ok_or(VoronoiError::CellNotFound(id))
    }

    /// IDs of the cells sharing an edge with `cell_id`, in boundary order
    pub fn get_neighbors(&self, cell_id: usize) -> Result<Vec<usize>> {
        Ok(self.get_cell(cell_id)?.neighbors().collect())
    }

    /// Find cells within a given hop count from a center cell (BFS)
    ///
    /// The result includes the center cell and is sorted by cell ID.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_diagram::*;
    /// # let bbox = BoundingBox::from_size(10.0, 10.0).unwrap();
    /// # let sites = [DVec2::new(2.0, 5.0), DVec2::new(5.0, 5.0), DVec2::new(8.0, 5.0)];
    /// let diagram = VoronoiGenerator::default().compute(&sites, bbox);
    /// assert_eq!(diagram.find_cells_within_radius(0, 0).unwrap(), vec![0]);
    /// assert_eq!(diagram.find_cells_within_radius(0, 2).unwrap().len(), 3);
    /// ```
    pub fn find_cells_within_radius(&self, center_id: usize, hops: usize) -> Result<Vec<usize>> {
        self.get_cell(center_id)?;

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(center_id);
        queue.push_back((center_id, 0));

        while let Some((cell_id, depth)) = queue.pop_front() {
            if depth == hops {
                continue;
            }
            for neighbor in self.cells[cell_id].neighbors() {
                if visited.insert(neighbor) {
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        let mut found: Vec<usize> = visited.into_iter().collect();
        found.sort_unstable();
        Ok(found)
    }

    /// Boundary polygon of a cell, in half-edge order
    pub fn cell_polygon(&self, cell_id: usize) -> Result<Vec<DVec2>> {
        Ok(self.get_cell(cell_id)?.polygon(&self.vertices))
    }

    /// Locate `point` relative to a cell
    pub fn contains_point(&self, cell_id: usize, point: DVec2) -> Result<Containment> {
        Ok(self
            .get_cell(cell_id)?
            .contains_point(&self.vertices, point, &self.tolerance))
    }

    /// Axis-aligned bounds of a cell, `None` when the cell has no boundary
    pub fn cell_bounds(&self, cell_id: usize) -> Result<Option<BoundingBox>> {
        Ok(self.get_cell(cell_id)?.bounding_box(&self.vertices))
    }

    pub fn cell_area(&self, cell_id: usize) -> Result<f64> {
        Ok(self.get_cell(cell_id)?.area(&self.vertices))
    }

    /// Area-weighted centroid of a cell, `None` for a degenerate cell
    pub fn cell_centroid(&self, cell_id: usize) -> Result<Option<DVec2>> {
        Ok(self.get_cell(cell_id)?.centroid(&self.vertices))
    }

    /// Sum of all cell areas; matches the box area when every site is inside it
    pub fn total_area(&self) -> f64 {
        self.cells.iter().map(|c| c.area(&self.vertices)).sum()
    }

    /// Find the cell whose site is nearest to `point` (requires spatial-index feature)
    ///
    /// For a point inside the bounding box this is the cell containing it.
    /// Returns `None` only for a diagram without cells.
    ///
    /// # Example
    ///
    /// ```
    /// # use rust_voronoi_diagram::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let bbox = BoundingBox::from_size(10.0, 10.0).unwrap();
    /// let sites = [DVec2::new(3.0, 5.0), DVec2::new(7.0, 5.0)];
    /// let diagram = VoronoiGenerator::default().compute(&sites, bbox);
    ///
    /// let id = diagram.find_cell_at(DVec2::new(9.0, 1.0)).unwrap();
    /// assert_eq!(diagram.get_cell(id).unwrap().source_index, 1);
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_cell_at(&self, point: DVec2) -> Option<usize> {
        self.spatial_index.as_ref().map(|index| index.find_nearest(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::points::generate_random_sites;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square(size: f64) -> BoundingBox {
        BoundingBox::from_size(size, size).unwrap()
    }

    fn compute(sites: &[DVec2], bbox: BoundingBox) -> Diagram {
        VoronoiGenerator::default().compute(sites, bbox)
    }

    /// Every half-edge ends where the next one starts
    fn assert_closed_loops(diagram: &Diagram) {
        let tol = diagram.tolerance();
        for cell in diagram.cells() {
            let n = cell.half_edges.len();
            assert!(n >= 3, "cell {} has only {} half-edges", cell.id, n);
            for i in 0..n {
                let end = diagram.vertices()[cell.half_edges[i].end];
                let next = diagram.vertices()[cell.half_edges[(i + 1) % n].start];
                assert!(tol.points_eq(end, next), "cell {} is open after half-edge {}", cell.id, i);
            }
        }
    }

    #[test]
    fn test_two_sites_share_bisector() {
        let diagram = compute(&[DVec2::new(3.0, 5.0), DVec2::new(7.0, 5.0)], square(10.0));

        assert_eq!(diagram.cell_count(), 2);
        let internal: Vec<&Edge> = diagram.edges().iter().filter(|e| !e.is_border()).collect();
        assert_eq!(internal.len(), 1);

        let a = diagram.vertices()[internal[0].start];
        let b = diagram.vertices()[internal[0].end];
        // Sites are snapped to the tolerance grid, so allow for sub-epsilon drift
        assert!((a.x - 5.0).abs() < 1e-6 && (b.x - 5.0).abs() < 1e-6);
        assert!(((a.y - b.y).abs() - 10.0).abs() < 1e-6);

        for id in 0..2 {
            assert!((diagram.cell_area(id).unwrap() - 50.0).abs() < 1e-6);
            assert_eq!(diagram.get_cell(id).unwrap().half_edges.len(), 4);
        }
        assert_closed_loops(&diagram);
    }

    #[test]
    fn test_single_site_fills_box() {
        let bbox = BoundingBox::new(DVec2::new(-4.0, 2.0), DVec2::new(6.0, 7.0)).unwrap();
        let diagram = compute(&[DVec2::new(1.0, 3.0)], bbox);

        assert_eq!(diagram.cell_count(), 1);
        let polygon = diagram.cell_polygon(0).unwrap();
        assert_eq!(polygon.len(), 4);
        for corner in bbox.corners() {
            assert!(polygon.contains(&corner));
        }
        assert!((diagram.total_area() - bbox.area()).abs() < 1e-9);
        assert!(diagram.get_neighbors(0).unwrap().is_empty());
    }

    #[test]
    fn test_quadrants() {
        let sites = [
            DVec2::new(2.5, 2.5),
            DVec2::new(7.5, 2.5),
            DVec2::new(2.5, 7.5),
            DVec2::new(7.5, 7.5),
        ];
        let diagram = compute(&sites, square(10.0));
        assert_eq!(diagram.cell_count(), 4);

        for cell in diagram.cells() {
            assert_eq!(cell.neighbor_count(), 2);
            assert_eq!(cell.half_edges.iter().filter(|h| h.neighbor.is_none()).count(), 2);
            assert!((cell.area(diagram.vertices()) - 25.0).abs() < 1e-6);

            // Diagonal neighbors only meet in a point
            let diagonal = diagram
                .cells()
                .iter()
                .find(|other| {
                    ((other.site - cell.site).abs() - DVec2::splat(5.0)).abs().max_element() < 1e-6
                })
                .unwrap();
            assert!(!cell.is_neighbor_of(diagonal.id));
        }
        assert_closed_loops(&diagram);
    }

    #[test]
    fn test_random_sites_properties() {
        let bbox = square(100.0);
        let sites = generate_random_sites(300, &bbox, 42);
        let diagram = compute(&sites, bbox);

        assert_eq!(diagram.cell_count(), sites.len());
        assert_closed_loops(&diagram);
        assert!((diagram.total_area() - bbox.area()).abs() < 1e-6);

        for vertex in diagram.vertices() {
            assert!(bbox.contains(*vertex), "vertex {vertex} outside the box");
        }
        for edge in diagram.edges() {
            assert!(edge.start < diagram.vertices().len());
            assert!(edge.end < diagram.vertices().len());
            assert_ne!(edge.start, edge.end);
        }

        for cell in diagram.cells() {
            assert!((sites[cell.source_index] - cell.site).length() < 1e-6);
            assert_eq!(diagram.contains_point(cell.id, cell.site).unwrap(), Containment::Inside);
            // Adjacency is symmetric
            for neighbor in cell.neighbors() {
                assert!(diagram.get_cell(neighbor).unwrap().is_neighbor_of(cell.id));
            }
            let bounds = diagram.cell_bounds(cell.id).unwrap().unwrap();
            assert!(bbox.contains(bounds.min) && bbox.contains(bounds.max));
        }
    }

    #[test]
    fn test_deterministic_under_shuffle() {
        let bbox = square(50.0);
        let sites = generate_random_sites(120, &bbox, 9);
        let mut shuffled = sites.clone();
        shuffled.shuffle(&mut ChaCha8Rng::seed_from_u64(3));

        let a = compute(&sites, bbox);
        let b = compute(&shuffled, bbox);
        assert_eq!(a.cell_count(), b.cell_count());
        assert_eq!(a.edges().len(), b.edges().len());

        for (ca, cb) in a.cells().iter().zip(b.cells()) {
            assert_eq!(ca.site, cb.site);
            let mut na: Vec<usize> = ca.neighbors().collect();
            let mut nb: Vec<usize> = cb.neighbors().collect();
            na.sort_unstable();
            nb.sort_unstable();
            assert_eq!(na, nb);
        }
    }

    #[test]
    fn test_find_cells_within_radius() {
        let bbox = square(100.0);
        let diagram = compute(&generate_random_sites(200, &bbox, 5), bbox);

        assert_eq!(diagram.find_cells_within_radius(10, 0).unwrap(), vec![10]);

        let one_hop = diagram.find_cells_within_radius(10, 1).unwrap();
        assert_eq!(one_hop.len(), 1 + diagram.get_neighbors(10).unwrap().len());

        let two_hops = diagram.find_cells_within_radius(10, 2).unwrap();
        assert!(two_hops.len() > one_hop.len());
    }

    #[test]
    fn test_invalid_cell_id() {
        let diagram = compute(&[DVec2::new(1.0, 1.0)], square(2.0));
        assert_eq!(diagram.get_cell(5).unwrap_err(), VoronoiError::CellNotFound(5));
        assert!(diagram.get_neighbors(5).is_err());
        assert!(diagram.find_cells_within_radius(5, 2).is_err());
        assert!(diagram.cell_area(1).is_err());
    }

    #[test]
    fn test_sites_outside_box_keep_their_cell() {
        let sites = [DVec2::new(5.0, 5.0), DVec2::new(50.0, 50.0)];
        let diagram = compute(&sites, square(10.0));

        assert_eq!(diagram.cell_count(), 2);
        let outside = diagram.cells().iter().find(|c| c.source_index == 1).unwrap();
        assert!(outside.half_edges.is_empty());
        assert!((diagram.total_area() - 100.0).abs() < 1e-9);
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_find_cell_at() {
        let bbox = square(100.0);
        let diagram = compute(&generate_random_sites(150, &bbox, 11), bbox);

        for cell in diagram.cells() {
            assert_eq!(diagram.find_cell_at(cell.site), Some(cell.id));
        }

        let point = DVec2::new(33.3, 66.6);
        let id = diagram.find_cell_at(point).unwrap();
        assert_ne!(diagram.contains_point(id, point).unwrap(), Containment::Outside);
    }
}
