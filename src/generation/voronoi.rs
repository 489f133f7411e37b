//! Fortune sweep driver
//!
//! Merges the site events (sorted input points) with the circle events of the
//! beachline into one time-ordered loop, then runs the finishing passes of the
//! diagram builder.

use std::cmp::Ordering;
use std::time::Instant;

use glam::DVec2;
use tracing::{debug, warn};

use crate::diagram::{Diagram, DiagramBuilder};
use crate::epsilon::Tolerance;
use crate::geometry::BoundingBox;

use super::beachline::Beachline;

/// Computes Voronoi diagrams with a fixed numerical tolerance
///
/// The generator holds no state between calls: every [`compute`](Self::compute)
/// builds its diagram from scratch.
///
/// # Example
///
/// ```
/// use rust_voronoi_diagram::*;
///
/// let bbox = BoundingBox::from_size(100.0, 100.0).unwrap();
/// let sites = vec![
///     DVec2::new(20.0, 30.0),
///     DVec2::new(70.0, 20.0),
///     DVec2::new(50.0, 80.0),
/// ];
///
/// let generator = VoronoiGenerator::new(Tolerance::default());
/// let diagram = generator.compute(&sites, bbox);
/// assert_eq!(diagram.cell_count(), 3);
///
/// let relaxed = generator.relax(&diagram);
/// assert_eq!(relaxed.cell_count(), 3);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VoronoiGenerator {
    tolerance: Tolerance,
}

impl VoronoiGenerator {
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    #[inline]
    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// Compute the diagram of `sites` clipped to `bbox`
    ///
    /// Sites are snapped to the tolerance grid first. Non-finite points are
    /// skipped and duplicates produce a single cell (the one with the smallest
    /// input index). Cell IDs follow the sweep order, so they do not depend on
    /// the order of `sites`; [`Cell::source_index`](crate::Cell::source_index)
    /// maps each cell back to its input point.
    pub fn compute(&self, sites: &[DVec2], bbox: BoundingBox) -> Diagram {
        self.compute_indexed(sites.iter().copied().enumerate(), bbox)
    }

    /// Run one Lloyd iteration over `diagram`
    ///
    /// Every site moves to the centroid of its cell; cells without area keep
    /// their site. Source indices carry over to the new diagram.
    pub fn relax(&self, diagram: &Diagram) -> Diagram {
        let vertices = diagram.vertices();
        let sites = diagram
            .cells()
            .iter()
            .map(|cell| (cell.source_index, cell.centroid(vertices).unwrap_or(cell.site)));
        self.compute_indexed(sites, *diagram.bbox())
    }

    fn compute_indexed<I>(&self, sites: I, bbox: BoundingBox) -> Diagram
    where
        I: IntoIterator<Item = (usize, DVec2)>,
    {
        let start = Instant::now();

        let mut events: Vec<(usize, DVec2)> = sites
            .into_iter()
            .filter_map(|(index, site)| {
                if site.is_finite() {
                    Some((index, self.tolerance.quantize_point(site)))
                } else {
                    warn!(index, x = site.x, y = site.y, "skipping non-finite site");
                    None
                }
            })
            .collect();

        // Descending so that popping from the back yields ascending (y, x),
        // lowest input index first among duplicates
        events.sort_unstable_by(|(ia, a), (ib, b)| {
            b.y.total_cmp(&a.y)
                .then_with(|| b.x.total_cmp(&a.x))
                .then_with(|| ib.cmp(ia))
        });

        let site_count = events.len();
        let mut builder = DiagramBuilder::new(bbox, self.tolerance, site_count);
        let mut beachline = Beachline::new(self.tolerance);
        let mut last_site: Option<DVec2> = None;
        let mut duplicates = 0;
        let mut circle_events = 0;

        let mut next_site = events.pop();
        loop {
            let circle = beachline.first_event();
            match (next_site, circle) {
                (Some((index, site)), circle)
                    if circle.map_or(true, |c| site_precedes(site, c.x, c.y)) =>
                {
                    if last_site == Some(site) {
                        duplicates += 1;
                    } else {
                        let cell = builder.create_cell(site, index);
                        beachline.add(&mut builder, cell);
                        last_site = Some(site);
                    }
                    next_site = events.pop();
                }
                (_, Some(event)) => {
                    beachline.remove(&mut builder, event);
                    circle_events += 1;
                }
                (_, None) => break,
            }
        }
        debug_assert_eq!(beachline.pending_events(), 0);

        let sweep_time = start.elapsed();
        builder.clip_edges();
        builder.close_cells();
        let cell_count = builder.cell_count();
        let diagram = builder.finalize();

        debug!(
            sites = site_count,
            duplicates,
            cells = cell_count,
            edges = diagram.edges().len(),
            vertices = diagram.vertices().len(),
            circle_events,
            ?sweep_time,
            total_time = ?start.elapsed(),
            "computed voronoi diagram"
        );

        diagram
    }
}

/// Whether a site event at `site` comes before a circle event at `(x, y)`
#[inline]
fn site_precedes(site: DVec2, x: f64, y: f64) -> bool {
    match site.y.partial_cmp(&y) {
        Some(Ordering::Less) => true,
        Some(Ordering::Equal) => site.x < x,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> BoundingBox {
        BoundingBox::from_size(10.0, 10.0).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let diagram = VoronoiGenerator::default().compute(&[], bbox());
        assert_eq!(diagram.cell_count(), 0);
        assert!(diagram.edges().is_empty());
        assert!(diagram.vertices().is_empty());
    }

    #[test]
    fn test_negative_zero_is_a_duplicate() {
        let bbox = BoundingBox::new(DVec2::splat(-5.0), DVec2::splat(5.0)).unwrap();
        let sites = [
            DVec2::new(1.0, -0.0),
            DVec2::new(-2.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 3.0),
        ];
        let diagram = VoronoiGenerator::default().compute(&sites, bbox);

        assert_eq!(diagram.cell_count(), 3);
        let mut sources: Vec<usize> = diagram.cells().iter().map(|c| c.source_index).collect();
        sources.sort_unstable();
        assert_eq!(sources, vec![0, 1, 3]);
        assert!((diagram.total_area() - bbox.area()).abs() < 1e-6);
        for cell in diagram.cells() {
            assert!(cell.half_edges.len() >= 3);
        }
    }

    #[test]
    fn test_duplicates_keep_first_index() {
        let sites = [
            DVec2::new(6.0, 6.0),
            DVec2::new(2.0, 3.0),
            DVec2::new(6.0, 6.0),
            DVec2::new(2.0, 3.0),
        ];
        let diagram = VoronoiGenerator::default().compute(&sites, bbox());

        assert_eq!(diagram.cell_count(), 2);
        let mut sources: Vec<usize> = diagram.cells().iter().map(|c| c.source_index).collect();
        sources.sort_unstable();
        assert_eq!(sources, vec![0, 1]);
    }

    #[test]
    fn test_non_finite_sites_are_skipped() {
        let sites = [
            DVec2::new(f64::NAN, 1.0),
            DVec2::new(3.0, 3.0),
            DVec2::new(1.0, f64::INFINITY),
            DVec2::new(7.0, 7.0),
        ];
        let diagram = VoronoiGenerator::default().compute(&sites, bbox());

        assert_eq!(diagram.cell_count(), 2);
        let sources: Vec<usize> = diagram.cells().iter().map(|c| c.source_index).collect();
        assert_eq!(sources, vec![1, 3]);
    }

    #[test]
    fn test_cells_follow_sweep_order() {
        let sites = [
            DVec2::new(5.0, 8.0),
            DVec2::new(1.0, 2.0),
            DVec2::new(9.0, 2.0),
            DVec2::new(4.0, 5.0),
        ];
        let diagram = VoronoiGenerator::default().compute(&sites, bbox());
        let sources: Vec<usize> = diagram.cells().iter().map(|c| c.source_index).collect();
        assert_eq!(sources, vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_relax_keeps_sources_and_moves_sites() {
        let sites = [
            DVec2::new(1.0, 1.0),
            DVec2::new(1.5, 1.2),
            DVec2::new(8.0, 9.0),
        ];
        let generator = VoronoiGenerator::default();
        let diagram = generator.compute(&sites, bbox());
        let relaxed = generator.relax(&diagram);

        assert_eq!(relaxed.cell_count(), 3);
        for cell in relaxed.cells() {
            let before = diagram
                .cells()
                .iter()
                .find(|c| c.source_index == cell.source_index)
                .unwrap();
            let centroid = before.centroid(diagram.vertices()).unwrap();
            assert!((cell.site - centroid).length() < 1e-6);
        }
        assert!((relaxed.total_area() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_custom_tolerance_merges_close_sites() {
        let tolerance = Tolerance {
            epsilon: 0.5,
            ..Default::default()
        };
        let sites = [DVec2::new(2.1, 2.1), DVec2::new(2.3, 2.2), DVec2::new(7.0, 7.0)];
        let diagram = VoronoiGenerator::new(tolerance).compute(&sites, bbox());
        assert_eq!(diagram.cell_count(), 2);
        assert_eq!(diagram.tolerance().epsilon, 0.5);
    }
}
