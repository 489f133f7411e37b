//! Lloyd's Relaxation for uniform site distribution
//!
//! Lloyd's Relaxation iteratively improves the uniformity of a diagram by
//! moving each site to the centroid of its cell and recomputing the diagram.

use std::time::Instant;

use tracing::{debug, info};

use crate::diagram::Diagram;

/// Options for Lloyd's relaxation algorithm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LloydOptions {
    /// Maximum number of iterations to run
    pub max_iterations: usize,
    /// Convergence threshold - stop when max displacement < this value
    /// times the bounding box diagonal
    /// Set to 0.0 to disable early termination
    pub convergence_threshold: f64,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            // For a 1000x1000 box this stops once no site moves more than ~1.4 units
            convergence_threshold: 0.001,
        }
    }
}

/// How far sites are from the centroids of their cells
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Displacement {
    /// Sum of site-to-centroid distances over all cells
    pub total: f64,
    /// Largest single site-to-centroid distance
    pub max: f64,
}

/// Measure the distance between every site and its cell's centroid
///
/// This is exactly how far the sites move in the next relaxation step.
/// Cells without area are ignored.
pub fn centroid_displacement(diagram: &Diagram) -> Displacement {
    diagram
        .cells()
        .iter()
        .filter_map(|cell| cell.centroid(diagram.vertices()).map(|c| (c - cell.site).length()))
        .fold(Displacement::default(), |acc, d| Displacement {
            total: acc.total + d,
            max: acc.max.max(d),
        })
}

/// Apply Lloyd's Relaxation to improve site distribution uniformity
///
/// Runs up to `iterations` steps with the default convergence threshold.
///
/// # Example
///
/// ```
/// use rust_voronoi_diagram::*;
/// use rust_voronoi_diagram::generation::generate_random_sites;
///
/// let bbox = BoundingBox::from_size(100.0, 100.0).unwrap();
/// let sites = generate_random_sites(200, &bbox, 42);
/// let diagram = VoronoiGenerator::default().compute(&sites, bbox);
///
/// let before = centroid_displacement(&diagram);
/// let relaxed = lloyd_relaxation(diagram, 3);
/// assert!(centroid_displacement(&relaxed).total < before.total);
/// ```
pub fn lloyd_relaxation(diagram: Diagram, iterations: usize) -> Diagram {
    let options = LloydOptions {
        max_iterations: iterations,
        ..Default::default()
    };
    lloyd_relaxation_with_options(diagram, options)
}

/// Apply Lloyd's Relaxation with custom options
///
/// This variant allows fine-tuned control over convergence detection and
/// maximum iterations. Use `lloyd_relaxation` for the simple interface.
pub fn lloyd_relaxation_with_options(mut diagram: Diagram, options: LloydOptions) -> Diagram {
    let convergence_threshold = options.convergence_threshold * diagram.bbox().diagonal();
    let total_start = Instant::now();

    debug!(
        cells = diagram.cell_count(),
        max_iterations = options.max_iterations,
        threshold = options.convergence_threshold,
        absolute_threshold = convergence_threshold,
        "starting lloyd relaxation"
    );

    let mut iterations_run = 0;
    let mut converged = false;

    for iteration in 0..options.max_iterations {
        let iter_start = Instant::now();

        // Sites are about to move exactly this far
        let displacement = centroid_displacement(&diagram);
        diagram = diagram.relax();
        iterations_run = iteration + 1;

        debug!(
            iteration = iterations_run,
            elapsed = ?iter_start.elapsed(),
            max_displacement = displacement.max,
            total_displacement = displacement.total,
            "lloyd iteration"
        );

        if convergence_threshold > 0.0 && displacement.max < convergence_threshold {
            converged = true;
            break;
        }
    }

    info!(
        iterations = iterations_run,
        max_iterations = options.max_iterations,
        converged,
        elapsed = ?total_start.elapsed(),
        "lloyd relaxation finished"
    );

    diagram
}
