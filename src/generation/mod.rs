//! Core Voronoi generation algorithm
//!
//! Computes planar Voronoi diagrams with Fortune's sweep and improves them
//! with Lloyd's relaxation.

mod beachline;
mod circle;
mod lloyd;
pub mod points;
mod voronoi;

pub use lloyd::{
    centroid_displacement, lloyd_relaxation, lloyd_relaxation_with_options, Displacement,
    LloydOptions,
};
pub use points::{generate_jittered_grid_sites, generate_random_sites};
pub use voronoi::VoronoiGenerator;

use tracing::warn;

use crate::config::{DiagramConfig, SiteDistribution};
use crate::diagram::Diagram;
use crate::error::{Result, VoronoiError};

/// Generate a diagram from configuration
///
/// Places the configured number of sites, computes their diagram and relaxes
/// it as requested.
///
/// # Errors
///
/// Returns the error of [`DiagramConfig::validate`] for an out-of-range
/// configuration, and `GenerationFailed` if no cell survives.
pub fn generate_diagram(config: &DiagramConfig) -> Result<Diagram> {
    config.validate()?;

    // Step 1: Place sites
    let sites = match config.distribution {
        SiteDistribution::Uniform => {
            generate_random_sites(config.site_count, &config.bbox, config.seed)
        }
        SiteDistribution::JitteredGrid => {
            generate_jittered_grid_sites(config.site_count, &config.bbox, config.seed)
        }
    };

    // Step 2: Sweep
    let diagram = VoronoiGenerator::new(config.tolerance).compute(&sites, config.bbox);

    // Step 3: Apply Lloyd's relaxation with convergence detection
    let diagram = if config.lloyd_iterations > 0 {
        let options = LloydOptions {
            max_iterations: config.lloyd_iterations,
            convergence_threshold: config.lloyd_convergence,
        };
        lloyd_relaxation_with_options(diagram, options)
    } else {
        diagram
    };

    if diagram.cell_count() == 0 {
        return Err(VoronoiError::GenerationFailed(format!(
            "no cells produced from {} sites",
            sites.len()
        )));
    }
    if diagram.cell_count() < sites.len() {
        warn!(
            requested = sites.len(),
            cells = diagram.cell_count(),
            "some sites were merged during generation"
        );
    }

    Ok(diagram)
}
