//! Planar Voronoi diagrams with Fortune's sweep
//!
//! A standalone library for computing Voronoi diagrams clipped to a bounding
//! rectangle, with Lloyd relaxation and a small query surface (neighbors,
//! point-in-cell, cell bounds) for map and level generators.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_voronoi_diagram::*;
//!
//! // Generate a relaxed diagram from configuration
//! let config = DiagramConfigBuilder::new()
//!     .seed(42)
//!     .site_count(200).unwrap()
//!     .bounds(800.0, 600.0).unwrap()
//!     .lloyd_iterations(3).unwrap()
//!     .build().unwrap();
//!
//! let diagram = Diagram::generate(&config).unwrap();
//! println!("Generated {} cells", diagram.cell_count());
//!
//! // Or compute one from your own sites
//! let bbox = BoundingBox::from_size(10.0, 10.0).unwrap();
//! let sites = [DVec2::new(2.0, 3.0), DVec2::new(7.0, 6.0)];
//! let diagram = VoronoiGenerator::default().compute(&sites, bbox);
//! assert_eq!(diagram.get_neighbors(0).unwrap(), vec![1]);
//! ```
//!
//! # Coordinates
//!
//! The engine works in screen space: `bbox.min.y` is the top of the box and
//! `y` grows downward. Cell boundaries run counter-clockwise on screen.
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) point-to-cell lookups using KD-tree
//! - `serde`: Enables serialization support for configuration types

// Modules
pub mod error;
pub mod epsilon;
pub mod geometry;
pub mod rbtree;
pub mod config;
pub mod cell;
pub mod diagram;
pub mod generation;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{VoronoiError, Result};
pub use epsilon::{Tolerance, CIRCLE_EVENT_EPSILON, EPSILON, VERTEX_MERGE_EPSILON};
pub use geometry::{
    circumcenter, parabola_intersection_x, polygon_area, polygon_centroid, BoundingBox,
};
pub use config::{DiagramConfig, DiagramConfigBuilder, SiteDistribution};
pub use cell::{Cell, Containment, HalfEdge};
pub use diagram::{Diagram, Edge};
pub use generation::{
    centroid_displacement, generate_diagram, lloyd_relaxation, lloyd_relaxation_with_options,
    Displacement, LloydOptions, VoronoiGenerator,
};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
