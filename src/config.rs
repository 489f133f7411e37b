//! Voronoi Diagram Configuration and Builder
//!
//! This module provides configuration types for deterministic diagram generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::epsilon::Tolerance;
use crate::error::{Result, VoronoiError};
use crate::geometry::BoundingBox;

/// Upper limit on the number of sites a configuration may request
pub const MAX_SITE_COUNT: usize = 1_000_000;

/// Upper limit on Lloyd iterations
pub const MAX_LLOYD_ITERATIONS: usize = 50;

/// How initial sites are placed in the bounding box
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiteDistribution {
    /// Independent uniform samples (irregular cells until relaxed)
    #[default]
    Uniform,
    /// One jittered sample per grid cell (fairly regular from the start)
    JitteredGrid,
}

/// Configuration for deterministic Voronoi diagram generation
///
/// The same configuration will always produce the identical diagram.
///
/// # Example
///
/// ```rust
/// use rust_voronoi_diagram::*;
///
/// let config = DiagramConfigBuilder::new()
///     .seed(42)
///     .site_count(500)
///     .unwrap()
///     .bounds(1920.0, 1080.0)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// // Config is serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DiagramConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config.seed, restored.seed);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramConfig {
    /// Random seed for site placement
    pub seed: u32,

    /// Number of sites to place
    pub site_count: usize,

    /// Rectangle the diagram is clipped to
    pub bbox: BoundingBox,

    /// Site placement strategy
    pub distribution: SiteDistribution,

    /// Number of Lloyd's Relaxation iterations for uniform cells
    ///
    /// - 0: Raw diagram of the placed sites
    /// - 2-3: Decent uniformity
    /// - 5: Good uniformity (default)
    pub lloyd_iterations: usize,

    /// Convergence threshold for Lloyd's relaxation (fraction of the box diagonal)
    ///
    /// Relaxation stops early when no site moves farther than this threshold
    /// multiplied by the diagonal of the bounding box. 0.0 disables early exit.
    pub lloyd_convergence: f64,

    /// Numerical tolerances of the sweep
    pub tolerance: Tolerance,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        let builder = DiagramConfigBuilder::new();
        DiagramConfig {
            seed: rand::random(),
            site_count: builder.site_count,
            bbox: builder.bbox,
            distribution: builder.distribution,
            lloyd_iterations: builder.lloyd_iterations,
            lloyd_convergence: builder.lloyd_convergence,
            tolerance: builder.tolerance,
        }
    }
}

impl DiagramConfig {
    /// Check every field against the limits the builder enforces
    ///
    /// Needed for configurations assembled by hand or deserialized, since
    /// those never went through [`DiagramConfigBuilder`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidBoundingBox` for an empty or non-finite box and
    /// `InvalidConfig` for any other out-of-range field.
    pub fn validate(&self) -> Result<()> {
        BoundingBox::new(self.bbox.min, self.bbox.max)?;
        DiagramConfigBuilder::new()
            .site_count(self.site_count)?
            .lloyd_iterations(self.lloyd_iterations)?
            .lloyd_convergence(self.lloyd_convergence)?
            .tolerance(self.tolerance)?;
        Ok(())
    }
}

/// Builder for creating DiagramConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_voronoi_diagram::*;
///
/// // Use defaults
/// let config = DiagramConfigBuilder::new().build().unwrap();
///
/// // Customize
/// let config = DiagramConfigBuilder::new()
///     .seed(12345)
///     .site_count(2_000)
///     .unwrap()
///     .distribution(SiteDistribution::JitteredGrid)
///     .lloyd_iterations(3)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.site_count, 2_000);
/// ```
#[derive(Debug, Clone)]
pub struct DiagramConfigBuilder {
    seed: Option<u32>,
    site_count: usize,
    bbox: BoundingBox,
    distribution: SiteDistribution,
    lloyd_iterations: usize,
    lloyd_convergence: f64,
    tolerance: Tolerance,
}

impl DiagramConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random
    /// - site_count: 1,000
    /// - bbox: 1000 x 1000 at the origin
    /// - distribution: Uniform
    /// - lloyd_iterations: 5
    /// - lloyd_convergence: 0.001
    /// - tolerance: `Tolerance::default()`
    pub fn new() -> Self {
        Self {
            seed: None,
            site_count: 1_000,
            bbox: BoundingBox {
                min: glam::DVec2::ZERO,
                max: glam::DVec2::splat(1000.0),
            },
            distribution: SiteDistribution::default(),
            lloyd_iterations: 5,
            lloyd_convergence: 0.001,
            tolerance: Tolerance::default(),
        }
    }

    /// Set the random seed for site placement
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of sites
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if count is 0 or above 1,000,000
    pub fn site_count(mut self, count: usize) -> Result<Self> {
        if count == 0 || count > MAX_SITE_COUNT {
            return Err(VoronoiError::InvalidConfig(format!(
                "site count must be in 1..={} (got {})",
                MAX_SITE_COUNT, count
            )));
        }
        self.site_count = count;
        Ok(self)
    }

    /// Use a `width` x `height` bounding box anchored at the origin
    ///
    /// # Errors
    ///
    /// Returns `InvalidBoundingBox` if either dimension is not positive and finite
    pub fn bounds(mut self, width: f64, height: f64) -> Result<Self> {
        self.bbox = BoundingBox::from_size(width, height)?;
        Ok(self)
    }

    /// Use an arbitrary bounding box; checked again by [`build`](Self::build)
    pub fn bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn distribution(mut self, distribution: SiteDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Set the number of Lloyd's Relaxation iterations
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 50
    pub fn lloyd_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations > MAX_LLOYD_ITERATIONS {
            return Err(VoronoiError::InvalidConfig(format!(
                "Lloyd iterations must be <= {} (got {})",
                MAX_LLOYD_ITERATIONS, iterations
            )));
        }
        self.lloyd_iterations = iterations;
        Ok(self)
    }

    /// Set the convergence threshold for Lloyd's relaxation
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold is negative or not finite
    pub fn lloyd_convergence(mut self, threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "Lloyd convergence threshold must be finite and >= 0 (got {})",
                threshold
            )));
        }
        self.lloyd_convergence = threshold;
        Ok(self)
    }

    /// Override the numerical tolerances
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless `epsilon` is positive and the other
    /// constants are non-negative, all finite
    pub fn tolerance(mut self, tolerance: Tolerance) -> Result<Self> {
        let Tolerance {
            epsilon,
            circle_event,
            vertex_merge,
        } = tolerance;
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(VoronoiError::InvalidConfig(format!(
                "tolerance epsilon must be positive (got {})",
                epsilon
            )));
        }
        if !(circle_event.is_finite() && circle_event >= 0.0)
            || !(vertex_merge.is_finite() && vertex_merge >= 0.0)
        {
            return Err(VoronoiError::InvalidConfig(format!(
                "circle event and vertex merge tolerances must be >= 0 (got {} and {})",
                circle_event, vertex_merge
            )));
        }
        self.tolerance = tolerance;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBoundingBox` if the box given to [`bbox`](Self::bbox)
    /// is empty or not finite
    pub fn build(self) -> Result<DiagramConfig> {
        BoundingBox::new(self.bbox.min, self.bbox.max)?;
        let seed = self.seed.unwrap_or_else(rand::random);

        Ok(DiagramConfig {
            seed,
            site_count: self.site_count,
            bbox: self.bbox,
            distribution: self.distribution,
            lloyd_iterations: self.lloyd_iterations,
            lloyd_convergence: self.lloyd_convergence,
            tolerance: self.tolerance,
        })
    }
}

impl Default for DiagramConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
