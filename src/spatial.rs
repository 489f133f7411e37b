//! Spatial indexing for fast point-to-cell lookups
//!
//! This module is only available with the `spatial-index` feature.

use glam::DVec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// Wrapper around KD-tree for nearest-site queries
///
/// The cell of a Voronoi diagram containing a point is the cell of the site
/// nearest to it, so one nearest-neighbor lookup answers point location.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
    len: usize,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex").field("len", &self.len).finish()
    }
}

impl SpatialIndex {
    /// Build spatial index from cell sites
    ///
    /// Returns `None` for an empty slice. The item stored for each site is its
    /// position in `sites`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_voronoi_diagram::*;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let sites = vec![
    ///     DVec2::new(0.0, 0.0),
    ///     DVec2::new(10.0, 0.0),
    ///     DVec2::new(0.0, 10.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&sites).unwrap();
    /// assert_eq!(index.find_nearest(DVec2::new(8.0, 1.0)), 1);
    /// assert!(SpatialIndex::new(&[]).is_none());
    /// # }
    /// ```
    pub fn new(sites: &[DVec2]) -> Option<Self> {
        if sites.is_empty() {
            return None;
        }
        let points: Vec<[f64; 2]> = sites.iter().map(|s| s.to_array()).collect();

        Some(Self {
            tree: ImmutableKdTree::new_from_slice(&points),
            len: sites.len(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: an index is only built over at least one site
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the site nearest to `point`
    pub fn find_nearest(&self, point: DVec2) -> usize {
        let result = self.tree.nearest_one::<SquaredEuclidean>(&point.to_array());
        result.item as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_index_basic() {
        let sites = vec![
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(-1.0, 0.0),
            DVec2::new(0.0, -1.0),
        ];

        let index = SpatialIndex::new(&sites).unwrap();
        assert_eq!(index.len(), 4);
        assert!(!index.is_empty());

        assert_eq!(index.find_nearest(DVec2::new(0.9, 0.1)), 0);
        assert_eq!(index.find_nearest(DVec2::new(0.1, 0.95)), 1);
        assert_eq!(index.find_nearest(DVec2::new(-0.8, 0.0)), 2);
        assert_eq!(index.find_nearest(DVec2::new(0.2, -3.0)), 3);
    }

    #[test]
    fn test_spatial_index_exact_match() {
        let sites = vec![DVec2::new(10.0, 0.0), DVec2::new(0.0, 10.0)];
        let index = SpatialIndex::new(&sites).unwrap();

        assert_eq!(index.find_nearest(sites[0]), 0);
        assert_eq!(index.find_nearest(sites[1]), 1);
    }

    #[test]
    fn test_spatial_index_empty() {
        assert!(SpatialIndex::new(&[]).is_none());
    }
}
