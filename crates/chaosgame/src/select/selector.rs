use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::VertexSelectionStrategy;
use crate::cfg::MAX_SELECTION_ATTEMPTS;
use crate::geom2::{Polygon, Vec2};

/// Stateful picker of polygon vertices.
///
/// Invariants:
/// - `history.len() <= strategy.kept_history_count()`, most recent first.
/// - Every index returned by `select_index` satisfies the strategy given the
///   history at the time of the call.
#[derive(Clone, Debug)]
pub struct VertexSelector {
    polygon: Polygon,
    strategy: VertexSelectionStrategy,
    history: Vec<usize>,
    rng: StdRng,
}

impl VertexSelector {
    pub fn new(polygon: Polygon, strategy: VertexSelectionStrategy, rng: StdRng) -> Self {
        Self {
            history: Vec::with_capacity(strategy.kept_history_count()),
            polygon,
            strategy,
            rng,
        }
    }

    /// Reproducible selector.
    pub fn from_seed(polygon: Polygon, strategy: VertexSelectionStrategy, seed: u64) -> Self {
        Self::new(polygon, strategy, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(polygon: Polygon, strategy: VertexSelectionStrategy) -> Self {
        Self::new(polygon, strategy, StdRng::from_entropy())
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[inline]
    pub fn strategy(&self) -> VertexSelectionStrategy {
        self.strategy
    }

    /// Previously accepted indices, most recent first.
    #[inline]
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    #[inline]
    pub fn kept_history_count(&self) -> usize {
        self.strategy.kept_history_count()
    }

    /// Pick the next vertex and return its position.
    pub fn select_vertex(&mut self) -> Vec2 {
        let index = self.select_index();
        self.polygon.vertex(index)
    }

    /// Pick the next vertex and return its index.
    ///
    /// Panics if no index is acceptable, which cannot happen for the shipped
    /// strategies on polygons with three or more vertices.
    pub fn select_index(&mut self) -> usize {
        let count = self.polygon.vertex_count();
        let drawn = (0..MAX_SELECTION_ATTEMPTS)
            .map(|_| self.rng.gen_range(0..count))
            .find(|&candidate| self.strategy.accepts(candidate, &self.history, count));
        let index = match drawn.or_else(|| self.scan_candidates()) {
            Some(index) => index,
            None => {
                tracing::error!(
                    strategy = %self.strategy,
                    vertex_count = count,
                    history = ?self.history,
                    "no vertex satisfies the selection strategy"
                );
                panic!(
                    "vertex selection strategy `{}` refused all {} vertices",
                    self.strategy, count
                );
            }
        };
        self.remember(index);
        index
    }

    /// One pass over all candidates starting at a random offset.
    fn scan_candidates(&mut self) -> Option<usize> {
        let count = self.polygon.vertex_count();
        let start = self.rng.gen_range(0..count);
        tracing::warn!(
            strategy = %self.strategy,
            attempts = MAX_SELECTION_ATTEMPTS,
            "rejection sampling exhausted, scanning candidates"
        );
        (0..count)
            .map(|k| (start + k) % count)
            .find(|&candidate| self.strategy.accepts(candidate, &self.history, count))
    }

    fn remember(&mut self, index: usize) {
        let kept = self.strategy.kept_history_count();
        if kept == 0 {
            return;
        }
        self.history.insert(0, index);
        self.history.truncate(kept);
    }
}
