//! Point generation: one Chaos Game step per call.
//!
//! Model
//! - Start from an initial point `p₀`. Step `k` selects a vertex `v` and
//!   appends `p_k = (1 - f)·p_{k-1} + f·v`, where `f` is the distance factor:
//!   the fraction of the remaining distance travelled toward `v`.
//! - The full history is kept so consumers can redraw everything after a
//!   resize; `iteration = points.len() - 1`.

use crate::geom2::{Polygon, Vec2};
use crate::select::VertexSelector;
use crate::settings::SettingsError;

/// A generator that produces one value per step and counts its steps.
pub trait IterativeGenerator {
    type Output;

    /// Number of values generated so far.
    fn iteration(&self) -> usize;

    fn generate(&mut self) -> Self::Output;

    /// `n` consecutive values in generation order.
    fn generate_batch(&mut self, n: usize) -> Vec<Self::Output> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.generate());
        }
        out
    }
}

/// Values produced in one delivery plus the generator's iteration after them.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedBatch<T> {
    pub values: Vec<T>,
    pub iteration: usize,
}

impl<T> GeneratedBatch<T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Chaos Game stepping function with full point history.
///
/// Invariants:
/// - `0 < distance_factor < 1`.
/// - `points` is never empty; `points[0]` is the initial point.
#[derive(Clone, Debug)]
pub struct PointGenerator {
    selector: VertexSelector,
    distance_factor: f64,
    points: Vec<Vec2>,
}

impl PointGenerator {
    pub fn new(
        initial_point: Vec2,
        selector: VertexSelector,
        distance_factor: f64,
    ) -> Result<Self, SettingsError> {
        validate_distance_factor(distance_factor)?;
        Ok(Self {
            selector,
            distance_factor,
            points: vec![initial_point],
        })
    }

    #[inline]
    pub fn distance_factor(&self) -> f64 {
        self.distance_factor
    }

    #[inline]
    pub fn initial_point(&self) -> Vec2 {
        self.points[0]
    }

    #[inline]
    pub fn last_point(&self) -> Vec2 {
        self.points[self.points.len() - 1]
    }

    /// Every point generated so far, starting with the initial point.
    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        self.selector.polygon()
    }

    #[inline]
    pub fn vertex_selector(&self) -> &VertexSelector {
        &self.selector
    }
}

impl IterativeGenerator for PointGenerator {
    type Output = Vec2;

    #[inline]
    fn iteration(&self) -> usize {
        self.points.len() - 1
    }

    fn generate(&mut self) -> Vec2 {
        let vertex = self.selector.select_vertex();
        let point = self.last_point().lerp(&vertex, self.distance_factor);
        self.points.push(point);
        point
    }

    fn generate_batch(&mut self, n: usize) -> Vec<Vec2> {
        self.points.reserve(n);
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.generate());
        }
        out
    }
}

pub(crate) fn validate_distance_factor(f: f64) -> Result<(), SettingsError> {
    if f.is_finite() && f > 0.0 && f < 1.0 {
        Ok(())
    } else {
        Err(SettingsError::InvalidDistanceFactor(f))
    }
}
