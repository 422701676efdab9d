//! Validated Chaos Game configuration.
//!
//! A `ChaosGameSettings` value is an immutable snapshot: a runner consumes it
//! on `reset` to build a fresh polygon, selector, and generator. Invalid values
//! are rejected, never clamped.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::generator::{validate_distance_factor, PointGenerator};
use crate::geom2::{GeometryError, Polygon, Rect};
use crate::select::{VertexSelectionStrategy, VertexSelector};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("polygon vertex count must be at least 3, got {0}")]
    InvalidVertexCount(usize),
    #[error("distance factor must lie strictly between 0 and 1, got {0}")]
    InvalidDistanceFactor(f64),
    #[error("`not n places away` needs n >= 1, got {0}")]
    InvalidPlacesAway(usize),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Polygon shape, step size, and vertex constraint for one run.
///
/// `distance_factor` is the fraction of the remaining distance travelled
/// toward the selected vertex on every step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChaosGameSettings {
    pub polygon_vertex_count: usize,
    pub distance_factor: f64,
    pub vertex_selection_strategy: VertexSelectionStrategy,
}

impl Default for ChaosGameSettings {
    fn default() -> Self {
        Self {
            polygon_vertex_count: 3,
            distance_factor: 0.5,
            vertex_selection_strategy: VertexSelectionStrategy::Random,
        }
    }
}

impl ChaosGameSettings {
    pub fn new(
        polygon_vertex_count: usize,
        distance_factor: f64,
        vertex_selection_strategy: VertexSelectionStrategy,
    ) -> Result<Self, SettingsError> {
        let settings = Self {
            polygon_vertex_count,
            distance_factor,
            vertex_selection_strategy,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.polygon_vertex_count < 3 {
            return Err(SettingsError::InvalidVertexCount(self.polygon_vertex_count));
        }
        validate_distance_factor(self.distance_factor)?;
        if let VertexSelectionStrategy::NotNPlacesAway { n: 0 } = self.vertex_selection_strategy {
            return Err(SettingsError::InvalidPlacesAway(0));
        }
        Ok(())
    }

    /// Build a generator whose regular polygon is inscribed in `bounds`.
    ///
    /// The initial point is drawn uniformly from the polygon's bounding rect
    /// using `rng`, which the selector then keeps.
    pub fn make_generator(
        &self,
        bounds: &Rect,
        mut rng: StdRng,
    ) -> Result<PointGenerator, SettingsError> {
        self.validate()?;
        let polygon = Polygon::regular(self.polygon_vertex_count, bounds)?;
        let initial_point = polygon.bounding_rect().random_point(&mut rng);
        let selector = VertexSelector::new(polygon, self.vertex_selection_strategy, rng);
        PointGenerator::new(initial_point, selector, self.distance_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::IterativeGenerator;
    use rand::SeedableRng;

    #[test]
    fn defaults_match_sierpinski_triangle() {
        let s = ChaosGameSettings::default();
        assert_eq!(s.polygon_vertex_count, 3);
        assert_eq!(s.distance_factor, 0.5);
        assert_eq!(s.vertex_selection_strategy, VertexSelectionStrategy::Random);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn invalid_values_fail_fast() {
        use VertexSelectionStrategy::*;
        assert_eq!(
            ChaosGameSettings::new(2, 0.5, Random),
            Err(SettingsError::InvalidVertexCount(2))
        );
        assert_eq!(
            ChaosGameSettings::new(3, 1.0, Random),
            Err(SettingsError::InvalidDistanceFactor(1.0))
        );
        assert_eq!(
            ChaosGameSettings::new(3, 0.5, NotNPlacesAway { n: 0 }),
            Err(SettingsError::InvalidPlacesAway(0))
        );
    }

    #[test]
    fn places_away_beyond_two_is_accepted() {
        let s = ChaosGameSettings::new(5, 0.5, VertexSelectionStrategy::NotNPlacesAway { n: 7 })
            .unwrap();
        let mut g = s
            .make_generator(&Rect::unit(), rand::rngs::StdRng::seed_from_u64(21))
            .unwrap();
        let mut prev = None;
        for _ in 0..2_000 {
            g.generate();
            let last = g.vertex_selector().history()[0];
            if let Some(p) = prev {
                // 7 mod 5 == 2: never two places after the previous pick.
                assert_ne!(p, (last + 2) % 5);
            }
            prev = Some(last);
        }
    }

    #[test]
    fn generator_starts_inside_polygon_bounds() {
        let s = ChaosGameSettings::new(5, 0.4, VertexSelectionStrategy::NonRepeating).unwrap();
        let bounds = Rect::unit();
        let g = s
            .make_generator(&bounds, StdRng::seed_from_u64(3))
            .unwrap();
        assert_eq!(g.iteration(), 0);
        assert_eq!(g.polygon().vertex_count(), 5);
        assert_eq!(g.distance_factor(), 0.4);
        assert!(g.polygon().bounding_rect().contains_point(g.initial_point()));
        assert_eq!(
            g.vertex_selector().strategy(),
            VertexSelectionStrategy::NonRepeating
        );
    }

    #[test]
    fn make_generator_revalidates_mutated_settings() {
        let mut s = ChaosGameSettings::default();
        s.distance_factor = 0.0;
        assert!(s
            .make_generator(&Rect::unit(), StdRng::seed_from_u64(0))
            .is_err());
    }

    #[test]
    fn json_uses_camel_case_and_fills_defaults() {
        let s: ChaosGameSettings =
            serde_json::from_str(r#"{"polygonVertexCount": 6, "distanceFactor": 0.3}"#).unwrap();
        assert_eq!(s.polygon_vertex_count, 6);
        assert_eq!(s.distance_factor, 0.3);
        assert_eq!(s.vertex_selection_strategy, VertexSelectionStrategy::Random);
        let json = serde_json::to_value(ChaosGameSettings::default()).unwrap();
        assert_eq!(json["polygonVertexCount"], 3);
        assert_eq!(json["vertexSelectionStrategy"]["kind"], "random");
    }
}
