//! Planar geometry for the Chaos Game.
//!
//! Purpose
//! - `Rect`: closed axis-aligned rectangle used as the drawing bounds and as a
//!   polygon's bounding box.
//! - `Polygon`: immutable ordered vertex list (at least three vertices) with a
//!   regular-polygon constructor.
//!
//! Conventions
//! - Points are `nalgebra::Vector2<f64>` (`Vec2`), y pointing up.
//! - Containment is closed: points on the boundary are inside.

mod polygon;
mod rect;

pub use polygon::Polygon;
pub use rect::Rect;

/// Point or displacement in the plane.
pub type Vec2 = nalgebra::Vector2<f64>;

/// Construction-time violations for geometric types.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("rect size must be finite and non-negative, got {width} x {height}")]
    InvalidRectSize { width: f64, height: f64 },
    #[error("rect origin must be finite")]
    NonFiniteOrigin,
}
