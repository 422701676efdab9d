use std::f64::consts::{FRAC_PI_2, TAU};

use super::{GeometryError, Rect, Vec2};
use crate::cfg::CONTAINS_EPS;

/// Immutable polygon given by its ordered vertices.
///
/// Invariants:
/// - At least three vertices.
/// - `bounding_rect` is the minimal axis-aligned rect containing all vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    bounding_rect: Rect,
}

impl Polygon {
    /// Polygon from an ordered vertex list.
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }
        let bounding_rect = vertices[1..]
            .iter()
            .fold(Rect::at_point(vertices[0]), |acc, v| acc.union_point(*v));
        Ok(Self {
            vertices,
            bounding_rect,
        })
    }

    /// Regular polygon inscribed in the circle of radius `min(w, h)/2` about
    /// the centre of `rect`.
    ///
    /// Vertex `i` sits at angle `i·Δ + offset` with `Δ = 2π/n`; the offset is
    /// `π/2` for odd `n` (apex on top) and `Δ/2` for even `n` (flat top and
    /// bottom), so every shape is symmetric about the vertical axis.
    pub fn regular(vertex_count: usize, rect: &Rect) -> Result<Self, GeometryError> {
        if vertex_count < 3 {
            return Err(GeometryError::TooFewVertices(vertex_count));
        }
        let r = rect.width().min(rect.height()) / 2.0;
        let step = TAU / vertex_count as f64;
        let offset = if vertex_count % 2 == 0 {
            step / 2.0
        } else {
            FRAC_PI_2
        };
        let center = rect.center();
        let vertices = (0..vertex_count)
            .map(|i| {
                let theta = i as f64 * step + offset;
                center + Vec2::new(theta.cos(), theta.sin()) * r
            })
            .collect();
        let polygon = Self::new(vertices)?;
        let scale = 1.0 + rect.min.amax().max(rect.max.amax());
        debug_assert!(
            rect.contains_polygon_eps(&polygon, CONTAINS_EPS * scale),
            "regular polygon escapes its rect"
        );
        Ok(polygon)
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex `index`; panics when out of range like slice indexing.
    #[inline]
    pub fn vertex(&self, index: usize) -> Vec2 {
        self.vertices[index]
    }

    #[inline]
    pub fn bounding_rect(&self) -> Rect {
        self.bounding_rect
    }
}
