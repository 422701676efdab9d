use rand::Rng;

use super::{GeometryError, Polygon, Vec2};

/// Closed axis-aligned rectangle `[min.x, max.x] × [min.y, max.y]`.
///
/// Invariant: `min.x <= max.x` and `min.y <= max.y`, all coordinates finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rect with lower-left corner `origin` and the given size.
    pub fn new(origin: Vec2, width: f64, height: f64) -> Result<Self, GeometryError> {
        if !(origin.x.is_finite() && origin.y.is_finite()) {
            return Err(GeometryError::NonFiniteOrigin);
        }
        let size_ok = width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0;
        if !size_ok {
            return Err(GeometryError::InvalidRectSize { width, height });
        }
        Ok(Self {
            min: origin,
            max: origin + Vec2::new(width, height),
        })
    }

    /// The unit square `[0,1]²`.
    #[inline]
    pub fn unit() -> Self {
        Self {
            min: Vec2::zeros(),
            max: Vec2::new(1.0, 1.0),
        }
    }

    /// Smallest rect containing both corners (in any order).
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Zero-size rect at `p`.
    #[inline]
    pub fn at_point(p: Vec2) -> Self {
        Self { min: p, max: p }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Closed containment.
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        self.contains_point_eps(p, 0.0)
    }

    /// Containment in the rect grown by `eps` on every side.
    #[inline]
    pub fn contains_point_eps(&self, p: Vec2, eps: f64) -> bool {
        p.x >= self.min.x - eps
            && p.x <= self.max.x + eps
            && p.y >= self.min.y - eps
            && p.y <= self.max.y + eps
    }

    /// True iff every vertex of `polygon` lies in the closed rect.
    pub fn contains_polygon(&self, polygon: &Polygon) -> bool {
        polygon.vertices().iter().all(|v| self.contains_point(*v))
    }

    /// `contains_polygon` with an `eps` slack for trigonometric round-off.
    pub fn contains_polygon_eps(&self, polygon: &Polygon, eps: f64) -> bool {
        polygon
            .vertices()
            .iter()
            .all(|v| self.contains_point_eps(*v, eps))
    }

    /// True iff `other` lies in the closed rect.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Smallest rect containing `self` and `p`.
    pub fn union_point(&self, p: Vec2) -> Self {
        Self {
            min: Vec2::new(self.min.x.min(p.x), self.min.y.min(p.y)),
            max: Vec2::new(self.max.x.max(p.x), self.max.y.max(p.y)),
        }
    }

    /// Uniform random point in the closed rect.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            sample_closed(rng, self.min.x, self.max.x),
            sample_closed(rng, self.min.y, self.max.y),
        )
    }
}

#[inline]
fn sample_closed<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    // `gen_range` panics on an empty range; degenerate sides collapse to `lo`.
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}
