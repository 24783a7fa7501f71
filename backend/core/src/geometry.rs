//! Pixel geometry shared by the recognition stream and the reconstructed layout.
//!
//! Coordinates use a top-left origin with `y` growing downward.

use serde::{Deserialize, Serialize};

/// A polygon corner as reported by the OCR provider.
///
/// The provider omits coordinates that are zero, so both fields default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

impl Vertex {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle. `width` and `height` are never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    /// Build a box, clamping negative extents to zero.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Box of a quadrilateral given clockwise from the top-left corner.
    pub fn from_quad(quad: &[Vertex; 4]) -> Self {
        Self::new(
            quad[0].x,
            quad[0].y,
            quad[1].x.saturating_sub(quad[0].x),
            quad[3].y.saturating_sub(quad[0].y),
        )
    }

    /// Box of an arbitrary polygon.
    ///
    /// Four vertices use the quadrilateral rule; any other count falls back
    /// to the min/max envelope, and an empty list yields a zero box.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        if let Ok(quad) = <&[Vertex; 4]>::try_from(vertices) {
            return Self::from_quad(quad);
        }
        let Some(first) = vertices.first() else {
            return Self::default();
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for v in &vertices[1..] {
            min_x = min_x.min(v.x);
            min_y = min_y.min(v.y);
            max_x = max_x.max(v.x);
            max_y = max_y.max(v.y);
        }
        Self::new(
            min_x,
            min_y,
            max_x.saturating_sub(min_x),
            max_y.saturating_sub(min_y),
        )
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    /// `true` when this box lies entirely above `other`.
    pub fn is_above(&self, other: &BoundingBox) -> bool {
        self.bottom() <= other.top()
    }

    /// `true` when this box lies entirely below `other`.
    pub fn is_under(&self, other: &BoundingBox) -> bool {
        self.top() >= other.bottom()
    }

    /// Closed-interval overlap test; touching edges count as intersecting.
    pub fn intersects(a: &BoundingBox, b: &BoundingBox) -> bool {
        a.left() <= b.right()
            && a.right() >= b.left()
            && a.top() <= b.bottom()
            && a.bottom() >= b.top()
    }

    /// Fold a word quadrilateral into this running bound.
    ///
    /// Extents are measured from the current origin before the origin moves,
    /// so the result is a running bound rather than a strict rectangle union.
    /// Extents saturate at `i32::MAX`.
    pub fn grow_to(&mut self, quad: &[Vertex; 4]) {
        self.width = self.width.max(quad[1].x.saturating_sub(self.x));
        self.height = self.height.max(quad[3].y.saturating_sub(self.y));
        self.x = self.x.min(quad[0].x);
        self.y = self.y.min(quad[0].y);
    }
}
