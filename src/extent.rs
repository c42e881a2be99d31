// src/extent.rs

use crate::geometry::{Point, Rect, Transform, polar};
use crate::kicad_models::{Footprint, LibShape, Symbol};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    fn include(&mut self, v: f64) {
        if v < self.min {
            self.min = v;
        }
        if v > self.max {
            self.max = v;
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Running bounding envelope, seeded at the component anchor (origin).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Extent {
    pub width: Range,
    pub height: Range,
}

impl Extent {
    pub fn new() -> Self {
        Extent::default()
    }

    pub fn include(&mut self, p: Point) {
        self.width.include(p.x);
        self.height.include(p.y);
    }

    pub fn include_all(&mut self, points: impl IntoIterator<Item = Point>) {
        for p in points {
            self.include(p);
        }
    }

    pub fn width(&self) -> f64 {
        self.width.span()
    }

    pub fn height(&self) -> f64 {
        self.height.span()
    }

    pub fn origin(&self) -> Point {
        Point::new(self.width.min, self.height.min)
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.origin(),
            Point::new(self.width.max, self.height.max),
        )
    }

    /// Degenerate envelope holding only `p`.
    pub fn around(p: Point) -> Self {
        Extent {
            width: Range { min: p.x, max: p.x },
            height: Range { min: p.y, max: p.y },
        }
    }

    /// Exact envelope of a rectangle, not seeded at the origin.
    pub fn from_rect(rect: &Rect) -> Self {
        let mut extent = Extent::around(rect.start);
        extent.include(rect.end);
        extent
    }

    /// Envelope of the transformed corners.
    pub fn transformed(&self, transform: &Transform) -> Extent {
        let corners = self.to_rect().corners().map(|c| transform.apply(c));
        let mut out = Extent::around(corners[0]);
        out.include_all(corners);
        out
    }
}

/// Anything whose local geometry can be enveloped.
pub trait Extents {
    fn extent(&self) -> Extent;
}

pub fn compute_extent<C: Extents + ?Sized>(component: &C) -> Extent {
    component.extent()
}

impl Extents for Footprint {
    /// Outline edges plus pad bodies, which often reach past the silkscreen.
    fn extent(&self) -> Extent {
        let mut outline = Extent::new();
        for edge in self.edges() {
            outline.include_all(edge.points());
        }
        for pad in &self.pads {
            outline.include_all(pad.corners());
        }
        outline
    }
}

impl Extents for Symbol {
    fn extent(&self) -> Extent {
        let mut outline = Extent::new();
        for item in &self.items {
            match &item.shape {
                LibShape::Polyline { points, .. } => outline.include_all(points.iter().copied()),
                LibShape::Rectangle { start, end, .. } => {
                    outline.include(*start);
                    outline.include(*end);
                }
                LibShape::Circle { center, radius, .. } => {
                    outline.include(*center - Point::splat(*radius));
                    outline.include(*center + Point::splat(*radius));
                }
                LibShape::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                    ..
                } => {
                    outline.include(*center + polar(*start_angle) * *radius);
                    outline.include(*center + polar(*end_angle) * *radius);
                }
                LibShape::Text { pos, .. } => outline.include(*pos),
            }
        }
        for pin in &self.pins {
            outline.include(pin.pos);
            outline.include(pin.body_end());
        }
        outline
    }
}
