// src/orientation.rs

use crate::geometry::{Point, Transform};
use serde::{Deserialize, Serialize};

/// Compass direction of a pin, pointing from its connection point into the body.
///
/// Used both for the local direction stored in a library and for the
/// classified direction after placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Orientation {
    #[serde(alias = "U")]
    Up,
    #[serde(alias = "D")]
    Down,
    #[serde(alias = "L")]
    Left,
    #[serde(alias = "R")]
    Right,
}

/// Side of the symbol a port sits on, as understood by the diagram renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl PortSide {
    pub fn as_str(self) -> &'static str {
        match self {
            PortSide::Top => "top",
            PortSide::Bottom => "bottom",
            PortSide::Left => "left",
            PortSide::Right => "right",
        }
    }
}

impl Orientation {
    /// Unit vector in library space (y-up).
    pub fn local_vector(self) -> Point {
        match self {
            Orientation::Up => Point::new(0.0, 1.0),
            Orientation::Down => Point::new(0.0, -1.0),
            Orientation::Left => Point::new(-1.0, 0.0),
            Orientation::Right => Point::new(1.0, 0.0),
        }
    }

    /// Unit vector on the output page (y-down).
    pub fn page_vector(self) -> Point {
        match self {
            Orientation::Up => Point::new(0.0, -1.0),
            Orientation::Down => Point::new(0.0, 1.0),
            Orientation::Left => Point::new(-1.0, 0.0),
            Orientation::Right => Point::new(1.0, 0.0),
        }
    }

    /// A pin pointing right into the body has its port on the body's left.
    pub fn port_side(self) -> PortSide {
        match self {
            Orientation::Up => PortSide::Bottom,
            Orientation::Down => PortSide::Top,
            Orientation::Left => PortSide::Right,
            Orientation::Right => PortSide::Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::Up | Orientation::Down)
    }

    /// Buckets an output-space vector by dominant axis and sign.
    pub fn from_page_vector(v: Point) -> Self {
        if v.x == 0.0 || v.y.abs() > v.x.abs() {
            if v.y > 0.0 {
                Orientation::Down
            } else {
                Orientation::Up
            }
        } else if v.x < 0.0 {
            Orientation::Left
        } else {
            Orientation::Right
        }
    }
}

/// Direction a pin points on the page once `transform` is applied.
///
/// Translation is ignored; only the rotation/mirror/scale part matters.
pub fn classify(local: Orientation, transform: &Transform) -> Orientation {
    Orientation::from_page_vector(transform.apply_vector(local.local_vector()))
}
