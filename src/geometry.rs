// src/geometry.rs

use crate::error::{Error, Result};
use glam::{DAffine2, DMat2, DVec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D coordinate, either in component-local or in output space.
pub type Point = DVec2;

/// Axis-aligned rectangle given by two opposite corners, in any order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub start: Point,
    pub end: Point,
}

impl Rect {
    pub fn new(start: Point, end: Point) -> Self {
        Rect { start, end }
    }

    pub fn width(&self) -> f64 {
        (self.end.x - self.start.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.end.y - self.start.y).abs()
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            self.start,
            DVec2::new(self.end.x, self.start.y),
            self.end,
            DVec2::new(self.start.x, self.end.y),
        ]
    }
}

/// The four placement rotations a symbol or footprint can be rendered at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    /// Rotation part of the placement matrix as `(a, b, c, d)`.
    ///
    /// Rotation is counter-clockwise as seen on a y-down page. The coefficients
    /// are literal 0/±1 so integer inputs stay integer.
    fn coefficients(self) -> (f64, f64, f64, f64) {
        match self {
            Rotation::R0 => (1.0, 0.0, 0.0, 1.0),
            Rotation::R90 => (0.0, -1.0, 1.0, 0.0),
            Rotation::R180 => (-1.0, 0.0, 0.0, -1.0),
            Rotation::R270 => (0.0, 1.0, -1.0, 0.0),
        }
    }
}

impl TryFrom<i32> for Rotation {
    type Error = Error;

    fn try_from(degrees: i32) -> Result<Self> {
        match degrees {
            0 => Ok(Rotation::R0),
            90 => Ok(Rotation::R90),
            180 => Ok(Rotation::R180),
            270 | -90 => Ok(Rotation::R270),
            other => Err(Error::InvalidRotation(other)),
        }
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> i32 {
        rotation.degrees()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// Affine map `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(DAffine2);

impl Default for Transform {
    fn default() -> Self {
        Transform::identity()
    }
}

impl Transform {
    /// Library space is y-up, the output page is y-down.
    pub const Y_FLIP: Transform = Transform(DAffine2 {
        matrix2: DMat2::from_cols(DVec2::new(1.0, 0.0), DVec2::new(0.0, -1.0)),
        translation: DVec2::ZERO,
    });

    pub fn identity() -> Self {
        Transform(DAffine2::IDENTITY)
    }

    pub fn compose(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Transform(DAffine2::from_mat2_translation(
            DMat2::from_cols(DVec2::new(a, b), DVec2::new(c, d)),
            DVec2::new(tx, ty),
        ))
    }

    /// Rotation applied after the local mirror flags.
    pub fn orientation(rotation: Rotation, mirror_x: bool, mirror_y: bool) -> Self {
        let (mut a, mut b, mut c, mut d) = rotation.coefficients();
        if mirror_x {
            a = -a;
            b = -b;
        }
        if mirror_y {
            c = -c;
            d = -d;
        }
        Transform::compose(a, b, c, d, 0.0, 0.0)
    }

    pub fn a(&self) -> f64 {
        self.0.matrix2.x_axis.x
    }

    pub fn b(&self) -> f64 {
        self.0.matrix2.x_axis.y
    }

    pub fn c(&self) -> f64 {
        self.0.matrix2.y_axis.x
    }

    pub fn d(&self) -> f64 {
        self.0.matrix2.y_axis.y
    }

    pub fn tx(&self) -> f64 {
        self.0.translation.x
    }

    pub fn ty(&self) -> f64 {
        self.0.translation.y
    }

    /// Post-translation: the result maps `p` to `self.apply(p) + (dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        let mut inner = self.0;
        inner.translation += DVec2::new(dx, dy);
        Transform(inner)
    }

    /// Applies `self` first, then `next`.
    pub fn then(&self, next: &Transform) -> Self {
        Transform(next.0 * self.0)
    }

    /// Uniform scale applied after the current map (translation included).
    pub fn scaled(&self, scale: f64) -> Self {
        Transform(DAffine2::from_scale(DVec2::splat(scale)) * self.0)
    }

    pub fn apply(&self, p: Point) -> Point {
        self.0.transform_point2(p)
    }

    /// Maps a direction, ignoring translation.
    pub fn apply_vector(&self, v: Point) -> Point {
        self.0.transform_vector2(v)
    }

    pub fn determinant(&self) -> f64 {
        self.0.matrix2.determinant()
    }

    /// True for the 90/270 family, where local x lands on output y.
    pub fn swaps_axes(&self) -> bool {
        self.c() != 0.0
    }

    /// Output-space angle in degrees (counter-clockwise on the page) of a
    /// local angle given in the same convention.
    pub fn apply_angle(&self, degrees: f64) -> f64 {
        let radians = degrees.to_radians();
        let dir = self.apply_vector(DVec2::new(radians.cos(), -radians.sin()));
        let out = (-dir.y).atan2(dir.x).to_degrees();
        let out = (out * 1e6).round() / 1e6;
        if out <= -180.0 { out + 360.0 } else { out }
    }
}

/// Unit vector at `degrees`, counter-clockwise from +x in a y-up frame.
pub fn polar(degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    DVec2::new(cos, sin)
}

/// Formats a coordinate for markup: rounded to 1e-4 and without `-0`.
pub fn fmt_num(v: f64) -> String {
    let v = (v * 1e4).round() / 1e4;
    if v == 0.0 {
        "0".to_string()
    } else {
        v.to_string()
    }
}
