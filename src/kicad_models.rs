// src/kicad_models.rs

use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::layers::PcbLayer;
use crate::orientation::Orientation;
use serde::{Deserialize, Serialize};

fn yes() -> bool {
    true
}

fn one() -> u32 {
    1
}

/// Literal text that stands for the instance reference (`U1`, `R3`...).
pub const REFERENCE_TOKEN: &str = "%R";
/// Literal text that stands for the instance value (`4.7k`, `LM358`...).
pub const VALUE_TOKEN: &str = "%V";

/// Which instance field a substitution token refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldToken {
    Reference,
    Value,
}

impl FieldToken {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            REFERENCE_TOKEN => Some(FieldToken::Reference),
            VALUE_TOKEN => Some(FieldToken::Value),
            _ => None,
        }
    }
}

// --- Text attributes ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAngle {
    #[default]
    #[serde(alias = "H")]
    Horizontal,
    #[serde(alias = "V")]
    Vertical,
}

impl TextAngle {
    pub fn degrees(self) -> f64 {
        match self {
            TextAngle::Horizontal => 0.0,
            TextAngle::Vertical => 90.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            TextAngle::Horizontal => TextAngle::Vertical,
            TextAngle::Vertical => TextAngle::Horizontal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HJustify {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VJustify {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Fill mode of a closed library shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    #[default]
    None,
    /// Filled with the stroke color.
    Filled,
    /// Filled with the body background color.
    Background,
}

// --- Symbol Structs ---

/// Reference or value field of a library symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub text: String,
    #[serde(default)]
    pub pos: Point,
    pub size: f64,
    #[serde(default)]
    pub orientation: TextAngle,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub hjustify: HJustify,
    #[serde(default)]
    pub vjustify: VJustify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinShape {
    #[default]
    Line,
    Inverted,
    Clock,
    InvertedClock,
    NonLogic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub number: String,
    #[serde(default)]
    pub name: String,
    /// Connection point.
    pub pos: Point,
    pub length: f64,
    pub orientation: Orientation,
    #[serde(default)]
    pub shape: PinShape,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default)]
    pub name_size: f64,
    #[serde(default)]
    pub number_size: f64,
    #[serde(default)]
    pub unit: u32,
    #[serde(default)]
    pub convert: u32,
}

impl Pin {
    /// Point where the pin meets the symbol body.
    pub fn body_end(&self) -> Point {
        self.pos + self.orientation.local_vector() * self.length
    }

    /// Pin names starting with `~` are not drawn.
    pub fn has_name(&self) -> bool {
        !self.name.is_empty() && !self.name.starts_with('~')
    }

    pub fn in_unit(&self, unit: u32, convert: u32) -> bool {
        in_unit(self.unit, self.convert, unit, convert)
    }
}

/// Graphic primitive of a library symbol, in library units (y-up).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LibShape {
    Polyline {
        points: Vec<Point>,
        #[serde(default)]
        width: f64,
        #[serde(default)]
        fill: Fill,
    },
    Rectangle {
        start: Point,
        end: Point,
        #[serde(default)]
        width: f64,
        #[serde(default)]
        fill: Fill,
    },
    Circle {
        center: Point,
        radius: f64,
        #[serde(default)]
        width: f64,
        #[serde(default)]
        fill: Fill,
    },
    /// Swept counter-clockwise from `start_angle` to `end_angle` (degrees).
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        #[serde(default)]
        width: f64,
        #[serde(default)]
        fill: Fill,
    },
    Text {
        text: String,
        pos: Point,
        size: f64,
        #[serde(default)]
        orientation: TextAngle,
        #[serde(default = "yes")]
        visible: bool,
        #[serde(default)]
        italic: bool,
        #[serde(default)]
        bold: bool,
        #[serde(default)]
        hjustify: HJustify,
        #[serde(default)]
        vjustify: VJustify,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibItem {
    #[serde(default)]
    pub unit: u32,
    #[serde(default)]
    pub convert: u32,
    #[serde(flatten)]
    pub shape: LibShape,
}

impl LibItem {
    pub fn in_unit(&self, unit: u32, convert: u32) -> bool {
        in_unit(self.unit, self.convert, unit, convert)
    }

    /// Inline texts that only carry a substitution token.
    pub fn field_token(&self) -> Option<FieldToken> {
        match &self.shape {
            LibShape::Text { text, .. } => FieldToken::parse(text),
            _ => None,
        }
    }
}

/// Unit/convert 0 means "common to all units".
fn in_unit(item_unit: u32, item_convert: u32, unit: u32, convert: u32) -> bool {
    (item_unit == 0 || item_unit == unit) && (item_convert == 0 || item_convert == convert)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub reference: Field,
    pub value: Field,
    #[serde(default = "one")]
    pub unit_count: u32,
    /// Distance between the pin end and the pin name; 0 puts names above pins.
    #[serde(default)]
    pub pin_name_offset: f64,
    #[serde(default = "yes")]
    pub show_pin_numbers: bool,
    #[serde(default = "yes")]
    pub show_pin_names: bool,
    /// Bounding rectangle computed by the library loader, when available.
    #[serde(default)]
    pub bounding_rect: Option<Rect>,
    #[serde(default)]
    pub items: Vec<LibItem>,
    #[serde(default)]
    pub pins: Vec<Pin>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolLibrary {
    pub name: String,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
}

impl SymbolLibrary {
    pub fn find_by_name(&self, name: &str) -> Result<&Symbol> {
        self.symbols
            .iter()
            .find(|symbol| symbol.name == name)
            .ok_or_else(|| Error::NotFound(format!("symbol '{}' in library '{}'", name, self.name)))
    }
}

// --- Footprint Structs ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FpTextKind {
    Reference,
    Value,
    #[default]
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FpText {
    #[serde(default)]
    pub kind: FpTextKind,
    pub text: String,
    pub pos: Point,
    /// Glyph (width, height).
    pub size: Point,
    #[serde(default)]
    pub thickness: f64,
    /// Degrees, counter-clockwise on the page.
    #[serde(default)]
    pub angle: f64,
    pub layer: PcbLayer,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub hjustify: HJustify,
    #[serde(default)]
    pub vjustify: VJustify,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum EdgeShape {
    Segment {
        start: Point,
        end: Point,
    },
    /// `end` is any point on the circle.
    Circle {
        center: Point,
        end: Point,
    },
    /// Starts at `start` and sweeps `angle` degrees around `center`,
    /// clockwise on the page for positive angles.
    Arc {
        center: Point,
        start: Point,
        angle: f64,
    },
    Polygon {
        points: Vec<Point>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FpEdge {
    pub layer: PcbLayer,
    #[serde(default)]
    pub width: f64,
    #[serde(flatten)]
    pub shape: EdgeShape,
}

impl FpEdge {
    /// Points the outline walker accounts for.
    pub fn points(&self) -> Vec<Point> {
        match &self.shape {
            EdgeShape::Segment { start, end } => vec![*start, *end],
            EdgeShape::Circle { center, end } => {
                let r = center.distance(*end);
                vec![*center - Point::splat(r), *center + Point::splat(r)]
            }
            EdgeShape::Arc { center, start, angle } => {
                vec![*start, arc_end(*center, *start, *angle)]
            }
            EdgeShape::Polygon { points } => points.clone(),
        }
    }
}

/// End point of a page arc (y-down, positive angle clockwise on the page).
pub fn arc_end(center: Point, start: Point, angle: f64) -> Point {
    let (sin, cos) = angle.to_radians().sin_cos();
    let d = start - center;
    center + Point::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FpGraphic {
    Edge(FpEdge),
    Text(FpText),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadShape {
    Circle,
    #[default]
    Rect,
    Oval,
    Trapezoid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillShape {
    #[default]
    Circle,
    Oblong,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    pub name: String,
    pub pos: Point,
    pub size: Point,
    /// Degrees, counter-clockwise on the page.
    #[serde(default)]
    pub orientation: f64,
    #[serde(default)]
    pub shape: PadShape,
    /// Trapezoid deformation (KiCad `rect_delta`).
    #[serde(default)]
    pub delta: Point,
    #[serde(default)]
    pub drill_shape: DrillShape,
    #[serde(default)]
    pub drill_size: Point,
    #[serde(default)]
    pub layers: Vec<PcbLayer>,
}

impl Pad {
    pub fn has_drill(&self) -> bool {
        self.drill_size.x > 0.0
    }

    /// Maps a pad-relative offset to footprint coordinates, honoring the pad rotation.
    pub fn to_footprint(&self, offset: Point) -> Point {
        let (sin, cos) = self.orientation.to_radians().sin_cos();
        // counter-clockwise on a y-down page
        self.pos + Point::new(offset.x * cos + offset.y * sin, -offset.x * sin + offset.y * cos)
    }

    /// Pad outline corners in footprint coordinates.
    pub fn corners(&self) -> [Point; 4] {
        let half = self.size / 2.0;
        let delta = if self.shape == PadShape::Trapezoid {
            self.delta / 2.0
        } else {
            Point::ZERO
        };
        [
            Point::new(-half.x - delta.y, half.y + delta.x),
            Point::new(half.x + delta.y, half.y - delta.x),
            Point::new(half.x - delta.y, -half.y + delta.x),
            Point::new(-half.x + delta.y, -half.y - delta.x),
        ]
        .map(|corner| self.to_footprint(corner))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub name: String,
    pub reference: FpText,
    pub value: FpText,
    #[serde(default)]
    pub graphics: Vec<FpGraphic>,
    #[serde(default)]
    pub pads: Vec<Pad>,
}

impl Footprint {
    pub fn edges(&self) -> impl Iterator<Item = &FpEdge> {
        self.graphics.iter().filter_map(|graphic| match graphic {
            FpGraphic::Edge(edge) => Some(edge),
            FpGraphic::Text(_) => None,
        })
    }

    pub fn user_texts(&self) -> impl Iterator<Item = &FpText> {
        self.graphics.iter().filter_map(|graphic| match graphic {
            FpGraphic::Text(text) => Some(text),
            FpGraphic::Edge(_) => None,
        })
    }
}
