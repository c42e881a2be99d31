// src/plotter.rs

use crate::error::{Error, Result};
use crate::geometry::{Point, fmt_num};
use crate::kicad_models::{Fill, HJustify, VJustify};
use indexmap::IndexMap;
use quick_xml::escape::escape;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

static XML_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9._:-]*$").expect("valid XML name pattern"));

/// Baseline pitch of multiline text, relative to the font size.
const INTERLINE_PITCH: f64 = 1.62;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(194, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 194, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 194);
    pub const CYAN: Color = Color::rgb(0, 194, 194);
    pub const MAGENTA: Color = Color::rgb(194, 0, 194);
    pub const YELLOW: Color = Color::rgb(194, 194, 0);
    pub const LIGHTGRAY: Color = Color::rgb(194, 194, 194);
    pub const DARKGRAY: Color = Color::rgb(72, 72, 72);
    /// Body background of filled schematic shapes.
    pub const LIGHTYELLOW: Color = Color::rgb(255, 255, 194);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Tag attributes, written in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(IndexMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Attributes::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_num(self, name: impl Into<String>, value: f64) -> Self {
        self.with(name, fmt_num(value))
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.0.insert(name.into(), value.to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A text run to emit, already in page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem<'a> {
    pub pos: Point,
    pub color: Option<Color>,
    pub text: &'a str,
    /// Degrees, counter-clockwise on the page. 90 is vertical text.
    pub angle: f64,
    pub size: f64,
    pub hjustify: HJustify,
    pub vjustify: VJustify,
    pub width: f64,
    pub italic: bool,
    pub bold: bool,
    pub multiline: bool,
}

impl<'a> TextItem<'a> {
    pub fn new(pos: Point, text: &'a str, size: f64) -> Self {
        TextItem {
            pos,
            color: None,
            text,
            angle: 0.0,
            size,
            hjustify: HJustify::Left,
            vjustify: VJustify::Bottom,
            width: 0.0,
            italic: false,
            bold: false,
            multiline: false,
        }
    }
}

/// SVG elliptical-arc segment in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPath {
    pub start: Point,
    pub end: Point,
    pub radius: f64,
    pub large_arc: bool,
    /// SVG sweep flag: clockwise on the page.
    pub sweep: bool,
}

/// Append-only markup buffer shared by every emitter.
#[derive(Debug)]
pub struct PlotContext {
    output: String,
    color: Color,
    depth: usize,
}

impl Default for PlotContext {
    fn default() -> Self {
        PlotContext::new()
    }
}

impl PlotContext {
    pub fn new() -> Self {
        PlotContext {
            output: String::new(),
            color: Color::BLACK,
            depth: 0,
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn push_raw(&mut self, markup: &str) {
        self.output.push_str(markup);
    }

    fn write_attrs<'n>(&mut self, attrs: impl IntoIterator<Item = (&'n str, &'n str)>) -> Result<()> {
        for (name, value) in attrs {
            if !XML_NAME.is_match(name) {
                return Err(Error::InvalidName(name.to_string()));
            }
            self.output.push_str(&format!(" {}=\"{}\"", name, escape(value)));
        }
        Ok(())
    }

    pub fn open_group<'n>(
        &mut self,
        attrs: impl IntoIterator<Item = (&'n str, &'n str)>,
        transform: Option<&str>,
    ) -> Result<()> {
        self.output.push_str("\n<g");
        if let Some(transform) = transform.filter(|t| !t.is_empty()) {
            self.output.push_str(&format!(" transform=\"{}\"", escape(transform)));
        }
        self.write_attrs(attrs)?;
        self.output.push('>');
        self.depth += 1;
        Ok(())
    }

    pub fn close_group(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(Error::UnbalancedGroup("end_group without an open group".to_string()));
        }
        self.depth -= 1;
        self.output.push_str("</g>\n");
        Ok(())
    }

    pub fn check_balanced(&self) -> Result<()> {
        if self.depth != 0 {
            return Err(Error::UnbalancedGroup(format!("{} group(s) left open", self.depth)));
        }
        Ok(())
    }

    pub fn tag<'n>(&mut self, tag: &str, attrs: impl IntoIterator<Item = (&'n str, &'n str)>) -> Result<()> {
        if !XML_NAME.is_match(tag) {
            return Err(Error::InvalidName(tag.to_string()));
        }
        self.output.push_str(&format!("\n<{}", tag));
        self.write_attrs(attrs)?;
        self.output.push_str("/>\n");
        Ok(())
    }

    fn paint(&self, fill: Fill, width: f64) -> String {
        let fill = match fill {
            Fill::None => "none".to_string(),
            Fill::Filled => self.color.to_string(),
            Fill::Background => Color::LIGHTYELLOW.to_string(),
        };
        if width > 0.0 {
            format!(
                "fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"",
                fill,
                self.color,
                fmt_num(width)
            )
        } else {
            format!("fill=\"{}\" stroke=\"none\"", fill)
        }
    }

    /// Open polyline, closed when filled.
    pub fn polyline(&mut self, points: &[Point], fill: Fill, width: f64) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut d = format!("M{} {}", fmt_num(first.x), fmt_num(first.y));
        for p in rest {
            d.push_str(&format!(" L{} {}", fmt_num(p.x), fmt_num(p.y)));
        }
        if fill != Fill::None {
            d.push_str(" Z");
        }
        let paint = self.paint(fill, width);
        self.output.push_str(&format!("\n<path d=\"{}\" {}/>", d, paint));
    }

    pub fn rect(&mut self, p1: Point, p2: Point, fill: Fill, width: f64) {
        let min = p1.min(p2);
        let size = (p2 - p1).abs();
        let paint = self.paint(fill, width);
        self.output.push_str(&format!(
            "\n<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {}/>",
            fmt_num(min.x),
            fmt_num(min.y),
            fmt_num(size.x),
            fmt_num(size.y),
            paint
        ));
    }

    pub fn circle(&mut self, center: Point, diameter: f64, fill: Fill, width: f64) {
        let paint = self.paint(fill, width);
        self.output.push_str(&format!(
            "\n<circle cx=\"{}\" cy=\"{}\" r=\"{}\" {}/>",
            fmt_num(center.x),
            fmt_num(center.y),
            fmt_num(diameter / 2.0),
            paint
        ));
    }

    pub fn arc(&mut self, arc: &ArcPath, fill: Fill, width: f64) {
        let r = fmt_num(arc.radius);
        let paint = self.paint(fill, width);
        self.output.push_str(&format!(
            "\n<path d=\"M{} {} A{} {} 0 {} {} {} {}\" {}/>",
            fmt_num(arc.start.x),
            fmt_num(arc.start.y),
            r,
            r,
            u8::from(arc.large_arc),
            u8::from(arc.sweep),
            fmt_num(arc.end.x),
            fmt_num(arc.end.y),
            paint
        ));
    }

    /// Straight stroke with round caps, used for oval pads and slots.
    pub fn thick_segment(&mut self, start: Point, end: Point, width: f64) {
        self.output.push_str(&format!(
            "\n<path d=\"M{} {} L{} {}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\"/>",
            fmt_num(start.x),
            fmt_num(start.y),
            fmt_num(end.x),
            fmt_num(end.y),
            self.color,
            fmt_num(width)
        ));
    }

    /// Writes a `<text>` element. `extra` attributes come last, in order.
    pub fn text(&mut self, item: &TextItem, class: Option<&str>, extra: &[(&str, &str)]) {
        let (x, y) = (fmt_num(item.pos.x), fmt_num(item.pos.y));
        let mut el = String::from("\n<text");
        if let Some(class) = class {
            el.push_str(&format!(" class=\"{}\"", escape(class)));
        }
        el.push_str(&format!(" style=\"font-size:{}px;\"", fmt_num(item.size)));
        if item.angle != 0.0 {
            el.push_str(&format!(" transform=\"rotate({}, {}, {})\"", fmt_num(-item.angle), x, y));
        }
        el.push_str(&format!(" x=\"{}\" y=\"{}\"", x, y));
        match item.hjustify {
            HJustify::Left => {}
            HJustify::Center => el.push_str(" text-anchor=\"middle\""),
            HJustify::Right => el.push_str(" text-anchor=\"end\""),
        }
        match item.vjustify {
            VJustify::Bottom => {}
            VJustify::Center => el.push_str(" dominant-baseline=\"central\""),
            VJustify::Top => el.push_str(" dominant-baseline=\"hanging\""),
        }
        if item.italic {
            el.push_str(" font-style=\"italic\"");
        }
        if item.bold {
            el.push_str(" font-weight=\"bold\"");
        }
        if let Some(color) = item.color {
            el.push_str(&format!(" fill=\"{}\"", color));
        }
        for (name, value) in extra {
            el.push_str(&format!(" {}=\"{}\"", name, escape(*value)));
        }
        el.push('>');

        if item.multiline && item.text.contains('\n') {
            let pitch = fmt_num(item.size * INTERLINE_PITCH);
            for (i, line) in item.text.lines().enumerate() {
                let dy = if i == 0 { "0" } else { pitch.as_str() };
                el.push_str(&format!("<tspan x=\"{}\" dy=\"{}\">{}</tspan>", x, dy, escape(line)));
            }
        } else {
            el.push_str(&escape(item.text));
        }
        el.push_str("</text>\n");
        self.output.push_str(&el);
    }
}

/// Sink for one render: bracketed by `start_plot`/`end_plot`, groups nest LIFO.
///
/// Implementors provide the buffer and the label/value flavour; drawing
/// primitives are shared through [`PlotContext`].
pub trait Plotter {
    fn context(&mut self) -> &mut PlotContext;

    fn output(&self) -> &str;

    fn start_plot(&mut self) {}

    fn end_plot(&mut self) -> Result<()> {
        self.context().check_balanced()
    }

    /// Maps a structural attribute name into this emitter's namespace.
    fn qualify<'n>(&self, name: &'n str) -> Cow<'n, str> {
        Cow::Borrowed(name)
    }

    fn start_group(&mut self, attrs: &Attributes, transform: Option<&str>) -> Result<()> {
        let qualified: Vec<(Cow<str>, &str)> =
            attrs.iter().map(|(name, value)| (self.qualify(name), value)).collect();
        self.context()
            .open_group(qualified.iter().map(|(name, value)| (name.as_ref(), *value)), transform)
    }

    fn end_group(&mut self) -> Result<()> {
        self.context().close_group()
    }

    /// Self-closing element; attribute names are written as given.
    fn emit_tag(&mut self, tag: &str, attrs: &Attributes) -> Result<()> {
        self.context().tag(tag, attrs.iter())
    }

    fn set_color(&mut self, color: Color) {
        self.context().set_color(color);
    }

    fn polyline(&mut self, points: &[Point], fill: Fill, width: f64) {
        self.context().polyline(points, fill, width);
    }

    fn rect(&mut self, p1: Point, p2: Point, fill: Fill, width: f64) {
        self.context().rect(p1, p2, fill, width);
    }

    fn circle(&mut self, center: Point, diameter: f64, fill: Fill, width: f64) {
        self.context().circle(center, diameter, fill, width);
    }

    fn arc(&mut self, arc: &ArcPath, fill: Fill, width: f64) {
        self.context().arc(arc, fill, width);
    }

    fn thick_segment(&mut self, start: Point, end: Point, width: f64) {
        self.context().thick_segment(start, end, width);
    }

    fn text(&mut self, item: &TextItem) {
        self.context().text(item, None, &[]);
    }

    /// Reference text of the component. Empty text becomes a live placeholder.
    fn label(&mut self, item: &TextItem);

    /// Value text of the component. Empty text becomes a live placeholder.
    fn value(&mut self, item: &TextItem);
}
