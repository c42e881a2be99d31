// src/sch_plotter.rs

use crate::config::{Overrides, RenderConfig};
use crate::error::Result;
use crate::geometry::{Point, Transform, fmt_num, polar};
use crate::kicad_models::{
    Field, FieldToken, Fill, HJustify, LibItem, LibShape, Pin, PinShape, Symbol, TextAngle,
    VJustify,
};
use crate::metrics::TextMetrics;
use crate::orientation::{Orientation, classify};
use crate::plotter::{ArcPath, Attributes, Plotter, TextItem};
use indexmap::IndexMap;
use log::{debug, trace};

// Pin decoration sizes, in library units (mils).
const INVERT_PIN_RADIUS: f64 = 15.0;
const CLOCK_PIN_DIM: f64 = 20.0;
const NONLOGIC_PIN_DIM: f64 = 15.0;
const PIN_TEXT_MARGIN: f64 = 4.0;

/// Walks a library symbol and drives a [`Plotter`].
///
/// Traversal order is fixed: drawing items, then pins, then fields (and
/// inline texts that only hold a substitution token).
pub struct SchPlotter<'a, P: Plotter + ?Sized> {
    plotter: &'a mut P,
    config: &'a RenderConfig,
    metrics: &'a dyn TextMetrics,
}

impl<'a, P: Plotter + ?Sized> SchPlotter<'a, P> {
    pub fn new(plotter: &'a mut P, config: &'a RenderConfig, metrics: &'a dyn TextMetrics) -> Self {
        SchPlotter {
            plotter,
            config,
            metrics,
        }
    }

    pub fn plot_symbol(&mut self, symbol: &Symbol, transform: &Transform) -> Result<()> {
        let (unit, convert) = (self.config.unit, self.config.convert);

        for item in symbol.items.iter().filter(|item| item.in_unit(unit, convert)) {
            if item.field_token().is_none() {
                self.plot_item(item, transform);
            }
        }

        for pin in symbol.pins.iter().filter(|pin| pin.in_unit(unit, convert)) {
            self.plot_pin(symbol, pin, transform)?;
        }

        self.plot_fields(symbol, transform);
        Ok(())
    }

    /// Stroke width on the page; 0 in the library means the default width.
    fn stroke(&self, width: f64) -> f64 {
        if width > 0.0 {
            width * self.config.scale
        } else {
            self.config.line_width
        }
    }

    fn text_angle(&self, angle: TextAngle, transform: &Transform) -> TextAngle {
        if transform.swaps_axes() {
            angle.flipped()
        } else {
            angle
        }
    }

    fn plot_item(&mut self, item: &LibItem, transform: &Transform) {
        match &item.shape {
            LibShape::Polyline {
                points,
                width,
                fill,
            } => {
                let points: Vec<Point> = points.iter().map(|p| transform.apply(*p)).collect();
                self.plotter.polyline(&points, *fill, self.stroke(*width));
            }
            LibShape::Rectangle {
                start,
                end,
                width,
                fill,
            } => {
                self.plotter.rect(
                    transform.apply(*start),
                    transform.apply(*end),
                    *fill,
                    self.stroke(*width),
                );
            }
            LibShape::Circle {
                center,
                radius,
                width,
                fill,
            } => {
                self.plotter.circle(
                    transform.apply(*center),
                    2.0 * radius * self.config.scale,
                    *fill,
                    self.stroke(*width),
                );
            }
            LibShape::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                width,
                fill,
            } => {
                let span = (end_angle - start_angle).rem_euclid(360.0);
                let arc = ArcPath {
                    start: transform.apply(*center + polar(*start_angle) * *radius),
                    end: transform.apply(*center + polar(*end_angle) * *radius),
                    radius: radius * self.config.scale,
                    large_arc: span > 180.0,
                    // counter-clockwise in library space: sweep 1 (clockwise on the page) only when det > 0
                    sweep: transform.determinant() > 0.0,
                };
                self.plotter.arc(&arc, *fill, self.stroke(*width));
            }
            LibShape::Text {
                text,
                pos,
                size,
                orientation,
                visible,
                italic,
                bold,
                hjustify,
                vjustify,
            } => {
                if !*visible {
                    debug!("skipping hidden text {:?}", text);
                    return;
                }
                self.plotter.text(&TextItem {
                    pos: transform.apply(*pos),
                    color: None,
                    text,
                    angle: self.text_angle(*orientation, transform).degrees(),
                    size: size * self.config.scale,
                    hjustify: *hjustify,
                    vjustify: *vjustify,
                    width: self.config.line_width,
                    italic: *italic,
                    bold: *bold,
                    multiline: true,
                });
            }
        }
    }

    fn plot_pin(&mut self, symbol: &Symbol, pin: &Pin, transform: &Transform) -> Result<()> {
        let orientation = classify(pin.orientation, transform);
        trace!("pin {} {:?} -> {:?}", pin.number, pin.orientation, orientation);

        self.plotter
            .start_group(&Attributes::new().with("pin", &pin.number), None)?;

        if pin.visible {
            self.plot_pin_symbol(pin, orientation, transform);
            self.plot_pin_texts(symbol, pin, orientation, transform);
        } else {
            debug!("pin {} is hidden, emitting its port only", pin.number);
        }

        let pos = transform.apply(pin.pos);
        let marker = Attributes::new()
            .with(self.plotter.qualify("pid"), &pin.number)
            .with(self.plotter.qualify("position"), orientation.port_side().as_str())
            .with(self.plotter.qualify("x"), fmt_num(pos.x))
            .with(self.plotter.qualify("y"), fmt_num(pos.y));
        self.plotter.emit_tag("g", &marker)?;

        self.plotter.end_group()
    }

    fn plot_pin_symbol(&mut self, pin: &Pin, orientation: Orientation, transform: &Transform) {
        let start = transform.apply(pin.pos);
        let end = transform.apply(pin.body_end());
        let dir = orientation.page_vector();
        let across = Point::new(-dir.y, dir.x);
        let scale = self.config.scale;
        let width = self.config.line_width;

        let inverted = matches!(pin.shape, PinShape::Inverted | PinShape::InvertedClock);
        if inverted {
            let r = INVERT_PIN_RADIUS * scale;
            self.plotter.circle(end - dir * r, 2.0 * r, Fill::None, width);
            let line = (start.distance(end) - 2.0 * r).max(0.0);
            self.plotter.polyline(&[start, start + dir * line], Fill::None, width);
        } else {
            self.plotter.polyline(&[start, end], Fill::None, width);
        }

        match pin.shape {
            PinShape::Clock | PinShape::InvertedClock => {
                let c = CLOCK_PIN_DIM * scale;
                self.plotter.polyline(
                    &[end + across * c, end + dir * c, end - across * c],
                    Fill::None,
                    width,
                );
            }
            PinShape::NonLogic => {
                let n = NONLOGIC_PIN_DIM * scale;
                let (d1, d2) = ((dir + across) * n, (dir - across) * n);
                self.plotter.polyline(&[end - d1, end + d1], Fill::None, width);
                self.plotter.polyline(&[end - d2, end + d2], Fill::None, width);
            }
            PinShape::Line | PinShape::Inverted => {}
        }
    }

    fn plot_pin_texts(
        &mut self,
        symbol: &Symbol,
        pin: &Pin,
        orientation: Orientation,
        transform: &Transform,
    ) {
        let scale = self.config.scale;
        let draw_name = symbol.show_pin_names && pin.has_name();
        let draw_number = symbol.show_pin_numbers && !pin.number.is_empty();
        if !draw_name && !draw_number {
            return;
        }

        let start = transform.apply(pin.pos);
        let end = transform.apply(pin.body_end());
        let mid = (start + end) / 2.0;
        let dir = orientation.page_vector();
        let vertical = orientation.is_vertical();
        let angle = if vertical { 90.0 } else { 0.0 };
        // "above the baseline" and reading direction of the text frame
        let (above, reading) = if vertical {
            (Point::new(-1.0, 0.0), Point::new(0.0, -1.0))
        } else {
            (Point::new(0.0, -1.0), Point::new(1.0, 0.0))
        };
        let line_width = self.config.line_width;
        let margin = PIN_TEXT_MARGIN * scale + line_width;
        let name_offset = symbol.pin_name_offset * scale;

        let pin_text = |pos: Point, text, size: f64, hjustify, vjustify| TextItem {
            angle,
            hjustify,
            vjustify,
            width: line_width,
            ..TextItem::new(pos, text, size)
        };

        let mut items = Vec::with_capacity(2);
        if name_offset > 0.0 {
            if draw_name {
                let hjustify = if dir.dot(reading) > 0.0 {
                    HJustify::Left
                } else {
                    HJustify::Right
                };
                items.push(pin_text(
                    end + dir * name_offset,
                    pin.name.as_str(),
                    pin.name_size * scale,
                    hjustify,
                    VJustify::Center,
                ));
            }
            if draw_number {
                items.push(pin_text(
                    mid + above * margin,
                    pin.number.as_str(),
                    pin.number_size * scale,
                    HJustify::Center,
                    VJustify::Bottom,
                ));
            }
        } else {
            if draw_name {
                items.push(pin_text(
                    mid + above * margin,
                    pin.name.as_str(),
                    pin.name_size * scale,
                    HJustify::Center,
                    VJustify::Bottom,
                ));
            }
            if draw_number {
                items.push(pin_text(
                    mid - above * margin,
                    pin.number.as_str(),
                    pin.number_size * scale,
                    HJustify::Center,
                    VJustify::Top,
                ));
            }
        }

        for item in &items {
            self.plotter.text(item);
        }
    }

    fn plot_fields(&mut self, symbol: &Symbol, transform: &Transform) {
        let config = self.config;
        let overrides = config.overrides();

        self.plot_field(&symbol.reference, FieldToken::Reference, &overrides, transform);
        self.plot_field(&symbol.value, FieldToken::Value, &overrides, transform);

        for item in symbol.items.iter().filter(|item| item.in_unit(config.unit, config.convert)) {
            let Some(token) = item.field_token() else {
                continue;
            };
            if let LibShape::Text {
                pos,
                size,
                orientation,
                visible,
                italic,
                bold,
                hjustify,
                vjustify,
                ..
            } = &item.shape
            {
                // unresolved tokens become live placeholders
                let field = Field {
                    text: overrides.resolve(token).unwrap_or_default().to_string(),
                    pos: *pos,
                    size: *size,
                    orientation: *orientation,
                    visible: *visible,
                    italic: *italic,
                    bold: *bold,
                    hjustify: *hjustify,
                    vjustify: *vjustify,
                };
                self.plot_field(&field, token, &Overrides::default(), transform);
            }
        }
    }

    fn plot_field(
        &mut self,
        field: &Field,
        token: FieldToken,
        overrides: &Overrides,
        transform: &Transform,
    ) {
        if !field.visible {
            debug!("skipping hidden {:?} field", token);
            return;
        }

        let text = overrides.field_text(token, &field.text);
        let orientation = self.text_angle(field.orientation, transform);
        let size = field.size * self.config.scale;
        let line_width = self.config.line_width;

        // Skin texts are start-anchored on the baseline, so justification is
        // resolved here from the measured text box.
        let w = self.metrics.line_size(text, size, line_width);
        let h = self.metrics.interline(size, line_width);
        let along = match field.hjustify {
            HJustify::Left => 0.0,
            HJustify::Center => -w / 2.0,
            HJustify::Right => -w,
        };
        let down = match field.vjustify {
            VJustify::Top => h,
            VJustify::Center => h / 2.0,
            VJustify::Bottom => 0.0,
        };
        let shift = match orientation {
            TextAngle::Horizontal => Point::new(along, down),
            TextAngle::Vertical => Point::new(down, -along),
        };

        let item = TextItem {
            pos: transform.apply(field.pos) + shift,
            color: None,
            text,
            angle: orientation.degrees(),
            size,
            hjustify: HJustify::Left,
            vjustify: VJustify::Bottom,
            width: line_width,
            italic: field.italic,
            bold: field.bold,
            multiline: false,
        };
        match token {
            FieldToken::Reference => self.plotter.label(&item),
            FieldToken::Value => self.plotter.value(&item),
        }
    }
}

/// Placed direction of every pin of the active unit, in declaration order.
///
/// Hidden pins are included: the diagram renderer still routes to them.
pub fn port_orientations(
    symbol: &Symbol,
    config: &RenderConfig,
    transform: &Transform,
) -> IndexMap<String, Orientation> {
    symbol
        .pins
        .iter()
        .filter(|pin| pin.in_unit(config.unit, config.convert))
        .map(|pin| (pin.number.clone(), classify(pin.orientation, transform)))
        .collect()
}
