// src/pcb_plotter.rs

use crate::config::RenderConfig;
use crate::error::Result;
use crate::geometry::{Point, Transform};
use crate::kicad_models::{
    DrillShape, EdgeShape, FieldToken, Fill, Footprint, FpEdge, FpText, FpTextKind, Pad, PadShape,
    arc_end,
};
use crate::layers::{LayerSet, PcbLayer};
use crate::plotter::{ArcPath, Attributes, Color, Plotter, TextItem};
use log::{debug, trace};

/// Default KiCad board colors, per layer.
pub fn layer_color(layer: PcbLayer) -> Color {
    match layer {
        PcbLayer::FCu => Color::RED,
        PcbLayer::BCu => Color::GREEN,
        PcbLayer::FSilkS | PcbLayer::FAdhes => Color::CYAN,
        PcbLayer::BSilkS | PcbLayer::BAdhes => Color::MAGENTA,
        PcbLayer::FMask | PcbLayer::BMask => Color::MAGENTA,
        PcbLayer::FPaste | PcbLayer::BPaste => Color::DARKGRAY,
        PcbLayer::EdgeCuts => Color::YELLOW,
        PcbLayer::FFab | PcbLayer::BFab => Color::DARKGRAY,
        PcbLayer::DwgsUser | PcbLayer::CmtsUser => Color::LIGHTGRAY,
        PcbLayer::Eco1User | PcbLayer::Eco2User => Color::GREEN,
        PcbLayer::Margin | PcbLayer::FCrtYd | PcbLayer::BCrtYd => Color::LIGHTGRAY,
    }
}

/// Pad bodies use a highlight color; this is an overlay render.
const PAD_COLOR: Color = Color::YELLOW;
const DRILL_COLOR: Color = Color::WHITE;

/// Walks a footprint: edges, then pads, then texts.
pub struct PcbPlotter<'a, P: Plotter + ?Sized> {
    plotter: &'a mut P,
    config: &'a RenderConfig,
    layers: LayerSet,
}

impl<'a, P: Plotter + ?Sized> PcbPlotter<'a, P> {
    pub fn new(plotter: &'a mut P, config: &'a RenderConfig, layers: LayerSet) -> Self {
        PcbPlotter {
            plotter,
            config,
            layers,
        }
    }

    pub fn plot_footprint(&mut self, footprint: &Footprint, transform: &Transform) -> Result<()> {
        let root = Attributes::new()
            .with("class", "footprint")
            .with("name", &footprint.name);
        self.plotter.start_group(&root, None)?;

        for edge in footprint.edges() {
            if self.layers.contains(edge.layer) {
                self.plot_edge(edge, transform);
            } else {
                debug!("skipping edge on {}", edge.layer.name());
            }
        }

        for pad in &footprint.pads {
            self.plot_pad(pad, transform)?;
        }

        self.plot_text(&footprint.reference, transform);
        self.plot_text(&footprint.value, transform);
        for text in footprint.user_texts() {
            self.plot_text(text, transform);
        }

        self.plotter.end_group()
    }

    fn stroke(&self, width: f64) -> f64 {
        if width > 0.0 {
            width * self.config.scale
        } else {
            self.config.line_width
        }
    }

    fn plot_edge(&mut self, edge: &FpEdge, transform: &Transform) {
        self.plotter.set_color(layer_color(edge.layer));
        let width = self.stroke(edge.width);
        match &edge.shape {
            EdgeShape::Segment { start, end } => {
                self.plotter.polyline(
                    &[transform.apply(*start), transform.apply(*end)],
                    Fill::None,
                    width,
                );
            }
            EdgeShape::Circle { center, end } => {
                let diameter = 2.0 * center.distance(*end) * self.config.scale;
                self.plotter
                    .circle(transform.apply(*center), diameter, Fill::None, width);
            }
            EdgeShape::Arc {
                center,
                start,
                angle,
            } => {
                let arc = ArcPath {
                    start: transform.apply(*start),
                    end: transform.apply(arc_end(*center, *start, *angle)),
                    radius: center.distance(*start) * self.config.scale,
                    large_arc: angle.abs() > 180.0,
                    // a mirroring transform reverses the page sweep
                    sweep: (*angle > 0.0) == (transform.determinant() > 0.0),
                };
                self.plotter.arc(&arc, Fill::None, width);
            }
            EdgeShape::Polygon { points } => {
                let points: Vec<Point> = points.iter().map(|p| transform.apply(*p)).collect();
                self.plotter.polyline(&points, Fill::Filled, width);
            }
        }
    }

    fn plot_pad(&mut self, pad: &Pad, transform: &Transform) -> Result<()> {
        trace!("pad {} {:?} at {}", pad.name, pad.shape, pad.pos);
        let scale = self.config.scale;

        let attrs = Attributes::new()
            .with("name", &pad.name)
            .with("class", "part_pad");
        self.plotter.start_group(&attrs, None)?;
        self.plotter.set_color(PAD_COLOR);
        match pad.shape {
            PadShape::Circle => {
                self.plotter
                    .circle(transform.apply(pad.pos), pad.size.x * scale, Fill::Filled, 0.0);
            }
            PadShape::Rect | PadShape::Trapezoid => {
                let corners = pad.corners().map(|c| transform.apply(c));
                self.plotter.polyline(&corners, Fill::Filled, 0.0);
            }
            PadShape::Oval => self.plot_oblong(pad, pad.size, transform),
        }
        self.plotter.end_group()?;

        if pad.has_drill() {
            self.plotter.set_color(DRILL_COLOR);
            match pad.drill_shape {
                DrillShape::Circle => {
                    self.plotter.circle(
                        transform.apply(pad.pos),
                        pad.drill_size.x * scale,
                        Fill::Filled,
                        0.0,
                    );
                }
                DrillShape::Oblong => self.plot_oblong(pad, pad.drill_size, transform),
            }
        }
        Ok(())
    }

    /// Stadium shape of `size` centered on the pad, as a round-capped stroke.
    fn plot_oblong(&mut self, pad: &Pad, size: Point, transform: &Transform) {
        let scale = self.config.scale;
        if size.x == size.y {
            self.plotter
                .circle(transform.apply(pad.pos), size.x * scale, Fill::Filled, 0.0);
            return;
        }
        let (offset, width) = if size.x > size.y {
            (Point::new((size.x - size.y) / 2.0, 0.0), size.y)
        } else {
            (Point::new(0.0, (size.y - size.x) / 2.0), size.x)
        };
        self.plotter.thick_segment(
            transform.apply(pad.to_footprint(-offset)),
            transform.apply(pad.to_footprint(offset)),
            width * scale,
        );
    }

    fn plot_text(&mut self, text: &FpText, transform: &Transform) {
        if !text.visible {
            debug!("skipping hidden {:?} text {:?}", text.kind, text.text);
            return;
        }
        if !self.layers.contains(text.layer) {
            debug!("skipping {:?} text on {}", text.kind, text.layer.name());
            return;
        }

        let overrides = self.config.overrides();
        let token = match text.kind {
            FpTextKind::Reference => Some(FieldToken::Reference),
            FpTextKind::Value => Some(FieldToken::Value),
            FpTextKind::User => FieldToken::parse(&text.text),
        };
        let shown = match (text.kind, token) {
            (FpTextKind::User, Some(token)) => overrides.resolve(token).unwrap_or_default(),
            (_, Some(token)) => overrides.field_text(token, &text.text),
            (_, None) => text.text.as_str(),
        };

        let color = layer_color(text.layer);
        self.plotter.set_color(color);
        let item = TextItem {
            pos: transform.apply(text.pos),
            color: Some(color),
            text: shown,
            angle: transform.apply_angle(text.angle),
            size: text.size.y * self.config.scale,
            hjustify: text.hjustify,
            vjustify: text.vjustify,
            width: self.stroke(text.thickness),
            italic: text.italic,
            bold: text.bold,
            multiline: true,
        };
        match token {
            Some(FieldToken::Reference) => self.plotter.label(&item),
            Some(FieldToken::Value) => self.plotter.value(&item),
            None => self.plotter.text(&item),
        }
    }
}
