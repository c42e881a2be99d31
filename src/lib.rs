// src/lib.rs

pub mod config;
pub mod error;
pub mod extent;
pub mod geometry;
pub mod importer;
pub mod kicad_models;
pub mod layers;
pub mod metrics;
pub mod orientation;
pub mod pcb_plotter;
pub mod plotter;
pub mod sch_plotter;
pub mod skin_plotter;
pub mod svg_plotter;

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::extent::{Extent, compute_extent};
use crate::kicad_models::{Footprint, Symbol};
use crate::layers::{LayerSet, PcbLayer};
use crate::metrics::{StrokeFontMetrics, TextMetrics};
use crate::orientation::Orientation;
use crate::pcb_plotter::PcbPlotter;
use crate::plotter::{Attributes, Plotter};
use crate::sch_plotter::{SchPlotter, port_orientations};
use crate::skin_plotter::SkinPlotter;
use crate::svg_plotter::{PageInfo, SvgPlotter};
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

/// Skin fragment plus the side channel the diagram renderer routes with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolRender {
    pub svg: String,
    pub port_orientation: IndexMap<String, Orientation>,
}

impl SymbolRender {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootprintRender {
    pub svg: String,
    pub page: PageInfo,
}

/// Renders `symbol` as a skin cell typed `<library>:<symbol name>`.
pub fn render_symbol(library: &str, symbol: &Symbol, config: &RenderConfig) -> Result<SymbolRender> {
    render_symbol_with_metrics(library, symbol, config, &StrokeFontMetrics::default())
}

pub fn render_symbol_with_metrics(
    library: &str,
    symbol: &Symbol,
    config: &RenderConfig,
    metrics: &dyn TextMetrics,
) -> Result<SymbolRender> {
    config.validate()?;
    if config.unit > symbol.unit_count {
        return Err(Error::InvalidConfig(format!(
            "{} has {} unit(s), unit {} requested",
            symbol.name, symbol.unit_count, config.unit
        )));
    }

    let type_name = format!("{}:{}", library, symbol.name);
    debug!(
        "rendering symbol {} (rotation {}, scale {}, overrides {:?})",
        type_name,
        config.rotation,
        config.scale,
        config.overrides()
    );

    let placed = config.symbol_transform();
    let rect = symbol
        .bounding_rect
        .unwrap_or_else(|| compute_extent(symbol).to_rect());
    let bounds = Extent::from_rect(&rect).transformed(&placed);
    let transform = placed.translate(-bounds.width.min, -bounds.height.min);

    let mut plotter = SkinPlotter::new(config.standalone);
    plotter.start_plot();
    let root = Attributes::new()
        .with("type", &type_name)
        .with_num("width", bounds.width())
        .with_num("height", bounds.height());
    plotter.start_group(&root, None)?;
    let alias = plotter.qualify("alias").into_owned();
    plotter.emit_tag(&alias, &Attributes::new().with("val", &type_name))?;

    SchPlotter::new(&mut plotter, config, metrics).plot_symbol(symbol, &transform)?;

    plotter.end_group()?;
    plotter.end_plot()?;

    Ok(SymbolRender {
        svg: plotter.into_output(),
        port_orientation: port_orientations(symbol, config, &transform),
    })
}

/// Renders a footprint as a plain SVG overlay.
///
/// Supplying any override restricts the drawing to the front assembly layers.
pub fn render_footprint(footprint: &Footprint, config: &RenderConfig) -> Result<FootprintRender> {
    config.validate()?;
    let overrides = config.overrides();
    debug!(
        "rendering footprint {} (rotation {}, scale {}, overrides {:?})",
        footprint.name, config.rotation, config.scale, overrides
    );

    let layers = if overrides.is_any() {
        let layers = LayerSet::front_assembly();
        let names: Vec<&str> = layers.iter().map(PcbLayer::name).collect();
        debug!("layer mask reduced to {}", names.join(", "));
        layers
    } else {
        LayerSet::all()
    };

    let placed = config.footprint_transform();
    let bounds = compute_extent(footprint).transformed(&placed);
    let transform = placed.translate(-bounds.width.min, -bounds.height.min);
    let page = PageInfo {
        width: bounds.width(),
        height: bounds.height(),
    };

    let mut plotter = SvgPlotter::new(page, config.standalone);
    plotter.start_plot();
    PcbPlotter::new(&mut plotter, config, layers).plot_footprint(footprint, &transform)?;
    plotter.end_plot()?;

    Ok(FootprintRender {
        svg: plotter.into_output(),
        page,
    })
}
