// demos/render.rs
//
// render <symbols.json> <device> [unit] [rotation] [reference] [value]
// render <footprint.json> [rotation] [reference] [value]

use kicad2skin::config::{DEFAULT_SYMBOL_SCALE, RenderConfig};
use kicad2skin::error::{Error, Result};
use kicad2skin::geometry::Rotation;
use kicad2skin::importer;
use std::env;
use std::fs;
use std::path::Path;

fn parse_rotation(arg: Option<&String>) -> Result<Rotation> {
    match arg {
        Some(arg) => {
            let degrees = arg
                .parse::<i32>()
                .map_err(|e| Error::InvalidConfig(format!("rotation {:?}: {}", arg, e)))?;
            Rotation::try_from(degrees)
        }
        None => Ok(Rotation::R0),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(path) = args.first() else {
        return Err(Error::InvalidConfig(
            "usage: render <symbols.json|footprint.json> [device] [unit] [rotation] [reference] [value]"
                .to_string(),
        ));
    };
    let path = Path::new(path);
    let document: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;

    if document.get("symbols").is_some() {
        let library = importer::load_symbol_library_from_path(path)?;
        let device = args
            .get(1)
            .ok_or_else(|| Error::InvalidConfig("missing device name".to_string()))?;
        let symbol = importer::find_symbol(&library, device)?;
        let unit = match args.get(2) {
            Some(unit) => unit
                .parse::<u32>()
                .map_err(|e| Error::InvalidConfig(format!("unit {:?}: {}", unit, e)))?,
            None => 1,
        };
        let config = RenderConfig {
            rotation: parse_rotation(args.get(3))?,
            scale: DEFAULT_SYMBOL_SCALE,
            unit,
            override_reference: args.get(4).cloned(),
            override_value: args.get(5).cloned(),
            ..RenderConfig::default()
        };
        let render = kicad2skin::render_symbol(&library.name, symbol, &config)?;
        println!("{}", render.to_json()?);
    } else {
        let footprint = importer::load_footprint_from_path(path)?;
        let config = RenderConfig {
            rotation: parse_rotation(args.get(1))?,
            override_reference: args.get(2).cloned(),
            override_value: args.get(3).cloned(),
            standalone: true,
            ..RenderConfig::default()
        };
        let render = kicad2skin::render_footprint(&footprint, &config)?;
        println!("{}", render.svg);
    }
    Ok(())
}
