// src/importer.rs

use crate::error::Result;
use crate::kicad_models::{Footprint, Symbol, SymbolLibrary};
use log::debug;
use std::fs;
use std::path::Path;

/// Parses a symbol library handed over as JSON by the file-format parser.
pub fn load_symbol_library(json: &str) -> Result<SymbolLibrary> {
    let library: SymbolLibrary = serde_json::from_str(json)?;
    debug!(
        "loaded library {} with {} symbol(s)",
        library.name,
        library.symbols.len()
    );
    Ok(library)
}

pub fn load_symbol_library_from_path(path: &Path) -> Result<SymbolLibrary> {
    load_symbol_library(&fs::read_to_string(path)?)
}

/// Parses one footprint handed over as JSON.
pub fn load_footprint(json: &str) -> Result<Footprint> {
    let footprint: Footprint = serde_json::from_str(json)?;
    debug!(
        "loaded footprint {} with {} pad(s)",
        footprint.name,
        footprint.pads.len()
    );
    Ok(footprint)
}

pub fn load_footprint_from_path(path: &Path) -> Result<Footprint> {
    load_footprint(&fs::read_to_string(path)?)
}

/// Looks up a device by name; a missing device is a hard failure.
pub fn find_symbol<'a>(library: &'a SymbolLibrary, name: &str) -> Result<&'a Symbol> {
    library.find_by_name(name)
}
