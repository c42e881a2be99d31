use crate::error::{Error, Result};
use crate::geometry::{Rotation, Transform};
use crate::kicad_models::FieldToken;
use serde::{Deserialize, Serialize};

/// Scale the schematic renderer draws library symbols at (library units are mils).
pub const DEFAULT_SYMBOL_SCALE: f64 = 0.3;

/// Everything a single render needs besides the component itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub rotation: Rotation,
    pub mirror_x: bool,
    pub mirror_y: bool,
    pub scale: f64,
    pub line_width: f64,
    pub unit: u32,
    pub convert: u32,
    /// Wrap the fragment in an `<svg>` document.
    pub standalone: bool,
    pub override_reference: Option<String>,
    pub override_value: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            rotation: Rotation::R0,
            mirror_x: false,
            mirror_y: false,
            scale: 1.0,
            line_width: 1.0,
            unit: 1,
            convert: 1,
            standalone: false,
            override_reference: None,
            override_value: None,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(Error::InvalidConfig(format!("scale must be positive, got {}", self.scale)));
        }
        if self.unit == 0 || self.convert == 0 {
            return Err(Error::InvalidConfig(format!(
                "unit and convert are 1-based, got unit {} convert {}",
                self.unit, self.convert
            )));
        }
        Ok(())
    }

    /// Library (y-up) to page (y-down) placement, before translation.
    pub fn symbol_transform(&self) -> Transform {
        Transform::Y_FLIP
            .then(&Transform::orientation(self.rotation, self.mirror_x, self.mirror_y))
            .scaled(self.scale)
    }

    /// Footprints are already y-down, so no flip.
    pub fn footprint_transform(&self) -> Transform {
        Transform::orientation(self.rotation, self.mirror_x, self.mirror_y).scaled(self.scale)
    }

    pub fn overrides(&self) -> Overrides<'_> {
        Overrides {
            reference: self.override_reference.as_deref(),
            value: self.override_value.as_deref(),
        }
    }
}

/// Caller-supplied replacement texts for the reference and value fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides<'a> {
    pub reference: Option<&'a str>,
    pub value: Option<&'a str>,
}

impl<'a> Overrides<'a> {
    pub fn is_any(&self) -> bool {
        self.reference.is_some() || self.value.is_some()
    }

    pub fn resolve(&self, token: FieldToken) -> Option<&'a str> {
        match token {
            FieldToken::Reference => self.reference,
            FieldToken::Value => self.value,
        }
    }

    /// Display text for a field: the override when given, the field's own text otherwise.
    pub fn field_text<'t>(&self, token: FieldToken, own: &'t str) -> &'t str
    where
        'a: 't,
    {
        self.resolve(token).unwrap_or(own)
    }
}
