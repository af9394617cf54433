//! Color specification parsing
//!
//! Resolves CSS color strings (named colors, hex, `rgb()`, `hsl()`, ...) to
//! RGB triples via `csscolorparser`. Alpha is accepted and ignored; discs are
//! always drawn opaque.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Resolve a color specification string to an RGB triple
pub fn parse_color(spec: &str) -> Result<Rgb, ConfigError> {
    match csscolorparser::parse(spec) {
        Ok(color) => {
            let [r, g, b, _] = color.to_rgba8();
            Ok(Rgb::new(r, g, b))
        }
        Err(err) => {
            log::debug!("color {:?} rejected: {}", spec, err);
            Err(ConfigError::color(spec))
        }
    }
}
