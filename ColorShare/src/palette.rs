//! Palette registry - party identifier to ordered brand colors
//!
//! The registry is loaded once per run, either from the bundled
//! `palettes.toml` or from the `[palettes]` table of a scan config.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// Bundled palette table
const BUNDLED_PALETTES: &str = include_str!("palettes.toml");

/// An 8-bit RGB triple.
///
/// Serialized as a three-element array (`[r, g, b]`) so config files stay compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Whether `pixel` lies within `tolerance` of this color on every channel.
    #[inline]
    #[must_use]
    pub fn matches(self, pixel: [u8; 3], tolerance: u8) -> bool {
        self.r.abs_diff(pixel[0]) <= tolerance
            && self.g.abs_diff(pixel[1]) <= tolerance
            && self.b.abs_diff(pixel[2]) <= tolerance
    }

    #[must_use]
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(color: Rgb) -> Self {
        color.to_array()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Parses `r,g,b` (decimal) or `#RRGGBB` (hex).
impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidConfig(format!("invalid color '{s}' (expected r,g,b or #RRGGBB)"));

        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            return Ok(Self::new(channel(0)?, channel(2)?, channel(4)?));
        }

        let channels: Vec<&str> = s.split(',').map(str::trim).collect();
        if channels.len() != 3 {
            return Err(invalid());
        }
        let channel = |i: usize| channels[i].parse::<u8>().map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(1)?, channel(2)?))
    }
}

/// An ordered list of target colors for one party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<Rgb>);

impl Palette {
    #[must_use]
    pub fn new(colors: Vec<Rgb>) -> Self {
        Self(colors)
    }

    #[must_use]
    pub fn colors(&self) -> &[Rgb] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `pixel` matches any palette color; stops at the first hit.
    #[inline]
    #[must_use]
    pub fn matches(&self, pixel: [u8; 3], tolerance: u8) -> bool {
        self.0.iter().any(|color| color.matches(pixel, tolerance))
    }
}

impl From<Vec<Rgb>> for Palette {
    fn from(colors: Vec<Rgb>) -> Self {
        Self(colors)
    }
}

impl FromIterator<Rgb> for Palette {
    fn from_iter<I: IntoIterator<Item = Rgb>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Mapping from party identifier to its palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaletteRegistry(IndexMap<String, Palette>);

impl PaletteRegistry {
    /// The registry compiled into the crate.
    ///
    /// # Panics
    /// Panics if the bundled `palettes.toml` is invalid (checked by tests).
    #[must_use]
    pub fn bundled() -> Self {
        Self::from_toml_str(BUNDLED_PALETTES).expect("bundled palettes.toml is valid")
    }

    /// Parse a registry from a TOML document of `party = [[r, g, b], ...]` entries.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::InvalidConfig(format!("palette table: {e}")))
    }

    pub fn insert(&mut self, party: impl Into<String>, palette: Palette) -> Option<Palette> {
        self.0.insert(party.into(), palette)
    }

    #[must_use]
    pub fn get(&self, party: &str) -> Option<&Palette> {
        self.0.get(party)
    }

    /// Look up a party's palette, failing if it is missing.
    pub fn require(&self, party: &str) -> Result<&Palette> {
        self.get(party).ok_or_else(|| Error::MissingPalette {
            party: party.to_string(),
        })
    }

    pub fn parties(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Palette)> {
        self.0.iter().map(|(party, palette)| (party.as_str(), palette))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Palette)> for PaletteRegistry {
    fn from_iter<I: IntoIterator<Item = (String, Palette)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
