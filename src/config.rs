//! Chart configuration: dimensions, default-visible countries, transition timing, ticks.
//!
//! Defaults reproduce the energy-per-capita chart this crate was built for. Any subset of
//! fields can be overridden from a JSON file:
//!
//! ```json
//! { "width": 900, "default_visible": ["China", "India"], "palette": "office" }
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Space around the plotting area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 10.0,
            right: 100.0,
            bottom: 40.0,
            left: 80.0,
        }
    }
}

/// Series color palette. Assignment is by load index, wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    /// The classic ten-color categorical scheme.
    #[default]
    Category10,
    /// Microsoft Office chart colors.
    Office,
    /// Explicit `#rrggbb` colors.
    Custom(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub margins: Margins,
    /// Width of the plotting area (outer width minus left/right margins).
    pub width: f64,
    /// Height of the plotting area (outer height minus top/bottom margins).
    pub height: f64,
    /// Countries revealed automatically on load.
    pub default_visible: BTreeSet<String>,
    pub entrance_duration_ms: u64,
    pub reveal_duration_ms: u64,
    pub hide_duration_ms: u64,
    /// Label fade used by user-triggered reveal/hide.
    pub label_fade_ms: u64,
    pub x_ticks: usize,
    pub y_ticks: usize,
    pub x_title: String,
    pub y_title: String,
    pub palette: Palette,
    /// Locale tag for value tick labels (`en`, `de`, `fr`, ...).
    pub locale: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let margins = Margins::default();
        Self {
            width: 800.0 - margins.left - margins.right,
            height: 600.0 - margins.top - margins.bottom,
            margins,
            default_visible: [
                "Brazil",
                "China",
                "Russia",
                "India",
                "South Africa",
                "United States",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            entrance_duration_ms: 2000,
            reveal_duration_ms: 2000,
            hide_duration_ms: 2000,
            label_fade_ms: 1000,
            x_ticks: 5,
            y_ticks: 10,
            x_title: "Year".into(),
            y_title: "Million BTUs Per Person".into(),
            palette: Palette::default(),
            locale: "en".into(),
        }
    }
}

impl ChartConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| crate::ChartError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Config from an optional JSON path as typed into a form: blank means defaults.
    pub fn from_optional_path(path: &str) -> Result<Self> {
        let path = path.trim();
        if path.is_empty() {
            Ok(Self::default())
        } else {
            Self::from_json_file(path)
        }
    }

    /// Full SVG width including margins.
    pub fn outer_width(&self) -> f64 {
        self.width + self.margins.left + self.margins.right
    }

    /// Full SVG height including margins.
    pub fn outer_height(&self) -> f64 {
        self.height + self.margins.top + self.margins.bottom
    }
}
