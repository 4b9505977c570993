//! Color theme for CLI output

use crate::domain::labels::LabelSource;
use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Get color for the layer a label came from
    pub fn get_source_color(&self, source: LabelSource) -> TableColor {
        match source {
            LabelSource::Identity => self.muted,
            LabelSource::Global => self.info,
            LabelSource::Component => self.warning,
        }
    }

    pub fn get_gate_color(&self, passed: bool) -> TableColor {
        if passed {
            self.success
        } else {
            self.error
        }
    }
}

/// Convert comfy_table::Color to colored::Color string representation
pub fn table_color_to_colored_str(color: TableColor) -> &'static str {
    match color {
        TableColor::Green => "green",
        TableColor::Yellow => "yellow",
        TableColor::Red => "red",
        TableColor::Cyan => "cyan",
        TableColor::DarkGrey => "bright black",
        _ => "white",
    }
}
