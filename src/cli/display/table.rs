//! Table rendering for CLI output

use super::colors::table_color_to_colored_str;
use super::{ColorTheme, StatusIcon};
use crate::domain::emitter::GateCheck;
use crate::domain::labels::{LabelSource, TracedLabels};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// One gate for status display
#[derive(Debug, Clone)]
pub struct GateRow {
    pub gate: String,
    pub value: String,
    pub passed: bool,
}

impl From<GateCheck> for GateRow {
    fn from(check: GateCheck) -> Self {
        Self {
            gate: check.name,
            value: check.detail,
            passed: check.passed,
        }
    }
}

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render merged labels with the layer that supplied each value
    pub fn render_labels(&self, component: &str, labels: &TracedLabels) -> String {
        if labels.is_empty() {
            return format!("No labels for component {}", component);
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("KEY").set_alignment(CellAlignment::Left),
                Cell::new("VALUE").set_alignment(CellAlignment::Left),
                Cell::new("SOURCE").set_alignment(CellAlignment::Center),
            ]);

        for (key, value, source) in labels.iter() {
            table.add_row(vec![
                Cell::new(key),
                Cell::new(value),
                Cell::new(source.as_str()).fg(self.theme.get_source_color(source)),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Labels: {} {} ─╮\n",
            component.bold(),
            format!("[{} labels]", labels.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "Legend: {}  {}  {}\n",
            self.legend_entry(LabelSource::Identity),
            self.legend_entry(LabelSource::Global),
            self.legend_entry(LabelSource::Component)
        ));

        output
    }

    /// Render every gate with its value and whether it holds
    pub fn render_gate_status(&self, rows: &[GateRow]) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("GATE").set_alignment(CellAlignment::Left),
                Cell::new("VALUE").set_alignment(CellAlignment::Left),
                Cell::new("STATUS").set_alignment(CellAlignment::Center),
            ]);

        for row in rows {
            table.add_row(vec![
                Cell::new(&row.gate),
                Cell::new(&row.value),
                Cell::new(format!(
                    "{} {}",
                    StatusIcon::get_gate_icon(row.passed),
                    StatusIcon::get_gate_text(row.passed)
                ))
                .fg(self.theme.get_gate_color(row.passed)),
            ]);
        }

        table.to_string()
    }

    fn legend_entry(&self, source: LabelSource) -> String {
        let color = table_color_to_colored_str(self.theme.get_source_color(source));
        source.as_str().color(color).to_string()
    }
}
