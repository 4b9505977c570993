//! Status icons for CLI output

/// Status icons for gate results
pub struct StatusIcon;

impl StatusIcon {
    /// Gate holds
    pub const SUCCESS: &'static str = "✓";

    /// Gate closed
    pub const ERROR: &'static str = "✗";

    pub fn get_gate_icon(passed: bool) -> &'static str {
        if passed {
            Self::SUCCESS
        } else {
            Self::ERROR
        }
    }

    pub fn get_gate_text(passed: bool) -> &'static str {
        if passed {
            "Open"
        } else {
            "Closed"
        }
    }
}
