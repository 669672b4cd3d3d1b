//! Conversion options

/// Knobs shared by both conversion directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Render every source newline as a line break.
    pub hard_breaks: bool,
    /// Delay before the copy control reverts to its label, in milliseconds.
    pub copy_feedback_ms: u64,
    /// Default label of the copy control.
    pub copy_label: String,
    /// Indentation per nesting level when rebuilding lists.
    pub list_indent: String,
    /// Scan the whole image store when the reverse map misses.
    pub full_scan_fallback: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            hard_breaks: true,
            copy_feedback_ms: 2000,
            copy_label: "Copy".to_string(),
            list_indent: "  ".to_string(),
            full_scan_fallback: true,
        }
    }
}

impl ConvertOptions {
    pub fn with_hard_breaks(mut self, hard_breaks: bool) -> Self {
        self.hard_breaks = hard_breaks;
        self
    }

    pub fn with_list_indent(mut self, indent: impl Into<String>) -> Self {
        self.list_indent = indent.into();
        self
    }

    pub fn with_full_scan_fallback(mut self, enabled: bool) -> Self {
        self.full_scan_fallback = enabled;
        self
    }
}
