//! Cell to HTML fragment conversion
//!
//! Output uses `<strong>` for bold text, `<span class="red-text">` for red text and
//! `<br>` for preserved line breaks. Text is always escaped before it is wrapped.

use crate::config::GlobalConfig;
use crate::reader::{Cell, CellContent, Font, TextRun};

/// Hex sequence marking a colour as red, matched anywhere in the ARGB string
pub const RED_MARKER: &str = "FF0000";

/// CSS class applied to red text
pub const RED_CLASS: &str = "red-text";

/// When newlines in plain text collapse to spaces instead of becoming `<br>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBreakPolicy {
    pub max_segments: usize,
    pub max_chars: usize,
}

impl LineBreakPolicy {
    /// Short multi-line labels (e.g. a name split over two lines) read better on one line
    pub fn collapses(&self, raw: &str) -> bool {
        raw.contains('\n')
            && raw.split('\n').count() <= self.max_segments
            && raw.chars().count() < self.max_chars
    }

    /// Escape `raw` and apply the policy to its newlines
    pub fn apply(&self, raw: &str) -> String {
        if self.collapses(raw) {
            escape_html(&raw.replace('\n', " "))
        } else {
            escape_html(raw).replace('\n', "<br>")
        }
    }
}

impl Default for LineBreakPolicy {
    fn default() -> Self {
        Self {
            max_segments: 3,
            max_chars: 30,
        }
    }
}

impl From<&GlobalConfig> for LineBreakPolicy {
    fn from(config: &GlobalConfig) -> Self {
        Self {
            max_segments: config.collapse_max_segments,
            max_chars: config.collapse_max_chars,
        }
    }
}

/// Converts cells to HTML fragments
#[derive(Debug, Clone, Copy, Default)]
pub struct CellFormatter {
    policy: LineBreakPolicy,
}

impl CellFormatter {
    pub fn new(policy: LineBreakPolicy) -> Self {
        Self { policy }
    }

    /// HTML for a cell; a missing or empty cell yields an empty string
    pub fn format(&self, cell: Option<&Cell>) -> String {
        let Some(cell) = cell else {
            return String::new();
        };

        match &cell.content {
            CellContent::Empty => String::new(),
            CellContent::Rich(runs) => match format_runs(runs) {
                Some(html) => html,
                None => self.format_plain(&cell.content.flattened_text(), &cell.font),
            },
            CellContent::Value(value) => self.format_plain(&value.to_string(), &cell.font),
        }
    }

    /// Uniformly styled text: line-break policy, escaping, then cell-level styling
    pub fn format_plain(&self, raw: &str, font: &Font) -> String {
        wrap_styles(self.policy.apply(raw), font)
    }
}

/// Render styled runs, or `None` when there are no runs at all.
///
/// A run with empty text still emits its style markers.
fn format_runs(runs: &[TextRun]) -> Option<String> {
    if runs.is_empty() {
        return None;
    }

    let html: String = runs
        .iter()
        .map(|run| wrap_styles(escape_html(&run.text), &run.font))
        .collect();
    Some(html.replace('\n', "<br>"))
}

fn wrap_styles(mut text: String, font: &Font) -> String {
    if font.bold {
        text = format!("<strong>{}</strong>", text);
    }
    if is_red(font.color.as_deref()) {
        text = format!(r#"<span class="{}">{}</span>"#, RED_CLASS, text);
    }
    text
}

/// Whether a resolved colour counts as red
pub fn is_red(color: Option<&str>) -> bool {
    color.is_some_and(|rgb| rgb.to_ascii_uppercase().contains(RED_MARKER))
}

/// Escape text for HTML. `&` goes first so produced entities are not escaped again.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
