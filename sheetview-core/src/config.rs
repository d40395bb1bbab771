//! Configuration for workbook rendering

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default workbook path, relative to the working directory
pub const DEFAULT_WORKBOOK: &str = "Checklist.xlsx";

/// Main rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Workbook rendered when no path is given explicitly
    #[serde(default = "default_workbook")]
    pub workbook: PathBuf,
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub sheets: HashMap<String, SheetConfig>,
}

impl RenderConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RenderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that thresholds are usable
    pub fn validate(&self) -> Result<()> {
        if self.global.collapse_max_segments == 0 {
            return Err(Error::InvalidConfig(
                "collapse_max_segments must be at least 1".to_string(),
            ));
        }
        if self.global.collapse_max_chars == 0 {
            return Err(Error::InvalidConfig(
                "collapse_max_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the trailing Note column is left out for a sheet
    pub fn exclude_note_column_for(&self, sheet_name: &str) -> bool {
        self.sheets
            .get(sheet_name)
            .and_then(|sheet| sheet.exclude_note_column)
            .unwrap_or(self.global.exclude_note_column)
    }

    /// Whether a sheet is left out of the rendered document
    pub fn is_sheet_skipped(&self, sheet_name: &str, visible: bool) -> bool {
        if self.sheets.get(sheet_name).is_some_and(|sheet| sheet.skip) {
            return true;
        }
        !visible && self.global.skip_hidden_sheets
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            workbook: default_workbook(),
            global: GlobalConfig::default(),
            sheets: HashMap::new(),
        }
    }
}

/// Settings applied to every sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Leave the last column (the Note column) out of the rendered table
    pub exclude_note_column: bool,
    /// Fail instead of picking the leftmost banner when a row has several
    pub strict_warning_rows: bool,
    /// Leave hidden and very hidden sheets out of the document
    pub skip_hidden_sheets: bool,
    /// Short multi-line text with at most this many lines is joined with spaces
    pub collapse_max_segments: usize,
    /// ... provided it is shorter than this many characters
    pub collapse_max_chars: usize,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            exclude_note_column: true,
            strict_warning_rows: false,
            skip_hidden_sheets: false,
            collapse_max_segments: 3,
            collapse_max_chars: 30,
        }
    }
}

/// Sheet-specific overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig {
    #[serde(default)]
    pub exclude_note_column: Option<bool>,
    #[serde(default)]
    pub skip: bool,
}

fn default_workbook() -> PathBuf {
    PathBuf::from(DEFAULT_WORKBOOK)
}
