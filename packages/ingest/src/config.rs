use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sheets read before all others when building a mapping lookup, in this order.
pub const DEFAULT_PRIORITY_SHEETS: [&str; 3] = ["1", "3", "2"];

// ============================ Config ============================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IngestConfig {
    pub orders: OrderParseConfig,
    pub mapping: MappingParseConfig,
    pub design_keys: DesignKeyOptions,
    /// How many normalized keys to show when a mapping matches no order
    pub diagnostics_sample_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            orders: OrderParseConfig::default(),
            mapping: MappingParseConfig::default(),
            design_keys: DesignKeyOptions::default(),
            diagnostics_sample_size: 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OrderParseConfig {
    /// Rows inspected when looking for the header row
    pub max_rows_to_scan: usize,
    /// Rows with fewer non-empty cells never qualify as a header
    pub min_non_empty_cells: usize,
    /// Minimum detector score for a header row
    pub min_header_score: u32,
}

impl Default for OrderParseConfig {
    fn default() -> Self {
        Self {
            max_rows_to_scan: 20,
            min_non_empty_cells: 3,
            min_header_score: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MappingColumns {
    /// Strict "master design file" layout: design, karigar and generic name
    /// must all be present. When false the generic name column is optional.
    pub generic_name_required: bool,
}

impl Default for MappingColumns {
    fn default() -> Self {
        Self {
            generic_name_required: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SheetScanMode {
    /// Parse every sheet in the workbook
    #[default]
    AllSheets,
    /// Parse only the priority sheets that exist
    PriorityOnly,
}

impl FromStr for SheetScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "all" | "all_sheets" => Ok(SheetScanMode::AllSheets),
            "priority" | "priority_only" => Ok(SheetScanMode::PriorityOnly),
            other => Err(format!(
                "unknown sheet scan mode '{other}' (expected all_sheets or priority_only)"
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MappingParseConfig {
    pub columns: MappingColumns,
    pub sheet_scan_mode: SheetScanMode,
    /// Rows inspected per sheet when looking for the header row
    pub max_rows_to_scan: usize,
    /// Minimum detector score for a header row
    pub min_header_score: u32,
    /// Sheet names read first, in order; remaining sheets follow alphabetically
    pub priority_sheets: Vec<String>,
}

impl Default for MappingParseConfig {
    fn default() -> Self {
        Self {
            columns: MappingColumns::default(),
            sheet_scan_mode: SheetScanMode::default(),
            max_rows_to_scan: 10,
            min_header_score: 20,
            priority_sheets: DEFAULT_PRIORITY_SHEETS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl MappingParseConfig {
    /// Minimum non-empty cells for a mapping header row: one per mandatory column.
    pub fn min_non_empty_cells(&self) -> usize {
        if self.columns.generic_name_required {
            3
        } else {
            2
        }
    }
}

/// Opt-in stages applied on top of the base design-code normalization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DesignKeyOptions {
    /// Treat `-`, `_`, `/` and spaces inside design codes as the same separator
    pub fold_separators: bool,
}
