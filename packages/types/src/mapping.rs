use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single design → karigar association read from a mapping sheet.
///
/// `design_normalized` is a convenience copy of the join key. Readers must
/// recompute it from `design` rather than trust a stored value, so an upgrade
/// of the normalization rules also repairs previously persisted entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KarigarMappingEntry {
    pub design: String,
    pub design_normalized: String,
    pub karigar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,
}

/// Outcome of parsing one sheet. A failed sheet carries `error` and no
/// entries; that is a diagnostic, not a fatal condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MappingSheetResult {
    pub sheet_name: String,
    pub entries: BTreeMap<String, KarigarMappingEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MappingSheetResult {
    pub fn failed(sheet_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            entries: BTreeMap::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && !self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MappingSheet {
    pub entries: BTreeMap<String, KarigarMappingEntry>,
}

/// Successful sheets of a mapping workbook, keyed by original sheet name.
/// Only sheets with at least one entry are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ParsedMappingWorkbook {
    pub sheets: BTreeMap<String, MappingSheet>,
}

impl ParsedMappingWorkbook {
    /// Adds a sheet; empty sheets are ignored.
    pub fn insert_sheet(
        &mut self,
        name: impl Into<String>,
        entries: BTreeMap<String, KarigarMappingEntry>,
    ) {
        if entries.is_empty() {
            return;
        }
        self.sheets.insert(name.into(), MappingSheet { entries });
    }

    pub fn sheet(&self, name: &str) -> Option<&MappingSheet> {
        self.sheets.get(name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    pub fn entry_count(&self) -> usize {
        self.sheets.values().map(|s| s.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// Per-sheet outcome kept alongside a resolved workbook, so callers can show
/// which sheets were skipped and why even when the upload succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MappingSheetSummary {
    pub sheet_name: String,
    pub entries: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&MappingSheetResult> for MappingSheetSummary {
    fn from(result: &MappingSheetResult) -> Self {
        Self {
            sheet_name: result.sheet_name.clone(),
            entries: result.entries.len(),
            error: result.error.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MappingResolution {
    pub workbook: ParsedMappingWorkbook,
    /// Every attempted sheet, in read order
    pub sheets: Vec<MappingSheetSummary>,
}

impl MappingResolution {
    pub fn failed_sheets(&self) -> impl Iterator<Item = &MappingSheetSummary> {
        self.sheets.iter().filter(|s| s.error.is_some())
    }
}
