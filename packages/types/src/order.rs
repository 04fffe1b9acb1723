use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One order line. Every field is the normalized cell text, or `""` when the
/// column was absent or the cell was blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedOrder {
    pub order_no: String,
    pub design: String,
    pub weight: String,
    pub size: String,
    pub quantity: String,
    pub remarks: String,
}

/// Informational notes attached to a successful order parse. They never block
/// the upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ParseWarning {
    /// Optional columns (weight, size, quantity, remarks) were not found.
    #[serde(rename_all = "camelCase")]
    MissingColumns {
        columns: Vec<String>,
        detected_headers: Vec<String>,
        /// 1-indexed row number of the header row.
        header_row_index: usize,
    },
    /// The header row was not the first row of the sheet.
    #[serde(rename_all = "camelCase")]
    NonFirstHeaderRow {
        /// 1-indexed row number of the header row.
        header_row_index: usize,
    },
}

impl ParseWarning {
    pub fn message(&self) -> String {
        match self {
            ParseWarning::MissingColumns {
                columns,
                detected_headers,
                header_row_index,
            } => format!(
                "Optional column(s) not found: {}. These fields were left blank. Detected headers on row {}: {}",
                columns.join(", "),
                header_row_index,
                detected_headers.join(", ")
            ),
            ParseWarning::NonFirstHeaderRow { header_row_index } => format!(
                "Header row found on row {}; skipped {} leading row(s) above it.",
                header_row_index,
                header_row_index.saturating_sub(1)
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OrderParseOutput {
    pub orders: Vec<ParsedOrder>,
    pub warnings: Vec<ParseWarning>,
}
