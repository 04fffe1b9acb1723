use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One decoded row. `None` marks a cell the decoder reported as empty.
pub type RawRow = Vec<Option<String>>;

/// Rows of raw cells exactly as a decoder produced them.
pub type RawGrid = Vec<RawRow>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DecodedSheet {
    pub name: String,
    pub rows: RawGrid,
}

impl DecodedSheet {
    pub fn new(name: impl Into<String>, rows: RawGrid) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Builds a sheet from string literals; empty strings become `None`.
    pub fn from_text_rows<S: AsRef<str>>(name: impl Into<String>, rows: &[Vec<S>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let cell = cell.as_ref();
                        (!cell.is_empty()).then(|| cell.to_string())
                    })
                    .collect()
            })
            .collect();
        Self::new(name, rows)
    }

    /// True when no row has a single non-empty cell.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(Option::is_none)
    }
}
