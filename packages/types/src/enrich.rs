use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::order::ParsedOrder;

/// Display label for orders whose design has no mapping.
pub const UNMAPPED_LABEL: &str = "Unmapped";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LookupValue {
    pub karigar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,
}

/// Flattened design-key → karigar view of a whole mapping workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct MappingLookup {
    pub entries: BTreeMap<String, LookupValue>,
}

impl MappingLookup {
    pub fn get(&self, key: &str) -> Option<&LookupValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedOrder {
    #[serde(flatten)]
    pub order: ParsedOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub karigar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,
}

impl EnrichedOrder {
    pub fn unmapped(order: ParsedOrder) -> Self {
        Self {
            order,
            karigar: None,
            generic_name: None,
        }
    }

    pub fn is_mapped(&self) -> bool {
        self.karigar.is_some()
    }

    pub fn karigar_label(&self) -> &str {
        self.karigar.as_deref().unwrap_or(UNMAPPED_LABEL)
    }
}

/// Key samples shown when a mapping is loaded but no order matched it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoMatchSamples {
    pub order_keys: Vec<String>,
    pub mapping_keys: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentDiagnostics {
    pub total_orders: usize,
    pub matched_orders: usize,
    pub unmatched_orders: usize,
    pub mapping_entries: usize,
    pub distinct_order_keys: usize,
    pub has_mapping_but_no_matches: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<NoMatchSamples>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EnrichmentOutput {
    pub orders: Vec<EnrichedOrder>,
    pub diagnostics: EnrichmentDiagnostics,
}
