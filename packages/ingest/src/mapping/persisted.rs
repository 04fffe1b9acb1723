use std::collections::BTreeMap;

use karigar_types::{KarigarMappingEntry, ParsedMappingWorkbook};

use crate::config::DesignKeyOptions;
use crate::normalize::design_key;

/// Rebuilds a stored workbook with every design key recomputed from the raw
/// `design` text.
///
/// Stored `design_normalized` values are ignored. Entries whose design now
/// normalizes to nothing are dropped, and so are sheets left empty. When two
/// stored entries collapse onto one key the first in key order is kept.
pub fn rehydrate_workbook(
    workbook: ParsedMappingWorkbook,
    keys: &DesignKeyOptions,
) -> ParsedMappingWorkbook {
    let mut out = ParsedMappingWorkbook::default();
    let mut rekeyed = 0usize;

    for (name, sheet) in workbook.sheets {
        let mut entries: BTreeMap<String, KarigarMappingEntry> = BTreeMap::new();
        for entry in sheet.entries.into_values() {
            let key = design_key(&entry.design, keys);
            if key.is_empty() {
                continue;
            }
            if entry.design_normalized != key {
                rekeyed += 1;
            }
            entries
                .entry(key.clone())
                .or_insert(KarigarMappingEntry {
                    design_normalized: key,
                    ..entry
                });
        }
        out.insert_sheet(name, entries);
    }

    if rekeyed > 0 {
        tracing::debug!(rekeyed, "recomputed stale design keys in stored mapping");
    }

    out
}
