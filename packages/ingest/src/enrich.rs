//! Joins orders to a resolved mapping workbook by normalized design code.
//!
//! The lookup is derived data: rebuild it whenever the mapping changes.

use std::collections::{BTreeMap, HashSet};

use karigar_types::{
    EnrichedOrder, EnrichmentDiagnostics, EnrichmentOutput, LookupValue, MappingLookup,
    NoMatchSamples, ParsedMappingWorkbook, ParsedOrder,
};

use crate::config::{DesignKeyOptions, IngestConfig, SheetScanMode};
use crate::mapping::sheet_read_order;
use crate::normalize::design_key;

/// Flattens a workbook into a single lookup. Sheets are read in priority
/// order and the first sheet to define a design key wins.
///
/// Keys are recomputed from each entry's `design`; the stored
/// `design_normalized` is not consulted.
pub fn build_lookup(
    workbook: &ParsedMappingWorkbook,
    priority: &[String],
    keys: &DesignKeyOptions,
) -> MappingLookup {
    let names: Vec<&str> = workbook.sheet_names().collect();
    let mut lookup = MappingLookup::default();

    for name in sheet_read_order(&names, priority, SheetScanMode::AllSheets) {
        let Some(sheet) = workbook.sheet(&name) else {
            continue;
        };
        for entry in sheet.entries.values() {
            let key = design_key(&entry.design, keys);
            if key.is_empty() || lookup.contains_key(&key) {
                continue;
            }
            lookup.entries.insert(
                key,
                LookupValue {
                    karigar: entry.karigar.clone(),
                    generic_name: entry.generic_name.clone(),
                },
            );
        }
    }

    lookup
}

/// Attaches karigar and generic name to each order and reports match counts.
pub fn enrich_orders(
    orders: &[ParsedOrder],
    lookup: &MappingLookup,
    keys: &DesignKeyOptions,
    sample_size: usize,
) -> EnrichmentOutput {
    let mut enriched = Vec::with_capacity(orders.len());
    let mut matched = 0usize;
    let mut seen: HashSet<String> = HashSet::new();
    let mut order_keys: Vec<String> = Vec::new();

    for order in orders {
        let key = design_key(&order.design, keys);
        let hit = lookup.get(&key);
        if hit.is_some() {
            matched += 1;
        }
        enriched.push(EnrichedOrder {
            order: order.clone(),
            karigar: hit.map(|v| v.karigar.clone()),
            generic_name: hit.and_then(|v| v.generic_name.clone()),
        });
        if !key.is_empty() && seen.insert(key.clone()) {
            order_keys.push(key);
        }
    }

    let total = orders.len();
    let has_mapping_but_no_matches = !lookup.is_empty() && matched == 0 && total > 0;

    let samples = has_mapping_but_no_matches.then(|| NoMatchSamples {
        order_keys: order_keys.iter().take(sample_size).cloned().collect(),
        mapping_keys: lookup.keys().take(sample_size).map(str::to_string).collect(),
    });

    if has_mapping_but_no_matches {
        tracing::warn!(
            orders = total,
            mapping_entries = lookup.len(),
            "mapping loaded but no order design matched"
        );
    }

    EnrichmentOutput {
        orders: enriched,
        diagnostics: EnrichmentDiagnostics {
            total_orders: total,
            matched_orders: matched,
            unmatched_orders: total - matched,
            mapping_entries: lookup.len(),
            distinct_order_keys: order_keys.len(),
            has_mapping_but_no_matches,
            samples,
        },
    }
}

/// Builds the lookup from `workbook` and enriches `orders` with it.
pub fn enrich(
    workbook: &ParsedMappingWorkbook,
    orders: &[ParsedOrder],
    cfg: &IngestConfig,
) -> EnrichmentOutput {
    let lookup = build_lookup(workbook, &cfg.mapping.priority_sheets, &cfg.design_keys);
    enrich_orders(
        orders,
        &lookup,
        &cfg.design_keys,
        cfg.diagnostics_sample_size,
    )
}

/// Groups orders by karigar; unmatched orders fall under "Unmapped".
pub fn group_by_karigar(orders: &[EnrichedOrder]) -> BTreeMap<String, Vec<&EnrichedOrder>> {
    let mut groups: BTreeMap<String, Vec<&EnrichedOrder>> = BTreeMap::new();
    for order in orders {
        groups
            .entry(order.karigar_label().to_string())
            .or_default()
            .push(order);
    }
    groups
}
