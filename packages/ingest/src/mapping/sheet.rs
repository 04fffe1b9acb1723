use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use karigar_types::{DecodedSheet, KarigarMappingEntry, MappingSheetResult};

use crate::aliases::LogicalField;
use crate::config::{DesignKeyOptions, MappingParseConfig};
use crate::header::{FieldRule, HeaderProfile, cell_text, cell_value, detect_header_row};
use crate::normalize::{design_key, is_numeric_ratio, normalize_header};

/// How many detected header cells are quoted in a sheet error.
const HEADER_PREVIEW_LEN: usize = 5;

pub fn mapping_header_profile(cfg: &MappingParseConfig) -> HeaderProfile {
    let generic = if cfg.columns.generic_name_required {
        FieldRule::required(LogicalField::GenericName)
    } else {
        FieldRule::optional(LogicalField::GenericName)
    };
    HeaderProfile {
        fields: vec![
            FieldRule::key(LogicalField::Design),
            FieldRule::key(LogicalField::Karigar),
            generic,
        ],
        min_non_empty_cells: cfg.min_non_empty_cells(),
        max_rows_to_scan: cfg.max_rows_to_scan,
        min_score: cfg.min_header_score,
    }
}

/// Human-readable list of the columns a mapping sheet must carry.
pub fn required_columns_text(cfg: &MappingParseConfig) -> String {
    if cfg.columns.generic_name_required {
        "Design Code, Karigar Name and Generic Name".to_string()
    } else {
        "Design Code and Karigar Name (Generic Name optional)".to_string()
    }
}

/// True when a data cell just repeats its column's header label.
fn reads_as_header(value: &str, header_label: &str, aliases: &[&str]) -> bool {
    let value = normalize_header(value);
    !value.is_empty()
        && (value == normalize_header(header_label)
            || aliases.iter().any(|alias| normalize_header(alias) == value))
}

/// Parses one mapping sheet. Never fails: a sheet without a usable header or
/// without a single valid row comes back with `error` set and no entries.
pub fn parse_mapping_sheet(
    sheet: &DecodedSheet,
    cfg: &MappingParseConfig,
    keys: &DesignKeyOptions,
) -> MappingSheetResult {
    if sheet.is_empty() {
        return MappingSheetResult::failed(&sheet.name, format!("Sheet \"{}\" is empty.", sheet.name));
    }

    let profile = mapping_header_profile(cfg);
    let detection = match detect_header_row(&sheet.rows, &profile) {
        Ok(detection) => detection,
        Err(failure) => {
            let missing: Vec<&str> = failure
                .missing
                .iter()
                .map(|field| field.mapping_label())
                .collect();
            let preview: Vec<&str> = failure
                .detected_headers
                .iter()
                .take(HEADER_PREVIEW_LEN)
                .map(String::as_str)
                .collect();
            return MappingSheetResult::failed(
                &sheet.name,
                format!(
                    "Sheet \"{}\": could not find {} column(s) in the first {} rows. Detected headers: {}.",
                    sheet.name,
                    missing.join(", "),
                    cfg.max_rows_to_scan,
                    if preview.is_empty() {
                        "(none)".to_string()
                    } else {
                        preview.join(", ")
                    }
                ),
            );
        }
    };

    let (Some(design_col), Some(karigar_col)) = (
        detection.column(LogicalField::Design),
        detection.column(LogicalField::Karigar),
    ) else {
        return MappingSheetResult::failed(
            &sheet.name,
            format!(
                "Sheet \"{}\": Design Code and Karigar Name must be on the same header row.",
                sheet.name
            ),
        );
    };
    let generic_col = detection.column(LogicalField::GenericName);

    let header_row = &sheet.rows[detection.row_index];
    let design_label = cell_text(header_row, design_col);
    let karigar_label = cell_text(header_row, karigar_col);

    let mut entries: BTreeMap<String, KarigarMappingEntry> = BTreeMap::new();
    let mut duplicates = 0usize;

    for row in sheet.rows.iter().skip(detection.row_index + 1) {
        let design = cell_value(row, design_col);
        let karigar = cell_value(row, karigar_col);
        if design.is_empty() || karigar.is_empty() {
            continue;
        }
        if reads_as_header(&design, design_label, LogicalField::Design.aliases())
            || reads_as_header(&karigar, karigar_label, LogicalField::Karigar.aliases())
        {
            continue;
        }

        let key = design_key(&design, keys);
        if key.is_empty() {
            continue;
        }

        let generic_name = generic_col
            .map(|col| cell_value(row, col))
            .filter(|name| !name.is_empty() && !is_numeric_ratio(name));

        match entries.entry(key) {
            Entry::Vacant(slot) => {
                let design_normalized = slot.key().clone();
                slot.insert(KarigarMappingEntry {
                    design,
                    design_normalized,
                    karigar,
                    generic_name,
                });
            }
            Entry::Occupied(_) => duplicates += 1,
        }
    }

    if entries.is_empty() {
        return MappingSheetResult::failed(
            &sheet.name,
            format!(
                "Sheet \"{}\": header found on row {} but no row below it has both a design code and a karigar name.",
                sheet.name,
                detection.row_number()
            ),
        );
    }

    tracing::debug!(
        sheet = %sheet.name,
        entries = entries.len(),
        duplicates,
        header_row = detection.row_number(),
        "parsed mapping sheet"
    );

    MappingSheetResult {
        sheet_name: sheet.name.clone(),
        entries,
        error: None,
    }
}
