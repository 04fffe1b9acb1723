use karigar_types::{DecodedSheet, MappingResolution, MappingSheetSummary, ParsedMappingWorkbook};

use crate::config::{DesignKeyOptions, MappingParseConfig, SheetScanMode};
use crate::error::{IngestError, IngestResult};
use crate::mapping::sheet::{parse_mapping_sheet, required_columns_text};

/// Sheet read order: the priority sheets that exist, in priority order, then
/// (in `AllSheets` mode) every other sheet sorted by name.
pub fn sheet_read_order<S: AsRef<str>>(
    names: &[S],
    priority: &[String],
    mode: SheetScanMode,
) -> Vec<String> {
    let exists = |candidate: &str| names.iter().any(|n| n.as_ref() == candidate);

    let mut order: Vec<String> = Vec::with_capacity(names.len());
    for p in priority {
        if exists(p) && !order.contains(p) {
            order.push(p.clone());
        }
    }

    if mode == SheetScanMode::AllSheets {
        let mut rest: Vec<String> = names
            .iter()
            .map(|n| n.as_ref().to_string())
            .filter(|n| !order.contains(n))
            .collect();
        rest.sort();
        rest.dedup();
        order.extend(rest);
    }

    order
}

/// Parses every sheet of a mapping workbook and keeps the ones that yielded
/// entries. Fails only when no sheet yielded anything; a workbook whose
/// sheets are all empty is an empty document.
pub fn resolve_workbook(
    sheets: &[DecodedSheet],
    cfg: &MappingParseConfig,
    keys: &DesignKeyOptions,
) -> IngestResult<MappingResolution> {
    if sheets.iter().all(DecodedSheet::is_empty) {
        return Err(IngestError::empty("mapping workbook"));
    }

    let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
    let order = sheet_read_order(&names, &cfg.priority_sheets, cfg.sheet_scan_mode);

    let mut workbook = ParsedMappingWorkbook::default();
    let mut summaries = Vec::with_capacity(order.len());
    let mut sheet_errors = Vec::new();

    for name in &order {
        let Some(sheet) = sheets.iter().find(|s| &s.name == name) else {
            continue;
        };
        let result = parse_mapping_sheet(sheet, cfg, keys);
        summaries.push(MappingSheetSummary::from(&result));

        match result.error {
            Some(error) => {
                tracing::warn!(sheet = %name, %error, "mapping sheet skipped");
                sheet_errors.push(error);
            }
            None => workbook.insert_sheet(result.sheet_name, result.entries),
        }
    }

    if workbook.is_empty() {
        if order.is_empty() {
            sheet_errors.push(format!(
                "None of the priority sheets ({}) exist in this workbook.",
                cfg.priority_sheets.join(", ")
            ));
        }
        return Err(IngestError::NoMappingSheets {
            sheet_errors,
            required_columns: required_columns_text(cfg),
        });
    }

    tracing::info!(
        sheets = workbook.sheets.len(),
        skipped = sheet_errors.len(),
        entries = workbook.entry_count(),
        "resolved mapping workbook"
    );

    Ok(MappingResolution {
        workbook,
        sheets: summaries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MappingColumns;
    use crate::error::ErrorKind;

    fn priority() -> Vec<String> {
        vec!["1".into(), "3".into(), "2".into()]
    }

    fn loose() -> MappingParseConfig {
        MappingParseConfig {
            columns: MappingColumns {
                generic_name_required: false,
            },
            ..Default::default()
        }
    }

    #[test]
    fn priority_sheets_first_then_alphabetical() {
        let names = ["Summary", "2", "Archive", "1", "3"];
        assert_eq!(
            sheet_read_order(&names, &priority(), SheetScanMode::AllSheets),
            vec!["1", "3", "2", "Archive", "Summary"]
        );
        assert_eq!(
            sheet_read_order(&names, &priority(), SheetScanMode::PriorityOnly),
            vec!["1", "3", "2"]
        );
        assert_eq!(
            sheet_read_order(&["Sheet1", "2"], &priority(), SheetScanMode::AllSheets),
            vec!["2", "Sheet1"]
        );
    }

    #[test]
    fn failing_sheets_do_not_block_working_ones() {
        let sheets = vec![
            DecodedSheet::from_text_rows("Sheet2", &[vec!["Notes"], vec!["call karigar"]]),
            DecodedSheet::from_text_rows(
                "1",
                &[vec!["Design", "Karigar"], vec!["AB-12", "Ramesh"]],
            ),
        ];
        let resolution = resolve_workbook(&sheets, &loose(), &DesignKeyOptions::default()).unwrap();
        assert_eq!(resolution.workbook.sheet_names().collect::<Vec<_>>(), vec!["1"]);
        assert!(resolution.workbook.sheet("Sheet2").is_none());
        assert_eq!(resolution.sheets.len(), 2);
        let failed: Vec<_> = resolution.failed_sheets().map(|s| s.sheet_name.as_str()).collect();
        assert_eq!(failed, vec!["Sheet2"]);
    }

    #[test]
    fn arbitrarily_named_sheets_are_found() {
        let sheets = vec![DecodedSheet::from_text_rows(
            "Karigar List",
            &[vec!["Design", "Karigar"], vec!["AB-12", "Ramesh"]],
        )];
        let resolution = resolve_workbook(&sheets, &loose(), &DesignKeyOptions::default()).unwrap();
        assert_eq!(resolution.workbook.entry_count(), 1);

        let priority_only = MappingParseConfig {
            sheet_scan_mode: SheetScanMode::PriorityOnly,
            ..loose()
        };
        let err = resolve_workbook(&sheets, &priority_only, &DesignKeyOptions::default()).unwrap_err();
        assert!(err.to_string().contains("None of the priority sheets (1, 3, 2)"));
    }

    #[test]
    fn all_failures_are_reported_together() {
        let sheets = vec![
            DecodedSheet::from_text_rows("A", &[vec!["Notes"]]),
            DecodedSheet::from_text_rows("B", &[vec!["Design", "Karigar", "Generic Name"]]),
        ];
        let err = resolve_workbook(&sheets, &MappingParseConfig::default(), &DesignKeyOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoValidRows);
        let text = err.to_string();
        assert!(text.contains("Sheet \"A\": could not find Design Code, Karigar Name, Generic Name"));
        assert!(text.contains("Sheet \"B\": header found on row 1"));
        assert!(text.contains("Design Code, Karigar Name and Generic Name columns"));
    }

    #[test]
    fn empty_workbook_is_empty_document() {
        let err = resolve_workbook(&[], &loose(), &DesignKeyOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyDocument);
    }

    #[test]
    fn workbook_of_blank_sheets_is_empty_document() {
        let sheets = vec![
            DecodedSheet::new("1", Vec::new()),
            DecodedSheet::from_text_rows("2", &[vec!["", ""], vec![""]]),
        ];
        let err = resolve_workbook(&sheets, &loose(), &DesignKeyOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyDocument);
    }
}
