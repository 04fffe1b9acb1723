//! Order sheet parsing.
//!
//! Missing Order No / Design columns fail the upload; missing optional columns
//! and a header row below row 1 only produce warnings.

use karigar_types::{DecodedSheet, OrderParseOutput, ParseWarning, ParsedOrder};

use crate::aliases::LogicalField;
use crate::config::OrderParseConfig;
use crate::error::{IngestError, IngestResult};
use crate::header::{FieldRule, HeaderDetection, HeaderProfile, cell_value, detect_header_row};

const OPTIONAL_ORDER_FIELDS: [LogicalField; 4] = [
    LogicalField::Weight,
    LogicalField::Size,
    LogicalField::Quantity,
    LogicalField::Remarks,
];

pub fn order_header_profile(cfg: &OrderParseConfig) -> HeaderProfile {
    let mut fields = vec![
        FieldRule::key(LogicalField::OrderNo),
        FieldRule::key(LogicalField::Design),
    ];
    fields.extend(OPTIONAL_ORDER_FIELDS.iter().copied().map(FieldRule::optional));
    HeaderProfile {
        fields,
        min_non_empty_cells: cfg.min_non_empty_cells,
        max_rows_to_scan: cfg.max_rows_to_scan,
        min_score: cfg.min_header_score,
    }
}

fn header_warnings(detection: &HeaderDetection) -> Vec<ParseWarning> {
    let mut warnings = Vec::new();

    let missing: Vec<String> = OPTIONAL_ORDER_FIELDS
        .iter()
        .filter(|field| detection.column(**field).is_none())
        .map(|field| field.label().to_string())
        .collect();
    if !missing.is_empty() {
        warnings.push(ParseWarning::MissingColumns {
            columns: missing,
            detected_headers: detection.headers.clone(),
            header_row_index: detection.row_number(),
        });
    }

    if detection.row_index > 0 {
        warnings.push(ParseWarning::NonFirstHeaderRow {
            header_row_index: detection.row_number(),
        });
    }

    warnings
}

/// Parses one order sheet into orders plus warnings.
pub fn parse_order_sheet(
    sheet: &DecodedSheet,
    cfg: &OrderParseConfig,
) -> IngestResult<OrderParseOutput> {
    if sheet.is_empty() {
        return Err(IngestError::empty(&sheet.name));
    }

    let profile = order_header_profile(cfg);
    let detection = detect_header_row(&sheet.rows, &profile).map_err(|failure| {
        IngestError::HeaderNotFound {
            missing: failure
                .missing
                .iter()
                .map(|field| field.label().to_string())
                .collect(),
            detected_headers: failure.detected_headers,
        }
    })?;

    let warnings = header_warnings(&detection);

    let field = |row: &[Option<String>], f: LogicalField| -> String {
        detection
            .column(f)
            .map(|idx| cell_value(row, idx))
            .unwrap_or_default()
    };

    let orders: Vec<ParsedOrder> = sheet
        .rows
        .iter()
        .skip(detection.row_index + 1)
        .map(|row| {
            let row = row.as_slice();
            ParsedOrder {
                order_no: field(row, LogicalField::OrderNo),
                design: field(row, LogicalField::Design),
                weight: field(row, LogicalField::Weight),
                size: field(row, LogicalField::Size),
                quantity: field(row, LogicalField::Quantity),
                remarks: field(row, LogicalField::Remarks),
            }
        })
        .filter(|order| !(order.order_no.is_empty() && order.design.is_empty()))
        .collect();

    if orders.is_empty() {
        return Err(IngestError::NoValidRows(format!(
            "No valid orders found in \"{}\": the header was found on row {} but no row below it has an Order No or Design.",
            sheet.name,
            detection.row_number()
        )));
    }

    tracing::info!(
        sheet = %sheet.name,
        orders = orders.len(),
        warnings = warnings.len(),
        "parsed order sheet"
    );

    Ok(OrderParseOutput { orders, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sheet(rows: &[Vec<&str>]) -> DecodedSheet {
        DecodedSheet::from_text_rows("Orders", rows)
    }

    #[test]
    fn header_below_title_rows_warns_with_one_indexed_row() {
        let s = sheet(&[
            vec!["ORDER LIST"],
            vec!["Shop: Zaveri Bazaar"],
            vec!["Sr No", "Order No", "Design", "Weight", "Size", "Qty", "Remarks"],
            vec!["1", "A-100", "AB-12", "4.5", "7", "2", "urgent"],
        ]);
        let out = parse_order_sheet(&s, &OrderParseConfig::default()).unwrap();
        assert_eq!(
            out.warnings,
            vec![ParseWarning::NonFirstHeaderRow {
                header_row_index: 3
            }]
        );
        assert_eq!(
            out.orders,
            vec![ParsedOrder {
                order_no: "A-100".into(),
                design: "AB-12".into(),
                weight: "4.5".into(),
                size: "7".into(),
                quantity: "2".into(),
                remarks: "urgent".into(),
            }]
        );
    }

    #[test]
    fn aliased_headers_resolve() {
        let s = sheet(&[
            vec!["Order No.", "Design Code", "Net Wt", "Size", "Qty.", "Remark's"],
            vec!["7", "RG\u{2013}01", "3.2", "12", "1", "polish\u{00A0}only"],
        ]);
        let out = parse_order_sheet(&s, &OrderParseConfig::default()).unwrap();
        assert!(out.warnings.is_empty());
        let order = &out.orders[0];
        assert_eq!(order.order_no, "7");
        assert_eq!(order.design, "RG-01");
        assert_eq!(order.weight, "3.2");
        assert_eq!(order.size, "12");
        assert_eq!(order.quantity, "1");
        assert_eq!(order.remarks, "polish only");
    }

    #[test]
    fn missing_optional_columns_warn_once() {
        let s = sheet(&[
            vec!["Order No", "Design", "Customer"],
            vec!["1", "AB-12", "Mehta"],
            vec!["2", "AB-13", "Shah"],
        ]);
        let out = parse_order_sheet(&s, &OrderParseConfig::default()).unwrap();
        assert_eq!(out.orders.len(), 2);
        assert!(out.orders.iter().all(|o| o.weight.is_empty()
            && o.size.is_empty()
            && o.quantity.is_empty()
            && o.remarks.is_empty()));
        assert_eq!(
            out.warnings,
            vec![ParseWarning::MissingColumns {
                columns: vec![
                    "Weight".into(),
                    "Size".into(),
                    "Quantity".into(),
                    "Remarks".into()
                ],
                detected_headers: vec!["Order No".into(), "Design".into(), "Customer".into()],
                header_row_index: 1,
            }]
        );
    }

    #[test]
    fn two_column_sheet_parses() {
        let s = sheet(&[vec!["Order No", "Design"], vec!["101", "AB-12"]]);
        let out = parse_order_sheet(&s, &OrderParseConfig::default()).unwrap();
        assert_eq!(out.orders.len(), 1);
        assert_eq!(out.orders[0].order_no, "101");
        assert_eq!(out.orders[0].design, "AB-12");
        assert_eq!(
            out.warnings,
            vec![ParseWarning::MissingColumns {
                columns: vec![
                    "Weight".into(),
                    "Size".into(),
                    "Quantity".into(),
                    "Remarks".into()
                ],
                detected_headers: vec!["Order No".into(), "Design".into()],
                header_row_index: 1,
            }]
        );
    }

    #[test]
    fn missing_critical_columns_fail_with_detected_headers() {
        let s = sheet(&[vec!["Date", "Customer"], vec!["01/02", "Mehta"]]);
        let err = parse_order_sheet(&s, &OrderParseConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HeaderNotFound);
        let text = err.to_string();
        assert!(text.contains("Order No"));
        assert!(text.contains("Design"));
        assert!(text.contains("Date, Customer"));
    }

    #[test]
    fn blank_and_separator_rows_are_dropped() {
        let s = sheet(&[
            vec!["Order No", "Design", "Qty"],
            vec!["1", "AB-12", "1"],
            vec!["", "", "3"],
            vec!["\u{200B}", " ", ""],
            vec!["", "AB-14", ""],
        ]);
        let out = parse_order_sheet(&s, &OrderParseConfig::default()).unwrap();
        let designs: Vec<_> = out.orders.iter().map(|o| o.design.as_str()).collect();
        assert_eq!(designs, vec!["AB-12", "AB-14"]);
    }

    #[test]
    fn header_without_data_is_no_valid_rows() {
        let s = sheet(&[vec!["Order No", "Design", "Qty"], vec!["", "", "5"]]);
        let err = parse_order_sheet(&s, &OrderParseConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoValidRows);
        assert!(err.to_string().starts_with("No valid orders found"));
    }

    #[test]
    fn empty_sheet_is_empty_document() {
        let err = parse_order_sheet(&sheet(&[]), &OrderParseConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyDocument);
    }
}
