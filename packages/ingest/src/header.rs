//! Header-row detection.
//!
//! Each of the first `max_rows_to_scan` rows is scored as a header candidate:
//! rows with too few non-empty cells score 0 unless they already hold every
//! required column; otherwise every required column
//! found adds [`REQUIRED_COLUMN_SCORE`] and every key column found adds
//! [`KEY_COLUMN_BONUS`]. The highest score wins; ties go to the earliest row.

use std::collections::{BTreeMap, BTreeSet};

use karigar_types::RawRow;

use crate::aliases::LogicalField;
use crate::matcher::{equals_header_alias, find_column_index};
use crate::normalize::{is_numeric_ratio, normalize_cell_value, normalize_optional_cell};

pub const REQUIRED_COLUMN_SCORE: u32 = 10;
pub const KEY_COLUMN_BONUS: u32 = 20;

/// How one logical column takes part in detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: LogicalField,
    /// Must be found for a row to qualify as the header
    pub required: bool,
    /// Earns the key-column bonus when found
    pub key: bool,
}

impl FieldRule {
    /// Required column that also earns the key-column bonus.
    pub const fn key(field: LogicalField) -> Self {
        Self {
            field,
            required: true,
            key: true,
        }
    }

    pub const fn required(field: LogicalField) -> Self {
        Self {
            field,
            required: true,
            key: false,
        }
    }

    /// Located when present, never scored.
    pub const fn optional(field: LogicalField) -> Self {
        Self {
            field,
            required: false,
            key: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderProfile {
    /// Fields in resolution order; a column claimed by an earlier field is not
    /// offered to later ones.
    pub fields: Vec<FieldRule>,
    pub min_non_empty_cells: usize,
    pub max_rows_to_scan: usize,
    pub min_score: u32,
}

impl HeaderProfile {
    pub fn required_fields(&self) -> impl Iterator<Item = LogicalField> + '_ {
        self.fields.iter().filter(|r| r.required).map(|r| r.field)
    }

    /// Score of a row holding exactly the required fields. Such a row always
    /// qualifies, whatever `min_score` says.
    pub fn required_score(&self) -> u32 {
        self.fields
            .iter()
            .filter(|r| r.required)
            .map(|r| REQUIRED_COLUMN_SCORE + if r.key { KEY_COLUMN_BONUS } else { 0 })
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDetection {
    /// 0-based index of the header row in the scanned grid
    pub row_index: usize,
    pub columns: BTreeMap<LogicalField, usize>,
    pub score: u32,
    /// Non-empty cells of the header row, normalized
    pub headers: Vec<String>,
}

impl HeaderDetection {
    pub fn column(&self, field: LogicalField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// 1-indexed row number, as a spreadsheet user would count it.
    pub fn row_number(&self) -> usize {
        self.row_index + 1
    }
}

/// Why no header row qualified, with what was seen instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderNotDetected {
    pub missing: Vec<LogicalField>,
    pub detected_headers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowScore {
    pub score: u32,
    pub columns: BTreeMap<LogicalField, usize>,
}

#[inline]
pub fn cell_text(row: &[Option<String>], index: usize) -> &str {
    row.get(index)
        .and_then(|cell| cell.as_deref())
        .unwrap_or("")
}

/// Normalized text of one cell; empty when the cell is absent.
pub fn cell_value(row: &[Option<String>], index: usize) -> String {
    normalize_optional_cell(row.get(index).and_then(|cell| cell.as_deref()))
}

pub fn non_empty_cells(row: &[Option<String>]) -> Vec<String> {
    row.iter()
        .filter_map(|cell| cell.as_deref())
        .map(normalize_cell_value)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Cells `field` may still take; claimed cells and cells the field rejects
/// are masked out.
fn open_cells<'a>(
    row: &'a [Option<String>],
    field: LogicalField,
    claimed: &BTreeSet<usize>,
) -> Vec<Option<&'a str>> {
    row.iter()
        .enumerate()
        .map(|(idx, cell)| {
            cell.as_deref().filter(|text| {
                !claimed.contains(&idx) && !(field.rejects_numeric_ratio() && is_numeric_ratio(text))
            })
        })
        .collect()
}

/// Locates each field's column in `row`.
///
/// A first pass takes exact alias matches in alias order, so `"Order No"` wins
/// over an earlier `"Sr No"`; a second pass falls back to
/// [`find_column_index`] over the columns still unclaimed. Columns are claimed
/// at most once, so `"Karigar Name"` is never also read as a generic `"name"`.
pub fn resolve_columns(row: &[Option<String>], fields: &[FieldRule]) -> BTreeMap<LogicalField, usize> {
    let mut claimed: BTreeSet<usize> = BTreeSet::new();
    let mut columns = BTreeMap::new();

    for rule in fields {
        let open = open_cells(row, rule.field, &claimed);
        let exact = rule.field.aliases().iter().find_map(|alias| {
            open.iter().position(|&cell| {
                cell.is_some_and(|text| equals_header_alias(text, std::slice::from_ref(alias)))
            })
        });
        if let Some(idx) = exact {
            claimed.insert(idx);
            columns.insert(rule.field, idx);
        }
    }

    for rule in fields {
        if columns.contains_key(&rule.field) {
            continue;
        }
        let open = open_cells(row, rule.field, &claimed);
        if let Some(idx) = find_column_index(&open, rule.field.aliases()) {
            claimed.insert(idx);
            columns.insert(rule.field, idx);
        }
    }

    columns
}

/// Scores `row` as a header candidate.
///
/// Rows with fewer than `min_non_empty_cells` cells score 0 unless every
/// required field resolves in them.
pub fn score_row(row: &[Option<String>], profile: &HeaderProfile) -> RowScore {
    let columns = resolve_columns(row, &profile.fields);
    let complete = profile
        .required_fields()
        .all(|field| columns.contains_key(&field));
    if !complete && non_empty_cells(row).len() < profile.min_non_empty_cells {
        return RowScore::default();
    }

    let score = profile
        .fields
        .iter()
        .filter(|rule| columns.contains_key(&rule.field))
        .map(|rule| {
            let mut s = 0;
            if rule.required {
                s += REQUIRED_COLUMN_SCORE;
            }
            if rule.key {
                s += KEY_COLUMN_BONUS;
            }
            s
        })
        .sum();

    RowScore { score, columns }
}

/// Finds the header row among the first `profile.max_rows_to_scan` rows.
///
/// A row qualifies when it contains every required field and reaches
/// `profile.min_score` (capped at [`HeaderProfile::required_score`]), so a
/// complete row always qualifies and a failure always names at least one
/// missing field. No fallback to row 0 is attempted.
pub fn detect_header_row(
    rows: &[RawRow],
    profile: &HeaderProfile,
) -> Result<HeaderDetection, HeaderNotDetected> {
    let scan = rows.len().min(profile.max_rows_to_scan);
    let min_score = profile.min_score.min(profile.required_score());

    let mut best: Option<(usize, RowScore)> = None;
    let mut best_partial: Option<(usize, u32)> = None;

    for (idx, row) in rows.iter().take(scan).enumerate() {
        let scored = score_row(row, profile);
        if scored.score == 0 {
            continue;
        }

        if best_partial.is_none_or(|(_, s)| scored.score > s) {
            best_partial = Some((idx, scored.score));
        }

        let complete = profile
            .required_fields()
            .all(|field| scored.columns.contains_key(&field));
        if complete
            && scored.score >= min_score
            && best.as_ref().is_none_or(|(_, b)| scored.score > b.score)
        {
            best = Some((idx, scored));
        }
    }

    if let Some((row_index, scored)) = best {
        tracing::debug!(
            row = row_index + 1,
            score = scored.score,
            "header row detected"
        );
        return Ok(HeaderDetection {
            row_index,
            columns: scored.columns,
            score: scored.score,
            headers: non_empty_cells(&rows[row_index]),
        });
    }

    // Report against the most promising row, or else the fullest one.
    let diagnostic_row = best_partial.map(|(idx, _)| idx).or_else(|| {
        rows.iter()
            .take(scan)
            .enumerate()
            .map(|(idx, row)| (idx, non_empty_cells(row).len()))
            .filter(|(_, n)| *n > 0)
            .fold(None, |acc: Option<(usize, usize)>, (idx, n)| match acc {
                Some((_, best_n)) if best_n >= n => acc,
                _ => Some((idx, n)),
            })
            .map(|(idx, _)| idx)
    });

    let (found, detected_headers) = match diagnostic_row {
        Some(idx) => (
            resolve_columns(&rows[idx], &profile.fields),
            non_empty_cells(&rows[idx]),
        ),
        None => (BTreeMap::new(), Vec::new()),
    };
    let missing: Vec<LogicalField> = profile
        .required_fields()
        .filter(|field| !found.contains_key(field))
        .collect();

    tracing::debug!(scanned = scan, ?missing, "no header row qualified");

    Err(HeaderNotDetected {
        missing,
        detected_headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> RawRow {
        cells
            .iter()
            .map(|c| (!c.is_empty()).then(|| c.to_string()))
            .collect()
    }

    fn order_profile() -> HeaderProfile {
        HeaderProfile {
            fields: vec![
                FieldRule::key(LogicalField::OrderNo),
                FieldRule::key(LogicalField::Design),
                FieldRule::optional(LogicalField::Weight),
                FieldRule::optional(LogicalField::Size),
                FieldRule::optional(LogicalField::Quantity),
                FieldRule::optional(LogicalField::Remarks),
            ],
            min_non_empty_cells: 3,
            max_rows_to_scan: 20,
            min_score: 20,
        }
    }

    fn mapping_profile() -> HeaderProfile {
        HeaderProfile {
            fields: vec![
                FieldRule::key(LogicalField::Design),
                FieldRule::key(LogicalField::Karigar),
                FieldRule::required(LogicalField::GenericName),
            ],
            min_non_empty_cells: 3,
            max_rows_to_scan: 10,
            min_score: 20,
        }
    }

    #[test]
    fn skips_title_rows() {
        let rows = vec![
            row(&["ORDER SHEET - MARCH"]),
            row(&[]),
            row(&["Sr No", "Order No", "Design", "Weight", "Size", "Qty", "Remarks"]),
            row(&["1", "A-100", "AB-12", "4.5", "7", "1", "rush"]),
        ];
        let det = detect_header_row(&rows, &order_profile()).unwrap();
        assert_eq!(det.row_index, 2);
        assert_eq!(det.row_number(), 3);
        assert_eq!(det.score, 60);
        assert_eq!(det.column(LogicalField::OrderNo), Some(1));
        assert_eq!(det.column(LogicalField::Design), Some(2));
        assert_eq!(det.column(LogicalField::Quantity), Some(5));
    }

    #[test]
    fn sparse_rows_score_zero() {
        let profile = order_profile();
        assert_eq!(score_row(&row(&["Order No", "Notes"]), &profile).score, 0);
        assert_eq!(
            score_row(&row(&["Order No", "Design", "Notes"]), &profile).score,
            60
        );
    }

    #[test]
    fn complete_two_column_header_qualifies() {
        let rows = vec![row(&["Order No", "Design"]), row(&["101", "AB-12"])];
        let det = detect_header_row(&rows, &order_profile()).unwrap();
        assert_eq!(det.row_index, 0);
        assert_eq!(det.score, 60);
        assert_eq!(det.column(LogicalField::Design), Some(1));
    }

    #[test]
    fn complete_row_qualifies_above_min_score() {
        let mut profile = order_profile();
        profile.min_score = 500;
        assert_eq!(profile.required_score(), 60);
        let det = detect_header_row(&[row(&["Order No", "Design", "Qty"])], &profile).unwrap();
        assert_eq!(det.row_index, 0);
    }

    #[test]
    fn failure_always_names_a_missing_field() {
        let rows = vec![row(&["Order No", "Notes"]), row(&[]), row(&["Design"])];
        let err = detect_header_row(&rows, &order_profile()).unwrap_err();
        assert!(!err.missing.is_empty());
        let err = detect_header_row(&[], &order_profile()).unwrap_err();
        assert_eq!(err.missing, vec![LogicalField::OrderNo, LogicalField::Design]);
    }

    #[test]
    fn ties_favor_earliest_row() {
        let rows = vec![
            row(&["Order", "Design", "Qty"]),
            row(&["Order No", "Design", "Qty"]),
        ];
        let det = detect_header_row(&rows, &order_profile()).unwrap();
        assert_eq!(det.row_index, 0);
    }

    #[test]
    fn rows_beyond_scan_limit_are_ignored() {
        let mut rows: Vec<RawRow> = (0..5).map(|i| row(&[&format!("title {i}")])).collect();
        rows.push(row(&["Order No", "Design", "Qty"]));
        let mut profile = order_profile();
        profile.max_rows_to_scan = 5;
        let err = detect_header_row(&rows, &profile).unwrap_err();
        assert_eq!(err.missing, vec![LogicalField::OrderNo, LogicalField::Design]);
        assert_eq!(err.detected_headers, vec!["title 0"]);
    }

    #[test]
    fn failure_reports_fullest_row_headers() {
        let rows = vec![row(&["Date", "Customer"]), row(&["01/02", "Mehta"])];
        let err = detect_header_row(&rows, &order_profile()).unwrap_err();
        assert_eq!(err.missing, vec![LogicalField::OrderNo, LogicalField::Design]);
        assert_eq!(err.detected_headers, vec!["Date", "Customer"]);
    }

    #[test]
    fn claimed_columns_are_not_reused() {
        let columns = resolve_columns(
            &row(&["Design Code", "Karigar Name", "Generic Name"]),
            &mapping_profile().fields,
        );
        assert_eq!(columns[&LogicalField::Design], 0);
        assert_eq!(columns[&LogicalField::Karigar], 1);
        assert_eq!(columns[&LogicalField::GenericName], 2);
    }

    #[test]
    fn exact_alias_beats_earlier_containment() {
        let columns = resolve_columns(
            &row(&["Product Name", "Design No", "Karigar"]),
            &mapping_profile().fields,
        );
        assert_eq!(columns[&LogicalField::Design], 1);
        assert_eq!(columns[&LogicalField::GenericName], 0);
    }

    #[test]
    fn numeric_ratio_header_is_never_a_generic_name() {
        let columns = resolve_columns(
            &row(&["Design", "Karigar", "3+1", "Name"]),
            &mapping_profile().fields,
        );
        assert_eq!(columns[&LogicalField::GenericName], 3);
    }

    #[test]
    fn mapping_row_needs_design_and_karigar_together() {
        let rows = vec![
            row(&["Design", "Generic Name", "Notes"]),
            row(&["Karigar", "Generic Name", "Notes"]),
        ];
        let err = detect_header_row(&rows, &mapping_profile()).unwrap_err();
        assert_eq!(err.missing, vec![LogicalField::Karigar]);
        assert_eq!(err.detected_headers, vec!["Design", "Generic Name", "Notes"]);
    }
}
