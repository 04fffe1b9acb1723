//! Canonical forms for cell text, header labels and design codes.
//!
//! All functions are total and idempotent. Results must be recomputed from the
//! source text on every read; a stored normalized value is never authoritative.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::DesignKeyOptions;

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

static NUMERIC_RATIO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s+\-:/]+$").unwrap());

static SEPARATOR_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s_/\-]+").unwrap());

#[inline]
fn is_zero_width(ch: char) -> bool {
    matches!(ch, '\u{200B}'..='\u{200D}' | '\u{FEFF}')
}

#[inline]
fn map_char(ch: char) -> Option<char> {
    match ch {
        c if is_zero_width(c) => None,
        '\u{00A0}' | '\u{2007}' | '\u{202F}' => Some(' '),
        '\u{2010}'..='\u{2015}' | '\u{2212}' => Some('-'),
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => Some('\''),
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => Some('"'),
        c if c.is_whitespace() => Some(' '),
        c if c.is_control() => None,
        c => Some(c),
    }
}

#[inline]
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips invisible and control characters, folds unicode dashes, quotes and
/// non-breaking spaces to ASCII, collapses whitespace runs and trims.
pub fn normalize_cell_value(s: &str) -> String {
    let mapped: String = s.chars().filter_map(map_char).collect();
    collapse_whitespace(&mapped)
}

/// `normalize_cell_value` for a possibly absent cell.
pub fn normalize_optional_cell(cell: Option<&str>) -> String {
    cell.map(normalize_cell_value).unwrap_or_default()
}

/// Lowercased cell text with everything but word characters and spaces
/// removed. Only used to compare header labels.
pub fn normalize_header(s: &str) -> String {
    let lowered = normalize_cell_value(s).to_lowercase();
    let stripped = NON_WORD_RE.replace_all(&lowered, "");
    collapse_whitespace(&stripped)
}

/// Join key between order designs and mapping designs.
///
/// Punctuation is preserved: `"AB-12"` and `"ab-12"` match, `"AB-12"` and
/// `"AB 12"` do not.
pub fn normalize_design_code(s: &str) -> String {
    normalize_cell_value(s).to_lowercase()
}

/// Collapses every run of `-`, `_`, `/` and whitespace into a single `-`.
pub fn fold_design_separators(key: &str) -> String {
    SEPARATOR_RUN_RE.replace_all(key, "-").into_owned()
}

/// Design key with the configured opt-in stages applied.
pub fn design_key(s: &str, options: &DesignKeyOptions) -> String {
    let key = normalize_design_code(s);
    if options.fold_separators {
        fold_design_separators(&key)
    } else {
        key
    }
}

/// True for bare numeric ratios such as `"3+1"` or `"2/3"`.
pub fn is_numeric_ratio(s: &str) -> bool {
    let trimmed = s.trim();
    !trimmed.is_empty() && NUMERIC_RATIO_RE.is_match(trimmed)
}
