//! Header/column matching against alias lists.

use crate::normalize::normalize_header;

/// True when the normalized header equals, or contains, any normalized alias.
///
/// Containment lets decorated headers such as `"Remark's (optional)"` match
/// the alias `"remark"`.
pub fn matches_header_alias(header: &str, aliases: &[&str]) -> bool {
    let header = normalize_header(header);
    if header.is_empty() {
        return false;
    }
    aliases.iter().any(|alias| {
        let alias = normalize_header(alias);
        !alias.is_empty() && header.contains(alias.as_str())
    })
}

/// True when the normalized header equals one of the aliases exactly.
pub fn equals_header_alias(header: &str, aliases: &[&str]) -> bool {
    let header = normalize_header(header);
    !header.is_empty() && aliases.iter().any(|alias| normalize_header(alias) == header)
}

/// Index of the first cell in `row` matching any alias. Ambiguous rows resolve
/// to the first match.
pub fn find_column_index<S: AsRef<str>>(row: &[Option<S>], aliases: &[&str]) -> Option<usize> {
    row.iter().position(|cell| {
        cell.as_ref()
            .is_some_and(|text| matches_header_alias(text.as_ref(), aliases))
    })
}
