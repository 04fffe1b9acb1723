//! Karigar mapping workbooks: per-sheet parsing, workbook resolution and
//! rehydration of persisted workbooks.

pub mod persisted;
pub mod sheet;
pub mod workbook;

pub use persisted::rehydrate_workbook;
pub use sheet::{mapping_header_profile, parse_mapping_sheet, required_columns_text};
pub use workbook::{resolve_workbook, sheet_read_order};
