//! Ingestion engine for jewellery order sheets and karigar design mappings.
//!
//! Uploaded spreadsheets are decoded into raw grids, the real header row is
//! located among title and notes rows, header spellings are matched against
//! known aliases and the rows are turned into [`ParsedOrder`]s or
//! [`KarigarMappingEntry`]s. A mapping workbook is then flattened into a
//! priority-ordered lookup used to attach a karigar and generic name to
//! every order.
//!
//! [`ParsedOrder`]: karigar_types::ParsedOrder
//! [`KarigarMappingEntry`]: karigar_types::KarigarMappingEntry

pub mod aliases;
pub mod config;
pub mod decode;
pub mod enrich;
pub mod error;
pub mod header;
pub mod mapping;
pub mod matcher;
pub mod normalize;
pub mod orders;
pub mod upload;

pub use config::{
    DesignKeyOptions, IngestConfig, MappingColumns, MappingParseConfig, OrderParseConfig,
    SheetScanMode,
};
pub use decode::{Decoders, FileFormat, PdfTextDecoder, SheetSelection, SpreadsheetDecoder};
pub use enrich::{build_lookup, enrich, enrich_orders, group_by_karigar};
pub use error::{ErrorKind, IngestError, IngestResult};
pub use mapping::{parse_mapping_sheet, rehydrate_workbook, resolve_workbook};
pub use normalize::{design_key, normalize_cell_value, normalize_header};
pub use orders::parse_order_sheet;
pub use upload::{Ingestor, Upload};

pub use karigar_types as types;
