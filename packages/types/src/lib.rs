//! Plain data types produced and consumed by the ingestion pipeline.
//!
//! Nothing in here holds a file handle or a decoder object; every value is
//! serializable so it can be handed to storage or a UI as-is.

pub mod enrich;
pub mod grid;
pub mod mapping;
pub mod order;

pub use enrich::{
    EnrichedOrder, EnrichmentDiagnostics, EnrichmentOutput, LookupValue, MappingLookup,
    NoMatchSamples, UNMAPPED_LABEL,
};
pub use grid::{DecodedSheet, RawGrid, RawRow};
pub use mapping::{
    KarigarMappingEntry, MappingResolution, MappingSheet, MappingSheetResult, MappingSheetSummary,
    ParsedMappingWorkbook,
};
pub use order::{OrderParseOutput, ParseWarning, ParsedOrder};
