//! Upload facade: format check, decoding and parsing for one uploaded file.

use karigar_types::{
    DecodedSheet, EnrichmentOutput, MappingResolution, OrderParseOutput, ParsedMappingWorkbook,
    ParsedOrder,
};
use tracing::instrument;

use crate::config::{IngestConfig, SheetScanMode};
use crate::decode::{
    Decoders, FileFormat, SheetSelection, UploadKind, decode_csv, pages_to_sheet,
};
use crate::enrich::enrich;
use crate::error::{IngestError, IngestResult};
use crate::mapping::resolve_workbook;
use crate::orders::parse_order_sheet;

/// One uploaded file.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub mime_type: Option<String>,
    /// Workbook sheet to read orders from instead of the first one
    pub sheet: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            sheet: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    fn format(&self, kind: UploadKind) -> IngestResult<FileFormat> {
        kind.check(&self.file_name, self.mime_type.as_deref())
    }
}

/// Entry point for parsing uploads. Holds no per-upload state, so one
/// instance can serve concurrent uploads.
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    pub decoders: Decoders,
    pub config: IngestConfig,
}

impl Ingestor {
    pub fn new(decoders: Decoders, config: IngestConfig) -> Self {
        Self { decoders, config }
    }

    /// Ingestor with the calamine and lopdf decoders.
    #[cfg(feature = "native-decoders")]
    pub fn native(config: IngestConfig) -> Self {
        Self::new(Decoders::native(), config)
    }

    /// Parses an order upload: a CSV file, or one sheet of a workbook (the
    /// first unless [`Upload::with_sheet`] names another).
    #[instrument(skip(self, upload), fields(file = %upload.file_name), level = "debug")]
    pub async fn parse_orders(&self, upload: Upload) -> IngestResult<OrderParseOutput> {
        let format = upload.format(UploadKind::Orders)?;

        let sheet = match format {
            FileFormat::Csv => decode_csv(&upload.file_name, &upload.bytes)?,
            _ => {
                let selection = match upload.sheet {
                    Some(name) => SheetSelection::Named(name),
                    None => SheetSelection::First,
                };
                self.decoders
                    .spreadsheet()?
                    .decode(&upload.file_name, upload.bytes, selection)
                    .await?
                    .into_iter()
                    .next()
                    .ok_or_else(|| IngestError::empty(&upload.file_name))?
            }
        };

        let output = parse_order_sheet(&sheet, &self.config.orders)?;
        tracing::info!(
            file = %upload.file_name,
            orders = output.orders.len(),
            warnings = output.warnings.len(),
            "parsed order upload"
        );
        Ok(output)
    }

    /// Parses a mapping upload: every sheet of a workbook, or the single
    /// pseudo-sheet of a PDF or CSV file.
    #[instrument(skip(self, upload), fields(file = %upload.file_name), level = "debug")]
    pub async fn parse_mapping(&self, upload: Upload) -> IngestResult<MappingResolution> {
        let format = upload.format(UploadKind::Mapping)?;

        let sheets: Vec<DecodedSheet> = match format {
            FileFormat::Excel => {
                self.decoders
                    .spreadsheet()?
                    .decode(&upload.file_name, upload.bytes, SheetSelection::All)
                    .await?
            }
            FileFormat::Pdf => {
                let pages = self
                    .decoders
                    .pdf()?
                    .page_texts(&upload.file_name, upload.bytes)
                    .await?;
                vec![pages_to_sheet(&pages)]
            }
            FileFormat::Csv => vec![decode_csv(&upload.file_name, &upload.bytes)?],
        };
        if sheets.iter().all(DecodedSheet::is_empty) {
            return Err(IngestError::empty(&upload.file_name));
        }

        // A PDF or CSV file is a single unnamed table, never subject to
        // sheet-name priority filtering.
        let mut mapping_cfg = self.config.mapping.clone();
        if format != FileFormat::Excel {
            mapping_cfg.sheet_scan_mode = SheetScanMode::AllSheets;
        }

        let resolution = resolve_workbook(&sheets, &mapping_cfg, &self.config.design_keys)?;
        tracing::info!(
            file = %upload.file_name,
            sheets = resolution.workbook.sheets.len(),
            entries = resolution.workbook.entry_count(),
            skipped = resolution.failed_sheets().count(),
            "parsed mapping upload"
        );
        Ok(resolution)
    }

    pub fn enrich(
        &self,
        workbook: &ParsedMappingWorkbook,
        orders: &[ParsedOrder],
    ) -> EnrichmentOutput {
        enrich(workbook, orders, &self.config)
    }
}
