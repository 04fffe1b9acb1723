//! Decoder capabilities.
//!
//! Spreadsheet and PDF decoding are injected through [`Decoders`] so the
//! parsers only ever see [`DecodedSheet`] grids. CSV is always decoded
//! in-process.

use std::sync::Arc;

use async_trait::async_trait;
use karigar_types::DecodedSheet;

use crate::error::{IngestError, IngestResult};

pub mod csv_sheet;
pub mod format;
pub mod pdf;
#[cfg(feature = "native-decoders")]
pub mod spreadsheet;

pub use csv_sheet::decode_csv;
pub use format::{FileFormat, UploadKind};
pub use pdf::{PDF_SHEET_NAME, pages_to_sheet, split_pdf_line};
#[cfg(feature = "native-decoders")]
pub use pdf::LopdfTextDecoder;
#[cfg(feature = "native-decoders")]
pub use spreadsheet::CalamineDecoder;

/// Which sheets of a workbook to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelection {
    First,
    Named(String),
    All,
}

#[async_trait]
pub trait SpreadsheetDecoder: Send + Sync {
    /// Decodes `bytes` into sheets, in workbook order. `name` is only used in
    /// error messages.
    async fn decode(
        &self,
        name: &str,
        bytes: Vec<u8>,
        selection: SheetSelection,
    ) -> IngestResult<Vec<DecodedSheet>>;
}

#[async_trait]
pub trait PdfTextDecoder: Send + Sync {
    /// Extracted text of every page, in page order.
    async fn page_texts(&self, name: &str, bytes: Vec<u8>) -> IngestResult<Vec<String>>;
}

#[derive(Clone, Default)]
pub struct Decoders {
    pub spreadsheet: Option<Arc<dyn SpreadsheetDecoder>>,
    pub pdf: Option<Arc<dyn PdfTextDecoder>>,
}

impl std::fmt::Debug for Decoders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoders")
            .field("spreadsheet", &self.spreadsheet.is_some())
            .field("pdf", &self.pdf.is_some())
            .finish()
    }
}

impl Decoders {
    /// calamine for workbooks, lopdf for PDF text.
    #[cfg(feature = "native-decoders")]
    pub fn native() -> Self {
        Self {
            spreadsheet: Some(Arc::new(CalamineDecoder)),
            pdf: Some(Arc::new(LopdfTextDecoder)),
        }
    }

    pub fn with_spreadsheet(mut self, decoder: Arc<dyn SpreadsheetDecoder>) -> Self {
        self.spreadsheet = Some(decoder);
        self
    }

    pub fn with_pdf(mut self, decoder: Arc<dyn PdfTextDecoder>) -> Self {
        self.pdf = Some(decoder);
        self
    }

    pub fn spreadsheet(&self) -> IngestResult<&Arc<dyn SpreadsheetDecoder>> {
        self.spreadsheet
            .as_ref()
            .ok_or(IngestError::DecoderUnavailable {
                decoder: "spreadsheet",
            })
    }

    pub fn pdf(&self) -> IngestResult<&Arc<dyn PdfTextDecoder>> {
        self.pdf
            .as_ref()
            .ok_or(IngestError::DecoderUnavailable { decoder: "PDF" })
    }
}
