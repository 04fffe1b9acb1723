//! Error types for ingestion.
//!
//! Every `Display` text is written for direct display to the person who
//! uploaded the file: it names what was expected and what was found.

use thiserror::Error;

pub type IngestResult<T> = Result<T, IngestError>;

/// Coarse failure categories, for callers that branch on the kind of failure
/// rather than on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedFormat,
    EmptyDocument,
    HeaderNotFound,
    NoValidRows,
    DecoderUnavailable,
    Decode,
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Unsupported file format for \"{file_name}\": {detail}")]
    UnsupportedFormat { file_name: String, detail: String },

    #[error("\"{source_name}\" contains no rows")]
    EmptyDocument { source_name: String },

    #[error(
        "Could not find required column(s): {}. Detected headers: {}",
        .missing.join(", "),
        display_headers(.detected_headers)
    )]
    HeaderNotFound {
        missing: Vec<String>,
        detected_headers: Vec<String>,
    },

    #[error("{0}")]
    NoValidRows(String),

    /// No sheet of a mapping workbook produced a single entry.
    #[error(
        "No mapping data found in any sheet. {} Each mapping sheet needs {required_columns} columns.",
        .sheet_errors.join(" ")
    )]
    NoMappingSheets {
        sheet_errors: Vec<String>,
        required_columns: String,
    },

    #[error("The {decoder} reader is not available yet. Please retry the upload in a moment.")]
    DecoderUnavailable { decoder: &'static str },

    #[error("Could not read \"{source_name}\": {message}")]
    Decode {
        source_name: String,
        message: String,
    },
}

fn display_headers(headers: &[String]) -> String {
    if headers.is_empty() {
        "(none)".to_string()
    } else {
        headers.join(", ")
    }
}

impl IngestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            IngestError::EmptyDocument { .. } => ErrorKind::EmptyDocument,
            IngestError::HeaderNotFound { .. } => ErrorKind::HeaderNotFound,
            IngestError::NoValidRows(_) | IngestError::NoMappingSheets { .. } => {
                ErrorKind::NoValidRows
            }
            IngestError::DecoderUnavailable { .. } => ErrorKind::DecoderUnavailable,
            IngestError::Decode { .. } => ErrorKind::Decode,
        }
    }

    pub fn unsupported(file_name: impl Into<String>, detail: impl Into<String>) -> Self {
        IngestError::UnsupportedFormat {
            file_name: file_name.into(),
            detail: detail.into(),
        }
    }

    pub fn empty(source_name: impl Into<String>) -> Self {
        IngestError::EmptyDocument {
            source_name: source_name.into(),
        }
    }

    pub fn decode(source_name: impl Into<String>, message: impl std::fmt::Display) -> Self {
        IngestError::Decode {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }
}
