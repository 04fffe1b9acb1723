use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, IngestResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    Csv,
    Excel,
    Pdf,
}

impl FileFormat {
    /// Extension first, then MIME type. `None` when neither is recognized.
    pub fn detect(file_name: &str, mime_type: Option<&str>) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("csv") => return Some(FileFormat::Csv),
            Some("xlsx" | "xlsm" | "xls" | "ods") => return Some(FileFormat::Excel),
            Some("pdf") => return Some(FileFormat::Pdf),
            _ => {}
        }

        let mime = mime_type?.split(';').next()?.trim().to_ascii_lowercase();
        match mime.as_str() {
            "text/csv" | "application/csv" => Some(FileFormat::Csv),
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.oasis.opendocument.spreadsheet" => Some(FileFormat::Excel),
            "application/pdf" => Some(FileFormat::Pdf),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileFormat::Csv => "CSV",
            FileFormat::Excel => "Excel",
            FileFormat::Pdf => "PDF",
        }
    }
}

/// What an upload is meant to be, which decides the formats it may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Orders,
    Mapping,
}

impl UploadKind {
    pub fn accepted_formats(self) -> &'static [FileFormat] {
        match self {
            UploadKind::Orders => &[FileFormat::Csv, FileFormat::Excel],
            UploadKind::Mapping => &[FileFormat::Excel, FileFormat::Pdf, FileFormat::Csv],
        }
    }

    /// Detects the format and rejects it early when this kind of upload does
    /// not accept it.
    pub fn check(self, file_name: &str, mime_type: Option<&str>) -> IngestResult<FileFormat> {
        let accepted = self.accepted_formats();
        let expected = accepted
            .iter()
            .map(|f| f.label())
            .collect::<Vec<_>>()
            .join(", ");

        match FileFormat::detect(file_name, mime_type) {
            Some(format) if accepted.contains(&format) => Ok(format),
            Some(format) => Err(IngestError::unsupported(
                file_name,
                format!("{} files are not accepted here; expected {expected}", format.label()),
            )),
            None => Err(IngestError::unsupported(
                file_name,
                format!("expected {expected}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn detects_by_extension_case_insensitively() {
        assert_eq!(FileFormat::detect("orders.CSV", None), Some(FileFormat::Csv));
        assert_eq!(FileFormat::detect("a.b.xlsx", None), Some(FileFormat::Excel));
        assert_eq!(FileFormat::detect("old.xls", None), Some(FileFormat::Excel));
        assert_eq!(FileFormat::detect("map.pdf", None), Some(FileFormat::Pdf));
    }

    #[test]
    fn extension_wins_over_mime() {
        assert_eq!(
            FileFormat::detect("orders.csv", Some("application/pdf")),
            Some(FileFormat::Csv)
        );
    }

    #[test]
    fn falls_back_to_mime() {
        assert_eq!(
            FileFormat::detect("upload", Some("text/csv; charset=utf-8")),
            Some(FileFormat::Csv)
        );
        assert_eq!(
            FileFormat::detect(
                "blob.bin",
                Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
            ),
            Some(FileFormat::Excel)
        );
        assert_eq!(FileFormat::detect("notes.txt", Some("text/plain")), None);
        assert_eq!(FileFormat::detect("notes.txt", None), None);
    }

    #[test]
    fn orders_reject_pdf_before_decoding() {
        let err = UploadKind::Orders.check("orders.pdf", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert!(err.to_string().contains("orders.pdf"));
        assert_eq!(
            UploadKind::Mapping.check("map.pdf", None).unwrap(),
            FileFormat::Pdf
        );
    }

    #[test]
    fn unknown_format_is_unsupported() {
        let err = UploadKind::Mapping.check("photo.png", Some("image/png")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert!(err.to_string().contains("expected Excel, PDF, CSV"));
    }
}
