use karigar_types::{DecodedSheet, RawRow};

use crate::error::{IngestError, IngestResult};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes CSV bytes into a single sheet named after the file.
///
/// Rows may have differing lengths. Invalid UTF-8 is replaced rather than
/// rejected and rows with no non-blank cell are dropped.
pub fn decode_csv(name: &str, bytes: &[u8]) -> IngestResult<DecodedSheet> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|e| IngestError::decode(name, e))?;
        let row: RawRow = record
            .iter()
            .map(|field| {
                let text = String::from_utf8_lossy(field);
                (!text.trim().is_empty()).then(|| text.into_owned())
            })
            .collect();
        if row.iter().any(Option::is_some) {
            rows.push(row);
        }
    }

    tracing::debug!(name, rows = rows.len(), "decoded csv");
    Ok(DecodedSheet::new(name, rows))
}
