use std::io::Cursor;

use async_trait::async_trait;
use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use karigar_types::{DecodedSheet, RawRow};

use crate::decode::{SheetSelection, SpreadsheetDecoder};
use crate::error::{IngestError, IngestResult};

/// Workbook decoding with calamine (xlsx, xlsm, xls, ods).
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineDecoder;

#[async_trait]
impl SpreadsheetDecoder for CalamineDecoder {
    async fn decode(
        &self,
        name: &str,
        bytes: Vec<u8>,
        selection: SheetSelection,
    ) -> IngestResult<Vec<DecodedSheet>> {
        let source = name.to_string();
        tokio::task::spawn_blocking(move || read_workbook(&source, bytes, &selection))
            .await
            .map_err(|e| IngestError::decode(name, e))?
    }
}

fn read_workbook(
    name: &str,
    bytes: Vec<u8>,
    selection: &SheetSelection,
) -> IngestResult<Vec<DecodedSheet>> {
    let mut wb =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| IngestError::decode(name, e))?;

    let all = wb.sheet_names();
    let wanted: Vec<String> = match selection {
        SheetSelection::All => all,
        SheetSelection::First => all.into_iter().take(1).collect(),
        SheetSelection::Named(sheet) => {
            if !all.iter().any(|n| n == sheet) {
                return Err(IngestError::decode(
                    name,
                    format!("sheet \"{sheet}\" not found"),
                ));
            }
            vec![sheet.clone()]
        }
    };

    let mut sheets = Vec::with_capacity(wanted.len());
    for sheet_name in wanted {
        let range = wb
            .worksheet_range(&sheet_name)
            .map_err(|e| IngestError::decode(name, format!("sheet \"{sheet_name}\": {e}")))?;
        let rows = range_to_rows(&range);
        tracing::debug!(workbook = name, sheet = %sheet_name, rows = rows.len(), "decoded sheet");
        sheets.push(DecodedSheet::new(sheet_name, rows));
    }
    Ok(sheets)
}

/// Converts a calamine range into raw rows, dropping rows with no content.
pub(crate) fn range_to_rows(range: &Range<Data>) -> Vec<RawRow> {
    range
        .rows()
        .map(|row| row.iter().map(data_to_cell).collect::<RawRow>())
        .filter(|row| row.iter().any(Option::is_some))
        .collect()
}

fn data_to_cell(v: &Data) -> Option<String> {
    let text = data_to_string(v);
    (!text.trim().is_empty()).then_some(text)
}

fn data_to_string(v: &Data) -> String {
    match v {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() <= 9_007_199_254_740_992.0 {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => {
                let text = ndt.to_string();
                text.strip_suffix(" 00:00:00").map(str::to_string).unwrap_or(text)
            }
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        // Formula errors carry no usable value
        Data::Error(_) => String::new(),
    }
}
