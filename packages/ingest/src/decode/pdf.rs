use karigar_types::{DecodedSheet, RawRow};

/// Name of the single pseudo-sheet built from a PDF's text.
pub const PDF_SHEET_NAME: &str = "PDF";

use crate::aliases::LogicalField;
use crate::matcher::equals_header_alias;
use crate::normalize::normalize_header;

/// Words that may trail a column name in a header ("Karigar Name").
const HEADER_QUALIFIERS: &[&str] = &["name", "code", "no", "number", "id"];

/// A line needs this many mapping column names to count as a header.
const MIN_HEADER_HITS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Split {
    Delimited,
    Wide,
    Words,
}

fn split_line(line: &str) -> (Split, Vec<String>) {
    let (split, cells): (Split, Vec<&str>) = if line.contains(['\t', '|', ';']) {
        (Split::Delimited, line.split(['\t', '|', ';']).collect())
    } else if line.contains("  ") {
        (Split::Wide, line.split("  ").collect())
    } else {
        (Split::Words, line.split_whitespace().collect())
    };

    let cells = cells
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    (split, cells)
}

/// Splits one line of extracted PDF text into cells.
///
/// Tabs, pipes and semicolons are explicit delimiters. Without any of them
/// columns are taken to be separated by runs of two or more spaces, and
/// failing that by single whitespace.
pub fn split_pdf_line(line: &str) -> Vec<String> {
    split_line(line).1
}

fn is_mapping_alias(text: &str) -> bool {
    LogicalField::MAPPING_FIELDS
        .iter()
        .any(|field| equals_header_alias(text, field.aliases()))
}

/// Rejoins header phrases that single-space splitting broke apart, such as
/// `"Design" "Code"` or `"Karigar" "Name"`. Returns the cells and how many of
/// them name a mapping column.
fn merge_header_phrases(words: &[String]) -> (Vec<String>, usize) {
    let mut cells = Vec::with_capacity(words.len());
    let mut hits = 0;
    let mut words = words.iter().peekable();

    while let Some(word) = words.next() {
        let phrase = words.peek().and_then(|next| {
            let phrase = format!("{word} {next}");
            let qualified = is_mapping_alias(word)
                && HEADER_QUALIFIERS.contains(&normalize_header(next.as_str()).as_str());
            (qualified || is_mapping_alias(&phrase)).then_some(phrase)
        });
        match phrase {
            Some(phrase) => {
                words.next();
                hits += 1;
                cells.push(phrase);
            }
            None => {
                if is_mapping_alias(word) {
                    hits += 1;
                }
                cells.push(word.clone());
            }
        }
    }

    (cells, hits)
}

/// Builds a pseudo-sheet from page texts: one row per non-blank line.
///
/// Once a header line is seen, single-spaced lines whose word count differs
/// from the header's width are dropped, as their words cannot be assigned to
/// columns.
pub fn pages_to_sheet<S: AsRef<str>>(pages: &[S]) -> DecodedSheet {
    let mut rows: Vec<RawRow> = Vec::new();
    let mut width: Option<usize> = None;
    let mut skipped = 0usize;

    for line in pages.iter().flat_map(|page| page.as_ref().lines()) {
        let (split, cells) = split_line(line);
        if cells.is_empty() {
            continue;
        }

        let (cells, hits) = match split {
            Split::Words => merge_header_phrases(&cells),
            Split::Delimited | Split::Wide => {
                let hits = cells.iter().filter(|c| is_mapping_alias(c)).count();
                (cells, hits)
            }
        };

        if hits >= MIN_HEADER_HITS {
            width = Some(cells.len());
        } else if split == Split::Words && width.is_some_and(|w| w != cells.len()) {
            skipped += 1;
            continue;
        }

        rows.push(cells.into_iter().map(Some).collect());
    }

    if skipped > 0 {
        tracing::warn!(
            skipped,
            width = ?width,
            "dropped single-spaced pdf lines that do not line up with the header"
        );
    }

    DecodedSheet::new(PDF_SHEET_NAME, rows)
}

#[cfg(feature = "native-decoders")]
mod native {
    use async_trait::async_trait;
    use lopdf::Document;

    use crate::decode::PdfTextDecoder;
    use crate::error::{IngestError, IngestResult};

    /// Page text extraction with lopdf.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LopdfTextDecoder;

    #[async_trait]
    impl PdfTextDecoder for LopdfTextDecoder {
        async fn page_texts(&self, name: &str, bytes: Vec<u8>) -> IngestResult<Vec<String>> {
            let source = name.to_string();
            tokio::task::spawn_blocking(move || extract_pages(&source, &bytes))
                .await
                .map_err(|e| IngestError::decode(name, e))?
        }
    }

    fn extract_pages(name: &str, bytes: &[u8]) -> IngestResult<Vec<String>> {
        let doc = Document::load_mem(bytes).map_err(|e| IngestError::decode(name, e))?;
        let mut pages = Vec::new();
        for page_no in doc.get_pages().keys() {
            match doc.extract_text(&[*page_no]) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    tracing::warn!(name, page = page_no, error = %e, "skipping unreadable pdf page");
                }
            }
        }
        tracing::debug!(name, pages = pages.len(), "extracted pdf text");
        Ok(pages)
    }
}

#[cfg(feature = "native-decoders")]
pub use native::LopdfTextDecoder;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_delimiters_win() {
        assert_eq!(
            split_pdf_line("Design Code | Karigar Name  | Generic Name"),
            vec!["Design Code", "Karigar Name", "Generic Name"]
        );
        assert_eq!(split_pdf_line("AB-12\tRamesh\tRing"), vec!["AB-12", "Ramesh", "Ring"]);
        assert_eq!(split_pdf_line("AB-12;;Ramesh"), vec!["AB-12", "Ramesh"]);
    }

    #[test]
    fn wide_gaps_keep_multi_word_cells() {
        assert_eq!(
            split_pdf_line("Design Code    Karigar Name   Generic Name"),
            vec!["Design Code", "Karigar Name", "Generic Name"]
        );
    }

    #[test]
    fn single_spaces_split_every_word() {
        assert_eq!(split_pdf_line("AB-12 Ramesh Ring"), vec!["AB-12", "Ramesh", "Ring"]);
    }

    #[test]
    fn pages_become_one_sheet() {
        let pages = [
            "Master Design List\n\nDesign Code  Karigar Name  Generic Name\n",
            "AB-12  Ramesh  Gold Ring\n   \nCD-9  Suresh  Chain",
        ];
        let sheet = pages_to_sheet(&pages);
        assert_eq!(sheet.name, PDF_SHEET_NAME);
        assert_eq!(sheet.rows.len(), 4);
        assert_eq!(sheet.rows[0], vec![Some("Master".into()), Some("Design".into()), Some("List".into())]);
        assert_eq!(sheet.rows[2][2].as_deref(), Some("Gold Ring"));
    }

    #[test]
    fn single_spaced_header_phrases_are_rejoined() {
        let pages = ["Design Code Karigar Name Generic Name\nAB-12 Ramesh Ring"];
        let sheet = pages_to_sheet(&pages);
        assert_eq!(
            sheet.rows[0],
            vec![
                Some("Design Code".into()),
                Some("Karigar Name".into()),
                Some("Generic Name".into())
            ]
        );
        assert_eq!(sheet.rows[1][1].as_deref(), Some("Ramesh"));
    }

    #[test]
    fn misaligned_single_spaced_rows_are_dropped() {
        let pages = [
            "Design Code Karigar Name Generic Name",
            "AB-12 Ramesh Ring\nCD-9 Suresh Gold Chain\nEF-3  Mohan  Gold Chain",
        ];
        let sheet = pages_to_sheet(&pages);
        let designs: Vec<_> = sheet.rows.iter().map(|r| r[0].as_deref()).collect();
        assert_eq!(designs, vec![Some("Design Code"), Some("AB-12"), Some("EF-3")]);
        assert_eq!(sheet.rows[2][2].as_deref(), Some("Gold Chain"));
    }

    #[test]
    fn title_lines_before_the_header_are_kept_whole() {
        let sheet = pages_to_sheet(&["Master Design List 2024", "Design Karigar Name"]);
        assert_eq!(sheet.rows[0].len(), 4);
        assert_eq!(
            sheet.rows[1],
            vec![Some("Design".into()), Some("Karigar Name".into())]
        );
    }
}
