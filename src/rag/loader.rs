//! Document loading.
//!
//! Turns a file on disk into [`DocumentSegment`]s. The extension selects a
//! [`DocumentFormat`] through [`DocumentFormat::from_extension`]; each format
//! knows how to extract its own text.

use crate::types::{DocumentSegment, SegmentMetadata};
use calamine::Reader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Errors raised while turning a file into segments.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file extension has no extractor.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The extractor failed (corrupt file, bad encoding, I/O).
    #[error("Failed to load {}: {source}", path.display())]
    LoadFailure {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl LoadError {
    fn failure<E>(path: &Path, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        LoadError::LoadFailure {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

/// The document formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Word,
    Spreadsheet,
    Csv,
    PlainText,
}

/// Extension lookup table. Extensions are matched lowercase.
const FORMATS: &[(&str, DocumentFormat)] = &[
    ("pdf", DocumentFormat::Pdf),
    ("docx", DocumentFormat::Word),
    ("xlsx", DocumentFormat::Spreadsheet),
    ("xls", DocumentFormat::Spreadsheet),
    ("csv", DocumentFormat::Csv),
    ("txt", DocumentFormat::PlainText),
];

impl DocumentFormat {
    /// Look up the format for an extension (case-insensitive, no leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        FORMATS
            .iter()
            .find(|(candidate, _)| *candidate == ext)
            .map(|(_, format)| *format)
    }

    /// All extensions with an extractor.
    pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
        FORMATS.iter().map(|(ext, _)| *ext)
    }

    /// Extract the segments of the file at `path`.
    pub fn load(&self, path: &Path) -> Result<Vec<DocumentSegment>, LoadError> {
        match self {
            DocumentFormat::Pdf => load_pdf(path),
            DocumentFormat::Word => load_docx(path),
            DocumentFormat::Spreadsheet => load_spreadsheet(path),
            DocumentFormat::Csv => load_csv(path),
            DocumentFormat::PlainText => load_text(path),
        }
    }
}

/// Lowercase extension of `path`, or an empty string when it has none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Load a document, dispatching on its extension.
///
/// Segments whose text is blank are dropped. The file is only read.
pub fn load(path: &Path) -> Result<Vec<DocumentSegment>, LoadError> {
    let ext = extension_of(path);
    let format =
        DocumentFormat::from_extension(&ext).ok_or(LoadError::UnsupportedFormat(ext))?;

    let segments: Vec<DocumentSegment> = format
        .load(path)?
        .into_iter()
        .filter(|segment| !segment.text.trim().is_empty())
        .collect();

    debug!(
        path = %path.display(),
        format = ?format,
        segments = segments.len(),
        "Document loaded"
    );

    Ok(segments)
}

fn load_text(path: &Path) -> Result<Vec<DocumentSegment>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::failure(path, e))?;
    Ok(vec![DocumentSegment::new(text, SegmentMetadata::new(path))])
}

fn load_pdf(path: &Path) -> Result<Vec<DocumentSegment>, LoadError> {
    let document = lopdf::Document::load(path).map_err(|e| LoadError::failure(path, e))?;

    let mut segments = Vec::new();
    let mut per_page_failed = false;

    for page_number in document.get_pages().keys() {
        match document.extract_text(&[*page_number]) {
            Ok(text) => segments.push(DocumentSegment::new(
                text,
                SegmentMetadata {
                    page: Some(*page_number),
                    ..SegmentMetadata::new(path)
                },
            )),
            Err(e) => {
                warn!(page = page_number, error = %e, "Per-page PDF extraction failed");
                per_page_failed = true;
                break;
            }
        }
    }

    if per_page_failed {
        // Some encodings only survive whole-document extraction
        let text = pdf_extract::extract_text(path).map_err(|e| LoadError::failure(path, e))?;
        return Ok(vec![DocumentSegment::new(text, SegmentMetadata::new(path))]);
    }

    Ok(segments)
}

fn load_docx(path: &Path) -> Result<Vec<DocumentSegment>, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::failure(path, e))?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| LoadError::failure(path, e.to_string()))?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            docx_rs::DocumentChild::Paragraph(paragraph) => {
                lines.push(paragraph_text(paragraph));
            }
            docx_rs::DocumentChild::Table(table) => {
                for row in &table.rows {
                    lines.push(table_row_text(row));
                }
            }
            _ => {}
        }
    }

    Ok(vec![DocumentSegment::new(
        lines.join("\n"),
        SegmentMetadata::new(path),
    )])
}

#[allow(irrefutable_let_patterns)]
fn table_row_text(row: &docx_rs::TableChild) -> String {
    let mut cells = Vec::new();
    if let docx_rs::TableChild::TableRow(row) = row {
        for cell in &row.cells {
            if let docx_rs::TableRowChild::TableCell(cell) = cell {
                let text = cell
                    .children
                    .iter()
                    .filter_map(|content| match content {
                        docx_rs::TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                cells.push(text);
            }
        }
    }
    cells.join(" | ")
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let docx_rs::RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}

fn load_spreadsheet(path: &Path) -> Result<Vec<DocumentSegment>, LoadError> {
    let mut workbook =
        calamine::open_workbook_auto(path).map_err(|e| LoadError::failure(path, e))?;

    let mut segments = Vec::new();
    for sheet_name in workbook.sheet_names().to_vec() {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| LoadError::failure(path, e))?;

        let rows: Vec<String> = range
            .rows()
            .map(|row| {
                row.iter()
                    .map(cell_text)
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .filter(|line| !line.replace('|', "").trim().is_empty())
            .collect();

        if rows.is_empty() {
            continue;
        }

        segments.push(DocumentSegment::new(
            rows.join("\n"),
            SegmentMetadata {
                sheet: Some(sheet_name),
                ..SegmentMetadata::new(path)
            },
        ));
    }

    Ok(segments)
}

fn cell_text(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        calamine::Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn load_csv(path: &Path) -> Result<Vec<DocumentSegment>, LoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| LoadError::failure(path, e))?;
    let headers = reader
        .headers()
        .map_err(|e| LoadError::failure(path, e))?
        .clone();

    let mut segments = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| LoadError::failure(path, e))?;
        let text = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| format!("{}: {}", header.trim(), value.trim()))
            .collect::<Vec<_>>()
            .join("\n");

        segments.push(DocumentSegment::new(
            text,
            SegmentMetadata {
                row: Some(row),
                ..SegmentMetadata::new(path)
            },
        ));
    }

    Ok(segments)
}
