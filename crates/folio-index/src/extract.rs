//! Turning files into records.
//!
//! Rich formats (PDF, Office, OCR) are extracted by external tools that
//! implement [`TextExtractor`]. The built-in [`PlainTextExtractor`] reads
//! UTF-8 text and treats form feeds, as emitted by `pdftotext`, as page breaks.

use std::{fs, path::Path, time::SystemTime};

use folio_config::IndexSettings;

use crate::{IndexError, record::DocumentRecord};

/// Page separator in extracted text.
const FORM_FEED: char = '\x0c';

/// Produces [`DocumentRecord`]s from source files.
pub trait TextExtractor {
    /// Whether this extractor can read `path`.
    fn supports(&self, path: &Path) -> bool;

    /// Extracts `path` into a record with the given id.
    fn extract(&self, path: &Path, id: &str) -> Result<DocumentRecord, IndexError>;
}

/// Reads UTF-8 text files by extension.
#[derive(Debug, Clone)]
pub struct PlainTextExtractor {
    /// Lowercase extensions without the dot.
    extensions: Vec<String>,
}

impl PlainTextExtractor {
    /// Creates an extractor for the given extensions.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new(IndexSettings::default().extensions)
    }
}

impl TextExtractor for PlainTextExtractor {
    fn supports(&self, path: &Path) -> bool {
        extension(path).is_some_and(|ext| self.extensions.contains(&ext))
    }

    fn extract(&self, path: &Path, id: &str) -> Result<DocumentRecord, IndexError> {
        let bytes = fs::read(path)?;
        let metadata = fs::metadata(path)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| IndexError::malformed(id, format!("not valid UTF-8: {e}")))?;

        let mut record = DocumentRecord::new(id, path.to_string_lossy(), String::new());
        record.file_size = metadata.len();
        record.last_modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        record.content_type = content_type(path).to_string();

        if let Some(ext) = extension(path) {
            record.metadata.insert("extension".into(), ext);
        }
        if let Some(parent) = path.parent().and_then(Path::file_name) {
            record
                .metadata
                .insert("directory".into(), parent.to_string_lossy().into_owned());
        }

        if text.contains(FORM_FEED) {
            let mut pages: Vec<String> = text.split(FORM_FEED).map(str::to_string).collect();
            if pages.last().is_some_and(|p| p.trim().is_empty()) {
                pages.pop();
            }
            record.content = text.replace(FORM_FEED, "\n");
            record.page_contents = Some(pages);
        } else {
            record.content = text;
        }

        Ok(record)
    }
}

/// Lowercase extension of `path`.
fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

/// MIME-like type guessed from the extension.
fn content_type(path: &Path) -> &'static str {
    match extension(path).as_deref() {
        Some("md" | "markdown") => "text/markdown",
        Some("csv") => "text/csv",
        Some("rst") => "text/x-rst",
        _ => "text/plain",
    }
}
