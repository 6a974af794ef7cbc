//! Document text extraction — PDF and DOCX byte streams to plain text.
//!
//! Every failure mode is classified into a [`DocumentError`]; nothing
//! low-level (zip, xml, pdf parse) propagates past this module. Extracted
//! text is normalized: whitespace collapsed, punctuation outside `@ . -`
//! replaced by spaces. Layout is intentionally discarded.

use std::io::Read;

use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use tracing::debug;

use crate::errors::DocumentError;

/// OLE compound-file magic. An encrypted DOCX is an OLE container rather
/// than a plain zip archive.
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

pub struct DocumentExtractor {
    max_size: usize,
    punctuation: Regex,
    whitespace: Regex,
}

impl DocumentExtractor {
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            punctuation: Regex::new(r"[^\w\s@.-]").expect("hardcoded pattern compiles"),
            whitespace: Regex::new(r"\s+").expect("hardcoded pattern compiles"),
        }
    }

    /// Converts a raw document byte stream into normalized plain text.
    ///
    /// Rejects oversized files and unsupported extensions before any parse
    /// attempt; classifies parse failures as corruption, password
    /// protection, or empty text.
    pub fn extract(&self, filename: &str, content: &Bytes) -> Result<String, DocumentError> {
        if content.len() > self.max_size {
            return Err(DocumentError::TooLarge {
                filename: filename.to_string(),
                limit: self.max_size,
            });
        }

        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let raw = match extension.as_str() {
            "pdf" => self.extract_pdf(filename, content)?,
            "docx" => self.extract_docx(filename, content)?,
            _ => {
                return Err(DocumentError::UnsupportedFormat {
                    extension: format!(".{extension}"),
                })
            }
        };

        if raw.trim().is_empty() {
            return Err(DocumentError::Empty);
        }

        let text = self.clean_text(&raw);
        debug!(filename, chars = text.len(), "extracted document text");
        Ok(text)
    }

    fn extract_pdf(&self, filename: &str, content: &Bytes) -> Result<String, DocumentError> {
        match pdf_extract::extract_text_from_mem(content) {
            Ok(text) => Ok(text),
            Err(e) => {
                let reason = e.to_string();
                if reason.to_lowercase().contains("encrypt") {
                    Err(DocumentError::PasswordProtected)
                } else {
                    Err(DocumentError::Corrupted {
                        filename: filename.to_string(),
                        reason,
                    })
                }
            }
        }
    }

    fn extract_docx(&self, filename: &str, content: &Bytes) -> Result<String, DocumentError> {
        if content.starts_with(OLE_MAGIC) {
            return Err(DocumentError::PasswordProtected);
        }

        let corrupted = |reason: String| DocumentError::Corrupted {
            filename: filename.to_string(),
            reason,
        };

        let cursor = std::io::Cursor::new(content.as_ref());
        let mut archive = zip::ZipArchive::new(cursor).map_err(|e| corrupted(e.to_string()))?;
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| corrupted(e.to_string()))?
            .read_to_string(&mut xml)
            .map_err(|e| corrupted(e.to_string()))?;

        flatten_docx_xml(&xml).map_err(|e| corrupted(e.to_string()))
    }

    /// Collapses whitespace and strips punctuation other than `@ . -`.
    fn clean_text(&self, text: &str) -> String {
        let stripped = self.punctuation.replace_all(text, " ");
        let collapsed = self.whitespace.replace_all(&stripped, " ");
        collapsed.trim().to_string()
    }
}

/// Walks `word/document.xml`, emitting paragraphs as lines and table rows as
/// pipe-joined lines in document order. Row and column order are preserved;
/// a table is otherwise treated like any paragraph run.
fn flatten_docx_xml(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut paragraph = String::new();
    let mut cell = String::new();
    let mut row: Vec<String> = Vec::new();
    let mut table_depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                b"tr" if table_depth == 1 => row.clear(),
                b"tc" if table_depth == 1 => cell.clear(),
                _ => {}
            },
            Event::Text(t) => {
                let text = t.unescape()?;
                if table_depth > 0 {
                    cell.push_str(&text);
                } else {
                    paragraph.push_str(&text);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                b"tc" if table_depth == 1 => row.push(cell.trim().to_string()),
                b"tr" if table_depth == 1 => {
                    out.push_str(&row.join(" | "));
                    out.push('\n');
                }
                b"p" => {
                    if table_depth == 0 {
                        // Trimmed so inter-element whitespace picked up as
                        // text events does not pad the line.
                        out.push_str(paragraph.trim());
                        out.push('\n');
                        paragraph.clear();
                    } else {
                        // Paragraph break inside a table cell.
                        cell.push(' ');
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}
