//! zmark - reader/writer for nested tag-structured markup documents
//!
//! The reader buffers the whole document and parses it with a hand-rolled
//! scoped scanner: one balanced tag span at a time, a depth stack for
//! matching nested same-named closing tags, and round-trip-safe entity
//! escaping. The writer walks the tree back out deterministically under a
//! [`FormatConfig`].
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), zmark::Error> {
//! let doc = zmark::parse_document("<?xml version=\"1.0\"?><greeting lang=\"en\">hi</greeting>")?;
//! assert_eq!(doc.root.name(), "greeting");
//! assert_eq!(doc.root.attribute("lang"), Some("en"));
//! assert_eq!(doc.root.value(), Some("hi".to_string()));
//!
//! let text = zmark::write_document(&doc, &zmark::FormatConfig::compact());
//! assert!(text.starts_with("<?xml"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Category, Error, ErrorKind, Pos, Result, Span};

pub mod scanner;
pub use scanner::Scanner;

pub mod escape;
pub use escape::{escape, unescape};

pub mod input;

pub mod model;
pub use model::{AttributeValue, Attributes, Declaration, Document, Node, SUPPORTED_ENCODINGS};

pub mod config;
pub use config::{ErrorPolicy, FormatConfig};

mod attributes;

pub mod reader;
pub use reader::DocumentReader;

pub mod writer;
pub use writer::{write_node, DocumentWriter};

/// Parse a document from text with the default configuration
pub fn parse_document(text: &str) -> Result<Document> {
    let config = FormatConfig::default();
    let mut reader = DocumentReader::new(text, &config);
    reader.parse()
}

/// Parse a document from text with a custom configuration
pub fn parse_document_with_config(text: &str, config: &FormatConfig) -> Result<Document> {
    let mut reader = DocumentReader::new(text, config);
    reader.parse()
}

/// Parse a document from bytes, decoded up front with the configured charset
pub fn parse_document_bytes(bytes: &[u8], config: &FormatConfig) -> Result<Document> {
    let text = input::decode(bytes, &config.charset)?;
    let mut reader = DocumentReader::new(&text, config);
    reader.parse()
}

/// Serialize a document with a custom configuration
pub fn write_document(doc: &Document, config: &FormatConfig) -> String {
    writer::write_document(doc, config)
}

/// Serialize a document into an `io::Write` sink, flushing on close
pub fn write_document_to<W: std::io::Write>(
    doc: &Document,
    sink: W,
    config: &FormatConfig,
) -> Result<()> {
    let mut writer = DocumentWriter::new(sink, config.clone());
    writer.write_document(doc)?;
    writer.close()
}
