//! Deterministic tree serialization
//!
//! The writer borrows the tree read-only and appends into its own buffer.
//! Leaf payloads are emitted exactly as stored (escaped form); attribute
//! values are escaped here from their raw form. The model's store-escaped /
//! expose-raw invariant is what keeps this idempotent.

use std::fmt::Write as _;
use std::io::Write;

use tracing::debug;

use crate::config::FormatConfig;
use crate::error::Result;
use crate::model::{Attributes, Document, Node};
use crate::escape;

/// Serialize a full document, declaration included.
pub fn write_document(doc: &Document, config: &FormatConfig) -> String {
    debug!(pretty = config.pretty, "writing document");
    let mut out = String::new();
    write_declaration(&mut out, doc, config);
    write_node_at(&mut out, &doc.root, config, 0, !config.pretty);
    if config.pretty {
        out.push('\n');
    }
    out
}

/// Serialize a single node without a declaration.
pub fn write_node(node: &Node, config: &FormatConfig) -> String {
    let mut out = String::new();
    write_node_at(&mut out, node, config, 0, !config.pretty);
    if config.pretty {
        out.push('\n');
    }
    out
}

fn write_declaration(out: &mut String, doc: &Document, config: &FormatConfig) {
    let decl = &doc.declaration;
    let _ = write!(
        out,
        "<?xml version=\"{}\" encoding=\"{}\"",
        decl.version(),
        decl.encoding()
    );
    if decl.standalone() {
        out.push_str(" standalone=\"yes\"");
    }
    out.push_str("?>");
    if config.pretty {
        out.push('\n');
    }
}

/// Whether a node may legally share a line with its parent's tags.
fn is_inline(node: &Node, config: &FormatConfig) -> bool {
    match node {
        Node::SelfClosing { .. } => true,
        Node::Leaf { .. } => config.simplify_leaves,
        Node::Container { children, .. } => {
            config.inline_child_limit > 0
                && children.len() <= config.inline_child_limit
                && children.iter().all(|child| is_inline(child, config))
        }
    }
}

fn write_node_at(out: &mut String, node: &Node, config: &FormatConfig, depth: usize, inline: bool) {
    match node {
        Node::SelfClosing { name, attributes } => {
            write_open(out, name, attributes);
            out.push_str("/>");
        }
        Node::Leaf {
            name,
            attributes,
            value,
        } => {
            write_open(out, name, attributes);
            out.push('>');
            if inline || config.simplify_leaves {
                out.push_str(value);
            } else {
                out.push('\n');
                push_indent(out, config, depth + 1);
                out.push_str(value);
                out.push('\n');
                push_indent(out, config, depth);
            }
            write_close(out, name);
        }
        Node::Container {
            name,
            attributes,
            children,
        } => {
            write_open(out, name, attributes);
            out.push('>');
            if children.is_empty() {
                write_close(out, name);
                return;
            }
            if inline || is_inline(node, config) {
                for child in children {
                    write_node_at(out, child, config, depth, true);
                }
            } else {
                for child in children {
                    out.push('\n');
                    push_indent(out, config, depth + 1);
                    write_node_at(out, child, config, depth + 1, false);
                }
                out.push('\n');
                push_indent(out, config, depth);
            }
            write_close(out, name);
        }
    }
}

fn write_open(out: &mut String, name: &str, attributes: &Attributes) {
    out.push('<');
    out.push_str(name);
    for (key, value) in attributes {
        let _ = write!(out, " {key}=\"{}\"", escape::escape(value.as_str()));
    }
}

fn write_close(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn push_indent(out: &mut String, config: &FormatConfig, depth: usize) {
    for _ in 0..depth {
        out.push_str(&config.indent);
    }
}

/// Writer over an owned byte sink.
///
/// `close` consumes the writer, flushes, and surfaces any sink failure; a
/// second close is therefore unrepresentable.
#[derive(Debug)]
pub struct DocumentWriter<W: Write> {
    sink: W,
    config: FormatConfig,
}

impl<W: Write> DocumentWriter<W> {
    pub fn new(sink: W, config: FormatConfig) -> Self {
        Self { sink, config }
    }

    pub fn write_document(&mut self, doc: &Document) -> Result<()> {
        let text = write_document(doc, &self.config);
        self.sink.write_all(text.as_bytes())?;
        Ok(())
    }

    pub fn write_node(&mut self, node: &Node) -> Result<()> {
        let text = write_node(node, &self.config);
        self.sink.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Flush and release the sink.
    pub fn close(mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}
