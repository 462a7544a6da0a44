//! Recursive document reader
//!
//! Reads the leading declaration, then the root element. Elements are read
//! by isolating one balanced `<...>` tag span, deciding self-closing vs
//! container vs leaf, and locating the matching closing tag with an explicit
//! depth stack so nested same-named children never capture the outer close.

use tracing::debug;

use crate::attributes::parse_attributes;
use crate::config::{ErrorPolicy, FormatConfig};
use crate::error::{Error, ErrorKind, Pos, Result};
use crate::model::{is_valid_name, Declaration, Document, Node};
use crate::scanner::Scanner;

const DECLARATION_KEYS: [&str; 3] = ["version", "encoding", "standalone"];

/// Reader over one buffered document.
///
/// Not safe for concurrent use; it owns the scanner cursor for the duration
/// of a parse call. Use one reader per parse, or serialize access.
#[derive(Debug)]
pub struct DocumentReader<'a> {
    scanner: Scanner<'a>,
    config: &'a FormatConfig,
    warnings: Vec<Error>,
}

impl<'a> DocumentReader<'a> {
    pub fn new(input: &'a str, config: &'a FormatConfig) -> Self {
        Self {
            scanner: Scanner::new(input),
            config,
            warnings: Vec::new(),
        }
    }

    /// Parse one whole document: declaration, single root, nothing after.
    pub fn parse(&mut self) -> Result<Document> {
        debug!(len = self.scanner.remaining().len(), "parsing document");
        let declaration = self.read_declaration()?;
        let root = self.read_element()?;
        self.finish()?;
        Ok(Document { declaration, root })
    }

    /// Read the leading declaration, or synthesize one when permitted.
    pub fn read_declaration(&mut self) -> Result<Declaration> {
        self.skip_trivia()?;
        if !self.scanner.remaining().starts_with("<?") {
            if self.config.strict {
                let err = Error::at(ErrorKind::MissingDeclaration, self.scanner.position());
                match self.config.error_policy {
                    ErrorPolicy::Fail => return Err(err),
                    ErrorPolicy::Report => self.warnings.push(err),
                }
            }
            return Declaration::new(1, 0, self.config.charset.clone(), false);
        }

        let decl_pos = self.scanner.position();
        let tag = self.scanner.read_scope('<', '>')?;
        self.parse_declaration_tag(tag, decl_pos)
    }

    fn parse_declaration_tag(&mut self, tag: &str, decl_pos: Pos) -> Result<Declaration> {
        let mut s = Scanner::new(tag);
        s.consume('<');
        s.consume('?');
        s.read_expected(&["xml"])?;

        let mut version: Option<(u32, u8)> = None;
        let mut encoding: Option<String> = None;
        let mut standalone: Option<bool> = None;

        loop {
            s.skip_whitespace();
            if s.is_eof() || s.current() == Some('?') || s.current() == Some('>') {
                break;
            }

            let key = match s.read_expected(&DECLARATION_KEYS) {
                Ok(key) => key,
                Err(err) if self.config.error_policy == ErrorPolicy::Report => {
                    // unknown but well-formed pair: report and skip it
                    self.warnings.push(err);
                    skip_unknown_pair(&mut s)?;
                    continue;
                }
                Err(err) => return Err(err),
            };

            s.skip_whitespace();
            if !s.consume('=') {
                return Err(Error::at(
                    ErrorKind::MissingEquals {
                        attribute: key.to_string(),
                    },
                    s.position(),
                ));
            }
            s.skip_whitespace();
            let raw = s.read_quoted_string()?;

            // a declaration is a fixed-shape record, so unlike element
            // attributes a duplicate here is an error
            let duplicate = Error::at(
                ErrorKind::DuplicateDeclarationAttribute {
                    name: key.to_string(),
                },
                s.position(),
            );
            match key {
                "version" => {
                    if version.is_some() {
                        return Err(duplicate);
                    }
                    version = Some(Declaration::parse_version(raw)?);
                }
                "encoding" => {
                    if encoding.is_some() {
                        return Err(duplicate);
                    }
                    encoding = Some(raw.to_string());
                }
                _ => {
                    if standalone.is_some() {
                        return Err(duplicate);
                    }
                    standalone = Some(parse_standalone(raw, s.position())?);
                }
            }
        }

        let (major, minor) =
            version.ok_or_else(|| Error::at(ErrorKind::MissingVersion, decl_pos))?;
        Declaration::new(
            major,
            minor,
            encoding.unwrap_or_else(|| self.config.charset.clone()),
            standalone.unwrap_or(false),
        )
    }

    /// Read the next element. Explicit repeated calls support multi-root
    /// streams; `parse` reads exactly one.
    pub fn read_element(&mut self) -> Result<Node> {
        self.skip_trivia()?;
        read_element(&mut self.scanner, self.config)
    }

    /// Verify nothing but whitespace and comments remains.
    pub fn finish(&mut self) -> Result<()> {
        self.skip_trivia()?;
        if self.scanner.remaining().starts_with("<?") {
            return Err(Error::at(
                ErrorKind::DeclarationAfterContent,
                self.scanner.position(),
            ));
        }
        if !self.scanner.is_eof() {
            return Err(Error::at(ErrorKind::TrailingContent, self.scanner.position()));
        }
        Ok(())
    }

    /// Non-fatal findings collected under `ErrorPolicy::Report`
    pub fn warnings(&self) -> &[Error] {
        &self.warnings
    }

    fn skip_trivia(&mut self) -> Result<()> {
        skip_trivia(&mut self.scanner)
    }
}

fn skip_unknown_pair(s: &mut Scanner<'_>) -> Result<()> {
    s.skip_while(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | ':'));
    s.skip_whitespace();
    if s.consume('=') {
        s.skip_whitespace();
        s.read_quoted_string()?;
    }
    Ok(())
}

fn parse_standalone(raw: &str, pos: Pos) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "yes" | "true" => Ok(true),
        "no" | "false" => Ok(false),
        _ => Err(Error::at(
            ErrorKind::Expected {
                expected: "\"yes\" or \"no\"".to_string(),
                found: format!("\"{raw}\""),
            },
            pos,
        )),
    }
}

fn skip_trivia(scanner: &mut Scanner<'_>) -> Result<()> {
    loop {
        scanner.skip_whitespace();
        if !scanner.remaining().starts_with("<!--") {
            return Ok(());
        }
        let comment_pos = scanner.position();
        let Some(end) = scanner.remaining().find("-->") else {
            return Err(Error::at(ErrorKind::UnexpectedEnd, comment_pos));
        };
        scanner.advance_to(scanner.pos() + end + "-->".len());
    }
}

/// Read one element from the scanner's current position.
fn read_element(scanner: &mut Scanner<'_>, config: &FormatConfig) -> Result<Node> {
    let open_pos = scanner.position();
    let tag = scanner.read_scope('<', '>')?;

    let mut tag_scanner = Scanner::new(tag);
    tag_scanner.consume('<');
    if tag_scanner.current() == Some('/') {
        return Err(Error::with_message(
            ErrorKind::Expected {
                expected: "element".to_string(),
                found: format!("closing tag `{tag}`"),
            },
            crate::error::Span::at(open_pos),
            format!("unexpected closing tag `{tag}`"),
        ));
    }

    let name_start = tag_scanner.pos();
    tag_scanner.skip_while(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | ':'));
    let name = tag_scanner.slice_from(name_start).to_string();
    if !is_valid_name(&name) {
        return Err(Error::at(ErrorKind::InvalidName { name }, open_pos));
    }

    let attributes = parse_attributes(&mut tag_scanner, config)?;

    if tag_scanner.current() == Some('/') {
        tag_scanner.advance();
        if tag_scanner.current() != Some('>') {
            return Err(Error::at(
                ErrorKind::Expected {
                    expected: "`>` after `/`".to_string(),
                    found: format!("`{tag}`"),
                },
                open_pos,
            ));
        }
        return Node::self_closing(name, attributes);
    }

    // the tag opened a scope: locate its matching close over the rest of the
    // input before touching any content
    let rest = scanner.remaining();
    let close = find_matching_close(rest, &name, open_pos)?;
    let content = rest.get(..close.content_end).unwrap_or_default();

    let node = if content.contains('<') {
        let children = read_sibling_elements(content, config)?;
        Node::container(name, attributes, children)?
    } else if content.trim().is_empty() {
        // `<a></a>` is an empty container, distinct from `<a/>`
        Node::container(name, attributes, Vec::new())?
    } else {
        // payload kept in escaped form; raw text derived on access
        Node::leaf_from_escaped(name, attributes, content.trim().to_string())?
    };

    scanner.advance_to(scanner.pos() + close.after_close);
    Ok(node)
}

fn read_sibling_elements(content: &str, config: &FormatConfig) -> Result<Vec<Node>> {
    let mut children = Vec::new();
    let mut scanner = Scanner::new(content);
    loop {
        skip_trivia(&mut scanner)?;
        if scanner.is_eof() {
            return Ok(children);
        }
        children.push(read_element(&mut scanner, config)?);
    }
}

struct CloseMatch {
    /// Offset (into the remaining text) where the closing tag starts
    content_end: usize,
    /// Offset just past the closing tag's `>`
    after_close: usize,
}

/// Scan forward for the close tag matching `name`, balancing nested
/// same-named opens with a depth stack.
fn find_matching_close(rest: &str, name: &str, open_pos: Pos) -> Result<CloseMatch> {
    let mut scan = Scanner::new(rest);
    let mut stack: Vec<String> = Vec::new();

    loop {
        while let Some(ch) = scan.current() {
            if ch == '<' {
                break;
            }
            scan.advance();
        }
        if scan.is_eof() {
            return Err(Error::with_message(
                ErrorKind::UnexpectedEnd,
                crate::error::Span::at(open_pos),
                format!("no closing tag for `{name}`"),
            ));
        }

        if scan.remaining().starts_with("<!--") {
            let Some(end) = scan.remaining().find("-->") else {
                return Err(Error::at(ErrorKind::UnexpectedEnd, scan.position()));
            };
            scan.advance_to(scan.pos() + end + "-->".len());
            continue;
        }

        let tag_start = scan.pos();
        let tag = scan.read_scope('<', '>')?;

        if let Some(close_body) = tag.strip_prefix("</") {
            let close_name = close_body.trim_end_matches('>').trim();
            match stack.last() {
                Some(top) if top.eq_ignore_ascii_case(close_name) => {
                    stack.pop();
                }
                Some(top) => {
                    return Err(Error::at(
                        ErrorKind::MismatchedTag {
                            open: top.clone(),
                            close: close_name.to_string(),
                        },
                        open_pos,
                    ));
                }
                None if name.eq_ignore_ascii_case(close_name) => {
                    return Ok(CloseMatch {
                        content_end: tag_start,
                        after_close: scan.pos(),
                    });
                }
                None => {
                    return Err(Error::at(
                        ErrorKind::MismatchedTag {
                            open: name.to_string(),
                            close: close_name.to_string(),
                        },
                        open_pos,
                    ));
                }
            }
            continue;
        }

        if tag.ends_with("/>") || tag.starts_with("<?") {
            continue;
        }

        // a nested open: push its name so its own close is consumed first
        let mut tag_scanner = Scanner::new(tag);
        tag_scanner.consume('<');
        let start = tag_scanner.pos();
        tag_scanner.skip_while(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | ':'));
        stack.push(tag_scanner.slice_from(start).to_string());
    }
}
