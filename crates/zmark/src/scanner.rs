//! Character cursor with scope-aware reads
//!
//! The scanner owns nothing but its position; it borrows the full document
//! text up front. All higher layers (attributes, reader) thread one scanner
//! by mutable reference instead of sharing cursor state.

use crate::error::{Error, ErrorKind, Pos, Result};

/// Cursor for navigating text input with position tracking
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    col: u32,
}

impl<'a> Scanner<'a> {
    /// Create scanner over a full in-memory document
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Get current character without consuming
    pub fn current(&self) -> Option<char> {
        self.input.get(self.pos..).and_then(|s| s.chars().next())
    }

    /// Peek at character ahead without consuming
    pub fn peek(&self, ahead: usize) -> Option<char> {
        self.input.get(self.pos..).and_then(|s| s.chars().nth(ahead))
    }

    /// Check whether at least `n` characters remain
    pub fn can_read(&self, n: usize) -> bool {
        self.remaining().chars().count() >= n
    }

    /// Advance cursor by one character
    pub fn advance(&mut self) {
        if let Some(ch) = self.current() {
            self.pos += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    /// Consume character if it matches
    pub fn consume(&mut self, expected: char) -> bool {
        if self.current() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skip whitespace
    pub fn skip_whitespace(&mut self) {
        self.skip_while(|ch| matches!(ch, ' ' | '\t' | '\n' | '\r'));
    }

    /// Skip characters matching a predicate, returning how many were skipped
    pub fn skip_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut skipped = 0;
        while let Some(ch) = self.current() {
            if pred(ch) {
                self.advance();
                skipped += 1;
            } else {
                break;
            }
        }
        skipped
    }

    /// Read text up to (exclusive) the first terminator character.
    ///
    /// The terminator is left unconsumed. Fails if input ends before any
    /// terminator is seen.
    pub fn read_until(&mut self, terminators: &[char]) -> Result<&'a str> {
        let start = self.pos;
        while let Some(ch) = self.current() {
            if terminators.contains(&ch) {
                return Ok(self.slice_from(start));
            }
            self.advance();
        }
        Err(Error::at(ErrorKind::UnexpectedEnd, self.position()))
    }

    /// Read a `'...'` or `"..."` string, returning the inner text.
    ///
    /// Both delimiters are consumed; the closing delimiter must match the
    /// opening one.
    pub fn read_quoted_string(&mut self) -> Result<&'a str> {
        let quote = match self.current() {
            Some(q @ ('\'' | '"')) => q,
            found => {
                return Err(Error::at(
                    ErrorKind::Expected {
                        expected: "quoted string".to_string(),
                        found: describe(found),
                    },
                    self.position(),
                ))
            }
        };
        let open_pos = self.position();
        self.advance();

        let start = self.pos;
        while let Some(ch) = self.current() {
            if ch == quote {
                let inner = self.slice_from(start);
                self.advance();
                return Ok(inner);
            }
            self.advance();
        }
        Err(Error::at(ErrorKind::UnterminatedString, open_pos))
    }

    /// Read a balanced `open...close` span including both delimiters.
    ///
    /// Nested occurrences of the same pair are balanced with a depth counter.
    /// Quoted strings inside the scope are skipped whole, so a `close`
    /// character inside quotes does not end the scope.
    pub fn read_scope(&mut self, open: char, close: char) -> Result<&'a str> {
        let open_pos = self.position();
        if !self.consume(open) {
            return Err(Error::at(
                ErrorKind::Expected {
                    expected: format!("`{open}`"),
                    found: describe(self.current()),
                },
                open_pos,
            ));
        }

        let start = open_pos.offset;
        let mut depth = 1usize;
        while let Some(ch) = self.current() {
            if ch == '\'' || ch == '"' {
                self.read_quoted_string()?;
                continue;
            }
            self.advance();
            if ch == open {
                depth += 1;
            } else if ch == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(self.slice_from(start));
                }
            }
        }
        Err(Error::at(ErrorKind::UnbalancedScope { open, close }, open_pos))
    }

    /// Consume one of a fixed candidate set, case-insensitively.
    ///
    /// The match must end at a non-name-character boundary, so a candidate
    /// never matches as a bare prefix of a longer word. Returns the
    /// canonical (candidate-table) spelling of the match.
    pub fn read_expected(&mut self, candidates: &[&'static str]) -> Result<&'static str> {
        for candidate in candidates {
            let mut rest = self.remaining().chars();
            let matches = candidate
                .chars()
                .all(|c| rest.next().is_some_and(|a| a.eq_ignore_ascii_case(&c)));
            if matches && !rest.next().is_some_and(is_name_char) {
                for _ in 0..candidate.chars().count() {
                    self.advance();
                }
                return Ok(candidate);
            }
        }
        Err(Error::at(
            ErrorKind::Expected {
                expected: format!("one of {candidates:?}"),
                found: describe(self.current()),
            },
            self.position(),
        ))
    }

    /// Get current position
    pub const fn position(&self) -> Pos {
        Pos::new(self.pos, self.line, self.col)
    }

    /// Check if at end of input
    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Get remaining text
    pub fn remaining(&self) -> &'a str {
        self.input.get(self.pos..).unwrap_or_default()
    }

    /// Get current byte offset
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Get slice from a prior offset to the current position
    pub fn slice_from(&self, start: usize) -> &'a str {
        self.input.get(start..self.pos).unwrap_or_default()
    }

    /// Advance to an absolute byte offset, keeping line/col tracking intact
    pub(crate) fn advance_to(&mut self, offset: usize) {
        while self.pos < offset && !self.is_eof() {
            self.advance();
        }
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | ':')
}

fn describe(ch: Option<char>) -> String {
    match ch {
        Some(ch) => format!("`{ch}`"),
        None => "end of input".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_basic() {
        let mut scanner = Scanner::new("hello");
        assert_eq!(scanner.current(), Some('h'));
        assert_eq!(scanner.peek(1), Some('e'));
        scanner.advance();
        assert_eq!(scanner.current(), Some('e'));
    }

    #[test]
    fn test_scanner_whitespace() {
        let mut scanner = Scanner::new("  \t\nhello");
        scanner.skip_whitespace();
        assert_eq!(scanner.current(), Some('h'));
        assert_eq!(scanner.position().line, 2);
    }

    #[test]
    fn test_read_until() {
        let mut scanner = Scanner::new("name=value");
        assert_eq!(scanner.read_until(&['=']).unwrap(), "name");
        assert_eq!(scanner.current(), Some('='));
    }

    #[test]
    fn test_read_until_missing_terminator() {
        let mut scanner = Scanner::new("name");
        let err = scanner.read_until(&['=']).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnexpectedEnd);
    }

    #[test]
    fn test_read_quoted_string() {
        let mut scanner = Scanner::new("\"abc\" 'def'");
        assert_eq!(scanner.read_quoted_string().unwrap(), "abc");
        scanner.skip_whitespace();
        assert_eq!(scanner.read_quoted_string().unwrap(), "def");
    }

    #[test]
    fn test_unterminated_quote() {
        let mut scanner = Scanner::new("\"abc");
        let err = scanner.read_quoted_string().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnterminatedString);
    }

    #[test]
    fn test_mismatched_quote_is_unterminated() {
        let mut scanner = Scanner::new("\"abc'");
        assert!(scanner.read_quoted_string().is_err());
    }

    #[test]
    fn test_read_scope_balanced() {
        let mut scanner = Scanner::new("[a[b]c]rest");
        assert_eq!(scanner.read_scope('[', ']').unwrap(), "[a[b]c]");
        assert_eq!(scanner.remaining(), "rest");
    }

    #[test]
    fn test_read_scope_skips_quotes() {
        let mut scanner = Scanner::new("<a x=\"1>2\">rest");
        assert_eq!(scanner.read_scope('<', '>').unwrap(), "<a x=\"1>2\">");
        assert_eq!(scanner.remaining(), "rest");
    }

    #[test]
    fn test_read_scope_unbalanced() {
        let mut scanner = Scanner::new("[a[b]");
        let err = scanner.read_scope('[', ']').unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::UnbalancedScope {
                open: '[',
                close: ']'
            }
        );
    }

    #[test]
    fn test_read_expected_case_insensitive() {
        let mut scanner = Scanner::new("VERSION=\"1.0\"");
        let matched = scanner.read_expected(&["version", "encoding"]).unwrap();
        assert_eq!(matched, "version");
        assert_eq!(scanner.current(), Some('='));
    }

    #[test]
    fn test_read_expected_no_match() {
        let mut scanner = Scanner::new("flavor=\"x\"");
        assert!(scanner.read_expected(&["version", "encoding"]).is_err());
    }

    #[test]
    fn test_read_expected_rejects_bare_prefix() {
        let mut scanner = Scanner::new("versionx=\"1.0\"");
        assert!(scanner.read_expected(&["version", "encoding"]).is_err());
        // nothing consumed on failure
        assert_eq!(scanner.pos(), 0);
    }

    #[test]
    fn test_can_read() {
        let scanner = Scanner::new("ab");
        assert!(scanner.can_read(2));
        assert!(!scanner.can_read(3));
    }

    #[test]
    fn test_multibyte_advance() {
        let mut scanner = Scanner::new("é<");
        scanner.advance();
        assert_eq!(scanner.current(), Some('<'));
    }
}
