//! `name="value"` attribute parsing
//!
//! Consumes pairs from a scanner positioned just after a tag name, stopping
//! at `>` or `/`. Duplicate names are last-write-wins; the declaration
//! reader has its own stricter duplicate handling because a declaration is a
//! fixed-shape record, not an open map.

use crate::config::FormatConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::escape;
use crate::model::{is_valid_name, Attributes};
use crate::scanner::Scanner;

pub(crate) fn parse_attributes(
    scanner: &mut Scanner<'_>,
    config: &FormatConfig,
) -> Result<Attributes> {
    let mut attrs = Attributes::new();

    loop {
        scanner.skip_whitespace();
        match scanner.current() {
            Some('>') | Some('/') => break,
            Some(_) => {}
            None => return Err(Error::at(ErrorKind::UnexpectedEnd, scanner.position())),
        }

        let name_pos = scanner.position();
        let name = read_attribute_name(scanner);
        if !is_valid_name(&name) {
            return Err(Error::at(ErrorKind::InvalidName { name }, name_pos));
        }

        if config.strict {
            // strict mode: `=` must follow the name immediately
            if scanner.current() != Some('=') {
                return Err(Error::at(
                    ErrorKind::MissingEquals { attribute: name },
                    scanner.position(),
                ));
            }
        } else {
            scanner.skip_whitespace();
        }
        if !scanner.consume('=') {
            return Err(Error::at(
                ErrorKind::MissingEquals { attribute: name },
                scanner.position(),
            ));
        }
        if !config.strict {
            scanner.skip_whitespace();
        }

        let raw = scanner.read_quoted_string()?;
        // last-write-wins on duplicates, deliberately permissive
        attrs.insert(name, escape::unescape(raw).into());
    }

    if !attrs.is_empty() && !config.allow_attributes {
        return Err(Error::at(
            ErrorKind::AttributesDisallowed,
            scanner.position(),
        ));
    }

    Ok(attrs)
}

fn read_attribute_name(scanner: &mut Scanner<'_>) -> String {
    let start = scanner.pos();
    scanner.skip_while(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | ':'));
    scanner.slice_from(start).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Attributes> {
        parse_with(input, &FormatConfig::default())
    }

    fn parse_with(input: &str, config: &FormatConfig) -> Result<Attributes> {
        let mut scanner = Scanner::new(input);
        parse_attributes(&mut scanner, config)
    }

    #[test]
    fn test_basic_pairs() {
        let attrs = parse(" id=\"1\" name='test'>").unwrap();
        assert_eq!(attrs.get("id").unwrap().as_str(), "1");
        assert_eq!(attrs.get("name").unwrap().as_str(), "test");
    }

    #[test]
    fn test_stops_at_self_close() {
        let attrs = parse(" a=\"x\" />").unwrap();
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_no_attributes() {
        assert!(parse(">").unwrap().is_empty());
        assert!(parse("   >").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_last_write_wins() {
        let attrs = parse(" x=\"1\" x=\"2\">").unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("x").unwrap().as_str(), "2");
    }

    #[test]
    fn test_missing_equals_names_attribute() {
        let err = parse(" b \"v\">").unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::MissingEquals {
                attribute: "b".to_string()
            }
        );
    }

    #[test]
    fn test_lenient_whitespace_around_equals() {
        let attrs = parse(" a = \"x\">").unwrap();
        assert_eq!(attrs.get("a").unwrap().as_str(), "x");
    }

    #[test]
    fn test_strict_rejects_whitespace_before_equals() {
        let config = FormatConfig::default().with_strict(true);
        let err = parse_with(" a = \"x\">", &config).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MissingEquals { .. }));
    }

    #[test]
    fn test_value_entities_decoded() {
        let attrs = parse(" msg=\"a&amp;b&lt;c\">").unwrap();
        assert_eq!(attrs.get("msg").unwrap().as_str(), "a&b<c");
    }

    #[test]
    fn test_attributes_disallowed_is_configuration_error() {
        let config = FormatConfig::default().with_allow_attributes(false);
        let err = parse_with(" a=\"x\">", &config).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::AttributesDisallowed);
        assert_eq!(err.category(), crate::error::Category::Configuration);
    }

    #[test]
    fn test_attributes_disallowed_permits_bare_tag() {
        let config = FormatConfig::default().with_allow_attributes(false);
        assert!(parse_with(">", &config).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_attribute_name() {
        let err = parse(" 9x=\"1\">").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidName { .. }));
    }
}
