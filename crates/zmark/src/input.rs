//! Byte input decoding
//!
//! The reader works over a full in-memory string; byte input is decoded with
//! the configured charset up front, never incrementally.

use std::borrow::Cow;

use crate::error::{Error, ErrorKind, Span};
use crate::Result;

/// Decode raw bytes using a charset token from [`crate::model::SUPPORTED_ENCODINGS`].
///
/// UTF-8 and US-ASCII borrow the input; ISO-8859-1 maps bytes to code
/// points; UTF-16 honors a leading byte-order mark and defaults to
/// big-endian without one.
pub fn decode<'a>(bytes: &'a [u8], charset: &str) -> Result<Cow<'a, str>> {
    if charset.eq_ignore_ascii_case("UTF-8") || charset.eq_ignore_ascii_case("US-ASCII") {
        let text = std::str::from_utf8(bytes).map_err(|err| {
            Error::with_message(
                ErrorKind::UnsupportedEncoding {
                    charset: charset.to_string(),
                },
                Span::empty(),
                format!("input is not valid {charset}: {err}"),
            )
        })?;
        if charset.eq_ignore_ascii_case("US-ASCII") && !text.is_ascii() {
            return Err(Error::with_message(
                ErrorKind::UnsupportedEncoding {
                    charset: charset.to_string(),
                },
                Span::empty(),
                "input contains non-ascii bytes",
            ));
        }
        return Ok(Cow::Borrowed(text));
    }

    if charset.eq_ignore_ascii_case("ISO-8859-1") {
        return Ok(Cow::Owned(
            bytes.iter().map(|&b| char::from(b)).collect(),
        ));
    }

    if charset.eq_ignore_ascii_case("UTF-16") {
        return decode_utf16(bytes).map(Cow::Owned);
    }

    Err(Error::new(
        ErrorKind::UnsupportedEncoding {
            charset: charset.to_string(),
        },
        Span::empty(),
    ))
}

fn decode_utf16(bytes: &[u8]) -> Result<String> {
    let encoding_error = |message: &str| {
        Error::with_message(
            ErrorKind::UnsupportedEncoding {
                charset: "UTF-16".to_string(),
            },
            Span::empty(),
            message.to_string(),
        )
    };

    let (little_endian, data) = match bytes {
        [0xff, 0xfe, rest @ ..] => (true, rest),
        [0xfe, 0xff, rest @ ..] => (false, rest),
        rest => (false, rest),
    };
    if data.len() % 2 != 0 {
        return Err(encoding_error("utf-16 input has an odd byte length"));
    }

    let mut units = Vec::with_capacity(data.len() / 2);
    for pair in data.chunks_exact(2) {
        let &[first, second] = pair else { continue };
        units.push(if little_endian {
            u16::from_le_bytes([first, second])
        } else {
            u16::from_be_bytes([first, second])
        });
    }

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|_| encoding_error("utf-16 input contains an unpaired surrogate"))
}
