//! Entity escaping for the five reserved markup characters
//!
//! Both directions run in a single forward pass, which fixes the substitution
//! order once and for all:
//!
//! - [`escape`] examines each input character exactly once, so an ampersand
//!   introduced by an earlier replacement (`<` becoming `&lt;`) is never
//!   re-escaped. This is equivalent to the ampersand-first ordering of a
//!   sequential multi-replace and is the order the writer relies on.
//! - [`unescape`] decodes the leftmost entity first, so `&amp;lt;` becomes
//!   `&lt;` (the ampersand entity wins), the exact inverse of the above.
//!
//! Entity-shaped text that is not one of the five reserved entities passes
//! through verbatim. As a consequence `unescape(escape(s)) == s` holds for
//! every `s`, but `escape(unescape(t)) == t` can fail for `t` containing
//! literal `&...;` substrings that collide with the entity table.

/// Replace the five reserved characters with their entities.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            ch => out.push(ch),
        }
    }
    out
}

const ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&apos;", '\''),
];

/// Replace the five reserved entities with their characters.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        let (before, tail) = rest.split_at(amp);
        out.push_str(before);
        match ENTITIES
            .iter()
            .find_map(|(entity, ch)| tail.strip_prefix(entity).map(|after| (*ch, after)))
        {
            Some((ch, after)) => {
                out.push(ch);
                rest = after;
            }
            None => {
                out.push('&');
                rest = tail.get(1..).unwrap_or_default();
            }
        }
    }
    out.push_str(rest);
    out
}
