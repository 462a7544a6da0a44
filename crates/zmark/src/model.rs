//! Document tree model
//!
//! Leaf payloads are stored in escaped form; the raw text is derived on
//! access and accepted on construction. Attribute values are stored raw and
//! escaped by the writer. Keeping the invariant here (rather than in the
//! writer) is what makes serialization idempotent: the writer never sees a
//! value it might double-escape.

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::escape;

/// Ordered attribute map, insertion order preserved
pub type Attributes = IndexMap<String, AttributeValue>;

/// Attribute payload, always text on the wire.
///
/// Booleans and numbers are canonicalized to their string form at
/// construction; no numeric type survives past this point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AttributeValue(String);

impl AttributeValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self(if value { "true" } else { "false" }.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self(value.to_string())
    }
}

/// One element of the document tree
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// Element with nested children
    Container {
        name: String,
        attributes: Attributes,
        children: Vec<Node>,
    },
    /// Element with a scalar text payload (kept escaped)
    Leaf {
        name: String,
        attributes: Attributes,
        value: String,
    },
    /// Element with no body, terminated inline
    SelfClosing {
        name: String,
        attributes: Attributes,
    },
}

impl Node {
    /// Create a container element
    pub fn container(
        name: impl Into<String>,
        attributes: Attributes,
        children: Vec<Self>,
    ) -> Result<Self> {
        let name = validated_name(name.into())?;
        Ok(Self::Container {
            name,
            attributes,
            children,
        })
    }

    /// Create a leaf element from its raw (unescaped) payload
    pub fn leaf(
        name: impl Into<String>,
        attributes: Attributes,
        raw_value: impl AsRef<str>,
    ) -> Result<Self> {
        let name = validated_name(name.into())?;
        Ok(Self::Leaf {
            name,
            attributes,
            value: escape::escape(raw_value.as_ref()),
        })
    }

    /// Create a self-closing element
    pub fn self_closing(name: impl Into<String>, attributes: Attributes) -> Result<Self> {
        let name = validated_name(name.into())?;
        Ok(Self::SelfClosing { name, attributes })
    }

    /// Leaf constructor for payloads already in escaped form.
    ///
    /// The reader slices escaped text straight off the wire; re-escaping it
    /// would corrupt entities, so it bypasses the public constructor.
    pub(crate) fn leaf_from_escaped(
        name: impl Into<String>,
        attributes: Attributes,
        escaped: String,
    ) -> Result<Self> {
        let name = validated_name(name.into())?;
        Ok(Self::Leaf {
            name,
            attributes,
            value: escaped,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Container { name, .. }
            | Self::Leaf { name, .. }
            | Self::SelfClosing { name, .. } => name,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        match self {
            Self::Container { attributes, .. }
            | Self::Leaf { attributes, .. }
            | Self::SelfClosing { attributes, .. } => attributes,
        }
    }

    /// Look up one attribute's text
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes().get(name).map(AttributeValue::as_str)
    }

    /// Insert or replace an attribute
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        let name = validated_name(name.into())?;
        let attributes = match self {
            Self::Container { attributes, .. }
            | Self::Leaf { attributes, .. }
            | Self::SelfClosing { attributes, .. } => attributes,
        };
        attributes.insert(name, value.into());
        Ok(())
    }

    /// Children of a container; `None` for leaf and self-closing nodes
    pub fn children(&self) -> Option<&[Self]> {
        match self {
            Self::Container { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Mutable children of a container
    pub fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            Self::Container { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Raw (unescaped) payload of a leaf, derived from the stored form
    pub fn value(&self) -> Option<String> {
        match self {
            Self::Leaf { value, .. } => Some(escape::unescape(value)),
            _ => None,
        }
    }

    /// Payload of a leaf exactly as stored (escaped form)
    pub fn escaped_value(&self) -> Option<&str> {
        match self {
            Self::Leaf { value, .. } => Some(value),
            _ => None,
        }
    }

    pub const fn is_self_closing(&self) -> bool {
        matches!(self, Self::SelfClosing { .. })
    }
}

/// Check a tag or attribute name against the lexical pattern
/// `[A-Za-z_-][A-Za-z0-9_-]*` with at most one `:`-separated suffix of the
/// same shape.
pub fn is_valid_name(name: &str) -> bool {
    let mut parts = name.splitn(3, ':');
    let Some(base) = parts.next() else {
        return false;
    };
    if !is_valid_name_part(base, true) {
        return false;
    }
    match (parts.next(), parts.next()) {
        (None, _) => true,
        (Some(suffix), None) => is_valid_name_part(suffix, false),
        (Some(_), Some(_)) => false,
    }
}

fn is_valid_name_part(part: &str, first_restricted: bool) -> bool {
    let mut chars = part.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let head_ok = if first_restricted {
        first.is_ascii_alphabetic() || first == '_' || first == '-'
    } else {
        first.is_ascii_alphanumeric() || first == '_' || first == '-'
    };
    head_ok && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}

fn validated_name(name: String) -> Result<String> {
    if is_valid_name(&name) {
        Ok(name)
    } else {
        Err(Error::new(ErrorKind::InvalidName { name }, Span::empty()))
    }
}

/// Charsets the declaration accepts, canonical spelling first
pub const SUPPORTED_ENCODINGS: [&str; 4] = ["UTF-8", "UTF-16", "US-ASCII", "ISO-8859-1"];

/// Leading document declaration (`<?xml version=".." ..?>`)
///
/// Constructed once per document, parsed or defaulted, immutable after.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Declaration {
    version_major: u32,
    version_minor: u8,
    encoding: String,
    standalone: bool,
}

impl Default for Declaration {
    fn default() -> Self {
        Self {
            version_major: 1,
            version_minor: 0,
            encoding: "UTF-8".to_string(),
            standalone: false,
        }
    }
}

impl Declaration {
    /// Create a declaration, validating version bounds and charset
    pub fn new(
        version_major: u32,
        version_minor: u8,
        encoding: impl Into<String>,
        standalone: bool,
    ) -> Result<Self> {
        if version_major == 0 || version_minor > 9 {
            return Err(Error::new(
                ErrorKind::InvalidVersion {
                    version: format!("{version_major}.{version_minor}"),
                },
                Span::empty(),
            ));
        }
        let encoding = canonical_encoding(&encoding.into())?;
        Ok(Self {
            version_major,
            version_minor,
            encoding,
            standalone,
        })
    }

    /// Parse a `major.minor` version string
    pub fn parse_version(text: &str) -> Result<(u32, u8)> {
        let invalid = || {
            Error::new(
                ErrorKind::InvalidVersion {
                    version: text.to_string(),
                },
                Span::empty(),
            )
        };
        let (major, minor) = text.split_once('.').ok_or_else(invalid)?;
        let major: u32 = major.parse().map_err(|_| invalid())?;
        // one digit only, so "1.01" and "1.10" are both rejected
        if minor.len() != 1 {
            return Err(invalid());
        }
        let minor: u8 = minor.parse().map_err(|_| invalid())?;
        if major == 0 {
            return Err(invalid());
        }
        Ok((major, minor))
    }

    pub const fn version_major(&self) -> u32 {
        self.version_major
    }

    pub const fn version_minor(&self) -> u8 {
        self.version_minor
    }

    /// Version as it appears on the wire
    pub fn version(&self) -> String {
        format!("{}.{}", self.version_major, self.version_minor)
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub const fn standalone(&self) -> bool {
        self.standalone
    }
}

fn canonical_encoding(token: &str) -> Result<String> {
    SUPPORTED_ENCODINGS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(token))
        .map(|known| (*known).to_string())
        .ok_or_else(|| {
            Error::new(
                ErrorKind::UnsupportedEncoding {
                    charset: token.to_string(),
                },
                Span::empty(),
            )
        })
}

/// A parsed document: declaration plus a single root element
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub declaration: Declaration,
    pub root: Node,
}
