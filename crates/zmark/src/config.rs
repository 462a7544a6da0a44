//! Formatting and policy configuration
//!
//! One `FormatConfig` value is shared by reference across a whole read or
//! write call. It is never mutated mid-operation, which also makes it safe
//! to share between concurrent reader/writer instances.

/// What to do with non-structural findings (e.g. a missing declaration when
/// strict mode expects one). Structural violations fail regardless.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Surface the finding as an error
    #[default]
    Fail,
    /// Recover with a default and record a warning on the reader
    Report,
}

/// Flat set of independent formatting flags
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatConfig {
    /// Emit indentation and newlines when writing
    pub pretty: bool,
    /// One indent unit
    pub indent: String,
    /// Whether attributes are permitted at all (enforced by the reader)
    pub allow_attributes: bool,
    /// Collapse a leaf value onto its opening line instead of an indented
    /// line of its own
    pub simplify_leaves: bool,
    /// Containers with at most this many children, all of them inline-able,
    /// are written on one line. Zero disables container inlining.
    pub inline_child_limit: usize,
    /// Charset used when a declaration has to be synthesized
    pub charset: String,
    /// Strict mode requires the leading declaration and rejects whitespace
    /// around attribute names
    pub strict: bool,
    /// Policy for non-structural findings
    pub error_policy: ErrorPolicy,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            allow_attributes: true,
            simplify_leaves: true,
            inline_child_limit: 0,
            charset: "UTF-8".to_string(),
            strict: false,
            error_policy: ErrorPolicy::Fail,
        }
    }
}

impl FormatConfig {
    /// Compact single-line output, everything else default
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_allow_attributes(mut self, allow: bool) -> Self {
        self.allow_attributes = allow;
        self
    }

    pub fn with_simplify_leaves(mut self, simplify: bool) -> Self {
        self.simplify_leaves = simplify;
        self
    }

    pub fn with_inline_child_limit(mut self, limit: usize) -> Self {
        self.inline_child_limit = limit;
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }
}
