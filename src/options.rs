/// Deepest block nesting accepted by default.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Knobs for [`crate::parser::parse_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Parsing fails once more than this many blocks are open at once.
    pub max_depth: usize,
    /// Accept `//` line comments between tokens.
    pub allow_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_comments: true,
        }
    }
}

impl ParseOptions {
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn allow_comments(mut self, allow: bool) -> Self {
        self.allow_comments = allow;
        self
    }
}

/// Knobs for [`crate::writer::to_string_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Written once per nesting level.
    pub indent: String,
    /// Written between a key and its scalar value.
    pub separator: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: "\t".into(),
            separator: "\t\t".into(),
        }
    }
}

impl WriteOptions {
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}
