//! Error types for YAML-subset parsing.

use thiserror::Error;

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Deepest nesting the structural parser will follow before giving up.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parse context carrying the filename for error reporting and the
/// recursion limit.
#[derive(Clone, Debug)]
pub struct ParseContext {
    pub filename: Option<String>,
    pub max_depth: usize,
}

impl ParseContext {
    /// Create a new parse context with the default depth limit.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replace the depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Format a location suffix for error messages.
    pub fn loc_suffix(&self, line: usize, col: usize) -> String {
        match &self.filename {
            Some(name) => format!(" at {}:{} of <{}>", line + 1, col + 1, name),
            None => String::new(),
        }
    }
}

/// Error type for parsing.
///
/// The parser accepts any text; the only content-driven failure is a
/// document nested deeper than the configured limit.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Nesting exceeded the depth limit.
    #[error("Nesting deeper than {0} levels{1}")]
    TooDeep(usize, String),

    /// Reading a named input file failed.
    #[error("Error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Create an error with location information.
    pub fn with_location(self, ctx: &ParseContext, line: usize, col: usize) -> Self {
        let suffix = ctx.loc_suffix(line, col);
        match self {
            ParseError::TooDeep(limit, _) => ParseError::TooDeep(limit, suffix),
            ParseError::Io { .. } => self,
        }
    }
}
