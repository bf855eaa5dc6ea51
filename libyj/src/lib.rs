//! Converter from a small subset of YAML to a JSON-compatible value tree.
//!
//! The supported subset covers block mappings, block sequences, flow
//! collections on a single line, literal (`|`) and folded (`>`) block
//! scalars, and booleans, integers, and strings as scalars. Anchors, tags,
//! multiple documents, and complex keys are not supported.
//!
//! # Parsing Pipeline
//!
//! The parser operates in two phases:
//!
//! 1. **Scanner**: Converts source text into scan lines, stripping comments,
//!    blank lines, and document markers, and recording each line's indent.
//!
//! 2. **Structural Parser**: Recursively walks ranges of scan lines,
//!    inferring nesting from indentation, and builds the value tree.
//!
//! The parser never rejects content. Malformed input yields a best-effort
//! value; the only content error is nesting deeper than the depth limit.

mod encode;
mod error;
mod parser;
mod scalar;
mod scanner;
mod value;

use std::fs;
use std::path::Path;

pub use encode::{encode_json, DEFAULT_INDENT};
pub use error::{ParseError, Result, DEFAULT_MAX_DEPTH};
pub use value::{Mapping, Value};

/// Conversion options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Produce JSON text instead of a value tree.
    pub json: bool,
    /// JSON indent width.
    pub indent: usize,
    /// Deepest nesting accepted before parsing fails.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            json: true,
            indent: DEFAULT_INDENT,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Result of [`convert`]: a value tree or its JSON text, per [`Options::json`].
#[derive(Clone, Debug, PartialEq)]
pub enum Output {
    Value(Value),
    Json(String),
}

/// Parse a document from a string.
///
/// # Example
///
/// ```
/// use libyj::parse;
///
/// let value = parse("age: 30").unwrap();
/// assert_eq!(value.get("age").and_then(|v| v.as_u64()), Some(30));
/// ```
pub fn parse(input: &str) -> Result<Value> {
    parse_with_filename(input, None)
}

/// Parse a document from a string with a filename for error messages.
pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Result<Value> {
    parse_with_options(input, filename, &Options::default())
}

/// Parse a document from a string, honoring the depth limit in `options`.
pub fn parse_with_options(
    input: &str,
    filename: Option<&str>,
    options: &Options,
) -> Result<Value> {
    let ctx = error::ParseContext::new(filename).with_max_depth(options.max_depth);

    // Phase 1: Scan source into lines
    let lines = scanner::scan(input);

    // Phase 2: Parse lines into value
    parser::parse_root(&lines, &ctx)
}

/// Read a file in full and parse it.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let input = read_source(path)?;
    parse_with_filename(&input, Some(&display_name(path)))
}

/// Parse a document and encode it as JSON text.
///
/// ```
/// let json = libyj::to_json("tags: [a, b]", 2).unwrap();
/// assert_eq!(json, "{\n  \"tags\": [\n    \"a\",\n    \"b\"\n  ]\n}");
/// ```
pub fn to_json(input: &str, indent: usize) -> Result<String> {
    Ok(encode_json(&parse(input)?, indent))
}

/// Parse a document, producing either the value or its JSON text.
pub fn convert(input: &str, options: &Options) -> Result<Output> {
    convert_with_filename(input, None, options)
}

/// Like [`convert`], with a filename for error messages.
pub fn convert_with_filename(
    input: &str,
    filename: Option<&str>,
    options: &Options,
) -> Result<Output> {
    let value = parse_with_options(input, filename, options)?;
    if options.json {
        Ok(Output::Json(encode_json(&value, options.indent)))
    } else {
        Ok(Output::Value(value))
    }
}

/// Read a file in full and [`convert`] it.
pub fn convert_file<P: AsRef<Path>>(path: P, options: &Options) -> Result<Output> {
    let path = path.as_ref();
    let input = read_source(path)?;
    convert_with_filename(&input, Some(&display_name(path)), options)
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_json_and_value() {
        let input = "name: Alice\nage: 30\n";
        let json = convert(input, &Options::default()).unwrap();
        assert_eq!(
            json,
            Output::Json("{\n    \"name\": \"Alice\",\n    \"age\": 30\n}".to_string())
        );

        let options = Options {
            json: false,
            ..Options::default()
        };
        match convert(input, &options).unwrap() {
            Output::Value(value) => {
                assert_eq!(value.get("name").and_then(Value::as_str), Some("Alice"));
                assert_eq!(value.get("age").and_then(Value::as_u64), Some(30));
            }
            other => panic!("expected a value, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = parse_file("/nonexistent/dir/config.yml").unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
        assert!(err.to_string().starts_with("Error reading /nonexistent/dir/config.yml: "));

        let err = convert_file("/nonexistent/dir/config.yml", &Options::default()).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }
}
