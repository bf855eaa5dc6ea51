//! Phase 2: Structural Parser
//!
//! The structural parser walks a range of scan lines and infers nesting
//! from indentation alone. Each line is dispatched on its form, first
//! match wins:
//! - Block scalars: a line ending in `|` (literal) or `>` (folded)
//! - Nested blocks: a key line followed by deeper lines, parsed recursively
//! - Block sequence items: `- ` lines, parsed recursively when they own
//!   deeper lines
//! - Flow collections: lines starting with `[` or `{`
//! - Associations: `key: value` lines
//!
//! Lines matching none of these are skipped.

use crate::error::{ParseContext, ParseError, Result};
use crate::scalar;
use crate::scanner::{is_block_scalar_start, ScanLine};
use crate::value::{Mapping, Value};

/// Parse scan lines (including the trailing backstop) into a value.
pub fn parse_root(lines: &[ScanLine], ctx: &ParseContext) -> Result<Value> {
    let parser = Parser { lines, ctx };
    parser.parse_range(0, lines.len(), None, 0)
}

struct Parser<'a> {
    lines: &'a [ScanLine],
    ctx: &'a ParseContext,
}

// ============================================================================
// Range Parsing
// ============================================================================

impl Parser<'_> {
    /// Parse the lines in `[start, stop)`.
    ///
    /// `head` stands in for the line at `start` when a sequence item is
    /// parsed with its marker removed; the shared lines are never rewritten.
    fn parse_range(
        &self,
        start: usize,
        stop: usize,
        head: Option<&ScanLine>,
        depth: usize,
    ) -> Result<Value> {
        if depth > self.ctx.max_depth {
            let line_num = head
                .or_else(|| self.lines.get(start))
                .map_or(0, |l| l.line_num);
            return Err(ParseError::TooDeep(self.ctx.max_depth, String::new())
                .with_location(self.ctx, line_num, 0));
        }

        let mut out = Container::Empty;
        let mut i = start;

        while i < stop {
            let line = match head {
                Some(h) if i == start => h,
                _ => &self.lines[i],
            };
            let text = line.text();

            if text.is_empty() {
                i += 1;
                continue;
            }

            let item = sequence_item(text);

            // Block scalar
            if item.is_none() && is_block_scalar_start(text) {
                let (string, next) = self.block_scalar(i, stop, line.indent, text.ends_with('|'));
                match text.split_once(':') {
                    Some((key, _)) => out.insert(scalar::key(key), Value::String(string)),
                    None => out.replace(Value::String(string)),
                }
                i = next;
                continue;
            }

            // Nested block
            if item.is_none() && self.opens_block(i, stop, line.indent) {
                let key = scalar::key(text.split_once(':').map_or(text, |(key, _)| key));
                let end = self.block_end(i + 1, stop, line.indent);
                let value = self.parse_range(i + 1, end, None, depth + 1)?;
                out.insert(key, value);
                i = end;
                continue;
            }

            // Block sequence item
            if let Some(rest) = item {
                let rest = rest.trim();

                // A keyless block scalar is the item itself
                if rest == "|" || rest == ">" {
                    let (string, next) = self.block_scalar(i, stop, line.indent, rest == "|");
                    out.push(Value::String(string));
                    i = next;
                    continue;
                }

                let item_line = ScanLine {
                    line: rest.to_string(),
                    indent: line.indent + 2,
                    line_num: line.line_num,
                };
                let end = self.item_end(i + 1, stop, item_line.indent);
                if self.has_content(i + 1, end) {
                    let value = self.parse_range(i, end, Some(&item_line), depth + 1)?;
                    out.push(value);
                } else {
                    out.push(scalar::strip(rest));
                }
                i = end;
                continue;
            }

            if text.starts_with('[') {
                out.replace(flow_sequence(text));
            } else if text.starts_with('{') {
                out.replace(flow_mapping(text));
            } else if let Some((key, value)) = line.line.split_once(": ") {
                out.insert(scalar::key(key), association_value(value));
            }

            i += 1;
        }

        Ok(out.finish())
    }

    /// Whether the next content line after `i` is deeper than `indent`.
    fn opens_block(&self, i: usize, stop: usize, indent: usize) -> bool {
        self.next_content(i + 1, stop)
            .map_or(false, |k| self.lines[k].indent > indent)
    }

    /// End of a nested block: the first content line at or above the key's
    /// indent. The backstop is blank, so running into it extends the range
    /// to `stop` and keeps the final real line inside the block.
    fn block_end(&self, from: usize, stop: usize, indent: usize) -> usize {
        (from..stop)
            .find(|&k| !self.lines[k].is_blank() && self.lines[k].indent <= indent)
            .unwrap_or(stop)
    }

    /// End of a sequence item: the first content line shallower than the
    /// item's adjusted indent.
    fn item_end(&self, from: usize, stop: usize, indent: usize) -> usize {
        (from..stop)
            .find(|&k| !self.lines[k].is_blank() && self.lines[k].indent < indent)
            .unwrap_or(stop)
    }

    fn next_content(&self, from: usize, stop: usize) -> Option<usize> {
        (from..stop).find(|&k| !self.lines[k].is_blank())
    }

    fn has_content(&self, from: usize, to: usize) -> bool {
        self.next_content(from, to).is_some()
    }

    // ========================================================================
    // Block Scalars
    // ========================================================================

    /// Read the block scalar introduced at line `i`.
    ///
    /// Content lines are those deeper than `floor`, the introducer's
    /// indent. The first content line fixes the reference indent; any
    /// extra indentation beyond it is kept as leading spaces. Returns the
    /// string, which always ends in exactly one newline, and the index of
    /// the first line after the block.
    fn block_scalar(&self, i: usize, stop: usize, floor: usize, literal: bool) -> (String, usize) {
        let reference = self
            .next_content(i + 1, stop)
            .map(|k| self.lines[k].indent)
            .filter(|&indent| indent > floor);

        let mut out = String::new();
        let mut j = i + 1;

        if let Some(reference) = reference {
            while j < stop {
                let line = &self.lines[j];

                if line.is_blank() {
                    // Blank lines belong to the text only while it continues
                    let inside = self
                        .next_content(j + 1, stop)
                        .map_or(false, |k| self.lines[k].indent > floor);
                    if !inside {
                        break;
                    }
                    // The last stored character becomes a newline
                    out.pop();
                    out.push('\n');
                    j += 1;
                    continue;
                }

                if line.indent <= floor {
                    break;
                }

                out.push_str(&" ".repeat(line.indent.saturating_sub(reference)));
                out.push_str(line.text());
                out.push(if literal { '\n' } else { ' ' });
                j += 1;
            }
        }

        let mut string = out.trim_end_matches(|c| c == ' ' || c == '\n').to_string();
        string.push('\n');
        (string, j)
    }
}

// ============================================================================
// Level Builder
// ============================================================================

/// The value under construction for one nesting level.
///
/// The first structural form commits the level to a mapping or a sequence.
/// Entries of the other form that arrive later are ignored. Flow
/// collections and keyless block scalars replace the level outright.
enum Container {
    Empty,
    Mapping(Mapping),
    Sequence(Vec<Value>),
    Scalar(Value),
}

impl Container {
    fn insert(&mut self, key: String, value: Value) {
        match self {
            Container::Empty => {
                let mut map = Mapping::new();
                map.insert(key, value);
                *self = Container::Mapping(map);
            }
            Container::Mapping(map) => {
                map.insert(key, value);
            }
            Container::Sequence(_) | Container::Scalar(_) => {}
        }
    }

    fn push(&mut self, item: Value) {
        if matches!(self, Container::Mapping(map) if map.is_empty()) {
            *self = Container::Empty;
        }
        match self {
            Container::Empty => *self = Container::Sequence(vec![item]),
            Container::Sequence(items) => items.push(item),
            Container::Mapping(_) | Container::Scalar(_) => {}
        }
    }

    fn replace(&mut self, value: Value) {
        *self = match value {
            Value::Mapping(map) => Container::Mapping(map),
            Value::Sequence(items) => Container::Sequence(items),
            scalar => Container::Scalar(scalar),
        };
    }

    fn finish(self) -> Value {
        match self {
            Container::Empty => Value::Mapping(Mapping::new()),
            Container::Mapping(map) => Value::Mapping(map),
            Container::Sequence(items) => Value::Sequence(items),
            Container::Scalar(value) => value,
        }
    }
}

// ============================================================================
// Line Forms
// ============================================================================

/// Content after a `- ` sequence marker.
fn sequence_item(text: &str) -> Option<&str> {
    text.strip_prefix("- ")
}

/// The value of a `key: value` line: a flow sequence when the coerced
/// text starts with `[`, otherwise the coerced scalar.
fn association_value(text: &str) -> Value {
    match scalar::strip(text) {
        Value::String(s) if s.starts_with('[') => flow_sequence(&s),
        value => value,
    }
}

/// Parse `[a, b, ...]`. Every comma separates elements.
fn flow_sequence(text: &str) -> Value {
    let inner = text.trim().trim_matches(|c| c == '[' || c == ']');
    Value::Sequence(inner.split(',').map(scalar::strip).collect())
}

/// Parse `{key: value, ...}`. Pieces without `": "` get an empty value.
fn flow_mapping(text: &str) -> Value {
    let text = text.trim();
    let text = text.strip_prefix('{').unwrap_or(text);
    let inner = text.strip_suffix('}').unwrap_or(text);
    let mut map = Mapping::new();
    for piece in inner.split(',') {
        let (key, value) = piece.split_once(": ").unwrap_or((piece, ""));
        map.insert(scalar::key(key), scalar::strip(value));
    }
    Value::Mapping(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, parse_with_options, Options};

    fn json(input: &str) -> String {
        crate::encode_json(&parse(input).unwrap(), 0).replace('\n', "")
    }

    #[test]
    fn test_association() {
        assert_eq!(json("name: Alice"), r#"{"name": "Alice"}"#);
        assert_eq!(json("age: 30"), r#"{"age": 30}"#);
        assert_eq!(json("active: yes"), r#"{"active": true}"#);
        assert_eq!(json("url: http://example.com: 80"), r#"{"url": "http://example.com: 80"}"#);
    }

    #[test]
    fn test_empty_input_is_empty_mapping() {
        assert_eq!(json(""), "{}");
        assert_eq!(json("# only a comment\n\n"), "{}");
        assert_eq!(json("---\n"), "{}");
    }

    #[test]
    fn test_nested_blocks_and_dedent() {
        let input = "a:\n  b:\n    c: 1\n  d: 2\ne: 3\n";
        assert_eq!(json(input), r#"{"a": {"b": {"c": 1},"d": 2},"e": 3}"#);
    }

    #[test]
    fn test_final_line_of_last_block_is_kept() {
        assert_eq!(json("a:\n  b: 1\n  c: 2"), r#"{"a": {"b": 1,"c": 2}}"#);
        assert_eq!(json("a:\n  b:\n    c: 2"), r#"{"a": {"b": {"c": 2}}}"#);
    }

    #[test]
    fn test_block_sequence() {
        assert_eq!(json("items:\n  - one\n  - two\n"), r#"{"items": ["one","two"]}"#);
        assert_eq!(json("- 1\n- yes\n- x\n"), r#"[1,true,"x"]"#);
    }

    #[test]
    fn test_sequence_of_mappings() {
        let input = "people:\n  - name: Alice\n    age: 30\n  - name: Bob\n    age: 25\n";
        assert_eq!(
            json(input),
            r#"{"people": [{"name": "Alice","age": 30},{"name": "Bob","age": 25}]}"#
        );
    }

    #[test]
    fn test_single_line_item_stays_scalar() {
        assert_eq!(json("- name: Bob\n- 2\n"), r#"["name: Bob",2]"#);
    }

    #[test]
    fn test_nested_sequences() {
        assert_eq!(json("- - a\n  - b\n- c\n"), r#"[["a","b"],"c"]"#);
    }

    #[test]
    fn test_item_with_nested_block_at_range_end() {
        let input = "x:\n  - a\n  - b:\n      c: 1\ny: 2\n";
        assert_eq!(json(input), r#"{"x": ["a",{"b": {"c": 1}}],"y": 2}"#);
    }

    #[test]
    fn test_bare_dash_is_not_an_item() {
        assert_eq!(json("- a\n-\n"), r#"["a"]"#);
        assert_eq!(json("-\n  a: 1\n"), r#"{"-": {"a": 1}}"#);
    }

    #[test]
    fn test_single_line_item_is_never_a_flow_collection() {
        assert_eq!(json("- [a, b]\n- {k: v}\n"), r#"["[a, b]","{k: v}"]"#);
    }

    #[test]
    fn test_literal_and_folded_scalars() {
        assert_eq!(json("text: |\n  line1\n  line2\n"), r#"{"text": "line1\nline2\n"}"#);
        assert_eq!(json("text: >\n  line1\n  line2\n"), r#"{"text": "line1 line2\n"}"#);
    }

    #[test]
    fn test_block_scalar_relative_indent_and_quotes() {
        let input = "code: |\n  if x:\n    say \"hi\" # not a comment\n";
        assert_eq!(
            json(input),
            r#"{"code": "if x:\n  say \"hi\" # not a comment\n"}"#
        );
    }

    #[test]
    fn test_block_scalar_blank_lines() {
        assert_eq!(json("t: |\n  a\n\n  b\n"), r#"{"t": "a\nb\n"}"#);
        assert_eq!(json("t: >\n  a\n\n  b\n"), r#"{"t": "a\nb\n"}"#);
        assert_eq!(json("t: >\n  a\n\n\n  b\n"), r#"{"t": "a\nb\n"}"#);
        assert_eq!(json("t: >\n  a\n  b\n\n  c\n"), r#"{"t": "a b\nc\n"}"#);
    }

    #[test]
    fn test_block_scalar_followed_by_structure() {
        let input = "text: |\n  hello\n\nmeta:\n  tags: [x]\n";
        assert_eq!(json(input), r#"{"text": "hello\n","meta": {"tags": ["x"]}}"#);
    }

    #[test]
    fn test_block_scalar_in_sequence() {
        let input = "- note: |\n    first\n    second\n  id: 7\n- |\n  raw\n- plain\n";
        assert_eq!(
            json(input),
            r#"[{"note": "first\nsecond\n","id": 7},"raw\n","plain"]"#
        );
    }

    #[test]
    fn test_empty_block_scalar() {
        assert_eq!(json("a: |\nb: 1\n"), r#"{"a": "\n","b": 1}"#);
    }

    #[test]
    fn test_inline_collections() {
        assert_eq!(json("tags: [a, b, c]"), r#"{"tags": ["a","b","c"]}"#);
        assert_eq!(json("[1, 'two', no]"), r#"[1,"two",false]"#);
        assert_eq!(json("{a: 1, b: yes, c}"), r#"{"a": 1,"b": true,"c": ""}"#);
        assert_eq!(json("empty: []"), r#"{"empty": [""]}"#);
        assert_eq!(json("{}"), r#"{"": ""}"#);
    }

    #[test]
    fn test_flow_elements_split_on_every_comma() {
        assert_eq!(json("tags: [a, \"b, c\"]"), r#"{"tags": ["a","\"b","c\""]}"#);
        assert_eq!(json("t: [a, b,]"), r#"{"t": ["a","b",""]}"#);
        assert_eq!(json("{a: 1, b: [x, y]}"), r#"{"a": 1,"b": "[x","y]": ""}"#);
    }

    #[test]
    fn test_association_value_is_sequence_or_scalar() {
        assert_eq!(json("point: {x: 1, y: 2}"), r#"{"point": "{x: 1, y: 2}"}"#);
        assert_eq!(json("literal: \"[a]\""), r#"{"literal": ["a"]}"#);
        assert_eq!(json("nested: [[a, b], c]"), r#"{"nested": ["a","b]","c"]}"#);
    }

    #[test]
    fn test_deep_brackets_do_not_recurse() {
        let input = format!("x: {}\n", "[".repeat(200_000));
        assert_eq!(json(&input), r#"{"x": [""]}"#);
        let input = format!("{}a{}\n", "[".repeat(200_000), "]".repeat(200_000));
        assert_eq!(json(&input), r#"["a"]"#);
    }

    #[test]
    fn test_inline_collection_replaces_level() {
        assert_eq!(json("list:\n  [1, 2]\n"), r#"{"list": [1,2]}"#);
        assert_eq!(json("a: 1\n[x]\n"), r#"["x"]"#);
    }

    #[test]
    fn test_conflicting_forms_are_ignored() {
        assert_eq!(json("a: 1\n- b\n"), r#"{"a": 1}"#);
        assert_eq!(json("- a\nb: 1\n"), r#"["a"]"#);
    }

    #[test]
    fn test_keys_are_normalized() {
        assert_eq!(json("\"quoted\": 1\nyes: 2\n007: 3"), r#"{"quoted": 1,"true": 2,"7": 3}"#);
        assert_eq!(json("a: 1\na: 2\nb: 3"), r#"{"a": 2,"b": 3}"#);
    }

    #[test]
    fn test_comments_and_markers_are_ignored() {
        let input = "---\n# header\nname: x # trailing\n\n# between\nlist:\n  # inside\n  - a\n";
        assert_eq!(json(input), r#"{"name": "x","list": ["a"]}"#);
    }

    #[test]
    fn test_depth_limit() {
        let options = Options {
            max_depth: 2,
            ..Options::default()
        };
        let input = "a:\n  b:\n    c:\n      d: 1\n";
        let err = parse_with_options(input, Some("deep.yml"), &options).unwrap_err();
        assert_eq!(err.to_string(), "Nesting deeper than 2 levels at 4:1 of <deep.yml>");
        assert!(parse_with_options("a:\n  b:\n    c: 1\n", None, &options).is_ok());
    }
}
