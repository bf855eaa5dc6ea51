//! Phase 1: Scanner
//!
//! The scanner converts raw source text into scan lines. It performs:
//! - Comment stripping
//! - Indentation counting
//! - Removal of blank lines and `---` document markers
//! - Block scalar tracking, so lines inside a `|` or `>` block keep their
//!   blank lines and comment-like text
//!
//! The returned lines always end with a backstop line (empty, indent 0)
//! that terminates every range scan in the parser.

/// A single line after the scanning phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanLine {
    /// Content after indent, with any comment removed.
    pub line: String,
    /// Number of leading whitespace characters.
    pub indent: usize,
    /// Zero-based line number for error reporting.
    pub line_num: usize,
}

impl ScanLine {
    /// Content with surrounding whitespace removed.
    pub fn text(&self) -> &str {
        self.line.trim()
    }

    /// Blank lines only survive scanning inside block scalars.
    pub fn is_blank(&self) -> bool {
        self.text().is_empty()
    }

    fn backstop(line_num: usize) -> Self {
        Self {
            line: String::new(),
            indent: 0,
            line_num,
        }
    }
}

/// Scan source text into scan lines.
pub fn scan(source: &str) -> Vec<ScanLine> {
    let mut lines = Vec::new();
    // Indent of the line that opened the current block scalar.
    let mut block: Option<usize> = None;
    let mut line_count = 0;

    for (line_num, raw) in source.split('\n').enumerate() {
        line_count = line_num + 1;
        let raw = raw.strip_suffix('\r').unwrap_or(raw);

        if let Some(block_indent) = block {
            let indent = count_indent(raw);
            if raw.trim().is_empty() {
                lines.push(ScanLine {
                    line: String::new(),
                    indent,
                    line_num,
                });
                continue;
            }
            if indent > block_indent {
                lines.push(ScanLine {
                    line: skip_chars(raw, indent).to_string(),
                    indent,
                    line_num,
                });
                continue;
            }
            block = None;
        }

        let stripped = strip_comment(raw);
        let indent = count_indent(stripped);
        let rest = skip_chars(stripped, indent);
        let text = rest.trim_end();

        // Skip comment-only lines, blank lines, and document headers
        if text.is_empty() || text.starts_with("---") {
            continue;
        }

        if is_block_scalar_start(text) {
            block = Some(block_floor(indent, text));
        }

        lines.push(ScanLine {
            line: rest.to_string(),
            indent,
            line_num,
        });
    }

    lines.push(ScanLine::backstop(line_count));
    lines
}

/// Whether a line introduces a literal (`|`) or folded (`>`) block scalar.
pub fn is_block_scalar_start(text: &str) -> bool {
    text.ends_with('|') || text.ends_with('>')
}

/// Indent a block scalar's content must exceed.
///
/// Each `- ` marker in front of a keyed introducer shifts the floor by two,
/// the same adjustment the parser makes for sequence items. A keyless
/// `- |` keeps the marker's own indent.
fn block_floor(indent: usize, text: &str) -> usize {
    let mut floor = indent;
    let mut rest = text;
    while let Some(next) = rest.strip_prefix("- ") {
        let next = next.trim_start();
        if next == "|" || next == ">" {
            break;
        }
        floor += 2;
        rest = next;
    }
    floor
}

/// Count the leading whitespace characters of a line.
fn count_indent(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Drop the first `n` characters of a line.
fn skip_chars(line: &str, n: usize) -> &str {
    match line.char_indices().nth(n) {
        Some((offset, _)) => &line[offset..],
        None => "",
    }
}

/// Whether a character following `prev` starts a new token, which is
/// where quoted spans may open.
fn at_token_start(prev: Option<char>) -> bool {
    prev.map_or(true, |p| {
        p.is_whitespace() || matches!(p, '[' | '{' | ',' | ':')
    })
}

/// Remove a trailing comment.
///
/// The first `#` outside a quoted span opens a comment. Quotes only open
/// at the start of a token so that apostrophes in plain text do not hide
/// comments.
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;

    for (offset, ch) in line.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => {
                if ch == '#' {
                    return &line[..offset];
                }
                if (ch == '"' || ch == '\'') && at_token_start(prev) {
                    quote = Some(ch);
                }
            }
        }
        prev = Some(ch);
    }

    line
}
