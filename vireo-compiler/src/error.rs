use std::fmt::Write as _;

/// Unterminated construct found while scanning. `index` is the byte offset
/// of the construct that never closed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("expected `{expected}` at offset {index}")]
pub struct LexError {
    pub index: usize,
    pub expected: &'static str,
}

/// Malformed nesting or an unexpected token. `index` is the byte offset of
/// the token that could not be consumed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected} at offset {index}")]
pub struct ParseError {
    pub index: usize,
    pub expected: String,
}

/// A malformed control construct reached the generator.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct GenerateError {
    pub message: String,
}

impl GenerateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Any stage failure. All three stages return structured values; nothing is
/// thrown across stage boundaries.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl CompileError {
    /// Byte offset of the fault, when the stage recorded one.
    pub fn index(&self) -> Option<usize> {
        match self {
            CompileError::Lex(e) => Some(e.index),
            CompileError::Parse(e) => Some(e.index),
            CompileError::Generate(_) => None,
        }
    }
}

/// A compile failure mapped back onto the whole source file by the driver.
/// The rendered form frames the fault with its surrounding lines and a
/// caret under the offending column.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{rendered}")]
pub struct SourceError {
    pub index: usize,
    pub message: String,
    pub rendered: String,
}

impl SourceError {
    pub fn new(source: &str, index: usize, message: impl Into<String>) -> Self {
        let message = message.into();
        let rendered = format_source_error(source, index, &message);
        Self {
            index,
            message,
            rendered,
        }
    }
}

/// Render `message` against `source` at byte offset `index`: the previous
/// line, the offending line with a caret under the column, and the next
/// line, each numbered.
pub fn format_source_error(source: &str, index: usize, message: &str) -> String {
    let index = index.min(source.len());
    let lines: Vec<&str> = source.split('\n').collect();

    // Locate the line holding `index` and the column within it.
    let mut line_no = 0usize;
    let mut line_start = 0usize;
    let mut consumed = 0usize;
    for (n, line) in lines.iter().enumerate() {
        let end = consumed + line.len();
        if index <= end {
            line_no = n;
            line_start = consumed;
            break;
        }
        consumed = end + 1; // past the newline
        line_no = n;
        line_start = consumed;
    }
    let column = source[line_start..index].chars().count();

    let gutter = (line_no + 2).to_string().len().max(2);
    let mut out = String::new();
    let _ = writeln!(out, "error: {message} at line {}, column {}", line_no + 1, column + 1);
    if line_no > 0 {
        let _ = writeln!(out, "{:>gutter$} | {}", line_no, lines[line_no - 1]);
    }
    let _ = writeln!(out, "{:>gutter$} | {}", line_no + 1, lines[line_no]);
    let _ = writeln!(out, "{:>gutter$} | {}^", "", " ".repeat(column));
    if line_no + 1 < lines.len() {
        let _ = writeln!(out, "{:>gutter$} | {}", line_no + 2, lines[line_no + 1]);
    }
    out
}
