use crate::codegen::{StaticParts, TempAlloc, generate_root};
use crate::error::{CompileError, SourceError};
use crate::lex::lex;
use crate::parse::parse;

/// Compile every view-syntax island in `input`, leaving everything else,
/// host comments and string literals included, byte-for-byte unchanged.
///
/// An island opens at a `(` followed, after whitespace, by `<`, and closes
/// at the matching `)`; nested parentheses and quoted strings inside the
/// island are skipped before deciding where it ends. Each island is
/// replaced by a single-line self-contained block expression (imports,
/// hoisted static declarations, prelude, root expression), padded with the
/// island's original newline count so line numbers downstream stay
/// accurate. The temp-variable counter and the static-parts table are
/// scoped to this one call; nothing persists across files.
pub fn compile_source(input: &str) -> Result<String, SourceError> {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut temps = TempAlloc::new();
    let mut statics = StaticParts::new();
    let mut islands = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let end = skip_host_string(bytes, i);
                out.push_str(&input[i..end]);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = input[i..].find('\n').map(|n| i + n).unwrap_or(bytes.len());
                out.push_str(&input[i..end]);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = skip_block_comment(input, i);
                out.push_str(&input[i..end]);
                i = end;
            }
            b'\'' if host_char_literal_len(bytes, i) > 0 => {
                let end = i + host_char_literal_len(bytes, i);
                out.push_str(&input[i..end]);
                i = end;
            }
            b'(' if island_opens_at(bytes, i) => {
                let close = find_island_end(input, i)?;
                let interior = &input[i + 1..close];
                let replacement = compile_island(input, interior, i + 1, &mut temps, &mut statics)?;
                let original_newlines = input[i..=close].matches('\n').count();
                out.push('(');
                out.push_str("{ use vireo_dom::*; ");
                out.push_str(&replacement);
                out.push_str(&"\n".repeat(original_newlines));
                out.push_str(" })");
                islands += 1;
                i = close + 1;
            }
            _ => {
                let ch = input[i..].chars().next().expect("in bounds");
                out.push(ch);
                i += ch.len_utf8();
            }
        }
    }

    log::debug!(
        "compiled {} island(s), {} hoisted static part(s)",
        islands,
        statics.len()
    );
    Ok(out)
}

/// `(` opens an island when the next non-whitespace byte is `<`.
fn island_opens_at(bytes: &[u8], open: usize) -> bool {
    let mut j = open + 1;
    while j < bytes.len() && bytes[j].is_ascii_whitespace() {
        j += 1;
    }
    j < bytes.len() && bytes[j] == b'<'
}

/// Find the `)` matching the `(` at `open`, skipping nested parentheses
/// and quoted strings (a `)` inside `')'` or `")"` must not end the island).
fn find_island_end(input: &str, open: usize) -> Result<usize, SourceError> {
    let bytes = input.as_bytes();
    let mut depth = 1usize;
    let mut k = open + 1;
    while k < bytes.len() {
        match bytes[k] {
            b'(' => {
                depth += 1;
                k += 1;
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(k);
                }
                k += 1;
            }
            b'"' | b'\'' => k = skip_host_string(bytes, k),
            _ => k += 1,
        }
    }
    Err(SourceError::new(input, open, "expected `)` closing this view island"))
}

/// Skip a quoted span starting at the opening quote, honoring backslash
/// escapes; returns the index past the closing quote (or end of input).
fn skip_host_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut k = start + 1;
    while k < bytes.len() {
        if bytes[k] == b'\\' {
            k += 2;
        } else if bytes[k] == quote {
            return k + 1;
        } else {
            k += 1;
        }
    }
    bytes.len()
}

/// Length of a host character literal (`'('`, `'\n'`) starting at `start`,
/// or 0 when the quote is something else, such as a lifetime. Only literal
/// quotes can hide a `(` or `"` from the island scan.
fn host_char_literal_len(bytes: &[u8], start: usize) -> usize {
    if bytes.get(start + 1) == Some(&b'\\') {
        if bytes.get(start + 3) == Some(&b'\'') {
            return 4;
        }
        return 0;
    }
    if bytes.get(start + 2) == Some(&b'\'') {
        return 3;
    }
    0
}

fn skip_block_comment(input: &str, start: usize) -> usize {
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut k = start;
    while k < bytes.len() {
        if input[k..].starts_with("/*") {
            depth += 1;
            k += 2;
        } else if input[k..].starts_with("*/") {
            depth -= 1;
            k += 2;
            if depth == 0 {
                return k;
            }
        } else {
            k += 1;
        }
    }
    bytes.len()
}

/// Lex, parse and generate one island. A failure in any stage is fatal for
/// the whole file; the error is mapped back onto the full source so the
/// rendered message frames the real line and column.
fn compile_island(
    source: &str,
    interior: &str,
    offset: usize,
    temps: &mut TempAlloc,
    statics: &mut StaticParts,
) -> Result<String, SourceError> {
    fn fail(source: &str, offset: usize, err: CompileError) -> SourceError {
        // The rendered frame supplies line/column; keep the message itself
        // positionless.
        let (rel, message) = match &err {
            CompileError::Lex(e) => (Some(e.index), format!("expected `{}`", e.expected)),
            CompileError::Parse(e) => (Some(e.index), format!("expected {}", e.expected)),
            CompileError::Generate(e) => (None, e.message.clone()),
        };
        SourceError::new(source, offset + rel.unwrap_or(0), message)
    }

    let tokens = match lex(interior) {
        Ok(t) => t,
        Err(e) => return Err(fail(source, offset, e.into())),
    };
    let nodes = match parse(tokens) {
        Ok(n) => n,
        Err(e) => return Err(fail(source, offset, e.into())),
    };
    let root = match generate_root(&nodes, temps, statics) {
        Ok(r) => r,
        Err(e) => return Err(fail(source, offset, e.into())),
    };

    let mut body = String::new();
    for part in statics.take_used() {
        body.push_str(&part.prelude);
        body.push_str(&format!("let {} = {}; ", part.name, part.code));
    }
    body.push_str(&root.prelude);
    body.push_str(&root.code);
    Ok(body)
}
