use std::fmt;

use crate::error::LexError;

/// How an attribute value was delimited in source. Recorded so tokens can
/// be re-serialized into the exact span they were scanned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delim {
    Double,
    Single,
    Brace,
    Bare,
    /// No `=` at all: implicit boolean-true attribute.
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenAttr {
    pub key: String,
    pub value: String,
    /// Decided lexically, once: quoted, bare and boolean values are static;
    /// brace-delimited expressions are dynamic. Never re-derived later.
    pub is_static: bool,
    pub delim: Delim,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    TagOpen {
        name: String,
        attributes: Vec<TokenAttr>,
        self_closing: bool,
    },
    TagClose {
        name: String,
    },
    Text {
        content: String,
    },
    /// Top-level `{...}` interpolation used as text content.
    Expression {
        expression: String,
    },
    /// Carried through lexing for lossless re-serialization; the parser
    /// drops these, so they never reach the tree.
    Comment {
        content: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Byte offset of the first character of the span.
    pub pos: usize,
    pub kind: TokenKind,
}

/// Single left-to-right pass over view-syntax text. No lookahead beyond
/// finding a construct's closing delimiter; no recovery on failure.
pub fn lex(input: &str) -> Result<Vec<Token>, LexError> {
    let bytes = input.as_bytes();
    let mut i = 0usize;
    let mut tokens = Vec::new();

    while i < bytes.len() {
        if input[i..].starts_with("<!--") {
            let start = i;
            let Some(end) = input[i + 4..].find("-->") else {
                return Err(LexError {
                    index: start,
                    expected: "-->",
                });
            };
            let content = input[i + 4..i + 4 + end].to_string();
            tokens.push(Token {
                pos: start,
                kind: TokenKind::Comment { content },
            });
            i += 4 + end + 3;
        } else if input[i..].starts_with("</") {
            let start = i;
            i += 2;
            let name = read_ident(bytes, &mut i);
            if name.is_empty() {
                return Err(LexError {
                    index: start,
                    expected: "tag name",
                });
            }
            skip_ws(bytes, &mut i);
            if i >= bytes.len() || bytes[i] != b'>' {
                return Err(LexError {
                    index: start,
                    expected: ">",
                });
            }
            i += 1;
            tokens.push(Token {
                pos: start,
                kind: TokenKind::TagClose { name },
            });
        } else if bytes[i] == b'<' {
            let start = i;
            i += 1;
            let name = read_ident(bytes, &mut i);
            if name.is_empty() {
                return Err(LexError {
                    index: start,
                    expected: "tag name",
                });
            }
            let mut attributes = Vec::new();
            let mut self_closing = false;
            loop {
                skip_ws(bytes, &mut i);
                if i >= bytes.len() {
                    return Err(LexError {
                        index: start,
                        expected: ">",
                    });
                }
                match bytes[i] {
                    b'/' => {
                        i += 1;
                        skip_ws(bytes, &mut i);
                        if i >= bytes.len() || bytes[i] != b'>' {
                            return Err(LexError {
                                index: start,
                                expected: ">",
                            });
                        }
                        i += 1;
                        self_closing = true;
                        break;
                    }
                    b'>' => {
                        i += 1;
                        break;
                    }
                    _ => attributes.push(read_attribute(input, &mut i)?),
                }
            }
            tokens.push(Token {
                pos: start,
                kind: TokenKind::TagOpen {
                    name,
                    attributes,
                    self_closing,
                },
            });
        } else if bytes[i] == b'{' {
            let start = i;
            let expression = scan_expression(input, &mut i)?;
            tokens.push(Token {
                pos: start,
                kind: TokenKind::Expression { expression },
            });
        } else {
            let start = i;
            while i < bytes.len() && bytes[i] != b'<' && bytes[i] != b'{' {
                i += 1;
            }
            tokens.push(Token {
                pos: start,
                kind: TokenKind::Text {
                    content: input[start..i].to_string(),
                },
            });
        }
    }

    Ok(tokens)
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn read_ident(bytes: &[u8], i: &mut usize) -> String {
    let start = *i;
    while *i < bytes.len() {
        let c = bytes[*i];
        if c.is_ascii_alphanumeric() || c == b'_' || c == b'-' {
            *i += 1;
        } else {
            break;
        }
    }
    String::from_utf8_lossy(&bytes[start..*i]).into_owned()
}

/// Attribute key: a bare identifier allowing bind-prefix sigils (`@`, `#`,
/// `:`). Value: double-quoted, single-quoted, brace-delimited expression,
/// or a bare run up to whitespace / `/` / `>`; a key with no `=` becomes
/// implicit boolean true.
fn read_attribute(input: &str, i: &mut usize) -> Result<TokenAttr, LexError> {
    let bytes = input.as_bytes();
    let key_start = *i;
    while *i < bytes.len() {
        let c = bytes[*i];
        if c.is_ascii_alphanumeric() || matches!(c, b'_' | b'-' | b'@' | b'#' | b':') {
            *i += 1;
        } else {
            break;
        }
    }
    if *i == key_start {
        return Err(LexError {
            index: *i,
            expected: "attribute name",
        });
    }
    let key = input[key_start..*i].to_string();

    skip_ws(bytes, i);
    if *i >= bytes.len() || bytes[*i] != b'=' {
        return Ok(TokenAttr {
            key,
            value: "true".to_string(),
            is_static: true,
            delim: Delim::Missing,
        });
    }
    *i += 1;
    skip_ws(bytes, i);
    if *i >= bytes.len() {
        return Err(LexError {
            index: key_start,
            expected: "attribute value",
        });
    }

    match bytes[*i] {
        q @ (b'"' | b'\'') => {
            let value_start = *i;
            *i += 1;
            let start = *i;
            while *i < bytes.len() && bytes[*i] != q {
                *i += 1;
            }
            if *i >= bytes.len() {
                return Err(LexError {
                    index: value_start,
                    expected: if q == b'"' { "\"" } else { "'" },
                });
            }
            let value = input[start..*i].to_string();
            *i += 1;
            Ok(TokenAttr {
                key,
                value,
                is_static: true,
                delim: if q == b'"' { Delim::Double } else { Delim::Single },
            })
        }
        b'{' => {
            let value = scan_expression(input, i)?;
            Ok(TokenAttr {
                key,
                value,
                is_static: false,
                delim: Delim::Brace,
            })
        }
        _ => {
            let start = *i;
            while *i < bytes.len()
                && !bytes[*i].is_ascii_whitespace()
                && bytes[*i] != b'/'
                && bytes[*i] != b'>'
            {
                *i += 1;
            }
            if *i == start {
                return Err(LexError {
                    index: start,
                    expected: "attribute value",
                });
            }
            Ok(TokenAttr {
                key,
                value: input[start..*i].to_string(),
                is_static: true,
                delim: Delim::Bare,
            })
        }
    }
}

/// Scan a `{...}`-delimited embedded expression starting at the opening
/// brace. Nested braces are balanced; quoted strings inside the expression
/// are skipped as opaque spans so their own braces and quotes cannot
/// terminate the scan early. Returns the inner text, cursor past `}`.
fn scan_expression(input: &str, i: &mut usize) -> Result<String, LexError> {
    let bytes = input.as_bytes();
    let open = *i;
    *i += 1;
    let start = *i;
    let mut depth = 1usize;
    while *i < bytes.len() {
        match bytes[*i] {
            b'{' => {
                depth += 1;
                *i += 1;
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let inner = input[start..*i].to_string();
                    *i += 1;
                    return Ok(inner);
                }
                *i += 1;
            }
            b'"' | b'\'' => skip_string(bytes, i)?,
            _ => *i += 1,
        }
    }
    Err(LexError {
        index: open,
        expected: "}",
    })
}

/// Skip a quoted string starting at the opening quote, honoring backslash
/// escapes. Cursor ends past the closing quote.
fn skip_string(bytes: &[u8], i: &mut usize) -> Result<(), LexError> {
    let quote = bytes[*i];
    let start = *i;
    *i += 1;
    while *i < bytes.len() {
        if bytes[*i] == b'\\' {
            *i += 2;
        } else if bytes[*i] == quote {
            *i += 1;
            return Ok(());
        } else {
            *i += 1;
        }
    }
    Err(LexError {
        index: start,
        expected: if quote == b'"' { "\"" } else { "'" },
    })
}

impl fmt::Display for TokenAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.delim {
            Delim::Missing => write!(f, "{}", self.key),
            Delim::Double => write!(f, "{}=\"{}\"", self.key, self.value),
            Delim::Single => write!(f, "{}='{}'", self.key, self.value),
            Delim::Brace => write!(f, "{}={{{}}}", self.key, self.value),
            Delim::Bare => write!(f, "{}={}", self.key, self.value),
        }
    }
}

// Re-serialization: a token prints back to the source span it was scanned
// from (modulo insignificant whitespace inside tags).
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::TagOpen {
                name,
                attributes,
                self_closing,
            } => {
                write!(f, "<{name}")?;
                for a in attributes {
                    write!(f, " {a}")?;
                }
                if *self_closing {
                    write!(f, "/>")
                } else {
                    write!(f, ">")
                }
            }
            TokenKind::TagClose { name } => write!(f, "</{name}>"),
            TokenKind::Text { content } => write!(f, "{content}"),
            TokenKind::Expression { expression } => write!(f, "{{{expression}}}"),
            TokenKind::Comment { content } => write!(f, "<!--{content}-->"),
        }
    }
}
