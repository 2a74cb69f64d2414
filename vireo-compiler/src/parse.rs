use crate::ast::{Attr, AttrKind, Node};
use crate::error::ParseError;
use crate::lex::{Token, TokenAttr, TokenKind};

struct Frame {
    tag: String,
    attrs: Vec<Attr>,
    children: Vec<Node>,
    /// Wrapper tag from a `#Component` attribute; the wrapper closes
    /// together with this element.
    wrapper: Option<String>,
    pos: usize,
}

/// Build the tree from the token stream with an explicit stack of open
/// elements over a root sentinel. Mismatched or unmatched closing tags and
/// elements left open at the end of input are hard errors.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Node>, ParseError> {
    let mut stack: Vec<Frame> = vec![Frame {
        tag: String::new(),
        attrs: Vec::new(),
        children: Vec::new(),
        wrapper: None,
        pos: 0,
    }];

    for token in tokens {
        match token.kind {
            TokenKind::TagOpen {
                name,
                attributes,
                self_closing,
            } => {
                let (attrs, wrapper) = convert_attrs(attributes);
                if self_closing {
                    let node = wrap(
                        Node::Element {
                            tag: name,
                            attrs,
                            children: Vec::new(),
                            self_closing: true,
                        },
                        wrapper,
                    );
                    attach(&mut stack, node);
                } else {
                    stack.push(Frame {
                        tag: name,
                        attrs,
                        children: Vec::new(),
                        wrapper,
                        pos: token.pos,
                    });
                }
            }
            TokenKind::TagClose { name } => {
                if stack.len() == 1 {
                    return Err(ParseError {
                        index: token.pos,
                        expected: format!("an open element for `</{name}>`"),
                    });
                }
                let frame = stack.pop().expect("sentinel below");
                if frame.tag != name {
                    return Err(ParseError {
                        index: token.pos,
                        expected: format!("`</{}>`", frame.tag),
                    });
                }
                let node = wrap(
                    Node::Element {
                        tag: frame.tag,
                        attrs: frame.attrs,
                        children: frame.children,
                        self_closing: false,
                    },
                    frame.wrapper,
                );
                attach(&mut stack, node);
            }
            TokenKind::Text { content } => {
                if content.chars().all(char::is_whitespace) {
                    // Newline-bearing whitespace exists only for line
                    // numbering; it is never a visible text node.
                    if content.contains('\n') {
                        continue;
                    }
                    attach(&mut stack, Node::Text(" ".to_string()));
                } else {
                    attach(&mut stack, Node::Text(content));
                }
            }
            TokenKind::Expression { expression } => {
                attach(&mut stack, Node::Interpolation(expression.trim().to_string()));
            }
            TokenKind::Comment { .. } => {}
        }
    }

    if stack.len() > 1 {
        let frame = stack.last().expect("unclosed frame");
        return Err(ParseError {
            index: frame.pos,
            expected: format!("`</{}>`", frame.tag),
        });
    }

    let mut roots = stack.pop().expect("sentinel").children;
    roots.retain(|n| match n {
        Node::Text(t) => !t.chars().all(char::is_whitespace),
        _ => true,
    });
    Ok(roots)
}

fn attach(stack: &mut Vec<Frame>, node: Node) {
    stack.last_mut().expect("sentinel").children.push(node);
}

/// A `#Name` attribute rewinds the element into a wrapper: the element
/// (minus that attribute) becomes the single child of a new `Name` node.
fn wrap(node: Node, wrapper: Option<String>) -> Node {
    match wrapper {
        Some(tag) => Node::Element {
            tag,
            attrs: Vec::new(),
            children: vec![node],
            self_closing: false,
        },
        None => node,
    }
}

fn convert_attrs(attributes: Vec<TokenAttr>) -> (Vec<Attr>, Option<String>) {
    let mut attrs = Vec::with_capacity(attributes.len());
    let mut wrapper = None;
    for a in attributes {
        if let Some(name) = a.key.strip_prefix('#') {
            if wrapper.is_none() && !name.is_empty() {
                wrapper = Some(name.to_string());
            }
            continue;
        }
        if let Some(name) = a.key.strip_prefix('@') {
            attrs.push(Attr {
                name: name.to_string(),
                value: a.value,
                is_static: a.is_static,
                kind: AttrKind::Event,
            });
        } else {
            // A `:name` bind sigil is plain spelling for a dynamic value;
            // the delimiter already decided staticness.
            let name = a.key.strip_prefix(':').unwrap_or(&a.key).to_string();
            attrs.push(Attr {
                name,
                value: a.value,
                is_static: a.is_static,
                kind: AttrKind::Plain,
            });
        }
    }
    (attrs, wrapper)
}
