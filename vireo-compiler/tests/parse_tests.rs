use vireo_compiler::ast::{AttrKind, Node};
use vireo_compiler::lex::lex;
use vireo_compiler::parse::parse;

fn parse_str(src: &str) -> Vec<Node> {
    parse(lex(src).expect("lex")).expect("parse")
}

#[test]
fn parse_element_with_text() {
    let roots = parse_str("<div>hi</div>");
    assert_eq!(roots.len(), 1);
    match &roots[0] {
        Node::Element { tag, children, .. } => {
            assert_eq!(tag, "div");
            assert_eq!(children.len(), 1);
            assert!(matches!(&children[0], Node::Text(t) if t == "hi"));
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn parse_nested_elements() {
    let roots = parse_str("<div><span><b>x</b></span><p>y</p></div>");
    match &roots[0] {
        Node::Element { children, .. } => {
            assert_eq!(children.len(), 2);
            assert!(matches!(&children[0], Node::Element { tag, .. } if tag == "span"));
            assert!(matches!(&children[1], Node::Element { tag, .. } if tag == "p"));
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn parse_self_closing() {
    let roots = parse_str("<div><input/><br/></div>");
    match &roots[0] {
        Node::Element { children, .. } => {
            assert_eq!(children.len(), 2);
            assert!(matches!(&children[0], Node::Element { self_closing, .. } if *self_closing));
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn parse_text_and_interpolation() {
    let roots = parse_str("<p>Hello { name }</p>");
    match &roots[0] {
        Node::Element { children, .. } => {
            assert!(matches!(&children[0], Node::Text(t) if t == "Hello "));
            // Interpolation text is trimmed at parse time.
            assert!(matches!(&children[1], Node::Interpolation(e) if e == "name"));
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn parse_attr_kinds() {
    let roots = parse_str(r#"<input class="x" :value={count} @input="onInput"/>"#);
    match &roots[0] {
        Node::Element { attrs, .. } => {
            assert_eq!(attrs.len(), 3);
            assert!(attrs.iter().any(|a| a.kind == AttrKind::Plain
                && a.name == "class"
                && a.is_static));
            // The `:` sigil is stripped; the brace delimiter made it dynamic.
            assert!(attrs.iter().any(|a| a.kind == AttrKind::Plain
                && a.name == "value"
                && !a.is_static));
            assert!(attrs.iter().any(|a| a.kind == AttrKind::Event
                && a.name == "input"
                && a.value == "onInput"));
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn newline_whitespace_is_not_a_text_node() {
    let roots = parse_str("<div>\n  <p>x</p>\n</div>");
    match &roots[0] {
        Node::Element { children, .. } => {
            assert_eq!(children.len(), 1);
            assert!(matches!(&children[0], Node::Element { tag, .. } if tag == "p"));
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn inline_whitespace_is_kept_as_one_space() {
    let roots = parse_str("<p><b>a</b> <b>b</b></p>");
    match &roots[0] {
        Node::Element { children, .. } => {
            assert_eq!(children.len(), 3);
            assert!(matches!(&children[1], Node::Text(t) if t == " "));
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn comments_never_reach_the_tree() {
    let roots = parse_str("<div><!-- hidden -->x</div>");
    match &roots[0] {
        Node::Element { children, .. } => {
            assert_eq!(children.len(), 1);
            assert!(matches!(&children[0], Node::Text(t) if t == "x"));
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn mismatched_closing_tag_is_an_error() {
    let err = parse(lex("<div><p></div>").unwrap()).unwrap_err();
    assert_eq!(err.index, 8);
    assert_eq!(err.expected, "`</p>`");
}

#[test]
fn unclosed_element_is_an_error() {
    let err = parse(lex("<div><p>x").unwrap()).unwrap_err();
    assert_eq!(err.index, 5);
    assert_eq!(err.expected, "`</p>`");
}

#[test]
fn stray_closing_tag_is_an_error() {
    let err = parse(lex("x</p>").unwrap()).unwrap_err();
    assert_eq!(err.index, 1);
    assert_eq!(err.expected, "an open element for `</p>`");
}

#[test]
fn component_wrapper_attribute_rewinds() {
    let roots = parse_str(r#"<div #Card class="x">hi</div>"#);
    assert_eq!(roots.len(), 1);
    match &roots[0] {
        Node::Element {
            tag,
            attrs,
            children,
            ..
        } => {
            assert_eq!(tag, "Card");
            assert!(attrs.is_empty());
            assert_eq!(children.len(), 1);
            match &children[0] {
                Node::Element { tag, attrs, .. } => {
                    assert_eq!(tag, "div");
                    // The wrapper marker itself is gone.
                    assert_eq!(attrs.len(), 1);
                    assert_eq!(attrs[0].name, "class");
                }
                _ => panic!("expected inner div"),
            }
        }
        _ => panic!("expected wrapper element"),
    }
}

#[test]
fn wrapper_on_self_closing_element() {
    let roots = parse_str("<input #Field/>");
    match &roots[0] {
        Node::Element { tag, children, .. } => {
            assert_eq!(tag, "Field");
            assert!(matches!(&children[0], Node::Element { tag, .. } if tag == "input"));
        }
        _ => panic!("expected wrapper element"),
    }
}

#[test]
fn root_whitespace_is_trimmed() {
    let roots = parse_str(" <div/> ");
    assert_eq!(roots.len(), 1);
}
