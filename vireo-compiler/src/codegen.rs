use std::collections::HashMap;

use crate::ast::{Attr, AttrKind, BindingForm, Node, NodeClass};
use crate::error::GenerateError;

/// Tag names that resolve to literal render-target elements. A tag outside
/// this set is a reference to a user-defined component function and is
/// emitted as a call instead of an `h("...")` construction.
pub const BUILTIN_TAGS: &[&str] = &[
    "a", "article", "aside", "b", "blockquote", "br", "button", "code", "dd", "div", "dl", "dt",
    "em", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "i", "img", "input", "label",
    "li", "main", "nav", "ol", "option", "p", "pre", "section", "select", "small", "span",
    "strong", "table", "tbody", "td", "textarea", "th", "thead", "tr", "ul",
];

pub fn is_builtin_tag(name: &str) -> bool {
    BUILTIN_TAGS.contains(&name)
}

/// Temp-variable slots for one compile unit. Indices are allocated strictly
/// increasing and never reused, so hoisted names stay collision-free across
/// nested hoists and across every island in a file.
#[derive(Debug, Default)]
pub struct TempAlloc {
    next: usize,
}

impl TempAlloc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self) -> String {
        let n = self.next;
        self.next += 1;
        format!("__v{n}")
    }

    pub fn allocated(&self) -> usize {
        self.next
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticPart {
    pub name: String,
    pub prelude: String,
    pub code: String,
}

/// Hoisted static subtrees, keyed by their generated code text. Identical
/// text anywhere in the compile unit shares one slot and one name; the
/// collision is the dedup optimization. `used` tracks which parts the current
/// island referenced, in first-use order, so the driver can emit exactly
/// the declarations that island needs.
#[derive(Debug, Default)]
pub struct StaticParts {
    parts: Vec<StaticPart>,
    by_code: HashMap<String, usize>,
    used: Vec<usize>,
}

impl StaticParts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hoist(&mut self, temps: &mut TempAlloc, prelude: String, code: String) -> String {
        let idx = match self.by_code.get(&code) {
            Some(&idx) => idx,
            None => {
                let name = temps.alloc();
                self.parts.push(StaticPart {
                    name,
                    prelude,
                    code: code.clone(),
                });
                self.by_code.insert(code, self.parts.len() - 1);
                self.parts.len() - 1
            }
        };
        if !self.used.contains(&idx) {
            self.used.push(idx);
        }
        self.parts[idx].name.clone()
    }

    /// Parts referenced since the last call, in first-use order.
    pub fn take_used(&mut self) -> Vec<StaticPart> {
        let used = std::mem::take(&mut self.used);
        used.into_iter().map(|i| self.parts[i].clone()).collect()
    }

    pub fn parts(&self) -> &[StaticPart] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Output of generating one subtree: statements that must run before the
/// expression, the expression itself, and whether the whole subtree is
/// compile-time constant. Preludes are empty or end with a space, so they
/// concatenate cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct GenResult {
    pub prelude: String,
    pub code: String,
    pub is_static: bool,
    /// True when `code` evaluates to `Vec<VNode>` (loops) rather than a
    /// single node.
    pub is_list: bool,
}

/// Generate a single node (with no sibling chain to consume).
pub fn generate(
    node: &Node,
    temps: &mut TempAlloc,
    statics: &mut StaticParts,
) -> Result<GenResult, GenerateError> {
    let mut results = generate_nodes(std::slice::from_ref(node), temps, statics)?;
    Ok(results.remove(0))
}

/// Generate a sibling list. An `if` consumes its following `else-if`/`else`
/// siblings into one conditional here, so the list never produces a
/// dangling arm twice.
pub fn generate_nodes(
    nodes: &[Node],
    temps: &mut TempAlloc,
    statics: &mut StaticParts,
) -> Result<Vec<GenResult>, GenerateError> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < nodes.len() {
        match nodes[i].classify() {
            NodeClass::ControlIf { .. } | NodeClass::ControlElseIf { .. } | NodeClass::ControlElse => {
                let (r, consumed) = gen_conditional(&nodes[i..], temps, statics)?;
                out.push(r);
                i += consumed;
            }
            NodeClass::ControlFor { .. } => {
                out.push(gen_for(&nodes[i], temps, statics)?);
                i += 1;
            }
            NodeClass::Element { .. } => {
                out.push(gen_element(&nodes[i], temps, statics)?);
                i += 1;
            }
            NodeClass::Text(t) => {
                out.push(GenResult {
                    prelude: String::new(),
                    code: format!("text({})", string_lit(t)),
                    is_static: true,
                    is_list: false,
                });
                i += 1;
            }
            NodeClass::Interpolation(e) => {
                out.push(GenResult {
                    prelude: String::new(),
                    code: format!("text(format!(\"{{}}\", {e}))"),
                    is_static: false,
                    is_list: false,
                });
                i += 1;
            }
        }
    }
    Ok(out)
}

/// Generate the root of a view island: exactly one logical value, hoisted
/// when the whole subtree is static.
pub fn generate_root(
    nodes: &[Node],
    temps: &mut TempAlloc,
    statics: &mut StaticParts,
) -> Result<GenResult, GenerateError> {
    let mut results = generate_nodes(nodes, temps, statics)?;
    if results.len() != 1 {
        return Err(GenerateError::new("a view island must have a single root"));
    }
    let result = results.pop().expect("one result");
    Ok(hoisted_reference(result, temps, statics))
}

/// The hoisting rule: a fully static subtree is not inlined at its point of
/// use; it registers in the static-parts table and only a reference to the
/// shared temp variable is emitted.
fn hoisted_reference(
    r: GenResult,
    temps: &mut TempAlloc,
    statics: &mut StaticParts,
) -> GenResult {
    if r.is_static && !r.is_list {
        let name = statics.hoist(temps, r.prelude, r.code);
        GenResult {
            prelude: String::new(),
            code: format!("{name}.clone()"),
            is_static: true,
            is_list: false,
        }
    } else {
        r
    }
}

fn gen_element(
    node: &Node,
    temps: &mut TempAlloc,
    statics: &mut StaticParts,
) -> Result<GenResult, GenerateError> {
    let Node::Element {
        tag,
        attrs,
        children,
        ..
    } = node
    else {
        unreachable!("gen_element on non-element");
    };

    let mut props = String::from("Props::new()");
    let mut attrs_static = true;
    for a in attrs {
        if !a.is_static {
            attrs_static = false;
        }
        props.push_str(&emit_attr(a));
    }

    let child_results = generate_nodes(children, temps, statics)?;
    let is_component = !is_builtin_tag(tag);
    let node_static = !is_component
        && attrs_static
        && child_results.iter().all(|r| r.is_static && !r.is_list);

    if node_static {
        let kids: Vec<String> = child_results.into_iter().map(|r| r.code).collect();
        return Ok(GenResult {
            prelude: String::new(),
            code: format!("h(\"{tag}\", {props}, vec![{}])", kids.join(", ")),
            is_static: true,
            is_list: false,
        });
    }

    // Dynamic node: static children are still hoisted individually, so an
    // unchanged subtree is never rebuilt just because a sibling changed.
    let mut prelude = String::new();
    let children_expr = if child_results.is_empty() {
        "vec![]".to_string()
    } else if child_results.iter().any(|r| r.is_list) {
        let cvar = temps.alloc();
        prelude.push_str(&format!("let mut {cvar}: Vec<VNode> = Vec::new(); "));
        for r in child_results {
            let r = hoisted_reference(r, temps, statics);
            if r.is_list {
                prelude.push_str(&format!("{}{cvar}.extend({}); ", r.prelude, r.code));
            } else {
                prelude.push_str(&format!("{}{cvar}.push({}); ", r.prelude, r.code));
            }
        }
        cvar
    } else {
        let mut codes = Vec::with_capacity(child_results.len());
        for r in child_results {
            let r = hoisted_reference(r, temps, statics);
            prelude.push_str(&r.prelude);
            codes.push(r.code);
        }
        format!("vec![{}]", codes.join(", "))
    };

    let code = if is_component {
        format!("{tag}({props}, {children_expr})")
    } else {
        format!("h(\"{tag}\", {props}, {children_expr})")
    };
    Ok(GenResult {
        prelude,
        code,
        is_static: false,
        is_list: false,
    })
}

fn emit_attr(a: &Attr) -> String {
    match a.kind {
        AttrKind::Event => {
            if a.is_static {
                format!(".on(\"{}\", {})", a.name, string_lit(&a.value))
            } else {
                format!(".on(\"{}\", format!(\"{{}}\", {}))", a.name, a.value)
            }
        }
        AttrKind::Plain => match a.name.as_str() {
            "key" => {
                if a.is_static {
                    format!(".key({})", string_lit(&a.value))
                } else {
                    format!(".key(format!(\"{{}}\", {}))", a.value)
                }
            }
            "style" => {
                if a.is_static {
                    // Split the declaration list at compile time.
                    let mut out = String::new();
                    for decl in a.value.split(';') {
                        let d = decl.trim();
                        if d.is_empty() {
                            continue;
                        }
                        if let Some((k, v)) = d.split_once(':') {
                            out.push_str(&format!(
                                ".style(\"{}\", {})",
                                k.trim(),
                                string_lit(v.trim())
                            ));
                        }
                    }
                    out
                } else {
                    format!(".style_str(format!(\"{{}}\", {}))", a.value)
                }
            }
            _ => {
                if a.is_static {
                    format!(".set(\"{}\", {})", a.name, string_lit(&a.value))
                } else {
                    format!(".set(\"{}\", format!(\"{{}}\", {}))", a.name, a.value)
                }
            }
        },
    }
}

/// Emit an `if`/`else-if`/`else` chain as one conditional with exactly two
/// or more arms and a synthesized empty-text else, so the produced value
/// exists on every evaluation. Consumes the chained siblings from `run`;
/// returns how many nodes it ate.
fn gen_conditional(
    run: &[Node],
    temps: &mut TempAlloc,
    statics: &mut StaticParts,
) -> Result<(GenResult, usize), GenerateError> {
    let first = &run[0];
    let first_cond = match first.classify() {
        NodeClass::ControlIf { condition } => require_cond(condition, "if")?,
        // A dangling else-if behaves as its own isolated conditional.
        NodeClass::ControlElseIf { condition } => require_cond(condition, "else-if")?,
        NodeClass::ControlElse => {
            // A dangling else renders its body unconditionally.
            let body = arm_body(first, temps, statics)?;
            return Ok((
                GenResult {
                    prelude: body.prelude,
                    code: body.code,
                    is_static: false,
                    is_list: false,
                },
                1,
            ));
        }
        _ => unreachable!("gen_conditional on non-conditional"),
    };

    let mut arms: Vec<(String, GenResult)> =
        vec![(first_cond.to_string(), arm_body(first, temps, statics)?)];
    let mut else_arm: Option<GenResult> = None;
    let mut consumed = 1;
    while consumed < run.len() {
        match run[consumed].classify() {
            NodeClass::ControlElseIf { condition } => {
                let cond = require_cond(condition, "else-if")?.to_string();
                arms.push((cond, arm_body(&run[consumed], temps, statics)?));
                consumed += 1;
            }
            NodeClass::ControlElse => {
                else_arm = Some(arm_body(&run[consumed], temps, statics)?);
                consumed += 1;
                break;
            }
            _ => break,
        }
    }

    let var = temps.alloc();
    let mut s = format!("let {var} = ");
    for (idx, (cond, body)) in arms.iter().enumerate() {
        if idx > 0 {
            s.push_str(" else ");
        }
        s.push_str(&format!("if ({cond}) {{ {}{} }}", body.prelude, body.code));
    }
    match &else_arm {
        Some(body) => s.push_str(&format!(" else {{ {}{} }}; ", body.prelude, body.code)),
        None => s.push_str(" else { text(String::new()) }; "),
    }

    Ok((
        GenResult {
            prelude: s,
            code: var,
            is_static: false,
            is_list: false,
        },
        consumed,
    ))
}

fn require_cond<'a>(condition: Option<&'a str>, kind: &str) -> Result<&'a str, GenerateError> {
    condition
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| GenerateError::new(format!("`{kind}` requires a `cond` attribute")))
}

fn arm_body(
    node: &Node,
    temps: &mut TempAlloc,
    statics: &mut StaticParts,
) -> Result<GenResult, GenerateError> {
    let mut results = generate_nodes(node.children(), temps, statics)?;
    match results.len() {
        0 => Ok(GenResult {
            prelude: String::new(),
            code: "text(String::new())".to_string(),
            is_static: false,
            is_list: false,
        }),
        1 => {
            let r = results.pop().expect("one result");
            if r.is_list {
                return Err(GenerateError::new(
                    "a conditional arm must produce a single node, not a list",
                ));
            }
            Ok(hoisted_reference(r, temps, statics))
        }
        _ => Err(GenerateError::new(
            "a conditional arm must contain a single root node",
        )),
    }
}

/// `<for each={value, index} of={expr}>` iterates values with indices;
/// `<for each={key, value} in={expr}>` iterates key/value pairs. Bindings
/// are captured per iteration; results collect into a fresh list on every
/// render.
fn gen_for(
    node: &Node,
    temps: &mut TempAlloc,
    statics: &mut StaticParts,
) -> Result<GenResult, GenerateError> {
    let NodeClass::ControlFor {
        bindings,
        iterable,
        form,
    } = node.classify()
    else {
        unreachable!("gen_for on non-loop");
    };

    let iterable = iterable
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GenerateError::new("`for` requires an `of` or `in` attribute"))?;
    let bindings = bindings
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GenerateError::new("`for` requires an `each` attribute"))?;
    let names: Vec<&str> = bindings.split(',').map(str::trim).collect();
    if names.iter().any(|n| n.is_empty()) {
        return Err(GenerateError::new("empty binding in `each`"));
    }

    let header = match (form, names.len()) {
        (BindingForm::ValueIndex, 1) => {
            format!("for {} in ({iterable}).into_iter()", names[0])
        }
        (BindingForm::ValueIndex, 2) => format!(
            "for ({}, {}) in ({iterable}).into_iter().enumerate()",
            names[1], names[0]
        ),
        (BindingForm::KeyValue, 2) => {
            format!("for ({}, {}) in ({iterable})", names[0], names[1])
        }
        (BindingForm::KeyValue, _) => {
            return Err(GenerateError::new(
                "`for ... in` requires `each={key, value}` bindings",
            ));
        }
        (BindingForm::ValueIndex, _) => {
            return Err(GenerateError::new(
                "`for ... of` takes one or two `each` bindings",
            ));
        }
    };

    let var = temps.alloc();
    let body_results = generate_nodes(node.children(), temps, statics)?;
    let mut body = String::new();
    for r in body_results {
        let r = hoisted_reference(r, temps, statics);
        if r.is_list {
            body.push_str(&format!("{}{var}.extend({}); ", r.prelude, r.code));
        } else {
            body.push_str(&format!("{}{var}.push({}); ", r.prelude, r.code));
        }
    }

    let prelude = format!("let mut {var}: Vec<VNode> = Vec::new(); {header} {{ {body}}} ");
    Ok(GenResult {
        prelude,
        code: var,
        is_static: false,
        is_list: true,
    })
}

/// Escape a text run into a Rust string literal.
pub fn string_lit(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
