/// How an attribute binds, derived from its key sigil at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    /// Plain attribute, e.g. `class="app"` or `color={c}`.
    Plain,
    /// Event binding, e.g. `@click="inc"`.
    Event,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub name: String,
    pub value: String,
    /// Carried over from the token, never re-derived.
    pub is_static: bool,
    pub kind: AttrKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element {
        tag: String,
        attrs: Vec<Attr>,
        children: Vec<Node>,
        self_closing: bool,
    },
    Text(String),
    Interpolation(String),
}

/// Iteration form of a `<for>` construct: `of` walks values with their
/// indices, `in` walks key/value pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingForm {
    ValueIndex,
    KeyValue,
}

/// The logical view of a node that the generator dispatches on. Control
/// constructs are ordinary elements in the tree; this projection is where
/// `<if>`/`<else-if>`/`<else>`/`<for>` stop being tag names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeClass<'a> {
    ControlIf {
        condition: Option<&'a str>,
    },
    ControlElseIf {
        condition: Option<&'a str>,
    },
    ControlElse,
    ControlFor {
        bindings: Option<&'a str>,
        iterable: Option<&'a str>,
        form: BindingForm,
    },
    Element {
        tag: &'a str,
    },
    Text(&'a str),
    Interpolation(&'a str),
}

impl Node {
    pub fn classify(&self) -> NodeClass<'_> {
        match self {
            Node::Text(t) => NodeClass::Text(t),
            Node::Interpolation(e) => NodeClass::Interpolation(e),
            Node::Element { tag, attrs, .. } => match tag.as_str() {
                "if" => NodeClass::ControlIf {
                    condition: attr_value(attrs, "cond"),
                },
                "else-if" => NodeClass::ControlElseIf {
                    condition: attr_value(attrs, "cond"),
                },
                "else" => NodeClass::ControlElse,
                "for" => {
                    let (iterable, form) = match attr_value(attrs, "of") {
                        Some(v) => (Some(v), BindingForm::ValueIndex),
                        None => (attr_value(attrs, "in"), BindingForm::KeyValue),
                    };
                    NodeClass::ControlFor {
                        bindings: attr_value(attrs, "each"),
                        iterable,
                        form,
                    }
                }
                _ => NodeClass::Element { tag },
            },
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element { children, .. } => children,
            _ => &[],
        }
    }
}

fn attr_value<'a>(attrs: &'a [Attr], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|a| a.kind == AttrKind::Plain && a.name == name)
        .map(|a| a.value.as_str())
}
