use std::collections::HashMap;

pub mod diff;

/// A virtual tree node. Built fresh on every render pass and never mutated
/// afterwards; the reconciler owns the previous generation only for the
/// duration of one diff.
#[derive(Debug, Clone, PartialEq)]
pub enum VNode {
    Element {
        tag: String,
        props: Props,
        children: Vec<VNode>,
    },
    Text(String),
}

impl VNode {
    /// Identity key for keyed list diffing, if the node carries one.
    pub fn key(&self) -> Option<&str> {
        match self {
            VNode::Element { props, .. } => props.key.as_deref(),
            VNode::Text(_) => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            VNode::Text(_) => None,
        }
    }
}

/// Node properties, separated by diff category: plain attributes, the
/// inline style map, and event bindings (event type -> handler name).
/// Each category follows its own update rule during reconciliation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Props {
    pub attrs: HashMap<String, String>,
    pub style: HashMap<String, String>,
    pub events: HashMap<String, String>,
    pub key: Option<String>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute. `key` and `style` are routed to their own
    /// categories so positional helpers like `From<Vec<(&str, &str)>>`
    /// behave the same as the dedicated builders.
    pub fn set(mut self, k: impl Into<String>, v: impl Into<String>) -> Self {
        let k = k.into();
        let v = v.into();
        match k.as_str() {
            "key" => self.key = Some(v),
            "style" => return self.style_str(v),
            _ => {
                self.attrs.insert(k, v);
            }
        }
        self
    }

    /// Set one inline style declaration.
    pub fn style(mut self, k: impl Into<String>, v: impl Into<String>) -> Self {
        self.style.insert(k.into(), v.into());
        self
    }

    /// Parse a `"k: v; k2: v2"` declaration list into the style map.
    pub fn style_str(mut self, s: impl AsRef<str>) -> Self {
        for decl in s.as_ref().split(';') {
            let d = decl.trim();
            if d.is_empty() {
                continue;
            }
            if let Some((k, v)) = d.split_once(':') {
                self.style.insert(k.trim().to_string(), v.trim().to_string());
            }
        }
        self
    }

    /// Bind an event type to a handler name.
    pub fn on(mut self, event: impl Into<String>, handler: impl Into<String>) -> Self {
        self.events.insert(event.into(), handler.into());
        self
    }

    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.key = Some(k.into());
        self
    }

    /// Serialize the style map, sorted by property name so output is stable.
    pub fn style_string(&self) -> String {
        style_to_string(&self.style)
    }
}

// Allow concise props creation in tests and call sites.
impl From<()> for Props {
    fn from(_: ()) -> Self {
        Props::default()
    }
}

impl From<Vec<(&str, &str)>> for Props {
    fn from(v: Vec<(&str, &str)>) -> Self {
        let mut p = Props::new();
        for (k, val) in v {
            p = p.set(k, val);
        }
        p
    }
}

pub fn h(tag: impl Into<String>, props: impl Into<Props>, children: Vec<VNode>) -> VNode {
    VNode::Element {
        tag: tag.into(),
        props: props.into(),
        children,
    }
}

pub fn text(t: impl Into<String>) -> VNode {
    VNode::Text(t.into())
}

/// Sorted `"k: v; k2: v2"` rendering of a style map.
pub fn style_to_string(style: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = style.keys().collect();
    keys.sort();
    keys.iter()
        .map(|k| format!("{}: {}", k, style[k.as_str()]))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_tree() {
        let node = h(
            "div",
            vec![("class", "app")],
            vec![text("hello"), h("span", (), vec![text("world")])],
        );
        if let VNode::Element {
            tag,
            props,
            children,
        } = node
        {
            assert_eq!(tag, "div");
            assert_eq!(props.attrs.get("class").unwrap(), "app");
            assert_eq!(children.len(), 2);
        } else {
            panic!("expected element");
        }
    }

    #[test]
    fn set_routes_key_and_style() {
        let p = Props::new()
            .set("key", "a")
            .set("style", "color: blue; margin: 4px")
            .set("id", "x");
        assert_eq!(p.key.as_deref(), Some("a"));
        assert_eq!(p.style.get("color").unwrap(), "blue");
        assert_eq!(p.style.get("margin").unwrap(), "4px");
        assert_eq!(p.attrs.get("id").unwrap(), "x");
        assert!(!p.attrs.contains_key("key"));
        assert!(!p.attrs.contains_key("style"));
    }

    #[test]
    fn style_string_is_sorted() {
        let p = Props::new().style("margin", "4px").style("color", "blue");
        assert_eq!(p.style_string(), "color: blue; margin: 4px");
    }
}
