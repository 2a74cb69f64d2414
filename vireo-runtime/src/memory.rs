//! Arena-backed reference target. Stands in for a host rendering surface in
//! tests: every primitive call is recorded in an operation log, and the
//! node tree can be rendered to a stable string for whole-tree comparison.

use std::collections::HashMap;

use crate::RenderTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemNode {
    /// `None` for text nodes.
    pub tag: Option<String>,
    pub text: String,
    pub attrs: HashMap<String, String>,
    pub listeners: HashMap<String, String>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub destroyed: bool,
}

#[derive(Debug, Default)]
pub struct MemoryTarget {
    nodes: Vec<MemNode>,
    /// Per-(tag, attribute) defaults restored when an attribute is removed.
    defaults: HashMap<(String, String), String>,
    pub log: Vec<String>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bare container node to mount into.
    pub fn create_root(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(MemNode {
            tag: Some("#root".to_string()),
            ..MemNode::default()
        });
        id
    }

    /// Declare the target's own default for an attribute on a tag;
    /// `remove_attribute` resets to it instead of deleting.
    pub fn set_default(
        &mut self,
        tag: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.defaults.insert((tag.into(), key.into()), value.into());
    }

    pub fn node(&self, id: NodeId) -> &MemNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Stable HTML-ish rendering of the subtree, attrs and listeners
    /// sorted. Two structurally identical trees render identically.
    pub fn snapshot(&self, id: NodeId) -> String {
        let node = &self.nodes[id.0];
        let Some(tag) = &node.tag else {
            return node.text.clone();
        };
        let mut s = format!("<{tag}");
        let mut attrs: Vec<(&String, &String)> = node.attrs.iter().collect();
        attrs.sort();
        for (k, v) in attrs {
            s.push_str(&format!(" {k}=\"{v}\""));
        }
        let mut listeners: Vec<(&String, &String)> = node.listeners.iter().collect();
        listeners.sort();
        for (e, h) in listeners {
            s.push_str(&format!(" on:{e}=\"{h}\""));
        }
        s.push('>');
        for c in &node.children {
            s.push_str(&self.snapshot(*c));
        }
        s.push_str(&format!("</{tag}>"));
        s
    }

    pub fn alive_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.destroyed).count()
    }

    fn alloc(&mut self, node: MemNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn check_alive(&self, id: NodeId, op: &str) {
        assert!(
            !self.nodes[id.0].destroyed,
            "{op} on destroyed node {id}"
        );
    }

    fn mark_destroyed(&mut self, id: NodeId) {
        let children = self.nodes[id.0].children.clone();
        for c in children {
            self.mark_destroyed(c);
        }
        let node = &mut self.nodes[id.0];
        node.listeners.clear();
        node.destroyed = true;
    }
}

impl RenderTarget for MemoryTarget {
    type Handle = NodeId;

    fn create_node(&mut self, tag: &str) -> NodeId {
        let id = self.alloc(MemNode {
            tag: Some(tag.to_string()),
            ..MemNode::default()
        });
        self.log.push(format!("create{id}({tag})"));
        id
    }

    fn create_text_node(&mut self, content: &str) -> NodeId {
        let id = self.alloc(MemNode {
            tag: None,
            text: content.to_string(),
            ..MemNode::default()
        });
        self.log.push(format!("text{id}({content})"));
        id
    }

    fn set_attribute(&mut self, node: NodeId, key: &str, value: &str) {
        self.check_alive(node, "set_attribute");
        self.nodes[node.0]
            .attrs
            .insert(key.to_string(), value.to_string());
        self.log.push(format!("setattr{node} {key}={value}"));
    }

    fn remove_attribute(&mut self, node: NodeId, key: &str) {
        self.check_alive(node, "remove_attribute");
        let tag = self.nodes[node.0].tag.clone().unwrap_or_default();
        match self.defaults.get(&(tag, key.to_string())) {
            Some(default) => {
                let default = default.clone();
                self.nodes[node.0]
                    .attrs
                    .insert(key.to_string(), default.clone());
                self.log.push(format!("resetattr{node} {key}={default}"));
            }
            None => {
                self.nodes[node.0].attrs.remove(key);
                self.log.push(format!("rmattr{node} {key}"));
            }
        }
    }

    fn set_text_content(&mut self, node: NodeId, content: &str) {
        self.check_alive(node, "set_text_content");
        assert!(
            self.nodes[node.0].tag.is_none(),
            "set_text_content on element node {node}"
        );
        self.nodes[node.0].text = content.to_string();
        self.log.push(format!("settext{node}({content})"));
    }

    fn add_event_listener(&mut self, node: NodeId, event: &str, handler: &str) {
        self.check_alive(node, "add_event_listener");
        self.nodes[node.0]
            .listeners
            .insert(event.to_string(), handler.to_string());
        self.log.push(format!("listen{node} {event}->{handler}"));
    }

    fn remove_event_listener(&mut self, node: NodeId, event: &str) {
        self.check_alive(node, "remove_event_listener");
        self.nodes[node.0].listeners.remove(event);
        self.log.push(format!("unlisten{node} {event}"));
    }

    fn append_child(&mut self, child: NodeId, parent: NodeId) {
        self.check_alive(parent, "append_child");
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        self.log.push(format!("append{child}->{parent}"));
    }

    fn insert_before(&mut self, child: NodeId, reference: NodeId, parent: NodeId) {
        self.check_alive(parent, "insert_before");
        let pos = self.nodes[parent.0]
            .children
            .iter()
            .position(|c| *c == reference)
            .unwrap_or_else(|| panic!("insert_before: {reference} is not a child of {parent}"));
        self.nodes[parent.0].children.insert(pos, child);
        self.nodes[child.0].parent = Some(parent);
        self.log
            .push(format!("insert{child} before {reference} in {parent}"));
    }

    fn remove_child(&mut self, child: NodeId, parent: NodeId) {
        let pos = self.nodes[parent.0]
            .children
            .iter()
            .position(|c| *c == child)
            .unwrap_or_else(|| panic!("remove_child: {child} is not a child of {parent}"));
        self.nodes[parent.0].children.remove(pos);
        self.nodes[child.0].parent = None;
        self.log.push(format!("remove{child} from {parent}"));
    }

    fn destroy(&mut self, node: NodeId) {
        assert!(
            !self.nodes[node.0].destroyed,
            "destroy called twice on {node}"
        );
        self.mark_destroyed(node);
        self.log.push(format!("destroy{node}"));
    }
}
