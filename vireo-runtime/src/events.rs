use std::collections::HashMap;

use vireo_dom::VNode;

/// Maps handler names referenced by compiled views to actual callbacks.
pub struct EventRegistry {
    handlers: HashMap<String, Box<dyn FnMut()>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn on<F: FnMut() + 'static>(&mut self, name: impl Into<String>, f: F) {
        self.handlers.insert(name.into(), Box::new(f));
    }

    pub fn remove(&mut self, name: &str) {
        self.handlers.remove(name);
    }

    pub fn has(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispatch an event by walking the mounted virtual tree for nodes bound to
/// `event` and invoking each registered handler. Handler names are
/// collected before any callback runs, so handlers run to completion in
/// document order and may freely request the next render pass.
/// Returns the number of callbacks invoked.
pub fn dispatch(event: &str, root: &VNode, registry: &mut EventRegistry) -> usize {
    fn walk(node: &VNode, event: &str, out: &mut Vec<String>) {
        if let VNode::Element {
            props, children, ..
        } = node
        {
            if let Some(handler) = props.events.get(event) {
                out.push(handler.clone());
            }
            for c in children {
                walk(c, event, out);
            }
        }
    }

    let mut targets = Vec::new();
    walk(root, event, &mut targets);

    let mut invoked = 0;
    for name in targets {
        if let Some(cb) = registry.handlers.get_mut(&name) {
            cb();
            invoked += 1;
        } else {
            log::warn!("no handler registered for `{name}`");
        }
    }
    invoked
}
