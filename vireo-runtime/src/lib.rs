//! Applies virtual-tree diffs to a live render target.
//!
//! The reconciler is the sole owner of the virtual-to-live mapping: a
//! shadow tree of handles held by [`Mounted`], updated in lockstep with the
//! patches it applies. It runs on the thread that owns the target, and a
//! render pass never starts until the previous pass has fully applied.

use std::collections::HashMap;

use vireo_dom::diff::{Patch, diff};
use vireo_dom::{VNode, style_to_string};

pub mod events;
pub mod lifecycle;
pub mod memory;
pub mod schedule;

pub use events::EventRegistry;
pub use schedule::RenderQueue;

/// The primitive operations the patch engine needs from a host rendering
/// surface. A missing capability or an invalid handle is a contract
/// violation, not a recoverable condition: implementations panic rather
/// than skip a mutation and leave the live tree out of sync.
pub trait RenderTarget {
    type Handle: Copy + Eq + std::fmt::Debug;

    fn create_node(&mut self, tag: &str) -> Self::Handle;
    fn create_text_node(&mut self, content: &str) -> Self::Handle;
    fn set_attribute(&mut self, node: Self::Handle, key: &str, value: &str);
    /// Clears the attribute back to the target's own default for the tag,
    /// never leaving a stale computed value behind.
    fn remove_attribute(&mut self, node: Self::Handle, key: &str);
    fn set_text_content(&mut self, node: Self::Handle, content: &str);
    fn add_event_listener(&mut self, node: Self::Handle, event: &str, handler: &str);
    fn remove_event_listener(&mut self, node: Self::Handle, event: &str);
    fn append_child(&mut self, child: Self::Handle, parent: Self::Handle);
    fn insert_before(&mut self, child: Self::Handle, reference: Self::Handle, parent: Self::Handle);
    fn remove_child(&mut self, child: Self::Handle, parent: Self::Handle);
    /// Tears down everything rooted at the handle. Called exactly once per
    /// removed node, after listeners are detached and before physical
    /// removal from the parent.
    fn destroy(&mut self, node: Self::Handle);
}

/// One live node in the reconciler's shadow tree.
#[derive(Debug)]
pub struct LiveNode<H> {
    handle: H,
    children: Vec<LiveNode<H>>,
}

impl<H: Copy> LiveNode<H> {
    pub fn handle(&self) -> H {
        self.handle
    }
}

/// A mounted tree: the live shadow, the parent it hangs off, and the
/// virtual tree it currently reflects. The previous virtual tree is kept
/// only until the next [`Mounted::patch`] call diffs against it.
pub struct Mounted<H> {
    parent: H,
    root: LiveNode<H>,
    vnode: VNode,
}

impl<H: Copy + Eq + std::fmt::Debug> Mounted<H> {
    /// Build the live tree for `vnode` under `parent`.
    pub fn mount<T: RenderTarget<Handle = H>>(target: &mut T, parent: H, vnode: VNode) -> Self {
        let root = create_subtree(target, &vnode);
        target.append_child(root.handle, parent);
        lifecycle::run_mount_hooks();
        Mounted {
            parent,
            root,
            vnode,
        }
    }

    pub fn vnode(&self) -> &VNode {
        &self.vnode
    }

    pub fn root_handle(&self) -> H {
        self.root.handle
    }

    /// Diff the current tree against `new` and apply the result. After this
    /// returns, the live tree exactly reflects `new` and the old virtual
    /// tree is discarded.
    pub fn patch<T: RenderTarget<Handle = H>>(&mut self, target: &mut T, new: VNode) {
        let patches = diff(&self.vnode, &new);
        let old = std::mem::replace(&mut self.vnode, new);
        if patches.is_empty() {
            return;
        }
        let mut old_slot = Some(old);
        apply_node(target, self.parent, &mut self.root, &mut old_slot, None, patches);
        lifecycle::run_mount_hooks();
    }

    /// Tear the whole tree down: listeners detached, destroy hooks run,
    /// every live node destroyed exactly once.
    pub fn unmount<T: RenderTarget<Handle = H>>(self, target: &mut T) {
        detach_and_destroy(target, self.parent, &self.root, Some(&self.vnode));
    }
}

struct Slot<H> {
    live: LiveNode<H>,
    /// The virtual node this live child reflected before the pass; `None`
    /// for children created during the pass (no further patches target
    /// their contents).
    old: Option<VNode>,
}

fn apply_node<T: RenderTarget>(
    target: &mut T,
    parent: T::Handle,
    live: &mut LiveNode<T::Handle>,
    old: &mut Option<VNode>,
    next_sibling: Option<T::Handle>,
    patches: Vec<Patch>,
) {
    let handle = live.handle;

    // Child operations index into the list as it evolves, so mirror it in a
    // working copy pairing each live child with its previous virtual node.
    let has_child_ops = patches.iter().any(|p| {
        matches!(
            p,
            Patch::UpdateChild(..)
                | Patch::InsertChild(..)
                | Patch::MoveChild { .. }
                | Patch::RemoveChild(..)
        )
    });
    let mut work: Option<Vec<Slot<T::Handle>>> = None;
    if has_child_ops {
        let live_children = std::mem::take(&mut live.children);
        let mut old_children: Vec<Option<VNode>> = match old {
            Some(VNode::Element { children, .. }) => children.drain(..).map(Some).collect(),
            _ => Vec::new(),
        };
        old_children.resize_with(live_children.len(), || None);
        work = Some(
            live_children
                .into_iter()
                .zip(old_children)
                .map(|(l, o)| Slot { live: l, old: o })
                .collect(),
        );
    }

    // Style changes re-serialize the whole declaration list, so removing a
    // key resets it instead of leaving the last value.
    let mut style: Option<HashMap<String, String>> = None;

    for p in patches {
        match p {
            Patch::Replace(new) => {
                detach_and_destroy(target, parent, live, old.as_ref());
                let created = create_subtree(target, &new);
                match next_sibling {
                    Some(r) => target.insert_before(created.handle, r, parent),
                    None => target.append_child(created.handle, parent),
                }
                *live = created;
                *old = None;
            }
            Patch::SetText(s) => target.set_text_content(handle, &s),
            Patch::SetAttr(k, v) => target.set_attribute(handle, &k, &v),
            Patch::RemoveAttr(k) => target.remove_attribute(handle, &k),
            Patch::SetStyle(k, v) => {
                let st = style.get_or_insert_with(|| old_style(old));
                st.insert(k, v);
                flush_style(target, handle, st);
            }
            Patch::RemoveStyle(k) => {
                let st = style.get_or_insert_with(|| old_style(old));
                st.remove(&k);
                flush_style(target, handle, st);
            }
            Patch::AddListener(e, hname) => target.add_event_listener(handle, &e, &hname),
            Patch::RemoveListener(e) => target.remove_event_listener(handle, &e),
            Patch::UpdateChild(i, sub) => {
                let work = work.as_mut().expect("child ops prepared");
                let next = work.get(i + 1).map(|s| s.live.handle);
                let slot = &mut work[i];
                apply_node(target, handle, &mut slot.live, &mut slot.old, next, sub);
            }
            Patch::InsertChild(i, vnode) => {
                let work = work.as_mut().expect("child ops prepared");
                let created = create_subtree(target, &vnode);
                if i < work.len() {
                    target.insert_before(created.handle, work[i].live.handle, handle);
                } else {
                    target.append_child(created.handle, handle);
                }
                let at = i.min(work.len());
                work.insert(
                    at,
                    Slot {
                        live: created,
                        old: None,
                    },
                );
            }
            Patch::MoveChild { from, to } => {
                let work = work.as_mut().expect("child ops prepared");
                let slot = work.remove(from);
                target.remove_child(slot.live.handle, handle);
                if to < work.len() {
                    target.insert_before(slot.live.handle, work[to].live.handle, handle);
                } else {
                    target.append_child(slot.live.handle, handle);
                }
                let at = to.min(work.len());
                work.insert(at, slot);
            }
            Patch::RemoveChild(i) => {
                let work = work.as_mut().expect("child ops prepared");
                let slot = work.remove(i);
                detach_and_destroy(target, handle, &slot.live, slot.old.as_ref());
            }
        }
    }

    if let Some(work) = work {
        live.children = work.into_iter().map(|s| s.live).collect();
    }
}

fn old_style(old: &Option<VNode>) -> HashMap<String, String> {
    match old {
        Some(VNode::Element { props, .. }) => props.style.clone(),
        _ => HashMap::new(),
    }
}

fn flush_style<T: RenderTarget>(
    target: &mut T,
    handle: T::Handle,
    style: &HashMap<String, String>,
) {
    if style.is_empty() {
        target.remove_attribute(handle, "style");
    } else {
        target.set_attribute(handle, "style", &style_to_string(style));
    }
}

/// Build the live subtree for a virtual node. Attributes, styles and
/// listeners are applied in sorted order so target operation logs are
/// stable.
fn create_subtree<T: RenderTarget>(target: &mut T, vnode: &VNode) -> LiveNode<T::Handle> {
    match vnode {
        VNode::Text(t) => LiveNode {
            handle: target.create_text_node(t),
            children: Vec::new(),
        },
        VNode::Element {
            tag,
            props,
            children,
        } => {
            let handle = target.create_node(tag);
            let mut keys: Vec<&String> = props.attrs.keys().collect();
            keys.sort();
            for k in keys {
                target.set_attribute(handle, k, &props.attrs[k.as_str()]);
            }
            if !props.style.is_empty() {
                target.set_attribute(handle, "style", &props.style_string());
            }
            let mut events: Vec<&String> = props.events.keys().collect();
            events.sort();
            for e in events {
                target.add_event_listener(handle, e, &props.events[e.as_str()]);
            }
            let mut kids = Vec::with_capacity(children.len());
            for c in children {
                let child = create_subtree(target, c);
                target.append_child(child.handle, handle);
                kids.push(child);
            }
            LiveNode {
                handle,
                children: kids,
            }
        }
    }
}

/// Destroy a live subtree exactly once: destroy hooks run, listeners are
/// detached, the target tears the subtree down, then the node leaves its
/// parent.
fn detach_and_destroy<T: RenderTarget>(
    target: &mut T,
    parent: T::Handle,
    live: &LiveNode<T::Handle>,
    old: Option<&VNode>,
) {
    lifecycle::run_destroy_hooks();
    detach_listeners(target, live, old);
    target.destroy(live.handle);
    target.remove_child(live.handle, parent);
}

fn detach_listeners<T: RenderTarget>(
    target: &mut T,
    live: &LiveNode<T::Handle>,
    old: Option<&VNode>,
) {
    if let Some(VNode::Element {
        props, children, ..
    }) = old
    {
        let mut events: Vec<&String> = props.events.keys().collect();
        events.sort();
        for e in events {
            target.remove_event_listener(live.handle, e);
        }
        for (l, o) in live.children.iter().zip(children.iter()) {
            detach_listeners(target, l, Some(o));
        }
    }
}
