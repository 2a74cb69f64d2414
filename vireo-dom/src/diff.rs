use crate::{Props, VNode};

/// One mutation against a live node (or its child list). Child operations
/// use indices into the child list *as it evolves* while the patch list is
/// applied in order: `MoveChild` removes from `from` and reinserts at `to`,
/// `InsertChild`/`RemoveChild` shift later siblings, and trailing removals
/// are emitted in descending index order.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    Replace(VNode),
    SetText(String),
    SetAttr(String, String),
    RemoveAttr(String),
    SetStyle(String, String),
    RemoveStyle(String),
    AddListener(String, String),
    RemoveListener(String),
    UpdateChild(usize, Vec<Patch>),
    InsertChild(usize, VNode),
    MoveChild { from: usize, to: usize },
    RemoveChild(usize),
}

pub fn diff(old: &VNode, new: &VNode) -> Vec<Patch> {
    match (old, new) {
        (VNode::Text(a), VNode::Text(b)) => {
            if a != b {
                vec![Patch::SetText(b.clone())]
            } else {
                vec![]
            }
        }
        (
            VNode::Element {
                tag: tag_a,
                props: props_a,
                children: children_a,
            },
            VNode::Element {
                tag: tag_b,
                props: props_b,
                children: children_b,
            },
        ) => {
            if tag_a != tag_b {
                return vec![Patch::Replace(new.clone())];
            }
            let mut patches = Vec::new();
            patches.extend(diff_props(props_a, props_b));
            patches.extend(diff_children(children_a, children_b));
            patches
        }
        _ => vec![Patch::Replace(new.clone())],
    }
}

/// Each property category diffs independently: added keys are set, changed
/// keys overwritten, removed keys cleared back to the target's default.
/// Keys are visited in sorted order so patch lists are deterministic.
fn diff_props(a: &Props, b: &Props) -> Vec<Patch> {
    let mut patches = Vec::new();

    for (k, v) in sorted(&b.attrs) {
        if a.attrs.get(k).map(String::as_str) != Some(v) {
            patches.push(Patch::SetAttr(k.clone(), v.to_string()));
        }
    }
    for (k, _) in sorted(&a.attrs) {
        if !b.attrs.contains_key(k) {
            patches.push(Patch::RemoveAttr(k.clone()));
        }
    }

    for (k, v) in sorted(&b.style) {
        if a.style.get(k).map(String::as_str) != Some(v) {
            patches.push(Patch::SetStyle(k.clone(), v.to_string()));
        }
    }
    for (k, _) in sorted(&a.style) {
        if !b.style.contains_key(k) {
            patches.push(Patch::RemoveStyle(k.clone()));
        }
    }

    for (k, v) in sorted(&b.events) {
        if a.events.get(k).map(String::as_str) != Some(v) {
            patches.push(Patch::AddListener(k.clone(), v.to_string()));
        }
    }
    for (k, _) in sorted(&a.events) {
        if !b.events.contains_key(k) {
            patches.push(Patch::RemoveListener(k.clone()));
        }
    }

    patches
}

fn sorted(map: &std::collections::HashMap<String, String>) -> Vec<(&String, &str)> {
    let mut entries: Vec<(&String, &str)> = map.iter().map(|(k, v)| (k, v.as_str())).collect();
    entries.sort_by(|x, y| x.0.cmp(y.0));
    entries
}

fn diff_children(a: &[VNode], b: &[VNode]) -> Vec<Patch> {
    let keyed = a.iter().chain(b.iter()).any(|n| n.key().is_some());
    if keyed {
        diff_children_keyed(a, b)
    } else {
        diff_children_positional(a, b)
    }
}

fn diff_children_positional(a: &[VNode], b: &[VNode]) -> Vec<Patch> {
    let mut patches = Vec::new();
    let common = a.len().min(b.len());
    for i in 0..common {
        let child_patches = diff(&a[i], &b[i]);
        if !child_patches.is_empty() {
            patches.push(Patch::UpdateChild(i, child_patches));
        }
    }
    if b.len() > a.len() {
        for (i, node) in b.iter().enumerate().skip(a.len()) {
            patches.push(Patch::InsertChild(i, node.clone()));
        }
    }
    if a.len() > b.len() {
        for i in (b.len()..a.len()).rev() {
            patches.push(Patch::RemoveChild(i));
        }
    }
    patches
}

/// Keyed reconciliation over a simulated working copy of the child list.
/// For each target position the first unconsumed old child with the same
/// identity is reused (moved into place if needed), unmatched new children
/// are created, and leftover old children are removed from the tail.
/// Duplicate keys pair up in document order; surplus occurrences are
/// created or removed like any other unmatched child.
fn diff_children_keyed(a: &[VNode], b: &[VNode]) -> Vec<Patch> {
    #[derive(Clone, Copy)]
    enum Slot {
        Old(usize),
        Fresh,
    }

    let mut work: Vec<Slot> = (0..a.len()).map(Slot::Old).collect();
    let mut patches = Vec::new();

    for (i, new_child) in b.iter().enumerate() {
        let found = work[i.min(work.len())..]
            .iter()
            .position(|s| match s {
                Slot::Old(oi) => same_identity(&a[*oi], new_child),
                Slot::Fresh => false,
            })
            .map(|p| p + i);

        match found {
            Some(j) => {
                if j != i {
                    patches.push(Patch::MoveChild { from: j, to: i });
                    let slot = work.remove(j);
                    work.insert(i, slot);
                }
                if let Slot::Old(oi) = work[i] {
                    let child_patches = diff(&a[oi], new_child);
                    if !child_patches.is_empty() {
                        patches.push(Patch::UpdateChild(i, child_patches));
                    }
                }
            }
            None => {
                patches.push(Patch::InsertChild(i, new_child.clone()));
                let at = i.min(work.len());
                work.insert(at, Slot::Fresh);
            }
        }
    }

    for j in (b.len()..work.len()).rev() {
        patches.push(Patch::RemoveChild(j));
    }
    patches
}

/// Two children are the same identity when their keys match on the same
/// tag, or when neither is keyed and they share a shape (same tag, or both
/// text). Mixed keyed/unkeyed pairs never match.
fn same_identity(old: &VNode, new: &VNode) -> bool {
    match (old.key(), new.key()) {
        (Some(a), Some(b)) => a == b && old.tag() == new.tag(),
        (None, None) => match (old, new) {
            (VNode::Text(_), VNode::Text(_)) => true,
            (VNode::Element { tag: a, .. }, VNode::Element { tag: b, .. }) => a == b,
            _ => false,
        },
        _ => false,
    }
}
