use vireo_dom::{Props, VNode, h, text};
use vireo_runtime::Mounted;
use vireo_runtime::memory::{MemoryTarget, NodeId};

fn item(key: &str, label: &str) -> VNode {
    h(
        "li",
        Props::new().key(key).on("click", key),
        vec![text(label)],
    )
}

fn list(keys: &[&str]) -> VNode {
    h("ul", Props::new(), keys.iter().map(|k| item(k, k)).collect())
}

fn fresh_snapshot(view: &VNode) -> String {
    let mut target = MemoryTarget::new();
    let root = target.create_root();
    let m = Mounted::mount(&mut target, root, view.clone());
    target.snapshot(m.root_handle())
}

fn patched(old: &VNode, new: &VNode) -> (MemoryTarget, NodeId) {
    let mut target = MemoryTarget::new();
    let root = target.create_root();
    let mut m = Mounted::mount(&mut target, root, old.clone());
    m.patch(&mut target, new.clone());
    (target, m.root_handle())
}

#[test]
fn reorder_reuses_live_nodes_by_key() {
    let old = list(&["a", "b", "c"]);
    let new = list(&["b", "a", "d"]);
    let (target, root) = patched(&old, &new);

    assert_eq!(target.snapshot(root), fresh_snapshot(&new));
    // Only the `d` item was created after the mount; `a` and `b` moved.
    let mount_creates = 4; // ul + 3 li
    let creates = target
        .log
        .iter()
        .filter(|l| l.starts_with("create"))
        .count();
    assert_eq!(creates, mount_creates + 1);
}

#[test]
fn removal_destroys_each_node_exactly_once() {
    let old = list(&["1", "2", "3", "4"]);
    let new = list(&["2", "4"]);
    let (target, root) = patched(&old, &new);

    assert_eq!(target.snapshot(root), fresh_snapshot(&new));
    let destroys = target
        .log
        .iter()
        .filter(|l| l.starts_with("destroy"))
        .count();
    assert_eq!(destroys, 2);
}

#[test]
fn listeners_detach_before_destroy() {
    let old = list(&["1", "2"]);
    let new = list(&["2"]);
    let (target, root) = patched(&old, &new);

    assert_eq!(target.snapshot(root), fresh_snapshot(&new));
    let unlisten_pos = target
        .log
        .iter()
        .position(|l| l.starts_with("unlisten"))
        .expect("listener detached");
    let destroy_pos = target
        .log
        .iter()
        .position(|l| l.starts_with("destroy"))
        .expect("node destroyed");
    assert!(unlisten_pos < destroy_pos);
}

#[test]
fn duplicate_keys_materialize_every_occurrence() {
    // Old [2,3,5] -> new [3,4,5,6,6]; the duplicate key 6 must not crash
    // and must not silently drop an instance.
    let old = list(&["2", "3", "5"]);
    let new = list(&["3", "4", "5", "6", "6"]);
    let (target, root) = patched(&old, &new);

    assert_eq!(target.snapshot(root), fresh_snapshot(&new));
    assert_eq!(target.children(root).len(), 5);
}

#[test]
fn moved_nodes_keep_their_subtrees() {
    let old = h(
        "ul",
        Props::new(),
        vec![
            h("li", Props::new().key("a"), vec![h("b", (), vec![text("deep")])]),
            h("li", Props::new().key("z"), vec![text("flat")]),
        ],
    );
    let new = h(
        "ul",
        Props::new(),
        vec![
            h("li", Props::new().key("z"), vec![text("flat")]),
            h("li", Props::new().key("a"), vec![h("b", (), vec![text("deep")])]),
        ],
    );
    let (target, root) = patched(&old, &new);
    assert_eq!(target.snapshot(root), fresh_snapshot(&new));
}
