use vireo_dom::{Props, h, text};
use vireo_runtime::Mounted;
use vireo_runtime::memory::MemoryTarget;

#[test]
fn mount_builds_the_live_tree() {
    let mut target = MemoryTarget::new();
    let root = target.create_root();
    let view = h(
        "div",
        Props::new().set("class", "app").style("color", "blue"),
        vec![h("span", (), vec![text("hi")]), text("x")],
    );
    let m = Mounted::mount(&mut target, root, view);
    assert_eq!(
        target.snapshot(m.root_handle()),
        r#"<div class="app" style="color: blue"><span>hi</span>x</div>"#
    );
}

#[test]
fn mount_attaches_listeners() {
    let mut target = MemoryTarget::new();
    let root = target.create_root();
    let view = h("button", Props::new().on("click", "inc"), vec![text("Go")]);
    let m = Mounted::mount(&mut target, root, view);
    assert_eq!(
        target.snapshot(m.root_handle()),
        r#"<button on:click="inc">Go</button>"#
    );
    assert!(target.log.iter().any(|l| l.contains("listen") && l.contains("click->inc")));
}

#[test]
fn patch_updates_text_in_place() {
    let mut target = MemoryTarget::new();
    let root = target.create_root();
    let mut m = Mounted::mount(&mut target, root, h("p", (), vec![text("old")]));
    let creates_before = target.log.iter().filter(|l| l.starts_with("create")).count();

    m.patch(&mut target, h("p", (), vec![text("new")]));

    let creates_after = target.log.iter().filter(|l| l.starts_with("create")).count();
    assert_eq!(creates_before, creates_after, "no nodes rebuilt for a text change");
    assert_eq!(target.snapshot(m.root_handle()), "<p>new</p>");
}

#[test]
fn root_replace_swaps_the_whole_tree() {
    let mut target = MemoryTarget::new();
    let root = target.create_root();
    let mut m = Mounted::mount(&mut target, root, h("div", (), vec![text("a")]));
    let old_handle = m.root_handle();

    m.patch(&mut target, h("section", (), vec![text("b")]));

    assert_ne!(m.root_handle(), old_handle);
    assert_eq!(target.snapshot(m.root_handle()), "<section>b</section>");
    assert!(target.node(old_handle).destroyed);
}

#[test]
fn unmount_destroys_everything_exactly_once() {
    let mut target = MemoryTarget::new();
    let root = target.create_root();
    let m = Mounted::mount(
        &mut target,
        root,
        h("div", (), vec![h("p", (), vec![text("x")]), text("y")]),
    );

    m.unmount(&mut target);

    // Only the root container survives; the one destroy call tears the
    // subtree down recursively.
    assert_eq!(target.alive_count(), 1);
    let destroys = target.log.iter().filter(|l| l.starts_with("destroy")).count();
    assert_eq!(destroys, 1);
    assert!(target.children(root).is_empty());
}

#[test]
fn noop_patch_touches_nothing() {
    let mut target = MemoryTarget::new();
    let root = target.create_root();
    let view = h("div", Props::new().set("id", "a"), vec![text("x")]);
    let mut m = Mounted::mount(&mut target, root, view.clone());
    let len = target.log.len();

    m.patch(&mut target, view);

    assert_eq!(target.log.len(), len);
}
