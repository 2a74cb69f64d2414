use vireo_dom::{Props, VNode, h, text};
use vireo_runtime::Mounted;
use vireo_runtime::memory::MemoryTarget;

fn keyed_list(items: &[(u64, String)]) -> VNode {
    h(
        "ul",
        Props::new(),
        items
            .iter()
            .map(|(k, label)| {
                h(
                    "li",
                    Props::new().key(k.to_string()).set("data-k", k.to_string()),
                    vec![text(label.clone())],
                )
            })
            .collect(),
    )
}

fn assert_converges(old: &VNode, new: &VNode) {
    let mut live = MemoryTarget::new();
    let live_root = live.create_root();
    let mut m = Mounted::mount(&mut live, live_root, old.clone());
    m.patch(&mut live, new.clone());

    let mut fresh = MemoryTarget::new();
    let fresh_root = fresh.create_root();
    let f = Mounted::mount(&mut fresh, fresh_root, new.clone());

    assert_eq!(
        live.snapshot(m.root_handle()),
        fresh.snapshot(f.root_handle()),
        "patched tree diverged from a fresh render"
    );
}

fn items(keys: &[u64], round: u64) -> Vec<(u64, String)> {
    keys.iter().map(|k| (*k, format!("{k}-{round}"))).collect()
}

#[test]
fn pure_append_converges() {
    assert_converges(
        &keyed_list(&items(&[1, 2], 0)),
        &keyed_list(&items(&[1, 2, 3, 4], 0)),
    );
}

#[test]
fn pure_removal_converges() {
    assert_converges(
        &keyed_list(&items(&[1, 2, 3, 4, 5], 0)),
        &keyed_list(&items(&[2, 5], 0)),
    );
}

#[test]
fn arbitrary_shuffle_converges() {
    assert_converges(
        &keyed_list(&items(&[1, 2, 3, 4, 5, 6], 0)),
        &keyed_list(&items(&[5, 3, 1, 6, 4, 2], 1)),
    );
}

#[test]
fn full_replacement_converges() {
    assert_converges(
        &keyed_list(&items(&[1, 2, 3], 0)),
        &keyed_list(&items(&[7, 8], 0)),
    );
}

#[test]
fn empty_to_full_and_back_converges() {
    assert_converges(&keyed_list(&[]), &keyed_list(&items(&[1, 2, 3], 0)));
    assert_converges(&keyed_list(&items(&[1, 2, 3], 0)), &keyed_list(&[]));
}

#[test]
fn unkeyed_positional_lists_converge() {
    let old = h(
        "div",
        Props::new(),
        vec![text("a"), h("p", (), vec![text("b")]), text("c")],
    );
    let new = h(
        "div",
        Props::new(),
        vec![text("a2"), h("p", (), vec![text("b2")])],
    );
    assert_converges(&old, &new);
}

// Deterministic xorshift so failures reproduce.
fn xorshift(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *state = x;
    x
}

#[test]
fn randomized_pairs_converge() {
    let mut state = 0x2545F4914F6CDD1Du64;
    for round in 0..50u64 {
        let len_a = (xorshift(&mut state) % 10) as usize;
        let len_b = (xorshift(&mut state) % 10) as usize;
        // Keys drawn from a small pool so duplicates and overlaps happen.
        let keys_a: Vec<u64> = (0..len_a).map(|_| xorshift(&mut state) % 8).collect();
        let keys_b: Vec<u64> = (0..len_b).map(|_| xorshift(&mut state) % 8).collect();
        assert_converges(
            &keyed_list(&items(&keys_a, round)),
            &keyed_list(&items(&keys_b, round + 1)),
        );
    }
}
