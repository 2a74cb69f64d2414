use std::cell::RefCell;

thread_local! {
    static HOOKS: RefCell<Hooks> = RefCell::new(Hooks::default());
}

#[derive(Default)]
struct Hooks {
    mount: Vec<Box<dyn FnOnce()>>,
    destroy: Vec<Box<dyn FnOnce()>>,
}

/// Register a hook to run after the current mount or patch pass applies.
pub fn on_mount(f: impl FnOnce() + 'static) {
    HOOKS.with(|h| h.borrow_mut().mount.push(Box::new(f)));
}

/// Register a hook to run before the next live subtree is destroyed.
pub fn before_destroy(f: impl FnOnce() + 'static) {
    HOOKS.with(|h| h.borrow_mut().destroy.push(Box::new(f)));
}

pub(crate) fn run_mount_hooks() {
    // Drain before running so a hook can register new hooks freely.
    let hooks: Vec<_> = HOOKS.with(|h| h.borrow_mut().mount.drain(..).collect());
    for hook in hooks {
        hook();
    }
}

pub(crate) fn run_destroy_hooks() {
    let hooks: Vec<_> = HOOKS.with(|h| h.borrow_mut().destroy.drain(..).collect());
    for hook in hooks {
        hook();
    }
}
