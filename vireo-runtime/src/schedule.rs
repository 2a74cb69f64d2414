use std::cell::Cell;

/// A pass that re-requests while flushing still runs, but only after the
/// current pass has fully applied; this bounds a render loop that never
/// settles.
const MAX_PASSES_PER_FLUSH: usize = 64;

/// Cooperative render-pass scheduling. Event handlers call [`request`] when
/// state changed; the owner calls [`flush`] after dispatch returns. A
/// request made while a pass is running queues the next pass instead of
/// nesting it, and a nested `flush` is a no-op; the outer flush drains the
/// queue.
///
/// [`request`]: RenderQueue::request
/// [`flush`]: RenderQueue::flush
#[derive(Debug, Default)]
pub struct RenderQueue {
    pending: Cell<bool>,
    flushing: Cell<bool>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a render pass. Coalesces: many requests before the next
    /// flush still produce one pass.
    pub fn request(&self) {
        self.pending.set(true);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Run `pass` while requests are pending. Returns the number of passes
    /// executed (0 when nothing was pending or a flush is already running).
    pub fn flush(&self, mut pass: impl FnMut()) -> usize {
        if self.flushing.replace(true) {
            return 0;
        }
        let mut passes = 0;
        while self.pending.replace(false) {
            if passes == MAX_PASSES_PER_FLUSH {
                log::warn!("render queue did not settle after {MAX_PASSES_PER_FLUSH} passes");
                break;
            }
            pass();
            passes += 1;
        }
        self.flushing.set(false);
        passes
    }
}
