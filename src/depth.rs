//! Recursion budget for the tree walkers.
//!
//! Evaluation and type checking recurse once per tree level and once per
//! function call. Each walker step holds a [`DepthGuard`]; once
//! [`MAX_DEPTH`] guards are live on the current thread, entering fails and
//! the walker reports an error instead of exhausting the stack.

use std::cell::Cell;

/// Live guards allowed per thread.
pub const MAX_DEPTH: usize = 256;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// One level of recursion, released on drop.
#[derive(Debug)]
pub(crate) struct DepthGuard(());

impl DepthGuard {
    /// Enter one level deeper, or `None` when the budget is spent.
    pub(crate) fn enter() -> Option<Self> {
        DEPTH.with(|depth| {
            let current = depth.get();
            if current >= MAX_DEPTH {
                return None;
            }
            depth.set(current + 1);
            Some(DepthGuard(()))
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}
