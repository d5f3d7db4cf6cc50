//! Cooperative cancellation.  A session owns a token; whoever
//! supersedes the session flips it, and the work checks it at its
//! breakpoints.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Anything that can tell a render to stop early.
pub trait CancellationChecker: Clone + Send + Sync {
    /// Returns true once the work should be abandoned.
    fn is_cancelled(&self) -> bool;
}

/// Never cancels; for one-shot renders nobody can supersede.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverCancel;

impl CancellationChecker for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A shared flag.  Clones observe the same flag, and once cancelled
/// a token stays cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// Flags every clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl CancellationChecker for CancelToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
