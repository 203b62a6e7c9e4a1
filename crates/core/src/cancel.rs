//! Cooperative cancellation for fetch calls
//!
//! A [`CancelToken`] is handed to every batch fetch. Backends may poll it
//! between chunks; the reassembler polls it before each fetch and before the
//! final pass, and never returns partial results once it trips.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{SiftError, SiftResult};

/// Shared cancellation flag with an optional deadline.
///
/// Clones share the flag, so cancelling any clone cancels all of them.
#[derive(Debug, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    started: Instant,
    deadline: Option<Instant>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    /// A token that only trips when cancelled explicitly.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            started: Instant::now(),
            deadline: None,
        }
    }

    /// A token that also trips once `timeout` has elapsed.
    pub fn with_timeout(timeout: Duration) -> Self {
        let started = Instant::now();
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            started,
            deadline: Some(started + timeout),
        }
    }

    /// Derive a token sharing this flag, with the earlier of the two deadlines.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(d) if d < candidate => d,
            _ => candidate,
        };
        Self {
            cancelled: Arc::clone(&self.cancelled),
            started: self.started,
            deadline: Some(deadline),
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// True once `cancel` has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail with `Cancelled` or `DeadlineExceeded` if the token has tripped.
    pub fn check(&self) -> SiftResult<()> {
        if self.is_cancelled() {
            return Err(SiftError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            let now = Instant::now();
            if now >= deadline {
                return Err(SiftError::deadline_exceeded(now - self.started));
            }
        }
        Ok(())
    }
}
