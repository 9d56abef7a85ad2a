//! Context values carried by the `*_ctx` logging variants
//!
//! The logging core never inspects a context beyond handing it to the
//! handler chain. Handlers may use the deadline or the cancellation flag to
//! decide whether work is still worth doing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every context holding this token
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Request-scoped context passed through to handlers unmodified
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Option<CancelToken>,
}

impl Context {
    /// An empty context: no deadline, never cancelled
    pub fn background() -> Self {
        Self::default()
    }

    /// Attach an absolute deadline
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attach a deadline relative to now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Attach a fresh cancellation token and return it alongside the context
    pub fn with_cancel(mut self) -> (Self, CancelToken) {
        let token = CancelToken::new();
        self.cancel = Some(token.clone());
        (self, token)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True once the context has been cancelled or its deadline has passed
    pub fn is_done(&self) -> bool {
        let cancelled = self.cancel.as_ref().is_some_and(CancelToken::is_cancelled);
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d);
        cancelled || expired
    }
}
