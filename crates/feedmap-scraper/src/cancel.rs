//! Cancellation and deadline signal shared between a run and its caller.
//!
//! A [`CancelSignal`] trips either when [`CancelSignal::cancel`] is called
//! (e.g. on Ctrl+C) or when its optional deadline passes. Clones share state,
//! so several concurrent runs can be stopped with one call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    inner: Arc<Inner>,
    deadline: Option<Instant>,
}

impl CancelSignal {
    /// A signal with no deadline that only trips on [`Self::cancel`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A signal that also trips once `deadline` is reached.
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            inner: Arc::default(),
            deadline: Some(deadline),
        }
    }

    /// A signal that trips `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Returns a clone sharing this signal's cancel flag, with `deadline`
    /// replacing any existing one.
    #[must_use]
    pub fn child_with_deadline(&self, deadline: Instant) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            deadline: Some(deadline),
        }
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Trips the signal. Wakes every waiter exactly once.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Whether the signal was cancelled or its deadline has passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves once the signal trips. Returns immediately if it already has.
    pub async fn cancelled(&self) {
        loop {
            // Created before the flag check so a concurrent `cancel` between
            // the check and the await is not lost.
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            match self.deadline {
                Some(deadline) => {
                    tokio::select! {
                        () = notified => {}
                        () = tokio::time::sleep_until(deadline) => return,
                    }
                }
                None => notified.await,
            }
        }
    }
}
