//! Destinations for the human-readable progress messages a run emits.

/// Receives progress (`info`) and per-record problem (`warn`) messages.
///
/// Implementations must be cheap; they are called once per skipped or
/// rejected record.
pub trait ProgressSink: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Forwards messages to `tracing` at the matching level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Wraps a pair of closures, for callers that collect messages themselves.
pub struct CallbackSink<I, W> {
    on_info: I,
    on_warn: W,
}

impl<I, W> CallbackSink<I, W>
where
    I: Fn(&str) + Send + Sync,
    W: Fn(&str) + Send + Sync,
{
    #[must_use]
    pub fn new(on_info: I, on_warn: W) -> Self {
        Self { on_info, on_warn }
    }
}

impl<I, W> ProgressSink for CallbackSink<I, W>
where
    I: Fn(&str) + Send + Sync,
    W: Fn(&str) + Send + Sync,
{
    fn info(&self, message: &str) {
        (self.on_info)(message);
    }

    fn warn(&self, message: &str) {
        (self.on_warn)(message);
    }
}

impl<S: ProgressSink + ?Sized> ProgressSink for &S {
    fn info(&self, message: &str) {
        (**self).info(message);
    }

    fn warn(&self, message: &str) {
        (**self).warn(message);
    }
}
