/// Tuning knobs for [`LockFreeQueue`](super::LockFreeQueue).
///
/// Neither option changes observable semantics; both only trade CAS traffic
/// against retries under contention.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueOptions {
    /// Spin with exponential backoff after losing a CAS race.
    pub backoff: bool,
    /// Producers that find `tail` lagging swing it forward before retrying.
    /// When disabled they walk `next` links from their tail snapshot to the
    /// true end instead and leave the tail alone until they have linked.
    pub help_lagging_tail: bool,
}

impl QueueOptions {
    pub const fn new() -> Self {
        QueueOptions {
            backoff: true,
            help_lagging_tail: true,
        }
    }

    pub const fn with_backoff(mut self, backoff: bool) -> Self {
        self.backoff = backoff;
        self
    }

    pub const fn with_help_lagging_tail(mut self, help: bool) -> Self {
        self.help_lagging_tail = help;
        self
    }
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self::new()
    }
}
