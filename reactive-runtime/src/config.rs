/// Tuning knobs for a [`crate::Runtime`].
///
/// Only a single-threaded runtime is implemented; these are the few
/// tunables worth exposing as real configuration rather than constants.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct RuntimeConfig {
    /// Reservation hint for the refresher's pending-call queue.
    pub queue_capacity_hint: usize,
    /// If `true`, dropping a scoped-acquisition call result with a still-held
    /// acquisition logs at `error` level (the release is still attempted and
    /// suppressed either way). If `false`, such a drop is logged at `debug`
    /// level instead, for embedders that expect this to happen routinely.
    pub warn_on_unreleased_scope: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            queue_capacity_hint: 16,
            warn_on_unreleased_scope: true,
        }
    }
}
