//! Poll-pass counters.

/// Running counters since the last [`PollMetrics::reset`].
///
/// Plain counters, no timestamps. The host samples and resets them
/// on whatever cadence its own telemetry uses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollMetrics {
    /// Poll passes run.
    pub passes: u64,
    /// Agent evaluations skipped because the interval had not
    /// elapsed.
    pub throttled: u64,
    /// Agent evaluations skipped because the position was unchanged.
    pub unchanged: u64,
    /// Agent evaluations skipped because the source had no position.
    pub missing_position: u64,
    /// Zone tests rejected by the bounds check alone.
    pub bounds_rejects: u64,
    /// Exact shape predicates run.
    pub exact_tests: u64,
    /// Enter transitions observed.
    pub enters: u64,
    /// Exit transitions observed.
    pub exits: u64,
    /// Host events dropped because the channel was full.
    pub events_dropped: u64,
}

impl PollMetrics {
    /// Zero every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
