// Contract violations raised by the aggregation functions.

use thiserror::Error;

/// Caller passed input the aggregators cannot summarize. Not retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionViolation {
    #[error("metric name must be non-empty")]
    EmptyName,

    #[error("metric '{metric}' needs at least {required} samples, got {actual}")]
    TooFewSamples {
        metric: String,
        required: usize,
        actual: usize,
    },
}
