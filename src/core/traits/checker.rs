use crate::core::domain::{CheckOutcome, Hint};

/// Exercise-specific verification policy.
///
/// Implementations are read-only: everything a check needs lives in its
/// arguments, so one instance can grade any number of submissions.
#[mockall::automock]
pub trait Checker: std::fmt::Debug + Send + Sync {
    /// Judges a submission that compiled and ran without errors.
    ///
    /// Every failed check is reported, one per line.
    fn full_check(
        &self,
        source: &str,
        stdout: &str,
        stderr: &str,
    ) -> Result<CheckOutcome, CheckerError>;

    /// Looks for the most relevant hint in a submission that failed to
    /// compile or crashed. Only the first matching issue is reported.
    fn partial_check(&self, source: &str) -> Result<Hint, CheckerError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckerError {
    #[error("invalid pattern `{pattern}`: {msg}")]
    Pattern { pattern: String, msg: String },
    #[error("checker failed: {msg}")]
    Internal { msg: String },
}
