use std::time::Duration;

use crate::core::domain::{CompileUnit, ExecutionResult};

/// Compiles and runs a submission out of process.
#[mockall::automock]
#[async_trait::async_trait]
pub trait Executor: std::fmt::Debug + Send + Sync {
    /// Writes `source` to `unit` and runs it, giving up after `timeout`.
    ///
    /// Compile and runtime errors are not errors here: they come back as
    /// stderr text. `Err` means the tool itself could not be used.
    async fn run(
        &self,
        unit: &CompileUnit,
        source: &str,
        timeout: Duration,
    ) -> Result<ExecutionResult, ExecutorError>;

    /// Human-readable command line used for `unit`, shown in transcripts.
    fn command_line(&self, unit: &CompileUnit) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutorError {
    #[error("failed to launch `{program}`: {msg}")]
    Launch { program: String, msg: String },
    #[error("compile unit i/o failed: {msg}")]
    Io { msg: String },
}
