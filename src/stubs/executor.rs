use std::time::Duration;

use crate::core::{
    domain::{CompileUnit, ExecutionResult},
    traits::executor::{Executor, ExecutorError},
};

/// Replays a canned result after a delay. A delay longer than the timeout
/// behaves like a hanging submission.
#[derive(Debug, Clone)]
pub struct ExecutorStub {
    result: Result<ExecutionResult, ExecutorError>,
    delay: Duration,
}

impl ExecutorStub {
    pub fn new(result: Result<ExecutionResult, ExecutorError>, delay: Duration) -> Self {
        Self { result, delay }
    }

    pub fn printing(stdout: &str) -> Self {
        Self::new(
            Ok(ExecutionResult {
                stdout: stdout.to_string(),
                ..ExecutionResult::default()
            }),
            Duration::ZERO,
        )
    }

    pub fn failing(stderr: &str) -> Self {
        Self::new(
            Ok(ExecutionResult {
                stderr: stderr.to_string(),
                ..ExecutionResult::default()
            }),
            Duration::ZERO,
        )
    }
}

#[async_trait::async_trait]
impl Executor for ExecutorStub {
    #[tracing::instrument]
    async fn run(
        &self,
        unit: &CompileUnit,
        source: &str,
        timeout: Duration,
    ) -> Result<ExecutionResult, ExecutorError> {
        tracing::debug!(
            "Start execution: unit={:?}, source={:?}, timeout={:?}",
            unit,
            source,
            timeout
        );
        if tokio::time::timeout(timeout, tokio::time::sleep(self.delay))
            .await
            .is_err()
        {
            tracing::debug!("Execution result: timed out");
            return Ok(ExecutionResult::timed_out());
        }
        tracing::debug!("Execution result: {:?}", self.result);

        self.result.clone()
    }

    fn command_line(&self, unit: &CompileUnit) -> String {
        format!("stub {}", unit.path.display())
    }
}
