use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use crate::{
    constants::{CHECKER_FAILED_MSG, TIMEOUT_MSG},
    core::{
        diagnostics,
        domain::{
            CheckOutcome, CompileUnit, ExecutionResult, GradingOutcome, GradingReport,
            GradingRequest, GradingState, Hint,
        },
        traits::{
            checker::Checker,
            executor::{Executor, ExecutorError},
        },
        transcript::{Markup, Transcript},
    },
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GradeError {
    #[error("grader is misconfigured: {msg}")]
    Configuration { msg: String },
    #[error("grading failed: {msg}")]
    Io { msg: String },
}

impl From<ExecutorError> for GradeError {
    fn from(e: ExecutorError) -> Self {
        match e {
            ExecutorError::Launch { .. } => GradeError::Configuration { msg: e.to_string() },
            ExecutorError::Io { .. } => GradeError::Io { msg: e.to_string() },
        }
    }
}

/// Runs one submission end to end and turns the result into a verdict.
///
/// Holds no per-request state: every call gets its own compile unit, so a
/// single `Grader` can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Grader {
    executor: Arc<dyn Executor>,
    work_dir: PathBuf,
    timeout: Duration,
    markup: Markup,
}

impl Grader {
    pub fn new<T: AsRef<Path>>(executor: Arc<dyn Executor>, work_dir: T, timeout: Duration) -> Self {
        Self {
            executor,
            work_dir: work_dir.as_ref().into(),
            timeout,
            markup: Markup::default(),
        }
    }

    pub fn with_markup(mut self, markup: Markup) -> Self {
        self.markup = markup;
        self
    }

    /// Grades `source` against `checker`.
    ///
    /// Without a checker the request is execution-only and never succeeds.
    /// Only a broken tool setup is reported as `Err`; compile errors,
    /// crashes, timeouts and checker failures all end up in the outcome.
    #[tracing::instrument(skip_all)]
    pub async fn grade(
        &self,
        source: &str,
        checker: Option<&dyn Checker>,
    ) -> Result<GradingReport, GradeError> {
        let request = GradingRequest::new(source);
        let unit = CompileUnit::for_request(&self.work_dir, request.id);
        let mut transcript = Transcript::new(self.markup);
        transcript.command(&self.executor.command_line(&unit));

        let request = request.change_state(GradingState::Executing { unit: unit.clone() });
        let result = self
            .executor
            .run(&unit, &request.source, self.timeout)
            .await
            .inspect_err(|e| tracing::error!(request_id = %request.id, "Executor failed: {}", e))?;

        let (request, outcome) = if result.failed() {
            let request = request.change_state(GradingState::CompileOrRuntimeError {
                result: result.clone(),
            });
            let outcome = self.on_failure(&request, result, checker, &mut transcript);
            (request, outcome)
        } else {
            let request = request.change_state(GradingState::Clean {
                result: result.clone(),
            });
            let outcome = self.on_clean(&request, result, checker, &mut transcript);
            (request, outcome)
        };

        let request = request.change_state(GradingState::Done {
            outcome: outcome.clone(),
        });
        tracing::info!(
            request_id = %request.id,
            success = outcome.success,
            elapsed_ms = request.elapsed().num_milliseconds(),
            "Grading completed"
        );

        Ok(GradingReport {
            outcome,
            transcript: transcript.into_string(),
        })
    }

    fn on_failure(
        &self,
        request: &GradingRequest,
        result: ExecutionResult,
        checker: Option<&dyn Checker>,
        transcript: &mut Transcript,
    ) -> GradingOutcome {
        if result.timed_out {
            transcript.output(TIMEOUT_MSG, true);
            return GradingOutcome {
                stdout: String::new(),
                stderr: result.stderr,
                message: TIMEOUT_MSG.to_string(),
                success: false,
            };
        }

        let diagnostic = diagnostics::simplify(&result.stderr);
        transcript.output(&diagnostic, true);

        let hint = match checker {
            Some(checker) => checker.partial_check(&request.source).unwrap_or_else(|e| {
                tracing::warn!(request_id = %request.id, "Partial check failed: {}", e);
                Hint::Unavailable
            }),
            None => Hint::Unavailable,
        };
        let request = request.change_state(GradingState::PartialChecked { hint: hint.clone() });

        let message = match hint.message() {
            Some(hint) if diagnostic.is_empty() => hint.to_string(),
            Some(hint) => format!("{diagnostic}\n{hint}"),
            None => diagnostic.clone(),
        };
        if let Some(hint) = hint.message() {
            transcript.feedback(hint, false);
        }
        tracing::debug!(request_id = %request.id, "Failure message: {:?}", message);

        GradingOutcome {
            stdout: result.stdout,
            stderr: diagnostic,
            message,
            success: false,
        }
    }

    fn on_clean(
        &self,
        request: &GradingRequest,
        result: ExecutionResult,
        checker: Option<&dyn Checker>,
        transcript: &mut Transcript,
    ) -> GradingOutcome {
        transcript.output(&result.stdout, false);

        let Some(checker) = checker else {
            tracing::debug!(request_id = %request.id, "No checker configured, execution only");
            return GradingOutcome {
                stdout: result.stdout,
                stderr: result.stderr,
                message: String::new(),
                success: false,
            };
        };

        let checked = checker
            .full_check(&request.source, &result.stdout, &result.stderr)
            .unwrap_or_else(|e| {
                tracing::error!(request_id = %request.id, "Full check failed: {}", e);
                CheckOutcome::failed(CHECKER_FAILED_MSG)
            });
        let request = request.change_state(GradingState::FullChecked {
            outcome: checked.clone(),
        });
        transcript.feedback(&checked.message, checked.success);
        tracing::debug!(request_id = %request.id, "Full check: {:?}", checked);

        GradingOutcome {
            stdout: result.stdout,
            stderr: result.stderr,
            message: checked.message,
            success: checked.success,
        }
    }
}
