use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::constants::{COMPILE_UNIT_FILE_NAME, TIMEOUT_MSG};

#[derive(Clone, Debug)]
pub struct GradingRequest {
    pub id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub source: String,
    pub state: GradingState,
}

impl GradingRequest {
    pub fn new(source: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            source: source.into(),
            state: GradingState::default(),
        }
    }

    /// Time spent between creation and the latest transition.
    pub fn elapsed(&self) -> chrono::TimeDelta {
        self.updated_at - self.created_at
    }

    pub fn change_state(&self, new_state: GradingState) -> Self {
        tracing::debug!(request_id = %self.id, "New state: {:?}", new_state);

        Self {
            state: new_state,
            updated_at: chrono::Utc::now(),
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum GradingState {
    #[default]
    Idle,
    Executing { unit: CompileUnit },

    CompileOrRuntimeError { result: ExecutionResult },
    PartialChecked { hint: Hint },

    Clean { result: ExecutionResult },
    FullChecked { outcome: CheckOutcome },

    Done { outcome: GradingOutcome },
}

/// Location of the source file handed to the external tool.
///
/// Every request gets its own directory, the file name itself stays fixed
/// because the compile-and-run tool derives the class name from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileUnit {
    pub dir: PathBuf,
    pub path: PathBuf,
}

impl CompileUnit {
    pub fn for_request<T: AsRef<Path>>(work_dir: T, request_id: Uuid) -> Self {
        let dir = work_dir.as_ref().join(request_id.to_string());
        let path = dir.join(COMPILE_UNIT_FILE_NAME);
        Self { dir, path }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl ExecutionResult {
    pub fn timed_out() -> Self {
        Self {
            stdout: String::new(),
            stderr: TIMEOUT_MSG.to_string(),
            timed_out: true,
        }
    }

    /// Whether the run failed to compile, crashed or never finished.
    pub fn failed(&self) -> bool {
        self.timed_out || !self.stderr.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GradingOutcome {
    pub stdout: String,
    pub stderr: String,
    pub message: String,
    pub success: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckOutcome {
    pub success: bool,
    pub message: String,
}

impl CheckOutcome {
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Result of a partial check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hint {
    Available(String),
    Unavailable,
}

impl Hint {
    pub fn available(message: impl Into<String>) -> Self {
        Hint::Available(message.into())
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Hint::Available(msg) if !msg.trim().is_empty() => Some(msg),
            _ => None,
        }
    }
}

/// What the caller gets back: the verdict plus a display-ready transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GradingReport {
    pub outcome: GradingOutcome,
    pub transcript: String,
}
