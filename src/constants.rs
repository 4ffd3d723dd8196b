pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

pub const TIMEOUT_MSG: &str = "Execution timed out.";

/// Shape of the compile-and-run jar's native diagnostics.
pub const DIAGNOSTIC_PATTERN: &str = r"Line\s*\d+,\s*Column\s*\d+:\s*.*";

pub const PLACEHOLDER: &str = "___";

pub const COMPILE_UNIT_FILE_NAME: &str = "TempProgram.java";
pub const WORK_DIR_NAME: &str = "codegrader";
pub const GRADER_JAR_NAME: &str = "JaninoExecutor.jar";

pub const CHECKER_FAILED_MSG: &str =
    "Your solution could not be verified. Please try again or ask for help.";

pub const TOOL_ENV: &str = "CODEGRADER_TOOL";
pub const JAR_ENV: &str = "CODEGRADER_JAR";
pub const TIMEOUT_ENV: &str = "CODEGRADER_TIMEOUT_MS";
pub const WORK_DIR_ENV: &str = "CODEGRADER_WORK_DIR";
