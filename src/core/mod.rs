pub mod diagnostics;
pub mod domain;
pub mod grader;
pub mod traits;
pub mod transcript;
