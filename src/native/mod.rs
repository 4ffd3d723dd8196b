/// Native module runs the external compile-and-run tool directly as a
/// child process of the grader, without any sandbox around it.
pub mod executor;
