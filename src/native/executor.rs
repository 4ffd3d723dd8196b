use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use tokio::{
    fs,
    io::{AsyncRead, AsyncReadExt},
    process::Command,
};

use crate::{
    config::ToolCommand,
    core::{
        domain::{CompileUnit, ExecutionResult},
        traits::executor::{Executor, ExecutorError},
    },
};

#[derive(Clone, Debug)]
pub struct NativeExecutor {
    tool: ToolCommand,
}

impl NativeExecutor {
    pub fn new(tool: ToolCommand) -> Self {
        NativeExecutor { tool }
    }
}

fn io_error(e: impl ToString) -> ExecutorError {
    ExecutorError::Io { msg: e.to_string() }
}

/// The child runs inside the compile unit directory, so every path handed to
/// it must not depend on the grader's own working directory. Bare program
/// names are left alone for `PATH` lookup.
fn resolve_program(program: &Path) -> Result<PathBuf, ExecutorError> {
    if program.components().count() > 1 {
        std::path::absolute(program).map_err(io_error)
    } else {
        Ok(program.to_path_buf())
    }
}

fn resolve_tool(tool: &ToolCommand) -> Result<ToolCommand, ExecutorError> {
    Ok(ToolCommand {
        program: resolve_program(&tool.program)?,
        jar: tool
            .jar
            .as_deref()
            .map(std::path::absolute)
            .transpose()
            .map_err(io_error)?,
    })
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<String> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

impl NativeExecutor {
    async fn execute(
        &self,
        unit: &CompileUnit,
        source: &str,
        timeout: Duration,
    ) -> Result<ExecutionResult, ExecutorError> {
        fs::write(&unit.path, source).await.map_err(io_error)?;
        let tool = resolve_tool(&self.tool)?;

        // kill_on_drop covers every early exit below, including panics
        let mut child = Command::new(&tool.program)
            .args(tool.args(&unit.path))
            .current_dir(&unit.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecutorError::Launch {
                program: self.tool.program.display().to_string(),
                msg: e.to_string(),
            })?;
        tracing::debug!("Spawned tool, pid={:?}", child.id());

        let out_task = tokio::spawn(read_pipe(child.stdout.take()));
        let err_task = tokio::spawn(read_pipe(child.stderr.take()));
        let readers = [out_task.abort_handle(), err_task.abort_handle()];

        let collected = tokio::time::timeout(timeout, async {
            let status = child.wait().await.map_err(io_error)?;
            let stdout = out_task.await.map_err(io_error)?.map_err(io_error)?;
            let stderr = err_task.await.map_err(io_error)?.map_err(io_error)?;
            Ok::<_, ExecutorError>((status, stdout, stderr))
        })
        .await;

        match collected {
            Ok(result) => {
                let (status, stdout, stderr) = result?;
                tracing::debug!("Tool exited with {}", status);
                Ok(ExecutionResult {
                    stdout,
                    stderr,
                    timed_out: false,
                })
            }
            Err(_) => {
                tracing::warn!("Run exceeded {:?}, killing tool", timeout);
                if let Err(e) = child.kill().await {
                    tracing::error!("Failed to kill timed out tool: {}", e);
                }
                readers.iter().for_each(|reader| reader.abort());
                Ok(ExecutionResult::timed_out())
            }
        }
    }
}

#[async_trait::async_trait]
impl Executor for NativeExecutor {
    #[tracing::instrument(skip(self, source))]
    async fn run(
        &self,
        unit: &CompileUnit,
        source: &str,
        timeout: Duration,
    ) -> Result<ExecutionResult, ExecutorError> {
        let unit = CompileUnit {
            dir: std::path::absolute(&unit.dir).map_err(io_error)?,
            path: std::path::absolute(&unit.path).map_err(io_error)?,
        };
        fs::create_dir_all(&unit.dir).await.map_err(io_error)?;

        let result = self.execute(&unit, source, timeout).await;

        if let Err(e) = fs::remove_dir_all(&unit.dir).await {
            tracing::warn!("Failed to remove compile unit {}: {}", unit.dir.display(), e);
        }
        result
    }

    fn command_line(&self, unit: &CompileUnit) -> String {
        self.tool.display(&unit.path)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Instant;

    use uuid::Uuid;

    use super::*;
    use crate::constants::TIMEOUT_MSG;

    // Runs the compile unit as a shell script, which is enough to exercise
    // pipes, exit codes and timeouts without a Java runtime.
    fn shell_executor() -> NativeExecutor {
        let sh = std::env::var("SH_PATH").unwrap_or_else(|_| "/bin/sh".to_string());
        NativeExecutor::new(ToolCommand {
            program: PathBuf::from(sh),
            jar: None,
        })
    }

    // Spells an absolute path relative to the test's working directory.
    fn relative_to_cwd(path: &Path) -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        let mut relative = PathBuf::new();
        for _ in cwd.components().skip(1) {
            relative.push("..");
        }
        relative.join(path.strip_prefix("/").unwrap())
    }

    fn unit_in(dir: &Path) -> CompileUnit {
        CompileUnit::for_request(dir, Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_run_collects_stdout() {
        let work_dir = tempfile::tempdir().unwrap();
        let unit = unit_in(work_dir.path());

        let result = shell_executor()
            .run(
                &unit,
                "echo 'Prístup je povolený.'",
                Duration::from_secs(5),
            )
            .await;

        assert_eq!(
            result,
            Ok(ExecutionResult {
                stdout: "Prístup je povolený.\n".to_string(),
                stderr: String::new(),
                timed_out: false,
            })
        );
    }

    #[tokio::test]
    async fn test_run_collects_stderr_verbatim() {
        let work_dir = tempfile::tempdir().unwrap();
        let unit = unit_in(work_dir.path());

        let result = shell_executor()
            .run(
                &unit,
                "echo partial\necho 'Line 6, Column 30: boom' >&2\nexit 1",
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert_eq!(result.stdout, "partial\n");
        assert_eq!(result.stderr, "Line 6, Column 30: boom\n");
        assert!(!result.timed_out);
    }

    #[tokio::test]
    async fn test_run_times_out_and_returns_promptly() {
        let work_dir = tempfile::tempdir().unwrap();
        let unit = unit_in(work_dir.path());
        let timeout = Duration::from_millis(300);

        let started = Instant::now();
        let result = shell_executor()
            .run(&unit, "echo started\nwhile :; do :; done", timeout)
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert!(result.timed_out);
        assert_eq!(result.stdout, "");
        assert_eq!(result.stderr, TIMEOUT_MSG);
        assert!(
            elapsed < timeout + Duration::from_secs(2),
            "took {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_run_in_compile_unit_dir() {
        let work_dir = tempfile::tempdir().unwrap();
        let unit = unit_in(work_dir.path());

        let result = shell_executor()
            .run(&unit, "ls", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(result.stdout, "TempProgram.java\n");
    }

    #[tokio::test]
    async fn test_compile_unit_removed_after_run() {
        let work_dir = tempfile::tempdir().unwrap();
        let unit = unit_in(work_dir.path());

        shell_executor()
            .run(&unit, "echo hi", Duration::from_secs(5))
            .await
            .unwrap();

        assert!(!unit.dir.exists());

        let unit = unit_in(work_dir.path());
        shell_executor()
            .run(&unit, "while :; do :; done", Duration::from_millis(100))
            .await
            .unwrap();

        assert!(!unit.dir.exists());
    }

    #[tokio::test]
    async fn test_concurrent_runs_do_not_share_files() {
        let work_dir = tempfile::tempdir().unwrap();
        let executor = shell_executor();
        let first = unit_in(work_dir.path());
        let second = unit_in(work_dir.path());

        let (a, b) = tokio::join!(
            executor.run(&first, "sleep 0.2; cat TempProgram.java", Duration::from_secs(5)),
            executor.run(&second, "cat TempProgram.java", Duration::from_secs(5)),
        );

        assert_eq!(a.unwrap().stdout, "sleep 0.2; cat TempProgram.java");
        assert_eq!(b.unwrap().stdout, "cat TempProgram.java");
    }

    #[tokio::test]
    async fn test_missing_tool_is_launch_error() {
        let work_dir = tempfile::tempdir().unwrap();
        let unit = unit_in(work_dir.path());
        let executor = NativeExecutor::new(ToolCommand {
            program: PathBuf::from("/aboba/java"),
            jar: Some(PathBuf::from("/aboba/JaninoExecutor.jar")),
        });

        let result = executor.run(&unit, "class A {}", Duration::from_secs(1)).await;

        assert!(matches!(
            result,
            Err(ExecutorError::Launch { program, .. }) if program == "/aboba/java"
        ));
        assert!(!unit.dir.exists());
    }

    #[tokio::test]
    async fn test_relative_tool_path() {
        let work_dir = tempfile::tempdir().unwrap();
        let unit = unit_in(work_dir.path());
        let executor = NativeExecutor::new(ToolCommand {
            program: relative_to_cwd(Path::new("/bin/sh")),
            jar: None,
        });
        assert!(executor.tool.program.is_relative());

        let result = executor
            .run(&unit, "echo ok", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(result.stdout, "ok\n");
        assert_eq!(result.stderr, "");
    }

    #[tokio::test]
    async fn test_relative_work_dir() {
        let work_dir = tempfile::tempdir().unwrap();
        let unit = unit_in(&relative_to_cwd(work_dir.path()));
        assert!(unit.path.is_relative());

        let result = shell_executor()
            .run(&unit, "echo ok", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(result.stdout, "ok\n");
        assert_eq!(result.stderr, "");
        assert!(!unit.dir.exists());
    }

    #[tokio::test]
    async fn test_unwritable_work_dir_is_io_error() {
        // /proc is readonly dir
        let unit = CompileUnit::for_request("/proc/codegrader", Uuid::new_v4());

        let result = shell_executor()
            .run(&unit, "echo hi", Duration::from_secs(1))
            .await;

        assert!(matches!(result, Err(ExecutorError::Io { .. })));
    }

    #[test]
    fn test_command_line() {
        let executor = NativeExecutor::new(ToolCommand {
            program: PathBuf::from("/game/jdk/linux_x64/bin/java"),
            jar: Some(PathBuf::from("/game/JaninoExecutor.jar")),
        });
        let unit = CompileUnit {
            dir: PathBuf::from("/tmp/codegrader/1"),
            path: PathBuf::from("/tmp/codegrader/1/TempProgram.java"),
        };

        assert_eq!(
            executor.command_line(&unit),
            "/game/jdk/linux_x64/bin/java -jar \"/game/JaninoExecutor.jar\" \"/tmp/codegrader/1/TempProgram.java\""
        );
    }
}
