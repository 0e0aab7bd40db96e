// file: src/executor.rs
// version: 1.0.0
// guid: 570ef092-8854-4a09-af5b-a66fb214bc56

//! Process execution for external tools (`sweagent`, `docker`)

use crate::{error::BatchError, Result};
use std::fmt;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::{debug, warn};

/// A fully resolved external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    /// Shell-like rendering used for logs and dry runs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

/// Trait for running external commands to completion
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run with inherited stdout/stderr and return the exit code
    async fn run(&self, command: &CommandSpec) -> Result<i32>;
}

/// Runs commands as real child processes
#[derive(Debug, Default, Clone)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &CommandSpec) -> Result<i32> {
        debug!("Executing: {}", command);

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if let Some(ref dir) = command.cwd {
            cmd.current_dir(dir);
        }

        // Installed before the spawn so an early Ctrl+C cannot kill us first
        let mut interrupts = Interrupts::listen()?;

        let mut child = cmd
            .spawn()
            .map_err(|e| BatchError::spawn_failed(command.to_string(), e))?;

        // The child shares our process group and handles the interrupt itself
        let status = loop {
            tokio::select! {
                status = child.wait() => break status?,
                _ = interrupts.recv() => {
                    warn!("Interrupt received; waiting for {} to exit", command.program);
                }
            }
        };

        let code = exit_code(status);
        if code != 0 {
            warn!("{} exited with code {}", command.program, code);
        }
        Ok(code)
    }
}

/// Interrupt listener that stays registered while a child runs
struct Interrupts {
    #[cfg(unix)]
    inner: tokio::signal::unix::Signal,
}

impl Interrupts {
    #[cfg(unix)]
    fn listen() -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self {
            inner: signal(SignalKind::interrupt())?,
        })
    }

    #[cfg(not(unix))]
    fn listen() -> Result<Self> {
        Ok(Self {})
    }

    #[cfg(unix)]
    async fn recv(&mut self) {
        if self.inner.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Map a child's exit status to the code this process should report
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Run a command and turn a non-zero exit into a `ProcessError`
pub async fn run_checked(runner: &dyn CommandRunner, command: &CommandSpec) -> Result<()> {
    let code = runner.run(command).await?;
    if code != 0 {
        return Err(BatchError::ProcessError {
            command: command.to_string(),
            exit_code: Some(code),
            stderr: "see output above".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Records every command and replays scripted exit codes (default 0)
    #[derive(Default)]
    pub struct RecordingRunner {
        pub calls: Mutex<Vec<CommandSpec>>,
        pub exit_codes: Mutex<VecDeque<i32>>,
    }

    impl RecordingRunner {
        pub fn with_exit_codes(codes: &[i32]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                exit_codes: Mutex::new(codes.iter().copied().collect()),
            }
        }

        pub fn calls(&self) -> Vec<CommandSpec> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, command: &CommandSpec) -> Result<i32> {
            self.calls.lock().unwrap().push(command.clone());
            Ok(self.exit_codes.lock().unwrap().pop_front().unwrap_or(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingRunner;
    use super::*;

    #[test]
    fn test_display_quotes_unsafe_args() {
        let spec = CommandSpec::new("sweagent")
            .arg("run-batch")
            .arg("--instances.deployment.docker_args=--memory=10g")
            .arg("it's here");

        assert_eq!(
            spec.to_string(),
            r"sweagent run-batch --instances.deployment.docker_args=--memory=10g 'it'\''s here'"
        );
    }

    #[test]
    fn test_display_quotes_empty_arg() {
        let spec = CommandSpec::new("echo").arg("");
        assert_eq!(spec.to_string(), "echo ''");
    }

    #[tokio::test]
    async fn test_run_checked_maps_failure() {
        let runner = RecordingRunner::with_exit_codes(&[3]);
        let spec = CommandSpec::new("docker").arg("build");

        let err = run_checked(&runner, &spec).await.unwrap_err();
        assert!(matches!(
            err,
            BatchError::ProcessError {
                exit_code: Some(3),
                ..
            }
        ));
        assert_eq!(runner.calls(), vec![spec]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_reports_exit_codes() {
        let runner = SystemRunner::new();

        let ok = runner.run(&CommandSpec::new("true")).await.unwrap();
        assert_eq!(ok, 0);

        let failed = runner
            .run(&CommandSpec::new("sh").args(["-c", "exit 7"]))
            .await
            .unwrap();
        assert_eq!(failed, 7);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_honours_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemRunner::new();

        let code = runner
            .run(&CommandSpec::new("sh").args(["-c", "touch marker"]).current_dir(dir.path()))
            .await
            .unwrap();

        assert_eq!(code, 0);
        assert!(dir.path().join("marker").exists());
    }

    #[tokio::test]
    async fn test_system_runner_missing_program() {
        let runner = SystemRunner::new();
        let err = runner
            .run(&CommandSpec::new("definitely-not-a-real-binary-xyz"))
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::ProcessError { exit_code: None, .. }));
    }
}
