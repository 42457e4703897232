//! Process runner - subprocess launches with a stdio policy and timeouts
//!
//! Every external effect in the application goes through this module. The
//! contract is exit-status oriented: spawn failures and expired timeouts
//! both normalize to [`FAILURE_CODE`] instead of raising, and a timed-out
//! child is killed and reaped before the result is returned.

use std::io::Read;
use std::process::{Command, Stdio};
use std::time::Duration;

use wait_timeout::ChildExt;

/// Sentinel exit code for spawn failures and timeouts.
pub const FAILURE_CODE: i32 = 1;

/// How a child process shares the controlling terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioPolicy {
    /// All streams discarded.
    Silent,
    /// Child takes over the terminal (interactive sessions).
    Inherit,
    /// Output captured for inspection.
    Piped,
}

/// A command description: program, argument vector, stdio policy, timeout.
#[derive(Debug, Clone)]
pub struct Exec {
    program: String,
    args: Vec<String>,
    stdio: StdioPolicy,
    timeout: Option<Duration>,
}

impl Exec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdio: StdioPolicy::Silent,
            timeout: None,
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

    pub fn stdio(mut self, policy: StdioPolicy) -> Self {
        self.stdio = policy;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn argv(&self) -> &[String] {
        &self.args
    }

    fn command(&self, capture: bool) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if capture {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::null());
        } else {
            match self.stdio {
                StdioPolicy::Silent => {
                    cmd.stdin(Stdio::null())
                        .stdout(Stdio::null())
                        .stderr(Stdio::null());
                }
                StdioPolicy::Inherit => {
                    cmd.stdin(Stdio::inherit())
                        .stdout(Stdio::inherit())
                        .stderr(Stdio::inherit());
                }
                StdioPolicy::Piped => {
                    cmd.stdin(Stdio::null())
                        .stdout(Stdio::piped())
                        .stderr(Stdio::piped());
                }
            }
        }
        cmd
    }
}

/// Exit status and captured stdout of a finished command.
#[derive(Debug, Clone, Default)]
pub struct CmdOutput {
    pub code: i32,
    pub stdout: String,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    fn failure() -> Self {
        Self {
            code: FAILURE_CODE,
            stdout: String::new(),
        }
    }
}

/// Runs external commands on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run a command to completion and return its exit code.
    pub async fn run(&self, exec: &Exec) -> i32 {
        self.execute(exec, false).await.code
    }

    /// Run a command to completion, capturing stdout.
    pub async fn output(&self, exec: &Exec) -> CmdOutput {
        self.execute(exec, true).await
    }

    async fn execute(&self, exec: &Exec, capture: bool) -> CmdOutput {
        let exec = exec.clone();
        tokio::task::spawn_blocking(move || run_blocking(&exec, capture))
            .await
            .unwrap_or_else(|_| CmdOutput::failure())
    }

    /// Fire-and-forget phase 1: spawn detached and return immediately.
    ///
    /// There is no completion signal; callers follow up with
    /// [`assume_complete_after`](Self::assume_complete_after).
    pub fn trigger(&self, exec: &Exec) {
        let _ = exec.command(false).spawn();
    }

    /// Fire-and-forget phase 2: the explicit, named wait after a trigger.
    pub async fn assume_complete_after(&self, wait: Duration) {
        crate::term::pause(wait).await;
    }
}

fn run_blocking(exec: &Exec, capture: bool) -> CmdOutput {
    let mut child = match exec.command(capture).spawn() {
        Ok(child) => child,
        Err(err) => {
            tracing::debug!(program = exec.program(), error = %err, "spawn failed");
            return CmdOutput::failure();
        }
    };

    let status = match exec.timeout {
        Some(timeout) => match child.wait_timeout(timeout) {
            Ok(Some(status)) => Some(status),
            _ => {
                // Timeout or wait error: kill and reap before reporting.
                let _ = child.kill();
                let _ = child.wait();
                None
            }
        },
        None => child.wait().ok(),
    };

    let stdout = if capture {
        child
            .stdout
            .take()
            .map(|mut s| {
                let mut buf = String::new();
                s.read_to_string(&mut buf).ok();
                buf
            })
            .unwrap_or_default()
    } else {
        String::new()
    };

    let code = status
        .map(|s| s.code().unwrap_or(FAILURE_CODE))
        .unwrap_or(FAILURE_CODE);

    CmdOutput { code, stdout }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_argv() {
        let exec = Exec::new("git")
            .arg("fetch")
            .args(["origin", "--tags"])
            .stdio(StdioPolicy::Piped)
            .timeout(Duration::from_secs(4));
        assert_eq!(exec.program(), "git");
        assert_eq!(exec.argv(), ["fetch", "origin", "--tags"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_reports_exit_code() {
        let runner = ProcessRunner::new();
        let code = runner.run(&Exec::new("sh").args(["-c", "exit 7"])).await;
        assert_eq!(code, 7);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_normalizes_spawn_failure() {
        let runner = ProcessRunner::new();
        let code = runner.run(&Exec::new("definitely-not-a-binary-xtl")).await;
        assert_eq!(code, FAILURE_CODE);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_kills_and_reports_failure() {
        let runner = ProcessRunner::new();
        let exec = Exec::new("sh")
            .args(["-c", "sleep 5"])
            .timeout(Duration::from_millis(200));
        let started = std::time::Instant::now();
        let code = runner.run(&exec).await;
        assert_eq!(code, FAILURE_CODE);
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn output_captures_stdout() {
        let runner = ProcessRunner::new();
        let out = runner
            .output(&Exec::new("sh").args(["-c", "echo hello"]))
            .await;
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn output_of_missing_binary_is_failure() {
        let runner = ProcessRunner::new();
        let out = runner.output(&Exec::new("definitely-not-a-binary-xtl")).await;
        assert_eq!(out.code, FAILURE_CODE);
        assert!(out.stdout.is_empty());
    }
}
