//! ICMP reachability through the operating system's `ping` utility.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::platform::PingFlavor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingOutcome {
    /// `ping` exited with status zero.
    Reachable,
    /// `ping` ran but exited non-zero; carries its stderr.
    Unreachable { stderr: String },
    /// `ping` was still running when the timeout fired.
    TimedOut,
    /// `ping` could not be run at all.
    Failed { error: String },
}

pub trait Pinger: Send + Sync {
    fn ping(&self, host: &str, count: u32, timeout: Duration) -> PingOutcome;
}

/// Runs the platform `ping` binary with flags for the detected OS.
#[derive(Debug, Clone)]
pub struct SystemPinger {
    program: String,
    flavor: PingFlavor,
}

impl SystemPinger {
    pub fn detect() -> Self {
        Self::new("ping", PingFlavor::detect())
    }

    pub fn new(program: impl Into<String>, flavor: PingFlavor) -> Self {
        Self {
            program: program.into(),
            flavor,
        }
    }

    async fn run(&self, host: &str, count: u32, timeout: Duration) -> PingOutcome {
        let args = self.flavor.args(host, count);
        debug!(program = %self.program, ?args, "running ping");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(c) => c,
            Err(e) => {
                return PingOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        // Dropping the wait future on timeout kills the child.
        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Err(_) => PingOutcome::TimedOut,
            Ok(Err(e)) => PingOutcome::Failed {
                error: e.to_string(),
            },
            Ok(Ok(output)) if output.status.success() => PingOutcome::Reachable,
            Ok(Ok(output)) => PingOutcome::Unreachable {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            },
        }
    }
}

impl Pinger for SystemPinger {
    fn ping(&self, host: &str, count: u32, timeout: Duration) -> PingOutcome {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                return PingOutcome::Failed {
                    error: format!("building runtime: {}", e),
                }
            }
        };
        runtime.block_on(self.run(host, count, timeout))
    }
}
