//! Invocation of external helper binaries (unpaper, tesseract) with a hard
//! timeout. A tool that exceeds its deadline is killed and reported as a
//! timeout; callers decide whether that degrades to a fallback or to an
//! omitted feature.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Run a command to completion, capturing stdout, killing it if it runs
/// longer than `timeout`.
pub fn run_with_timeout(mut cmd: Command, timeout: Duration) -> io::Result<ToolOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    let mut child = cmd.spawn()?;

    // Drain stdout on a separate thread so a chatty child cannot block on a
    // full pipe while we poll for exit.
    let reader = child.stdout.take().map(|mut out| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            out.read_to_end(&mut buf).ok();
            buf
        })
    });

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            let stdout = reader
                .map(|handle| handle.join().unwrap_or_default())
                .unwrap_or_default();
            return Ok(ToolOutput { status, stdout });
        }
        if Instant::now() >= deadline {
            kill_and_reap(&mut child);
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "external tool timed out",
            ));
        }
        thread::sleep(Duration::from_millis(50));
    }
}

/// Check whether a binary responds to a probe invocation (e.g. `--version`).
pub fn probe(binary: &str, probe_arg: &str, timeout: Duration) -> bool {
    let mut cmd = Command::new(binary);
    cmd.arg(probe_arg);
    matches!(run_with_timeout(cmd, timeout), Ok(out) if out.success())
}

fn kill_and_reap(child: &mut Child) {
    child.kill().ok();
    child.wait().ok();
}
