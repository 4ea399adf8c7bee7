//! Child process execution with captured output and an optional timeout.
//!
//! Matches spec.md §6's process launcher contract: stdout/stderr are
//! streamed to caller-supplied callbacks as they arrive, and a positive
//! `max_time_milliseconds` enforces the graceful-terminate-then-kill
//! policy from spec.md §5 (10ms poll granularity, 2s grace period).

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const KILL_GRACE_PERIOD: Duration = Duration::from_secs(2);

/// Result of a completed (or killed) child process.
#[derive(Debug, Clone, Copy)]
pub struct RunOutcome {
    /// Exit status, or -1 if the process was killed before exiting cleanly.
    pub status: i32,
    pub killed: bool,
}

enum Chunk {
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
}

/// Run `program` with `args` in `working_folder`, streaming stdout/stderr to
/// the given callbacks. If `max_time_milliseconds` is non-zero, the process
/// is sent a termination signal once the deadline passes, and killed outright
/// two seconds later if it hasn't exited.
#[tracing::instrument(skip(on_stdout, on_stderr), fields(argc = args.len()))]
pub fn run(
    working_folder: &Path,
    program: &str,
    args: &[String],
    mut on_stdout: impl FnMut(&str),
    mut on_stderr: impl FnMut(&str),
    max_time_milliseconds: u64,
) -> Result<RunOutcome> {
    tracing::debug!(?working_folder, max_time_milliseconds, "spawning child process");
    let mut child = Command::new(program)
        .args(args)
        .current_dir(working_folder)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to launch `{program}`"))?;

    let stdout = child.stdout.take().expect("stdout was piped");
    let stderr = child.stderr.take().expect("stderr was piped");

    let (tx, rx) = mpsc::channel();
    let out_tx = tx.clone();
    let out_thread = thread::spawn(move || pump(stdout, Chunk::Stdout as fn(Vec<u8>) -> Chunk, out_tx));
    let err_thread = thread::spawn(move || pump(stderr, Chunk::Stderr as fn(Vec<u8>) -> Chunk, tx));

    let deadline = (max_time_milliseconds > 0)
        .then(|| Duration::from_millis(max_time_milliseconds));
    let start = Instant::now();
    let mut terminate_sent_at: Option<Instant> = None;
    let mut killed = false;

    let status = loop {
        drain(&rx, &mut on_stdout, &mut on_stderr);

        if let Some(status) = child.try_wait()? {
            break status.code().unwrap_or(-1);
        }

        if let Some(deadline) = deadline {
            if terminate_sent_at.is_none() && start.elapsed() >= deadline {
                terminate(&mut child);
                terminate_sent_at = Some(Instant::now());
            } else if let Some(sent_at) = terminate_sent_at {
                if sent_at.elapsed() >= KILL_GRACE_PERIOD {
                    let _ = child.kill();
                    let _ = child.wait();
                    killed = true;
                }
            }
        }

        thread::sleep(POLL_INTERVAL);
    };

    let _ = out_thread.join();
    let _ = err_thread.join();
    drain(&rx, &mut on_stdout, &mut on_stderr);

    Ok(RunOutcome {
        status: if killed { -1 } else { status },
        killed,
    })
}

fn drain(rx: &mpsc::Receiver<Chunk>, on_stdout: &mut impl FnMut(&str), on_stderr: &mut impl FnMut(&str)) {
    while let Ok(chunk) = rx.try_recv() {
        match chunk {
            Chunk::Stdout(bytes) => on_stdout(&String::from_utf8_lossy(&bytes)),
            Chunk::Stderr(bytes) => on_stderr(&String::from_utf8_lossy(&bytes)),
        }
    }
}

fn pump(mut reader: impl Read, wrap: fn(Vec<u8>) -> Chunk, tx: mpsc::Sender<Chunk>) {
    let mut buf = [0u8; 4096];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if tx.send(wrap(buf[..n].to_vec())).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    }
}

#[cfg(unix)]
fn terminate(child: &mut Child) {
    unsafe {
        libc::kill(child.id() as libc::pid_t, libc::SIGTERM);
    }
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) {
    // Windows has no graceful terminate signal reachable from std; the
    // kill two seconds later is the only lever we have either way.
    let _ = child.kill();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cwd() -> PathBuf {
        std::env::current_dir().unwrap()
    }

    #[test]
    fn captures_stdout() {
        let mut out = String::new();
        let outcome = run(
            &cwd(),
            "echo",
            &["hello".to_string()],
            |s| out.push_str(s),
            |_| {},
            0,
        )
        .unwrap();
        assert_eq!(outcome.status, 0);
        assert!(!outcome.killed);
        assert!(out.contains("hello"));
    }

    #[test]
    fn timeout_kills_long_running_process() {
        let start = Instant::now();
        let outcome = run(
            &cwd(),
            "sleep",
            &["10".to_string()],
            |_| {},
            |_| {},
            100,
        )
        .unwrap();
        assert!(outcome.killed);
        assert!(start.elapsed() < Duration::from_millis(2_500));
    }
}
