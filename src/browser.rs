//! Opening image URLs outside the terminal.

use std::io;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use tracing::{info, warn};

/// Platform opener: `open` on macOS, `xdg-open` elsewhere.
fn opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Hand `url` to the desktop's default browser without waiting for it.
pub fn open(url: &str) -> Result<()> {
    let program = opener();
    info!(%url, program, "opening image");
    let mut command = Command::new(program);
    command.arg(url);
    spawn_reaped(command).with_context(|| format!("failed to launch {program}"))?;
    Ok(())
}

/// Start `command` detached from the terminal and wait for it on a
/// background thread, so the exited child does not linger as a zombie.
fn spawn_reaped(mut command: Command) -> io::Result<JoinHandle<()>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    thread::Builder::new()
        .name("opener-reaper".into())
        .spawn(move || match child.wait() {
            Ok(status) if !status.success() => warn!(%status, "opener exited with failure"),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "waiting for opener failed"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn spawned_child_is_waited_for() {
        let handle = spawn_reaped(Command::new("true")).unwrap();
        // The reaper thread only finishes once `wait` has collected the child.
        handle.join().unwrap();
    }

    #[test]
    fn missing_program_is_an_error() {
        let command = Command::new("rover-dashboard-no-such-opener");
        assert!(spawn_reaped(command).is_err());
    }
}
