use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;

const COPY_COMMAND: &str = "wl-copy";

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to run wl-copy: {0}")]
    Io(#[from] std::io::Error),
    #[error("wl-copy exited with {0}")]
    Exit(std::process::ExitStatus),
}

/// Replaces the clipboard contents with `text`.
pub fn copy_text(text: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(COPY_COMMAND)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(ClipboardError::Exit(status));
    }
    Ok(())
}
