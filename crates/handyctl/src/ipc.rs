use std::io::Write;
use std::os::unix::net::UnixStream;
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/handy.sock";

#[derive(Debug, Error)]
pub enum IpcError {
    #[error("failed to connect to handy daemon at /tmp/handy.sock: {0}. Is handy running?")]
    Connect(#[source] std::io::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Sends one newline-terminated command line to the running daemon.
pub fn send_command(line: &str) -> Result<(), IpcError> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(IpcError::Connect)?;
    writeln!(stream, "{}", line.trim_end())?;
    Ok(())
}
