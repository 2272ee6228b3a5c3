use std::io;
use std::process::{ExitStatus, Stdio};

use tokio::io::AsyncRead;
use tokio::process::Command;

use crate::error::ToolError;
use crate::logging::LogChannel;
use crate::process::classifier::{LineReader, StreamKind, TextEncoding};
use crate::process::commands::ToolInvocation;

/// How a finished tool ended, plus any stdout lines that were kept
#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub captured: Vec<String>,
}

impl ToolOutput {
    /// Turn a non-zero exit into an error
    pub fn check(&self, tool: &str) -> Result<(), ToolError> {
        if self.status.success() {
            Ok(())
        } else {
            Err(ToolError::Exited {
                tool: tool.to_string(),
                status: self.status.to_string(),
            })
        }
    }
}

/// Run a tool to completion, logging its output as it arrives
///
/// Both pipes are drained side by side on the current task so neither can
/// fill up and stall the child. Every line goes to `channel`; with
/// `capture_stdout` the stdout lines are also kept and logged at debug level
/// only. There is no timeout: a tool that never exits blocks here.
pub async fn run_tool(
    invocation: &ToolInvocation,
    channel: &LogChannel,
    encoding: TextEncoding,
    capture_stdout: bool,
) -> Result<ToolOutput, ToolError> {
    let tool = invocation.program().to_string();
    channel.debug(format!("Running: {}", invocation));

    let mut child = Command::new(invocation.program())
        .args(invocation.arguments())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ToolError::SpawnFailed {
            tool: tool.clone(),
            source,
        })?;

    let read_failed = |source: io::Error| ToolError::ReadFailed {
        tool: tool.clone(),
        source,
    };
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| read_failed(io::Error::other("stdout was not captured")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| read_failed(io::Error::other("stderr was not captured")))?;

    let (stdout_lines, stderr_lines) = tokio::join!(
        drain(LineReader::new(stdout, StreamKind::Stdout, encoding), channel, capture_stdout),
        drain(LineReader::new(stderr, StreamKind::Stderr, encoding), channel, false),
    );

    let status = child.wait().await.map_err(read_failed)?;
    let captured = stdout_lines.map_err(read_failed)?;
    stderr_lines.map_err(read_failed)?;

    channel.debug(format!("{} finished with {}", tool, status));
    Ok(ToolOutput { status, captured })
}

async fn drain<R: AsyncRead + Unpin>(
    mut reader: LineReader<R>,
    channel: &LogChannel,
    capture: bool,
) -> io::Result<Vec<String>> {
    let mut captured = Vec::new();
    while let Some(line) = reader.next_line().await? {
        if capture {
            channel.debug(&line.text);
            captured.push(line.text);
        } else {
            channel.info(&line.text);
        }
    }
    Ok(captured)
}
