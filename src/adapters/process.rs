//! Child process plumbing shared by the ffmpeg adapters

use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::DomainError;

/// Captured result of one child process
#[derive(Debug)]
pub struct ProcessOutput {
    pub code: i32,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Run `program` to completion, optionally feeding `stdin`
pub async fn run(
    program: &Path,
    args: &[String],
    cwd: Option<&Path>,
    stdin: Option<Vec<u8>>,
) -> Result<ProcessOutput, DomainError> {
    debug!(program = %program.display(), ?args, "spawning");

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let mut child = command.spawn().map_err(|e| {
        DomainError::EngineFail(format!("Failed to start {}: {}", program.display(), e))
    })?;

    // Feed stdin from a separate task so a full stdout pipe cannot deadlock us
    let feeder = match (stdin, child.stdin.take()) {
        (Some(bytes), Some(mut pipe)) => Some(tokio::spawn(async move {
            let result = pipe.write_all(&bytes).await;
            drop(pipe);
            result
        })),
        _ => None,
    };

    let output = child.wait_with_output().await.map_err(|e| {
        DomainError::EngineFail(format!("Failed to wait for {}: {}", program.display(), e))
    })?;

    if let Some(handle) = feeder {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => {
                return Err(DomainError::EngineFail(format!(
                    "Failed to write stdin of {}: {}",
                    program.display(),
                    e
                )))
            }
            Err(e) => return Err(DomainError::InternalError(format!("stdin task: {}", e))),
        }
    }

    Ok(ProcessOutput {
        code: output.status.code().unwrap_or(-1),
        stdout: output.stdout,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
