use crate::docker::DockerError;
use std::process::{Output, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// The three ways laraship talks to the docker CLI.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait DockerExecutor: Send + Sync {
    /// `docker <args>`, returning stdout (`create`, `run --rm`, `cp`, `info`).
    async fn output(&self, args: &[String]) -> Result<String, DockerError>;

    /// `docker <args>` attached to this terminal until it exits (`logs --follow`).
    async fn attach(&self, args: &[String]) -> Result<(), DockerError>;

    /// `docker <args>` with `input` on stdin, returning stdout
    /// (`build --file -` with the rendered Dockerfile).
    async fn pipe(&self, args: &[String], input: &[u8]) -> Result<String, DockerError>;
}

/// Runs the `docker` binary found on `PATH`.
///
/// BuildKit is always enabled because rendered Dockerfiles may use
/// `RUN --mount=type=cache`. CLI hints are disabled so they never end up in
/// captured stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealExecutor;

impl DockerExecutor for RealExecutor {
    async fn output(&self, args: &[String]) -> Result<String, DockerError> {
        tracing::debug!(?args, "docker");
        let output = docker(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(spawn_error)?;
        captured(args, output)
    }

    async fn attach(&self, args: &[String]) -> Result<(), DockerError> {
        tracing::debug!(?args, "docker (attached)");
        let status = docker(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(spawn_error)?;

        if status.success() {
            Ok(())
        } else {
            Err(DockerError::Exited {
                args: args.to_vec(),
                code: status.code(),
            })
        }
    }

    async fn pipe(&self, args: &[String], input: &[u8]) -> Result<String, DockerError> {
        tracing::debug!(?args, input_bytes = input.len(), "docker (stdin)");
        let mut child = docker(args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // Feed stdin while draining stdout/stderr; docker may start writing
        // before it has read the whole Dockerfile.
        let stdin = child.stdin.take();
        let write = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };
        let (written, output) = tokio::join!(write, child.wait_with_output());

        let output = output.map_err(spawn_error)?;
        // A failed command usually closes stdin early; its stderr says why.
        if output.status.success() {
            written.map_err(|e| DockerError::StdinWrite { source: e })?;
        }
        captured(args, output)
    }
}

fn docker(args: &[String]) -> Command {
    let mut cmd = Command::new("docker");
    cmd.args(args)
        .env("DOCKER_BUILDKIT", "1")
        .env("DOCKER_CLI_HINTS", "false")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

fn spawn_error(e: std::io::Error) -> DockerError {
    if e.kind() == std::io::ErrorKind::NotFound {
        DockerError::NotFound { source: e }
    } else {
        DockerError::Spawn { source: e }
    }
}

/// Stdout of a finished command, or its stderr as the failure.
fn captured(args: &[String], output: Output) -> Result<String, DockerError> {
    if !output.status.success() {
        return Err(DockerError::CommandFailed {
            args: args.to_vec(),
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_owned(),
        });
    }
    String::from_utf8(output.stdout).map_err(|e| DockerError::InvalidUtf8 { source: e })
}
