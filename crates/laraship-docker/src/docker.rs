#[derive(Debug, thiserror::Error)]
pub enum DockerError {
    #[error("docker CLI not found — install: https://docs.docker.com/get-docker/")]
    NotFound { source: std::io::Error },

    #[error("failed to run docker")]
    Spawn { source: std::io::Error },

    #[error("docker command failed: {args:?}\n{stderr}")]
    CommandFailed { args: Vec<String>, stderr: String },

    #[error("docker {args:?} exited with {}", exit_status(.code))]
    Exited { args: Vec<String>, code: Option<i32> },

    #[error("docker output was not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },

    #[error("failed to write to docker stdin")]
    StdinWrite { source: std::io::Error },

    #[error("failed to stage build context at {path}")]
    Stage {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("failed to snapshot exported directory")]
    Snapshot { source: laraship_core::Error },

    #[error("cannot run an empty command")]
    EmptyCommand,
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "a signal".to_owned(),
    }
}
