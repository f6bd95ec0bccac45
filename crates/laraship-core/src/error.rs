use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Source snapshots ──
    #[error("source directory {path} does not exist")]
    SourceMissing { path: PathBuf },

    #[error("invalid ignore pattern {pattern:?}")]
    InvalidIgnore {
        pattern: String,
        source: ignore::Error,
    },

    #[error("failed to walk source directory {path}")]
    SourceWalk {
        path: PathBuf,
        source: ignore::Error,
    },

    #[error("failed to read source file {path}")]
    SourceRead {
        path: PathBuf,
        source: std::io::Error,
    },
}
