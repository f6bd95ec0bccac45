use laraship_core::{Directory, ImageSpec};

/// Abstraction over the container engine that evaluates [`ImageSpec`]s.
///
/// Production code uses the Docker backend, tests use mockall-generated mocks.
/// Every method evaluates the image it is given from scratch; engines may reuse
/// their own layer caches but never state from earlier calls.
#[allow(async_fn_in_trait)]
pub trait ContainerEngine: Send + Sync {
    /// Evaluate `image` and copy the directory at `path` out as an artifact.
    async fn export_directory(&self, image: &ImageSpec, path: &str)
    -> Result<Directory, EngineError>;

    /// Evaluate `image` and return the text contents of the file at `path`.
    async fn read_file(&self, image: &ImageSpec, path: &str) -> Result<String, EngineError>;

    /// Evaluate `image`, run `args` in it and capture stdout.
    async fn run(&self, image: &ImageSpec, args: &[String]) -> Result<String, EngineError>;

    /// Evaluate `image` and return an engine-specific image reference.
    async fn materialize(&self, image: &ImageSpec) -> Result<String, EngineError>;

    /// Evaluate `image` and start it as a long-running service publishing
    /// its exposed ports.
    async fn start_service(&self, image: &ImageSpec) -> Result<Service, EngineError>;

    async fn stop_service(&self, service: &Service) -> Result<(), EngineError>;
}

/// Resolves the server-side dependency bundle for a source tree.
#[allow(async_fn_in_trait)]
pub trait DependencyInstaller: Send + Sync {
    /// Install dependencies for `source`. With `enable_cache` the installer
    /// may reuse a previous resolution.
    async fn install(&self, source: &Directory, enable_cache: bool)
    -> Result<Directory, InstallError>;
}

/// Handle to a running service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    /// Engine identifier (a container id for Docker).
    pub id: String,
    /// Published TCP ports.
    pub ports: Vec<u16>,
}

/// Failure reported by a container engine.
///
/// Displays exactly as the underlying engine error does.
#[derive(Debug, thiserror::Error)]
#[error("{inner}")]
pub struct EngineError {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl EngineError {
    pub fn new(inner: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            inner: inner.into(),
        }
    }

    pub fn downcast_ref<T: std::error::Error + 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("{message}")]
    Tool { message: String },
}
