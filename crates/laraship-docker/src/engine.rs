use crate::docker::DockerError;
use crate::dockerfile::{BuildContext, DockerfileGenerator};
use crate::executor::{DockerExecutor, RealExecutor};
use laraship_build::{ContainerEngine, EngineError, Service};
use laraship_core::{Directory, ImageSpec};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// [`ContainerEngine`] backed by the docker CLI, parameterized over the
/// executor for testability.
///
/// Every evaluation renders the image spec to a Dockerfile and runs `docker build`;
/// Docker's layer cache makes repeated builds of unchanged specs cheap.
/// Exported directories live in a temporary workspace that is removed when
/// the last clone of the engine is dropped.
#[derive(Clone)]
pub struct DockerEngine<X: DockerExecutor = RealExecutor> {
    executor: X,
    workspace: Arc<tempfile::TempDir>,
}

impl DockerEngine<RealExecutor> {
    pub fn new() -> Result<Self, DockerError> {
        Self::with_executor(RealExecutor)
    }
}

impl<X: DockerExecutor> DockerEngine<X> {
    pub fn with_executor(executor: X) -> Result<Self, DockerError> {
        let workspace = tempfile::Builder::new()
            .prefix("laraship-")
            .tempdir()
            .map_err(|e| DockerError::Stage {
                path: std::env::temp_dir(),
                source: e,
            })?;
        Ok(Self {
            executor,
            workspace: Arc::new(workspace),
        })
    }

    pub fn executor(&self) -> &X {
        &self.executor
    }

    /// Directory exported artifacts are written under.
    pub fn workspace(&self) -> &Path {
        self.workspace.path()
    }

    // ── Build ──

    /// Build `image` and return its tag.
    pub async fn build_image(&self, image: &ImageSpec) -> Result<String, DockerError> {
        let generator = DockerfileGenerator::new(image);
        let dockerfile = generator.render();
        let tag = generator.tag();
        let context = BuildContext::stage(image)?;
        let context_str = context.path().to_string_lossy().into_owned();

        tracing::debug!(%tag, base = image.base(), "docker build");
        self.executor
            .pipe(
                &args(["build", "--quiet", "--tag", &tag, "--file", "-", &context_str]),
                dockerfile.as_bytes(),
            )
            .await?;

        Ok(tag)
    }

    // ── Containers ──

    pub async fn cat(&self, image: &ImageSpec, path: &str) -> Result<String, DockerError> {
        let tag = self.build_image(image).await?;
        self.executor
            .output(&args(["run", "--rm", "--entrypoint", "cat", &tag, path]))
            .await
    }

    pub async fn run_command(
        &self,
        image: &ImageSpec,
        command: &[String],
    ) -> Result<String, DockerError> {
        let (program, rest) = command.split_first().ok_or(DockerError::EmptyCommand)?;
        let tag = self.build_image(image).await?;

        let mut cmd = args(["run", "--rm", "--entrypoint", program, &tag]);
        cmd.extend(rest.iter().cloned());
        self.executor.output(&cmd).await
    }

    /// Copy `path` out of a container created from `image`.
    ///
    /// The container is removed whether or not the copy succeeds.
    pub async fn copy_out(&self, image: &ImageSpec, path: &str) -> Result<Directory, DockerError> {
        let tag = self.build_image(image).await?;
        let container = self
            .executor
            .output(&args(["create", &tag]))
            .await?
            .trim()
            .to_owned();

        let dest = self.export_path(&tag, path);
        if dest.exists() {
            std::fs::remove_dir_all(&dest).map_err(|e| DockerError::Stage {
                path: dest.clone(),
                source: e,
            })?;
        }
        let src = format!("{container}:{}/.", path.trim_end_matches('/'));
        let dest_str = dest.to_string_lossy().into_owned();

        let copied = self.executor.output(&args(["cp", &src, &dest_str])).await;
        let removed = self.executor.output(&args(["rm", &container])).await;
        copied?;
        removed?;

        Directory::snapshot(&dest, &[]).map_err(|e| DockerError::Snapshot { source: e })
    }

    /// Start `image` detached, publishing `ports` on the same host ports.
    pub async fn run_detached(
        &self,
        image: &ImageSpec,
        ports: &[u16],
    ) -> Result<String, DockerError> {
        let tag = self.build_image(image).await?;

        let mut cmd = args(["run", "--detach"]);
        for port in ports {
            cmd.push("--publish".to_owned());
            cmd.push(format!("{port}:{port}"));
        }
        cmd.push(tag);

        let id = self.executor.output(&cmd).await?;
        Ok(id.trim().to_owned())
    }

    pub async fn remove_container(&self, id: &str) -> Result<(), DockerError> {
        self.executor
            .output(&args(["rm", "--force", id]))
            .await
            .map(|_| ())
    }

    /// Follow a container's logs until it exits.
    pub async fn follow_logs(&self, id: &str) -> Result<(), DockerError> {
        self.executor
            .attach(&args(["logs", "--follow", id]))
            .await
    }

    fn export_path(&self, tag: &str, path: &str) -> PathBuf {
        let image = tag.rsplit(':').next().unwrap_or(tag);
        let slug: String = path
            .trim_matches('/')
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        self.workspace.path().join(format!("{image}-{slug}"))
    }
}

impl<X: DockerExecutor> ContainerEngine for DockerEngine<X> {
    async fn export_directory(
        &self,
        image: &ImageSpec,
        path: &str,
    ) -> Result<Directory, EngineError> {
        self.copy_out(image, path).await.map_err(EngineError::new)
    }

    async fn read_file(&self, image: &ImageSpec, path: &str) -> Result<String, EngineError> {
        self.cat(image, path).await.map_err(EngineError::new)
    }

    async fn run(&self, image: &ImageSpec, args: &[String]) -> Result<String, EngineError> {
        self.run_command(image, args)
            .await
            .map_err(EngineError::new)
    }

    async fn materialize(&self, image: &ImageSpec) -> Result<String, EngineError> {
        self.build_image(image).await.map_err(EngineError::new)
    }

    async fn start_service(&self, image: &ImageSpec) -> Result<Service, EngineError> {
        let ports = image.exposed_ports();
        let id = self
            .run_detached(image, &ports)
            .await
            .map_err(EngineError::new)?;
        tracing::info!(container = %id, ?ports, "service started");
        Ok(Service { id, ports })
    }

    async fn stop_service(&self, service: &Service) -> Result<(), EngineError> {
        self.remove_container(&service.id)
            .await
            .map_err(EngineError::new)
    }
}

// ── Helper ──

pub(crate) fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}
