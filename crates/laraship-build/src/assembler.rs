use crate::artisan::artisan_args;
use crate::engine::{ContainerEngine, DependencyInstaller, EngineError, InstallError, Service};
use crate::nginx::rewrite_document_root;
use laraship_core::{BuildConfig, Directory, ImageSpec};

/// Port the runtime image serves HTTP on.
pub const HTTP_PORT: u16 = 8080;

/// Working directory of the front-end build container.
const NODE_WORKDIR: &str = "/app";

/// Assembles the Laravel runtime image and derives commands and services from it.
///
/// Every public operation rebuilds from the source snapshot; nothing is kept
/// between calls.
pub struct ImageAssembler<E: ContainerEngine, I: DependencyInstaller> {
    engine: E,
    installer: I,
    source: Directory,
    config: BuildConfig,
}

impl<E: ContainerEngine, I: DependencyInstaller> ImageAssembler<E, I> {
    pub fn new(engine: E, installer: I, source: Directory, config: BuildConfig) -> Self {
        Self {
            engine,
            installer,
            source,
            config,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Build the runtime image.
    ///
    /// Steps run strictly in order and the first failure is returned as-is:
    /// dependencies, front-end assets, runtime layout, system packages,
    /// nginx document root.
    pub async fn build(&self) -> Result<ImageSpec, BuildError> {
        let cfg = &self.config;

        tracing::info!(enable_cache = cfg.enable_cache, "installing dependencies");
        let vendor = self
            .installer
            .install(&self.source, cfg.enable_cache)
            .await?;

        let assets = if cfg.frontend {
            tracing::info!(image = %cfg.node_image, "building front-end assets");
            Some(self.build_assets(&vendor).await?)
        } else {
            tracing::info!("front-end build disabled");
            None
        };

        let app_dir = cfg.app_dir.trim_end_matches('/');
        let mut image = ImageSpec::new(&cfg.runtime_image)
            .with_mounted_directory(app_dir, &self.source, &cfg.owner)
            .with_directory(format!("{app_dir}/vendor"), &vendor);
        if let Some(assets) = &assets {
            image = image.with_directory(format!("{app_dir}/public/build"), assets);
        }

        if !cfg.extra_packages.is_empty() {
            tracing::info!(packages = ?cfg.extra_packages, "installing system packages");
            image = image
                .with_user(&cfg.privileged_user)
                .with_exec(
                    ["apk", "add", "--no-cache"]
                        .into_iter()
                        .map(str::to_owned)
                        .chain(cfg.extra_packages.iter().cloned()),
                )
                .with_user(&cfg.owner);
        }

        tracing::info!(path = %cfg.nginx_config, "patching nginx document root");
        let original = self.engine.read_file(&image, &cfg.nginx_config).await?;
        let config = match rewrite_document_root(&original, app_dir)? {
            Some(patched) => patched,
            None if cfg.strict_docroot => {
                return Err(BuildError::DocumentRootNotFound {
                    path: cfg.nginx_config.clone(),
                    app_dir: app_dir.to_owned(),
                });
            }
            None => {
                tracing::warn!(
                    path = %cfg.nginx_config,
                    app_dir,
                    "no document root directive found, config left unchanged"
                );
                original
            }
        };

        Ok(image.with_new_file(&cfg.nginx_config, config))
    }

    /// Run `php artisan <command_line>` in a freshly built image and return stdout.
    pub async fn artisan(&self, command_line: &str) -> Result<String, BuildError> {
        let image = self.build().await?;
        let args = artisan_args(command_line);
        tracing::info!(?args, "running artisan");
        Ok(self.engine.run(&image, &args).await?)
    }

    /// Build the image and start it as a service on [`HTTP_PORT`].
    pub async fn serve(&self) -> Result<Service, BuildError> {
        let image = self.build().await?.with_exposed_port(HTTP_PORT);
        tracing::info!(port = HTTP_PORT, "starting service");
        Ok(self.engine.start_service(&image).await?)
    }

    /// Same as [`serve`](Self::serve).
    pub async fn run(&self) -> Result<Service, BuildError> {
        self.serve().await
    }

    /// Build the image and hand it to the engine, returning its reference.
    pub async fn publish(&self) -> Result<String, BuildError> {
        let image = self.build().await?;
        Ok(self.engine.materialize(&image).await?)
    }

    async fn build_assets(&self, vendor: &Directory) -> Result<Directory, BuildError> {
        let node = ImageSpec::new(&self.config.node_image)
            .with_workdir(NODE_WORKDIR)
            .with_directory(NODE_WORKDIR, &self.source)
            .with_directory(format!("{NODE_WORKDIR}/vendor"), vendor)
            .with_exec(["npm", "install"])
            .with_exec(["npm", "run", "build"]);

        Ok(self
            .engine
            .export_directory(&node, &format!("{NODE_WORKDIR}/public/build"))
            .await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Install(#[from] InstallError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("invalid document root pattern")]
    Pattern(#[from] regex::Error),

    #[error("no `root {app_dir};` directive in {path}")]
    DocumentRootNotFound { path: String, app_dir: String },
}
