use crate::engine::{ContainerEngine, DependencyInstaller, InstallError};
use laraship_core::{Directory, ImageSpec};

const WORKDIR: &str = "/app";
const CACHE_DIR: &str = "/tmp/composer-cache";
const CACHE_VOLUME: &str = "composer-cache";

/// Installs PHP dependencies by running `composer install` in a container.
///
/// The `vendor/` directory produced in the container is exported as the
/// dependency bundle. With caching enabled, Composer's download cache lives
/// in a named cache volume shared by every run.
pub struct ComposerInstaller<E: ContainerEngine> {
    engine: E,
    image: String,
}

impl<E: ContainerEngine> ComposerInstaller<E> {
    pub fn new(engine: E, image: impl Into<String>) -> Self {
        Self {
            engine,
            image: image.into(),
        }
    }

    /// The install container for `source`, without evaluating it.
    pub fn install_image(&self, source: &Directory, enable_cache: bool) -> ImageSpec {
        let mut command = vec![
            "composer",
            "install",
            "--no-interaction",
            "--prefer-dist",
            "--optimize-autoloader",
            "--ignore-platform-reqs",
            "--no-scripts",
        ];

        let mut image = ImageSpec::new(&self.image)
            .with_workdir(WORKDIR)
            .with_directory(WORKDIR, source);
        if enable_cache {
            image = image
                .with_mounted_cache(CACHE_DIR, CACHE_VOLUME)
                .with_env_variable("COMPOSER_CACHE_DIR", CACHE_DIR);
        } else {
            command.push("--no-cache");
        }

        image.with_exec(command)
    }
}

impl<E: ContainerEngine> DependencyInstaller for ComposerInstaller<E> {
    async fn install(
        &self,
        source: &Directory,
        enable_cache: bool,
    ) -> Result<Directory, InstallError> {
        let image = self.install_image(source, enable_cache);
        tracing::debug!(image = %self.image, enable_cache, "composer install");
        let vendor = self
            .engine
            .export_directory(&image, &format!("{WORKDIR}/vendor"))
            .await?;

        // composer always writes vendor/autoload.php, even with no packages.
        if vendor.is_empty() {
            return Err(InstallError::Tool {
                message: format!("composer install produced an empty {WORKDIR}/vendor"),
            });
        }
        Ok(vendor)
    }
}
