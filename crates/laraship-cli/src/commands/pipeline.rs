use laraship_build::{ComposerInstaller, ImageAssembler};
use laraship_core::{Directory, LarashipConfig};
use laraship_docker::DockerEngine;
use std::path::PathBuf;

pub(crate) type DockerAssembler = ImageAssembler<DockerEngine, ComposerInstaller<DockerEngine>>;

/// Options shared by every command that assembles an image.
#[derive(Debug, Clone)]
pub struct Options {
    pub path: PathBuf,
    pub no_cache: bool,
    pub no_frontend: bool,
}

/// Load `laraship.toml`, apply flag overrides, snapshot the source, and wire
/// the Docker engine and Composer installer into an assembler.
pub(crate) fn assembler(opts: &Options) -> anyhow::Result<DockerAssembler> {
    let config = LarashipConfig::load(&opts.path)?;
    let mut build = config.build;
    if opts.no_cache {
        build.enable_cache = false;
    }
    if opts.no_frontend {
        build.frontend = false;
    }

    let source = Directory::snapshot(&opts.path, &config.source.ignore)?;
    tracing::info!(
        path = %opts.path.display(),
        files = source.entries().len(),
        digest = source.short_digest(),
        "source snapshot"
    );

    let engine = DockerEngine::new()?;
    let installer = ComposerInstaller::new(engine.clone(), &build.composer_image);
    Ok(ImageAssembler::new(engine, installer, source, build))
}
