//! The Laravel runtime image recipe.
//!
//! # Build pipeline
//!
//! ```text
//! ImageAssembler::build
//!   1. Dependencies ── DependencyInstaller::install(source, enable_cache) → vendor/
//!   2. Assets       ── node image: npm install, npm run build → public/build
//!   3. Layout       ── runtime image + source (owned by `nobody`) + vendor + assets
//!   4. Packages     ── root: apk add --no-cache <extra_packages>, back to `nobody`
//!   5. nginx        ── root /var/www/html; → root /var/www/html/public;
//! ```
//!
//! `artisan` and `serve`/`run` each run the whole pipeline again before
//! executing a command or publishing port 8080.
//!
//! The container engine and the dependency installer are traits
//! ([`ContainerEngine`], [`DependencyInstaller`]); this crate never touches
//! Docker directly. [`ComposerInstaller`] implements the installer on top of
//! any engine.

pub mod artisan;
pub mod assembler;
pub mod composer;
pub mod engine;
pub mod nginx;

pub use assembler::{BuildError, HTTP_PORT, ImageAssembler};
pub use composer::ComposerInstaller;
pub use engine::{ContainerEngine, DependencyInstaller, EngineError, InstallError, Service};
