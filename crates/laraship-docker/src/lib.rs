//! Docker CLI backend for laraship.
//!
//! [`DockerEngine`] implements [`laraship_build::ContainerEngine`] by
//! rendering each [`ImageSpec`](laraship_core::ImageSpec) to a Dockerfile:
//!
//! ```text
//! ImageSpec                         Dockerfile
//!   new(base)                   →   FROM base
//!   with_workdir(p)             →   WORKDIR p
//!   with_directory(p, d)        →   COPY ["dirs/<digest>", "p"]
//!   with_mounted_directory(..)  →   COPY --chown=owner ["dirs/<digest>", "p"]
//!   with_mounted_cache(p, v)    →   --mount=type=cache,id=v,target=p on later RUNs
//!   with_env_variable(k, v)     →   ENV k="v"
//!   with_user(u)                →   USER u
//!   with_exec(argv)             →   RUN [argv]
//!   with_new_file(p, text)      →   COPY ["files/<n>", "p"]
//!   with_exposed_port(n)        →   EXPOSE n
//! ```
//!
//! The build context is staged into a temp directory per build and images
//! are tagged `laraship:<digest>` over the Dockerfile and file contents.
//! All docker invocations go through [`DockerExecutor`].

pub mod docker;
pub mod doctor;
pub mod dockerfile;
pub mod engine;
pub mod executor;

pub use docker::DockerError;
pub use doctor::{CheckResult, DoctorReport};
pub use dockerfile::{BuildContext, DockerfileGenerator};
pub use engine::DockerEngine;
pub use executor::{DockerExecutor, RealExecutor};
