use crate::docker::DockerError;
use laraship_core::{Directory, ImageSpec, Op};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;

/// Repository name for images built from specs.
pub const IMAGE_REPO: &str = "laraship";

/// Renders an [`ImageSpec`] as a Dockerfile over a [`BuildContext`] layout.
///
/// Directories are referenced as `dirs/<digest>`, new files as
/// `files/<op index>`. Cache mounts apply to every later `RUN`.
pub struct DockerfileGenerator<'a> {
    image: &'a ImageSpec,
}

impl<'a> DockerfileGenerator<'a> {
    pub fn new(image: &'a ImageSpec) -> Self {
        Self { image }
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        let mut mounts: Vec<String> = Vec::new();

        let uses_cache = self
            .image
            .ops()
            .iter()
            .any(|op| matches!(op, Op::MountedCache { .. }));
        if uses_cache {
            lines.push("# syntax=docker/dockerfile:1".to_owned());
        }
        lines.push(format!("FROM {}", self.image.base()));

        for (index, op) in self.image.ops().iter().enumerate() {
            match op {
                Op::Workdir(path) => lines.push(format!("WORKDIR {path}")),
                Op::Directory { path, source } => {
                    lines.push(format!("COPY {}", json_array([&dir_path(source), path])));
                }
                Op::MountedDirectory {
                    path,
                    source,
                    owner,
                } => lines.push(format!(
                    "COPY --chown={owner} {}",
                    json_array([&dir_path(source), path])
                )),
                Op::MountedCache { path, volume } => {
                    mounts.push(format!("--mount=type=cache,id={volume},target={path}"));
                }
                Op::Env { name, value } => {
                    lines.push(format!("ENV {name}={}", serde_json::Value::from(value.as_str())));
                }
                Op::User(user) => lines.push(format!("USER {user}")),
                Op::Exec(args) => {
                    let mut line = "RUN ".to_owned();
                    for mount in &mounts {
                        line.push_str(mount);
                        line.push(' ');
                    }
                    line.push_str(&json_array(args));
                    lines.push(line);
                }
                Op::NewFile { path, .. } => {
                    lines.push(format!("COPY {}", json_array([&file_path(index), path])));
                }
                Op::ExposedPort(port) => lines.push(format!("EXPOSE {port}")),
            }
        }

        let mut dockerfile = lines.join("\n");
        dockerfile.push('\n');
        dockerfile
    }

    /// Content-addressed tag: identical specs over identical directories
    /// produce the same tag.
    pub fn tag(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.render().as_bytes());
        for op in self.image.ops() {
            if let Op::NewFile { contents, .. } = op {
                hasher.update([0u8]);
                hasher.update(contents.as_bytes());
            }
        }
        let digest = hex::encode(hasher.finalize());
        format!("{IMAGE_REPO}:{}", &digest[..12])
    }
}

/// Temporary directory holding everything a Dockerfile `COPY`s.
pub struct BuildContext {
    dir: tempfile::TempDir,
}

impl BuildContext {
    /// Copy every directory and new file referenced by `image` into a fresh
    /// context directory. Directories shared by several ops are copied once.
    pub fn stage(image: &ImageSpec) -> Result<Self, DockerError> {
        let dir = tempfile::Builder::new()
            .prefix("laraship-ctx-")
            .tempdir()
            .map_err(|e| DockerError::Stage {
                path: std::env::temp_dir(),
                source: e,
            })?;

        let mut staged = HashSet::new();
        for (index, op) in image.ops().iter().enumerate() {
            match op {
                Op::Directory { source, .. } | Op::MountedDirectory { source, .. } => {
                    if staged.insert(source.digest()) {
                        copy_tree(source, &dir.path().join(dir_path(source)))?;
                    }
                }
                Op::NewFile { contents, .. } => {
                    let path = dir.path().join(file_path(index));
                    create_dir(path.parent().unwrap_or(dir.path()))?;
                    std::fs::write(&path, contents)
                        .map_err(|e| DockerError::Stage { path, source: e })?;
                }
                _ => {}
            }
        }

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

fn dir_path(source: &Directory) -> String {
    format!("dirs/{}", source.digest())
}

fn file_path(index: usize) -> String {
    format!("files/{index}")
}

fn json_array<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    serde_json::Value::Array(
        items
            .into_iter()
            .map(|s| serde_json::Value::from(s.as_ref()))
            .collect(),
    )
    .to_string()
}

fn create_dir(path: &Path) -> Result<(), DockerError> {
    std::fs::create_dir_all(path).map_err(|e| DockerError::Stage {
        path: path.to_path_buf(),
        source: e,
    })
}

fn copy_tree(source: &Directory, dest: &Path) -> Result<(), DockerError> {
    create_dir(dest)?;
    for relative in source.entries() {
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            create_dir(parent)?;
        }
        let from = source.root().join(relative);
        copy_entry(&from, &target).map_err(|e| DockerError::Stage {
            path: from,
            source: e,
        })?;
    }
    Ok(())
}

/// Copy one snapshot entry, recreating symlinks as links so `COPY` carries
/// them into the image unchanged.
#[cfg(unix)]
fn copy_entry(from: &Path, to: &Path) -> std::io::Result<()> {
    if std::fs::symlink_metadata(from)?.file_type().is_symlink() {
        std::os::unix::fs::symlink(std::fs::read_link(from)?, to)
    } else {
        std::fs::copy(from, to).map(|_| ())
    }
}

#[cfg(not(unix))]
fn copy_entry(from: &Path, to: &Path) -> std::io::Result<()> {
    std::fs::copy(from, to).map(|_| ())
}
