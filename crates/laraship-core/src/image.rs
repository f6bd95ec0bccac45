//! Declarative container image values.
//!
//! An [`ImageSpec`] is a base image reference plus an ordered list of
//! [`Op`]s. Every `with_*` method consumes the spec and returns the extended
//! value, so a spec handed to an engine is never changed behind its back.
//! Nothing here talks to a container engine; evaluation happens in whatever
//! implements the engine contract.

use crate::Directory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Set the working directory for later operations and commands.
    Workdir(String),
    /// Copy a directory artifact to `path`.
    Directory { path: String, source: Directory },
    /// Place a directory at `path` owned by `owner`.
    MountedDirectory {
        path: String,
        source: Directory,
        owner: String,
    },
    /// Persistent named cache visible to every later `Exec` at `path`.
    MountedCache { path: String, volume: String },
    /// Environment variable for later commands and the final image.
    Env { name: String, value: String },
    /// Switch the acting user.
    User(String),
    /// Run a command while building.
    Exec(Vec<String>),
    /// Write a text file at `path`.
    NewFile { path: String, contents: String },
    /// Declare a TCP port the image listens on.
    ExposedPort(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSpec {
    base: String,
    ops: Vec<Op>,
}

impl ImageSpec {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ops: Vec::new(),
        }
    }

    pub fn with_workdir(self, path: impl Into<String>) -> Self {
        self.push(Op::Workdir(path.into()))
    }

    pub fn with_directory(self, path: impl Into<String>, source: &Directory) -> Self {
        self.push(Op::Directory {
            path: path.into(),
            source: source.clone(),
        })
    }

    pub fn with_mounted_directory(
        self,
        path: impl Into<String>,
        source: &Directory,
        owner: impl Into<String>,
    ) -> Self {
        self.push(Op::MountedDirectory {
            path: path.into(),
            source: source.clone(),
            owner: owner.into(),
        })
    }

    pub fn with_mounted_cache(self, path: impl Into<String>, volume: impl Into<String>) -> Self {
        self.push(Op::MountedCache {
            path: path.into(),
            volume: volume.into(),
        })
    }

    pub fn with_env_variable(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Op::Env {
            name: name.into(),
            value: value.into(),
        })
    }

    pub fn with_user(self, user: impl Into<String>) -> Self {
        self.push(Op::User(user.into()))
    }

    pub fn with_exec<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Op::Exec(args.into_iter().map(Into::into).collect()))
    }

    pub fn with_new_file(self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.push(Op::NewFile {
            path: path.into(),
            contents: contents.into(),
        })
    }

    pub fn with_exposed_port(self, port: u16) -> Self {
        self.push(Op::ExposedPort(port))
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Ports declared with [`with_exposed_port`](Self::with_exposed_port), in order.
    pub fn exposed_ports(&self) -> Vec<u16> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::ExposedPort(port) => Some(*port),
                _ => None,
            })
            .collect()
    }

    /// The user commands run as after all operations, if one was set.
    pub fn user(&self) -> Option<&str> {
        self.ops.iter().rev().find_map(|op| match op {
            Op::User(user) => Some(user.as_str()),
            _ => None,
        })
    }

    /// Contents of the last file written at `path` by this spec.
    pub fn new_file(&self, path: &str) -> Option<&str> {
        self.ops.iter().rev().find_map(|op| match op {
            Op::NewFile { path: p, contents } if p == path => Some(contents.as_str()),
            _ => None,
        })
    }

    fn push(mut self, op: Op) -> Self {
        self.ops.push(op);
        self
    }
}
