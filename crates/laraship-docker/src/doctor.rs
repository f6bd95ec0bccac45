use crate::engine::{DockerEngine, args};
use crate::executor::DockerExecutor;
use std::fmt;

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub docker_cli: CheckResult,
    pub daemon: CheckResult,
    pub buildx: CheckResult,
    pub config_file: CheckResult,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.docker_cli.passed && self.daemon.passed && self.buildx.passed && self.config_file.passed
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Docker CLI", &self.docker_cli),
            ("Docker daemon", &self.daemon),
            ("BuildKit", &self.buildx),
            ("laraship.toml", &self.config_file),
        ];
        for (label, check) in rows {
            writeln!(f, "  [{}] {label:<14} {}", check.icon(), check.detail)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn ok(detail: &str) -> Self {
        Self {
            passed: true,
            detail: detail.to_owned(),
        }
    }

    pub fn fail(detail: &str) -> Self {
        Self {
            passed: false,
            detail: detail.to_owned(),
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}

impl<X: DockerExecutor> DockerEngine<X> {
    /// Run all diagnostic checks without early return.
    ///
    /// `config_file` is left for the caller to fill in.
    pub async fn doctor(&self) -> DoctorReport {
        let mut report = DoctorReport::default();

        match self
            .executor()
            .output(&args(["version", "--format", "{{.Client.Version}}"]))
            .await
        {
            Ok(v) => report.docker_cli = CheckResult::ok(v.trim()),
            Err(e) => report.docker_cli = CheckResult::fail(&e.to_string()),
        }

        match self
            .executor()
            .output(&args(["info", "--format", "{{.ServerVersion}}"]))
            .await
        {
            Ok(v) if !v.trim().is_empty() => {
                report.daemon = CheckResult::ok(&format!("server {}", v.trim()));
            }
            _ => report.daemon = CheckResult::fail("daemon not reachable"),
        }

        match self.executor().output(&args(["buildx", "version"])).await {
            Ok(v) => {
                let line = v.lines().next().unwrap_or_default().trim();
                report.buildx = CheckResult::ok(line);
            }
            Err(_) => {
                report.buildx = CheckResult::fail("buildx not available — cache mounts need BuildKit");
            }
        }

        report
    }
}
