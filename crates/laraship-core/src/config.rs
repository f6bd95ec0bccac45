use serde::{Deserialize, Serialize};

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "laraship.toml";

/// laraship.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LarashipConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Root-anchored glob patterns excluded from the source snapshot
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Let the dependency installer reuse a previous resolution
    #[serde(default = "default_true")]
    pub enable_cache: bool,
    /// Build front-end assets with npm before assembling the runtime image
    #[serde(default = "default_true")]
    pub frontend: bool,
    /// System packages installed with `apk add --no-cache`
    #[serde(default = "default_extra_packages")]
    pub extra_packages: Vec<String>,
    /// PHP + nginx runtime base image
    #[serde(default = "default_runtime_image")]
    pub runtime_image: String,
    /// Image used for the throwaway front-end build
    #[serde(default = "default_node_image")]
    pub node_image: String,
    /// Image providing the `composer` binary
    #[serde(default = "default_composer_image")]
    pub composer_image: String,
    /// Unprivileged account owning the application files
    #[serde(default = "default_owner")]
    pub owner: String,
    /// Account used while installing system packages
    #[serde(default = "default_privileged_user")]
    pub privileged_user: String,
    /// Application root inside the runtime image
    #[serde(default = "default_app_dir")]
    pub app_dir: String,
    /// nginx server config whose document root gets rewritten
    #[serde(default = "default_nginx_config")]
    pub nginx_config: String,
    /// Fail the build when the nginx config has no `root /var/www/html;` line.
    /// When false, the config is left untouched.
    #[serde(default)]
    pub strict_docroot: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            ignore: default_ignore(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            enable_cache: true,
            frontend: true,
            extra_packages: default_extra_packages(),
            runtime_image: default_runtime_image(),
            node_image: default_node_image(),
            composer_image: default_composer_image(),
            owner: default_owner(),
            privileged_user: default_privileged_user(),
            app_dir: default_app_dir(),
            nginx_config: default_nginx_config(),
            strict_docroot: false,
        }
    }
}

impl LarashipConfig {
    /// Load from laraship.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_ignore() -> Vec<String> {
    vec!["vendor*".to_owned(), "node_modules*".to_owned()]
}

fn default_extra_packages() -> Vec<String> {
    vec!["php84-pdo_mysql".to_owned(), "php84-pdo_sqlite".to_owned()]
}

fn default_runtime_image() -> String {
    "trafex/php-nginx".to_owned()
}

fn default_node_image() -> String {
    "node:23-alpine".to_owned()
}

fn default_composer_image() -> String {
    "composer:2".to_owned()
}

fn default_owner() -> String {
    "nobody".to_owned()
}

fn default_privileged_user() -> String {
    "root".to_owned()
}

fn default_app_dir() -> String {
    "/var/www/html".to_owned()
}

fn default_nginx_config() -> String {
    "/etc/nginx/conf.d/default.conf".to_owned()
}
