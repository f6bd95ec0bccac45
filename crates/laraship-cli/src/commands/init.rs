use laraship_core::CONFIG_FILE;

const TEMPLATE: &str = r#"[source]
# ignore = ["vendor*", "node_modules*"]

[build]
# enable_cache = true
# frontend = true
# extra_packages = ["php84-pdo_mysql", "php84-pdo_sqlite"]
# runtime_image = "trafex/php-nginx"
# node_image = "node:23-alpine"
# composer_image = "composer:2"
# owner = "nobody"
# app_dir = "/var/www/html"
# nginx_config = "/etc/nginx/conf.d/default.conf"
# strict_docroot = false
"#;

/// Initialize laraship in an existing Laravel project.
pub async fn init(opts: &super::Options) -> anyhow::Result<()> {
    if !opts.path.join("composer.json").exists() {
        anyhow::bail!("composer.json not found. Run this command from a Laravel project root.");
    }

    let config_path = opts.path.join(CONFIG_FILE);
    if config_path.exists() {
        eprintln!("{CONFIG_FILE} already exists, skipping");
        return Ok(());
    }

    std::fs::write(&config_path, TEMPLATE)?;
    println!("Created {CONFIG_FILE}");
    println!();
    println!("Next steps:");
    println!("  laraship build                    # build the runtime image");
    println!("  laraship artisan migrate --force  # run artisan in the image");
    println!("  laraship serve                    # serve on http://localhost:8080");

    Ok(())
}
