mod commands;

use clap::{Parser, Subcommand};
use commands::Options;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "laraship",
    about = "Build, run, and serve Laravel apps in containers"
)]
#[command(version)]
struct Cli {
    /// Laravel project directory
    #[arg(long, short = 'p', global = true, default_value = ".")]
    path: PathBuf,
    /// Resolve Composer dependencies without the shared cache
    #[arg(long, global = true)]
    no_cache: bool,
    /// Skip the npm front-end build
    #[arg(long, global = true)]
    no_frontend: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a laraship.toml with the default settings
    Init,
    /// Build the runtime image and print its tag
    Build,
    /// Run an artisan command in a freshly built image
    Artisan {
        /// Command line passed to `php artisan`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Serve the app on port 8080 until interrupted
    Serve {
        /// Print the container id and return instead of following logs
        #[arg(long, short = 'd')]
        detach: bool,
    },
    /// Alias for `serve`
    Run {
        /// Print the container id and return instead of following logs
        #[arg(long, short = 'd')]
        detach: bool,
    },
    /// Print the Dockerfile of the assembled runtime image
    Dockerfile,
    /// Check Docker setup and readiness
    Doctor,
    /// Start MCP server (stdio) exposing build, artisan, and serve
    Mcp,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let opts = Options {
        path: cli.path,
        no_cache: cli.no_cache,
        no_frontend: cli.no_frontend,
    };

    match cli.command {
        Commands::Init => commands::init(&opts).await?,
        Commands::Build => commands::build(&opts).await?,
        Commands::Artisan { args } => commands::artisan(&opts, &args.join(" ")).await?,
        Commands::Serve { detach } | Commands::Run { detach } => {
            commands::serve(&opts, detach).await?
        }
        Commands::Dockerfile => commands::dockerfile(&opts).await?,
        Commands::Doctor => commands::doctor(&opts).await?,
        Commands::Mcp => commands::mcp::execute(opts).await?,
    }

    Ok(())
}
