use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use threadreel::app::AppContext;
use threadreel::cli::{commands, Cli, Commands};
use threadreel::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load()?;

    init_tracing(&config.core.log_level);

    if cli.bypass_cache {
        config.core.bypass_cache = true;
    }

    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Home { after } => {
            commands::show_home(&ctx, after.as_deref()).await?;
        }
        Commands::Subreddit { name, after } => {
            commands::show_subreddit(&ctx, &name, after.as_deref()).await?;
        }
        Commands::Comments { url } => {
            commands::show_comments(&ctx, &url).await?;
        }
        Commands::Post { id } => {
            commands::show_post(&ctx, &id).await?;
        }
        Commands::Clean => {
            commands::clean_cache(&ctx)?;
        }
    }

    Ok(())
}

/// Log to `<state dir>/threadreel/threadreel.log`, or stderr if that fails.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_file = log_path().and_then(|path| {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });

    let (file_layer, stderr_layer) = match log_file {
        Some(file) => (
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
            None,
        ),
        None => (None, Some(fmt::layer().with_writer(std::io::stderr))),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

fn log_path() -> Option<PathBuf> {
    let dir = dirs::state_dir().or_else(dirs::cache_dir)?;
    Some(dir.join("threadreel").join("threadreel.log"))
}
