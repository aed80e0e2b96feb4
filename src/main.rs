use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::info;

use polarscope::cli::Args;
use polarscope::config::Config;
use polarscope::display;

fn main() -> Result<()> {
    // Initialize logging; stderr keeps stdout free for the terminal view
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("polarscope=info".parse()?),
        )
        .init();

    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "polarscope", &mut std::io::stdout());
        return Ok(());
    }

    if args.init_config {
        let path = Config::init_default_config()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    // Explicit path must load; the default path falls back to built-ins
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_default_path().unwrap_or_else(|| Config {
            blips: Config::demo_blips(),
            ..Config::default()
        }),
    };
    config.merge_args(&args);

    info!(
        "Starting Polarscope with {} blips, max range {}",
        config.blips.len(),
        config.plot.max_range
    );

    display::terminal::run(config, args.config)
}
