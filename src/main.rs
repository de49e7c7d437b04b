use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video_finder::cli::{input, Cli, Commands};
use video_finder::config::Config;
use video_finder::{output, FinderPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "video_finder=debug"
    } else {
        "video_finder=warn"
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Credentials may live in a local .env file
    if let Err(e) = dotenv::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    let mut config = Config::load().await?;

    match cli.resolved_command() {
        Commands::Find(args) => {
            args.apply_to(&mut config);

            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();

            output::banner(&mut stdout)?;
            let query = match args.query {
                Some(query) => query,
                None => input::acquire_query(&mut stdin.lock(), &mut stdout, args.mode)?,
            };

            let pipeline = FinderPipeline::from_config(&config).with_progress(!cli.quiet);

            tracing::info!("Starting search for query: {:?}", query);
            pipeline.run(&query, &mut stdout).await?;
        }
        Commands::Config { show: _, init: true } => {
            let path = Config::save_default().await?;
            println!("Default configuration written to: {}", path.display());
        }
        Commands::Config { .. } => {
            config.display();
        }
    }

    Ok(())
}
