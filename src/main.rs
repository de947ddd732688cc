use anyhow::Context;
use clap::Parser;
use mevoq_content::config::cli;
use mevoq_content::utils::{logger, validation::Validate};
use mevoq_content::{CliConfig, ContentResolver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A local .env is optional; deployed environments set variables directly.
    let _ = dotenvy::dotenv();

    let config = CliConfig::parse();
    let file = config.file_config().context("Failed to load configuration file")?;

    let mut logging = file.logging.clone();
    logging.json |= config.json_logs;
    logging.verbose |= config.verbose;
    logger::init_logger(&logging);

    tracing::debug!("CLI config: {:?}", config);

    let source = config.source_config(&file);
    if let Err(e) = source.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let resolver = ContentResolver::from_config(&source).context("Failed to build content resolver")?;

    match cli::run(&config.command, &resolver).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Command failed: {}", e);
            eprintln!("❌ {}", e.user_message());
            std::process::exit(if e.is_config_error() { 1 } else { 2 });
        }
    }
}
