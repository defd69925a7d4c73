use clap::Parser;
use lab_service_rust::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so LAB_FIXTURE, APP_ENV, etc. are picked up
    let _ = dotenvy::dotenv();

    let config = lab_service_rust::config::config();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("Starting labctl in {:?} mode", config.environment);

    let cli = Cli::parse();

    if let Err(e) = lab_service_rust::cli::run(cli).await {
        if lab_service_rust::is_development!() {
            eprintln!("Error: {e:?}");
        } else {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }

    Ok(())
}
