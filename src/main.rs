use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gachon_notice_notifier::checkpoint::CheckpointStore;
use gachon_notice_notifier::config::Config;
use gachon_notice_notifier::fetcher::{build_client, ListingFetcher};
use gachon_notice_notifier::notifier::DiscordNotifier;
use gachon_notice_notifier::runner::run_once;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Fatal error: {e:#}");
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    info!("Starting gachon-notice-notifier");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        listing_url = %config.listing_url,
        checkpoint = %config.checkpoint_path.display(),
        webhook_configured = config.webhook_url.is_some(),
        "Configuration loaded"
    );

    let client = build_client(config.http_timeout).context("Failed to build HTTP client")?;
    let store = CheckpointStore::new(config.checkpoint_path.clone());
    let fetcher = ListingFetcher::new(client.clone(), config.listing_url.clone());
    let notifier = DiscordNotifier::new(client, config.webhook_url.clone());

    let outcome = run_once(&store, &fetcher, &notifier, &config.site_origin)
        .await
        .context("Failed to store checkpoint")?;

    let code = outcome.exit_code(config.strict_exit_codes);
    info!(?outcome, exit_code = code, "Run complete");

    Ok(code)
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gachon_notice_notifier=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
