use prflow::config::{self, AppConfig};
use prflow::github::GitHubClient;
use prflow::{collect_records, report};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing (logging) on stderr; stdout carries the report.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prflow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // A missing .env file is fine; the token may come from the real environment.
    let _ = dotenvy::dotenv();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid configuration: {}. Is GITHUB_TOKEN set?", e);
            std::process::exit(1);
        }
    };

    let client = match GitHubClient::new(config.github_token, config::target_repo()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to build GitHub client: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(repo = %client.repo(), target = config::PR_FETCH_TARGET, "Fetching closed pull requests");

    let records = match collect_records(&client, config::PR_FETCH_TARGET).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Error fetching pull requests for {}: {:#}", client.repo(), e);
            std::process::exit(1);
        }
    };

    let stdout = std::io::stdout();
    if let Err(e) = report::write_report(&mut stdout.lock(), &records) {
        tracing::error!("Failed to write report: {}", e);
        std::process::exit(1);
    }
}
