use anyhow::Result;
use resume_builder::environment::{EnvironmentConfig, Secrets};
use resume_builder::start_web_server;

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<()> {
    Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(EnvFilter::new("resume_builder=info,rocket::server=off")),
        )
        .init();

    let port = match std::env::var("PORT") {
        Ok(value) => value
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid port number"))?,
        Err(_) => DEFAULT_PORT,
    };

    let config = EnvironmentConfig::load()?;
    let secrets = Secrets::from_env();

    info!("Starting AI resume builder API");
    info!("Database: {}", config.database_path.display());
    info!("Completion API: {}", config.deepseek_base_url);
    info!("DeepSeek key present: {}", secrets.has_deepseek_key());
    info!("Razorpay keys present: {}", secrets.has_razorpay_keys());
    info!("Server: http://0.0.0.0:{}", port);

    start_web_server(config, secrets, port).await
}
