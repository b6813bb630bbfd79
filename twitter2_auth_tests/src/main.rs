use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use twitter2_auth::{AuthConfig, AuthContext, Url, UserContext};

/// Makes a single authenticated GET request against the live API, using credentials from the
/// `TWITTER_*` environment variables (a `.env` file is read if present).
#[derive(Parser)]
#[command(name = "twitter2_auth_tests")]
struct Cli {
    #[arg(long, default_value = "https://api.twitter.com/2/users/me")]
    url: Url,
    /// `oauth2_only` or `oauth2_or_oauth1`.
    #[arg(long, env = "TWITTER_USER_CONTEXT", default_value = "oauth2_or_oauth1")]
    user_context: UserContext,
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = AuthConfig::from_env().context("failed to read credentials")?;
    let context = AuthContext::from_config(&config)?;

    info!(
        has_oauth1_client = context.has_oauth1_client(),
        scheme = %context.scheme_for(cli.user_context),
        "authentication context ready"
    );

    let response = context
        .get(cli.user_context, cli.url, cli.timeout_secs.map(Duration::from_secs))
        .await?;

    println!("{}", response.status());
    println!("{}", response.text().await?);

    Ok(())
}
