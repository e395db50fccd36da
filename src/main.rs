use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tracing::{info, warn};

/// Signup backend for the Celestial Chaos alpha: issues Steam keys by email
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// JSON file with the Steam key pool (overrides KEY_POOL_PATH)
    #[arg(long, short = 'k')]
    keys: Option<String>,
}

mod config;
mod error;
mod mail;
mod managers;
mod messages;
mod state;
mod web;

use config::KeyPoolConfig;
use mail::{create_mailer, MailConfig};
use managers::create_shared_registration_manager;
use state::create_shared_signup_store;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    // Load key pool
    let key_pool_path = args
        .keys
        .or_else(|| std::env::var("KEY_POOL_PATH").ok());
    let key_pool = match key_pool_path {
        Some(path) => {
            info!("Loading key pool from {}...", path);
            KeyPoolConfig::load_from_file(&path)?
        }
        None => {
            warn!("KEY_POOL_PATH not set: using placeholder Steam keys");
            KeyPoolConfig::default()
        }
    };
    let pool = key_pool.into_pool()?;
    if pool.is_exhausted() {
        warn!("Key pool is empty: every signup will be rejected");
    } else {
        info!("Key pool loaded with {} keys", pool.remaining());
    }

    let store = create_shared_signup_store(pool);

    let mail_config = MailConfig::from_env();
    if std::env::var("EMAIL_USER").is_err() {
        warn!(
            "EMAIL_USER not set: sending as {}",
            mail_config.sender_address
        );
    }
    let mailer = create_mailer(&mail_config);

    let registration_manager = create_shared_registration_manager(
        store,
        mailer,
        mail_config.sender_address.clone(),
        mail_config.send_timeout,
    );

    let mut web_config = web::WebServerConfig::from_env();
    if let Some(port) = args.port {
        web_config.port = port;
    }

    web::start_web_server(web_config, registration_manager).await?;

    warn!("Server stopped.");
    Ok(())
}
