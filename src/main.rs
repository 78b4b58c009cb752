//! Billiard POS
//!
//! REST API, session timer and table lamp control for a billiard café.
//! Reads configuration from a TOML file (~/.config/billiard-pos/config.toml).

use billiard_pos::{default_config_path, AppConfig, ServerHandle, ServerOptions};
use tracing::{error, info};

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = default_config_path();
    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg.logging.level);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg.logging.level);
            error!(
                "Failed to load config from {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            cfg
        }
    };

    let handle = ServerHandle::start(ServerOptions {
        config,
        create_default_admin: true,
    })
    .await?;
    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;
    Ok(())
}
