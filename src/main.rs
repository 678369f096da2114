//! Entry point for the Tool Savings binary.
//!
//! Running this binary starts an HTTP server exposing the comparator.
//! A JSON pricing config may be supplied via the `TOOL_SAVINGS_CONFIG`
//! environment variable; if unset the built-in catalog and pricing are
//! used.  Log output is controlled with `RUST_LOG`.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tool_savings::catalog::{load_config_from_file, PricingConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // A broken config must stop startup rather than surface per request.
    let config = match std::env::var_os("TOOL_SAVINGS_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            info!("Loading pricing config from {}", path.display());
            load_config_from_file(&path)
                .with_context(|| format!("invalid pricing config {}", path.display()))?
        }
        None => {
            info!("Using built-in pricing config");
            PricingConfig::builtin()
        }
    };

    let addr =
        std::env::var("TOOL_SAVINGS_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    tool_savings::api::serve(&addr, config).await
}
