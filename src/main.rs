//! Entry point for the pricing engine binary.
//!
//! Running this binary starts an HTTP server exposing the quote API.
//! The service fee and VAT rate are read from the
//! `EDGEMY_SERVICE_FEE_PERCENT` and `EDGEMY_VAT_RATE` environment
//! variables (validated before use); a directory of card-profile
//! overrides may be supplied via `EDGEMY_CARD_PROFILE_DIR`.

use edgemy_pricing::config::PricingConfig;
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    // Resolve and validate the pricing rates before anything else; a
    // misconfigured fee rate must stop the server, not serve quotes.
    let config = match PricingConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {:#}", err);
            std::process::exit(1);
        }
    };
    // Optional directory of card-profile override files
    let profile_dir = std::env::var("EDGEMY_CARD_PROFILE_DIR")
        .ok()
        .map(PathBuf::from);
    // Determine bind address
    let addr = std::env::var("EDGEMY_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    if let Err(err) = edgemy_pricing::api::serve(&addr, config, profile_dir).await {
        eprintln!("Error running server: {}", err);
    }
}
