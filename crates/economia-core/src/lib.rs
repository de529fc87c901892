pub mod app_config;
pub mod config;
pub mod pricing;
pub mod products;

pub use app_config::{AppConfig, Environment, DEFAULT_PAGE_SIZE};
pub use config::{load_app_config, load_app_config_from_env};
pub use pricing::{
    format_brl, lowest_price, sorted_prices, top_n_lowest, SUMMARY_PRICE_COUNT,
};
pub use products::{Product, ProductPrice, Supermarket, DEFAULT_SUPERMARKET_NAME};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
