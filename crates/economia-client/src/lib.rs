pub mod client;
pub mod error;
pub mod gateway;
pub mod normalize;

pub use client::CatalogClient;
pub use error::{ClientError, FetchFailure, Operation};
pub use gateway::ProductGateway;
pub use normalize::{normalize_prices, normalize_product};
