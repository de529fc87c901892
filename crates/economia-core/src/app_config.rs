use std::path::PathBuf;

/// Page size used when `ECONOMIA_PAGE_SIZE` is not set.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Base URL of the product API, without the `/produto/...` path.
    pub api_base_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Page size for cursor listing requests. Fixed for the lifetime of a session.
    pub page_size: usize,
    /// File backing the persisted catalog snapshot.
    pub state_path: PathBuf,
}
