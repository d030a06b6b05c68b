//! Static endpoint configuration.

pub const DEFAULT_API_HOST: &str = "https://api.paperspace.io";
pub const DEFAULT_EXPERIMENTS_HOST: &str = "https://services.paperspace.io/experiments/v1";

/// Base URLs of the two resource families.
///
/// Clusters live on `api_host`; hyperparameter tuning jobs live on
/// `experiments_host`. Trailing slashes are stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_host: String,
    pub experiments_host: String,
}

impl ApiConfig {
    pub fn new(api_host: &str, experiments_host: &str) -> Self {
        Self {
            api_host: api_host.trim_end_matches('/').to_string(),
            experiments_host: experiments_host.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_HOST, DEFAULT_EXPERIMENTS_HOST)
    }
}
