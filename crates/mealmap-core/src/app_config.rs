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

/// Runtime configuration for the mealmap clients and CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL for the recipe score, ingredient prediction, and recipe
    /// origin endpoints (one deployment serves all three).
    pub api_base_url: String,
    /// Base URL for the public geocoding service.
    pub geocoder_base_url: String,
    pub env: Environment,
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// Client-identifying user agent; the geocoder requires one.
    pub user_agent: String,
}
