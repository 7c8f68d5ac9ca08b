use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Application configuration, derived from `Portal.toml` and `PORTAL_*`
/// environment variables. Every value has a usable default, so a bare
/// invocation talks to a local backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    api_base: String,
    token_file: PathBuf,
    registration_open: bool,
    request_timeout: u64,
}

impl Config {
    /// Load the configuration: defaults, overridden by `Portal.toml`,
    /// overridden by `PORTAL_*` environment variables.
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("Portal.toml"))
            .merge(Env::prefixed("PORTAL_"))
            .extract()
    }

    /// Base URL of the backend API. All endpoint paths are relative to this;
    /// it is never hard-coded at call sites.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Where the session token is persisted between runs.
    pub fn token_file(&self) -> &Path {
        &self.token_file
    }

    /// Whether candidate registration is currently open. When closed, the
    /// register command shows a static notice instead of submitting.
    pub fn registration_open(&self) -> bool {
        self.registration_open
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:5000/api".to_string(),
            token_file: PathBuf::from(".portal-token"),
            registration_open: false,
            request_timeout: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!("http://localhost:5000/api", config.api_base());
        assert_eq!(Path::new(".portal-token"), config.token_file());
        assert!(!config.registration_open());
        assert_eq!(Duration::from_secs(10), config.request_timeout());
    }

    #[test]
    fn toml_overrides_defaults() {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r#"
                    api_base = "https://election.example.org/api"
                    registration_open = true
                "#,
            ))
            .extract()
            .unwrap();

        assert_eq!("https://election.example.org/api", config.api_base());
        assert!(config.registration_open());
        // Untouched keys keep their defaults.
        assert_eq!(Path::new(".portal-token"), config.token_file());
    }
}
