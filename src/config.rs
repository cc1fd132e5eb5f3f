//! Configuration loading and resolution
//!
//! Settings resolve in priority order: CLI argument > environment variable >
//! TOML file > built-in default. Resolution happens once at startup; the
//! resulting `Config` is immutable and nothing consults the process
//! environment after it is built.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Environment variables recognized at load time
pub const ENV_ISWCNET_URL: &str = "TUNELENS_ISWCNET_URL";
pub const ENV_ISWCNET_API_KEY: &str = "TUNELENS_ISWCNET_API_KEY";
pub const ENV_IFPI_URL: &str = "TUNELENS_IFPI_URL";
pub const ENV_IFPI_API_KEY: &str = "TUNELENS_IFPI_API_KEY";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Raw configuration as written in the TOML file
///
/// All fields are optional; anything omitted falls back to the built-in
/// defaults (port 3000, 5 second source timeout, registries disabled).
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout applied to every outbound metadata lookup, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// ISWC registry endpoint (lookups disabled when absent)
    #[serde(default)]
    pub iswcnet: Option<RegistryToml>,

    /// IFPI ISRC registry endpoint (lookups disabled when absent)
    #[serde(default)]
    pub ifpi: Option<RegistryToml>,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            iswcnet: None,
            ifpi: None,
        }
    }
}

/// One registry section of the TOML file
///
/// URL and key are individually optional so a deployment can keep the URL in
/// the file and inject the key through the environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryToml {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_port() -> u16 {
    3000
}

fn default_timeout_secs() -> u64 {
    5
}

/// A fully configured registry endpoint: URL and API key both present
#[derive(Debug, Clone)]
pub struct RegistryEndpoint {
    pub url: String,
    pub api_key: String,
}

/// Overrides from the command line, applied last
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
}

/// Resolved process-wide configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port
    pub port: u16,

    /// Timeout applied independently to each outbound lookup
    pub request_timeout: Duration,

    /// ISWC registry, `None` when not fully configured
    pub iswcnet: Option<RegistryEndpoint>,

    /// IFPI ISRC registry, `None` when not fully configured
    pub ifpi: Option<RegistryEndpoint>,
}

impl Config {
    /// Load configuration from `path` and apply environment variables and
    /// CLI overrides on top.
    ///
    /// A missing file is not an error; defaults apply and the service still
    /// starts (with both registries disabled unless the environment supplies
    /// them).
    pub fn load(path: &Path, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let toml_config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let parsed: TomlConfig =
                toml::from_str(&content).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            info!("Loaded configuration from {}", path.display());
            parsed
        } else {
            info!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            TomlConfig::default()
        };

        Ok(Self::resolve(toml_config, overrides))
    }

    /// Resolve a parsed TOML config against the environment and CLI overrides.
    ///
    /// Split out from [`Config::load`] so tests can exercise precedence
    /// without touching the filesystem.
    pub fn resolve(toml_config: TomlConfig, overrides: ConfigOverrides) -> Self {
        let port = overrides.port.unwrap_or(toml_config.port);

        let iswcnet = resolve_registry(
            "ISWC registry",
            ENV_ISWCNET_URL,
            ENV_ISWCNET_API_KEY,
            toml_config.iswcnet.as_ref(),
        );
        let ifpi = resolve_registry(
            "IFPI registry",
            ENV_IFPI_URL,
            ENV_IFPI_API_KEY,
            toml_config.ifpi.as_ref(),
        );

        Config {
            port,
            request_timeout: Duration::from_secs(toml_config.timeout_secs),
            iswcnet,
            ifpi,
        }
    }
}

/// Resolve one registry endpoint from environment and TOML.
///
/// Environment wins per field. The endpoint is enabled only when both the
/// URL and the API key resolve to non-empty values; a half-configured
/// registry logs a warning and stays disabled rather than failing startup.
fn resolve_registry(
    name: &str,
    url_var: &str,
    key_var: &str,
    toml: Option<&RegistryToml>,
) -> Option<RegistryEndpoint> {
    let url = env_value(url_var)
        .or_else(|| toml.and_then(|t| t.url.clone()).filter(|v| !v.trim().is_empty()));
    let api_key = env_value(key_var)
        .or_else(|| toml.and_then(|t| t.api_key.clone()).filter(|v| !v.trim().is_empty()));

    match (url, api_key) {
        (Some(url), Some(api_key)) => {
            info!("{} enabled at {}", name, url);
            Some(RegistryEndpoint { url, api_key })
        }
        (Some(_), None) => {
            warn!("{} URL set but API key missing, lookups disabled", name);
            None
        }
        (None, Some(_)) => {
            warn!("{} API key set but URL missing, lookups disabled", name);
            None
        }
        (None, None) => {
            info!("{} not configured, lookups disabled", name);
            None
        }
    }
}

fn env_value(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_registry_env() {
        for var in [
            ENV_ISWCNET_URL,
            ENV_ISWCNET_API_KEY,
            ENV_IFPI_URL,
            ENV_IFPI_API_KEY,
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.timeout_secs, 5);
        assert!(config.iswcnet.is_none());
        assert!(config.ifpi.is_none());
    }

    #[test]
    fn test_full_toml_parses() {
        let toml_str = r#"
            port = 8080
            timeout_secs = 10

            [iswcnet]
            url = "https://iswc.example.com/search"
            api_key = "iswc-key"

            [ifpi]
            url = "https://isrc.example.com/lookup"
        "#;

        let config: TomlConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.timeout_secs, 10);

        let iswcnet = config.iswcnet.unwrap();
        assert_eq!(iswcnet.url.as_deref(), Some("https://iswc.example.com/search"));
        assert_eq!(iswcnet.api_key.as_deref(), Some("iswc-key"));

        let ifpi = config.ifpi.unwrap();
        assert_eq!(ifpi.url.as_deref(), Some("https://isrc.example.com/lookup"));
        assert!(ifpi.api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_cli_port_overrides_toml() {
        clear_registry_env();

        let toml_config = TomlConfig {
            port: 4000,
            ..TomlConfig::default()
        };
        let config = Config::resolve(toml_config, ConfigOverrides { port: Some(5000) });
        assert_eq!(config.port, 5000);
    }

    #[test]
    #[serial]
    fn test_toml_port_without_override() {
        clear_registry_env();

        let toml_config = TomlConfig {
            port: 4000,
            ..TomlConfig::default()
        };
        let config = Config::resolve(toml_config, ConfigOverrides::default());
        assert_eq!(config.port, 4000);
    }

    #[test]
    #[serial]
    fn test_registry_from_toml() {
        clear_registry_env();

        let toml_config = TomlConfig {
            iswcnet: Some(RegistryToml {
                url: Some("https://iswc.example.com".to_string()),
                api_key: Some("file-key".to_string()),
            }),
            ..TomlConfig::default()
        };
        let config = Config::resolve(toml_config, ConfigOverrides::default());

        let endpoint = config.iswcnet.unwrap();
        assert_eq!(endpoint.url, "https://iswc.example.com");
        assert_eq!(endpoint.api_key, "file-key");
        assert!(config.ifpi.is_none());
    }

    #[test]
    #[serial]
    fn test_env_key_overrides_toml_key() {
        clear_registry_env();
        env::set_var(ENV_ISWCNET_API_KEY, "env-key");

        let toml_config = TomlConfig {
            iswcnet: Some(RegistryToml {
                url: Some("https://iswc.example.com".to_string()),
                api_key: Some("file-key".to_string()),
            }),
            ..TomlConfig::default()
        };
        let config = Config::resolve(toml_config, ConfigOverrides::default());

        let endpoint = config.iswcnet.unwrap();
        assert_eq!(endpoint.api_key, "env-key");

        env::remove_var(ENV_ISWCNET_API_KEY);
    }

    #[test]
    #[serial]
    fn test_registry_from_env_only() {
        clear_registry_env();
        env::set_var(ENV_IFPI_URL, "https://isrc.example.com");
        env::set_var(ENV_IFPI_API_KEY, "env-key");

        let config = Config::resolve(TomlConfig::default(), ConfigOverrides::default());

        let endpoint = config.ifpi.unwrap();
        assert_eq!(endpoint.url, "https://isrc.example.com");
        assert_eq!(endpoint.api_key, "env-key");

        clear_registry_env();
    }

    #[test]
    #[serial]
    fn test_url_without_key_disables_registry() {
        clear_registry_env();
        env::set_var(ENV_ISWCNET_URL, "https://iswc.example.com");

        let config = Config::resolve(TomlConfig::default(), ConfigOverrides::default());
        assert!(config.iswcnet.is_none());

        env::remove_var(ENV_ISWCNET_URL);
    }

    #[test]
    #[serial]
    fn test_blank_env_value_is_ignored() {
        clear_registry_env();
        env::set_var(ENV_IFPI_URL, "   ");
        env::set_var(ENV_IFPI_API_KEY, "env-key");

        let config = Config::resolve(TomlConfig::default(), ConfigOverrides::default());
        assert!(config.ifpi.is_none());

        clear_registry_env();
    }

    #[test]
    #[serial]
    fn test_load_missing_file_uses_defaults() {
        clear_registry_env();

        let config = Config::load(
            Path::new("/nonexistent/tunelens.toml"),
            ConfigOverrides::default(),
        )
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.iswcnet.is_none());
        assert!(config.ifpi.is_none());
    }

    #[test]
    #[serial]
    fn test_load_reads_file() {
        clear_registry_env();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"port = 9000\ntimeout_secs = 2\n\n[ifpi]\nurl = \"https://isrc.example.com\"\napi_key = \"k\"\n",
        )
        .unwrap();

        let config = Config::load(file.path(), ConfigOverrides::default()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert!(config.ifpi.is_some());
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"port = \"not a number\"").unwrap();

        let result = Config::load(file.path(), ConfigOverrides::default());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
