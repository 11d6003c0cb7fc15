//! Configuration for the bundlewatch CLI.
//!
//! TOML file + `BUNDLEWATCH_*` environment overrides via figment, with
//! password resolution (plaintext field or env-var indirection) and
//! validation into a strongly typed [`Settings`] the shell can hand to
//! the collaborators.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use bundlewatch_api::ApiGeneration;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured (set 'password' or 'password_env')")]
    NoCredentials,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Raw on-disk configuration. Loaded with figment, then validated into
/// [`Settings`].
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Carrier API base URL (e.g. "https://www.vodacom.co.za").
    pub host: String,

    /// Account username (usually an email address).
    pub username: String,

    /// Plaintext password. Prefer `password_env`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Name of an environment variable holding the password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Subscriber number whose balances are wanted.
    pub msisdn: String,

    /// Command line producing hourly usage counters (vnstat output),
    /// e.g. "ssh 192.168.0.1 ./get_today_hourly_usage.sh".
    pub monitor: String,

    /// Carrier REST generation: "v5" or "v10".
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Seconds between refresh cycles in watch mode.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    "v10".into()
}
fn default_refresh_interval() -> u64 {
    300
}
fn default_timeout() -> u64 {
    30
}

// ── Validated settings ──────────────────────────────────────────────

/// Fully resolved, validated configuration.
#[derive(Debug)]
pub struct Settings {
    pub host: Url,
    pub username: String,
    pub password: SecretString,
    pub msisdn: String,
    pub monitor: String,
    pub generation: ApiGeneration,
    pub refresh_interval: Duration,
    pub timeout: Duration,
}

impl Config {
    /// Load configuration from `path` (TOML) with `BUNDLEWATCH_*`
    /// environment overrides.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let config = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("BUNDLEWATCH_"))
            .extract()?;
        Ok(config)
    }

    /// Validate and resolve credentials into [`Settings`].
    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        let host: Url = self.host.parse().map_err(|_| ConfigError::Validation {
            field: "host".into(),
            reason: format!("invalid URL: {}", self.host),
        })?;

        let generation = match self.api_version.as_str() {
            "v5" => ApiGeneration::V5,
            "v10" => ApiGeneration::V10,
            other => {
                return Err(ConfigError::Validation {
                    field: "api_version".into(),
                    reason: format!("expected \"v5\" or \"v10\", got \"{other}\""),
                });
            }
        };

        if self.monitor.split_whitespace().next().is_none() {
            return Err(ConfigError::Validation {
                field: "monitor".into(),
                reason: "monitor command is empty".into(),
            });
        }

        let password = self.resolve_password()?;

        Ok(Settings {
            host,
            username: self.username.clone(),
            password,
            msisdn: self.msisdn.clone(),
            monitor: self.monitor.clone(),
            generation,
            refresh_interval: Duration::from_secs(self.refresh_interval_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }

    /// Password resolution order: env-var indirection, then plaintext.
    fn resolve_password(&self) -> Result<SecretString, ConfigError> {
        if let Some(var) = &self.password_env {
            let value = std::env::var(var).map_err(|_| ConfigError::Validation {
                field: "password_env".into(),
                reason: format!("environment variable '{var}' is not set"),
            })?;
            return Ok(SecretString::from(value));
        }
        self.password
            .as_ref()
            .map(|p| SecretString::from(p.clone()))
            .ok_or(ConfigError::NoCredentials)
    }
}

// ── Paths and template ──────────────────────────────────────────────

/// Default config file location (`~/.config/bundlewatch/config.toml` on
/// Linux, the platform equivalent elsewhere).
pub fn default_config_path() -> PathBuf {
    ProjectDirs::from("", "", "bundlewatch").map_or_else(
        || PathBuf::from("bundlewatch.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// A commented starter config for `config init`.
pub fn template() -> Result<String, ConfigError> {
    let example = Config {
        host: "https://www.vodacom.co.za".into(),
        username: "you@example.com".into(),
        password: None,
        password_env: Some("BUNDLEWATCH_PASSWORD".into()),
        msisdn: "27820000000".into(),
        monitor: "ssh 192.168.0.1 ./get_today_hourly_usage.sh".into(),
        api_version: default_api_version(),
        refresh_interval_secs: default_refresh_interval(),
        timeout_secs: default_timeout(),
    };
    let body = toml::to_string_pretty(&example)?;
    Ok(format!(
        "# bundlewatch configuration\n\
         # Passwords: set password_env to the name of an environment\n\
         # variable, or use a plaintext `password` key (not recommended).\n\
         {body}"
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_and_resolves_a_full_config() {
        let file = write_config(
            r#"
            host = "https://carrier.example"
            username = "user@example.com"
            password = "hunter2"
            msisdn = "27821234567"
            monitor = "ssh gw ./usage.sh"
            api_version = "v5"
            "#,
        );

        let config = Config::load(file.path()).unwrap();
        let settings = config.resolve().unwrap();

        assert_eq!(settings.host.as_str(), "https://carrier.example/");
        assert_eq!(settings.generation, ApiGeneration::V5);
        assert_eq!(settings.refresh_interval, Duration::from_secs(300));
    }

    #[test]
    fn rejects_unknown_api_version() {
        let config = Config {
            host: "https://carrier.example".into(),
            username: "u".into(),
            password: Some("p".into()),
            password_env: None,
            msisdn: "m".into(),
            monitor: "vnstat --dumpdb".into(),
            api_version: "v99".into(),
            refresh_interval_secs: 300,
            timeout_secs: 30,
        };
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn missing_password_is_no_credentials() {
        let config = Config {
            host: "https://carrier.example".into(),
            username: "u".into(),
            password: None,
            password_env: None,
            msisdn: "m".into(),
            monitor: "vnstat".into(),
            api_version: "v10".into(),
            refresh_interval_secs: 300,
            timeout_secs: 30,
        };
        assert!(matches!(config.resolve(), Err(ConfigError::NoCredentials)));
    }

    #[test]
    fn rejects_bad_host_url() {
        let config = Config {
            host: "not a url".into(),
            username: "u".into(),
            password: Some("p".into()),
            password_env: None,
            msisdn: "m".into(),
            monitor: "vnstat".into(),
            api_version: "v10".into(),
            refresh_interval_secs: 300,
            timeout_secs: 30,
        };
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn template_is_itself_loadable() {
        let body = template().unwrap();
        let file = write_config(&body);
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api_version, "v10");
    }
}
