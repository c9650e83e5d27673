//! Configuration for the cfops CLI.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `cfops_core::OperationsConfig`. The CLI layers its
//! `GlobalOpts` overrides on top of what this crate produces.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cfops_core::{JobPollConfig, OperationsConfig, TlsVerification};

/// Keyring service name; entries are keyed `<profile>/token`.
pub const KEYRING_SERVICE: &str = "cfops";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no access token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in {}", .path.display())]
    UnknownProfile { name: String, path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named API endpoint profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Delay between job status fetches in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Overall job deadline in seconds.
    #[serde(default = "default_job_timeout")]
    pub job_timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
            poll_interval_ms: default_poll_interval_ms(),
            job_timeout: default_job_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval_ms() -> u64 {
    1_000
}
fn default_job_timeout() -> u64 {
    300
}

/// A named Cloud Foundry target.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API endpoint (e.g., "https://api.sys.example.com").
    pub api: String,

    /// Organization name.
    #[serde(default)]
    pub organization: String,

    /// Space name; space-scoped commands fail without one.
    pub space: Option<String>,

    /// Access token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the access token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,

    /// Override job poll interval (milliseconds).
    pub poll_interval_ms: Option<u64>,

    /// Override job deadline (seconds).
    pub job_timeout: Option<u64>,
}

impl Config {
    /// Look up a profile, reporting the config path when it is missing.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.into(),
                path: config_path(),
            })
    }

    /// A copy with every plaintext token replaced by `****`.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for profile in copy.profiles.values_mut() {
            if profile.token.is_some() {
                profile.token = Some("****".into());
            }
        }
        copy
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// `--profile`, else `default_profile`, else `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "cfops", "cfops").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("cfops");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load defaults, then `path`, then `CFOPS_*` environment overrides.
///
/// Nested keys use a double underscore: `CFOPS_DEFAULTS__TIMEOUT=60`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CFOPS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Token resolution (without CLI flags) ────────────────────────────

/// Resolve the access token from the credential chain (no CLI flag step).
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// TLS mode from a profile: `insecure` wins over `ca_cert`.
pub fn profile_tls(profile: &Profile, defaults: &Defaults) -> TlsVerification {
    if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Parse and sanity-check an API endpoint.
pub fn parse_api_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "api".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "api".into(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Build an `OperationsConfig` from a profile, resolving the token
/// through the credential chain.
pub fn profile_to_operations_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<OperationsConfig, ConfigError> {
    let token = resolve_token(profile, profile_name)?;
    operations_config(profile, profile_name, defaults, token)
}

/// Build an `OperationsConfig` from a profile and an already-known token.
///
/// Unset profile values fall back to `defaults`.
pub fn operations_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    token: SecretString,
) -> Result<OperationsConfig, ConfigError> {
    let api = parse_api_url(&profile.api)?;
    if profile.organization.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "organization".into(),
            reason: format!(
                "no organization targeted for profile '{profile_name}'; pass --org or set `organization`"
            ),
        });
    }

    let timeout = positive("timeout", profile.timeout.unwrap_or(defaults.timeout))?;
    let poll_interval_ms = positive(
        "poll_interval_ms",
        profile.poll_interval_ms.unwrap_or(defaults.poll_interval_ms),
    )?;
    let job_timeout = positive(
        "job_timeout",
        profile.job_timeout.unwrap_or(defaults.job_timeout),
    )?;

    Ok(OperationsConfig {
        api,
        token,
        organization: profile.organization.clone(),
        space: profile.space.clone().filter(|s| !s.is_empty()),
        tls: profile_tls(profile, defaults),
        timeout: Duration::from_secs(timeout),
        job_poll: JobPollConfig {
            interval: Duration::from_millis(poll_interval_ms),
            timeout: Duration::from_secs(job_timeout),
        },
    })
}

fn positive(field: &str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "prod"

[defaults]
timeout = 10
job_timeout = 120

[profiles.prod]
api = "https://api.sys.example.com"
organization = "platform"
space = "routing"
token = "plaintext-token"
poll_interval_ms = 250

[profiles.lab]
api = "https://api.lab.local"
organization = "lab"
insecure = true
"#;

    fn load_sample() -> Config {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).expect("write config");
        load_config_from(&path).expect("load config")
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_config_from(&dir.path().join("absent.toml")).expect("load");

        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert_eq!(cfg.defaults.poll_interval_ms, 1_000);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profiles_and_defaults_are_merged() {
        let cfg = load_sample();

        assert_eq!(cfg.active_profile_name(None), "prod");
        assert_eq!(cfg.active_profile_name(Some("lab")), "lab");
        assert_eq!(cfg.defaults.timeout, 10);
        assert_eq!(cfg.defaults.output, "table");

        let prod = cfg.profile("prod").expect("prod profile");
        let ops = profile_to_operations_config(prod, "prod", &cfg.defaults).expect("ops config");

        assert_eq!(ops.api.as_str(), "https://api.sys.example.com/");
        assert_eq!(ops.organization, "platform");
        assert_eq!(ops.space.as_deref(), Some("routing"));
        assert_eq!(ops.timeout, Duration::from_secs(10));
        assert_eq!(ops.job_poll.interval, Duration::from_millis(250));
        assert_eq!(ops.job_poll.timeout, Duration::from_secs(120));
        assert_eq!(ops.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn unknown_profile_is_reported() {
        let cfg = load_sample();
        let err = cfg.profile("staging").expect_err("no such profile");
        assert!(err.to_string().starts_with("profile 'staging' not found"));
    }

    #[test]
    fn insecure_beats_custom_ca() {
        let profile = Profile {
            insecure: Some(true),
            ca_cert: Some(PathBuf::from("/etc/ssl/cf.pem")),
            ..Profile::default()
        };
        assert_eq!(
            profile_tls(&profile, &Defaults::default()),
            TlsVerification::DangerAcceptInvalid
        );

        let profile = Profile {
            ca_cert: Some(PathBuf::from("/etc/ssl/cf.pem")),
            ..Profile::default()
        };
        assert_eq!(
            profile_tls(&profile, &Defaults::default()),
            TlsVerification::CustomCa(PathBuf::from("/etc/ssl/cf.pem"))
        );
    }

    #[test]
    fn token_env_takes_precedence_over_plaintext() {
        // PATH is set in every test environment.
        let expected = std::env::var("PATH").expect("PATH is set");
        let profile = Profile {
            token_env: Some("PATH".into()),
            token: Some("from-file".into()),
            ..Profile::default()
        };

        let token = resolve_token(&profile, "cfops-config-test").expect("token");
        assert_eq!(token.expose_secret(), expected);
    }

    #[test]
    fn missing_token_is_an_error() {
        let profile = Profile {
            api: "https://api.example.com".into(),
            organization: "org".into(),
            ..Profile::default()
        };
        let err = resolve_token(&profile, "cfops-config-test-empty").expect_err("no token");
        assert!(matches!(err, ConfigError::NoCredentials { .. }));
    }

    #[test]
    fn api_url_must_be_http() {
        assert!(parse_api_url("https://api.example.com").is_ok());
        assert!(parse_api_url("ftp://api.example.com").is_err());
        assert!(parse_api_url("not a url").is_err());
    }

    #[test]
    fn zero_durations_are_rejected() {
        let profile = Profile {
            api: "https://api.sys.example.com".into(),
            organization: "platform".into(),
            ..Profile::default()
        };
        let zero_interval = Defaults {
            poll_interval_ms: 0,
            ..Defaults::default()
        };
        let err = operations_config(&profile, "test", &zero_interval, SecretString::from("t".to_owned()))
            .expect_err("zero poll interval");
        assert!(
            matches!(err, ConfigError::Validation { ref field, .. } if field == "poll_interval_ms")
        );

        let zero_job_timeout = Profile {
            job_timeout: Some(0),
            ..profile.clone()
        };
        let err = operations_config(
            &zero_job_timeout,
            "test",
            &Defaults::default(),
            SecretString::from("t".to_owned()),
        )
        .expect_err("zero job timeout");
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "job_timeout"));

        assert!(
            operations_config(&profile, "test", &Defaults::default(), SecretString::from("t".to_owned()))
                .is_ok()
        );
    }
}
