// ── Runtime connection configuration ──
//
// These types describe *where* to connect and *what* to target.
// They carry the access token and tuning knobs, but never touch disk.
// The CLI constructs an `OperationsConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use cfops_api::transport::{TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default for public platforms.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed lab installations).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// How to wait for asynchronous jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobPollConfig {
    /// Fixed delay between status fetches.
    pub interval: Duration,
    /// Overall deadline measured from the first fetch.
    pub timeout: Duration,
}

impl Default for JobPollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(5 * 60),
        }
    }
}

/// Configuration for one session against a Cloud Foundry API.
///
/// Built by the CLI, passed to
/// [`CloudFoundryOperations::connect`](crate::CloudFoundryOperations::connect).
#[derive(Debug, Clone)]
pub struct OperationsConfig {
    /// API endpoint (e.g., `https://api.example.com`).
    pub api: Url,
    /// Bearer access token.
    pub token: SecretString,
    /// Organization to target (name).
    pub organization: String,
    /// Space to target (name). Space-scoped operations fail without it.
    pub space: Option<String>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Job polling behavior for asynchronous deletions.
    pub job_poll: JobPollConfig,
}

impl OperationsConfig {
    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
        }
    }
}
