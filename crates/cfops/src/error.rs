//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use cfops_config::ConfigError;
use cfops_core::{CoreError, ResourceKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the cloud controller")]
    #[diagnostic(
        code(cfops::connection_failed),
        help("Check the API URL and network access, or raise --timeout.")
    )]
    ConnectionFailed {
        #[source]
        source: cfops_api::Error,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(cfops::tls_error),
        help(
            "Use --insecure (-k) for self-signed lab installations,\n\
             or configure ca_cert in your profile."
        )
    )]
    TlsError { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(cfops::auth_failed),
        help(
            "The access token was rejected or has expired.\n\
             Fetch a fresh one (e.g. `cf oauth-token`) and pass it with --token or CFOPS_TOKEN."
        )
    )]
    AuthFailed,

    #[error("No access token configured for profile '{profile}'")]
    #[diagnostic(
        code(cfops::no_credentials),
        help(
            "Pass --token, set CFOPS_TOKEN, store one in the keyring under\n\
             service 'cfops' as '{profile}/token', or set token_env in the profile."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} {identifier} does not exist")]
    #[diagnostic(code(cfops::not_found), help("{hint}"))]
    NotFound {
        resource_type: String,
        identifier: String,
        hint: String,
    },

    #[error("{resource_type} {identifier} matches {matches} resources")]
    #[diagnostic(
        code(cfops::ambiguous),
        help("The controller should keep these names unique; resolve the duplicate first.")
    )]
    Ambiguous {
        resource_type: String,
        identifier: String,
        matches: usize,
    },

    #[error("No space targeted")]
    #[diagnostic(
        code(cfops::no_space),
        help("Pass --space, set CFOPS_SPACE, or add `space` to the profile.")
    )]
    NoSpaceTargeted,

    // ── API / jobs ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(cfops::api_error))]
    ApiError { message: String },

    #[error("{message}")]
    #[diagnostic(code(cfops::job_failed))]
    JobFailed { message: String },

    #[error("{count} orphaned route deletion(s) failed")]
    #[diagnostic(code(cfops::orphan_sweep), help("{details}"))]
    OrphanSweepFailed { count: usize, details: String },

    #[error("Operation cancelled")]
    #[diagnostic(code(cfops::cancelled))]
    Cancelled,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(cfops::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(cfops::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No API endpoint configured")]
    #[diagnostic(
        code(cfops::no_config),
        help(
            "Pass --api and --org, or create a profile in\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(cfops::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(cfops::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(cfops::timeout),
        help("Raise --job-timeout / --timeout, or check again later; the job may still finish.")
    )]
    Timeout { message: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::NoSpaceTargeted
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

/// Which listing to suggest when a lookup misses.
fn not_found_hint(kind: ResourceKind) -> String {
    match kind {
        ResourceKind::Domain | ResourceKind::PrivateDomain => {
            "Run: cfops domains list to see available domains".into()
        }
        ResourceKind::Route => "Run: cfops routes list to see existing routes".into(),
        ResourceKind::Space | ResourceKind::Application => {
            "Check --space and the name's spelling".into()
        }
        ResourceKind::Organization => "Check --org and the name's spelling".into(),
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { kind, name } => CliError::NotFound {
                resource_type: kind.to_string(),
                identifier: name,
                hint: not_found_hint(kind),
            },

            CoreError::AmbiguousResource {
                kind,
                name,
                matches,
            } => CliError::Ambiguous {
                resource_type: kind.to_string(),
                identifier: name,
                matches,
            },

            CoreError::NoSpaceTargeted => CliError::NoSpaceTargeted,

            err @ CoreError::JobFailed { .. } => CliError::JobFailed {
                message: err.to_string(),
            },

            err @ CoreError::PollTimeout { .. } => CliError::Timeout {
                message: err.to_string(),
            },

            CoreError::Cancelled => CliError::Cancelled,

            CoreError::OrphanedRouteDeletion { failures } => CliError::OrphanSweepFailed {
                count: failures.len(),
                details: failures
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n"),
            },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Api(api) => CliError::from(api),
        }
    }
}

impl From<cfops_api::Error> for CliError {
    fn from(err: cfops_api::Error) -> Self {
        use cfops_api::Error as Api;

        match err {
            Api::InvalidToken | Api::Authentication { .. } => CliError::AuthFailed,
            Api::Tls(message) => CliError::TlsError { message },
            Api::InvalidUrl(e) => CliError::Validation {
                field: "api".into(),
                reason: e.to_string(),
            },
            Api::Transport(ref e) if e.is_timeout() => CliError::Timeout {
                message: format!("Request timed out: {e}"),
            },
            Api::Transport(ref e) if e.is_connect() => {
                CliError::ConnectionFailed { source: err }
            }
            other => CliError::ApiError {
                message: other.to_string(),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name, .. } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
