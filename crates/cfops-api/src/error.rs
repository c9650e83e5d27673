use thiserror::Error;

/// Everything a single cloud controller request can fail with.
#[derive(Debug, Error)]
pub enum Error {
    // ── Credentials ─────────────────────────────────────────────────
    /// The controller answered 401.
    #[error("Access token rejected by the cloud controller")]
    InvalidToken,

    /// The token could not be sent at all.
    #[error("Cannot authenticate: {message}")]
    Authentication { message: String },

    // ── Connection ──────────────────────────────────────────────────
    /// No usable response: refused, DNS, timeout, reset.
    #[error("Request to cloud controller failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API endpoint is not a valid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// CA bundle or client construction problem.
    #[error("TLS setup failed: {0}")]
    Tls(String),

    // ── Cloud Controller ────────────────────────────────────────────
    /// Structured error body (`{code, description, error_code}`).
    #[error("{error_code}({code}): {description}")]
    Api {
        status: u16,
        code: i64,
        error_code: String,
        description: String,
    },

    /// Non-success response without a parseable error body.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A 2xx body that does not match the expected shape. `body` is the
    /// raw text for `-vv` diagnostics.
    #[error("Unexpected response body: {message}")]
    Deserialization { message: String, body: String },
}
