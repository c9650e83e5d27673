//! Wire types for the Cloud Foundry v2 API.
//!
//! Every v2 resource arrives as `{metadata, entity}`. Only the fields the
//! orchestration layer reads are modelled; unknown fields are ignored.
//! Field names are already snake_case on the wire.

use serde::{Deserialize, Serialize};

// ── Pagination ───────────────────────────────────────────────────────

/// Generic pagination envelope returned by all v2 list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub prev_url: Option<String>,
    #[serde(default)]
    pub next_url: Option<String>,
    #[serde(default = "Vec::new")]
    pub resources: Vec<T>,
}

impl<T> Page<T> {
    /// Whether another page follows `page` (1-based).
    pub fn has_next(&self, page: u32) -> bool {
        page < self.total_pages
    }
}

// ── Resource envelope ────────────────────────────────────────────────

/// Server-assigned identity of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub guid: String,
    #[serde(default)]
    pub url: Option<String>,
    /// ISO 8601 date-time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// ISO 8601 date-time.
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A `{metadata, entity}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource<E> {
    pub metadata: Metadata,
    pub entity: E,
}

impl<E> Resource<E> {
    pub fn guid(&self) -> &str {
        &self.metadata.guid
    }
}

// ── Organizations & spaces ───────────────────────────────────────────

/// From `GET /v2/organizations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationEntity {
    pub name: String,
    /// `active` or `suspended`.
    #[serde(default)]
    pub status: Option<String>,
}

/// From `GET /v2/organizations/{guid}/spaces`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceEntity {
    pub name: String,
    #[serde(default)]
    pub organization_guid: Option<String>,
}

// ── Domains ──────────────────────────────────────────────────────────

/// From `GET /v2/private_domains` and the organization-scoped variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivateDomainEntity {
    pub name: String,
    #[serde(default)]
    pub owning_organization_guid: Option<String>,
}

/// From `GET /v2/shared_domains`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedDomainEntity {
    pub name: String,
    #[serde(default)]
    pub router_group_guid: Option<String>,
    /// `tcp` for TCP domains, absent for HTTP.
    #[serde(default)]
    pub router_group_type: Option<String>,
}

/// Body for `POST /v2/private_domains`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePrivateDomainRequest {
    pub name: String,
    pub owning_organization_guid: String,
}

// ── Routes ───────────────────────────────────────────────────────────

/// From `GET /v2/routes` and `GET /v2/spaces/{guid}/routes`.
///
/// The controller reports a missing path as `""`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEntity {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    pub domain_guid: String,
    pub space_guid: String,
    #[serde(default)]
    pub service_instance_guid: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

/// Body for `POST /v2/routes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRouteRequest {
    pub domain_guid: String,
    pub space_guid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

// ── Applications ─────────────────────────────────────────────────────

/// From `GET /v2/spaces/{guid}/apps` and `GET /v2/routes/{guid}/apps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationEntity {
    pub name: String,
    #[serde(default)]
    pub space_guid: Option<String>,
    /// `STARTED` or `STOPPED`.
    #[serde(default)]
    pub state: Option<String>,
}

// ── Jobs ─────────────────────────────────────────────────────────────

/// Lifecycle of a server-side job. `Finished` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Finished,
    Failed,
}

/// Why a job failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: i64,
    pub description: String,
    /// Symbolic code, e.g. `CF-RouteNotFound`.
    pub error_code: String,
}

/// From `GET /v2/jobs/{guid}` and async `DELETE` responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEntity {
    #[serde(default)]
    pub guid: Option<String>,
    pub status: JobStatus,
    #[serde(default)]
    pub error_details: Option<ErrorDetails>,
}

// ── Errors ───────────────────────────────────────────────────────────

/// Error body returned by the cloud controller on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub code: i64,
    pub description: String,
    pub error_code: String,
}
