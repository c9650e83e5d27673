// ── Domain model ──
//
// Flat records the orchestration layer works with. The wire's
// metadata/entity split is removed in `convert`.

use serde::Serialize;
use strum::Display;

use crate::error::CoreError;

/// The kind of platform resource a lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ResourceKind {
    Organization,
    Space,
    Domain,
    #[strum(serialize = "Private domain")]
    PrivateDomain,
    Route,
    Application,
}

/// Identifies any named platform resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DomainKind {
    /// Scoped to (and shared with) specific organizations.
    Private,
    /// Visible platform-wide.
    Shared,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Domain {
    pub id: String,
    pub name: String,
    pub kind: DomainKind,
    pub owning_organization_id: Option<String>,
}

/// A route as stored by the platform.
///
/// `host` and `path` are `None` when absent; the empty string never
/// appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub id: String,
    pub host: Option<String>,
    pub path: Option<String>,
    pub domain_id: String,
    pub space_id: String,
    pub service_instance_id: Option<String>,
}

impl Route {
    /// Exact comparison on the `(host, path)` part of the uniqueness key.
    pub fn matches(&self, host: Option<&str>, path: Option<&str>) -> bool {
        normalize(self.host.as_deref()) == normalize(host)
            && normalize(self.path.as_deref()) == normalize(path)
    }

    pub fn is_bound_to_service(&self) -> bool {
        self.service_instance_id.is_some()
    }
}

/// Treat `""` the same as an absent host or path.
pub(crate) fn normalize(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Human form of a route used in messages: `host.domain` or `domain`.
pub(crate) fn route_display(host: Option<&str>, domain: &str) -> String {
    match normalize(host) {
        Some(host) => format!("{host}.{domain}"),
        None => domain.to_owned(),
    }
}

/// A route as named by a user: domain name plus optional host and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    domain: String,
    host: Option<String>,
    path: Option<String>,
}

impl RouteTarget {
    pub fn new(
        domain: impl Into<String>,
        host: Option<String>,
        path: Option<String>,
    ) -> Result<Self, CoreError> {
        let domain = domain.into().trim().to_owned();
        if domain.is_empty() {
            return Err(CoreError::Validation {
                message: "domain must not be empty".into(),
            });
        }
        let host = host.filter(|h| !h.is_empty());
        if host.as_deref().is_some_and(|h| h.contains('/')) {
            return Err(CoreError::Validation {
                message: "hostname must not contain '/'".into(),
            });
        }

        Ok(Self {
            domain,
            host,
            path: path.filter(|p| !p.is_empty()),
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn display_name(&self) -> String {
        route_display(self.host(), &self.domain)
    }
}

/// Scope of a route listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Organization,
    Space,
}

/// A route joined with the names of its domain, space, and first
/// application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub id: String,
    pub host: Option<String>,
    pub domain: String,
    pub path: Option<String>,
    pub space: String,
    pub application: Option<String>,
}

/// The organization and (optional) space every operation runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub organization_id: String,
    pub space_id: Option<String>,
}

/// Result of a successful orphaned-route sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrphanSweep {
    /// Ids of the routes that were deleted.
    pub deleted: Vec<String>,
    /// Routes left alone because an application or service uses them.
    pub skipped: usize,
}
