//! Resolution, pagination and job-completion engine for Cloud Foundry
//! route management.
//!
//! Sits between `cfops-api` (one typed method per v2 endpoint) and the
//! `cfops` CLI:
//!
//! - **[`paginate`]**: turns any page-based list endpoint into a lazy,
//!   restartable [`Stream`](futures_util::Stream) of resources.
//!
//! - **[`JobPoller`]**: waits for a server-side job to reach a terminal
//!   state with a fixed poll interval, an overall deadline, and prompt
//!   cancellation.
//!
//! - **[`ResourceResolver`]**: turns human names into ids through filtered
//!   listing: organizations, spaces, applications, domains (private beats
//!   shared) and routes (exact host/path match), plus idempotent
//!   create-or-reuse for routes.
//!
//! - **[`Routes`]** / **[`Domains`]**: the compound operations
//!   (check, create, map, unmap, delete, list, delete-orphaned; domain
//!   create, share, unshare, list).
//!
//! - **[`CloudFoundryOperations`]**: facade that builds the client from an
//!   [`OperationsConfig`], resolves the targeted organization and space, and
//!   vends the operation groups sharing one cancellation token.

pub mod config;
pub mod convert;
pub mod domains;
pub mod error;
pub mod job;
pub mod model;
pub mod operations;
pub mod paginate;
pub mod resolve;
pub mod routes;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{JobPollConfig, OperationsConfig, TlsVerification};
pub use domains::Domains;
pub use error::{CoreError, RouteDeletionFailure};
pub use job::JobPoller;
pub use model::{
    Domain, DomainKind, Level, OrphanSweep, ResourceKind, ResourceRef, Route, RouteSummary,
    RouteTarget, Target,
};
pub use operations::CloudFoundryOperations;
pub use paginate::{collect_all, first, paginate};
pub use resolve::ResourceResolver;
pub use routes::Routes;
