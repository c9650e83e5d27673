// ── Route operations ──
//
// Each operation is one linear pipeline: resolve names to ids, mutate,
// and for deletions wait for the resulting job. Every pipeline races the
// shared cancellation token.

use std::collections::HashMap;
use std::future::Future;

use async_stream::try_stream;
use futures_util::{Stream, TryFutureExt, TryStreamExt, pin_mut};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use cfops_api::{CloudFoundryClient, RouteQuery};

use crate::config::JobPollConfig;
use crate::error::{CoreError, RouteDeletionFailure};
use crate::job::JobPoller;
use crate::model::{Level, OrphanSweep, Route, RouteSummary, RouteTarget, Target};
use crate::paginate::{collect_all, first, paginate};
use crate::resolve::ResourceResolver;

/// Compound route operations against one organization/space target.
#[derive(Debug, Clone)]
pub struct Routes {
    resolver: ResourceResolver,
    poller: JobPoller,
    target: Target,
    cancel: CancellationToken,
}

impl Routes {
    pub fn new(
        client: CloudFoundryClient,
        target: Target,
        job_poll: JobPollConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            poller: JobPoller::new(client.clone(), job_poll, cancel.clone()),
            resolver: ResourceResolver::new(client),
            target,
            cancel,
        }
    }

    /// Run `op` unless the token is cancelled first.
    async fn guarded<T, F>(&self, op: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            result = op => result,
        }
    }

    fn space_id(&self) -> Result<&str, CoreError> {
        self.target
            .space_id
            .as_deref()
            .ok_or(CoreError::NoSpaceTargeted)
    }

    fn organization_id(&self) -> &str {
        &self.target.organization_id
    }

    // ── Single-route operations ──────────────────────────────────────

    /// Whether the route exists. A missing domain answers `false` without
    /// looking for routes.
    pub async fn check(&self, route: &RouteTarget) -> Result<bool, CoreError> {
        self.guarded(async {
            let domain = match self
                .resolver
                .resolve_domain(self.organization_id(), route.domain())
                .await
            {
                Ok(domain) => domain,
                Err(e) if e.is_not_found() => {
                    debug!(domain = route.domain(), "domain missing, route cannot exist");
                    return Ok(false);
                }
                Err(e) => return Err(e),
            };

            let found = self
                .resolver
                .find_route(&domain.id, route.host(), route.path())
                .await?;
            Ok(found.is_some())
        })
        .await
    }

    /// Create the route in `space`, or return the existing one.
    pub async fn create(&self, route: &RouteTarget, space: &str) -> Result<Route, CoreError> {
        self.guarded(async {
            let space = self
                .resolver
                .resolve_space(self.organization_id(), space)
                .await?;
            let domain = self
                .resolver
                .resolve_domain(self.organization_id(), route.domain())
                .await?;
            self.resolver
                .resolve_or_create_route(&domain, route.host(), route.path(), &space.id)
                .await
        })
        .await
    }

    /// Map `application` in the current space to the route, creating the
    /// route first when needed.
    pub async fn map(&self, application: &str, route: &RouteTarget) -> Result<Route, CoreError> {
        self.guarded(async {
            let space_id = self.space_id()?;
            let app = self
                .resolver
                .resolve_application(space_id, application)
                .await?;
            let domain = self
                .resolver
                .resolve_domain(self.organization_id(), route.domain())
                .await?;
            let resolved = self
                .resolver
                .resolve_or_create_route(&domain, route.host(), route.path(), space_id)
                .await?;

            self.resolver
                .client()
                .associate_application_route(&app.id, &resolved.id)
                .await?;
            info!(
                application,
                route = %route.display_name(),
                route_id = %resolved.id,
                "mapped route"
            );
            Ok(resolved)
        })
        .await
    }

    /// Remove the mapping between `application` and an existing route.
    pub async fn unmap(&self, application: &str, route: &RouteTarget) -> Result<(), CoreError> {
        self.guarded(async {
            let space_id = self.space_id()?;
            let app = self
                .resolver
                .resolve_application(space_id, application)
                .await?;
            let domain = self
                .resolver
                .resolve_domain(self.organization_id(), route.domain())
                .await?;
            let resolved = self
                .resolver
                .resolve_route(&domain, route.host(), route.path())
                .await?;

            self.resolver
                .client()
                .remove_application_route(&app.id, &resolved.id)
                .await?;
            info!(
                application,
                route = %route.display_name(),
                route_id = %resolved.id,
                "unmapped route"
            );
            Ok(())
        })
        .await
    }

    /// Delete an existing route and wait for the deletion job.
    pub async fn delete(&self, route: &RouteTarget) -> Result<(), CoreError> {
        self.guarded(async {
            let domain = self
                .resolver
                .resolve_domain(self.organization_id(), route.domain())
                .await?;
            let resolved = self
                .resolver
                .resolve_route(&domain, route.host(), route.path())
                .await?;

            self.delete_and_wait(&resolved.id).await?;
            info!(route = %route.display_name(), route_id = %resolved.id, "deleted route");
            Ok(())
        })
        .await
    }

    /// Issue the asynchronous delete and poll its job, if any.
    async fn delete_and_wait(&self, route_id: &str) -> Result<(), CoreError> {
        match self.resolver.client().delete_route(route_id).await? {
            Some(job) => self.poller.await_completion(job.guid()).await,
            None => Ok(()),
        }
    }

    // ── Listing ──────────────────────────────────────────────────────

    /// Every route of the organization or the current space, joined with
    /// domain, space and first-application names.
    ///
    /// Domain and space names come from two exhaustive listings made up
    /// front; only the application lookup is per route.
    pub fn list(&self, level: Level) -> impl Stream<Item = Result<RouteSummary, CoreError>> + '_ {
        try_stream! {
            let space_filter = match level {
                Level::Organization => None,
                Level::Space => Some(self.space_id()?),
            };
            let organization_id = self.organization_id();

            let domains: HashMap<String, String> = self
                .guarded(self.resolver.all_domains(organization_id))
                .await?
                .into_iter()
                .map(|d| (d.id, d.name))
                .collect();
            let spaces: HashMap<String, String> = self
                .guarded(self.resolver.all_spaces(organization_id))
                .await?
                .into_iter()
                .map(|s| (s.id, s.name))
                .collect();
            debug!(domains = domains.len(), spaces = spaces.len(), %level, "built lookup maps");

            let client = self.resolver.client();
            let query = RouteQuery {
                organization_guid: Some(organization_id.to_owned()),
                ..RouteQuery::default()
            };
            let query = &query;
            let routes = paginate(move |page| async move {
                match space_filter {
                    Some(space_id) => client.list_space_routes(space_id, page).await,
                    None => client.list_routes(query, page).await,
                }
            });
            pin_mut!(routes);

            while let Some(resource) = self
                .guarded(routes.try_next().map_err(CoreError::from))
                .await?
            {
                let route = Route::from(resource);
                let route_id = route.id.as_str();
                let application = self
                    .guarded(
                        first(move |page| client.list_route_applications(route_id, page))
                            .map_err(CoreError::from),
                    )
                    .await?
                    .map(|app| app.entity.name);

                yield RouteSummary {
                    domain: lookup(&domains, &route.domain_id),
                    space: lookup(&spaces, &route.space_id),
                    id: route.id,
                    host: route.host,
                    path: route.path,
                    application,
                };
            }
        }
    }

    // ── Orphan sweep ─────────────────────────────────────────────────

    /// Delete every route of the current space with no application and no
    /// bound service instance.
    ///
    /// Routes are handled independently: a failed deletion is recorded and
    /// the sweep moves on. If any failed, the sweep reports
    /// [`CoreError::OrphanedRouteDeletion`] after attempting all of them.
    pub async fn delete_orphaned_routes(&self) -> Result<OrphanSweep, CoreError> {
        self.guarded(async {
            let space_id = self.space_id()?;
            let client = self.resolver.client();
            // Collected up front so deletions cannot shift later pages.
            let routes = collect_all(move |page| client.list_space_routes(space_id, page)).await?;

            let mut sweep = OrphanSweep::default();
            let mut failures = Vec::new();

            for route in routes.into_iter().map(Route::from) {
                match self.delete_if_orphaned(&route).await {
                    Ok(true) => {
                        info!(route_id = %route.id, "deleted orphaned route");
                        sweep.deleted.push(route.id);
                    }
                    Ok(false) => sweep.skipped += 1,
                    Err(CoreError::Cancelled) => return Err(CoreError::Cancelled),
                    Err(error) => {
                        warn!(route_id = %route.id, %error, "failed to delete orphaned route");
                        failures.push(RouteDeletionFailure {
                            route_id: route.id,
                            error,
                        });
                    }
                }
            }

            if failures.is_empty() {
                Ok(sweep)
            } else {
                Err(CoreError::OrphanedRouteDeletion { failures })
            }
        })
        .await
    }

    /// `Ok(true)` when the route was orphaned and is now deleted.
    async fn delete_if_orphaned(&self, route: &Route) -> Result<bool, CoreError> {
        if route.is_bound_to_service() {
            return Ok(false);
        }

        let client = self.resolver.client();
        let route_id = route.id.as_str();
        let application = first(move |page| client.list_route_applications(route_id, page)).await?;
        if application.is_some() {
            return Ok(false);
        }

        self.delete_and_wait(route_id).await?;
        Ok(true)
    }
}

/// Name for `id`, falling back to the id itself.
fn lookup(names: &HashMap<String, String>, id: &str) -> String {
    names.get(id).cloned().unwrap_or_else(|| id.to_owned())
}
