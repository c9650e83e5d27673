//! Name → id resolution through filtered listing.
//!
//! Every lookup lists with a server-side `q=name:` (or route) filter and
//! then decides locally:
//!
//! | matches | result |
//! |---|---|
//! | 0 | `None` / [`CoreError::NotFound`] |
//! | 1 | the match |
//! | >1 | [`CoreError::AmbiguousResource`] |
//!
//! Routes are the exception: the host/path filter may match loosely, so the
//! resolver keeps only the entry whose normalized host and path equal the
//! request exactly.

use tracing::{debug, info};

use cfops_api::types::CreateRouteRequest;
use cfops_api::{CloudFoundryClient, RouteQuery};

use crate::error::CoreError;
use crate::model::{Domain, ResourceKind, ResourceRef, Route, normalize, route_display};
use crate::paginate::collect_all;

/// Resolves human names into platform ids.
///
/// Holds only the immutable client handle; every method is a pure
/// function of its arguments and the server's answers.
#[derive(Debug, Clone)]
pub struct ResourceResolver {
    client: CloudFoundryClient,
}

impl ResourceResolver {
    pub fn new(client: CloudFoundryClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &CloudFoundryClient {
        &self.client
    }

    // ── Organizations & spaces ───────────────────────────────────────

    pub async fn resolve_organization(&self, name: &str) -> Result<ResourceRef, CoreError> {
        let client = &self.client;
        let found = collect_all(move |page| client.list_organizations(Some(name), page)).await?;
        single(ResourceKind::Organization, name, found)?
            .map(ResourceRef::from)
            .ok_or_else(|| CoreError::not_found(ResourceKind::Organization, name))
    }

    pub async fn resolve_space(
        &self,
        organization_id: &str,
        name: &str,
    ) -> Result<ResourceRef, CoreError> {
        let client = &self.client;
        let found = collect_all(move |page| {
            client.list_organization_spaces(organization_id, Some(name), page)
        })
        .await?;
        single(ResourceKind::Space, name, found)?
            .map(ResourceRef::from)
            .ok_or_else(|| CoreError::not_found(ResourceKind::Space, name))
    }

    /// Every space of the organization.
    pub async fn all_spaces(&self, organization_id: &str) -> Result<Vec<ResourceRef>, CoreError> {
        let client = &self.client;
        let spaces =
            collect_all(move |page| client.list_organization_spaces(organization_id, None, page))
                .await?;
        Ok(spaces.into_iter().map(ResourceRef::from).collect())
    }

    // ── Applications ─────────────────────────────────────────────────

    pub async fn resolve_application(
        &self,
        space_id: &str,
        name: &str,
    ) -> Result<ResourceRef, CoreError> {
        let client = &self.client;
        let found = collect_all(move |page| {
            client.list_space_applications(space_id, Some(name), page)
        })
        .await?;
        single(ResourceKind::Application, name, found)?
            .map(ResourceRef::from)
            .ok_or_else(|| CoreError::not_found(ResourceKind::Application, name))
    }

    // ── Domains ──────────────────────────────────────────────────────

    /// Resolve a domain visible to the organization.
    ///
    /// Private domains of the organization take precedence over shared
    /// domains of the same name; shared domains are only listed when no
    /// private domain matched.
    pub async fn resolve_domain(
        &self,
        organization_id: &str,
        name: &str,
    ) -> Result<Domain, CoreError> {
        let client = &self.client;

        let private = collect_all(move |page| {
            client.list_organization_private_domains(organization_id, Some(name), page)
        })
        .await?;
        if let Some(domain) = single(ResourceKind::Domain, name, private)? {
            debug!(domain = name, "resolved private domain");
            return Ok(Domain::from(domain));
        }

        let shared = collect_all(move |page| client.list_shared_domains(Some(name), page)).await?;
        if let Some(domain) = single(ResourceKind::Domain, name, shared)? {
            debug!(domain = name, "resolved shared domain");
            return Ok(Domain::from(domain));
        }

        Err(CoreError::not_found(ResourceKind::Domain, name))
    }

    /// Platform-wide private domain lookup, regardless of which
    /// organizations it is shared with.
    pub async fn resolve_private_domain(&self, name: &str) -> Result<Domain, CoreError> {
        let client = &self.client;
        let found = collect_all(move |page| client.list_private_domains(Some(name), page)).await?;
        single(ResourceKind::PrivateDomain, name, found)?
            .map(Domain::from)
            .ok_or_else(|| CoreError::not_found(ResourceKind::PrivateDomain, name))
    }

    /// Private domains of the organization followed by every shared domain.
    pub async fn all_domains(&self, organization_id: &str) -> Result<Vec<Domain>, CoreError> {
        let client = &self.client;
        let private = collect_all(move |page| {
            client.list_organization_private_domains(organization_id, None, page)
        })
        .await?;
        let shared = collect_all(move |page| client.list_shared_domains(None, page)).await?;

        Ok(private
            .into_iter()
            .map(Domain::from)
            .chain(shared.into_iter().map(Domain::from))
            .collect())
    }

    // ── Routes ───────────────────────────────────────────────────────

    /// Look up the route with exactly this `(domain, host, path)`.
    pub async fn find_route(
        &self,
        domain_id: &str,
        host: Option<&str>,
        path: Option<&str>,
    ) -> Result<Option<Route>, CoreError> {
        let query = RouteQuery {
            domain_guid: Some(domain_id.to_owned()),
            host: normalize(host).map(str::to_owned),
            path: normalize(path).map(str::to_owned),
            organization_guid: None,
        };
        let client = &self.client;
        let query = &query;
        let candidates = collect_all(move |page| client.list_routes(query, page)).await?;

        Ok(candidates
            .into_iter()
            .map(Route::from)
            .find(|route| route.matches(host, path)))
    }

    /// Like [`find_route`](Self::find_route) but a missing route is
    /// [`CoreError::NotFound`] named `host.domain`.
    pub async fn resolve_route(
        &self,
        domain: &Domain,
        host: Option<&str>,
        path: Option<&str>,
    ) -> Result<Route, CoreError> {
        self.find_route(&domain.id, host, path)
            .await?
            .ok_or_else(|| {
                CoreError::not_found(ResourceKind::Route, route_display(host, &domain.name))
            })
    }

    /// Reuse the route if it exists, otherwise create it in `space_id`.
    pub async fn resolve_or_create_route(
        &self,
        domain: &Domain,
        host: Option<&str>,
        path: Option<&str>,
        space_id: &str,
    ) -> Result<Route, CoreError> {
        if let Some(existing) = self.find_route(&domain.id, host, path).await? {
            debug!(route_id = %existing.id, "reusing existing route");
            return Ok(existing);
        }

        let request = CreateRouteRequest {
            domain_guid: domain.id.clone(),
            space_guid: space_id.to_owned(),
            host: normalize(host).map(str::to_owned),
            path: normalize(path).map(str::to_owned),
        };
        let created = Route::from(self.client.create_route(&request).await?);
        info!(
            route_id = %created.id,
            route = %route_display(host, &domain.name),
            "created route"
        );
        Ok(created)
    }
}

/// Exactly one match, none, or an ambiguity error.
fn single<T>(kind: ResourceKind, name: &str, mut found: Vec<T>) -> Result<Option<T>, CoreError> {
    match found.len() {
        0 => Ok(None),
        1 => Ok(found.pop()),
        matches => Err(CoreError::AmbiguousResource {
            kind,
            name: name.to_owned(),
            matches,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_distinguishes_zero_one_many() {
        assert!(matches!(single::<u8>(ResourceKind::Space, "dev", vec![]), Ok(None)));
        assert!(matches!(single(ResourceKind::Space, "dev", vec![1]), Ok(Some(1))));
        match single(ResourceKind::Domain, "example.com", vec![1, 2]) {
            Err(CoreError::AmbiguousResource { matches, .. }) => assert_eq!(matches, 2),
            other => panic!("expected AmbiguousResource, got {other:?}"),
        }
    }
}
