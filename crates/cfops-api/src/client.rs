// Hand-crafted async HTTP client for the Cloud Foundry v2 API.
//
// Base path: /v2/
// Auth: `Authorization: bearer <token>` header

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{
    ApplicationEntity, CreatePrivateDomainRequest, CreateRouteRequest, ErrorResponse, JobEntity,
    OrganizationEntity, Page, PrivateDomainEntity, Resource, RouteEntity, SharedDomainEntity,
    SpaceEntity,
};

/// Page size requested on every list call.
const RESULTS_PER_PAGE: u32 = 100;

// ── Route filter ─────────────────────────────────────────────────────

/// Server-side filters for `GET /v2/routes`.
///
/// The controller's host/path filters are not guaranteed to be exact
/// matches, so callers still compare the returned entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteQuery {
    pub domain_guid: Option<String>,
    pub host: Option<String>,
    pub path: Option<String>,
    pub organization_guid: Option<String>,
}

impl RouteQuery {
    fn filters(&self) -> Vec<String> {
        [
            ("domain_guid", &self.domain_guid),
            ("host", &self.host),
            ("path", &self.path),
            ("organization_guid", &self.organization_guid),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| format!("{key}:{v}")))
        .collect()
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Cloud Foundry v2 API.
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted and
/// owns the connection pool, so every resolver and orchestrator keeps its
/// own handle.
#[derive(Debug, Clone)]
pub struct CloudFoundryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CloudFoundryClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an access token and transport config.
    ///
    /// Injects `Authorization: bearer <token>` as a default header on
    /// every request.
    pub fn from_token(
        base_url: &str,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.authenticated_client(token)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base URL ends with `/` so `v2/...` joins below it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    fn list_params(filters: &[String], page: u32) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> =
            filters.iter().map(|f| ("q", f.clone())).collect();
        params.push(("page", page.to_string()));
        params.push(("results-per-page", RESULTS_PER_PAGE.to_string()));
        params
    }

    fn name_filter(name: Option<&str>) -> Vec<String> {
        name.map(|n| vec![format!("name:{n}")]).unwrap_or_default()
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn put_no_response(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).send().await?;
        Self::handle_empty(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        Self::handle_empty(resp).await
    }

    async fn delete_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url} params={params:?}");

        let resp = self.http.delete(url).query(params).send().await?;
        Self::handle_optional(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Self::decode(body)
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Like `handle_response`, but `204 No Content` (or an empty body)
    /// yields `None`.
    async fn handle_optional<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<Option<T>, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Self::decode(body).map(Some)
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    fn decode<T: DeserializeOwned>(body: String) -> Result<T, Error> {
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::InvalidToken;
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            Error::Api {
                status: status.as_u16(),
                code: err.code,
                error_code: err.error_code,
                description: err.description,
            }
        } else {
            Error::Http {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Organizations ────────────────────────────────────────────────

    pub async fn list_organizations(
        &self,
        name: Option<&str>,
        page: u32,
    ) -> Result<Page<Resource<OrganizationEntity>>, Error> {
        self.get_with_params(
            "v2/organizations",
            &Self::list_params(&Self::name_filter(name), page),
        )
        .await
    }

    pub async fn list_organization_spaces(
        &self,
        organization_id: &str,
        name: Option<&str>,
        page: u32,
    ) -> Result<Page<Resource<SpaceEntity>>, Error> {
        self.get_with_params(
            &format!("v2/organizations/{organization_id}/spaces"),
            &Self::list_params(&Self::name_filter(name), page),
        )
        .await
    }

    // ── Domains ──────────────────────────────────────────────────────

    pub async fn list_organization_private_domains(
        &self,
        organization_id: &str,
        name: Option<&str>,
        page: u32,
    ) -> Result<Page<Resource<PrivateDomainEntity>>, Error> {
        self.get_with_params(
            &format!("v2/organizations/{organization_id}/private_domains"),
            &Self::list_params(&Self::name_filter(name), page),
        )
        .await
    }

    pub async fn list_private_domains(
        &self,
        name: Option<&str>,
        page: u32,
    ) -> Result<Page<Resource<PrivateDomainEntity>>, Error> {
        self.get_with_params(
            "v2/private_domains",
            &Self::list_params(&Self::name_filter(name), page),
        )
        .await
    }

    pub async fn list_shared_domains(
        &self,
        name: Option<&str>,
        page: u32,
    ) -> Result<Page<Resource<SharedDomainEntity>>, Error> {
        self.get_with_params(
            "v2/shared_domains",
            &Self::list_params(&Self::name_filter(name), page),
        )
        .await
    }

    pub async fn create_private_domain(
        &self,
        request: &CreatePrivateDomainRequest,
    ) -> Result<Resource<PrivateDomainEntity>, Error> {
        self.post("v2/private_domains", request).await
    }

    /// Share a private domain with an organization.
    pub async fn associate_organization_private_domain(
        &self,
        organization_id: &str,
        domain_id: &str,
    ) -> Result<(), Error> {
        self.put_no_response(&format!(
            "v2/organizations/{organization_id}/private_domains/{domain_id}"
        ))
        .await
    }

    pub async fn remove_organization_private_domain(
        &self,
        organization_id: &str,
        domain_id: &str,
    ) -> Result<(), Error> {
        self.delete(&format!(
            "v2/organizations/{organization_id}/private_domains/{domain_id}"
        ))
        .await
    }

    // ── Routes ───────────────────────────────────────────────────────

    pub async fn list_routes(
        &self,
        query: &RouteQuery,
        page: u32,
    ) -> Result<Page<Resource<RouteEntity>>, Error> {
        self.get_with_params("v2/routes", &Self::list_params(&query.filters(), page))
            .await
    }

    pub async fn list_space_routes(
        &self,
        space_id: &str,
        page: u32,
    ) -> Result<Page<Resource<RouteEntity>>, Error> {
        self.get_with_params(
            &format!("v2/spaces/{space_id}/routes"),
            &Self::list_params(&[], page),
        )
        .await
    }

    pub async fn list_route_applications(
        &self,
        route_id: &str,
        page: u32,
    ) -> Result<Page<Resource<ApplicationEntity>>, Error> {
        self.get_with_params(
            &format!("v2/routes/{route_id}/apps"),
            &Self::list_params(&[], page),
        )
        .await
    }

    pub async fn create_route(
        &self,
        request: &CreateRouteRequest,
    ) -> Result<Resource<RouteEntity>, Error> {
        self.post("v2/routes", request).await
    }

    /// Delete a route asynchronously.
    ///
    /// Returns the job to poll, or `None` when the controller completed
    /// the deletion inline (`204 No Content`).
    pub async fn delete_route(&self, route_id: &str) -> Result<Option<Resource<JobEntity>>, Error> {
        self.delete_with_params(
            &format!("v2/routes/{route_id}"),
            &[("async", "true".to_owned())],
        )
        .await
    }

    // ── Applications ─────────────────────────────────────────────────

    pub async fn list_space_applications(
        &self,
        space_id: &str,
        name: Option<&str>,
        page: u32,
    ) -> Result<Page<Resource<ApplicationEntity>>, Error> {
        self.get_with_params(
            &format!("v2/spaces/{space_id}/apps"),
            &Self::list_params(&Self::name_filter(name), page),
        )
        .await
    }

    pub async fn associate_application_route(
        &self,
        application_id: &str,
        route_id: &str,
    ) -> Result<(), Error> {
        self.put_no_response(&format!("v2/apps/{application_id}/routes/{route_id}"))
            .await
    }

    pub async fn remove_application_route(
        &self,
        application_id: &str,
        route_id: &str,
    ) -> Result<(), Error> {
        self.delete(&format!("v2/apps/{application_id}/routes/{route_id}"))
            .await
    }

    // ── Jobs ─────────────────────────────────────────────────────────

    pub async fn get_job(&self, job_id: &str) -> Result<Resource<JobEntity>, Error> {
        self.get(&format!("v2/jobs/{job_id}")).await
    }
}
