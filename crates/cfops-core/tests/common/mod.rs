// Shared wiremock fixtures for the cfops-core integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cfops_api::CloudFoundryClient;

pub const ORG_ID: &str = "test-organization-id";
pub const SPACE_ID: &str = "test-space-id";

pub async fn setup() -> (MockServer, CloudFoundryClient) {
    let server = MockServer::start().await;
    let client = CloudFoundryClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

pub fn resource(guid: &str, entity: Value) -> Value {
    json!({
        "metadata": { "guid": guid, "url": format!("/v2/things/{guid}") },
        "entity": entity,
    })
}

/// A single-page list envelope.
pub fn page(resources: Vec<Value>) -> Value {
    json!({
        "total_results": resources.len(),
        "total_pages": 1,
        "prev_url": null,
        "next_url": null,
        "resources": resources,
    })
}

pub fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn route_entity(host: &str, path: &str, domain_guid: &str) -> Value {
    json!({
        "host": host,
        "path": path,
        "domain_guid": domain_guid,
        "space_guid": SPACE_ID,
    })
}

pub fn job(guid: &str, status: &str) -> Value {
    resource(guid, json!({ "guid": guid, "status": status }))
}

pub fn failed_job(guid: &str, code: i64, error_code: &str, description: &str) -> Value {
    resource(
        guid,
        json!({
            "guid": guid,
            "status": "failed",
            "error_details": {
                "code": code,
                "description": description,
                "error_code": error_code,
            }
        }),
    )
}

// ── Canned endpoints ────────────────────────────────────────────────

pub async fn mount_private_domains(server: &MockServer, name: &str, guids: &[&str]) {
    let resources = guids
        .iter()
        .map(|g| resource(g, json!({ "name": name, "owning_organization_guid": ORG_ID })))
        .collect();
    Mock::given(method("GET"))
        .and(path(format!("/v2/organizations/{ORG_ID}/private_domains")))
        .and(query_param("q", format!("name:{name}")))
        .respond_with(ok(page(resources)))
        .mount(server)
        .await;
}

pub async fn mount_shared_domains(server: &MockServer, name: &str, guids: &[&str]) {
    let resources = guids
        .iter()
        .map(|g| resource(g, json!({ "name": name })))
        .collect();
    Mock::given(method("GET"))
        .and(path("/v2/shared_domains"))
        .and(query_param("q", format!("name:{name}")))
        .respond_with(ok(page(resources)))
        .mount(server)
        .await;
}

pub async fn mount_application(server: &MockServer, name: &str, guid: Option<&str>) {
    let resources = guid
        .map(|g| vec![resource(g, json!({ "name": name, "space_guid": SPACE_ID }))])
        .unwrap_or_default();
    Mock::given(method("GET"))
        .and(path(format!("/v2/spaces/{SPACE_ID}/apps")))
        .and(query_param("q", format!("name:{name}")))
        .respond_with(ok(page(resources)))
        .mount(server)
        .await;
}

pub async fn mount_routes(server: &MockServer, domain_guid: &str, routes: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/v2/routes"))
        .and(query_param("q", format!("domain_guid:{domain_guid}")))
        .respond_with(ok(page(routes)))
        .mount(server)
        .await;
}

pub async fn mount_route_apps(server: &MockServer, route_guid: &str, app_names: &[&str]) {
    let resources = app_names
        .iter()
        .enumerate()
        .map(|(i, name)| resource(&format!("app-{i}"), json!({ "name": name })))
        .collect();
    Mock::given(method("GET"))
        .and(path(format!("/v2/routes/{route_guid}/apps")))
        .respond_with(ok(page(resources)))
        .mount(server)
        .await;
}
