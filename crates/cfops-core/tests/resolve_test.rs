#![allow(clippy::unwrap_used)]
// Resolver and paginator behavior against a mocked controller.

mod common;

use futures_util::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use cfops_core::{CoreError, DomainKind, ResourceKind, ResourceResolver, collect_all, paginate};

use common::{
    ORG_ID, SPACE_ID, mount_private_domains, mount_routes, mount_shared_domains, ok, page,
    resource, route_entity, setup,
};

// ── Pagination ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_three_items_on_one_page_keep_order() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/shared_domains"))
        .and(query_param("page", "1"))
        .respond_with(ok(page(vec![
            resource("d-3", json!({ "name": "c.example.com" })),
            resource("d-1", json!({ "name": "a.example.com" })),
            resource("d-2", json!({ "name": "b.example.com" })),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = &client;
    let domains = collect_all(move |p| client.list_shared_domains(None, p))
        .await
        .unwrap();

    let ids: Vec<&str> = domains.iter().map(|d| d.guid()).collect();
    assert_eq!(ids, vec!["d-3", "d-1", "d-2"]);
}

#[tokio::test]
async fn test_pages_are_requested_in_sequence() {
    let (server, client) = setup().await;

    for (index, guid) in [(1, "org-1"), (2, "org-2"), (3, "org-3")] {
        Mock::given(method("GET"))
            .and(path("/v2/organizations"))
            .and(query_param("page", index.to_string()))
            .respond_with(ok(json!({
                "total_results": 3,
                "total_pages": 3,
                "resources": [resource(guid, json!({ "name": guid }))],
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = &client;
    let names: Vec<String> = paginate(move |p| client.list_organizations(None, p))
        .map_ok(|org| org.entity.name)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(names, vec!["org-1", "org-2", "org-3"]);
}

#[tokio::test]
async fn test_failed_page_surfaces_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/organizations"))
        .and(query_param("page", "1"))
        .respond_with(ok(json!({
            "total_results": 2,
            "total_pages": 2,
            "resources": [resource("org-1", json!({ "name": "org-1" }))],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/organizations"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = &client;
    let result = collect_all(move |p| client.list_organizations(None, p)).await;
    let err = result.unwrap_err();
    assert!(
        matches!(err, cfops_api::Error::Http { status: 500, .. }),
        "expected Http 500, got: {err:?}"
    );
}

// ── Domains ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_private_domain_takes_precedence_over_shared() {
    let (server, client) = setup().await;
    mount_private_domains(&server, "test-domain", &["private-id"]).await;

    Mock::given(method("GET"))
        .and(path("/v2/shared_domains"))
        .respond_with(ok(page(vec![resource(
            "shared-id",
            json!({ "name": "test-domain" }),
        )])))
        .expect(0)
        .mount(&server)
        .await;

    let domain = ResourceResolver::new(client)
        .resolve_domain(ORG_ID, "test-domain")
        .await
        .unwrap();

    assert_eq!(domain.id, "private-id");
    assert_eq!(domain.kind, DomainKind::Private);
}

#[tokio::test]
async fn test_shared_domain_used_when_no_private_match() {
    let (server, client) = setup().await;
    mount_private_domains(&server, "test-domain", &[]).await;
    mount_shared_domains(&server, "test-domain", &["shared-id"]).await;

    let domain = ResourceResolver::new(client)
        .resolve_domain(ORG_ID, "test-domain")
        .await
        .unwrap();

    assert_eq!(domain.id, "shared-id");
    assert_eq!(domain.kind, DomainKind::Shared);
    assert_eq!(domain.owning_organization_id, None);
}

#[tokio::test]
async fn test_missing_domain_is_not_found() {
    let (server, client) = setup().await;
    mount_private_domains(&server, "test-domain", &[]).await;
    mount_shared_domains(&server, "test-domain", &[]).await;

    let err = ResourceResolver::new(client)
        .resolve_domain(ORG_ID, "test-domain")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::NotFound {
            kind: ResourceKind::Domain,
            ..
        }
    ));
    assert_eq!(err.to_string(), "Domain test-domain does not exist");
}

#[tokio::test]
async fn test_duplicate_private_domains_are_ambiguous() {
    let (server, client) = setup().await;
    mount_private_domains(&server, "test-domain", &["p-1", "p-2"]).await;

    let err = ResourceResolver::new(client)
        .resolve_domain(ORG_ID, "test-domain")
        .await
        .unwrap_err();

    match err {
        CoreError::AmbiguousResource { kind, name, matches } => {
            assert_eq!(kind, ResourceKind::Domain);
            assert_eq!(name, "test-domain");
            assert_eq!(matches, 2);
        }
        other => panic!("expected AmbiguousResource, got {other:?}"),
    }
}

#[tokio::test]
async fn test_private_domain_lookup_is_platform_wide() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/private_domains"))
        .and(query_param("q", "name:internal.example.com"))
        .respond_with(ok(page(vec![resource(
            "private-id",
            json!({ "name": "internal.example.com", "owning_organization_guid": "other-org" }),
        )])))
        .mount(&server)
        .await;

    let domain = ResourceResolver::new(client)
        .resolve_private_domain("internal.example.com")
        .await
        .unwrap();

    assert_eq!(domain.owning_organization_id.as_deref(), Some("other-org"));
}

// ── Organizations, spaces, applications ─────────────────────────────

#[tokio::test]
async fn test_missing_space_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/v2/organizations/{ORG_ID}/spaces")))
        .and(query_param("q", "name:test-space"))
        .respond_with(ok(page(vec![])))
        .mount(&server)
        .await;

    let err = ResourceResolver::new(client)
        .resolve_space(ORG_ID, "test-space")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Space test-space does not exist");
}

#[tokio::test]
async fn test_organization_resolves_to_ref() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v2/organizations"))
        .and(query_param("q", "name:test-organization"))
        .respond_with(ok(page(vec![resource(
            ORG_ID,
            json!({ "name": "test-organization", "status": "active" }),
        )])))
        .mount(&server)
        .await;

    let org = ResourceResolver::new(client)
        .resolve_organization("test-organization")
        .await
        .unwrap();

    assert_eq!(org.id, ORG_ID);
    assert_eq!(org.name, "test-organization");
}

// ── Routes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_route_resolution_requires_exact_host_and_path() {
    let (server, client) = setup().await;
    mount_routes(
        &server,
        "dom-1",
        vec![
            resource("route-staging", route_entity("www-staging", "/api", "dom-1")),
            resource("route-api-v2", route_entity("www", "/api/v2", "dom-1")),
            resource("route-exact", route_entity("www", "/api", "dom-1")),
        ],
    )
    .await;

    let route = ResourceResolver::new(client)
        .find_route("dom-1", Some("www"), Some("/api"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(route.id, "route-exact");
}

#[tokio::test]
async fn test_empty_path_matches_absent_path() {
    let (server, client) = setup().await;
    mount_routes(
        &server,
        "dom-1",
        vec![resource("route-1", route_entity("www", "", "dom-1"))],
    )
    .await;

    let route = ResourceResolver::new(client)
        .find_route("dom-1", Some("www"), None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(route.id, "route-1");
    assert_eq!(route.path, None);
}

#[tokio::test]
async fn test_resolve_or_create_route_is_idempotent() {
    let (server, client) = setup().await;
    mount_private_domains(&server, "test-domain", &["dom-1"]).await;

    // First lookup finds nothing; every later lookup sees the new route.
    Mock::given(method("GET"))
        .and(path("/v2/routes"))
        .and(query_param("q", "domain_guid:dom-1"))
        .respond_with(ok(page(vec![])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_routes(
        &server,
        "dom-1",
        vec![resource("route-new", route_entity("test-host", "", "dom-1"))],
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/v2/routes"))
        .respond_with(ResponseTemplate::new(201).set_body_json(resource(
            "route-new",
            route_entity("test-host", "", "dom-1"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = ResourceResolver::new(client);
    let domain = resolver.resolve_domain(ORG_ID, "test-domain").await.unwrap();

    let first = resolver
        .resolve_or_create_route(&domain, Some("test-host"), None, SPACE_ID)
        .await
        .unwrap();
    let second = resolver
        .resolve_or_create_route(&domain, Some("test-host"), None, SPACE_ID)
        .await
        .unwrap();

    assert_eq!(first.id, "route-new");
    assert_eq!(first, second);
}
