use httpmock::prelude::*;
use mevoq_content::{ContentResolver, SourceConfig};
use serde_json::json;

fn live_config(server: &MockServer) -> SourceConfig {
    SourceConfig {
        url: Some(server.base_url()),
        anon_key: Some("anon-key".to_string()),
        timeout_seconds: Some(5),
    }
}

#[tokio::test]
async fn test_empty_services_table_serves_fixtures() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/rest/v1/services");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([]));
    });

    let resolver = ContentResolver::from_config(&live_config(&server)).unwrap();
    let services = resolver.list_services().await;

    api_mock.assert();
    let ids: Vec<&str> = services.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    assert!(services
        .iter()
        .any(|s| s.title == "Regulatory Strategy & Planning"));
}

#[tokio::test]
async fn test_unconfigured_team_is_fixture_roster() {
    let resolver = ContentResolver::from_config(&SourceConfig::default()).unwrap();

    let team = resolver.list_team().await;
    assert_eq!(team.len(), 3);
    assert_eq!(team, resolver.fixtures().team);
    assert_eq!(team[0].name, "Dr. Ashok Shah");
}

#[tokio::test]
async fn test_live_blog_rows_are_returned_verbatim() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/blog_posts")
            .query_param("published", "eq.true")
            .query_param("order", "created_at.desc");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([
                {
                    "id": "c7f1",
                    "slug": "ich-e6-r3",
                    "title": "ICH E6(R3) in practice",
                    "content": "<p>New GCP expectations.</p>",
                    "tags": ["GCP"],
                    "published": true,
                    "created_at": "2025-12-01T09:00:00+00:00"
                },
                {
                    "id": "a912",
                    "slug": "pmda-consultations",
                    "title": "Preparing for PMDA consultations",
                    "content": "<p>Japan.</p>",
                    "published": true,
                    "created_at": "2025-11-20T09:00:00+00:00"
                }
            ]));
    });

    let resolver = ContentResolver::from_config(&live_config(&server)).unwrap();
    let posts = resolver.list_blog_posts(true).await;

    api_mock.assert();
    let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["ich-e6-r3", "pmda-consultations"]);
    assert!(posts.iter().all(|p| p.published));
}

#[tokio::test]
async fn test_server_error_degrades_to_fixtures() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path_contains("/rest/v1/");
        then.status(500)
            .header("Content-Type", "application/json")
            .json_body(json!({"message": "upstream timeout"}));
    });

    let resolver = ContentResolver::from_config(&live_config(&server)).unwrap();

    assert_eq!(resolver.list_testimonials().await.len(), 3);
    assert_eq!(resolver.list_blog_posts(true).await.len(), 6);
    assert_eq!(
        resolver.get_service("risk-management").await.unwrap().title,
        "Risk Management"
    );
}

#[tokio::test]
async fn test_missing_post_is_none_live_and_fixture() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/blog_posts")
            .query_param("slug", "eq.nonexistent-slug");
        then.status(406)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "code": "PGRST116",
                "message": "JSON object requested, multiple (or no) rows returned"
            }));
    });

    let live = ContentResolver::from_config(&live_config(&server)).unwrap();
    assert!(live.get_blog_post("nonexistent-slug").await.is_none());
    api_mock.assert();

    let offline = ContentResolver::from_config(&SourceConfig::default()).unwrap();
    assert!(offline.get_blog_post("nonexistent-slug").await.is_none());
}

#[tokio::test]
async fn test_request_scope_hits_source_once() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/rest/v1/testimonials");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([
                {"id": "t1", "name": "Dr. Kim", "content": "Superb guidance.", "rating": 5}
            ]));
    });

    let resolver = ContentResolver::from_config(&live_config(&server)).unwrap();

    let scope = resolver.begin_request();
    let first = scope.list_testimonials().await;
    let second = scope.list_testimonials().await;
    assert_eq!(first, second);
    api_mock.assert_hits(1);
    drop(scope);

    resolver.begin_request().list_testimonials().await;
    api_mock.assert_hits(2);
}

#[tokio::test]
async fn test_stats_do_not_query_live_source() {
    let server = MockServer::start();
    let any_mock = server.mock(|when, then| {
        when.path_contains("/rest/v1/");
        then.status(200).json_body(json!([]));
    });

    let resolver = ContentResolver::from_config(&live_config(&server)).unwrap();
    let stats = resolver.begin_request().stats();

    assert_eq!(stats.project_weeks_saved, 500);
    any_mock.assert_hits(0);
}

#[tokio::test]
async fn test_live_services_replace_fixtures() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/services")
            .query_param("select", "*");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([
                {
                    "id": "live-1",
                    "title": "Labeling Review",
                    "description": "Label and PI review",
                    "icon": "file-text",
                    "features": ["USPI", "SmPC"],
                    "slug": "labeling-review"
                }
            ]));
    });

    let resolver = ContentResolver::from_config(&live_config(&server)).unwrap();
    let services = resolver.list_services().await;

    api_mock.assert();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].id, "live-1");
    assert_eq!(services[0].features, vec!["USPI", "SmPC"]);
}

#[tokio::test]
async fn test_live_team_replaces_fixtures() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/rest/v1/team");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([
                {"id": "m1", "name": "Dr. Priya Nair", "role": "Head of CMC", "expertise": ["Biologics"]},
                {"id": "m2", "name": "Tom Becker", "role": "Regulatory Writer", "expertise": []}
            ]));
    });

    let resolver = ContentResolver::from_config(&live_config(&server)).unwrap();
    let team = resolver.list_team().await;

    api_mock.assert();
    let names: Vec<&str> = team.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Dr. Priya Nair", "Tom Becker"]);
}

#[tokio::test]
async fn test_live_service_by_slug_requests_single_object() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/services")
            .query_param("slug", "eq.labeling-review")
            .header("accept", "application/vnd.pgrst.object+json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "id": "live-1",
                "title": "Labeling Review",
                "slug": "labeling-review",
                "content": "<p>Live body</p>"
            }));
    });

    let resolver = ContentResolver::from_config(&live_config(&server)).unwrap();
    let service = resolver.get_service("labeling-review").await.unwrap();

    api_mock.assert();
    assert_eq!(service.id, "live-1");
    assert_eq!(service.content.as_deref(), Some("<p>Live body</p>"));
}

#[tokio::test]
async fn test_null_columns_keep_live_rows() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/services");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([
                {
                    "id": "live-1",
                    "title": "Labeling Review",
                    "description": null,
                    "icon": null,
                    "features": null,
                    "slug": null,
                    "content": null,
                    "featured_image": null,
                    "case_study_snippet": null,
                    "created_at": null
                }
            ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/blog_posts");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!([
                {
                    "id": "p1",
                    "slug": "p1",
                    "title": "Live post",
                    "content": null,
                    "tags": null,
                    "published": true,
                    "published_at": null
                }
            ]));
    });

    let resolver = ContentResolver::from_config(&live_config(&server)).unwrap();

    let services = resolver.list_services().await;
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].id, "live-1");
    assert!(services[0].features.is_empty());

    let posts = resolver.list_blog_posts(true).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "p1");
    assert!(posts[0].tags.is_empty());
}
