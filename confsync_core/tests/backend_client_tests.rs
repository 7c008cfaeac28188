//! Backend client tests against the in-process mock backend

use confsync_core::backend::{
    ApplyAllQuery, ApplyTarget, BackendClient, Endpoint, ExtractEntityQuery, MigrateSettingsQuery,
};
use confsync_core::error::{Error, ProtocolError};
use confsync_core::{RunId, TenantKey, TenantPair};
use confsync_test_utils::MockBackend;
use serde_json::json;
use std::time::Duration;

fn tenants() -> TenantPair {
    TenantPair::from_lookup(|name| Some(format!("{name}-value"))).unwrap()
}

#[tokio::test]
async fn test_post_sends_query_in_declared_order() {
    let backend = MockBackend::start().await;
    let client = BackendClient::new(backend.base_url(), None).unwrap();

    client
        .post(
            Endpoint::ExtractEntity,
            &ExtractEntityQuery::lookback(TenantKey::main()),
            &json!({}),
        )
        .await
        .unwrap();

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/extract_entity_v2");
    assert_eq!(
        requests[0].query.as_deref(),
        Some("tenant_key=0&time_from_minutes=21600&time_to_minutes=0")
    );
}

#[tokio::test]
async fn test_plan_query_carries_action_id_and_flags() {
    let backend = MockBackend::start().await;
    let client = BackendClient::new(backend.base_url(), None).unwrap();
    let run_id = RunId::parse("2024-03-13_10-30-15").unwrap();

    client
        .post(
            Endpoint::MigrateSettings,
            &MigrateSettingsQuery::plan_all(TenantKey::main(), TenantKey::target(), run_id),
            &json!({}),
        )
        .await
        .unwrap();

    let request = &backend.requests()[0];
    let keys: Vec<String> = request.query_pairs().into_iter().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        [
            "tenant_key_main",
            "tenant_key_target",
            "action_id",
            "enable_dashboards",
            "enable_omit_destroy",
            "enable_ultra_parallel",
            "terraform_parallelism",
        ]
    );
    assert_eq!(
        request.query_param("action_id").as_deref(),
        Some("2024-03-13_10-30-15")
    );
    assert_eq!(request.query_param("enable_omit_destroy").as_deref(), Some("false"));
    assert_eq!(request.query_param("terraform_parallelism").as_deref(), Some("10"));
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let backend = MockBackend::start().await;
    let client = BackendClient::new(backend.base_url(), None).unwrap();
    let run_id = RunId::parse("2024-03-13_10-30-15").unwrap();

    client
        .post(
            Endpoint::TerraformApplyAll,
            &ApplyAllQuery {
                tenant_key_main: TenantKey::main(),
                tenant_key_target: TenantKey::target(),
                action_id: run_id,
            },
            &[ApplyTarget::all()],
        )
        .await
        .unwrap();

    let request = &backend.requests()[0];
    assert_eq!(
        request.json(),
        json!([{"module": "All", "module_trimmed": "All", "unique_name": "All"}])
    );
}

#[tokio::test]
async fn test_tenant_list_body_is_posted_verbatim() {
    let backend = MockBackend::start().await;
    let client = BackendClient::new(backend.base_url(), None).unwrap();
    let pair = tenants();

    client
        .post_json(Endpoint::TenantList, &pair.tenant_list())
        .await
        .unwrap();

    let request = &backend.requests()[0];
    assert_eq!(request.query, None);
    let body = request.json();
    assert_eq!(body["tenantKey"], json!({"Main": "0", "Target": "1"}));
    assert_eq!(
        body["tenants"]["0"]["APIKey"],
        "DYNATRACE_SOURCE_API_TOKEN-value"
    );
    assert_eq!(body["tenants"]["1"]["url"], "DYNATRACE_ENV_URL-value");
}

#[tokio::test]
async fn test_non_success_status_is_returned_not_raised() {
    let backend = MockBackend::start().await;
    backend.respond("GET", "/tenant_list", 503, "maintenance");
    let client = BackendClient::new(backend.base_url(), None).unwrap();

    let response = client.get(Endpoint::TenantList).await.unwrap();

    assert_eq!(response.status, 503);
    assert!(!response.is_success());
    assert_eq!(response.body, "maintenance");
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client =
        BackendClient::new(format!("http://{addr}"), Some(Duration::from_secs(5))).unwrap();

    let result = client.get(Endpoint::TenantList).await;

    match result {
        Err(Error::Protocol(ProtocolError::Transport { endpoint, .. })) => {
            assert_eq!(endpoint, "tenant_list");
        }
        other => panic!("Expected Transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_base_url_trailing_slash_is_tolerated() {
    let backend = MockBackend::start().await;
    let client = BackendClient::new(format!("{}/", backend.base_url()), None).unwrap();

    client.get(Endpoint::TenantList).await.unwrap();

    assert_eq!(backend.request_paths(), ["/tenant_list"]);
}
