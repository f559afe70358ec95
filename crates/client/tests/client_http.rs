use ecco_view_client::{ApiError, ApiSettings, EccoApi, EccoClient, Method};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> EccoClient {
    let settings = ApiSettings::new(server.uri()).with_token("test-jwt").with_tenant("tenant-42");
    EccoClient::new(settings).unwrap()
}

#[tokio::test]
async fn get_sends_auth_and_tenant_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/podcasts/campaigns"))
        .and(header("Authorization", "Bearer test-jwt"))
        .and(header("X-Tenant-ID", "tenant-42"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"campaigns": []})))
        .expect(1)
        .mount(&server)
        .await;

    let value = client_for(&server).get("/api/podcasts/campaigns").await.unwrap();
    assert_eq!(value, json!({"campaigns": []}));
}

#[tokio::test]
async fn anonymous_client_omits_optional_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/podcasts/leads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = EccoClient::new(ApiSettings::new(server.uri())).unwrap();
    client.get("/api/podcasts/leads").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
    assert!(!requests[0].headers.contains_key("x-tenant-id"));
}

#[tokio::test]
async fn patch_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/podcasts/leads/l1/status"))
        .and(body_json(json!({"outreach_status": "pitched"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "l1"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .call(Method::Patch, "/api/podcasts/leads/l1/status", Some(json!({"outreach_status": "pitched"})))
        .await
        .unwrap();
    assert_eq!(result["id"], "l1");
}

#[tokio::test]
async fn query_string_paths_pass_through() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/podcasts/campaigns/k1"))
        .and(query_param("status", "paused"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .call(Method::Patch, "/api/podcasts/campaigns/k1?status=paused", None)
        .await
        .unwrap();
}

#[tokio::test]
async fn no_content_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/brand-ambassadors/a1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let value = client_for(&server).delete("/api/v1/brand-ambassadors/a1").await.unwrap();
    assert!(value.is_null());
}

#[tokio::test]
async fn error_detail_becomes_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/podcasts/bookings"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"detail": "User not assigned to any tenant"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).get("/api/podcasts/bookings").await.unwrap_err();
    assert_eq!(err.to_string(), "User not assigned to any tenant");
    assert_eq!(err.status(), Some(403));
    assert!(!err.is_unauthorized());
}

#[tokio::test]
async fn missing_detail_uses_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/podcasts/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).get("/api/podcasts/messages").await.unwrap_err();
    assert_eq!(err.to_string(), "API Error: 500 Internal Server Error");
    assert!(err.is_transient());
}

#[tokio::test]
async fn unauthorized_is_flagged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/podcasts/leads"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Not authenticated"})))
        .mount(&server)
        .await;

    let err = client_for(&server).get("/api/podcasts/leads").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(matches!(err, ApiError::Status { code: 401, .. }));
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/podcasts/leads"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).get("/api/podcasts/leads").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}
