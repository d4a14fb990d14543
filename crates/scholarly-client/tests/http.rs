//! HTTP behaviour of the client against a mock backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};

use scholarly_client::{Error, ScholarlyClient};
use scholarly_types::ApplicationStatus;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn application_doc(id: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "scholarshipId": "s1",
        "userEmail": "ada@example.com",
        "userName": "Ada",
        "universityName": "Oxford",
        "scholarshipCategory": "Full fund",
        "applicationFees": 50,
        "serviceCharge": 20,
        "applicationStatus": status,
        "paymentStatus": "unpaid",
        "applicationDate": "2026-03-01T10:00:00Z"
    })
}

fn client_for(server: &MockServer) -> ScholarlyClient {
    ScholarlyClient::builder()
        .base_url(server.uri())
        .auth_token("id-token")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applications"))
        .and(header("authorization", "Bearer id-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([application_doc("a1", "pending")])))
        .expect(1)
        .mount(&server)
        .await;

    let apps = client_for(&server).applications().list().await.unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].application_status, ApplicationStatus::Pending);
}

#[tokio::test]
async fn test_list_for_filters_by_email() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applications"))
        .and(query_param("email", "ada@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let apps = client_for(&server)
        .applications()
        .list_for("ada@example.com")
        .await
        .unwrap();
    assert!(apps.is_empty());
}

#[tokio::test]
async fn test_unauthorized_forces_logout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "unauthorized access" })))
        .mount(&server)
        .await;

    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(AtomicU16::new(0));
    let client = {
        let calls = calls.clone();
        let seen = seen.clone();
        ScholarlyClient::builder()
            .base_url(server.uri())
            .auth_token("stale")
            .on_unauthorized(move |status: u16| {
                calls.fetch_add(1, Ordering::SeqCst);
                seen.store(status, Ordering::SeqCst);
            })
            .build()
            .unwrap()
    };

    let err = client.users().list().await.unwrap_err();
    assert!(err.is_auth_error());
    assert!(err.to_string().contains("unauthorized access"));
    assert!(!client.is_authenticated());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(seen.load(Ordering::SeqCst), 401);
}

#[tokio::test]
async fn test_forbidden_also_forces_logout() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a1/status"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .applications()
        .set_status("a1", ApplicationStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth { status: 403, .. }));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_after_logout_requests_carry_no_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scholarships"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.logout();
    client.scholarships().list().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_not_found_and_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scholarships/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "no such scholarship" })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/scholarships/s1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.scholarships().get("missing").await.unwrap_err();
    assert!(err.is_not_found());

    let err = client.scholarships().delete("s1").await.unwrap_err();
    assert!(err.is_server_error());
    assert!(err.to_string().contains("HTTP 500"));
    // Other failures leave the session alone.
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn test_status_patch_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a1/status"))
        .and(body_json(json!({ "applicationStatus": "rejected" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "acknowledged": true, "matchedCount": 1, "modifiedCount": 1 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ack = client_for(&server)
        .applications()
        .set_status("a1", ApplicationStatus::Rejected)
        .await
        .unwrap();
    assert!(ack.matched());
}

#[tokio::test]
async fn test_role_lookup_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/role/ada@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "role": "moderator" })))
        .mount(&server)
        .await;

    let role = client_for(&server)
        .users()
        .role("ada@example.com")
        .await
        .unwrap();
    assert_eq!(role.role.as_deref(), Some("moderator"));
}

#[tokio::test]
async fn test_dashboard_status_counts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/application/dashboard/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "pending", "count": 3 },
            { "_id": "rejected", "count": 2 }
        ])))
        .mount(&server)
        .await;

    let counts = client_for(&server).dashboard().status_counts().await.unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[1].status, ApplicationStatus::Rejected);
}

#[tokio::test]
async fn test_user_profile_by_email() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ada@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "u1",
            "name": "Ada",
            "email": "ada@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client_for(&server).users().get("ada@example.com").await.unwrap();
    assert_eq!(user.id.as_deref(), Some("u1"));
    assert!(user.role.is_none());
}

#[tokio::test]
async fn test_ids_stay_inside_their_route() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/x"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/applications/..%2Fusers%2Fx"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.applications().delete("../users/x").await.unwrap();

    let err = client.applications().delete("..").await.unwrap_err();
    assert!(matches!(err, Error::InvalidPath(_)));
}
