//! End-to-end lifecycle flows against a mock backend.

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scholarly_client::ScholarlyClient;
use scholarly_domain::{
    Actor, ApplicationFilter, Checkout, DomainError, Identity, NO_APPLICATIONS_MESSAGE,
    PortalServices, ReturnQuery, Route, RuleViolation, ServiceSettings, ViewScope,
};
use scholarly_types::{ApplicantDetails, ApplicationStatus, PaymentStatus, Role, Scholarship};

const ADA: &str = "ada@example.com";

fn services(server: &MockServer) -> PortalServices {
    let client = ScholarlyClient::builder()
        .base_url(server.uri())
        .auth_token("id-token")
        .build()
        .unwrap();
    PortalServices::new(client, ServiceSettings::default())
}

fn ada() -> Identity {
    Identity::new(ADA, "Ada Lovelace")
}

fn moderator() -> Actor {
    Actor::new(Identity::new("mod@example.com", "Mo"), Role::Moderator)
}

fn ack() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({ "acknowledged": true, "matchedCount": 1, "modifiedCount": 1 }))
}

fn scholarship(fees: u32, charge: u32) -> Scholarship {
    serde_json::from_value(json!({
        "_id": "s1",
        "scholarshipName": "Global Excellence",
        "universityName": "Oxford",
        "universityCountry": "UK",
        "subjectCategory": "Engineering",
        "scholarshipCategory": "Full fund",
        "degree": "Masters",
        "applicationFees": fees,
        "serviceCharge": charge
    }))
    .unwrap()
}

fn details() -> ApplicantDetails {
    ApplicantDetails {
        phone: "555-0100".into(),
        photo: None,
        village: "Kew".into(),
        district: "Richmond".into(),
        country: "UK".into(),
        gender: "female".into(),
        applying_degree: "Masters".into(),
        ssc_result: "5.00".into(),
        hsc_result: "5.00".into(),
        study_gap: None,
    }
}

fn application_doc(id: &str, status: &str, payment: &str) -> Value {
    json!({
        "_id": id,
        "scholarshipId": "s1",
        "userEmail": ADA,
        "userName": "Ada Lovelace",
        "universityName": "Oxford",
        "scholarshipName": "Global Excellence",
        "scholarshipCategory": "Full fund",
        "applicationFees": 50,
        "serviceCharge": 20,
        "applicationStatus": status,
        "paymentStatus": payment,
        "applicationDate": "2026-03-01T10:00:00Z"
    })
}

async fn mount_no_prior_applications(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/applications"))
        .and(query_param("email", ADA))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

async fn mount_insert(server: &MockServer, id: &str) {
    Mock::given(method("POST"))
        .and(path("/applications"))
        .and(body_partial_json(json!({
            "userEmail": ADA,
            "applicationStatus": "pending",
            "paymentStatus": "unpaid"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true, "insertedId": id })),
        )
        .expect(1)
        .mount(server)
        .await;
}

// ─────────────────────────────────────────────────────────────────────────────
// Submission
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_free_scholarship_is_paid_on_submit() {
    let server = MockServer::start().await;
    mount_no_prior_applications(&server).await;
    mount_insert(&server, "a9").await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a9/payment"))
        .and(body_partial_json(json!({ "paymentStatus": "paid" })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;

    let outcome = services(&server)
        .submission()
        .submit(&ada(), &scholarship(0, 0), details())
        .await
        .unwrap();

    assert_eq!(outcome.payment_status, PaymentStatus::Paid);
    assert_eq!(outcome.route, Route::MyApplications);
}

#[tokio::test]
async fn test_paid_scholarship_routes_to_payment_page() {
    let server = MockServer::start().await;
    mount_no_prior_applications(&server).await;
    mount_insert(&server, "665f1c").await;
    Mock::given(method("PATCH"))
        .and(path("/applications/665f1c/payment"))
        .respond_with(ack())
        .expect(0)
        .mount(&server)
        .await;

    let outcome = services(&server)
        .submission()
        .submit(&ada(), &scholarship(50, 20), details())
        .await
        .unwrap();

    assert_eq!(outcome.payment_status, PaymentStatus::Unpaid);
    assert_eq!(outcome.route.path(), "/dashboard/payment-page/665f1c");
}

#[tokio::test]
async fn test_incomplete_form_never_reaches_backend() {
    let server = MockServer::start().await;
    let mut form = details();
    form.district.clear();

    let err = services(&server)
        .submission()
        .submit(&ada(), &scholarship(50, 20), form)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation { ref missing } if missing == &["district"]));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_second_application_is_refused() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applications"))
        .and(query_param("email", ADA))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([application_doc("a1", "pending", "unpaid")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/applications"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = services(&server)
        .submission()
        .submit(&ada(), &scholarship(50, 20), details())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Rule(RuleViolation::AlreadyApplied)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Roles
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_role_is_student_until_lookup_settles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/users/role/{ADA}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "role": "moderator" }))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let mut resolver = services(&server).resolve_role(ADA);
    assert!(resolver.is_loading());
    assert_eq!(resolver.final_role(), Role::Student);

    assert_eq!(resolver.settled().await, Role::Moderator);
    assert!(!resolver.is_loading());
    assert_eq!(resolver.final_role(), Role::Moderator);
}

#[tokio::test]
async fn test_blank_or_failed_role_falls_back_to_student() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/role/blank@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "role": "" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/role/broken@example.com"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let portal = services(&server);
    assert_eq!(portal.resolve_role("blank@example.com").settled().await, Role::Student);
    assert_eq!(portal.resolve_role("broken@example.com").settled().await, Role::Student);
}

#[tokio::test]
async fn test_rejected_role_lookup_reports_expired_session() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let portal = services(&server);
    let mut resolver = portal.resolve_role(ADA);
    // Offered controls still fall back to the student tier.
    assert_eq!(resolver.settled().await, Role::Student);

    let err = resolver.confirmed().await.unwrap_err();
    assert!(err.is_session_expired());
    assert!(!portal.client().is_authenticated());
}

// ─────────────────────────────────────────────────────────────────────────────
// Moderation and tracking
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_rejection_removes_student_controls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scholarships"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    // First listing sees the application pending, later ones rejected.
    Mock::given(method("GET"))
        .and(path("/applications"))
        .and(query_param("email", ADA))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([application_doc("a1", "pending", "paid")])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/applications"))
        .and(query_param("email", ADA))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([application_doc("a1", "rejected", "paid")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/applications/a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(application_doc("a1", "pending", "paid")),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a1/status"))
        .and(body_partial_json(json!({ "applicationStatus": "rejected" })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;

    let portal = services(&server);
    let before = portal.tracking().rows(&ada()).await.unwrap();
    assert!(before[0].actions.can_edit && before[0].actions.can_delete);

    portal
        .moderation()
        .set_status(&moderator(), "a1", ApplicationStatus::Rejected)
        .await
        .unwrap();

    let after = portal.tracking().rows(&ada()).await.unwrap();
    assert_eq!(after[0].application.application_status, ApplicationStatus::Rejected);
    assert!(!after[0].actions.can_edit);
    assert!(!after[0].actions.can_delete);
    assert!(!after[0].actions.can_review);
}

#[tokio::test]
async fn test_completed_application_cannot_be_reopened() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applications/a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(application_doc("a1", "completed", "paid")),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a1/status"))
        .respond_with(ack())
        .expect(0)
        .mount(&server)
        .await;

    let err = services(&server)
        .moderation()
        .set_status(&moderator(), "a1", ApplicationStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::IllegalTransition {
            from: ApplicationStatus::Completed,
            to: ApplicationStatus::Pending
        }
    ));
}

#[tokio::test]
async fn test_search_without_matches_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            application_doc("a1", "pending", "unpaid"),
            application_doc("a2", "processing", "paid")
        ])))
        .mount(&server)
        .await;

    let filter = ApplicationFilter {
        search: Some("nobody-by-this-name".into()),
        ..Default::default()
    };
    let rows = services(&server)
        .moderation()
        .filtered(&moderator(), &filter)
        .await
        .unwrap();

    assert!(rows.is_empty());
    assert_eq!(NO_APPLICATIONS_MESSAGE, "No applications found");
}

#[tokio::test]
async fn test_students_cannot_moderate() {
    let server = MockServer::start().await;
    let student = Actor::new(ada(), Role::Student);

    let err = services(&server)
        .moderation()
        .delete(&student, "a1", true)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DomainError::Rule(RuleViolation::InsufficientRole { required: Role::Moderator, .. })
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unconfirmed_delete_is_refused() {
    let server = MockServer::start().await;
    let err = services(&server)
        .moderation()
        .delete(&moderator(), "a1", false)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Rule(RuleViolation::NotConfirmed)));
}

#[tokio::test]
async fn test_closed_view_drops_slow_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applications"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([application_doc("a1", "pending", "unpaid")]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let portal = services(&server);
    let scope = ViewScope::new();
    let dialog = scope.child();
    let closer = scope.token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        closer.cancel();
    });

    let started = std::time::Instant::now();
    let result = scope.run(portal.moderation().list(&moderator())).await;

    assert!(matches!(result, Err(DomainError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(dialog.is_cancelled());
}

fn review_doc(id: &str, application_id: &str) -> Value {
    json!({
        "_id": id,
        "scholarshipId": "s1",
        "applicationId": application_id,
        "reviewerName": "Ada Lovelace",
        "reviewerEmail": ADA,
        "rating": 5,
        "comment": "Smooth process",
        "reviewDate": "2026-04-01T09:00:00Z"
    })
}

#[tokio::test]
async fn test_review_marks_application_reviewed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reviews"))
        .and(query_param("email", ADA))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/applications/a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(application_doc("a1", "completed", "paid")),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/reviews"))
        .and(body_partial_json(json!({ "applicationId": "a1", "rating": 5 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true, "insertedId": "r1" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a1/reviewed"))
        .and(body_partial_json(json!({ "reviewed": true })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;

    let id = services(&server)
        .tracking()
        .add_review(&ada(), "a1", 5, "Smooth process")
        .await
        .unwrap();
    assert_eq!(id, "r1");
}

#[tokio::test]
async fn test_failed_reviewed_flag_does_not_allow_second_review() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applications/a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(application_doc("a1", "completed", "paid")),
        )
        .mount(&server)
        .await;
    // Nothing reviewed on the first attempt, the posted review afterwards.
    Mock::given(method("GET"))
        .and(path("/reviews"))
        .and(query_param("email", ADA))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reviews"))
        .and(query_param("email", ADA))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([review_doc("r1", "a1")])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/reviews"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true, "insertedId": "r1" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a1/reviewed"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let tracking = services(&server).tracking();
    let first = tracking.add_review(&ada(), "a1", 5, "Smooth process").await;
    assert!(matches!(first, Err(DomainError::Client(_))));

    let second = tracking
        .add_review(&ada(), "a1", 5, "Smooth process")
        .await
        .unwrap_err();
    assert!(matches!(
        second,
        DomainError::Rule(RuleViolation::AlreadyReviewed)
    ));
}

#[tokio::test]
async fn test_pending_application_cannot_be_reviewed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applications/a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(application_doc("a1", "pending", "paid")),
        )
        .mount(&server)
        .await;

    let err = services(&server)
        .tracking()
        .add_review(&ada(), "a1", 4, "Too early")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Rule(RuleViolation::NotCompleted(ApplicationStatus::Pending))
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_checkout_and_success_reconciliation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applications/a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(application_doc("a1", "pending", "unpaid")),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/create-checkout-session"))
        .and(body_partial_json(json!({
            "applicationId": "a1",
            "applicantEmail": ADA,
            "currency": "usd"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_1",
            "url": "https://checkout.example.com/c/cs_test_1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a1/payment"))
        .and(body_partial_json(json!({
            "paymentStatus": "paid",
            "transactionId": "cs_test_1"
        })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;

    let payment = services(&server).payment();
    let checkout = payment.begin_checkout("a1").await.unwrap();
    assert_eq!(
        checkout,
        Checkout::Redirect {
            url: "https://checkout.example.com/c/cs_test_1".into()
        }
    );

    let query = ReturnQuery::parse(
        "http://localhost:5173/payment-success?application_id=a1&session_id=cs_test_1",
    )
    .unwrap();
    let receipt = payment.reconcile_success(&query).await.unwrap();
    assert!(receipt.reconciled);
    assert_eq!(receipt.transaction_id.as_deref(), Some("cs_test_1"));
}

#[tokio::test]
async fn test_paid_application_is_not_charged_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applications/a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(application_doc("a1", "pending", "paid")),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a1/payment"))
        .respond_with(ack())
        .expect(0)
        .mount(&server)
        .await;

    let payment = services(&server).payment();
    let err = payment.begin_checkout("a1").await.unwrap_err();
    assert!(matches!(err, DomainError::Rule(RuleViolation::AlreadyPaid)));

    let receipt = payment
        .reconcile_success(&ReturnQuery::new("a1", Some("cs_replay".into())))
        .await
        .unwrap();
    assert!(!receipt.reconciled);
}

#[tokio::test]
async fn test_unpaid_free_application_is_settled_without_checkout() {
    let server = MockServer::start().await;
    let mut doc = application_doc("a1", "pending", "unpaid");
    doc["applicationFees"] = json!(0);
    doc["serviceCharge"] = json!(0);
    Mock::given(method("GET"))
        .and(path("/applications/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(doc))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a1/payment"))
        .and(body_partial_json(json!({ "paymentStatus": "paid" })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/create-checkout-session"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let checkout = services(&server).payment().begin_checkout("a1").await.unwrap();
    let Checkout::Settled(receipt) = checkout else {
        panic!("expected a settled application");
    };
    assert_eq!(receipt.application_id, "a1");
    assert!(receipt.reconciled);
}

#[tokio::test]
async fn test_cancelled_checkout_returns_to_payment_page() {
    let server = MockServer::start().await;
    let route = services(&server)
        .payment()
        .reconcile_failure(&ReturnQuery::new("a1", None));
    assert_eq!(route, Route::PaymentPage("a1".into()));
}

// ─────────────────────────────────────────────────────────────────────────────
// Administration and session
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_admin_cannot_demote_self() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "u1", "name": "Root", "email": "root@example.com", "role": "admin" },
            { "_id": "u2", "name": "Ada", "email": ADA, "role": "student" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/users/u2/role"))
        .and(body_partial_json(json!({ "role": "moderator" })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;

    let admin = Actor::new(Identity::new("root@example.com", "Root"), Role::Admin);
    let users = services(&server).users();

    let err = users.set_role(&admin, "u1", Role::Student).await.unwrap_err();
    assert!(matches!(err, DomainError::Rule(RuleViolation::SelfModification)));

    users.set_role(&admin, "u2", Role::Moderator).await.unwrap();

    let students = users.list(&admin, Some(Role::Student)).await.unwrap();
    assert_eq!(students.len(), 1);
}

#[tokio::test]
async fn test_expired_session_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/applications"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let portal = services(&server);
    let err = portal.moderation().list(&moderator()).await.unwrap_err();
    assert!(err.is_session_expired());
    assert!(!portal.client().is_authenticated());
}

#[tokio::test]
async fn test_students_manage_only_their_own_reviews() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reviews"))
        .and(query_param("email", ADA))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_id": "r1",
            "scholarshipId": "s1",
            "reviewerName": "Ada Lovelace",
            "reviewerEmail": ADA,
            "rating": 4,
            "comment": "Helpful staff",
            "reviewDate": "2026-04-01T09:00:00Z"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/reviews/r1"))
        .and(body_partial_json(json!({ "rating": 5 })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tracking = services(&server).tracking();
    assert_eq!(tracking.my_reviews(&ada()).await.unwrap().len(), 1);

    let patch = scholarly_types::ReviewPatch {
        rating: Some(5),
        comment: None,
    };
    tracking.edit_review(&ada(), "r1", &patch).await.unwrap();

    let err = tracking.delete_review(&ada(), "r9").await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));

    let bad = scholarly_types::ReviewPatch {
        rating: Some(9),
        comment: None,
    };
    assert!(matches!(
        tracking.edit_review(&ada(), "r1", &bad).await,
        Err(DomainError::InvalidInput(_))
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Editing and withdrawing
// ─────────────────────────────────────────────────────────────────────────────

async fn mount_application(server: &MockServer, id: &str, status: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/applications/{id}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(application_doc(id, status, "paid")),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_pending_application_edit_sends_only_changed_fields() {
    let server = MockServer::start().await;
    mount_application(&server, "a1", "pending").await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a1"))
        .and(body_partial_json(json!({ "phone": "555-0199" })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;

    let patch = scholarly_types::ApplicantDetailsPatch {
        phone: Some("555-0199".into()),
        ..Default::default()
    };
    services(&server)
        .tracking()
        .edit(&ada(), "a1", &patch)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let sent: Value = requests
        .iter()
        .find(|r| r.method.as_str() == "PATCH")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .unwrap();
    assert_eq!(sent, json!({ "phone": "555-0199" }));
}

#[tokio::test]
async fn test_processing_application_cannot_be_edited_or_withdrawn() {
    let server = MockServer::start().await;
    mount_application(&server, "a1", "processing").await;
    Mock::given(method("PATCH"))
        .respond_with(ack())
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let tracking = services(&server).tracking();
    let patch = scholarly_types::ApplicantDetailsPatch {
        village: Some("Elsewhere".into()),
        ..Default::default()
    };
    let edit = tracking.edit(&ada(), "a1", &patch).await.unwrap_err();
    assert!(matches!(edit, DomainError::Rule(RuleViolation::NotPending(_))));

    let withdraw = tracking.delete(&ada(), "a1").await.unwrap_err();
    assert!(matches!(withdraw, DomainError::Rule(RuleViolation::NotPending(_))));
}

#[tokio::test]
async fn test_pending_application_is_withdrawn() {
    let server = MockServer::start().await;
    mount_application(&server, "a1", "pending").await;
    Mock::given(method("DELETE"))
        .and(path("/applications/a1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    services(&server).tracking().delete(&ada(), "a1").await.unwrap();
}

#[tokio::test]
async fn test_feedback_is_trimmed_and_sent() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/applications/a1/feedback"))
        .and(body_partial_json(json!({ "feedback": "Missing transcript" })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;

    let moderation = services(&server).moderation();
    moderation
        .set_feedback(&moderator(), "a1", "  Missing transcript \n")
        .await
        .unwrap();

    let blank = moderation
        .set_feedback(&moderator(), "a1", "   ")
        .await
        .unwrap_err();
    assert!(matches!(blank, DomainError::Validation { .. }));
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog management
// ─────────────────────────────────────────────────────────────────────────────

fn new_scholarship(name: &str) -> scholarly_types::NewScholarship {
    serde_json::from_value(json!({
        "scholarshipName": name,
        "universityName": "Oxford",
        "universityCountry": "UK",
        "subjectCategory": "Engineering",
        "scholarshipCategory": "Full fund",
        "degree": "Masters",
        "applicationFees": 50,
        "serviceCharge": 20
    }))
    .unwrap()
}

#[tokio::test]
async fn test_publish_records_poster() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scholarships"))
        .and(body_partial_json(json!({
            "scholarshipName": "Global Excellence",
            "postedBy": "mod@example.com"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true, "insertedId": "s9" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let catalog = services(&server).catalog();
    let id = catalog
        .publish(&moderator(), new_scholarship("Global Excellence"))
        .await
        .unwrap();
    assert_eq!(id, "s9");

    let unnamed = catalog
        .publish(&moderator(), new_scholarship("  "))
        .await
        .unwrap_err();
    assert!(matches!(unnamed, DomainError::Validation { .. }));

    let student = Actor::new(ada(), Role::Student);
    let refused = catalog
        .publish(&student, new_scholarship("Global Excellence"))
        .await
        .unwrap_err();
    assert!(matches!(refused, DomainError::Rule(RuleViolation::InsufficientRole { .. })));
}

#[tokio::test]
async fn test_update_of_missing_scholarship_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/scholarships/s1"))
        .and(body_partial_json(json!({ "degree": "PhD" })))
        .respond_with(ack())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/scholarships/gone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "acknowledged": true, "matchedCount": 0, "modifiedCount": 0 }),
        ))
        .mount(&server)
        .await;

    let catalog = services(&server).catalog();
    let patch = scholarly_types::ScholarshipPatch {
        degree: Some("PhD".into()),
        ..Default::default()
    };
    catalog.update(&moderator(), "s1", &patch).await.unwrap();

    let err = catalog.update(&moderator(), "gone", &patch).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn test_scholarship_delete_needs_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/scholarships/s1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = services(&server).catalog();
    let unconfirmed = catalog.delete(&moderator(), "s1", false).await.unwrap_err();
    assert!(matches!(unconfirmed, DomainError::Rule(RuleViolation::NotConfirmed)));

    catalog.delete(&moderator(), "s1", true).await.unwrap();
}
