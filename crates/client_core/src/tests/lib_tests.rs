use std::sync::Arc;

use super::*;
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use shared::{
    domain::{Activity, ActivityDetails},
    error::ErrorCode,
    protocol::ErrorResponse,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct BackendState {
    catalog: Arc<Mutex<Catalog>>,
}

#[derive(Deserialize)]
struct EmailQuery {
    email: String,
}

fn seeded_catalog() -> Catalog {
    Catalog::new(vec![
        Activity::new(
            "Chess Club",
            ActivityDetails {
                description: "Learn strategies".into(),
                schedule: "Fridays, 3:30 PM".into(),
                max_participants: 12,
                participants: vec!["michael@mergington.edu".into()],
            },
        ),
        Activity::new(
            "Art Club",
            ActivityDetails {
                description: "Paint and draw".into(),
                schedule: "Thursdays, 3:30 PM".into(),
                max_participants: 15,
                participants: Vec::new(),
            },
        ),
    ])
}

async fn list_handler(State(state): State<BackendState>) -> Json<Catalog> {
    Json(state.catalog.lock().await.clone())
}

async fn signup_handler(
    State(state): State<BackendState>,
    Path(activity): Path<String>,
    Query(query): Query<EmailQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    let mut catalog = state.catalog.lock().await;
    let mut activities: Vec<Activity> = catalog.clone().into_iter().collect();
    let Some(target) = activities.iter_mut().find(|a| a.name == activity) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::to_value(ErrorResponse::new("Activity not found")).unwrap()),
        );
    };
    if target.has_participant(&query.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::to_value(ErrorResponse::new("Already signed up")).unwrap()),
        );
    }
    target.details.participants.push(query.email.clone());
    *catalog = Catalog::new(activities);
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": format!("Signed up {} for {}", query.email, activity) })),
    )
}

async fn remove_handler(
    State(state): State<BackendState>,
    Path(activity): Path<String>,
    Query(query): Query<EmailQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    let mut catalog = state.catalog.lock().await;
    let mut activities: Vec<Activity> = catalog.clone().into_iter().collect();
    let Some(target) = activities.iter_mut().find(|a| a.name == activity) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "detail": "Activity not found" })),
        );
    };
    let before = target.details.participants.len();
    target.details.participants.retain(|p| p != &query.email);
    if target.details.participants.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "detail": "Participant not found" })),
        );
    }
    *catalog = Catalog::new(activities);
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": format!("Removed {} from {}", query.email, activity) })),
    )
}

async fn serve(app: Router) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

async fn spawn_backend() -> Result<(String, BackendState)> {
    let state = BackendState {
        catalog: Arc::new(Mutex::new(seeded_catalog())),
    };
    let app = Router::new()
        .route("/activities", get(list_handler))
        .route("/activities/:activity/signup", post(signup_handler))
        .route("/activities/:activity/participants", delete(remove_handler))
        .with_state(state.clone());
    Ok((serve(app).await?, state))
}

async fn spawn_broken_backend() -> Result<String> {
    let app = Router::new()
        .route("/activities", get(|| async { "definitely not json" }))
        .route(
            "/activities/:activity/signup",
            post(|| async { Json(serde_json::json!({ "status": "ok" })) }),
        )
        .route(
            "/activities/:activity/participants",
            delete(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
    serve(app).await
}

#[tokio::test]
async fn lists_activities_in_server_order() {
    let (server_url, _) = spawn_backend().await.expect("spawn backend");
    let client = HttpActivityClient::new(&server_url).expect("client");

    let catalog = client.list_activities().await.expect("catalog");
    let names: Vec<&str> = catalog.names().collect();
    assert_eq!(names, vec!["Chess Club", "Art Club"]);
    assert_eq!(catalog.get("Chess Club").expect("chess").spots_left(), 11);
}

#[tokio::test]
async fn sign_up_round_trips_encoded_name_and_email() {
    let (server_url, state) = spawn_backend().await.expect("spawn backend");
    let client = HttpActivityClient::new(&format!("{server_url}/")).expect("client");

    let outcome = client
        .sign_up("Chess Club", "new+kid@mergington.edu")
        .await
        .expect("sign up");
    assert_eq!(
        outcome,
        MutationOutcome::Accepted {
            message: "Signed up new+kid@mergington.edu for Chess Club".into()
        }
    );

    let catalog = state.catalog.lock().await;
    assert!(catalog
        .get("Chess Club")
        .expect("chess")
        .has_participant("new+kid@mergington.edu"));
}

#[tokio::test]
async fn duplicate_sign_up_is_rejected_with_detail() {
    let (server_url, _) = spawn_backend().await.expect("spawn backend");
    let client = HttpActivityClient::new(&server_url).expect("client");

    let outcome = client
        .sign_up("Chess Club", "michael@mergington.edu")
        .await
        .expect("sign up");
    let MutationOutcome::Rejected(err) = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(err.status, 400);
    assert_eq!(err.code, ErrorCode::BadRequest);
    assert_eq!(err.detail.as_deref(), Some("Already signed up"));
}

#[tokio::test]
async fn unknown_activity_is_not_found() {
    let (server_url, _) = spawn_backend().await.expect("spawn backend");
    let client = HttpActivityClient::new(&server_url).expect("client");

    let outcome = client
        .sign_up("Nonexistent", "foo@example.com")
        .await
        .expect("sign up");
    assert!(matches!(
        outcome,
        MutationOutcome::Rejected(ApiError { status: 404, .. })
    ));
}

#[tokio::test]
async fn removing_twice_reports_missing_participant() {
    let (server_url, state) = spawn_backend().await.expect("spawn backend");
    let client = HttpActivityClient::new(&server_url).expect("client");

    let first = client
        .remove_participant("Chess Club", "michael@mergington.edu")
        .await
        .expect("remove");
    assert!(first.is_accepted());
    assert!(!state
        .catalog
        .lock()
        .await
        .get("Chess Club")
        .expect("chess")
        .has_participant("michael@mergington.edu"));

    let second = client
        .remove_participant("Chess Club", "michael@mergington.edu")
        .await
        .expect("remove");
    let MutationOutcome::Rejected(err) = second else {
        panic!("expected rejection");
    };
    assert_eq!(err.detail_or("fallback"), "Participant not found");
}

#[tokio::test]
async fn malformed_list_body_is_a_protocol_error() {
    let server_url = spawn_broken_backend().await.expect("spawn backend");
    let client = HttpActivityClient::new(&server_url).expect("client");

    let err = client.list_activities().await.expect_err("should fail");
    assert!(err.is_protocol(), "unexpected error: {err}");
}

#[tokio::test]
async fn success_without_message_is_a_protocol_error() {
    let server_url = spawn_broken_backend().await.expect("spawn backend");
    let client = HttpActivityClient::new(&server_url).expect("client");

    let err = client
        .sign_up("Chess Club", "a@x.com")
        .await
        .expect_err("should fail");
    assert!(err.is_protocol());
    assert!(!err.is_transport());
}

#[tokio::test]
async fn error_status_with_plain_body_has_no_detail() {
    let server_url = spawn_broken_backend().await.expect("spawn backend");
    let client = HttpActivityClient::new(&server_url).expect("client");

    let outcome = client
        .remove_participant("Chess Club", "a@x.com")
        .await
        .expect("remove");
    let MutationOutcome::Rejected(err) = outcome else {
        panic!("expected rejection");
    };
    assert_eq!(err.status, 502);
    assert_eq!(err.detail, None);
}

#[tokio::test]
async fn list_error_status_is_reported() {
    let server_url = serve(Router::new()).await.expect("spawn backend");
    let client = HttpActivityClient::new(&server_url).expect("client");

    let err = client.list_activities().await.expect_err("should fail");
    assert!(matches!(
        err,
        ClientError::UnexpectedStatus { status: 404, .. }
    ));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = HttpActivityClient::with_timeout(&format!("http://{addr}"), Duration::from_secs(2))
        .expect("client");
    let err = client
        .sign_up("Chess Club", "a@x.com")
        .await
        .expect_err("should fail");
    assert!(err.is_transport(), "unexpected error: {err}");
}

#[test]
fn rejects_invalid_server_url() {
    assert!(matches!(
        HttpActivityClient::new("not a url"),
        Err(ClientError::InvalidServerUrl(_))
    ));
}
