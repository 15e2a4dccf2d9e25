//! End-to-end tests of the console router against a recording backend

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use toolrent_console::{
    api,
    auth::{SessionResolver, TokenRefresher, TokenSet},
    gateway::{ApiRequest, ApiResponse, Transport},
    AppConfig, AppError, AppResult, AppState,
};

const SECRET: &[u8] = b"console-test-secret";

/// Backend double answering every call with one canned body
struct RecordingBackend {
    body: &'static str,
    calls: Mutex<Vec<ApiRequest>>,
}

impl RecordingBackend {
    fn new(body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            body,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingBackend {
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        self.calls.lock().unwrap().push(request);
        Ok(ApiResponse::new(StatusCode::OK, self.body))
    }
}

struct NoRefresh;

#[async_trait]
impl TokenRefresher for NoRefresh {
    async fn refresh(&self, _refresh_token: &str) -> AppResult<TokenSet> {
        Err(AppError::Authentication("refresh not expected".to_string()))
    }
}

fn app(backend: Arc<RecordingBackend>, sessions: SessionResolver) -> Router {
    api::router(AppState {
        config: Arc::new(AppConfig::default()),
        sessions: Arc::new(sessions),
        transport: backend,
        refresher: Arc::new(NoRefresh),
    })
}

fn ready_app(backend: Arc<RecordingBackend>) -> Router {
    app(backend, SessionResolver::with_shared_secret("toolrent-client", SECRET))
}

fn token(realm_roles: &[&str]) -> String {
    let claims = json!({
        "sub": "0c5e",
        "preferred_username": "ana",
        "exp": (Utc::now() + Duration::minutes(10)).timestamp(),
        "realm_access": { "roles": realm_roles },
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn user_is_forbidden_on_tariffs() {
    let backend = RecordingBackend::new("{}");
    let user = token(&["USER"]);

    let (status, body) = send(
        ready_app(backend.clone()),
        request(Method::GET, "/console/tariffs", Some(&user), None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["required_roles"], json!(["ADMIN"]));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn anonymous_caller_is_sent_home() {
    let backend = RecordingBackend::new("[]");

    let (status, body) = send(
        ready_app(backend.clone()),
        request(Method::GET, "/console/tools", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["redirect"], "/");
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn pages_wait_for_the_realm_key() {
    let backend = RecordingBackend::new("[]");
    let app = app(backend, SessionResolver::pending("toolrent-client"));

    let (status, _) = send(app.clone(), request(Method::GET, "/console/tools", None, None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = send(app, request(Method::GET, "/ready", None, None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "initializing");
}

#[tokio::test]
async fn empty_inventory_shows_empty_state() {
    let backend = RecordingBackend::new("[]");
    let user = token(&["USER"]);

    let (status, body) = send(
        ready_app(backend.clone()),
        request(Method::GET, "/console/tools", Some(&user), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inventory"]["state"], "empty");
    assert_eq!(body["inventory"]["empty_message"], "No tools registered.");
    assert_eq!(body["actions"]["can_add"], true);
    assert_eq!(body["actions"]["can_edit"], false);

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/tools");
    assert_eq!(calls[0].bearer.as_deref(), Some(user.as_str()));
}

#[tokio::test]
async fn registering_a_tool_posts_once_and_redirects() {
    let backend = RecordingBackend::new("");
    let user = token(&["USER"]);
    let form = json!({
        "name": "Rotary hammer",
        "category": "Power tools",
        "stock": 3,
        "replacementValue": 85000
    });

    let (status, body) = send(
        ready_app(backend.clone()),
        request(Method::POST, "/console/tools", Some(&user), Some(form)),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["redirect"], "/tools");

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::POST);
    assert_eq!(calls[0].path, "/tools");
    assert_eq!(calls[0].body.as_ref().unwrap()["name"], "Rotary hammer");
}

#[tokio::test]
async fn invalid_tool_form_never_reaches_backend() {
    let backend = RecordingBackend::new("");
    let user = token(&["USER"]);
    let form = json!({ "name": "", "category": "Power tools", "stock": 3 });

    let (status, body) = send(
        ready_app(backend.clone()),
        request(Method::POST, "/console/tools", Some(&user), Some(form)),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["field_errors"].get("name").is_some());
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn kardex_date_search_spans_whole_days() {
    let backend = RecordingBackend::new("[]");
    let user = token(&["USER"]);

    let (status, _) = send(
        ready_app(backend.clone()),
        request(
            Method::GET,
            "/console/kardex?start=2024-03-01&end=2024-03-31",
            Some(&user),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].path,
        "/kardex/date?start=2024-03-01T00:00:00&end=2024-03-31T23:59:59"
    );
}

#[tokio::test]
async fn session_endpoint_lists_admin_navigation() {
    let backend = RecordingBackend::new("[]");
    let admin = token(&["ADMIN"]);

    let (status, body) = send(
        ready_app(backend),
        request(Method::GET, "/console/session", Some(&admin), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "resolved");
    assert_eq!(body["session"]["username"], "ana");
    assert_eq!(body["session"]["is_admin"], true);
    let paths: Vec<&str> = body["navigation"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|link| link["path"].as_str())
        .collect();
    assert!(paths.contains(&"/tariffs"));
}

#[tokio::test]
async fn route_check_reports_required_roles() {
    let backend = RecordingBackend::new("[]");
    let user = token(&["USER"]);

    let (status, body) = send(
        ready_app(backend),
        request(Method::GET, "/console/routes?path=/clients", Some(&user), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "forbidden");
    assert_eq!(body["required_roles"], json!(["ADMIN"]));
}

#[tokio::test]
async fn keystroke_validation_reports_fields_in_form_order() {
    let backend = RecordingBackend::new("[]");
    let admin = token(&["ADMIN"]);
    let payload = json!({
        "form": "client",
        "values": { "name": "Al", "rut": "12345678-9", "phone": "912345678", "email": "al@toolrent.cl" }
    });

    let (status, body) = send(
        ready_app(backend.clone()),
        request(Method::POST, "/console/forms/validate", Some(&admin), Some(payload)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["submit_enabled"], false);
    let fields: Vec<&String> = body["errors"].as_object().unwrap().keys().collect();
    assert_eq!(fields, vec!["name", "rut"]);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn user_cannot_restrict_clients() {
    let backend = RecordingBackend::new("[]");
    let user = token(&["USER"]);

    let (status, body) = send(
        ready_app(backend.clone()),
        request(
            Method::POST,
            "/console/clients/3/restrict",
            Some(&user),
            Some(json!({ "confirmed": true })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["required_roles"], json!(["ADMIN"]));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn loan_validation_checks_the_picker_data_it_is_sent() {
    let backend = RecordingBackend::new("[]");
    let user = token(&["USER"]);
    let payload = json!({
        "form": "loan",
        "values": { "clientId": 2, "toolId": 10, "startDate": "2024-03-10", "dueDate": "2024-03-15" },
        "clients": [{
            "id": 2, "rut": "12.345.678-9", "name": "Rosa", "phone": "912345678",
            "email": "rosa@toolrent.cl", "status": "RESTRICTED"
        }],
        "tools": [{
            "id": 10, "name": "Drill", "category": "Power", "status": "AVAILABLE",
            "stock": 1, "replacementValue": 1500
        }]
    });

    let (status, body) = send(
        ready_app(backend.clone()),
        request(Method::POST, "/console/forms/validate", Some(&user), Some(payload)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["submit_enabled"], false);
    assert_eq!(body["errors"]["clientId"], "Client is restricted and cannot take loans");
    assert!(body["errors"].get("toolId").is_none());
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn return_validation_needs_no_backend_call() {
    let backend = RecordingBackend::new("{}");
    let user = token(&["USER"]);
    let payload = json!({
        "form": "return",
        "values": { "returnDate": "2024-03-09", "damaged": false, "irreparable": false },
        "loan_start": "2024-03-10"
    });

    let (status, body) = send(
        ready_app(backend.clone()),
        request(Method::POST, "/console/forms/validate", Some(&user), Some(payload)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["errors"].get("returnDate").is_some());
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn form_validation_requires_a_permitted_session() {
    let backend = RecordingBackend::new("[]");
    let payload = json!({ "form": "tariff", "values": {} });

    let (status, _) = send(
        ready_app(backend.clone()),
        request(Method::POST, "/console/forms/validate", None, Some(payload.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let user = token(&["USER"]);
    let (status, body) = send(
        ready_app(backend.clone()),
        request(Method::POST, "/console/forms/validate", Some(&user), Some(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["required_roles"], json!(["ADMIN"]));
    assert!(backend.calls().is_empty());
}
