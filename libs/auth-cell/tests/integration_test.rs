use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::router::auth_routes;
use shared_utils::test_utils::{MockBackendResponses, TestConfig, TestUser, TEST_TOKEN};

fn create_test_app(config: &TestConfig) -> Router {
    auth_routes(config.to_arc())
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_verify_endpoint_valid() {
    let server = MockServer::start().await;
    let user = TestUser::patient("p@clinica.com");

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/verificar-token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::verify_token_response(&user)))
        .mount(&server)
        .await;

    let app = create_test_app(&TestConfig::with_backend(&server.uri()));

    let request = Request::builder()
        .method("POST")
        .uri("/verify")
        .header("authorization", format!("Token {}", TEST_TOKEN))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json_response = body_json(response).await;
    assert_eq!(json_response["valid"], true);
    assert_eq!(json_response["user_id"], user.id);
    assert_eq!(json_response["role"], "paciente");
}

#[tokio::test]
async fn test_verify_endpoint_unauthorized() {
    let app = create_test_app(&TestConfig::default());

    let request = Request::builder()
        .method("POST")
        .uri("/verify")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json_response = body_json(response).await;
    assert_eq!(json_response["error"], "Missing authorization header");
}

#[tokio::test]
async fn test_verify_endpoint_forwards_tenant_from_host() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/verificar-token/"))
        .and(header("x-tenant-subdomain", "sonrisas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::verify_token_response(&TestUser::receptionist("r@clinica.com")),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_test_app(&TestConfig::with_backend(&server.uri()));

    let request = Request::builder()
        .method("POST")
        .uri("/verify")
        .header("host", "sonrisas.dentaabcxy.store")
        .header("authorization", format!("Token {}", TEST_TOKEN))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let json_response = body_json(response).await;

    assert_eq!(json_response["valid"], true);
    assert_eq!(json_response["role"], "recepcionista");
}

#[tokio::test]
async fn test_adopt_endpoint() {
    let app = create_test_app(&TestConfig::default());
    let user = TestUser::admin("admin@clinica.com");

    let request = Request::builder()
        .method("POST")
        .uri("/adopt")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "token": TEST_TOKEN,
                "user": MockBackendResponses::login_user(&user)
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json_response = body_json(response).await;
    assert_eq!(json_response["token"], TEST_TOKEN);
    assert_eq!(json_response["user"]["id"], user.id);
    assert_eq!(json_response["user"]["tipo_usuario"]["rol"], "Administrador");
    assert_eq!(json_response["role"]["role"], "administrador");
    assert_eq!(json_response["role"]["can_view_reports"], true);
    assert!(json_response["verified_at"].is_string());
}

#[tokio::test]
async fn test_restore_endpoint_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/verificar-token/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let app = create_test_app(&TestConfig::with_backend(&server.uri()));

    let request = Request::builder()
        .method("POST")
        .uri("/restore")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "token": "stale",
                "user": TestUser::patient("p@clinica.com").to_json()
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let app = create_test_app(&TestConfig::with_backend(&server.uri()));

    let request = Request::builder()
        .method("POST")
        .uri("/logout")
        .header("authorization", format!("Token {}", TEST_TOKEN))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json_response = body_json(response).await;
    assert_eq!(json_response["logged_out"], true);
    assert_eq!(json_response["backend_notified"], true);
}
