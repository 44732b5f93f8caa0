/// Router tests: requests go through the full axum stack against a mocked webhook
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use rust_analise_credito::config::{Config, CreditVariant};
use rust_analise_credito::errors::{INVALID_CPF_MESSAGE, REQUEST_FAILED_MESSAGE};
use rust_analise_credito::handlers::AppState;
use rust_analise_credito::routes::build_router;
use rust_analise_credito::services::CreditAnalysisService;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(mock_uri: &str) -> axum::Router {
    let mut config = Config::for_variant(CreditVariant::Direct);
    config.webhook_url = format!("{}/webhook", mock_uri);
    let service = CreditAnalysisService::from_config(&config).unwrap();

    build_router(Arc::new(AppState { config, service }), None).unwrap()
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn form_post(cpf: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/consulta")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("cpf={}", cpf)))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn mount_profile(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nome": "Maria Souza",
            "score": 650,
            "aprovado": true,
            "motivos_top": ["Renda compatível"],
            "restricoes": []
        })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_health() {
    let mock_server = MockServer::start().await;
    let response = app(&mock_server.uri())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["variant"], "direct");
}

#[tokio::test]
async fn test_form_page_renders_empty_form() {
    let mock_server = MockServer::start().await;
    let response = app(&mock_server.uri())
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("action=\"/consulta\""));
    assert!(html.contains("Consultar Crédito"));
    assert!(!html.contains("class=\"error\""));
}

#[tokio::test]
async fn test_consulta_invalid_cpf_is_rejected_locally() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let response = app(&mock_server.uri())
        .oneshot(json_post("/api/v1/consulta", json!({"cpf": "123.456.789-00"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"], INVALID_CPF_MESSAGE);
}

#[tokio::test]
async fn test_consulta_returns_profile_and_cards() {
    let mock_server = MockServer::start().await;
    mount_profile(&mock_server).await;

    let response = app(&mock_server.uri())
        .oneshot(json_post("/api/v1/consulta", json!({"cpf": "111.444.777-35"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["profile"]["nome"], "Maria Souza");
    assert_eq!(body["profile"]["score"], 650);

    let kinds: Vec<&str> = body["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["header", "score", "personal_info", "reasons", "restrictions"]);
}

#[tokio::test]
async fn test_consulta_webhook_failure_is_bad_gateway() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let response = app(&mock_server.uri())
        .oneshot(json_post("/api/v1/consulta", json!({"cpf": "11144477735"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"], REQUEST_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_cpf_validate_endpoint() {
    let mock_server = MockServer::start().await;
    let response = app(&mock_server.uri())
        .oneshot(json_post("/api/v1/cpf/validate", json!({"cpf": "52998224725"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["cpf"], "52998224725");
    assert_eq!(body["formatted"], "529.982.247-25");
    assert_eq!(body["valid"], true);
}

#[tokio::test]
async fn test_form_submission_renders_cards() {
    let mock_server = MockServer::start().await;
    mount_profile(&mock_server).await;

    let response = app(&mock_server.uri())
        .oneshot(form_post("111.444.777-35"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Dados de Maria Souza"));
    assert!(html.contains("Nenhuma restrição encontrada"));
    assert!(html.contains("value=\"111.444.777-35\""));
}

#[tokio::test]
async fn test_form_submission_shows_inline_error() {
    let mock_server = MockServer::start().await;
    let response = app(&mock_server.uri())
        .oneshot(form_post("12345"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_string(response).await;
    assert!(html.contains(INVALID_CPF_MESSAGE));
    assert!(!html.contains("Análise Concluída"));
}

#[tokio::test]
async fn test_malformed_json_gets_error_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/consulta")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"cpf\": "))
        .unwrap();
    let response = app(&mock_server.uri()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"], INVALID_CPF_MESSAGE);
}

#[tokio::test]
async fn test_validate_without_json_content_type_is_bad_request() {
    let mock_server = MockServer::start().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/cpf/validate")
        .body(Body::from(r#"{"cpf": "52998224725"}"#))
        .unwrap();
    let response = app(&mock_server.uri()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"], INVALID_CPF_MESSAGE);
}

#[tokio::test]
async fn test_form_route_rejects_non_form_body() {
    let mock_server = MockServer::start().await;
    let response = app(&mock_server.uri())
        .oneshot(json_post("/consulta", json!({"cpf": "11144477735"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"], INVALID_CPF_MESSAGE);
}
