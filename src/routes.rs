use crate::handlers::{self, AppState};
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Largest accepted submission body.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Per-IP limits for the submission routes.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst_size: u32,
}

/// Serves the OpenAPI specification YAML file.
///
/// Reads `openapi.yml` from the working directory; 404 if it is missing.
async fn serve_openapi_spec() -> impl IntoResponse {
    match tokio::fs::read_to_string("openapi.yml").await {
        Ok(content) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/yaml")],
            content,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "OpenAPI spec not found").into_response(),
    }
}

/// Serves the Swagger UI HTML page pointing at `serve_openapi_spec`.
async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Análise de Crédito - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api-docs/openapi.yml",
                dom_id: '#swagger-ui',
                deepLinking: true
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}

/// Builds the application router.
///
/// Submission routes get a body size limit and, when `rate_limit` is set, per-IP rate
/// limiting. Health, the empty form and the docs bypass both.
pub fn build_router(
    state: Arc<AppState>,
    rate_limit: Option<RateLimit>,
) -> anyhow::Result<Router> {
    let submissions = Router::new()
        .route("/consulta", post(handlers::submit_form))
        .route("/api/v1/consulta", post(handlers::consulta))
        .route("/api/v1/cpf/validate", post(handlers::validate_cpf));

    let submissions = match rate_limit {
        Some(limit) => {
            let governor_conf = Arc::new(
                GovernorConfigBuilder::default()
                    .per_second(limit.per_second)
                    .burst_size(limit.burst_size)
                    .key_extractor(SmartIpKeyExtractor)
                    .finish()
                    .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?,
            );
            submissions.layer(
                ServiceBuilder::new()
                    // Submissions are a CPF and nothing else
                    .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                    // Every accepted submission costs one webhook call
                    .layer(GovernorLayer {
                        config: governor_conf,
                    }),
            )
        }
        None => submissions.layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
    };

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::form_page))
        .route("/docs", get(serve_swagger_ui))
        .route("/api-docs/openapi.yml", get(serve_openapi_spec))
        .merge(submissions)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Ok(app)
}
