use crate::config::Config;
use crate::cpf::{clean_cpf, format_cpf, is_valid_cpf};
use crate::errors::AppError;
use crate::form::{CreditForm, SubmitOutcome};
use crate::models::{ConsultaResponse, CpfCheckResponse, CpfRequest};
use crate::pages::render_form_page;
use crate::presentation::build_cards;
use crate::services::CreditAnalysisService;
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse},
    Form, Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Validates, calls the webhook and adapts its answer.
    pub service: CreditAnalysisService,
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-analise-credito",
            "version": env!("CARGO_PKG_VERSION"),
            "variant": state.config.variant.to_string(),
        })),
    )
}

/// GET /
///
/// Empty form.
pub async fn form_page() -> Html<String> {
    Html(render_form_page(&CreditForm::new()))
}

/// POST /consulta
///
/// Form submission. Renders the same page with either the inline error or the result
/// cards. Each request gets its own form instance.
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    payload: Result<Form<CpfRequest>, FormRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Form(params) = payload?;
    let mut form = CreditForm::new();
    form.on_input(&params.cpf);

    let outcome = form.submit(&state.service).await;
    tracing::info!("POST /consulta - outcome: {:?}", outcome);

    let status = match outcome {
        SubmitOutcome::Loaded => StatusCode::OK,
        SubmitOutcome::Invalid => StatusCode::BAD_REQUEST,
        SubmitOutcome::Failed => StatusCode::BAD_GATEWAY,
        SubmitOutcome::Busy => StatusCode::CONFLICT,
    };

    Ok((status, Html(render_form_page(&form))))
}

/// POST /api/v1/consulta
///
/// JSON flavor of the form: returns the view-model and its cards.
///
/// # Returns
///
/// * `Result<Json<ConsultaResponse>, AppError>` - 400 for an invalid CPF (no webhook call),
///   502 when the webhook fails.
pub async fn consulta(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CpfRequest>, JsonRejection>,
) -> Result<Json<ConsultaResponse>, AppError> {
    tracing::info!("POST /api/v1/consulta");
    let Json(params) = payload?;

    let profile = state.service.analyze(&params.cpf).await?;
    let cards = build_cards(&profile);

    tracing::info!(
        "Credit analysis complete: aprovado={}, cards={}",
        profile.aprovado,
        cards.len()
    );

    Ok(Json(ConsultaResponse { profile, cards }))
}

/// POST /api/v1/cpf/validate
///
/// Local check only; never calls the webhook.
pub async fn validate_cpf(
    payload: Result<Json<CpfRequest>, JsonRejection>,
) -> Result<Json<CpfCheckResponse>, AppError> {
    let Json(params) = payload?;
    Ok(Json(CpfCheckResponse {
        cpf: clean_cpf(&params.cpf),
        formatted: format_cpf(&params.cpf),
        valid: is_valid_cpf(&params.cpf),
    }))
}
