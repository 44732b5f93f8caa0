use crate::config::{Config, CreditVariant};
use crate::cpf::{clean_cpf, is_valid_cpf};
use crate::eligibility_models::ExternalEligibilityResponse;
use crate::errors::{AppError, ResultExt};
use crate::mapper::{EligibilityMapper, RandomOffset, ScoreOffset, SeededOffset};
use crate::models::CreditProfile;
use crate::webhook_client::CreditWebhookClient;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Turns a webhook body into the shared view-model.
#[derive(Debug, Clone)]
pub enum ProfileAdapter {
    /// Body already is a [`CreditProfile`].
    Direct,
    /// Body is an [`ExternalEligibilityResponse`] that goes through the mapper.
    Eligibility(EligibilityMapper),
}

impl ProfileAdapter {
    pub fn for_variant(variant: CreditVariant, offset: Arc<dyn ScoreOffset>) -> Self {
        match variant {
            CreditVariant::Direct => ProfileAdapter::Direct,
            CreditVariant::Eligibility => ProfileAdapter::Eligibility(EligibilityMapper::new(offset)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProfileAdapter::Direct => "direct",
            ProfileAdapter::Eligibility(_) => "eligibility",
        }
    }

    pub fn adapt(&self, body: Value) -> Result<CreditProfile, AppError> {
        match self {
            ProfileAdapter::Direct => serde_json::from_value(body).map_err(|e| {
                tracing::warn!("Webhook body is not a credit profile: {}", e);
                AppError::from(e)
            }),
            ProfileAdapter::Eligibility(mapper) => {
                let response: ExternalEligibilityResponse =
                    serde_json::from_value(body).map_err(|e| {
                        tracing::warn!("Webhook body is not an eligibility response: {}", e);
                        AppError::from(e)
                    })?;
                Ok(mapper.map(&response))
            }
        }
    }
}

/// Validates the CPF, calls the webhook once, and adapts the answer.
#[derive(Debug, Clone)]
pub struct CreditAnalysisService {
    client: CreditWebhookClient,
    adapter: ProfileAdapter,
}

impl CreditAnalysisService {
    pub fn new(client: CreditWebhookClient, adapter: ProfileAdapter) -> Self {
        Self { client, adapter }
    }

    /// Builds the client and the adapter the configuration selects.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = CreditWebhookClient::new(
            config.webhook_url.clone(),
            config.request_timeout_secs.map(Duration::from_secs),
        )?;

        let offset: Arc<dyn ScoreOffset> = match config.quod_offset_seed {
            Some(seed) => Arc::new(SeededOffset::new(seed)),
            None => Arc::new(RandomOffset),
        };

        Ok(Self::new(
            client,
            ProfileAdapter::for_variant(config.variant, offset),
        ))
    }

    /// Full analysis for raw user input.
    ///
    /// Returns `AppError::InvalidCpf` without touching the network when the input does
    /// not hold a valid CPF.
    pub async fn analyze(&self, raw_cpf: &str) -> Result<CreditProfile, AppError> {
        if !is_valid_cpf(raw_cpf) {
            tracing::debug!("CPF failed validation, skipping webhook");
            return Err(AppError::InvalidCpf(raw_cpf.to_string()));
        }

        let digits = clean_cpf(raw_cpf);
        let body = self
            .client
            .analyze(&digits)
            .await
            .context("Credit webhook call failed")?;
        self.adapter
            .adapt(body)
            .with_context(|| {
                format!(
                    "Webhook body rejected by the {} adapter",
                    self.adapter.name()
                )
            })
    }
}
