use crate::errors::AppError;
use crate::models::WebhookRequest;
use serde_json::Value;
use std::time::Duration;

/// Client for the credit analysis webhook.
///
/// One `POST` per submission, no retries. The endpoint answers with the profile JSON
/// (variant 1) or the nested eligibility payload (variant 2); this client returns the
/// raw body and leaves the interpretation to the configured adapter.
#[derive(Debug, Clone)]
pub struct CreditWebhookClient {
    client: reqwest::Client,
    url: String,
}

impl CreditWebhookClient {
    /// Creates a new `CreditWebhookClient`.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL of the webhook.
    /// * `timeout` - Optional request timeout. `None` waits until the call settles.
    pub fn new(url: String, timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            AppError::InternalError(format!("Failed to create webhook client: {}", e))
        })?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts `{"cpf": "<digits>"}` and returns the parsed JSON body.
    ///
    /// # Arguments
    ///
    /// * `cpf_digits` - The CPF with punctuation already removed.
    ///
    /// # Returns
    ///
    /// * `Result<Value, AppError>` - The response body, or `ExternalApiError` for
    ///   transport failures, non-2xx statuses and unparseable bodies.
    pub async fn analyze(&self, cpf_digits: &str) -> Result<Value, AppError> {
        tracing::info!("Requesting credit analysis from {}", self.url);

        let body = WebhookRequest {
            cpf: cpf_digits.to_string(),
        };

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Webhook returned {}: {}",
                status, error_text
            )));
        }

        let data = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse webhook response: {}", e))
        })?;

        tracing::info!("✓ Credit analysis received");
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = CreditWebhookClient::new("https://example.com/webhook".to_string(), None);
        assert!(client.is_ok());

        let client = CreditWebhookClient::new(
            "https://example.com/webhook".to_string(),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(client.url(), "https://example.com/webhook");
    }
}
