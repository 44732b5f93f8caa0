use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Default endpoint answering with a flat credit profile.
pub const DIRECT_WEBHOOK_URL: &str =
    "https://marketinglead.app.n8n.cloud/webhook-test/analise-credito";
/// Default endpoint answering with the nested eligibility evaluation.
pub const ELIGIBILITY_WEBHOOK_URL: &str =
    "https://marketinglead.app.n8n.cloud/webhook/elegibilidade-credito";

/// Which webhook payload shape the service consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditVariant {
    /// The webhook returns the view-model directly.
    #[default]
    Direct,
    /// The webhook returns the nested eligibility payload, mapped locally.
    Eligibility,
}

impl CreditVariant {
    pub fn default_webhook_url(self) -> &'static str {
        match self {
            CreditVariant::Direct => DIRECT_WEBHOOK_URL,
            CreditVariant::Eligibility => ELIGIBILITY_WEBHOOK_URL,
        }
    }
}

impl FromStr for CreditVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" | "1" => Ok(CreditVariant::Direct),
            "eligibility" | "2" => Ok(CreditVariant::Eligibility),
            other => anyhow::bail!(
                "CREDIT_VARIANT must be 'direct' (1) or 'eligibility' (2), got '{}'",
                other
            ),
        }
    }
}

impl fmt::Display for CreditVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreditVariant::Direct => write!(f, "direct"),
            CreditVariant::Eligibility => write!(f, "eligibility"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub variant: CreditVariant,
    pub webhook_url: String,
    pub request_timeout_secs: Option<u64>,
    pub quod_offset_seed: Option<u64>,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    /// Defaults for a variant: port 3000, its fixed endpoint, no timeout, random offsets,
    /// 10 req/s with bursts of 20.
    pub fn for_variant(variant: CreditVariant) -> Self {
        Self {
            port: 3000,
            variant,
            webhook_url: variant.default_webhook_url().to_string(),
            request_timeout_secs: None,
            quod_offset_seed: None,
            rate_limit_per_second: 10,
            rate_limit_burst: 20,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let variant = match std::env::var("CREDIT_VARIANT") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => CreditVariant::default(),
        };

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            variant,
            webhook_url: match std::env::var("CREDIT_WEBHOOK_URL") {
                Ok(url) if !url.trim().is_empty() => validate_webhook_url(url.trim())?,
                _ => variant.default_webhook_url().to_string(),
            },
            request_timeout_secs: std::env::var("CREDIT_REQUEST_TIMEOUT_SECS")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|s| {
                    s.trim().parse::<u64>().map_err(|_| {
                        anyhow::anyhow!("CREDIT_REQUEST_TIMEOUT_SECS must be a whole number")
                    })
                })
                .transpose()?,
            quod_offset_seed: std::env::var("QUOD_OFFSET_SEED")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|s| {
                    s.trim()
                        .parse::<u64>()
                        .map_err(|_| anyhow::anyhow!("QUOD_OFFSET_SEED must be a u64"))
                })
                .transpose()?,
            rate_limit_per_second: std::env::var("RATE_LIMIT_PER_SECOND")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow::anyhow!("RATE_LIMIT_PER_SECOND must be a positive number"))?,
            rate_limit_burst: std::env::var("RATE_LIMIT_BURST")
                .unwrap_or_else(|_| "20".to_string())
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow::anyhow!("RATE_LIMIT_BURST must be a positive number"))?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Credit variant: {}", config.variant);
        tracing::debug!("Webhook URL: {}", config.webhook_url);
        if let Some(timeout) = config.request_timeout_secs {
            tracing::debug!("Webhook timeout: {}s", timeout);
        }
        if config.quod_offset_seed.is_some() {
            tracing::info!("Quod score offsets are seeded (reproducible)");
        }
        tracing::debug!(
            "Rate limit: {} req/s per IP, burst {}",
            config.rate_limit_per_second,
            config.rate_limit_burst
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

/// Accepts only absolute http(s) URLs.
pub fn validate_webhook_url(raw: &str) -> anyhow::Result<String> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| anyhow::anyhow!("CREDIT_WEBHOOK_URL is not a valid URL: {}", e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("CREDIT_WEBHOOK_URL must start with http:// or https://");
    }
    Ok(raw.to_string())
}
