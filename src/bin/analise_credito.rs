//! Command-line credit analysis: validates a CPF, calls the configured webhook once and
//! prints the result cards.

use clap::Parser;
use rust_analise_credito::api::pages::render_cards_text;
use rust_analise_credito::config::{validate_webhook_url, Config, CreditVariant};
use rust_analise_credito::core::form::{CreditForm, SubmitOutcome};
use rust_analise_credito::core::presentation::build_cards;
use rust_analise_credito::integrations::services::CreditAnalysisService;

#[derive(Parser, Debug)]
#[command(
    name = "analise-credito",
    about = "Consulta a análise de crédito de um CPF",
    version
)]
struct Cli {
    /// CPF, with or without punctuation
    cpf: String,
    /// Webhook payload shape (direct | eligibility). Defaults to CREDIT_VARIANT
    #[arg(long)]
    variant: Option<CreditVariant>,
    /// Override the webhook URL
    #[arg(long)]
    webhook_url: Option<String>,
    /// Print the view-model as JSON instead of cards
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_analise_credito=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(variant) = cli.variant {
        if variant != config.variant {
            config.webhook_url = variant.default_webhook_url().to_string();
        }
        config.variant = variant;
    }
    if let Some(url) = cli.webhook_url.as_deref() {
        config.webhook_url = validate_webhook_url(url)?;
    }

    let service = CreditAnalysisService::from_config(&config)?;

    let mut form = CreditForm::new();
    form.on_input(&cli.cpf);

    eprintln!("Consultando dados financeiros...");
    let outcome = tokio::select! {
        outcome = form.submit(&service) => Some(outcome),
        _ = tokio::signal::ctrl_c() => None,
    };
    match outcome {
        Some(SubmitOutcome::Loaded) => {}
        Some(_) => {
            let message = form.error().unwrap_or("Erro ao consultar os dados.");
            anyhow::bail!("{}", message);
        }
        None => {
            form.cancel();
            anyhow::bail!("Consulta cancelada");
        }
    }

    if let Some(profile) = form.data() {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(profile)?);
        } else {
            print!("{}", render_cards_text(&build_cards(profile)));
        }
    }

    Ok(())
}
