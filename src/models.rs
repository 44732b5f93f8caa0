use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ============ View-model ============

/// Flattened credit profile consumed by the presentation layer.
///
/// Variant 1 webhooks return this shape directly; variant 2 responses are mapped into
/// it by [`crate::mapper`]. Field names follow the Portuguese keys of the webhook
/// payload. Every top-level key the view-model does not know about lands in `extras`,
/// in the order it appeared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditProfile {
    /// Full name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    /// CPF digits as returned by the service (formatted for display later).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    /// Main credit score (0-1000).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    /// Whether credit was approved.
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub aprovado: bool,
    /// Main reasons behind the decision.
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub motivos_top: Vec<String>,
    /// Identified risks.
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub riscos: Vec<String>,
    /// Recommendations for the applicant.
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub recomendacoes: Vec<String>,
    /// Free-text explanation of the decision.
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub explicabilidade: String,
    /// Registry / tax status (e.g. "REGULAR").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub situacao: Option<String>,
    /// Monthly income in BRL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renda: Option<f64>,
    /// Age in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idade: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endereco: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profissao: Option<String>,
    /// Credit restrictions. `Some(vec![])` means "checked, none found".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricoes: Option<Vec<String>>,
    /// Secondary ("quod") score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_quod: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historico_credito: Option<CreditHistory>,

    // Filled by the eligibility mapper only
    /// Birth date as received from the registry lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_nascimento: Option<String>,
    /// Reasons the eligibility evaluation gave for a denial.
    #[serde(
        default,
        deserialize_with = "crate::models::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub motivos_negacao: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elegibilidade: Option<EligibilitySummary>,

    /// Unrecognized top-level keys, insertion order preserved.
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

/// Postal address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logradouro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.logradouro.is_none() && self.cidade.is_none() && self.uf.is_none() && self.cep.is_none()
    }
}

/// Credit history summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditHistory {
    /// Payment punctuality (e.g. "Excelente").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pontualidade: Option<String>,
    /// Banking relationship description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relacionamento_bancario: Option<String>,
    /// Number of recent credit inquiries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultas_recentes: Option<u32>,
}

/// Rule thresholds and outcomes of an eligibility evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilitySummary {
    pub elegivel: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idade_minima: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idade_maxima: Option<u32>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub exige_cadastro_rural: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadastro_rural_encontrado: Option<bool>,
}

/// Reads an explicit `null` the same way as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ============ API Request/Response Models ============

/// Body of `POST /api/v1/consulta` and `POST /api/v1/cpf/validate`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CpfRequest {
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub cpf: String,
}

/// Body posted to the scoring webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookRequest {
    /// 11 digits, no punctuation.
    pub cpf: String,
}

/// Response of `POST /api/v1/cpf/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpfCheckResponse {
    pub cpf: String,
    pub formatted: String,
    pub valid: bool,
}

/// Response of `POST /api/v1/consulta`.
#[derive(Debug, Clone, Serialize)]
pub struct ConsultaResponse {
    pub profile: CreditProfile,
    pub cards: Vec<crate::presentation::Card>,
}
