use serde::{Deserialize, Serialize};

/// Nested payload returned by the eligibility webhook (variant 2).
///
/// Every level is optional: the service omits whole sections when a lookup fails, and
/// the mapper treats absent data as "not informed" rather than as an error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalEligibilityResponse {
    /// Registry lookup section.
    #[serde(default)]
    pub consulta: Option<RegistryLookup>,

    /// Eligibility evaluation section.
    #[serde(default)]
    pub avaliacao: Option<EligibilityEvaluation>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryLookup {
    #[serde(default)]
    pub pessoa: Option<RegistryPerson>,

    /// Tax status at the federal revenue service (e.g. "REGULAR", "SUSPENSA").
    #[serde(default)]
    pub situacao_cadastral: Option<String>,

    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub telefones: Vec<RegistryPhone>,

    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub emails: Vec<RegistryEmail>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryPerson {
    pub nome: Option<String>,
    pub cpf: Option<String>,
    /// `YYYY-MM-DD` or `DD/MM/YYYY`.
    pub data_nascimento: Option<String>,
    pub idade: Option<u32>,
    /// Present in the death registry.
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub obito: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryPhone {
    pub numero: Option<String>,
    pub tipo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEmail {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityEvaluation {
    #[serde(default)]
    pub regras: Option<EligibilityRules>,

    #[serde(default)]
    pub resultado: Option<RuleOutcomes>,

    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub elegivel: bool,

    /// Reasons given by the evaluation, shown verbatim.
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub motivos: Vec<String>,
}

/// Thresholds the evaluation applied.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRules {
    pub idade_minima: Option<u32>,
    pub idade_maxima: Option<u32>,
    /// Applicant must hold a rural producer registration (CAF).
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub exige_cadastro_rural: bool,
}

/// Per-rule outcomes.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOutcomes {
    pub idade_dentro_da_faixa: Option<bool>,
    pub cadastro_rural_encontrado: Option<bool>,
    pub situacao_regular: Option<bool>,
}
