/// Maps the nested eligibility payload (variant 2) into the flat [`CreditProfile`].
///
/// The eligibility service only answers "eligible or not" plus the rules it applied;
/// everything the cards need beyond that (score, risks, recommendations, explanation)
/// is derived here:
///
/// 1. Copy identity fields from the registry lookup
/// 2. Derive the score (750 eligible / 400 not, +100 for age 25-35, +50 for REGULAR)
/// 3. Add the quod offset from the injected [`ScoreOffset`]
/// 4. Derive recommendations and risks from the rule outcomes
/// 5. Build the explanation text
use crate::eligibility_models::{
    EligibilityEvaluation, EligibilityRules, ExternalEligibilityResponse, RegistryPerson,
};
use crate::models::{CreditProfile, EligibilitySummary};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

pub const SCORE_ELIGIBLE: u32 = 750;
pub const SCORE_INELIGIBLE: u32 = 400;
pub const AGE_BONUS: u32 = 100;
pub const AGE_BONUS_RANGE: std::ops::RangeInclusive<u32> = 25..=35;
pub const REGULAR_BONUS: u32 = 50;
/// Quod offsets are drawn from `0..QUOD_OFFSET_BOUND`.
pub const QUOD_OFFSET_BOUND: u32 = 100;

const REGULAR_STATUS: &str = "REGULAR";

pub const RECOMMENDATION_KEEP_DATA: &str = "Mantenha seus dados cadastrais atualizados.";
pub const RECOMMENDATION_ENJOY_CONDITIONS: &str =
    "Aproveite as condições de crédito disponíveis para o seu perfil.";
pub const RECOMMENDATION_RURAL_REGISTRATION: &str =
    "Providencie a inscrição no Cadastro Nacional da Agricultura Familiar (CAF) para se tornar elegível.";
pub const RISK_DECEASED: &str = "CPF consta no registro de óbitos";

/// Source of the offset added to the score to obtain the quod score.
pub trait ScoreOffset: Send + Sync {
    /// Next offset, always in `0..QUOD_OFFSET_BOUND`.
    fn next_offset(&self) -> u32;
}

/// Fresh randomness on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomOffset;

impl ScoreOffset for RandomOffset {
    fn next_offset(&self) -> u32 {
        rand::thread_rng().gen_range(0..QUOD_OFFSET_BOUND)
    }
}

/// Reproducible sequence of offsets from a seed.
#[derive(Debug)]
pub struct SeededOffset {
    rng: Mutex<StdRng>,
}

impl SeededOffset {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ScoreOffset for SeededOffset {
    fn next_offset(&self) -> u32 {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..QUOD_OFFSET_BOUND),
            // A poisoned lock only means another caller panicked mid-draw
            Err(poisoned) => poisoned.into_inner().gen_range(0..QUOD_OFFSET_BOUND),
        }
    }
}

/// Always the same offset (wrapped into range).
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedOffset(pub u32);

impl ScoreOffset for FixedOffset {
    fn next_offset(&self) -> u32 {
        self.0 % QUOD_OFFSET_BOUND
    }
}

/// Adapter from [`ExternalEligibilityResponse`] to [`CreditProfile`].
#[derive(Clone)]
pub struct EligibilityMapper {
    offset: Arc<dyn ScoreOffset>,
    reference_date: Option<NaiveDate>,
}

impl std::fmt::Debug for EligibilityMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EligibilityMapper")
            .field("reference_date", &self.reference_date)
            .finish_non_exhaustive()
    }
}

impl EligibilityMapper {
    pub fn new(offset: Arc<dyn ScoreOffset>) -> Self {
        Self {
            offset,
            reference_date: None,
        }
    }

    /// Pin the date used to compute ages from birth dates. Defaults to today.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Build the view-model. Never fails: absent sections yield absent fields.
    pub fn map(&self, response: &ExternalEligibilityResponse) -> CreditProfile {
        let default_person = RegistryPerson::default();
        let default_evaluation = EligibilityEvaluation::default();
        let default_rules = EligibilityRules::default();

        let consulta = response.consulta.as_ref();
        let pessoa = consulta
            .and_then(|c| c.pessoa.as_ref())
            .unwrap_or(&default_person);
        let avaliacao = response.avaliacao.as_ref().unwrap_or(&default_evaluation);
        let regras = avaliacao.regras.as_ref().unwrap_or(&default_rules);
        let resultado = avaliacao.resultado.as_ref();

        let situacao = consulta.and_then(|c| c.situacao_cadastral.clone());
        let idade = pessoa.idade.or_else(|| {
            pessoa
                .data_nascimento
                .as_deref()
                .and_then(|raw| age_from_birth_date(raw, self.today()))
        });
        let elegivel = avaliacao.elegivel;
        let cadastro_rural_encontrado = resultado.and_then(|r| r.cadastro_rural_encontrado);
        let age_out_of_range = match idade {
            Some(age) if regras.idade_minima.is_some() || regras.idade_maxima.is_some() => {
                !age_within(age, regras)
            }
            _ => resultado.and_then(|r| r.idade_dentro_da_faixa) == Some(false),
        };

        let score = base_score(elegivel, idade, situacao.as_deref());
        let score_quod = score + self.offset.next_offset();

        let recomendacoes = if elegivel {
            vec![
                RECOMMENDATION_KEEP_DATA.to_string(),
                RECOMMENDATION_ENJOY_CONDITIONS.to_string(),
            ]
        } else {
            ineligible_recommendations(idade, regras, cadastro_rural_encontrado)
        };

        let mut riscos = Vec::new();
        if pessoa.obito {
            riscos.push(RISK_DECEASED.to_string());
        }
        if let Some(status) = situacao.as_deref().filter(|s| *s != REGULAR_STATUS) {
            riscos.push(format!(
                "Situação cadastral irregular na Receita Federal: {}",
                status
            ));
        }
        if age_out_of_range {
            riscos.push(age_range_risk(regras));
        }

        let explicabilidade = build_explanation(
            idade,
            situacao.as_deref(),
            cadastro_rural_encontrado.unwrap_or(false),
            elegivel,
        );

        tracing::debug!(
            "Mapped eligibility response: elegivel={}, idade={:?}, score={}, riscos={}",
            elegivel,
            idade,
            score,
            riscos.len()
        );

        CreditProfile {
            nome: pessoa.nome.clone(),
            cpf: pessoa.cpf.clone(),
            score: Some(score),
            aprovado: elegivel,
            motivos_top: avaliacao.motivos.clone(),
            riscos,
            recomendacoes,
            explicabilidade,
            situacao,
            idade,
            telefone: consulta
                .and_then(|c| c.telefones.iter().find_map(|t| t.numero.clone())),
            email: consulta.and_then(|c| c.emails.iter().find_map(|e| e.email.clone())),
            score_quod: Some(score_quod),
            data_nascimento: pessoa.data_nascimento.clone(),
            motivos_negacao: avaliacao.motivos.clone(),
            elegibilidade: Some(EligibilitySummary {
                elegivel,
                idade_minima: regras.idade_minima,
                idade_maxima: regras.idade_maxima,
                exige_cadastro_rural: regras.exige_cadastro_rural,
                cadastro_rural_encontrado,
            }),
            ..Default::default()
        }
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Score before the quod offset.
pub fn base_score(elegivel: bool, idade: Option<u32>, situacao: Option<&str>) -> u32 {
    let mut score = if elegivel {
        SCORE_ELIGIBLE
    } else {
        SCORE_INELIGIBLE
    };
    if idade.is_some_and(|age| AGE_BONUS_RANGE.contains(&age)) {
        score += AGE_BONUS;
    }
    if situacao == Some(REGULAR_STATUS) {
        score += REGULAR_BONUS;
    }
    score
}

/// One recommendation per failed rule.
fn ineligible_recommendations(
    idade: Option<u32>,
    regras: &EligibilityRules,
    cadastro_rural_encontrado: Option<bool>,
) -> Vec<String> {
    let mut recomendacoes = Vec::new();

    if let Some(age) = idade {
        if let Some(min) = regras.idade_minima.filter(|min| age < *min) {
            recomendacoes.push(format!(
                "Aguarde até completar {} anos para solicitar o crédito.",
                min
            ));
        }
        if let Some(max) = regras.idade_maxima.filter(|max| age > *max) {
            recomendacoes.push(format!(
                "A idade máxima para esta linha de crédito é de {} anos. Consulte outras modalidades disponíveis.",
                max
            ));
        }
    }

    if regras.exige_cadastro_rural && cadastro_rural_encontrado != Some(true) {
        recomendacoes.push(RECOMMENDATION_RURAL_REGISTRATION.to_string());
    }

    recomendacoes
}

fn age_within(age: u32, regras: &EligibilityRules) -> bool {
    regras.idade_minima.map_or(true, |min| age >= min)
        && regras.idade_maxima.map_or(true, |max| age <= max)
}

fn age_range_risk(regras: &EligibilityRules) -> String {
    match (regras.idade_minima, regras.idade_maxima) {
        (Some(min), Some(max)) => format!("Idade fora da faixa permitida ({} a {} anos)", min, max),
        (Some(min), None) => format!("Idade fora da faixa permitida (mínimo de {} anos)", min),
        (None, Some(max)) => format!("Idade fora da faixa permitida (máximo de {} anos)", max),
        (None, None) => "Idade fora da faixa permitida".to_string(),
    }
}

/// Free-text explanation shown in the "Explicabilidade" card.
pub fn build_explanation(
    idade: Option<u32>,
    situacao: Option<&str>,
    cadastro_rural_detectado: bool,
    elegivel: bool,
) -> String {
    let idade_text = idade
        .map(|age| format!("{} anos", age))
        .unwrap_or_else(|| "não informada".to_string());
    let situacao_text = situacao.unwrap_or("não informada");
    let cadastro_text = if cadastro_rural_detectado {
        "detectado"
    } else {
        "não detectado"
    };
    let elegibilidade_text = if elegivel {
        "O CPF atende aos critérios de elegibilidade."
    } else {
        "O CPF não atende aos critérios de elegibilidade."
    };

    format!(
        "Idade: {}. Situação cadastral: {}. Cadastro rural {}. {}",
        idade_text, situacao_text, cadastro_text, elegibilidade_text
    )
}

/// Age in whole years on `today` for a birth date in `YYYY-MM-DD` or `DD/MM/YYYY`.
pub fn age_from_birth_date(raw: &str, today: NaiveDate) -> Option<u32> {
    let raw = raw.trim();
    let birth = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()?;
    today.years_since(birth)
}
