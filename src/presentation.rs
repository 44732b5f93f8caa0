//! View-model to display cards.
//!
//! Each card is produced only when the profile carries the data it shows. The card list
//! is renderer-agnostic: [`crate::pages`] turns it into HTML for the web form and plain
//! text for the CLI, and the JSON API returns it as-is.

use crate::cpf::format_cpf;
use crate::models::CreditProfile;
use phonenumber::country::Id as CountryId;
use phonenumber::Mode;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;

/// Upper bound of the score gauges.
pub const SCORE_SCALE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Header,
    Score,
    PersonalInfo,
    Contact,
    Financial,
    QuodScore,
    Eligibility,
    Reasons,
    Risks,
    Recommendations,
    Explanation,
    Restrictions,
    Additional,
}

/// Color band of the main score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
    /// Used by the quod gauge, which is not graded.
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreGauge {
    pub value: u32,
    pub label: String,
    pub band: ScoreBand,
    /// Fill of the gauge, 0-100.
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub kind: CardKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauge: Option<ScoreGauge>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<CardField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
    /// Items are shown as 1., 2., ...
    pub numbered: bool,
    /// Shown instead of `items` when the list is present but empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

impl Card {
    fn new(kind: CardKind, title: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            subtitle: None,
            gauge: None,
            fields: Vec::new(),
            items: Vec::new(),
            numbered: false,
            empty_message: None,
        }
    }

    fn field(&mut self, label: &str, value: impl Into<String>) {
        self.fields.push(CardField {
            label: label.to_string(),
            value: value.into(),
        });
    }

    fn list(kind: CardKind, title: &str, items: &[String]) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        let mut card = Self::new(kind, title);
        card.items = items.to_vec();
        Some(card)
    }
}

/// Builds the cards for a profile, in display order.
pub fn build_cards(profile: &CreditProfile) -> Vec<Card> {
    let mut cards = Vec::new();

    let mut header = Card::new(CardKind::Header, "Análise Concluída");
    header.subtitle = text(&profile.nome).map(|nome| format!("Dados de {}", nome));
    cards.push(header);

    if let Some(score) = nonzero(profile.score) {
        let mut card = Card::new(CardKind::Score, "Score de Crédito");
        card.gauge = Some(ScoreGauge {
            value: score,
            label: score_label(score).to_string(),
            band: score_band(score),
            percent: gauge_percent(score),
        });
        cards.push(card);
    }

    cards.extend(personal_info_card(profile));
    cards.extend(contact_card(profile));
    cards.extend(financial_card(profile));

    if let Some(score_quod) = nonzero(profile.score_quod) {
        let mut card = Card::new(CardKind::QuodScore, "Score Quod");
        card.gauge = Some(ScoreGauge {
            value: score_quod,
            label: "Score Específico".to_string(),
            band: ScoreBand::Neutral,
            percent: gauge_percent(score_quod),
        });
        cards.push(card);
    }

    cards.extend(eligibility_card(profile));

    if let Some(mut card) = Card::list(CardKind::Reasons, "Principais Motivos", &profile.motivos_top)
    {
        card.numbered = true;
        cards.push(card);
    }
    cards.extend(Card::list(
        CardKind::Risks,
        "Riscos Identificados",
        &profile.riscos,
    ));
    cards.extend(Card::list(
        CardKind::Recommendations,
        "Recomendações",
        &profile.recomendacoes,
    ));

    if !profile.explicabilidade.trim().is_empty() {
        let mut card = Card::new(CardKind::Explanation, "Explicabilidade");
        card.items = vec![profile.explicabilidade.clone()];
        cards.push(card);
    }

    if let Some(restricoes) = &profile.restricoes {
        let mut card = Card::new(CardKind::Restrictions, "Restrições");
        if restricoes.is_empty() {
            card.empty_message = Some("Nenhuma restrição encontrada".to_string());
        } else {
            card.items = restricoes.clone();
        }
        cards.push(card);
    }

    cards.extend(additional_card(profile));

    cards
}

fn personal_info_card(profile: &CreditProfile) -> Option<Card> {
    let mut card = Card::new(CardKind::PersonalInfo, "Informações Pessoais");
    if let Some(nome) = text(&profile.nome) {
        card.field("Nome Completo", nome);
    }
    if let Some(cpf) = text(&profile.cpf) {
        card.field("CPF", format_cpf(cpf));
    }
    if let Some(idade) = nonzero(profile.idade) {
        card.field("Idade", format!("{} anos", idade));
    }
    if let Some(data_nascimento) = text(&profile.data_nascimento) {
        card.field("Data de Nascimento", data_nascimento);
    }
    if let Some(profissao) = text(&profile.profissao) {
        card.field("Profissão", profissao);
    }
    (!card.fields.is_empty()).then_some(card)
}

fn contact_card(profile: &CreditProfile) -> Option<Card> {
    let mut card = Card::new(CardKind::Contact, "Contato");
    if let Some(telefone) = text(&profile.telefone) {
        card.field("Telefone", format_phone(telefone));
    }
    if let Some(email) = text(&profile.email) {
        card.field("E-mail", email);
    }
    if let Some(endereco) = profile.endereco.as_ref().filter(|e| !e.is_empty()) {
        let mut lines = Vec::new();
        if let Some(logradouro) = &endereco.logradouro {
            lines.push(logradouro.clone());
        }
        match (&endereco.cidade, &endereco.uf) {
            (Some(cidade), Some(uf)) => lines.push(format!("{}, {}", cidade, uf)),
            (Some(cidade), None) => lines.push(cidade.clone()),
            (None, Some(uf)) => lines.push(format!(", {}", uf)),
            (None, None) => {}
        }
        if let Some(cep) = &endereco.cep {
            lines.push(format!("CEP: {}", cep));
        }
        card.field("Endereço", lines.join("\n"));
    }
    (!card.fields.is_empty()).then_some(card)
}

fn financial_card(profile: &CreditProfile) -> Option<Card> {
    let mut card = Card::new(CardKind::Financial, "Informações Financeiras");
    if let Some(renda) = profile.renda.filter(|renda| *renda != 0.0) {
        card.field("Renda Mensal", format_brl(renda));
    }
    if let Some(situacao) = text(&profile.situacao) {
        card.field("Situação", situacao);
    }
    if let Some(historico) = &profile.historico_credito {
        if let Some(pontualidade) = &historico.pontualidade {
            card.field("Pontualidade", pontualidade.as_str());
        }
        if let Some(relacionamento) = &historico.relacionamento_bancario {
            card.field("Relacionamento Bancário", relacionamento.as_str());
        }
        if let Some(consultas) = historico.consultas_recentes {
            card.field("Consultas Recentes", consultas.to_string());
        }
    }
    (!card.fields.is_empty()).then_some(card)
}

fn eligibility_card(profile: &CreditProfile) -> Option<Card> {
    let elegibilidade = profile.elegibilidade.as_ref()?;
    let mut card = Card::new(CardKind::Eligibility, "Elegibilidade");
    card.field("Elegível", yes_no(elegibilidade.elegivel));
    if let Some(min) = elegibilidade.idade_minima {
        card.field("Idade Mínima", format!("{} anos", min));
    }
    if let Some(max) = elegibilidade.idade_maxima {
        card.field("Idade Máxima", format!("{} anos", max));
    }
    if elegibilidade.exige_cadastro_rural {
        card.field(
            "Cadastro Rural Encontrado",
            yes_no(elegibilidade.cadastro_rural_encontrado.unwrap_or(false)),
        );
    }
    if !elegibilidade.elegivel {
        card.items = profile.motivos_negacao.clone();
    }
    Some(card)
}

fn additional_card(profile: &CreditProfile) -> Option<Card> {
    let mut card = Card::new(CardKind::Additional, "Informações Adicionais");
    for (key, value) in &profile.extras {
        card.field(&humanize_key(key), display_value(value));
    }
    (!card.fields.is_empty()).then_some(card)
}

/// Blank strings count as absent.
fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Zero counts as absent.
fn nonzero(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v != 0)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Sim"
    } else {
        "Não"
    }
}

/// Grade of the main score.
pub fn score_label(score: u32) -> &'static str {
    match score {
        800.. => "Excelente",
        700..=799 => "Bom",
        600..=699 => "Regular",
        _ => "Baixo",
    }
}

pub fn score_band(score: u32) -> ScoreBand {
    match score {
        800.. => ScoreBand::High,
        600..=799 => ScoreBand::Medium,
        _ => ScoreBand::Low,
    }
}

fn gauge_percent(score: u32) -> u32 {
    score.min(SCORE_SCALE) * 100 / SCORE_SCALE
}

/// Formats an amount as Brazilian reais: `R$ 1.234,56`.
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, cents % 100)
}

/// `limiteSugerido` -> `Limite Sugerido`: first letter upper-cased, a space before
/// every later capital.
pub fn humanize_key(key: &str) -> String {
    static CAPITALS: OnceLock<Regex> = OnceLock::new();
    let capitals = CAPITALS.get_or_init(|| Regex::new(r"([A-Z])").expect("valid regex"));

    let mut chars = key.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str();
            format!(
                "{}{}",
                first.to_uppercase(),
                capitals.replace_all(rest, " $1")
            )
        }
        None => String::new(),
    }
}

/// Strings verbatim, everything else as (pretty) JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}

/// National format for valid Brazilian numbers, the raw input otherwise.
pub fn format_phone(raw: &str) -> String {
    match phonenumber::parse(Some(CountryId::BR), raw) {
        Ok(number) if phonenumber::is_valid(&number) => {
            number.format().mode(Mode::National).to_string()
        }
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, CreditHistory};
    use serde_json::json;

    fn kinds(cards: &[Card]) -> Vec<CardKind> {
        cards.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn test_score_labels_and_bands() {
        assert_eq!(score_label(900), "Excelente");
        assert_eq!(score_label(800), "Excelente");
        assert_eq!(score_label(799), "Bom");
        assert_eq!(score_label(700), "Bom");
        assert_eq!(score_label(650), "Regular");
        assert_eq!(score_label(599), "Baixo");

        assert_eq!(score_band(800), ScoreBand::High);
        assert_eq!(score_band(750), ScoreBand::Medium);
        assert_eq!(score_band(600), ScoreBand::Medium);
        assert_eq!(score_band(100), ScoreBand::Low);
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(5.5), "R$ 5,50");
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(-42.1), "-R$ 42,10");
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("limiteSugerido"), "Limite Sugerido");
        assert_eq!(humanize_key("bancoPrincipalAtual"), "Banco Principal Atual");
        assert_eq!(humanize_key("renda_familiar"), "Renda_familiar");
        assert_eq!(humanize_key("x"), "X");
        assert_eq!(humanize_key(""), "");
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("texto")), "texto");
        assert_eq!(display_value(&json!(12)), "12");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&json!({"a": 1})), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_format_phone_falls_back_to_raw() {
        assert_eq!(format_phone("abc"), "abc");
        assert_eq!(format_phone("123"), "123");
    }

    #[test]
    fn test_empty_profile_only_has_header() {
        let cards = build_cards(&CreditProfile::default());
        assert_eq!(kinds(&cards), vec![CardKind::Header]);
        assert!(cards[0].subtitle.is_none());
    }

    #[test]
    fn test_zero_and_blank_values_are_hidden() {
        let profile = CreditProfile {
            nome: Some("  ".to_string()),
            score: Some(0),
            score_quod: Some(0),
            idade: Some(0),
            renda: Some(0.0),
            situacao: Some(String::new()),
            profissao: Some("Agricultora".to_string()),
            ..Default::default()
        };

        let cards = build_cards(&profile);

        assert_eq!(kinds(&cards), vec![CardKind::Header, CardKind::PersonalInfo]);
        assert!(cards[0].subtitle.is_none());
        assert_eq!(cards[1].fields.len(), 1);
        assert_eq!(cards[1].fields[0].label, "Profissão");
    }

    #[test]
    fn test_full_profile_card_order() {
        let mut profile = CreditProfile {
            nome: Some("Maria Souza".to_string()),
            cpf: Some("11144477735".to_string()),
            score: Some(812),
            aprovado: true,
            motivos_top: vec!["Bom histórico".to_string()],
            riscos: vec!["Renda variável".to_string()],
            recomendacoes: vec!["Manter pagamentos".to_string()],
            explicabilidade: "Perfil consistente".to_string(),
            renda: Some(3500.0),
            endereco: Some(Address {
                cidade: Some("Campinas".to_string()),
                uf: Some("SP".to_string()),
                ..Default::default()
            }),
            historico_credito: Some(CreditHistory {
                consultas_recentes: Some(0),
                ..Default::default()
            }),
            restricoes: Some(vec![]),
            score_quod: Some(830),
            ..Default::default()
        };
        profile
            .extras
            .insert("limiteSugerido".to_string(), json!(5000));

        let cards = build_cards(&profile);

        assert_eq!(
            kinds(&cards),
            vec![
                CardKind::Header,
                CardKind::Score,
                CardKind::PersonalInfo,
                CardKind::Contact,
                CardKind::Financial,
                CardKind::QuodScore,
                CardKind::Reasons,
                CardKind::Risks,
                CardKind::Recommendations,
                CardKind::Explanation,
                CardKind::Restrictions,
                CardKind::Additional,
            ]
        );

        assert_eq!(cards[0].subtitle.as_deref(), Some("Dados de Maria Souza"));
        let gauge = cards[1].gauge.as_ref().unwrap();
        assert_eq!(gauge.label, "Excelente");
        assert_eq!(gauge.percent, 81);

        let personal = &cards[2];
        assert_eq!(personal.fields[1].value, "111.444.777-35");

        let contact = &cards[3];
        assert_eq!(contact.fields[0].label, "Endereço");
        assert_eq!(contact.fields[0].value, "Campinas, SP");

        let financial = &cards[4];
        assert_eq!(financial.fields[0].value, "R$ 3.500,00");
        assert_eq!(financial.fields[1].label, "Consultas Recentes");
        assert_eq!(financial.fields[1].value, "0");

        assert!(cards[6].numbered);

        let restrictions = &cards[10];
        assert!(restrictions.items.is_empty());
        assert_eq!(
            restrictions.empty_message.as_deref(),
            Some("Nenhuma restrição encontrada")
        );

        let additional = &cards[11];
        assert_eq!(additional.fields[0].label, "Limite Sugerido");
        assert_eq!(additional.fields[0].value, "5000");
    }
}
