//! HTML and plain-text renderers for the form and its result cards.

use crate::form::CreditForm;
use crate::presentation::{build_cards, Card, CardKind, ScoreBand, SCORE_SCALE};
use std::fmt::Write;

const STYLE: &str = r#"
    body { font-family: system-ui, sans-serif; background: #f0f6ff; margin: 0; color: #111827; }
    main { max-width: 960px; margin: 0 auto; padding: 2rem 1rem; }
    h1 { text-align: center; }
    form, .card { background: #fff; border: 1px solid #e5e7eb; border-radius: 1rem; padding: 1.5rem; margin-bottom: 1.5rem; }
    input { width: 100%; font-size: 1.1rem; padding: .75rem; box-sizing: border-box; }
    button { width: 100%; margin-top: 1rem; padding: .9rem; font-size: 1.1rem; background: #2563eb; color: #fff; border: 0; border-radius: .75rem; }
    .error { color: #dc2626; margin-top: .75rem; }
    .field-label { color: #4b5563; font-size: .85rem; margin: .5rem 0 0; }
    .field-value { font-weight: 600; margin: 0; white-space: pre-wrap; }
    .gauge { background: #e5e7eb; border-radius: 999px; height: .75rem; }
    .gauge > div { height: .75rem; border-radius: 999px; background: #2563eb; }
    .band-high { color: #16a34a; } .band-medium { color: #ca8a04; } .band-low { color: #dc2626; } .band-neutral { color: #2563eb; }
    .score { font-size: 3rem; font-weight: 700; text-align: center; margin: .5rem 0; }
"#;

/// Full page: header, form (with inline error) and the result cards when present.
pub fn render_form_page(form: &CreditForm) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str("    <title>Análise de Crédito</title>\n");
    let _ = writeln!(html, "    <style>{}</style>", STYLE);
    html.push_str("</head>\n<body>\n<main>\n");
    html.push_str("<h1>Análise de Crédito</h1>\n");
    html.push_str(
        "<p style=\"text-align:center\">Insira o CPF para consultar informações de crédito de forma rápida e segura</p>\n",
    );

    html.push_str("<form method=\"post\" action=\"/consulta\">\n");
    html.push_str("  <label for=\"cpf\">CPF do Cliente</label>\n");
    let _ = writeln!(
        html,
        "  <input type=\"text\" id=\"cpf\" name=\"cpf\" value=\"{}\" placeholder=\"000.000.000-00\" maxlength=\"14\"{}>",
        escape_html(form.cpf()),
        if form.is_loading() { " disabled" } else { "" }
    );
    if let Some(error) = form.error() {
        let _ = writeln!(html, "  <p class=\"error\">{}</p>", escape_html(error));
    }
    let _ = writeln!(
        html,
        "  <button type=\"submit\"{}>Consultar Crédito</button>",
        if form.is_loading() { " disabled" } else { "" }
    );
    html.push_str("</form>\n");

    if let Some(profile) = form.data() {
        html.push_str(&render_cards_html(&build_cards(profile)));
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

/// Cards as HTML fragments.
pub fn render_cards_html(cards: &[Card]) -> String {
    let mut html = String::new();
    for card in cards {
        let _ = writeln!(
            html,
            "<section class=\"card card-{}\">",
            kind_class(card.kind)
        );
        let _ = writeln!(html, "  <h2>{}</h2>", escape_html(&card.title));
        if let Some(subtitle) = &card.subtitle {
            let _ = writeln!(html, "  <p>{}</p>", escape_html(subtitle));
        }
        if let Some(gauge) = &card.gauge {
            let band = band_class(gauge.band);
            let _ = writeln!(
                html,
                "  <p class=\"score {}\">{}</p>\n  <p class=\"{}\" style=\"text-align:center\">{}</p>",
                band,
                gauge.value,
                band,
                escape_html(&gauge.label)
            );
            let _ = writeln!(
                html,
                "  <div class=\"gauge\"><div style=\"width: {}%\"></div></div>\n  <p class=\"field-label\">0 · {} · {}</p>",
                gauge.percent,
                SCORE_SCALE / 2,
                SCORE_SCALE
            );
        }
        for field in &card.fields {
            let _ = writeln!(
                html,
                "  <p class=\"field-label\">{}</p>\n  <p class=\"field-value\">{}</p>",
                escape_html(&field.label),
                escape_html(&field.value)
            );
        }
        if !card.items.is_empty() {
            let tag = if card.numbered { "ol" } else { "ul" };
            let _ = writeln!(html, "  <{}>", tag);
            for item in &card.items {
                let _ = writeln!(html, "    <li>{}</li>", escape_html(item));
            }
            let _ = writeln!(html, "  </{}>", tag);
        }
        if let Some(message) = &card.empty_message {
            let _ = writeln!(html, "  <p>{}</p>", escape_html(message));
        }
        html.push_str("</section>\n");
    }
    html
}

/// Cards as plain text for terminals.
pub fn render_cards_text(cards: &[Card]) -> String {
    let mut out = String::new();
    for card in cards {
        let _ = writeln!(out, "═══ {} ═══", card.title.to_uppercase());
        if let Some(subtitle) = &card.subtitle {
            let _ = writeln!(out, "{}", subtitle);
        }
        if let Some(gauge) = &card.gauge {
            let _ = writeln!(out, "{} / {} ({})", gauge.value, SCORE_SCALE, gauge.label);
        }
        for field in &card.fields {
            let mut lines = field.value.lines();
            let _ = writeln!(
                out,
                "{}: {}",
                field.label,
                lines.next().unwrap_or_default()
            );
            for line in lines {
                let _ = writeln!(out, "    {}", line);
            }
        }
        for (i, item) in card.items.iter().enumerate() {
            if card.numbered {
                let _ = writeln!(out, "{}. {}", i + 1, item);
            } else {
                let _ = writeln!(out, "• {}", item);
            }
        }
        if let Some(message) = &card.empty_message {
            let _ = writeln!(out, "✓ {}", message);
        }
        out.push('\n');
    }
    out
}

fn kind_class(kind: CardKind) -> &'static str {
    match kind {
        CardKind::Header => "header",
        CardKind::Score => "score",
        CardKind::PersonalInfo => "personal-info",
        CardKind::Contact => "contact",
        CardKind::Financial => "financial",
        CardKind::QuodScore => "quod-score",
        CardKind::Eligibility => "eligibility",
        CardKind::Reasons => "reasons",
        CardKind::Risks => "risks",
        CardKind::Recommendations => "recommendations",
        CardKind::Explanation => "explanation",
        CardKind::Restrictions => "restrictions",
        CardKind::Additional => "additional",
    }
}

fn band_class(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::High => "band-high",
        ScoreBand::Medium => "band-medium",
        ScoreBand::Low => "band-low",
        ScoreBand::Neutral => "band-neutral",
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
