use chrono::{DateTime, Local, NaiveDateTime};
use colored::*;

use crate::models::CaseState;

/// Formatea una marca de tiempo del backend en hora local.
/// Si no se puede interpretar se muestra tal cual.
pub fn format_timestamp(raw: &str) -> String {
    const FORMAT: &str = "%d %b %Y %H:%M";

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Local).format(FORMAT).to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(FORMAT).to_string();
    }
    raw.to_string()
}

/// `PARTY1_NAME` -> `PARTY1 NAME`, `effective_date` -> `Effective Date`
pub fn humanize_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn status_badge(state: CaseState) -> ColoredString {
    match state {
        CaseState::Submitted => state.to_string().yellow(),
        CaseState::Approved => state.to_string().green(),
    }
}

/// Primer grupo del UUID, para listados de casos
pub fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}
