use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::CaseState;

/// Respuestas del formulario, indexadas por la clave de cada pregunta
pub type Answers = BTreeMap<String, String>;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CaseSubmission {
    pub template_id: String,
    pub client_name: String,
    pub client_email: String,
    pub answers: Answers,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CaseCreated {
    pub case_id: String,
    pub status: CaseState,
    #[serde(default)]
    pub missing_tokens: Vec<String>,
    #[serde(default)]
    pub warning: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CaseStatus {
    pub status: CaseState,
    #[serde(default)]
    pub approved_download_url: Option<String>,
}

impl CaseStatus {
    /// URL de descarga, solo si el caso está aprobado y el backend la envió
    pub fn download_url(&self) -> Option<&str> {
        match self.status {
            CaseState::Approved => self
                .approved_download_url
                .as_deref()
                .filter(|url| !url.is_empty()),
            CaseState::Submitted => None,
        }
    }
}

/// Fila de los listados de casos (cliente y abogado)
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CaseSummary {
    pub id: String,
    pub client_name: String,
    pub client_email: String,
    pub status: CaseState,
    pub created_at: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CaseRecord {
    pub id: String,
    pub template_id: String,
    pub client_name: String,
    pub client_email: String,
    pub status: CaseState,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Answer {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CaseDetail {
    pub case: CaseRecord,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub preview_html_url: Option<String>,
    #[serde(default)]
    pub docx_url: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Approval {
    pub ok: bool,
    pub client_docx_url: String,
}
