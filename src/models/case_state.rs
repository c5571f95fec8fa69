use serde::{Deserialize, Serialize};
use std::fmt;

/// Estado de revisión de un caso, tal como lo reporta el backend
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CaseState {
    Submitted,
    Approved,
}

impl CaseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseState::Submitted => "submitted",
            CaseState::Approved => "approved",
        }
    }
}

impl fmt::Display for CaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseState::Submitted => write!(f, "⏳ En revisión"),
            CaseState::Approved => write!(f, "✅ Aprobado"),
        }
    }
}
