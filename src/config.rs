use std::env;
use std::path::PathBuf;

use tracing::warn;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Configuración del cliente, leída del entorno (y de `.env` si existe)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub supabase: Option<SupabaseConfig>,
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda de variables
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_base = non_empty("NDA_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let supabase = match (non_empty("SUPABASE_URL"), non_empty("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Some(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
            }),
            _ => {
                warn!("SUPABASE_URL/SUPABASE_ANON_KEY no configuradas; login de clientes deshabilitado");
                None
            }
        };

        let data_dir = non_empty("NDA_PORTAL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("nda-portal")
            });

        Config {
            api_base: api_base.trim_end_matches('/').to_string(),
            supabase,
            data_dir,
        }
    }

    pub fn with_api_base(mut self, api_base: Option<String>) -> Self {
        if let Some(base) = api_base {
            self.api_base = base.trim_end_matches('/').to_string();
        }
        self
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    pub fn lawyer_key_path(&self) -> PathBuf {
        self.data_dir.join("lawyer_key")
    }
}
