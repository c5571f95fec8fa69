//! Delegado del proveedor de identidad (Supabase Auth).
//!
//! Este módulo solo obtiene, renueva y guarda la sesión; las reglas de acceso
//! están en `gate`.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::auth::{Session, SessionStore, SessionUser};
use crate::config::SupabaseConfig;
use crate::error::AuthError;

#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// El proveedor confirmó la cuenta en el acto y abrió sesión
    SignedIn(Session),
    /// Hay que verificar el correo antes de iniciar sesión
    ConfirmationSent { email: String },
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn is_configured(&self) -> bool;

    /// Sesión vigente, o `None` si no hay o no se pudo obtener
    async fn current_session(&self) -> Option<Session>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Proveedor usado cuando faltan las credenciales de Supabase
#[derive(Debug, Default)]
pub struct DisabledAuth;

#[async_trait]
impl IdentityProvider for DisabledAuth {
    fn is_configured(&self) -> bool {
        false
    }

    async fn current_session(&self) -> Option<Session> {
        None
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Session, AuthError> {
        Err(AuthError::NotConfigured)
    }

    async fn sign_up(&self, _email: &str, _password: &str) -> Result<SignUpOutcome, AuthError> {
        Err(AuthError::NotConfigured)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: SessionUser,
}

impl TokenResponse {
    fn into_session(self, now: i64) -> Session {
        let expires_at = self
            .expires_at
            .unwrap_or_else(|| now + self.expires_in.unwrap_or(3600));

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

/// Mensaje legible de un error del proveedor
fn provider_message(body: &str, status: reqwest::StatusCode) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|field| json.get(*field).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| format!("Authentication failed ({})", status))
}

pub struct SupabaseAuth {
    http: Client,
    config: SupabaseConfig,
    store: SessionStore,
}

impl SupabaseAuth {
    pub fn new(config: SupabaseConfig, store: SessionStore) -> Self {
        Self {
            http: Client::new(),
            config,
            store,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.url, path)
    }

    async fn check(response: Response) -> Result<Value, AuthError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AuthError::Rejected(provider_message(&body, status)));
        }
        serde_json::from_str(&body)
            .map_err(|e| AuthError::Rejected(format!("Respuesta inválida del proveedor: {}", e)))
    }

    async fn token_grant(&self, grant_type: &str, body: Value) -> Result<Session, AuthError> {
        debug!(grant_type, "solicitando token al proveedor de identidad");
        let response = self
            .http
            .post(self.endpoint("token"))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.config.anon_key)
            .json(&body)
            .send()
            .await?;

        let value = Self::check(response).await?;
        let token: TokenResponse = serde_json::from_value(value)
            .map_err(|e| AuthError::Rejected(format!("Respuesta inválida del proveedor: {}", e)))?;
        Ok(token.into_session(Utc::now().timestamp()))
    }

    async fn refresh(&self, session: Session) -> Result<Session, AuthError> {
        self.token_grant(
            "refresh_token",
            json!({ "refresh_token": session.refresh_token }),
        )
        .await
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuth {
    fn is_configured(&self) -> bool {
        true
    }

    async fn current_session(&self) -> Option<Session> {
        self.store
            .resolve(Utc::now(), |session| self.refresh(session))
            .await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = self
            .token_grant("password", json!({ "email": email, "password": password }))
            .await?;
        self.store.save(&session)?;
        info!(user = %session.user.id, "sesión iniciada");
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        let response = self
            .http
            .post(self.endpoint("signup"))
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let value = Self::check(response).await?;

        // Con confirmación automática el proveedor devuelve una sesión completa
        if value.get("access_token").is_some() {
            let token: TokenResponse = serde_json::from_value(value).map_err(|e| {
                AuthError::Rejected(format!("Respuesta inválida del proveedor: {}", e))
            })?;
            let session = token.into_session(Utc::now().timestamp());
            self.store.save(&session)?;
            return Ok(SignUpOutcome::SignedIn(session));
        }

        Ok(SignUpOutcome::ConfirmationSent {
            email: email.to_string(),
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(session) = self.store.load()? {
            let result = self
                .http
                .post(self.endpoint("logout"))
                .header("apikey", &self.config.anon_key)
                .bearer_auth(&session.access_token)
                .send()
                .await;

            // La sesión local se borra aunque el proveedor no responda
            if let Err(e) = result {
                warn!(error = %e, "no se pudo cerrar la sesión en el proveedor");
            }
        }
        self.store.clear()?;
        Ok(())
    }
}
