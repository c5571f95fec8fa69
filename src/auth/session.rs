use std::future::Future;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AuthError, StoreError};
use crate::utils::{load_json, remove_file, save_json};

/// Margen antes del vencimiento a partir del cual se renueva el token
const EXPIRY_MARGIN_SECS: i64 = 30;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Sesión emitida por el proveedor de identidad
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Segundos desde la época Unix
    pub expires_at: i64,
    pub user: SessionUser,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at - EXPIRY_MARGIN_SECS
    }

    pub fn email(&self) -> &str {
        self.user.email.as_deref().unwrap_or_default()
    }

    pub fn full_name(&self) -> &str {
        self.user
            .user_metadata
            .full_name
            .as_deref()
            .unwrap_or_default()
    }
}

/// Sesión persistida en disco entre ejecuciones
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Option<Session>, StoreError> {
        load_json(&self.path)
    }

    pub fn save(&self, session: &Session) -> Result<(), StoreError> {
        save_json(&self.path, session)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        remove_file(&self.path)
    }

    /// Devuelve la sesión vigente, renovándola una vez si venció.
    ///
    /// Si la renovación falla la sesión guardada se elimina. Los errores de
    /// lectura se registran y se tratan como "sin sesión".
    pub async fn resolve<F, Fut>(&self, now: DateTime<Utc>, refresh: F) -> Option<Session>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = Result<Session, AuthError>>,
    {
        let stored = match self.load() {
            Ok(stored) => stored?,
            Err(e) => {
                warn!(error = %e, "no se pudo leer la sesión guardada");
                return None;
            }
        };

        if !stored.is_expired_at(now) {
            return Some(stored);
        }

        debug!("sesión vencida, renovando");
        match refresh(stored).await {
            Ok(renewed) => {
                if let Err(e) = self.save(&renewed) {
                    warn!(error = %e, "no se pudo guardar la sesión renovada");
                }
                Some(renewed)
            }
            Err(e) => {
                info!(error = %e, "no se pudo renovar la sesión");
                if let Err(e) = self.clear() {
                    warn!(error = %e, "no se pudo borrar la sesión vencida");
                }
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn session(expires_at: i64) -> Session {
        Session {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at,
            user: SessionUser {
                id: "u1".to_string(),
                email: Some("ana@example.com".to_string()),
                user_metadata: UserMetadata {
                    full_name: Some("Ana Pérez".to_string()),
                },
            },
        }
    }

    async fn no_refresh(_: Session) -> Result<Session, AuthError> {
        panic!("no debe renovar")
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn expiry_uses_margin() {
        let s = session(1_000);
        assert!(!s.is_expired_at(at(900)));
        assert!(s.is_expired_at(at(975)));
    }

    #[tokio::test]
    async fn valid_session_is_returned_without_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&session(10_000)).unwrap();

        let resolved = store
            .resolve(at(100), no_refresh)
            .await;

        assert_eq!(resolved, Some(session(10_000)));
    }

    #[tokio::test]
    async fn expired_session_is_refreshed_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&session(100)).unwrap();

        let resolved = store
            .resolve(at(500), |old| async move {
                assert_eq!(old.refresh_token, "refresh");
                Ok(session(5_000))
            })
            .await;

        assert_eq!(resolved, Some(session(5_000)));
        assert_eq!(store.load().unwrap(), Some(session(5_000)));
    }

    #[tokio::test]
    async fn failed_refresh_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&session(100)).unwrap();

        let resolved = store
            .resolve(at(500), |_| async {
                Err(AuthError::Rejected("Invalid Refresh Token".to_string()))
            })
            .await;

        assert_eq!(resolved, None);
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn missing_session_file_means_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        let resolved = store
            .resolve(at(0), no_refresh)
            .await;

        assert!(resolved.is_none());
    }
}
