//! Consulta periódica del estado de un caso.
//!
//! Se consulta una vez al empezar y luego cada 5 segundos mientras el caso
//! siga en revisión. El ciclo termina cuando llega un estado aprobado con URL
//! de descarga o cuando se cancela (el usuario sale de la pantalla).

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{CaseState, CaseStatus};

pub const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Origen del estado de un caso
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn case_status(&self, case_id: &str) -> Result<CaseStatus, ApiError>;
}

#[async_trait]
impl StatusSource for ApiClient {
    async fn case_status(&self, case_id: &str) -> Result<CaseStatus, ApiError> {
        ApiClient::case_status(self, case_id).await
    }
}

/// Resultado de una consulta individual
#[derive(Debug)]
pub enum PollUpdate {
    Status(CaseStatus),
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Approved { download_url: String },
    Cancelled,
}

/// Estado visible de la pantalla de seguimiento
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    pub status: CaseState,
    pub download_url: Option<String>,
    pub error: Option<String>,
    pub polling: bool,
}

impl Default for PollState {
    fn default() -> Self {
        Self {
            status: CaseState::Submitted,
            download_url: None,
            error: None,
            polling: true,
        }
    }
}

impl PollState {
    /// Aplica una consulta. Devuelve `true` si cambió algo visible.
    pub fn apply(&mut self, update: &PollUpdate) -> bool {
        let before = self.clone();
        match update {
            PollUpdate::Status(result) => {
                self.status = result.status;
                self.error = None;
                if let Some(url) = result.download_url() {
                    self.download_url = Some(url.to_string());
                    self.polling = false;
                }
            }
            // El error queda visible pero el ciclo sigue
            PollUpdate::Failed(err) => self.error = Some(err.to_string()),
        }
        *self != before
    }
}

pub struct StatusPoller<S> {
    source: S,
    every: Duration,
}

impl<S: StatusSource> StatusPoller<S> {
    pub fn new(source: S) -> Self {
        Self::with_interval(source, STATUS_POLL_INTERVAL)
    }

    pub fn with_interval(source: S, every: Duration) -> Self {
        Self { source, every }
    }

    /// Consulta hasta que el caso se apruebe o `cancel` termine.
    ///
    /// Una consulta en curso cuando gana `cancel` se descarta sin notificar.
    pub async fn run<C, F>(&self, case_id: &str, cancel: C, mut on_update: F) -> PollOutcome
    where
        C: Future<Output = ()>,
        F: FnMut(&PollUpdate),
    {
        let mut ticker = interval(self.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(cancel);

        loop {
            tokio::select! {
                biased;
                _ = &mut cancel => {
                    info!(case_id, "consulta de estado cancelada");
                    return PollOutcome::Cancelled;
                }
                // El primer tick se completa de inmediato
                _ = ticker.tick() => {}
            }

            debug!(case_id, "consultando estado del caso");
            let fetched = tokio::select! {
                biased;
                _ = &mut cancel => {
                    info!(case_id, "consulta de estado cancelada");
                    return PollOutcome::Cancelled;
                }
                fetched = self.source.case_status(case_id) => fetched,
            };

            let update = match fetched {
                Ok(status) => PollUpdate::Status(status),
                Err(err) => {
                    warn!(case_id, error = %err, "falló la consulta de estado");
                    PollUpdate::Failed(err)
                }
            };
            on_update(&update);

            if let PollUpdate::Status(status) = &update {
                if let Some(url) = status.download_url() {
                    info!(case_id, "caso aprobado");
                    return PollOutcome::Approved {
                        download_url: url.to_string(),
                    };
                }
            }
        }
    }
}
