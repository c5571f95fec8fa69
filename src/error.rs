use reqwest::StatusCode;
use thiserror::Error;

/// Error de una llamada al backend de casos
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context} ({status}): {body}")]
    Status {
        context: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("{context}: respuesta inválida: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Detecta el límite de NDAs gratuitos.
    ///
    /// El backend no envía un código de error estructurado, así que se mira
    /// el código 402 o se busca "402" o "quota" en el cuerpo de la respuesta.
    /// Los errores de red y de decodificación nunca cuentan como cuota.
    pub fn is_quota_exceeded(&self) -> bool {
        match self {
            ApiError::Status { status, body, .. } => {
                *status == StatusCode::PAYMENT_REQUIRED || is_quota_message(body)
            }
            ApiError::Transport { .. } | ApiError::Decode { .. } => false,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport { source, .. } | ApiError::Decode { source, .. } => {
                source.status()
            }
        }
    }
}

pub fn is_quota_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("402") || message.contains("quota")
}

/// Error del proveedor de identidad o del almacenamiento de la sesión
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("La autenticación de clientes no está configurada (faltan SUPABASE_URL y SUPABASE_ANON_KEY)")]
    NotConfigured,

    #[error("{0}")]
    Rejected(String),

    #[error("Error al conectar con el proveedor de identidad: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error al leer o escribir archivos locales (sesión, clave de abogado)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Error de E/S en {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Contenido inválido en {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("Ruta desconocida: {0}")]
    Unknown(String),

    #[error("Ruta inválida {path}: {reason}")]
    Invalid { path: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_heuristic_matches_status_and_keyword() {
        let payment_required = ApiError::Status {
            context: "Failed to submit case",
            status: StatusCode::PAYMENT_REQUIRED,
            body: "{\"detail\":\"limit reached\"}".to_string(),
        };
        assert!(payment_required.is_quota_exceeded());
        assert_eq!(payment_required.status(), Some(StatusCode::PAYMENT_REQUIRED));

        let keyword = ApiError::Status {
            context: "Failed to submit case",
            status: StatusCode::FORBIDDEN,
            body: "Free Quota exhausted".to_string(),
        };
        assert!(keyword.is_quota_exceeded());

        let other = ApiError::Status {
            context: "Failed to submit case",
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "Storage upload failed".to_string(),
        };
        assert!(!other.is_quota_exceeded());
    }

    #[tokio::test]
    async fn transport_errors_are_never_quota() {
        // Falla antes de conectar; el mensaje incluye la URL
        let source = reqwest::Client::new()
            .get("ftp://127.0.0.1:4020/v1/quota")
            .send()
            .await
            .unwrap_err();
        let err = ApiError::Transport {
            context: "Failed to submit case",
            source,
        };

        assert!(err.to_string().contains("4020"));
        assert!(!err.is_quota_exceeded());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn status_error_message_carries_context_and_code() {
        let err = ApiError::Status {
            context: "Failed to fetch case status",
            status: StatusCode::NOT_FOUND,
            body: "not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch case status (404 Not Found): not found"
        );
    }
}
