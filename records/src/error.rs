//! Tipos de erro para o crate records

use thiserror::Error;

/// Erros do cliente do banco de documentos
#[derive(Debug, Error)]
pub enum RecordsError {
    /// Falha de transporte (conexão, DNS, timeout do reqwest)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Resposta remota com status não-2xx
    #[error("Remote API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Erro de parsing JSON
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Erro de configuração
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RecordsError {
    /// Status HTTP da resposta remota, quando houver
    pub fn status(&self) -> Option<u16> {
        match self {
            RecordsError::Api { status, .. } => Some(*status),
            RecordsError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Tipo Result padrão para o crate
pub type Result<T> = std::result::Result<T, RecordsError>;
