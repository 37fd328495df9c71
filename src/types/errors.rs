//! Tipos de erro do polquiz.

use thiserror::Error;

/// Tipo de resultado padrão do polquiz.
pub type PolquizResult<T> = Result<T, PolquizError>;

/// Erros possíveis no polquiz.
#[derive(Error, Debug)]
pub enum PolquizError {
    #[error("Invalid response '{token}'. Accepted answers: {}", accepted.join(", "))]
    InvalidResponse {
        token: String,
        accepted: Vec<String>,
    },

    #[error("The {0} quiz is already complete. Reset it to start over.")]
    AlreadyComplete(String),

    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("Unknown quiz: '{0}'")]
    UnknownQuiz(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "cli")]
    #[error("Interactive prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("MCP server error: {0}")]
    McpServer(String),

    #[error("{0}")]
    Other(String),
}

impl PolquizError {
    /// Cria um erro genérico.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Cria um erro de configuração.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Cria um erro de catálogo.
    pub fn catalog<S: Into<String>>(msg: S) -> Self {
        Self::Catalog(msg.into())
    }

    /// Indica se o erro é recuperável pelo cliente (entrada do usuário).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidResponse { .. } | Self::AlreadyComplete(_) | Self::UnknownQuiz(_)
        )
    }
}
