//! Typed errors and the normalized API error shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Message shown for any failure where the backend never answered.
pub const CONNECTION_ERROR_MESSAGE: &str = "Erro de conexão com o servidor.";
/// `error` field used when the backend did not provide one.
pub const UNSPECIFIED_ERROR: &str = "Erro não especificado.";
const VALIDATION_FALLBACK: &str = "Erro de validação";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },
    #[error("http client: {0}")]
    HttpClient(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// Uniform error produced at the HTTP boundary. Nothing above `http` sees a
/// raw transport error.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ApiError {
    pub success: bool,
    pub message: String,
    pub error: String,
    /// 0 when no response was received.
    pub status_code: u16,
    pub timestamp: String,
}

impl ApiError {
    /// Backend unreachable, request aborted or timed out.
    pub fn network(detail: impl fmt::Display) -> Self {
        tracing::debug!(detail = %detail, "network failure");
        ApiError {
            success: false,
            message: CONNECTION_ERROR_MESSAGE.to_string(),
            error: UNSPECIFIED_ERROR.to_string(),
            status_code: 0,
            timestamp: now_rfc3339(),
        }
    }

    /// Non-2xx response. `body` is the decoded payload when it was JSON.
    pub fn from_response(status: u16, body: Option<&serde_json::Value>) -> Self {
        let field = |name: &str| {
            body.and_then(|b| b.get(name))
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        ApiError {
            success: false,
            message: field("message").unwrap_or_else(|| http_error_message(status).to_string()),
            error: field("error").unwrap_or_else(|| UNSPECIFIED_ERROR.to_string()),
            status_code: status,
            timestamp: field("timestamp").unwrap_or_else(now_rfc3339),
        }
    }

    /// The request could not be built (unserializable body, bad url).
    pub fn request(detail: impl fmt::Display) -> Self {
        ApiError {
            success: false,
            message: http_error_message(400).to_string(),
            error: detail.to_string(),
            status_code: 0,
            timestamp: now_rfc3339(),
        }
    }

    /// 2xx response whose body did not match the expected shape.
    pub fn decode(status: u16, detail: impl fmt::Display) -> Self {
        ApiError {
            success: false,
            message: "Resposta inesperada do servidor.".to_string(),
            error: detail.to_string(),
            status_code: status,
            timestamp: now_rfc3339(),
        }
    }

    pub fn is_network(&self) -> bool {
        self.status_code == 0 && self.message == CONNECTION_ERROR_MESSAGE
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code == 404
    }
}

/// Status-keyed fallback when the backend sent no message.
pub fn http_error_message(status: u16) -> &'static str {
    match status {
        400 => "Requisição inválida. Verifique os dados enviados.",
        401 => "Não autorizado. Faça login novamente.",
        403 => "Acesso negado. Você não tem permissão.",
        404 => "Recurso não encontrado.",
        500 => "Erro interno do servidor. Tente novamente mais tarde.",
        s if s >= 500 => "Erro no servidor. Tente novamente mais tarde.",
        s if s >= 400 => "Erro na requisição. Verifique os dados e tente novamente.",
        _ => "Erro desconhecido",
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Client-side form errors, keyed by field. Raised before any request is sent.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return f.write_str(VALIDATION_FALLBACK);
        }
        let lines: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        f.write_str(&lines.join("\n"))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("a mutation is already pending")]
    MutationPending,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// The normalized API error, when this failure came from the backend.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            AppError::Api(e) => Some(e),
            _ => None,
        }
    }
}
