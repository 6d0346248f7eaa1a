use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Parâmetro inválido: {0}")]
    InvalidQuery(String),

    // Dado cadastrado faltando ou inválido no meio de um cálculo
    // (ex.: produto com preço por kg zerado). Nunca vira zero em silêncio.
    #[error("Dados inconsistentes no produto '{product_id}': {reason}")]
    DataQuality { product_id: String, reason: String },

    // Poucos pontos para uma operação estatística (ex.: reta com menos de 2 datas)
    #[error("Dados insuficientes: {0}")]
    InsufficientData(String),

    // --- Erros de leitura das planilhas ---
    #[error("Valor inválido na linha {line}, coluna {field}: '{value}'")]
    Parse {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("Erro ao ler CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Erro ao baixar planilha: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Erro de leitura de arquivo: {0}")]
    IoError(#[from] std::io::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .map(|e| e.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                // Erros de schema (struct inteira) ficam sob "__all__"
                let body = Json(json!({
                    "error": "Um ou mais parâmetros são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidQuery(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InsufficientData(_) | AppError::DataQuality { .. } => {
                tracing::warn!("{}", self);
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }

            // Todos os outros erros (planilha, IO, interno) viram 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
