use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnypayError {
    #[error("Отсутствует обязательный параметр: {0}")]
    MissingConfiguration(&'static str),

    #[error("Неизвестный метод API: {0}")]
    UnknownMethod(String),

    #[error("Ошибка API Anypay {code}: {message}")]
    Gateway { code: i64, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Неверный URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Ошибка сети или HTTP запроса: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTTP статус {status}")]
    Status {
        status: u16,
        // Тело ответа, если оно разобралось как JSON
        body: Option<serde_json::Value>,
    },

    #[error("Ошибка десериализации JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TransportError {
    /// JSON тело ответа, полученное вместе с HTTP ошибкой.
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            TransportError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

// Тело ошибки API: {"error": {"code": 4, "message": "..."}}
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorBody {
    pub code: i64,
    pub message: String,
}

impl ApiErrorBody {
    /// Достает `error` из тела ответа. Код может прийти строкой.
    /// `null`, `false` и пустая строка означают отсутствие ошибки,
    /// строка вместо объекта становится текстом ошибки.
    pub fn from_response(body: &serde_json::Value) -> Option<Self> {
        let error = body.get("error")?;
        match error {
            serde_json::Value::Null | serde_json::Value::Bool(false) => return None,
            serde_json::Value::String(s) if s.is_empty() => return None,
            serde_json::Value::String(s) => {
                return Some(ApiErrorBody {
                    code: 0,
                    message: s.clone(),
                });
            }
            _ => {}
        }
        let code = match error.get("code") {
            Some(serde_json::Value::Number(n)) => n.as_i64().unwrap_or_default(),
            Some(serde_json::Value::String(s)) => s.parse().unwrap_or_default(),
            _ => 0,
        };
        let message = match error.get("message") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        Some(ApiErrorBody { code, message })
    }
}

impl From<ApiErrorBody> for AnypayError {
    fn from(body: ApiErrorBody) -> Self {
        AnypayError::Gateway {
            code: body.code,
            message: body.message,
        }
    }
}
