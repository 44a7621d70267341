use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::multipart::Form;

use crate::error::TransportError;

/// HTTP транспорт для методов API.
///
/// Отправляет POST с телом `multipart/form-data` и возвращает разобранный JSON ответа.
/// При HTTP ошибке возвращает [`TransportError::Status`] с телом ответа, если оно является JSON.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_form(
        &self,
        url: &str,
        fields: &[(String, String)],
    ) -> Result<serde_json::Value, TransportError>;
}

// --- Транспорт на reqwest ---

#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;
        Ok(ReqwestTransport { client })
    }

    /// Использует заранее настроенный `reqwest::Client` (прокси, свои таймауты).
    pub fn with_client(client: ReqwestClient) -> Self {
        ReqwestTransport { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_form(
        &self,
        url: &str,
        fields: &[(String, String)],
    ) -> Result<serde_json::Value, TransportError> {
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name.clone(), value.clone());
        }

        let response = self
            .client
            .post(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;
        tracing::trace!(status = %status, bytes = body_text.len(), "anypay response received");

        if status.is_success() {
            Ok(serde_json::from_str(&body_text)?)
        } else {
            // Пытаемся распарсить как ошибку API
            Err(TransportError::Status {
                status: status.as_u16(),
                body: serde_json::from_str(&body_text).ok(),
            })
        }
    }
}
