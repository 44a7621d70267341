use std::net::IpAddr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::constants::{ANYPAY_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::AnypayError;
use crate::notification::NotificationIps;

const ENV_MERCHANT_ID: &str = "ANYPAY_MERCHANT_ID";
const ENV_SECRET_KEY: &str = "ANYPAY_SECRET_KEY";
const ENV_API_ID: &str = "ANYPAY_API_ID";
const ENV_API_KEY: &str = "ANYPAY_API_KEY";
const ENV_BASE_URL: &str = "ANYPAY_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "ANYPAY_TIMEOUT_SECS";

/// Учетные данные мерчанта.
///
/// `secret_key` подписывает платежные формы и уведомления, `api_key` подписывает
/// запросы к API, `api_id` идентифицирует аккаунт в URL методов API.
#[derive(Debug)]
pub struct Credentials {
    merchant_id: String,
    secret_key: SecretString,
    api_id: String,
    api_key: SecretString,
}

impl Credentials {
    /// Проверяет, что все четыре поля заполнены.
    pub fn new(
        merchant_id: impl Into<String>,
        secret_key: impl Into<String>,
        api_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, AnypayError> {
        let merchant_id = required(merchant_id.into(), "merchant_id")?;
        let secret_key = required(secret_key.into(), "secret_key")?;
        let api_id = required(api_id.into(), "api_id")?;
        let api_key = required(api_key.into(), "api_key")?;
        Ok(Credentials {
            merchant_id,
            secret_key: SecretString::new(secret_key),
            api_id,
            api_key: SecretString::new(api_key),
        })
    }

    /// Читает `ANYPAY_MERCHANT_ID`, `ANYPAY_SECRET_KEY`, `ANYPAY_API_ID`, `ANYPAY_API_KEY`
    /// (с учетом `.env`).
    pub fn from_env() -> Result<Self, AnypayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, AnypayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Credentials::new(
            lookup(ENV_MERCHANT_ID).unwrap_or_default(),
            lookup(ENV_SECRET_KEY).unwrap_or_default(),
            lookup(ENV_API_ID).unwrap_or_default(),
            lookup(ENV_API_KEY).unwrap_or_default(),
        )
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn api_id(&self) -> &str {
        &self.api_id
    }

    pub(crate) fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

fn required(value: String, name: &'static str) -> Result<String, AnypayError> {
    if value.trim().is_empty() {
        return Err(AnypayError::MissingConfiguration(name));
    }
    Ok(value)
}

/// Настройки клиента, не относящиеся к учетным данным.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub notification_ips: NotificationIps,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: Url::parse(ANYPAY_BASE_URL).expect("ANYPAY_BASE_URL - корректный URL"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            notification_ips: NotificationIps::default(),
        }
    }
}

impl ClientConfig {
    /// Устанавливает кастомный базовый URL (для тестирования или прокси).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, AnypayError> {
        self.base_url = Url::parse(base_url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Заменяет список IP адресов, с которых принимаются уведомления.
    pub fn with_notification_ips<I: IntoIterator<Item = IpAddr>>(mut self, ips: I) -> Self {
        self.notification_ips = NotificationIps::new(ips);
        self
    }

    /// Читает `ANYPAY_BASE_URL` и `ANYPAY_TIMEOUT_SECS`, если они заданы.
    pub fn from_env() -> Result<Self, AnypayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, AnypayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ClientConfig::default();
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|s| !s.is_empty()) {
            config = config.with_base_url(&base_url)?;
        }
        match lookup(ENV_TIMEOUT_SECS).map(|s| s.parse::<u64>()) {
            Some(Ok(secs)) => config.timeout = Duration::from_secs(secs),
            Some(Err(_)) => {
                tracing::warn!(
                    var = ENV_TIMEOUT_SECS,
                    "invalid timeout value, using default"
                );
            }
            None => {}
        }
        Ok(config)
    }

    /// `{base_url}/merchant` — адрес платежной формы.
    pub fn merchant_url(&self) -> String {
        format!("{}{}", self.base(), crate::constants::MERCHANT_PATH)
    }

    /// `{base_url}/api/{method}/{api_id}`.
    pub fn api_url(&self, method: &str, api_id: &str) -> String {
        format!(
            "{}{}/{}/{}",
            self.base(),
            crate::constants::API_PATH_PREFIX,
            method,
            api_id
        )
    }

    fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_fields_are_named() {
        let cases = [
            (Credentials::new("", "s", "a", "k"), "merchant_id"),
            (Credentials::new("m", "", "a", "k"), "secret_key"),
            (Credentials::new("m", "s", "", "k"), "api_id"),
            (Credentials::new("m", "s", "a", " "), "api_key"),
        ];
        for (result, field) in cases {
            match result {
                Err(AnypayError::MissingConfiguration(name)) => assert_eq!(name, field),
                other => panic!("expected MissingConfiguration({field}), got {other:?}"),
            }
        }
    }

    #[test]
    fn debug_hides_secrets() {
        let creds = Credentials::new("1399", "top-secret", "api", "api-secret").unwrap();
        let printed = format!("{creds:?}");
        assert!(printed.contains("1399"));
        assert!(!printed.contains("top-secret"));
        assert!(!printed.contains("api-secret"));
    }

    #[test]
    fn credentials_from_lookup() {
        let creds = Credentials::from_lookup(env(&[
            ("ANYPAY_MERCHANT_ID", "1399"),
            ("ANYPAY_SECRET_KEY", "S"),
            ("ANYPAY_API_ID", "API1"),
            ("ANYPAY_API_KEY", "K"),
        ]))
        .unwrap();
        assert_eq!(creds.merchant_id(), "1399");
        assert_eq!(creds.api_id(), "API1");
        assert_eq!(creds.secret_key(), "S");
        assert_eq!(creds.api_key(), "K");

        let err = Credentials::from_lookup(env(&[("ANYPAY_MERCHANT_ID", "1399")])).unwrap_err();
        assert!(matches!(err, AnypayError::MissingConfiguration("secret_key")));
    }

    #[test]
    fn urls() {
        let config = ClientConfig::default();
        assert_eq!(config.merchant_url(), "https://anypay.io/merchant");
        assert_eq!(
            config.api_url("create-payment", "API1"),
            "https://anypay.io/api/create-payment/API1"
        );

        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:8080/")
            .unwrap();
        assert_eq!(config.api_url("balance", "X"), "http://127.0.0.1:8080/api/balance/X");
    }

    #[test]
    fn config_from_lookup() {
        let config = ClientConfig::from_lookup(env(&[
            ("ANYPAY_BASE_URL", "http://localhost:9000"),
            ("ANYPAY_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:9000/");
        assert_eq!(config.timeout, Duration::from_secs(5));

        let err = ClientConfig::from_lookup(env(&[("ANYPAY_BASE_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, AnypayError::UrlParse(_)));
    }
}
