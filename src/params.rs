use serde::{Deserialize, Serialize};

// --- Параметры запросов к API ---

/// Упорядоченный набор полей запроса. Пустые (None) значения не попадают в набор,
/// повторная установка ключа заменяет значение на прежнем месте.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiParams {
    fields: Vec<(String, String)>,
}

impl ApiParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn set_opt(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_fields(self) -> Vec<(String, String)> {
        self.fields
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ApiParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ApiParams::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

// Запрос на создание платежа через API
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CreatePaymentRequest {
    pub pay_id: String,
    pub amount: String, // Сумма строкой ("100.00")
    pub currency: String,
    pub desc: String,
    pub email: String,
    pub method: String, // Способ оплаты ("card", "sbp", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_currency: Option<String>, // Валюта способа оплаты (для криптовалют)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>, // По умолчанию "ru"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom: Vec<(String, String)>, // Дополнительные поля, передаются как есть
}

// Фильтр списка платежей
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PaymentsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>, // По умолчанию 0
}

// Запрос на создание выплаты
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CreatePayoutRequest {
    pub payout_id: String,
    pub payout_type: String, // "card", "sbp", "ym", ...
    pub amount: String,
    pub wallet: String, // Номер карты, кошелька или телефона
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_bank: Option<String>, // Банк получателя для СБП
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_type: Option<String>, // "payment" или "balance"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_url: Option<String>, // URL для уведомлений о статусе выплаты
}

// Фильтр списка выплат
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PayoutsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}
