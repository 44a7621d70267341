use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{NOTIFICATION_IPS, PaymentStatus};

// Поля уведомления, которые участвуют в подписи
pub const SIGNED_NOTIFICATION_FIELDS: [&str; 5] =
    ["currency", "amount", "pay_id", "merchant_id", "status"];

/// Уведомление о платеже, полученное от Anypay.
///
/// Хранится как есть: набор полей произвольный, проверяются только поля подписи.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Notification {
    fields: Map<String, Value>,
}

impl Notification {
    /// Собирает уведомление из пар ключ-значение (например, из тела `application/x-www-form-urlencoded`).
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        Notification { fields }
    }

    /// Принимает JSON объект. Для любого другого значения получается пустое уведомление,
    /// которое никогда не пройдет проверку.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Notification { fields },
            _ => Notification::default(),
        }
    }

    /// Значение поля в виде строки. Строки берутся как есть, числа в их JSON записи.
    /// Пустая строка, null, bool, массивы и объекты считаются отсутствующим полем.
    pub fn field(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn pay_id(&self) -> Option<String> {
        self.field("pay_id")
    }

    pub fn transaction_id(&self) -> Option<String> {
        self.field("transaction_id")
    }

    pub fn amount(&self) -> Option<String> {
        self.field("amount")
    }

    pub fn profit(&self) -> Option<String> {
        self.field("profit")
    }

    pub fn sign(&self) -> Option<String> {
        self.field("sign")
    }

    pub fn status(&self) -> Option<PaymentStatus> {
        self.field("status").and_then(|s| PaymentStatus::parse(&s))
    }

    // test=1 для тестовых платежей
    pub fn is_test(&self) -> bool {
        matches!(self.field("test").as_deref(), Some("1"))
    }
}

impl From<Map<String, Value>> for Notification {
    fn from(fields: Map<String, Value>) -> Self {
        Notification { fields }
    }
}

/// Список IP адресов, с которых принимаются уведомления.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationIps {
    ips: Vec<IpAddr>,
}

impl Default for NotificationIps {
    fn default() -> Self {
        NotificationIps {
            ips: NOTIFICATION_IPS
                .iter()
                .filter_map(|ip| ip.parse().ok())
                .collect(),
        }
    }
}

impl NotificationIps {
    pub fn new<I: IntoIterator<Item = IpAddr>>(ips: I) -> Self {
        NotificationIps {
            ips: ips.into_iter().collect(),
        }
    }

    /// Разбирает результат метода `ip-notification`: `{"ip": ["185.162.128.38", ...]}`.
    /// Некорректные адреса пропускаются.
    pub fn from_api_result(result: &Value) -> Option<Self> {
        let list = result.get("ip")?.as_array()?;
        Some(NotificationIps {
            ips: list
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|ip| ip.trim().parse().ok())
                .collect(),
        })
    }

    /// Адрес из списка? IPv4-mapped IPv6 (`::ffff:a.b.c.d`) сравнивается как IPv4.
    /// Нераспознанный адрес не допускается.
    pub fn contains(&self, source_ip: &str) -> bool {
        let Ok(ip) = source_ip.trim().parse::<IpAddr>() else {
            return false;
        };
        let ip = match ip {
            IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
            v4 => v4,
        };
        self.ips.contains(&ip)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IpAddr> {
        self.ips.iter()
    }
}
