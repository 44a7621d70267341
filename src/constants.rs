use serde::{Deserialize, Serialize};

// --- Адреса шлюза ---
pub const ANYPAY_BASE_URL: &str = "https://anypay.io";
pub const MERCHANT_PATH: &str = "/merchant";
pub const API_PATH_PREFIX: &str = "/api";

/// Язык платежной формы по умолчанию.
pub const DEFAULT_LANG: &str = "ru";

/// Таймаут HTTP запросов по умолчанию (секунды).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// IP адреса, с которых Anypay отправляет уведомления о платежах.
/// Актуальный список можно получить методом `ip-notification`.
pub const NOTIFICATION_IPS: [&str; 3] = ["185.162.128.38", "185.162.128.39", "185.162.128.88"];

// --- Справочники ---

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Rub,
    Uah,
    Byn,
    Kzt,
    Usd,
    Eur,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Rub => "RUB",
            Currency::Uah => "UAH",
            Currency::Byn => "BYN",
            Currency::Kzt => "KZT",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }
}

// Способ оплаты
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Sberbank,
    Sbp,
    Ym,
    Wm,
    Advcash,
    Pm,
    Applepay,
    Googlepay,
    Samsungpay,
    Payeer,
    Btc,
    Eth,
    Bch,
    Ltc,
    Dash,
    Zec,
    Doge,
    Usdt,
    Ton,
    Mts,
    Megafon,
    Beeline,
    Tele2,
    Term,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Sberbank => "sberbank",
            PaymentMethod::Sbp => "sbp",
            PaymentMethod::Ym => "ym",
            PaymentMethod::Wm => "wm",
            PaymentMethod::Advcash => "advcash",
            PaymentMethod::Pm => "pm",
            PaymentMethod::Applepay => "applepay",
            PaymentMethod::Googlepay => "googlepay",
            PaymentMethod::Samsungpay => "samsungpay",
            PaymentMethod::Payeer => "payeer",
            PaymentMethod::Btc => "btc",
            PaymentMethod::Eth => "eth",
            PaymentMethod::Bch => "bch",
            PaymentMethod::Ltc => "ltc",
            PaymentMethod::Dash => "dash",
            PaymentMethod::Zec => "zec",
            PaymentMethod::Doge => "doge",
            PaymentMethod::Usdt => "usdt",
            PaymentMethod::Ton => "ton",
            PaymentMethod::Mts => "mts",
            PaymentMethod::Megafon => "megafon",
            PaymentMethod::Beeline => "beeline",
            PaymentMethod::Tele2 => "tele2",
            PaymentMethod::Term => "term",
        }
    }
}

// Статус платежа (поле `status` в уведомлениях и списке платежей)
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    Paid,
    PartiallyPaid,
    Waiting,
    Refund,
    Canceled,
    Expired,
    Error,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::PartiallyPaid => "partially-paid",
            PaymentStatus::Waiting => "waiting",
            PaymentStatus::Refund => "refund",
            PaymentStatus::Canceled => "canceled",
            PaymentStatus::Expired => "expired",
            PaymentStatus::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paid" => Some(PaymentStatus::Paid),
            "partially-paid" => Some(PaymentStatus::PartiallyPaid),
            "waiting" => Some(PaymentStatus::Waiting),
            "refund" => Some(PaymentStatus::Refund),
            "canceled" => Some(PaymentStatus::Canceled),
            "expired" => Some(PaymentStatus::Expired),
            "error" => Some(PaymentStatus::Error),
            _ => None,
        }
    }
}

// Тип выплаты
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PayoutType {
    Card,
    Sbp,
    Ym,
    Usdt,
    Wm,
    Mp,
}

impl PayoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutType::Card => "card",
            PayoutType::Sbp => "sbp",
            PayoutType::Ym => "ym",
            PayoutType::Usdt => "usdt",
            PayoutType::Wm => "wm",
            PayoutType::Mp => "mp",
        }
    }
}

// Откуда списывается комиссия за выплату
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommissionType {
    Payment,
    Balance,
}

impl CommissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommissionType::Payment => "payment",
            CommissionType::Balance => "balance",
        }
    }
}
