//! Подписи Anypay.
//!
//! Все подписи строятся одинаково: значения в фиксированном порядке склеиваются
//! через `:` и хешируются SHA-256 (hex в нижнем регистре). Различается только
//! набор и порядок полей. Отсутствующее поле занимает свою позицию пустой строкой.

use std::fmt;
use std::str::FromStr;

use md5::Md5;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::AnypayError;
use crate::params::ApiParams;

const SEPARATOR: &str = ":";

fn join<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(SEPARATOR)
}

/// SHA-256 от `parts.join(":")`.
pub fn hash<S: AsRef<str>>(parts: &[S]) -> String {
    hex::encode(Sha256::digest(join(parts).as_bytes()))
}

/// MD5 от `parts.join(":")`. Старый формат подписи, ни одна операция клиента его не использует.
pub fn hash_md5<S: AsRef<str>>(parts: &[S]) -> String {
    hex::encode(Md5::digest(join(parts).as_bytes()))
}

/// Точное сравнение подписей за постоянное время.
pub fn verify(expected: &str, supplied: &str) -> bool {
    if expected.len() != supplied.len() {
        return false;
    }
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}

// Подпись платежной формы:
// merchant_id:pay_id:amount:currency:desc:success_url:fail_url:secret_key
#[allow(clippy::too_many_arguments)]
pub fn payment_form_sign(
    merchant_id: &str,
    pay_id: &str,
    amount: &str,
    currency: &str,
    desc: &str,
    success_url: &str,
    fail_url: &str,
    secret_key: &str,
) -> String {
    hash(&[
        merchant_id,
        pay_id,
        amount,
        currency,
        desc,
        success_url,
        fail_url,
        secret_key,
    ])
}

// Подпись уведомления: currency:amount:pay_id:merchant_id:status:secret_key
pub fn notification_sign(
    currency: &str,
    amount: &str,
    pay_id: &str,
    merchant_id: &str,
    status: &str,
    secret_key: &str,
) -> String {
    hash(&[currency, amount, pay_id, merchant_id, status, secret_key])
}

/// Подпись запроса к API: `method:api_id:<поля метода>:api_key`.
pub fn api_request_sign(
    method: ApiMethod,
    params: &ApiParams,
    api_id: &str,
    api_key: &str,
) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(method.signed_fields().len() + 3);
    parts.push(method.as_str());
    parts.push(api_id);
    for field in method.signed_fields() {
        parts.push(params.get(field).unwrap_or(""));
    }
    parts.push(api_key);
    hash(&parts)
}

// --- Методы API ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    Balance,
    Rates,
    Commissions,
    CreatePayment,
    Payments,
    CreatePayout,
    Payouts,
    IpNotification,
}

struct MethodSpec {
    method: ApiMethod,
    name: &'static str,
    signed_fields: &'static [&'static str],
}

// Порядок строк совпадает с порядком вариантов ApiMethod.
static METHOD_TABLE: [MethodSpec; 8] = [
    MethodSpec {
        method: ApiMethod::Balance,
        name: "balance",
        signed_fields: &[],
    },
    MethodSpec {
        method: ApiMethod::Rates,
        name: "rates",
        signed_fields: &[],
    },
    MethodSpec {
        method: ApiMethod::Commissions,
        name: "commissions",
        signed_fields: &["project_id"],
    },
    MethodSpec {
        method: ApiMethod::CreatePayment,
        name: "create-payment",
        signed_fields: &["project_id", "pay_id", "amount", "currency", "desc", "method"],
    },
    MethodSpec {
        method: ApiMethod::Payments,
        name: "payments",
        signed_fields: &["project_id"],
    },
    MethodSpec {
        method: ApiMethod::CreatePayout,
        name: "create-payout",
        signed_fields: &["payout_id", "payout_type", "amount", "wallet"],
    },
    MethodSpec {
        method: ApiMethod::Payouts,
        name: "payouts",
        signed_fields: &[],
    },
    MethodSpec {
        method: ApiMethod::IpNotification,
        name: "ip-notification",
        signed_fields: &[],
    },
];

impl ApiMethod {
    pub const ALL: [ApiMethod; 8] = [
        ApiMethod::Balance,
        ApiMethod::Rates,
        ApiMethod::Commissions,
        ApiMethod::CreatePayment,
        ApiMethod::Payments,
        ApiMethod::CreatePayout,
        ApiMethod::Payouts,
        ApiMethod::IpNotification,
    ];

    fn spec(self) -> &'static MethodSpec {
        &METHOD_TABLE[self as usize]
    }

    /// Имя метода в URL и в подписи.
    pub fn as_str(self) -> &'static str {
        self.spec().name
    }

    /// Поля запроса, входящие в подпись, в порядке подписи.
    pub fn signed_fields(self) -> &'static [&'static str] {
        self.spec().signed_fields
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiMethod {
    type Err = AnypayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        METHOD_TABLE
            .iter()
            .find(|spec| spec.name == s)
            .map(|spec| spec.method)
            .ok_or_else(|| AnypayError::UnknownMethod(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sha256_hex(input: &str) -> String {
        hex::encode(Sha256::digest(input.as_bytes()))
    }

    #[test]
    fn known_vectors() {
        assert_eq!(
            hash(&["abc"]),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_md5(&["abc"]), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(hash(&["a", "b"]), sha256_hex("a:b"));
        assert_eq!(hash(&["", "b", ""]), sha256_hex(":b:"));
        assert_eq!(join::<&str>(&[]), "");
    }

    #[test]
    fn payment_form_sign_keeps_empty_slots() {
        let sign = payment_form_sign("1399", "12345", "100.00", "RUB", "", "", "", "S");
        assert_eq!(sign, sha256_hex("1399:12345:100.00:RUB::::S"));
    }

    #[test]
    fn notification_sign_order() {
        let sign = notification_sign("RUB", "100.00", "12345", "1399", "paid", "S");
        assert_eq!(sign, sha256_hex("RUB:100.00:12345:1399:paid:S"));
    }

    #[test]
    fn api_sign_without_fields() {
        let sign = api_request_sign(ApiMethod::Balance, &ApiParams::new(), "API1", "KEY");
        assert_eq!(sign, sha256_hex("balance:API1:KEY"));
    }

    #[test]
    fn api_sign_create_payment_is_colon_joined() {
        let params = ApiParams::new()
            .with("project_id", "1399")
            .with("pay_id", "7")
            .with("amount", "10.00")
            .with("currency", "RUB")
            .with("desc", "Order")
            .with("email", "a@b.c")
            .with("method", "card");
        let sign = api_request_sign(ApiMethod::CreatePayment, &params, "API1", "KEY");
        assert_eq!(
            sign,
            sha256_hex("create-payment:API1:1399:7:10.00:RUB:Order:card:KEY")
        );
    }

    #[test]
    fn api_sign_missing_field_is_empty_slot() {
        let params = ApiParams::new()
            .with("payout_id", "10")
            .with("payout_type", "card")
            .with("wallet", "4000");
        let sign = api_request_sign(ApiMethod::CreatePayout, &params, "API1", "KEY");
        assert_eq!(sign, sha256_hex("create-payout:API1:10:card::4000:KEY"));
    }

    #[test]
    fn unsigned_params_do_not_affect_sign() {
        let base = ApiParams::new().with("project_id", "1399");
        let extended = base.clone().with("offset", "20").with("pay_id", "5");
        assert_eq!(
            api_request_sign(ApiMethod::Payments, &base, "A", "K"),
            api_request_sign(ApiMethod::Payments, &extended, "A", "K")
        );
    }

    #[test]
    fn method_table_matches_variants() {
        for method in ApiMethod::ALL {
            assert_eq!(method.spec().method, method);
            assert_eq!(method.as_str().parse::<ApiMethod>().unwrap(), method);
        }
    }

    #[test]
    fn unknown_method_name() {
        let err = "not-a-real-method".parse::<ApiMethod>().unwrap_err();
        assert!(matches!(err, AnypayError::UnknownMethod(name) if name == "not-a-real-method"));
    }

    #[test]
    fn verify_is_exact() {
        let sign = hash(&["x"]);
        assert!(verify(&sign, &sign));
        assert!(!verify(&sign, &sign.to_uppercase()));
        assert!(!verify(&sign, &sign[..10]));
        assert!(!verify(&sign, ""));
    }

    fn field() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9._@/-]{0,12}"
    }

    proptest! {
        #[test]
        fn hash_is_deterministic(parts in proptest::collection::vec(field(), 1..8)) {
            prop_assert_eq!(hash(&parts), hash(&parts.clone()));
            prop_assert_eq!(hash(&parts).len(), 64);
        }

        #[test]
        fn changing_one_field_changes_hash(
            parts in proptest::collection::vec(field(), 1..8),
            index in any::<proptest::sample::Index>(),
            replacement in field(),
        ) {
            let i = index.index(parts.len());
            prop_assume!(parts[i] != replacement);
            let mut changed = parts.clone();
            changed[i] = replacement;
            prop_assert_ne!(hash(&parts), hash(&changed));
        }

        #[test]
        fn swapping_fields_changes_hash(
            parts in proptest::collection::vec(field(), 2..8),
            a in any::<proptest::sample::Index>(),
            b in any::<proptest::sample::Index>(),
        ) {
            let (i, j) = (a.index(parts.len()), b.index(parts.len()));
            prop_assume!(parts[i] != parts[j]);
            let mut swapped = parts.clone();
            swapped.swap(i, j);
            prop_assert_ne!(hash(&parts), hash(&swapped));
        }

        #[test]
        fn notification_sign_matches_generic_hash(
            currency in field(), amount in field(), pay_id in field(),
            merchant_id in field(), status in field(), secret in field(),
        ) {
            prop_assert_eq!(
                notification_sign(&currency, &amount, &pay_id, &merchant_id, &status, &secret),
                hash(&[&currency, &amount, &pay_id, &merchant_id, &status, &secret])
            );
        }
    }
}
