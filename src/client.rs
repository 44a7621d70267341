use std::sync::Arc;

use serde_json::Value;

use crate::config::{ClientConfig, Credentials};
use crate::constants::DEFAULT_LANG;
use crate::error::{AnypayError, ApiErrorBody, TransportError};
use crate::form::{PaymentForm, PaymentFormRequest, render_payment_form};
use crate::notification::Notification;
use crate::params::{
    ApiParams, CreatePaymentRequest, CreatePayoutRequest, PaymentsQuery, PayoutsQuery,
};
use crate::sign::{self, ApiMethod};
use crate::transport::{ReqwestTransport, Transport};

// Поля create-payment, которые нельзя задать через `custom`
const RESERVED_PAYMENT_FIELDS: [&str; 5] =
    ["sign", "phone", "method_currency", "success_url", "fail_url"];

// --- Клиент Anypay ---

#[derive(Clone)]
pub struct AnypayClient {
    credentials: Arc<Credentials>,
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for AnypayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnypayClient")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AnypayClient {
    /// Создает новый клиент Anypay API с настройками по умолчанию.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Учетные данные мерчанта.
    pub fn new(credentials: Credentials) -> Result<Self, AnypayError> {
        Self::with_config(credentials, ClientConfig::default())
    }

    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self, AnypayError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(credentials, config, Arc::new(transport)))
    }

    /// Клиент со своим транспортом (моки в тестах, свой HTTP стек).
    pub fn with_transport(
        credentials: Credentials,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        AnypayClient {
            credentials: Arc::new(credentials),
            config,
            transport,
        }
    }

    /// Учетные данные и настройки из переменных окружения (`ANYPAY_*`, `.env`).
    pub fn from_env() -> Result<Self, AnypayError> {
        let credentials = Credentials::from_env()?;
        let config = ClientConfig::from_env()?;
        Self::with_config(credentials, config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn merchant_id(&self) -> &str {
        self.credentials.merchant_id()
    }

    // --- Платежная форма ---

    /// Поля платежной формы с подписью.
    ///
    /// Незаполненные необязательные поля отправляются пустыми, `lang` по умолчанию `"ru"`.
    /// Поля из `custom` добавляются после подписи.
    pub fn build_payment_form_data(
        &self,
        request: &PaymentFormRequest,
    ) -> Result<PaymentForm, AnypayError> {
        required(&request.pay_id, "pay_id")?;
        required(&request.amount, "amount")?;
        required(&request.currency, "currency")?;

        let desc = request.desc.as_deref().unwrap_or_default();
        let success_url = request.success_url.as_deref().unwrap_or_default();
        let fail_url = request.fail_url.as_deref().unwrap_or_default();
        let lang = request
            .lang
            .as_deref()
            .filter(|lang| !lang.is_empty())
            .unwrap_or(DEFAULT_LANG);

        let sign = sign::payment_form_sign(
            self.credentials.merchant_id(),
            &request.pay_id,
            &request.amount,
            &request.currency,
            desc,
            success_url,
            fail_url,
            self.credentials.secret_key(),
        );

        let mut form = PaymentForm::default();
        form.push("merchant_id", self.credentials.merchant_id());
        form.push("pay_id", &request.pay_id);
        form.push("amount", &request.amount);
        form.push("currency", &request.currency);
        form.push("desc", desc);
        form.push("success_url", success_url);
        form.push("fail_url", fail_url);
        form.push("email", request.email.as_deref().unwrap_or_default());
        form.push("phone", request.phone.as_deref().unwrap_or_default());
        form.push("method", request.method.as_deref().unwrap_or_default());
        form.push("lang", lang);
        form.push("sign", &sign);

        for (name, value) in &request.custom {
            form.merge(name, value);
        }

        Ok(form)
    }

    /// HTML форма, отправляющая пользователя на страницу оплаты Anypay.
    pub fn render_payment_form_html(
        &self,
        request: &PaymentFormRequest,
    ) -> Result<String, AnypayError> {
        let form = self.build_payment_form_data(request)?;
        Ok(render_payment_form(&self.config.merchant_url(), &form))
    }

    // --- Уведомления ---

    /// Проверяет уведомление о платеже.
    ///
    /// `true` только если `source_ip` входит в список адресов Anypay и подпись совпадает.
    /// Любая другая ситуация дает `false`, ошибок метод не возвращает.
    pub fn verify_notification(&self, notification: &Notification, source_ip: &str) -> bool {
        if !self.config.notification_ips.contains(source_ip) {
            tracing::warn!(source_ip = %source_ip, "notification rejected: address not allowed");
            return false;
        }
        self.verify_notification_sign(notification)
    }

    /// Проверяет только подпись уведомления, без проверки IP адреса.
    pub fn verify_notification_sign(&self, notification: &Notification) -> bool {
        let (Some(currency), Some(amount), Some(pay_id), Some(merchant_id), Some(status), Some(supplied)) = (
            notification.field("currency"),
            notification.field("amount"),
            notification.field("pay_id"),
            notification.field("merchant_id"),
            notification.field("status"),
            notification.sign(),
        ) else {
            tracing::warn!("notification rejected: required fields missing");
            return false;
        };

        let expected = sign::notification_sign(
            &currency,
            &amount,
            &pay_id,
            &merchant_id,
            &status,
            self.credentials.secret_key(),
        );

        let valid = sign::verify(&expected, &supplied);
        if !valid {
            tracing::warn!(pay_id = %pay_id, "notification rejected: signature mismatch");
        }
        valid
    }

    // --- Методы API ---

    /// Вызывает метод API по имени (`"balance"`, `"create-payment"`, ...).
    ///
    /// Неизвестное имя дает [`AnypayError::UnknownMethod`] до любого сетевого запроса.
    pub async fn call_api(&self, method: &str, params: ApiParams) -> Result<Value, AnypayError> {
        let method: ApiMethod = method.parse()?;
        self.call(method, params).await
    }

    /// Подписывает и отправляет запрос, возвращает `result` из ответа без изменений.
    pub async fn call(&self, method: ApiMethod, params: ApiParams) -> Result<Value, AnypayError> {
        let sign = sign::api_request_sign(
            method,
            &params,
            self.credentials.api_id(),
            self.credentials.api_key(),
        );
        let url = self.config.api_url(method.as_str(), self.credentials.api_id());

        let mut fields = Vec::with_capacity(params.len() + 1);
        fields.push(("sign".to_string(), sign));
        fields.extend(params.into_fields());

        tracing::debug!(method = %method, url = %url, fields = fields.len(), "anypay api request");

        let response = self.transport.post_form(&url, &fields).await;
        process_response(method, response)
    }

    /// Баланс аккаунта.
    pub async fn get_balance(&self) -> Result<Value, AnypayError> {
        self.call(ApiMethod::Balance, ApiParams::new()).await
    }

    /// Курсы обмена валют.
    pub async fn get_rates(&self) -> Result<Value, AnypayError> {
        self.call(ApiMethod::Rates, ApiParams::new()).await
    }

    /// Комиссии проекта по способам оплаты.
    pub async fn get_commissions(&self) -> Result<Value, AnypayError> {
        let params = ApiParams::new().with("project_id", self.credentials.merchant_id());
        self.call(ApiMethod::Commissions, params).await
    }

    /// Создает платеж через API.
    ///
    /// # Arguments
    ///
    /// * `request` - Данные платежа. `desc`, `email` и `method` обязательны.
    pub async fn create_payment(&self, request: &CreatePaymentRequest) -> Result<Value, AnypayError> {
        required(&request.pay_id, "pay_id")?;
        required(&request.amount, "amount")?;
        required(&request.currency, "currency")?;
        required(&request.desc, "desc")?;
        required(&request.email, "email")?;
        required(&request.method, "method")?;

        let mut params = ApiParams::new()
            .with("project_id", self.credentials.merchant_id())
            .with("pay_id", request.pay_id.as_str())
            .with("amount", request.amount.as_str())
            .with("currency", request.currency.as_str())
            .with("desc", request.desc.as_str())
            .with("email", request.email.as_str())
            .with("method", request.method.as_str());
        params.set_opt("phone", non_empty(&request.phone));
        params.set_opt("method_currency", non_empty(&request.method_currency));
        params.set_opt("success_url", non_empty(&request.success_url));
        params.set_opt("fail_url", non_empty(&request.fail_url));
        params.set("lang", non_empty(&request.lang).unwrap_or(DEFAULT_LANG));
        // Дополнительные поля не должны подменять стандартные и подписываемые поля
        for (name, value) in &request.custom {
            if params.get(name).is_some()
                || RESERVED_PAYMENT_FIELDS.contains(&name.as_str())
                || ApiMethod::CreatePayment.signed_fields().contains(&name.as_str())
            {
                tracing::warn!(field = %name, "custom field collides with a standard field, skipped");
                continue;
            }
            params.set(name.as_str(), value.as_str());
        }

        self.call(ApiMethod::CreatePayment, params).await
    }

    /// Список платежей проекта.
    pub async fn get_payments(&self, query: &PaymentsQuery) -> Result<Value, AnypayError> {
        let mut params = ApiParams::new().with("project_id", self.credentials.merchant_id());
        params.set_opt("trans_id", non_empty(&query.trans_id));
        params.set_opt("pay_id", non_empty(&query.pay_id));
        params.set("offset", query.offset.unwrap_or(0).to_string());
        self.call(ApiMethod::Payments, params).await
    }

    /// Создает выплату.
    pub async fn create_payout(&self, request: &CreatePayoutRequest) -> Result<Value, AnypayError> {
        required(&request.payout_id, "payout_id")?;
        required(&request.payout_type, "payout_type")?;
        required(&request.amount, "amount")?;
        required(&request.wallet, "wallet")?;

        let mut params = ApiParams::new()
            .with("payout_id", request.payout_id.as_str())
            .with("payout_type", request.payout_type.as_str())
            .with("amount", request.amount.as_str())
            .with("wallet", request.wallet.as_str());
        params.set_opt("wallet_currency", non_empty(&request.wallet_currency));
        params.set_opt("wallet_bank", non_empty(&request.wallet_bank));
        params.set_opt("commission_type", non_empty(&request.commission_type));
        params.set_opt("status_url", non_empty(&request.status_url));

        self.call(ApiMethod::CreatePayout, params).await
    }

    /// Список выплат.
    pub async fn get_payouts(&self, query: &PayoutsQuery) -> Result<Value, AnypayError> {
        let mut params = ApiParams::new();
        params.set_opt("trans_id", non_empty(&query.trans_id));
        params.set_opt("payout_id", non_empty(&query.payout_id));
        params.set("offset", query.offset.unwrap_or(0).to_string());
        self.call(ApiMethod::Payouts, params).await
    }

    /// IP адреса, с которых Anypay отправляет уведомления.
    pub async fn get_notification_ips(&self) -> Result<Value, AnypayError> {
        self.call(ApiMethod::IpNotification, ApiParams::new()).await
    }
}

// Разбор ответа: {"result": ...} или {"error": {"code", "message"}} при любом HTTP статусе
fn process_response(
    method: ApiMethod,
    response: Result<Value, TransportError>,
) -> Result<Value, AnypayError> {
    match response {
        Ok(mut body) => {
            if let Some(error) = ApiErrorBody::from_response(&body) {
                tracing::debug!(method = %method, code = error.code, "anypay api error");
                return Err(error.into());
            }
            Ok(body
                .as_object_mut()
                .and_then(|object| object.remove("result"))
                .unwrap_or(Value::Null))
        }
        Err(err) => {
            if let Some(error) = err.body().and_then(ApiErrorBody::from_response) {
                tracing::debug!(method = %method, code = error.code, "anypay api error");
                return Err(error.into());
            }
            tracing::debug!(method = %method, error = %err, "anypay transport failure");
            Err(err.into())
        }
    }
}

fn required(value: &str, name: &'static str) -> Result<(), AnypayError> {
    if value.trim().is_empty() {
        return Err(AnypayError::MissingConfiguration(name));
    }
    Ok(())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_is_passed_through() {
        let body = json!({"result": {"balance": 15023.66}});
        let result = process_response(ApiMethod::Balance, Ok(body)).unwrap();
        assert_eq!(result, json!({"balance": 15023.66}));
    }

    #[test]
    fn error_body_on_success_status() {
        let body = json!({"error": {"code": 4, "message": "bad signature"}});
        let err = process_response(ApiMethod::Balance, Ok(body)).unwrap_err();
        match err {
            AnypayError::Gateway { code, message } => {
                assert_eq!(code, 4);
                assert_eq!(message, "bad signature");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_body_on_http_error() {
        let err = process_response(
            ApiMethod::Rates,
            Err(TransportError::Status {
                status: 500,
                body: Some(json!({"error": {"code": 4, "message": "bad signature"}})),
            }),
        )
        .unwrap_err();
        assert!(matches!(err, AnypayError::Gateway { code: 4, .. }));
    }

    #[test]
    fn plain_http_error_is_transport() {
        let err = process_response(
            ApiMethod::Rates,
            Err(TransportError::Status {
                status: 502,
                body: None,
            }),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AnypayError::Transport(TransportError::Status { status: 502, .. })
        ));
    }

    #[test]
    fn body_without_result_is_null() {
        assert_eq!(
            process_response(ApiMethod::Balance, Ok(json!({}))).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn non_empty_filters_blank() {
        assert_eq!(non_empty(&Some(String::new())), None);
        assert_eq!(non_empty(&None), None);
        assert_eq!(non_empty(&Some("x".to_string())), Some("x"));
    }
}
