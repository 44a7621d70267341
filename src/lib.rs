//! Клиент платежного шлюза Anypay.
//!
//! * платежная форма с подписью ([`AnypayClient::build_payment_form_data`],
//!   [`AnypayClient::render_payment_form_html`]);
//! * проверка уведомлений о платежах ([`AnypayClient::verify_notification`]);
//! * методы API: баланс, курсы, комиссии, платежи, выплаты, IP адреса уведомлений.
//!
//! ```no_run
//! use anypay_rs::{AnypayClient, Credentials, PaymentFormRequest};
//!
//! # async fn run() -> Result<(), anypay_rs::AnypayError> {
//! let credentials = Credentials::new("1399", "secret", "api-id", "api-key")?;
//! let client = AnypayClient::new(credentials)?;
//!
//! let mut request = PaymentFormRequest::new("12345", "100.00", "RUB");
//! request.desc = Some("Заказ №12345".to_string());
//! let html = client.render_payment_form_html(&request)?;
//!
//! let balance = client.get_balance().await?;
//! # let _ = (html, balance);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod notification;
pub mod params;
pub mod sign;
pub mod transport;

pub use client::AnypayClient;
pub use config::{ClientConfig, Credentials};
pub use constants::{CommissionType, Currency, PaymentMethod, PaymentStatus, PayoutType};
pub use error::{AnypayError, ApiErrorBody, TransportError};
pub use form::{PaymentForm, PaymentFormRequest};
pub use notification::{Notification, NotificationIps};
pub use params::{ApiParams, CreatePaymentRequest, CreatePayoutRequest, PaymentsQuery, PayoutsQuery};
pub use sign::ApiMethod;
pub use transport::{ReqwestTransport, Transport};
