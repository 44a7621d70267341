use serde::{Deserialize, Serialize};

// Запрос на платежную форму
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PaymentFormRequest {
    pub pay_id: String,   // Номер заказа в магазине
    pub amount: String,   // Сумма строкой ("100.00")
    pub currency: String, // Код валюты ("RUB")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>, // По умолчанию "ru"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom: Vec<(String, String)>, // Добавляются после подписи и в нее не входят
}

impl PaymentFormRequest {
    pub fn new(
        pay_id: impl Into<String>,
        amount: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        PaymentFormRequest {
            pay_id: pay_id.into(),
            amount: amount.into(),
            currency: currency.into(),
            ..Default::default()
        }
    }
}

/// Поля платежной формы в том порядке, в котором они отправляются.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentForm {
    fields: Vec<(String, String)>,
}

impl PaymentForm {
    pub(crate) fn push(&mut self, name: &str, value: &str) {
        self.fields.push((name.to_string(), value.to_string()));
    }

    /// Поле с существующим именем получает новое значение на своем месте.
    pub(crate) fn merge(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.push(name, value),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn sign(&self) -> Option<&str> {
        self.get("sign")
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<(String, String)> {
        self.fields
    }
}

/// Экранирует спецсимволы HTML для подстановки в значение атрибута.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// HTML форма оплаты: скрытое поле на каждое поле формы и кнопка отправки.
pub fn render_payment_form(action: &str, form: &PaymentForm) -> String {
    let mut html = String::new();
    html.push_str(&format!(
        "<form action=\"{}\" accept-charset=\"utf-8\" method=\"post\">\n",
        html_escape(action)
    ));
    for (name, value) in form.fields() {
        html.push_str(&format!(
            "<input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
            html_escape(name),
            html_escape(value)
        ));
    }
    html.push_str("<input type=\"submit\" value=\"Оплатить\">\n</form>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PaymentForm {
        let mut form = PaymentForm::default();
        form.push("pay_id", "12345");
        form.push("desc", "Чай & <кофе> \"лучший\"");
        form.push("sign", "abc");
        form
    }

    #[test]
    fn html_escape_escapes_special_chars() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn attribute_value_cannot_break_out() {
        let mut form = PaymentForm::default();
        form.push("desc", "\"><script>alert(1)</script>");
        let html = render_payment_form("https://anypay.io/merchant", &form);
        assert!(html.contains(
            "name=\"desc\" value=\"&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;\""
        ));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn renders_fields_in_order() {
        let html = render_payment_form("https://anypay.io/merchant", &sample());
        assert!(html.starts_with(
            "<form action=\"https://anypay.io/merchant\" accept-charset=\"utf-8\" method=\"post\">"
        ));
        let pay_id = html.find("name=\"pay_id\" value=\"12345\"").unwrap();
        let desc = html
            .find("name=\"desc\" value=\"Чай &amp; &lt;кофе&gt; &quot;лучший&quot;\"")
            .unwrap();
        let sign = html.find("name=\"sign\" value=\"abc\"").unwrap();
        assert!(pay_id < desc && desc < sign);
        assert!(html.contains("type=\"submit\""));
        assert!(html.trim_end().ends_with("</form>"));
    }

    #[test]
    fn merge_overwrites_in_place() {
        let mut form = sample();
        form.merge("pay_id", "999");
        form.merge("order_ref", "A-1");
        assert_eq!(form.fields()[0], ("pay_id".to_string(), "999".to_string()));
        assert_eq!(form.fields().last().unwrap().0, "order_ref");
        assert_eq!(form.sign(), Some("abc"));
    }
}
