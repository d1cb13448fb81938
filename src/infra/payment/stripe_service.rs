use crate::domain::ports::{CreateSessionParams, PaymentService, PaymentSession};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::error;

const API_BASE: &str = "https://api.stripe.com/v1";

pub struct StripeCheckoutService {
    client: Client,
    secret_key: String,
    return_url: String,
}

impl StripeCheckoutService {
    pub fn new(secret_key: String, return_url: String) -> Self {
        Self {
            client: Client::new(),
            secret_key,
            return_url,
        }
    }
}

#[derive(Deserialize)]
struct StripeSession {
    id: String,
    client_secret: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    payment_status: Option<String>,
    #[serde(default)]
    payment_intent: Option<serde_json::Value>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    amount_total: Option<i64>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

impl StripeSession {
    fn into_session(self) -> PaymentSession {
        // Expanded responses carry the intent as an object; unexpanded as an id string.
        let payment_intent = self.payment_intent.and_then(|v| match v {
            serde_json::Value::String(id) => Some(id),
            serde_json::Value::Object(obj) => obj.get("id").and_then(|id| id.as_str().map(String::from)),
            _ => None,
        });

        PaymentSession {
            id: self.id,
            client_secret: self.client_secret,
            status: self.status.unwrap_or_default(),
            payment_status: self.payment_status.unwrap_or_default(),
            payment_intent,
            currency: self.currency.unwrap_or_default(),
            amount_total: self.amount_total.unwrap_or(0),
            metadata: self.metadata,
        }
    }
}

#[async_trait]
impl PaymentService for StripeCheckoutService {
    async fn create_session(&self, params: CreateSessionParams) -> Result<PaymentSession, AppError> {
        let mut form: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("ui_mode".to_string(), "embedded".to_string()),
            ("return_url".to_string(), self.return_url.clone()),
            ("customer_email".to_string(), params.customer_email),
        ];

        for (i, item) in params.line_items.iter().enumerate() {
            form.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
            form.push((format!("line_items[{i}][price_data][currency]"), params.currency.clone()));
            form.push((format!("line_items[{i}][price_data][unit_amount]"), item.unit_amount.to_string()));
            form.push((format!("line_items[{i}][price_data][product_data][name]"), item.name.clone()));
        }

        for (key, value) in &params.metadata {
            form.push((format!("metadata[{key}]"), value.clone()));
        }

        let res = self.client
            .post(format!("{API_BASE}/checkout/sessions"))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Payment provider connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Payment session creation failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        let session: StripeSession = res.json().await.map_err(|e| {
            AppError::InternalWithMsg(format!("Invalid payment provider response: {}", e))
        })?;

        Ok(session.into_session())
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<PaymentSession, AppError> {
        let res = self.client
            .get(format!("{API_BASE}/checkout/sessions/{session_id}"))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Payment provider connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Payment session lookup failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        let session: StripeSession = res.json().await.map_err(|e| {
            AppError::InternalWithMsg(format!("Invalid payment provider response: {}", e))
        })?;

        Ok(session.into_session())
    }
}
