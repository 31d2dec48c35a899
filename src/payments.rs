// src/payments.rs
//! Razorpay order creation and payment-signature verification. Unlike the
//! content pipeline, payment failures are always hard errors.

use anyhow::{Context, Result};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

const ORDERS_PATH: &str = "/v1/orders";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CURRENCY: &str = "INR";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("payment service is not configured")]
    NotConfigured,
    #[error("could not reach payment gateway: {0}")]
    Network(String),
    #[error("payment gateway returned status {status}: {message}")]
    Gateway { status: u16, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: String,
}

pub struct PaymentGateway {
    client: reqwest::Client,
    key_id: Option<String>,
    key_secret: Option<String>,
    base_url: String,
}

impl PaymentGateway {
    pub fn new(
        key_id: Option<String>,
        key_secret: Option<String>,
        base_url: String,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            key_id: key_id.filter(|k| !k.is_empty()),
            key_secret: key_secret.filter(|k| !k.is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.key_id.is_some() && self.key_secret.is_some()
    }

    /// Create an order for `amount` in the smallest currency unit.
    pub async fn create_order(
        &self,
        amount: i64,
        currency: Option<&str>,
    ) -> Result<Order, PaymentError> {
        let (key_id, key_secret) = match (&self.key_id, &self.key_secret) {
            (Some(id), Some(secret)) => (id, secret),
            _ => return Err(PaymentError::NotConfigured),
        };

        let body = CreateOrderBody {
            amount,
            currency: currency.unwrap_or(DEFAULT_CURRENCY),
            receipt: format!("rcpt_{}", Uuid::new_v4().simple()),
        };

        let url = format!("{}{}", self.base_url, ORDERS_PATH);
        info!("Creating payment order for amount {}", amount);

        let response = self
            .client
            .post(&url)
            .basic_auth(key_id, Some(key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Payment gateway error {}: {}", status, message);
            return Err(PaymentError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<Order>().await.map_err(|e| {
            error!("Failed to parse order response: {}", e);
            PaymentError::Gateway {
                status: status.as_u16(),
                message: "Unexpected order response shape".to_string(),
            }
        })
    }

    /// Verify a payment signature against the configured key secret.
    pub fn verify_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, PaymentError> {
        let key_secret = self
            .key_secret
            .as_deref()
            .ok_or(PaymentError::NotConfigured)?;
        Ok(verify_signature(order_id, payment_id, signature, key_secret))
    }
}

/// HMAC-SHA256 over `"{order_id}|{payment_id}"`, hex digest compared to the
/// client-supplied signature in constant time.
pub fn verify_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    key_secret: &str,
) -> bool {
    let mut mac = match HmacSha256::new_from_slice(key_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());

    let provided = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    mac.verify_slice(&provided).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(order_id: &str, payment_id: &str, secret: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_verifies() {
        let signature = sign("o1", "p1", "s");
        assert!(verify_signature("o1", "p1", &signature, "s"));
    }

    #[test]
    fn test_any_single_character_mutation_fails() {
        let signature = sign("o1", "p1", "s");
        for i in 0..signature.len() {
            let mut mutated: Vec<char> = signature.chars().collect();
            mutated[i] = if mutated[i] == '0' { '1' } else { '0' };
            let mutated: String = mutated.into_iter().collect();
            assert!(
                !verify_signature("o1", "p1", &mutated, "s"),
                "mutation at index {} should fail",
                i
            );
        }
    }

    #[test]
    fn test_wrong_ids_or_secret_fail() {
        let signature = sign("o1", "p1", "s");
        assert!(!verify_signature("o2", "p1", &signature, "s"));
        assert!(!verify_signature("o1", "p2", &signature, "s"));
        assert!(!verify_signature("o1", "p1", &signature, "other"));
    }

    #[test]
    fn test_non_hex_signature_fails() {
        assert!(!verify_signature("o1", "p1", "not-hex-at-all", "s"));
        assert!(!verify_signature("o1", "p1", "", "s"));
    }

    #[test]
    fn test_gateway_configuration() {
        let gateway = PaymentGateway::new(None, None, "https://api.example.com".into()).unwrap();
        assert!(!gateway.is_configured());
        assert!(matches!(
            gateway.verify_payment("o1", "p1", "aa"),
            Err(PaymentError::NotConfigured)
        ));

        let gateway = PaymentGateway::new(
            Some("key".into()),
            Some("secret".into()),
            "https://api.example.com".into(),
        )
        .unwrap();
        assert!(gateway.is_configured());
    }
}
