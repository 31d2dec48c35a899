// src/web/handlers/payment_handlers.rs - order creation and verification

use crate::payments::PaymentGateway;
use crate::storage::{OrderRecord, ResumeStore};
use crate::web::types::*;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

pub async fn create_order_handler(
    request: Json<CreateOrderRequest>,
    gateway: &State<PaymentGateway>,
    store: &State<Box<dyn ResumeStore>>,
) -> Result<Json<OrderResponse>, ApiError> {
    if request.amount <= 0 {
        return Err(api_error(
            Status::BadRequest,
            "Amount must be a positive integer in the smallest currency unit",
        ));
    }

    if !gateway.is_configured() {
        return Err(api_error(
            Status::BadRequest,
            "Payment service is not configured",
        ));
    }

    let order = match gateway
        .create_order(request.amount, request.currency.as_deref())
        .await
    {
        Ok(order) => order,
        Err(e) => {
            error!("Order creation failed: {}", e);
            return Err(payment_error(&e));
        }
    };

    let record = OrderRecord::created(&order.id, order.amount, &order.currency);
    if let Err(e) = store.record_order(record).await {
        // Gateway already holds the order; losing the local record is
        // recoverable, so log and still answer the client.
        warn!("Failed to record order {}: {}", order.id, e);
    }

    info!("Created order {} for amount {}", order.id, order.amount);
    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

pub async fn verify_payment_handler(
    request: Json<VerifyPaymentRequest>,
    gateway: &State<PaymentGateway>,
    store: &State<Box<dyn ResumeStore>>,
) -> Result<Json<VerifyResponse>, ApiError> {
    if request.order_id.trim().is_empty()
        || request.payment_id.trim().is_empty()
        || request.signature.trim().is_empty()
    {
        return Err(api_error(
            Status::BadRequest,
            "orderId, paymentId and signature are required",
        ));
    }

    let verified = match gateway.verify_payment(
        &request.order_id,
        &request.payment_id,
        &request.signature,
    ) {
        Ok(verified) => verified,
        Err(e) => {
            error!("Payment verification unavailable: {}", e);
            return Err(payment_error(&e));
        }
    };

    if !verified {
        warn!("Signature mismatch for order {}", request.order_id);
        return Err(api_error(Status::BadRequest, "Payment verification failed"));
    }

    match store
        .mark_order_paid(&request.order_id, &request.payment_id)
        .await
    {
        Ok(true) => info!("Order {} verified and marked paid", request.order_id),
        Ok(false) => warn!(
            "Verified payment for unknown order {}",
            request.order_id
        ),
        Err(e) => warn!("Failed to update order {}: {}", request.order_id, e),
    }

    Ok(Json(VerifyResponse {
        success: true,
        verified: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    fn gateway() -> PaymentGateway {
        PaymentGateway::new(
            Some("rzp_key".to_string()),
            Some("secret".to_string()),
            "https://api.example.com".to_string(),
        )
        .unwrap()
    }

    fn boxed_store() -> Box<dyn ResumeStore> {
        Box::new(MemoryStore::new())
    }

    fn sign(order_id: &str, payment_id: &str, secret: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let gateway = gateway();
        let store = boxed_store();

        let err = create_order_handler(
            Json(CreateOrderRequest {
                amount: 0,
                currency: None,
            }),
            rocket::State::from(&gateway),
            rocket::State::from(&store),
        )
        .await
        .err()
        .unwrap();

        assert_eq!(err.0, Status::BadRequest);
    }

    #[tokio::test]
    async fn test_create_order_without_keys_rejected() {
        let gateway =
            PaymentGateway::new(None, None, "https://api.example.com".to_string()).unwrap();
        let store = boxed_store();

        let err = create_order_handler(
            Json(CreateOrderRequest {
                amount: 49900,
                currency: None,
            }),
            rocket::State::from(&gateway),
            rocket::State::from(&store),
        )
        .await
        .err()
        .unwrap();

        assert_eq!(err.0, Status::BadRequest);
        assert_eq!(err.1.error, "Payment service is not configured");
    }

    #[tokio::test]
    async fn test_verify_payment_round_trip() {
        let gateway = gateway();
        let store = boxed_store();
        store
            .record_order(OrderRecord::created("o1", 49900, "INR"))
            .await
            .unwrap();

        let response = verify_payment_handler(
            Json(VerifyPaymentRequest {
                order_id: "o1".to_string(),
                payment_id: "p1".to_string(),
                signature: sign("o1", "p1", "secret"),
            }),
            rocket::State::from(&gateway),
            rocket::State::from(&store),
        )
        .await
        .unwrap();

        assert!(response.verified);
    }

    #[tokio::test]
    async fn test_verify_payment_rejects_bad_signature() {
        let gateway = gateway();
        let store = boxed_store();

        let err = verify_payment_handler(
            Json(VerifyPaymentRequest {
                order_id: "o1".to_string(),
                payment_id: "p1".to_string(),
                signature: sign("o1", "p1", "wrong-secret"),
            }),
            rocket::State::from(&gateway),
            rocket::State::from(&store),
        )
        .await
        .err()
        .unwrap();

        assert_eq!(err.0, Status::BadRequest);
        assert_eq!(err.1.error, "Payment verification failed");
    }
}
