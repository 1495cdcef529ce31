use crate::config::MidtransConfig;
use crate::error::{AppError, AppResult};
use crate::models::donation::DonationStatus;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

#[derive(Debug, Serialize)]
pub struct TransactionDetails {
    pub order_id: String,
    pub gross_amount: i64,
}

#[derive(Debug, Serialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct ItemDetails {
    pub id: String,
    pub price: i64,
    pub quantity: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SnapTransactionRequest {
    pub transaction_details: TransactionDetails,
    pub customer_details: CustomerDetails,
    pub item_details: Vec<ItemDetails>,
}

#[derive(Debug, Deserialize)]
pub struct SnapTransactionResponse {
    pub token: String,
    pub redirect_url: String,
}

/// Asynchronous settlement notification. Delivered at-least-once and
/// possibly out of order; amounts and codes arrive as strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MidtransNotification {
    pub order_id: String,
    pub status_code: String,
    pub gross_amount: String,
    pub signature_key: String,
    pub transaction_status: String,
    pub fraud_status: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Clone)]
pub struct MidtransService {
    client: Client,
    config: MidtransConfig,
}

impl MidtransService {
    pub fn new(config: MidtransConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Requests a hosted-payment session from Snap. The returned token is
    /// opaque to us; the frontend feeds it to the payment widget.
    pub async fn create_transaction(
        &self,
        order_id: &str,
        gross_amount: i64,
        customer_name: &str,
        customer_email: &str,
        customer_phone: &str,
        item_name: &str,
    ) -> AppResult<SnapTransactionResponse> {
        let url = format!("{}/transactions", self.config.snap_base_url);

        let request = SnapTransactionRequest {
            transaction_details: TransactionDetails {
                order_id: order_id.to_string(),
                gross_amount,
            },
            customer_details: CustomerDetails {
                first_name: customer_name.to_string(),
                email: customer_email.to_string(),
                phone: customer_phone.to_string(),
            },
            item_details: vec![ItemDetails {
                id: order_id.to_string(),
                price: gross_amount,
                quantity: 1,
                name: item_name.to_string(),
            }],
        };

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.server_key, Some(""))
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() {
            let snap: SnapTransactionResponse = response.json().await?;
            log::info!("Snap session created for order {order_id}");
            Ok(snap)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Snap session creation failed for order {order_id}: {error_text}");
            Err(AppError::ExternalApiError(format!(
                "Payment session creation failed: {error_text}"
            )))
        }
    }

    /// Midtrans signs notifications with
    /// sha512(order_id + status_code + gross_amount + server_key).
    pub fn verify_notification_signature(&self, notification: &MidtransNotification) -> bool {
        let expected = compute_signature(
            &notification.order_id,
            &notification.status_code,
            &notification.gross_amount,
            &self.config.server_key,
        );
        expected == notification.signature_key
    }
}

pub fn compute_signature(
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    server_key: &str,
) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Maps the gateway's transaction/fraud status pair onto a terminal
/// donation status. `None` means the notification carries no terminal
/// outcome yet (pending, challenge) and must not touch the record.
pub fn map_transaction_status(
    transaction_status: &str,
    fraud_status: Option<&str>,
) -> Option<DonationStatus> {
    match transaction_status {
        "settlement" => Some(DonationStatus::Diterima),
        "capture" => match fraud_status {
            Some("accept") => Some(DonationStatus::Diterima),
            _ => None,
        },
        "cancel" | "deny" | "expire" => Some(DonationStatus::Ditolak),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MidtransConfig;

    fn service_with(base_url: String) -> MidtransService {
        MidtransService::new(MidtransConfig {
            server_key: "SB-Mid-server-abc123".to_string(),
            snap_base_url: base_url,
        })
    }

    #[test]
    fn test_signature_known_vector() {
        // sha512("DONASI-42-1700000000" + "200" + "500000.00" + key)
        let sig = compute_signature(
            "DONASI-42-1700000000",
            "200",
            "500000.00",
            "SB-Mid-server-abc123",
        );
        assert_eq!(
            sig,
            "259ba7d47f0edcd57749b1dcf7271101de9d2f6ca98c504cc61490a89d5a7b62\
             4058e806a60b7fdec1490afa6a3d1ebd132b20f6eb3b6dcdef5ee1e2813a98ff"
        );
    }

    #[test]
    fn test_verify_notification_signature() {
        let service = service_with("http://localhost".to_string());

        let mut notification = MidtransNotification {
            order_id: "DONASI-42-1700000000".to_string(),
            status_code: "200".to_string(),
            gross_amount: "500000.00".to_string(),
            signature_key: compute_signature(
                "DONASI-42-1700000000",
                "200",
                "500000.00",
                "SB-Mid-server-abc123",
            ),
            transaction_status: "settlement".to_string(),
            fraud_status: None,
            transaction_id: None,
        };
        assert!(service.verify_notification_signature(&notification));

        // Tampered amount must fail.
        notification.gross_amount = "999999.00".to_string();
        assert!(!service.verify_notification_signature(&notification));
    }

    #[test]
    fn test_status_mapping() {
        use DonationStatus::*;

        assert_eq!(map_transaction_status("settlement", None), Some(Diterima));
        assert_eq!(
            map_transaction_status("capture", Some("accept")),
            Some(Diterima)
        );
        assert_eq!(map_transaction_status("capture", Some("challenge")), None);
        assert_eq!(map_transaction_status("cancel", None), Some(Ditolak));
        assert_eq!(map_transaction_status("deny", None), Some(Ditolak));
        assert_eq!(map_transaction_status("expire", None), Some(Ditolak));
        assert_eq!(map_transaction_status("pending", None), None);
        assert_eq!(map_transaction_status("refund", None), None);
    }

    #[tokio::test]
    async fn test_create_transaction() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/transactions")
            .match_header("authorization", mockito::Matcher::Any)
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token":"snap-token-xyz","redirect_url":"https://app.sandbox.midtrans.com/snap/v2/vtweb/snap-token-xyz"}"#)
            .create_async()
            .await;

        let service = service_with(server.url());
        let snap = service
            .create_transaction(
                "DONASI-7-1700000000",
                500_000,
                "Budi Santoso",
                "budi@example.com",
                "081234567890",
                "Donasi Bantuan Banjir Demak",
            )
            .await
            .unwrap();

        assert_eq!(snap.token, "snap-token-xyz");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_transaction_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/transactions")
            .with_status(401)
            .with_body(r#"{"error_messages":["Access denied"]}"#)
            .create_async()
            .await;

        let service = service_with(server.url());
        let result = service
            .create_transaction(
                "DONASI-7-1700000000",
                500_000,
                "Budi",
                "budi@example.com",
                "081234567890",
                "Donasi",
            )
            .await;

        assert!(matches!(result, Err(AppError::ExternalApiError(_))));
    }
}
