use actix_web::{HttpResponse, Result, web};
use log::{error, info, warn};

use crate::external::{MidtransNotification, MidtransService};
use crate::services::DonationService;

/// Midtrans payment notification endpoint.
///
/// The gateway delivers at least once and retries on non-2xx responses.
/// A bad signature is rejected outright; a processing failure after a
/// valid signature is answered with 200 so the gateway does not hammer
/// us with retries for an error that will not go away.
pub async fn midtrans_webhook(
    donation_service: web::Data<DonationService>,
    midtrans_service: web::Data<MidtransService>,
    notification: web::Json<MidtransNotification>,
) -> Result<HttpResponse> {
    let notification = notification.into_inner();

    if !midtrans_service.verify_notification_signature(&notification) {
        warn!(
            "Rejected gateway notification with bad signature for order {}",
            notification.order_id
        );
        return Ok(HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid signature"
        })));
    }

    info!(
        "Gateway notification for order {}: {}",
        notification.order_id, notification.transaction_status
    );

    match donation_service
        .apply_gateway_notification(&notification)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "received": true
        }))),
        Err(e) => {
            error!(
                "Failed to process notification for order {}: {e}",
                notification.order_id
            );
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "received": true,
                "error": format!("Processing failed: {}", e)
            })))
        }
    }
}

pub fn webhook_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/webhook").route("/midtrans", web::post().to(midtrans_webhook)),
    );
}
