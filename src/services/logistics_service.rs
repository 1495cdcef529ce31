use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use sqlx::SqlitePool;

/// Address recorded when a self-delivered donation is received without a
/// pre-scheduled logistics row.
const FOUNDATION_ADDRESS: &str = "Diterima di kantor yayasan";

#[derive(Clone)]
pub struct LogisticsService {
    pool: SqlitePool,
}

impl LogisticsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Pickup track: admin moves the existing logistics row through its
    /// statuses.
    pub async fn update_pickup_status(
        &self,
        donation_id: i64,
        request: UpdatePickupStatusRequest,
    ) -> AppResult<PickupSchedule> {
        let result = sqlx::query(
            r#"
            UPDATE jadwal_penjemputan
            SET status_penjemputan = ?,
                catatan = COALESCE(?, catatan),
                updated_at = CURRENT_TIMESTAMP
            WHERE donasi_id = ?
            "#,
        )
        .bind(request.status_penjemputan)
        .bind(&request.catatan)
        .bind(donation_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "No pickup schedule for this donation".to_string(),
            ));
        }

        log::info!(
            "Pickup schedule for donation {donation_id} set to {}",
            request.status_penjemputan
        );
        self.get_schedule(donation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No pickup schedule for this donation".to_string()))
    }

    /// Self-delivery track: the donor attaches a tracking number to their
    /// own Pending self-delivery donation. The WHERE clause carries the
    /// ownership and state checks so a non-matching row is simply zero
    /// rows affected.
    pub async fn set_tracking_number(
        &self,
        user_id: i64,
        donation_id: i64,
        request: SetTrackingNumberRequest,
    ) -> AppResult<()> {
        let nomor_resi = request.nomor_resi.trim();
        if nomor_resi.is_empty() {
            return Err(AppError::ValidationError(
                "Tracking number cannot be empty".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            UPDATE donasi
            SET nomor_resi = ?
            WHERE id = ?
              AND donatur_id = (SELECT id FROM donatur WHERE user_id = ?)
              AND status = 'Pending'
              AND metode_pengiriman = 'Self-Delivery'
            "#,
        )
        .bind(nomor_resi)
        .bind(donation_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "Donation not found, not yours, or no longer accepts a tracking number"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Marks physical handoff complete. A self-delivery donation may have
    /// no logistics row yet, so this is a single atomic insert-or-update
    /// keyed by the donation id.
    pub async fn mark_delivered(&self, donation_id: i64) -> AppResult<PickupSchedule> {
        let donation: Option<Donation> = sqlx::query_as("SELECT * FROM donasi WHERE id = ?")
            .bind(donation_id)
            .fetch_optional(&self.pool)
            .await?;
        let donation =
            donation.ok_or_else(|| AppError::NotFound("Donation not found".to_string()))?;

        if donation.jenis != DonationKind::Barang {
            return Err(AppError::ValidationError(
                "Only goods donations have delivery tracking".to_string(),
            ));
        }

        let now = Utc::now().format("%Y-%m-%d %H:%M").to_string();

        sqlx::query(
            r#"
            INSERT INTO jadwal_penjemputan (donasi_id, status_penjemputan, alamat, tanggal_penjemputan)
            VALUES (?, 'Selesai', ?, ?)
            ON CONFLICT(donasi_id) DO UPDATE SET
                status_penjemputan = 'Selesai',
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(donation_id)
        .bind(FOUNDATION_ADDRESS)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        log::info!("Donation {donation_id} marked as delivered");
        self.get_schedule(donation_id)
            .await?
            .ok_or_else(|| AppError::InternalError("Upserted schedule missing".to_string()))
    }

    pub async fn get_schedule(&self, donation_id: i64) -> AppResult<Option<PickupSchedule>> {
        let schedule: Option<PickupSchedule> =
            sqlx::query_as("SELECT * FROM jadwal_penjemputan WHERE donasi_id = ?")
                .bind(donation_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(schedule)
    }

    /// Donor-facing tracking view, scoped to the caller's own donations.
    pub async fn get_tracking(
        &self,
        user_id: i64,
        donation_id: i64,
    ) -> AppResult<TrackingResponse> {
        let donation: Option<Donation> = sqlx::query_as(
            r#"
            SELECT d.* FROM donasi d
            JOIN donatur p ON p.id = d.donatur_id
            WHERE d.id = ? AND p.user_id = ?
            "#,
        )
        .bind(donation_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        let donasi =
            donation.ok_or_else(|| AppError::NotFound("Donation not found".to_string()))?;

        let jadwal = self.get_schedule(donation_id).await?;
        let langkah = tracking_step(&donasi, jadwal.as_ref());

        Ok(TrackingResponse {
            donasi,
            jadwal,
            langkah,
        })
    }
}

/// Derived, purely presentational step index:
/// 0 = tracking number not yet entered / nothing scheduled,
/// 1 = tracking number entered (self-delivery) or scheduled (pickup),
/// 2 = received (donation accepted or logistics done).
pub fn tracking_step(donation: &Donation, schedule: Option<&PickupSchedule>) -> i64 {
    if donation.status == DonationStatus::Diterima
        || schedule.is_some_and(|s| s.status_penjemputan == PickupStatus::Selesai)
    {
        return 2;
    }

    match donation.metode_pengiriman {
        Some(DeliveryMethod::SelfDelivery) => i64::from(donation.nomor_resi.is_some()),
        Some(DeliveryMethod::PickUp) => i64::from(schedule.is_some()),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::donation_service::DonationService;
    use crate::services::donation_service::test_support::*;

    async fn setup() -> (DonationService, LogisticsService) {
        let pool = test_pool().await;
        seed_base(&pool).await;
        (
            DonationService::new(pool.clone(), midtrans_stub("http://localhost:1")),
            LogisticsService::new(pool),
        )
    }

    fn pickup_details() -> PickupDetails {
        PickupDetails {
            alamat: "Jl. Merdeka 1".to_string(),
            tanggal_penjemputan: "2025-02-10 09:00".to_string(),
            catatan: Some("Pagar hijau".to_string()),
            latitude: Some(-6.914744),
            longitude: Some(107.609811),
        }
    }

    #[tokio::test]
    async fn test_pickup_progression_and_tracking_steps() {
        let (donations, logistics) = setup().await;

        let created = donations
            .create_donation(
                1,
                goods_request(1, DeliveryMethod::PickUp, Some(pickup_details())),
            )
            .await
            .unwrap();
        let id = created.donasi.id;

        // Scheduled at creation: step 1.
        let tracking = logistics.get_tracking(1, id).await.unwrap();
        assert_eq!(tracking.langkah, 1);

        logistics
            .update_pickup_status(
                id,
                UpdatePickupStatusRequest {
                    status_penjemputan: PickupStatus::DalamPerjalanan,
                    catatan: None,
                },
            )
            .await
            .unwrap();
        let tracking = logistics.get_tracking(1, id).await.unwrap();
        assert_eq!(tracking.langkah, 1);
        // Note from creation survives a status-only update.
        assert_eq!(
            tracking.jadwal.unwrap().catatan.as_deref(),
            Some("Pagar hijau")
        );

        let schedule = logistics
            .update_pickup_status(
                id,
                UpdatePickupStatusRequest {
                    status_penjemputan: PickupStatus::Selesai,
                    catatan: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(schedule.status_penjemputan, PickupStatus::Selesai);

        // Logistics completion alone advances tracking, donation status
        // stays untouched.
        let tracking = logistics.get_tracking(1, id).await.unwrap();
        assert_eq!(tracking.langkah, 2);
        assert_eq!(tracking.donasi.status, DonationStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_pickup_status_without_schedule() {
        let (donations, logistics) = setup().await;

        let created = donations
            .create_donation(1, goods_request(1, DeliveryMethod::SelfDelivery, None))
            .await
            .unwrap();

        let result = logistics
            .update_pickup_status(
                created.donasi.id,
                UpdatePickupStatusRequest {
                    status_penjemputan: PickupStatus::DalamPerjalanan,
                    catatan: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_self_delivery_tracking_number_flow() {
        let (donations, logistics) = setup().await;

        let created = donations
            .create_donation(1, goods_request(1, DeliveryMethod::SelfDelivery, None))
            .await
            .unwrap();
        let id = created.donasi.id;

        // No resi yet: step 0.
        assert_eq!(logistics.get_tracking(1, id).await.unwrap().langkah, 0);

        logistics
            .set_tracking_number(
                1,
                id,
                SetTrackingNumberRequest {
                    nomor_resi: "JNE123456789".to_string(),
                },
            )
            .await
            .unwrap();
        let tracking = logistics.get_tracking(1, id).await.unwrap();
        assert_eq!(tracking.langkah, 1);
        assert_eq!(tracking.donasi.nomor_resi.as_deref(), Some("JNE123456789"));

        // A different user cannot attach a resi to this donation.
        let foreign = logistics
            .set_tracking_number(
                2,
                id,
                SetTrackingNumberRequest {
                    nomor_resi: "X".to_string(),
                },
            )
            .await;
        assert!(matches!(foreign, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mark_delivered_upserts_exactly_one_row() {
        let (donations, logistics) = setup().await;

        // Self-delivery: no schedule exists, completion creates one.
        let self_delivery = donations
            .create_donation(1, goods_request(1, DeliveryMethod::SelfDelivery, None))
            .await
            .unwrap();
        let schedule = logistics.mark_delivered(self_delivery.donasi.id).await.unwrap();
        assert_eq!(schedule.status_penjemputan, PickupStatus::Selesai);
        assert_eq!(schedule.alamat, FOUNDATION_ADDRESS);

        // Pickup: completion updates the pre-scheduled row in place.
        let pickup = donations
            .create_donation(
                1,
                goods_request(1, DeliveryMethod::PickUp, Some(pickup_details())),
            )
            .await
            .unwrap();
        let schedule = logistics.mark_delivered(pickup.donasi.id).await.unwrap();
        assert_eq!(schedule.status_penjemputan, PickupStatus::Selesai);
        assert_eq!(schedule.alamat, "Jl. Merdeka 1");

        // Replaying completion never duplicates the row.
        logistics.mark_delivered(pickup.donasi.id).await.unwrap();
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM jadwal_penjemputan WHERE donasi_id = ?")
                .bind(pickup.donasi.id)
                .fetch_one(&logistics.pool)
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_mark_delivered_rejects_money_donation() {
        let (donations, logistics) = setup().await;

        let created = donations
            .create_donation(1, money_request(1, 500_000))
            .await
            .unwrap();
        let result = logistics.mark_delivered(created.donasi.id).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
