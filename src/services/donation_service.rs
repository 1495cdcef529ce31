use crate::error::{AppError, AppResult};
use crate::external::{MidtransNotification, MidtransService, map_transaction_status};
use crate::models::*;
use crate::utils::{PaginatedResponse, PaginationParams, build_order_id, parse_order_id};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

#[derive(Clone)]
pub struct DonationService {
    pool: SqlitePool,
    midtrans_service: MidtransService,
}

impl DonationService {
    pub fn new(pool: SqlitePool, midtrans_service: MidtransService) -> Self {
        Self {
            pool,
            midtrans_service,
        }
    }

    /// Creates one Pending donation. Money via Midtrans additionally opens
    /// a Snap session; goods via Pick-up additionally writes the logistics
    /// row in the same transaction as the donation insert.
    pub async fn create_donation(
        &self,
        user_id: i64,
        request: CreateDonationRequest,
    ) -> AppResult<CreateDonationResponse> {
        let (donatur, user) = self.find_donor(user_id).await?;

        validate_donation_fields(&request)?;

        let program: Option<Program> = sqlx::query_as("SELECT * FROM kegiatan WHERE id = ?")
            .bind(request.kegiatan_id)
            .fetch_optional(&self.pool)
            .await?;
        let program =
            program.ok_or_else(|| AppError::NotFound("Program not found".to_string()))?;
        if program.status != ProgramStatus::Aktif {
            return Err(AppError::ValidationError(
                "Program is not accepting donations".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let donation_id = sqlx::query(
            r#"
            INSERT INTO donasi (
                donatur_id, kegiatan_id, jenis, nominal, deskripsi_barang,
                metode_pembayaran, metode_pengiriman, is_anonim
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(donatur.id)
        .bind(request.kegiatan_id)
        .bind(request.jenis)
        .bind(request.nominal)
        .bind(&request.deskripsi_barang)
        .bind(request.metode_pembayaran)
        .bind(request.metode_pengiriman)
        .bind(request.is_anonim)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        if request.jenis == DonationKind::Barang
            && request.metode_pengiriman == Some(DeliveryMethod::PickUp)
        {
            // Validated above: pickup details are present for this branch.
            let details = request.penjemputan.as_ref().ok_or_else(|| {
                AppError::ValidationError("Pickup details are required".to_string())
            })?;

            sqlx::query(
                r#"
                INSERT INTO jadwal_penjemputan (
                    donasi_id, status_penjemputan, alamat, tanggal_penjemputan,
                    catatan, latitude, longitude
                ) VALUES (?, 'Dijadwalkan', ?, ?, ?, ?, ?)
                "#,
            )
            .bind(donation_id)
            .bind(&details.alamat)
            .bind(&details.tanggal_penjemputan)
            .bind(&details.catatan)
            .bind(details.latitude)
            .bind(details.longitude)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        // Gateway session creation is a second, non-transactional step; a
        // failure here leaves the Pending row behind for manual cleanup.
        let mut snap_token = None;
        if request.jenis == DonationKind::Uang
            && request.metode_pembayaran == Some(PaymentMethod::Midtrans)
        {
            let order_id = build_order_id(donation_id);

            sqlx::query("UPDATE donasi SET order_id = ? WHERE id = ?")
                .bind(&order_id)
                .bind(donation_id)
                .execute(&self.pool)
                .await?;

            let nominal = request.nominal.unwrap_or(0);
            let snap = self
                .midtrans_service
                .create_transaction(
                    &order_id,
                    nominal,
                    &user.nama,
                    &user.email,
                    &donatur.no_hp,
                    &format!("Donasi {}", program.nama),
                )
                .await
                .map_err(|e| {
                    log::warn!(
                        "Donation {donation_id} committed but payment session failed: {e}"
                    );
                    e
                })?;

            snap_token = Some(snap.token);
        }

        let donasi = self.get_donation(donation_id).await?;
        log::info!(
            "Donation {donation_id} created for program {} by donor {}",
            request.kegiatan_id,
            donatur.id
        );

        Ok(CreateDonationResponse { donasi, snap_token })
    }

    /// Manual verification by Admin Operasional. The transition is applied
    /// in one statement guarded on the current status being Pending, so a
    /// race between two admins (or an admin and the gateway callback)
    /// resolves as first-writer-wins.
    pub async fn verify_donation(
        &self,
        admin_user_id: i64,
        donation_id: i64,
        request: VerifyDonationRequest,
    ) -> AppResult<Donation> {
        let alasan = match request.status {
            DonationStatus::Diterima => None,
            DonationStatus::Ditolak => {
                let alasan = request
                    .alasan_penolakan
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| {
                        AppError::ValidationError(
                            "A rejection reason is required".to_string(),
                        )
                    })?;
                Some(alasan.to_string())
            }
            DonationStatus::Pending => {
                return Err(AppError::ValidationError(
                    "Target status must be Diterima or Ditolak".to_string(),
                ));
            }
        };

        let admin = self.find_admin(admin_user_id).await?;

        let donation = self.get_donation(donation_id).await?;
        if donation.metode_pembayaran == Some(PaymentMethod::Midtrans) {
            return Err(AppError::ValidationError(
                "Gateway-paid donations are settled by the payment callback".to_string(),
            ));
        }

        // Acting admin is recorded on acceptance.
        let admin_id = match request.status {
            DonationStatus::Diterima => Some(admin.id),
            _ => None,
        };

        let result = sqlx::query(
            r#"
            UPDATE donasi
            SET status = ?, alasan_penolakan = ?, admin_id = ?
            WHERE id = ? AND status = 'Pending'
            "#,
        )
        .bind(request.status)
        .bind(&alasan)
        .bind(admin_id)
        .bind(donation_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "Donation not found or not pending".to_string(),
            ));
        }

        log::info!(
            "Donation {donation_id} verified as {} by admin {}",
            request.status,
            admin.id
        );
        self.get_donation(donation_id).await
    }

    /// Applies an asynchronous gateway notification. Idempotent against
    /// at-least-once delivery: replaying an already-applied terminal
    /// status succeeds without touching the row.
    pub async fn apply_gateway_notification(
        &self,
        notification: &MidtransNotification,
    ) -> AppResult<()> {
        let donation_id = parse_order_id(&notification.order_id).ok_or_else(|| {
            AppError::ValidationError(format!(
                "Unrecognized order id: {}",
                notification.order_id
            ))
        })?;

        let Some(target) = map_transaction_status(
            &notification.transaction_status,
            notification.fraud_status.as_deref(),
        ) else {
            log::info!(
                "Notification for donation {donation_id} carries no terminal status ({})",
                notification.transaction_status
            );
            return Ok(());
        };

        // Rejection reason invariant holds for gateway outcomes too.
        let alasan = match target {
            DonationStatus::Ditolak => Some(format!(
                "Pembayaran {} (gateway)",
                notification.transaction_status
            )),
            _ => None,
        };

        let result = sqlx::query(
            r#"
            UPDATE donasi
            SET status = ?, alasan_penolakan = ?
            WHERE id = ? AND status = 'Pending'
            "#,
        )
        .bind(target)
        .bind(&alasan)
        .bind(donation_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let donation = self.get_donation(donation_id).await?;
            if donation.status == target {
                // Duplicate delivery of the same outcome.
                log::info!(
                    "Notification replay for donation {donation_id} ({target}), already applied"
                );
                return Ok(());
            }
            return Err(AppError::Conflict(format!(
                "Donation {donation_id} already settled as {}",
                donation.status
            )));
        }

        if target == DonationStatus::Diterima {
            // Public program pages recompute their totals on the next read;
            // the program id is logged for operators watching settlements.
            let donation = self.get_donation(donation_id).await?;
            log::info!(
                "Donation {donation_id} settled, program {} totals now include it",
                donation.kegiatan_id
            );
        } else {
            log::info!("Donation {donation_id} rejected by gateway ({target})");
        }

        Ok(())
    }

    pub async fn get_donation(&self, donation_id: i64) -> AppResult<Donation> {
        let donation: Option<Donation> = sqlx::query_as("SELECT * FROM donasi WHERE id = ?")
            .bind(donation_id)
            .fetch_optional(&self.pool)
            .await?;

        donation.ok_or_else(|| AppError::NotFound("Donation not found".to_string()))
    }

    pub async fn get_donor_donations(
        &self,
        user_id: i64,
        query: &DonationQuery,
    ) -> AppResult<PaginatedResponse<Donation>> {
        let (donatur, _) = self.find_donor(user_id).await?;
        let params = PaginationParams::new(query.page, query.per_page);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM donasi WHERE donatur_id = ?")
            .bind(donatur.id)
            .fetch_one(&self.pool)
            .await?;

        let donations: Vec<Donation> = sqlx::query_as(
            "SELECT * FROM donasi WHERE donatur_id = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
        )
        .bind(donatur.id)
        .bind(params.get_limit() as i64)
        .bind(params.get_offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(PaginatedResponse::new(donations, &params, total))
    }

    /// Admin listing with the literal-value filters the read views use.
    pub async fn list_donations(
        &self,
        query: &DonationQuery,
    ) -> AppResult<PaginatedResponse<Donation>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut count_qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM donasi WHERE 1 = 1");
        push_filters(&mut count_qb, query);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM donasi WHERE 1 = 1");
        push_filters(&mut qb, query);
        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(params.get_limit() as i64);
        qb.push(" OFFSET ");
        qb.push_bind(params.get_offset() as i64);

        let donations: Vec<Donation> = qb.build_query_as().fetch_all(&self.pool).await?;

        Ok(PaginatedResponse::new(donations, &params, total))
    }

    pub async fn find_donor(&self, user_id: i64) -> AppResult<(Donatur, User)> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        let user = user.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let donatur: Option<Donatur> = sqlx::query_as("SELECT * FROM donatur WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        let donatur =
            donatur.ok_or_else(|| AppError::NotFound("Donor profile not found".to_string()))?;

        Ok((donatur, user))
    }

    async fn find_admin(&self, user_id: i64) -> AppResult<Admin> {
        let admin: Option<Admin> = sqlx::query_as("SELECT * FROM admin WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        admin.ok_or_else(|| AppError::NotFound("Admin profile not found".to_string()))
    }
}

fn push_filters(qb: &mut QueryBuilder<Sqlite>, query: &DonationQuery) {
    if let Some(status) = query.status {
        qb.push(" AND status = ");
        qb.push_bind(status);
    }
    if let Some(jenis) = query.jenis {
        qb.push(" AND jenis = ");
        qb.push_bind(jenis);
    }
    if let Some(delivery) = query.metode_pengiriman {
        qb.push(" AND metode_pengiriman = ");
        qb.push_bind(delivery);
    }
    if let Some(kegiatan_id) = query.kegiatan_id {
        qb.push(" AND kegiatan_id = ");
        qb.push_bind(kegiatan_id);
    }
}

/// Kind-specific field validation at the boundary; money and goods fields
/// are mutually exclusive.
fn validate_donation_fields(request: &CreateDonationRequest) -> AppResult<()> {
    match request.jenis {
        DonationKind::Uang => {
            match request.nominal {
                Some(n) if n > 0 => {}
                _ => {
                    return Err(AppError::ValidationError(
                        "A money donation requires a positive nominal".to_string(),
                    ));
                }
            }
            if request.metode_pembayaran.is_none() {
                return Err(AppError::ValidationError(
                    "A money donation requires a payment method".to_string(),
                ));
            }
            if request.deskripsi_barang.is_some() || request.metode_pengiriman.is_some() {
                return Err(AppError::ValidationError(
                    "Money donations carry no goods fields".to_string(),
                ));
            }
        }
        DonationKind::Barang => {
            if request
                .deskripsi_barang
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .is_none()
            {
                return Err(AppError::ValidationError(
                    "A goods donation requires a description".to_string(),
                ));
            }
            if request.nominal.is_some() || request.metode_pembayaran.is_some() {
                return Err(AppError::ValidationError(
                    "Goods donations carry no payment fields".to_string(),
                ));
            }
            match request.metode_pengiriman {
                Some(DeliveryMethod::PickUp) => {
                    if request.penjemputan.is_none() {
                        return Err(AppError::ValidationError(
                            "Pick-up requires address and schedule details".to_string(),
                        ));
                    }
                }
                Some(DeliveryMethod::SelfDelivery) => {}
                None => {
                    return Err(AppError::ValidationError(
                        "A goods donation requires a delivery method".to_string(),
                    ));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::MidtransConfig;
    use crate::database::run_migrations;
    use sqlx::sqlite::SqlitePoolOptions;

    pub async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    pub fn midtrans_stub(base_url: &str) -> MidtransService {
        MidtransService::new(MidtransConfig {
            server_key: "SB-Mid-server-abc123".to_string(),
            snap_base_url: base_url.to_string(),
        })
    }

    /// Seeds a donor (user id 1), an Admin Operasional (user id 2) and an
    /// active program; returns the program id.
    pub async fn seed_base(pool: &SqlitePool) -> i64 {
        sqlx::query(
            "INSERT INTO users (email, password_hash, nama, role) VALUES \
             ('budi@example.com', 'x', 'Budi Santoso', 'donatur'), \
             ('op@example.com', 'x', 'Siti Aminah', 'admin')",
        )
        .execute(pool)
        .await
        .unwrap();

        sqlx::query("INSERT INTO donatur (user_id, no_hp, alamat) VALUES (1, '081234567890', 'Jl. Merdeka 1')")
            .execute(pool)
            .await
            .unwrap();

        sqlx::query("INSERT INTO admin (user_id, jabatan) VALUES (2, 'Admin Operasional')")
            .execute(pool)
            .await
            .unwrap();

        sqlx::query(
            "INSERT INTO kegiatan (nama, deskripsi, tanggal_mulai, target_donasi, status) \
             VALUES ('Bantuan Banjir Demak', 'Bantuan untuk korban banjir', '2025-01-01', 10000000, 'Aktif')",
        )
        .execute(pool)
        .await
        .unwrap();

        1
    }

    pub fn money_request(kegiatan_id: i64, nominal: i64) -> CreateDonationRequest {
        CreateDonationRequest {
            kegiatan_id,
            jenis: DonationKind::Uang,
            nominal: Some(nominal),
            deskripsi_barang: None,
            metode_pembayaran: Some(PaymentMethod::Manual),
            metode_pengiriman: None,
            is_anonim: false,
            penjemputan: None,
        }
    }

    pub fn goods_request(
        kegiatan_id: i64,
        delivery: DeliveryMethod,
        penjemputan: Option<PickupDetails>,
    ) -> CreateDonationRequest {
        CreateDonationRequest {
            kegiatan_id,
            jenis: DonationKind::Barang,
            nominal: None,
            deskripsi_barang: Some("Beras 3 karung".to_string()),
            metode_pembayaran: None,
            metode_pengiriman: Some(delivery),
            is_anonim: false,
            penjemputan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::external::midtrans::compute_signature;

    async fn setup() -> DonationService {
        let pool = test_pool().await;
        seed_base(&pool).await;
        DonationService::new(pool, midtrans_stub("http://localhost:1"))
    }

    fn verify_request(status: DonationStatus, alasan: Option<&str>) -> VerifyDonationRequest {
        VerifyDonationRequest {
            status,
            alasan_penolakan: alasan.map(|s| s.to_string()),
        }
    }

    fn settlement_notification(donation_id: i64, transaction_status: &str) -> MidtransNotification {
        let order_id = format!("DONASI-{donation_id}-1700000000");
        MidtransNotification {
            signature_key: compute_signature(
                &order_id,
                "200",
                "500000.00",
                "SB-Mid-server-abc123",
            ),
            order_id,
            status_code: "200".to_string(),
            gross_amount: "500000.00".to_string(),
            transaction_status: transaction_status.to_string(),
            fraud_status: None,
            transaction_id: Some("tx-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_money_donation_starts_pending() {
        let service = setup().await;

        let created = service
            .create_donation(1, money_request(1, 500_000))
            .await
            .unwrap();

        assert_eq!(created.donasi.status, DonationStatus::Pending);
        assert_eq!(created.donasi.jenis, DonationKind::Uang);
        assert_eq!(created.donasi.nominal, Some(500_000));
        assert!(created.snap_token.is_none());
    }

    #[tokio::test]
    async fn test_create_donation_validation() {
        let service = setup().await;

        // Money without nominal.
        let mut bad = money_request(1, 500_000);
        bad.nominal = None;
        assert!(matches!(
            service.create_donation(1, bad).await,
            Err(AppError::ValidationError(_))
        ));

        // Goods without delivery method.
        let mut bad = goods_request(1, DeliveryMethod::SelfDelivery, None);
        bad.metode_pengiriman = None;
        assert!(matches!(
            service.create_donation(1, bad).await,
            Err(AppError::ValidationError(_))
        ));

        // Pick-up without details.
        let bad = goods_request(1, DeliveryMethod::PickUp, None);
        assert!(matches!(
            service.create_donation(1, bad).await,
            Err(AppError::ValidationError(_))
        ));

        // No donor profile behind the user (the admin user).
        assert!(matches!(
            service.create_donation(2, money_request(1, 1000)).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_pickup_donation_creates_schedule() {
        let service = setup().await;

        let created = service
            .create_donation(
                1,
                goods_request(
                    1,
                    DeliveryMethod::PickUp,
                    Some(PickupDetails {
                        alamat: "Jl. Merdeka 1".to_string(),
                        tanggal_penjemputan: "2025-02-10 09:00".to_string(),
                        catatan: None,
                        latitude: None,
                        longitude: None,
                    }),
                ),
            )
            .await
            .unwrap();

        let schedule: PickupSchedule =
            sqlx::query_as("SELECT * FROM jadwal_penjemputan WHERE donasi_id = ?")
                .bind(created.donasi.id)
                .fetch_one(&service.pool)
                .await
                .unwrap();
        assert_eq!(schedule.status_penjemputan, PickupStatus::Dijadwalkan);
        assert_eq!(schedule.alamat, "Jl. Merdeka 1");
    }

    #[tokio::test]
    async fn test_snap_session_for_gateway_donation() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/transactions")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token":"snap-token-xyz","redirect_url":"https://example.com/pay"}"#)
            .create_async()
            .await;

        let pool = test_pool().await;
        seed_base(&pool).await;
        let service = DonationService::new(pool, midtrans_stub(&server.url()));

        let mut request = money_request(1, 500_000);
        request.metode_pembayaran = Some(PaymentMethod::Midtrans);
        let created = service.create_donation(1, request).await.unwrap();

        assert_eq!(created.snap_token.as_deref(), Some("snap-token-xyz"));
        let order_id = created.donasi.order_id.unwrap();
        assert_eq!(parse_order_id(&order_id), Some(created.donasi.id));
    }

    #[tokio::test]
    async fn test_failed_snap_session_leaves_pending_row() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/transactions")
            .with_status(500)
            .with_body("gateway down")
            .create_async()
            .await;

        let pool = test_pool().await;
        seed_base(&pool).await;
        let service = DonationService::new(pool, midtrans_stub(&server.url()));

        let mut request = money_request(1, 500_000);
        request.metode_pembayaran = Some(PaymentMethod::Midtrans);
        let result = service.create_donation(1, request).await;
        assert!(matches!(result, Err(AppError::ExternalApiError(_))));

        // The orphaned Pending row persists for manual cleanup.
        let donation = service.get_donation(1).await.unwrap();
        assert_eq!(donation.status, DonationStatus::Pending);
    }

    #[tokio::test]
    async fn test_verify_accept_records_admin() {
        let service = setup().await;
        let created = service
            .create_donation(1, money_request(1, 500_000))
            .await
            .unwrap();

        let verified = service
            .verify_donation(
                2,
                created.donasi.id,
                verify_request(DonationStatus::Diterima, None),
            )
            .await
            .unwrap();

        assert_eq!(verified.status, DonationStatus::Diterima);
        assert_eq!(verified.admin_id, Some(1));
    }

    #[tokio::test]
    async fn test_verify_is_terminal() {
        let service = setup().await;
        let created = service
            .create_donation(1, money_request(1, 500_000))
            .await
            .unwrap();
        let id = created.donasi.id;

        service
            .verify_donation(2, id, verify_request(DonationStatus::Diterima, None))
            .await
            .unwrap();

        // A second transition in either direction loses the guard.
        let again = service
            .verify_donation(
                2,
                id,
                verify_request(DonationStatus::Ditolak, Some("terlambat")),
            )
            .await;
        assert!(matches!(again, Err(AppError::Conflict(_))));

        let stored = service.get_donation(id).await.unwrap();
        assert_eq!(stored.status, DonationStatus::Diterima);
    }

    #[tokio::test]
    async fn test_reject_requires_reason() {
        let service = setup().await;
        let created = service
            .create_donation(1, money_request(1, 500_000))
            .await
            .unwrap();
        let id = created.donasi.id;

        let no_reason = service
            .verify_donation(2, id, verify_request(DonationStatus::Ditolak, None))
            .await;
        assert!(matches!(no_reason, Err(AppError::ValidationError(_))));

        let blank = service
            .verify_donation(2, id, verify_request(DonationStatus::Ditolak, Some("  ")))
            .await;
        assert!(matches!(blank, Err(AppError::ValidationError(_))));

        let rejected = service
            .verify_donation(
                2,
                id,
                verify_request(DonationStatus::Ditolak, Some("Bukti transfer tidak valid")),
            )
            .await
            .unwrap();
        assert_eq!(rejected.status, DonationStatus::Ditolak);
        assert_eq!(
            rejected.alasan_penolakan.as_deref(),
            Some("Bukti transfer tidak valid")
        );
    }

    #[tokio::test]
    async fn test_verify_rejects_pending_target() {
        let service = setup().await;
        let created = service
            .create_donation(1, money_request(1, 500_000))
            .await
            .unwrap();

        let result = service
            .verify_donation(
                2,
                created.donasi.id,
                verify_request(DonationStatus::Pending, None),
            )
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_manual_verification_refused_for_gateway_donation() {
        let service = setup().await;

        // Insert directly so no Snap call happens.
        sqlx::query(
            "INSERT INTO donasi (donatur_id, kegiatan_id, jenis, nominal, metode_pembayaran) \
             VALUES (1, 1, 'Uang', 500000, 'Midtrans')",
        )
        .execute(&service.pool)
        .await
        .unwrap();

        let result = service
            .verify_donation(2, 1, verify_request(DonationStatus::Diterima, None))
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_gateway_settlement_and_replay() {
        let service = setup().await;
        let created = service
            .create_donation(1, money_request(1, 500_000))
            .await
            .unwrap();
        let id = created.donasi.id;

        let notification = settlement_notification(id, "settlement");
        service
            .apply_gateway_notification(&notification)
            .await
            .unwrap();
        assert_eq!(
            service.get_donation(id).await.unwrap().status,
            DonationStatus::Diterima
        );

        // At-least-once delivery: the replay is a successful no-op.
        service
            .apply_gateway_notification(&notification)
            .await
            .unwrap();
        assert_eq!(
            service.get_donation(id).await.unwrap().status,
            DonationStatus::Diterima
        );

        // A conflicting terminal outcome is a conflict, not corruption.
        let conflicting = settlement_notification(id, "deny");
        assert!(matches!(
            service.apply_gateway_notification(&conflicting).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_gateway_pending_is_noop() {
        let service = setup().await;
        let created = service
            .create_donation(1, money_request(1, 500_000))
            .await
            .unwrap();
        let id = created.donasi.id;

        service
            .apply_gateway_notification(&settlement_notification(id, "pending"))
            .await
            .unwrap();
        assert_eq!(
            service.get_donation(id).await.unwrap().status,
            DonationStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_gateway_expire_rejects_with_reason() {
        let service = setup().await;
        let created = service
            .create_donation(1, money_request(1, 500_000))
            .await
            .unwrap();
        let id = created.donasi.id;

        service
            .apply_gateway_notification(&settlement_notification(id, "expire"))
            .await
            .unwrap();

        let donation = service.get_donation(id).await.unwrap();
        assert_eq!(donation.status, DonationStatus::Ditolak);
        assert!(donation.alasan_penolakan.is_some());
    }

    #[tokio::test]
    async fn test_list_donations_filters() {
        let service = setup().await;
        service
            .create_donation(1, money_request(1, 500_000))
            .await
            .unwrap();
        service
            .create_donation(1, goods_request(1, DeliveryMethod::SelfDelivery, None))
            .await
            .unwrap();

        let all = service
            .list_donations(&DonationQuery {
                page: None,
                per_page: None,
                status: None,
                jenis: None,
                metode_pengiriman: None,
                kegiatan_id: None,
            })
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);

        let goods_only = service
            .list_donations(&DonationQuery {
                page: None,
                per_page: None,
                status: Some(DonationStatus::Pending),
                jenis: Some(DonationKind::Barang),
                metode_pengiriman: Some(DeliveryMethod::SelfDelivery),
                kegiatan_id: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(goods_only.pagination.total, 1);
        assert_eq!(goods_only.items[0].jenis, DonationKind::Barang);
    }
}
