use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;

/// Display name substituted for donors who asked not to be named.
const ANONYMOUS_DONOR: &str = "Hamba Allah";

#[derive(Clone)]
pub struct ReportService {
    pool: SqlitePool,
}

impl ReportService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Admin dashboard aggregates, recomputed from the donation rows on
    /// every request.
    pub async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        let total_donasi: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM donasi")
            .fetch_one(&self.pool)
            .await?;

        let total_terkumpul: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(nominal), 0) FROM donasi \
             WHERE jenis = 'Uang' AND status = 'Diterima'",
        )
        .fetch_one(&self.pool)
        .await?;

        let donatur_unik: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT donatur_id) FROM donasi WHERE status = 'Diterima'",
        )
        .fetch_one(&self.pool)
        .await?;

        let per_status: Vec<StatusCount> = sqlx::query_as(
            "SELECT status, COUNT(*) AS jumlah FROM donasi GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        let per_jenis: Vec<KindCount> = sqlx::query_as(
            "SELECT jenis, COUNT(*) AS jumlah FROM donasi GROUP BY jenis ORDER BY jenis",
        )
        .fetch_all(&self.pool)
        .await?;

        let per_pengiriman: Vec<DeliveryCount> = sqlx::query_as(
            "SELECT metode_pengiriman, COUNT(*) AS jumlah FROM donasi \
             WHERE metode_pengiriman IS NOT NULL \
             GROUP BY metode_pengiriman ORDER BY metode_pengiriman",
        )
        .fetch_all(&self.pool)
        .await?;

        let tren_harian = self.daily_trend().await?;

        Ok(DashboardStats {
            total_donasi,
            total_terkumpul,
            donatur_unik,
            per_status,
            per_jenis,
            per_pengiriman,
            tren_harian,
        })
    }

    /// Trailing 7 calendar days including today. Days without donations
    /// appear as explicit zero points so the series is always 7 long.
    async fn daily_trend(&self) -> AppResult<Vec<TrendPoint>> {
        let today = Utc::now().date_naive();
        let cutoff = (today - Duration::days(6)).format("%Y-%m-%d").to_string();

        let rows: Vec<TrendPoint> = sqlx::query_as(
            r#"
            SELECT date(created_at) AS tanggal,
                   COUNT(*) AS jumlah,
                   COALESCE(SUM(CASE WHEN jenis = 'Uang' THEN nominal ELSE 0 END), 0) AS total_nominal
            FROM donasi
            WHERE date(created_at) >= ?
            GROUP BY date(created_at)
            "#,
        )
        .bind(&cutoff)
        .fetch_all(&self.pool)
        .await?;

        let points = (0..7)
            .map(|offset| {
                let day = (today - Duration::days(6 - offset))
                    .format("%Y-%m-%d")
                    .to_string();
                match rows.iter().find(|r| r.tanggal == day) {
                    Some(row) => TrendPoint {
                        tanggal: day,
                        jumlah: row.jumlah,
                        total_nominal: row.total_nominal,
                    },
                    None => TrendPoint {
                        tanggal: day,
                        jumlah: 0,
                        total_nominal: 0,
                    },
                }
            })
            .collect();

        Ok(points)
    }

    /// Public per-program transparency report. Only accepted money
    /// donations appear as income; donor names honor the anonymity flag.
    pub async fn transparency_report(&self, program_id: i64) -> AppResult<TransparencyReport> {
        let kegiatan: Option<ProgramWithTotal> = sqlx::query_as(
            r#"
            SELECT k.*, COALESCE((
                SELECT SUM(d.nominal) FROM donasi d
                WHERE d.kegiatan_id = k.id
                  AND d.jenis = 'Uang'
                  AND d.status = 'Diterima'
            ), 0) AS total_terkumpul
            FROM kegiatan k
            WHERE k.id = ?
            "#,
        )
        .bind(program_id)
        .fetch_optional(&self.pool)
        .await?;
        let kegiatan = kegiatan.ok_or_else(|| AppError::NotFound("Program not found".to_string()))?;

        let jumlah_donatur: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT donatur_id) FROM donasi \
             WHERE kegiatan_id = ? AND status = 'Diterima'",
        )
        .bind(program_id)
        .fetch_one(&self.pool)
        .await?;

        let total_pengeluaran: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(nominal), 0) FROM pengeluaran \
             WHERE kegiatan_id = ? AND jenis = 'uang'",
        )
        .bind(program_id)
        .fetch_one(&self.pool)
        .await?;

        let raw_income: Vec<(String, i64, i64, String)> = sqlx::query_as(
            r#"
            SELECT u.nama, d.is_anonim, d.nominal, date(d.created_at)
            FROM donasi d
            JOIN donatur p ON p.id = d.donatur_id
            JOIN users u ON u.id = p.user_id
            WHERE d.kegiatan_id = ? AND d.jenis = 'Uang' AND d.status = 'Diterima'
            ORDER BY d.created_at DESC
            "#,
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;

        let pemasukan = raw_income
            .into_iter()
            .map(|(nama, is_anonim, nominal, tanggal)| IncomeEntry {
                nama_donatur: if is_anonim != 0 {
                    ANONYMOUS_DONOR.to_string()
                } else {
                    nama
                },
                nominal,
                tanggal,
            })
            .collect();

        let pengeluaran: Vec<Expense> = sqlx::query_as(
            "SELECT * FROM pengeluaran WHERE kegiatan_id = ? ORDER BY tanggal DESC, id DESC",
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;

        let total_pemasukan = kegiatan.total_terkumpul;
        let persentase_target = if kegiatan.target_donasi > 0 {
            (total_pemasukan as f64 / kegiatan.target_donasi as f64) * 100.0
        } else {
            0.0
        };

        Ok(TransparencyReport {
            kegiatan,
            ringkasan: ProgramSummary {
                jumlah_donatur,
                total_pemasukan,
                total_pengeluaran,
                persentase_target,
            },
            pemasukan,
            pengeluaran,
        })
    }
}
