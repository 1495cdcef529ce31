use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::donation::{DeliveryMethod, DonationKind, DonationStatus};
use super::expense::Expense;
use super::program::ProgramWithTotal;

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StatusCount {
    pub status: DonationStatus,
    pub jumlah: i64,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct KindCount {
    pub jenis: DonationKind,
    pub jumlah: i64,
}

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DeliveryCount {
    pub metode_pengiriman: DeliveryMethod,
    pub jumlah: i64,
}

/// One day of the trailing-7-day trend.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TrendPoint {
    pub tanggal: String,
    pub jumlah: i64,
    pub total_nominal: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_donasi: i64,
    pub total_terkumpul: i64,
    pub donatur_unik: i64,
    pub per_status: Vec<StatusCount>,
    pub per_jenis: Vec<KindCount>,
    pub per_pengiriman: Vec<DeliveryCount>,
    pub tren_harian: Vec<TrendPoint>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProgramSummary {
    pub jumlah_donatur: i64,
    pub total_pemasukan: i64,
    pub total_pengeluaran: i64,
    pub persentase_target: f64,
}

/// A single accepted money donation on the public report. `nama_donatur`
/// is already anonymized when the donor asked for it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IncomeEntry {
    pub nama_donatur: String,
    pub nominal: i64,
    pub tanggal: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransparencyReport {
    pub kegiatan: ProgramWithTotal,
    pub ringkasan: ProgramSummary,
    pub pemasukan: Vec<IncomeEntry>,
    pub pengeluaran: Vec<Expense>,
}
