use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
pub enum PickupStatus {
    #[serde(rename = "Dijadwalkan")]
    #[sqlx(rename = "Dijadwalkan")]
    Dijadwalkan,
    #[serde(rename = "Dalam Perjalanan")]
    #[sqlx(rename = "Dalam Perjalanan")]
    DalamPerjalanan,
    #[serde(rename = "Selesai")]
    #[sqlx(rename = "Selesai")]
    Selesai,
    #[serde(rename = "Batal")]
    #[sqlx(rename = "Batal")]
    Batal,
}

impl std::fmt::Display for PickupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickupStatus::Dijadwalkan => write!(f, "Dijadwalkan"),
            PickupStatus::DalamPerjalanan => write!(f, "Dalam Perjalanan"),
            PickupStatus::Selesai => write!(f, "Selesai"),
            PickupStatus::Batal => write!(f, "Batal"),
        }
    }
}

/// One row per goods donation that needs physical movement (1:1 with the
/// donation). Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PickupSchedule {
    pub id: i64,
    pub donasi_id: i64,
    pub status_penjemputan: PickupStatus,
    pub alamat: String,
    pub tanggal_penjemputan: String,
    pub catatan: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePickupStatusRequest {
    pub status_penjemputan: PickupStatus,
    pub catatan: Option<String>,
}

/// Donor-facing tracking view: the donation, its logistics row if one
/// exists, and the derived step index (0 = waiting for tracking number /
/// not scheduled, 1 = in progress, 2 = received).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrackingResponse {
    pub donasi: super::donation::Donation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jadwal: Option<PickupSchedule>,
    pub langkah: i64,
}
