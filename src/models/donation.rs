use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Donation status. Starts at `Pending` and moves exactly once to one of
/// the two terminal states; every status-changing UPDATE is guarded on
/// `status = 'Pending'` in the same statement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
pub enum DonationStatus {
    #[serde(rename = "Pending")]
    #[sqlx(rename = "Pending")]
    Pending,
    #[serde(rename = "Diterima")]
    #[sqlx(rename = "Diterima")]
    Diterima,
    #[serde(rename = "Ditolak")]
    #[sqlx(rename = "Ditolak")]
    Ditolak,
}

impl std::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DonationStatus::Pending => write!(f, "Pending"),
            DonationStatus::Diterima => write!(f, "Diterima"),
            DonationStatus::Ditolak => write!(f, "Ditolak"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
pub enum DonationKind {
    #[serde(rename = "Uang")]
    #[sqlx(rename = "Uang")]
    Uang,
    #[serde(rename = "Barang")]
    #[sqlx(rename = "Barang")]
    Barang,
}

impl std::fmt::Display for DonationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DonationKind::Uang => write!(f, "Uang"),
            DonationKind::Barang => write!(f, "Barang"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
pub enum PaymentMethod {
    #[serde(rename = "Midtrans")]
    #[sqlx(rename = "Midtrans")]
    Midtrans,
    #[serde(rename = "Manual")]
    #[sqlx(rename = "Manual")]
    Manual,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
pub enum DeliveryMethod {
    #[serde(rename = "Self-Delivery")]
    #[sqlx(rename = "Self-Delivery")]
    SelfDelivery,
    #[serde(rename = "Pick-up")]
    #[sqlx(rename = "Pick-up")]
    PickUp,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Donation {
    pub id: i64,
    pub donatur_id: i64,
    pub kegiatan_id: i64,
    pub jenis: DonationKind,
    pub nominal: Option<i64>,
    pub deskripsi_barang: Option<String>,
    pub metode_pembayaran: Option<PaymentMethod>,
    pub metode_pengiriman: Option<DeliveryMethod>,
    pub nomor_resi: Option<String>,
    pub is_anonim: bool,
    pub status: DonationStatus,
    pub alasan_penolakan: Option<String>,
    pub admin_id: Option<i64>,
    pub order_id: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Pickup details supplied with a `Pick-up` goods donation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PickupDetails {
    pub alamat: String,
    #[schema(example = "2025-02-10 09:00")]
    pub tanggal_penjemputan: String,
    pub catatan: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateDonationRequest {
    pub kegiatan_id: i64,
    pub jenis: DonationKind,
    pub nominal: Option<i64>,
    pub deskripsi_barang: Option<String>,
    pub metode_pembayaran: Option<PaymentMethod>,
    pub metode_pengiriman: Option<DeliveryMethod>,
    #[serde(default)]
    pub is_anonim: bool,
    pub penjemputan: Option<PickupDetails>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateDonationResponse {
    pub donasi: Donation,
    /// Snap token for the hosted payment page; only present for
    /// gateway-processed money donations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyDonationRequest {
    pub status: DonationStatus,
    pub alasan_penolakan: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SetTrackingNumberRequest {
    #[schema(example = "JNE123456789")]
    pub nomor_resi: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DonationQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<DonationStatus>,
    pub jenis: Option<DonationKind>,
    pub metode_pengiriman: Option<DeliveryMethod>,
    pub kegiatan_id: Option<i64>,
}
