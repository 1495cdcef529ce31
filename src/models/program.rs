use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
pub enum ProgramStatus {
    #[serde(rename = "Draft")]
    #[sqlx(rename = "Draft")]
    Draft,
    #[serde(rename = "Aktif")]
    #[sqlx(rename = "Aktif")]
    Aktif,
    #[serde(rename = "Selesai")]
    #[sqlx(rename = "Selesai")]
    Selesai,
}

impl std::fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgramStatus::Draft => write!(f, "Draft"),
            ProgramStatus::Aktif => write!(f, "Aktif"),
            ProgramStatus::Selesai => write!(f, "Selesai"),
        }
    }
}

impl ProgramStatus {
    /// Lifecycle runs forward only: Draft -> Aktif -> Selesai.
    pub fn predecessor(&self) -> Option<ProgramStatus> {
        match self {
            ProgramStatus::Draft => None,
            ProgramStatus::Aktif => Some(ProgramStatus::Draft),
            ProgramStatus::Selesai => Some(ProgramStatus::Aktif),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Program {
    pub id: i64,
    pub nama: String,
    pub deskripsi: String,
    pub poster_url: Option<String>,
    pub tanggal_mulai: String,
    pub target_donasi: i64,
    pub status: ProgramStatus,
    pub created_at: NaiveDateTime,
}

/// Program plus its derived collected total. The total is never stored;
/// it is recomputed from accepted money donations on every read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProgramWithTotal {
    pub id: i64,
    pub nama: String,
    pub deskripsi: String,
    pub poster_url: Option<String>,
    pub tanggal_mulai: String,
    pub target_donasi: i64,
    pub status: ProgramStatus,
    pub created_at: NaiveDateTime,
    pub total_terkumpul: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateProgramRequest {
    #[schema(example = "Bantuan Banjir Demak")]
    pub nama: String,
    pub deskripsi: String,
    #[schema(example = "2025-03-01")]
    pub tanggal_mulai: String,
    pub target_donasi: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateProgramStatusRequest {
    pub status: ProgramStatus,
}
