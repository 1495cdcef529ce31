use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Expense kind uses lowercase literals, unlike donation kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
pub enum ExpenseKind {
    #[serde(rename = "uang")]
    #[sqlx(rename = "uang")]
    Uang,
    #[serde(rename = "barang")]
    #[sqlx(rename = "barang")]
    Barang,
}

impl std::fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpenseKind::Uang => write!(f, "uang"),
            ExpenseKind::Barang => write!(f, "barang"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Expense {
    pub id: i64,
    pub kegiatan_id: Option<i64>,
    pub admin_id: i64,
    pub tanggal: String,
    pub deskripsi: String,
    pub jenis: ExpenseKind,
    pub nominal: Option<i64>,
    pub barang: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateExpenseRequest {
    /// Absent for organization-wide expenses.
    pub kegiatan_id: Option<i64>,
    #[schema(example = "2025-02-01")]
    pub tanggal: String,
    pub deskripsi: String,
    pub jenis: ExpenseKind,
    pub nominal: Option<i64>,
    pub barang: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpenseQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub kegiatan_id: Option<i64>,
}
