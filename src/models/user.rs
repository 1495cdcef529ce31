use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Coarse role stored on `users.role`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
pub enum Role {
    #[serde(rename = "donatur")]
    #[sqlx(rename = "donatur")]
    Donatur,
    #[serde(rename = "admin")]
    #[sqlx(rename = "admin")]
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Donatur => write!(f, "donatur"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donatur" => Ok(Role::Donatur),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Fine-grained admin title stored on `admin.jabatan`. Super Admin is
/// allowed everything either of the other two titles is allowed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
pub enum Jabatan {
    #[serde(rename = "Admin Program")]
    #[sqlx(rename = "Admin Program")]
    AdminProgram,
    #[serde(rename = "Admin Operasional")]
    #[sqlx(rename = "Admin Operasional")]
    AdminOperasional,
    #[serde(rename = "Super Admin")]
    #[sqlx(rename = "Super Admin")]
    SuperAdmin,
}

impl std::fmt::Display for Jabatan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Jabatan::AdminProgram => write!(f, "Admin Program"),
            Jabatan::AdminOperasional => write!(f, "Admin Operasional"),
            Jabatan::SuperAdmin => write!(f, "Super Admin"),
        }
    }
}

impl std::str::FromStr for Jabatan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin Program" => Ok(Jabatan::AdminProgram),
            "Admin Operasional" => Ok(Jabatan::AdminOperasional),
            "Super Admin" => Ok(Jabatan::SuperAdmin),
            other => Err(format!("unknown jabatan: {other}")),
        }
    }
}

/// Authenticated identity injected into request extensions by the auth
/// middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: Role,
    pub jabatan: Option<Jabatan>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub nama: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Donatur {
    pub id: i64,
    pub user_id: i64,
    pub no_hp: String,
    pub alamat: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Admin {
    pub id: i64,
    pub user_id: i64,
    pub jabatan: Jabatan,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "budi@example.com")]
    pub email: String,
    #[schema(example = "Budi Santoso")]
    pub nama: String,
    #[schema(example = "Password123")]
    pub password: String,
    #[schema(example = "081234567890")]
    pub no_hp: String,
    #[schema(example = "Jl. Merdeka No. 1, Bandung")]
    pub alamat: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub nama: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jabatan: Option<Jabatan>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donatur: Option<Donatur>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub nama: Option<String>,
    pub no_hp: Option<String>,
    pub alamat: Option<String>,
}
