use crate::error::{AppError, AppResult};
use crate::models::*;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_profile(&self, user_id: i64) -> AppResult<ProfileResponse> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let user = user.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let donatur: Option<Donatur> = sqlx::query_as("SELECT * FROM donatur WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let admin: Option<Admin> = sqlx::query_as("SELECT * FROM admin WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(ProfileResponse {
            user: UserResponse {
                id: user.id,
                email: user.email,
                nama: user.nama,
                role: user.role,
                jabatan: admin.map(|a| a.jabatan),
            },
            donatur,
        })
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> AppResult<ProfileResponse> {
        if let Some(no_hp) = &request.no_hp {
            crate::utils::validate_indonesian_phone(no_hp)?;
        }

        if let Some(nama) = &request.nama {
            if nama.trim().is_empty() {
                return Err(AppError::ValidationError("Name cannot be empty".to_string()));
            }
            sqlx::query("UPDATE users SET nama = ? WHERE id = ?")
                .bind(nama)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        }

        if request.no_hp.is_some() || request.alamat.is_some() {
            let result = sqlx::query(
                "UPDATE donatur SET no_hp = COALESCE(?, no_hp), alamat = COALESCE(?, alamat) WHERE user_id = ?",
            )
            .bind(&request.no_hp)
            .bind(&request.alamat)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::NotFound("Donor profile not found".to_string()));
            }
        }

        self.get_profile(user_id).await
    }
}
