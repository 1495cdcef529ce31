use crate::error::{AppError, AppResult};
use crate::external::StorageService;
use crate::models::*;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct ProgramService {
    pool: SqlitePool,
    storage_service: StorageService,
}

impl ProgramService {
    pub fn new(pool: SqlitePool, storage_service: StorageService) -> Self {
        Self {
            pool,
            storage_service,
        }
    }

    pub async fn create_program(&self, request: CreateProgramRequest) -> AppResult<Program> {
        if request.nama.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Program name is required".to_string(),
            ));
        }
        if request.target_donasi <= 0 {
            return Err(AppError::ValidationError(
                "Fundraising target must be positive".to_string(),
            ));
        }

        let program_id = sqlx::query(
            "INSERT INTO kegiatan (nama, deskripsi, tanggal_mulai, target_donasi, status) \
             VALUES (?, ?, ?, ?, 'Draft')",
        )
        .bind(&request.nama)
        .bind(&request.deskripsi)
        .bind(&request.tanggal_mulai)
        .bind(request.target_donasi)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        log::info!("Program {program_id} created ({})", request.nama);
        self.get_program(program_id).await
    }

    /// Lifecycle runs forward only; the update is guarded on the expected
    /// predecessor so concurrent transitions cannot skip or repeat a step.
    pub async fn update_status(
        &self,
        program_id: i64,
        request: UpdateProgramStatusRequest,
    ) -> AppResult<Program> {
        let Some(expected) = request.status.predecessor() else {
            return Err(AppError::ValidationError(
                "A program cannot be moved back to Draft".to_string(),
            ));
        };

        let result = sqlx::query("UPDATE kegiatan SET status = ? WHERE id = ? AND status = ?")
            .bind(request.status)
            .bind(program_id)
            .bind(expected)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "Program not found or not in {expected} status"
            )));
        }

        log::info!("Program {program_id} moved to {}", request.status);
        self.get_program(program_id).await
    }

    /// Stores the new poster and removes the replaced asset afterwards.
    pub async fn update_poster(
        &self,
        program_id: i64,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<Program> {
        let program = self.get_program(program_id).await?;

        let poster_url = self
            .storage_service
            .upload_poster(bytes, content_type)
            .await?;

        sqlx::query("UPDATE kegiatan SET poster_url = ? WHERE id = ?")
            .bind(&poster_url)
            .bind(program_id)
            .execute(&self.pool)
            .await?;

        if let Some(old_url) = &program.poster_url {
            self.storage_service.delete_poster(old_url).await?;
        }

        self.get_program(program_id).await
    }

    pub async fn get_program(&self, program_id: i64) -> AppResult<Program> {
        let program: Option<Program> = sqlx::query_as("SELECT * FROM kegiatan WHERE id = ?")
            .bind(program_id)
            .fetch_optional(&self.pool)
            .await?;

        program.ok_or_else(|| AppError::NotFound("Program not found".to_string()))
    }

    /// Public listing: active programs with their derived collected totals,
    /// recomputed per request from accepted money donations.
    pub async fn list_active_with_totals(&self) -> AppResult<Vec<ProgramWithTotal>> {
        let programs: Vec<ProgramWithTotal> = sqlx::query_as(
            r#"
            SELECT k.*, COALESCE((
                SELECT SUM(d.nominal) FROM donasi d
                WHERE d.kegiatan_id = k.id
                  AND d.jenis = 'Uang'
                  AND d.status = 'Diterima'
            ), 0) AS total_terkumpul
            FROM kegiatan k
            WHERE k.status = 'Aktif'
            ORDER BY k.tanggal_mulai DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(programs)
    }

    pub async fn get_with_total(&self, program_id: i64) -> AppResult<ProgramWithTotal> {
        let program: Option<ProgramWithTotal> = sqlx::query_as(
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

        program.ok_or_else(|| AppError::NotFound("Program not found".to_string()))
    }
}
