use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{PaginatedResponse, PaginationParams};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct ExpenseService {
    pool: SqlitePool,
}

impl ExpenseService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Expenses are create-only; there is no edit or delete surface.
    pub async fn create_expense(
        &self,
        admin_user_id: i64,
        request: CreateExpenseRequest,
    ) -> AppResult<Expense> {
        match request.jenis {
            ExpenseKind::Uang => {
                match request.nominal {
                    Some(n) if n > 0 => {}
                    _ => {
                        return Err(AppError::ValidationError(
                            "A money expense requires a positive nominal".to_string(),
                        ));
                    }
                }
                if request.barang.is_some() {
                    return Err(AppError::ValidationError(
                        "Money expenses carry no item description".to_string(),
                    ));
                }
            }
            ExpenseKind::Barang => {
                if request
                    .barang
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .is_none()
                {
                    return Err(AppError::ValidationError(
                        "A goods expense requires an item description".to_string(),
                    ));
                }
                if request.nominal.is_some() {
                    return Err(AppError::ValidationError(
                        "Goods expenses carry no nominal".to_string(),
                    ));
                }
            }
        }

        if let Some(kegiatan_id) = request.kegiatan_id {
            let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM kegiatan WHERE id = ?")
                .bind(kegiatan_id)
                .fetch_optional(&self.pool)
                .await?;
            if exists.is_none() {
                return Err(AppError::NotFound("Program not found".to_string()));
            }
        }

        let admin: Option<Admin> = sqlx::query_as("SELECT * FROM admin WHERE user_id = ?")
            .bind(admin_user_id)
            .fetch_optional(&self.pool)
            .await?;
        let admin = admin.ok_or_else(|| AppError::NotFound("Admin profile not found".to_string()))?;

        let expense_id = sqlx::query(
            "INSERT INTO pengeluaran (kegiatan_id, admin_id, tanggal, deskripsi, jenis, nominal, barang) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.kegiatan_id)
        .bind(admin.id)
        .bind(&request.tanggal)
        .bind(&request.deskripsi)
        .bind(request.jenis)
        .bind(request.nominal)
        .bind(&request.barang)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        let expense: Expense = sqlx::query_as("SELECT * FROM pengeluaran WHERE id = ?")
            .bind(expense_id)
            .fetch_one(&self.pool)
            .await?;

        log::info!("Expense {expense_id} recorded by admin {}", admin.id);
        Ok(expense)
    }

    pub async fn list_expenses(
        &self,
        query: &ExpenseQuery,
    ) -> AppResult<PaginatedResponse<Expense>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM pengeluaran WHERE (? IS NULL OR kegiatan_id = ?)",
        )
        .bind(query.kegiatan_id)
        .bind(query.kegiatan_id)
        .fetch_one(&self.pool)
        .await?;

        let expenses: Vec<Expense> = sqlx::query_as(
            "SELECT * FROM pengeluaran WHERE (? IS NULL OR kegiatan_id = ?) \
             ORDER BY tanggal DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(query.kegiatan_id)
        .bind(query.kegiatan_id)
        .bind(params.get_limit() as i64)
        .bind(params.get_offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(PaginatedResponse::new(expenses, &params, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::donation_service::test_support::{seed_base, test_pool};

    async fn setup() -> ExpenseService {
        let pool = test_pool().await;
        seed_base(&pool).await;
        ExpenseService::new(pool)
    }

    fn money_expense(kegiatan_id: Option<i64>) -> CreateExpenseRequest {
        CreateExpenseRequest {
            kegiatan_id,
            tanggal: "2025-02-01".to_string(),
            deskripsi: "Sewa truk".to_string(),
            jenis: ExpenseKind::Uang,
            nominal: Some(750_000),
            barang: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let service = setup().await;

        let program_scoped = service.create_expense(2, money_expense(Some(1))).await.unwrap();
        assert_eq!(program_scoped.nominal, Some(750_000));

        // Organization-wide expense has no program reference.
        let org_wide = service.create_expense(2, money_expense(None)).await.unwrap();
        assert!(org_wide.kegiatan_id.is_none());

        let all = service
            .list_expenses(&ExpenseQuery {
                page: None,
                per_page: None,
                kegiatan_id: None,
            })
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);

        let scoped = service
            .list_expenses(&ExpenseQuery {
                page: None,
                per_page: None,
                kegiatan_id: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(scoped.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_kind_fields_are_mutually_exclusive() {
        let service = setup().await;

        let mut bad = money_expense(Some(1));
        bad.barang = Some("Terpal".to_string());
        assert!(matches!(
            service.create_expense(2, bad).await,
            Err(AppError::ValidationError(_))
        ));

        let goods_without_item = CreateExpenseRequest {
            kegiatan_id: None,
            tanggal: "2025-02-01".to_string(),
            deskripsi: "Distribusi".to_string(),
            jenis: ExpenseKind::Barang,
            nominal: None,
            barang: None,
        };
        assert!(matches!(
            service.create_expense(2, goods_without_item).await,
            Err(AppError::ValidationError(_))
        ));
    }
}
