use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AuthService {
    pool: SqlitePool,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: SqlitePool, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    /// Donor self-registration. Admin accounts are provisioned out of band.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        validate_password(&request.password)?;
        validate_indonesian_phone(&request.no_hp)?;

        if request.nama.trim().is_empty() {
            return Err(AppError::ValidationError("Name is required".to_string()));
        }

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(&request.email)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(AppError::ValidationError(
                "Email is already registered".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;

        // users + donatur rows commit together.
        let mut tx = self.pool.begin().await?;

        let user_id = sqlx::query(
            "INSERT INTO users (email, password_hash, nama, role) VALUES (?, ?, ?, 'donatur')",
        )
        .bind(&request.email)
        .bind(&password_hash)
        .bind(&request.nama)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        sqlx::query("INSERT INTO donatur (user_id, no_hp, alamat) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(&request.no_hp)
            .bind(&request.alamat)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        log::info!("Registered donor account for user {user_id}");
        self.issue_tokens(user_id, &request.email, &request.nama, Role::Donatur, None)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(&request.email)
            .fetch_optional(&self.pool)
            .await?;

        let user =
            user.ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError(
                "Invalid email or password".to_string(),
            ));
        }

        let jabatan = self.find_jabatan(user.id).await?;

        self.issue_tokens(user.id, &user.email, &user.nama, user.role, jabatan)
    }

    pub async fn refresh_token(&self, token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;

        // Role and title are re-read so revoked titles stop working at refresh.
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let user = user.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        let jabatan = self.find_jabatan(user.id).await?;

        self.issue_tokens(user.id, &user.email, &user.nama, user.role, jabatan)
    }

    async fn find_jabatan(&self, user_id: i64) -> AppResult<Option<Jabatan>> {
        let admin: Option<Admin> = sqlx::query_as("SELECT * FROM admin WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin.map(|a| a.jabatan))
    }

    fn issue_tokens(
        &self,
        user_id: i64,
        email: &str,
        nama: &str,
        role: Role,
        jabatan: Option<Jabatan>,
    ) -> AppResult<AuthResponse> {
        let role_str = role.to_string();
        let jabatan_str = jabatan.map(|j| j.to_string());

        let access_token = self.jwt_service.generate_access_token(
            user_id,
            &role_str,
            jabatan_str.as_deref(),
        )?;
        let refresh_token = self.jwt_service.generate_refresh_token(
            user_id,
            &role_str,
            jabatan_str.as_deref(),
        )?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
            user: UserResponse {
                id: user_id,
                email: email.to_string(),
                nama: nama.to_string(),
                role,
                jabatan,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::run_migrations;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup() -> AuthService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        AuthService::new(pool, JwtService::new("test-secret", 3600, 7200))
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            email: "budi@example.com".to_string(),
            nama: "Budi Santoso".to_string(),
            password: "Password123".to_string(),
            no_hp: "081234567890".to_string(),
            alamat: "Jl. Merdeka No. 1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let service = setup().await;

        let registered = service.register(register_request()).await.unwrap();
        assert_eq!(registered.user.role, Role::Donatur);
        assert!(registered.user.jabatan.is_none());

        let logged_in = service
            .login(LoginRequest {
                email: "budi@example.com".to_string(),
                password: "Password123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user.nama, "Budi Santoso");

        let wrong = service
            .login(LoginRequest {
                email: "budi@example.com".to_string(),
                password: "WrongPassword1".to_string(),
            })
            .await;
        assert!(matches!(wrong, Err(AppError::AuthError(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = setup().await;

        service.register(register_request()).await.unwrap();
        let second = service.register(register_request()).await;
        assert!(matches!(second, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_refresh_roundtrip() {
        let service = setup().await;

        let registered = service.register(register_request()).await.unwrap();
        let refreshed = service
            .refresh_token(&registered.refresh_token)
            .await
            .unwrap();
        assert_eq!(refreshed.user.email, "budi@example.com");

        // Access token is not accepted on the refresh path.
        assert!(service.refresh_token(&registered.access_token).await.is_err());
    }
}
