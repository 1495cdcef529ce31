use crate::error::AppError;
use crate::models::user::{AuthUser, Jabatan, Role};
use crate::utils::JwtService;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::str::FromStr;

// Public path table. Read-only program and transparency endpoints are
// public for GET only; writes under the same prefixes still authenticate.
struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
    get_only_prefixes: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec!["/swagger-ui", "/swagger-ui/", "/api-docs/openapi.json"],
            prefix_paths: vec!["/swagger-ui/", "/api-docs/", "/api/v1/auth/", "/webhook/"],
            get_only_prefixes: vec!["/api/v1/kegiatan", "/api/v1/laporan/transparansi"],
        }
    }

    fn is_public(&self, path: &str, method: &Method) -> bool {
        if self.exact_paths.contains(&path) {
            return true;
        }

        if self
            .prefix_paths
            .iter()
            .any(|&prefix| path.starts_with(prefix))
        {
            return true;
        }

        method == Method::GET
            && self
                .get_only_prefixes
                .iter()
                .any(|&prefix| path.starts_with(prefix))
    }
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // CORS preflight passes through untouched.
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        if self.public_paths.is_public(req.path(), req.method()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let auth_header = req.headers().get("Authorization");

        let token = if let Some(auth_value) = auth_header {
            if let Ok(auth_str) = auth_value.to_str() {
                auth_str.strip_prefix("Bearer ")
            } else {
                None
            }
        } else {
            None
        };

        if let Some(token) = token {
            match self.jwt_service.verify_access_token(token) {
                Ok(claims) => {
                    let user_id = claims.sub.parse::<i64>().unwrap_or(0);
                    let role = Role::from_str(&claims.role).unwrap_or(Role::Donatur);
                    let jabatan = claims
                        .jabatan
                        .as_deref()
                        .and_then(|j| Jabatan::from_str(j).ok());

                    req.extensions_mut().insert(AuthUser {
                        user_id,
                        role,
                        jabatan,
                    });
                    let fut = self.service.call(req);
                    Box::pin(fut)
                }
                Err(_) => {
                    let error = AppError::AuthError("Invalid access token".to_string());
                    Box::pin(async move { Err(error.into()) })
                }
            }
        } else {
            let error = AppError::AuthError("Missing access token".to_string());
            Box::pin(async move { Err(error.into()) })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        let paths = PublicPaths::new();

        assert!(paths.is_public("/api/v1/auth/login", &Method::POST));
        assert!(paths.is_public("/webhook/midtrans", &Method::POST));
        assert!(paths.is_public("/api/v1/kegiatan", &Method::GET));
        assert!(paths.is_public("/api/v1/kegiatan/3", &Method::GET));
        assert!(paths.is_public("/api/v1/laporan/transparansi/3", &Method::GET));

        // Writes under public read prefixes still require auth.
        assert!(!paths.is_public("/api/v1/kegiatan", &Method::POST));
        assert!(!paths.is_public("/api/v1/kegiatan/3/status", &Method::PUT));
        assert!(!paths.is_public("/api/v1/donasi", &Method::POST));
        assert!(!paths.is_public("/api/v1/laporan/dashboard", &Method::GET));
    }
}
