use crate::error::{AppError, AppResult};
use crate::models::user::{AuthUser, Jabatan, Role};
use actix_web::{HttpMessage, HttpRequest};

/// Access requirement a handler declares once. Super Admin satisfies any
/// admin-title requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRequirement {
    /// Any authenticated user.
    Authenticated,
    /// Coarse donor role.
    Donor,
    /// Admin role, any title.
    AnyAdmin,
    /// Admin role with a specific title.
    Admin(Jabatan),
}

/// The one policy-evaluation function all handlers go through.
pub fn authorize(user: &AuthUser, requirement: AccessRequirement) -> AppResult<()> {
    match requirement {
        AccessRequirement::Authenticated => Ok(()),
        AccessRequirement::Donor => {
            if user.role == Role::Donatur {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
        AccessRequirement::AnyAdmin => {
            if user.role == Role::Admin {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
        AccessRequirement::Admin(required) => {
            if user.role != Role::Admin {
                return Err(AppError::Forbidden);
            }
            match user.jabatan {
                Some(Jabatan::SuperAdmin) => Ok(()),
                Some(j) if j == required => Ok(()),
                _ => Err(AppError::Forbidden),
            }
        }
    }
}

/// Pulls the identity the auth middleware stored on the request and checks
/// it against the handler's requirement in one step.
pub fn require(req: &HttpRequest, requirement: AccessRequirement) -> AppResult<AuthUser> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))?;

    authorize(&user, requirement)?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, jabatan: Option<Jabatan>) -> AuthUser {
        AuthUser {
            user_id: 1,
            role,
            jabatan,
        }
    }

    #[test]
    fn test_donor_requirement() {
        assert!(authorize(&user(Role::Donatur, None), AccessRequirement::Donor).is_ok());
        assert!(
            authorize(
                &user(Role::Admin, Some(Jabatan::SuperAdmin)),
                AccessRequirement::Donor
            )
            .is_err()
        );
    }

    #[test]
    fn test_admin_title_requirement() {
        let operasional = user(Role::Admin, Some(Jabatan::AdminOperasional));
        let program = user(Role::Admin, Some(Jabatan::AdminProgram));
        let super_admin = user(Role::Admin, Some(Jabatan::SuperAdmin));
        let donor = user(Role::Donatur, None);

        let verify = AccessRequirement::Admin(Jabatan::AdminOperasional);
        assert!(authorize(&operasional, verify).is_ok());
        assert!(authorize(&super_admin, verify).is_ok());
        assert!(authorize(&program, verify).is_err());
        assert!(authorize(&donor, verify).is_err());

        let manage = AccessRequirement::Admin(Jabatan::AdminProgram);
        assert!(authorize(&program, manage).is_ok());
        assert!(authorize(&super_admin, manage).is_ok());
        assert!(authorize(&operasional, manage).is_err());
    }

    #[test]
    fn test_admin_without_title() {
        let titleless = user(Role::Admin, None);
        assert!(authorize(&titleless, AccessRequirement::AnyAdmin).is_ok());
        assert!(
            authorize(
                &titleless,
                AccessRequirement::Admin(Jabatan::AdminOperasional)
            )
            .is_err()
        );
    }
}
