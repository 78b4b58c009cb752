//! Staff accounts: registration, login, passwords and roles.

use std::sync::Arc;

use log::info;

use crate::auth::password::MIN_PASSWORD_LEN;
use crate::auth::{create_token, hash_password, verify_password, JwtConfig};
use crate::config::AdminConfig;
use crate::domain::{DomainError, DomainResult, RepositoryProvider, User, UserRole};

/// Returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

pub struct IdentityService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash(password: &str) -> DomainResult<String> {
    hash_password(password)
        .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))
}

fn check_password_len(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

impl IdentityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> DomainResult<User> {
        check_password_len(password)?;
        let email = normalize_email(email);
        if self.repos.users().find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".into()));
        }

        let user = User::new(name.trim(), email, hash(password)?, UserRole::User);
        self.repos.users().save(user.clone()).await?;
        info!("New user registered: {} ({})", user.email, user.id);
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let invalid = || DomainError::Unauthorized("Invalid credentials".into());

        let user = self
            .repos
            .users()
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &user.password_hash) {
            return Err(invalid());
        }

        let token = create_token(&user, &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expires_in_secs(),
            user,
        })
    }

    pub async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let mut user = self.get_user(user_id).await?;
        if !verify_password(current_password, &user.password_hash) {
            return Err(DomainError::Unauthorized(
                "Current password is incorrect".into(),
            ));
        }
        check_password_len(new_password)?;

        user.password_hash = hash(new_password)?;
        user.updated_at = chrono::Utc::now();
        self.repos.users().update(user).await?;
        info!("Password changed for user {}", user_id);
        Ok(())
    }

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.repos.users().find_all().await
    }

    pub async fn change_role(&self, email: &str, role: UserRole) -> DomainResult<User> {
        let email = normalize_email(email);
        let mut user = self
            .repos
            .users()
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "User",
                field: "email",
                value: email,
            })?;

        user.role = role;
        user.updated_at = chrono::Utc::now();
        self.repos.users().update(user.clone()).await?;
        info!("Role of {} set to {}", user.email, role);
        Ok(user)
    }

    /// Create the configured admin when the users table is empty
    pub async fn bootstrap_admin(&self, admin: &AdminConfig) -> DomainResult<Option<User>> {
        if self.repos.users().count().await? > 0 {
            return Ok(None);
        }
        check_password_len(&admin.password)?;
        let user = User::new(
            admin.name.trim(),
            normalize_email(&admin.email),
            hash(&admin.password)?,
            UserRole::Admin,
        );
        self.repos.users().save(user.clone()).await?;
        info!("Created bootstrap admin {}", user.email);
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::repositories;

    async fn service() -> IdentityService {
        IdentityService::new(repositories().await, JwtConfig::new("test", 1))
    }

    #[tokio::test]
    async fn register_then_login() {
        let svc = service().await;
        let user = svc
            .register("Dewi", "Dewi@Example.com ", "password-1")
            .await
            .unwrap();
        assert_eq!(user.email, "dewi@example.com");
        assert_eq!(user.role, UserRole::User);

        let auth = svc.login("dewi@example.com", "password-1").await.unwrap();
        assert_eq!(auth.token_type, "Bearer");
        assert_eq!(auth.expires_in, 3600);
        assert_eq!(auth.user.id, user.id);
    }

    #[tokio::test]
    async fn login_failures_look_the_same() {
        let svc = service().await;
        svc.register("Dewi", "dewi@example.com", "password-1")
            .await
            .unwrap();

        for (email, password) in [
            ("dewi@example.com", "wrong-pass"),
            ("nobody@example.com", "password-1"),
        ] {
            let err = svc.login(email, password).await.unwrap_err();
            assert!(matches!(err, DomainError::Unauthorized(ref m) if m == "Invalid credentials"));
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = service().await;
        svc.register("A", "a@example.com", "password-1").await.unwrap();
        let err = svc
            .register("B", "a@example.com", "password-2")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn change_password_requires_current() {
        let svc = service().await;
        let user = svc.register("A", "a@example.com", "password-1").await.unwrap();

        let err = svc
            .change_password(&user.id, "nope-nope", "password-2")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let err = svc
            .change_password(&user.id, "password-1", "short")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        svc.change_password(&user.id, "password-1", "password-2")
            .await
            .unwrap();
        assert!(svc.login("a@example.com", "password-2").await.is_ok());
    }

    #[tokio::test]
    async fn change_role_by_email() {
        let svc = service().await;
        svc.register("A", "a@example.com", "password-1").await.unwrap();
        let user = svc.change_role("A@example.com", UserRole::Admin).await.unwrap();
        assert!(user.is_admin());

        let err = svc
            .change_role("ghost@example.com", UserRole::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { field: "email", .. }));
    }

    #[tokio::test]
    async fn bootstrap_admin_runs_once() {
        let svc = service().await;
        let admin = AdminConfig::default();
        let created = svc.bootstrap_admin(&admin).await.unwrap().unwrap();
        assert!(created.is_admin());
        assert!(svc.bootstrap_admin(&admin).await.unwrap().is_none());
        assert_eq!(svc.list_users().await.unwrap().len(), 1);
    }
}
