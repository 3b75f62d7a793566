//! Platform admin management - the top of the hierarchy, never tenant-scoped.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::{IssuedToken, TokenService};
use crate::domain::{NewPlatformAdmin, Password, PlatformAdmin, PlatformAdminRecord, Principal};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::PLATFORM_ADMIN_EMAIL_CONFLICT;
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone)]
pub struct CreatePlatformAdmin {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct PlatformSession {
    pub admin: PlatformAdmin,
    pub token: IssuedToken,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PlatformAdminService: Send + Sync {
    async fn create_platform_admin(&self, input: CreatePlatformAdmin) -> AppResult<PlatformAdmin>;

    /// Newest first, each with its creator's id and email
    async fn list_platform_admins(&self) -> AppResult<Vec<PlatformAdminRecord>>;

    /// Fails with `InvalidCredentials` for unknown, inactive or mismatched accounts.
    async fn login(&self, email: String, password: String) -> AppResult<PlatformSession>;
}

pub struct PlatformAdminManager<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: Arc<dyn TokenService>,
}

impl<U: UnitOfWork> PlatformAdminManager<U> {
    pub fn new(uow: Arc<U>, tokens: Arc<dyn TokenService>) -> Self {
        Self { uow, tokens }
    }
}

#[async_trait]
impl<U: UnitOfWork> PlatformAdminService for PlatformAdminManager<U> {
    async fn create_platform_admin(&self, input: CreatePlatformAdmin) -> AppResult<PlatformAdmin> {
        let repo = self.uow.platform_admins();

        if repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict(PLATFORM_ADMIN_EMAIL_CONFLICT));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let admin = repo
            .create(NewPlatformAdmin {
                email: input.email,
                first_name: input.first_name,
                last_name: input.last_name,
                password_hash,
                created_by: input.created_by,
            })
            .await?;

        tracing::info!(
            platform_admin_id = %admin.id,
            created_by = ?admin.created_by,
            "Platform admin created"
        );
        Ok(admin)
    }

    async fn list_platform_admins(&self) -> AppResult<Vec<PlatformAdminRecord>> {
        self.uow.platform_admins().list_with_creator().await
    }

    async fn login(&self, email: String, password: String) -> AppResult<PlatformSession> {
        let found = self.uow.platform_admins().find_by_email(&email).await?;

        let password_valid =
            Password::verify_stored(found.as_ref().map(|a| a.password_hash.as_str()), &password);

        let admin = match found {
            Some(admin) if password_valid && admin.is_active => admin,
            _ => return Err(AppError::InvalidCredentials),
        };

        let token = self.tokens.issue(&Principal::from(&admin))?;
        tracing::info!(platform_admin_id = %admin.id, "Platform admin logged in");

        Ok(PlatformSession { admin, token })
    }
}
