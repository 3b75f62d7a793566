//! Unified login for superadmins and regular admins, which share one table.

use async_trait::async_trait;
use std::sync::Arc;

use super::{IssuedToken, TokenService};
use crate::domain::{Admin, Password, Principal, Tenant};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Authenticated admin with its tenant and a freshly issued token
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub admin: Admin,
    pub tenant: Tenant,
    pub token: IssuedToken,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AdminAuthService: Send + Sync {
    /// Token `type` is `super_admin` for superadmins and `admin` otherwise.
    async fn login(&self, email: String, password: String) -> AppResult<AdminSession>;
}

pub struct AdminAuthenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: Arc<dyn TokenService>,
}

impl<U: UnitOfWork> AdminAuthenticator<U> {
    pub fn new(uow: Arc<U>, tokens: Arc<dyn TokenService>) -> Self {
        Self { uow, tokens }
    }
}

#[async_trait]
impl<U: UnitOfWork> AdminAuthService for AdminAuthenticator<U> {
    async fn login(&self, email: String, password: String) -> AppResult<AdminSession> {
        let found = self.uow.admins().find_by_email(&email).await?;

        // Verify even when the email is unknown so timing reveals nothing.
        let password_valid =
            Password::verify_stored(found.as_ref().map(|a| a.password_hash.as_str()), &password);

        let admin = match found {
            Some(admin) if password_valid && admin.is_active => admin,
            Some(admin) if password_valid => {
                tracing::warn!(admin_id = %admin.id, "Login attempt on inactive admin");
                return Err(AppError::InvalidCredentials);
            }
            _ => return Err(AppError::InvalidCredentials),
        };

        let Some(tenant) = self.uow.tenants().find_by_id(admin.tenant_id).await? else {
            tracing::warn!(admin_id = %admin.id, "Admin is not associated with a tenant");
            return Err(AppError::InvalidCredentials);
        };

        let token = self.tokens.issue(&Principal::from(&admin))?;

        tracing::info!(
            admin_id = %admin.id,
            tenant_id = %tenant.id,
            super_admin = admin.is_super_admin(),
            "Admin logged in"
        );

        Ok(AdminSession {
            admin,
            tenant,
            token,
        })
    }
}
