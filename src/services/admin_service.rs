//! Admin lifecycle - superadmins managing the module-scoped admins of their tenant.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::authorization::{can_create_admin, visible_in};
use crate::domain::{
    AccountRef, Admin, AdminChanges, AdminFilter, AdminLevel, AdminRecord, ModuleScope, NewAdmin,
    Password,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::ADMIN_EMAIL_CONFLICT;
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Input for a new module-scoped admin
#[derive(Debug, Clone)]
pub struct CreateAdmin {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    /// Raw module code, normalized before storage
    pub module_scope: String,
    pub tenant_id: Uuid,
    /// Superadmin performing the creation
    pub created_by: Uuid,
}

/// Partial update of an admin; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateAdmin {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub module_scope: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AdminService: Send + Sync {
    /// Create a regular admin inside the creator's tenant
    async fn create_admin(&self, input: CreateAdmin) -> AppResult<Admin>;

    /// Admins of a tenant, newest first, with creator annotation
    async fn list_tenant_admins(
        &self,
        tenant_id: Uuid,
        filter: AdminFilter,
    ) -> AppResult<Vec<AdminRecord>>;

    /// Point lookup; with `tenant_id`, an admin of another tenant is `NotFound`
    async fn get_admin(&self, id: Uuid, tenant_id: Option<Uuid>) -> AppResult<AdminRecord>;

    /// Update a regular admin. Superadmins are not editable here.
    async fn update_admin(&self, id: Uuid, tenant_id: Uuid, update: UpdateAdmin)
        -> AppResult<Admin>;

    /// Hard delete a regular admin. Superadmins are not deletable here.
    async fn delete_admin(&self, id: Uuid, tenant_id: Uuid) -> AppResult<()>;
}

pub struct AdminManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AdminManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Fetch an admin of the tenant that this surface may modify.
    async fn regular_admin(&self, id: Uuid, tenant_id: Uuid, action: &str) -> AppResult<Admin> {
        let admin = self
            .uow
            .admins()
            .find_in_tenant(id, tenant_id)
            .await?
            .ok_or_not_found("Admin")?;

        if admin.is_super_admin() {
            return Err(AppError::forbidden(format!(
                "Cannot {} superadmin through this endpoint",
                action
            )));
        }
        Ok(admin)
    }
}

#[async_trait]
impl<U: UnitOfWork> AdminService for AdminManager<U> {
    async fn create_admin(&self, input: CreateAdmin) -> AppResult<Admin> {
        let module_scope = ModuleScope::parse(&input.module_scope)?;
        Password::check_length(&input.password)?;

        let creator = self.uow.admins().find_by_id(input.created_by).await?;
        if !creator.is_some_and(|c| can_create_admin(&c, input.tenant_id)) {
            return Err(AppError::forbidden(
                "Only superadmins can create admins in their tenant",
            ));
        }

        // The unique index decides races; this only gives the common case a clean error.
        if self.uow.admins().find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict(ADMIN_EMAIL_CONFLICT));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let admin = self
            .uow
            .admins()
            .create(NewAdmin {
                tenant_id: input.tenant_id,
                email: input.email,
                first_name: Some(input.first_name),
                last_name: Some(input.last_name),
                password_hash,
                level: AdminLevel::Admin,
                module_scope: Some(module_scope),
                created_by: Some(input.created_by),
            })
            .await?;

        tracing::info!(
            admin_id = %admin.id,
            tenant_id = %admin.tenant_id,
            module_scope = %module_scope,
            "Admin created"
        );
        Ok(admin)
    }

    async fn list_tenant_admins(
        &self,
        tenant_id: Uuid,
        filter: AdminFilter,
    ) -> AppResult<Vec<AdminRecord>> {
        self.uow.admins().list_by_tenant(tenant_id, filter).await
    }

    async fn get_admin(&self, id: Uuid, tenant_id: Option<Uuid>) -> AppResult<AdminRecord> {
        let admins = self.uow.admins();
        let admin = visible_in(admins.find_by_id(id).await?, tenant_id, "Admin")?;

        let creator = match admin.created_by {
            Some(creator_id) => admins.find_by_id(creator_id).await?.map(|c| AccountRef {
                id: c.id,
                email: c.email,
            }),
            None => None,
        };

        Ok(AdminRecord { admin, creator })
    }

    async fn update_admin(
        &self,
        id: Uuid,
        tenant_id: Uuid,
        update: UpdateAdmin,
    ) -> AppResult<Admin> {
        self.regular_admin(id, tenant_id, "update").await?;

        let module_scope = update
            .module_scope
            .as_deref()
            .map(ModuleScope::parse)
            .transpose()?;

        let admin = self
            .uow
            .admins()
            .update(
                id,
                tenant_id,
                AdminChanges {
                    first_name: update.first_name,
                    last_name: update.last_name,
                    module_scope,
                    is_active: update.is_active,
                },
            )
            .await?;

        tracing::info!(admin_id = %id, tenant_id = %tenant_id, "Admin updated");
        Ok(admin)
    }

    async fn delete_admin(&self, id: Uuid, tenant_id: Uuid) -> AppResult<()> {
        self.regular_admin(id, tenant_id, "delete").await?;
        self.uow.admins().delete(id, tenant_id).await?;

        tracing::info!(admin_id = %id, tenant_id = %tenant_id, "Admin deleted");
        Ok(())
    }
}
