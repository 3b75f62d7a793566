//! Tenant lifecycle - atomic provisioning, cascading deletion, analytics.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::container::parallel;
use crate::config::ANALYTICS_CONCURRENCY;
use crate::domain::{
    AdminLevel, NewAdmin, NewTenant, Password, ProvisionedTenant, Tenant, TenantAnalytics,
    TenantDetails, TenantProvisioning, TenantUser,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::{ADMIN_EMAIL_CONFLICT, TENANT_CODE_CONFLICT};
use crate::infra::UnitOfWork;
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TenantService: Send + Sync {
    /// Insert the tenant, its superadmin and the back-reference as one unit.
    async fn create_tenant_with_superadmin(
        &self,
        input: TenantProvisioning,
    ) -> AppResult<ProvisionedTenant>;

    /// Newest first, with superadmin and creating platform admin
    async fn list_tenants(&self) -> AppResult<Vec<TenantDetails>>;

    async fn get_tenant(&self, id: Uuid) -> AppResult<TenantDetails>;

    /// Delete the tenant; every tenant-scoped row goes with it.
    async fn delete_tenant(&self, id: Uuid) -> AppResult<()>;

    /// Head counts for every tenant
    async fn tenant_analytics(&self) -> AppResult<Vec<TenantAnalytics>>;

    /// Users of a tenant, without placement when related tables are missing
    async fn tenant_users(&self, tenant_id: Uuid) -> AppResult<Vec<TenantUser>>;
}

pub struct TenantManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TenantManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn analytics_for(&self, tenant: Tenant) -> AppResult<TenantAnalytics> {
        let users = self.uow.users();
        let admins = self.uow.admins();

        let (total_users, total_admins, total_super_admins) = parallel::join3(
            users.count_by_tenant(tenant.id),
            admins.count_by_tenant(tenant.id, false),
            admins.count_by_tenant(tenant.id, true),
        )
        .await?;

        Ok(TenantAnalytics {
            tenant_id: tenant.id,
            tenant_name: tenant.name,
            tenant_code: tenant.code,
            total_users,
            total_employees: total_users,
            total_admins,
            total_super_admins,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> TenantService for TenantManager<U> {
    async fn create_tenant_with_superadmin(
        &self,
        input: TenantProvisioning,
    ) -> AppResult<ProvisionedTenant> {
        let password_hash = Password::new(&input.superadmin_password)?.into_string();

        let provisioned = with_transaction!(self.uow, |ctx| {
            let platform_admin_id = input.created_by_platform_admin;
            if ctx.platform_admins().find_by_id(platform_admin_id).await?.is_none() {
                return Err(AppError::not_found("Platform admin"));
            }
            if ctx.tenants().find_by_code(&input.tenant_code).await?.is_some() {
                return Err(AppError::conflict(TENANT_CODE_CONFLICT));
            }
            if ctx.admins().find_by_email(&input.superadmin_email).await?.is_some() {
                return Err(AppError::conflict(ADMIN_EMAIL_CONFLICT));
            }

            let tenant = ctx
                .tenants()
                .create(NewTenant {
                    name: input.tenant_name,
                    code: input.tenant_code,
                    plan_id: input.plan_id,
                    created_by_platform_admin: platform_admin_id,
                })
                .await?;

            // Platform admins live in their own table, so the superadmin has no creator.
            let superadmin = ctx
                .admins()
                .create(NewAdmin {
                    tenant_id: tenant.id,
                    email: input.superadmin_email,
                    first_name: Some(input.superadmin_first_name),
                    last_name: Some(input.superadmin_last_name),
                    password_hash,
                    level: AdminLevel::SuperAdmin,
                    module_scope: None,
                    created_by: None,
                })
                .await?;

            let tenant = ctx.tenants().set_super_admin(tenant.id, superadmin.id).await?;

            Ok(ProvisionedTenant { tenant, superadmin })
        })?;

        tracing::info!(
            tenant_id = %provisioned.tenant.id,
            tenant_code = %provisioned.tenant.code,
            admin_id = %provisioned.superadmin.id,
            platform_admin_id = ?provisioned.tenant.created_by_platform_admin,
            "Tenant provisioned with superadmin"
        );
        Ok(provisioned)
    }

    async fn list_tenants(&self) -> AppResult<Vec<TenantDetails>> {
        self.uow.tenants().list_details().await
    }

    async fn get_tenant(&self, id: Uuid) -> AppResult<TenantDetails> {
        self.uow
            .tenants()
            .find_details(id)
            .await?
            .ok_or_not_found("Tenant")
    }

    async fn delete_tenant(&self, id: Uuid) -> AppResult<()> {
        let (tenant, admin_count, user_count) = with_transaction!(self.uow, |ctx| {
            let tenant = ctx.tenants().find_by_id(id).await?.ok_or_not_found("Tenant")?;

            let admin_count = ctx.admins().count_by_tenant(id, false).await?
                + ctx.admins().count_by_tenant(id, true).await?;
            let user_count = ctx.users().count_by_tenant(id).await?;

            tracing::info!(
                tenant_id = %tenant.id,
                tenant_code = %tenant.code,
                admins = admin_count,
                users = user_count,
                "Deleting tenant"
            );

            ctx.tenants().delete(id).await?;
            Ok((tenant, admin_count, user_count))
        })?;

        tracing::info!(
            tenant_id = %tenant.id,
            tenant_code = %tenant.code,
            deleted_admins = admin_count,
            deleted_users = user_count,
            "Tenant deleted"
        );
        Ok(())
    }

    async fn tenant_analytics(&self) -> AppResult<Vec<TenantAnalytics>> {
        let tenants = self.uow.tenants().list().await?;
        parallel::join_all_limited(
            tenants.into_iter().map(|tenant| self.analytics_for(tenant)),
            ANALYTICS_CONCURRENCY,
        )
        .await
    }

    async fn tenant_users(&self, tenant_id: Uuid) -> AppResult<Vec<TenantUser>> {
        self.uow
            .tenants()
            .find_by_id(tenant_id)
            .await?
            .ok_or_not_found("Tenant")?;

        let users = self.uow.users();
        match users.list_by_tenant(tenant_id).await {
            Ok(rows) => Ok(rows),
            Err(e) if e.is_missing_relation() => {
                tracing::warn!(
                    tenant_id = %tenant_id,
                    error = ?e,
                    "Related tables missing, listing users without placement"
                );
                let rows = users.list_bare_by_tenant(tenant_id).await?;
                Ok(rows.into_iter().map(TenantUser::from).collect())
            }
            Err(e) => Err(e),
        }
    }
}
