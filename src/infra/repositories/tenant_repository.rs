//! Tenant repository.
//!
//! Writes that must be atomic with other rows (provisioning, deletion) go
//! through the transaction-bound repository in the unit of work; this store
//! only serves reads.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::admin::Entity as AdminEntity;
use super::entities::tenant::{self, ActiveModel, Entity as TenantEntity};
use super::platform_admin_repository;
use crate::config::TENANT_STATUS_ACTIVE;
use crate::domain::{Admin, NewTenant, Tenant, TenantDetails};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Conflict label used when a tenant code is already taken
pub const TENANT_CODE_CONFLICT: &str = "Tenant code";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>>;

    /// Tenant with its superadmin and creating platform admin
    async fn find_details(&self, id: Uuid) -> AppResult<Option<TenantDetails>>;

    /// Every tenant with owners, newest first
    async fn list_details(&self) -> AppResult<Vec<TenantDetails>>;

    /// Every tenant, newest first
    async fn list(&self) -> AppResult<Vec<Tenant>>;
}

pub struct TenantStore {
    db: DatabaseConnection,
}

impl TenantStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TenantRepository for TenantStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>> {
        find_by_id(&self.db, id).await
    }

    async fn find_details(&self, id: Uuid) -> AppResult<Option<TenantDetails>> {
        let Some(tenant) = find_by_id(&self.db, id).await? else {
            return Ok(None);
        };
        let mut details = attach_owners(&self.db, vec![tenant]).await?;
        Ok(details.pop())
    }

    async fn list_details(&self) -> AppResult<Vec<TenantDetails>> {
        let tenants = self.list().await?;
        attach_owners(&self.db, tenants).await
    }

    async fn list(&self) -> AppResult<Vec<Tenant>> {
        let models = TenantEntity::find()
            .order_by_desc(tenant::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Tenant::from).collect())
    }
}

/// Batch load superadmins and creating platform admins for a page of tenants.
async fn attach_owners<C: ConnectionTrait>(
    conn: &C,
    tenants: Vec<Tenant>,
) -> AppResult<Vec<TenantDetails>> {
    let super_admin_ids: Vec<Uuid> = tenants.iter().filter_map(|t| t.super_admin_id).collect();
    let creator_ids: Vec<Uuid> = tenants
        .iter()
        .filter_map(|t| t.created_by_platform_admin)
        .collect();

    let super_admins: HashMap<Uuid, Admin> = if super_admin_ids.is_empty() {
        HashMap::new()
    } else {
        AdminEntity::find()
            .filter(super::entities::admin::Column::Id.is_in(super_admin_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|m| (m.id, Admin::from(m)))
            .collect()
    };
    let creators = platform_admin_repository::load_many(conn, creator_ids).await?;

    Ok(tenants
        .into_iter()
        .map(|tenant| TenantDetails {
            super_admin: tenant
                .super_admin_id
                .and_then(|id| super_admins.get(&id).cloned()),
            created_by: tenant
                .created_by_platform_admin
                .and_then(|id| creators.get(&id).cloned()),
            tenant,
        })
        .collect())
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<Tenant>> {
    let result = TenantEntity::find_by_id(id).one(conn).await?;
    Ok(result.map(Tenant::from))
}

pub(crate) async fn find_by_code<C: ConnectionTrait>(
    conn: &C,
    code: &str,
) -> AppResult<Option<Tenant>> {
    let result = TenantEntity::find()
        .filter(tenant::Column::Code.eq(code))
        .one(conn)
        .await?;

    Ok(result.map(Tenant::from))
}

pub(crate) async fn insert<C: ConnectionTrait>(conn: &C, new: NewTenant) -> AppResult<Tenant> {
    let now = chrono::Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(new.name),
        code: Set(new.code),
        plan_id: Set(new.plan_id),
        status: Set(TENANT_STATUS_ACTIVE.to_string()),
        created_by_platform_admin: Set(Some(new.created_by_platform_admin)),
        super_admin_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model
        .insert(conn)
        .await
        .map_err(|e| AppError::from_write(e, TENANT_CODE_CONFLICT))?;
    Ok(Tenant::from(model))
}

pub(crate) async fn set_super_admin<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    admin_id: Uuid,
) -> AppResult<Tenant> {
    let model = TenantEntity::find_by_id(tenant_id)
        .one(conn)
        .await?
        .ok_or_not_found("Tenant")?;

    let mut active: ActiveModel = model.into();
    active.super_admin_id = Set(Some(admin_id));
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(conn).await?;
    Ok(Tenant::from(model))
}

pub(crate) async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<()> {
    let result = TenantEntity::delete_by_id(id).exec(conn).await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Tenant"));
    }

    Ok(())
}
