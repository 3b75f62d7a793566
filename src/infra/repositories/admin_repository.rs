//! Admin repository: superadmins and module-scoped admins of a tenant.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::admin::{self, ActiveModel, Entity as AdminEntity};
use crate::domain::{AccountRef, Admin, AdminChanges, AdminFilter, AdminRecord, NewAdmin};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Conflict label used when an admin email is already taken
pub const ADMIN_EMAIL_CONFLICT: &str = "Admin with this email";

/// Admin repository trait for dependency injection.
///
/// Lookups taking a `tenant_id` never return a row of another tenant.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Find admin by ID regardless of tenant
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Admin>>;

    /// Find admin by ID only if it belongs to `tenant_id`
    async fn find_in_tenant(&self, id: Uuid, tenant_id: Uuid) -> AppResult<Option<Admin>>;

    /// Find admin by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Admin>>;

    /// Insert a new admin
    async fn create(&self, admin: NewAdmin) -> AppResult<Admin>;

    /// Apply changes to an admin of `tenant_id`
    async fn update(&self, id: Uuid, tenant_id: Uuid, changes: AdminChanges) -> AppResult<Admin>;

    /// Hard delete an admin of `tenant_id`
    async fn delete(&self, id: Uuid, tenant_id: Uuid) -> AppResult<()>;

    /// Admins of a tenant, newest first, annotated with their creator
    async fn list_by_tenant(&self, tenant_id: Uuid, filter: AdminFilter)
        -> AppResult<Vec<AdminRecord>>;

    /// Count admins of a tenant with the given superadmin flag
    async fn count_by_tenant(&self, tenant_id: Uuid, super_admins: bool) -> AppResult<u64>;
}

/// Concrete implementation of AdminRepository
pub struct AdminStore {
    db: DatabaseConnection,
}

impl AdminStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AdminRepository for AdminStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Admin>> {
        find_by_id(&self.db, id).await
    }

    async fn find_in_tenant(&self, id: Uuid, tenant_id: Uuid) -> AppResult<Option<Admin>> {
        let result = AdminEntity::find_by_id(id)
            .filter(admin::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?;

        Ok(result.map(Admin::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        find_by_email(&self.db, email).await
    }

    async fn create(&self, admin: NewAdmin) -> AppResult<Admin> {
        insert(&self.db, admin).await
    }

    async fn update(&self, id: Uuid, tenant_id: Uuid, changes: AdminChanges) -> AppResult<Admin> {
        let model = AdminEntity::find_by_id(id)
            .filter(admin::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?
            .ok_or_not_found("Admin")?;

        let mut active: ActiveModel = model.into();

        if let Some(first_name) = changes.first_name {
            active.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(Some(last_name));
        }
        if let Some(scope) = changes.module_scope {
            active.module_scope = Set(Some(scope.as_str().to_string()));
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, ADMIN_EMAIL_CONFLICT))?;
        Ok(Admin::from(model))
    }

    async fn delete(&self, id: Uuid, tenant_id: Uuid) -> AppResult<()> {
        let result = AdminEntity::delete_many()
            .filter(admin::Column::Id.eq(id))
            .filter(admin::Column::TenantId.eq(tenant_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Admin"));
        }

        Ok(())
    }

    async fn list_by_tenant(
        &self,
        tenant_id: Uuid,
        filter: AdminFilter,
    ) -> AppResult<Vec<AdminRecord>> {
        let mut query = AdminEntity::find().filter(admin::Column::TenantId.eq(tenant_id));

        if !filter.include_superadmin {
            query = query.filter(admin::Column::IsSuperAdmin.eq(false));
        }
        if let Some(scope) = filter.module_scope {
            query = query.filter(admin::Column::ModuleScope.eq(scope.as_str()));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(admin::Column::IsActive.eq(is_active));
        }

        let admins: Vec<Admin> = query
            .order_by_desc(admin::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Admin::from)
            .collect();

        let creator_ids = admins.iter().filter_map(|a| a.created_by);
        let creators = load_account_refs(&self.db, creator_ids).await?;

        Ok(admins
            .into_iter()
            .map(|admin| {
                let creator = admin.created_by.and_then(|id| creators.get(&id).cloned());
                AdminRecord { admin, creator }
            })
            .collect())
    }

    async fn count_by_tenant(&self, tenant_id: Uuid, super_admins: bool) -> AppResult<u64> {
        count_by_tenant(&self.db, tenant_id, super_admins).await
    }
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<Admin>> {
    let result = AdminEntity::find_by_id(id).one(conn).await?;
    Ok(result.map(Admin::from))
}

pub(crate) async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> AppResult<Option<Admin>> {
    let result = AdminEntity::find()
        .filter(admin::Column::Email.eq(email))
        .one(conn)
        .await?;

    Ok(result.map(Admin::from))
}

pub(crate) async fn insert<C: ConnectionTrait>(conn: &C, new: NewAdmin) -> AppResult<Admin> {
    let now = chrono::Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(new.tenant_id),
        user_id: Set(None),
        email: Set(new.email),
        first_name: Set(new.first_name),
        last_name: Set(new.last_name),
        password_hash: Set(new.password_hash),
        admin_level: Set(new.level.as_str().to_string()),
        is_super_admin: Set(new.level.is_super_admin()),
        module_scope: Set(new.module_scope.map(|s| s.as_str().to_string())),
        created_by: Set(new.created_by),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model
        .insert(conn)
        .await
        .map_err(|e| AppError::from_write(e, ADMIN_EMAIL_CONFLICT))?;
    Ok(Admin::from(model))
}

pub(crate) async fn count_by_tenant<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    super_admins: bool,
) -> AppResult<u64> {
    AdminEntity::find()
        .filter(admin::Column::TenantId.eq(tenant_id))
        .filter(admin::Column::IsSuperAdmin.eq(super_admins))
        .count(conn)
        .await
        .map_err(Into::into)
}

/// Batch load `{id, email}` for a set of admin ids.
pub(crate) async fn load_account_refs<C, I>(conn: &C, ids: I) -> AppResult<HashMap<Uuid, AccountRef>>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = Uuid>,
{
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = AdminEntity::find()
        .filter(admin::Column::Id.is_in(ids))
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|m| (m.id, AccountRef { id: m.id, email: m.email }))
        .collect())
}
