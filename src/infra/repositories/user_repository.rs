//! User repository: tenant employees and their organisation placement.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use super::entities::user::{self, Entity as UserEntity};
use super::entities::{building, floor, organization, role};
use crate::domain::{NamedRef, TenantUser, User};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Users of a tenant, newest first, with organization/building/floor/role.
    ///
    /// Fails if any of the related tables cannot be read.
    async fn list_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<TenantUser>>;

    /// Users of a tenant, newest first, without touching related tables
    async fn list_bare_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<User>>;

    async fn count_by_tenant(&self, tenant_id: Uuid) -> AppResult<u64>;
}

pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `{id, name}` lookup for one related table. The query runs even for an
/// empty id set so a missing table is always reported.
macro_rules! load_named {
    ($conn:expr, $module:ident, $ids:expr) => {
        $module::Entity::find()
            .filter($module::Column::Id.is_in($ids))
            .all($conn)
            .await?
            .into_iter()
            .map(|m| (m.id, NamedRef { id: m.id, name: m.name }))
            .collect::<HashMap<Uuid, NamedRef>>()
    };
}

#[async_trait]
impl UserRepository for UserStore {
    async fn list_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<TenantUser>> {
        let users = self.list_bare_by_tenant(tenant_id).await?;

        let ids = |f: fn(&User) -> Option<Uuid>| -> Vec<Uuid> {
            let mut ids: Vec<Uuid> = users.iter().filter_map(f).collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };
        let organization_ids = ids(|u| u.organization_id);
        let building_ids = ids(|u| u.building_id);
        let floor_ids = ids(|u| u.floor_id);
        let role_ids = ids(|u| u.role_id);

        let organizations = load_named!(&self.db, organization, organization_ids);
        let buildings = load_named!(&self.db, building, building_ids);
        let floors = load_named!(&self.db, floor, floor_ids);
        let roles = load_named!(&self.db, role, role_ids);

        let lookup = |map: &HashMap<Uuid, NamedRef>, id: Option<Uuid>| {
            id.and_then(|id| map.get(&id).cloned())
        };

        Ok(users
            .into_iter()
            .map(|user| TenantUser {
                organization: lookup(&organizations, user.organization_id),
                building: lookup(&buildings, user.building_id),
                floor: lookup(&floors, user.floor_id),
                role: lookup(&roles, user.role_id),
                user,
            })
            .collect())
    }

    async fn list_bare_by_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(user::Column::TenantId.eq(tenant_id))
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn count_by_tenant(&self, tenant_id: Uuid) -> AppResult<u64> {
        count_by_tenant(&self.db, tenant_id).await
    }
}

pub(crate) async fn count_by_tenant<C: ConnectionTrait>(conn: &C, tenant_id: Uuid) -> AppResult<u64> {
    UserEntity::find()
        .filter(user::Column::TenantId.eq(tenant_id))
        .count(conn)
        .await
        .map_err(Into::into)
}
