//! Platform admin repository.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::platform_admin::{self, ActiveModel, Entity as PlatformAdminEntity};
use crate::domain::{AccountRef, NewPlatformAdmin, PlatformAdmin, PlatformAdminRecord};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Conflict label used when a platform admin email is already taken
pub const PLATFORM_ADMIN_EMAIL_CONFLICT: &str = "Platform admin with this email";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PlatformAdminRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PlatformAdmin>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<PlatformAdmin>>;

    async fn create(&self, admin: NewPlatformAdmin) -> AppResult<PlatformAdmin>;

    /// All platform admins, newest first, annotated with their creator
    async fn list_with_creator(&self) -> AppResult<Vec<PlatformAdminRecord>>;
}

pub struct PlatformAdminStore {
    db: DatabaseConnection,
}

impl PlatformAdminStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlatformAdminRepository for PlatformAdminStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PlatformAdmin>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<PlatformAdmin>> {
        let result = PlatformAdminEntity::find()
            .filter(platform_admin::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(PlatformAdmin::from))
    }

    async fn create(&self, new: NewPlatformAdmin) -> AppResult<PlatformAdmin> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new.email),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            password_hash: Set(new.password_hash),
            is_active: Set(true),
            created_by: Set(new.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, PLATFORM_ADMIN_EMAIL_CONFLICT))?;
        Ok(PlatformAdmin::from(model))
    }

    async fn list_with_creator(&self) -> AppResult<Vec<PlatformAdminRecord>> {
        let admins: Vec<PlatformAdmin> = PlatformAdminEntity::find()
            .order_by_desc(platform_admin::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(PlatformAdmin::from)
            .collect();

        // Creators are platform admins too, so the full list already holds them
        let refs: HashMap<Uuid, AccountRef> = admins
            .iter()
            .map(|a| {
                (
                    a.id,
                    AccountRef {
                        id: a.id,
                        email: a.email.clone(),
                    },
                )
            })
            .collect();

        Ok(admins
            .into_iter()
            .map(|admin| {
                let creator = admin.created_by.and_then(|id| refs.get(&id).cloned());
                PlatformAdminRecord { admin, creator }
            })
            .collect())
    }
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> AppResult<Option<PlatformAdmin>> {
    let result = PlatformAdminEntity::find_by_id(id).one(conn).await?;
    Ok(result.map(PlatformAdmin::from))
}

/// Batch load platform admins by id.
pub(crate) async fn load_many<C: ConnectionTrait>(
    conn: &C,
    ids: Vec<Uuid>,
) -> AppResult<HashMap<Uuid, PlatformAdmin>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = PlatformAdminEntity::find()
        .filter(platform_admin::Column::Id.is_in(ids))
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|m| (m.id, PlatformAdmin::from(m)))
        .collect())
}
