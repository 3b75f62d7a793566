//! Platform admin - operator of the whole SaaS, never tenant-scoped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::AccountRef;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformAdmin {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPlatformAdmin {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_by: Option<Uuid>,
}

/// Platform admin annotated with its creator
#[derive(Debug, Clone)]
pub struct PlatformAdminRecord {
    pub admin: PlatformAdmin,
    pub creator: Option<AccountRef>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlatformAdminResponse {
    pub id: Uuid,
    #[schema(example = "ops@platform.io")]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<AccountRef>,
}

impl From<PlatformAdminRecord> for PlatformAdminResponse {
    fn from(record: PlatformAdminRecord) -> Self {
        let PlatformAdminRecord { admin, creator } = record;
        Self {
            id: admin.id,
            email: admin.email,
            first_name: admin.first_name,
            last_name: admin.last_name,
            is_active: admin.is_active,
            created_at: admin.created_at,
            created_by: creator,
        }
    }
}
