//! User domain entity - tenant employees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// `None` for platform-level accounts not tied to a tenant
    pub tenant_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    pub building_id: Option<Uuid>,
    pub floor_id: Option<Uuid>,
    pub role_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub employee_id: Option<String>,
    pub department: Option<String>,
    pub employee_grade: Option<String>,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub module_scope: String,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `{id, name}` pair for an optional related row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
}

/// User with its organisation placement. Relations are `None` when the row has
/// no reference or the related table could not be read.
#[derive(Debug, Clone)]
pub struct TenantUser {
    pub user: User,
    pub organization: Option<NamedRef>,
    pub building: Option<NamedRef>,
    pub floor: Option<NamedRef>,
    pub role: Option<NamedRef>,
}

impl From<User> for TenantUser {
    fn from(user: User) -> Self {
        Self {
            user,
            organization: None,
            building: None,
            floor: None,
            role: None,
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "jane@acme.io")]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub employee_id: Option<String>,
    pub department: Option<String>,
    pub employee_grade: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    #[schema(example = "CORE")]
    pub module_scope: String,
    pub organization: Option<NamedRef>,
    pub building: Option<NamedRef>,
    pub floor: Option<NamedRef>,
    pub role: Option<NamedRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TenantUser> for UserResponse {
    fn from(entry: TenantUser) -> Self {
        let TenantUser {
            user,
            organization,
            building,
            floor,
            role,
        } = entry;
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            employee_id: user.employee_id,
            department: user.department,
            employee_grade: user.employee_grade,
            phone: user.phone,
            is_active: user.is_active,
            module_scope: user.module_scope,
            organization,
            building,
            floor,
            role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
