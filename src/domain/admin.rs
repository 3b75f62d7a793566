//! Admin domain entity: tenant superadmins and module-scoped admins share one table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ADMIN_LEVEL_ADMIN, ADMIN_LEVEL_SUPER_ADMIN};

use super::ModuleScope;

/// Admin tier inside a tenant. `is_super_admin` is always derived from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminLevel {
    Admin,
    SuperAdmin,
}

impl AdminLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminLevel::Admin => ADMIN_LEVEL_ADMIN,
            AdminLevel::SuperAdmin => ADMIN_LEVEL_SUPER_ADMIN,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, AdminLevel::SuperAdmin)
    }

    /// Read the stored pair of columns. Either one marking the row as super
    /// wins, so a drifted row is never downgraded.
    pub fn from_stored(level: &str, is_super_admin: bool) -> Self {
        if is_super_admin || level.eq_ignore_ascii_case(ADMIN_LEVEL_SUPER_ADMIN) {
            AdminLevel::SuperAdmin
        } else {
            AdminLevel::Admin
        }
    }
}

impl std::fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Option<Uuid>,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub level: AdminLevel,
    /// `None` only for superadmins, who implicitly cover every module
    pub module_scope: Option<ModuleScope>,
    pub created_by: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    pub fn is_super_admin(&self) -> bool {
        self.level.is_super_admin()
    }

    pub fn belongs_to(&self, tenant_id: Uuid) -> bool {
        self.tenant_id == tenant_id
    }
}

/// Insert payload for a new admin row
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub tenant_id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: String,
    pub level: AdminLevel,
    pub module_scope: Option<ModuleScope>,
    pub created_by: Option<Uuid>,
}

/// Fields a superadmin may change on a regular admin
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub module_scope: Option<ModuleScope>,
    pub is_active: Option<bool>,
}

/// Listing predicates for a tenant's admins
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminFilter {
    pub include_superadmin: bool,
    pub module_scope: Option<ModuleScope>,
    pub is_active: Option<bool>,
}

/// Weak back-reference to the account that created a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountRef {
    pub id: Uuid,
    #[schema(example = "root@acme.io")]
    pub email: String,
}

/// Admin annotated with its creator
#[derive(Debug, Clone)]
pub struct AdminRecord {
    pub admin: Admin,
    pub creator: Option<AccountRef>,
}

/// Admin as returned to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminResponse {
    pub id: Uuid,
    #[schema(example = "ops@acme.io")]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub module_scope: Option<ModuleScope>,
    pub is_super_admin: bool,
    pub admin_level: AdminLevel,
    pub is_active: bool,
    pub tenant_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<AccountRef>,
}

impl From<AdminRecord> for AdminResponse {
    fn from(record: AdminRecord) -> Self {
        let AdminRecord { admin, creator } = record;
        Self {
            id: admin.id,
            is_super_admin: admin.is_super_admin(),
            email: admin.email,
            first_name: admin.first_name,
            last_name: admin.last_name,
            module_scope: admin.module_scope,
            admin_level: admin.level,
            is_active: admin.is_active,
            tenant_id: admin.tenant_id,
            created_at: admin.created_at,
            updated_at: admin.updated_at,
            created_by: creator,
        }
    }
}

impl From<Admin> for AdminResponse {
    fn from(admin: Admin) -> Self {
        AdminRecord {
            admin,
            creator: None,
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_stored_columns() {
        assert_eq!(AdminLevel::from_stored("ADMIN", false), AdminLevel::Admin);
        assert_eq!(AdminLevel::from_stored("SUPER_ADMIN", false), AdminLevel::SuperAdmin);
        assert_eq!(AdminLevel::from_stored("ADMIN", true), AdminLevel::SuperAdmin);
        assert_eq!(AdminLevel::from_stored("super_admin", false), AdminLevel::SuperAdmin);
    }

    #[test]
    fn test_response_derives_super_flag_from_level() {
        let now = Utc::now();
        let admin = Admin {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            user_id: None,
            email: "root@acme.io".to_string(),
            first_name: None,
            last_name: None,
            password_hash: "hash".to_string(),
            level: AdminLevel::SuperAdmin,
            module_scope: None,
            created_by: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let response = AdminResponse::from(admin);
        assert!(response.is_super_admin);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["admin_level"], "SUPER_ADMIN");
        assert!(json.get("password_hash").is_none());
    }
}
