//! Tenant - the isolation boundary and unit of cascading deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Admin, AdminLevel, PlatformAdmin};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub plan_id: Option<Uuid>,
    pub status: String,
    pub created_by_platform_admin: Option<Uuid>,
    /// Set once the superadmin row exists; always a superadmin of this tenant
    pub super_admin_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTenant {
    pub name: String,
    pub code: String,
    pub plan_id: Option<Uuid>,
    pub created_by_platform_admin: Uuid,
}

/// Everything needed to provision a tenant and its superadmin in one unit.
#[derive(Debug, Clone)]
pub struct TenantProvisioning {
    pub tenant_name: String,
    pub tenant_code: String,
    pub plan_id: Option<Uuid>,
    pub superadmin_email: String,
    pub superadmin_first_name: String,
    pub superadmin_last_name: String,
    pub superadmin_password: String,
    pub created_by_platform_admin: Uuid,
}

/// Result of a successful provisioning
#[derive(Debug, Clone)]
pub struct ProvisionedTenant {
    pub tenant: Tenant,
    pub superadmin: Admin,
}

/// Tenant joined with its superadmin and creating platform admin
#[derive(Debug, Clone)]
pub struct TenantDetails {
    pub tenant: Tenant,
    pub super_admin: Option<Admin>,
    pub created_by: Option<PlatformAdmin>,
}

/// Per-tenant head counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TenantAnalytics {
    pub tenant_id: Uuid,
    pub tenant_name: String,
    pub tenant_code: String,
    pub total_users: u64,
    /// Every user is an employee, kept for report compatibility
    pub total_employees: u64,
    pub total_admins: u64,
    pub total_super_admins: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuperAdminSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub admin_level: AdminLevel,
}

impl From<Admin> for SuperAdminSummary {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email,
            first_name: admin.first_name,
            last_name: admin.last_name,
            admin_level: admin.level,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlatformAdminSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<PlatformAdmin> for PlatformAdminSummary {
    fn from(admin: PlatformAdmin) -> Self {
        Self {
            id: admin.id,
            email: admin.email,
            first_name: admin.first_name,
            last_name: admin.last_name,
        }
    }
}

/// Tenant as returned to platform admins
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TenantResponse {
    pub id: Uuid,
    #[schema(example = "Acme")]
    pub name: String,
    #[schema(example = "ACME")]
    pub code: String,
    #[schema(example = "ACTIVE")]
    pub status: String,
    pub plan_id: Option<Uuid>,
    pub super_admin: Option<SuperAdminSummary>,
    pub created_by_platform_admin: Option<PlatformAdminSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TenantDetails> for TenantResponse {
    fn from(details: TenantDetails) -> Self {
        let TenantDetails {
            tenant,
            super_admin,
            created_by,
        } = details;
        Self {
            id: tenant.id,
            name: tenant.name,
            code: tenant.code,
            status: tenant.status,
            plan_id: tenant.plan_id,
            super_admin: super_admin.map(SuperAdminSummary::from),
            created_by_platform_admin: created_by.map(PlatformAdminSummary::from),
            created_at: tenant.created_at,
            updated_at: tenant.updated_at,
        }
    }
}

/// Body returned after provisioning
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProvisionedTenantResponse {
    pub tenant: TenantResponse,
    pub superadmin: SuperAdminSummary,
}

impl From<ProvisionedTenant> for ProvisionedTenantResponse {
    fn from(provisioned: ProvisionedTenant) -> Self {
        Self {
            tenant: TenantDetails {
                tenant: provisioned.tenant,
                super_admin: None,
                created_by: None,
            }
            .into(),
            superadmin: provisioned.superadmin.into(),
        }
    }
}
