//! Authorization rules over a verified principal.
//!
//! Pure decisions: callers fetch whatever rows are involved and pass them in.

use uuid::Uuid;

use crate::domain::{Admin, Principal, PrincipalType};
use crate::errors::{AppError, AppResult};

/// Rows that belong to exactly one tenant.
pub trait TenantScoped {
    fn tenant_id(&self) -> Uuid;
}

impl TenantScoped for Admin {
    fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }
}

/// Creating platform admins and tenants, cross-tenant analytics, tenant deletion.
pub fn require_platform_admin(principal: &Principal) -> AppResult<()> {
    if principal.is_platform_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden("Platform admin access required"))
    }
}

/// Route-level gate for the admin management surface.
pub fn require_super_admin_or_higher(principal: &Principal) -> AppResult<()> {
    if principal.principal_type.at_least(PrincipalType::SuperAdmin) {
        Ok(())
    } else {
        Err(AppError::forbidden("Super admin access required"))
    }
}

/// Tenant a superadmin manages admins in. Platform admins pass the route gate
/// but carry no tenant, so they cannot act here.
pub fn managed_tenant(principal: &Principal) -> AppResult<Uuid> {
    if principal.principal_type != PrincipalType::SuperAdmin {
        return Err(AppError::forbidden("Only superadmins can manage admins"));
    }
    principal
        .tenant_id
        .ok_or_else(|| AppError::forbidden("Superadmin must be associated with a tenant"))
}

/// Creator check for a new admin: an active superadmin of the same tenant.
pub fn can_create_admin(creator: &Admin, tenant_id: Uuid) -> bool {
    creator.is_active && creator.is_super_admin() && creator.belongs_to(tenant_id)
}

/// Hide a resource from a caller scoped to another tenant. `scope` is `None`
/// for unscoped callers. A mismatch reads as absence so the resource's real
/// tenant is never revealed.
pub fn visible_in<T: TenantScoped>(
    resource: Option<T>,
    scope: Option<Uuid>,
    entity: &str,
) -> AppResult<T> {
    match (resource, scope) {
        (Some(row), None) => Ok(row),
        (Some(row), Some(tenant_id)) if row.tenant_id() == tenant_id => Ok(row),
        _ => Err(AppError::not_found(entity)),
    }
}
