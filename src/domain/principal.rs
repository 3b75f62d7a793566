//! Authenticated principal carried by every bearer token.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    PRINCIPAL_ADMIN, PRINCIPAL_PLATFORM_ADMIN, PRINCIPAL_SUPER_ADMIN, PRINCIPAL_USER,
};

use super::{Admin, PlatformAdmin};

/// The four kinds of principal, highest tier first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalType {
    PlatformAdmin,
    SuperAdmin,
    Admin,
    User,
}

impl PrincipalType {
    fn rank(self) -> u8 {
        match self {
            PrincipalType::PlatformAdmin => 4,
            PrincipalType::SuperAdmin => 3,
            PrincipalType::Admin => 2,
            PrincipalType::User => 1,
        }
    }

    /// Whether this tier is the same as or above `other`.
    pub fn at_least(self, other: PrincipalType) -> bool {
        self.rank() >= other.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalType::PlatformAdmin => PRINCIPAL_PLATFORM_ADMIN,
            PrincipalType::SuperAdmin => PRINCIPAL_SUPER_ADMIN,
            PrincipalType::Admin => PRINCIPAL_ADMIN,
            PrincipalType::User => PRINCIPAL_USER,
        }
    }
}

impl std::fmt::Display for PrincipalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verified identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    #[serde(rename = "type")]
    pub principal_type: PrincipalType,
    pub tenant_id: Option<Uuid>,
}

impl Principal {
    pub fn new(
        id: Uuid,
        email: impl Into<String>,
        principal_type: PrincipalType,
        tenant_id: Option<Uuid>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            principal_type,
            tenant_id,
        }
    }

    pub fn is_platform_admin(&self) -> bool {
        self.principal_type == PrincipalType::PlatformAdmin
    }
}

impl From<&PlatformAdmin> for Principal {
    fn from(admin: &PlatformAdmin) -> Self {
        Principal::new(admin.id, &admin.email, PrincipalType::PlatformAdmin, None)
    }
}

impl From<&Admin> for Principal {
    fn from(admin: &Admin) -> Self {
        let principal_type = if admin.is_super_admin() {
            PrincipalType::SuperAdmin
        } else {
            PrincipalType::Admin
        };
        Principal::new(admin.id, &admin.email, principal_type, Some(admin.tenant_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(PrincipalType::PlatformAdmin.at_least(PrincipalType::SuperAdmin));
        assert!(PrincipalType::SuperAdmin.at_least(PrincipalType::SuperAdmin));
        assert!(PrincipalType::SuperAdmin.at_least(PrincipalType::Admin));
        assert!(!PrincipalType::Admin.at_least(PrincipalType::SuperAdmin));
        assert!(!PrincipalType::User.at_least(PrincipalType::Admin));
    }

    #[test]
    fn test_type_claim_serialization() {
        let principal = Principal::new(Uuid::nil(), "a@b.io", PrincipalType::SuperAdmin, None);
        let json = serde_json::to_value(&principal).unwrap();

        assert_eq!(json["type"], "super_admin");
        assert!(json["tenant_id"].is_null());
    }
}
