//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{admin_handler, platform_handler};
use crate::domain::{
    AccountRef, AdminLevel, AdminResponse, ModuleScope, NamedRef, PlatformAdminResponse,
    PlatformAdminSummary, PrincipalType, ProvisionedTenantResponse, SuperAdminSummary,
    TenantAnalytics, TenantResponse, UserResponse,
};
use crate::services::IssuedToken;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tenant Core",
        version = "0.1.0",
        description = "Identity and authorization core for a multi-tenant SaaS: platform admins, tenants, tenant admins",
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        platform_handler::login,
        platform_handler::create_platform_admin,
        platform_handler::list_platform_admins,
        platform_handler::create_tenant,
        platform_handler::list_tenants,
        platform_handler::get_tenant,
        platform_handler::delete_tenant,
        platform_handler::tenant_users,
        platform_handler::tenant_analytics,
        admin_handler::login,
        admin_handler::create_admin,
        admin_handler::list_admins,
        admin_handler::get_admin,
        admin_handler::update_admin,
        admin_handler::delete_admin,
    ),
    components(
        schemas(
            AccountRef,
            AdminLevel,
            AdminResponse,
            ModuleScope,
            NamedRef,
            PlatformAdminResponse,
            PlatformAdminSummary,
            PrincipalType,
            ProvisionedTenantResponse,
            SuperAdminSummary,
            TenantAnalytics,
            TenantResponse,
            UserResponse,
            IssuedToken,
            platform_handler::LoginRequest,
            platform_handler::PlatformLoginResponse,
            platform_handler::CreatePlatformAdminRequest,
            platform_handler::CreateTenantRequest,
            admin_handler::AdminLoginResponse,
            admin_handler::CreateAdminRequest,
            admin_handler::UpdateAdminRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Platform", description = "Platform admin login, accounts and analytics"),
        (name = "Tenants", description = "Tenant provisioning and lifecycle"),
        (name = "Admins", description = "Admin login and superadmin management of admins")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Token from /platform/auth/login or /admin/auth/login",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/platform/auth/login",
            "/platform/admins",
            "/platform/tenants",
            "/platform/tenants/{id}",
            "/platform/tenants/{id}/users",
            "/platform/analytics/tenants",
            "/admin/auth/login",
            "/admin/admins",
            "/admin/admins/{id}",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_module_scope_examples_are_valid_codes() {
        let json: serde_json::Value =
            serde_json::from_str(&ApiDoc::openapi().to_json().unwrap()).unwrap();

        for schema in ["CreateAdminRequest", "UpdateAdminRequest"] {
            let example = json["components"]["schemas"][schema]["properties"]["module_scope"]
                ["example"]
                .as_str()
                .unwrap_or_else(|| panic!("{schema} has no module_scope example"));
            assert!(
                crate::domain::ModuleScope::parse(example).is_ok(),
                "{schema} example {example} is not a module code"
            );
        }
    }
}
