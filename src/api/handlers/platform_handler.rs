//! Platform admin surface: platform accounts, tenant lifecycle, analytics.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    AccountRef, PlatformAdminRecord, PlatformAdminResponse, PlatformAdminSummary, Principal, ProvisionedTenantResponse,
    TenantAnalytics, TenantProvisioning, TenantResponse, UserResponse,
};
use crate::errors::AppResult;
use crate::services::CreatePlatformAdmin;
use crate::types::{ApiResponse, Created, ListData};

static TENANT_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("tenant code pattern is valid")
});

/// Email + password login body shared by both login endpoints
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ops@platform.io")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlatformLoginResponse {
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    #[schema(example = 86400)]
    pub expires_in: i64,
    pub platform_admin: PlatformAdminSummary,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePlatformAdminRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ops2@platform.io")]
    pub email: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    #[schema(min_length = 8)]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTenantRequest {
    #[validate(length(min = 1, max = 255, message = "Tenant name is required"))]
    #[schema(example = "Acme")]
    pub tenant_name: String,
    #[validate(
        length(min = 1, max = 50, message = "Tenant code must be 1 to 50 characters"),
        regex(
            path = *TENANT_CODE,
            message = "Tenant code may only contain letters, digits, '-' and '_'"
        )
    )]
    #[schema(example = "ACME")]
    pub tenant_code: String,
    pub plan_id: Option<Uuid>,
    #[validate(email(message = "Invalid superadmin email format"))]
    #[schema(example = "root@acme.io")]
    pub superadmin_email: String,
    #[validate(length(min = 1, message = "Superadmin first name is required"))]
    pub superadmin_first_name: String,
    #[validate(length(min = 1, message = "Superadmin last name is required"))]
    pub superadmin_last_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    #[schema(min_length = 8)]
    pub superadmin_password: String,
}

/// Login route, rate limited separately
pub fn platform_auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Routes that require a platform admin
pub fn platform_routes() -> Router<AppState> {
    Router::new()
        .route("/admins", post(create_platform_admin).get(list_platform_admins))
        .route("/tenants", post(create_tenant).get(list_tenants))
        .route("/tenants/:id", get(get_tenant).delete(delete_tenant))
        .route("/tenants/:id/users", get(tenant_users))
        .route("/analytics/tenants", get(tenant_analytics))
}

/// Platform admin login
#[utoipa::path(
    post,
    path = "/platform/auth/login",
    tag = "Platform",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = PlatformLoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many login attempts")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<PlatformLoginResponse>> {
    let session = state
        .services
        .platform_admins()
        .login(payload.email, payload.password)
        .await?;

    Ok(ApiResponse::with_message(
        PlatformLoginResponse {
            access_token: session.token.access_token,
            token_type: session.token.token_type,
            expires_in: session.token.expires_in,
            platform_admin: session.admin.into(),
        },
        "Login successful",
    ))
}

/// Create a platform admin; the caller is recorded as creator
#[utoipa::path(
    post,
    path = "/platform/admins",
    tag = "Platform",
    request_body = CreatePlatformAdminRequest,
    responses(
        (status = 201, description = "Platform admin created", body = PlatformAdminResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Platform admin access required"),
        (status = 409, description = "Email already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_platform_admin(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(payload): ValidatedJson<CreatePlatformAdminRequest>,
) -> AppResult<Created<PlatformAdminResponse>> {
    let admin = state
        .services
        .platform_admins()
        .create_platform_admin(CreatePlatformAdmin {
            email: payload.email,
            first_name: payload.first_name,
            last_name: payload.last_name,
            password: payload.password,
            created_by: Some(principal.id),
        })
        .await?;

    let response = PlatformAdminResponse::from(PlatformAdminRecord {
        admin,
        creator: Some(AccountRef {
            id: principal.id,
            email: principal.email,
        }),
    });
    Ok(Created(response, "Platform admin created successfully"))
}

/// List platform admins, newest first
#[utoipa::path(
    get,
    path = "/platform/admins",
    tag = "Platform",
    responses(
        (status = 200, description = "Platform admins", body = [PlatformAdminResponse]),
        (status = 403, description = "Platform admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_platform_admins(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ListData<PlatformAdminResponse>>> {
    let admins = state.services.platform_admins().list_platform_admins().await?;
    let items: Vec<PlatformAdminResponse> = admins.into_iter().map(Into::into).collect();

    Ok(ApiResponse::with_message(
        items.into(),
        "Platform admins retrieved successfully",
    ))
}

/// Create a tenant together with its superadmin
#[utoipa::path(
    post,
    path = "/platform/tenants",
    tag = "Tenants",
    request_body = CreateTenantRequest,
    responses(
        (status = 201, description = "Tenant and superadmin created", body = ProvisionedTenantResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Platform admin access required"),
        (status = 409, description = "Tenant code or superadmin email already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_tenant(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(payload): ValidatedJson<CreateTenantRequest>,
) -> AppResult<Created<ProvisionedTenantResponse>> {
    let provisioned = state
        .services
        .tenants()
        .create_tenant_with_superadmin(TenantProvisioning {
            tenant_name: payload.tenant_name,
            tenant_code: payload.tenant_code,
            plan_id: payload.plan_id,
            superadmin_email: payload.superadmin_email,
            superadmin_first_name: payload.superadmin_first_name,
            superadmin_last_name: payload.superadmin_last_name,
            superadmin_password: payload.superadmin_password,
            created_by_platform_admin: principal.id,
        })
        .await?;

    Ok(Created(
        provisioned.into(),
        "Tenant and superadmin created successfully",
    ))
}

/// List tenants, newest first
#[utoipa::path(
    get,
    path = "/platform/tenants",
    tag = "Tenants",
    responses(
        (status = 200, description = "Tenants", body = [TenantResponse]),
        (status = 403, description = "Platform admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_tenants(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ListData<TenantResponse>>> {
    let tenants = state.services.tenants().list_tenants().await?;
    let items: Vec<TenantResponse> = tenants.into_iter().map(Into::into).collect();

    Ok(ApiResponse::with_message(
        items.into(),
        "Tenants retrieved successfully",
    ))
}

/// Get a tenant with its superadmin and creator
#[utoipa::path(
    get,
    path = "/platform/tenants/{id}",
    tag = "Tenants",
    params(("id" = Uuid, Path, description = "Tenant ID")),
    responses(
        (status = 200, description = "Tenant", body = TenantResponse),
        (status = 404, description = "Tenant not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_tenant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<TenantResponse>> {
    let tenant = state.services.tenants().get_tenant(id).await?;
    Ok(ApiResponse::with_message(
        tenant.into(),
        "Tenant retrieved successfully",
    ))
}

/// Delete a tenant and every row scoped to it
#[utoipa::path(
    delete,
    path = "/platform/tenants/{id}",
    tag = "Tenants",
    params(("id" = Uuid, Path, description = "Tenant ID")),
    responses(
        (status = 200, description = "Tenant deleted"),
        (status = 404, description = "Tenant not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_tenant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.tenants().delete_tenant(id).await?;
    Ok(ApiResponse::message(
        "Tenant and all related data deleted successfully",
    ))
}

/// Users of a tenant
#[utoipa::path(
    get,
    path = "/platform/tenants/{id}/users",
    tag = "Tenants",
    params(("id" = Uuid, Path, description = "Tenant ID")),
    responses(
        (status = 200, description = "Tenant users", body = [UserResponse]),
        (status = 404, description = "Tenant not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn tenant_users(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<ListData<UserResponse>>> {
    let users = state.services.tenants().tenant_users(id).await?;
    let items: Vec<UserResponse> = users.into_iter().map(Into::into).collect();

    Ok(ApiResponse::with_message(
        items.into(),
        "Tenant users retrieved successfully",
    ))
}

/// Head counts per tenant
#[utoipa::path(
    get,
    path = "/platform/analytics/tenants",
    tag = "Platform",
    responses(
        (status = 200, description = "Per-tenant counts", body = [TenantAnalytics]),
        (status = 403, description = "Platform admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn tenant_analytics(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ListData<TenantAnalytics>>> {
    let analytics = state.services.tenants().tenant_analytics().await?;
    Ok(ApiResponse::with_message(
        analytics.into(),
        "Tenant analytics retrieved successfully",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant_request(code: &str) -> CreateTenantRequest {
        CreateTenantRequest {
            tenant_name: "Acme".to_string(),
            tenant_code: code.to_string(),
            plan_id: None,
            superadmin_email: "root@acme.io".to_string(),
            superadmin_first_name: "Root".to_string(),
            superadmin_last_name: "Admin".to_string(),
            superadmin_password: "SecurePass123!".to_string(),
        }
    }

    #[test]
    fn test_tenant_code_rules() {
        assert!(tenant_request("ACME").validate().is_ok());
        assert!(tenant_request("acme-eu_2").validate().is_ok());
        assert!(tenant_request("").validate().is_err());
        assert!(tenant_request("acme corp").validate().is_err());
        assert!(tenant_request("-acme").validate().is_err());
        assert!(tenant_request(&"A".repeat(51)).validate().is_err());
    }

    #[test]
    fn test_short_superadmin_password_rejected() {
        let mut request = tenant_request("ACME");
        request.superadmin_password = "short".to_string();
        assert!(request.validate().is_err());
    }
}
