//! Tenant admin surface: unified admin login and superadmin management of admins.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::platform_handler::LoginRequest;
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{AdminFilter, AdminLevel, AdminResponse, ModuleScope, Principal};
use crate::errors::AppResult;
use crate::services::authorization::managed_tenant;
use crate::services::{AdminSession, CreateAdmin, UpdateAdmin};
use crate::types::{ApiResponse, Created, ListData};

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminLoginResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub tenant_id: Uuid,
    #[schema(example = "Acme")]
    pub tenant_name: String,
    pub is_super_admin: bool,
    pub admin_level: AdminLevel,
    /// Present only for regular admins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_scope: Option<ModuleScope>,
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    #[schema(example = 86400)]
    pub expires_in: i64,
}

impl From<AdminSession> for AdminLoginResponse {
    fn from(session: AdminSession) -> Self {
        let AdminSession {
            admin,
            tenant,
            token,
        } = session;
        Self {
            id: admin.id,
            is_super_admin: admin.is_super_admin(),
            module_scope: admin.module_scope.filter(|_| !admin.is_super_admin()),
            email: admin.email,
            first_name: admin.first_name,
            last_name: admin.last_name,
            tenant_id: tenant.id,
            tenant_name: tenant.name,
            admin_level: admin.level,
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAdminRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ops@acme.io")]
    pub email: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    #[schema(min_length = 8)]
    pub password: String,
    /// One of the fixed module codes, case-insensitive
    #[validate(length(min = 1, message = "Module scope is required"))]
    #[schema(example = "DWAR")]
    pub module_scope: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAdminRequest {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[schema(example = "SANGRAH")]
    pub module_scope: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminListQuery {
    /// Include the tenant's superadmin in the result
    pub include_superadmin: Option<bool>,
    /// Only admins of this module
    pub module_scope: Option<String>,
    pub is_active: Option<bool>,
}

impl AdminListQuery {
    fn into_filter(self) -> AppResult<AdminFilter> {
        Ok(AdminFilter {
            include_superadmin: self.include_superadmin.unwrap_or(false),
            module_scope: self
                .module_scope
                .as_deref()
                .map(ModuleScope::parse)
                .transpose()?,
            is_active: self.is_active,
        })
    }
}

/// Login route, rate limited separately
pub fn admin_auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Routes that require a superadmin (or a platform admin, who is then refused per handler)
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admins", post(create_admin).get(list_admins))
        .route(
            "/admins/:id",
            get(get_admin).put(update_admin).delete(delete_admin),
        )
}

/// Admin login, for superadmins and module admins alike
#[utoipa::path(
    post,
    path = "/admin/auth/login",
    tag = "Admins",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AdminLoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many login attempts")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<AdminLoginResponse>> {
    let session = state
        .services
        .admin_auth()
        .login(payload.email, payload.password)
        .await?;

    Ok(ApiResponse::with_message(session.into(), "Login successful"))
}

/// Create a module-scoped admin in the caller's tenant
#[utoipa::path(
    post,
    path = "/admin/admins",
    tag = "Admins",
    request_body = CreateAdminRequest,
    responses(
        (status = 201, description = "Admin created", body = AdminResponse),
        (status = 400, description = "Validation error or unknown module"),
        (status = 403, description = "Only superadmins can create admins"),
        (status = 409, description = "Email already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_admin(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(payload): ValidatedJson<CreateAdminRequest>,
) -> AppResult<Created<AdminResponse>> {
    let tenant_id = managed_tenant(&principal)?;

    let admin = state
        .services
        .admins()
        .create_admin(CreateAdmin {
            email: payload.email,
            first_name: payload.first_name,
            last_name: payload.last_name,
            password: payload.password,
            module_scope: payload.module_scope,
            tenant_id,
            created_by: principal.id,
        })
        .await?;

    Ok(Created(admin.into(), "Admin created successfully"))
}

/// Admins of the caller's tenant
#[utoipa::path(
    get,
    path = "/admin/admins",
    tag = "Admins",
    params(AdminListQuery),
    responses(
        (status = 200, description = "Admins", body = [AdminResponse]),
        (status = 403, description = "Only superadmins can list admins")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_admins(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<AdminListQuery>,
) -> AppResult<ApiResponse<ListData<AdminResponse>>> {
    let tenant_id = managed_tenant(&principal)?;
    let admins = state
        .services
        .admins()
        .list_tenant_admins(tenant_id, query.into_filter()?)
        .await?;
    let items: Vec<AdminResponse> = admins.into_iter().map(Into::into).collect();

    Ok(ApiResponse::with_message(
        items.into(),
        "Admins retrieved successfully",
    ))
}

/// One admin of the caller's tenant
#[utoipa::path(
    get,
    path = "/admin/admins/{id}",
    tag = "Admins",
    params(("id" = Uuid, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin", body = AdminResponse),
        (status = 404, description = "Admin not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_admin(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<AdminResponse>> {
    let tenant_id = managed_tenant(&principal)?;
    let record = state.services.admins().get_admin(id, Some(tenant_id)).await?;

    Ok(ApiResponse::with_message(
        record.into(),
        "Admin retrieved successfully",
    ))
}

/// Update a module admin; superadmins cannot be edited here
#[utoipa::path(
    put,
    path = "/admin/admins/{id}",
    tag = "Admins",
    params(("id" = Uuid, Path, description = "Admin ID")),
    request_body = UpdateAdminRequest,
    responses(
        (status = 200, description = "Admin updated", body = AdminResponse),
        (status = 400, description = "Validation error or unknown module"),
        (status = 403, description = "Superadmin cannot be updated"),
        (status = 404, description = "Admin not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_admin(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAdminRequest>,
) -> AppResult<ApiResponse<AdminResponse>> {
    let tenant_id = managed_tenant(&principal)?;
    let admin = state
        .services
        .admins()
        .update_admin(
            id,
            tenant_id,
            UpdateAdmin {
                first_name: payload.first_name,
                last_name: payload.last_name,
                module_scope: payload.module_scope,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(ApiResponse::with_message(
        admin.into(),
        "Admin updated successfully",
    ))
}

/// Delete a module admin; superadmins cannot be deleted here
#[utoipa::path(
    delete,
    path = "/admin/admins/{id}",
    tag = "Admins",
    params(("id" = Uuid, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin deleted"),
        (status = 403, description = "Superadmin cannot be deleted"),
        (status = 404, description = "Admin not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_admin(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    let tenant_id = managed_tenant(&principal)?;
    state.services.admins().delete_admin(id, tenant_id).await?;

    Ok(ApiResponse::message("Admin deleted successfully"))
}
