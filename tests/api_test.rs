//! Router tests over mock services.
//!
//! Requests go through the full middleware stack without a database or
//! Redis connection; tokens are signed with a real JWT service.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use tenant_core::api::{create_router, AppState};
use tenant_core::domain::{
    Admin, AdminLevel, AdminRecord, ModuleScope, PlatformAdmin, Principal, PrincipalType,
    ProvisionedTenant, Tenant,
};
use tenant_core::errors::AppError;
use tenant_core::services::{
    AdminService, IssuedToken, JwtTokens, MockAdminService, MockPlatformAdminService,
    MockServiceContainer, MockTenantService, PlatformAdminService, PlatformSession,
    TenantService, TokenService,
};

const SECRET: &[u8] = b"router-test-secret-at-least-32-bytes!";
const ISSUER: &str = "tenant-core-test";

fn jwt() -> JwtTokens {
    JwtTokens::new(SECRET, ISSUER, Duration::hours(1))
}

fn bearer(principal_type: PrincipalType, tenant_id: Option<Uuid>) -> (Principal, String) {
    let principal = Principal::new(Uuid::new_v4(), "caller@test.io", principal_type, tenant_id);
    let token = jwt().issue(&principal).unwrap().access_token;
    (principal, format!("Bearer {token}"))
}

fn app(configure: impl FnOnce(&mut MockServiceContainer)) -> Router {
    let tokens: Arc<dyn TokenService> = Arc::new(jwt());
    let mut container = MockServiceContainer::new();
    container
        .expect_tokens()
        .returning(move || tokens.clone());
    configure(&mut container);
    create_router(AppState::new(Arc::new(container)))
}

fn with_tenants(container: &mut MockServiceContainer, tenants: MockTenantService) {
    let tenants: Arc<dyn TenantService> = Arc::new(tenants);
    container
        .expect_tenants()
        .returning(move || tenants.clone());
}

fn with_admins(container: &mut MockServiceContainer, admins: MockAdminService) {
    let admins: Arc<dyn AdminService> = Arc::new(admins);
    container.expect_admins().returning(move || admins.clone());
}

fn with_platform_admins(container: &mut MockServiceContainer, service: MockPlatformAdminService) {
    let service: Arc<dyn PlatformAdminService> = Arc::new(service);
    container
        .expect_platform_admins()
        .returning(move || service.clone());
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn tenant_body() -> Value {
    json!({
        "tenant_name": "Acme",
        "tenant_code": "ACME",
        "superadmin_email": "root@acme.io",
        "superadmin_first_name": "Root",
        "superadmin_last_name": "Admin",
        "superadmin_password": "SecurePass123!"
    })
}

fn admin_row(tenant_id: Uuid, level: AdminLevel) -> Admin {
    Admin {
        id: Uuid::new_v4(),
        tenant_id,
        user_id: None,
        email: "ops@acme.io".to_string(),
        first_name: Some("Ops".to_string()),
        last_name: Some("Team".to_string()),
        password_hash: "hashed".to_string(),
        level,
        module_scope: (level == AdminLevel::Admin).then_some(ModuleScope::Dwar),
        created_by: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn tenant_row(code: &str, created_by: Uuid) -> Tenant {
    Tenant {
        id: Uuid::new_v4(),
        name: "Acme".to_string(),
        code: code.to_string(),
        plan_id: None,
        status: "ACTIVE".to_string(),
        created_by_platform_admin: Some(created_by),
        super_admin_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_without_backing_services() {
    let (status, body) = send(app(|_| {}), get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["services"].get("database").is_none());
}

// =============================================================================
// Authentication and tier gates
// =============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (status, body) = send(app(|_| {}), get("/platform/tenants", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let (status, body) = send(
        app(|_| {}),
        get("/admin/admins", Some("Bearer not-a-jwt")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_foreign_issuer_token_is_rejected() {
    let principal = Principal::new(Uuid::new_v4(), "x@y.io", PrincipalType::PlatformAdmin, None);
    let foreign = JwtTokens::new(SECRET, "someone-else", Duration::hours(1))
        .issue(&principal)
        .unwrap();
    let auth = format!("Bearer {}", foreign.access_token);

    let (status, _) = send(app(|_| {}), get("/platform/tenants", Some(&auth))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_superadmin_cannot_reach_platform_routes() {
    let (_, auth) = bearer(PrincipalType::SuperAdmin, Some(Uuid::new_v4()));

    let (status, body) = send(app(|_| {}), get("/platform/tenants", Some(&auth))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_regular_admin_cannot_manage_admins() {
    let (_, auth) = bearer(PrincipalType::Admin, Some(Uuid::new_v4()));

    let (status, _) = send(app(|_| {}), get("/admin/admins", Some(&auth))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_platform_admin_is_refused_by_tenant_handlers() {
    let (_, auth) = bearer(PrincipalType::PlatformAdmin, None);

    let mut admins = MockAdminService::new();
    admins.expect_list_tenant_admins().never();

    let (status, _) = send(
        app(|c| with_admins(c, admins)),
        get("/admin/admins", Some(&auth)),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

// =============================================================================
// Platform routes
// =============================================================================

#[tokio::test]
async fn test_create_tenant_returns_created_envelope() {
    let (principal, auth) = bearer(PrincipalType::PlatformAdmin, None);
    let platform_admin_id = principal.id;

    let mut tenants = MockTenantService::new();
    tenants
        .expect_create_tenant_with_superadmin()
        .withf(move |input| {
            input.tenant_code == "ACME" && input.created_by_platform_admin == platform_admin_id
        })
        .times(1)
        .returning(|input| {
            let mut tenant = tenant_row(&input.tenant_code, input.created_by_platform_admin);
            let mut superadmin = admin_row(tenant.id, AdminLevel::SuperAdmin);
            superadmin.email = input.superadmin_email;
            tenant.super_admin_id = Some(superadmin.id);
            Ok(ProvisionedTenant { tenant, superadmin })
        });

    let (status, body) = send(
        app(|c| with_tenants(c, tenants)),
        post_json("/platform/tenants", Some(&auth), tenant_body()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["tenant"]["code"], "ACME");
    assert_eq!(body["data"]["tenant"]["status"], "ACTIVE");
    assert_eq!(body["data"]["superadmin"]["email"], "root@acme.io");
    assert_eq!(body["data"]["superadmin"]["admin_level"], "SUPER_ADMIN");
}

#[tokio::test]
async fn test_create_tenant_rejects_invalid_code() {
    let (_, auth) = bearer(PrincipalType::PlatformAdmin, None);

    let mut tenants = MockTenantService::new();
    tenants.expect_create_tenant_with_superadmin().never();

    let mut body = tenant_body();
    body["tenant_code"] = json!("AC ME");

    let (status, response) = send(
        app(|c| with_tenants(c, tenants)),
        post_json("/platform/tenants", Some(&auth), body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_tenant_duplicate_maps_to_conflict() {
    let (_, auth) = bearer(PrincipalType::PlatformAdmin, None);

    let mut tenants = MockTenantService::new();
    tenants
        .expect_create_tenant_with_superadmin()
        .returning(|_| Err(AppError::conflict("Tenant code")));

    let (status, body) = send(
        app(|c| with_tenants(c, tenants)),
        post_json("/platform/tenants", Some(&auth), tenant_body()),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "Tenant code already exists");
}

#[tokio::test]
async fn test_get_missing_tenant_is_not_found() {
    let (_, auth) = bearer(PrincipalType::PlatformAdmin, None);

    let mut tenants = MockTenantService::new();
    tenants
        .expect_get_tenant()
        .returning(|_| Err(AppError::not_found("Tenant")));

    let uri = format!("/platform/tenants/{}", Uuid::new_v4());
    let (status, body) = send(app(|c| with_tenants(c, tenants)), get(&uri, Some(&auth))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Tenant not found");
}

#[tokio::test]
async fn test_platform_login_without_cache_skips_rate_limit() {
    let mut service = MockPlatformAdminService::new();
    service.expect_login().times(1).returning(|email, _| {
        Ok(PlatformSession {
            admin: PlatformAdmin {
                id: Uuid::new_v4(),
                email,
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                password_hash: "hashed".to_string(),
                is_active: true,
                created_by: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            token: IssuedToken {
                access_token: "signed".to_string(),
                token_type: "Bearer".to_string(),
                expires_in: 3600,
            },
        })
    });

    let request = post_json(
        "/platform/auth/login",
        None,
        json!({ "email": "ops@platform.io", "password": "SecurePass123!" }),
    );
    let response = app(|c| with_platform_admins(c, service))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("X-RateLimit-Limit").is_none());

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["access_token"], "signed");
    assert_eq!(body["data"]["platform_admin"]["email"], "ops@platform.io");
}

#[tokio::test]
async fn test_platform_login_bad_credentials() {
    let mut service = MockPlatformAdminService::new();
    service
        .expect_login()
        .returning(|_, _| Err(AppError::InvalidCredentials));

    let (status, body) = send(
        app(|c| with_platform_admins(c, service)),
        post_json(
            "/platform/auth/login",
            None,
            json!({ "email": "ops@platform.io", "password": "wrong-password" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

// =============================================================================
// Admin routes
// =============================================================================

#[tokio::test]
async fn test_superadmin_lists_admins_of_own_tenant() {
    let tenant_id = Uuid::new_v4();
    let (_, auth) = bearer(PrincipalType::SuperAdmin, Some(tenant_id));

    let mut admins = MockAdminService::new();
    admins
        .expect_list_tenant_admins()
        .withf(move |id, filter| {
            *id == tenant_id
                && !filter.include_superadmin
                && filter.module_scope == Some(ModuleScope::Sangrah)
        })
        .times(1)
        .returning(|id, _| {
            let mut admin = admin_row(id, AdminLevel::Admin);
            admin.module_scope = Some(ModuleScope::Sangrah);
            Ok(vec![AdminRecord {
                admin,
                creator: None,
            }])
        });

    let (status, body) = send(
        app(|c| with_admins(c, admins)),
        get("/admin/admins?module_scope=sangrah", Some(&auth)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["items"][0]["module_scope"], "SANGRAH");
    assert_eq!(body["data"]["items"][0]["is_super_admin"], false);
}

#[tokio::test]
async fn test_create_admin_passes_caller_as_creator() {
    let tenant_id = Uuid::new_v4();
    let (principal, auth) = bearer(PrincipalType::SuperAdmin, Some(tenant_id));
    let caller_id = principal.id;

    let mut admins = MockAdminService::new();
    admins
        .expect_create_admin()
        .withf(move |input| input.tenant_id == tenant_id && input.created_by == caller_id)
        .times(1)
        .returning(|input| {
            let mut admin = admin_row(input.tenant_id, AdminLevel::Admin);
            admin.email = input.email;
            admin.created_by = Some(input.created_by);
            Ok(admin)
        });

    let (status, body) = send(
        app(|c| with_admins(c, admins)),
        post_json(
            "/admin/admins",
            Some(&auth),
            json!({
                "email": "hr@acme.io",
                "first_name": "Human",
                "last_name": "Resources",
                "password": "SecurePass123!",
                "module_scope": "DWAR"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "hr@acme.io");
    assert_eq!(body["data"]["tenant_id"], tenant_id.to_string());
}

#[tokio::test]
async fn test_unknown_module_filter_is_bad_request() {
    let (_, auth) = bearer(PrincipalType::SuperAdmin, Some(Uuid::new_v4()));

    let mut admins = MockAdminService::new();
    admins.expect_list_tenant_admins().never();

    let (status, _) = send(
        app(|c| with_admins(c, admins)),
        get("/admin/admins?module_scope=warehouse", Some(&auth)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
