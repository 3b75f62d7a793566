//! Service Container - Centralized service access with parallel execution support.
//!
//! Handlers reach every service through the container trait, so tests can
//! swap in mocks without a database.

use std::future::Future;
use std::sync::Arc;

use super::{
    AdminAuthService, AdminAuthenticator, AdminManager, AdminService, JwtTokens,
    PlatformAdminManager, PlatformAdminService, TenantManager, TenantService, TokenService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn tokens(&self) -> Arc<dyn TokenService>;

    fn platform_admins(&self) -> Arc<dyn PlatformAdminService>;

    fn tenants(&self) -> Arc<dyn TenantService>;

    fn admins(&self) -> Arc<dyn AdminService>;

    fn admin_auth(&self) -> Arc<dyn AdminAuthService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    tokens: Arc<dyn TokenService>,
    platform_admins: Arc<dyn PlatformAdminService>,
    tenants: Arc<dyn TenantService>,
    admins: Arc<dyn AdminService>,
    admin_auth: Arc<dyn AdminAuthService>,
}

impl Services {
    pub fn new(
        tokens: Arc<dyn TokenService>,
        platform_admins: Arc<dyn PlatformAdminService>,
        tenants: Arc<dyn TenantService>,
        admins: Arc<dyn AdminService>,
        admin_auth: Arc<dyn AdminAuthService>,
    ) -> Self {
        Self {
            tokens,
            platform_admins,
            tenants,
            admins,
            admin_auth,
        }
    }

    /// Wire every service over one connection pool.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokens::from_config(config));

        Self {
            platform_admins: Arc::new(PlatformAdminManager::new(uow.clone(), tokens.clone())),
            tenants: Arc::new(TenantManager::new(uow.clone())),
            admins: Arc::new(AdminManager::new(uow.clone())),
            admin_auth: Arc::new(AdminAuthenticator::new(uow, tokens.clone())),
            tokens,
        }
    }
}

impl ServiceContainer for Services {
    fn tokens(&self) -> Arc<dyn TokenService> {
        self.tokens.clone()
    }

    fn platform_admins(&self) -> Arc<dyn PlatformAdminService> {
        self.platform_admins.clone()
    }

    fn tenants(&self) -> Arc<dyn TenantService> {
        self.tenants.clone()
    }

    fn admins(&self) -> Arc<dyn AdminService> {
        self.admins.clone()
    }

    fn admin_auth(&self) -> Arc<dyn AdminAuthService> {
        self.admin_auth.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute three independent async operations in parallel.
    ///
    /// If any operation fails, its error is returned and the others are dropped.
    pub async fn join3<F1, F2, F3, T1, T2, T3>(
        f1: F1,
        f2: F2,
        f3: F3,
    ) -> AppResult<(T1, T2, T3)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
    {
        try_join!(f1, f2, f3)
    }

    /// Execute operations with at most `limit` in flight, keeping input order.
    ///
    /// Useful when there are many operations but the connection pool should
    /// not be drained by one request.
    pub async fn join_all_limited<F, T, I>(futures: I, limit: usize) -> AppResult<Vec<T>>
    where
        F: Future<Output = AppResult<T>>,
        I: IntoIterator<Item = F>,
    {
        use futures::stream::{self, StreamExt, TryStreamExt};

        stream::iter(futures)
            .buffered(limit.max(1))
            .try_collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[tokio::test]
    async fn test_parallel_join3() {
        async fn op(value: u64) -> AppResult<u64> {
            Ok(value)
        }

        let (a, b, c) = parallel::join3(op(1), op(2), op(3)).await.unwrap();
        assert_eq!((a, b, c), (1, 2, 3));
    }

    #[tokio::test]
    async fn test_join_all_limited_keeps_order() {
        let futures = (0..10u64).map(|i| async move {
            tokio::time::sleep(std::time::Duration::from_millis(10 - i)).await;
            Ok(i) as AppResult<u64>
        });

        let results = parallel::join_all_limited(futures, 3).await.unwrap();
        assert_eq!(results, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_join_all_limited_propagates_error() {
        let futures = (0..4u64).map(|i| async move {
            if i == 2 {
                Err(AppError::internal("boom"))
            } else {
                Ok(i)
            }
        });

        assert!(parallel::join_all_limited(futures, 2).await.is_err());
    }
}
