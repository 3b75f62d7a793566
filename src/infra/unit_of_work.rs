//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and owns the transaction lifecycle, so
//! multi-row workflows (tenant provisioning, tenant deletion) commit as one
//! unit or not at all.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::{
    admin_queries, platform_admin_queries, tenant_queries, user_queries, AdminRepository,
    AdminStore, PlatformAdminRepository, PlatformAdminStore, TenantRepository, TenantStore,
    UserRepository, UserStore,
};
use crate::domain::{Admin, NewAdmin, NewTenant, PlatformAdmin, Tenant};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic transaction methods; tests
/// wrap mock repositories in a small hand-written implementation instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn platform_admins(&self) -> Arc<dyn PlatformAdminRepository>;

    fn tenants(&self) -> Arc<dyn TenantRepository>;

    fn admins(&self) -> Arc<dyn AdminRepository>;

    fn users(&self) -> Arc<dyn UserRepository>;

    /// Execute a closure within a READ COMMITTED read-write transaction.
    ///
    /// Committed when the closure returns `Ok`, rolled back otherwise.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;

    /// Same as [`UnitOfWork::transaction`] with serializable isolation.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn platform_admins(&self) -> TxPlatformAdminRepository<'_> {
        TxPlatformAdminRepository { txn: self.txn }
    }

    pub fn tenants(&self) -> TxTenantRepository<'_> {
        TxTenantRepository { txn: self.txn }
    }

    pub fn admins(&self) -> TxAdminRepository<'_> {
        TxAdminRepository { txn: self.txn }
    }

    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    platform_admin_repo: Arc<PlatformAdminStore>,
    tenant_repo: Arc<TenantStore>,
    admin_repo: Arc<AdminStore>,
    user_repo: Arc<UserStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            platform_admin_repo: Arc::new(PlatformAdminStore::new(db.clone())),
            tenant_repo: Arc::new(TenantStore::new(db.clone())),
            admin_repo: Arc::new(AdminStore::new(db.clone())),
            user_repo: Arc::new(UserStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn platform_admins(&self) -> Arc<dyn PlatformAdminRepository> {
        self.platform_admin_repo.clone()
    }

    fn tenants(&self) -> Arc<dyn TenantRepository> {
        self.tenant_repo.clone()
    }

    fn admins(&self) -> Arc<dyn AdminRepository> {
        self.admin_repo.clone()
    }

    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f).await
    }
}

pub struct TxPlatformAdminRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxPlatformAdminRepository<'_> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PlatformAdmin>> {
        platform_admin_queries::find_by_id(self.txn, id).await
    }
}

pub struct TxTenantRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxTenantRepository<'_> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>> {
        tenant_queries::find_by_id(self.txn, id).await
    }

    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<Tenant>> {
        tenant_queries::find_by_code(self.txn, code).await
    }

    /// Insert an ACTIVE tenant without a superadmin
    pub async fn create(&self, tenant: NewTenant) -> AppResult<Tenant> {
        tenant_queries::insert(self.txn, tenant).await
    }

    pub async fn set_super_admin(&self, tenant_id: Uuid, admin_id: Uuid) -> AppResult<Tenant> {
        tenant_queries::set_super_admin(self.txn, tenant_id, admin_id).await
    }

    /// Delete the tenant row; dependent rows go with it through the foreign keys
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        tenant_queries::delete(self.txn, id).await
    }
}

pub struct TxAdminRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxAdminRepository<'_> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Admin>> {
        admin_queries::find_by_id(self.txn, id).await
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        admin_queries::find_by_email(self.txn, email).await
    }

    pub async fn create(&self, admin: NewAdmin) -> AppResult<Admin> {
        admin_queries::insert(self.txn, admin).await
    }

    pub async fn count_by_tenant(&self, tenant_id: Uuid, super_admins: bool) -> AppResult<u64> {
        admin_queries::count_by_tenant(self.txn, tenant_id, super_admins).await
    }
}

pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxUserRepository<'_> {
    pub async fn count_by_tenant(&self, tenant_id: Uuid) -> AppResult<u64> {
        user_queries::count_by_tenant(self.txn, tenant_id).await
    }
}

/// Run `$body` inside a transaction, binding the context to `$ctx`.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| {
            Box::pin(async move {
                let result: $crate::errors::AppResult<_> = $body;
                result
            })
        })
        .await
    };
}
