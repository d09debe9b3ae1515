//! Repository bundle selected at startup.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{
    AssetRepository, EmployeeRepository, LicenseRepository, MaintenanceRepository,
    NotificationRenderer, UserRepository,
};
use crate::domain::{InventoryPorts, NotifierPorts};

use super::memory::MemoryStore;
use super::persistence::{
    DbPool, DieselAssetRepository, DieselEmployeeRepository, DieselLicenseRepository,
    DieselMaintenanceRepository, DieselUserRepository, MigrationError, PoolConfig, PoolError,
    run_pending_migrations,
};

/// Failures while preparing the PostgreSQL store.
#[derive(Debug, thiserror::Error)]
pub enum StoreSetupError {
    #[error(transparent)]
    Migrations(#[from] MigrationError),
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// One implementation of every repository port, all backed by the same store.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub assets: Arc<dyn AssetRepository>,
    pub maintenance: Arc<dyn MaintenanceRepository>,
    pub licenses: Arc<dyn LicenseRepository>,
}

impl Repositories {
    /// Repositories sharing one in-memory store.
    pub fn in_memory(store: &MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            employees: Arc::new(store.clone()),
            assets: Arc::new(store.clone()),
            maintenance: Arc::new(store.clone()),
            licenses: Arc::new(store.clone()),
        }
    }

    /// Diesel repositories sharing one pool.
    pub fn postgres(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            employees: Arc::new(DieselEmployeeRepository::new(pool.clone())),
            assets: Arc::new(DieselAssetRepository::new(pool.clone())),
            maintenance: Arc::new(DieselMaintenanceRepository::new(pool.clone())),
            licenses: Arc::new(DieselLicenseRepository::new(pool.clone())),
        }
    }

    /// Connect to PostgreSQL and apply migrations, or fall back to memory.
    ///
    /// # Errors
    /// Returns [`StoreSetupError`] when a URL is configured but migrations or
    /// the pool fail; a configured database is never silently ignored.
    pub async fn connect(database_url: Option<&str>) -> Result<Self, StoreSetupError> {
        let Some(url) = database_url else {
            warn!("database_url not set; using the in-memory store, data is lost on exit");
            return Ok(Self::in_memory(&MemoryStore::new()));
        };
        let applied = run_pending_migrations(url).await?;
        let pool = DbPool::new(PoolConfig::new(url)).await?;
        info!(applied, "connected to PostgreSQL");
        Ok(Self::postgres(&pool))
    }

    /// The subset used by inventory and report services.
    pub fn inventory_ports(&self) -> InventoryPorts {
        InventoryPorts {
            employees: Arc::clone(&self.employees),
            assets: Arc::clone(&self.assets),
            maintenance: Arc::clone(&self.maintenance),
            licenses: Arc::clone(&self.licenses),
        }
    }

    /// The subset read by the expiry notification engine.
    pub fn notifier_ports(&self, renderer: Arc<dyn NotificationRenderer>) -> NotifierPorts {
        NotifierPorts {
            users: Arc::clone(&self.users),
            employees: Arc::clone(&self.employees),
            assets: Arc::clone(&self.assets),
            licenses: Arc::clone(&self.licenses),
            renderer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmployeeDraft, EmployeeId};

    #[tokio::test]
    async fn missing_url_falls_back_to_memory() {
        let repos = Repositories::connect(None).await.expect("memory store");
        let created = repos
            .employees
            .create(&EmployeeDraft {
                name: "Ama".into(),
                department: None,
                contact: None,
            })
            .await
            .expect("create employee");
        assert_eq!(created.id, EmployeeId::new(1));

        let ports = repos.inventory_ports();
        assert_eq!(ports.employees.count().await.expect("count"), 1);
    }
}
