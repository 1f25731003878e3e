//! The plugin object: startup plus handles for the host to register.

use std::sync::Arc;

use tracing::info;

use public_tables_perms::{PrivacyPredicate, PublicTableVoter};
use public_tables_store::{PublicTableStore, StoreError};

use crate::affordance::AffordanceProvider;
use crate::config::PublicTablesConfig;
use crate::controller::ToggleController;
use crate::error::{PublicTablesError, Result};

/// A started public tables add-on.
///
/// Construction runs the startup step, so holding a `PublicTables` means the
/// backing table exists and accepts writes.
pub struct PublicTables<S: PublicTableStore> {
    store: Arc<S>,
    config: PublicTablesConfig,
}

impl<S: PublicTableStore + 'static> PublicTables<S> {
    /// Start the add-on.
    ///
    /// `resolve` maps the configured database name (`None` for the host's
    /// primary database) to a store over that database, or `None` if no such
    /// database is attached.
    pub async fn startup<F>(config: PublicTablesConfig, resolve: F) -> Result<Self>
    where
        F: FnOnce(Option<&str>) -> Option<S>,
    {
        let store = resolve(config.database()).ok_or_else(|| {
            PublicTablesError::Configuration(format!(
                "database {} is not attached",
                config.database().unwrap_or("(primary)")
            ))
        })?;
        Self::with_store(config, store).await
    }

    /// Start the add-on over an already resolved store.
    pub async fn with_store(config: PublicTablesConfig, store: S) -> Result<Self> {
        let database = config.database().unwrap_or("(primary)").to_string();
        let immutable = || {
            PublicTablesError::Configuration(format!(
                "database {database} is immutable; public tables must be writable"
            ))
        };

        if !store.is_mutable() {
            return Err(immutable());
        }

        match store.ensure_schema().await {
            Ok(created) => {
                info!(database = %database, created, "public tables ready");
            }
            Err(StoreError::Immutable) => return Err(immutable()),
            Err(e) => return Err(e.into()),
        }

        Ok(Self {
            store: Arc::new(store),
            config,
        })
    }

    pub fn config(&self) -> &PublicTablesConfig {
        &self.config
    }

    /// The store, shared with every handle handed out below.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn predicate(&self) -> PrivacyPredicate<S> {
        PrivacyPredicate::new(Arc::clone(&self.store))
    }

    /// The voter to register in the host's permission chain.
    pub fn voter(&self) -> PublicTableVoter<S> {
        PublicTableVoter::new(Arc::clone(&self.store))
    }

    pub fn controller(&self) -> ToggleController<S> {
        ToggleController::new(Arc::clone(&self.store))
    }

    pub fn affordances(&self) -> AffordanceProvider<S> {
        AffordanceProvider::new(Arc::clone(&self.store))
    }
}
