//! The privacy toggle: `/-/public-table/{database}/{table}`.
//!
//! Each table is either private (no row) or public (one row). A POST moves
//! it to the other state. Before anything happens, in order:
//!
//! 1. the database must not be the internal one (403)
//! 2. the actor must pass `manage-privacy` for the database (403)
//! 3. the table or view must exist (404)

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use public_tables_core::{table_path, Actor, TableKind, TableRef, ToggleAction, INTERNAL_DATABASE};
use public_tables_store::{PublicTableStore, WriteResult};

use crate::error::{PublicTablesError, Result};
use crate::host::{can_manage_privacy, Host};
use crate::page::PrivacyPage;

/// Outcome of a successful POST: redirect back to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    /// Canonical URL of the table page.
    pub location: String,
    /// Confirmation message for the next page view.
    pub notice: String,
}

impl Redirect {
    pub fn status_code(&self) -> u16 {
        302
    }
}

/// Handles GET and POST on the privacy page.
pub struct ToggleController<S: PublicTableStore + ?Sized> {
    store: Arc<S>,
}

impl<S: PublicTableStore + ?Sized> ToggleController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Check the three preconditions, returning what the table is.
    async fn authorize<H: Host + ?Sized>(
        &self,
        host: &H,
        actor: Option<&Actor>,
        database: &str,
        table: &str,
    ) -> Result<TableKind> {
        if database == INTERNAL_DATABASE {
            warn!(database, table, "refusing privacy change in internal database");
            return Err(PublicTablesError::Forbidden(format!(
                "tables in {INTERNAL_DATABASE} cannot be made public"
            )));
        }

        if !can_manage_privacy(host, actor, database).await? {
            warn!(
                actor = actor.map(|a| a.id.as_str()),
                database, "actor may not manage privacy"
            );
            return Err(PublicTablesError::Forbidden(
                "permission denied: manage-privacy".to_string(),
            ));
        }

        host.table_kind(database, table)
            .await?
            .ok_or_else(|| PublicTablesError::NotFound(format!("table not found: {table}")))
    }

    /// GET: current state and the next legal transition.
    pub async fn show<H: Host + ?Sized>(
        &self,
        host: &H,
        actor: Option<&Actor>,
        database: &str,
        table: &str,
    ) -> Result<PrivacyPage> {
        let kind = self.authorize(host, actor, database, table).await?;
        let is_public = self.store.is_public(table).await?;

        Ok(PrivacyPage {
            table: TableRef::new(database, table),
            kind,
            is_public,
        })
    }

    /// POST: apply the submitted `action` form value.
    ///
    /// The value is only parsed once the preconditions hold, so an
    /// unauthorized request never learns whether its action was valid.
    pub async fn apply<H: Host + ?Sized>(
        &self,
        host: &H,
        actor: Option<&Actor>,
        database: &str,
        table: &str,
        action: &str,
    ) -> Result<Redirect> {
        let kind = self.authorize(host, actor, database, table).await?;
        let action: ToggleAction = action
            .parse()
            .map_err(|_| PublicTablesError::InvalidAction(action.to_string()))?;

        let result = match action {
            ToggleAction::MakePublic => self.store.set_public(table).await?,
            ToggleAction::MakePrivate => self.store.set_private(table).await?,
        };

        let state = if action.makes_public() { "public" } else { "private" };
        info!(
            database,
            table,
            %action,
            changed = result == WriteResult::Changed,
            "privacy updated"
        );

        Ok(Redirect {
            location: table_path(database, table),
            notice: format!("{} '{}' is now {}", kind.title(), table, state),
        })
    }
}

impl<S: PublicTableStore + ?Sized> Clone for ToggleController<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}
