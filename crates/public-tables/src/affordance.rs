//! The "Make table public" entry in the host's table menu.

use std::sync::Arc;

use serde::Serialize;

use public_tables_core::{privacy_path, Actor};
use public_tables_store::PublicTableStore;

use crate::error::Result;
use crate::host::{can_manage_privacy, Host};
use crate::page::escape_html;

/// A link the host shows among its table actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableAction {
    pub href: String,
    pub label: String,
}

impl TableAction {
    /// Menu item markup.
    pub fn render_html(&self) -> String {
        format!(
            "<li><a href=\"{}\">{}</a></li>",
            escape_html(&self.href),
            escape_html(&self.label)
        )
    }
}

/// Offers the privacy toggle to actors allowed to use it.
pub struct AffordanceProvider<S: PublicTableStore + ?Sized> {
    store: Arc<S>,
}

impl<S: PublicTableStore + ?Sized> AffordanceProvider<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Zero or one actions for the given table.
    pub async fn table_actions<H: Host + ?Sized>(
        &self,
        host: &H,
        actor: Option<&Actor>,
        database: &str,
        table: &str,
    ) -> Result<Vec<TableAction>> {
        if !can_manage_privacy(host, actor, database).await? {
            return Ok(Vec::new());
        }
        let Some(kind) = host.table_kind(database, table).await? else {
            return Ok(Vec::new());
        };

        let target = if self.store.is_public(table).await? {
            "private"
        } else {
            "public"
        };

        Ok(vec![TableAction {
            href: privacy_path(database, table),
            label: format!("Make {} {}", kind.noun(), target),
        }])
    }
}

impl<S: PublicTableStore + ?Sized> Clone for AffordanceProvider<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}
