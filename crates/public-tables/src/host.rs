//! What the add-on needs from the host platform.

use async_trait::async_trait;

use public_tables_core::{Action, Actor, Resource, TableKind, INTERNAL_DATABASE};
use public_tables_perms::PermissionChecker;

use crate::error::Result;

/// The host's catalog of attached databases.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Whether `table` is a table or a view in `database`, or `None` if
    /// neither exists.
    async fn table_kind(&self, database: &str, table: &str) -> anyhow::Result<Option<TableKind>>;
}

/// Everything the controller and the affordance provider ask the host.
pub trait Host: PermissionChecker + Catalog {}

impl<T: PermissionChecker + Catalog + ?Sized> Host for T {}

/// Whether `actor` may toggle privacy for tables in `database`.
///
/// Always false for the internal database, whatever the actor.
pub async fn can_manage_privacy<H: Host + ?Sized>(
    host: &H,
    actor: Option<&Actor>,
    database: &str,
) -> Result<bool> {
    if database == INTERNAL_DATABASE {
        return Ok(false);
    }
    let allowed = host
        .permission_allowed(actor, &Action::ManagePrivacy, &Resource::database(database))
        .await?;
    Ok(allowed)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    use public_tables_perms::Result as PermsResult;

    /// A host with a fixed catalog where only root manages privacy.
    #[derive(Default)]
    pub(crate) struct FakeHost {
        tables: HashMap<(String, String), TableKind>,
    }

    impl FakeHost {
        pub(crate) fn with_table(mut self, database: &str, table: &str, kind: TableKind) -> Self {
            self.tables
                .insert((database.to_string(), table.to_string()), kind);
            self
        }
    }

    #[async_trait]
    impl PermissionChecker for FakeHost {
        async fn permission_allowed(
            &self,
            actor: Option<&Actor>,
            action: &Action,
            _resource: &Resource,
        ) -> PermsResult<bool> {
            match action {
                Action::ManagePrivacy => Ok(actor.map(Actor::is_root).unwrap_or(false)),
                other => Ok(other.default_allowed()),
            }
        }
    }

    #[async_trait]
    impl Catalog for FakeHost {
        async fn table_kind(
            &self,
            database: &str,
            table: &str,
        ) -> anyhow::Result<Option<TableKind>> {
            Ok(self
                .tables
                .get(&(database.to_string(), table.to_string()))
                .copied())
        }
    }

    #[tokio::test]
    async fn test_internal_database_never_managed() {
        let host = FakeHost::default();
        let root = Actor::root();

        assert!(can_manage_privacy(&host, Some(&root), "data").await.unwrap());
        assert!(!can_manage_privacy(&host, Some(&root), INTERNAL_DATABASE)
            .await
            .unwrap());
        assert!(!can_manage_privacy(&host, Some(&Actor::new("user")), "data")
            .await
            .unwrap());
    }
}
