//! Permission voting.
//!
//! The host owns the permission chain and asks each registered voter in
//! turn. [`PublicTableVoter`] is this add-on's contribution.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use public_tables_core::{Action, Actor, Resource, Vote, INTERNAL_DATABASE};
use public_tables_store::PublicTableStore;

use crate::error::Result;
use crate::predicate::PrivacyPredicate;

/// The host's complete permission check.
///
/// Voters receive it so they can ask nested questions ("may this actor view
/// the database?") that run through every voter, this one included.
#[async_trait]
pub trait PermissionChecker: Send + Sync {
    async fn permission_allowed(
        &self,
        actor: Option<&Actor>,
        action: &Action,
        resource: &Resource,
    ) -> Result<bool>;
}

/// One voter in a permission chain.
#[async_trait]
pub trait PermissionVoter: Send + Sync {
    /// Vote on whether `actor` may perform `action` on `resource`.
    ///
    /// `actor` is `None` for anonymous requests.
    async fn vote(
        &self,
        checker: &dyn PermissionChecker,
        actor: Option<&Actor>,
        action: &Action,
        resource: &Resource,
    ) -> Result<Vote>;
}

/// Grants viewing of public tables and managing privacy to root.
///
/// Rules, first match wins:
///
/// 1. root asking for `manage-privacy`: grant
/// 2. anonymous `execute-sql`: the answer of the nested `view-database` check
/// 3. `view-table` on a public table: grant
/// 4. everything else: abstain
pub struct PublicTableVoter<S: PublicTableStore + ?Sized> {
    predicate: PrivacyPredicate<S>,
}

impl<S: PublicTableStore + ?Sized> PublicTableVoter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            predicate: PrivacyPredicate::new(store),
        }
    }

    /// The predicate this voter consults.
    pub fn predicate(&self) -> &PrivacyPredicate<S> {
        &self.predicate
    }
}

impl<S: PublicTableStore + ?Sized> Clone for PublicTableVoter<S> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
        }
    }
}

#[async_trait]
impl<S: PublicTableStore + ?Sized> PermissionVoter for PublicTableVoter<S> {
    async fn vote(
        &self,
        checker: &dyn PermissionChecker,
        actor: Option<&Actor>,
        action: &Action,
        resource: &Resource,
    ) -> Result<Vote> {
        match (action, actor) {
            (Action::ManagePrivacy, Some(actor)) if actor.is_root() => Ok(Vote::Grant),

            (Action::ExecuteSql, None) => {
                let Some(database) = resource.database_name() else {
                    return Ok(Vote::Abstain);
                };
                let allowed = checker
                    .permission_allowed(None, &Action::ViewDatabase, &Resource::database(database))
                    .await?;
                debug!(database, allowed, "anonymous execute-sql follows view-database");
                Ok(Vote::from_bool(allowed))
            }

            (Action::ViewTable, _) => {
                let Resource::Table(table) = resource else {
                    return Ok(Vote::Abstain);
                };
                if table.database == INTERNAL_DATABASE {
                    return Ok(Vote::Abstain);
                }
                if self.predicate.is_table_public(&table.table).await? {
                    debug!(%table, "granting view-table on public table");
                    Ok(Vote::Grant)
                } else {
                    Ok(Vote::Abstain)
                }
            }

            _ => Ok(Vote::Abstain),
        }
    }
}
