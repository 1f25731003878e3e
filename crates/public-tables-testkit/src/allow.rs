//! Allow blocks: the host's own permission rules.
//!
//! Metadata JSON may carry an `allow` block at instance, database and table
//! level, and an `allow_sql` block at instance and database level:
//!
//! ```json
//! {
//!   "allow": {"id": "*"},
//!   "databases": {
//!     "data": {
//!       "allow": true,
//!       "allow_sql": {"id": "root"},
//!       "tables": {"t1": {"allow": false}},
//!       "permissions": {"manage-privacy": {"id": "alice"}}
//!     }
//!   }
//! }
//! ```
//!
//! Any other action is looked up in `permissions` blocks, database level
//! first, then instance level.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use public_tables::core::{Action, Actor, Resource, Vote, INTERNAL_DATABASE};
use public_tables::perms::{PermissionChecker, PermissionVoter, PermsError, Result};

/// Whether `actor` satisfies an allow block.
///
/// - `true`/`false`/`null`: allow all, deny all, allow all
/// - `{"unauthenticated": true}` also matches anonymous requests
/// - `{"key": "*"}` matches any actor that has `key`
/// - `{"key": value}` or `{"key": [values]}` matches when the actor's `key`
///   (a value or a list) shares at least one value
pub fn actor_matches_allow(actor: Option<&Actor>, allow: &Value) -> bool {
    let rules = match allow {
        Value::Bool(allowed) => return *allowed,
        Value::Null => return true,
        Value::Object(rules) => rules,
        _ => return false,
    };

    let Some(actor) = actor else {
        return rules.get("unauthenticated") == Some(&Value::Bool(true));
    };
    let actor = actor.to_value();

    rules.iter().any(|(key, expected)| {
        let Some(actual) = actor.get(key) else {
            return false;
        };
        if expected == "*" {
            return true;
        }
        let expected = as_list(expected);
        as_list(actual).iter().any(|value| expected.contains(value))
    })
}

fn as_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Voter applying allow blocks from host metadata.
///
/// Only the block at the exact level of the check is consulted; climbing to
/// the enclosing database or instance is the host's job.
pub struct AllowRules {
    metadata: Arc<RwLock<Value>>,
}

impl AllowRules {
    pub fn new(metadata: Arc<RwLock<Value>>) -> Self {
        Self { metadata }
    }

    fn block(&self, path: &[&str]) -> Result<Option<Value>> {
        let metadata = self
            .metadata
            .read()
            .map_err(|e| PermsError::Check(e.to_string()))?;
        let mut node = &*metadata;
        for key in path {
            match node.get(*key) {
                Some(next) => node = next,
                None => return Ok(None),
            }
        }
        Ok(Some(node.clone()))
    }

    fn vote_on(&self, actor: Option<&Actor>, path: &[&str]) -> Result<Vote> {
        Ok(match self.block(path)? {
            Some(allow) => Vote::from_bool(actor_matches_allow(actor, &allow)),
            None => Vote::Abstain,
        })
    }
}

#[async_trait]
impl PermissionVoter for AllowRules {
    async fn vote(
        &self,
        _checker: &dyn PermissionChecker,
        actor: Option<&Actor>,
        action: &Action,
        resource: &Resource,
    ) -> Result<Vote> {
        match (action, resource) {
            (Action::ViewInstance, _) => self.vote_on(actor, &["allow"]),

            (Action::ViewDatabase, Resource::Database(db)) if db == INTERNAL_DATABASE => {
                Ok(Vote::from_bool(actor.map(Actor::is_root).unwrap_or(false)))
            }
            (Action::ViewDatabase, Resource::Database(db)) => {
                self.vote_on(actor, &["databases", db.as_str(), "allow"])
            }

            (Action::ViewTable, Resource::Table(t)) => self.vote_on(
                actor,
                &["databases", t.database.as_str(), "tables", t.table.as_str(), "allow"],
            ),

            (Action::ExecuteSql, Resource::Database(db)) => {
                let vote = self.vote_on(actor, &["databases", db.as_str(), "allow_sql"])?;
                if vote.is_decisive() {
                    return Ok(vote);
                }
                self.vote_on(actor, &["allow_sql"])
            }

            (action, resource) => {
                if let Some(db) = resource.database_name() {
                    let vote = self.vote_on(
                        actor,
                        &["databases", db, "permissions", action.as_str()],
                    )?;
                    if vote.is_decisive() {
                        return Ok(vote);
                    }
                }
                self.vote_on(actor, &["permissions", action.as_str()])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_blocks() {
        let user = Actor::new("user");
        assert!(actor_matches_allow(Some(&user), &json!(true)));
        assert!(actor_matches_allow(None, &json!(true)));
        assert!(!actor_matches_allow(Some(&user), &json!(false)));
        assert!(actor_matches_allow(None, &Value::Null));
    }

    #[test]
    fn test_wildcard_requires_actor() {
        let allow = json!({"id": "*"});
        assert!(actor_matches_allow(Some(&Actor::new("user")), &allow));
        assert!(!actor_matches_allow(None, &allow));
    }

    #[test]
    fn test_unauthenticated_flag() {
        let allow = json!({"unauthenticated": true});
        assert!(actor_matches_allow(None, &allow));
        assert!(!actor_matches_allow(Some(&Actor::new("user")), &allow));
    }

    #[test]
    fn test_value_and_list_matching() {
        let allow = json!({"id": ["root", "admin"], "roles": "staff"});
        assert!(actor_matches_allow(Some(&Actor::root()), &allow));
        assert!(!actor_matches_allow(Some(&Actor::new("user")), &allow));

        let staff = Actor::new("user").with_attribute("roles", json!(["staff", "dev"]));
        assert!(actor_matches_allow(Some(&staff), &allow));
    }

    struct NoChecks;

    #[async_trait]
    impl PermissionChecker for NoChecks {
        async fn permission_allowed(
            &self,
            _actor: Option<&Actor>,
            _action: &Action,
            _resource: &Resource,
        ) -> Result<bool> {
            Ok(false)
        }
    }

    fn rules(metadata: Value) -> AllowRules {
        AllowRules::new(Arc::new(RwLock::new(metadata)))
    }

    #[tokio::test]
    async fn test_permissions_block_database_first() {
        let rules = rules(json!({
            "permissions": {"manage-privacy": true},
            "databases": {"data": {"permissions": {"manage-privacy": {"id": "alice"}}}}
        }));
        let alice = Actor::new("alice");
        let bob = Actor::new("bob");
        let data = Resource::database("data");

        let vote = rules
            .vote(&NoChecks, Some(&alice), &Action::ManagePrivacy, &data)
            .await
            .unwrap();
        assert_eq!(vote, Vote::Grant);

        let vote = rules
            .vote(&NoChecks, Some(&bob), &Action::ManagePrivacy, &data)
            .await
            .unwrap();
        assert_eq!(vote, Vote::Deny);

        let other = Resource::database("other");
        let vote = rules
            .vote(&NoChecks, Some(&bob), &Action::ManagePrivacy, &other)
            .await
            .unwrap();
        assert_eq!(vote, Vote::Grant);
    }

    #[tokio::test]
    async fn test_missing_blocks_abstain() {
        let rules = rules(json!({}));
        let user = Actor::new("user");

        for (action, resource) in [
            (Action::ViewInstance, Resource::Instance),
            (Action::ViewDatabase, Resource::database("data")),
            (Action::ViewTable, Resource::table("data", "t1")),
            (Action::ExecuteSql, Resource::database("data")),
            (Action::ManagePrivacy, Resource::database("data")),
        ] {
            let vote = rules
                .vote(&NoChecks, Some(&user), &action, &resource)
                .await
                .unwrap();
            assert_eq!(vote, Vote::Abstain, "{action}");
        }
    }

    #[tokio::test]
    async fn test_internal_database_is_root_only() {
        let rules = rules(json!({"databases": {"_internal": {"allow": true}}}));
        let internal = Resource::database(INTERNAL_DATABASE);

        let vote = rules
            .vote(&NoChecks, Some(&Actor::root()), &Action::ViewDatabase, &internal)
            .await
            .unwrap();
        assert_eq!(vote, Vote::Grant);

        let vote = rules
            .vote(&NoChecks, None, &Action::ViewDatabase, &internal)
            .await
            .unwrap();
        assert_eq!(vote, Vote::Deny);
    }
}
