//! Fundamental types: actors, actions, resources.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};
use crate::ROOT_ACTOR_ID;

/// An authenticated principal.
///
/// The host authenticates requests and hands over the actor as a JSON
/// object. Only `id` is interpreted here; everything else is kept so that
/// host rules can match on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// The actor identifier.
    pub id: String,

    /// Remaining attributes, untouched.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Actor {
    /// Create an actor with the given id and no extra attributes.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }

    /// The superuser actor.
    pub fn root() -> Self {
        Self::new(ROOT_ACTOR_ID)
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Whether this actor is the superuser.
    pub fn is_root(&self) -> bool {
        self.id == ROOT_ACTOR_ID
    }

    /// The actor as a JSON object, `id` included.
    pub fn to_value(&self) -> Value {
        let mut map = self.attributes.clone();
        map.insert("id".to_string(), Value::String(self.id.clone()));
        Value::Object(map)
    }
}

/// A permission name the host may ask about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// View the instance home page.
    ViewInstance,
    /// View a database.
    ViewDatabase,
    /// View a table or a view.
    ViewTable,
    /// Run arbitrary SQL against a database.
    ExecuteSql,
    /// Toggle tables between public and private.
    ManagePrivacy,
    /// Any other action; never interpreted by this add-on.
    Other(String),
}

impl Action {
    /// The wire name of the action.
    pub fn as_str(&self) -> &str {
        match self {
            Action::ViewInstance => "view-instance",
            Action::ViewDatabase => "view-database",
            Action::ViewTable => "view-table",
            Action::ExecuteSql => "execute-sql",
            Action::ManagePrivacy => "manage-privacy",
            Action::Other(name) => name,
        }
    }

    /// Outcome when every voter abstains.
    ///
    /// Viewing and querying are open unless a rule says otherwise.
    /// Managing privacy is closed unless a rule grants it.
    pub fn default_allowed(&self) -> bool {
        match self {
            Action::ViewInstance
            | Action::ViewDatabase
            | Action::ViewTable
            | Action::ExecuteSql => true,
            Action::ManagePrivacy | Action::Other(_) => false,
        }
    }
}

impl FromStr for Action {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "view-instance" => Action::ViewInstance,
            "view-database" => Action::ViewDatabase,
            "view-table" => Action::ViewTable,
            "execute-sql" => Action::ExecuteSql,
            "manage-privacy" => Action::ManagePrivacy,
            other => Action::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table (or view) within a named database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub database: String,
    pub table: String,
}

impl TableRef {
    pub fn new(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.database, self.table)
    }
}

/// The target of a permission check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Instance,
    Database(String),
    Table(TableRef),
}

impl Resource {
    /// Shorthand for a table resource.
    pub fn table(database: impl Into<String>, table: impl Into<String>) -> Self {
        Resource::Table(TableRef::new(database, table))
    }

    /// Shorthand for a database resource.
    pub fn database(name: impl Into<String>) -> Self {
        Resource::Database(name.into())
    }

    /// The database this resource lives in, if any.
    pub fn database_name(&self) -> Option<&str> {
        match self {
            Resource::Instance => None,
            Resource::Database(name) => Some(name.as_str()),
            Resource::Table(table) => Some(table.database.as_str()),
        }
    }

    /// The enclosing resource, one level up.
    pub fn parent(&self) -> Option<Resource> {
        match self {
            Resource::Instance => None,
            Resource::Database(_) => Some(Resource::Instance),
            Resource::Table(table) => Some(Resource::Database(table.database.clone())),
        }
    }
}

/// Whether a catalog name refers to a table or a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Table,
    View,
}

impl TableKind {
    /// Lower-case noun used in labels ("table", "view").
    pub fn noun(&self) -> &'static str {
        match self {
            TableKind::Table => "table",
            TableKind::View => "view",
        }
    }

    /// Capitalised noun used at the start of a sentence.
    pub fn title(&self) -> &'static str {
        match self {
            TableKind::Table => "Table",
            TableKind::View => "View",
        }
    }
}

/// The two transitions a table can go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToggleAction {
    MakePublic,
    MakePrivate,
}

impl ToggleAction {
    /// Form value of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToggleAction::MakePublic => "make-public",
            ToggleAction::MakePrivate => "make-private",
        }
    }

    /// The transition that leads away from the given state.
    pub fn next_from(is_public: bool) -> Self {
        if is_public {
            ToggleAction::MakePrivate
        } else {
            ToggleAction::MakePublic
        }
    }

    /// Whether the table ends up public after this transition.
    pub fn makes_public(&self) -> bool {
        matches!(self, ToggleAction::MakePublic)
    }
}

impl FromStr for ToggleAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "make-public" => Ok(ToggleAction::MakePublic),
            "make-private" => Ok(ToggleAction::MakePrivate),
            other => Err(CoreError::UnknownToggleAction(other.to_string())),
        }
    }
}

impl fmt::Display for ToggleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_names_roundtrip() {
        for action in [
            Action::ViewInstance,
            Action::ViewDatabase,
            Action::ViewTable,
            Action::ExecuteSql,
            Action::ManagePrivacy,
        ] {
            let parsed: Action = action.as_str().parse().unwrap();
            assert_eq!(parsed, action);
        }

        let other: Action = "insert-row".parse().unwrap();
        assert_eq!(other, Action::Other("insert-row".to_string()));
    }

    #[test]
    fn test_manage_privacy_closed_by_default() {
        assert!(Action::ViewTable.default_allowed());
        assert!(Action::ExecuteSql.default_allowed());
        assert!(!Action::ManagePrivacy.default_allowed());
        assert!(!Action::Other("drop-table".into()).default_allowed());
    }

    #[test]
    fn test_actor_from_host_json() {
        let actor: Actor = serde_json::from_value(json!({"id": "root", "roles": ["staff"]})).unwrap();
        assert!(actor.is_root());
        assert_eq!(actor.attributes["roles"], json!(["staff"]));
        assert_eq!(actor.to_value(), json!({"id": "root", "roles": ["staff"]}));

        assert!(serde_json::from_value::<Actor>(json!({"name": "no id"})).is_err());
    }

    #[test]
    fn test_resource_parents() {
        let table = Resource::table("data", "t1");
        assert_eq!(table.database_name(), Some("data"));
        assert_eq!(table.parent(), Some(Resource::database("data")));
        assert_eq!(
            Resource::database("data").parent(),
            Some(Resource::Instance)
        );
        assert_eq!(Resource::Instance.parent(), None);
    }

    #[test]
    fn test_toggle_action_parsing() {
        assert_eq!(
            "make-public".parse::<ToggleAction>().unwrap(),
            ToggleAction::MakePublic
        );
        assert_eq!(
            "make-private".parse::<ToggleAction>().unwrap(),
            ToggleAction::MakePrivate
        );
        assert!(matches!(
            "make-secret".parse::<ToggleAction>(),
            Err(CoreError::UnknownToggleAction(_))
        ));
        assert_eq!(ToggleAction::next_from(false), ToggleAction::MakePublic);
        assert_eq!(ToggleAction::next_from(true), ToggleAction::MakePrivate);
    }
}
