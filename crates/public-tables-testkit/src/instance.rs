//! An in-process host for end-to-end tests.
//!
//! [`TestInstance`] plays the part of the table-browsing server: it attaches
//! SQLite databases, resolves permissions through a voter chain made of its
//! own allow-block rules plus the public tables voter, and answers requests
//! for a handful of routes:
//!
//! - `/` - instance page (`view-instance`)
//! - `/{db}` - database page (`view-database`)
//! - `/{db}/{table}` - table page (`view-table`; `_where=` needs `execute-sql`)
//! - `/-/public-table/{db}/{table}` - the privacy toggle
//!
//! View checks cascade: when every voter abstains on `view-table`, the
//! database is asked, then the instance. The first decisive vote wins.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use anyhow::anyhow;
use async_trait::async_trait;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use serde_json::{json, Value};
use tracing::debug;

use public_tables::core::{tilde_decode, Action, Actor, Resource, TableKind, INTERNAL_DATABASE};
use public_tables::perms::{PermissionChecker, PermissionVoter, Result as PermsResult, VoterChain};
use public_tables::store::{PublicTableStore, SqliteStore};
use public_tables::{Catalog, PublicTables, PublicTablesConfig, PublicTablesError, PLUGIN_NAME};

/// A database attached to the instance.
struct AttachedDatabase {
    name: String,
    conn: Arc<Mutex<Connection>>,
    mutable: bool,
}

/// Builder for [`TestInstance`].
#[derive(Default)]
pub struct TestInstanceBuilder {
    files: Vec<(PathBuf, bool)>,
    metadata: Option<Value>,
    plugin_config: Option<Value>,
}

impl TestInstanceBuilder {
    /// Attach a database file for reading and writing. The first attached
    /// database is the primary one.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push((path.as_ref().to_path_buf(), true));
        self
    }

    /// Attach a database file read-only.
    pub fn immutable(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push((path.as_ref().to_path_buf(), false));
        self
    }

    /// Instance metadata carrying allow blocks.
    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// This add-on's section of the plugin configuration. Without it the
    /// section is read from `plugins` in the metadata.
    pub fn plugin_config(mut self, config: Value) -> Self {
        self.plugin_config = Some(config);
        self
    }

    /// Attach everything and run the add-on's startup.
    pub async fn start(self) -> public_tables::Result<TestInstance> {
        let mut databases = Vec::new();

        for (path, mutable) in &self.files {
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .ok_or_else(|| anyhow!("unusable database path: {}", path.display()))?
                .to_string();
            let conn = if *mutable {
                Connection::open(path)
            } else {
                Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            }
            .map_err(anyhow::Error::from)?;

            databases.push(AttachedDatabase {
                name,
                conn: Arc::new(Mutex::new(conn)),
                mutable: *mutable,
            });
        }

        let internal = Connection::open_in_memory().map_err(anyhow::Error::from)?;
        internal
            .execute_batch("CREATE TABLE catalog_tables (database_name TEXT, table_name TEXT)")
            .map_err(anyhow::Error::from)?;
        databases.push(AttachedDatabase {
            name: INTERNAL_DATABASE.to_string(),
            conn: Arc::new(Mutex::new(internal)),
            mutable: true,
        });

        let metadata = self.metadata.unwrap_or_else(|| json!({}));
        let section = self
            .plugin_config
            .as_ref()
            .or_else(|| metadata.get("plugins").and_then(|p| p.get(PLUGIN_NAME)));
        let config = PublicTablesConfig::from_plugin_config(section)?;
        let plugin = PublicTables::startup(config, |name| {
            let db = match name {
                Some(name) => databases.iter().find(|db| db.name == name),
                None => databases.iter().find(|db| db.name != INTERNAL_DATABASE),
            }?;
            Some(SqliteStore::from_shared(Arc::clone(&db.conn), db.mutable))
        })
        .await?;

        let metadata = Arc::new(RwLock::new(metadata));
        let chain = VoterChain::new()
            .with(Arc::new(crate::allow::AllowRules::new(Arc::clone(&metadata))))
            .with(Arc::new(plugin.voter()));

        Ok(TestInstance {
            databases,
            metadata,
            chain,
            plugin,
        })
    }
}

/// A simulated HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResponse {
    pub status: u16,
    pub body: String,
    /// `Location` header of a redirect.
    pub location: Option<String>,
    /// Confirmation message queued by a redirect.
    pub notice: Option<String>,
}

impl TestResponse {
    fn ok(body: String) -> Self {
        Self {
            status: 200,
            body,
            location: None,
            notice: None,
        }
    }

    fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            location: None,
            notice: None,
        }
    }

    fn error(err: &PublicTablesError) -> Self {
        Self::status(err.status_code(), err.to_string())
    }
}

/// A running host with public tables installed.
pub struct TestInstance {
    databases: Vec<AttachedDatabase>,
    metadata: Arc<RwLock<Value>>,
    chain: VoterChain,
    plugin: PublicTables<SqliteStore>,
}

impl TestInstance {
    pub fn builder() -> TestInstanceBuilder {
        TestInstanceBuilder::default()
    }

    /// The started add-on.
    pub fn plugin(&self) -> &PublicTables<SqliteStore> {
        &self.plugin
    }

    /// Names of attached databases, primary first, internal last.
    pub fn database_names(&self) -> Vec<&str> {
        self.databases.iter().map(|db| db.name.as_str()).collect()
    }

    /// Replace the metadata; later checks see the new rules.
    pub fn set_metadata(&self, metadata: Value) -> public_tables::Result<()> {
        let mut current = self
            .metadata
            .write()
            .map_err(|e| anyhow!("metadata lock poisoned: {e}"))?;
        *current = metadata;
        Ok(())
    }

    /// Current contents of `_public_tables`.
    pub async fn public_tables(&self) -> public_tables::Result<Vec<String>> {
        Ok(self.plugin.store().public_tables().await?)
    }

    fn database(&self, name: &str) -> Option<&AttachedDatabase> {
        self.databases.iter().find(|db| db.name == name)
    }

    /// GET a path, optionally with a query string.
    pub async fn get(&self, path: &str, actor: Option<&Actor>) -> TestResponse {
        let response = self.route_get(path, actor).await;
        debug!(method = "GET", path, status = response.status, "request");
        response
    }

    /// POST form fields to a path.
    pub async fn post(
        &self,
        path: &str,
        actor: Option<&Actor>,
        form: &[(&str, &str)],
    ) -> TestResponse {
        let response = match parse_path(path) {
            Some(Route::Privacy { database, table }) => {
                let action = form
                    .iter()
                    .find(|(key, _)| *key == "action")
                    .map(|(_, value)| *value)
                    .unwrap_or_default();
                match self
                    .plugin
                    .controller()
                    .apply(self, actor, &database, &table, action)
                    .await
                {
                    Ok(redirect) => TestResponse {
                        status: redirect.status_code(),
                        body: String::new(),
                        location: Some(redirect.location),
                        notice: Some(redirect.notice),
                    },
                    Err(err) => TestResponse::error(&err),
                }
            }
            Some(_) => TestResponse::status(405, "method not allowed"),
            None => TestResponse::status(404, "not found"),
        };
        debug!(method = "POST", path, status = response.status, "request");
        response
    }

    async fn route_get(&self, path: &str, actor: Option<&Actor>) -> TestResponse {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));

        let result = match parse_path(path) {
            Some(Route::Instance) => self.instance_page(actor).await,
            Some(Route::Database { database }) => self.database_page(actor, &database).await,
            Some(Route::Table { database, table }) => {
                self.table_page(actor, &database, &table, query).await
            }
            Some(Route::Privacy { database, table }) => self
                .plugin
                .controller()
                .show(self, actor, &database, &table)
                .await
                .map(|page| TestResponse::ok(page.render_html())),
            None => Ok(TestResponse::status(404, "not found")),
        };

        result.unwrap_or_else(|err| TestResponse::error(&err))
    }

    async fn instance_page(&self, actor: Option<&Actor>) -> public_tables::Result<TestResponse> {
        if !self
            .permission_allowed(actor, &Action::ViewInstance, &Resource::Instance)
            .await?
        {
            return Ok(TestResponse::status(403, "forbidden"));
        }
        Ok(TestResponse::ok(format!(
            "<h1>Databases</h1>\n<p>{}</p>\n",
            self.database_names().join(", ")
        )))
    }

    async fn database_page(
        &self,
        actor: Option<&Actor>,
        database: &str,
    ) -> public_tables::Result<TestResponse> {
        if self.database(database).is_none() {
            return Ok(TestResponse::status(404, "database not found"));
        }
        if !self
            .permission_allowed(actor, &Action::ViewDatabase, &Resource::database(database))
            .await?
        {
            return Ok(TestResponse::status(403, "forbidden"));
        }
        Ok(TestResponse::ok(format!("<h1>{database}</h1>\n")))
    }

    async fn table_page(
        &self,
        actor: Option<&Actor>,
        database: &str,
        table: &str,
        query: &str,
    ) -> public_tables::Result<TestResponse> {
        if self.table_kind(database, table).await?.is_none() {
            return Ok(TestResponse::status(404, "table not found"));
        }
        if !self
            .permission_allowed(actor, &Action::ViewTable, &Resource::table(database, table))
            .await?
        {
            return Ok(TestResponse::status(403, "forbidden"));
        }

        let mut body = format!("<h1>{table}</h1>\n");

        let actions = self
            .plugin
            .affordances()
            .table_actions(self, actor, database, table)
            .await?;
        if !actions.is_empty() {
            body.push_str("<ul class=\"table-actions\">\n");
            for action in &actions {
                body.push_str(&action.render_html());
                body.push('\n');
            }
            body.push_str("</ul>\n");
        }

        let wheres = query
            .split('&')
            .filter(|pair| pair.starts_with("_where="))
            .count();
        if wheres > 0 {
            if !self
                .permission_allowed(actor, &Action::ExecuteSql, &Resource::database(database))
                .await?
            {
                return Ok(TestResponse::status(403, "_where= is not allowed"));
            }
            let noun = if wheres == 1 { "clause" } else { "clauses" };
            body.push_str(&format!("<p>{wheres} extra where {noun}</p>\n"));
        }

        Ok(TestResponse::ok(body))
    }
}

#[async_trait]
impl PermissionChecker for TestInstance {
    async fn permission_allowed(
        &self,
        actor: Option<&Actor>,
        action: &Action,
        resource: &Resource,
    ) -> PermsResult<bool> {
        let mut action = action.clone();
        let mut resource = resource.clone();

        loop {
            let vote = self.chain.vote(self, actor, &action, &resource).await?;
            if vote.is_decisive() {
                return Ok(vote.resolve(false));
            }

            match (cascade_parent(&action), resource.parent()) {
                (Some(parent_action), Some(parent)) => {
                    action = parent_action;
                    resource = parent;
                }
                _ => return Ok(action.default_allowed()),
            }
        }
    }
}

#[async_trait]
impl Catalog for TestInstance {
    async fn table_kind(&self, database: &str, table: &str) -> anyhow::Result<Option<TableKind>> {
        let Some(db) = self.database(database) else {
            return Ok(None);
        };
        let conn = Arc::clone(&db.conn);
        let table = table.to_string();

        tokio::task::spawn_blocking(move || -> anyhow::Result<Option<TableKind>> {
            let conn = conn
                .lock()
                .map_err(|e| anyhow!("connection lock poisoned: {e}"))?;
            let kind: Option<String> = conn
                .query_row(
                    "SELECT type FROM sqlite_master WHERE name = ?1 AND type IN ('table', 'view')",
                    [&table],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(kind.map(|kind| match kind.as_str() {
                "view" => TableKind::View,
                _ => TableKind::Table,
            }))
        })
        .await?
    }
}

/// The view action one level up, for cascading abstentions.
fn cascade_parent(action: &Action) -> Option<Action> {
    match action {
        Action::ViewTable => Some(Action::ViewDatabase),
        Action::ViewDatabase => Some(Action::ViewInstance),
        _ => None,
    }
}

enum Route {
    Instance,
    Database { database: String },
    Table { database: String, table: String },
    Privacy { database: String, table: String },
}

fn parse_path(path: &str) -> Option<Route> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Some(Route::Instance);
    }

    let segments: Vec<&str> = trimmed.split('/').collect();
    match segments.as_slice() {
        ["-", "public-table", database, table] => Some(Route::Privacy {
            database: tilde_decode(database)?,
            table: tilde_decode(table)?,
        }),
        [database] => Some(Route::Database {
            database: tilde_decode(database)?,
        }),
        [database, table] => Some(Route::Table {
            database: tilde_decode(database)?,
            table: tilde_decode(table)?,
        }),
        _ => None,
    }
}
