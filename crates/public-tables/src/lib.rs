//! # Public Tables
//!
//! Lets an administrator mark individual tables or views as public while
//! every other table stays behind the host's normal permission rules.
//!
//! ## Overview
//!
//! The add-on keeps a list of public table names in one host database and
//! contributes four things to the host:
//!
//! - **Startup**: creates `_public_tables` in the configured database, and
//!   refuses to start if that database is immutable
//! - **A permission voter**: grants `view-table` on public tables
//! - **A toggle controller**: the `/-/public-table/{db}/{table}` page
//! - **An affordance**: the "Make table public" menu entry
//!
//! The host provides routing, rendering, authentication and the rest of the
//! permission chain through the [`Host`] trait.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use public_tables::{PublicTables, PublicTablesConfig};
//! use public_tables::store::SqliteStore;
//!
//! async fn example() {
//!     let config = PublicTablesConfig::from_plugin_config(None).unwrap();
//!
//!     let plugin = PublicTables::startup(config, |_database| {
//!         SqliteStore::open("data.db").ok()
//!     })
//!     .await
//!     .unwrap();
//!
//!     // Register the voter with the host's permission chain.
//!     let _voter = plugin.voter();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `public_tables::core` - Actors, actions, resources, votes
//! - `public_tables::store` - Storage abstraction and SQLite
//! - `public_tables::perms` - Predicate and voter

pub mod affordance;
pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod page;
pub mod plugin;

// Re-export component crates
pub use public_tables_core as core;
pub use public_tables_perms as perms;
pub use public_tables_store as store;

// Re-export main types for convenience
pub use affordance::{AffordanceProvider, TableAction};
pub use config::{PublicTablesConfig, PLUGIN_NAME};
pub use controller::{Redirect, ToggleController};
pub use error::{PublicTablesError, Result};
pub use host::{can_manage_privacy, Catalog, Host};
pub use page::PrivacyPage;
pub use plugin::PublicTables;

pub use public_tables_core::{
    Action, Actor, Resource, TableKind, TableRef, ToggleAction, Vote, INTERNAL_DATABASE,
};
