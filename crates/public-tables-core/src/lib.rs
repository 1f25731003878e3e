//! # Public Tables Core
//!
//! Shared vocabulary for the public tables add-on: who is asking, what they
//! want to do, and to which resource.
//!
//! This crate contains no I/O and no storage. It is pure data and the small
//! amount of logic attached to it.
//!
//! ## Key Types
//!
//! - [`Actor`] - An authenticated principal, as handed over by the host
//! - [`Action`] - A permission name the host asks about
//! - [`Resource`] - The instance, a database, or a table
//! - [`Vote`] - Tri-state answer of a permission voter
//! - [`TableKind`] - Whether a name refers to a table or a view
//!
//! ## Reserved Names
//!
//! The host keeps its own bookkeeping in [`INTERNAL_DATABASE`]. Tables in that
//! database can never be made public.

pub mod error;
pub mod types;
pub mod urls;
pub mod vote;

pub use error::{CoreError, Result};
pub use types::{Action, Actor, Resource, TableKind, TableRef, ToggleAction};
pub use urls::{privacy_path, table_path, tilde_decode, tilde_encode};
pub use vote::Vote;

/// Name of the host database reserved for internal bookkeeping.
pub const INTERNAL_DATABASE: &str = "_internal";

/// Name of the table holding the public table names.
pub const PUBLIC_TABLES_TABLE: &str = "_public_tables";

/// Actor id treated as the superuser.
pub const ROOT_ACTOR_ID: &str = "root";
