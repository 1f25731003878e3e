//! # Public Tables Permissions
//!
//! The permission side of public tables: the privacy predicate and the voter
//! that plugs it into a host's permission chain.
//!
//! ## Overview
//!
//! A host resolves a permission check by asking several voters. Each voter
//! answers with a [`Vote`](public_tables_core::Vote): grant, deny, or
//! abstain. [`PublicTableVoter`] only ever widens access: it grants
//! `view-table` for public tables and abstains everywhere else, apart from
//! two narrow rules for `manage-privacy` and anonymous `execute-sql`.
//!
//! ## Key Types
//!
//! - [`PrivacyPredicate`] - "is this table public", backed by a store
//! - [`PermissionVoter`] - One voter in a permission chain
//! - [`PermissionChecker`] - The host's full permission check, for nested checks
//! - [`PublicTableVoter`] - The voter contributed by this add-on
//! - [`VoterChain`] - Combines several voters into one vote
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use public_tables_core::{Action, Resource, Vote};
//! use public_tables_perms::{PermissionChecker, PermissionVoter, PublicTableVoter};
//! use public_tables_store::MemoryStore;
//!
//! async fn example(host: &dyn PermissionChecker) {
//!     let store = Arc::new(MemoryStore::with_public(["t1"]));
//!     let voter = PublicTableVoter::new(store);
//!
//!     let vote = voter
//!         .vote(host, None, &Action::ViewTable, &Resource::table("data", "t1"))
//!         .await
//!         .unwrap();
//!     assert_eq!(vote, Vote::Grant);
//! }
//! ```

pub mod chain;
pub mod error;
pub mod predicate;
pub mod voter;

pub use chain::VoterChain;
pub use error::{PermsError, Result};
pub use predicate::PrivacyPredicate;
pub use voter::{PermissionChecker, PermissionVoter, PublicTableVoter};
