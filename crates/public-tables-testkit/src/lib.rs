//! # Public Tables Testkit
//!
//! Testing utilities for public tables.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **A reference host**: [`TestInstance`] attaches SQLite databases, applies
//!   allow-block rules from JSON metadata, runs the public tables voter in its
//!   permission chain and answers simulated requests
//! - **Allow blocks**: [`actor_matches_allow`] and the [`AllowRules`] voter
//! - **Fixtures**: temporary database files and test logging
//!
//! ## Usage
//!
//! ```rust,no_run
//! use public_tables_testkit::{fixtures, TestInstance};
//! use serde_json::json;
//!
//! async fn example() {
//!     let dir = tempfile::tempdir().unwrap();
//!     let path = fixtures::database_file(dir.path(), "data", "create table t1 (id int)");
//!
//!     let instance = TestInstance::builder()
//!         .file(&path)
//!         .metadata(json!({"allow": false}))
//!         .start()
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(instance.get("/data/t1", None).await.status, 403);
//! }
//! ```

pub mod allow;
pub mod fixtures;
pub mod instance;

pub use allow::{actor_matches_allow, AllowRules};
pub use instance::{TestInstance, TestInstanceBuilder, TestResponse};
