//! # Procdoc
//!
//! A process-documentation portal backend, usable both as a standalone binary
//! and as a library. Content is a fixed 3-level hierarchy (macroprocess →
//! subprocess → document) with category/type tagging, a flat key-value config
//! store for side-panel embedding, and admin-gated mutations.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! procdoc = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use procdoc::server::{AppState, create_router};
//! use procdoc::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/procdoc.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState { store: Arc::new(store) });
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the `procdoc` binary. Disable with
//!   `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod types;
