//! account-inspector — administrative usage report for one account
//!
//! Resolves an account's full ownership hierarchy (memberships,
//! workspaces, resources, published variants) from PostgreSQL in a
//! single bounded query, then counts qualifying events per resource and
//! reports the resources with a non-zero count.
//!
//! The flow is strictly linear: resolve → render snapshot → (confirm) →
//! metric pass. The interactive binary (`inspect_account`) owns all
//! prompting and printing; everything in this library is prompt-free and
//! testable against an in-memory store.
//!
//! ```rust,no_run
//! use account_inspector::database::DatabaseManager;
//! use account_inspector::inspector::Inspector;
//! use account_inspector::report::render_snapshot;
//!
//! # async fn run() -> Result<(), account_inspector::error::StoreError> {
//! let db = DatabaseManager::with_default_config().await?;
//! let inspector = Inspector::new(db.account_repository());
//!
//! if let Some(snapshot) = inspector.resolve("a@x.com").await? {
//!     for line in render_snapshot(&snapshot) {
//!         println!("{line}");
//!     }
//!     inspector.metric_pass(&snapshot, |line| println!("{line}")).await?;
//! }
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Database integration: pool management, store trait, Postgres repository
pub mod database;

// Report flow orchestration
pub mod inspector;

// Pure report rendering
pub mod report;
