//! # Database Operations
//!
//! PostgreSQL access for the dbt_artifacts store.
//!
//! - [`connection`] - pool construction from [`DatabaseConfig`](crate::config::DatabaseConfig)
//! - [`store`] - the [`TimelineStore`] seam and its PostgreSQL implementation
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use dbt_timeline::config::TimelineConfig;
//! use dbt_timeline::database::{DatabaseConnection, PgTimelineStore, TimelineStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TimelineConfig::default();
//! let db = DatabaseConnection::connect(&config.database).await?;
//! let store = PgTimelineStore::new(db.pool().clone(), &config.database);
//! let projects = store.list_projects().await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod store;

pub use connection::DatabaseConnection;
pub use store::{PgTimelineStore, TimelineInputs, TimelineStore};
