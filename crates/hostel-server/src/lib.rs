//! Hostel marketplace API server
//!
//! Landlords list hostels, students search, book and review them, and
//! landlords follow their business on an analytics dashboard.
//!
//! # Architecture
//!
//! Features are vertical slices under [`features`], each with `commands/`
//! (writes), `queries/` (reads) and `routes.rs`. Commands and queries are
//! plain data structs with a standalone `handle(pool, …)` function and a
//! `mediator::Request` impl; [`cqrs::build_mediator`] registers them all.
//!
//! Caller identity arrives from the upstream gateway as headers and is
//! extracted by [`middleware::AuthUser`].
//!
//! # Example
//!
//! ```no_run
//! use hostel_server::{api, config::Config, db, features::FeatureState, storage};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     let storage = storage::Storage::new(storage::config::StorageConfig::from_env()?).await?;
//!     let state = FeatureState {
//!         db: pool,
//!         storage,
//!         upload_max_bytes: config.uploads.max_bytes,
//!     };
//!     let app = api::create_router(state, &config);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod models;
pub mod storage;

pub use error::AppError;
