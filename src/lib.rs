//! # batch-api
//!
//! Concurrent, order-preserving HTTP batch dispatch, plus the KMZ and sector lookup
//! utilities that usually travel with it.
//!
//! ## Design Philosophy
//!
//! batch-api is designed to be:
//! - **Strict on input** - A single malformed request rejects the whole batch before anything is sent
//! - **Forgiving on the network** - A failed request is reported in its own slot, never aborting its siblings
//! - **Order-preserving** - Output position `i` always belongs to input position `i`
//! - **Library-first** - No CLI or UI; every collaborator is a trait you can replace
//!
//! ## Quick Start
//!
//! ```no_run
//! use batch_api::{Config, Dispatcher, Outcome};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.dispatch.concurrency_limit = 4;
//!
//!     let dispatcher = Dispatcher::new(config)?;
//!     let outcomes = dispatcher
//!         .batch_send_api_requests(&[
//!             json!({"url": "http://localhost:3000", "body": "{\"jobs\":[]}"}),
//!             json!({"url": "http://localhost:3000", "body": ""}),
//!         ])
//!         .await?;
//!
//!     for (i, outcome) in outcomes.into_iter().enumerate() {
//!         match outcome {
//!             Outcome::Success(response) => println!("{i}: {}", response.http_status_code),
//!             Outcome::Failure(error) => println!("{i}: failed ({error})"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Batch dispatcher (validation, scheduling, aggregation)
pub mod dispatcher;
/// Error types
pub mod error;
/// KMZ codec
pub mod kmz;
/// Geospatial sector store
pub mod sectors;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::{Config, DispatchConfig};
pub use dispatcher::{Dispatcher, HttpExecutor, ReqwestExecutor, batch_send_api_requests};
pub use error::{
    ArchiveError, ConsistencyError, Error, Result, SectorError, TaskError, TaskErrorKind,
    ValidationError,
};
pub use kmz::{ArchiveCodec, KmzCodec, compress_kml_to_kmz, uncompress_kmz_to_kml};
pub use sectors::{MemStore, Sector, SectorLookup};
pub use types::{
    BatchJob, BatchResult, GeoPoint, Outcome, Region, RequestDescriptor, Response, TaskResult,
};
