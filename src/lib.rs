//! Data access adapter for Elasticsearch-compatible search backends.
//!
//! This crate binds a small, generic Data Access Object surface — create
//! index, delete index, set document, get document, exists, query, count —
//! to an Elasticsearch-compatible HTTP backend via the official
//! [`elasticsearch`] client. The adapter contributes no search engine of its
//! own; its value is translating generic operations into backend request
//! bodies and mapping backend responses and failures into one small error
//! taxonomy.
//!
//! # Pieces
//!
//! - [`DaoConfig`] — immutable connection configuration (host, port,
//!   optional basic auth, TLS, timeout, retry policy).
//! - [`Document`]/[`Value`](document::Value) — a typed document tree whose
//!   leaves include dates and datetimes.
//! - [`codec`] — the encoder/decoder pair applied on every write and read,
//!   so date values survive the round trip through the text wire format.
//! - [`DocumentId`] — deterministic 12-byte backend ids derived from
//!   arbitrary caller identifiers via SHAKE-256.
//! - [`IndexSpec`] — index settings and mappings for creation.
//! - [`QueryOptions`]/[`QueryResult`] — search pagination, aggregations,
//!   sorting, and the decoded outcome.
//! - [`ElasticDao`] — the facade owning the connect/close lifecycle.
//!
//! # Example
//!
//! ```no_run
//! use elastic_dao::{document, DaoConfig, ElasticDao, IndexSpec, Value};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), elastic_dao::DaoError> {
//! let mut dao = ElasticDao::new(DaoConfig::new("127.0.0.1", 9200));
//! dao.connect()?;
//!
//! dao.create(
//!     "sample",
//!     &IndexSpec::new(json!({
//!         "properties": {
//!             "no": { "type": "long" },
//!             "name": { "type": "text" },
//!             "dateOfEntry": { "type": "date" }
//!         }
//!     })),
//! )
//! .await?;
//!
//! dao.set(
//!     "sample",
//!     &document([
//!         ("no", Value::from(3)),
//!         ("name", Value::from("허용선")),
//!         ("address", Value::from("서울특별시 중구")),
//!     ]),
//!     "1",
//! )
//! .await?;
//!
//! let fetched = dao.get("sample", "1").await?;
//! assert!(fetched.is_some());
//! # Ok(())
//! # }
//! ```

pub mod codec;
mod config;
mod dao;
pub mod document;
mod error;
mod id;
mod query;
mod schema;

pub use config::DaoConfig;
pub use dao::ElasticDao;
pub use document::{document, Document, Value};
pub use error::{DaoError, DaoResult};
pub use id::{DocumentId, ID_LEN};
pub use query::{QueryOptions, QueryResult};
pub use schema::IndexSpec;
