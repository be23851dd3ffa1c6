//! Open extension storage for graphext.
//!
//! An open extension is a schema-free key/value payload attached to a Graph
//! resource and identified by a name unique per resource. This crate reads
//! one by name and upserts one (create if absent, full replace if present)
//! on top of any [`GraphClient`](graphext_session::GraphClient).
//!
//! # Example
//!
//! ```no_run
//! use graphext_extensions::{ExtensionStore, Settings};
//! use graphext_session::{GraphSession, GraphSessionConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let session = GraphSession::new(GraphSessionConfig::default())?;
//! let store = ExtensionStore::new(&session, "graph-rust-sample");
//!
//! let mut settings = Settings::new();
//! settings.insert("color".to_string(), "blue".into());
//! let response = store.write(&settings).await?;
//! assert!(response.ok());
//!
//! assert_eq!(store.setting_str("color").await?.as_deref(), Some("blue"));
//! # Ok(())
//! # }
//! ```

mod error;
mod record;
mod store;

pub use error::{ExtensionError, ExtensionResult};
pub use record::{request_body, ExtensionRecord, Settings, OPEN_TYPE_EXTENSION};
pub use store::{read_extension, write_extension, ExtensionStore, DEFAULT_ENTITY};
