// crates/geokey-core/src/lib.rs

//! # geokey-core
//!
//! In-memory search over a multilingual administrative hierarchy
//! (region → raion → city → district → microdistrict → street → address).
//!
//! Every whole word and every suffix of every name, in both languages,
//! lands in a character [`trie::Trie`]; multi-word queries combine
//! per-word id sets; ingest reconciles ambiguously-named ancestors onto
//! existing records or materializes them with synthetic negative ids.
//!
//! ```no_run
//! use geokey_core::Engine;
//!
//! let engine = Engine::load_path("geo.csv")?;
//! let response = engine.search("київ");
//! println!("{} matches", response.count);
//! # Ok::<(), geokey_core::GeoError>(())
//! ```

pub mod common;
pub mod engine;
pub mod error;
pub mod loader;
pub mod model;
pub mod registry;
pub mod text;
pub mod trie;

pub mod prelude;

// Re-exports
pub use crate::common::{EngineStats, SearchHit, SearchResponse};
pub use crate::engine::{Engine, IngestReport, DEFAULT_LIMIT};
pub use crate::error::{GeoError, Result};
pub use crate::loader::CsvFlavor;
pub use crate::model::{GeoItem, GeoLevel, Name, ParentLink};
pub use crate::registry::{GeoRecord, Registry};
pub use crate::trie::{Trie, TrieInfo};
