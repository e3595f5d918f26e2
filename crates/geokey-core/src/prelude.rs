// crates/geokey-core/src/prelude.rs

//! One-stop imports for binaries and tests.

pub use crate::common::{EngineStats, SearchHit, SearchResponse};
pub use crate::engine::{Engine, IngestReport, DEFAULT_LIMIT};
pub use crate::error::{GeoError, Result};
pub use crate::loader::CsvFlavor;
pub use crate::model::{GeoItem, GeoLevel, Name, ParentLink};
pub use crate::registry::{GeoRecord, Registry};
