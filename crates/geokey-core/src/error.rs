// crates/geokey-core/src/error.rs

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Row declared a geo type outside the seven known levels.
    #[error("unknown geo type `{0}`")]
    UnknownGeoType(String),

    /// The comma-separated level count does not fit the declared type.
    #[error("`{level}` cannot be built from {found} level(s) in `{raw}`")]
    LevelCount {
        level: &'static str,
        found: usize,
        raw: String,
    },

    /// The two language strings disagree on the number of levels.
    #[error("language level mismatch: `{name}` vs `{name_uk}`")]
    LanguageMismatch { name: String, name_uk: String },

    /// A CSV field failed basic shape validation (missing column, bad id).
    #[error("malformed row: {0}")]
    MalformedRow(String),

    /// Tree-flavor row references a parent id that was never ingested.
    #[error("row {id} references unknown parent id {parent_id}")]
    UnknownParent { id: i64, parent_id: i64 },

    /// Same id interned twice with different items.
    #[error("registry collision: id {id} is already taken by a different item")]
    RegistryCollision { id: i64 },

    /// Reconciliation found several equally valid parents for one child.
    #[error("duplicate child-parent paths for `{name}`: candidate ids {ids:?}")]
    AmbiguousDuplicate { name: String, ids: Vec<i64> },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GeoError {
    /// Row-scoped errors are logged and the row is dropped when ingesting a
    /// stream; everything else aborts the ingest.
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            GeoError::UnknownGeoType(_)
                | GeoError::LevelCount { .. }
                | GeoError::LanguageMismatch { .. }
                | GeoError::MalformedRow(_)
                | GeoError::UnknownParent { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GeoError>;
