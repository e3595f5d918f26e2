// crates/geokey-core/src/common.rs

use serde::Serialize;

use crate::model::GeoLevel;
use crate::trie::TrieInfo;

/// One search hit, shaped for the UI.
///
/// `names` holds one `(self_fullname, ancestors_fullname)` pair per
/// language, the pair matching the query first so the right language
/// shows on top.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: i64,
    #[serde(rename = "type")]
    pub level: GeoLevel,
    pub names: Vec<(String, String)>,
}

/// The search envelope returned for every query, including empty ones.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    /// The effective query: the layout-translated string when a retry
    /// produced the hits ("did you mean"), else the raw input.
    pub query: String,
    pub results: Vec<SearchHit>,
    /// How many matches were cut by the result limit.
    pub hidden: usize,
    /// Total matches before the limit.
    pub count: usize,
}

impl SearchResponse {
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            results: Vec::new(),
            hidden: 0,
            count: 0,
        }
    }
}

/// Aggregate statistics for an engine.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    /// All interned records, synthetic parents included.
    pub records: usize,
    /// Parents the engine materialized with negative ids.
    pub synthesized: usize,
    pub trie: TrieInfo,
}
