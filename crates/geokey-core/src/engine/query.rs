// crates/geokey-core/src/engine/query.rs

//! Query path: non-exact trie lookup, keyboard-layout retries, and
//! envelope shaping. Never fails — the worst case is an empty envelope.

use crate::common::{SearchHit, SearchResponse};
use crate::engine::Engine;
use crate::model::LEVEL_SEP;
use crate::text::{translate_layout, KEYBOARD_LAYOUTS};

/// Results shown per envelope before the `hidden` counter kicks in.
pub const DEFAULT_LIMIT: usize = 20;

impl Engine {
    pub fn search(&self, query: &str) -> SearchResponse {
        self.search_with_limit(query, DEFAULT_LIMIT)
    }

    pub fn search_with_limit(&self, query: &str, limit: usize) -> SearchResponse {
        let raw = query.trim();
        if raw.is_empty() {
            return SearchResponse::empty(raw);
        }

        let mut effective = raw.to_string();
        let mut ids = self.lookup(raw, false);

        if ids.is_empty() {
            // wrong-keyboard-layout retry: Ukrainian map, then Russian
            for layout in KEYBOARD_LAYOUTS.iter() {
                let translated = translate_layout(raw, layout);
                let retry = self.lookup(&translated, false);
                if !retry.is_empty() {
                    tracing::debug!(from = raw, to = %translated, "layout retry hit");
                    effective = translated;
                    ids = retry;
                    break;
                }
            }
        }

        if ids.is_empty() {
            return SearchResponse::empty(effective);
        }

        let mut sorted: Vec<i64> = ids.into_iter().collect();
        sorted.sort_unstable();
        let count = sorted.len();

        let results: Vec<SearchHit> = sorted
            .into_iter()
            .take(limit)
            .filter_map(|id| self.shape_hit(id, &effective))
            .collect();

        SearchResponse {
            query: effective,
            hidden: count - results.len(),
            count,
            results,
        }
    }

    /// One record as the UI sees it: per-language name pairs with the
    /// query-matching language sorted on top.
    fn shape_hit(&self, id: i64, query: &str) -> Option<SearchHit> {
        let chain = self.lineage(id);
        let (record, ancestors) = chain.split_last()?;

        let joined = |f: fn(&crate::model::GeoItem) -> String| {
            ancestors
                .iter()
                .map(|rec| f(&rec.item))
                .collect::<Vec<_>>()
                .join(LEVEL_SEP)
        };

        let mut names = vec![
            (record.item.fullname(), joined(|item| item.fullname())),
            (record.item.fullname_uk(), joined(|item| item.fullname_uk())),
        ];
        let needle = query.to_lowercase();
        // stable sort: matching language first, primary wins ties
        names.sort_by_key(|(own, _)| !own.to_lowercase().contains(&needle));

        Some(SearchHit {
            id,
            level: record.item.level,
            names,
        })
    }
}
