// crates/geokey-core/src/engine/mod.rs

//! The engine owns the trie and the record registry for its lifetime.
//! Ingest is the only mutating phase; a frozen engine serves queries
//! through `&self` and can be shared freely.

mod query;

pub use query::DEFAULT_LIMIT;

use crate::common::EngineStats;
use crate::error::{GeoError, Result};
use crate::model::{GeoItem, ParentLink};
use crate::registry::{GeoRecord, Registry};
use crate::trie::Trie;

use std::collections::HashSet;

/// Outcome counters for one ingest pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestReport {
    pub added: usize,
    pub skipped: usize,
}

#[derive(Default)]
pub struct Engine {
    trie: Trie,
    registry: Registry,
    /// Next synthetic id is `fixup_counter - 1`; counts down from 0.
    fixup_counter: i64,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Raw id-set lookup against the index.
    pub fn lookup(&self, query: &str, exact: bool) -> HashSet<i64> {
        self.trie.lookup(query, exact)
    }

    /// Intern and index a record, then resolve its parent chain upward.
    ///
    /// Each unresolved ancestor is matched against already-known records
    /// by an exact-name lookup; a compatible match is adopted, anything
    /// else gets a synthesized record with the next negative id. The walk
    /// rewrites `Raw` links to `Id` links in place, so after `add`
    /// returns no unresolved pointer remains anywhere in the chain.
    pub fn add(&mut self, record: GeoRecord) -> Result<()> {
        let id = record.id;
        self.registry.insert(record)?;
        if let Some(rec) = self.registry.get(id) {
            self.trie.index_item(id, &rec.item);
        }

        let mut cursor = id;
        loop {
            let link = match self.registry.get(cursor) {
                Some(rec) => rec.item.parent.clone(),
                None => break,
            };
            match link {
                None => break,
                Some(ParentLink::Id(parent_id)) => {
                    // already resolved, keep climbing
                    cursor = parent_id;
                }
                Some(ParentLink::Raw(parent_item)) => {
                    let parent_id = self.resolve_parent(&parent_item)?;
                    if let Some(rec) = self.registry.get_mut(cursor) {
                        rec.item.parent = Some(ParentLink::Id(parent_id));
                    }
                    cursor = parent_id;
                }
            }
        }
        Ok(())
    }

    /// Feed a row stream into the engine. Row-scoped failures are logged
    /// and dropped; structural failures (collision, ambiguous duplicate)
    /// abort the pass.
    pub fn ingest<I>(&mut self, rows: I) -> Result<IngestReport>
    where
        I: IntoIterator<Item = Result<GeoRecord>>,
    {
        let mut report = IngestReport::default();
        for row in rows {
            match row.and_then(|record| self.add(record)) {
                Ok(()) => report.added += 1,
                Err(err) if err.is_row_error() => {
                    tracing::warn!(%err, "skipping row");
                    report.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }
        tracing::info!(
            added = report.added,
            skipped = report.skipped,
            records = self.registry.len(),
            "ingest finished"
        );
        Ok(report)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            records: self.registry.len(),
            synthesized: self.registry.iter().filter(|r| r.is_synthetic()).count(),
            trie: self.trie.info(),
        }
    }

    /// Records from the root down to `id` inclusive. Empty for unknown ids.
    pub fn lineage(&self, id: i64) -> Vec<&GeoRecord> {
        let mut chain = Vec::new();
        let mut cursor = self.registry.get(id);
        while let Some(rec) = cursor {
            chain.push(rec);
            cursor = match &rec.item.parent {
                Some(ParentLink::Id(parent_id)) => self.registry.get(*parent_id),
                _ => None,
            };
        }
        chain.reverse();
        chain
    }

    // -------------------------------------------------------------------
    // Parent reconciliation
    // -------------------------------------------------------------------

    /// Map an unresolved ancestor onto an existing record, or materialize
    /// a synthetic one.
    fn resolve_parent(&mut self, parent: &GeoItem) -> Result<i64> {
        let query = parent.fullname();
        let ids = self.trie.lookup(&query, true);

        match ids.len() {
            0 => self.synthesize(parent),
            1 => {
                let id = ids.into_iter().next().expect("one id");
                let compatible = self
                    .registry
                    .get(id)
                    .map(|rec| self.same_parents(parent, &rec.item))
                    .unwrap_or(false);
                if compatible {
                    Ok(id)
                } else {
                    self.synthesize(parent)
                }
            }
            _ => {
                let mut candidates: Vec<i64> = ids.into_iter().collect();
                candidates.sort_unstable();
                // word-superset hits: multi-word names match every one of
                // their tokens, so require the full rendered name
                candidates.retain(|id| {
                    self.registry
                        .get(*id)
                        .map(|rec| rec.item.fullname() == query)
                        .unwrap_or(false)
                });
                candidates.retain(|id| {
                    self.registry
                        .get(*id)
                        .map(|rec| self.same_parents(parent, &rec.item))
                        .unwrap_or(false)
                });
                match candidates.len() {
                    1 => Ok(candidates[0]),
                    0 => self.synthesize(parent),
                    _ => Err(GeoError::AmbiguousDuplicate {
                        name: query,
                        ids: candidates,
                    }),
                }
            }
        }
    }

    fn synthesize(&mut self, item: &GeoItem) -> Result<i64> {
        self.fixup_counter -= 1;
        let id = self.fixup_counter;
        tracing::debug!(id, name = %item.fullname(), "materializing parent");
        self.trie.index_item(id, item);
        self.registry.insert(GeoRecord::new(id, item.clone()))?;
        Ok(id)
    }

    /// Can record item `b` serve as the parent that unresolved item `a`
    /// describes? Same level, equal parents, and either identical
    /// rendered names or `a`'s plain name embedding `b`'s former name as
    /// a prefix/suffix (inputs sometimes fold the old variant into the
    /// current spelling).
    fn same_parents(&self, a: &GeoItem, b: &GeoItem) -> bool {
        if a.level != b.level {
            return false;
        }
        if !self
            .registry
            .links_equal(a.parent.as_ref(), b.parent.as_ref())
        {
            return false;
        }
        let a_full = a.fullname();
        if a_full == b.fullname() {
            return true;
        }
        match (&a.name.old_name, &b.name.old_name) {
            (None, Some(old)) => a_full.starts_with(old.as_str()) || a_full.ends_with(old.as_str()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GeoLevel, Name};

    fn item(level: GeoLevel, name: Name, parent: Option<ParentLink>) -> GeoItem {
        GeoItem::new(level, name.clone(), name, parent)
    }

    fn plain(name: &str) -> Name {
        Name::new(name, None)
    }

    #[test]
    fn same_parents_requires_matching_level() {
        let engine = Engine::new();
        let a = item(GeoLevel::City, plain("Місто"), None);
        let b = item(GeoLevel::Raion, plain("Місто"), None);
        assert!(!engine.same_parents(&a, &b));
        assert!(engine.same_parents(&a, &a.clone()));
    }

    #[test]
    fn same_parents_compares_parents_through_registry() {
        let mut engine = Engine::new();
        engine
            .add(GeoRecord::new(1, item(GeoLevel::Region, plain("Обл"), None)))
            .unwrap();

        let raw_parent = ParentLink::Raw(Box::new(item(GeoLevel::Region, plain("Обл"), None)));
        let a = item(GeoLevel::City, plain("Місто"), Some(raw_parent));
        let b = item(GeoLevel::City, plain("Місто"), Some(ParentLink::Id(1)));
        assert!(engine.same_parents(&a, &b));

        let other = ParentLink::Raw(Box::new(item(GeoLevel::Region, plain("Інша"), None)));
        let c = item(GeoLevel::City, plain("Місто"), Some(other));
        assert!(!engine.same_parents(&c, &b));
    }

    #[test]
    fn old_name_rule_is_directional() {
        let engine = Engine::new();
        // b carries a former name that a's plain name ends with
        let a = item(GeoLevel::City, plain("Дніпропетровськ"), None);
        let b = item(
            GeoLevel::City,
            Name::new("Дніпро", Some("Дніпропетровськ")),
            None,
        );
        assert!(engine.same_parents(&a, &b));
        // the other direction does not hold
        assert!(!engine.same_parents(&b, &a));
    }

    #[test]
    fn synthetic_ids_count_down_from_minus_one() {
        let mut engine = Engine::new();
        let parent = ParentLink::Raw(Box::new(item(GeoLevel::Region, plain("А"), None)));
        engine
            .add(GeoRecord::new(
                1,
                item(GeoLevel::City, plain("Б"), Some(parent)),
            ))
            .unwrap();
        let parent = ParentLink::Raw(Box::new(item(GeoLevel::Region, plain("В"), None)));
        engine
            .add(GeoRecord::new(
                2,
                item(GeoLevel::City, plain("Г"), Some(parent)),
            ))
            .unwrap();

        assert!(engine.registry().contains(-1));
        assert!(engine.registry().contains(-2));
        assert_eq!(engine.stats().synthesized, 2);
    }
}
