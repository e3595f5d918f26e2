// crates/geokey-core/src/registry.rs

//! Append-only arena of identified records. Registry-by-id is the source
//! of truth for parent links: resolved parents are ids into this map,
//! never pointers.

use std::collections::HashMap;

use crate::error::{GeoError, Result};
use crate::model::{GeoItem, ParentLink};

/// An identified hierarchical unit. Positive ids come from the dataset;
/// negative ids mark parents the engine had to materialize itself.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRecord {
    pub id: i64,
    pub item: GeoItem,
}

impl GeoRecord {
    pub fn new(id: i64, item: GeoItem) -> Self {
        Self { id, item }
    }

    pub fn is_synthetic(&self) -> bool {
        self.id < 0
    }
}

/// Engine-scoped id → record map. Write-once per id, read-many.
#[derive(Debug, Default)]
pub struct Registry {
    records: HashMap<i64, GeoRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&GeoRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut GeoRecord> {
        self.records.get_mut(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.records.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeoRecord> {
        self.records.values()
    }

    /// All ids, ascending. Handy for deterministic output shaping.
    pub fn sorted_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.records.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Intern a record. Re-interning an equal item under the same id is a
    /// no-op; a different item under a taken id is a collision.
    pub fn insert(&mut self, record: GeoRecord) -> Result<i64> {
        if let Some(existing) = self.records.get(&record.id) {
            if self.items_equal(&existing.item, &record.item) {
                return Ok(record.id);
            }
            return Err(GeoError::RegistryCollision { id: record.id });
        }
        let id = record.id;
        self.records.insert(id, record);
        Ok(id)
    }

    // -------------------------------------------------------------------
    // Semantic equality (resolves Id links through the arena)
    // -------------------------------------------------------------------

    /// Items are equal when level and both names match and the parent
    /// chains are equal, comparing resolved and unresolved links by the
    /// underlying item.
    pub fn items_equal(&self, a: &GeoItem, b: &GeoItem) -> bool {
        a.level == b.level
            && a.name == b.name
            && a.name_uk == b.name_uk
            && self.links_equal(a.parent.as_ref(), b.parent.as_ref())
    }

    pub fn links_equal(&self, a: Option<&ParentLink>, b: Option<&ParentLink>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => match (self.resolve(a), self.resolve(b)) {
                (Some(a), Some(b)) => self.items_equal(a, b),
                _ => false,
            },
            _ => false,
        }
    }

    /// View through a link to the underlying item, if it exists.
    pub fn resolve<'a>(&'a self, link: &'a ParentLink) -> Option<&'a GeoItem> {
        match link {
            ParentLink::Raw(item) => Some(item),
            ParentLink::Id(id) => self.get(*id).map(|r| &r.item),
        }
    }
}
