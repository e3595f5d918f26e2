// crates/geokey-core/src/loader/export.rs

//! # CSV export
//!
//! Synthetic (negative) ids leave the process renumbered into a positive
//! band that starts above the next hundred past the largest dataset id,
//! so human-assigned ids survive a round-trip untouched. Rows are emitted
//! parents-first, which keeps re-import reconciliation from materializing
//! duplicates.

use std::collections::HashMap;
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};

use crate::engine::Engine;
use crate::error::Result;
use crate::loader::CsvFlavor;
use crate::model::{GeoItem, ParentLink, LEVEL_SEP};
use crate::registry::Registry;

/// Map every synthetic id to its exported positive id: `-k` becomes
/// `base + k` where `base = ceil(max_id / 100) * 100` over dataset ids.
pub fn renumber_synthetic_ids(registry: &Registry) -> HashMap<i64, i64> {
    let max_id = registry
        .iter()
        .map(|rec| rec.id)
        .filter(|id| *id > 0)
        .max()
        .unwrap_or(0);
    let base = (max_id + 99).div_euclid(100) * 100;

    registry
        .iter()
        .filter(|rec| rec.is_synthetic())
        .map(|rec| (rec.id, base - rec.id))
        .collect()
}

impl Engine {
    pub fn export_csv(&self, path: impl AsRef<Path>, flavor: CsvFlavor) -> Result<()> {
        let renumbered = renumber_synthetic_ids(self.registry());
        let public_id = |id: i64| renumbered.get(&id).copied().unwrap_or(id);

        // parents before children, then by exported id
        let mut ids = self.registry().sorted_ids();
        ids.sort_by_key(|id| (self.lineage(*id).len(), public_id(*id)));

        let mut writer = WriterBuilder::new()
            .escape(b'\\')
            .double_quote(false)
            .quote_style(QuoteStyle::NonNumeric)
            .from_path(path.as_ref())?;

        match flavor {
            CsvFlavor::Denormalized => {
                writer.write_record(["geo_id", "geo_type", "name", "name_uk"])?;
                for id in ids {
                    let chain = self.lineage(id);
                    let Some((record, _)) = chain.split_last() else {
                        continue;
                    };
                    writer.write_record([
                        public_id(id).to_string(),
                        record.item.level.to_string(),
                        joined_names(&chain, |item| item.fullname()),
                        joined_names(&chain, |item| item.fullname_uk()),
                    ])?;
                }
            }
            CsvFlavor::Tree => {
                writer.write_record(["geo_id", "geo_parent_id", "geo_type", "name", "name_uk"])?;
                for id in ids {
                    let Some(record) = self.registry().get(id) else {
                        continue;
                    };
                    let parent_id = match &record.item.parent {
                        Some(ParentLink::Id(parent_id)) => public_id(*parent_id).to_string(),
                        _ => String::new(),
                    };
                    writer.write_record([
                        public_id(id).to_string(),
                        parent_id,
                        record.item.level.to_string(),
                        record.item.fullname(),
                        record.item.fullname_uk(),
                    ])?;
                }
            }
        }
        writer.flush()?;
        tracing::info!(?flavor, "export finished");
        Ok(())
    }
}

fn joined_names(
    chain: &[&crate::registry::GeoRecord],
    render: fn(&GeoItem) -> String,
) -> String {
    chain
        .iter()
        .map(|rec| render(&rec.item))
        .collect::<Vec<_>>()
        .join(LEVEL_SEP)
}
