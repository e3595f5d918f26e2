// crates/geokey-core/src/loader/mod.rs

//! # CSV import
//!
//! Two flavors share the transport: "denormalized" rows repeat the whole
//! ancestor chain inside the name strings, "tree" rows carry an explicit
//! `geo_parent_id`. The flavor is sniffed from the header line.

mod export;

pub use export::renumber_synthetic_ids;

use std::path::Path;

use csv::StringRecord;

use crate::engine::{Engine, IngestReport};
use crate::error::{GeoError, Result};
use crate::model::{parse_hierarchy, GeoItem, GeoLevel, Name, ParentLink};
use crate::registry::{GeoRecord, Registry};

/// Which CSV layout a file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvFlavor {
    /// `geo_id,geo_type,name,name_uk` — names carry the ancestor chain.
    Denormalized,
    /// `geo_id,geo_parent_id,geo_type,name,name_uk` — explicit parents.
    Tree,
}

impl CsvFlavor {
    pub fn detect(headers: &StringRecord) -> Self {
        if headers.iter().any(|h| h == "geo_parent_id") {
            CsvFlavor::Tree
        } else {
            CsvFlavor::Denormalized
        }
    }
}

fn field<'r>(row: &'r StringRecord, idx: usize) -> Result<&'r str> {
    row.get(idx)
        .ok_or_else(|| GeoError::MalformedRow(format!("missing column {idx}: {row:?}")))
}

fn id_field(row: &StringRecord, idx: usize) -> Result<i64> {
    let raw = field(row, idx)?;
    raw.trim()
        .parse()
        .map_err(|_| GeoError::MalformedRow(format!("bad id `{raw}`: {row:?}")))
}

/// Build a record from a denormalized row; the parent chain comes back
/// unresolved and is reconciled by [`Engine::add`].
pub fn denormalized_record(row: &StringRecord) -> Result<GeoRecord> {
    let geo_id = id_field(row, 0)?;
    let level: GeoLevel = field(row, 1)?.parse()?;
    let item = parse_hierarchy(level, field(row, 2)?, field(row, 3)?)?;
    Ok(GeoRecord::new(geo_id, item))
}

/// Build a record from a tree row. The parent id must already be interned;
/// a dangling reference is a row error.
pub fn tree_record(row: &StringRecord, registry: &Registry) -> Result<GeoRecord> {
    let geo_id = id_field(row, 0)?;
    let parent_raw = field(row, 1)?.trim();
    let level: GeoLevel = field(row, 2)?.parse()?;

    let parent = if parent_raw.is_empty() {
        None
    } else {
        let parent_id: i64 = parent_raw
            .parse()
            .map_err(|_| GeoError::MalformedRow(format!("bad parent id `{parent_raw}`")))?;
        if !registry.contains(parent_id) {
            return Err(GeoError::UnknownParent {
                id: geo_id,
                parent_id,
            });
        }
        Some(ParentLink::Id(parent_id))
    };

    let item = GeoItem::new(
        level,
        Name::parse(field(row, 3)?),
        Name::parse(field(row, 4)?),
        parent,
    );
    Ok(GeoRecord::new(geo_id, item))
}

impl Engine {
    /// Build an engine from a CSV file in either flavor.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut engine = Engine::new();
        engine.ingest_file(path)?;
        Ok(engine)
    }

    /// Stream a CSV file into this engine. Malformed rows are logged and
    /// skipped; collisions and ambiguous duplicates abort.
    pub fn ingest_file(&mut self, path: impl AsRef<Path>) -> Result<IngestReport> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "ingesting csv");
        self.consume(reader_builder().from_path(path)?)
    }

    /// Same as [`Engine::ingest_file`], over any byte stream.
    pub fn ingest_reader<R: std::io::Read>(&mut self, input: R) -> Result<IngestReport> {
        self.consume(reader_builder().from_reader(input))
    }

    fn consume<R: std::io::Read>(&mut self, mut reader: csv::Reader<R>) -> Result<IngestReport> {
        let flavor = CsvFlavor::detect(reader.headers()?);

        let mut report = IngestReport::default();
        for row in reader.records() {
            let outcome = row
                .map_err(|e| GeoError::MalformedRow(e.to_string()))
                .and_then(|row| match flavor {
                    CsvFlavor::Denormalized => denormalized_record(&row),
                    CsvFlavor::Tree => tree_record(&row, self.registry()),
                })
                .and_then(|record| self.add(record));

            match outcome {
                Ok(()) => report.added += 1,
                Err(err) if err.is_row_error() => {
                    tracing::warn!(%err, "skipping row");
                    report.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }
        tracing::info!(
            ?flavor,
            added = report.added,
            skipped = report.skipped,
            records = self.registry().len(),
            "ingest finished"
        );
        Ok(report)
    }
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.escape(Some(b'\\')).double_quote(false);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flavor_detection() {
        let denorm = StringRecord::from(vec!["geo_id", "geo_type", "name", "name_uk"]);
        assert_eq!(CsvFlavor::detect(&denorm), CsvFlavor::Denormalized);

        let tree =
            StringRecord::from(vec!["geo_id", "geo_parent_id", "geo_type", "name", "name_uk"]);
        assert_eq!(CsvFlavor::detect(&tree), CsvFlavor::Tree);
    }

    #[test]
    fn ingest_from_memory() {
        let csv = "\
geo_id,geo_type,name,name_uk
1,region,\"Oblast A\",\"Область А\"
2,city,\"Oblast A, Town B\",\"Область А, Місто Б\"
";
        let mut engine = Engine::new();
        let report = engine.ingest_reader(csv.as_bytes()).unwrap();
        assert_eq!(report.added, 2);
        assert_eq!(engine.registry().len(), 2);
    }

    #[test]
    fn escaped_quotes_survive() {
        let csv = "\
geo_id,geo_type,name,name_uk
1,region,\"Oblast \\\"Quoted\\\"\",\"Область\"
";
        let mut engine = Engine::new();
        engine.ingest_reader(csv.as_bytes()).unwrap();
        let rec = engine.registry().get(1).unwrap();
        assert_eq!(rec.item.name.name, "Oblast \"Quoted\"");
    }
}
