// crates/geokey-core/src/model/item.rs

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::model::Name;

/// The seven administrative levels, decreasing area top to bottom.
/// A closed enum plus the static parent table below replaces the
/// dynamic type dispatch a looser language would reach for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoLevel {
    Region,
    Raion,
    City,
    District,
    MicroDistrict,
    Street,
    Address,
}

/// Admissible parent levels, largest area first.
/// City and street are the two genuinely ambiguous rows; the parser
/// settles them by segment count and the raion keyword (see `parse`).
pub const PARENT_RULES: [(GeoLevel, &[GeoLevel]); 7] = [
    (GeoLevel::Region, &[]),
    (GeoLevel::Raion, &[GeoLevel::Region]),
    (GeoLevel::City, &[GeoLevel::Region, GeoLevel::Raion]),
    (GeoLevel::District, &[GeoLevel::City]),
    (GeoLevel::MicroDistrict, &[GeoLevel::City]),
    (GeoLevel::Street, &[GeoLevel::City, GeoLevel::District]),
    (GeoLevel::Address, &[GeoLevel::Street]),
];

impl GeoLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoLevel::Region => "region",
            GeoLevel::Raion => "raion",
            GeoLevel::City => "city",
            GeoLevel::District => "district",
            GeoLevel::MicroDistrict => "microdistrict",
            GeoLevel::Street => "street",
            GeoLevel::Address => "address",
        }
    }

    /// Levels a parent of this type may have.
    pub fn parent_levels(&self) -> &'static [GeoLevel] {
        PARENT_RULES
            .iter()
            .find(|(level, _)| level == self)
            .map(|(_, parents)| *parents)
            .unwrap_or(&[])
    }
}

impl FromStr for GeoLevel {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "region" => Ok(GeoLevel::Region),
            "raion" => Ok(GeoLevel::Raion),
            "city" => Ok(GeoLevel::City),
            "district" => Ok(GeoLevel::District),
            "microdistrict" => Ok(GeoLevel::MicroDistrict),
            "street" => Ok(GeoLevel::Street),
            "address" => Ok(GeoLevel::Address),
            other => Err(GeoError::UnknownGeoType(other.to_string())),
        }
    }
}

impl std::fmt::Display for GeoLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parent link of an item: either a freshly parsed ancestor that the
/// engine has not reconciled yet, or a stable id into the registry.
/// Ingest rewrites `Raw` to `Id` in place and never the other way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentLink {
    Raw(Box<GeoItem>),
    Id(i64),
}

/// One hierarchical unit with its bilingual names and parent chain.
///
/// The derived `PartialEq` compares links structurally; semantic equality
/// that resolves `Id` links through the registry lives on
/// [`crate::registry::Registry::items_equal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoItem {
    pub level: GeoLevel,
    pub name: Name,
    pub name_uk: Name,
    pub parent: Option<ParentLink>,
}

impl GeoItem {
    pub fn new(level: GeoLevel, name: Name, name_uk: Name, parent: Option<ParentLink>) -> Self {
        Self {
            level,
            name,
            name_uk,
            parent,
        }
    }

    /// An item with no parent (a region, or a bare test fixture).
    pub fn root(level: GeoLevel, name: Name, name_uk: Name) -> Self {
        Self::new(level, name, name_uk, None)
    }

    /// Both language names, primary first.
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        std::iter::once(&self.name).chain(std::iter::once(&self.name_uk))
    }

    /// Rendered primary name, the string reconciliation matches on.
    pub fn fullname(&self) -> String {
        self.name.render()
    }

    /// Rendered secondary-language name.
    pub fn fullname_uk(&self) -> String {
        self.name_uk.render()
    }
}
