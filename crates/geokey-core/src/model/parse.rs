// crates/geokey-core/src/model/parse.rs

//! Denormalized-name parsing: one string per language carrying the whole
//! ancestor chain, outermost level first, segments joined by `", "`.

use crate::error::{GeoError, Result};
use crate::model::{GeoItem, GeoLevel, Name, ParentLink};

/// Separator between hierarchy levels inside one language string.
pub const LEVEL_SEP: &str = ", ";

/// Suffix that marks a raion name in either language.
const RAION_KEYWORD: &str = "район";

/// Split a hierarchical string on top-level `", "` only — a comma inside
/// a parenthesized former name does not start a new level.
pub fn split_levels(raw: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let bytes = raw.as_bytes();

    for (i, c) in raw.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 && bytes.get(i + 1) == Some(&b' ') => {
                out.push(&raw[start..i]);
                start = i + 2;
            }
            _ => {}
        }
    }
    out.push(&raw[start..]);
    out
}

/// Decide the level of every segment from the declared innermost type and
/// the segment count. City and street carry the two ambiguous shapes:
/// an extra segment before a city is a raion, and a four-segment street
/// is under a city when the second segment reads as a raion, else under
/// a district.
fn level_chain(level: GeoLevel, segments: &[&str]) -> Result<Vec<GeoLevel>> {
    use GeoLevel::*;

    let n = segments.len();
    let chain: Vec<GeoLevel> = match (level, n) {
        (Region, 1) => vec![Region],
        (Raion, 2) => vec![Region, Raion],
        (City, 2) => vec![Region, City],
        (City, 3) => vec![Region, Raion, City],
        (District, 3) => vec![Region, City, District],
        (District, 4) => vec![Region, Raion, City, District],
        (MicroDistrict, 3) => vec![Region, City, MicroDistrict],
        (MicroDistrict, 4) => vec![Region, Raion, City, MicroDistrict],
        (Street, 3) => vec![Region, City, Street],
        (Street, 4) if is_raion_segment(segments[1]) => vec![Region, Raion, City, Street],
        (Street, 4) => vec![Region, City, District, Street],
        (Street, 5) => vec![Region, Raion, City, District, Street],
        (Address, 4) => vec![Region, City, Street, Address],
        (Address, 5) if is_raion_segment(segments[1]) => {
            vec![Region, Raion, City, Street, Address]
        }
        (Address, 5) => vec![Region, City, District, Street, Address],
        (Address, 6) => vec![Region, Raion, City, District, Street, Address],
        (level, found) => {
            return Err(GeoError::LevelCount {
                level: level.as_str(),
                found,
                raw: segments.join(LEVEL_SEP),
            })
        }
    };
    Ok(chain)
}

fn is_raion_segment(segment: &str) -> bool {
    Name::parse(segment).name.ends_with(RAION_KEYWORD)
}

/// Parse both language strings in lockstep into the innermost item, with
/// unresolved parent links all the way up to the region.
pub fn parse_hierarchy(level: GeoLevel, name: &str, name_uk: &str) -> Result<GeoItem> {
    let segments = split_levels(name);
    let segments_uk = split_levels(name_uk);

    if segments.len() != segments_uk.len() {
        return Err(GeoError::LanguageMismatch {
            name: name.to_string(),
            name_uk: name_uk.to_string(),
        });
    }

    let chain = level_chain(level, &segments)?;

    let mut parent: Option<ParentLink> = None;
    let mut item: Option<GeoItem> = None;
    for ((level, seg), seg_uk) in chain.into_iter().zip(segments).zip(segments_uk) {
        let next = GeoItem::new(level, Name::parse(seg), Name::parse(seg_uk), parent.take());
        parent = Some(ParentLink::Raw(Box::new(next.clone())));
        item = Some(next);
    }

    // the loop ran at least once: level_chain never returns an empty chain
    Ok(item.expect("non-empty level chain"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_respects_parens() {
        assert_eq!(
            split_levels("Київська область, Київ"),
            vec!["Київська область", "Київ"]
        );
        assert_eq!(
            split_levels("Область, Місто (Старе, Дуже)"),
            vec!["Область", "Місто (Старе, Дуже)"]
        );
    }

    #[test]
    fn region_is_single_segment() {
        let item = parse_hierarchy(GeoLevel::Region, "Kyiv Region", "Київська область").unwrap();
        assert_eq!(item.level, GeoLevel::Region);
        assert_eq!(item.name.name, "Kyiv Region");
        assert_eq!(item.name_uk.name, "Київська область");
        assert!(item.parent.is_none());
    }

    #[test]
    fn city_under_region() {
        let item = parse_hierarchy(
            GeoLevel::City,
            "Kyiv Region, Kyiv",
            "Київська область, Київ",
        )
        .unwrap();
        assert_eq!(item.level, GeoLevel::City);
        assert_eq!(item.name.name, "Kyiv");
        let Some(ParentLink::Raw(parent)) = &item.parent else {
            panic!("expected raw parent");
        };
        assert_eq!(parent.level, GeoLevel::Region);
        assert_eq!(parent.name_uk.name, "Київська область");
        assert!(parent.parent.is_none());
    }

    #[test]
    fn city_under_raion() {
        let item = parse_hierarchy(
            GeoLevel::City,
            "Полтавська область, Полтавський район, Полтава",
            "Полтавська область, Полтавський район, Полтава",
        )
        .unwrap();
        let Some(ParentLink::Raw(raion)) = &item.parent else {
            panic!("expected raw parent");
        };
        assert_eq!(raion.level, GeoLevel::Raion);
        let Some(ParentLink::Raw(region)) = &raion.parent else {
            panic!("expected raw grandparent");
        };
        assert_eq!(region.level, GeoLevel::Region);
    }

    #[test]
    fn street_under_city_by_raion_keyword() {
        let item = parse_hierarchy(
            GeoLevel::Street,
            "Область, Якийсь район, Місто, Вулиця",
            "Область, Якийсь район, Місто, Вулиця",
        )
        .unwrap();
        let Some(ParentLink::Raw(city)) = &item.parent else {
            panic!("expected raw parent");
        };
        assert_eq!(city.level, GeoLevel::City);
    }

    #[test]
    fn street_under_district_without_keyword() {
        let item = parse_hierarchy(
            GeoLevel::Street,
            "Область, Місто, Шевченківський, Вулиця",
            "Область, Місто, Шевченківський, Вулиця",
        )
        .unwrap();
        let Some(ParentLink::Raw(district)) = &item.parent else {
            panic!("expected raw parent");
        };
        assert_eq!(district.level, GeoLevel::District);
    }

    #[test]
    fn address_full_chain() {
        let item = parse_hierarchy(
            GeoLevel::Address,
            "Обл, Якийсь район, Місто, Р-н міста, Вулиця, 12",
            "Обл, Якийсь район, Місто, Р-н міста, Вулиця, 12",
        )
        .unwrap();
        assert_eq!(item.level, GeoLevel::Address);
        let mut levels = Vec::new();
        let mut cursor = Some(&item);
        while let Some(cur) = cursor {
            levels.push(cur.level);
            cursor = match &cur.parent {
                Some(ParentLink::Raw(p)) => Some(p),
                _ => None,
            };
        }
        assert_eq!(
            levels,
            vec![
                GeoLevel::Address,
                GeoLevel::Street,
                GeoLevel::District,
                GeoLevel::City,
                GeoLevel::Raion,
                GeoLevel::Region,
            ]
        );
    }

    #[test]
    fn former_name_with_comma_stays_one_level() {
        let item = parse_hierarchy(
            GeoLevel::City,
            "Область, Місто (Старе, Давнє)",
            "Область, Місто (Старе, Давнє)",
        )
        .unwrap();
        assert_eq!(item.name, Name::new("Місто", Some("Старе, Давнє")));
    }

    #[test]
    fn wrong_level_count_is_error() {
        let err = parse_hierarchy(GeoLevel::Region, "А, Б", "А, Б").unwrap_err();
        assert!(matches!(err, GeoError::LevelCount { found: 2, .. }));

        let err = parse_hierarchy(GeoLevel::City, "Місто", "Місто").unwrap_err();
        assert!(matches!(err, GeoError::LevelCount { found: 1, .. }));
    }

    #[test]
    fn language_mismatch_is_error() {
        let err = parse_hierarchy(GeoLevel::City, "Область, Місто", "Місто").unwrap_err();
        assert!(matches!(err, GeoError::LanguageMismatch { .. }));
    }
}
