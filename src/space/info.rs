//! Parser for the space.info text format
//!
//! Whitespace-token format carrying the tile size, the tile palette and the
//! helper groups. A malformed token logs an error and aborts the remaining
//! parse; everything parsed up to that point is kept as-is (no rollback).

use crate::core::error::SpaceError;
use crate::core::types::{TileLocation, TileType};

/// Parsed space description, possibly partial after a malformed token
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpaceInfo {
    /// World units per tile
    pub tile_size: i32,
    /// Tile palette in declaration order; the index is the tile type index
    pub tile_types: Vec<TileType>,
    /// Named helper groups with their grid locations
    pub helper_groups: Vec<(String, Vec<TileLocation>)>,
}

/// Parse the info text, returning partial data plus the first error
pub fn parse_space_info(text: &str) -> (SpaceInfo, Option<SpaceError>) {
    let mut info = SpaceInfo::default();
    let mut tokens = text.split_whitespace();

    while let Some(keyword) = tokens.next() {
        let outcome = match keyword {
            "tileSize" => parse_tile_size(&mut tokens, &mut info),
            "tileTypeCount" => parse_tile_types(&mut tokens, &mut info),
            "helperTypeCount" => parse_helper_groups(&mut tokens, &mut info),
            other => Err(SpaceError::UnrecognizedKeyword(other.to_string())),
        };
        if let Err(error) = outcome {
            tracing::error!("space info parse aborted: {error}");
            return (info, Some(error));
        }
    }

    (info, None)
}

fn expect_eq<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<()> {
    (tokens.next()? == "=").then_some(())
}

fn parse_value<'a, T: std::str::FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Option<T> {
    tokens.next()?.parse().ok()
}

fn parse_tile_size<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    info: &mut SpaceInfo,
) -> Result<(), SpaceError> {
    let invalid = SpaceError::InvalidInfoValue {
        keyword: "tileSize",
    };
    expect_eq(tokens).ok_or(invalid.clone())?;
    info.tile_size = parse_value(tokens).ok_or(invalid)?;
    Ok(())
}

fn parse_tile_types<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    info: &mut SpaceInfo,
) -> Result<(), SpaceError> {
    let invalid = SpaceError::InvalidInfoValue {
        keyword: "tileTypeCount",
    };
    expect_eq(tokens).ok_or(invalid.clone())?;
    let count: u32 = parse_value(tokens).ok_or(invalid)?;
    if count == 0 {
        return Err(SpaceError::EmptyPalette);
    }

    for _ in 0..count {
        let name = tokens
            .next()
            .ok_or_else(|| SpaceError::InvalidTileType {
                name: String::new(),
            })?
            .to_string();
        let fail = SpaceError::InvalidTileType { name: name.clone() };
        expect_eq(tokens).ok_or(fail.clone())?;
        let r: u32 = parse_value(tokens).ok_or(fail.clone())?;
        let g: u32 = parse_value(tokens).ok_or(fail.clone())?;
        let b: u32 = parse_value(tokens).ok_or(fail.clone())?;
        // Options are carried in the file but not consumed by the core
        let _options = tokens.next().ok_or(fail)?;
        info.tile_types.push(TileType::from_rgb(name, r, g, b));
    }
    Ok(())
}

fn parse_helper_groups<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    info: &mut SpaceInfo,
) -> Result<(), SpaceError> {
    let invalid = SpaceError::InvalidInfoValue {
        keyword: "helperTypeCount",
    };
    expect_eq(tokens).ok_or(invalid.clone())?;
    let type_count: u32 = parse_value(tokens).ok_or(invalid)?;

    for _ in 0..type_count {
        let name = tokens
            .next()
            .ok_or_else(|| SpaceError::InvalidHelperType {
                name: String::new(),
            })?
            .to_string();
        let fail = SpaceError::InvalidHelperType { name: name.clone() };
        expect_eq(tokens).ok_or(fail.clone())?;
        let helper_count: u32 = parse_value(tokens).ok_or(fail)?;

        let mut locations = Vec::with_capacity(helper_count as usize);
        for index in 0..helper_count as usize {
            let fail = SpaceError::InvalidHelper {
                name: name.clone(),
                index,
            };
            let _options = tokens.next().ok_or(fail.clone())?;
            let h: i32 = parse_value(tokens).ok_or(fail.clone())?;
            let v: i32 = parse_value(tokens).ok_or(fail)?;
            locations.push(TileLocation::new(h, v));
        }
        info.helper_groups.push((name, locations));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_INFO: &str = "\
tileSize = 40
tileTypeCount = 2
sand = 255 230 140 -
grass = 0 160 0 walkable
helperTypeCount = 2
castle = 1
- 4 4
spawn = 2
- 0 0
- 8 8
";

    #[test]
    fn test_parses_complete_info() {
        let (info, error) = parse_space_info(FULL_INFO);
        assert_eq!(error, None);
        assert_eq!(info.tile_size, 40);
        assert_eq!(
            info.tile_types,
            vec![
                TileType::from_rgb("sand", 255, 230, 140),
                TileType::from_rgb("grass", 0, 160, 0),
            ]
        );
        assert_eq!(info.helper_groups.len(), 2);
        assert_eq!(
            info.helper_groups[0],
            ("castle".to_string(), vec![TileLocation::new(4, 4)])
        );
        assert_eq!(
            info.helper_groups[1].1,
            vec![TileLocation::new(0, 0), TileLocation::new(8, 8)]
        );
    }

    #[test]
    fn test_malformed_tile_size_aborts() {
        let (info, error) = parse_space_info("tileSize = forty\ntileTypeCount = 1\ns = 1 2 3 -");
        assert_eq!(
            error,
            Some(SpaceError::InvalidInfoValue {
                keyword: "tileSize"
            })
        );
        // Nothing after the malformed token is parsed
        assert_eq!(info.tile_size, 0);
        assert!(info.tile_types.is_empty());
    }

    #[test]
    fn test_prefix_is_retained_after_bad_tile_type() {
        let text = "tileSize = 20\ntileTypeCount = 2\nsand = 255 230 140 -\ngrass = 0 oops";
        let (info, error) = parse_space_info(text);
        assert_eq!(
            error,
            Some(SpaceError::InvalidTileType {
                name: "grass".to_string()
            })
        );
        assert_eq!(info.tile_size, 20);
        assert_eq!(info.tile_types.len(), 1);
        assert_eq!(info.tile_types[0].name, "sand");
    }

    #[test]
    fn test_zero_tile_types_is_an_error() {
        let (info, error) = parse_space_info("tileTypeCount = 0");
        assert_eq!(error, Some(SpaceError::EmptyPalette));
        assert!(info.tile_types.is_empty());
    }

    #[test]
    fn test_unrecognized_keyword_aborts() {
        let (info, error) = parse_space_info("tileSize = 10\nwibble = 3");
        assert_eq!(
            error,
            Some(SpaceError::UnrecognizedKeyword("wibble".to_string()))
        );
        assert_eq!(info.tile_size, 10);
    }

    #[test]
    fn test_failed_helper_group_keeps_earlier_groups() {
        let text = "\
helperTypeCount = 2
castle = 1
- 4 4
spawn = 1
- 0 oops
";
        let (info, error) = parse_space_info(text);
        assert_eq!(
            error,
            Some(SpaceError::InvalidHelper {
                name: "spawn".to_string(),
                index: 0
            })
        );
        assert_eq!(info.helper_groups.len(), 1);
        assert_eq!(info.helper_groups[0].0, "castle");
    }
}
