//! Level Files
//!
//! Levels are plain-text property lists, one entry per line:
//!
//! ```text
//! Height=5
//! Width=7
//! 0,0=0
//! 1,1=1
//! 6,3=2
//! ```
//!
//! Each `x,y=code` line places one object code on a cell. `Height=` and
//! `Width=` lines are accepted but ignored; the actual dimensions are taken
//! from the largest coordinates present, so a file can't claim an extent its
//! cells don't back up. Lines without `=` are skipped.

use std::collections::BTreeMap;
use std::num::ParseIntError;

use thiserror::Error;

use crate::game::grid::{ConfigError, Grid};

/// A level file the parser rejects.
#[derive(Debug, Error)]
pub enum LevelError {
    /// A cell key is not an `x,y` pair
    #[error("malformed coordinate pair {text:?} on line {line}")]
    BadCoordinate {
        /// One-based line number
        line: usize,
        /// The offending key text
        text: String,
    },
    /// A coordinate or code is not an integer
    #[error("bad number {text:?} on line {line}: {source}")]
    BadNumber {
        /// One-based line number
        line: usize,
        /// The offending number text
        text: String,
        /// The underlying parse failure
        source: ParseIntError,
    },
    /// A coordinate is below zero
    #[error("negative coordinate on line {line}")]
    NegativeCoordinate {
        /// One-based line number
        line: usize,
    },
    /// The file places no cells at all
    #[error("level file has no cells")]
    Empty,
    /// The layout parsed but the grid rejected it
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A parsed level: dimensions plus the sparse cell-to-code layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelData {
    /// Columns, from the largest x seen plus one
    pub width: i32,
    /// Rows, from the largest y seen plus one
    pub height: i32,
    /// Object code per occupied cell
    pub objects: BTreeMap<(i32, i32), u8>,
}

impl LevelData {
    /// Parse level text. Dimensions come from the largest coordinates seen.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let mut objects = BTreeMap::new();
        let mut max_x = -1i32;
        let mut max_y = -1i32;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            let Some((left, right)) = trimmed.split_once('=') else {
                continue;
            };
            // Declared dimensions are advisory only
            if left.eq_ignore_ascii_case("height") || left.eq_ignore_ascii_case("width") {
                continue;
            }
            let Some((x_text, y_text)) = left.split_once(',') else {
                return Err(LevelError::BadCoordinate {
                    line,
                    text: left.to_string(),
                });
            };
            let x = parse_number(x_text.trim(), line)?;
            let y = parse_number(y_text.trim(), line)?;
            if x < 0 || y < 0 {
                return Err(LevelError::NegativeCoordinate { line });
            }
            let code = right.trim().parse::<u8>().map_err(|source| {
                LevelError::BadNumber {
                    line,
                    text: right.trim().to_string(),
                    source,
                }
            })?;
            objects.insert((x, y), code);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        if objects.is_empty() {
            return Err(LevelError::Empty);
        }
        Ok(Self {
            width: max_x + 1,
            height: max_y + 1,
            objects,
        })
    }

    /// Instantiate the playable grid for this level, decoration included.
    pub fn build_grid(&self, level: u32, seed: u64) -> Result<Grid, LevelError> {
        Ok(Grid::generate(
            self.width,
            self.height,
            &self.objects,
            level,
            seed,
        )?)
    }
}

fn parse_number(text: &str, line: usize) -> Result<i32, LevelError> {
    text.parse::<i32>().map_err(|source| LevelError::BadNumber {
        line,
        text: text.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_level() {
        let data = LevelData::parse(
            "Height=4\n\
             Width=3\n\
             0,0=1\n\
             2,0=2\n\
             1,3=0\n",
        )
        .unwrap();
        assert_eq!(data.width, 3);
        assert_eq!(data.height, 4);
        assert_eq!(data.objects.get(&(0, 0)), Some(&1));
        assert_eq!(data.objects.get(&(2, 0)), Some(&2));
    }

    #[test]
    fn test_dimensions_from_coordinates_not_header() {
        // The header lies; the cells decide
        let data = LevelData::parse("Height=99\nWidth=99\n4,2=0\n").unwrap();
        assert_eq!(data.width, 5);
        assert_eq!(data.height, 3);
    }

    #[test]
    fn test_lines_without_equals_are_skipped() {
        let data = LevelData::parse("# comment\n\n0,0=1\n").unwrap();
        assert_eq!(data.objects.len(), 1);
    }

    #[test]
    fn test_malformed_lines_error() {
        assert!(matches!(
            LevelData::parse("0=1\n"),
            Err(LevelError::BadCoordinate { line: 1, .. })
        ));
        assert!(matches!(
            LevelData::parse("a,b=1\n"),
            Err(LevelError::BadNumber { line: 1, .. })
        ));
        assert!(matches!(
            LevelData::parse("0,0=lots\n"),
            Err(LevelError::BadNumber { line: 1, .. })
        ));
        assert!(matches!(LevelData::parse(""), Err(LevelError::Empty)));
    }

    #[test]
    fn test_build_grid_rejects_unknown_codes() {
        let data = LevelData::parse("0,0=1\n1,0=77\n").unwrap();
        assert!(matches!(
            data.build_grid(1, 0),
            Err(LevelError::Config(ConfigError::UnknownObjectCode {
                code: 77,
                ..
            }))
        ));
    }
}
