//! Parsing of the textual battle layout.

use std::str::FromStr;

use beverage_bandits_core::{CellCoord, Faction, Tile};
use thiserror::Error;

/// Errors raised while loading a layout. No world is produced on failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The input contained no rows, or its first row was empty.
    #[error("layout contains no cells")]
    Empty,
    /// A row's length differs from the first row's length.
    #[error("row {row} has {found} cells but the layout is {expected} cells wide")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A character is neither floor, wall, nor a faction symbol.
    #[error("unknown symbol {symbol:?} at column {column}, row {row}")]
    UnknownSymbol {
        /// The unrecognised character.
        symbol: char,
        /// Zero-based column of the character.
        column: usize,
        /// Zero-based row of the character.
        row: usize,
    },
    /// The layout does not fit the engine's coordinate range.
    #[error("layout dimensions exceed the supported coordinate range")]
    TooLarge,
}

/// Validated starting layout from which any number of worlds can be built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
    spawns: Vec<Spawn>,
}

/// Unit placement captured from the layout text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawn {
    /// Cell the unit starts on.
    pub cell: CellCoord,
    /// Faction of the unit.
    pub faction: Faction,
}

impl Layout {
    /// Parses a rectangular block of text, one line per row.
    ///
    /// A single trailing newline is accepted; blank lines anywhere are
    /// reported as ragged rows.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut lines = text.lines().enumerate().peekable();
        let expected = match lines.peek() {
            Some((_, line)) => line.chars().count(),
            None => return Err(LayoutError::Empty),
        };
        if expected == 0 {
            return Err(LayoutError::Empty);
        }

        let mut tiles = Vec::new();
        let mut spawns = Vec::new();
        let mut rows = 0;

        for (row, line) in lines {
            let found = line.chars().count();
            if found != expected {
                return Err(LayoutError::RaggedRow {
                    row,
                    expected,
                    found,
                });
            }

            let row_index = u32::try_from(row).map_err(|_| LayoutError::TooLarge)?;
            for (column, symbol) in line.chars().enumerate() {
                let tile = Tile::from_symbol(symbol).ok_or(LayoutError::UnknownSymbol {
                    symbol,
                    column,
                    row,
                })?;
                tiles.push(tile);

                if let Some(faction) = Faction::from_symbol(symbol) {
                    let column_index =
                        u32::try_from(column).map_err(|_| LayoutError::TooLarge)?;
                    spawns.push(Spawn {
                        cell: CellCoord::new(column_index, row_index),
                        faction,
                    });
                }
            }
            rows = row_index + 1;
        }

        Ok(Self {
            columns: u32::try_from(expected).map_err(|_| LayoutError::TooLarge)?,
            rows,
            tiles,
            spawns,
        })
    }

    /// Number of columns in the layout.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the layout.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Static tiles stored in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Unit placements in reading order.
    #[must_use]
    pub fn spawns(&self) -> &[Spawn] {
        &self.spawns
    }
}

impl FromStr for Layout {
    type Err = LayoutError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}
