//! Dense terrain and occupancy storage for the battle grid.

use beverage_bandits_core::{CellCoord, Tile, UnitId};

/// Static tiles plus the live position → unit mapping.
///
/// The grid is the sole owner of occupancy. Cells hold unit identifiers that
/// index into the world's roster, so clones never alias another world.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
    occupancy: Vec<Option<UnitId>>,
}

impl Grid {
    pub(crate) fn new(columns: u32, rows: u32, tiles: Vec<Tile>) -> Self {
        let occupancy = vec![None; tiles.len()];
        Self {
            columns,
            rows,
            tiles,
            occupancy,
        }
    }

    pub(crate) fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<UnitId> {
        self.index(cell)
            .and_then(|index| self.occupancy.get(index).copied().flatten())
    }

    /// In bounds, floor, and unoccupied.
    pub(crate) fn is_open(&self, cell: CellCoord) -> bool {
        self.tile(cell).is_some_and(Tile::is_floor) && self.occupant(cell).is_none()
    }

    pub(crate) fn occupy(&mut self, unit: UnitId, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.occupancy.get_mut(index) {
                *slot = Some(unit);
            }
        }
    }

    pub(crate) fn vacate(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.occupancy.get_mut(index) {
                *slot = None;
            }
        }
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }
}
