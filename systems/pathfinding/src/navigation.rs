//! Breadth-first distance field used by the pathfinder.

use std::collections::VecDeque;

use beverage_bandits_core::CellCoord;
use beverage_bandits_world::query::GridView;

/// Distance recorded for cells the search never reached.
const UNREACHABLE: u32 = u32::MAX;

/// Dense step-count grid seeded from a single origin cell.
///
/// The field mirrors the grid's dimensions and stores breadth-first search
/// results over open cells. Distances default to [`UNREACHABLE`] so callers
/// can distinguish walls and occupied cells from traversable ones.
#[derive(Clone, Debug, Default)]
pub(crate) struct DistanceField {
    width: u32,
    height: u32,
    distances: Vec<u32>,
}

impl DistanceField {
    /// Rebuilds the distances outward from `origin`.
    ///
    /// The origin itself is always traversable, even when a unit stands on
    /// it; every other cell must be open.
    pub(crate) fn rebuild_from(&mut self, grid: GridView<'_>, origin: CellCoord) {
        let (width, height) = grid.dimensions();
        let width_usize = usize::try_from(width).unwrap_or(0);
        let height_usize = usize::try_from(height).unwrap_or(0);
        let cell_count = width_usize.checked_mul(height_usize).unwrap_or(0);

        self.width = width;
        self.height = height;

        if cell_count == 0 {
            self.distances.clear();
            return;
        }

        if self.distances.len() != cell_count {
            self.distances = vec![UNREACHABLE; cell_count];
        } else {
            self.distances.fill(UNREACHABLE);
        }

        let Some(origin_index) = grid.index(origin) else {
            return;
        };
        self.distances[origin_index] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(origin);

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = grid.index(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for neighbor in grid.neighbors(cell) {
                if !grid.is_open(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = grid.index(neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Distance captured for the provided cell, or `None` when unreachable
    /// or outside the field.
    #[must_use]
    pub(crate) fn distance(&self, cell: CellCoord) -> Option<u32> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let offset = row.checked_mul(width)?.checked_add(column)?;
        self.distances
            .get(offset)
            .copied()
            .filter(|distance| *distance != UNREACHABLE)
    }
}
