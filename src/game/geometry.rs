//! Conversion between grid cells and canvas coordinates
//!
//! The canvas unit is one terminal column horizontally and one row
//! vertically, so a square tile is usually two columns wide.

use super::config::GameConfig;
use super::state::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub grid_count: i32,
    pub cell_width: u16,
    pub cell_height: u16,
}

impl Geometry {
    pub fn new(grid_count: i32, cell_width: u16, cell_height: u16) -> Self {
        Self {
            grid_count,
            cell_width,
            cell_height,
        }
    }

    /// Canvas extent covered by the whole grid, if it fits in `u16`
    pub fn pixel_extent(&self) -> Option<(u16, u16)> {
        let n = u16::try_from(self.grid_count.max(0)).ok()?;
        Some((
            n.checked_mul(self.cell_width)?,
            n.checked_mul(self.cell_height)?,
        ))
    }

    /// Canvas extent (width, height) covered by the whole grid, saturating
    /// at `u16::MAX`
    pub fn pixel_size(&self) -> (u16, u16) {
        self.pixel_extent().unwrap_or((u16::MAX, u16::MAX))
    }

    /// Top-left canvas coordinate of an on-grid cell
    pub fn cell_origin(&self, cell: Cell) -> Option<(u16, u16)> {
        let range = 0..self.grid_count;
        if !range.contains(&cell.x) || !range.contains(&cell.y) {
            return None;
        }
        let x = u16::try_from(cell.x).ok()?;
        let y = u16::try_from(cell.y).ok()?;
        Some((
            x.checked_mul(self.cell_width)?,
            y.checked_mul(self.cell_height)?,
        ))
    }

    /// Cell containing a canvas coordinate
    pub fn cell_at(&self, px: u16, py: u16) -> Option<Cell> {
        let (width, height) = self.pixel_size();
        if px >= width || py >= height {
            return None;
        }
        Some(Cell::new(
            i32::from(px / self.cell_width),
            i32::from(py / self.cell_height),
        ))
    }
}

impl From<&GameConfig> for Geometry {
    fn from(config: &GameConfig) -> Self {
        Self::new(config.grid_count, config.cell_width, config.cell_height)
    }
}
