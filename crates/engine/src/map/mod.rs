mod parse;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use parse::{parse_blocked_tiles, MapParseError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub column: i32,
    pub row: i32,
}

impl GridPos {
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileType {
    pub index: u32,
    pub walkable: bool,
    pub atlas_column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({column}, {row}) is outside the {width}x{height} grid")]
    OutOfBounds {
        column: i32,
        row: i32,
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapGrid {
    tileset_key: String,
    tile_width: u32,
    tile_height: u32,
    width: u32,
    height: u32,
    cells: Vec<u32>,
    tileset: Vec<TileType>,
}

impl MapGrid {
    pub fn tileset_key(&self) -> &str {
        &self.tileset_key
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_count(&self) -> u32 {
        self.tileset.len() as u32
    }

    pub fn tileset(&self) -> &[TileType] {
        &self.tileset
    }

    pub fn tile_type(&self, index: u32) -> Option<&TileType> {
        self.tileset.get(index as usize)
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.column >= 0
            && pos.row >= 0
            && (pos.column as u32) < self.width
            && (pos.row as u32) < self.height
    }

    pub fn tile_at(&self, pos: GridPos) -> Result<u32, GridError> {
        let index = self.index_of(pos)?;
        Ok(self.cells[index])
    }

    pub fn is_walkable(&self, pos: GridPos) -> Result<bool, GridError> {
        let tile = self.tile_at(pos)?;
        Ok(self.tileset[tile as usize].walkable)
    }

    pub fn apply_blocked_tiles<I>(&mut self, indices: I) -> usize
    where
        I: IntoIterator<Item = i64>,
    {
        let tile_count = self.tileset.len();
        let mut applied = 0;
        for index in indices {
            let Some(tile) = usize::try_from(index)
                .ok()
                .and_then(|slot| self.tileset.get_mut(slot))
            else {
                debug!(index, tile_count, "blocked_tile_ignored");
                continue;
            };
            tile.walkable = false;
            applied += 1;
        }
        applied
    }

    pub fn cells(&self) -> impl Iterator<Item = (GridPos, &TileType)> + '_ {
        let width = self.width.max(1) as usize;
        self.cells.iter().enumerate().map(move |(index, tile)| {
            let pos = GridPos::new((index % width) as i32, (index / width) as i32);
            (pos, &self.tileset[*tile as usize])
        })
    }

    fn index_of(&self, pos: GridPos) -> Result<usize, GridError> {
        if !self.contains(pos) {
            return Err(GridError::OutOfBounds {
                column: pos.column,
                row: pos.row,
                width: self.width,
                height: self.height,
            });
        }
        Ok(pos.row as usize * self.width as usize + pos.column as usize)
    }
}
