//! Chunk grid arithmetic.
//!
//! Three coordinate scales meet here: pixels, tiles and chunks. A
//! [`ChunkGrid`] covers a map of `width x height` tiles with rectangles of
//! at most `chunk_width x chunk_height` tiles, row-major. The last column
//! and row are clamped at the map edge, so they are narrower/shorter when
//! the map size is not a multiple of the chunk size.

use serde::Serialize;

/// Row-major grid of chunks covering a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkGrid {
    /// Map width in tiles
    pub map_width: u32,
    /// Map height in tiles
    pub map_height: u32,
    /// Nominal chunk width in tiles
    pub chunk_width: u32,
    /// Nominal chunk height in tiles
    pub chunk_height: u32,
    /// Number of chunk columns
    pub across: u32,
    /// Number of chunk rows
    pub down: u32,
}

impl ChunkGrid {
    /// Lay out the grid. Chunk dimensions must be positive.
    ///
    /// Width is always divided by the chunk width and height by the chunk
    /// height. A map smaller than one chunk still gets one chunk.
    pub fn new(map_width: u32, map_height: u32, chunk_width: u32, chunk_height: u32) -> Self {
        debug_assert!(chunk_width > 0 && chunk_height > 0);
        Self {
            map_width,
            map_height,
            chunk_width,
            chunk_height,
            across: map_width.div_ceil(chunk_width).max(1),
            down: map_height.div_ceil(chunk_height).max(1),
        }
    }

    /// Total number of chunks.
    pub fn len(&self) -> usize {
        self.across as usize * self.down as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tile-space rectangle of chunk `index`, or `None` past the end.
    pub fn rect(&self, index: usize) -> Option<ChunkRect> {
        if index >= self.len() {
            return None;
        }

        let column = (index % self.across as usize) as u32;
        let row = (index / self.across as usize) as u32;
        let left = column * self.chunk_width;
        let top = row * self.chunk_height;

        Some(ChunkRect {
            index,
            column,
            row,
            left,
            top,
            width: self.chunk_width.min(self.map_width.saturating_sub(left)),
            height: self.chunk_height.min(self.map_height.saturating_sub(top)),
        })
    }

    /// All chunk rectangles in generation order.
    pub fn rects(&self) -> impl Iterator<Item = ChunkRect> + '_ {
        (0..self.len()).filter_map(|index| self.rect(index))
    }
}

/// One chunk's place in the source map, in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkRect {
    pub index: usize,
    pub column: u32,
    pub row: u32,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl ChunkRect {
    /// Whether a tile cell (which may lie outside the map) is inside this chunk.
    pub fn contains_tile(&self, tile_x: i64, tile_y: i64) -> bool {
        let (left, top) = (i64::from(self.left), i64::from(self.top));
        tile_x >= left
            && tile_x < left + i64::from(self.width)
            && tile_y >= top
            && tile_y < top + i64::from(self.height)
    }

    /// Source-map row-major offset of the chunk's top-left tile.
    pub fn source_offset(&self, map_width: u32) -> usize {
        self.top as usize * map_width as usize + self.left as usize
    }
}
