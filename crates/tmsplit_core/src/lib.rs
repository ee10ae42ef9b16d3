//! # `tmsplit_core`
//!
//! Cuts a decoded [`Tilemap`](tmsplit_assets::assets::Tilemap) into a grid
//! of smaller, independently loadable chunk maps and builds the master
//! index that ties them back together.
//!
//! ## Flow
//!
//! 1. [`split`] lays out a [`ChunkGrid`], decodes each tile layer once,
//!    and produces one fully independent chunk map per grid cell
//!    (row-major). Objects move into the chunk containing their tile cell,
//!    in chunk-local pixels.
//! 2. [`build_master_index`] walks the chunks in order, deduplicates
//!    tilesets by name, places every chunk in tile space and resolves the
//!    spawn point back into map-global pixels.
//!
//! Both steps take their configuration explicitly and fail fast: either
//! every chunk and the index are produced, or an error is returned.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tmsplit_assets::prelude::*;
//! use tmsplit_core::prelude::*;
//!
//! let map = decode_file(Path::new("maps/overworld.json"), None)?;
//! let split = split(&map, &SplitConfig::new(50, 50))?;
//! let index = build_master_index(
//!     &split.chunks,
//!     "overworld.json",
//!     split.grid.across,
//!     &MasterIndexConfig::default(),
//! )?;
//! assert_eq!(index.tilemaps.len(), split.chunks.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod master;
pub mod split;

pub use config::{MasterIndexConfig, SplitConfig};
pub use error::{MasterIndexError, SplitError};
pub use grid::{ChunkGrid, ChunkRect};
pub use master::{ChunkEntry, MasterIndex, Spawn, TilesetEntry, build_master_index};
pub use split::{SplitMap, split};

pub mod prelude {
    //! Common imports for `tmsplit_core` users.

    pub use crate::{
        ChunkGrid, MasterIndex, MasterIndexConfig, MasterIndexError, SplitConfig, SplitError,
        SplitMap, build_master_index, split,
    };
}
