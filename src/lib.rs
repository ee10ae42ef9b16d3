//! # tmsplit
//!
//! Split large Tiled maps into a grid of small, independently loadable
//! chunk maps, plus a master index telling a game where each chunk goes,
//! which spritesheets to load and where the player spawns.
//!
//! This is a meta-crate that combines the `tmsplit_*` sub-crates behind one
//! prelude.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::path::Path;
//! use tmsplit::prelude::*;
//!
//! let map = decode_file(Path::new("maps/overworld.tmx"), None)?;
//! let split = split(&map, &SplitConfig::new(64, 64))?;
//! let index = build_master_index(
//!     &split.chunks,
//!     "overworld.tmx",
//!     split.grid.across,
//!     &MasterIndexConfig::default(),
//! )?;
//!
//! write_typescript(
//!     File::create("overworld-master.ts")?,
//!     &index,
//!     &TypescriptOptions::default(),
//! )?;
//! for (chunk, name) in split.chunks.iter().zip(index.chunk_file_names()) {
//!     write_chunk_json(File::create(name)?, chunk, false)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Features
//!
//! - **default**: includes `format`
//! - **format**: TypeScript and JSON writers for the master index and chunks
//!
//! ## Architecture
//!
//! - **Layer 1** ([`assets`]): map model, tile layer codec, JSON/TMX decoders
//! - **Layer 2** ([`core`]): chunk grid, splitter, master index builder
//! - **Layer 3** (optional, [`format`]): output writers

// Re-export sub-crates for advanced usage
pub use tmsplit_assets as assets;
pub use tmsplit_core as core;

#[cfg(feature = "format")]
pub use tmsplit_format as format;

/// Unified prelude for tmsplit
pub mod prelude {
    pub use crate::assets::prelude::*;
    pub use crate::core::prelude::*;

    #[cfg(feature = "format")]
    pub use crate::format::prelude::*;
}
