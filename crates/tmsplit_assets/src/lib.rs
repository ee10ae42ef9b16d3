//! # `tmsplit_assets`
//!
//! Map model, layer data codec and source decoders for `tmsplit`.
//!
//! This is the bottom layer: it knows how a Tiled map looks in memory and
//! how to get one from disk, but nothing about chunking.
//!
//! - [`assets`]: the [`Tilemap`](assets::Tilemap) model (layers, objects,
//!   tilesets, typed properties) with Tiled JSON field names on the wire
//! - [`codec`]: base64 little-endian GID packing
//! - [`loaders`]: JSON and TMX decoders
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tmsplit_assets::prelude::*;
//!
//! let map = decode_file(Path::new("maps/overworld.tmx"), None)?;
//! for (name, layer) in map.tile_layers() {
//!     println!("{name}: {} tiles", layer.decode_gids()?.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assets;
pub mod codec;
pub mod loaders;

pub mod prelude {
    //! Common imports for `tmsplit_assets` users.

    pub use crate::assets::{
        Layer, LayerKind, Object, ObjectGroup, Properties, PropertyValue, TileLayer, Tilemap,
        Tileset,
    };
    pub use crate::codec::CodecError;
    pub use crate::loaders::{DecodeError, SourceFormat, decode_file, decode_json, decode_tmx};
}
