//! Tilesets referenced by a map.

use serde::{Deserialize, Serialize};

use super::properties::Properties;

/// A tileset embedded in (or resolved into) a map.
///
/// Identity is by [`name`](Self::name): two chunks that carry a tileset
/// with the same name refer to the same spritesheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tileset {
    /// GID of the first tile in this tileset.
    #[serde(rename = "firstgid", default)]
    pub first_gid: u32,

    /// Empty for an unresolved external reference.
    #[serde(default)]
    pub name: String,

    #[serde(rename = "tilewidth", default)]
    pub tile_width: u32,

    #[serde(rename = "tileheight", default)]
    pub tile_height: u32,

    /// Path of the backing spritesheet, relative to the map.
    #[serde(default)]
    pub image: String,

    #[serde(rename = "imagewidth", default)]
    pub image_width: u32,

    #[serde(rename = "imageheight", default)]
    pub image_height: u32,

    #[serde(default)]
    pub columns: u32,

    #[serde(rename = "tilecount", default)]
    pub tile_count: u32,

    #[serde(default)]
    pub margin: u32,

    #[serde(default)]
    pub spacing: u32,

    /// External tileset file, when the tileset was not embedded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiles: Vec<TileDefinition>,
}

impl Tileset {
    /// A reference to a tileset file that has not been loaded yet.
    pub fn is_external(&self) -> bool {
        self.source.is_some() && self.name.is_empty()
    }
}

/// Per-tile metadata inside a tileset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileDefinition {
    /// Local tile id (GID minus the tileset's first GID).
    pub id: u32,

    #[serde(rename = "type", alias = "class", default, skip_serializing_if = "String::is_empty")]
    pub tile_type: String,

    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub animation: Vec<Frame>,
}

/// One frame of a tile animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(rename = "tileid")]
    pub tile_id: u32,
    /// Milliseconds.
    pub duration: u32,
}
