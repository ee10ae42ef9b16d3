use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::layer::{Layer, LayerKind, TileLayer};
use super::properties::Properties;
use super::tileset::Tileset;

/// A finite, orthogonal-grid tile map.
///
/// Mirrors the Tiled JSON map document field-for-field, so a [`Tilemap`]
/// produced for a chunk can be written out and opened again by any Tiled
/// JSON reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tilemap {
    #[serde(rename = "width")]
    pub width_in_tiles: u32,

    #[serde(rename = "height")]
    pub height_in_tiles: u32,

    /// Pixel width of one tile
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,

    /// Pixel height of one tile
    #[serde(rename = "tileheight")]
    pub tile_height: u32,

    #[serde(default)]
    pub infinite: bool,

    #[serde(default)]
    pub orientation: Orientation,

    #[serde(rename = "renderorder", default)]
    pub render_order: RenderOrder,

    #[serde(rename = "nextlayerid", default)]
    pub next_layer_id: u32,

    #[serde(rename = "nextobjectid", default)]
    pub next_object_id: u32,

    #[serde(rename = "backgroundcolor", default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    #[serde(rename = "tiledversion", default, skip_serializing_if = "Option::is_none")]
    pub tiled_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<FormatVersion>,

    #[serde(rename = "type", default = "default_map_type")]
    pub map_type: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,

    #[serde(
        rename = "compressionlevel",
        default = "default_compression_level",
        skip_serializing_if = "is_default_compression_level"
    )]
    pub compression_level: i32,

    /// Pixel origin that layer parallax is computed against.
    #[serde(rename = "parallaxoriginx", default, skip_serializing_if = "super::is_zero")]
    pub parallax_origin_x: f64,

    #[serde(rename = "parallaxoriginy", default, skip_serializing_if = "super::is_zero")]
    pub parallax_origin_y: f64,

    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,

    #[serde(default)]
    pub layers: Vec<Layer>,

    #[serde(default)]
    pub tilesets: Vec<Tileset>,
}

fn default_map_type() -> String {
    "map".to_string()
}

fn default_compression_level() -> i32 {
    -1
}

fn is_default_compression_level(level: &i32) -> bool {
    *level == -1
}

impl Tilemap {
    /// Create an empty orthogonal map.
    pub fn new(width_in_tiles: u32, height_in_tiles: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            width_in_tiles,
            height_in_tiles,
            tile_width,
            tile_height,
            infinite: false,
            orientation: Orientation::default(),
            render_order: RenderOrder::default(),
            next_layer_id: 1,
            next_object_id: 1,
            background_color: None,
            tiled_version: None,
            version: None,
            map_type: default_map_type(),
            class: String::new(),
            compression_level: default_compression_level(),
            parallax_origin_x: 0.0,
            parallax_origin_y: 0.0,
            properties: Properties::new(),
            layers: Vec::new(),
            tilesets: Vec::new(),
        }
    }

    /// Number of tiles in the whole map.
    pub fn tile_count(&self) -> usize {
        self.width_in_tiles as usize * self.height_in_tiles as usize
    }

    /// Depth-first iterator over every layer, descending into groups.
    pub fn all_layers(&self) -> Vec<&Layer> {
        let mut layers = Vec::new();
        for layer in &self.layers {
            layer.walk(&mut |l| layers.push(l));
        }
        layers
    }

    /// Every tile layer in depth-first order, with its name.
    pub fn tile_layers(&self) -> impl Iterator<Item = (&str, &TileLayer)> {
        self.all_layers()
            .into_iter()
            .filter_map(|layer| match &layer.kind {
                LayerKind::TileLayer(tiles) => Some((layer.name.as_str(), tiles)),
                _ => None,
            })
    }

    /// Look up a tileset by name.
    pub fn tileset(&self, name: &str) -> Option<&Tileset> {
        self.tilesets.iter().find(|ts| ts.name == name)
    }

    /// Check the structural invariants the splitter relies on.
    ///
    /// Does not decode layer data; see [`TileLayer::decode_gids`] for the
    /// length check on the decoded grid.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.infinite {
            return Err(ModelError::Infinite);
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(ModelError::InvalidTileSize {
                width: self.tile_width,
                height: self.tile_height,
            });
        }
        for (name, tiles) in self.tile_layers() {
            if tiles.width_in_tiles != self.width_in_tiles
                || tiles.height_in_tiles != self.height_in_tiles
            {
                return Err(ModelError::LayerSize {
                    layer: name.to_string(),
                    width: tiles.width_in_tiles,
                    height: tiles.height_in_tiles,
                    map_width: self.width_in_tiles,
                    map_height: self.height_in_tiles,
                });
            }
        }
        Ok(())
    }
}

/// Structural problems with a [`Tilemap`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("infinite maps are not supported")]
    Infinite,

    #[error("invalid tile size {width}x{height}: both dimensions must be positive")]
    InvalidTileSize { width: u32, height: u32 },

    #[error(
        "tile layer '{layer}' is {width}x{height} tiles but the map is {map_width}x{map_height}"
    )]
    LayerSize {
        layer: String,
        width: u32,
        height: u32,
        map_width: u32,
        map_height: u32,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Orthogonal,
    Isometric,
    Staggered,
    Hexagonal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderOrder {
    #[default]
    RightDown,
    RightUp,
    LeftDown,
    LeftUp,
}

/// Map format version. Tiled wrote a number before 1.6 and a string since.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormatVersion {
    Text(String),
    Number(f64),
}
