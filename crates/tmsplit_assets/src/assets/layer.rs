//! Map layers.
//!
//! A [`Layer`] is a common header (id, name, visibility, offsets, properties)
//! plus one of four closed [`LayerKind`] variants, tagged on the wire by the
//! Tiled `type` string.

use serde::{Deserialize, Serialize};

use super::object::Object;
use super::properties::Properties;
use crate::codec::{self, CodecError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    #[serde(default)]
    pub id: u32,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,

    #[serde(default = "super::default_true")]
    pub visible: bool,

    #[serde(default, skip_serializing_if = "super::is_false")]
    pub locked: bool,

    #[serde(default = "default_opacity")]
    pub opacity: f64,

    #[serde(rename = "offsetx", default, skip_serializing_if = "super::is_zero")]
    pub offset_x: f64,

    #[serde(rename = "offsety", default, skip_serializing_if = "super::is_zero")]
    pub offset_y: f64,

    /// Scroll factor relative to the camera; 1.0 scrolls with the map.
    #[serde(
        rename = "parallaxx",
        default = "super::default_one",
        skip_serializing_if = "super::is_one"
    )]
    pub parallax_x: f64,

    #[serde(
        rename = "parallaxy",
        default = "super::default_one",
        skip_serializing_if = "super::is_one"
    )]
    pub parallax_y: f64,

    /// `#AARRGGBB` color multiplied into the layer.
    #[serde(rename = "tintcolor", default, skip_serializing_if = "Option::is_none")]
    pub tint_color: Option<String>,

    #[serde(default)]
    pub x: i32,

    #[serde(default)]
    pub y: i32,

    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,

    #[serde(flatten)]
    pub kind: LayerKind,
}

fn default_opacity() -> f64 {
    1.0
}

impl Layer {
    /// Create a visible, fully opaque layer with the given content.
    pub fn new(id: u32, name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            id,
            name: name.into(),
            class: String::new(),
            visible: true,
            locked: false,
            opacity: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            parallax_x: 1.0,
            parallax_y: 1.0,
            tint_color: None,
            x: 0,
            y: 0,
            properties: Properties::new(),
            kind,
        }
    }

    pub fn as_tile_layer(&self) -> Option<&TileLayer> {
        match &self.kind {
            LayerKind::TileLayer(tiles) => Some(tiles),
            _ => None,
        }
    }

    pub fn as_object_group(&self) -> Option<&ObjectGroup> {
        match &self.kind {
            LayerKind::ObjectGroup(group) => Some(group),
            _ => None,
        }
    }

    /// Depth-first walk over this layer and every layer nested in it.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Layer)) {
        visit(self);
        if let LayerKind::Group(group) = &self.kind {
            for child in &group.layers {
                child.walk(visit);
            }
        }
    }
}

/// Layer content, tagged by Tiled's `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerKind {
    #[serde(rename = "tilelayer")]
    TileLayer(TileLayer),
    #[serde(rename = "objectgroup")]
    ObjectGroup(ObjectGroup),
    #[serde(rename = "imagelayer")]
    ImageLayer(ImageLayer),
    #[serde(rename = "group")]
    Group(GroupLayer),
}

impl LayerKind {
    /// Tiled's name for this kind of layer.
    pub fn type_name(&self) -> &'static str {
        match self {
            LayerKind::TileLayer(_) => "tilelayer",
            LayerKind::ObjectGroup(_) => "objectgroup",
            LayerKind::ImageLayer(_) => "imagelayer",
            LayerKind::Group(_) => "group",
        }
    }
}

/// A grid of GIDs stored in packed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    #[serde(rename = "width")]
    pub width_in_tiles: u32,

    #[serde(rename = "height")]
    pub height_in_tiles: u32,

    pub data: TileData,

    #[serde(default)]
    pub encoding: Encoding,

    #[serde(default, skip_serializing_if = "Compression::is_none")]
    pub compression: Compression,
}

impl TileLayer {
    /// Build a layer from row-major GIDs, packing them with the codec.
    pub fn from_gids(width_in_tiles: u32, height_in_tiles: u32, gids: &[u32]) -> Self {
        Self {
            width_in_tiles,
            height_in_tiles,
            data: TileData::Packed(codec::encode(gids)),
            encoding: Encoding::Base64,
            compression: Compression::None,
        }
    }

    /// Number of GIDs the layer must hold.
    pub fn tile_count(&self) -> usize {
        self.width_in_tiles as usize * self.height_in_tiles as usize
    }

    /// Decode the layer and check it holds exactly `width * height` GIDs.
    pub fn decode_gids(&self) -> Result<Vec<u32>, CodecError> {
        let gids = codec::decode_layer(self)?;
        if gids.len() != self.tile_count() {
            return Err(CodecError::LengthMismatch {
                expected: self.tile_count(),
                actual: gids.len(),
            });
        }
        Ok(gids)
    }
}

/// Layer payload as found in the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TileData {
    /// Encoded text block (the only form the codec accepts).
    Packed(String),
    /// Plain list of GIDs, as written with `csv` encoding in JSON maps.
    Plain(Vec<u32>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Csv,
    Base64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    #[serde(rename = "")]
    None,
    Zlib,
    Gzip,
    Zstd,
}

impl Compression {
    pub fn is_none(&self) -> bool {
        *self == Compression::None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectGroup {
    #[serde(rename = "draworder", default)]
    pub draw_order: DrawOrder,

    #[serde(default)]
    pub objects: Vec<Object>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawOrder {
    #[default]
    TopDown,
    Index,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageLayer {
    #[serde(default)]
    pub image: String,

    #[serde(rename = "transparentcolor", default, skip_serializing_if = "Option::is_none")]
    pub transparent_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupLayer {
    #[serde(default)]
    pub layers: Vec<Layer>,
}
