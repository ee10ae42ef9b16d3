//! Objects placed on object group layers.

use serde::{Deserialize, Serialize};

use super::properties::Properties;

/// A vertex of a polygon or polyline, relative to the object's position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A placed object in pixel space.
///
/// `x`/`y` is the object's origin in pixels, relative to whatever map it
/// currently belongs to. After splitting, that is the chunk's top-left corner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub id: u32,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Free-form type tag (e.g. `"spawn"`). Tiled 1.9 writes this as `class`.
    #[serde(rename = "type", alias = "class", default)]
    pub object_type: String,

    pub x: f64,
    pub y: f64,

    #[serde(default)]
    pub width: f64,

    #[serde(default)]
    pub height: f64,

    #[serde(default)]
    pub rotation: f64,

    #[serde(default = "super::default_true")]
    pub visible: bool,

    /// Tile objects reference a tile by GID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gid: Option<u32>,

    #[serde(default, skip_serializing_if = "super::is_false")]
    pub point: bool,

    #[serde(default, skip_serializing_if = "super::is_false")]
    pub ellipse: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<Point>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polyline: Option<Vec<Point>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

impl Object {
    /// The tile cell containing the object's origin.
    ///
    /// Uses floor division so objects sitting left of or above the map
    /// get negative cells instead of being rounded into cell 0.
    pub fn tile_position(&self, tile_width: u32, tile_height: u32) -> (i64, i64) {
        (
            (self.x / f64::from(tile_width)).floor() as i64,
            (self.y / f64::from(tile_height)).floor() as i64,
        )
    }
}
