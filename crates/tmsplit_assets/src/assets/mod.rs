//! In-memory map model.

pub mod layer;
pub mod map;
pub mod object;
pub mod properties;
pub mod tileset;

pub use layer::{
    Compression, DrawOrder, Encoding, GroupLayer, ImageLayer, Layer, LayerKind, ObjectGroup,
    TileData, TileLayer,
};
pub use map::{FormatVersion, ModelError, Orientation, RenderOrder, Tilemap};
pub use object::{Object, Point};
pub use properties::{Properties, Property, PropertyKind, PropertyValue};
pub use tileset::{Frame, TileDefinition, Tileset};

fn default_true() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

fn default_one() -> f64 {
    1.0
}

fn is_one(value: &f64) -> bool {
    *value == 1.0
}
