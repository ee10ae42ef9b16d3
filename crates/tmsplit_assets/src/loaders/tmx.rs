//! Tiled XML (`.tmx`) decoder.
//!
//! Parsing is delegated to the `tiled` crate, which resolves external
//! tilesets and every TMX data encoding. The parsed map is then converted
//! into the model with tile layers re-packed by the codec, so the rest of
//! the pipeline only ever sees the base64 form.

use std::path::Path;

use tiled::{LayerType, ObjectShape};

use crate::assets::{
    GroupLayer, ImageLayer, Layer, LayerKind, Object, ObjectGroup, Orientation, Point, Properties,
    PropertyValue, TileLayer, Tilemap, Tileset,
};
use crate::codec::{FLIPPED_DIAGONALLY, FLIPPED_HORIZONTALLY, FLIPPED_VERTICALLY};
use crate::loaders::DecodeError;

/// Load and convert a TMX map from disk.
pub fn decode_tmx(path: impl AsRef<Path>) -> Result<Tilemap, DecodeError> {
    let path = path.as_ref();
    let mut loader = tiled::Loader::new();
    let source = loader.load_tmx_map(path)?;

    if source.infinite() {
        return Err(DecodeError::InfiniteMap);
    }

    let map_dir = path.parent().unwrap_or_else(|| Path::new(""));

    // tiled does not expose first GIDs, so rebuild them from tile counts
    let mut first_gids = Vec::with_capacity(source.tilesets().len());
    let mut tilesets = Vec::with_capacity(source.tilesets().len());
    let mut next_gid = 1u32;
    for tileset in source.tilesets() {
        first_gids.push(next_gid);
        tilesets.push(convert_tileset(tileset, next_gid, map_dir));
        next_gid += tileset.tilecount;
    }

    let context = ConvertContext {
        first_gids: &first_gids,
        map_dir,
    };
    let layers = source
        .layers()
        .map(|layer| convert_layer(&layer, &context))
        .collect::<Result<Vec<_>, _>>()?;

    let mut map = Tilemap::new(
        source.width,
        source.height,
        source.tile_width,
        source.tile_height,
    );
    map.orientation = match source.orientation {
        tiled::Orientation::Orthogonal => Orientation::Orthogonal,
        tiled::Orientation::Isometric => Orientation::Isometric,
        tiled::Orientation::Staggered => Orientation::Staggered,
        tiled::Orientation::Hexagonal => Orientation::Hexagonal,
    };
    map.background_color = source.background_color.map(color_to_hex);
    map.class = source.user_type.clone().unwrap_or_default();
    map.properties = convert_properties(&source.properties);
    map.next_layer_id = max_layer_id(&layers) + 1;
    map.next_object_id = max_object_id(&layers) + 1;
    map.layers = layers;
    map.tilesets = tilesets;

    tracing::debug!(
        "decoded TMX map {}: {}x{} tiles, {} layer(s), {} tileset(s)",
        path.display(),
        map.width_in_tiles,
        map.height_in_tiles,
        map.layers.len(),
        map.tilesets.len()
    );

    Ok(map)
}

/// Load an external `.tsx` tileset referenced by a map in `map_dir`.
pub(super) fn decode_tsx(path: &Path, first_gid: u32, map_dir: &Path) -> Result<Tileset, DecodeError> {
    let tileset = tiled::Loader::new().load_tsx_tileset(path)?;
    Ok(convert_tileset(&tileset, first_gid, map_dir))
}

struct ConvertContext<'a> {
    first_gids: &'a [u32],
    map_dir: &'a Path,
}

fn convert_tileset(tileset: &tiled::Tileset, first_gid: u32, map_dir: &Path) -> Tileset {
    let (image, image_width, image_height) = match &tileset.image {
        Some(image) => (
            relative_path(&image.source, map_dir),
            u32::try_from(image.width).unwrap_or(0),
            u32::try_from(image.height).unwrap_or(0),
        ),
        None => (String::new(), 0, 0),
    };

    Tileset {
        first_gid,
        name: tileset.name.clone(),
        tile_width: tileset.tile_width,
        tile_height: tileset.tile_height,
        image,
        image_width,
        image_height,
        columns: tileset.columns,
        tile_count: tileset.tilecount,
        margin: tileset.margin,
        spacing: tileset.spacing,
        source: None,
        properties: convert_properties(&tileset.properties),
        tiles: Vec::new(),
    }
}

fn convert_layer(layer: &tiled::Layer, context: &ConvertContext) -> Result<Layer, DecodeError> {
    let kind = match layer.layer_type() {
        LayerType::Tiles(tiles) => LayerKind::TileLayer(convert_tiles(&tiles, layer, context)?),
        LayerType::Objects(objects) => LayerKind::ObjectGroup(ObjectGroup {
            objects: objects.objects().map(|o| convert_object(&o)).collect(),
            ..Default::default()
        }),
        LayerType::Image(image_layer) => LayerKind::ImageLayer(ImageLayer {
            image: image_layer
                .image
                .as_ref()
                .map(|image| relative_path(&image.source, context.map_dir))
                .unwrap_or_default(),
            transparent_color: image_layer
                .image
                .as_ref()
                .and_then(|image| image.transparent_colour)
                .map(color_to_hex),
        }),
        LayerType::Group(group) => LayerKind::Group(GroupLayer {
            layers: group
                .layers()
                .map(|child| convert_layer(&child, context))
                .collect::<Result<Vec<_>, _>>()?,
        }),
    };

    let mut converted = Layer::new(layer.id(), layer.name.clone(), kind);
    converted.visible = layer.visible;
    converted.opacity = f64::from(layer.opacity);
    converted.offset_x = f64::from(layer.offset_x);
    converted.offset_y = f64::from(layer.offset_y);
    converted.parallax_x = f64::from(layer.parallax_x);
    converted.parallax_y = f64::from(layer.parallax_y);
    converted.tint_color = layer.tint_color.map(color_to_hex);
    converted.class = layer.user_type.clone().unwrap_or_default();
    converted.properties = convert_properties(&layer.properties);
    Ok(converted)
}

fn convert_tiles(
    tiles: &tiled::TileLayer,
    layer: &tiled::Layer,
    context: &ConvertContext,
) -> Result<TileLayer, DecodeError> {
    let (Some(width), Some(height)) = (tiles.width(), tiles.height()) else {
        return Err(DecodeError::InfiniteLayer(layer.name.clone()));
    };

    let mut gids = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let gid = match tiles.get_tile(x, y) {
                Some(tile) => {
                    let Some(first_gid) = context.first_gids.get(tile.tileset_index()) else {
                        return Err(DecodeError::UnknownTileset {
                            layer: layer.name.clone(),
                            index: tile.tileset_index(),
                        });
                    };
                    let mut gid = first_gid + tile.id();
                    if tile.flip_h {
                        gid |= FLIPPED_HORIZONTALLY;
                    }
                    if tile.flip_v {
                        gid |= FLIPPED_VERTICALLY;
                    }
                    if tile.flip_d {
                        gid |= FLIPPED_DIAGONALLY;
                    }
                    gid
                }
                None => 0,
            };
            gids.push(gid);
        }
    }

    Ok(TileLayer::from_gids(width, height, &gids))
}

fn convert_object(object: &tiled::ObjectData) -> Object {
    let mut converted = Object {
        id: object.id(),
        name: object.name.clone(),
        object_type: object.user_type.clone(),
        x: f64::from(object.x),
        y: f64::from(object.y),
        rotation: f64::from(object.rotation),
        visible: object.visible,
        properties: convert_properties(&object.properties),
        ..Default::default()
    };

    let to_points = |points: &[(f32, f32)]| {
        points
            .iter()
            .map(|(x, y)| Point {
                x: f64::from(*x),
                y: f64::from(*y),
            })
            .collect::<Vec<_>>()
    };

    match &object.shape {
        ObjectShape::Rect { width, height } => {
            converted.width = f64::from(*width);
            converted.height = f64::from(*height);
        }
        ObjectShape::Ellipse { width, height } => {
            converted.width = f64::from(*width);
            converted.height = f64::from(*height);
            converted.ellipse = true;
        }
        ObjectShape::Polyline { points } => converted.polyline = Some(to_points(points)),
        ObjectShape::Polygon { points } => converted.polygon = Some(to_points(points)),
        ObjectShape::Point(_, _) => converted.point = true,
        ObjectShape::Text { .. } => {
            tracing::debug!("text object {} kept without its text content", object.id());
        }
    }

    converted
}

/// Convert `tiled` properties, sorted by name so output is stable.
fn convert_properties(properties: &tiled::Properties) -> Properties {
    let mut names: Vec<&String> = properties.keys().collect();
    names.sort();

    let mut converted = Properties::new();
    for name in names {
        converted.push(name.clone(), convert_property_value(&properties[name]));
    }
    converted
}

fn convert_property_value(value: &tiled::PropertyValue) -> PropertyValue {
    match value {
        tiled::PropertyValue::BoolValue(b) => PropertyValue::Bool(*b),
        tiled::PropertyValue::FloatValue(f) => PropertyValue::Float(f64::from(*f)),
        tiled::PropertyValue::IntValue(i) => PropertyValue::Int(i64::from(*i)),
        tiled::PropertyValue::ColorValue(c) => PropertyValue::Color(color_to_hex(*c)),
        tiled::PropertyValue::StringValue(s) => PropertyValue::String(s.clone()),
        tiled::PropertyValue::FileValue(s) => PropertyValue::File(s.clone()),
        tiled::PropertyValue::ObjectValue(id) => PropertyValue::Object(*id),
        tiled::PropertyValue::ClassValue {
            property_type,
            properties,
        } => {
            let mut members = serde_json::Map::new();
            for (name, member) in properties {
                members.insert(name.clone(), property_to_json(member));
            }
            PropertyValue::Class {
                property_type: property_type.clone(),
                members,
            }
        }
    }
}

fn property_to_json(value: &tiled::PropertyValue) -> serde_json::Value {
    use serde_json::Value;

    match value {
        tiled::PropertyValue::BoolValue(b) => Value::Bool(*b),
        tiled::PropertyValue::FloatValue(f) => Value::from(f64::from(*f)),
        tiled::PropertyValue::IntValue(i) => Value::from(*i),
        tiled::PropertyValue::ColorValue(c) => Value::String(color_to_hex(*c)),
        tiled::PropertyValue::StringValue(s) | tiled::PropertyValue::FileValue(s) => {
            Value::String(s.clone())
        }
        tiled::PropertyValue::ObjectValue(id) => Value::from(*id),
        tiled::PropertyValue::ClassValue { properties, .. } => Value::Object(
            properties
                .iter()
                .map(|(name, member)| (name.clone(), property_to_json(member)))
                .collect(),
        ),
    }
}

/// Tiled's `#AARRGGBB` notation.
fn color_to_hex(color: tiled::Color) -> String {
    format!(
        "#{:02x}{:02x}{:02x}{:02x}",
        color.alpha, color.red, color.green, color.blue
    )
}

/// Express a path `tiled` resolved against the map directory relative to it again.
fn relative_path(path: &Path, map_dir: &Path) -> String {
    path.strip_prefix(map_dir)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn max_layer_id(layers: &[Layer]) -> u32 {
    let mut max = 0;
    for layer in layers {
        layer.walk(&mut |l| max = max.max(l.id));
    }
    max
}

fn max_object_id(layers: &[Layer]) -> u32 {
    let mut max = 0;
    for layer in layers {
        layer.walk(&mut |l| {
            if let Some(group) = l.as_object_group() {
                for object in &group.objects {
                    max = max.max(object.id);
                }
            }
        });
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_hex() {
        let color = tiled::Color {
            red: 255,
            green: 128,
            blue: 64,
            alpha: 255,
        };
        assert_eq!(color_to_hex(color), "#ffff8040");
    }

    #[test]
    fn test_relative_path() {
        let dir = Path::new("assets/maps");
        assert_eq!(
            relative_path(Path::new("assets/maps/../images/a.png"), dir),
            "../images/a.png"
        );
        assert_eq!(relative_path(Path::new("/abs/b.png"), dir), "/abs/b.png");
    }

    #[test]
    fn test_convert_class_property() {
        let mut members = tiled::Properties::new();
        members.insert("mass".to_string(), tiled::PropertyValue::IntValue(3));
        let value = tiled::PropertyValue::ClassValue {
            property_type: "Physics".to_string(),
            properties: members,
        };

        let PropertyValue::Class {
            property_type,
            members,
        } = convert_property_value(&value)
        else {
            panic!("expected class value");
        };
        assert_eq!(property_type, "Physics");
        assert_eq!(members["mass"], serde_json::Value::from(3));
    }

    #[test]
    fn test_decode_missing_file() {
        assert!(matches!(
            decode_tmx("does/not/exist.tmx"),
            Err(DecodeError::Tmx(_))
        ));
    }
}
