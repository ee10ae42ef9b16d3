//! The splitter: cut a [`Tilemap`] into independent chunk maps.
//!
//! Every tile layer of the source is decoded exactly once up front. Each
//! chunk then gets its own header (tilesets and properties cloned), its own
//! re-packed tile layers and its own translated objects, so no chunk shares
//! data with the source or with a sibling.

use tmsplit_assets::assets::{GroupLayer, Layer, LayerKind, Object, ObjectGroup, TileLayer, Tilemap};
use tracing::{debug, info};

use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::grid::{ChunkGrid, ChunkRect};

/// Output of [`split`]: the grid layout and one map per chunk, row-major.
#[derive(Debug, Clone)]
pub struct SplitMap {
    pub grid: ChunkGrid,
    pub chunks: Vec<Tilemap>,
}

impl SplitMap {
    /// Chunks paired with their rectangle in the source map.
    pub fn iter(&self) -> impl Iterator<Item = (ChunkRect, &Tilemap)> {
        self.grid.rects().zip(&self.chunks)
    }
}

/// Split `map` into chunks of at most `chunk_width x chunk_height` tiles.
///
/// Chunks are produced row-major. Chunks in the last column and row are
/// clamped at the map edge. Objects are kept in the chunk that contains
/// their tile cell and moved into chunk-local pixel space.
///
/// # Errors
///
/// Fails on the first problem found, before any chunk is returned:
/// a zero chunk dimension, a map that does not [validate](Tilemap::validate),
/// a tile layer that cannot be decoded, or (with
/// [`require_tile_layers`](SplitConfig::require_tile_layers)) a map with no
/// tile layers at all.
///
/// # Example
///
/// ```rust
/// use tmsplit_assets::assets::{Layer, LayerKind, TileLayer, Tilemap};
/// use tmsplit_core::{SplitConfig, split};
///
/// let mut map = Tilemap::new(4, 2, 16, 16);
/// map.layers.push(Layer::new(
///     1,
///     "ground",
///     LayerKind::TileLayer(TileLayer::from_gids(4, 2, &[1, 1, 2, 2, 1, 1, 2, 2])),
/// ));
///
/// let split = split(&map, &SplitConfig::new(2, 2))?;
/// assert_eq!(split.chunks.len(), 2);
/// # Ok::<(), tmsplit_core::SplitError>(())
/// ```
pub fn split(map: &Tilemap, config: &SplitConfig) -> Result<SplitMap, SplitError> {
    if config.chunk_width == 0 || config.chunk_height == 0 {
        return Err(SplitError::InvalidChunkSize {
            width: config.chunk_width,
            height: config.chunk_height,
        });
    }

    map.validate()?;

    let decoded = decode_tile_layers(map)?;
    if decoded.is_empty() && config.require_tile_layers {
        return Err(SplitError::EmptyMap);
    }

    report_stray_objects(map);

    let grid = ChunkGrid::new(
        map.width_in_tiles,
        map.height_in_tiles,
        config.chunk_width,
        config.chunk_height,
    );
    info!(
        "Splitting {}x{} map into {} chunk(s) ({} across, {} down) of up to {}x{} tiles",
        map.width_in_tiles,
        map.height_in_tiles,
        grid.len(),
        grid.across,
        grid.down,
        grid.chunk_width,
        grid.chunk_height
    );

    let chunks = grid
        .rects()
        .map(|rect| build_chunk(map, &decoded, &rect))
        .collect();

    Ok(SplitMap { grid, chunks })
}

/// Decode every tile layer in depth-first order.
fn decode_tile_layers(map: &Tilemap) -> Result<Vec<Vec<u32>>, SplitError> {
    map.tile_layers()
        .map(|(name, tiles)| {
            let gids = tiles
                .decode_gids()
                .map_err(|source| SplitError::codec(name, source))?;
            debug!("Decoded tile layer '{}': {} GIDs", name, gids.len());
            Ok(gids)
        })
        .collect()
}

/// Log objects whose tile cell is outside the map; they land in no chunk.
fn report_stray_objects(map: &Tilemap) {
    let bounds = ChunkRect {
        index: 0,
        column: 0,
        row: 0,
        left: 0,
        top: 0,
        width: map.width_in_tiles,
        height: map.height_in_tiles,
    };

    for layer in map.all_layers() {
        let Some(group) = layer.as_object_group() else {
            continue;
        };
        for object in &group.objects {
            let (tile_x, tile_y) = object.tile_position(map.tile_width, map.tile_height);
            if !bounds.contains_tile(tile_x, tile_y) {
                debug!(
                    "Object {} ('{}') in layer '{}' at tile ({}, {}) is outside the map and will be dropped",
                    object.id, object.name, layer.name, tile_x, tile_y
                );
            }
        }
    }
}

/// Chunk-local view of the source map shared by every layer of one chunk.
struct ChunkBuilder<'a> {
    map: &'a Tilemap,
    decoded: &'a [Vec<u32>],
    rect: &'a ChunkRect,
    /// Next entry of `decoded` to consume, in walk order.
    cursor: usize,
    objects: usize,
}

fn build_chunk(map: &Tilemap, decoded: &[Vec<u32>], rect: &ChunkRect) -> Tilemap {
    let mut builder = ChunkBuilder {
        map,
        decoded,
        rect,
        cursor: 0,
        objects: 0,
    };
    let layers = map
        .layers
        .iter()
        .map(|layer| builder.layer(layer))
        .collect();

    debug!(
        "Chunk {} at column {}, row {}: origin ({}, {}), {}x{} tiles, {} object(s)",
        rect.index,
        rect.column,
        rect.row,
        rect.left,
        rect.top,
        rect.width,
        rect.height,
        builder.objects
    );

    Tilemap {
        width_in_tiles: rect.width,
        height_in_tiles: rect.height,
        tile_width: map.tile_width,
        tile_height: map.tile_height,
        infinite: false,
        orientation: map.orientation,
        render_order: map.render_order,
        next_layer_id: map.next_layer_id,
        next_object_id: map.next_object_id,
        background_color: map.background_color.clone(),
        tiled_version: map.tiled_version.clone(),
        version: map.version.clone(),
        map_type: map.map_type.clone(),
        class: map.class.clone(),
        compression_level: map.compression_level,
        parallax_origin_x: map.parallax_origin_x,
        parallax_origin_y: map.parallax_origin_y,
        properties: map.properties.clone(),
        layers,
        tilesets: map.tilesets.clone(),
    }
}

impl ChunkBuilder<'_> {
    fn layer(&mut self, layer: &Layer) -> Layer {
        let kind = match &layer.kind {
            LayerKind::TileLayer(_) => LayerKind::TileLayer(self.tiles()),
            LayerKind::ObjectGroup(group) => LayerKind::ObjectGroup(self.object_group(group)),
            LayerKind::ImageLayer(image) => LayerKind::ImageLayer(image.clone()),
            LayerKind::Group(group) => LayerKind::Group(GroupLayer {
                layers: group.layers.iter().map(|child| self.layer(child)).collect(),
            }),
        };

        Layer {
            id: layer.id,
            name: layer.name.clone(),
            class: layer.class.clone(),
            visible: layer.visible,
            locked: layer.locked,
            opacity: layer.opacity,
            offset_x: layer.offset_x,
            offset_y: layer.offset_y,
            parallax_x: layer.parallax_x,
            parallax_y: layer.parallax_y,
            tint_color: layer.tint_color.clone(),
            x: layer.x,
            y: layer.y,
            properties: layer.properties.clone(),
            kind,
        }
    }

    /// Copy this chunk's rows out of the next decoded layer and re-pack them.
    fn tiles(&mut self) -> TileLayer {
        let source = &self.decoded[self.cursor];
        self.cursor += 1;

        let gids = slice_rows(source, self.map.width_in_tiles, self.rect);
        TileLayer::from_gids(self.rect.width, self.rect.height, &gids)
    }

    fn object_group(&mut self, group: &ObjectGroup) -> ObjectGroup {
        let objects: Vec<Object> = group
            .objects
            .iter()
            .filter(|object| {
                let (tile_x, tile_y) =
                    object.tile_position(self.map.tile_width, self.map.tile_height);
                self.rect.contains_tile(tile_x, tile_y)
            })
            .map(|object| self.to_local(object))
            .collect();
        self.objects += objects.len();

        ObjectGroup {
            draw_order: group.draw_order,
            objects,
        }
    }

    /// Move an object from map pixel space into chunk pixel space.
    fn to_local(&self, object: &Object) -> Object {
        let mut local = object.clone();
        local.x -= f64::from(self.rect.left) * f64::from(self.map.tile_width);
        local.y -= f64::from(self.rect.top) * f64::from(self.map.tile_height);
        local
    }
}

/// Row-major GIDs of `rect`, read from a source grid `map_width` tiles wide.
fn slice_rows(source: &[u32], map_width: u32, rect: &ChunkRect) -> Vec<u32> {
    let width = rect.width as usize;
    let stride = map_width as usize;
    let start = rect.source_offset(map_width);

    let mut gids = Vec::with_capacity(width * rect.height as usize);
    for row in 0..rect.height as usize {
        let from = start + row * stride;
        gids.extend_from_slice(&source[from..from + width]);
    }
    gids
}
