//! The master index: one manifest describing every chunk, every distinct
//! tileset and where play begins.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tmsplit_assets::assets::{Object, Tilemap, Tileset};
use tracing::{debug, info};

use crate::config::MasterIndexConfig;
use crate::error::MasterIndexError;

/// Consolidated manifest for a split map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterIndex {
    /// Resolved spawn point, in map-global pixels.
    pub spawn: Spawn,
    /// One entry per distinct tileset name, in first-appearance order.
    pub tilesets: Vec<TilesetEntry>,
    /// One entry per chunk, in generation order.
    pub tilemaps: Vec<ChunkEntry>,
}

impl MasterIndex {
    /// File names of the chunk maps, in the same order as [`tilemaps`](Self::tilemaps).
    pub fn chunk_file_names(&self) -> impl Iterator<Item = &str> {
        self.tilemaps.iter().map(|entry| entry.url.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    pub x: f64,
    pub y: f64,
}

/// A spritesheet the game must load, keyed by tileset name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilesetEntry {
    pub spritesheet_key: String,
    /// File name of the backing image, without its directory.
    pub spritesheet_url: String,
    pub frame_width: u32,
    pub frame_height: u32,
    pub tileset_key: String,
}

impl TilesetEntry {
    pub fn from_tileset(tileset: &Tileset) -> Self {
        Self {
            spritesheet_key: format!("spritesheet-{}", tileset.name),
            spritesheet_url: image_file_name(&tileset.image),
            frame_width: tileset.tile_width,
            frame_height: tileset.tile_height,
            tileset_key: tileset.name.clone(),
        }
    }
}

/// Where one chunk sits in the overall map, in tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkEntry {
    /// `{base}-{index}`
    pub key: String,
    /// `{base}-{index}.{ext}`
    pub url: String,
    pub tile_x: u32,
    pub tile_y: u32,
    pub width_in_tiles: u32,
    pub height_in_tiles: u32,
}

/// Build the master index for a row-major sequence of chunks.
///
/// `source_base_name` is the source map's file name; any extension is
/// stripped before deriving chunk keys. `chunks_across` is the number of
/// grid columns.
///
/// Chunk placement is the sum of the widths of the chunks to the left in
/// the same row and the heights of the chunks above in the same column, so
/// a short last column or row does not shift anything.
///
/// The spawn point is the first object of type
/// [`spawn_object_type`](MasterIndexConfig::spawn_object_type), unless a
/// later one carries the [`primary_property`](MasterIndexConfig::primary_property);
/// the last such primary wins. Without any spawn object it is `(0, 0)`.
///
/// # Errors
///
/// [`MasterIndexError::InvalidGrid`] when `chunks_across` is zero or does
/// not evenly divide the number of chunks.
pub fn build_master_index(
    chunks: &[Tilemap],
    source_base_name: &str,
    chunks_across: u32,
    config: &MasterIndexConfig,
) -> Result<MasterIndex, MasterIndexError> {
    let across = chunks_across as usize;
    if across == 0 || chunks.len() % across != 0 {
        return Err(MasterIndexError::InvalidGrid {
            chunks: chunks.len(),
            across: chunks_across,
        });
    }

    let base = strip_extension(source_base_name);
    let mut tilesets: Vec<TilesetEntry> = Vec::new();
    let mut tilemaps: Vec<ChunkEntry> = Vec::with_capacity(chunks.len());
    let mut spawn = SpawnSearch::new(config);

    for (index, chunk) in chunks.iter().enumerate() {
        for tileset in &chunk.tilesets {
            if !tilesets.iter().any(|entry| entry.tileset_key == tileset.name) {
                debug!("Registering tileset '{}' from chunk {}", tileset.name, index);
                tilesets.push(TilesetEntry::from_tileset(tileset));
            }
        }

        let (column, row) = (index % across, index / across);
        let tile_x = (0..column)
            .map(|c| chunks[row * across + c].width_in_tiles)
            .sum();
        let tile_y = (0..row)
            .map(|r| chunks[r * across + column].height_in_tiles)
            .sum();

        let entry = ChunkEntry {
            key: format!("{base}-{index}"),
            url: format!("{base}-{index}.{}", config.chunk_file_extension),
            tile_x,
            tile_y,
            width_in_tiles: chunk.width_in_tiles,
            height_in_tiles: chunk.height_in_tiles,
        };

        for layer in chunk.all_layers() {
            if let Some(group) = layer.as_object_group() {
                for object in &group.objects {
                    spawn.visit(object, chunk, &entry);
                }
            }
        }

        tilemaps.push(entry);
    }

    let spawn = spawn.resolve();
    info!(
        "Master index: {} chunk(s), {} tileset(s), spawn at ({}, {})",
        tilemaps.len(),
        tilesets.len(),
        spawn.x,
        spawn.y
    );

    Ok(MasterIndex {
        spawn,
        tilesets,
        tilemaps,
    })
}

struct SpawnSearch<'a> {
    config: &'a MasterIndexConfig,
    candidate: Option<Spawn>,
}

impl<'a> SpawnSearch<'a> {
    fn new(config: &'a MasterIndexConfig) -> Self {
        Self {
            config,
            candidate: None,
        }
    }

    fn visit(&mut self, object: &Object, chunk: &Tilemap, entry: &ChunkEntry) {
        if object.object_type != self.config.spawn_object_type {
            return;
        }

        let (name, value) = &self.config.primary_property;
        let primary = object.properties.has_string(name, value);
        if self.candidate.is_some() && !primary {
            return;
        }

        let global = Spawn {
            x: object.x + f64::from(entry.tile_x) * f64::from(chunk.tile_width),
            y: object.y + f64::from(entry.tile_y) * f64::from(chunk.tile_height),
        };
        debug!(
            "Spawn candidate object {} in {} at ({}, {}){}",
            object.id,
            entry.key,
            global.x,
            global.y,
            if primary { " (primary)" } else { "" }
        );
        self.candidate = Some(global);
    }

    fn resolve(self) -> Spawn {
        self.candidate.unwrap_or_default()
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot > 0 && !name[dot..].contains(['/', '\\']) => &name[..dot],
        _ => name,
    }
}

fn image_file_name(image: &str) -> String {
    Path::new(image)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmsplit_assets::assets::{Layer, LayerKind, ObjectGroup, PropertyValue};

    fn tileset(name: &str, image: &str) -> Tileset {
        Tileset {
            first_gid: 1,
            name: name.to_string(),
            tile_width: 32,
            tile_height: 16,
            image: image.to_string(),
            ..Default::default()
        }
    }

    fn chunk(width: u32, height: u32, tilesets: &[Tileset], objects: Vec<Object>) -> Tilemap {
        let mut map = Tilemap::new(width, height, 32, 32);
        map.tilesets = tilesets.to_vec();
        map.layers.push(Layer::new(
            1,
            "objects",
            LayerKind::ObjectGroup(ObjectGroup {
                objects,
                ..Default::default()
            }),
        ));
        map
    }

    fn spawn(id: u32, x: f64, y: f64, primary: bool) -> Object {
        let mut object = Object {
            id,
            object_type: "spawn".to_string(),
            x,
            y,
            ..Default::default()
        };
        if primary {
            object
                .properties
                .push("type", PropertyValue::String("primary".to_string()));
        }
        object
    }

    fn build(chunks: &[Tilemap], across: u32) -> MasterIndex {
        build_master_index(chunks, "level.json", across, &MasterIndexConfig::default()).unwrap()
    }

    #[test]
    fn test_chunk_entries() {
        let chunks = vec![
            chunk(2, 2, &[], Vec::new()),
            chunk(1, 2, &[], Vec::new()),
            chunk(2, 1, &[], Vec::new()),
            chunk(1, 1, &[], Vec::new()),
        ];
        let index = build(&chunks, 2);

        let placements: Vec<(u32, u32, u32, u32)> = index
            .tilemaps
            .iter()
            .map(|e| (e.tile_x, e.tile_y, e.width_in_tiles, e.height_in_tiles))
            .collect();
        assert_eq!(
            placements,
            vec![(0, 0, 2, 2), (2, 0, 1, 2), (0, 2, 2, 1), (2, 2, 1, 1)]
        );
        assert_eq!(index.tilemaps[3].key, "level-3");
        assert_eq!(index.tilemaps[3].url, "level-3.json");
    }

    #[test]
    fn test_placement_after_short_column() {
        // 5 wide by 2-tile chunks: columns are 2, 2, 1 tiles wide
        let chunks = vec![
            chunk(2, 2, &[], Vec::new()),
            chunk(2, 2, &[], Vec::new()),
            chunk(1, 2, &[], Vec::new()),
        ];
        let index = build(&chunks, 3);
        let xs: Vec<u32> = index.tilemaps.iter().map(|e| e.tile_x).collect();
        assert_eq!(xs, vec![0, 2, 4]);
    }

    #[test]
    fn test_tilesets_deduplicated_in_order() {
        let terrain = tileset("terrain", "../art/terrain.png");
        let props = tileset("props", "props.png");
        let chunks = vec![
            chunk(2, 2, &[terrain.clone()], Vec::new()),
            chunk(2, 2, &[props.clone(), terrain.clone()], Vec::new()),
            chunk(2, 2, &[terrain, props], Vec::new()),
        ];
        let index = build(&chunks, 3);

        let keys: Vec<&str> = index.tilesets.iter().map(|t| t.tileset_key.as_str()).collect();
        assert_eq!(keys, vec!["terrain", "props"]);
        assert_eq!(
            index.tilesets[0],
            TilesetEntry {
                spritesheet_key: "spritesheet-terrain".to_string(),
                spritesheet_url: "terrain.png".to_string(),
                frame_width: 32,
                frame_height: 16,
                tileset_key: "terrain".to_string(),
            }
        );
    }

    #[test]
    fn test_spawn_converted_to_global() {
        let chunks = vec![
            chunk(2, 2, &[], Vec::new()),
            chunk(2, 2, &[], Vec::new()),
            chunk(2, 2, &[], Vec::new()),
            chunk(2, 2, &[], vec![spawn(1, 16.0, 16.0, false)]),
        ];
        let index = build(&chunks, 2);
        assert_eq!(index.spawn, Spawn { x: 80.0, y: 80.0 });
    }

    #[test]
    fn test_first_spawn_wins_without_primary() {
        let chunks = vec![
            chunk(2, 2, &[], vec![spawn(1, 8.0, 8.0, false)]),
            chunk(2, 2, &[], vec![spawn(2, 4.0, 4.0, false)]),
        ];
        let index = build(&chunks, 2);
        assert_eq!(index.spawn, Spawn { x: 8.0, y: 8.0 });
    }

    #[test]
    fn test_last_primary_spawn_wins() {
        let chunks = vec![
            chunk(2, 2, &[], vec![spawn(1, 8.0, 8.0, false), spawn(2, 1.0, 1.0, true)]),
            chunk(2, 2, &[], vec![spawn(3, 2.0, 2.0, true), spawn(4, 3.0, 3.0, false)]),
        ];
        let index = build(&chunks, 2);
        assert_eq!(index.spawn, Spawn { x: 66.0, y: 2.0 });
    }

    #[test]
    fn test_spawn_at_origin_is_still_a_candidate() {
        let chunks = vec![
            chunk(2, 2, &[], vec![spawn(1, 0.0, 0.0, false)]),
            chunk(2, 2, &[], vec![spawn(2, 4.0, 4.0, false)]),
        ];
        let index = build(&chunks, 2);
        assert_eq!(index.spawn, Spawn { x: 0.0, y: 0.0 });
    }

    #[test]
    fn test_no_spawn_defaults_to_origin() {
        let index = build(&[chunk(2, 2, &[], Vec::new())], 1);
        assert_eq!(index.spawn, Spawn::default());
    }

    #[test]
    fn test_invalid_grid() {
        let chunks = vec![chunk(2, 2, &[], Vec::new()); 3];
        let config = MasterIndexConfig::default();
        assert!(matches!(
            build_master_index(&chunks, "a", 0, &config),
            Err(MasterIndexError::InvalidGrid { chunks: 3, across: 0 })
        ));
        assert!(matches!(
            build_master_index(&chunks, "a", 2, &config),
            Err(MasterIndexError::InvalidGrid { .. })
        ));
    }

    #[test]
    fn test_camel_case_wire_names() {
        let index = build(&[chunk(2, 2, &[tileset("t", "t.png")], Vec::new())], 1);
        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json["tilemaps"][0]["widthInTiles"], 2);
        assert_eq!(json["tilesets"][0]["spritesheetUrl"], "t.png");
        assert_eq!(json["spawn"]["x"], 0.0);
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("overworld.tmx"), "overworld");
        assert_eq!(strip_extension("town.v2.json"), "town.v2");
        assert_eq!(strip_extension("plain"), "plain");
        assert_eq!(strip_extension(".hidden"), ".hidden");
    }

    #[test]
    fn test_chunk_file_names() {
        let chunks = vec![chunk(1, 1, &[], Vec::new()); 2];
        let config = MasterIndexConfig {
            chunk_file_extension: "tmj".to_string(),
            ..Default::default()
        };
        let index = build_master_index(&chunks, "maps.v1.tmx", 2, &config).unwrap();
        let names: Vec<&str> = index.chunk_file_names().collect();
        assert_eq!(names, vec!["maps.v1-0.tmj", "maps.v1-1.tmj"]);
        assert_eq!(index.tilemaps[1].key, "maps.v1-1");
    }
}
