//! Tiled JSON (`.json` / `.tmj`) decoder.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::assets::{Tilemap, Tileset};
use crate::loaders::DecodeError;

/// Decode a Tiled JSON map from a reader.
pub fn decode_json<R: Read>(reader: R) -> Result<Tilemap, DecodeError> {
    let map: Tilemap = serde_json::from_reader(reader)?;
    tracing::debug!(
        "decoded JSON map: {}x{} tiles, {} layer(s), {} tileset(s)",
        map.width_in_tiles,
        map.height_in_tiles,
        map.layers.len(),
        map.tilesets.len()
    );
    Ok(map)
}

/// Decode a Tiled JSON map from a string.
pub fn decode_json_str(source: &str) -> Result<Tilemap, DecodeError> {
    decode_json(source.as_bytes())
}

/// Load an external `.tsj` tileset. `source` is the reference as written in
/// the map; the tileset's image is rewritten relative to the map.
pub(super) fn decode_tileset_json(path: &Path, source: &str) -> Result<Tileset, DecodeError> {
    let mut tileset: Tileset = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    let dir = Path::new(source).parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = dir
        && !tileset.image.is_empty()
    {
        tileset.image = dir.join(&tileset.image).to_string_lossy().replace('\\', "/");
    }
    Ok(tileset)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::loaders::decode_file;
    use crate::assets::{LayerKind, PropertyValue};

    const MAP: &str = r#"{
        "compressionlevel": -1,
        "height": 2,
        "infinite": false,
        "layers": [
            {
                "data": "AQAAAAEAAAACAAAAAgAAAA==",
                "encoding": "base64",
                "height": 2,
                "id": 1,
                "name": "ground",
                "opacity": 1,
                "type": "tilelayer",
                "visible": true,
                "width": 2,
                "x": 0,
                "y": 0
            },
            {
                "draworder": "topdown",
                "id": 2,
                "name": "entities",
                "objects": [
                    {
                        "height": 0,
                        "id": 1,
                        "name": "start",
                        "point": true,
                        "properties": [{"name": "type", "type": "string", "value": "primary"}],
                        "rotation": 0,
                        "type": "spawn",
                        "visible": true,
                        "width": 0,
                        "x": 40,
                        "y": 8
                    }
                ],
                "opacity": 1,
                "type": "objectgroup",
                "visible": true,
                "x": 0,
                "y": 0
            }
        ],
        "nextlayerid": 3,
        "nextobjectid": 2,
        "orientation": "orthogonal",
        "renderorder": "right-down",
        "tiledversion": "1.10.2",
        "tileheight": 32,
        "tilesets": [
            {
                "columns": 8,
                "firstgid": 1,
                "image": "../images/terrain.png",
                "imageheight": 256,
                "imagewidth": 256,
                "margin": 0,
                "name": "terrain",
                "spacing": 0,
                "tilecount": 64,
                "tileheight": 32,
                "tilewidth": 32
            }
        ],
        "tilewidth": 32,
        "type": "map",
        "version": "1.10",
        "width": 2
    }"#;

    #[test]
    fn test_decode_tiled_export() {
        let map = decode_json_str(MAP).unwrap();

        assert_eq!(map.width_in_tiles, 2);
        assert_eq!(map.tile_width, 32);
        assert_eq!(map.layers.len(), 2);
        assert_eq!(map.tilesets[0].name, "terrain");
        assert_eq!(map.tilesets[0].image, "../images/terrain.png");

        let (_, ground) = map.tile_layers().next().unwrap();
        assert_eq!(ground.decode_gids().unwrap(), vec![1, 1, 2, 2]);

        let LayerKind::ObjectGroup(group) = &map.layers[1].kind else {
            panic!("expected object group");
        };
        let spawn = &group.objects[0];
        assert_eq!(spawn.object_type, "spawn");
        assert!(spawn.point);
        assert_eq!(
            spawn.properties.get("type"),
            Some(&PropertyValue::String("primary".to_string()))
        );
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(
            decode_json_str("{\"width\": 2"),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_reencode_round_trips() {
        let map = decode_json_str(MAP).unwrap();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(decode_json_str(&json).unwrap(), map);
    }

    /// Fresh scratch directory under the system temp dir.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tmsplit-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("tilesets")).unwrap();
        dir
    }

    fn with_external_tileset(source: &str) -> String {
        let columns = MAP.find(r#""columns": 8"#).unwrap();
        let embedded = MAP[..columns].rfind('{').unwrap();
        let end = MAP[embedded..].find('}').unwrap() + embedded + 1;
        format!(
            "{}{{\"firstgid\": 1, \"source\": \"{source}\"}}{}",
            &MAP[..embedded],
            &MAP[end..]
        )
    }

    #[test]
    fn test_decode_external_tileset_reference() {
        let map = decode_json_str(&with_external_tileset("terrain.tsx")).unwrap();

        let tileset = &map.tilesets[0];
        assert!(tileset.is_external());
        assert_eq!(tileset.first_gid, 1);
        assert_eq!(tileset.source.as_deref(), Some("terrain.tsx"));
        assert_eq!(tileset.name, "");
        assert_eq!(tileset.tile_width, 0);
    }

    #[test]
    fn test_decode_file_resolves_tsj() {
        let dir = scratch_dir("tsj");
        fs::write(
            dir.join("tilesets/terrain.tsj"),
            r#"{
                "columns": 8,
                "image": "terrain.png",
                "imageheight": 256,
                "imagewidth": 256,
                "margin": 0,
                "name": "terrain",
                "spacing": 0,
                "tilecount": 64,
                "tiledversion": "1.10.2",
                "tileheight": 32,
                "tilewidth": 32,
                "type": "tileset",
                "version": "1.10"
            }"#,
        )
        .unwrap();
        let map_path = dir.join("level.json");
        fs::write(&map_path, with_external_tileset("tilesets/terrain.tsj")).unwrap();

        let map = decode_file(&map_path, None).unwrap();
        let tileset = &map.tilesets[0];
        assert!(!tileset.is_external());
        assert_eq!(tileset.first_gid, 1);
        assert_eq!(tileset.name, "terrain");
        assert_eq!(tileset.image, "tilesets/terrain.png");
        assert_eq!((tileset.tile_width, tileset.tile_height), (32, 32));
        assert_eq!(tileset.source, None);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_decode_file_resolves_tsx() {
        let dir = scratch_dir("tsx");
        fs::write(
            dir.join("tilesets/props.tsx"),
            r#"<?xml version="1.0" encoding="UTF-8"?>
<tileset version="1.10" tiledversion="1.10.2" name="props" tilewidth="16" tileheight="16" tilecount="4" columns="2">
 <image source="props.png" width="32" height="32"/>
</tileset>
"#,
        )
        .unwrap();
        let map_path = dir.join("level.json");
        fs::write(&map_path, with_external_tileset("tilesets/props.tsx")).unwrap();

        let map = decode_file(&map_path, None).unwrap();
        let tileset = &map.tilesets[0];
        assert_eq!(tileset.name, "props");
        assert_eq!(tileset.first_gid, 1);
        assert_eq!(tileset.image, "tilesets/props.png");
        assert_eq!((tileset.image_width, tileset.image_height), (32, 32));
        assert_eq!(tileset.tile_count, 4);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_decode_file_missing_external_tileset() {
        let dir = scratch_dir("missing");
        let map_path = dir.join("level.json");
        fs::write(&map_path, with_external_tileset("tilesets/gone.tsj")).unwrap();

        let err = decode_file(&map_path, None).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ExternalTileset { ref path, .. } if path.ends_with("tilesets/gone.tsj")
        ));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_decode_file_unknown_tileset_format() {
        let dir = scratch_dir("format");
        let map_path = dir.join("level.json");
        fs::write(&map_path, with_external_tileset("tilesets/terrain.png")).unwrap();

        let err = decode_file(&map_path, None).unwrap_err();
        let DecodeError::ExternalTileset { source, .. } = err else {
            panic!("expected external tileset error");
        };
        assert!(matches!(*source, DecodeError::UnknownTilesetFormat(_)));

        fs::remove_dir_all(dir).unwrap();
    }
}
