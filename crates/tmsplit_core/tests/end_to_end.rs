//! Decode a Tiled JSON export, split it and build its master index.

use tmsplit_assets::assets::TileData;
use tmsplit_assets::loaders::decode_json_str;
use tmsplit_core::prelude::*;

const QUADRANTS: &str = r#"{
    "width": 4,
    "height": 4,
    "tilewidth": 32,
    "tileheight": 32,
    "infinite": false,
    "orientation": "orthogonal",
    "renderorder": "right-down",
    "nextlayerid": 4,
    "nextobjectid": 4,
    "tiledversion": "1.10.2",
    "type": "map",
    "version": "1.10",
    "properties": [{"name": "music", "type": "file", "value": "overworld.ogg"}],
    "layers": [
        {
            "id": 1,
            "name": "ground",
            "type": "tilelayer",
            "width": 4,
            "height": 4,
            "encoding": "base64",
            "data": "AQAAAAEAAAACAAAAAgAAAAEAAAABAAAAAgAAAAIAAAADAAAAAwAAAAQAAAAEAAAAAwAAAAMAAAAEAAAABAAAAA==",
            "opacity": 1,
            "visible": true,
            "x": 0,
            "y": 0
        },
        {
            "id": 2,
            "name": "entities",
            "type": "objectgroup",
            "draworder": "topdown",
            "objects": [
                {"id": 1, "name": "door", "type": "spawn", "x": 8, "y": 8, "width": 0, "height": 0, "point": true},
                {
                    "id": 2, "name": "start", "type": "spawn", "x": 80, "y": 80, "width": 0, "height": 0,
                    "point": true,
                    "properties": [{"name": "type", "type": "string", "value": "primary"}]
                },
                {"id": 3, "name": "sign", "type": "sign", "x": 100, "y": 4, "width": 16, "height": 16}
            ],
            "opacity": 1,
            "visible": true,
            "x": 0,
            "y": 0
        }
    ],
    "tilesets": [
        {
            "firstgid": 1,
            "name": "terrain",
            "image": "../images/terrain.png",
            "imagewidth": 128,
            "imageheight": 32,
            "columns": 4,
            "tilecount": 4,
            "tilewidth": 32,
            "tileheight": 32,
            "margin": 0,
            "spacing": 0
        }
    ]
}"#;

#[test]
fn test_split_and_index_quadrants() {
    let map = decode_json_str(QUADRANTS).unwrap();
    let split = split(&map, &SplitConfig::new(2, 2)).unwrap();
    assert_eq!(split.chunks.len(), 4);

    let last = &split.chunks[3];
    let (_, ground) = last.tile_layers().next().unwrap();
    assert_eq!(ground.data, TileData::Packed("BAAAAAQAAAAEAAAABAAAAA==".to_string()));

    let entities = last.layers[1].as_object_group().unwrap();
    assert_eq!(entities.objects.len(), 1);
    assert_eq!((entities.objects[0].x, entities.objects[0].y), (16.0, 16.0));

    let sign_chunk = split.chunks[1].layers[1].as_object_group().unwrap();
    assert_eq!(sign_chunk.objects[0].name, "sign");
    assert_eq!(sign_chunk.objects[0].x, 36.0);

    let index = build_master_index(
        &split.chunks,
        "quadrants.json",
        split.grid.across,
        &MasterIndexConfig::default(),
    )
    .unwrap();

    assert_eq!(index.spawn.x, 80.0);
    assert_eq!(index.spawn.y, 80.0);
    assert_eq!(index.tilesets.len(), 1);
    assert_eq!(index.tilesets[0].spritesheet_key, "spritesheet-terrain");
    assert_eq!(index.tilesets[0].spritesheet_url, "terrain.png");

    let keys: Vec<&str> = index.tilemaps.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["quadrants-0", "quadrants-1", "quadrants-2", "quadrants-3"]);
    assert_eq!((index.tilemaps[3].tile_x, index.tilemaps[3].tile_y), (2, 2));
}

#[test]
fn test_chunks_reload_as_tiled_json() {
    let map = decode_json_str(QUADRANTS).unwrap();
    let split = split(&map, &SplitConfig::new(3, 3)).unwrap();

    for chunk in &split.chunks {
        let json = serde_json::to_string(chunk).unwrap();
        let reloaded = decode_json_str(&json).unwrap();
        assert_eq!(&reloaded, chunk);
        assert!(reloaded.validate().is_ok());
        assert_eq!(reloaded.properties.len(), 1);
    }

    let widths: Vec<u32> = split.chunks.iter().map(|c| c.width_in_tiles).collect();
    assert_eq!(widths, vec![3, 1, 3, 1]);
}

#[test]
fn test_undecodable_layer_aborts() {
    let broken = QUADRANTS.replace("AQAAAAEAAAACAAAA", "AQAAAAEAAAACAAA");
    let map = decode_json_str(&broken).unwrap();
    let err = split(&map, &SplitConfig::new(2, 2)).unwrap_err();
    assert!(matches!(err, SplitError::Codec { ref layer, .. } if layer == "ground"));
}
