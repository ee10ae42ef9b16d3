//! Decoders turning Tiled source documents into a [`Tilemap`].

mod json;
mod tmx;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::assets::{Tilemap, Tileset};

pub use json::{decode_json, decode_json_str};
pub use tmx::decode_tmx;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode JSON map: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load TMX map: {0}")]
    Tmx(#[from] tiled::Error),

    #[error("infinite maps are not supported")]
    InfiniteMap,

    #[error("tile layer '{0}' has no fixed size")]
    InfiniteLayer(String),

    #[error("tile layer '{layer}' references tileset index {index} which doesn't exist")]
    UnknownTileset { layer: String, index: usize },

    #[error("cannot tell the map format of {0:?} from its extension")]
    UnknownFormat(PathBuf),

    #[error("failed to load external tileset {path:?}: {source}")]
    ExternalTileset {
        path: PathBuf,
        #[source]
        source: Box<DecodeError>,
    },

    #[error("external tileset {0:?} is neither .tsx nor .tsj/.json")]
    UnknownTilesetFormat(PathBuf),
}

/// The two accepted source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Tiled JSON (`.json`, `.tmj`)
    Json,
    /// Tiled XML (`.tmx`)
    Tmx,
}

impl SourceFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" | "tmj" => Some(SourceFormat::Json),
            "tmx" => Some(SourceFormat::Tmx),
            _ => None,
        }
    }
}

/// Decode a map file in the given format, or guess it from the extension.
pub fn decode_file(path: &Path, format: Option<SourceFormat>) -> Result<Tilemap, DecodeError> {
    let format = match format {
        Some(format) => format,
        None => SourceFormat::from_path(path)
            .ok_or_else(|| DecodeError::UnknownFormat(path.to_path_buf()))?,
    };

    match format {
        SourceFormat::Json => {
            let mut map = decode_json(BufReader::new(File::open(path)?))?;
            let map_dir = path.parent().unwrap_or_else(|| Path::new(""));
            resolve_external_tilesets(&mut map, map_dir)?;
            Ok(map)
        }
        SourceFormat::Tmx => decode_tmx(path),
    }
}

/// Replace external tileset references (`{"firstgid", "source"}` entries)
/// with the tilesets they point to, loaded relative to `map_dir`.
///
/// Resolved tilesets are embedded: they keep their `firstgid`, their image
/// path is rewritten relative to the map and `source` is cleared.
pub fn resolve_external_tilesets(map: &mut Tilemap, map_dir: &Path) -> Result<(), DecodeError> {
    for tileset in &mut map.tilesets {
        if !tileset.is_external() {
            continue;
        }
        let Some(source) = tileset.source.take() else {
            continue;
        };

        let path = map_dir.join(&source);
        let mut resolved = load_external_tileset(&path, &source, tileset.first_gid, map_dir)
            .map_err(|err| DecodeError::ExternalTileset {
                path: path.clone(),
                source: Box::new(err),
            })?;
        resolved.first_gid = tileset.first_gid;
        resolved.source = None;

        tracing::debug!(
            "resolved external tileset {} as '{}' (firstgid {})",
            path.display(),
            resolved.name,
            resolved.first_gid
        );
        *tileset = resolved;
    }
    Ok(())
}

fn load_external_tileset(
    path: &Path,
    source: &str,
    first_gid: u32,
    map_dir: &Path,
) -> Result<Tileset, DecodeError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("tsx") => tmx::decode_tsx(path, first_gid, map_dir),
        Some("tsj" | "json") => json::decode_tileset_json(path, source),
        _ => Err(DecodeError::UnknownTilesetFormat(path.to_path_buf())),
    }
}
