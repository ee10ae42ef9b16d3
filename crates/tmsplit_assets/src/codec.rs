//! Tile layer data codec.
//!
//! The packed form of a layer is its row-major GIDs written as little-endian
//! `u32`s and then base64-encoded (standard alphabet, padded, no line
//! wrapping). This is the `encoding="base64"` form without compression.
//! Every other form Tiled can write is rejected rather than guessed at.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use thiserror::Error;

use crate::assets::layer::{Compression, Encoding, TileData, TileLayer};

/// Bit set on a GID when the tile is flipped horizontally.
pub const FLIPPED_HORIZONTALLY: u32 = 0x8000_0000;
/// Bit set on a GID when the tile is flipped vertically.
pub const FLIPPED_VERTICALLY: u32 = 0x4000_0000;
/// Bit set on a GID when the tile is flipped anti-diagonally.
pub const FLIPPED_DIAGONALLY: u32 = 0x2000_0000;

const GID_SIZE: usize = size_of::<u32>();

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("layer data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("layer data is {0} bytes long, which is not a multiple of 4")]
    Misaligned(usize),

    #[error("unsupported layer data format (encoding: {encoding}, compression: {compression})")]
    UnsupportedEncoding {
        encoding: String,
        compression: String,
    },

    #[error("layer data holds {actual} tiles, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Decode a packed text block into row-major GIDs.
pub fn decode(packed: &str) -> Result<Vec<u32>, CodecError> {
    let bytes = BASE64_STANDARD.decode(packed.trim())?;
    if bytes.len() % GID_SIZE != 0 {
        return Err(CodecError::Misaligned(bytes.len()));
    }

    Ok(bytes
        .chunks_exact(GID_SIZE)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Pack row-major GIDs into a text block. Inverse of [`decode`].
pub fn encode(gids: &[u32]) -> String {
    let mut bytes = Vec::with_capacity(gids.len() * GID_SIZE);
    for gid in gids {
        bytes.extend_from_slice(&gid.to_le_bytes());
    }
    BASE64_STANDARD.encode(bytes)
}

/// Decode a layer's payload, rejecting any form other than uncompressed base64.
pub fn decode_layer(layer: &TileLayer) -> Result<Vec<u32>, CodecError> {
    match (&layer.data, layer.encoding, layer.compression) {
        (TileData::Packed(packed), Encoding::Base64, Compression::None) => decode(packed),
        (data, encoding, compression) => Err(CodecError::UnsupportedEncoding {
            encoding: match data {
                TileData::Plain(_) => "plain list".to_string(),
                TileData::Packed(_) => format!("{encoding:?}").to_lowercase(),
            },
            compression: format!("{compression:?}").to_lowercase(),
        }),
    }
}

/// Strip the flip flags from a GID.
pub fn clear_flags(gid: u32) -> u32 {
    gid & !(FLIPPED_HORIZONTALLY | FLIPPED_VERTICALLY | FLIPPED_DIAGONALLY)
}
