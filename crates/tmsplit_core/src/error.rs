//! Errors raised while splitting a map and assembling its master index.
//!
//! Every error is fatal for the whole operation; there is no partial output.

use thiserror::Error;
use tmsplit_assets::assets::ModelError;
use tmsplit_assets::codec::CodecError;

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("invalid chunk size {width}x{height}: both dimensions must be positive")]
    InvalidChunkSize { width: u32, height: u32 },

    #[error("map has no tile layers to split")]
    EmptyMap,

    #[error("invalid map: {0}")]
    InvalidMap(#[from] ModelError),

    #[error("tile layer '{layer}': {source}")]
    Codec {
        layer: String,
        #[source]
        source: CodecError,
    },

    #[error("tile layer '{layer}' decoded to {actual} GIDs, expected {expected}")]
    LayerSize {
        layer: String,
        expected: usize,
        actual: usize,
    },
}

impl SplitError {
    /// Attach the layer name to a codec failure.
    pub(crate) fn codec(layer: &str, source: CodecError) -> Self {
        match source {
            CodecError::LengthMismatch { expected, actual } => SplitError::LayerSize {
                layer: layer.to_string(),
                expected,
                actual,
            },
            source => SplitError::Codec {
                layer: layer.to_string(),
                source,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum MasterIndexError {
    #[error("{chunks} chunk(s) do not form a grid {across} chunk(s) wide")]
    InvalidGrid { chunks: usize, across: u32 },
}
