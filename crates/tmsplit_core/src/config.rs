//! Configuration passed explicitly to the splitter and master index builder.

/// Configuration for [`split`](crate::split::split).
///
/// # Example
///
/// ```rust
/// use tmsplit_core::SplitConfig;
///
/// let config = SplitConfig::new(64, 32);
/// assert_eq!(config.chunk_width, 64);
/// assert!(config.require_tile_layers);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    /// Chunk width in tiles. Must be positive.
    pub chunk_width: u32,

    /// Chunk height in tiles. Must be positive.
    pub chunk_height: u32,

    /// Fail with [`SplitError::EmptyMap`](crate::SplitError::EmptyMap) when
    /// the source map has no tile layer at all.
    ///
    /// Object-only maps split fine geometrically, but are almost always a
    /// sign that the wrong file was passed in.
    pub require_tile_layers: bool,
}

impl SplitConfig {
    /// Chunk size in tiles, with the other settings at their defaults.
    pub fn new(chunk_width: u32, chunk_height: u32) -> Self {
        Self {
            chunk_width,
            chunk_height,
            ..Default::default()
        }
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            chunk_width: 100,
            chunk_height: 100,
            require_tile_layers: true,
        }
    }
}

/// Configuration for [`build_master_index`](crate::master::build_master_index).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterIndexConfig {
    /// Object `type` that marks a spawn point.
    pub spawn_object_type: String,

    /// String property (`name`, `value`) that marks a spawn point as primary.
    pub primary_property: (String, String),

    /// Extension of the chunk files, used to build each chunk's `url`.
    pub chunk_file_extension: String,
}

impl Default for MasterIndexConfig {
    fn default() -> Self {
        Self {
            spawn_object_type: "spawn".to_string(),
            primary_property: ("type".to_string(), "primary".to_string()),
            chunk_file_extension: "json".to_string(),
        }
    }
}
