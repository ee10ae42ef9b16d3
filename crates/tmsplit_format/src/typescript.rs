//! Render the master index as a TypeScript module.
//!
//! The module imports every chunk file as `tN` and every spritesheet as
//! `sN`, so a bundler resolves and fingerprints them, then exports a single
//! `map` object mirroring [`MasterIndex`].

use std::io::Write;

use tmsplit_core::MasterIndex;

use crate::FormatError;

/// Settings for [`write_typescript`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypescriptOptions {
    /// Prepended to every imported file name.
    pub static_prefix: String,
}

impl TypescriptOptions {
    pub fn with_static_prefix(static_prefix: impl Into<String>) -> Self {
        Self {
            static_prefix: static_prefix.into(),
        }
    }
}

impl Default for TypescriptOptions {
    fn default() -> Self {
        Self::with_static_prefix("../../static/")
    }
}

/// Write `index` as an ES module exporting `map`.
///
/// # Example
///
/// ```rust
/// use tmsplit_core::{MasterIndex, Spawn};
/// use tmsplit_format::{TypescriptOptions, write_typescript};
///
/// let index = MasterIndex {
///     spawn: Spawn { x: 16.0, y: 32.0 },
///     tilesets: Vec::new(),
///     tilemaps: Vec::new(),
/// };
/// let mut out = Vec::new();
/// write_typescript(&mut out, &index, &TypescriptOptions::default())?;
/// assert!(String::from_utf8(out).unwrap().ends_with("export { map };\n"));
/// # Ok::<(), tmsplit_format::FormatError>(())
/// ```
pub fn write_typescript<W: Write>(
    mut out: W,
    index: &MasterIndex,
    options: &TypescriptOptions,
) -> Result<(), FormatError> {
    let prefix = &options.static_prefix;

    for (i, entry) in index.tilemaps.iter().enumerate() {
        writeln!(out, "import t{} from {};", i, quote(&format!("{prefix}{}", entry.url)))?;
    }
    for (i, entry) in index.tilesets.iter().enumerate() {
        writeln!(
            out,
            "import s{} from {};",
            i,
            quote(&format!("{prefix}{}", entry.spritesheet_url))
        )?;
    }
    if !index.tilemaps.is_empty() || !index.tilesets.is_empty() {
        writeln!(out)?;
    }

    writeln!(out, "const map = {{")?;
    writeln!(out, "    spawn: {{ x: {}, y: {} }},", index.spawn.x, index.spawn.y)?;

    writeln!(out, "    tilemaps: [")?;
    for (i, entry) in index.tilemaps.iter().enumerate() {
        writeln!(out, "        {{")?;
        writeln!(out, "            key: {},", quote(&entry.key))?;
        writeln!(out, "            url: (t{i} as unknown) as string,")?;
        writeln!(out, "            tileX: {},", entry.tile_x)?;
        writeln!(out, "            tileY: {},", entry.tile_y)?;
        writeln!(out, "            widthInTiles: {},", entry.width_in_tiles)?;
        writeln!(out, "            heightInTiles: {},", entry.height_in_tiles)?;
        writeln!(out, "        }},")?;
    }
    writeln!(out, "    ],")?;

    writeln!(out, "    tilesets: [")?;
    for (i, entry) in index.tilesets.iter().enumerate() {
        writeln!(out, "        {{")?;
        writeln!(out, "            spritesheetKey: {},", quote(&entry.spritesheet_key))?;
        writeln!(out, "            spritesheetUrl: s{i},")?;
        writeln!(out, "            frameWidth: {},", entry.frame_width)?;
        writeln!(out, "            frameHeight: {},", entry.frame_height)?;
        writeln!(out, "            tilesetKey: {},", quote(&entry.tileset_key))?;
        writeln!(out, "        }},")?;
    }
    writeln!(out, "    ],")?;
    writeln!(out, "}};")?;
    writeln!(out)?;
    writeln!(out, "export {{ map }};")?;

    Ok(())
}

/// Single-quoted TypeScript string literal.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\'' => quoted.push_str("\\'"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}
