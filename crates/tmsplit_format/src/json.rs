//! JSON writers for chunk maps and the master index.

use std::io::Write;

use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;
use tmsplit_assets::assets::Tilemap;
use tmsplit_core::MasterIndex;

use crate::FormatError;

/// Write a chunk map as a Tiled JSON document.
///
/// Pretty output is indented with one tab per level; compact output has no
/// insignificant whitespace.
pub fn write_chunk_json<W: Write>(writer: W, chunk: &Tilemap, pretty: bool) -> Result<(), FormatError> {
    write_json(writer, chunk, pretty)
}

/// Write the master index as JSON (`spawn`, `tilesets`, `tilemaps`).
pub fn write_master_json<W: Write>(
    writer: W,
    index: &MasterIndex,
    pretty: bool,
) -> Result<(), FormatError> {
    write_json(writer, index, pretty)
}

fn write_json<W: Write, T: Serialize>(writer: W, value: &T, pretty: bool) -> Result<(), FormatError> {
    if pretty {
        let mut serializer = Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"\t"));
        value.serialize(&mut serializer)?;
    } else {
        serde_json::to_writer(writer, value)?;
    }
    Ok(())
}
