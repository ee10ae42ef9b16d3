//! `tmsplit`: split a Tiled map into chunk maps plus a master index.
//!
//! ```text
//! tmsplit --json maps/overworld.json --chunk-width 50 --chunk-height 50 --pretty
//! ```
//!
//! Everything is decoded, split and rendered in memory first; files are only
//! written once every step has succeeded.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser, ValueEnum};
use tmsplit_assets::loaders::{SourceFormat, decode_file};
use tmsplit_core::{MasterIndexConfig, SplitConfig, build_master_index, split};
use tmsplit_format::{TypescriptOptions, write_chunk_json, write_master_json, write_typescript};
use tracing::{Level, debug, info};

#[derive(Debug, Parser)]
#[command(
    name = "tmsplit",
    version,
    about = "Split a Tiled map into independently loadable chunks and a master index"
)]
#[command(group(ArgGroup::new("source").required(true).args(["json", "tmx"])))]
struct Cli {
    /// Tiled JSON map to split.
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Tiled TMX (XML) map to split.
    #[arg(long, value_name = "FILE")]
    tmx: Option<PathBuf>,

    /// Chunk file pattern; its file name must end in `-%d` before the
    /// extension, and `%d` is replaced with the chunk index.
    /// Defaults to `<source>-%d.json`.
    #[arg(long, value_name = "PATTERN")]
    out: Option<String>,

    /// Master index file. Defaults to `<source>-master.ts` (or `.json`).
    #[arg(long, value_name = "FILE")]
    master: Option<PathBuf>,

    /// Output format of the master index.
    #[arg(long, value_enum, default_value_t = MasterFormat::Ts)]
    master_format: MasterFormat,

    /// Import prefix for chunk and spritesheet files in the TypeScript module.
    #[arg(long, value_name = "PREFIX", default_value = "../../static/")]
    static_prefix: String,

    /// Chunk width in tiles.
    #[arg(long, default_value_t = 100)]
    chunk_width: u32,

    /// Chunk height in tiles.
    #[arg(long, default_value_t = 100)]
    chunk_height: u32,

    /// Pretty-print JSON output (tab indented).
    #[arg(long)]
    pretty: bool,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MasterFormat {
    /// TypeScript module exporting `map`
    Ts,
    /// Plain JSON
    Json,
}

impl MasterFormat {
    fn extension(self) -> &'static str {
        match self {
            MasterFormat::Ts => "ts",
            MasterFormat::Json => "json",
        }
    }
}

impl Cli {
    fn source(&self) -> Result<(&Path, SourceFormat)> {
        match (&self.json, &self.tmx) {
            (Some(path), None) => Ok((path, SourceFormat::Json)),
            (None, Some(path)) => Ok((path, SourceFormat::Tmx)),
            _ => bail!("specify exactly one of --json or --tmx"),
        }
    }

    fn out_pattern(&self, source: &Path) -> String {
        self.out
            .clone()
            .unwrap_or_else(|| format!("{}-%d.json", source.with_extension("").display()))
    }

    fn master_path(&self, source: &Path) -> PathBuf {
        self.master.clone().unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}-master.{}",
                source.with_extension("").display(),
                self.master_format.extension()
            ))
        })
    }
}

/// Expand the `%d` placeholder of an output pattern.
fn chunk_path(pattern: &str, index: usize) -> PathBuf {
    PathBuf::from(pattern.replace("%d", &index.to_string()))
}

/// Chunk extension referenced from the master index, taken from the pattern.
fn chunk_extension(pattern: &str) -> String {
    Path::new(pattern)
        .extension()
        .map_or_else(|| "json".to_string(), |ext| ext.to_string_lossy().into_owned())
}

/// Chunk key base named by the pattern: its file stem without the `-%d` suffix.
///
/// The master index refers to chunk `i` as `<base>-<i>.<ext>`, so the pattern
/// must produce exactly those file names.
fn chunk_key_base(pattern: &str) -> Result<String> {
    let stem = Path::new(pattern)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .with_context(|| format!("output pattern '{pattern}' has no file name"))?;
    match stem.strip_suffix("-%d") {
        Some(base) if !base.is_empty() && !base.contains("%d") => Ok(base.to_string()),
        _ => bail!(
            "output pattern '{pattern}' must name files as <name>-%d.<ext> so the master index can refer to them"
        ),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let (source, format) = cli.source()?;
    let pattern = cli.out_pattern(source);
    let key_base = chunk_key_base(&pattern)?;
    let extension = chunk_extension(&pattern);
    let master_path = cli.master_path(source);

    let map = decode_file(source, Some(format))
        .with_context(|| format!("failed to decode {}", source.display()))?;
    info!(
        "Loaded {} ({}x{} tiles, {} layer(s))",
        source.display(),
        map.width_in_tiles,
        map.height_in_tiles,
        map.layers.len()
    );

    let config = SplitConfig::new(cli.chunk_width, cli.chunk_height);
    let split = split(&map, &config).context("failed to split map")?;

    // build_master_index strips one extension, which keeps dots inside the base
    let base_name = format!("{key_base}.{extension}");
    let master_config = MasterIndexConfig {
        chunk_file_extension: extension,
        ..Default::default()
    };
    let index = build_master_index(&split.chunks, &base_name, split.grid.across, &master_config)
        .context("failed to build master index")?;
    debug!("Chunk keys use base '{}'", key_base);

    let mut master = Vec::new();
    let rendered = match cli.master_format {
        MasterFormat::Ts => write_typescript(
            &mut master,
            &index,
            &TypescriptOptions::with_static_prefix(cli.static_prefix.as_str()),
        ),
        MasterFormat::Json => write_master_json(&mut master, &index, cli.pretty),
    };
    rendered.context("failed to render master index")?;

    let chunks = split
        .chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let mut bytes = Vec::new();
            write_chunk_json(&mut bytes, chunk, cli.pretty)
                .with_context(|| format!("failed to render chunk {i}"))?;
            Ok((chunk_path(&pattern, i), bytes))
        })
        .collect::<Result<Vec<_>>>()?;

    fs::write(&master_path, master)
        .with_context(|| format!("failed to write {}", master_path.display()))?;
    info!("Master index saved to '{}'", master_path.display());

    for (path, bytes) in &chunks {
        fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
        debug!("Saved chunk to {}", path.display());
    }
    info!(
        "Map split into {} chunk(s) saved to pattern '{}'",
        chunks.len(),
        pattern
    );

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    run(&cli)
}
