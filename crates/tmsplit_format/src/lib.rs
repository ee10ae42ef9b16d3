//! # `tmsplit_format`
//!
//! Writers for everything `tmsplit` persists:
//!
//! - [`typescript`]: the master index as an ES module that imports every
//!   chunk and spritesheet, ready for a bundler
//! - [`json`]: the master index as plain JSON, and chunk maps as Tiled JSON
//!   documents that any Tiled JSON reader can open
//!
//! All writers take any [`std::io::Write`], so output can be rendered into
//! memory first and persisted only once everything succeeded.

pub mod json;
pub mod typescript;

use thiserror::Error;

pub use json::{write_chunk_json, write_master_json};
pub use typescript::{TypescriptOptions, write_typescript};

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub mod prelude {
    //! Common imports for `tmsplit_format` users.

    pub use crate::{
        FormatError, TypescriptOptions, write_chunk_json, write_master_json, write_typescript,
    };
}
