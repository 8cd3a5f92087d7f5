//! Collection codec
//!
//! Parses and renders the line-oriented collection format: one event per
//! line, `"{index}, {onset} {pitch} {duration} {velocity};"`. The codec is
//! purely lexical; range checks and ordering are the engine's job.

mod parse;
mod write;

pub use parse::{parse_coll, parse_line};
pub use write::{
    group_path_for, render_coll, render_coll_indexed, render_groups, write_atomic,
    write_coll_and_groups,
};

use std::path::Path;

use thiserror::Error;

use crate::models::IndexedEvent;

/// Malformed collection line. Carries the 1-based line number.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("line {line}: expected 5 fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: index field must end with ','")]
    MissingComma { line: usize },

    #[error("line {line}: velocity field must end with ';'")]
    MissingSemicolon { line: usize },

    #[error("line {line}: field '{token}' is not an integer")]
    BadInteger { line: usize, token: String },
}

/// Reading a collection file can fail lexically or on I/O.
#[derive(Debug, Error)]
pub enum CollError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("collection file error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CollError>;

/// Read and parse a collection file.
pub fn read_coll(path: &Path) -> Result<Vec<IndexedEvent>> {
    let text = std::fs::read_to_string(path)?;
    let events = parse_coll(&text)?;
    log::debug!("read {} events from {}", events.len(), path.display());
    Ok(events)
}
