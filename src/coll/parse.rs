//! Line parser for the collection format

use crate::coll::FormatError;
use crate::models::{Event, IndexedEvent, Tick};

/// Parse a whole collection. Line numbers in errors are 1-based.
pub fn parse_coll(text: &str) -> Result<Vec<IndexedEvent>, FormatError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| parse_line(i + 1, line))
        .collect()
}

/// Parse one `"{index}, {onset} {pitch} {duration} {velocity};"` line.
pub fn parse_line(line_no: usize, line: &str) -> Result<IndexedEvent, FormatError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 5 {
        return Err(FormatError::FieldCount { line: line_no, found: tokens.len() });
    }

    let index_token = tokens[0]
        .strip_suffix(',')
        .ok_or(FormatError::MissingComma { line: line_no })?;
    let velocity_token = tokens[4]
        .strip_suffix(';')
        .ok_or(FormatError::MissingSemicolon { line: line_no })?;

    let index = parse_int::<usize>(line_no, index_token)?;
    let onset = parse_int::<Tick>(line_no, tokens[1])?;
    let pitch = parse_int::<i32>(line_no, tokens[2])?;
    let duration = parse_int::<Tick>(line_no, tokens[3])?;
    let velocity = parse_int::<i32>(line_no, velocity_token)?;

    Ok(IndexedEvent {
        index,
        event: Event::from_fields(onset, pitch, duration, velocity),
    })
}

fn parse_int<T: std::str::FromStr>(line_no: usize, token: &str) -> Result<T, FormatError> {
    token.parse().map_err(|_| FormatError::BadInteger {
        line: line_no,
        token: token.to_string(),
    })
}
