//! Collection rendering and atomic file replacement

use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::models::{Event, GroupTable, IndexedEvent};

fn push_line(out: &mut String, index: usize, onset: i32, pitch: i32, duration: i32, velocity: i32) {
    out.push_str(&format!("{}, {} {} {} {};\n", index, onset, pitch, duration, velocity));
}

/// Render events as collection lines. Indices are derived from position, so
/// output is always contiguous from 0 regardless of how many synthetic
/// events were inserted upstream.
pub fn render_coll(events: &[Event]) -> String {
    let mut out = String::new();
    for (i, event) in events.iter().enumerate() {
        push_line(
            &mut out,
            i,
            event.onset,
            event.pitch_field(),
            event.duration_field(),
            event.velocity_field(),
        );
    }
    out
}

/// Render events that still carry their file indices, preserving them.
/// Used when extending a collection in place; tidied output goes through
/// [`render_coll`] instead.
pub fn render_coll_indexed(events: &[IndexedEvent]) -> String {
    let mut out = String::new();
    for raw in events {
        push_line(
            &mut out,
            raw.index,
            raw.event.onset,
            raw.event.pitch_field(),
            raw.event.duration_field(),
            raw.event.velocity_field(),
        );
    }
    out
}

/// Render the group table as `"{position}, {count};"` lines.
pub fn render_groups(groups: &GroupTable) -> String {
    let mut out = String::new();
    for (i, count) in groups.counts().iter().enumerate() {
        out.push_str(&format!("{}, {};\n", i, count));
    }
    out
}

/// Sibling path the group table is written to: `group_<basename>`.
pub fn group_path_for(coll_path: &Path) -> PathBuf {
    let basename = coll_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    coll_path.with_file_name(format!("group_{}", basename))
}

/// Replace `path` with `contents` without ever exposing a partial file.
///
/// The temporary file is created in the destination directory so the final
/// rename stays on one filesystem.
pub fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    stage(path, contents)?.persist(path).map_err(|e| e.error)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Replace a collection file and its group table together: both outputs are
/// fully staged before either rename, so a staging failure leaves the
/// originals untouched.
pub fn write_coll_and_groups(
    coll_path: &Path,
    coll_text: &str,
    group_text: &str,
) -> std::io::Result<()> {
    let group_path = group_path_for(coll_path);
    let coll_tmp = stage(coll_path, coll_text)?;
    let group_tmp = stage(&group_path, group_text)?;

    coll_tmp.persist(coll_path).map_err(|e| e.error)?;
    group_tmp.persist(&group_path).map_err(|e| e.error)?;
    log::debug!("wrote {} and {}", coll_path.display(), group_path.display());
    Ok(())
}

fn stage(path: &Path, contents: &str) -> std::io::Result<tempfile::NamedTempFile> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    Ok(tmp)
}
