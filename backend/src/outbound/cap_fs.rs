//! Capability-scoped file helpers for adapters that persist small files.
//!
//! Every access opens the parent directory through `cap_std` and touches a
//! single entry inside it, so adapters never walk arbitrary paths.

use std::ffi::OsString;
use std::io;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};

/// Read a UTF-8 file, returning `None` when it or its directory is absent.
///
/// # Errors
/// Propagates I/O failures other than "not found".
pub fn read_optional(path: &Path) -> io::Result<Option<String>> {
    let (parent, file_name) = parent_and_file_name(path)?;
    let directory = match Dir::open_ambient_dir(parent, ambient_authority()) {
        Ok(directory) => directory,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(error),
    };
    match directory.read_to_string(Path::new(&file_name)) {
        Ok(contents) => Ok(Some(contents)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error),
    }
}

/// Write bytes to a file, creating its parent directories.
///
/// # Errors
/// Propagates directory creation and write failures.
pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let (parent, file_name) = parent_and_file_name(path)?;
    Dir::create_ambient_dir_all(parent, ambient_authority())?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
    directory.write(Path::new(&file_name), contents)
}

/// Whether `path` names an existing entry.
#[must_use]
pub fn path_exists(path: &Path) -> bool {
    let Ok((parent, file_name)) = parent_and_file_name(path) else {
        return false;
    };
    Dir::open_ambient_dir(parent, ambient_authority())
        .is_ok_and(|directory| directory.exists(Path::new(&file_name)))
}

fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path must name a file")
    })?;
    Ok((parent, file_name.to_os_string()))
}
