//! File system utilities.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Largest document accepted as input (256 MiB).
pub const MAX_INPUT_SIZE: u64 = 256 * 1024 * 1024;

/// Reads an input document, refusing anything that is not a regular file
/// or is larger than [`MAX_INPUT_SIZE`].
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    let metadata = fs::metadata(path).map_err(Error::io(path))?;

    if !metadata.is_file() {
        return Err(Error::io(path)(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    if metadata.len() > MAX_INPUT_SIZE {
        return Err(Error::io(path)(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "file size ({:.1} MiB) exceeds the {} MiB limit",
                metadata.len() as f64 / 1024.0 / 1024.0,
                MAX_INPUT_SIZE / 1024 / 1024
            ),
        )));
    }

    fs::read(path).map_err(Error::io(path))
}

/// Writes content to a file atomically using a temp file and rename.
///
/// The temp file gets a unique name in the target's directory, so the
/// rename stays on one filesystem and concurrent writers never share it.
/// Nothing is left behind if writing fails.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent).map_err(Error::io(parent))?;
    temp.write_all(content).map_err(Error::io(temp.path()))?;
    temp.persist(path).map_err(|e| Error::io(path)(e.error))?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.sla");

        atomic_write(&file_path, b"<SCRIBUSUTF8NEW/>").unwrap();

        assert_eq!(fs::read(&file_path).unwrap(), b"<SCRIBUSUTF8NEW/>");
    }

    #[test]
    fn test_atomic_write_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.sla");

        fs::write(&file_path, "Original content").unwrap();
        atomic_write(&file_path, b"New content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "New content");
    }

    #[test]
    fn test_atomic_write_no_temp_file_remains() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.sla");

        atomic_write(&file_path, b"content").unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, ["out.sla"]);
    }

    #[test]
    fn test_atomic_write_concurrent_writers_do_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.sla");

        std::thread::scope(|scope| {
            for writer in 0..8 {
                let file_path = &file_path;
                scope.spawn(move || {
                    let content =
                        format!("<SCRIBUSUTF8NEW WRITER=\"{writer}\"/>").repeat(1000);
                    atomic_write(file_path, content.as_bytes()).unwrap();
                });
            }
        });

        // Whichever writer won, the file holds exactly one writer's content.
        let written = fs::read_to_string(&file_path).unwrap();
        let first = &written[..written.find("/>").unwrap() + 2];
        assert_eq!(written, first.repeat(1000));
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_atomic_write_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("missing").join("out.sla");

        let err = atomic_write(&file_path, b"content").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!file_path.exists());
    }

    #[test]
    fn test_read_input() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("in.sla");
        fs::write(&file_path, "<SCRIBUSUTF8NEW/>").unwrap();

        assert_eq!(read_input(&file_path).unwrap(), b"<SCRIBUSUTF8NEW/>");
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input(Path::new("/nonexistent/path/to/file.sla")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("/nonexistent/path/to/file.sla"));
    }

    #[test]
    fn test_read_input_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_input(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("not a regular file"));
    }
}
