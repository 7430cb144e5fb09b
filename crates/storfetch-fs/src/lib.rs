//! Staged temp files with atomic promotion.
//!
//! A download is written to a [`StagedFile`] that lives next to its final
//! destination. Only a verified file is promoted with a single rename, so a
//! reader of the destination directory never observes a partial object. A
//! staged file that is dropped without being promoted is removed.

mod error;

pub use error::{Error, Result};

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tempfile::TempPath;

const TEMP_SUFFIX: &str = ".temp";

pub struct StagedFile {
    temp:        TempPath,
    destination: PathBuf,
}

impl StagedFile {
    /// Create an empty temp file in the destination's directory.
    ///
    /// The file name is `<prefix><random>.temp`.
    pub fn new(destination: impl AsRef<Path>, prefix: &str) -> Result<Self> {
        let destination = destination.as_ref().to_path_buf();
        let dir = match destination.parent() {
            Some(dir) if dir.as_os_str().is_empty() => Path::new("."),
            Some(dir) => dir,
            None => return Err(Error::NoParent { path: destination }),
        };

        let temp = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)
            .map_err(|source| Error::Create {
                dir: dir.to_path_buf(),
                source,
            })?
            .into_temp_path();

        Ok(Self { temp, destination })
    }

    pub fn path(&self) -> &Path { &self.temp }

    pub fn destination(&self) -> &Path { &self.destination }

    /// Rename into place, then stamp the modification time.
    pub fn promote(self, modified: SystemTime) -> Result<PathBuf> {
        let Self { temp, destination } = self;
        let from = temp.to_path_buf();

        temp.persist(&destination).map_err(|e| Error::Rename {
            from,
            to: destination.clone(),
            source: e.error,
        })?;

        set_modified(&destination, modified)?;
        Ok(destination)
    }
}

pub fn set_modified(path: impl AsRef<Path>, modified: SystemTime) -> Result<()> {
    let path = path.as_ref();
    File::options()
        .write(true)
        .open(path)
        .and_then(|file| file.set_modified(modified))
        .map_err(|source| Error::Timestamp {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_staged_file_lives_next_to_destination() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("object");

        let staged = StagedFile::new(&dest, "object_").unwrap();

        assert_eq!(staged.path().parent(), Some(dir.path()));
        assert!(staged.path().exists());
        let name = staged.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("object_"));
        assert!(name.ends_with(".temp"));
    }

    #[test]
    fn test_promote_renames_and_stamps() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("object");
        let staged = StagedFile::new(&dest, "object_").unwrap();
        std::fs::write(staged.path(), "data").unwrap();
        let temp = staged.path().to_path_buf();

        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_521_560_922);
        let placed = staged.promote(stamp).unwrap();

        assert_eq!(placed, dest);
        assert!(!temp.exists());
        assert_eq!(std::fs::read(&dest).unwrap(), b"data");
        assert_eq!(std::fs::metadata(&dest).unwrap().modified().unwrap(), stamp);
    }

    #[test]
    fn test_cleanup_on_drop() {
        let dir = tempdir().unwrap();
        let temp = {
            let staged = StagedFile::new(dir.path().join("object"), "object_").unwrap();
            std::fs::write(staged.path(), "partial").unwrap();
            staged.path().to_path_buf()
        };

        assert!(!temp.exists());
        assert!(!dir.path().join("object").exists());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("missing").join("object");

        assert!(matches!(StagedFile::new(&dest, "object_"), Err(Error::Create { .. })));
    }
}
