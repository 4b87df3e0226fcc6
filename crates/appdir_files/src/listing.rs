use appdir_base::pal::DirectoryEntries;
use appdir_base::{AppDirResult, FilePath, PalHandle};

/* 📖 # Why does DirectoryListing re-read the directory on every iteration?

A listing is a description of "the children of this directory", not a snapshot.
Holding the PalHandle and asking the platform again on each `iter()` keeps it lazy
(nothing is read until iteration starts), restartable (iterate as often as you
like) and always in line with the current state of the file system.
*/

/// Lazy, restartable listing of a directory's immediate children.
///
/// Names are produced in name order. Directory existence is checked when the
/// listing is created; if the directory disappears afterwards, iteration yields
/// a single error.
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    pal: PalHandle,
    directory: FilePath,
}

impl DirectoryListing {
    pub(crate) fn new(pal: PalHandle, directory: FilePath) -> Self {
        Self { pal, directory }
    }

    /// The directory being listed.
    pub fn directory(&self) -> &FilePath {
        &self.directory
    }

    /// Starts a fresh pass over the directory.
    pub fn iter(&self) -> DirectoryEntries {
        match self.pal.read_directory(&self.directory) {
            Ok(entries) => entries,
            Err(err) => Box::new(std::iter::once(Err(err))),
        }
    }

    /// Collects one pass into a vector, stopping at the first error.
    pub fn names(&self) -> AppDirResult<Vec<String>> {
        self.iter().collect()
    }
}

impl IntoIterator for &DirectoryListing {
    type Item = AppDirResult<String>;
    type IntoIter = DirectoryEntries;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
