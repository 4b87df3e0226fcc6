use relative_path::RelativePath;
use std::path::{Path, PathBuf};

/* 📖 # Why does FilePath join names through RelativePath?

File names handed to the facade use forward slashes regardless of platform.
RelativePath interprets them that way and converts to native components when
joined onto a directory, so "notes/today.txt" lands in the right place on every OS.
The directory side is a native absolute path coming from the PAL.
*/

/// Absolute location of a file or directory.
///
/// Produced by joining a file name onto a directory resolved by the PAL.
/// It is a plain value: it is computed on demand and says nothing about
/// whether anything exists at that location.
///
/// # Examples
///
/// ```
/// use appdir_base::FilePath;
///
/// let documents = FilePath::from("/home/me/Documents");
/// let path = documents.join("notes/today.txt");
/// assert_eq!(path.file_name(), Some("today.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilePath(PathBuf);

impl FilePath {
    /// Joins a forward-slash separated name onto this path.
    pub fn join(&self, name: &str) -> FilePath {
        FilePath(RelativePath::new(name).to_path(&self.0))
    }

    /// The containing directory, if any.
    pub fn parent(&self) -> Option<FilePath> {
        self.0.parent().map(|p| FilePath(p.to_path_buf()))
    }

    /// The final component as UTF-8, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|name| name.to_str())
    }

    pub fn is_absolute(&self) -> bool {
        self.0.is_absolute()
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl From<&str> for FilePath {
    fn from(s: &str) -> Self {
        Self(PathBuf::from(s))
    }
}

impl From<String> for FilePath {
    fn from(s: String) -> Self {
        Self(PathBuf::from(s))
    }
}

impl From<PathBuf> for FilePath {
    fn from(p: PathBuf) -> Self {
        Self(p)
    }
}

impl From<&Path> for FilePath {
    fn from(p: &Path) -> Self {
        Self(p.to_path_buf())
    }
}

impl std::fmt::Display for FilePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl AsRef<Path> for FilePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
