use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AppDirError, AppDirResult};

/// Logical directory an application keeps its files in.
///
/// A category is only a tag; the absolute location is looked up from the
/// [`Pal`](super::Pal) each time it is needed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DirectoryCategory {
    /// User-visible documents.
    #[default]
    Documents,
    /// Files handed to the application by other applications, inside Documents.
    Inbox,
    /// Application support files that are not user documents.
    Library,
    /// Scratch space the platform may purge.
    Temp,
}

impl DirectoryCategory {
    pub const ALL: [DirectoryCategory; 4] = [
        DirectoryCategory::Documents,
        DirectoryCategory::Inbox,
        DirectoryCategory::Library,
        DirectoryCategory::Temp,
    ];

    /// Directory name as it appears on disk.
    pub fn name(self) -> &'static str {
        match self {
            DirectoryCategory::Documents => "Documents",
            DirectoryCategory::Inbox => "Inbox",
            DirectoryCategory::Library => "Library",
            DirectoryCategory::Temp => "tmp",
        }
    }

    /// Location below a sandbox root, always with forward slashes.
    ///
    /// ```
    /// use appdir_base::DirectoryCategory;
    ///
    /// assert_eq!(DirectoryCategory::Inbox.sandbox_path(), "Documents/Inbox");
    /// ```
    pub fn sandbox_path(self) -> &'static str {
        match self {
            DirectoryCategory::Documents => "Documents",
            DirectoryCategory::Inbox => "Documents/Inbox",
            DirectoryCategory::Library => "Library",
            DirectoryCategory::Temp => "tmp",
        }
    }
}

impl fmt::Display for DirectoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DirectoryCategory {
    type Err = Box<AppDirError>;

    fn from_str(s: &str) -> AppDirResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "documents" => Ok(DirectoryCategory::Documents),
            "inbox" => Ok(DirectoryCategory::Inbox),
            "library" => Ok(DirectoryCategory::Library),
            "temp" | "tmp" => Ok(DirectoryCategory::Temp),
            _ => Err(Box::new(AppDirError::configuration(format!(
                "Unknown directory category '{}'",
                s
            )))),
        }
    }
}

impl TryFrom<String> for DirectoryCategory {
    type Error = Box<AppDirError>;

    fn try_from(s: String) -> AppDirResult<Self> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_documents() {
        assert_eq!(DirectoryCategory::default(), DirectoryCategory::Documents);
    }

    #[test]
    fn test_display_uses_directory_name() {
        assert_eq!(DirectoryCategory::Temp.to_string(), "tmp");
        assert_eq!(DirectoryCategory::Library.to_string(), "Library");
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(
            "Documents".parse::<DirectoryCategory>().unwrap(),
            DirectoryCategory::Documents
        );
        assert_eq!(
            "INBOX".parse::<DirectoryCategory>().unwrap(),
            DirectoryCategory::Inbox
        );
        assert_eq!(
            "tmp".parse::<DirectoryCategory>().unwrap(),
            DirectoryCategory::Temp
        );
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "Downloads".parse::<DirectoryCategory>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown directory category 'Downloads'"
        );
    }

    #[test]
    fn test_sandbox_paths_are_distinct() {
        let mut paths: Vec<_> = DirectoryCategory::ALL
            .iter()
            .map(|c| c.sandbox_path())
            .collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 4);
    }
}
