use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

/// Kind of file system entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Symlink,
    Other,
}

impl From<fs::FileType> for FileKind {
    fn from(file_type: fs::FileType) -> Self {
        if file_type.is_symlink() {
            FileKind::Symlink
        } else if file_type.is_dir() {
            FileKind::Directory
        } else if file_type.is_file() {
            FileKind::File
        } else {
            FileKind::Other
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileKind::File => "file",
            FileKind::Directory => "directory",
            FileKind::Symlink => "symlink",
            FileKind::Other => "other",
        })
    }
}

/// Name of a file attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKey {
    Type,
    Size,
    ModificationDate,
    CreationDate,
    AccessDate,
    ReadOnly,
    Permissions,
    OwnerId,
    GroupId,
    ReferenceCount,
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttributeKey::Type => "type",
            AttributeKey::Size => "size",
            AttributeKey::ModificationDate => "modification_date",
            AttributeKey::CreationDate => "creation_date",
            AttributeKey::AccessDate => "access_date",
            AttributeKey::ReadOnly => "read_only",
            AttributeKey::Permissions => "permissions",
            AttributeKey::OwnerId => "owner_id",
            AttributeKey::GroupId => "group_id",
            AttributeKey::ReferenceCount => "reference_count",
        })
    }
}

/// Value of a file attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Kind(FileKind),
    Integer(u64),
    /// Unix permission bits, displayed in octal.
    Permissions(u32),
    Time(SystemTime),
    Flag(bool),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Kind(kind) => write!(f, "{}", kind),
            AttributeValue::Integer(value) => write!(f, "{}", value),
            AttributeValue::Permissions(mode) => write!(f, "{:o}", mode),
            AttributeValue::Time(time) => {
                let time: DateTime<Utc> = (*time).into();
                f.write_str(&time.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            AttributeValue::Flag(flag) => write!(f, "{}", flag),
        }
    }
}

/// Snapshot of the attributes of one file system entry.
///
/// Which keys are present depends on what the platform reports; a snapshot
/// is never refreshed after it has been taken.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileAttributes(BTreeMap<AttributeKey, AttributeValue>);

impl FileAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: AttributeKey, value: AttributeValue) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: AttributeKey) -> Option<&AttributeValue> {
        self.0.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttributeKey, &AttributeValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn kind(&self) -> Option<FileKind> {
        match self.get(AttributeKey::Type)? {
            AttributeValue::Kind(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn size(&self) -> Option<u64> {
        match self.get(AttributeKey::Size)? {
            AttributeValue::Integer(size) => Some(*size),
            _ => None,
        }
    }

    pub fn modified(&self) -> Option<SystemTime> {
        match self.get(AttributeKey::ModificationDate)? {
            AttributeValue::Time(time) => Some(*time),
            _ => None,
        }
    }

    pub fn is_read_only(&self) -> Option<bool> {
        match self.get(AttributeKey::ReadOnly)? {
            AttributeValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl FromIterator<(AttributeKey, AttributeValue)> for FileAttributes {
    fn from_iter<I: IntoIterator<Item = (AttributeKey, AttributeValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for FileAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.0 {
            writeln!(f, "{}: {}", key, value)?;
        }
        Ok(())
    }
}
