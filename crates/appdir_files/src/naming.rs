use relative_path::RelativePath;

use appdir_base::{AppDirError, AppDirResult};

/// Checks that `name` is a single, usable path component.
pub fn validate_file_name(name: &str) -> AppDirResult<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name == "." || name == ".." {
        "name refers to a directory"
    } else if name.contains('/') {
        "name contains a path separator"
    } else if name.contains('\0') {
        "name contains a NUL character"
    } else {
        return Ok(());
    };
    Err(Box::new(AppDirError::invalid_name(name, reason)))
}

/// Derives a file name with its extension replaced.
///
/// A single leading dot on `extension` is ignored. Only the last extension is
/// replaced, and a name that has none gets one appended.
///
/// ```
/// use appdir_files::replace_extension;
///
/// assert_eq!(replace_extension("a.txt", "bak").unwrap(), "a.bak");
/// assert_eq!(replace_extension("archive.tar.gz", ".zip").unwrap(), "archive.tar.zip");
/// assert_eq!(replace_extension("README", "md").unwrap(), "README.md");
/// ```
pub fn replace_extension(file_name: &str, extension: &str) -> AppDirResult<String> {
    validate_file_name(file_name)?;

    let extension = extension.strip_prefix('.').unwrap_or(extension);
    if extension.is_empty() {
        return Err(Box::new(AppDirError::invalid_name(
            file_name,
            "new extension is empty",
        )));
    }
    if extension.contains(['/', '\0']) {
        return Err(Box::new(AppDirError::invalid_name(
            extension,
            "extension contains a path separator or NUL character",
        )));
    }

    let stem = RelativePath::new(file_name)
        .file_stem()
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| Box::new(AppDirError::invalid_name(file_name, "name has no stem")))?;

    let new_name = format!("{}.{}", stem, extension);
    validate_file_name(&new_name)?;
    Ok(new_name)
}
