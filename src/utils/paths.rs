//! Path helpers keeping backup output confined to the storage root

use crate::error::{BackupError, Result};
use crate::utils::exclusion;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Name used for the base folder, both as storage sub-folder and archive top-level entry
pub const BASE_FOLDER_NAME: &str = "root";

/// Strip parent-directory segments so a location cannot climb out of the storage root
///
/// This is a textual filter, not a canonicalization, and must be applied before
/// the location is joined onto the storage root.
pub fn escape_location(location: &str) -> String {
    let mut escaped = location.to_string();

    loop {
        let mut next = escaped.replace("../", "").replace("..\\", "");
        if next == ".." {
            next.clear();
        } else if let Some(stripped) = next
            .strip_suffix("/..")
            .or_else(|| next.strip_suffix("\\.."))
        {
            next = stripped.to_string();
        }

        if next == escaped {
            return escaped;
        }
        escaped = next;
    }
}

/// Whether `folder` refers to the base folder (`.`, `./`, `./.`)
pub fn is_base_folder(folder: &str) -> bool {
    let mut components = Path::new(folder).components().peekable();
    components.peek().is_some() && components.all(|c| c == Component::CurDir)
}

/// Reject locations that are empty or absolute
pub fn validate_location(location: &str) -> Result<()> {
    if location.trim().is_empty() {
        return Err(BackupError::invalid_location(location, "location is empty"));
    }

    if location.starts_with('/') || location.starts_with('\\') || Path::new(location).has_root() {
        return Err(BackupError::invalid_location(
            location,
            "absolute paths are not allowed",
        ));
    }

    if Path::new(location)
        .components()
        .any(|c| matches!(c, Component::Prefix(_)))
    {
        return Err(BackupError::invalid_location(
            location,
            "drive-qualified paths are not allowed",
        ));
    }

    Ok(())
}

/// Storage sub-folder holding the archives of `location`
pub fn backup_subfolder(location: &str) -> String {
    if is_base_folder(location) {
        return BASE_FOLDER_NAME.to_string();
    }

    // Root, drive prefix and `.` components are dropped so the result always
    // joins below the storage root, even for an absolute location.
    let confined = to_slash_path(Path::new(&escape_location(location)));
    if confined.is_empty() {
        BASE_FOLDER_NAME.to_string()
    } else {
        confined
    }
}

/// Top-level directory name used inside archives of `source_folder`
pub fn archive_top_level_name(source_folder: &str) -> String {
    if is_base_folder(source_folder) {
        return BASE_FOLDER_NAME.to_string();
    }

    Path::new(source_folder)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| BASE_FOLDER_NAME.to_string())
}

/// Render a relative path with '/' separators regardless of platform
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Find every directory under `root` whose root-relative path matches `glob`
///
/// Results are returned in walk order as `root`-joined paths; `root` itself is
/// never included. Nothing at or below `storage_root` is walked or returned.
pub fn find_glob_folders(glob: &str, root: &Path, storage_root: &Path) -> Result<Vec<PathBuf>> {
    let matcher = exclusion::compile(glob.trim_start_matches("./"))?;
    let storage_root = storage_root
        .canonicalize()
        .unwrap_or_else(|_| storage_root.to_path_buf());
    let mut folders = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_inside(entry.path(), &storage_root))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry while expanding '{}': {}", glob, e);
                None
            }
        })
    {
        if !entry.file_type().is_dir() {
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(relative) => to_slash_path(relative),
            Err(_) => continue,
        };

        if matcher.matches(&relative) {
            folders.push(entry.path().to_path_buf());
        }
    }

    Ok(folders)
}

fn is_inside(path: &Path, storage_root: &Path) -> bool {
    path.canonicalize()
        .map(|canonical| canonical.starts_with(storage_root))
        .unwrap_or(false)
}
