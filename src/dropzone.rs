/// Drop gesture validation
///
/// This module turns the paths of one drag-and-drop gesture into candidate
/// items, filters them by declared MIME type, and reads the selected file
/// into memory. The declared type comes from the file name extension only;
/// file contents are never sniffed here.

use std::path::{Path, PathBuf};

/// What a dropped path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// A regular file
    File,
    /// Anything else (directory, missing path, special file)
    Other,
}

/// One candidate payload of a drop gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedItem {
    pub path: PathBuf,
    pub kind: ItemKind,
    /// Declared MIME type, from the extension. `None` when unknown.
    pub mime: Option<&'static str>,
}

impl DroppedItem {
    /// Classify one dropped path
    pub fn from_path(path: PathBuf) -> Self {
        let kind = if path.is_file() {
            ItemKind::File
        } else {
            ItemKind::Other
        };
        let mime = mime_for_extension(&path);

        DroppedItem { path, kind, mime }
    }

    /// True for files declared as JPEG or PNG
    pub fn is_supported_image(&self) -> bool {
        self.kind == ItemKind::File
            && matches!(self.mime, Some("image/jpeg") | Some("image/png"))
    }
}

/// Declared MIME type for a path, by extension
pub fn mime_for_extension(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_string_lossy().to_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

/// Pick the file to convert: the first supported image, in gesture order.
/// Later qualifying items are silently ignored.
pub fn select(items: &[DroppedItem]) -> Option<&DroppedItem> {
    items.iter().find(|item| item.is_supported_image())
}

/// Read the selected file fully into memory
pub async fn read(path: PathBuf) -> Result<Vec<u8>, String> {
    tokio::fs::read(&path)
        .await
        .map_err(|e| format!("could not read {}: {}", path.display(), e))
}
