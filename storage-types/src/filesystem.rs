//! Filesystem display categories

use serde::{Deserialize, Serialize};

/// Colour used for unallocated space in layout bars.
pub const FREE_SPACE_COLOR: &str = "#cccccc";

/// Fixed display category for a filesystem label.
///
/// Only used to pick a colour; it carries no semantics about what the
/// filesystem supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilesystemCategory {
    Ext4,
    Ntfs,
    Fat32,
    Swap,
    Unknown,
    Other,
}

impl FilesystemCategory {
    pub fn color(self) -> &'static str {
        match self {
            Self::Ext4 => "#007bff",
            Self::Ntfs => "#17a2b8",
            Self::Fat32 => "#28a745",
            Self::Swap => "#fd7e14",
            Self::Unknown => "#6c757d",
            Self::Other => "#6610f2",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ext4 => "ext4",
            Self::Ntfs => "ntfs",
            Self::Fat32 => "fat32",
            Self::Swap => "swap",
            Self::Unknown => "unknown",
            Self::Other => "other",
        }
    }
}

/// Map a filesystem label (case-insensitive) to its display category.
///
/// Empty labels and the literal `"Unknown"` are [`FilesystemCategory::Unknown`];
/// anything unrecognised is [`FilesystemCategory::Other`].
pub fn classify_filesystem(label: &str) -> FilesystemCategory {
    let label = label.trim();
    if label.is_empty() {
        return FilesystemCategory::Unknown;
    }

    match label.to_ascii_lowercase().as_str() {
        "unknown" => FilesystemCategory::Unknown,
        "ext4" => FilesystemCategory::Ext4,
        "ntfs" => FilesystemCategory::Ntfs,
        "fat32" | "vfat" => FilesystemCategory::Fat32,
        "swap" => FilesystemCategory::Swap,
        _ => FilesystemCategory::Other,
    }
}
