//! Partition data model

use serde::{Deserialize, Serialize};

use crate::filesystem::{FilesystemCategory, classify_filesystem};

/// A sized region of a disk, as reported by the inventory query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartitionInfo {
    /// Device path (e.g., "/dev/sda1"); the wire format calls this `name`
    #[serde(rename = "name")]
    pub path: String,

    /// Optional human label (GPT name or volume label)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Size in bytes
    pub size_bytes: u64,

    /// Filesystem label ("ext4", "NTFS", "Unknown", ...)
    #[serde(default)]
    pub filesystem: Option<String>,

    /// Mount point, if mounted
    #[serde(default)]
    pub mount_point: Option<String>,
}

impl PartitionInfo {
    /// Label if set, else the last path component ("sda1").
    pub fn display_name(&self) -> String {
        match self.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => self
                .path
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or(&self.path)
                .to_string(),
        }
    }

    pub fn filesystem_label(&self) -> &str {
        self.filesystem.as_deref().unwrap_or("Unknown")
    }

    pub fn category(&self) -> FilesystemCategory {
        classify_filesystem(self.filesystem.as_deref().unwrap_or(""))
    }

    pub fn is_mounted(&self) -> bool {
        self.mount_point
            .as_deref()
            .is_some_and(|mp| !mp.trim().is_empty())
    }
}
