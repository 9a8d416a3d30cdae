//! Disk data model
//!
//! A disk carries its partitions in physical on-disk order. The sum of the
//! partition sizes never exceeds the disk size in a well-formed snapshot;
//! [`DiskInfo::unallocated_bytes`] reports a violation as `None` instead of
//! wrapping.

use serde::{Deserialize, Serialize};

use crate::partition::PartitionInfo;

/// Physical disk as reported by the inventory query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiskInfo {
    // === Identity ===
    /// Device path (e.g., "/dev/sda"), unique within a snapshot
    pub id: String,

    /// Disk model name
    pub name: String,

    // === Physical Properties ===
    /// Total size in bytes
    pub size_bytes: u64,

    /// Overall filesystem, when the disk carries one directly or a partition does
    #[serde(default)]
    pub filesystem: String,

    /// Every mount point found on the disk and its partitions
    #[serde(default)]
    pub mount_points: Vec<String>,

    // === Flags ===
    /// Whether the disk is removable
    #[serde(default)]
    pub is_removable: bool,

    /// Whether the disk holds the running system's root filesystem
    #[serde(default)]
    pub is_system_disk: bool,

    // === Partitioning ===
    /// Partitions in physical order
    #[serde(default)]
    pub partitions: Vec<PartitionInfo>,
}

impl DiskInfo {
    /// Get a human-readable display name for the disk
    pub fn display_name(&self) -> String {
        let name = self.name.trim();
        if !name.is_empty() {
            name.to_string()
        } else {
            self.id.rsplit('/').next().unwrap_or(&self.id).to_string()
        }
    }

    /// Sum of all partition sizes.
    pub fn allocated_bytes(&self) -> u64 {
        self.partitions
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.size_bytes))
    }

    /// Trailing space not covered by any partition, or `None` when the
    /// partitions claim more than the disk holds.
    pub fn unallocated_bytes(&self) -> Option<u64> {
        self.size_bytes.checked_sub(self.allocated_bytes())
    }

    pub fn partition(&self, path: &str) -> Option<&PartitionInfo> {
        self.partitions.iter().find(|p| p.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GIB;

    fn part(path: &str, size_bytes: u64) -> PartitionInfo {
        PartitionInfo {
            path: path.to_string(),
            label: None,
            size_bytes,
            filesystem: Some("ext4".to_string()),
            mount_point: None,
        }
    }

    #[test]
    fn flags_default_to_false() {
        let json = r#"{"id":"/dev/sdb","name":"WDC WD20EZRZ","size_bytes":2000}"#;
        let disk: DiskInfo = serde_json::from_str(json).unwrap();

        assert!(!disk.is_removable);
        assert!(!disk.is_system_disk);
        assert!(disk.partitions.is_empty());
        assert_eq!(disk.unallocated_bytes(), Some(2000));
    }

    #[test]
    fn test_disk_info_serialization() {
        let disk = DiskInfo {
            id: "/dev/sda".to_string(),
            name: "Samsung SSD 970 EVO".to_string(),
            size_bytes: 100 * GIB,
            filesystem: "ext4".to_string(),
            mount_points: vec!["/".to_string()],
            is_removable: false,
            is_system_disk: true,
            partitions: vec![part("/dev/sda1", 60 * GIB)],
        };

        let json = serde_json::to_string(&disk).unwrap();
        let deserialized: DiskInfo = serde_json::from_str(&json).unwrap();

        assert_eq!(disk, deserialized);
    }

    #[test]
    fn overcommitted_disk_has_no_unallocated_space() {
        let disk = DiskInfo {
            id: "/dev/sdc".to_string(),
            name: String::new(),
            size_bytes: 100,
            filesystem: String::new(),
            mount_points: vec![],
            is_removable: true,
            is_system_disk: false,
            partitions: vec![part("/dev/sdc1", 60), part("/dev/sdc2", 50)],
        };

        assert_eq!(disk.allocated_bytes(), 110);
        assert_eq!(disk.unallocated_bytes(), None);
        assert_eq!(disk.display_name(), "sdc");
        assert!(disk.partition("/dev/sdc2").is_some());
    }
}
