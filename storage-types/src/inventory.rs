//! Full inventory snapshot returned by the disk query

use serde::{Deserialize, Serialize};

use crate::disk::DiskInfo;
use crate::partition::PartitionInfo;
use crate::raid::RaidArrayInfo;

/// Everything one inventory query returns. Replaced wholesale on every fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub disks: Vec<DiskInfo>,

    #[serde(default)]
    pub raids: Vec<RaidArrayInfo>,
}

/// A partition offered as a RAID member, tagged with its disk's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaidCandidate {
    pub disk_path: String,
    pub disk_name: String,
    pub partition: PartitionInfo,
}

impl InventorySnapshot {
    pub fn disk(&self, path: &str) -> Option<&DiskInfo> {
        self.disks.iter().find(|d| d.id == path)
    }

    /// Find a partition anywhere in the snapshot along with its owning disk.
    pub fn partition(&self, path: &str) -> Option<(&DiskInfo, &PartitionInfo)> {
        self.disks
            .iter()
            .find_map(|disk| disk.partition(path).map(|part| (disk, part)))
    }

    /// Every partition on every disk, in disk then physical order.
    ///
    /// Mounted or otherwise busy partitions are not filtered out.
    pub fn raid_candidates(&self) -> Vec<RaidCandidate> {
        self.disks
            .iter()
            .flat_map(|disk| {
                let disk_name = disk.display_name();
                disk.partitions.iter().map(move |part| RaidCandidate {
                    disk_path: disk.id.clone(),
                    disk_name: disk_name.clone(),
                    partition: part.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "disks": [
            {"id":"/dev/sda","name":"WDC WD10EZEX","size_bytes":1000,"is_system_disk":true,
             "partitions":[
                {"name":"/dev/sda1","size_bytes":100,"filesystem":"vfat","mount_point":"/boot/efi"},
                {"name":"/dev/sda2","size_bytes":500,"filesystem":"ext4","mount_point":"/"}
             ]},
            {"id":"/dev/sdb","name":"","size_bytes":2000,
             "partitions":[{"name":"/dev/sdb1","size_bytes":2000,"filesystem":null,"mount_point":null}]}
        ],
        "raids": []
    }"#;

    #[test]
    fn candidates_cover_every_partition_unfiltered() {
        let snapshot: InventorySnapshot = serde_json::from_str(SNAPSHOT).unwrap();
        let candidates = snapshot.raid_candidates();

        let paths: Vec<_> = candidates.iter().map(|c| c.partition.path.as_str()).collect();
        assert_eq!(paths, vec!["/dev/sda1", "/dev/sda2", "/dev/sdb1"]);
        assert_eq!(candidates[0].disk_name, "WDC WD10EZEX");
        assert_eq!(candidates[2].disk_name, "sdb");
    }

    #[test]
    fn lookups_find_owning_disk() {
        let snapshot: InventorySnapshot = serde_json::from_str(SNAPSHOT).unwrap();

        let (disk, part) = snapshot.partition("/dev/sda2").unwrap();
        assert_eq!(disk.id, "/dev/sda");
        assert_eq!(part.size_bytes, 500);
        assert!(snapshot.partition("/dev/sdz9").is_none());
        assert!(snapshot.disk("/dev/sdb").is_some());
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let snapshot: InventorySnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.disks.is_empty());
        assert!(snapshot.raids.is_empty());
    }
}
