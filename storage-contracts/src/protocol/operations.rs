// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Inventory query endpoint.
pub const INVENTORY_ENDPOINT: &str = "/api/disks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    CreatePartition,
    FormatPartition,
    DeletePartition,
    CreateRaid,
}

impl OperationKind {
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::CreatePartition => "/api/partition/create",
            Self::FormatPartition => "/api/partition/format",
            Self::DeletePartition => "/api/partition/delete",
            Self::CreateRaid => "/api/raid/create",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CreatePartition => "create partition",
            Self::FormatPartition => "format partition",
            Self::DeletePartition => "delete partition",
            Self::CreateRaid => "create RAID array",
        }
    }

    pub fn is_destructive(self) -> bool {
        matches!(self, Self::FormatPartition | Self::DeletePartition)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePartitionRequest {
    pub disk_path: String,
    /// Whole mebibytes; the client floors byte sizes before submitting
    pub size_mb: u64,
    pub fs_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatPartitionRequest {
    pub part_path: String,
    pub fs_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePartitionRequest {
    pub part_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRaidRequest {
    pub level: u8,
    pub devices: Vec<String>,
}

/// One of the four mutating requests the API accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    CreatePartition(CreatePartitionRequest),
    FormatPartition(FormatPartitionRequest),
    DeletePartition(DeletePartitionRequest),
    CreateRaid(CreateRaidRequest),
}

impl OperationRequest {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::CreatePartition(_) => OperationKind::CreatePartition,
            Self::FormatPartition(_) => OperationKind::FormatPartition,
            Self::DeletePartition(_) => OperationKind::DeletePartition,
            Self::CreateRaid(_) => OperationKind::CreateRaid,
        }
    }

    /// JSON body exactly as the endpoint expects it.
    pub fn to_body(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::CreatePartition(req) => serde_json::to_value(req),
            Self::FormatPartition(req) => serde_json::to_value(req),
            Self::DeletePartition(req) => serde_json::to_value(req),
            Self::CreateRaid(req) => serde_json::to_value(req),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_partition_body_uses_wire_names() {
        let request = OperationRequest::CreatePartition(CreatePartitionRequest {
            disk_path: "/dev/sdb".to_string(),
            size_mb: 20_000,
            fs_type: "ext4".to_string(),
        });

        let body = request.to_body().expect("serialize body");
        assert_eq!(
            body,
            serde_json::json!({"disk_path": "/dev/sdb", "size_mb": 20000, "fs_type": "ext4"})
        );
        assert_eq!(request.kind().endpoint(), "/api/partition/create");
    }

    #[test]
    fn raid_body_lists_devices() {
        let request = OperationRequest::CreateRaid(CreateRaidRequest {
            level: 1,
            devices: vec!["/dev/sdb1".to_string(), "/dev/sdc1".to_string()],
        });

        let body = request.to_body().expect("serialize body");
        assert_eq!(
            body,
            serde_json::json!({"level": 1, "devices": ["/dev/sdb1", "/dev/sdc1"]})
        );
    }

    #[test]
    fn only_format_and_delete_are_destructive() {
        assert!(OperationKind::FormatPartition.is_destructive());
        assert!(OperationKind::DeletePartition.is_destructive());
        assert!(!OperationKind::CreatePartition.is_destructive());
        assert!(!OperationKind::CreateRaid.is_destructive());
    }
}
