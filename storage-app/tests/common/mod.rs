// SPDX-License-Identifier: GPL-3.0-only

//! In-memory disk service for driving the engine without a network.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use storage_contracts::{
    ClientError, DiskApi, OperationId, OperationRequest, OperationResult,
};
use storage_types::{DiskInfo, InventorySnapshot, MIB, PartitionInfo, RaidArrayInfo};

#[derive(Default)]
struct FakeState {
    snapshot: InventorySnapshot,
    calls: Vec<OperationRequest>,
    fetches: usize,
    reject_with: Option<String>,
    submit_down: bool,
    inventory_down: bool,
}

/// Simulates disks in memory and records every mutating request it receives.
pub struct FakeDiskApi {
    state: Mutex<FakeState>,
}

impl FakeDiskApi {
    pub fn new(snapshot: InventorySnapshot) -> Self {
        Self {
            state: Mutex::new(FakeState {
                snapshot,
                ..FakeState::default()
            }),
        }
    }

    pub fn with_disks(disks: Vec<DiskInfo>) -> Self {
        Self::new(InventorySnapshot {
            disks,
            raids: vec![],
        })
    }

    pub fn calls(&self) -> Vec<OperationRequest> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.state.lock().unwrap().fetches
    }

    /// Answer every following mutation with a failure result.
    pub fn reject_with(&self, message: &str) {
        self.state.lock().unwrap().reject_with = Some(message.to_string());
    }

    /// Mutations fail without any response.
    pub fn set_submit_down(&self, down: bool) {
        self.state.lock().unwrap().submit_down = down;
    }

    /// Inventory queries fail without any response.
    pub fn set_inventory_down(&self, down: bool) {
        self.state.lock().unwrap().inventory_down = down;
    }
}

#[async_trait]
impl DiskApi for FakeDiskApi {
    async fn fetch_inventory(&self) -> Result<InventorySnapshot, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.fetches += 1;
        if state.inventory_down {
            return Err(ClientError::Connection("connection refused".to_string()));
        }
        Ok(state.snapshot.clone())
    }

    async fn submit(
        &self,
        _operation_id: OperationId,
        request: &OperationRequest,
    ) -> Result<OperationResult, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(request.clone());

        if state.submit_down {
            return Err(ClientError::Connection("connection refused".to_string()));
        }

        if let Some(message) = &state.reject_with {
            return Ok(OperationResult::failure(message.clone()));
        }

        Ok(apply(&mut state.snapshot, request))
    }
}

fn apply(snapshot: &mut InventorySnapshot, request: &OperationRequest) -> OperationResult {
    match request {
        OperationRequest::CreatePartition(req) => {
            let Some(disk) = snapshot.disks.iter_mut().find(|d| d.id == req.disk_path) else {
                return OperationResult::failure(format!("Disk {} not found", req.disk_path));
            };

            let requested = req.size_mb * MIB;
            if disk.allocated_bytes() + requested > disk.size_bytes {
                return OperationResult::failure("Not enough space");
            }

            let number = disk.partitions.len() + 1;
            disk.partitions.push(part(
                &format!("{}{number}", disk.id),
                requested,
                &req.fs_type,
            ));
            OperationResult::success()
        }
        OperationRequest::FormatPartition(req) => {
            for disk in &mut snapshot.disks {
                if let Some(p) = disk.partitions.iter_mut().find(|p| p.path == req.part_path) {
                    p.filesystem = Some(req.fs_type.clone());
                    return OperationResult::success();
                }
            }
            OperationResult::failure(format!("Partition {} not found", req.part_path))
        }
        OperationRequest::DeletePartition(req) => {
            for disk in &mut snapshot.disks {
                if let Some(idx) = disk.partitions.iter().position(|p| p.path == req.part_path) {
                    disk.partitions.remove(idx);
                    return OperationResult::success();
                }
            }
            OperationResult::failure(format!("Partition {} not found", req.part_path))
        }
        OperationRequest::CreateRaid(req) => {
            let path = format!("/dev/md{}", snapshot.raids.len());
            snapshot.raids.push(RaidArrayInfo {
                path,
                level: req.level,
                size_bytes: 0,
                state: "clean".to_string(),
                devices: req.devices.clone(),
            });
            OperationResult::success()
        }
    }
}

pub fn disk(id: &str, size_bytes: u64, partitions: Vec<PartitionInfo>) -> DiskInfo {
    DiskInfo {
        id: id.to_string(),
        name: "Seagate Barracuda".to_string(),
        size_bytes,
        filesystem: String::new(),
        mount_points: vec![],
        is_removable: false,
        is_system_disk: false,
        partitions,
    }
}

pub fn part(path: &str, size_bytes: u64, fs: &str) -> PartitionInfo {
    PartitionInfo {
        path: path.to_string(),
        label: None,
        size_bytes,
        filesystem: Some(fs.to_string()),
        mount_point: None,
    }
}
