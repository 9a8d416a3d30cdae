// SPDX-License-Identifier: GPL-3.0-only

//! Mutating operations against the disk service.
//!
//! Every operation runs validate, submit, interpret, then refresh-or-report.
//! Nothing is sent unless local validation passes, and the inventory is only
//! reloaded after the service reports success.

use std::collections::HashSet;
use std::sync::Arc;

use storage_contracts::{
    CreatePartitionRequest, CreateRaidRequest, DeletePartitionRequest, DiskApi,
    FormatPartitionRequest, OperationId, OperationKind, OperationRequest,
};
use storage_types::{SUPPORTED_RAID_LEVELS, bytes_to_mebibytes, bytes_to_pretty};
use tracing::Instrument;

use super::disambiguator::ConfirmedAction;
use crate::config::Capabilities;
use crate::error::DiskMapError;
use crate::models::Inventory;
use crate::utils::segments::LayoutPolicy;

/// What a successful operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutcome {
    pub operation: OperationKind,
    pub operation_id: OperationId,
    /// False when the service accepted the change but the follow-up reload
    /// failed; the shown inventory is then stale until the next refresh.
    pub inventory_refreshed: bool,
}

pub struct ActionOrchestrator {
    api: Arc<dyn DiskApi>,
    capabilities: Capabilities,
    policy: LayoutPolicy,
}

impl ActionOrchestrator {
    pub fn new(api: Arc<dyn DiskApi>, capabilities: Capabilities, policy: LayoutPolicy) -> Self {
        Self {
            api,
            capabilities,
            policy,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Create a partition in the disk's trailing free space.
    ///
    /// `size_bytes` is floored to whole mebibytes on the wire, so up to
    /// 1 MiB - 1 byte of the request is dropped.
    pub async fn create_partition(
        &self,
        inventory: &mut Inventory,
        disk_path: &str,
        size_bytes: u64,
        fs_type: &str,
    ) -> Result<ActionOutcome, DiskMapError> {
        self.ensure_allowed(OperationKind::CreatePartition)?;
        require_non_empty(disk_path, "No disk selected.")?;
        require_non_empty(fs_type, "Choose a filesystem type.")?;

        if size_bytes == 0 {
            return Err(DiskMapError::validation(
                "Partition size must be greater than zero.",
            ));
        }

        let layout = inventory
            .layout_for(disk_path, &self.policy)
            .ok_or_else(|| DiskMapError::validation(format!("Unknown disk {disk_path}.")))??;

        let available = layout.creatable_bytes();
        if size_bytes > available {
            return Err(DiskMapError::validation(format!(
                "Requested {} but only {} is free on {disk_path}.",
                bytes_to_pretty(size_bytes, false),
                bytes_to_pretty(available, false),
            )));
        }

        let size_mb = bytes_to_mebibytes(size_bytes);
        if size_mb == 0 {
            return Err(DiskMapError::validation(
                "Partition size must be at least 1 MiB.",
            ));
        }

        let request = OperationRequest::CreatePartition(CreatePartitionRequest {
            disk_path: disk_path.to_string(),
            size_mb,
            fs_type: fs_type.to_string(),
        });
        self.submit_and_refresh(inventory, request).await
    }

    /// Run a destructive action the operator confirmed through
    /// [`PartitionActionMachine`](super::PartitionActionMachine).
    pub async fn execute(
        &self,
        inventory: &mut Inventory,
        action: ConfirmedAction,
    ) -> Result<ActionOutcome, DiskMapError> {
        tracing::info!(partition = action.partition_path(), "running confirmed action");

        match action {
            ConfirmedAction::Format {
                partition_path,
                fs_type,
            } => {
                self.format_partition(inventory, &partition_path, &fs_type)
                    .await
            }
            ConfirmedAction::Delete { partition_path } => {
                self.delete_partition(inventory, &partition_path).await
            }
        }
    }

    async fn format_partition(
        &self,
        inventory: &mut Inventory,
        partition_path: &str,
        fs_type: &str,
    ) -> Result<ActionOutcome, DiskMapError> {
        self.ensure_allowed(OperationKind::FormatPartition)?;
        require_non_empty(partition_path, "No partition selected.")?;
        require_non_empty(fs_type, "Choose a filesystem type.")?;

        let request = OperationRequest::FormatPartition(FormatPartitionRequest {
            part_path: partition_path.to_string(),
            fs_type: fs_type.to_string(),
        });
        self.submit_and_refresh(inventory, request).await
    }

    async fn delete_partition(
        &self,
        inventory: &mut Inventory,
        partition_path: &str,
    ) -> Result<ActionOutcome, DiskMapError> {
        self.ensure_allowed(OperationKind::DeletePartition)?;
        require_non_empty(partition_path, "No partition selected.")?;

        let request = OperationRequest::DeletePartition(DeletePartitionRequest {
            part_path: partition_path.to_string(),
        });
        self.submit_and_refresh(inventory, request).await
    }

    /// Assemble a software RAID array from existing partitions or disks.
    pub async fn create_raid(
        &self,
        inventory: &mut Inventory,
        level: u8,
        devices: &[String],
    ) -> Result<ActionOutcome, DiskMapError> {
        self.ensure_allowed(OperationKind::CreateRaid)?;

        if devices.is_empty() {
            return Err(DiskMapError::validation(
                "Select at least one device for the RAID array.",
            ));
        }

        if !SUPPORTED_RAID_LEVELS.contains(&level) {
            return Err(DiskMapError::validation(format!(
                "RAID level {level} is not supported."
            )));
        }

        let mut seen = HashSet::new();
        for device in devices {
            require_non_empty(device, "Device paths must not be empty.")?;
            if !seen.insert(device.as_str()) {
                return Err(DiskMapError::validation(format!(
                    "{device} is listed more than once."
                )));
            }
        }

        let request = OperationRequest::CreateRaid(CreateRaidRequest {
            level,
            devices: devices.to_vec(),
        });
        self.submit_and_refresh(inventory, request).await
    }

    fn ensure_allowed(&self, operation: OperationKind) -> Result<(), DiskMapError> {
        if self.capabilities.allows(operation) {
            Ok(())
        } else {
            tracing::debug!(operation = operation.label(), "refused by capabilities");
            Err(DiskMapError::validation(format!(
                "The {} action is disabled in this deployment.",
                operation.label()
            )))
        }
    }

    async fn submit_and_refresh(
        &self,
        inventory: &mut Inventory,
        request: OperationRequest,
    ) -> Result<ActionOutcome, DiskMapError> {
        let operation = request.kind();
        let operation_id = OperationId::new();
        let span = tracing::info_span!(
            "operation",
            id = %operation_id,
            kind = operation.label()
        );

        async move {
            tracing::debug!(?request, "submitting");

            let result = match self.api.submit(operation_id, &request).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(error = %e, "request failed without a response");
                    return Err(DiskMapError::Fetch(e));
                }
            };

            if !result.is_success() {
                let message = result.failure_message();
                tracing::warn!(%message, "service rejected request");
                return Err(DiskMapError::RemoteOperation { operation, message });
            }

            tracing::info!("operation succeeded");

            let inventory_refreshed = match inventory.load(self.api.as_ref()).await {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "operation succeeded but inventory reload failed");
                    false
                }
            };

            Ok(ActionOutcome {
                operation,
                operation_id,
                inventory_refreshed,
            })
        }
        .instrument(span)
        .await
    }
}

fn require_non_empty(value: &str, message: &str) -> Result<(), DiskMapError> {
    if value.trim().is_empty() {
        Err(DiskMapError::validation(message))
    } else {
        Ok(())
    }
}
