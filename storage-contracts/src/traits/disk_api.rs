// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;

use storage_types::InventorySnapshot;

use crate::client::ClientError;
use crate::protocol::{OperationId, OperationRequest, OperationResult};

/// The remote disk management API.
///
/// Implementations perform the real partition-table and filesystem work; the
/// caller only sequences requests and interprets results. `Err` means no
/// structured answer arrived; a failed mutation the server did answer comes
/// back as `Ok` with a non-success [`OperationResult`].
#[async_trait]
pub trait DiskApi: Send + Sync {
    async fn fetch_inventory(&self) -> Result<InventorySnapshot, ClientError>;

    async fn submit(
        &self,
        operation_id: OperationId,
        request: &OperationRequest,
    ) -> Result<OperationResult, ClientError>;
}
