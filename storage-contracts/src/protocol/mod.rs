// SPDX-License-Identifier: GPL-3.0-only

pub mod error;
pub mod id;
pub mod operations;

pub use error::{OperationResult, STATUS_SUCCESS};
pub use id::OperationId;
pub use operations::{
    CreatePartitionRequest, CreateRaidRequest, DeletePartitionRequest, FormatPartitionRequest,
    INVENTORY_ENDPOINT, OperationKind, OperationRequest,
};
