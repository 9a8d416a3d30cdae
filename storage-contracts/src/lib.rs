// SPDX-License-Identifier: GPL-3.0-only

pub mod client;
pub mod protocol;
pub mod traits;

pub use client::{ClientError, HttpDiskApi};
pub use protocol::{
    CreatePartitionRequest, CreateRaidRequest, DeletePartitionRequest, FormatPartitionRequest,
    OperationId, OperationKind, OperationRequest, OperationResult,
};
pub use traits::DiskApi;
