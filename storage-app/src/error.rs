// SPDX-License-Identifier: GPL-3.0-only

use storage_contracts::{ClientError, OperationKind};
use thiserror::Error;

/// Every failure the layout and action engine reports.
///
/// None of these are fatal; each is recoverable by retrying the action that
/// triggered it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiskMapError {
    /// A local precondition failed; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// No structured response: transport or parse failure.
    #[error("disk service unreachable: {0}")]
    Fetch(#[from] ClientError),

    /// The service answered with a failure status.
    #[error("{} failed: {message}", .operation.label())]
    RemoteOperation {
        operation: OperationKind,
        message: String,
    },

    /// Snapshot data violates the partition-size invariant for one disk.
    #[error("disk {disk} reports {allocated} bytes of partitions on a {size} byte disk")]
    InvalidDiskState {
        disk: String,
        allocated: u64,
        size: u64,
    },
}

impl DiskMapError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Text to show the operator.
    ///
    /// Validation and remote failures are passed through verbatim; transport
    /// failures get a generic message and are expected to be logged in full.
    pub fn operator_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::RemoteOperation { message, .. } => message.clone(),
            Self::Fetch(_) => {
                "Could not reach the disk management service. Please try again.".to_string()
            }
            Self::InvalidDiskState { disk, .. } => {
                format!("The layout of {disk} is inconsistent and cannot be displayed.")
            }
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}
