// SPDX-License-Identifier: GPL-3.0-only

//! Resolves a click on a partition segment into one confirmed action.
//!
//! Choosing *which* action and confirming it are two separate steps:
//!
//! ```text
//! Idle --activate--> ChoosingAction --format--> ConfirmingFormat --yes--> (format) Idle
//!                                   --delete--> ConfirmingDelete --yes--> (delete) Idle
//!                                   --cancel--> Idle
//! ```
//!
//! Any non-affirmative answer, at any step, lands back in `Idle`.

use crate::config::Capabilities;
use crate::error::DiskMapError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PartitionActionState {
    #[default]
    Idle,
    ChoosingAction {
        partition_path: String,
    },
    ConfirmingFormat {
        partition_path: String,
        fs_type: String,
    },
    ConfirmingDelete {
        partition_path: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionChoice {
    Format { fs_type: String },
    Delete,
    Cancel,
}

/// A destructive partition action the operator has explicitly confirmed.
///
/// Only [`PartitionActionMachine::confirm`] produces these, so the
/// orchestrator's destructive paths cannot be reached without a confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmedAction {
    #[non_exhaustive]
    Format {
        partition_path: String,
        fs_type: String,
    },
    #[non_exhaustive]
    Delete { partition_path: String },
}

impl ConfirmedAction {
    pub fn partition_path(&self) -> &str {
        match self {
            Self::Format { partition_path, .. } | Self::Delete { partition_path, .. } => {
                partition_path
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PartitionActionMachine {
    state: PartitionActionState,
    capabilities: Capabilities,
}

impl PartitionActionMachine {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            state: PartitionActionState::Idle,
            capabilities,
        }
    }

    pub fn state(&self) -> &PartitionActionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == PartitionActionState::Idle
    }

    /// Operator activated a partition segment.
    pub fn activate(&mut self, partition_path: &str) -> Result<(), DiskMapError> {
        if !self.capabilities.partition_mutation {
            return Err(DiskMapError::validation(
                "Partition changes are disabled in this deployment.",
            ));
        }

        if !self.is_idle() {
            return Err(DiskMapError::validation(
                "Finish or cancel the current partition action first.",
            ));
        }

        if partition_path.trim().is_empty() {
            return Err(DiskMapError::validation("No partition selected."));
        }

        tracing::debug!(partition = partition_path, "partition selected");
        self.state = PartitionActionState::ChoosingAction {
            partition_path: partition_path.to_string(),
        };
        Ok(())
    }

    /// Operator picked an action for the selected partition.
    ///
    /// Cancelling, or choosing outside `ChoosingAction`, returns to `Idle`.
    pub fn choose(&mut self, choice: ActionChoice) -> Result<(), DiskMapError> {
        let PartitionActionState::ChoosingAction { partition_path } =
            std::mem::take(&mut self.state)
        else {
            return match choice {
                ActionChoice::Cancel => Ok(()),
                _ => Err(DiskMapError::validation("No partition selected.")),
            };
        };

        self.state = match choice {
            ActionChoice::Format { fs_type } => {
                if fs_type.trim().is_empty() {
                    return Err(DiskMapError::validation(
                        "Choose a filesystem type to format with.",
                    ));
                }
                PartitionActionState::ConfirmingFormat {
                    partition_path,
                    fs_type,
                }
            }
            ActionChoice::Delete => PartitionActionState::ConfirmingDelete { partition_path },
            ActionChoice::Cancel => PartitionActionState::Idle,
        };
        Ok(())
    }

    /// Operator answered the "are you sure" prompt.
    ///
    /// Always ends in `Idle`; returns the action to run only on an
    /// affirmative answer in a confirming state.
    pub fn confirm(&mut self, confirmed: bool) -> Option<ConfirmedAction> {
        let state = std::mem::take(&mut self.state);
        if !confirmed {
            return None;
        }

        match state {
            PartitionActionState::ConfirmingFormat {
                partition_path,
                fs_type,
            } => Some(ConfirmedAction::Format {
                partition_path,
                fs_type,
            }),
            PartitionActionState::ConfirmingDelete { partition_path } => {
                Some(ConfirmedAction::Delete { partition_path })
            }
            PartitionActionState::Idle | PartitionActionState::ChoosingAction { .. } => None,
        }
    }

    pub fn cancel(&mut self) {
        self.state = PartitionActionState::Idle;
    }
}
