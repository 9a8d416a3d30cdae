// SPDX-License-Identifier: GPL-3.0-only

//! Canonical inventory models for diskmap
//!
//! This crate defines the data shapes exchanged with the remote disk
//! management API and consumed by the layout and action engine:
//!
//! - `DiskInfo` → physical disk with its partitions in on-disk order
//! - `PartitionInfo` → sized region of a disk, optionally formatted and mounted
//! - `RaidArrayInfo` → software RAID array and its member devices
//! - `InventorySnapshot` → everything returned by one inventory query
//!
//! It also carries the pure presentation helpers (byte formatting and
//! filesystem classification) so every consumer renders sizes the same way.

pub mod common;
pub mod disk;
pub mod filesystem;
pub mod inventory;
pub mod partition;
pub mod raid;

pub use common::{
    BYTE_UNITS, GIB, KIB, MIB, bytes_to_mebibytes, bytes_to_pretty, format_bytes, parse_size,
};
pub use disk::DiskInfo;
pub use filesystem::{FREE_SPACE_COLOR, FilesystemCategory, classify_filesystem};
pub use inventory::{InventorySnapshot, RaidCandidate};
pub use partition::PartitionInfo;
pub use raid::{RaidArrayInfo, SUPPORTED_RAID_LEVELS};
