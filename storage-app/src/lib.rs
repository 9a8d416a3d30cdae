// SPDX-License-Identifier: GPL-3.0-only

//! Disk layout map and partition/RAID action engine.
//!
//! - [`utils::segments`] turns a disk and its partitions into drawable segments
//! - [`models::Inventory`] owns the last fetched snapshot
//! - [`actions::ActionOrchestrator`] validates, submits and refreshes mutations
//! - [`actions::PartitionActionMachine`] separates choosing an action from confirming it

pub mod actions;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod utils;
pub mod views;

pub use error::DiskMapError;
