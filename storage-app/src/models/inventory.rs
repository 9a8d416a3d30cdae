// SPDX-License-Identifier: GPL-3.0-only

//! Single-writer holder of the last fetched inventory snapshot

use storage_contracts::DiskApi;
use storage_types::{DiskInfo, InventorySnapshot, RaidCandidate};

use crate::error::DiskMapError;
use crate::utils::segments::{DiskLayout, LayoutPolicy, compute_disk_layout};

/// Owns the current [`InventorySnapshot`].
///
/// The only write path is [`Inventory::load`], which swaps in a complete new
/// snapshot; nothing is ever patched in place. A failed load keeps the
/// previous snapshot.
#[derive(Debug, Default)]
pub struct Inventory {
    snapshot: InventorySnapshot,
    generation: u64,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with an already-fetched snapshot.
    #[cfg(test)]
    pub(crate) fn from_snapshot(snapshot: InventorySnapshot) -> Self {
        Self {
            snapshot,
            generation: 1,
        }
    }

    /// Fetch a full snapshot and replace the current one.
    pub async fn load(&mut self, api: &dyn DiskApi) -> Result<&InventorySnapshot, DiskMapError> {
        match api.fetch_inventory().await {
            Ok(snapshot) => {
                tracing::info!(
                    disks = snapshot.disks.len(),
                    raids = snapshot.raids.len(),
                    "inventory loaded"
                );
                self.snapshot = snapshot;
                self.generation += 1;
                Ok(&self.snapshot)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load inventory");
                Err(DiskMapError::Fetch(e))
            }
        }
    }

    pub fn current(&self) -> &InventorySnapshot {
        &self.snapshot
    }

    /// Number of snapshots swapped in so far; zero until the first load.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Every partition across every disk, tagged with its disk's display name.
    pub fn raid_candidate_partitions(&self) -> Vec<RaidCandidate> {
        // TODO: drop mounted and RAID-member partitions once the inventory reports busy state.
        self.snapshot.raid_candidates()
    }

    /// Layout for one disk, or `None` when the disk is not in the snapshot.
    pub fn layout_for(
        &self,
        disk_path: &str,
        policy: &LayoutPolicy,
    ) -> Option<Result<DiskLayout, DiskMapError>> {
        self.snapshot
            .disk(disk_path)
            .map(|disk| compute_disk_layout(disk, policy))
    }

    /// Layout of every disk. A disk with inconsistent data yields an error in
    /// its own slot; the others are unaffected.
    pub fn layouts(&self, policy: &LayoutPolicy) -> Vec<(&DiskInfo, Result<DiskLayout, DiskMapError>)> {
        self.snapshot
            .disks
            .iter()
            .map(|disk| {
                let layout = compute_disk_layout(disk, policy);
                if let Err(e) = &layout {
                    tracing::warn!(disk = %disk.id, error = %e, "skipping layout for inconsistent disk");
                }
                (disk, layout)
            })
            .collect()
    }
}
