// SPDX-License-Identifier: GPL-3.0-only

//! Disk layout computation.
//!
//! Turns one disk's size and its ordered partition list into renderable
//! segments: every partition in physical order, followed by at most one
//! trailing free-space segment. Only a single trailing gap is modelled; free
//! space before or between partitions is not representable here because the
//! inventory carries sizes, not offsets.

use serde::{Deserialize, Serialize};
use storage_types::{DiskInfo, MIB, PartitionInfo};

use crate::error::DiskMapError;

/// Smallest share of the bar a partition is drawn with.
pub const DEFAULT_MIN_VISIBLE_FRACTION: f64 = 0.01;

/// Unallocated space at or below this is alignment/metadata slack, not free space.
pub const DEFAULT_FREE_SPACE_THRESHOLD: u64 = 50 * MIB;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutPolicy {
    pub min_visible_fraction: f64,
    pub free_space_threshold_bytes: u64,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            min_visible_fraction: DEFAULT_MIN_VISIBLE_FRACTION,
            free_space_threshold_bytes: DEFAULT_FREE_SPACE_THRESHOLD,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiskSegmentKind {
    Partition,
    FreeSpace,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiskSegment {
    pub kind: DiskSegmentKind,
    pub size: u64,
    /// `size / disk_size`, unclamped
    pub width_fraction: f64,
    /// Width to draw; never below the policy's visibility floor for partitions
    pub rendered_fraction: f64,
    /// Index into the disk's partition list
    pub partition_id: Option<usize>,
}

impl DiskSegment {
    pub fn free_space(size: u64, width_fraction: f64) -> Self {
        Self {
            kind: DiskSegmentKind::FreeSpace,
            size,
            width_fraction,
            rendered_fraction: width_fraction,
            partition_id: None,
        }
    }

    pub fn partition(id: usize, size: u64, width_fraction: f64, min_visible: f64) -> Self {
        Self {
            kind: DiskSegmentKind::Partition,
            size,
            width_fraction,
            rendered_fraction: width_fraction.max(min_visible),
            partition_id: Some(id),
        }
    }

    pub fn is_free_space(&self) -> bool {
        self.kind == DiskSegmentKind::FreeSpace
    }

    /// Resolve the partition this segment draws, if any.
    pub fn partition_in<'a>(&self, disk: &'a DiskInfo) -> Option<&'a PartitionInfo> {
        self.partition_id.and_then(|id| disk.partitions.get(id))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DiskLayout {
    pub disk_size: u64,
    pub allocated: u64,
    pub segments: Vec<DiskSegment>,
}

impl DiskLayout {
    /// Size of the trailing free segment, if one was emitted.
    pub fn free_space(&self) -> Option<u64> {
        self.segments
            .iter()
            .find(|s| s.is_free_space())
            .map(|s| s.size)
    }

    /// Space a new partition may claim: the free segment, or nothing.
    pub fn creatable_bytes(&self) -> u64 {
        self.free_space().unwrap_or(0)
    }
}

/// Compute the renderable layout of one disk.
///
/// A zero-sized disk yields zero segments. Partitions that together exceed
/// the disk size are a data-integrity failure reported as
/// [`DiskMapError::InvalidDiskState`]; no negative segment is produced.
pub fn compute_disk_layout(
    disk: &DiskInfo,
    policy: &LayoutPolicy,
) -> Result<DiskLayout, DiskMapError> {
    let allocated = disk.allocated_bytes();
    let Some(remaining) = disk.unallocated_bytes() else {
        return Err(DiskMapError::InvalidDiskState {
            disk: disk.id.clone(),
            allocated,
            size: disk.size_bytes,
        });
    };

    if disk.size_bytes == 0 {
        return Ok(DiskLayout {
            disk_size: 0,
            allocated,
            segments: Vec::new(),
        });
    }

    let disk_size = disk.size_bytes as f64;
    let mut segments: Vec<DiskSegment> = disk
        .partitions
        .iter()
        .enumerate()
        .map(|(id, part)| {
            DiskSegment::partition(
                id,
                part.size_bytes,
                part.size_bytes as f64 / disk_size,
                policy.min_visible_fraction,
            )
        })
        .collect();

    if remaining > policy.free_space_threshold_bytes {
        segments.push(DiskSegment::free_space(remaining, remaining as f64 / disk_size));
    }

    Ok(DiskLayout {
        disk_size: disk.size_bytes,
        allocated,
        segments,
    })
}
