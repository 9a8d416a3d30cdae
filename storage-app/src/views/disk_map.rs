// SPDX-License-Identifier: GPL-3.0-only

//! Plain-text rendering of the disk map.

use std::fmt::Write as _;

use storage_types::{DiskInfo, FilesystemCategory, RaidArrayInfo, RaidCandidate, bytes_to_pretty};

use crate::error::DiskMapError;
use crate::models::Inventory;
use crate::utils::segments::{DiskLayout, LayoutPolicy};

const FREE_GLYPH: char = '.';

fn category_glyph(category: FilesystemCategory) -> char {
    match category {
        FilesystemCategory::Ext4 => '#',
        FilesystemCategory::Ntfs => '=',
        FilesystemCategory::Fat32 => '+',
        FilesystemCategory::Swap => '~',
        FilesystemCategory::Unknown => '?',
        FilesystemCategory::Other => '%',
    }
}

/// Render every disk, then the RAID arrays.
///
/// A disk whose layout cannot be computed gets a warning line in place of its
/// bar; the rest of the map still renders.
pub fn render_inventory(inventory: &Inventory, policy: &LayoutPolicy, width: usize) -> String {
    let snapshot = inventory.current();
    let mut out = String::new();

    if snapshot.disks.is_empty() {
        out.push_str("No disks found.\n");
    }

    for (disk, layout) in inventory.layouts(policy) {
        render_disk(&mut out, disk, layout, width);
        out.push('\n');
    }

    if !snapshot.raids.is_empty() {
        out.push_str("RAID arrays:\n");
        for array in &snapshot.raids {
            render_raid(&mut out, array);
        }
    }

    out
}

fn render_disk(
    out: &mut String,
    disk: &DiskInfo,
    layout: Result<DiskLayout, DiskMapError>,
    width: usize,
) {
    let mut badges = String::new();
    if disk.is_system_disk {
        badges.push_str(" [system]");
    }
    if disk.is_removable {
        badges.push_str(" [removable]");
    }

    let _ = writeln!(
        out,
        "{} ({})  {}{}",
        disk.display_name(),
        disk.id,
        bytes_to_pretty(disk.size_bytes, false),
        badges
    );

    let layout = match layout {
        Ok(layout) => layout,
        Err(e) => {
            let _ = writeln!(out, "  ! {}", e.operator_message());
            return;
        }
    };

    if layout.segments.is_empty() {
        out.push_str("  (no layout)\n");
        return;
    }

    let _ = writeln!(out, "  [{}]", render_bar(disk, &layout, width));

    for segment in &layout.segments {
        match segment.partition_in(disk) {
            Some(part) => {
                let _ = write!(
                    out,
                    "  {} {:<16} {:>12}  {}",
                    category_glyph(part.category()),
                    part.path,
                    bytes_to_pretty(segment.size, false),
                    part.filesystem_label()
                );
                if let Some(mount) = part.mount_point.as_deref().filter(|_| part.is_mounted()) {
                    let _ = write!(out, "  on {mount}");
                }
                out.push('\n');
            }
            None => {
                let _ = writeln!(
                    out,
                    "  {} {:<16} {:>12}",
                    FREE_GLYPH,
                    "free space",
                    bytes_to_pretty(segment.size, false)
                );
            }
        }
    }
}

/// One character cell per `1 / width` of the disk. Every segment gets at
/// least one cell; overflow from the visibility floor is taken back from the
/// widest segments.
fn render_bar(disk: &DiskInfo, layout: &DiskLayout, width: usize) -> String {
    let width = width.max(layout.segments.len());

    let mut cells: Vec<usize> = layout
        .segments
        .iter()
        .map(|s| ((s.rendered_fraction * width as f64).round() as usize).max(1))
        .collect();

    while cells.iter().sum::<usize>() > width {
        let Some(widest) = cells
            .iter_mut()
            .filter(|c| **c > 1)
            .max_by_key(|c| **c)
        else {
            break;
        };
        *widest -= 1;
    }

    layout
        .segments
        .iter()
        .zip(cells)
        .flat_map(|(segment, count)| {
            let glyph = segment
                .partition_in(disk)
                .map(|p| category_glyph(p.category()))
                .unwrap_or(FREE_GLYPH);
            std::iter::repeat_n(glyph, count)
        })
        .collect()
}

fn render_raid(out: &mut String, array: &RaidArrayInfo) {
    let state = if array.is_degraded() {
        format!("{} [degraded]", array.state)
    } else {
        array.state.clone()
    };

    let _ = writeln!(
        out,
        "  {:<12} {:<7} {:>12}  {}  ({})",
        array.path,
        array.level_name(),
        bytes_to_pretty(array.size_bytes, false),
        state,
        array.devices.join(", ")
    );
}

/// One line per partition that may join a RAID array.
pub fn render_raid_candidates(candidates: &[RaidCandidate]) -> String {
    if candidates.is_empty() {
        return "No partitions available.\n".to_string();
    }

    let mut out = String::new();
    for candidate in candidates {
        let _ = writeln!(
            out,
            "{:<16} {:>12}  {:<8} on {}",
            candidate.partition.path,
            bytes_to_pretty(candidate.partition.size_bytes, false),
            candidate.partition.filesystem_label(),
            candidate.disk_name
        );
    }
    out
}
