// SPDX-License-Identifier: GPL-3.0-only

mod disk_map;

pub use disk_map::{render_inventory, render_raid_candidates};
