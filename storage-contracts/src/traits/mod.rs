// SPDX-License-Identifier: GPL-3.0-only

pub mod disk_api;

pub use disk_api::DiskApi;
