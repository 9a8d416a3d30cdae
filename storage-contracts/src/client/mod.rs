// SPDX-License-Identifier: GPL-3.0-only

//! HTTP client wrappers for the disk management API

pub mod error;
pub mod http;

pub use error::ClientError;
pub use http::{HttpDiskApi, REQUEST_ID_HEADER};
