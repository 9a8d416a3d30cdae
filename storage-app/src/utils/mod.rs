pub mod segments;

// Explicit exports from segments module
pub use segments::{
    DiskLayout, DiskSegment, DiskSegmentKind, LayoutPolicy, compute_disk_layout,
};
