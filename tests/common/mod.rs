#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from branch_splitter for tests
pub use branch_splitter::{
    BatchPipeline, BatchReport, ColorRange, ImageError, PartitionRules, PreconditionError, Slice,
    SplitterConfig,
};
