pub mod compose;
pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod partition;
pub mod pipeline;

pub use compose::{DateStamp, ReportComposer};
pub use config::{FontFallback, LabelConfig, SplitterConfig};
pub use detection::{BarDetector, BarFilter};
pub use error::{CompositionError, DecodeError, ImageError, PreconditionError};
pub use models::{ColorRange, Region, Report, Slice};
pub use partition::{partition, PartitionRules};
pub use pipeline::{BatchPipeline, BatchReport, DebugConfig, ImageOutcome};
