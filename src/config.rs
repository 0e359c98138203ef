use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description;
use crate::detection::{BarDetector, BarFilter};
use crate::error::PreconditionError;
use crate::models::ColorRange;
use crate::partition::PartitionRules;

/// Directory created inside the working directory when no output directory is given
pub const DEFAULT_OUTPUT_DIR: &str = "Final_WhatsApp_Reports";

/// What to do when no usable TrueType font is available for the date label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFallback {
    /// Draw with the built-in block glyphs
    #[default]
    Builtin,
    /// Skip the date label entirely
    Omit,
    /// Refuse to start the batch
    Fail,
}

/// Placement and look of the date label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// `time` format description used to render today's date
    pub format: String,
    pub left: u32,
    /// Distance of the label top above the slice's bottom edge
    pub offset: u32,
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    pub color: [u8; 3],
    pub fallback: FontFallback,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            format: "[day]-[month]-[year]".to_string(),
            left: 8,
            offset: 22,
            font_path: None,
            font_size: 18.0,
            color: [0, 0, 0],
            fallback: FontFallback::default(),
        }
    }
}

impl LabelConfig {
    /// Render `date` with the configured format description
    pub fn format_date(&self, date: OffsetDateTime) -> Result<String, PreconditionError> {
        let format_error = |reason: String| PreconditionError::DateFormat {
            format: self.format.clone(),
            reason,
        };
        let description = format_description::parse_borrowed::<2>(&self.format)
            .map_err(|e| format_error(e.to_string()))?;
        date.format(&description).map_err(|e| format_error(e.to_string()))
    }

    /// Today's label, using the local offset when it can be determined
    pub fn today(&self) -> Result<String, PreconditionError> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        self.format_date(now)
    }
}

/// Everything the batch needs to know; every field has a default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    pub working_dir: PathBuf,
    pub header_name: String,
    /// Defaults to `<working_dir>/Final_WhatsApp_Reports`
    pub output_dir: Option<PathBuf>,
    pub bar_color: ColorRange,
    pub min_bar_width_fraction: f64,
    pub top_margin_fraction: f64,
    pub min_slice_height: u32,
    pub marker_tolerance: u32,
    pub label: LabelConfig,
    pub output_prefix: String,
    pub jpeg_quality: u8,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        let filter = BarFilter::default();
        let rules = PartitionRules::default();
        Self {
            working_dir: PathBuf::from("."),
            header_name: "header.jpeg".to_string(),
            output_dir: None,
            bar_color: ColorRange::default(),
            min_bar_width_fraction: filter.min_width_fraction,
            top_margin_fraction: filter.top_margin_fraction,
            min_slice_height: rules.min_slice_height,
            marker_tolerance: rules.marker_tolerance,
            label: LabelConfig::default(),
            output_prefix: "Branch".to_string(),
            jpeg_quality: 95,
        }
    }
}

impl SplitterConfig {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Self::default()
        }
    }

    /// Load a JSON config file; missing fields keep their defaults
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn header_path(&self) -> PathBuf {
        self.working_dir.join(&self.header_name)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.working_dir.join(DEFAULT_OUTPUT_DIR))
    }

    pub fn bar_detector(&self) -> BarDetector {
        BarDetector::new(
            self.bar_color,
            BarFilter {
                min_width_fraction: self.min_bar_width_fraction,
                top_margin_fraction: self.top_margin_fraction,
            },
        )
    }

    pub fn partition_rules(&self) -> PartitionRules {
        PartitionRules {
            min_slice_height: self.min_slice_height,
            marker_tolerance: self.marker_tolerance,
        }
    }

    /// File name of the report with sequence number `n`
    pub fn report_name(&self, n: u32) -> String {
        format!("{} {}.jpeg", self.output_prefix, n)
    }
}
