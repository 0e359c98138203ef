use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GrayImage, ImageReader};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use crate::compose::{label, DateStamp, ReportComposer};
use crate::config::SplitterConfig;
use crate::detection::color;
use crate::error::{DecodeError, ImageError, PreconditionError};
use crate::models::Report;
use crate::partition::partition;

/// File extensions (case-insensitive) picked up as screenshots
pub const SCREENSHOT_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Debug configuration for batch execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// What happened to one input screenshot
#[derive(Debug)]
pub struct ImageOutcome {
    pub source: PathBuf,
    /// Reports written for this image, in slice order
    pub reports: Vec<PathBuf>,
    /// Set when the image was skipped, entirely or after its last report
    pub error: Option<ImageError>,
}

impl ImageOutcome {
    fn new(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            reports: Vec::new(),
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Structured result of a whole batch
#[derive(Debug)]
pub struct BatchReport {
    /// One entry per screenshot, in processing order
    pub outcomes: Vec<ImageOutcome>,
    /// Number of reports written
    pub produced: usize,
    /// Sequence number the next report would have received
    pub next_sequence: u32,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &ImageError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error.as_ref().map(|e| (o.source.as_path(), e)))
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// All written report paths, in sequence order
    pub fn reports(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().flat_map(|o| o.reports.iter().map(PathBuf::as_path))
    }
}

/// Lists screenshots in `dir`, skipping the header, in lexical file name order
pub fn discover_screenshots(dir: &Path, header_name: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut screenshots = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !has_screenshot_extension(&path) {
            continue;
        }
        let is_header = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.to_lowercase() == header_name.to_lowercase());
        if !is_header {
            screenshots.push(path);
        }
    }

    screenshots.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(screenshots)
}

fn has_screenshot_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SCREENSHOT_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Decode an image file, sniffing the format from its contents
pub fn load_image(path: &Path) -> Result<DynamicImage, DecodeError> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(img)
}

/// Encode a report as JPEG
pub fn save_report(report: &Report, path: &Path, quality: u8) -> Result<(), ImageError> {
    let save_error = |source: image::ImageError| ImageError::Save {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|e| save_error(image::ImageError::IoError(e)))?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode_image(&report.image)
        .map_err(save_error)?;
    writer.flush().map_err(|e| save_error(image::ImageError::IoError(e)))?;
    Ok(())
}

/// Splits every screenshot of a working directory into branch reports
pub struct BatchPipeline {
    config: SplitterConfig,
    date_label: Option<String>,
    debug: Option<DebugConfig>,
}

impl BatchPipeline {
    pub fn new(config: SplitterConfig) -> Self {
        Self {
            config,
            date_label: None,
            debug: None,
        }
    }

    /// Use a fixed date label instead of today's date
    pub fn with_date_label(mut self, label: impl Into<String>) -> Self {
        self.date_label = Some(label.into());
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self, PreconditionError> {
        let dir_error = |source: std::io::Error| PreconditionError::OutputDir {
            path: output_dir.clone(),
            source,
        };

        if output_dir.exists() {
            let mut entries = std::fs::read_dir(&output_dir).map_err(dir_error)?;
            if entries.next().is_some() {
                return Err(PreconditionError::DebugDirNotEmpty(output_dir));
            }
        } else {
            std::fs::create_dir_all(&output_dir).map_err(dir_error)?;
        }

        self.debug = Some(DebugConfig { output_dir });

        Ok(self)
    }

    /// Check preconditions, then process every screenshot in order.
    ///
    /// Only precondition failures are returned as errors. Per-image failures are
    /// recorded in the returned [`BatchReport`] and the batch moves on.
    pub fn run(&self) -> Result<BatchReport, PreconditionError> {
        let composer = self.prepare()?;

        let working_dir = &self.config.working_dir;
        let output_dir = self.config.output_dir();
        std::fs::create_dir_all(&output_dir).map_err(|source| PreconditionError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

        let screenshots = discover_screenshots(working_dir, &self.config.header_name)
            .map_err(|source| PreconditionError::ReadDir {
                path: working_dir.clone(),
                source,
            })?;

        info!(
            "Splitting {} screenshot(s) from {} into {}",
            screenshots.len(),
            working_dir.display(),
            output_dir.display()
        );

        let mut next_sequence = 1;
        let mut outcomes = Vec::with_capacity(screenshots.len());

        for path in &screenshots {
            let outcome = self.process_image(path, &composer, &output_dir, next_sequence);
            next_sequence += outcome.reports.len() as u32;
            outcomes.push(outcome);
        }

        let report = BatchReport {
            produced: (next_sequence - 1) as usize,
            next_sequence,
            outcomes,
        };

        info!(
            "Batch complete: {} report(s) produced, {} image(s) failed",
            report.produced,
            report.failure_count()
        );

        Ok(report)
    }

    /// Validate inputs and build the composer shared by every image
    fn prepare(&self) -> Result<ReportComposer, PreconditionError> {
        let working_dir = &self.config.working_dir;
        if !working_dir.is_dir() {
            return Err(PreconditionError::MissingWorkingDir(working_dir.clone()));
        }

        let header_path = self.config.header_path();
        if !header_path.is_file() {
            return Err(PreconditionError::MissingHeader(header_path));
        }
        let header = load_image(&header_path)
            .and_then(|img| color::to_rgb(&img))
            .map_err(|source| PreconditionError::UnreadableHeader {
                path: header_path.clone(),
                source,
            })?;

        let label_config = &self.config.label;
        let stamp = match label::resolve_renderer(label_config)? {
            Some(renderer) => {
                let text = match &self.date_label {
                    Some(text) => text.clone(),
                    None => label_config.today()?,
                };
                let missing = label::unsupported_chars(renderer.as_ref(), &text);
                if !missing.is_empty() {
                    return Err(PreconditionError::UnrenderableLabel {
                        text,
                        renderer: renderer.name().to_string(),
                        missing,
                    });
                }
                debug!("Date label {text:?} drawn with {}", renderer.name());
                let [r, g, b] = label_config.color;
                Some(DateStamp {
                    text,
                    renderer,
                    left: label_config.left,
                    offset: label_config.offset,
                    color: image::Rgb([r, g, b]),
                })
            }
            None => {
                debug!("Date labels disabled");
                None
            }
        };

        Ok(ReportComposer::new(header, stamp))
    }

    /// Split one screenshot, numbering its reports from `first_sequence`.
    ///
    /// Never fails: errors end up in the outcome, after any reports already written.
    pub fn process_image(
        &self,
        path: &Path,
        composer: &ReportComposer,
        output_dir: &Path,
        first_sequence: u32,
    ) -> ImageOutcome {
        let name = display_name(path);
        info!("Processing {name}");

        let mut outcome = ImageOutcome::new(path);
        if let Err(error) = self.split_image(path, composer, output_dir, first_sequence, &mut outcome.reports) {
            warn!("Error on {name}: {error}");
            outcome.error = Some(error);
        }
        outcome
    }

    fn split_image(
        &self,
        path: &Path,
        composer: &ReportComposer,
        output_dir: &Path,
        first_sequence: u32,
        written: &mut Vec<PathBuf>,
    ) -> Result<(), ImageError> {
        let img = load_image(path)?;
        let rgb = color::to_rgb(&img)?;
        drop(img);

        let detector = self.config.bar_detector();
        let mask = color::mask_rgb(&rgb, &detector.color);
        self.save_debug_mask(path, &mask);

        let cuts = detector.cut_points_from_mask(&mask);
        let slices = partition(&cuts, rgb.height(), &self.config.partition_rules());
        debug!(
            "{}x{}: {} cut point(s) {:?}, {} slice(s)",
            rgb.width(),
            rgb.height(),
            cuts.len(),
            cuts,
            slices.len()
        );

        if slices.is_empty() {
            return Ok(());
        }

        let header = composer.header_for(rgb.width())?;
        for slice in &slices {
            let report = composer.compose_with_header(&rgb, slice, &header)?;

            let sequence = first_sequence + written.len() as u32;
            let file_name = self.config.report_name(sequence);
            let output_path = output_dir.join(&file_name);
            save_report(&report, &output_path, self.config.jpeg_quality)?;

            info!("Saved {file_name} (rows {}..{})", slice.top, slice.bottom);
            written.push(output_path);
        }

        Ok(())
    }

    /// Save the bar mask in debug mode; failures here never affect the batch
    fn save_debug_mask(&self, source: &Path, mask: &GrayImage) {
        let Some(debug_config) = &self.debug else {
            return;
        };

        let mask_dir = debug_config.output_dir.join("masks");
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let output_path = mask_dir.join(format!("{stem}.png"));

        let result = std::fs::create_dir_all(&mask_dir)
            .map_err(image::ImageError::IoError)
            .and_then(|()| mask.save(&output_path));
        match result {
            Ok(()) => debug!("Debug: saved masks/{stem}.png"),
            Err(e) => warn!("Failed to save debug mask {}: {e}", output_path.display()),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
