use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions checked before any screenshot is processed
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("working directory not found: {}", .0.display())]
    MissingWorkingDir(PathBuf),

    #[error("header image not found: {}", .0.display())]
    MissingHeader(PathBuf),

    #[error("header image {} could not be decoded: {source}", path.display())]
    UnreadableHeader {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("failed to prepare output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list working directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("debug directory is not empty: {}", .0.display())]
    DebugDirNotEmpty(PathBuf),

    #[error("label font {} unavailable: {reason}", path.display())]
    Font { path: PathBuf, reason: String },

    #[error("no label font configured and fallback policy is `fail`")]
    NoFont,

    #[error("date label {text:?} has characters the {renderer} cannot draw: {missing:?}")]
    UnrenderableLabel {
        text: String,
        renderer: String,
        missing: Vec<char>,
    },

    #[error("invalid date label format {format:?}: {reason}")]
    DateFormat { format: String, reason: String },
}

/// A screenshot (or the header) could not be turned into RGB pixels
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Building a report out of an already decoded screenshot failed
#[derive(Debug, Error)]
pub enum CompositionError {
    #[error("slice {top}..{bottom} lies outside a source image of height {height}")]
    SliceOutOfBounds { top: u32, bottom: u32, height: u32 },

    #[error("header image has no pixels ({width}x{height})")]
    EmptyHeader { width: u32, height: u32 },

    #[error("failed to paste {part} into report canvas: {source}")]
    Paste {
        part: &'static str,
        #[source]
        source: image::ImageError,
    },
}

/// Everything that can go wrong with a single input image.
/// Never aborts the batch; collected into the image's outcome instead.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error("failed to save report {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
