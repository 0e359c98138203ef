pub mod label;

use image::imageops::{self, FilterType};
use image::{GenericImage, Rgb, RgbImage};
use std::sync::Arc;
use crate::error::CompositionError;
use crate::models::{Report, Slice};
pub use label::{BlockRenderer, GlyphRenderer, LabelRenderer};

/// Date text burned into slices that end on a sub-total bar
#[derive(Clone)]
pub struct DateStamp {
    pub text: String,
    pub renderer: Arc<dyn LabelRenderer>,
    /// Distance from the crop's left edge
    pub left: u32,
    /// Distance of the text top above the crop's bottom edge
    pub offset: u32,
    pub color: Rgb<u8>,
}

impl DateStamp {
    pub fn apply(&self, crop: &mut RgbImage) {
        let y = i64::from(crop.height()) - i64::from(self.offset);
        let y = y.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        let x = i32::try_from(self.left).unwrap_or(i32::MAX);
        self.renderer.draw(crop, x, y, &self.text, self.color);
    }
}

/// Full-width rows `slice.top..slice.bottom` of the source
pub fn crop_slice(source: &RgbImage, slice: &Slice) -> Result<RgbImage, CompositionError> {
    if slice.top >= slice.bottom || slice.bottom > source.height() {
        return Err(CompositionError::SliceOutOfBounds {
            top: slice.top,
            bottom: slice.bottom,
            height: source.height(),
        });
    }
    Ok(imageops::crop_imm(source, 0, slice.top, source.width(), slice.height()).to_image())
}

/// Scale the header to `width`, keeping its aspect ratio
pub fn resize_header(header: &RgbImage, width: u32) -> Result<RgbImage, CompositionError> {
    let (header_width, header_height) = header.dimensions();
    if header_width == 0 || header_height == 0 {
        return Err(CompositionError::EmptyHeader {
            width: header_width,
            height: header_height,
        });
    }

    let ratio = f64::from(width) / f64::from(header_width);
    let height = ((f64::from(header_height) * ratio) as u32).max(1);

    if (width, height) == (header_width, header_height) {
        return Ok(header.clone());
    }
    Ok(imageops::resize(header, width, height, FilterType::Lanczos3))
}

/// Stack `top` directly above `bottom` on a fresh canvas
pub fn stack(top: &RgbImage, bottom: &RgbImage) -> Result<RgbImage, CompositionError> {
    let mut canvas = RgbImage::new(bottom.width(), top.height() + bottom.height());
    canvas
        .copy_from(top, 0, 0)
        .map_err(|source| CompositionError::Paste { part: "header", source })?;
    canvas
        .copy_from(bottom, 0, top.height())
        .map_err(|source| CompositionError::Paste { part: "slice", source })?;
    Ok(canvas)
}

/// Build one report: crop, stamp (when the slice ends on a bar), stack under the header
pub fn compose(
    source: &RgbImage,
    slice: &Slice,
    header: &RgbImage,
    stamp: Option<&DateStamp>,
) -> Result<Report, CompositionError> {
    let resized = resize_header(header, source.width())?;
    compose_with_header(source, slice, &resized, stamp)
}

/// Like [`compose`], with a header already resized to the source width
pub fn compose_with_header(
    source: &RgbImage,
    slice: &Slice,
    resized_header: &RgbImage,
    stamp: Option<&DateStamp>,
) -> Result<Report, CompositionError> {
    let mut crop = crop_slice(source, slice)?;

    if slice.ends_on_marker {
        if let Some(stamp) = stamp {
            stamp.apply(&mut crop);
        }
    }

    Ok(Report {
        image: stack(resized_header, &crop)?,
        header_height: resized_header.height(),
        slice: *slice,
    })
}

/// Shared header plus optional date stamp, applied to every slice of a batch
pub struct ReportComposer {
    header: RgbImage,
    stamp: Option<DateStamp>,
}

impl ReportComposer {
    pub fn new(header: RgbImage, stamp: Option<DateStamp>) -> Self {
        Self { header, stamp }
    }

    /// Header resized for sources of the given width; compute once per source image
    pub fn header_for(&self, width: u32) -> Result<RgbImage, CompositionError> {
        resize_header(&self.header, width)
    }

    pub fn compose(&self, source: &RgbImage, slice: &Slice) -> Result<Report, CompositionError> {
        compose(source, slice, &self.header, self.stamp.as_ref())
    }

    pub fn compose_with_header(
        &self,
        source: &RgbImage,
        slice: &Slice,
        resized_header: &RgbImage,
    ) -> Result<Report, CompositionError> {
        compose_with_header(source, slice, resized_header, self.stamp.as_ref())
    }
}
