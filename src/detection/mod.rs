pub mod color;
pub mod contours;
pub mod bars;

use image::{DynamicImage, GrayImage};
use crate::error::DecodeError;
use crate::models::{ColorRange, Region};
pub use bars::BarFilter;

/// Finds sub-total bars in a screenshot and reports where to cut it
#[derive(Debug, Clone, Default)]
pub struct BarDetector {
    pub color: ColorRange,
    pub filter: BarFilter,
}

impl BarDetector {
    pub fn new(color: ColorRange, filter: BarFilter) -> Self {
        Self { color, filter }
    }

    /// Colour mask of the bar colour
    pub fn mask(&self, img: &DynamicImage) -> Result<GrayImage, DecodeError> {
        color::detect(img, &self.color)
    }

    /// All connected regions of the bar colour (for debugging)
    pub fn regions(&self, img: &DynamicImage) -> Result<Vec<Region>, DecodeError> {
        Ok(contours::find_regions(&self.mask(img)?))
    }

    /// Regions that pass the bar filter (for debugging)
    pub fn bars(&self, img: &DynamicImage) -> Result<Vec<Region>, DecodeError> {
        let regions = self.regions(img)?;
        Ok(bars::filter_bars(&regions, img.width(), img.height(), &self.filter))
    }

    /// Sorted, unique cut points below each detected bar
    pub fn cut_points(&self, img: &DynamicImage) -> Result<Vec<u32>, DecodeError> {
        let mask = self.mask(img)?;
        Ok(self.cut_points_from_mask(&mask))
    }

    pub fn cut_points_from_mask(&self, mask: &GrayImage) -> Vec<u32> {
        bars::extract(mask, mask.width(), mask.height(), &self.filter)
    }
}
