use image::GrayImage;
use std::collections::BTreeSet;
use crate::detection::contours;
use crate::models::Region;

/// Geometric thresholds a mask region must pass to count as a full-width bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarFilter {
    /// Region width must exceed this share of the image width
    pub min_width_fraction: f64,
    /// Region top must lie below this share of the image height
    pub top_margin_fraction: f64,
}

impl Default for BarFilter {
    fn default() -> Self {
        Self {
            min_width_fraction: 0.4,
            top_margin_fraction: 0.05,
        }
    }
}

impl BarFilter {
    pub fn is_bar(&self, region: &Region, image_width: u32, image_height: u32) -> bool {
        f64::from(region.width()) > self.min_width_fraction * f64::from(image_width)
            && f64::from(region.y()) > self.top_margin_fraction * f64::from(image_height)
    }
}

/// Keep only the regions that look like sub-total bars
pub fn filter_bars(
    regions: &[Region],
    image_width: u32,
    image_height: u32,
    filter: &BarFilter,
) -> Vec<Region> {
    regions
        .iter()
        .filter(|r| filter.is_bar(r, image_width, image_height))
        .cloned()
        .collect()
}

/// Bottom edges of the given bars, sorted and deduplicated
pub fn cut_points(bars: &[Region]) -> Vec<u32> {
    bars.iter()
        .map(Region::bottom)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Full boundary extraction: regions, bar filter, cut points
pub fn extract(
    mask: &GrayImage,
    image_width: u32,
    image_height: u32,
    filter: &BarFilter,
) -> Vec<u32> {
    let regions = contours::find_regions(mask);
    cut_points(&filter_bars(&regions, image_width, image_height, filter))
}
