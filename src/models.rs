use image::RgbImage;
use serde::{Deserialize, Serialize};

/// HSV triple in the 8-bit OpenCV convention: H in 0..180, S and V in 0..=255
pub type Hsv = [u8; 3];

/// Inclusive HSV bounds defining which pixels belong to a marker bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    pub low: Hsv,
    pub high: Hsv,
}

impl ColorRange {
    pub const fn new(low: Hsv, high: Hsv) -> Self {
        Self { low, high }
    }

    /// The blue sub-total bar of the branch report
    pub const fn subtotal_blue() -> Self {
        Self::new([85, 40, 40], [135, 255, 255])
    }

    pub fn contains(&self, hsv: Hsv) -> bool {
        (0..3).all(|c| self.low[c] <= hsv[c] && hsv[c] <= self.high[c])
    }
}

impl Default for ColorRange {
    fn default() -> Self {
        Self::subtotal_blue()
    }
}

/// Bounding box of one connected component of a colour mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Region {
    pub fn x(&self) -> u32 {
        self.min_x
    }

    pub fn y(&self) -> u32 {
        self.min_y
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Row just below the region, where a section ending on this bar is cut
    pub fn bottom(&self) -> u32 {
        self.max_y + 1
    }
}

/// Vertical range `top..bottom` of a source image holding one branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub top: u32,
    pub bottom: u32,
    /// The slice's bottom edge coincides with a detected bar
    pub ends_on_marker: bool,
}

impl Slice {
    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// Header stacked above one slice, ready to be encoded
#[derive(Debug, Clone)]
pub struct Report {
    pub image: RgbImage,
    pub header_height: u32,
    pub slice: Slice,
}

impl Report {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
