use branch_splitter::SplitterConfig;
use image::{Rgb, RgbImage};
use std::path::Path;

/// Blue used for synthetic sub-total bars (HSV [112, 209, 220])
pub const BAR_BLUE: Rgb<u8> = Rgb([40, 90, 220]);
pub const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
pub const INK: Rgb<u8> = Rgb([0, 0, 0]);

pub const HEADER_NAME: &str = "header.jpeg";
pub const FIXED_DATE: &str = "18-10-2026";

/// White screenshot with no bars
pub fn blank_screenshot(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, PAPER)
}

/// Paint a bar of `height` rows starting at row `y`, spanning `x..x + width`
pub fn paint_bar(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32) {
    for row in y..y + height {
        for col in x..x + width {
            img.put_pixel(col, row, BAR_BLUE);
        }
    }
}

/// Screenshot with full-width bars at the given (top, height) positions
pub fn screenshot_with_bars(width: u32, height: u32, bars: &[(u32, u32)]) -> RgbImage {
    let mut img = blank_screenshot(width, height);
    for &(top, bar_height) in bars {
        paint_bar(&mut img, 0, top, width, bar_height);
    }
    img
}

/// Two-tone 200x50 header
pub fn header_image() -> RgbImage {
    RgbImage::from_fn(200, 50, |_, y| if y < 25 { Rgb([200, 30, 30]) } else { Rgb([250, 250, 250]) })
}

/// Writes `header.jpeg` into `dir`
pub fn write_header(dir: &Path) -> anyhow::Result<()> {
    header_image().save(dir.join(HEADER_NAME))?;
    Ok(())
}

pub fn write_png(dir: &Path, name: &str, img: &RgbImage) -> anyhow::Result<()> {
    img.save(dir.join(name))?;
    Ok(())
}

/// Config rooted at `dir` with everything else at its defaults
pub fn test_config(dir: &Path) -> SplitterConfig {
    SplitterConfig::new(dir)
}

/// Number of pure black pixels
pub fn ink_pixels(img: &RgbImage) -> usize {
    img.pixels().filter(|p| **p == INK).count()
}
