use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use crate::error::DecodeError;
use crate::models::{ColorRange, Hsv};

/// Foreground value written into masks
pub const MASK_ON: u8 = 255;

/// Convert one RGB pixel to 8-bit HSV (OpenCV convention, hue halved into 0..180)
pub fn rgb_to_hsv(pixel: Rgb<u8>) -> Hsv {
    let [r, g, b] = pixel.0.map(f32::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let saturation = if max == 0.0 { 0.0 } else { 255.0 * delta / max };

    let mut hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    let hue = (hue / 2.0).round() as u16;
    [
        if hue >= 180 { 0 } else { hue as u8 },
        saturation.round() as u8,
        max as u8,
    ]
}

/// Binary mask of the pixels whose HSV value falls inside `range`
pub fn mask_rgb(img: &RgbImage, range: &ColorRange) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        if range.contains(rgb_to_hsv(*img.get_pixel(x, y))) {
            Luma([MASK_ON])
        } else {
            Luma([0])
        }
    })
}

/// Convert the image to RGB and build its colour mask
pub fn detect(img: &DynamicImage, range: &ColorRange) -> Result<GrayImage, DecodeError> {
    let rgb = to_rgb(img)?;
    Ok(mask_rgb(&rgb, range))
}

/// RGB view of a decoded image; empty images are rejected rather than padded
pub fn to_rgb(img: &DynamicImage) -> Result<RgbImage, DecodeError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(DecodeError::Empty {
            width: img.width(),
            height: img.height(),
        });
    }
    Ok(img.to_rgb8())
}
