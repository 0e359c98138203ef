mod common;

use branch_splitter::compose::{self, BlockRenderer, DateStamp, ReportComposer};
use branch_splitter::CompositionError;
use common::*;
use image::imageops;
use image::RgbImage;
use std::sync::Arc;

fn stamp() -> DateStamp {
    DateStamp {
        text: FIXED_DATE.to_string(),
        renderer: Arc::new(BlockRenderer::new(18.0)),
        left: 8,
        offset: 22,
        color: INK,
    }
}

fn body(report: &RgbImage, header_height: u32) -> RgbImage {
    imageops::crop_imm(report, 0, header_height, report.width(), report.height() - header_height).to_image()
}

#[test]
fn report_is_header_plus_slice() -> anyhow::Result<()> {
    let source = screenshot_with_bars(300, 400, &[(190, 10)]);
    let slice = Slice { top: 0, bottom: 200, ends_on_marker: true };

    let report = compose::compose(&source, &slice, &header_image(), Some(&stamp()))?;

    // 200x50 header scaled by 1.5
    assert_eq!(report.header_height, 75);
    assert_eq!(report.width(), 300);
    assert_eq!(report.height(), 75 + 200);
    assert_eq!(report.slice, slice);
    Ok(())
}

#[test]
fn date_is_stamped_only_on_marker_slices() -> anyhow::Result<()> {
    let source = screenshot_with_bars(300, 400, &[(190, 10)]);
    let composer = ReportComposer::new(header_image(), Some(stamp()));

    let marked = composer.compose(&source, &Slice { top: 0, bottom: 200, ends_on_marker: true })?;
    let marked_body = body(&marked.image, marked.header_height);
    assert!(ink_pixels(&marked_body) > 0);
    assert_eq!(marked_body.dimensions(), (300, 200));

    let plain = composer.compose(&source, &Slice { top: 200, bottom: 400, ends_on_marker: false })?;
    let plain_body = body(&plain.image, plain.header_height);
    let expected = imageops::crop_imm(&source, 0, 200, 300, 200).to_image();
    assert_eq!(plain_body, expected);
    Ok(())
}

#[test]
fn label_sits_just_above_the_bottom_edge() -> anyhow::Result<()> {
    let source = blank_screenshot(300, 200);
    let slice = Slice { top: 0, bottom: 200, ends_on_marker: true };
    let report = compose::compose(&source, &slice, &header_image(), Some(&stamp()))?;
    let body = body(&report.image, report.header_height);

    let inked_rows: Vec<u32> = (0..body.height())
        .filter(|&y| (0..body.width()).any(|x| *body.get_pixel(x, y) == INK))
        .collect();
    assert_eq!(inked_rows.first(), Some(&178));
    assert!(inked_rows.iter().all(|&y| y < 200));

    let inked_cols: Vec<u32> = (0..body.width())
        .filter(|&x| (0..body.height()).any(|y| *body.get_pixel(x, y) == INK))
        .collect();
    assert_eq!(inked_cols.first(), Some(&8));
    Ok(())
}

#[test]
fn no_stamp_leaves_crop_untouched() -> anyhow::Result<()> {
    let source = screenshot_with_bars(120, 300, &[(140, 10)]);
    let slice = Slice { top: 0, bottom: 150, ends_on_marker: true };

    let report = compose::compose(&source, &slice, &header_image(), None)?;
    let expected = imageops::crop_imm(&source, 0, 0, 120, 150).to_image();
    assert_eq!(body(&report.image, report.header_height), expected);
    Ok(())
}

#[test]
fn header_height_is_truncated_and_never_zero() -> anyhow::Result<()> {
    let header = header_image();
    assert_eq!(compose::resize_header(&header, 333)?.dimensions(), (333, 83));
    assert_eq!(compose::resize_header(&header, 2)?.dimensions(), (2, 1));
    assert_eq!(compose::resize_header(&header, 200)?, header);
    Ok(())
}

#[test]
fn invalid_inputs_are_composition_errors() {
    let source = blank_screenshot(100, 150);

    let out_of_bounds = Slice { top: 50, bottom: 200, ends_on_marker: false };
    assert!(matches!(
        compose::compose(&source, &out_of_bounds, &header_image(), None),
        Err(CompositionError::SliceOutOfBounds { height: 150, .. })
    ));

    let empty_header = RgbImage::new(0, 0);
    let slice = Slice { top: 0, bottom: 150, ends_on_marker: false };
    assert!(matches!(
        compose::compose(&source, &slice, &empty_header, None),
        Err(CompositionError::EmptyHeader { .. })
    ));

    let wide_header = RgbImage::new(300, 10);
    assert!(matches!(
        compose::stack(&wide_header, &source),
        Err(CompositionError::Paste { part: "header", .. })
    ));
}
