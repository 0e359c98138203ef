use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::HashMap;
use crate::models::Region;

/// Find the bounding boxes of all 8-connected foreground regions in a mask.
///
/// Regions come back ordered top-to-bottom, then left-to-right.
pub fn find_regions(mask: &GrayImage) -> Vec<Region> {
    let labeled = connected_components(mask, Connectivity::Eight, Luma([0]));

    let mut bounds: HashMap<u32, (u32, u32, u32, u32)> = HashMap::new();

    for (x, y, label) in labeled.enumerate_pixels() {
        let label_val = label[0];
        if label_val == 0 {
            continue; // background
        }

        bounds.entry(label_val)
            .and_modify(|(min_x, min_y, max_x, max_y)| {
                *min_x = (*min_x).min(x);
                *min_y = (*min_y).min(y);
                *max_x = (*max_x).max(x);
                *max_y = (*max_y).max(y);
            })
            .or_insert((x, y, x, y));
    }

    let mut regions: Vec<Region> = bounds.into_values()
        .map(|(min_x, min_y, max_x, max_y)| Region {
            min_x,
            min_y,
            max_x,
            max_y,
        })
        .collect();

    regions.sort_by_key(|r| (r.min_y, r.min_x, r.max_x, r.max_y));
    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paint(mask: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }

    #[test]
    fn empty_mask_has_no_regions() {
        let mask = GrayImage::new(40, 40);
        assert!(find_regions(&mask).is_empty());
    }

    #[test]
    fn separate_blocks_become_separate_regions() {
        let mut mask = GrayImage::new(50, 50);
        paint(&mut mask, 2, 30, 20, 4);
        paint(&mut mask, 5, 10, 3, 3);

        let regions = find_regions(&mask);
        assert_eq!(regions.len(), 2);
        assert_eq!((regions[0].x(), regions[0].y()), (5, 10));
        assert_eq!((regions[1].width(), regions[1].height()), (20, 4));
        assert_eq!(regions[1].bottom(), 34);
    }

    #[test]
    fn diagonal_neighbours_are_connected() {
        let mut mask = GrayImage::new(10, 10);
        mask.put_pixel(1, 1, Luma([255]));
        mask.put_pixel(2, 2, Luma([255]));

        let regions = find_regions(&mask);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].width(), 2);
    }
}
