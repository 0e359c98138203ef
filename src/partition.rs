use crate::models::Slice;

/// Thresholds controlling how cut points become slices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionRules {
    /// Slices shorter than this are dropped as noise
    pub min_slice_height: u32,
    /// Distance within which a slice bottom counts as sitting on a cut point
    pub marker_tolerance: u32,
}

impl Default for PartitionRules {
    fn default() -> Self {
        Self {
            min_slice_height: 100,
            marker_tolerance: 10,
        }
    }
}

/// Split `0..image_height` at the given cut points.
///
/// `cut_points` must be sorted ascending and unique. The remainder below the last
/// cut is kept only when it is more than `marker_tolerance` rows tall.
pub fn partition(cut_points: &[u32], image_height: u32, rules: &PartitionRules) -> Vec<Slice> {
    let mut boundaries = Vec::with_capacity(cut_points.len() + 2);
    boundaries.push(0);
    boundaries.extend(cut_points.iter().copied().filter(|&c| c > 0 && c <= image_height));

    let last = boundaries[boundaries.len() - 1];
    if cut_points.is_empty() || last.saturating_add(rules.marker_tolerance) < image_height {
        boundaries.push(image_height);
    }

    boundaries
        .windows(2)
        .filter(|pair| pair[1] - pair[0] >= rules.min_slice_height)
        .map(|pair| Slice {
            top: pair[0],
            bottom: pair[1],
            ends_on_marker: cut_points
                .iter()
                .any(|&c| c.abs_diff(pair[1]) < rules.marker_tolerance),
        })
        .collect()
}
