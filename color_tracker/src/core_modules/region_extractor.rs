// THEORY:
// The `RegionExtractor` is the spatial grouping stage of the engine. It turns a
// raw, speckled match mask into a short list of clean `Region`s.
//
// Algorithm steps:
// 1.  **Opening**: the mask is eroded `iterations` times, then dilated the same
//     number of times, with a small square structuring element. Erosion deletes
//     isolated false positives and thin bridges; dilation then regrows the
//     survivors to roughly their original size. Specks that vanished during
//     erosion have nothing left to regrow from.
// 2.  **Boundary tracing**: external boundaries of the cleaned mask are traced.
//     Holes, and islands sitting inside holes, are ignored.
// 3.  **Area filter**: a region qualifies only if its enclosed area is strictly
//     greater than `min_area`.
// 4.  **Selection**: `AllQualifying` keeps every qualifying region (several
//     disjoint blobs of one color); `Largest` keeps only the region with the
//     greatest area, the first one traced winning ties.
//
// Like the blob detector it replaces, this is a stateless utility with no memory
// of previous frames. The caller's mask is never modified.

use crate::core_modules::mask_builder::Mask;
use crate::core_modules::region::Region;

/// Structuring element and iteration count for the opening step.
///
/// The element is a square, so opening leaves axis-aligned blocks exactly as
/// they were. A 5x5 elliptical element would shave their corner pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MorphologyConfig {
    /// Chebyshev radius of the square element; 2 gives a 5x5 kernel.
    pub radius: u8,
    pub iterations: u8,
}

impl Default for MorphologyConfig {
    fn default() -> Self {
        Self {
            radius: 2,
            iterations: 2,
        }
    }
}

/// How many of the qualifying regions are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Every region above the area threshold.
    #[default]
    AllQualifying,
    /// Only the region of maximum area, if any qualifies.
    Largest,
}

/// The default area threshold, in square pixels.
pub const DEFAULT_MIN_AREA: f64 = 100.0;

pub mod region_extractor {
    use super::*;
    use crate::core_modules::mask_builder::BACKGROUND;
    use image::imageops::replace;
    use image::{GrayImage, Luma};
    use imageproc::contours::find_contours;
    use imageproc::distance_transform::Norm;
    use imageproc::morphology::{dilate_mut, erode_mut};
    use imageproc::point::Point;

    const BORDER: u32 = 1;

    /// Cleans the mask and extracts regions with the default opening settings.
    pub fn extract_regions(mask: &Mask, min_area: f64, policy: SelectionPolicy) -> Vec<Region> {
        extract_regions_with(mask, min_area, policy, MorphologyConfig::default())
    }

    pub fn extract_regions_with(
        mask: &Mask,
        min_area: f64,
        policy: SelectionPolicy,
        morphology: MorphologyConfig,
    ) -> Vec<Region> {
        let cleaned = clean_mask(mask, morphology);
        select(find_regions(&cleaned, min_area), policy)
    }

    /// Morphological opening: erode, then dilate, `iterations` times each.
    pub fn clean_mask(mask: &Mask, morphology: MorphologyConfig) -> Mask {
        let mut cleaned = mask.clone();
        if morphology.radius == 0 {
            return cleaned;
        }
        for _ in 0..morphology.iterations {
            erode_mut(&mut cleaned, Norm::LInf, morphology.radius);
        }
        for _ in 0..morphology.iterations {
            dilate_mut(&mut cleaned, Norm::LInf, morphology.radius);
        }
        cleaned
    }

    /// Traces the external boundaries of an already cleaned mask and keeps
    /// those enclosing more than `min_area`.
    pub fn find_regions(mask: &Mask, min_area: f64) -> Vec<Region> {
        // The tracer loses components touching opposite frame edges, so it
        // runs on a copy framed by one pixel of background.
        let padded = pad_with_background(mask);
        find_contours::<u32>(&padded)
            .into_iter()
            .filter(|contour| contour.parent.is_none())
            .map(|contour| {
                contour
                    .points
                    .into_iter()
                    .map(|p| Point::new(p.x - BORDER, p.y - BORDER))
                    .collect::<Vec<_>>()
            })
            .filter_map(|boundary| Region::from_boundary(0, boundary))
            .filter(|region| region.area > min_area)
            .enumerate()
            .map(|(id, region)| Region { id, ..region })
            .collect()
    }

    fn pad_with_background(mask: &Mask) -> Mask {
        let (width, height) = mask.dimensions();
        let mut padded = GrayImage::from_pixel(width + 2 * BORDER, height + 2 * BORDER, Luma([BACKGROUND]));
        replace(&mut padded, mask, i64::from(BORDER), i64::from(BORDER));
        padded
    }

    /// Applies the selection policy. `Largest` keeps the first maximum.
    pub fn select(regions: Vec<Region>, policy: SelectionPolicy) -> Vec<Region> {
        match policy {
            SelectionPolicy::AllQualifying => regions,
            SelectionPolicy::Largest => {
                let mut largest: Option<Region> = None;
                for region in regions {
                    let is_larger = largest.as_ref().is_none_or(|best| region.area > best.area);
                    if is_larger {
                        largest = Some(region);
                    }
                }
                largest.into_iter().collect()
            }
        }
    }
}
