// ABOUTME: Floor-area estimation from a room photo
// ABOUTME: Finds the edge bounding box and scales it by a known real-world width
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Area Estimator
//!
//! The photo is assumed to frame the room so that the outermost detected
//! edges span `known_width_inches`. With the edge bounding box `w x h`
//! pixels:
//!
//! ```text
//! pixels_per_inch = w / known_width_inches
//! area_sqft       = (w / ppi) * (h / ppi) / 144
//! ```
//!
//! Decoding and edge detection are CPU bound; callers on the async runtime
//! should run [`AreaEstimator::estimate`] on a blocking thread.

use image::GrayImage;
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Gradient magnitude above which a pixel counts as an edge
const EDGE_THRESHOLD: f64 = 50.0;

/// Square inches per square foot
const SQ_INCHES_PER_SQ_FOOT: f64 = 144.0;

/// Pixel bounds of all detected edges, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeBounds {
    /// Leftmost edge column
    pub min_x: u32,
    /// Topmost edge row
    pub min_y: u32,
    /// Rightmost edge column
    pub max_x: u32,
    /// Bottom edge row
    pub max_y: u32,
}

impl EdgeBounds {
    /// Width in pixels
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Height in pixels
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

/// Estimates square footage from photos
#[derive(Debug, Clone, Copy)]
pub struct AreaEstimator {
    known_width_inches: f64,
}

impl AreaEstimator {
    /// Create an estimator for frames spanning `known_width_inches`
    #[must_use]
    pub const fn new(known_width_inches: f64) -> Self {
        Self { known_width_inches }
    }

    /// Estimate the floor area in square feet, rounded to 2 decimals
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` when the image cannot be decoded or has no edges
    pub fn estimate(&self, image_bytes: &[u8]) -> AppResult<f64> {
        let image = image::load_from_memory(image_bytes)
            .map_err(|e| AppError::invalid_input(format!("Unreadable image: {e}")))?
            .to_luma8();

        let bounds = edge_bounds(&image)
            .ok_or_else(|| AppError::invalid_input("No edges detected in image"))?;

        let width = f64::from(bounds.width());
        let height = f64::from(bounds.height());
        let pixels_per_inch = width / self.known_width_inches;
        let area_sq_inches = (width / pixels_per_inch) * (height / pixels_per_inch);
        let area = (area_sq_inches / SQ_INCHES_PER_SQ_FOOT * 100.0).round() / 100.0;

        debug!(?bounds, area, "Estimated floor area");
        Ok(area)
    }
}

/// Bounding box of pixels whose central-difference gradient exceeds the threshold
#[must_use]
pub fn edge_bounds(image: &GrayImage) -> Option<EdgeBounds> {
    let (width, height) = image.dimensions();
    if width < 3 || height < 3 {
        return None;
    }

    let at = |x: u32, y: u32| f64::from(image.get_pixel(x, y).0[0]);
    let mut bounds: Option<EdgeBounds> = None;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let gx = at(x + 1, y) - at(x - 1, y);
            let gy = at(x, y + 1) - at(x, y - 1);
            if gx.hypot(gy) <= EDGE_THRESHOLD {
                continue;
            }
            bounds = Some(match bounds {
                None => EdgeBounds {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
                Some(b) => EdgeBounds {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                },
            });
        }
    }

    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Luma};
    use std::io::Cursor;

    fn rectangle_png(width: u32, height: u32, rect: (u32, u32, u32, u32)) -> Vec<u8> {
        let (rx, ry, rw, rh) = rect;
        let image = GrayImage::from_fn(width, height, |x, y| {
            if (rx..rx + rw).contains(&x) && (ry..ry + rh).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_edge_bounds_of_rectangle() {
        let image = GrayImage::from_fn(300, 200, |x, y| {
            if (50..250).contains(&x) && (50..150).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        let bounds = edge_bounds(&image).unwrap();
        assert_eq!(bounds.min_x, 49);
        assert_eq!(bounds.max_x, 250);
        assert_eq!(bounds.width(), 202);
        assert_eq!(bounds.height(), 102);
    }

    #[test]
    fn test_estimate_uses_aspect_ratio() {
        let png = rectangle_png(300, 200, (50, 50, 200, 100));
        let area = AreaEstimator::new(120.0).estimate(&png).unwrap();
        // 120in wide frame, height ratio 102/202
        assert!((area - 50.5).abs() < 1.0, "area was {area}");
    }

    #[test]
    fn test_blank_image_is_rejected() {
        let png = rectangle_png(50, 50, (0, 0, 0, 0));
        let error = AreaEstimator::new(120.0).estimate(&png).unwrap_err();
        assert!(error.message.contains("No edges"));
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let error = AreaEstimator::new(120.0)
            .estimate(b"definitely not an image")
            .unwrap_err();
        assert!(error.message.contains("Unreadable image"));
    }
}
