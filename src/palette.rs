//! Turns an escape result into a pixel.  Escaped points cycle from red
//! to blue every 255 iterations, which gives the familiar banding;
//! bounded points are black.
//!
//! Escaped pixels carry an alpha of zero.  That value is kept as-is in
//! the raster; encoders that care about alpha should go through
//! `Raster::to_rgb`, which treats every pixel as opaque.

use escape::Escape;
use image::Rgba;

/// The color of a point inside the set.
pub const BOUNDED_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Map an escape result to its pixel value.
#[inline]
pub fn color_for(result: Escape) -> Rgba<u8> {
    match result {
        Escape::Bounded => BOUNDED_COLOR,
        Escape::Escaped(i) => {
            let blue = (i % 255) as u8;
            Rgba([255 - blue, 0, blue, 0])
        }
    }
}
