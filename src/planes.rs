//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0 in
//! the upper-left, and a rectangle on the complex plane given by its
//! minimum and maximum corners.
//!
//! Raster rows count downward while the imaginary axis counts upward,
//! so row 0 maps to the *maximum* imaginary component.
use errors::RenderError;
use num::Complex;

/// The region of the complex plane being rendered, and how hard to
/// look at each point in it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct View {
    /// Lower-left corner: smallest real and imaginary components.
    pub min: Complex<f64>,
    /// Upper-right corner: largest real and imaginary components.
    pub max: Complex<f64>,
    /// Maximum number of escape-time iterations per point.
    pub budget: u32,
}

impl View {
    /// Build a view from its two corners and an iteration budget.
    pub fn new(min: Complex<f64>, max: Complex<f64>, budget: u32) -> View {
        View { min, max, budget }
    }

    /// A view must be a real rectangle, the right way up.
    pub fn validate(&self) -> Result<(), RenderError> {
        let corners = [self.min.re, self.min.im, self.max.re, self.max.im];
        if corners.iter().any(|c| !c.is_finite()) {
            return Err(RenderError::InvalidView(format!(
                "corners {} and {} are not finite",
                self.min, self.max
            )));
        }

        if self.max.re <= self.min.re {
            return Err(RenderError::InvalidView(format!(
                "the minimum corner {} is not to the left of the maximum corner {}",
                self.min, self.max
            )));
        }

        if self.max.im <= self.min.im {
            return Err(RenderError::InvalidView(format!(
                "the minimum corner {} is not below the maximum corner {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Default for View {
    fn default() -> View {
        View {
            min: Complex::new(-2.0, -1.0),
            max: Complex::new(1.0, 1.0),
            budget: 1000,
        }
    }
}

/// Describes the width and height of the raster.  The origin is
/// always 0,0, so only the far corner is stored, and it is exclusive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    /// Columns in the raster
    pub width: usize,
    /// Rows in the raster
    pub height: usize,
}

impl Frame {
    /// Build a frame of the given size.
    pub fn new(width: usize, height: usize) -> Frame {
        Frame { width, height }
    }

    /// The total number of pixels in the frame, or `None` when the
    /// raster's RGBA bytes could not be addressed in one allocation.
    pub fn pixel_count(&self) -> Option<usize> {
        let max_bytes = isize::max_value() as usize;
        self.width
            .checked_mul(self.height)
            .filter(|pixels| pixels.checked_mul(4).map_or(false, |bytes| bytes <= max_bytes))
    }

    /// The total number of pixels in the frame.  Used to size the
    /// raster; saturates for frames that `validate` refuses.
    pub fn len(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Describes that the frame has no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// A frame must have pixels, must fit the raster's `u32` sides,
    /// and its pixels must fit in memory as one buffer.
    pub fn validate(&self) -> Result<(), RenderError> {
        let max_side = u32::max_value() as usize;
        if self.is_empty()
            || self.width > max_side
            || self.height > max_side
            || self.pixel_count().is_none()
        {
            return Err(RenderError::InvalidFrame {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for Frame {
    fn default() -> Frame {
        Frame {
            width: 600,
            height: 400,
        }
    }
}

/// Describes the x, y of a pixel in a frame: x is the column, y the
/// row counted from the top.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels of a frame onto points of a view.  Precomputes the
/// size of one pixel in complex units.
#[derive(Debug)]
pub struct PlaneMapper {
    /// The raster dimensions.
    pub frame: Frame,
    /// The complex rectangle.
    pub view: View,
    // Width and height of a single pixel on the complex plane.
    pixel_size: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Refuses frames without pixels and views that are
    /// empty or inverted, since either renders nonsense.
    pub fn new(view: View, frame: Frame) -> Result<PlaneMapper, RenderError> {
        frame.validate()?;
        view.validate()?;
        Ok(PlaneMapper::unchecked(view, frame))
    }

    // Division by a zero-sized frame yields infinities here rather
    // than a panic; the checked constructor is the guard.
    fn unchecked(view: View, frame: Frame) -> PlaneMapper {
        let pixel_size = (
            (view.max.re - view.min.re) / (frame.width as f64),
            (view.max.im - view.min.im) / (frame.height as f64),
        );
        PlaneMapper {
            frame,
            view,
            pixel_size,
        }
    }

    /// Given a pixel on the integral plane, map it to the complex
    /// point at that pixel's upper-left corner.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            (pixel.0 as f64) * self.pixel_size.0 + self.view.min.re,
            self.view.max.im - (pixel.1 as f64) * self.pixel_size.1,
        )
    }
}

/// Map one pixel of `frame` to its point in `view` without validating
/// either.  A zero-sized frame produces non-finite coordinates.
pub fn map_pixel(view: &View, frame: &Frame, pixel: Pixel) -> Complex<f64> {
    PlaneMapper::unchecked(*view, *frame).pixel_to_point(&pixel)
}
