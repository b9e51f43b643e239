//! Reads a view and frame out of URL-style query parameters of the
//! form `centerX=...&centerY=...&sizeX=...&sizeY=...&width=...&height=...`.
//!
//! The six geometric parameters are all-or-nothing: unless every one
//! is supplied, the default view and frame are used as a whole.  The
//! optional `iterations` parameter stands on its own.  A parameter that
//! is present but is not a number is an error, never a silent zero.
//! Keys and values are form-decoded first, so `%2D0.5` reads as `-0.5`.

use errors::RenderError;
use num::Complex;
use planes::{Frame, View};
use std::str::FromStr;
use url::form_urlencoded;

const CENTER_X: &str = "centerX";
const CENTER_Y: &str = "centerY";
const SIZE_X: &str = "sizeX";
const SIZE_Y: &str = "sizeY";
const WIDTH: &str = "width";
const HEIGHT: &str = "height";
const ITERATIONS: &str = "iterations";

/// Optional parameters as supplied by a caller, before defaulting.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ViewParams {
    /// Real component of the center of the view
    pub center_x: Option<f64>,
    /// Imaginary component of the center of the view
    pub center_y: Option<f64>,
    /// Width of the view on the real axis
    pub size_x: Option<f64>,
    /// Height of the view on the imaginary axis
    pub size_y: Option<f64>,
    /// Raster width in pixels
    pub width: Option<usize>,
    /// Raster height in pixels
    pub height: Option<usize>,
    /// Escape-time iteration budget
    pub iterations: Option<u32>,
}

fn parse_value<T: FromStr>(name: &str, value: &str) -> Result<T, RenderError> {
    T::from_str(value).map_err(|_| RenderError::InvalidParameter {
        name: name.to_string(),
        value: value.to_string(),
    })
}

// The first occurrence of a key wins; later ones are not even parsed.
fn store<T: FromStr>(slot: &mut Option<T>, name: &str, value: &str) -> Result<(), RenderError> {
    if slot.is_none() {
        *slot = Some(parse_value(name, value)?);
    }
    Ok(())
}

impl ViewParams {
    /// Parse an `&`-separated, form-encoded query string.  A leading
    /// `?` is skipped, and unknown keys are ignored.
    pub fn from_query(query: &str) -> Result<ViewParams, RenderError> {
        let query = query.trim_start_matches('?');
        let mut params = ViewParams::default();
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            let (name, value) = (&*name, &*value);
            match name {
                CENTER_X => store(&mut params.center_x, name, value)?,
                CENTER_Y => store(&mut params.center_y, name, value)?,
                SIZE_X => store(&mut params.size_x, name, value)?,
                SIZE_Y => store(&mut params.size_y, name, value)?,
                WIDTH => store(&mut params.width, name, value)?,
                HEIGHT => store(&mut params.height, name, value)?,
                ITERATIONS => store(&mut params.iterations, name, value)?,
                _ => (),
            }
        }
        Ok(params)
    }

    fn geometry(&self) -> Option<(f64, f64, f64, f64, usize, usize)> {
        Some((
            self.center_x?,
            self.center_y?,
            self.size_x?,
            self.size_y?,
            self.width?,
            self.height?,
        ))
    }

    fn is_partial(&self) -> bool {
        self.center_x.is_some()
            || self.center_y.is_some()
            || self.size_x.is_some()
            || self.size_y.is_some()
            || self.width.is_some()
            || self.height.is_some()
    }

    /// Turn the parameters into a validated view and frame, falling
    /// back to defaults where allowed.
    pub fn resolve(&self) -> Result<(View, Frame), RenderError> {
        let budget = self.iterations.unwrap_or_else(|| View::default().budget);
        let (view, frame) = match self.geometry() {
            Some((cx, cy, sx, sy, width, height)) => (
                View::new(
                    Complex::new(cx - sx / 2.0, cy - sy / 2.0),
                    Complex::new(cx + sx / 2.0, cy + sy / 2.0),
                    budget,
                ),
                Frame::new(width, height),
            ),
            None => {
                if self.is_partial() {
                    warn!("Incomplete view parameters {:?}; using the default view", self);
                }
                (
                    View {
                        budget,
                        ..View::default()
                    },
                    Frame::default(),
                )
            }
        };
        frame.validate()?;
        view.validate()?;
        Ok((view, frame))
    }
}
