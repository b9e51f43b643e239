#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring and adding `c`, starting from zero,
//! never runs off to infinity.  Once the orbit leaves the disc of
//! radius 2 it is guaranteed to escape, so we count how many steps
//! that takes.  The count, its "velocity," is what colors the image;
//! points that survive the whole iteration budget are painted black.
//!
//! The library maps each pixel of a frame onto a rectangle of the
//! complex plane, runs the escape-time test, and colors the result.
//! Columns of the image are independent, so they are rendered in
//! parallel, each column owned by exactly one worker.
//!
//! ```no_run
//! use mandelbrot::{render, Frame, View};
//!
//! let raster = render(View::default(), Frame::default()).unwrap();
//! raster.to_rgb().save("mandel.jpg").unwrap();
//! ```

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate url;

#[cfg(test)]
extern crate rand;

pub mod errors;
pub mod escape;
pub mod palette;
pub mod params;
pub mod planes;
pub mod render;

pub use errors::RenderError;
pub use escape::{evaluate, Escape};
pub use palette::color_for;
pub use params::ViewParams;
pub use planes::{map_pixel, Frame, Pixel, PlaneMapper, View};
pub use render::{render, render_with_threads, MandelbrotRenderer, Raster};
