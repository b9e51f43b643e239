// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The ways a render request can be turned away.  The computational
//! core is total once its inputs are checked, so nearly everything
//! here is about rejecting input before any work starts.

/// Everything that can go wrong between a request and a raster.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// The frame has no pixels, or more than an image can address.
    #[fail(display = "Invalid frame: {}x{} is not a drawable size", width, height)]
    InvalidFrame {
        /// Requested width in pixels
        width: usize,
        /// Requested height in pixels
        height: usize,
    },

    /// The view rectangle is empty, inverted, or not made of finite
    /// numbers.
    #[fail(display = "Invalid view: {}", _0)]
    InvalidView(String),

    /// A supplied parameter could not be read as a number.
    #[fail(display = "Could not parse parameter {}: {:?}", name, value)]
    InvalidParameter {
        /// The parameter's key
        name: String,
        /// The text that failed to parse
        value: String,
    },

    /// Fewer columns reported completion than the frame is wide.
    #[fail(display = "Render incomplete: {} of {} columns finished", completed, expected)]
    IncompleteRender {
        /// Columns that reported completion
        completed: usize,
        /// The frame width
        expected: usize,
    },
}
