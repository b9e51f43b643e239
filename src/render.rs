// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The renderer walks every pixel of a frame, maps it onto the view,
//! runs the escape-time test, and colors the result.
//!
//! Work is divided by column.  The working buffer is laid out
//! column-major, so each column is one contiguous slice and can be
//! handed to exactly one worker as a `&mut [Rgba<u8>]`; no two workers
//! can ever hold the same column, and no cell needs a lock.  The only
//! synchronization is the queue that hands out columns and the join
//! at the end of the scope, which counts finished columns and insists
//! on seeing all of them.

extern crate crossbeam;

use crossbeam::thread::ScopedJoinHandle;
use image::{ImageBuffer, Pixel as ImagePixel, Rgb, RgbImage, Rgba, RgbaImage};
use itertools::iproduct;
use std::sync::{Arc, Mutex};

use errors::RenderError;
use escape::evaluate;
use palette::{color_for, BOUNDED_COLOR};
use planes::{Frame, Pixel, PlaneMapper, View};

/// A finished rendering.  Read-only once it leaves the renderer.
///
/// Pixels are stored column-major, exactly as the workers wrote them;
/// the row-major images an encoder wants are built on request, so a
/// render never holds two full-size copies.
#[derive(Clone, Debug)]
pub struct Raster {
    frame: Frame,
    cells: Vec<Rgba<u8>>,
}

impl Raster {
    fn from_columns(frame: Frame, cells: Vec<Rgba<u8>>) -> Raster {
        Raster { frame, cells }
    }

    /// Columns in the raster.
    pub fn width(&self) -> u32 {
        self.frame.width as u32
    }

    /// Rows in the raster.
    pub fn height(&self) -> u32 {
        self.frame.height as u32
    }

    /// The pixel at column `x`, row `y`, if it is inside the raster.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x < self.width() && y < self.height() {
            Some(self.cells[(x as usize) * self.frame.height + (y as usize)])
        } else {
            None
        }
    }

    /// Column `x`, top to bottom.
    pub fn column(&self, x: u32) -> Option<&[Rgba<u8>]> {
        self.cells.chunks(self.frame.height).nth(x as usize)
    }

    /// Every pixel, one column after another, literal alpha values
    /// included.
    pub fn pixels(&self) -> impl Iterator<Item = &Rgba<u8>> {
        self.cells.iter()
    }

    /// Lay the raster out as a row-major image, literal alpha values
    /// included.
    pub fn into_image(self) -> RgbaImage {
        ImageBuffer::from_fn(self.width(), self.height(), |x, y| {
            self.cells[(x as usize) * self.frame.height + (y as usize)]
        })
    }

    /// An opaque row-major copy for encoders: alpha is dropped, color
    /// channels are kept exactly.
    pub fn to_rgb(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width(), self.height(), |x, y| -> Rgb<u8> {
            self.cells[(x as usize) * self.frame.height + (y as usize)].to_rgb()
        })
    }
}

/// Holds everything needed to render one frame of one view.  Once
/// built, it is not mutable; render it as often as you like.
pub struct MandelbrotRenderer {
    plane: PlaneMapper,
}

impl MandelbrotRenderer {
    /// Validates the frame and view before any work is done.
    pub fn new(view: View, frame: Frame) -> Result<Self, RenderError> {
        let plane = PlaneMapper::new(view, frame)?;
        Ok(MandelbrotRenderer { plane })
    }

    /// The frame this renderer draws.
    pub fn frame(&self) -> Frame {
        self.plane.frame
    }

    /// The view this renderer draws.
    pub fn view(&self) -> View {
        self.plane.view
    }

    /// Fill one column.  `cells` holds that column's rows, top to
    /// bottom.
    fn fill_column(&self, column: usize, cells: &mut [Rgba<u8>]) {
        let budget = self.plane.view.budget;
        for (row, cell) in cells.iter_mut().enumerate() {
            let point = self.plane.pixel_to_point(&Pixel(column, row));
            *cell = color_for(evaluate(point, budget));
        }
    }

    /// The single-threaded renderer.  Produces exactly the same raster
    /// as `render`, just slower.
    pub fn render_single(&self) -> Raster {
        let frame = self.plane.frame;
        let budget = self.plane.view.budget;
        let mut cells = vec![BOUNDED_COLOR; frame.len()];
        for ((column, row), cell) in iproduct!(0..frame.width, 0..frame.height).zip(cells.iter_mut())
        {
            let point = self.plane.pixel_to_point(&Pixel(column, row));
            *cell = color_for(evaluate(point, budget));
        }
        Raster::from_columns(frame, cells)
    }

    /// The multi-threaded renderer.  `threads` workers pull columns off
    /// a shared queue until it runs dry; the thread count is clamped
    /// to between one and the number of columns.
    pub fn render(&self, threads: usize) -> Result<Raster, RenderError> {
        let frame = self.plane.frame;
        let workers = threads.max(1).min(frame.width);
        debug!(
            "Rendering {}x{} of {} to {} with budget {} on {} workers",
            frame.width,
            frame.height,
            self.plane.view.min,
            self.plane.view.max,
            self.plane.view.budget,
            workers
        );

        let mut cells = vec![BOUNDED_COLOR; frame.len()];
        let completed = {
            let columns = Arc::new(Mutex::new(cells.chunks_mut(frame.height).enumerate()));
            crossbeam::scope(|spawner| {
                let handles: Vec<ScopedJoinHandle<usize>> = (0..workers)
                    .map(|_| {
                        let columns = columns.clone();
                        spawner.spawn(move |_| {
                            let mut finished = 0;
                            loop {
                                let column = columns.lock().ok().and_then(|mut queue| queue.next());
                                match column {
                                    Some((x, cells)) => {
                                        self.fill_column(x, cells);
                                        finished += 1;
                                    }
                                    None => {
                                        break;
                                    }
                                }
                            }
                            finished
                        })
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap_or(0))
                    .sum::<usize>()
            })
            .unwrap_or(0)
        };

        if completed != frame.width {
            warn!("Only {} of {} columns finished", completed, frame.width);
            return Err(RenderError::IncompleteRender {
                completed,
                expected: frame.width,
            });
        }

        debug!("Finished {} columns", completed);
        Ok(Raster::from_columns(frame, cells))
    }
}

/// Render `view` into `frame` with one worker per available CPU.
pub fn render(view: View, frame: Frame) -> Result<Raster, RenderError> {
    render_with_threads(view, frame, num_cpus::get())
}

/// Render `view` into `frame` with a chosen number of workers.
pub fn render_with_threads(view: View, frame: Frame, threads: usize) -> Result<Raster, RenderError> {
    MandelbrotRenderer::new(view, frame)?.render(threads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;
    use num::Complex;

    fn small() -> (View, Frame) {
        (View::default(), Frame::new(90, 60))
    }

    #[test]
    fn raster_has_the_frame_size() {
        let (view, frame) = small();
        let raster = render_with_threads(view, frame, 4).unwrap();
        assert_eq!(raster.width(), 90);
        assert_eq!(raster.height(), 60);
        assert_eq!(raster.pixels().count(), 90 * 60);
        assert!(raster.get(90, 0).is_none());
        assert!(raster.get(0, 60).is_none());
    }

    #[test]
    fn every_pixel_is_black_or_has_no_green() {
        let (view, frame) = small();
        let raster = render_with_threads(view, frame, 3).unwrap();
        for (x, y) in iproduct!(0..raster.width(), 0..raster.height()) {
            let p = raster.get(x, y).unwrap();
            assert!(p == BOUNDED_COLOR || p.channels()[1] == 0);
        }
    }

    #[test]
    fn pixels_agree_with_the_evaluator() {
        let (view, frame) = small();
        let raster = render_with_threads(view, frame, 5).unwrap();
        let plane = PlaneMapper::new(view, frame).unwrap();
        for (x, y) in iproduct!(0..frame.width, 0..frame.height) {
            let expected = color_for(evaluate(plane.pixel_to_point(&Pixel(x, y)), view.budget));
            assert_eq!(raster.get(x as u32, y as u32), Some(expected), "at {},{}", x, y);
        }
    }

    #[test]
    fn known_points_land_where_expected() {
        // 4x4 over [-2,2]x[-2,2]: pixel (2,2) is the origin, (0,0) is -2+2i.
        let view = View::new(Complex::new(-2.0, -2.0), Complex::new(2.0, 2.0), 100);
        let raster = render_with_threads(view, Frame::new(4, 4), 2).unwrap();
        assert_eq!(raster.get(2, 2), Some(BOUNDED_COLOR));
        assert_ne!(raster.get(0, 0), Some(BOUNDED_COLOR));
    }

    #[test]
    fn parallel_matches_sequential() {
        let (view, frame) = small();
        let renderer = MandelbrotRenderer::new(view, frame).unwrap();
        let reference = renderer.render_single().into_image().into_raw();
        for threads in &[1, 2, 7, 90, 500] {
            let raster = renderer.render(*threads).unwrap();
            assert_eq!(raster.into_image().into_raw(), reference, "with {} threads", threads);
        }
    }

    #[test]
    fn repeated_renders_are_identical() {
        let (view, frame) = small();
        let a = render(view, frame).unwrap();
        let b = render(view, frame).unwrap();
        assert_eq!(a.into_image().into_raw(), b.into_image().into_raw());
    }

    #[test]
    fn default_configuration_is_reproducible() {
        let first = render(View::default(), Frame::default()).unwrap();
        assert_eq!((first.width(), first.height()), (600, 400));
        let second = render(View::default(), Frame::default()).unwrap();
        let reference = MandelbrotRenderer::new(View::default(), Frame::default())
            .unwrap()
            .render_single();

        let first = first.into_image().into_raw();
        assert_eq!(first, second.into_image().into_raw());
        assert_eq!(first, reference.into_image().into_raw());
    }

    #[test]
    fn zero_threads_still_renders() {
        let (view, frame) = small();
        assert!(render_with_threads(view, frame, 0).is_ok());
    }

    #[test]
    fn single_column_and_single_row_frames() {
        let view = View::default();
        let raster = render_with_threads(view, Frame::new(1, 40), 8).unwrap();
        assert_eq!((raster.width(), raster.height()), (1, 40));
        let raster = render_with_threads(view, Frame::new(40, 1), 8).unwrap();
        assert_eq!((raster.width(), raster.height()), (40, 1));
    }

    #[test]
    fn zero_budget_renders_all_black() {
        let view = View {
            budget: 0,
            ..View::default()
        };
        let raster = render_with_threads(view, Frame::new(30, 20), 4).unwrap();
        assert!(raster.pixels().all(|p| *p == BOUNDED_COLOR));
    }

    #[test]
    fn invalid_input_is_rejected_before_rendering() {
        let frame = Frame::new(0, 10);
        match render(View::default(), frame) {
            Err(RenderError::InvalidFrame { .. }) => (),
            other => panic!("expected InvalidFrame, got {:?}", other),
        }

        let inverted = View::new(Complex::new(1.0, 1.0), Complex::new(-2.0, -1.0), 10);
        match render(inverted, Frame::default()) {
            Err(RenderError::InvalidView(_)) => (),
            other => panic!("expected InvalidView, got {:?}", other),
        }
    }

    #[test]
    fn oversize_frame_is_an_error_not_a_panic() {
        let side = u32::max_value() as usize;
        let frame = Frame::new(side, side);
        match render_with_threads(View::default(), frame, 1) {
            Err(RenderError::InvalidFrame { width, height }) => {
                assert_eq!((width, height), (side, side))
            }
            other => panic!("expected InvalidFrame, got {:?}", other.map(|r| r.width())),
        }
    }

    #[test]
    fn columns_and_image_agree_on_layout() {
        let (view, frame) = small();
        let raster = render_with_threads(view, frame, 4).unwrap();
        assert_eq!(raster.column(89).map(|c| c.len()), Some(60));
        assert!(raster.column(90).is_none());
        assert_eq!(raster.column(7).unwrap()[11], raster.get(7, 11).unwrap());

        let copy = raster.clone();
        let image = raster.into_image();
        for (x, y, p) in image.enumerate_pixels() {
            assert_eq!(Some(*p), copy.get(x, y), "at {},{}", x, y);
        }
    }

    #[test]
    fn rgb_copy_keeps_colors_and_drops_alpha() {
        let (view, frame) = small();
        let raster = render_with_threads(view, frame, 2).unwrap();
        let rgb = raster.to_rgb();
        assert_eq!((rgb.width(), rgb.height()), (90, 60));
        for (x, y, p) in rgb.enumerate_pixels() {
            let source = raster.get(x, y).unwrap();
            assert_eq!(p.channels(), &source.channels()[..3]);
        }
    }
}
