//! Owned RGB565 framebuffer matching the physical panel.
//!
//! The pipeline draws into this buffer with embedded-graphics primitives
//! and the display port pushes it to the panel whole. Out-of-bounds pixels
//! are silently clipped, so drawing code never needs edge guards.

use core::convert::Infallible;

use embedded_graphics::Pixel;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::pins;

/// Panel width in pixels.
pub const WIDTH: usize = pins::LCD_WIDTH_PX;
/// Panel height in pixels.
pub const HEIGHT: usize = pins::LCD_HEIGHT_PX;

/// Fixed-size RGB raster matching the panel dimensions.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pixels: Vec<Rgb565>,
}

impl FrameBuffer {
    /// A new all-black frame.
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; WIDTH * HEIGHT],
        }
    }

    /// Reset every pixel to black.
    pub fn clear(&mut self) {
        self.pixels.fill(Rgb565::BLACK);
    }

    /// Pixel at (x, y); `None` outside the panel.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb565> {
        if x < WIDTH && y < HEIGHT {
            Some(self.pixels[y * WIDTH + x])
        } else {
            None
        }
    }

    /// Row-major pixel data, for the SPI push path.
    pub fn data(&self) -> &[Rgb565] {
        &self.pixels
    }

    /// True when no pixel has been lit.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&p| p == Rgb565::BLACK)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, colour) in pixels {
            if (0..WIDTH as i32).contains(&point.x) && (0..HEIGHT as i32).contains(&point.y) {
                self.pixels[point.y as usize * WIDTH + point.x as usize] = colour;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn new_frame_is_blank() {
        let frame = FrameBuffer::new();
        assert!(frame.is_blank());
        assert_eq!(frame.data().len(), WIDTH * HEIGHT);
    }

    #[test]
    fn rectangle_fill_lands_where_drawn() {
        let mut frame = FrameBuffer::new();
        Rectangle::new(Point::new(4, 2), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::WHITE))
            .draw(&mut frame)
            .ok();
        assert_eq!(frame.pixel(4, 2), Some(Rgb565::WHITE));
        assert_eq!(frame.pixel(6, 4), Some(Rgb565::WHITE));
        assert_eq!(frame.pixel(7, 2), Some(Rgb565::BLACK));
    }

    #[test]
    fn out_of_bounds_pixels_are_clipped() {
        let mut frame = FrameBuffer::new();
        Rectangle::new(Point::new(WIDTH as i32 - 2, HEIGHT as i32 - 2), Size::new(8, 8))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
            .draw(&mut frame)
            .ok();
        assert_eq!(frame.pixel(WIDTH - 1, HEIGHT - 1), Some(Rgb565::RED));
        assert_eq!(frame.pixel(WIDTH, HEIGHT), None);
    }
}
