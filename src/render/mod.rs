//! Frame production for the ST7735 panel.
//!
//! The pipeline turns interaction state into drawable frames:
//!
//! | State                          | Frame                                   |
//! |--------------------------------|-----------------------------------------|
//! | Backlight off (transition)     | One blank frame, then nothing           |
//! | Telemetry mode                 | Gradient columns + line graph + header  |
//! | Overlay mode                   | Static page, redrawn on change only     |
//! | Shutdown warn / confirmed      | Warning text over the base content      |
//!
//! The caller owns the redraw decisions; this module only produces frames.
//! Higher-normalised samples paint nearer the top of the plot area, and the
//! column hue runs red (newest extreme) to blue across `(1 - norm) * 0.6`
//! of the HSV circle.

pub mod frame;

pub use frame::FrameBuffer;

use core::fmt::Write as _;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::iso_8859_1::FONT_6X10;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::gesture::ShutdownStage;
use crate::modes::{OverlayPage, Variable};
use crate::telemetry::RollingBuffer;

/// Height of the header strip above the plot area.
pub const TOP_BAR_PX: usize = 16;
/// Width of one graph column; panel width ÷ column width = window size.
pub const GRAPH_COLUMN_PX: usize = 4;

// ---------------------------------------------------------------------------
// Colour helpers
// ---------------------------------------------------------------------------

/// Pack 8-bit RGB components into the panel's 5-6-5 format.
fn rgb(r: u8, g: u8, b: u8) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

/// Sector-based HSV to RGB conversion; `h`, `s`, `v` all in `[0, 1]`.
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match (sector as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    ((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

// ---------------------------------------------------------------------------
// RenderPipeline
// ---------------------------------------------------------------------------

/// Owns the working framebuffer and draws each frame kind into it.
pub struct RenderPipeline {
    frame: FrameBuffer,
}

impl RenderPipeline {
    pub fn new() -> Self {
        Self {
            frame: FrameBuffer::new(),
        }
    }

    /// The single black frame pushed on the backlight-off transition.
    pub fn blank(&mut self) -> &FrameBuffer {
        self.frame.clear();
        &self.frame
    }

    /// Full telemetry redraw: gradient columns, line graph, header text,
    /// plus any shutdown overlay.
    pub fn telemetry(
        &mut self,
        variable: Variable,
        value: f32,
        history: &RollingBuffer,
        stage: ShutdownStage,
    ) -> &FrameBuffer {
        self.frame.clear();

        let plot_height = (frame::HEIGHT - TOP_BAR_PX) as f32;
        for (i, norm) in history.normalised().iter().enumerate() {
            let x = (i * GRAPH_COLUMN_PX) as i32;
            let hue = (1.0 - norm) * 0.6;
            let (r, g, b) = hsv_to_rgb(hue, 1.0, 1.0);
            Rectangle::new(
                Point::new(x, TOP_BAR_PX as i32),
                Size::new(GRAPH_COLUMN_PX as u32, plot_height as u32),
            )
            .into_styled(PrimitiveStyle::with_fill(rgb(r, g, b)))
            .draw(&mut self.frame)
            .ok();

            // Line-graph marker: higher-normalised samples sit nearer the top.
            let line_y = frame::HEIGHT as f32 - norm * plot_height;
            Rectangle::new(
                Point::new(x, line_y as i32),
                Size::new(GRAPH_COLUMN_PX as u32, 1),
            )
            .into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK))
            .draw(&mut self.frame)
            .ok();
        }

        let label = variable.label();
        let short = label.get(..4).unwrap_or(label);
        let mut header: heapless::String<40> = heapless::String::new();
        let _ = write!(header, "{}: {:.1} {}", short, value, variable.unit());
        let style = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);
        Text::with_baseline(&header, Point::new(4, 0), style, Baseline::Top)
            .draw(&mut self.frame)
            .ok();

        self.stage_overlay(stage);
        &self.frame
    }

    /// Static overlay page, with any shutdown overlay on top.
    pub fn overlay(&mut self, page: OverlayPage, stage: ShutdownStage) -> &FrameBuffer {
        self.frame.clear();

        let (title, lines): (&str, &[&str]) = match page {
            OverlayPage::About => (
                "enviropod",
                &[
                    concat!("firmware v", env!("CARGO_PKG_VERSION")),
                    "environmental display pod",
                ],
            ),
            OverlayPage::SensorGuide => (
                "Sensors",
                &[
                    "BME280  temp/press/hum",
                    "LTR-559 light+proximity",
                    "MiCS-6814 gas channels",
                ],
            ),
            OverlayPage::GestureHelp => (
                "Gestures",
                &[
                    "Wave: next screen",
                    "Hold 3s: shutdown warning",
                    "Hold 6s: power off",
                ],
            ),
        };

        let title_style = MonoTextStyle::new(&FONT_6X10, rgb(255, 255, 255));
        let body_style = MonoTextStyle::new(&FONT_6X10, rgb(160, 200, 255));
        Text::with_baseline(title, Point::new(4, 2), title_style, Baseline::Top)
            .draw(&mut self.frame)
            .ok();
        for (row, line) in lines.iter().enumerate() {
            let y = 30 + (row as i32 * 12);
            Text::with_baseline(line, Point::new(4, y), body_style, Baseline::Top)
                .draw(&mut self.frame)
                .ok();
        }

        self.stage_overlay(stage);
        &self.frame
    }

    /// Warning / confirmation text drawn after the base content.
    fn stage_overlay(&mut self, stage: ShutdownStage) {
        let (text, colour) = match stage {
            ShutdownStage::Idle => return,
            ShutdownStage::Warn => ("Hold to shut down", rgb(255, 192, 192)),
            ShutdownStage::Confirmed => ("Shutting down...", rgb(255, 128, 128)),
        };
        let style = MonoTextStyle::new(&FONT_6X10, colour);
        Text::with_baseline(text, Point::new(4, 18), style, Baseline::Top)
            .draw(&mut self.frame)
            .ok();
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new()
    }
}
