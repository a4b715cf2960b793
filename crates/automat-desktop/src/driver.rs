//! The desktop-automation capability boundary.
//!
//! `DesktopDriver` wraps the OS-level primitives the desktop context
//! consumes: window wait/foreground calls, on-screen image template
//! matching, screen capture + OCR, and input synthesis. The context
//! composes these; their internals (native APIs, OCR engine) are outside
//! the core.

use std::time::Duration;

/// A screen position in absolute pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// A window rectangle in absolute screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// One recognized word with its bounding box, relative to the captured
/// region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrWord {
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl OcrWord {
    /// Center of the word's bounding box, offset into screen coordinates
    /// by the capture origin.
    pub fn center_in(&self, region: Rect) -> Point {
        Point {
            x: region.left + self.left + self.width / 2,
            y: region.top + self.top + self.height / 2,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum DriverError {
    #[error("no such window: {0}")]
    NoSuchWindow(String),
    #[error("screen capture failed: {0}")]
    Capture(String),
    #[error("ocr failed: {0}")]
    Ocr(String),
    #[error("driver error: {0}")]
    Backend(String),
}

pub trait DesktopDriver {
    type Capture;

    fn window_exists(&mut self, title: &str) -> bool;

    /// Block until a window whose title contains `title` exists, up to
    /// `timeout`. Returns whether it appeared.
    fn wait_window(&mut self, title: &str, timeout: Duration) -> bool;

    /// Bring the window to the foreground.
    fn activate_window(&mut self, title: &str) -> Result<(), DriverError>;

    fn window_active(&mut self, title: &str) -> bool;

    fn window_rect(&mut self, title: &str) -> Result<Rect, DriverError>;

    /// Centers of every on-screen match of the image template, best
    /// match first.
    fn locate_image(
        &mut self,
        template_path: &str,
        confidence: f32,
        grayscale: bool,
    ) -> Result<Vec<Point>, DriverError>;

    fn capture(&mut self, region: Rect) -> Result<Self::Capture, DriverError>;

    fn ocr(&mut self, capture: &Self::Capture) -> Result<Vec<OcrWord>, DriverError>;

    fn click_point(&mut self, point: Point) -> Result<(), DriverError>;

    /// Click a control addressed by backend control id inside a window.
    fn control_click(&mut self, window: &str, control: &str) -> Result<(), DriverError>;

    /// Type into whatever currently has focus.
    fn type_text(&mut self, text: &str) -> Result<(), DriverError>;
}
