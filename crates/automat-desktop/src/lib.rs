//! Desktop-backed context for the automat engine: OS windows, controls,
//! on-screen image templates, and OCR text targets.

pub mod context;
pub mod driver;

pub use context::DesktopContext;
pub use driver::{DesktopDriver, DriverError, OcrWord, Point, Rect};
