//! Browser-driver-backed context for the automat engine.

pub mod context;
pub mod driver;

pub use context::WebContext;
pub use driver::{DriverError, WebDriver};
