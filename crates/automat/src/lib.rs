//! Umbrella crate tying the automat engine together.
//!
//! Describe a target as a [`Descriptor`] tree, register one context per
//! backend session in a [`Dispatcher`], and call operations on it:
//!
//! ```no_run
//! use automat::prelude::*;
//!
//! # fn demo(web: Box<dyn Context>, desktop: Box<dyn Context>) -> automat::Result<()> {
//! let mut ui = Dispatcher::new(vec![web, desktop]);
//!
//! let login = Descriptor::title("Login");
//! let submit = Descriptor::xpath("//button[@id='submit']").with_parent(login);
//! if ui.exist(&submit) {
//!     ui.click(&submit)?;
//! }
//! # Ok(())
//! # }
//! ```

pub use automat_core::{
    AutomatConfig, By, Category, ConfigError, ConfigLoader, Context, DesktopConfig, Descriptor,
    Dispatcher, ElementOptions, Error, ImageOptions, Namespace, Order, Result, WebConfig,
};
pub use automat_desktop::{DesktopContext, DesktopDriver};
pub use automat_web::{WebContext, WebDriver};

pub mod prelude {
    pub use automat_core::{Context, Descriptor, Dispatcher, Namespace, Order};
    pub use automat_desktop::DesktopContext;
    pub use automat_web::WebContext;
}
