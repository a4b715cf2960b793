//! Core of the automat engine: the descriptor model, the backend
//! capability contract, the dispatch facade, and the shared wait/settle
//! helpers. Backend crates (`automat-web`, `automat-desktop`) implement
//! [`Context`] over their native driver primitives.

pub mod config;
pub mod context;
pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod wait;

pub use config::{AutomatConfig, ConfigError, ConfigLoader, DesktopConfig, WebConfig};
pub use context::Context;
pub use descriptor::{By, Category, Descriptor, ElementOptions, ImageOptions, Namespace, Order, MAX_CHAIN_DEPTH};
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
