//! The browser-driver capability boundary.
//!
//! `WebDriver` is the narrow interface the web context consumes: find
//! handles for a locator, switch the active window/frame, act on a
//! handle. The context depends only on these signatures, never on a
//! particular driver's API shape. Handle types are associated so a
//! driver can expose whatever ids its protocol uses.

use automat_core::descriptor::By;

#[derive(Debug, Clone, thiserror::Error)]
pub enum DriverError {
    #[error("no such element")]
    NoSuchElement,
    #[error("stale element reference")]
    StaleElement,
    #[error("no such window")]
    NoSuchWindow,
    #[error("no alert present")]
    NoAlert,
    #[error("unsupported locator scheme: {0}")]
    UnsupportedScheme(&'static str),
    #[error("driver error: {0}")]
    Backend(String),
}

pub trait WebDriver {
    type Element: Clone + PartialEq;
    type Window: Clone + PartialEq;

    /// All handles matching the locator, in document order. Only
    /// element-like schemes (`xpath`, `id`, `name`) are meaningful here.
    fn find_all(&mut self, by: By, path: &str) -> Result<Vec<Self::Element>, DriverError>;

    fn is_displayed(&mut self, element: &Self::Element) -> bool;
    fn is_enabled(&mut self, element: &Self::Element) -> bool;
    fn tag_name(&mut self, element: &Self::Element) -> Result<String, DriverError>;
    fn text(&mut self, element: &Self::Element) -> Result<String, DriverError>;
    fn attribute(
        &mut self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    fn click(&mut self, element: &Self::Element) -> Result<(), DriverError>;
    /// Scripted click fallback for targets that reject a native click.
    fn script_click(&mut self, element: &Self::Element) -> Result<(), DriverError>;
    fn clear(&mut self, element: &Self::Element) -> Result<(), DriverError>;
    fn send_keys(&mut self, element: &Self::Element, text: &str) -> Result<(), DriverError>;
    fn select_by_visible_text(
        &mut self,
        element: &Self::Element,
        text: &str,
    ) -> Result<(), DriverError>;

    /// Tabular structure of a table element as rows of cell strings.
    fn table_grid(&mut self, element: &Self::Element) -> Result<Vec<Vec<String>>, DriverError>;

    fn window_handles(&mut self) -> Result<Vec<Self::Window>, DriverError>;
    fn current_window(&mut self) -> Result<Self::Window, DriverError>;
    fn switch_to_window(&mut self, window: &Self::Window) -> Result<(), DriverError>;
    /// Close the currently focused window.
    fn close_window(&mut self) -> Result<(), DriverError>;
    fn title(&mut self) -> Result<String, DriverError>;
    fn current_url(&mut self) -> Result<String, DriverError>;

    fn switch_to_frame(&mut self, element: &Self::Element) -> Result<(), DriverError>;
    fn switch_to_default_content(&mut self) -> Result<(), DriverError>;

    /// Text of the open alert, or `None` when no alert is present.
    fn alert_text(&mut self) -> Result<Option<String>, DriverError>;
    fn alert_accept(&mut self) -> Result<(), DriverError>;
    fn alert_dismiss(&mut self) -> Result<(), DriverError>;

    fn navigate(&mut self, url: &str) -> Result<(), DriverError>;
}
