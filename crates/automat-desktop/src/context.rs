//! Desktop context: resolves OS windows, controls, image templates, and
//! OCR text positions, and performs pointer/keyboard actions on them.

use crate::driver::{DesktopDriver, Point};
use automat_core::context::Context;
use automat_core::descriptor::{By, Category, Descriptor, Namespace, MAX_CHAIN_DEPTH};
use automat_core::error::{Error, Result};
use automat_core::wait::{effective, settle, wait_until};
use automat_core::DesktopConfig;
use std::time::Duration;
use tracing::{debug, warn};

const CONTEXT_NAME: &str = "desktop";

/// What a desktop descriptor resolves to.
enum Target {
    /// Window title; an activation switch target, not clickable.
    Window(String),
    /// A control id under its owning window title.
    Control { window: String, control: String },
    /// An absolute screen position (image match or OCR word center).
    Point(Point),
}

pub struct DesktopContext<D: DesktopDriver> {
    driver: D,
    config: DesktopConfig,
}

impl<D: DesktopDriver> DesktopContext<D> {
    pub fn new(driver: D, config: DesktopConfig) -> Self {
        Self { driver, config }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    fn timeout(&self, desc: &Descriptor) -> Duration {
        effective(desc.timeout(), self.config.timeout())
    }

    fn differ(&self, desc: &Descriptor) -> Duration {
        effective(desc.differ(), self.config.differ())
    }

    fn confidence(&self, desc: &Descriptor) -> f32 {
        desc.image_options().confidence.unwrap_or(self.config.confidence)
    }

    fn grayscale(&self, desc: &Descriptor) -> bool {
        desc.image_options().grayscale.unwrap_or(self.config.grayscale)
    }

    /// The owning window title for descriptors that require a window
    /// parent (`control`, `text`).
    fn parent_window_title(&self, desc: &Descriptor, op: &'static str) -> Result<String> {
        match desc.parent() {
            Some(p) if p.by() == By::Window => Ok(p.path().to_string()),
            _ => Err(Error::invalid_operation(CONTEXT_NAME, desc, op)),
        }
    }

    // ----- resolution -------------------------------------------------

    fn resolve(&mut self, desc: &Descriptor, op: &'static str) -> Result<Target> {
        match desc.by() {
            By::Window => {
                let timeout = self.timeout(desc);
                let poll = self.config.poll();
                wait_until(timeout, poll, || {
                    self.driver.window_exists(desc.path()).then(|| ())
                })
                .map(|_| Target::Window(desc.path().to_string()))
                .ok_or_else(|| Error::element_not_found(CONTEXT_NAME, desc, op))
            }
            By::Control => {
                let window = self.parent_window_title(desc, op)?;
                Ok(Target::Control {
                    window,
                    control: desc.path().to_string(),
                })
            }
            By::Image => self
                .locate_image_center(desc)
                .map(Target::Point)
                .ok_or_else(|| Error::element_not_found(CONTEXT_NAME, desc, op)),
            By::Text => {
                let window = self.parent_window_title(desc, op)?;
                self.locate_text_center(desc, &window)
                    .map(Target::Point)
                    .ok_or_else(|| Error::element_not_found(CONTEXT_NAME, desc, op))
            }
            _ => Err(Error::invalid_operation(CONTEXT_NAME, desc, op)),
        }
    }

    fn locate_image_center(&mut self, desc: &Descriptor) -> Option<Point> {
        let timeout = self.timeout(desc);
        let poll = self.config.poll();
        let confidence = self.confidence(desc);
        let grayscale = self.grayscale(desc);
        wait_until(timeout, poll, || {
            self.driver
                .locate_image(desc.path(), confidence, grayscale)
                .ok()
                .and_then(|points| points.into_iter().next())
        })
    }

    /// Capture the parent window, OCR it, and return the screen-space
    /// center of the word exactly matching the descriptor path.
    fn locate_text_center(&mut self, desc: &Descriptor, window: &str) -> Option<Point> {
        let timeout = self.timeout(desc);
        let poll = self.config.poll();
        wait_until(timeout, poll, || {
            let region = self.driver.window_rect(window).ok()?;
            let capture = self.driver.capture(region).ok()?;
            let words = match self.driver.ocr(&capture) {
                Ok(words) => words,
                Err(e) => {
                    warn!(window, error = %e, "ocr pass failed");
                    return None;
                }
            };
            words
                .iter()
                .find(|w| w.text == desc.path())
                .map(|w| w.center_in(region))
        })
    }

    // ----- activation -------------------------------------------------

    fn activate_node(&mut self, desc: &Descriptor, depth: usize) -> Result<()> {
        if depth > MAX_CHAIN_DEPTH {
            return Err(Error::activation_failure(
                CONTEXT_NAME,
                desc,
                format!("ancestor chain exceeds {} levels", MAX_CHAIN_DEPTH),
            ));
        }

        if let Some(parent) = desc.parent() {
            self.activate_node(parent, depth + 1).map_err(|e| match e {
                Error::ActivationFailure { .. } => e,
                other => Error::activation_failure(CONTEXT_NAME, parent, other.to_string()),
            })?;
        }

        if desc.category() == Category::Window {
            let title = desc.path();
            let timeout = self.timeout(desc);
            if !self.driver.wait_window(title, timeout) {
                return Err(Error::element_not_found(CONTEXT_NAME, desc, "activate"));
            }
            debug!(window = title, "bringing window to the foreground");
            self.driver
                .activate_window(title)
                .map_err(|e| Error::activation_failure(CONTEXT_NAME, desc, e.to_string()))?;
            if !self.driver.window_active(title) {
                return Err(Error::activation_failure(
                    CONTEXT_NAME,
                    desc,
                    "window did not come to the foreground",
                ));
            }
            return Ok(());
        }

        // Non-window nodes only need to resolve; nothing to switch into.
        self.resolve(desc, "activate").map(|_| ())
    }
}

impl<D: DesktopDriver> Context for DesktopContext<D> {
    fn name(&self) -> &str {
        CONTEXT_NAME
    }

    fn namespace(&self) -> Namespace {
        Namespace::Desktop
    }

    fn activate(&mut self, desc: &Descriptor) -> Result<()> {
        self.activate_node(desc, 0)
    }

    fn exist(&mut self, desc: &Descriptor) -> bool {
        if let Some(parent) = desc.parent() {
            if self.activate_node(parent, 1).is_err() {
                return false;
            }
        }
        self.resolve(desc, "exist").is_ok()
    }

    fn click(&mut self, desc: &Descriptor) -> Result<()> {
        self.activate(desc)?;
        let target = self.resolve(desc, "click")?;
        settle(self.differ(desc));
        match target {
            Target::Point(point) => self.driver.click_point(point).map_err(|e| {
                Error::operation_failure(CONTEXT_NAME, desc, "click", e.to_string())
            }),
            Target::Control { window, control } => {
                self.driver.control_click(&window, &control).map_err(|e| {
                    Error::operation_failure(CONTEXT_NAME, desc, "click", e.to_string())
                })
            }
            Target::Window(_) => Err(Error::invalid_operation(CONTEXT_NAME, desc, "click")),
        }
    }

    fn type_text(&mut self, desc: &Descriptor, text: &str) -> Result<()> {
        // Focus by clicking the target, then type into the focus. The
        // settle delay is applied by the click.
        self.click(desc)?;
        self.driver
            .type_text(text)
            .map_err(|e| Error::operation_failure(CONTEXT_NAME, desc, "type", e.to_string()))
    }

    fn text(&mut self, desc: &Descriptor) -> Result<String> {
        if desc.by() != By::Text {
            return Err(Error::invalid_operation(CONTEXT_NAME, desc, "text"));
        }
        if let Some(parent) = desc.parent() {
            self.activate_node(parent, 1)?;
        }
        self.resolve(desc, "text")?;
        Ok(desc.path().to_string())
    }

    fn count(&mut self, desc: &Descriptor) -> Result<usize> {
        if desc.by() != By::Image {
            return Err(Error::invalid_operation(CONTEXT_NAME, desc, "count"));
        }
        if let Some(parent) = desc.parent() {
            if self.activate_node(parent, 1).is_err() {
                return Ok(0);
            }
        }
        let timeout = self.timeout(desc);
        let poll = self.config.poll();
        let confidence = self.confidence(desc);
        let grayscale = self.grayscale(desc);
        let matches = wait_until(timeout, poll, || {
            self.driver
                .locate_image(desc.path(), confidence, grayscale)
                .ok()
                .filter(|points| !points.is_empty())
        });
        Ok(matches.map_or(0, |points| points.len()))
    }
}
