//! Browser-backed context: resolution, activation, and actions over a
//! [`WebDriver`].
//!
//! Activation walks the descriptor's ancestor chain root-to-leaf and is
//! re-derived from the root on every operation, so no call assumes the
//! window/frame the driver happened to be left in. Single-element
//! resolution is strict about ambiguity: more than one (visible) match
//! reads as not-found so locators stay precise.

use crate::driver::{DriverError, WebDriver};
use automat_core::context::Context;
use automat_core::descriptor::{By, Category, Descriptor, Namespace, Order, MAX_CHAIN_DEPTH};
use automat_core::error::{Error, Result};
use automat_core::wait::{effective, settle, wait_until};
use automat_core::WebConfig;
use rand::seq::index::sample;
use std::time::Duration;
use tracing::{debug, warn};

const CONTEXT_NAME: &str = "web";

pub struct WebContext<D: WebDriver> {
    driver: D,
    /// The window focused at construction; `go` and default-container
    /// activation reset to it.
    home_window: D::Window,
    current_frame: Option<D::Element>,
    config: WebConfig,
}

impl<D: WebDriver> WebContext<D> {
    pub fn new(mut driver: D, config: WebConfig) -> std::result::Result<Self, DriverError> {
        let home_window = driver.current_window()?;
        Ok(Self {
            driver,
            home_window,
            current_frame: None,
            config,
        })
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

    // ----- resolution -------------------------------------------------

    /// Resolve to exactly one element handle, honoring the visible filter
    /// and the ambiguity policy. Timeout elapse returns `None`, never an
    /// error, so `exist` can tell absent from backend failure.
    fn resolve_element(&mut self, desc: &Descriptor) -> Option<D::Element> {
        let timeout = self.timeout(desc);
        let poll = self.config.poll();
        wait_until(timeout, poll, || {
            let mut candidates = self.matching_elements(desc);
            match candidates.len() {
                1 => Some(candidates.remove(0)),
                0 => None,
                n => {
                    debug!(desc = %desc, matches = n, "ambiguous match treated as not found");
                    None
                }
            }
        })
    }

    /// Resolve all matching handles; empty after timeout means none.
    fn resolve_elements(&mut self, desc: &Descriptor) -> Vec<D::Element> {
        let timeout = self.timeout(desc);
        let poll = self.config.poll();
        wait_until(timeout, poll, || {
            let candidates = self.matching_elements(desc);
            (!candidates.is_empty()).then_some(candidates)
        })
        .unwrap_or_default()
    }

    fn matching_elements(&mut self, desc: &Descriptor) -> Vec<D::Element> {
        let found = match self.driver.find_all(desc.by(), desc.path()) {
            Ok(found) => found,
            Err(_) => return Vec::new(),
        };
        if !desc.element().visible {
            return found;
        }
        found
            .into_iter()
            .filter(|el| self.driver.is_displayed(el) && self.driver.is_enabled(el))
            .collect()
    }

    /// Find the window whose title or URL contains the descriptor path.
    /// The previously focused window is restored after probing.
    fn resolve_window(&mut self, desc: &Descriptor) -> Option<D::Window> {
        let timeout = self.timeout(desc);
        let poll = self.config.poll();
        wait_until(timeout, poll, || self.probe_windows(desc))
    }

    fn probe_windows(&mut self, desc: &Descriptor) -> Option<D::Window> {
        let current = self.driver.current_window().ok();
        let handles = self.driver.window_handles().ok()?;
        let mut found = None;
        for handle in handles {
            if self.driver.switch_to_window(&handle).is_err() {
                continue;
            }
            let field = match desc.by() {
                By::Title => self.driver.title(),
                By::Url => self.driver.current_url(),
                _ => return None,
            };
            if field.map(|f| f.contains(desc.path())).unwrap_or(false) {
                found = Some(handle);
                break;
            }
        }
        if let Some(current) = current {
            let _ = self.driver.switch_to_window(&current);
        }
        found
    }

    fn resolve_alert(&mut self, desc: &Descriptor) -> Option<()> {
        let timeout = self.timeout(desc);
        let poll = self.config.poll();
        wait_until(timeout, poll, || {
            match self.driver.alert_text() {
                Ok(Some(text)) if text.contains(desc.path()) => Some(()),
                _ => None,
            }
        })
    }

    /// Whether the descriptor currently resolves to a live handle.
    fn resolve_present(&mut self, desc: &Descriptor) -> bool {
        match desc.category() {
            Category::Element if desc.element().multiple => {
                !self.resolve_elements(desc).is_empty()
            }
            Category::Element => self.resolve_element(desc).is_some(),
            Category::Window => self.resolve_window(desc).is_some(),
            Category::Transient => self.resolve_alert(desc).is_some(),
            // The default container always resolves.
            Category::DefaultContainer => true,
            _ => false,
        }
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

        // Outermost container first. A failure anywhere above this node
        // reads as an activation failure naming the container.
        if let Some(parent) = desc.parent() {
            self.activate_node(parent, depth + 1).map_err(|e| match e {
                Error::ActivationFailure { .. } => e,
                other => Error::activation_failure(CONTEXT_NAME, parent, other.to_string()),
            })?;
        }

        match desc.category() {
            Category::DefaultContainer => {
                self.set_default_window()
                    .and_then(|_| self.set_default_frame())
                    .map_err(|e| Error::activation_failure(CONTEXT_NAME, desc, e.to_string()))?;
                Ok(())
            }
            Category::Window => {
                let handle = self
                    .resolve_window(desc)
                    .ok_or_else(|| Error::element_not_found(CONTEXT_NAME, desc, "activate"))?;
                debug!(desc = %desc, "switching active window");
                self.set_current_window(&handle)
                    .map_err(|e| Error::activation_failure(CONTEXT_NAME, desc, e.to_string()))
            }
            Category::Element => {
                // Multi-match nodes only need presence; the ambiguity
                // policy applies to single-handle resolution alone.
                if desc.element().multiple {
                    if self.resolve_elements(desc).is_empty() {
                        return Err(Error::element_not_found(CONTEXT_NAME, desc, "activate"));
                    }
                    return Ok(());
                }
                let element = self
                    .resolve_element(desc)
                    .ok_or_else(|| Error::element_not_found(CONTEXT_NAME, desc, "activate"))?;
                let tag = self.driver.tag_name(&element).unwrap_or_default();
                if matches!(tag.to_ascii_lowercase().as_str(), "frame" | "iframe") {
                    // A top-level frame enters from the default window.
                    if desc.parent().is_none() {
                        self.set_default_window().map_err(|e| {
                            Error::activation_failure(CONTEXT_NAME, desc, e.to_string())
                        })?;
                    }
                    debug!(desc = %desc, "switching active frame");
                    self.set_current_frame(element).map_err(|e| {
                        Error::activation_failure(CONTEXT_NAME, desc, e.to_string())
                    })?;
                }
                Ok(())
            }
            Category::Transient => {
                // Present or absent; nothing to switch into.
                self.resolve_alert(desc)
                    .map(|_| ())
                    .ok_or_else(|| Error::element_not_found(CONTEXT_NAME, desc, "activate"))
            }
            _ => Err(Error::invalid_operation(CONTEXT_NAME, desc, "activate")),
        }
    }

    // ----- session state ----------------------------------------------

    fn set_current_window(&mut self, handle: &D::Window) -> std::result::Result<(), DriverError> {
        if self.driver.current_window().ok().as_ref() == Some(handle) {
            return Ok(());
        }
        self.driver.switch_to_window(handle)
    }

    fn set_default_window(&mut self) -> std::result::Result<(), DriverError> {
        let home = self.home_window.clone();
        self.set_current_window(&home)
    }

    fn set_current_frame(&mut self, frame: D::Element) -> std::result::Result<(), DriverError> {
        self.driver.switch_to_frame(&frame)?;
        self.current_frame = Some(frame);
        Ok(())
    }

    fn set_default_frame(&mut self) -> std::result::Result<(), DriverError> {
        self.driver.switch_to_default_content()?;
        self.current_frame = None;
        Ok(())
    }

    pub fn current_frame(&self) -> Option<&D::Element> {
        self.current_frame.as_ref()
    }

    /// Close every window except the currently focused one.
    pub fn close_other_windows(&mut self) -> std::result::Result<(), DriverError> {
        let current = self.driver.current_window()?;
        let handles = self.driver.window_handles()?;
        for handle in handles {
            if handle == current {
                continue;
            }
            self.driver.switch_to_window(&handle)?;
            self.driver.close_window()?;
        }
        self.driver.switch_to_window(&current)
    }

    // ----- actions ----------------------------------------------------

    fn click_element(
        &mut self,
        element: &D::Element,
        desc: &Descriptor,
        op: &'static str,
    ) -> Result<()> {
        if let Err(native) = self.driver.click(element) {
            warn!(desc = %desc, error = %native, "native click rejected; falling back to scripted click");
            self.driver.script_click(element).map_err(|e| {
                Error::operation_failure(CONTEXT_NAME, desc, op, e.to_string())
            })?;
        }
        Ok(())
    }

    fn require_element(&mut self, desc: &Descriptor, op: &'static str) -> Result<D::Element> {
        if desc.category() != Category::Element {
            return Err(Error::invalid_operation(CONTEXT_NAME, desc, op));
        }
        self.resolve_element(desc)
            .ok_or_else(|| Error::element_not_found(CONTEXT_NAME, desc, op))
    }

    /// Pick the subset of handles to act on. An explicit request larger
    /// than the match set fails before any action runs.
    fn sample_targets(
        &mut self,
        desc: &Descriptor,
        elements: Vec<D::Element>,
        num_samples: Option<usize>,
    ) -> Result<Vec<D::Element>> {
        let requested = num_samples.or_else(|| {
            (desc.element().sample > 0).then_some(desc.element().sample)
        });
        let Some(k) = requested else {
            return Ok(elements);
        };
        if k > elements.len() {
            return Err(Error::operation_failure(
                CONTEXT_NAME,
                desc,
                "clicks",
                format!("requested {} samples but only {} matches", k, elements.len()),
            ));
        }
        let chosen = match desc.element().order {
            Order::Random => {
                let mut rng = rand::thread_rng();
                let mut indices = sample(&mut rng, elements.len(), k).into_vec();
                indices.sort_unstable();
                indices
                    .into_iter()
                    .map(|i| elements[i].clone())
                    .collect()
            }
            Order::FromStart => elements[..k].to_vec(),
            Order::FromEnd => elements[elements.len() - k..].to_vec(),
        };
        Ok(chosen)
    }
}

impl<D: WebDriver> Context for WebContext<D> {
    fn name(&self) -> &str {
        CONTEXT_NAME
    }

    fn namespace(&self) -> Namespace {
        Namespace::Web
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
        self.resolve_present(desc)
    }

    fn click(&mut self, desc: &Descriptor) -> Result<()> {
        self.activate(desc)?;
        let element = self.require_element(desc, "click")?;
        settle(self.differ(desc));
        self.click_element(&element, desc, "click")
    }

    fn clicks(&mut self, desc: &Descriptor, num_samples: Option<usize>) -> Result<()> {
        self.activate(desc)?;
        if desc.category() != Category::Element {
            return Err(Error::invalid_operation(CONTEXT_NAME, desc, "clicks"));
        }
        let elements = self.resolve_elements(desc);
        if elements.is_empty() {
            return Err(Error::element_not_found(CONTEXT_NAME, desc, "clicks"));
        }
        let chosen = self.sample_targets(desc, elements, num_samples)?;
        debug!(desc = %desc, targets = chosen.len(), "clicking sampled targets");
        let differ = self.differ(desc);
        for element in &chosen {
            // One settle per individual click; the first failure aborts
            // the remaining targets.
            settle(differ);
            self.click_element(element, desc, "clicks")?;
        }
        Ok(())
    }

    fn type_text(&mut self, desc: &Descriptor, text: &str) -> Result<()> {
        self.activate(desc)?;
        let element = self.require_element(desc, "type")?;
        settle(self.differ(desc));
        self.driver
            .clear(&element)
            .map_err(|e| Error::operation_failure(CONTEXT_NAME, desc, "type", e.to_string()))?;
        let leftover = self
            .driver
            .attribute(&element, "value")
            .unwrap_or_default()
            .filter(|v| !v.is_empty());
        if leftover.is_some() {
            return Err(Error::operation_failure(
                CONTEXT_NAME,
                desc,
                "type",
                "field value did not clear",
            ));
        }
        self.driver
            .send_keys(&element, text)
            .map_err(|e| Error::operation_failure(CONTEXT_NAME, desc, "type", e.to_string()))
    }

    fn select(&mut self, desc: &Descriptor, text: &str) -> Result<()> {
        self.activate(desc)?;
        let element = self.require_element(desc, "select")?;
        settle(self.differ(desc));
        self.driver
            .select_by_visible_text(&element, text)
            .map_err(|e| Error::operation_failure(CONTEXT_NAME, desc, "select", e.to_string()))
    }

    fn accept(&mut self, desc: &Descriptor) -> Result<()> {
        if desc.category() != Category::Transient {
            return Err(Error::invalid_operation(CONTEXT_NAME, desc, "accept"));
        }
        self.resolve_alert(desc)
            .ok_or_else(|| Error::element_not_found(CONTEXT_NAME, desc, "accept"))?;
        settle(self.differ(desc));
        self.driver
            .alert_accept()
            .map_err(|e| Error::operation_failure(CONTEXT_NAME, desc, "accept", e.to_string()))
    }

    fn dismiss(&mut self, desc: &Descriptor) -> Result<()> {
        if desc.category() != Category::Transient {
            return Err(Error::invalid_operation(CONTEXT_NAME, desc, "dismiss"));
        }
        self.resolve_alert(desc)
            .ok_or_else(|| Error::element_not_found(CONTEXT_NAME, desc, "dismiss"))?;
        settle(self.differ(desc));
        self.driver
            .alert_dismiss()
            .map_err(|e| Error::operation_failure(CONTEXT_NAME, desc, "dismiss", e.to_string()))
    }

    fn table(&mut self, desc: &Descriptor) -> Result<Vec<Vec<String>>> {
        self.activate(desc)?;
        let element = self.require_element(desc, "table")?;
        let tag = self.driver.tag_name(&element).unwrap_or_default();
        if !tag.eq_ignore_ascii_case("table") {
            return Err(Error::invalid_operation(CONTEXT_NAME, desc, "table"));
        }
        // Tables are read after the settle delay so the grid reflects a
        // visually settled page.
        settle(self.differ(desc));
        self.driver
            .table_grid(&element)
            .map_err(|e| Error::operation_failure(CONTEXT_NAME, desc, "table", e.to_string()))
    }

    fn text(&mut self, desc: &Descriptor) -> Result<String> {
        self.activate(desc)?;
        let element = self.require_element(desc, "text")?;
        self.driver
            .text(&element)
            .map_err(|e| Error::operation_failure(CONTEXT_NAME, desc, "text", e.to_string()))
    }

    fn count(&mut self, desc: &Descriptor) -> Result<usize> {
        if desc.category() != Category::Element {
            return Err(Error::invalid_operation(CONTEXT_NAME, desc, "count"));
        }
        if let Some(parent) = desc.parent() {
            if self.activate_node(parent, 1).is_err() {
                return Ok(0);
            }
        }
        Ok(self.resolve_elements(desc).len())
    }

    fn go(&mut self, desc: &Descriptor) -> Result<()> {
        if desc.by() != By::Url {
            return Err(Error::invalid_operation(CONTEXT_NAME, desc, "go"));
        }
        match desc.parent() {
            None => {
                self.set_default_window().map_err(|e| {
                    Error::operation_failure(CONTEXT_NAME, desc, "go", e.to_string())
                })?;
            }
            Some(parent) => self.activate_node(parent, 1)?,
        }
        debug!(url = desc.path(), "navigating");
        self.driver
            .navigate(desc.path())
            .map_err(|e| Error::operation_failure(CONTEXT_NAME, desc, "go", e.to_string()))
    }
}
