//! Web context tests over a scriptable mock driver.
//!
//! The mock records every driver call so tests can assert activation
//! order, sampling behavior, settle delays, and failure propagation
//! without a real browser.

use automat_core::context::Context;
use automat_core::descriptor::{By, Descriptor, Order};
use automat_core::error::Error;
use automat_core::WebConfig;
use automat_web::context::WebContext;
use automat_web::driver::{DriverError, WebDriver};
use std::collections::HashSet;
use std::time::{Duration, Instant};

#[derive(Clone)]
struct MockElement {
    id: u32,
    by: By,
    path: String,
    displayed: bool,
    enabled: bool,
    tag: String,
    text: String,
    value: String,
    grid: Vec<Vec<String>>,
}

struct MockWindow {
    handle: String,
    title: String,
    url: String,
}

/// A mock driver that tracks which primitives were called.
struct MockDriver {
    elements: Vec<MockElement>,
    windows: Vec<MockWindow>,
    current_window: String,
    alert: Option<String>,
    alert_accepted: bool,
    alert_dismissed: bool,
    fail_find: bool,
    fail_native_click: HashSet<u32>,
    fail_script_click: HashSet<u32>,
    clear_leaves_value: HashSet<u32>,
    clicked: Vec<u32>,
    script_clicked: Vec<u32>,
    cleared: Vec<u32>,
    typed: Vec<(u32, String)>,
    selected: Vec<(u32, String)>,
    switched_frames: Vec<u32>,
    default_content_resets: usize,
    window_switches: Vec<String>,
    navigations: Vec<String>,
}

impl MockDriver {
    fn new() -> Self {
        Self {
            elements: Vec::new(),
            windows: vec![MockWindow {
                handle: "main".into(),
                title: "Home".into(),
                url: "https://home.example".into(),
            }],
            current_window: "main".into(),
            alert: None,
            alert_accepted: false,
            alert_dismissed: false,
            fail_find: false,
            fail_native_click: HashSet::new(),
            fail_script_click: HashSet::new(),
            clear_leaves_value: HashSet::new(),
            clicked: Vec::new(),
            script_clicked: Vec::new(),
            cleared: Vec::new(),
            typed: Vec::new(),
            selected: Vec::new(),
            switched_frames: Vec::new(),
            default_content_resets: 0,
            window_switches: Vec::new(),
            navigations: Vec::new(),
        }
    }

    fn add_window(&mut self, handle: &str, title: &str, url: &str) {
        self.windows.push(MockWindow {
            handle: handle.into(),
            title: title.into(),
            url: url.into(),
        });
    }

    fn add_element(&mut self, id: u32, by: By, path: &str, tag: &str) -> &mut MockElement {
        self.elements.push(MockElement {
            id,
            by,
            path: path.into(),
            displayed: true,
            enabled: true,
            tag: tag.into(),
            text: String::new(),
            value: String::new(),
            grid: Vec::new(),
        });
        self.elements.last_mut().unwrap()
    }

    fn element(&self, id: u32) -> &MockElement {
        self.elements.iter().find(|e| e.id == id).unwrap()
    }

    fn element_mut(&mut self, id: u32) -> &mut MockElement {
        self.elements.iter_mut().find(|e| e.id == id).unwrap()
    }
}

impl WebDriver for MockDriver {
    type Element = u32;
    type Window = String;

    fn find_all(&mut self, by: By, path: &str) -> Result<Vec<u32>, DriverError> {
        if self.fail_find {
            return Err(DriverError::Backend("find failed".into()));
        }
        Ok(self
            .elements
            .iter()
            .filter(|e| e.by == by && e.path == path)
            .map(|e| e.id)
            .collect())
    }

    fn is_displayed(&mut self, element: &u32) -> bool {
        self.element(*element).displayed
    }

    fn is_enabled(&mut self, element: &u32) -> bool {
        self.element(*element).enabled
    }

    fn tag_name(&mut self, element: &u32) -> Result<String, DriverError> {
        Ok(self.element(*element).tag.clone())
    }

    fn text(&mut self, element: &u32) -> Result<String, DriverError> {
        Ok(self.element(*element).text.clone())
    }

    fn attribute(&mut self, element: &u32, name: &str) -> Result<Option<String>, DriverError> {
        if name == "value" {
            let value = self.element(*element).value.clone();
            return Ok((!value.is_empty()).then_some(value));
        }
        Ok(None)
    }

    fn click(&mut self, element: &u32) -> Result<(), DriverError> {
        if self.fail_native_click.contains(element) {
            return Err(DriverError::Backend("click intercepted".into()));
        }
        self.clicked.push(*element);
        Ok(())
    }

    fn script_click(&mut self, element: &u32) -> Result<(), DriverError> {
        if self.fail_script_click.contains(element) {
            return Err(DriverError::Backend("script click failed".into()));
        }
        self.script_clicked.push(*element);
        Ok(())
    }

    fn clear(&mut self, element: &u32) -> Result<(), DriverError> {
        self.cleared.push(*element);
        if !self.clear_leaves_value.contains(element) {
            self.element_mut(*element).value.clear();
        }
        Ok(())
    }

    fn send_keys(&mut self, element: &u32, text: &str) -> Result<(), DriverError> {
        self.typed.push((*element, text.into()));
        Ok(())
    }

    fn select_by_visible_text(&mut self, element: &u32, text: &str) -> Result<(), DriverError> {
        self.selected.push((*element, text.into()));
        Ok(())
    }

    fn table_grid(&mut self, element: &u32) -> Result<Vec<Vec<String>>, DriverError> {
        Ok(self.element(*element).grid.clone())
    }

    fn window_handles(&mut self) -> Result<Vec<String>, DriverError> {
        Ok(self.windows.iter().map(|w| w.handle.clone()).collect())
    }

    fn current_window(&mut self) -> Result<String, DriverError> {
        Ok(self.current_window.clone())
    }

    fn switch_to_window(&mut self, window: &String) -> Result<(), DriverError> {
        if !self.windows.iter().any(|w| &w.handle == window) {
            return Err(DriverError::NoSuchWindow);
        }
        self.current_window = window.clone();
        self.window_switches.push(window.clone());
        Ok(())
    }

    fn close_window(&mut self) -> Result<(), DriverError> {
        let current = self.current_window.clone();
        self.windows.retain(|w| w.handle != current);
        Ok(())
    }

    fn title(&mut self) -> Result<String, DriverError> {
        self.windows
            .iter()
            .find(|w| w.handle == self.current_window)
            .map(|w| w.title.clone())
            .ok_or(DriverError::NoSuchWindow)
    }

    fn current_url(&mut self) -> Result<String, DriverError> {
        self.windows
            .iter()
            .find(|w| w.handle == self.current_window)
            .map(|w| w.url.clone())
            .ok_or(DriverError::NoSuchWindow)
    }

    fn switch_to_frame(&mut self, element: &u32) -> Result<(), DriverError> {
        self.switched_frames.push(*element);
        Ok(())
    }

    fn switch_to_default_content(&mut self) -> Result<(), DriverError> {
        self.default_content_resets += 1;
        Ok(())
    }

    fn alert_text(&mut self) -> Result<Option<String>, DriverError> {
        Ok(self.alert.clone())
    }

    fn alert_accept(&mut self) -> Result<(), DriverError> {
        if self.alert.take().is_none() {
            return Err(DriverError::NoAlert);
        }
        self.alert_accepted = true;
        Ok(())
    }

    fn alert_dismiss(&mut self) -> Result<(), DriverError> {
        if self.alert.take().is_none() {
            return Err(DriverError::NoAlert);
        }
        self.alert_dismissed = true;
        Ok(())
    }

    fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.navigations.push(url.into());
        Ok(())
    }
}

fn fast_config() -> WebConfig {
    WebConfig {
        timeout: 0.2,
        differ: 0.0,
        poll: 0.02,
    }
}

fn context(driver: MockDriver) -> WebContext<MockDriver> {
    WebContext::new(driver, fast_config()).unwrap()
}

#[test]
fn click_activates_window_then_frame_then_clicks() {
    let mut driver = MockDriver::new();
    driver.add_window("w2", "Login", "https://login.example");
    driver.add_element(1, By::Id, "content", "iframe");
    driver.add_element(2, By::Xpath, "//button[@id='submit']", "button");
    let mut ctx = context(driver);

    let window = Descriptor::title("Login");
    let frame = Descriptor::id("content").with_parent(window);
    let button = Descriptor::xpath("//button[@id='submit']").with_parent(frame);

    ctx.click(&button).unwrap();

    let driver = ctx.driver();
    assert_eq!(driver.current_window, "w2");
    assert_eq!(driver.switched_frames, vec![1]);
    assert_eq!(driver.clicked, vec![2]);
    // The chain carries no default-frame node, so no default reset happens.
    assert_eq!(driver.default_content_resets, 0);
}

#[test]
fn missing_ancestor_window_is_an_activation_failure() {
    let mut driver = MockDriver::new();
    driver.add_element(2, By::Xpath, "//button", "button");
    let mut ctx = context(driver);

    let button =
        Descriptor::xpath("//button").with_parent(Descriptor::title("Login"));
    let err = ctx.click(&button).unwrap_err();
    assert!(matches!(err, Error::ActivationFailure { .. }));
    assert!(ctx.driver().clicked.is_empty());
}

#[test]
fn missing_target_element_is_element_not_found() {
    let driver = MockDriver::new();
    let mut ctx = context(driver);

    let err = ctx.click(&Descriptor::xpath("//nope")).unwrap_err();
    assert!(matches!(err, Error::ElementNotFound { .. }));
}

#[test]
fn ambiguous_single_match_is_treated_as_not_found() {
    let mut driver = MockDriver::new();
    driver.add_element(1, By::Xpath, "//dup", "button");
    driver.add_element(2, By::Xpath, "//dup", "button");
    let mut ctx = context(driver);

    let desc = Descriptor::xpath("//dup");
    let err = ctx.click(&desc).unwrap_err();
    assert!(matches!(err, Error::ElementNotFound { .. }));
    assert!(!ctx.exist(&desc));
    assert!(ctx.driver().clicked.is_empty());
}

#[test]
fn count_respects_the_visibility_filter() {
    let mut driver = MockDriver::new();
    for id in 0..5 {
        driver.add_element(id, By::Xpath, "//li", "li");
    }
    for id in 5..7 {
        driver.add_element(id, By::Xpath, "//li", "li").displayed = false;
    }
    let mut ctx = context(driver);

    let visible_only = Descriptor::xpath("//li").multiple();
    assert_eq!(ctx.count(&visible_only).unwrap(), 5);

    let all = Descriptor::xpath("//li").multiple().visible(false);
    assert_eq!(ctx.count(&all).unwrap(), 7);
}

#[test]
fn clicks_samples_from_the_start_by_default() {
    let mut driver = MockDriver::new();
    for id in [10, 11, 12, 13] {
        driver.add_element(id, By::Xpath, "//item", "a");
    }
    let mut ctx = context(driver);

    let desc = Descriptor::xpath("//item").multiple();
    ctx.clicks(&desc, Some(2)).unwrap();
    assert_eq!(ctx.driver().clicked, vec![10, 11]);
}

#[test]
fn clicks_honors_the_from_end_order() {
    let mut driver = MockDriver::new();
    for id in [10, 11, 12, 13] {
        driver.add_element(id, By::Xpath, "//item", "a");
    }
    let mut ctx = context(driver);

    let desc = Descriptor::xpath("//item")
        .multiple()
        .with_sample(2, Order::FromEnd);
    ctx.clicks(&desc, None).unwrap();
    assert_eq!(ctx.driver().clicked, vec![12, 13]);
}

#[test]
fn oversampling_fails_before_any_click() {
    let mut driver = MockDriver::new();
    for id in [10, 11, 12, 13] {
        driver.add_element(id, By::Xpath, "//item", "a");
    }
    let mut ctx = context(driver);

    let desc = Descriptor::xpath("//item").multiple();
    let err = ctx.clicks(&desc, Some(6)).unwrap_err();
    assert!(matches!(err, Error::OperationFailure { .. }));
    assert!(ctx.driver().clicked.is_empty());
}

#[test]
fn clicks_applies_one_settle_delay_per_target() {
    let mut driver = MockDriver::new();
    for id in [1, 2, 3] {
        driver.add_element(id, By::Xpath, "//item", "a");
    }
    let mut ctx = context(driver);

    let desc = Descriptor::xpath("//item")
        .multiple()
        .with_differ(Duration::from_millis(40));
    let started = Instant::now();
    ctx.clicks(&desc, None).unwrap();
    assert_eq!(ctx.driver().clicked.len(), 3);
    // Three clicks, each preceded by its own 40ms settle.
    assert!(started.elapsed() >= Duration::from_millis(120));
}

#[test]
fn first_click_failure_aborts_the_remaining_targets() {
    let mut driver = MockDriver::new();
    for id in [1, 2, 3] {
        driver.add_element(id, By::Xpath, "//item", "a");
    }
    driver.fail_native_click.insert(2);
    driver.fail_script_click.insert(2);
    let mut ctx = context(driver);

    let desc = Descriptor::xpath("//item").multiple();
    let err = ctx.clicks(&desc, None).unwrap_err();
    assert!(matches!(err, Error::OperationFailure { .. }));
    assert_eq!(ctx.driver().clicked, vec![1]);
}

#[test]
fn rejected_native_click_falls_back_to_a_scripted_click() {
    let mut driver = MockDriver::new();
    driver.add_element(1, By::Id, "save", "button");
    driver.fail_native_click.insert(1);
    let mut ctx = context(driver);

    ctx.click(&Descriptor::id("save")).unwrap();
    let driver = ctx.driver();
    assert!(driver.clicked.is_empty());
    assert_eq!(driver.script_clicked, vec![1]);
}

#[test]
fn type_clears_the_field_first() {
    let mut driver = MockDriver::new();
    driver.add_element(1, By::Name, "user", "input").value = "old".into();
    let mut ctx = context(driver);

    ctx.type_text(&Descriptor::name("user"), "alice").unwrap();
    let driver = ctx.driver();
    assert_eq!(driver.cleared, vec![1]);
    assert_eq!(driver.typed, vec![(1, "alice".to_string())]);
}

#[test]
fn type_fails_when_the_value_does_not_clear() {
    let mut driver = MockDriver::new();
    driver.add_element(1, By::Name, "user", "input").value = "sticky".into();
    driver.clear_leaves_value.insert(1);
    let mut ctx = context(driver);

    let err = ctx.type_text(&Descriptor::name("user"), "alice").unwrap_err();
    assert!(matches!(err, Error::OperationFailure { .. }));
    assert!(ctx.driver().typed.is_empty());
}

#[test]
fn select_picks_by_visible_text() {
    let mut driver = MockDriver::new();
    driver.add_element(1, By::Id, "country", "select");
    let mut ctx = context(driver);

    ctx.select(&Descriptor::id("country"), "Iceland").unwrap();
    assert_eq!(ctx.driver().selected, vec![(1, "Iceland".to_string())]);
}

#[test]
fn go_without_a_parent_resets_to_the_default_window() {
    let mut driver = MockDriver::new();
    driver.add_window("w2", "Popup", "https://popup.example");
    let mut ctx = context(driver);
    // Wander off to another window first.
    ctx.driver().switch_to_window(&"w2".to_string()).unwrap();

    ctx.go(&Descriptor::url("https://example.com/login")).unwrap();
    let driver = ctx.driver();
    assert_eq!(driver.current_window, "main");
    assert_eq!(driver.navigations, vec!["https://example.com/login"]);
}

#[test]
fn go_with_a_parent_activates_the_chain_instead() {
    let mut driver = MockDriver::new();
    driver.add_window("w2", "Login", "https://login.example");
    let mut ctx = context(driver);

    let target =
        Descriptor::url("https://example.com/next").with_parent(Descriptor::title("Login"));
    ctx.go(&target).unwrap();
    let driver = ctx.driver();
    assert_eq!(driver.current_window, "w2");
    assert!(driver.window_switches.contains(&"w2".to_string()));
    assert_eq!(driver.navigations, vec!["https://example.com/next"]);
}

#[test]
fn go_rejects_non_url_descriptors() {
    let mut driver = MockDriver::new();
    driver.add_element(1, By::Id, "link", "a");
    let mut ctx = context(driver);

    let err = ctx.go(&Descriptor::id("link")).unwrap_err();
    assert!(matches!(err, Error::InvalidOperation { op: "go", .. }));
}

#[test]
fn accept_matches_the_alert_text_substring() {
    let mut driver = MockDriver::new();
    driver.alert = Some("Are you sure you want to leave?".into());
    let mut ctx = context(driver);

    ctx.accept(&Descriptor::alert("sure")).unwrap();
    assert!(ctx.driver().alert_accepted);
}

#[test]
fn dismiss_closes_a_matching_alert() {
    let mut driver = MockDriver::new();
    driver.alert = Some("Unsaved changes".into());
    let mut ctx = context(driver);

    ctx.dismiss(&Descriptor::alert("Unsaved")).unwrap();
    assert!(ctx.driver().alert_dismissed);
}

#[test]
fn dismiss_without_an_alert_is_element_not_found() {
    let driver = MockDriver::new();
    let mut ctx = context(driver);

    let err = ctx.dismiss(&Descriptor::alert("sure")).unwrap_err();
    assert!(matches!(err, Error::ElementNotFound { .. }));
}

#[test]
fn mismatched_alert_text_does_not_resolve() {
    let mut driver = MockDriver::new();
    driver.alert = Some("Session expired".into());
    let mut ctx = context(driver);

    assert!(!ctx.exist(&Descriptor::alert("logout")));
    assert!(ctx.exist(&Descriptor::alert("expired")));
}

#[test]
fn table_reads_the_grid_from_a_table_element() {
    let mut driver = MockDriver::new();
    driver.add_element(1, By::Id, "report", "table").grid = vec![
        vec!["name".into(), "qty".into()],
        vec!["bolt".into(), "42".into()],
    ];
    let mut ctx = context(driver);

    let grid = ctx.table(&Descriptor::id("report")).unwrap();
    assert_eq!(grid[1], vec!["bolt".to_string(), "42".to_string()]);
}

#[test]
fn table_on_a_non_table_element_is_invalid() {
    let mut driver = MockDriver::new();
    driver.add_element(1, By::Id, "report", "div");
    let mut ctx = context(driver);

    let err = ctx.table(&Descriptor::id("report")).unwrap_err();
    assert!(matches!(err, Error::InvalidOperation { op: "table", .. }));
}

#[test]
fn text_reads_visible_element_text() {
    let mut driver = MockDriver::new();
    driver.add_element(1, By::Id, "status", "span").text = "All good".into();
    let mut ctx = context(driver);

    assert_eq!(ctx.text(&Descriptor::id("status")).unwrap(), "All good");
}

#[test]
fn exist_fails_closed_on_driver_errors() {
    let mut driver = MockDriver::new();
    driver.fail_find = true;
    let mut ctx = context(driver);

    assert!(!ctx.exist(&Descriptor::xpath("//whatever")));
}

#[test]
fn exist_fails_closed_on_pathological_chain_depth() {
    let mut driver = MockDriver::new();
    driver.add_element(1, By::Xpath, "//x", "div");
    let mut ctx = context(driver);

    let mut desc = Descriptor::new(By::Xpath, "//x");
    for _ in 0..40 {
        desc = Descriptor::new(By::Xpath, "//x").with_parent(desc);
    }
    assert!(!ctx.exist(&desc));
    let err = ctx.click(&desc).unwrap_err();
    assert!(matches!(err, Error::ActivationFailure { .. }));
}

#[test]
fn default_container_activation_is_idempotent() {
    let mut driver = MockDriver::new();
    driver.add_window("w2", "Other", "https://other.example");
    let mut ctx = context(driver);
    ctx.driver().switch_to_window(&"w2".to_string()).unwrap();

    ctx.activate(&Descriptor::default_frame()).unwrap();
    assert_eq!(ctx.driver().current_window, "main");
    ctx.activate(&Descriptor::default_frame()).unwrap();
    assert_eq!(ctx.driver().current_window, "main");
    assert_eq!(ctx.driver().default_content_resets, 2);
}

#[test]
fn close_other_windows_keeps_the_focused_one() {
    let mut driver = MockDriver::new();
    driver.add_window("w2", "Popup", "https://popup.example");
    driver.add_window("w3", "Ad", "https://ad.example");
    let mut ctx = context(driver);

    ctx.close_other_windows().unwrap();
    let driver = ctx.driver();
    assert_eq!(driver.windows.len(), 1);
    assert_eq!(driver.current_window, "main");
}
