//! The descriptor model: immutable tree nodes describing a UI target.
//!
//! A `Descriptor` says *what* to interact with (an addressing scheme plus an
//! opaque locator payload) and *where* it lives (an optional chain of parent
//! containers: windows, frames, controls). Contexts resolve descriptors to
//! live backend handles; the descriptor itself never touches a backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Identifies which context family can resolve a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Web,
    Desktop,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Web => write!(f, "web"),
            Namespace::Desktop => write!(f, "desktop"),
        }
    }
}

/// Resolution category. A pure function of [`By`]: it decides how a
/// descriptor participates in activation and what kind of handle it
/// resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Resolves to zero/one/many interactive element handles.
    Element,
    /// Resolves to a window switch target.
    Window,
    /// Transient dialog (alert); present or absent, never switched into.
    Transient,
    /// The backend's canonical default window + default frame/content.
    DefaultContainer,
    /// An on-screen position (image template or OCR text match).
    Pixel,
    /// A desktop control addressed by id under its owning window.
    Control,
}

/// Addressing scheme tag. Determines namespace and category; the `path`
/// payload is opaque to the core and forwarded to the backend as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum By {
    // Web schemes.
    Xpath,
    Id,
    Name,
    Title,
    Url,
    Alert,
    DefaultFrame,
    // Desktop schemes.
    Window,
    Control,
    Image,
    Text,
}

impl By {
    pub fn namespace(&self) -> Namespace {
        match self {
            By::Xpath | By::Id | By::Name | By::Title | By::Url | By::Alert | By::DefaultFrame => {
                Namespace::Web
            }
            By::Window | By::Control | By::Image | By::Text => Namespace::Desktop,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            By::Xpath | By::Id | By::Name => Category::Element,
            By::Title | By::Url => Category::Window,
            By::Alert => Category::Transient,
            By::DefaultFrame => Category::DefaultContainer,
            By::Window => Category::Window,
            By::Control => Category::Control,
            By::Image | By::Text => Category::Pixel,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            By::Xpath => "xpath",
            By::Id => "id",
            By::Name => "name",
            By::Title => "title",
            By::Url => "url",
            By::Alert => "alert",
            By::DefaultFrame => "default frame",
            By::Window => "window",
            By::Control => "control",
            By::Image => "image",
            By::Text => "text",
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampling policy for multi-match descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    Random,
    #[default]
    FromStart,
    FromEnd,
}

/// Options that only apply to element-like descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementOptions {
    /// Whether the descriptor is expected to match many handles.
    pub multiple: bool,
    /// Sample size for multi-target actions; 0 means all matches.
    pub sample: usize,
    pub order: Order,
    /// Restrict candidates to displayed + enabled handles.
    pub visible: bool,
}

impl Default for ElementOptions {
    fn default() -> Self {
        Self {
            multiple: false,
            sample: 0,
            order: Order::FromStart,
            visible: true,
        }
    }
}

/// Options that only apply to image-template descriptors. Absent values
/// fall back to the desktop context configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageOptions {
    pub confidence: Option<f32>,
    pub grayscale: Option<bool>,
}

/// Immutable description of a UI target.
///
/// Parents are shared `Arc` references fixed at construction, so a chain is
/// acyclic by construction; activation still bounds recursion depth with
/// [`MAX_CHAIN_DEPTH`] as a defensive limit.
#[derive(Debug, Clone)]
pub struct Descriptor {
    by: By,
    path: String,
    parent: Option<Arc<Descriptor>>,
    timeout: Option<Duration>,
    differ: Option<Duration>,
    element: ElementOptions,
    image: ImageOptions,
}

/// Upper bound on ancestor-chain depth honored by activation.
pub const MAX_CHAIN_DEPTH: usize = 32;

impl Descriptor {
    pub fn new(by: By, path: impl Into<String>) -> Self {
        Self {
            by,
            path: path.into(),
            parent: None,
            timeout: None,
            differ: None,
            element: ElementOptions::default(),
            image: ImageOptions::default(),
        }
    }

    /// Web element addressed by XPath. Implicitly parented under the
    /// default frame so a bare element descriptor always activates from the
    /// backend's canonical state.
    pub fn xpath(path: impl Into<String>) -> Self {
        Self::new(By::Xpath, path).with_parent(Self::default_frame())
    }

    /// Web element addressed by DOM id.
    pub fn id(path: impl Into<String>) -> Self {
        Self::new(By::Id, path).with_parent(Self::default_frame())
    }

    /// Web element addressed by `name` attribute.
    pub fn name(path: impl Into<String>) -> Self {
        Self::new(By::Name, path).with_parent(Self::default_frame())
    }

    /// Browser window whose title contains `path`.
    pub fn title(path: impl Into<String>) -> Self {
        Self::new(By::Title, path)
    }

    /// Browser window whose URL contains `path`.
    pub fn url(path: impl Into<String>) -> Self {
        Self::new(By::Url, path)
    }

    /// Browser alert whose text contains `path`.
    pub fn alert(path: impl Into<String>) -> Self {
        Self::new(By::Alert, path)
    }

    /// The backend's default window and default frame/content.
    pub fn default_frame() -> Self {
        Self::new(By::DefaultFrame, "")
    }

    /// Desktop window whose title contains `path`.
    pub fn window(path: impl Into<String>) -> Self {
        Self::new(By::Window, path)
    }

    /// Desktop control addressed by backend control id; must be parented
    /// under a [`Descriptor::window`].
    pub fn control(path: impl Into<String>) -> Self {
        Self::new(By::Control, path)
    }

    /// On-screen image template (path to the template file).
    pub fn image(path: impl Into<String>) -> Self {
        Self::new(By::Image, path)
    }

    /// On-screen OCR text match; must be parented under a
    /// [`Descriptor::window`].
    pub fn text(path: impl Into<String>) -> Self {
        Self::new(By::Text, path)
    }

    pub fn with_parent(mut self, parent: impl Into<Arc<Descriptor>>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_differ(mut self, differ: Duration) -> Self {
        self.differ = Some(differ);
        self
    }

    pub fn multiple(mut self) -> Self {
        self.element.multiple = true;
        self
    }

    pub fn with_sample(mut self, sample: usize, order: Order) -> Self {
        self.element.sample = sample;
        self.element.order = order;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.element.visible = visible;
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.image.confidence = Some(confidence);
        self
    }

    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.image.grayscale = Some(grayscale);
        self
    }

    pub fn by(&self) -> By {
        self.by
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parent(&self) -> Option<&Arc<Descriptor>> {
        self.parent.as_ref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn differ(&self) -> Option<Duration> {
        self.differ
    }

    pub fn element(&self) -> &ElementOptions {
        &self.element
    }

    pub fn image_options(&self) -> &ImageOptions {
        &self.image
    }

    pub fn namespace(&self) -> Namespace {
        self.by.namespace()
    }

    pub fn category(&self) -> Category {
        self.by.category()
    }

    /// Number of ancestors above this node (0 for a root descriptor).
    /// Walks at most [`MAX_CHAIN_DEPTH`] links.
    pub fn chain_depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self.parent.as_deref();
        while let Some(d) = node {
            depth += 1;
            if depth >= MAX_CHAIN_DEPTH {
                break;
            }
            node = d.parent.as_deref();
        }
        depth
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.by, self.path)
    }
}
