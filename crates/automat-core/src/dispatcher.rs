//! The backend-dispatch facade.
//!
//! Routes an operation + descriptor pair to the first registered context
//! whose namespace matches the descriptor, and normalizes routing
//! failures. The dispatcher performs no backend work itself; side effects
//! live entirely inside the chosen context.

use crate::context::Context;
use crate::descriptor::Descriptor;
use crate::error::{Error, Result};
use tracing::{debug, warn};

pub struct Dispatcher {
    contexts: Vec<Box<dyn Context>>,
}

impl Dispatcher {
    /// The context list is fixed at construction; there is no hot
    /// add/remove.
    pub fn new(contexts: Vec<Box<dyn Context>>) -> Self {
        Self { contexts }
    }

    fn context_for(&mut self, desc: &Descriptor) -> Option<&mut Box<dyn Context>> {
        let ns = desc.namespace();
        self.contexts.iter_mut().find(|ctx| ctx.namespace() == ns)
    }

    fn require_context(
        &mut self,
        desc: &Descriptor,
        op: &'static str,
    ) -> Result<&mut Box<dyn Context>> {
        let ns = desc.namespace();
        self.context_for(desc).ok_or(Error::NoContextFound { namespace: ns, op })
    }

    /// Whether the target currently resolves. Never fails: an absent
    /// context, a resolution failure, or an activation failure all read as
    /// `false`.
    pub fn exist(&mut self, desc: &Descriptor) -> bool {
        match self.context_for(desc) {
            Some(ctx) => ctx.exist(desc),
            None => {
                warn!(namespace = %desc.namespace(), desc = %desc, "no context for exist; reporting absent");
                false
            }
        }
    }

    pub fn go(&mut self, desc: &Descriptor) -> Result<()> {
        debug!(desc = %desc, "dispatch go");
        self.require_context(desc, "go")?.go(desc)
    }

    pub fn click(&mut self, desc: &Descriptor) -> Result<()> {
        debug!(desc = %desc, "dispatch click");
        self.require_context(desc, "click")?.click(desc)
    }

    pub fn clicks(&mut self, desc: &Descriptor, num_samples: Option<usize>) -> Result<()> {
        debug!(desc = %desc, ?num_samples, "dispatch clicks");
        self.require_context(desc, "clicks")?.clicks(desc, num_samples)
    }

    pub fn type_text(&mut self, desc: &Descriptor, text: &str) -> Result<()> {
        debug!(desc = %desc, "dispatch type");
        self.require_context(desc, "type")?.type_text(desc, text)
    }

    pub fn select(&mut self, desc: &Descriptor, text: &str) -> Result<()> {
        debug!(desc = %desc, "dispatch select");
        self.require_context(desc, "select")?.select(desc, text)
    }

    pub fn accept(&mut self, desc: &Descriptor) -> Result<()> {
        debug!(desc = %desc, "dispatch accept");
        self.require_context(desc, "accept")?.accept(desc)
    }

    pub fn dismiss(&mut self, desc: &Descriptor) -> Result<()> {
        debug!(desc = %desc, "dispatch dismiss");
        self.require_context(desc, "dismiss")?.dismiss(desc)
    }

    pub fn table(&mut self, desc: &Descriptor) -> Result<Vec<Vec<String>>> {
        debug!(desc = %desc, "dispatch table");
        self.require_context(desc, "table")?.table(desc)
    }

    pub fn text(&mut self, desc: &Descriptor) -> Result<String> {
        debug!(desc = %desc, "dispatch text");
        self.require_context(desc, "text")?.text(desc)
    }

    /// Number of matching handles. An absent context reads as zero
    /// matches; a context that lacks the capability still reports
    /// `UnsupportedOperation`.
    pub fn count(&mut self, desc: &Descriptor) -> Result<usize> {
        match self.context_for(desc) {
            Some(ctx) => ctx.count(desc),
            None => {
                warn!(namespace = %desc.namespace(), desc = %desc, "no context for count; reporting 0");
                Ok(0)
            }
        }
    }
}
