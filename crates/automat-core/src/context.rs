//! The capability contract every automation backend implements.
//!
//! Mirrors the dispatcher surface one-to-one. Methods a backend does not
//! implement keep their default bodies and report `UnsupportedOperation`,
//! so an unsupported capability is an interface-conformance fact rather
//! than a runtime name probe.

use crate::descriptor::{Descriptor, Namespace};
use crate::error::{Error, Result};

pub trait Context {
    /// Human-readable context name used in error payloads and logs.
    fn name(&self) -> &str;

    /// The descriptor namespace this context resolves.
    fn namespace(&self) -> Namespace;

    /// Bring the descriptor's containment chain into an operable state,
    /// root to leaf. Re-derives activation from the root on every call;
    /// no prior window/frame state is assumed to survive between calls.
    fn activate(&mut self, desc: &Descriptor) -> Result<()>;

    /// Never fails: any resolution or activation failure reads as `false`.
    fn exist(&mut self, desc: &Descriptor) -> bool;

    fn click(&mut self, desc: &Descriptor) -> Result<()>;

    /// Navigate to a top-level location.
    fn go(&mut self, desc: &Descriptor) -> Result<()> {
        let _ = desc;
        Err(Error::unsupported(self.name(), "go"))
    }

    /// Click a sampled subset of a multi-match descriptor's handles.
    fn clicks(&mut self, desc: &Descriptor, num_samples: Option<usize>) -> Result<()> {
        let _ = (desc, num_samples);
        Err(Error::unsupported(self.name(), "clicks"))
    }

    fn type_text(&mut self, desc: &Descriptor, text: &str) -> Result<()> {
        let _ = (desc, text);
        Err(Error::unsupported(self.name(), "type"))
    }

    fn select(&mut self, desc: &Descriptor, text: &str) -> Result<()> {
        let _ = (desc, text);
        Err(Error::unsupported(self.name(), "select"))
    }

    fn accept(&mut self, desc: &Descriptor) -> Result<()> {
        let _ = desc;
        Err(Error::unsupported(self.name(), "accept"))
    }

    fn dismiss(&mut self, desc: &Descriptor) -> Result<()> {
        let _ = desc;
        Err(Error::unsupported(self.name(), "dismiss"))
    }

    /// Extract tabular structure from a resolved container as rows of
    /// cell strings.
    fn table(&mut self, desc: &Descriptor) -> Result<Vec<Vec<String>>> {
        let _ = desc;
        Err(Error::unsupported(self.name(), "table"))
    }

    /// Read the visible text of a resolved target.
    fn text(&mut self, desc: &Descriptor) -> Result<String> {
        let _ = desc;
        Err(Error::unsupported(self.name(), "text"))
    }

    /// Number of matching handles. Resolution/activation failures read as
    /// `Ok(0)`; only a missing capability is an error.
    fn count(&mut self, desc: &Descriptor) -> Result<usize> {
        let _ = desc;
        Err(Error::unsupported(self.name(), "count"))
    }
}
