//! Wrapping host functions in place.
//!
//! An [`ExtensionPoint`] holds the function the host currently calls. Patching
//! replaces it with a wrapper and keeps the original as a marker, so a second
//! patch is detected instead of stacking, and unpatching restores the exact
//! original reference.

use std::rc::Rc;

use crate::error::PatchError;

pub struct ExtensionPoint<F: ?Sized> {
    name: &'static str,
    current: Option<Rc<F>>,
    original: Option<Rc<F>>,
}

impl<F: ?Sized> ExtensionPoint<F> {
    pub fn new(name: &'static str, function: Rc<F>) -> Self {
        Self {
            name,
            current: Some(function),
            original: None,
        }
    }

    /// An extension point the host does not provide.
    pub fn missing(name: &'static str) -> Self {
        Self {
            name,
            current: None,
            original: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The function the host calls now.
    pub fn get(&self) -> Option<Rc<F>> {
        self.current.clone()
    }

    pub fn is_available(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_patched(&self) -> bool {
        self.original.is_some()
    }

    /// Replace the function with `wrap(original)`.
    pub fn patch(&mut self, wrap: impl FnOnce(Rc<F>) -> Rc<F>) -> Result<(), PatchError> {
        if self.is_patched() {
            return Err(PatchError::AlreadyPatched {
                name: self.name.to_string(),
            });
        }
        let original = self.current.clone().ok_or_else(|| PatchError::Missing {
            name: self.name.to_string(),
        })?;

        self.current = Some(wrap(Rc::clone(&original)));
        self.original = Some(original);
        Ok(())
    }

    /// Restore the function that was in place before [`patch`](Self::patch).
    pub fn unpatch(&mut self) -> Result<(), PatchError> {
        let original = self.original.take().ok_or_else(|| PatchError::NotPatched {
            name: self.name.to_string(),
        })?;
        self.current = Some(original);
        Ok(())
    }
}

impl<F: ?Sized> std::fmt::Debug for ExtensionPoint<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionPoint")
            .field("name", &self.name)
            .field("available", &self.is_available())
            .field("patched", &self.is_patched())
            .finish()
    }
}
