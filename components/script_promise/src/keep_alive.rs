//! Opt-in self retention for objects that must outlive their callers.

use std::cell::RefCell;
use std::rc::Rc;

/// A strong self-reference held inside the object it keeps alive.
///
/// While active, the owning object cannot be freed even if every outside
/// handle is dropped. [`KeepAlive::release`] hands the reference back so the
/// caller can drop it once no borrows of the owner remain.
pub(crate) struct KeepAlive<T> {
    retained: RefCell<Option<Rc<T>>>,
}

impl<T> KeepAlive<T> {
    pub(crate) fn new() -> Self {
        Self {
            retained: RefCell::new(None),
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.retained.borrow().is_some()
    }

    /// Stores `this`. Returns false, dropping `this`, if already active.
    pub(crate) fn retain(&self, this: Rc<T>) -> bool {
        let mut retained = self.retained.borrow_mut();
        if retained.is_some() {
            return false;
        }
        *retained = Some(this);
        true
    }

    pub(crate) fn release(&self) -> Option<Rc<T>> {
        self.retained.borrow_mut().take()
    }
}
