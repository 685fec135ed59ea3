//! Forwarding observables: plain, notified, and swappable-target flavors.

use std::cell::RefCell;

use reactive_runtime::Notifier;

use crate::errors::EvalError;
use crate::observable::{DynObs, Observable};

/// Forwards every operation to `inner`, sharing its notifier. Exists as a
/// named type to hold behind a [`DynObs`] when a caller wants to hand out a
/// read/assign/finalize surface without exposing the inner node's concrete
/// type.
pub struct Proxy<T> {
    inner: DynObs<T>,
}

impl<T: Clone + 'static> Proxy<T> {
    pub fn new(inner: DynObs<T>) -> Self {
        Proxy { inner }
    }
}

impl<T: Clone + 'static> Observable for Proxy<T> {
    type Value = T;

    fn notifier(&self) -> &Notifier {
        self.inner.notifier()
    }

    fn eval(&self) -> Result<T, EvalError> {
        self.inner.eval()
    }

    fn assign(&self, value: T) -> Result<(), EvalError> {
        self.inner.assign(value)
    }

    fn finalize(&self) {
        self.inner.finalize()
    }
}

/// A proxy with its own notifier, observing `inner`'s. The update hook
/// (`on_notify`) decides whether a change in `inner` is forwarded to this
/// proxy's own observers. [`crate::Cache`] and [`crate::VolatileProxy`] are
/// both built on this shape.
pub struct NotifiedProxy<T> {
    inner: DynObs<T>,
    notifier: Notifier,
}

impl<T: Clone + 'static> NotifiedProxy<T> {
    pub fn new(
        name: impl Into<String>,
        inner: DynObs<T>,
        on_notify: impl FnMut() -> bool + 'static,
    ) -> Self {
        let notifier = Notifier::with_notify_func(name, on_notify);
        inner.notifier().add_observer(&notifier);
        NotifiedProxy { inner, notifier }
    }

    pub(crate) fn inner(&self) -> &DynObs<T> {
        &self.inner
    }
}

impl<T: Clone + 'static> Observable for NotifiedProxy<T> {
    type Value = T;

    fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn eval(&self) -> Result<T, EvalError> {
        self.inner.eval()
    }

    fn assign(&self, value: T) -> Result<(), EvalError> {
        self.inner.assign(value)
    }

    fn finalize(&self) {
        self.inner.finalize()
    }
}

/// A proxy whose target can be swapped with [`set_inner`](VarProxy::set_inner).
/// Reassignment detaches the own notifier from the old target and reattaches
/// it to the new one before notifying, so downstream reads never observe a
/// half-migrated link: they see either the entirely-old or entirely-new
/// target.
pub struct VarProxy<T> {
    inner: RefCell<DynObs<T>>,
    notifier: Notifier,
}

impl<T: Clone + 'static> VarProxy<T> {
    pub fn new(name: impl Into<String>, initial: DynObs<T>) -> Self {
        let notifier = Notifier::new(name);
        initial.notifier().add_observer(&notifier);
        VarProxy {
            inner: RefCell::new(initial),
            notifier,
        }
    }

    pub fn set_inner(&self, new_inner: DynObs<T>) {
        let old = std::mem::replace(&mut *self.inner.borrow_mut(), new_inner.clone());
        old.notifier().remove_observer(&self.notifier);
        new_inner.notifier().add_observer(&self.notifier);
        self.notifier.notify();
    }
}

impl<T: Clone + 'static> Observable for VarProxy<T> {
    type Value = T;

    fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn eval(&self) -> Result<T, EvalError> {
        self.inner.borrow().eval()
    }

    fn assign(&self, value: T) -> Result<(), EvalError> {
        self.inner.borrow().assign(value)
    }

    fn finalize(&self) {
        self.inner.borrow().finalize()
    }
}
