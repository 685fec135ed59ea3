//! Forces eager evaluation by keeping a node active.

use reactive_runtime::Notifier;

use crate::entry_points::ev_exception;
use crate::errors::EvalError;
use crate::observable::{DynObs, Observable};
use crate::proxy::NotifiedProxy;

/// A [`NotifiedProxy`] whose update hook re-evaluates `inner` eagerly and
/// which subscribes itself to the process-wide active sentinel at
/// construction. The effect ripples upward through the priority graph: the
/// entire chain of things `inner` depends on becomes (and stays) active, so
/// it is kept fresh without anyone explicitly reading it.
pub struct VolatileProxy<T> {
    proxy: NotifiedProxy<T>,
}

impl<T: Clone + 'static> VolatileProxy<T> {
    pub fn new(inner: DynObs<T>) -> Self {
        let probe = inner.clone();
        let proxy = NotifiedProxy::new("Volatile", inner, move || {
            let _ = ev_exception(probe.as_ref());
            true
        });
        Observable::notifier(&proxy).add_observer(&reactive_runtime::active_notifier());
        VolatileProxy { proxy }
    }
}

impl<T: Clone + 'static> Observable for VolatileProxy<T> {
    type Value = T;

    fn notifier(&self) -> &Notifier {
        Observable::notifier(&self.proxy)
    }

    fn eval(&self) -> Result<T, EvalError> {
        Observable::eval(&self.proxy)
    }

    fn assign(&self, value: T) -> Result<(), EvalError> {
        Observable::assign(&self.proxy, value)
    }

    fn finalize(&self) {
        Observable::finalize(&self.proxy)
    }
}

/// Wraps `inner` so its value is kept eagerly up to date instead of only
/// recomputed lazily on read.
pub fn volatile<T: Clone + 'static>(inner: DynObs<T>) -> VolatileProxy<T> {
    VolatileProxy::new(inner)
}
