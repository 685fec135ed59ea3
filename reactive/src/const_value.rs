//! Immutable observables.

use reactive_runtime::Notifier;

use crate::errors::EvalError;
use crate::observable::Observable;

/// An immutable observable: `eval()` always succeeds with the value it was
/// built from, `assign` always fails, `finalize` is a no-op. Shares the
/// process-wide dummy notifier, so wiring it into a dependency graph costs
/// nothing and it is never itself scheduled.
pub struct Const<T> {
    value: T,
    notifier: Notifier,
}

impl<T: Clone + 'static> Const<T> {
    pub fn new(value: T) -> Self {
        Const {
            value,
            notifier: Notifier::dummy(),
        }
    }
}

impl<T: Clone + 'static> Observable for Const<T> {
    type Value = T;

    fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn eval(&self) -> Result<T, EvalError> {
        Ok(self.value.clone())
    }
}
