//! The observable abstraction: value + notifier + evaluation contract.

use std::rc::Rc;

use reactive_runtime::Notifier;

use crate::errors::EvalError;

/// A node in the dataflow graph that can be read, and (for mutable nodes)
/// assigned and finalized.
///
/// `Value` is fixed per implementor, so a chain of observables-of-observables
/// is expressed through nested generic types rather than discovered at
/// runtime, and `eval()` here returns the fully-resolved value directly.
/// See [`crate::ev`] for the one-step refresh-then-read every entry point
/// performs.
pub trait Observable {
    type Value: Clone + 'static;

    fn notifier(&self) -> &Notifier;

    fn eval(&self) -> Result<Self::Value, EvalError>;

    /// Assigns a new value. Observables that don't support mutation (most
    /// derived nodes) keep the default, which fails with `NotAssignable`.
    fn assign(&self, _value: Self::Value) -> Result<(), EvalError> {
        Err(EvalError::NotAssignable)
    }

    /// Marks the observable as permanently unusable. A no-op by default;
    /// `Var` and the proxy types that forward to a mutable target override
    /// it.
    fn finalize(&self) {}
}

/// Object-safe counterpart of [`Observable`], used wherever call sites need
/// to hold observables of different concrete types behind one handle
/// (proxy targets, reactive-function argument lists).
pub trait DynObservable<T> {
    fn notifier(&self) -> &Notifier;
    fn eval(&self) -> Result<T, EvalError>;
    fn assign(&self, value: T) -> Result<(), EvalError>;
    fn finalize(&self);
}

impl<T, O> DynObservable<T> for O
where
    O: Observable<Value = T>,
{
    fn notifier(&self) -> &Notifier {
        Observable::notifier(self)
    }

    fn eval(&self) -> Result<T, EvalError> {
        Observable::eval(self)
    }

    fn assign(&self, value: T) -> Result<(), EvalError> {
        Observable::assign(self, value)
    }

    fn finalize(&self) {
        Observable::finalize(self)
    }
}

/// A reference-counted, type-erased observable of `T`. The common currency
/// for proxies and reactive-function arguments, which all need to retain an
/// input regardless of its concrete node type.
pub type DynObs<T> = Rc<dyn DynObservable<T>>;
