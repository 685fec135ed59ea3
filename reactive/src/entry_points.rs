//! The top-level functions most callers use instead of the `Observable`
//! trait directly.

use reactive_runtime::Notifier;

use crate::const_value::Const;
use crate::errors::EvalError;
use crate::observable::DynObservable;
use crate::var::Var;

/// Forces `v`'s notifier up to date, then reads it, without the top-level
/// `Ev` wrapping `ev` applies. Used internally to evaluate a reactive
/// function's own arguments: their `ArgEval`/`BodyEval` causes must stay
/// unwrapped so the call that subscribes them can attach its own
/// `arg_name`/`function_name` directly to the real cause, not to an `Ev`
/// shell around it.
pub(crate) fn refresh_and_eval<T, O: DynObservable<T> + ?Sized>(v: &O) -> Result<T, EvalError> {
    v.notifier().refresh();
    v.eval()
}

/// Forces `v`'s notifier up to date, then reads it. Any `ArgEval`/`BodyEval`
/// surfacing here is collapsed into the single [`EvalError::Ev`] kind, per
/// the propagation policy: deep inside the graph, failures carry the
/// precise stage and cause; at the point a caller actually asks for a
/// value, that detail becomes a `source()` chain under one error kind.
pub fn ev<T, O: DynObservable<T> + ?Sized>(v: &O) -> Result<T, EvalError> {
    refresh_and_eval(v).map_err(EvalError::into_ev)
}

/// As [`ev`], but returns the error instead of propagating it.
pub fn ev_exception<T, O: DynObservable<T> + ?Sized>(v: &O) -> Option<EvalError> {
    ev(v).err()
}

/// As [`ev`], but returns `default` instead of propagating an error.
pub fn ev_def<T, O: DynObservable<T> + ?Sized>(v: &O, default: T) -> T {
    ev(v).unwrap_or(default)
}

/// Shorthand for `v.assign(value)`.
pub fn assign<T, O: DynObservable<T> + ?Sized>(v: &O, value: T) -> Result<(), EvalError> {
    v.assign(value)
}

/// Shorthand for `v.finalize()`.
pub fn finalize<T, O: DynObservable<T> + ?Sized>(v: &O) {
    v.finalize()
}

/// True for any value satisfying the `DynObservable` bound. In this
/// statically-typed setting that's a compile-time fact rather than a
/// runtime check, but the function is kept as a named entry point for call
/// sites that are themselves generic over the observable type.
pub fn is_observable<T, O: DynObservable<T> + ?Sized>(_v: &O) -> bool {
    true
}

/// Drains up to `v`'s priority, or fully if `v` is `None` (a targeted
/// flush that brings one node current without forcing unrelated
/// lower-priority work).
pub fn wait_for_var<T, O: DynObservable<T> + ?Sized>(v: Option<&O>) {
    reactive_runtime::wait_for(v.map(DynObservable::notifier));
}

pub fn wait_for_notifier(notifier: Option<&Notifier>) {
    reactive_runtime::wait_for(notifier);
}

pub fn var<T: Clone + 'static>() -> Var<T> {
    Var::new()
}

pub fn var_with<T: Clone + 'static>(value: T) -> Var<T> {
    Var::with_value(value)
}

pub fn const_<T: Clone + 'static>(value: T) -> Const<T> {
    Const::new(value)
}
