//! Lifts plain functions into reactive functions: argument capture,
//! dependency subscription, lazy evaluation via [`crate::Cache`].
//!
//! Argument binding here is static: Rust has no runtime signature
//! introspection, so binding is expressed as distinct per-arity constructors
//! (`reactive0`..`reactive3`) instead of one variadic `reactive(f)`; each
//! argument is still individually tagged as a plain value or a pass-through.

use std::rc::Rc;

use reactive_runtime::Notifier;

use crate::cache::Cache;
use crate::call_result::SyncCallResult;
use crate::entry_points::refresh_and_eval;
use crate::errors::{CallStack, EvalError};
use crate::observable::DynObs;

/// One bound argument: either evaluated eagerly and subscribed as a
/// dependency (`Value`), or handed through unevaluated for the body to
/// resolve itself (`PassThrough`, whose notifier is *not* subscribed,
/// matching `pass_args`).
pub enum Dep<T> {
    Value(DynObs<T>),
    PassThrough(DynObs<T>),
}

impl<T: Clone + 'static> Dep<T> {
    fn notifier_if_subscribed(&self) -> Option<Notifier> {
        match self {
            Dep::Value(o) => Some(o.notifier().clone()),
            Dep::PassThrough(_) => None,
        }
    }

    fn resolve(&self, arg_name: &'static str, function_name: &'static str, call_stack: &CallStack) -> Result<Arg<T>, EvalError> {
        match self {
            Dep::Value(o) => refresh_and_eval(o.as_ref())
                .map(Arg::Value)
                .map_err(|cause| EvalError::arg_eval(arg_name, function_name, call_stack.clone(), cause)),
            Dep::PassThrough(o) => Ok(Arg::Observable(o.clone())),
        }
    }
}

/// What the function body actually receives for one argument: the
/// evaluated raw value for a plain dependency, or the still-wrapped
/// observable for a `pass_args` entry (the body evaluates it itself, via
/// [`crate::ev`], if and when it needs to).
pub enum Arg<T> {
    Value(T),
    Observable(DynObs<T>),
}

/// Configuration recognized by the `reactiveN` constructors. A pass-args
/// argument and a dependency that exists only to force recomputation are
/// both expressed through [`Dep`] and `extra_deps` here, since Rust's lack
/// of signature introspection collapses the two into "subscribe this
/// notifier, whether or not it corresponds to a function parameter".
#[derive(Default, Clone)]
pub struct DecoratorParams {
    extra_deps: Vec<Notifier>,
}

impl DecoratorParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes the call's notifier to `dep`, without passing its value
    /// (or even its presence) to the function body. Covers both
    /// `other_deps` (an arbitrary extra observable) and `dep_only_args` (an
    /// argument that exists only to force recomputation).
    pub fn with_extra_dep<T: Clone + 'static>(mut self, dep: &DynObs<T>) -> Self {
        self.extra_deps.push(dep.notifier().clone());
        self
    }
}

/// Lifts a zero-argument function: useful mainly for `other_deps`-only
/// recomputation triggers, or functions that read ambient observables
/// directly via `ev`.
pub fn reactive0<R, F>(name: &'static str, params: DecoratorParams, f: F) -> Cache<R>
where
    R: Clone + 'static,
    F: Fn() -> Result<R, EvalError> + 'static,
{
    let call_stack = CallStack::new(name);
    let call_result = SyncCallResult::new(name, call_stack.clone(), params.extra_deps.clone(), move |stack| {
        f().map_err(|cause| EvalError::body_eval(stack.clone(), cause))
    });
    Cache::new(Rc::new(call_result))
}

/// Lifts a one-argument function.
pub fn reactive1<A, R, F>(
    name: &'static str,
    arg_name: &'static str,
    params: DecoratorParams,
    a: Dep<A>,
    f: F,
) -> Cache<R>
where
    A: Clone + 'static,
    R: Clone + 'static,
    F: Fn(Arg<A>) -> Result<R, EvalError> + 'static,
{
    let call_stack = CallStack::new(name);
    let mut deps = params.extra_deps.clone();
    deps.extend(a.notifier_if_subscribed());

    let call_result = SyncCallResult::new(name, call_stack.clone(), deps, move |stack| {
        let arg = a.resolve(arg_name, name, stack)?;
        f(arg).map_err(|cause| EvalError::body_eval(stack.clone(), cause))
    });
    Cache::new(Rc::new(call_result))
}

/// Lifts a two-argument function.
pub fn reactive2<A, B, R, F>(
    name: &'static str,
    arg_names: (&'static str, &'static str),
    params: DecoratorParams,
    a: Dep<A>,
    b: Dep<B>,
    f: F,
) -> Cache<R>
where
    A: Clone + 'static,
    B: Clone + 'static,
    R: Clone + 'static,
    F: Fn(Arg<A>, Arg<B>) -> Result<R, EvalError> + 'static,
{
    let call_stack = CallStack::new(name);
    let mut deps = params.extra_deps.clone();
    deps.extend(a.notifier_if_subscribed());
    deps.extend(b.notifier_if_subscribed());

    let (a_name, b_name) = arg_names;
    let call_result = SyncCallResult::new(name, call_stack.clone(), deps, move |stack| {
        let arg_a = a.resolve(a_name, name, stack)?;
        let arg_b = b.resolve(b_name, name, stack)?;
        f(arg_a, arg_b).map_err(|cause| EvalError::body_eval(stack.clone(), cause))
    });
    Cache::new(Rc::new(call_result))
}

/// Lifts a three-argument function.
pub fn reactive3<A, B, C, R, F>(
    name: &'static str,
    arg_names: (&'static str, &'static str, &'static str),
    params: DecoratorParams,
    a: Dep<A>,
    b: Dep<B>,
    c: Dep<C>,
    f: F,
) -> Cache<R>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    R: Clone + 'static,
    F: Fn(Arg<A>, Arg<B>, Arg<C>) -> Result<R, EvalError> + 'static,
{
    let call_stack = CallStack::new(name);
    let mut deps = params.extra_deps.clone();
    deps.extend(a.notifier_if_subscribed());
    deps.extend(b.notifier_if_subscribed());
    deps.extend(c.notifier_if_subscribed());

    let (a_name, b_name, c_name) = arg_names;
    let call_result = SyncCallResult::new(name, call_stack.clone(), deps, move |stack| {
        let arg_a = a.resolve(a_name, name, stack)?;
        let arg_b = b.resolve(b_name, name, stack)?;
        let arg_c = c.resolve(c_name, name, stack)?;
        f(arg_a, arg_b, arg_c).map_err(|cause| EvalError::body_eval(stack.clone(), cause))
    });
    Cache::new(Rc::new(call_result))
}
