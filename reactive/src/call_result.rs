//! Lazy evaluators of a wrapped reactive-function call.

use std::cell::{Cell, RefCell};

use reactive_runtime::Notifier;

use crate::errors::{CallStack, EvalError};
use crate::observable::Observable;

/// Clears a call's re-entry guard on every exit path, including an early
/// `?` return from the thunk.
struct ReentryGuard<'a>(&'a Cell<bool>);

impl Drop for ReentryGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

fn circular_dependency(call_stack: &CallStack) -> EvalError {
    EvalError::BodyEval {
        call_stack: call_stack.clone(),
        cause: Box::new(EvalError::Validation(format!(
            "circular dependency: `{call_stack}` is already being evaluated"
        ))),
    }
}

/// The node produced by invoking a reactive function on observable inputs.
/// Owns its notifier (subscribed to every non-pass-through argument and to
/// any declared extra dependencies), the call-site stack captured at
/// construction, and a re-entry guard that turns a direct cycle into a
/// reported error instead of infinite recursion.
pub struct SyncCallResult<R> {
    notifier: Notifier,
    call_stack: CallStack,
    update_in_progress: Cell<bool>,
    thunk: Box<dyn Fn(&CallStack) -> Result<R, EvalError>>,
}

impl<R: Clone + 'static> SyncCallResult<R> {
    /// `deps` are the notifiers this call's own notifier should subscribe
    /// to (evaluated value arguments, plus any `other_deps`/`dep_only_args`
    /// from the decorator). `thunk` performs argument evaluation and the
    /// function body call; its own errors should already be wrapped as
    /// `ArgEval`/`BodyEval` by the caller (see [`crate::reactive_fn`]).
    pub fn new(
        name: impl Into<String>,
        call_stack: CallStack,
        deps: impl IntoIterator<Item = Notifier>,
        thunk: impl Fn(&CallStack) -> Result<R, EvalError> + 'static,
    ) -> Self {
        let notifier = Notifier::new(name);
        for dep in deps {
            dep.add_observer(&notifier);
        }
        SyncCallResult {
            notifier,
            call_stack,
            update_in_progress: Cell::new(false),
            thunk: Box::new(thunk),
        }
    }
}

impl<R: Clone + 'static> Observable for SyncCallResult<R> {
    type Value = R;

    fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn eval(&self) -> Result<R, EvalError> {
        if self.update_in_progress.get() {
            return Err(circular_dependency(&self.call_stack));
        }
        self.update_in_progress.set(true);
        let _guard = ReentryGuard(&self.update_in_progress);
        (self.thunk)(&self.call_stack)
    }
}

/// Release closure for a held scoped acquisition. Failures are logged and
/// suppressed; they never propagate into the dataflow error taxonomy.
type Release = Box<dyn FnMut() -> Result<(), String>>;

/// `CallResult` variant for generator-style / scoped-acquisition functions:
/// the wrapped call yields a resource whose release must run exactly once
/// per acquisition, no matter how the cell is invalidated.
pub struct CmCallResult<R> {
    notifier: Notifier,
    call_stack: CallStack,
    update_in_progress: Cell<bool>,
    open: RefCell<Option<Release>>,
    thunk: Box<dyn Fn(&CallStack) -> Result<(R, Release), EvalError>>,
}

impl<R: Clone + 'static> CmCallResult<R> {
    pub fn new(
        name: impl Into<String>,
        call_stack: CallStack,
        deps: impl IntoIterator<Item = Notifier>,
        thunk: impl Fn(&CallStack) -> Result<(R, Release), EvalError> + 'static,
    ) -> Self {
        let notifier = Notifier::new(name);
        for dep in deps {
            dep.add_observer(&notifier);
        }
        CmCallResult {
            notifier,
            call_stack,
            update_in_progress: Cell::new(false),
            open: RefCell::new(None),
            thunk: Box::new(thunk),
        }
    }

    fn release_held(&self) {
        if let Some(mut release) = self.open.borrow_mut().take() {
            if let Err(message) = release() {
                report_release_failure(&self.notifier.name(), &message, true);
            }
        }
    }
}

impl<R: Clone + 'static> Observable for CmCallResult<R> {
    type Value = R;

    fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn eval(&self) -> Result<R, EvalError> {
        self.release_held();
        if self.update_in_progress.get() {
            return Err(circular_dependency(&self.call_stack));
        }
        self.update_in_progress.set(true);
        let _guard = ReentryGuard(&self.update_in_progress);

        let (value, release) = (self.thunk)(&self.call_stack)?;
        *self.open.borrow_mut() = Some(release);
        Ok(value)
    }

    fn finalize(&self) {
        self.release_held();
    }
}

impl<R> Drop for CmCallResult<R> {
    fn drop(&mut self) {
        if let Some(mut release) = self.open.borrow_mut().take() {
            if let Err(message) = release() {
                let warn = reactive_runtime::runtime().config().warn_on_unreleased_scope;
                report_release_failure(&self.notifier.name(), &message, warn);
            }
        }
    }
}

#[cfg(feature = "tracing")]
fn report_release_failure(name: &str, message: &str, warn: bool) {
    if warn {
        tracing::error!(notifier = name, error = message, "scoped acquisition release failed");
    } else {
        tracing::debug!(notifier = name, error = message, "scoped acquisition release failed");
    }
}

#[cfg(not(feature = "tracing"))]
fn report_release_failure(_name: &str, _message: &str, _warn: bool) {}
