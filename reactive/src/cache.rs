//! Memoizes the last computed value of an observable between invalidations.

use std::cell::RefCell;
use std::rc::Rc;

use reactive_runtime::Notifier;

use crate::errors::EvalError;
use crate::observable::{DynObs, Observable};
use crate::proxy::NotifiedProxy;

struct State<T> {
    valid: bool,
    value: Option<T>,
    exception: Option<EvalError>,
}

/// Coalesces repeated reads of `inner` between two invalidations into a
/// single inner call. Its own notifier's update hook reports "changed" only
/// the first time it fires after becoming valid again; a second,
/// already-invalid notification is swallowed, so downstream observers that
/// only care about *change* aren't re-notified for a cache nobody re-read.
pub struct Cache<T> {
    proxy: NotifiedProxy<T>,
    state: Rc<RefCell<State<T>>>,
}

impl<T: Clone + 'static> Cache<T> {
    pub fn new(inner: DynObs<T>) -> Self {
        let state = Rc::new(RefCell::new(State {
            valid: false,
            value: None,
            exception: None,
        }));

        let hook_state = state.clone();
        let proxy = NotifiedProxy::new("Cache", inner, move || {
            let mut state = hook_state.borrow_mut();
            if !state.valid {
                false
            } else {
                state.valid = false;
                state.value = None;
                state.exception = None;
                true
            }
        });

        Cache { proxy, state }
    }

    /// Forces the next `eval()` to recompute, without waiting for a
    /// notification from the inner observable.
    pub fn invalidate(&self) {
        let mut state = self.state.borrow_mut();
        state.valid = false;
        state.value = None;
        state.exception = None;
    }
}

impl<T: Clone + 'static> Observable for Cache<T> {
    type Value = T;

    fn notifier(&self) -> &Notifier {
        Observable::notifier(&self.proxy)
    }

    fn eval(&self) -> Result<T, EvalError> {
        {
            let state = self.state.borrow();
            if state.valid {
                if let Some(exception) = &state.exception {
                    return Err(exception.clone());
                }
                return Ok(state
                    .value
                    .clone()
                    .expect("a valid cache entry always holds a value or an exception"));
            }
        }

        let result = self.proxy.inner().eval();
        let mut state = self.state.borrow_mut();
        match &result {
            Ok(value) => {
                state.value = Some(value.clone());
                state.exception = None;
            }
            Err(error) => {
                state.value = None;
                state.exception = Some(error.clone());
            }
        }
        state.valid = true;
        result
    }

    fn assign(&self, value: T) -> Result<(), EvalError> {
        Observable::assign(&self.proxy, value)
    }

    fn finalize(&self) {
        Observable::finalize(&self.proxy)
    }
}
