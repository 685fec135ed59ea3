//! Mutable cells.

use std::cell::RefCell;
use std::rc::Rc;

use reactive_runtime::Notifier;

use crate::errors::EvalError;
use crate::observable::Observable;

#[derive(Clone)]
enum State<T> {
    NotInitialized,
    Value(T),
    Finalized,
}

/// A mutable cell: reads fail with [`EvalError::NotInitialized`] until the
/// first [`assign`](Observable::assign), and with [`EvalError::Finalized`]
/// forever after [`finalize`](Observable::finalize). Assigning notifies the
/// cell's notifier; finalizing does not.
pub struct Var<T> {
    state: Rc<RefCell<State<T>>>,
    notifier: Notifier,
}

impl<T: Clone + 'static> Var<T> {
    /// A cell with no value yet.
    pub fn new() -> Self {
        Var {
            state: Rc::new(RefCell::new(State::NotInitialized)),
            notifier: Notifier::new("Var"),
        }
    }

    /// A cell already holding `value`.
    pub fn with_value(value: T) -> Self {
        Var {
            state: Rc::new(RefCell::new(State::Value(value))),
            notifier: Notifier::new("Var"),
        }
    }
}

impl<T: Clone + 'static> Default for Var<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Clone for Var<T> {
    fn clone(&self) -> Self {
        Var {
            state: self.state.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

impl<T: Clone + 'static> Observable for Var<T> {
    type Value = T;

    fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn eval(&self) -> Result<T, EvalError> {
        match &*self.state.borrow() {
            State::NotInitialized => Err(EvalError::NotInitialized),
            State::Value(value) => Ok(value.clone()),
            State::Finalized => Err(EvalError::Finalized),
        }
    }

    fn assign(&self, value: T) -> Result<(), EvalError> {
        *self.state.borrow_mut() = State::Value(value);
        self.notifier.notify();
        Ok(())
    }

    fn finalize(&self) {
        *self.state.borrow_mut() = State::Finalized;
    }
}
