//! Tagged error kinds for the dataflow graph, with `#[source]` chains that
//! walk from a surfaced failure back to the evaluation that originated it.

use std::fmt;

use thiserror::Error;

/// The sequence of reactive-function names active when an error occurred,
/// innermost call last. Purely diagnostic: included in error messages and
/// available to callers that want to render a trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStack(Vec<&'static str>);

impl CallStack {
    pub fn new(frame: &'static str) -> Self {
        CallStack(vec![frame])
    }

    /// Returns a new stack with `frame` pushed onto it; used when a reactive
    /// function's body itself evaluates another reactive function.
    pub fn pushed(&self, frame: &'static str) -> Self {
        let mut frames = self.0.clone();
        frames.push(frame);
        CallStack(frames)
    }

    pub fn frames(&self) -> &[&'static str] {
        &self.0
    }
}

impl fmt::Display for CallStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" -> "))
    }
}

/// A failure anywhere in the dataflow graph, with enough context (argument
/// name, function name, call stack) to locate the fault, and a `#[source]`
/// chain that preserves the original cause.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// Reading a [`crate::Var`] before its first assignment.
    #[error("read before first assignment")]
    NotInitialized,

    /// Reading an observable after `finalize()`.
    #[error("read after finalize")]
    Finalized,

    /// `assign` on an observable that doesn't support it (`Const`, most
    /// derived nodes).
    #[error("assign on a non-assignable observable")]
    NotAssignable,

    /// A user-raised precondition failure, surfaced as an ordinary body
    /// error.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Failure while evaluating one argument of a reactive call.
    #[error("evaluating argument `{arg_name}` of `{function_name}` failed ({call_stack})")]
    ArgEval {
        arg_name: &'static str,
        function_name: &'static str,
        call_stack: CallStack,
        #[source]
        cause: Box<EvalError>,
    },

    /// Failure inside a reactive function's body.
    #[error("body of the call at `{call_stack}` failed")]
    BodyEval {
        call_stack: CallStack,
        #[source]
        cause: Box<EvalError>,
    },

    /// The error surfaced from [`crate::ev`]: collapses a deep `ArgEval`/
    /// `BodyEval` chain into one kind callers can match on without caring
    /// how far downstream the fault originated, while `source()` still
    /// walks the full chain.
    #[error("evaluation failed")]
    Ev {
        #[source]
        cause: Box<EvalError>,
    },
}

impl EvalError {
    pub fn arg_eval(
        arg_name: &'static str,
        function_name: &'static str,
        call_stack: CallStack,
        cause: EvalError,
    ) -> Self {
        EvalError::ArgEval {
            arg_name,
            function_name,
            call_stack,
            cause: Box::new(cause),
        }
    }

    pub fn body_eval(call_stack: CallStack, cause: EvalError) -> Self {
        EvalError::BodyEval {
            call_stack,
            cause: Box::new(cause),
        }
    }

    /// Wraps `self` as the surfaced top-level error, unless it already is
    /// one (wrapping an `Ev` in another `Ev` would just add noise).
    pub fn into_ev(self) -> Self {
        match self {
            EvalError::Ev { .. } => self,
            other => EvalError::Ev {
                cause: Box::new(other),
            },
        }
    }
}
