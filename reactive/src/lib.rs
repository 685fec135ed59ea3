//! Observables, reactive functions and caching built on the priority-ordered
//! notifier graph in `reactive-runtime`.
//!
//! A program builds a graph of [`Var`]s, [`Const`]s and reactive functions
//! (via [`reactive1`], [`reactive2`], …); reading through [`ev`] forces
//! outstanding work up to the target's priority and returns the value.
//! Assigning a [`Var`] propagates change notifications lazily (downstream
//! nodes only recompute once something actually reads them) unless wrapped
//! in [`volatile`], which keeps a chain eagerly up to date.

mod cache;
mod call_result;
mod const_value;
mod entry_points;
mod errors;
mod observable;
mod proxy;
mod reactive_fn;
mod var;
mod volatile;

pub use cache::Cache;
pub use call_result::{CmCallResult, SyncCallResult};
pub use const_value::Const;
pub use entry_points::{
    assign, const_, ev, ev_def, ev_exception, finalize, is_observable, var, var_with,
    wait_for_notifier, wait_for_var,
};
pub use errors::{CallStack, EvalError};
pub use observable::{DynObs, DynObservable, Observable};
pub use proxy::{NotifiedProxy, Proxy, VarProxy};
pub use reactive_fn::{reactive0, reactive1, reactive2, reactive3, Arg, Dep, DecoratorParams};
pub use volatile::{volatile, VolatileProxy};

pub use reactive_runtime::{
    active_notifier, runtime, to_dot, wait_for, Notifier, Runtime, RuntimeConfig, UpdateTransaction,
};
