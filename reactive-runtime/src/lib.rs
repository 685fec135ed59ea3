//! Priority-ordered notifier graph and drain scheduler.
//!
//! This crate is the low-level half of the reactive dataflow runtime: it knows
//! nothing about values, caches or reactive functions, only about a graph of
//! [`Notifier`] nodes that need to be called in dependency order whenever one
//! of them reports a change.
//!
//! The runtime is single-threaded and cooperative: every notifier callback
//! runs to completion before the next one is dispatched, and nothing here is
//! `Send`/`Sync`. Callers that need multiple independent graphs (e.g. tests)
//! can construct their own [`Runtime`]; most embedders use [`runtime()`],
//! a thread-local singleton analogous to a process-wide default.

mod config;
mod dot;
mod notifier;
mod refresher;

pub use config::RuntimeConfig;
pub use dot::to_dot;
pub use notifier::Notifier;
pub use refresher::{Runtime, UpdateTransaction};

use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    static DEFAULT_RUNTIME: Rc<Runtime> = Rc::new(Runtime::new(RuntimeConfig::default()));
}

/// Returns the process-wide (thread-local) default [`Runtime`].
///
/// Callers never construct the singleton themselves, they just ask for it.
pub fn runtime() -> Rc<Runtime> {
    DEFAULT_RUNTIME.with(Rc::clone)
}

thread_local! {
    static ACTIVE_NOTIFIER: RefCell<Option<Notifier>> = const { RefCell::new(None) };
}

/// The process-wide sentinel: always active, priority 0, subscribing to it
/// forces an entire upstream chain to become (and stay) active.
pub fn active_notifier() -> Notifier {
    ACTIVE_NOTIFIER.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.get_or_insert_with(|| Notifier::new_forced_active("ACTIVE_NOTIFIER"))
            .clone()
    })
}

/// Drains the default runtime's queue up to `notifier`'s priority, or fully
/// if `notifier` is `None`. A targeted flush: bringing one node up to date
/// without forcing unrelated lower-priority work.
pub fn wait_for(notifier: Option<&Notifier>) {
    runtime().force_run(notifier.map(Notifier::priority));
}
