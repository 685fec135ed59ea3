use std::cell::RefCell;
use std::fmt::{self, Debug, Formatter};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use crate::{active_notifier, runtime};

/// A node in the dependency graph.
///
/// Cloning a [`Notifier`] is cheap (it's a reference-counted handle to shared
/// state, the same node); the graph itself only ever stores [`Weak`] back-
/// references between nodes, so a notifier disappears from every neighbor's
/// bookkeeping as soon as its last strong owner drops it.
#[derive(Clone)]
pub struct Notifier(Rc<RefCell<Inner>>);

pub(crate) struct Inner {
    name: String,
    is_dummy: bool,
    notify_func: Box<dyn FnMut() -> bool>,
    observers: Vec<Weak<RefCell<Inner>>>,
    active_observers: Vec<Weak<RefCell<Inner>>>,
    observed: Vec<Weak<RefCell<Inner>>>,
    priority: u64,
    forced_active: bool,
    active: bool,
    called_when_inactive: bool,
    calls: u64,
    last_exception: Option<String>,
}

impl Notifier {
    /// Creates a notifier whose `notify_func` always reports "possibly
    /// changed" (`true`). This is the common case: `Var`, `CallResult` and
    /// most proxies don't need a custom notify hook, only `Cache`-like nodes
    /// that coalesce notifications do.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_notify_func(name, || true)
    }

    /// Creates a notifier with a custom `notify_func`, invoked by [`call`](Notifier::call)
    /// while active; a `true` return forwards the notification to observers.
    pub fn with_notify_func(name: impl Into<String>, notify_func: impl FnMut() -> bool + 'static) -> Self {
        Notifier(Rc::new(RefCell::new(Inner {
            name: name.into(),
            is_dummy: false,
            notify_func: Box::new(notify_func),
            observers: Vec::new(),
            active_observers: Vec::new(),
            observed: Vec::new(),
            priority: 0,
            forced_active: false,
            active: false,
            called_when_inactive: false,
            calls: 0,
            last_exception: None,
        })))
    }

    /// Creates the kind of sentinel used for [`crate::active_notifier`] and for
    /// the forced observer installed by [`refresh`](Notifier::refresh):
    /// priority 0, always active, regardless of observers.
    pub fn new_forced_active(name: impl Into<String>) -> Self {
        let notifier = Self::new(name);
        notifier.0.borrow_mut().forced_active = true;
        notifier.0.borrow_mut().active = true;
        notifier
    }

    /// A shared, inert notifier for `Const`-like observables: `add_observer`
    /// and `remove_observer` are no-ops on it (it never tracks priority or
    /// activity) and it is never itself scheduled.
    pub fn dummy() -> Self {
        thread_local! {
            static DUMMY: Notifier = {
                let notifier = Notifier::new("dummy");
                notifier.0.borrow_mut().is_dummy = true;
                notifier
            };
        }
        DUMMY.with(Clone::clone)
    }

    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.0.borrow_mut().name = name.into();
    }

    pub fn priority(&self) -> u64 {
        self.0.borrow().priority
    }

    pub fn active(&self) -> bool {
        self.0.borrow().active
    }

    pub fn calls(&self) -> u64 {
        self.0.borrow().calls
    }

    pub fn last_exception(&self) -> Option<String> {
        self.0.borrow().last_exception.clone()
    }

    /// Enqueues this notifier on the default runtime; cheap, idempotent
    /// within one drain (duplicate adjacent schedulings collapse to one
    /// call, see [`Runtime::force_run`](crate::Runtime::force_run)).
    pub fn notify(&self) {
        if self.0.borrow().is_dummy {
            return;
        }
        runtime().schedule_call(self);
    }

    /// Invoked by the refresher in priority order. Increments the call
    /// counter; if active, runs `notify_func` and forwards the notification
    /// to observers on a truthy result (or unconditionally while forced
    /// active, so a forced-active node never silently swallows a change).
    /// If inactive, remembers to replay the notification once this node
    /// becomes active again.
    pub fn call(&self) {
        let is_active = {
            let mut inner = self.0.borrow_mut();
            inner.calls += 1;
            inner.active
        };
        if !is_active {
            self.0.borrow_mut().called_when_inactive = true;
            return;
        }

        let forced_active = self.0.borrow().forced_active;
        let result = {
            let mut inner = self.0.borrow_mut();
            let mut notify_func = std::mem::replace(&mut inner.notify_func, Box::new(|| false));
            drop(inner);
            let result = catch_unwind(AssertUnwindSafe(|| notify_func()));
            self.0.borrow_mut().notify_func = notify_func;
            result
        };

        let possibly_changed = match result {
            Ok(changed) => {
                self.0.borrow_mut().last_exception = None;
                changed
            }
            Err(payload) => {
                let message = panic_message(&payload);
                tracing_error(&self.name(), &message);
                self.0.borrow_mut().last_exception = Some(message);
                false
            }
        };

        if possibly_changed || forced_active {
            for observer in self.observers_snapshot() {
                observer.notify();
            }
        }
    }

    /// Raises `observer`'s priority to at least `self.priority() + 1`
    /// (transitively), links the two nodes, and folds `observer` into
    /// `self`'s active set if it is already active.
    pub fn add_observer(&self, observer: &Notifier) {
        if self.0.borrow().is_dummy {
            return;
        }
        observer.set_priority_at_least(self.priority() + 1);

        let observer_is_active = observer.active();
        {
            let mut inner = self.0.borrow_mut();
            if !inner
                .observers
                .iter()
                .any(|weak| weak.as_ptr() == Rc::as_ptr(&observer.0))
            {
                inner.observers.push(Rc::downgrade(&observer.0));
            }
        }
        {
            let mut obs_inner = observer.0.borrow_mut();
            if !obs_inner
                .observed
                .iter()
                .any(|weak| weak.as_ptr() == Rc::as_ptr(&self.0))
            {
                obs_inner.observed.push(Rc::downgrade(&self.0));
            }
        }
        if observer_is_active {
            self.add_to_active(observer);
        }
    }

    /// Inverse of [`add_observer`](Notifier::add_observer).
    pub fn remove_observer(&self, observer: &Notifier) {
        if self.0.borrow().is_dummy {
            return;
        }
        {
            let mut inner = self.0.borrow_mut();
            inner
                .observers
                .retain(|weak| weak.as_ptr() != Rc::as_ptr(&observer.0));
        }
        {
            let mut obs_inner = observer.0.borrow_mut();
            obs_inner
                .observed
                .retain(|weak| weak.as_ptr() != Rc::as_ptr(&self.0));
        }
        let was_active = self
            .0
            .borrow()
            .active_observers
            .iter()
            .any(|weak| weak.as_ptr() == Rc::as_ptr(&observer.0));
        if was_active {
            self.remove_from_active(observer);
        }
    }

    fn add_to_active(&self, observer: &Notifier) {
        {
            let mut inner = self.0.borrow_mut();
            if !inner
                .active_observers
                .iter()
                .any(|weak| weak.as_ptr() == Rc::as_ptr(&observer.0))
            {
                inner.active_observers.push(Rc::downgrade(&observer.0));
            }
        }
        self.update_active();
    }

    fn remove_from_active(&self, observer: &Notifier) {
        {
            let mut inner = self.0.borrow_mut();
            inner
                .active_observers
                .retain(|weak| weak.as_ptr() != Rc::as_ptr(&observer.0));
        }
        self.update_active();
    }

    /// Recomputes `active` from `forced_active` and `active_observers`,
    /// informing every upstream node of the change and replaying a
    /// notification that arrived while this node was inactive.
    ///
    /// `active` is always `forced_active || !active_observers.is_empty()`,
    /// and both terms matter for the stored value, not just for deciding
    /// whether it changed, or a forced-active node with no active observers
    /// would spuriously deactivate.
    fn update_active(&self) {
        let (forced_active, observer_count, previously_active) = {
            let inner = self.0.borrow();
            (inner.forced_active, inner.active_observers.len(), inner.active)
        };
        let now_active = forced_active || observer_count > 0;
        if now_active == previously_active {
            return;
        }

        self.0.borrow_mut().active = now_active;

        let observed: Vec<Notifier> = self.observed_snapshot();
        for upstream in &observed {
            if now_active {
                upstream.add_to_active(self);
            } else {
                upstream.remove_from_active(self);
            }
        }

        if now_active {
            let replay = {
                let mut inner = self.0.borrow_mut();
                std::mem::take(&mut inner.called_when_inactive)
            };
            if replay {
                self.notify();
            }
        }
    }

    fn set_priority_at_least(&self, min_priority: u64) {
        let needs_update = self.0.borrow().priority < min_priority;
        if !needs_update {
            return;
        }
        self.0.borrow_mut().priority = min_priority;
        for observer in self.observers_snapshot() {
            observer.set_priority_at_least(min_priority + 1);
        }
    }

    /// Forces this notifier (and everything at or below its priority) up to
    /// date by temporarily subscribing the process-wide
    /// [`crate::active_notifier`] as an observer of this node, draining
    /// pending work up to this node's priority, then unsubscribing it again.
    /// Activates the entire transitive upstream chain for exactly as long as
    /// it takes to bring this node's value up to date. A no-op if called
    /// while a drain is already in progress on this thread; in that case
    /// everything up to the caller's own priority has necessarily run
    /// already, or will before the ambient drain returns.
    pub fn refresh(&self) {
        if self.0.borrow().is_dummy {
            return;
        }
        let sentinel = active_notifier();
        self.add_observer(&sentinel);
        runtime().force_run(Some(self.priority()));
        self.remove_observer(&sentinel);
    }

    pub(crate) fn observers_snapshot(&self) -> Vec<Notifier> {
        let inner = self.0.borrow();
        inner
            .observers
            .iter()
            .filter_map(|weak| weak.upgrade().map(Notifier))
            .collect()
    }

    pub(crate) fn observed_snapshot(&self) -> Vec<Notifier> {
        let inner = self.0.borrow();
        inner
            .observed
            .iter()
            .filter_map(|weak| weak.upgrade().map(Notifier))
            .collect()
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<Inner>> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn from_weak(weak: &Weak<RefCell<Inner>>) -> Option<Notifier> {
        weak.upgrade().map(Notifier)
    }

    pub(crate) fn ptr_eq(&self, other: &Notifier) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "notifier callback panicked".to_string()
    }
}

fn tracing_error(name: &str, message: &str) {
    #[cfg(feature = "tracing")]
    tracing::error!(notifier = name, %message, "ignoring exception when notifying observer");
    #[cfg(not(feature = "tracing"))]
    let _ = (name, message);
}

impl Debug for Notifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("Notifier")
            .field("name", &inner.name)
            .field("priority", &inner.priority)
            .field("active", &inner.active)
            .field("forced_active", &inner.forced_active)
            .field("calls", &inner.calls)
            .finish()
    }
}

impl PartialEq for Notifier {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}
impl Eq for Notifier {}

pub(crate) type InnerHandle = Weak<RefCell<Inner>>;
pub(crate) fn inner_ptr(weak: &InnerHandle) -> *const () {
    weak.as_ptr() as *const ()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_strictly_exceeds_observed() {
        let upstream = Notifier::new("upstream");
        let downstream = Notifier::new("downstream");
        upstream.add_observer(&downstream);
        assert!(downstream.priority() > upstream.priority());
    }

    #[test]
    fn observer_relations_are_symmetric() {
        let upstream = Notifier::new("upstream");
        let downstream = Notifier::new("downstream");
        upstream.add_observer(&downstream);

        assert!(upstream
            .observers_snapshot()
            .iter()
            .any(|o| o.ptr_eq(&downstream)));
        assert!(downstream
            .observed_snapshot()
            .iter()
            .any(|o| o.ptr_eq(&upstream)));

        upstream.remove_observer(&downstream);
        assert!(upstream.observers_snapshot().is_empty());
        assert!(downstream.observed_snapshot().is_empty());
    }

    #[test]
    fn active_iff_forced_or_has_active_observer() {
        let upstream = Notifier::new("upstream");
        let forced = Notifier::new_forced_active("forced");
        assert!(!upstream.active());

        upstream.add_observer(&forced);
        assert!(upstream.active());

        upstream.remove_observer(&forced);
        assert!(!upstream.active());
    }

    #[test]
    fn dummy_notifier_ignores_observer_wiring() {
        let dummy = Notifier::dummy();
        let observer = Notifier::new("observer");
        dummy.add_observer(&observer);
        assert_eq!(observer.priority(), 0);
        assert!(dummy.observers_snapshot().is_empty());
    }
}
