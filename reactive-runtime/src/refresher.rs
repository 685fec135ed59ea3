use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::config::RuntimeConfig;
use crate::notifier::{inner_ptr, Notifier};

struct QueueItem {
    priority: u64,
    seq: u64,
    notifier: crate::notifier::InnerHandle,
}

impl QueueItem {
    fn is_same_notifier(&self, other: &QueueItem) -> bool {
        inner_ptr(&self.notifier) == inner_ptr(&other.notifier)
    }
}

// `BinaryHeap` is a max-heap; invert the ordering so the *lowest* priority
// (then earliest-scheduled) item sorts first, matching a `PriorityQueue`
// that drains leaves before dependents.
impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}
impl Eq for QueueItem {}

/// A priority queue of pending notifier calls, plus the transaction counter
/// that decides whether scheduling drains immediately.
///
/// Most callers use the thread-local default via [`crate::runtime`]; this
/// type is public so tests (and embedders who want a fully isolated graph)
/// can build their own.
pub struct Runtime {
    queue: RefCell<BinaryHeap<QueueItem>>,
    next_seq: Cell<u64>,
    updates_in_progress: Cell<u32>,
    draining: Cell<bool>,
    config: RuntimeConfig,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        Runtime {
            queue: RefCell::new(BinaryHeap::with_capacity(config.queue_capacity_hint)),
            next_seq: Cell::new(0),
            updates_in_progress: Cell::new(0),
            draining: Cell::new(false),
            config,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Enqueues `notifier`, then drains immediately unless a transaction is
    /// open.
    pub fn schedule_call(&self, notifier: &Notifier) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.queue.borrow_mut().push(QueueItem {
            priority: notifier.priority(),
            seq,
            notifier: notifier.downgrade(),
        });
        self.maybe_run();
    }

    /// Drains iff no [`UpdateTransaction`] is currently open and no drain is
    /// already running further up the call stack.
    ///
    /// The second condition matters: a notifier's `notify_func` schedules its
    /// observers while [`force_run`](Runtime::force_run) is itself mid-loop
    /// over the queue. Without it, that inner `schedule_call` would kick off
    /// a nested drain instead of letting the outer loop pick the new item up
    /// on its next iteration, which both breaks single-call coalescing for a
    /// node with two just-drained dependencies and defeats the point of
    /// priority ordering (the outer loop would call a downstream node before
    /// its sibling dependency had run).
    pub fn maybe_run(&self) {
        if self.updates_in_progress.get() == 0 && !self.draining.get() {
            self.force_run(None);
        }
    }

    /// Drains the queue, in priority order, stopping once it is empty or
    /// (if `max_priority` is set) once the next pending call exceeds it.
    ///
    /// Adjacent duplicate schedulings of the very same notifier collapse
    /// into a single call. Re-entrant calls (a notifier callback scheduling
    /// more work while this loop is running) feed the same loop rather than
    /// recursing.
    pub fn force_run(&self, max_priority: Option<u64>) {
        if self.draining.get() {
            return;
        }
        self.draining.set(true);
        let _guard = DrainGuard(self);

        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!("refresher_drain").entered();

        let mut pending: Option<QueueItem> = None;
        loop {
            let item = match pending.take() {
                Some(item) => item,
                None => match self.queue.borrow_mut().pop() {
                    Some(item) => item,
                    None => break,
                },
            };

            if let Some(max) = max_priority {
                if item.priority > max {
                    self.queue.borrow_mut().push(item);
                    break;
                }
            }

            pending = self.queue.borrow_mut().pop();
            if let Some(next) = &pending {
                if next.is_same_notifier(&item) {
                    continue;
                }
            }

            if let Some(notifier) = Notifier::from_weak(&item.notifier) {
                #[cfg(feature = "tracing")]
                tracing::trace!(notifier = %notifier.name(), priority = item.priority, "calling notifier");
                notifier.call();
            }
        }
    }

    /// Begins a transaction: while any transaction is open, scheduling does
    /// not drain. Transactions nest by counter; the drain runs exactly once,
    /// when the outermost transaction's guard is dropped.
    pub fn begin_transaction(&self) -> UpdateTransaction<'_> {
        self.updates_in_progress.set(self.updates_in_progress.get() + 1);
        UpdateTransaction { runtime: self }
    }
}

struct DrainGuard<'a>(&'a Runtime);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.draining.set(false);
    }
}

/// RAII guard for a batched update region. Scheduling while any guard (of
/// any nesting depth) is alive does not drain; the drain happens once, when
/// the outermost guard is dropped.
#[must_use = "an UpdateTransaction does nothing once dropped immediately; bind it to a variable"]
pub struct UpdateTransaction<'a> {
    runtime: &'a Runtime,
}

impl Drop for UpdateTransaction<'_> {
    fn drop(&mut self) {
        self.runtime
            .updates_in_progress
            .set(self.runtime.updates_in_progress.get() - 1);
        self.runtime.maybe_run();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::notifier::Notifier;

    // Each test thread gets its own `thread_local!` default runtime, so these
    // don't need a private handle into `Runtime` to stay isolated from each
    // other.

    #[test]
    fn queue_is_empty_after_a_plain_notify_drains() {
        let runtime = crate::runtime();
        let upstream = Notifier::new("upstream");
        upstream.notify();
        assert!(runtime.queue.borrow().is_empty());
    }

    #[test]
    fn leaves_call_before_their_observers() {
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        let upstream = {
            let log = log.clone();
            Notifier::with_notify_func("upstream", move || {
                log.borrow_mut().push("upstream");
                true
            })
        };
        let downstream = {
            let log = log.clone();
            Notifier::with_notify_func("downstream", move || {
                log.borrow_mut().push("downstream");
                true
            })
        };
        let sentinel = Notifier::new_forced_active("sentinel");
        downstream.add_observer(&sentinel);
        upstream.add_observer(&downstream);

        upstream.notify();

        assert_eq!(*log.borrow(), vec!["upstream", "downstream"]);
    }

    #[test]
    fn transaction_coalesces_drains_until_outermost_guard_drops() {
        let runtime = crate::runtime();
        let notifier = Notifier::new("n");

        let outer = runtime.begin_transaction();
        let inner = runtime.begin_transaction();
        runtime.schedule_call(&notifier);
        assert!(!runtime.queue.borrow().is_empty());

        drop(inner);
        assert!(
            !runtime.queue.borrow().is_empty(),
            "nested guard drop must not drain while the outer guard is still held"
        );

        drop(outer);
        assert!(runtime.queue.borrow().is_empty());
    }

    #[test]
    fn adjacent_duplicate_scheduling_of_same_notifier_calls_once() {
        let runtime = crate::runtime();
        let calls = Rc::new(RefCell::new(0u32));
        let notifier = {
            let calls = calls.clone();
            Notifier::with_notify_func("n", move || {
                *calls.borrow_mut() += 1;
                true
            })
        };
        let sentinel = Notifier::new_forced_active("sentinel");
        notifier.add_observer(&sentinel);

        let guard = runtime.begin_transaction();
        runtime.schedule_call(&notifier);
        runtime.schedule_call(&notifier);
        drop(guard);

        assert_eq!(*calls.borrow(), 1);
    }
}
