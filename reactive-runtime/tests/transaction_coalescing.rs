//! S2: multiple notifications raised inside one transaction collapse into a
//! single drain, run once the outermost `UpdateTransaction` guard drops.

use std::cell::RefCell;
use std::rc::Rc;

use reactive_runtime::{runtime, Notifier};

#[test]
fn three_notifies_in_one_transaction_drain_once() {
    let calls = Rc::new(RefCell::new(0u32));
    let notifier = {
        let calls = calls.clone();
        Notifier::with_notify_func("counter", move || {
            *calls.borrow_mut() += 1;
            true
        })
    };
    let sentinel = Notifier::new_forced_active("sentinel");
    notifier.add_observer(&sentinel);

    {
        let rt = runtime();
        let _txn = rt.begin_transaction();
        notifier.notify();
        notifier.notify();
        notifier.notify();
        assert_eq!(*calls.borrow(), 0, "must not drain before the guard drops");
    }

    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn nested_transactions_only_drain_on_outermost_drop() {
    let calls = Rc::new(RefCell::new(0u32));
    let notifier = {
        let calls = calls.clone();
        Notifier::with_notify_func("counter", move || {
            *calls.borrow_mut() += 1;
            true
        })
    };
    let sentinel = Notifier::new_forced_active("sentinel");
    notifier.add_observer(&sentinel);

    let outer_rt = runtime();
    let outer = outer_rt.begin_transaction();
    {
        let inner_rt = runtime();
        let _inner = inner_rt.begin_transaction();
        notifier.notify();
    }
    assert_eq!(*calls.borrow(), 0);
    drop(outer);
    assert_eq!(*calls.borrow(), 1);
}
