//! S3: a notification delivered to an inactive notifier is not dropped. It
//! is replayed once an observer makes the notifier active again.

use std::cell::RefCell;
use std::rc::Rc;

use reactive_runtime::Notifier;

#[test]
fn notify_while_inactive_is_replayed_on_activation() {
    let calls = Rc::new(RefCell::new(0u32));
    let notifier = {
        let calls = calls.clone();
        Notifier::with_notify_func("n", move || {
            *calls.borrow_mut() += 1;
            true
        })
    };

    assert!(!notifier.active());
    notifier.notify();
    assert_eq!(*calls.borrow(), 0, "inactive notifiers don't run notify_func");

    let sentinel = Notifier::new_forced_active("sentinel");
    notifier.add_observer(&sentinel);

    assert!(notifier.active());
    assert_eq!(
        *calls.borrow(),
        1,
        "becoming active must replay the missed notification"
    );
}

#[test]
fn deactivation_then_reactivation_does_not_replay_without_a_pending_notify() {
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
    notifier.notify();
    assert_eq!(*calls.borrow(), 1);

    notifier.remove_observer(&sentinel);
    notifier.add_observer(&sentinel);
    assert_eq!(
        *calls.borrow(),
        1,
        "re-activating without an intervening notify must not replay a stale call"
    );
}
