//! S7: a diamond-shaped dependency graph drains leaves before the node that
//! observes all of them, exactly once per drain, regardless of the order
//! notifications were raised in.

use std::cell::RefCell;
use std::rc::Rc;

use reactive_runtime::{runtime, Notifier};

#[test]
fn diamond_graph_calls_sink_once_after_both_sources() {
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    let left = {
        let log = log.clone();
        Notifier::with_notify_func("left", move || {
            log.borrow_mut().push("left");
            true
        })
    };
    let right = {
        let log = log.clone();
        Notifier::with_notify_func("right", move || {
            log.borrow_mut().push("right");
            true
        })
    };
    let sink = {
        let log = log.clone();
        Notifier::with_notify_func("sink", move || {
            log.borrow_mut().push("sink");
            true
        })
    };
    let sentinel = Notifier::new_forced_active("sentinel");

    left.add_observer(&sink);
    right.add_observer(&sink);
    sink.add_observer(&sentinel);

    assert!(sink.priority() > left.priority());
    assert!(sink.priority() > right.priority());

    {
        let rt = runtime();
        let _txn = rt.begin_transaction();
        right.notify();
        left.notify();
    }

    assert_eq!(
        sink.calls(),
        1,
        "a diamond converging within one transaction must call the sink once, not once per source"
    );
    let trace = log.borrow();
    assert_eq!(trace.last(), Some(&"sink"), "sink must run after both sources");
    assert_eq!(trace.len(), 3);
}
