//! S5: a validator rejects `None`, then a later assignment clears the
//! failure.

use std::rc::Rc;

use reactive::{assign, ev, reactive1, var_with, Arg, DecoratorParams, Dep, EvalError};

fn not_none(x: Arg<Option<i64>>) -> Result<i64, EvalError> {
    let Arg::Value(x) = x else {
        unreachable!("single plain dependency");
    };
    x.ok_or_else(|| EvalError::Validation("value must not be None".to_string()))
}

#[test]
fn validation_failure_then_recovery_after_assignment() {
    let x = Rc::new(var_with::<Option<i64>>(None));

    let y = reactive1(
        "not_none",
        "x",
        DecoratorParams::new(),
        Dep::Value(x.clone()),
        not_none,
    );

    let error = ev(&y).unwrap_err();
    match error {
        EvalError::Ev { cause } => match *cause {
            EvalError::BodyEval { cause, .. } => {
                assert!(matches!(*cause, EvalError::Validation(_)));
            }
            other => panic!("expected the Ev's cause to be a BodyEval, got {other:?}"),
        },
        other => panic!("expected ev to surface an Ev, got {other:?}"),
    }

    assign(x.as_ref(), Some(7)).unwrap();
    assert_eq!(ev(&y).unwrap(), 7);
}
