//! S4: reading a reactive function over two never-assigned cells surfaces
//! the original `NotInitialized` cause through an `ArgEval`, wrapped in the
//! top-level `Ev` kind.

use reactive::{ev_exception, reactive2, var, Arg, DecoratorParams, Dep, EvalError};

fn sum(a: Arg<i64>, b: Arg<i64>) -> Result<i64, EvalError> {
    let (Arg::Value(a), Arg::Value(b)) = (a, b) else {
        unreachable!("both arguments are plain dependencies");
    };
    Ok(a + b)
}

#[test]
fn uninitialized_cell_surfaces_as_ev_wrapping_arg_eval_wrapping_not_initialized() {
    let a = var::<i64>();
    let b = var::<i64>();

    let s = reactive2(
        "sum",
        ("a", "b"),
        DecoratorParams::new(),
        Dep::Value(std::rc::Rc::new(a)),
        Dep::Value(std::rc::Rc::new(b)),
        sum,
    );

    let error = ev_exception(&s).expect("reading an uninitialized input must fail");
    match error {
        EvalError::Ev { cause } => match *cause {
            EvalError::ArgEval { cause, .. } => {
                assert!(matches!(*cause, EvalError::NotInitialized));
            }
            other => panic!("expected the Ev's cause to be an ArgEval, got {other:?}"),
        },
        other => panic!("expected ev_exception to surface an Ev, got {other:?}"),
    }
}
