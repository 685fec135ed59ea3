//! S1: two mutable cells summed through a reactive function, re-read after
//! each assignment.

use std::rc::Rc;

use reactive::{assign, ev, reactive2, var_with, Arg, DecoratorParams, Dep};

fn sum(a: Arg<i64>, b: Arg<i64>) -> Result<i64, reactive::EvalError> {
    let a = match a {
        Arg::Value(v) => v,
        Arg::Observable(_) => unreachable!("both arguments are plain dependencies"),
    };
    let b = match b {
        Arg::Value(v) => v,
        Arg::Observable(_) => unreachable!("both arguments are plain dependencies"),
    };
    Ok(a + b)
}

#[test]
fn reassigning_either_cell_updates_the_sum() {
    let a = Rc::new(var_with(2i64));
    let b = Rc::new(var_with(5i64));

    let s = reactive2(
        "sum",
        ("a", "b"),
        DecoratorParams::new(),
        Dep::Value(a.clone()),
        Dep::Value(b.clone()),
        sum,
    );

    assert_eq!(ev(&s).unwrap(), 7);

    assign(a.as_ref(), 6).unwrap();
    assert_eq!(ev(&s).unwrap(), 11);

    assign(b.as_ref(), 3).unwrap();
    assert_eq!(ev(&s).unwrap(), 9);
}
