//! S6: an extra dependency forces recomputation without being passed to the
//! function body, the Rust analogue of `dep_only_args`, since there is no
//! argument signature to bind it into in the first place.

use std::cell::RefCell;
use std::rc::Rc;

use reactive::{ev, reactive1, var, var_with, Arg, DecoratorParams, Dep, DynObs, EvalError};

#[test]
fn extra_dep_triggers_recomputation_without_reaching_the_body() {
    let a = Rc::new(var_with(1i64));
    let ignored = Rc::new(var::<()>());
    let ignored_dyn: DynObs<()> = ignored.clone();

    let calls: Rc<RefCell<u32>> = Rc::new(RefCell::new(0));
    let counted_calls = calls.clone();

    let params = DecoratorParams::new().with_extra_dep(&ignored_dyn);

    let f = reactive1(
        "f",
        "a",
        params,
        Dep::Value(a.clone()),
        move |arg: Arg<i64>| -> Result<i64, EvalError> {
            *counted_calls.borrow_mut() += 1;
            let Arg::Value(a) = arg else {
                unreachable!("a is a plain dependency");
            };
            Ok(a)
        },
    );

    assert_eq!(ev(&f).unwrap(), 1);
    assert_eq!(*calls.borrow(), 1);

    // Reading again without any change must not re-run the body: the cache
    // still holds the last result.
    assert_eq!(ev(&f).unwrap(), 1);
    assert_eq!(*calls.borrow(), 1);

    reactive::assign(ignored.as_ref(), ()).unwrap();
    assert_eq!(ev(&f).unwrap(), 1);
    assert_eq!(
        *calls.borrow(),
        2,
        "notifying the dep-only argument must force one recomputation"
    );
}
