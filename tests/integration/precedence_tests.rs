use crate::fixtures::{MockService, Service};
use parrot::{pattern, Arg, Substitute};
use std::cell::RefCell;
use std::rc::Rc;

fn any_bar() -> parrot::Pattern {
    pattern!(bar(Arg::any::<&str>(), Arg::any::<i32>()))
}

#[test]
fn test_most_recent_side_effect_fires_alone() {
    let service = MockService::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let l1 = Rc::clone(&log);
    service
        .stub()
        .call(any_bar())
        .and_do(move |_| l1.borrow_mut().push("S1"));
    let l2 = Rc::clone(&log);
    service
        .stub()
        .call(any_bar())
        .and_do(move |_| l2.borrow_mut().push("S2"))
        .and_return(true);

    assert!(service.bar("x", 1));
    assert_eq!(*log.borrow(), vec!["S2"]);
}

#[test]
fn test_return_value_beats_computed_declared_later() {
    let service = MockService::new();
    service
        .stub()
        .call(any_bar())
        .and_return(true)
        .and_return_computing(|_| false);

    assert!(service.bar("x", 1));
}

#[test]
fn test_chained_returns_shadow_earlier_ones() {
    let service = MockService::new();
    service
        .stub()
        .call(any_bar())
        .and_return(false)
        .and_return(true);

    assert!(service.bar("x", 1));
}

#[test]
fn test_narrower_later_stub_overrides_broader_one() {
    let service = MockService::new();
    service.stub().call(any_bar()).and_return(false);
    service
        .stub()
        .call(pattern!(bar(Arg::eq("vip"), Arg::any::<i32>())))
        .and_return(true);

    assert!(service.bar("vip", 1));
    assert!(!service.bar("guest", 1));
}

#[test]
fn test_side_effect_and_return_from_different_stubs() {
    let service = MockService::new();
    let hits = Rc::new(RefCell::new(0));
    service.stub().call(any_bar()).and_return(true);
    let h = Rc::clone(&hits);
    service
        .stub()
        .call(any_bar())
        .and_do(move |_| *h.borrow_mut() += 1);

    assert!(service.bar("x", 1));
    assert_eq!(*hits.borrow(), 1);
}
