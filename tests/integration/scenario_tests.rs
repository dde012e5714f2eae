use crate::fixtures::{Completion, MockService, Service};
use parrot::{args, pattern, Arg, Captor, Substitute};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_exact_stub_returns_value_only_for_matching_call() {
    let service = MockService::new();
    service
        .stub()
        .call(pattern!(bar(Arg::eq("hello"), Arg::eq(42))))
        .and_return(true);

    assert!(service.bar("hello", 42));
    assert_eq!(service.mock().call::<bool>("bar", args!["hello", 7]), None);
}

#[test]
#[should_panic(expected = "MockService.bar resolved to no value")]
fn test_forcing_missing_value_panics() {
    let service = MockService::new();
    service.bar("hello", 42);
}

#[test]
fn test_captor_records_every_call() {
    let service = MockService::new();
    let captor = Captor::<&str>::new();
    service
        .stub()
        .call(pattern!(bar(captor.capture(), Arg::eq(42))))
        .and_return(true);

    service.bar("a", 42);
    service.bar("b", 42);

    assert_eq!(captor.all(), vec![Some("a"), Some("b")]);
    assert_eq!(captor.latest(), Some(Some("b")));
}

#[test]
fn test_captor_keeps_null_arguments() {
    let service = MockService::new();
    let values = Captor::<i64>::new();
    service
        .stub()
        .call(pattern!(record(Arg::any::<String>(), values.capture())))
        .and_do(|_| {});

    service.record("a".to_string(), Some(1));
    service.record("b".to_string(), None);

    assert_eq!(values.all(), vec![Some(1), None]);
}

#[test]
fn test_computed_return_reads_arguments() {
    let service = MockService::new();
    service
        .stub()
        .call(pattern!(lookup(Arg::regex("^user:").unwrap())))
        .and_return_computing(|call| {
            call.arg_or_placeholder::<String>(0)
                .trim_start_matches("user:")
                .to_uppercase()
        });

    assert_eq!(service.lookup("user:ada".to_string()), Some("ADA".to_string()));
    assert_eq!(service.lookup("group:x".to_string()), None);
}

#[test]
fn test_predicate_matcher() {
    let service = MockService::new();
    service
        .stub()
        .call(pattern!(bar(Arg::any::<&str>(), Arg::verify(|n: &i32| *n % 2 == 0))))
        .and_return(true);
    service
        .stub()
        .call(pattern!(bar(Arg::any::<&str>(), Arg::verify(|n: &i32| *n % 2 != 0))))
        .and_return(false);

    assert!(service.bar("x", 4));
    assert!(!service.bar("x", 5));
}

#[test]
fn test_function_value_argument_can_be_invoked_from_side_effect() {
    let service = MockService::new();
    service
        .stub()
        .call(pattern!(fetch(Arg::eq("https://example.com"), Arg::function_value())))
        .and_do(|call| {
            if let Some(completion) = call.arg::<Completion>(1) {
                completion(Ok("body".to_string()));
            }
        });

    let received = Rc::new(RefCell::new(None::<Result<String, String>>));
    let sink = Rc::clone(&received);
    service.fetch(
        "https://example.com",
        Rc::new(move |result: Result<String, String>| {
            *sink.borrow_mut() = Some(result)
        }),
    );

    assert_eq!(*received.borrow(), Some(Ok("body".to_string())));
}

#[test]
fn test_null_matchers() {
    let service = MockService::new();
    let nulls = Rc::new(RefCell::new(0));
    let any_nulls = Rc::new(RefCell::new(0));
    let n = Rc::clone(&nulls);
    let a = Rc::clone(&any_nulls);
    service
        .stub()
        .call(pattern!(record(Arg::any::<String>(), Arg::null())))
        .and_do(move |_| *n.borrow_mut() += 1);
    service
        .stub()
        .call(pattern!(record(Arg::eq("k".to_string()), Arg::any::<i64>())))
        .and_do(move |_| *a.borrow_mut() += 1);

    service.record("k".to_string(), None);
    service.record("k".to_string(), Some(3));

    assert_eq!(*nulls.borrow(), 1);
    assert_eq!(*any_nulls.borrow(), 1);
}

#[test]
#[should_panic(expected = "capture<String> was given a &str argument")]
fn test_captor_of_other_type_fails_loudly() {
    let mock = parrot::MockBuilder::new("Sink")
        .with_config(parrot::Config::default())
        .build();
    let keys = Captor::<String>::new();
    mock.stub().call(pattern!(put(keys.capture()))).and_return(());

    mock.call_void("put", args![None::<String>]);
    mock.call_void("put", args!["hello"]);
}
