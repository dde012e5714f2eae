use crate::fixtures::{MockService, Service};
use parrot::{args, pattern, Arg, MockError, Substitute};

#[test]
fn test_expectation_needs_declared_number_of_calls() {
    let service = MockService::new();
    service
        .expect()
        .call_times(pattern!(lookup(Arg::eq("x".to_string()))), 2);

    service.lookup("x".to_string());
    let Err(MockError::Verification(report)) = service.verify() else {
        panic!("expected one unmet expectation");
    };
    assert_eq!(report.len(), 1);
    assert_eq!(report.failures[0].expected, 2);
    assert_eq!(report.failures[0].actual, 1);

    service.lookup("x".to_string());
    assert!(service.verify().is_ok());
}

#[test]
fn test_report_lists_every_unmet_expectation() {
    let service = MockService::new();
    service.expect().call(pattern!(lookup(Arg::eq("a".to_string()))));
    service
        .expect()
        .call(pattern!(record(Arg::any::<String>(), Arg::any_or_null::<i64>())));
    service
        .expect()
        .call_times(pattern!(bar(Arg::any::<&str>(), Arg::any::<i32>())), 0);

    let report = service.mock().report();
    assert_eq!(report.len(), 2);
    let text = report.to_string();
    assert!(text.contains("MockService: 2 unmet expectation(s)"));
    assert!(text.contains(r#"lookup(eq("a")): expected 1 call(s), got 0"#));
    assert!(text.contains("record(any<String>, any<i64>?): expected 1 call(s), got 0"));
}

#[test]
fn test_verify_is_repeatable() {
    let service = MockService::new();
    service.expect().call(pattern!(lookup(Arg::any::<String>())));

    let first = service.mock().report();
    let second = service.mock().report();
    assert_eq!(first, second);
    assert!(service.verify().is_err());
    assert!(service.verify().is_err());
}

#[test]
fn test_stub_and_expectation_on_same_call() {
    let service = MockService::new();
    service
        .stub()
        .call(pattern!(bar(Arg::eq("hello"), Arg::any::<i32>())))
        .and_return(true);
    service
        .expect()
        .call(pattern!(bar(Arg::eq("hello"), Arg::eq(1))));

    assert!(service.bar("hello", 1));
    assert!(service.verify().is_ok());
}

#[test]
fn test_never_called_expectation() {
    let service = MockService::new();
    service
        .expect()
        .call_times(pattern!(record(Arg::any::<String>(), Arg::any_or_null::<i64>())), 0);
    assert!(service.verify().is_ok());

    service.mock().call_void("record", args!["k".to_string(), None::<i64>]);
    assert!(service.verify().is_err());
}
