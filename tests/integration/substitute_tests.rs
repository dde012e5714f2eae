use crate::fixtures::{DerefService, MockService, Service};
use parrot::{args, pattern, Arg, MockError, Substitute};

#[test]
fn test_deref_substitute_uses_mock_api_directly() {
    let service = DerefService::new();
    service
        .stub()
        .call(pattern!(lookup(Arg::any::<String>())))
        .and_return("v".to_string());

    assert_eq!(service.lookup("k".to_string()), Some("v".to_string()));
    assert_eq!(service.call_count("lookup"), 1);
}

#[test]
fn test_delegating_substitute_forwards_history() {
    let service = MockService::new();
    service.record("a".to_string(), Some(1));
    service.record("b".to_string(), None);

    let calls = service.mock().calls_to("record");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].arg::<String>(0), Some(&"a".to_string()));
    assert!(calls[1].is_null(1));
    assert_eq!(service.mock().unstubbed_calls().len(), 2);
}

#[test]
fn test_sealed_substitute_rejects_unknown_operation() {
    let service = MockService::new();
    let err = service
        .stub()
        .try_call(pattern!(delete(Arg::any::<String>())))
        .err()
        .unwrap();
    assert!(matches!(err, MockError::UnknownOperation { .. }));
}

#[test]
fn test_wrong_arity_declaration_fails_fast() {
    let service = MockService::new();
    let err = service
        .expect()
        .try_call_times(pattern!(bar(Arg::eq("x"))), 1)
        .unwrap_err();
    assert!(matches!(
        err,
        MockError::ArityMismatch {
            expected: 2,
            actual: 1,
            ..
        }
    ));
}

#[test]
#[should_panic(expected = "was stubbed with a")]
fn test_wrong_return_type_panics_at_call_site() {
    let service = MockService::new();
    service
        .stub()
        .call(pattern!(lookup(Arg::any::<String>())))
        .and_return("not an option");
    let _: Option<Option<String>> = service.mock().call("lookup", args!["k".to_string()]);
}
