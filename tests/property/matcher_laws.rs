use parrot::{Arg, MatchContext, Value};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_exact_matches_iff_equal(expected in any::<i64>(), actual in any::<i64>()) {
        let ctx = MatchContext::default();
        let matched = Arg::eq(expected).matches(Some(&Value::of(actual)), &ctx);
        prop_assert_eq!(matched, expected == actual);
    }

    #[test]
    fn test_exact_rejects_other_types(n in any::<i32>(), s in "\\PC*") {
        let ctx = MatchContext::default();
        prop_assert!(!Arg::eq(n).matches(Some(&Value::of(i64::from(n))), &ctx));
        prop_assert!(!Arg::eq(n).matches(Some(&Value::of(s.clone())), &ctx));
        prop_assert!(!Arg::eq(s).matches(Some(&Value::of(n)), &ctx));
    }

    #[test]
    fn test_any_accepts_its_type_only(n in any::<u32>(), s in "\\PC*") {
        let ctx = MatchContext::default();
        prop_assert!(Arg::any::<u32>().matches(Some(&Value::of(n)), &ctx));
        prop_assert!(Arg::any::<String>().matches(Some(&Value::of(s.clone())), &ctx));
        prop_assert!(!Arg::any::<u32>().matches(Some(&Value::of(s)), &ctx));
        prop_assert!(!Arg::any::<String>().matches(Some(&Value::of(n)), &ctx));
    }

    #[test]
    fn test_not_inverts(expected in any::<i16>(), actual in any::<i16>()) {
        let ctx = MatchContext::default();
        let value = Value::of(actual);
        let inner = Arg::eq(expected);
        prop_assert_ne!(
            inner.matches(Some(&value), &ctx),
            Arg::not(inner.clone()).matches(Some(&value), &ctx)
        );
    }

    #[test]
    fn test_function_value_matches_everything(n in any::<i64>()) {
        let ctx = MatchContext::default();
        let m = Arg::function_value();
        prop_assert!(m.matches(Some(&Value::of(n)), &ctx));
        prop_assert!(m.matches(Some(&Value::function(move || n)), &ctx));
        prop_assert!(m.matches(None, &ctx));
    }
}
