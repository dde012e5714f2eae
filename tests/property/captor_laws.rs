use parrot::{args, pattern, Captor, Config, MockBuilder};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_captor_records_calls_in_order(values in prop::collection::vec(any::<Option<i32>>(), 0..20)) {
        let mock = MockBuilder::new("Sink").with_config(Config::default()).build();
        let captor = Captor::<i32>::new();
        mock.stub().call(pattern!(put(captor.capture()))).and_return(());

        for value in &values {
            mock.call_void("put", args![*value]);
        }

        prop_assert_eq!(captor.len(), values.len());
        prop_assert_eq!(captor.all(), values.clone());
        prop_assert_eq!(captor.latest(), values.last().copied());
        prop_assert!(mock.unstubbed_calls().is_empty());
    }
}
