use parrot::{Arg, Mock, Pattern};

/// Post-hoc assertions over a mock's call history.
///
/// These complement declared expectations: they look at what happened
/// instead of what was announced up front.
pub struct CallAssertions<'a> {
    mock: &'a Mock,
}

impl<'a> CallAssertions<'a> {
    pub fn new(mock: &'a Mock) -> Self {
        Self { mock }
    }

    pub fn assert_called(&self, operation: &str) {
        assert!(
            self.mock.call_count(operation) > 0,
            "expected {}.{} to be called, but it never was",
            self.mock.name(),
            operation
        );
    }

    pub fn assert_not_called(&self, operation: &str) {
        let calls = self.mock.calls_to(operation);
        assert!(
            calls.is_empty(),
            "expected {}.{} not to be called, but saw {}",
            self.mock.name(),
            operation,
            render(&calls)
        );
    }

    pub fn assert_called_times(&self, operation: &str, times: usize) {
        let actual = self.mock.call_count(operation);
        assert_eq!(
            actual,
            times,
            "expected {}.{} to be called {} time(s), got {}",
            self.mock.name(),
            operation,
            times,
            actual
        );
    }

    /// The most recent call to `operation` must satisfy `matchers` positionally.
    pub fn assert_last_called_with(&self, operation: &str, matchers: &[Arg]) {
        let calls = self.mock.calls_to(operation);
        let Some(last) = calls.last() else {
            panic!(
                "expected {}.{} to be called, but it never was",
                self.mock.name(),
                operation
            );
        };
        let expected = Pattern::new(operation, matchers.to_vec());
        assert!(
            expected.accepts(last.operation(), last.args(), &self.mock.match_context()),
            "expected last call {} to match {}",
            last,
            expected
        );
    }

    /// Every recorded call must have matched at least one stub.
    pub fn assert_all_stubbed(&self) {
        let unstubbed = self.mock.unstubbed_calls();
        assert!(
            unstubbed.is_empty(),
            "{} received call(s) with no matching stub: {}",
            self.mock.name(),
            render(&unstubbed)
        );
    }
}

fn render(calls: &[parrot::Call]) -> String {
    calls
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
