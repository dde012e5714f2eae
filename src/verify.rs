use crate::config::ReportFormat;
use crate::store::RegistrationStore;
use serde::Serialize;
use std::fmt;

/// An expectation whose match count differs from its expected count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmetExpectation {
    pub operation: String,
    pub matchers: Vec<String>,
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for UnmetExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}): expected {} call(s), got {}",
            self.operation,
            self.matchers.join(", "),
            self.expected,
            self.actual
        )
    }
}

/// Every unmet expectation of one mock, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub mock: String,
    pub failures: Vec<UnmetExpectation>,
}

impl VerificationReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Text => self.to_string(),
            ReportFormat::Json => self.to_json().unwrap_or_else(|_| self.to_string()),
        }
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return write!(f, "{}: all expectations met", self.mock);
        }
        write!(
            f,
            "{}: {} unmet expectation(s)",
            self.mock,
            self.failures.len()
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            write!(f, "\n  {}. {}", i + 1, failure)?;
        }
        Ok(())
    }
}

/// Compare every expectation's match count with its expected count.
pub fn verify(mock: &str, store: &RegistrationStore) -> VerificationReport {
    let failures = store
        .expectations()
        .filter_map(|registration| {
            let expected = registration.expected_count().unwrap_or(1);
            let actual = registration.matched_count();
            (expected != actual).then(|| UnmetExpectation {
                operation: registration.pattern().operation().to_string(),
                matchers: registration.pattern().describe_matchers(),
                expected,
                actual,
            })
        })
        .collect();

    VerificationReport {
        mock: mock.to_string(),
        failures,
    }
}
