//! Test doubles built around an invocation-matching and resolution engine.
//!
//! A [`Mock`] records every call made through it, matches the call against
//! stub and expectation registrations declared with [`Arg`] matchers, runs
//! the winning stub actions and later verifies expectation counts.

pub mod builder;
pub mod captor;
pub mod config;
pub mod engine;
pub mod logging;
pub mod matcher;
pub mod mock;
pub mod registration;
pub mod store;
pub mod value;
pub mod verify;

use miette::Diagnostic;

pub use builder::MockBuilder;
pub use captor::Captor;
pub use config::Config;
pub use matcher::{Arg, ArgMatcher, MatchContext, Pattern};
pub use mock::{ExpectationBuilder, Mock, StubBuilder, StubHandle, Substitute};
pub use registration::RegistrationKind;
pub use store::Call;
pub use value::{null, AnyComparable, Comparable, FnArg, IntoArg, Value};
pub use verify::{UnmetExpectation, VerificationReport};

/// Result type alias for mock operations
pub type Result<T, E = MockError> = std::result::Result<T, E>;

/// Error types for declaring, calling and verifying mocks
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum MockError {
    #[error("{operation} expects {expected} argument(s) but {actual} were given")]
    #[diagnostic(
        code(parrot::arity_mismatch),
        help("Give one matcher per parameter of the mocked operation, in declaration order.")
    )]
    ArityMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("{mock} has no operation named `{operation}`")]
    #[diagnostic(
        code(parrot::unknown_operation),
        help("Declare the operation with `MockBuilder::operation` before stubbing or calling it.")
    )]
    UnknownOperation { mock: String, operation: String },

    #[error("Invalid matcher pattern: {0}")]
    #[diagnostic(
        code(parrot::invalid_pattern),
        help("Check the regular expression syntax passed to `Arg::regex`.")
    )]
    InvalidPattern(String),

    #[error("{mock}.{operation} resolved to no value")]
    #[diagnostic(
        code(parrot::missing_value),
        help("Add a stub for this call with `mock.stub().call(..).and_return(..)`, or use `Mock::call` to accept an absent value.")
    )]
    MissingValue { mock: String, operation: String },

    #[error("{operation} was stubbed with a {actual} but the call site expects a {expected}")]
    #[diagnostic(
        code(parrot::return_type_mismatch),
        help("The type passed to `and_return` must match the return type of the mocked operation.")
    )]
    ReturnTypeMismatch {
        operation: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{0}")]
    #[diagnostic(
        code(parrot::verification_failed),
        help("Every expectation lists the matchers it was declared with and how often it matched.")
    )]
    Verification(VerificationReport),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(parrot::config_error),
        help("Ensure the .parrot.toml file is valid TOML and readable.")
    )]
    Config(String),
}
