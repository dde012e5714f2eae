//! The mock instance, its declaration API and the substitute boundary.

use crate::builder::MockBuilder;
use crate::config::Config;
use crate::engine::{self, Returned};
use crate::logging;
use crate::matcher::{MatchContext, Pattern};
use crate::registration::{Action, Registration, RegistrationId, RegistrationKind};
use crate::store::{Call, RegistrationStore};
use crate::value::Value;
use crate::verify::{self, VerificationReport};
use crate::{MockError, Result};
use std::any;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// One test double: its registrations and its call history.
///
/// A `Mock` is meant to be owned by a single test thread. Side effects and
/// computed returns run after the store is released, so they may call back
/// into the same mock.
pub struct Mock {
    name: String,
    config: Config,
    signatures: BTreeMap<String, usize>,
    sealed: bool,
    store: RefCell<RegistrationStore>,
}

impl Mock {
    /// A mock using the process-wide configuration and no declared signatures.
    pub fn new(name: impl Into<String>) -> Self {
        MockBuilder::new(name).build()
    }

    pub(crate) fn from_parts(
        name: String,
        config: Config,
        signatures: BTreeMap<String, usize>,
        sealed: bool,
    ) -> Self {
        Self {
            name,
            config,
            signatures,
            sealed,
            store: RefCell::new(RegistrationStore::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn match_context(&self) -> MatchContext {
        MatchContext::from_config(&self.config)
    }

    /// Start declaring a stub.
    pub fn stub(&self) -> StubBuilder<'_> {
        StubBuilder { mock: self }
    }

    /// Start declaring an expectation.
    pub fn expect(&self) -> ExpectationBuilder<'_> {
        ExpectationBuilder { mock: self }
    }

    fn check_signature(&self, operation: &str, arity: usize) -> Result<()> {
        match self.signatures.get(operation) {
            Some(&expected) if expected != arity => Err(MockError::ArityMismatch {
                operation: format!("{}.{}", self.name, operation),
                expected,
                actual: arity,
            }),
            None if self.sealed => Err(MockError::UnknownOperation {
                mock: self.name.clone(),
                operation: operation.to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn register(
        &self,
        pattern: Pattern,
        kind: RegistrationKind,
        expected: usize,
    ) -> Result<RegistrationId> {
        self.check_signature(pattern.operation(), pattern.arity())?;
        logging::log_registration(&self.name, kind, &pattern.to_string());
        let mut store = self.store.borrow_mut();
        Ok(match kind {
            RegistrationKind::Stub => store.register_stub(pattern),
            RegistrationKind::Expectation => store.register_expectation(pattern, expected),
        })
    }

    fn push_action(&self, id: RegistrationId, action: Action) {
        self.store.borrow_mut().push_action(id, action);
    }

    fn dispatch(&self, operation: &str, args: Vec<Option<Value>>) -> Result<Option<Returned>> {
        self.check_signature(operation, args.len())?;
        let ctx = self.match_context();
        let resolution = {
            let mut store = self.store.borrow_mut();
            engine::resolve(&mut store, Call::new(operation, args), &ctx)
        };

        let call = resolution.call();
        logging::log_call_recorded(&self.name, operation, call.sequence(), call.arity());
        if resolution.is_stubbed() {
            logging::log_stub_resolved(
                &self.name,
                operation,
                resolution.matched_stubs(),
                resolution.has_return(),
            );
        } else {
            logging::log_unstubbed_call(
                &self.name,
                &call.to_string(),
                self.config.resolution.warn_on_unstubbed,
            );
        }

        Ok(resolution.execute())
    }

    /// Forward a call and resolve its return value.
    ///
    /// `Ok(None)` means no stub supplied a value.
    pub fn try_call<R: 'static>(
        &self,
        operation: &str,
        args: Vec<Option<Value>>,
    ) -> Result<Option<R>> {
        let Some(returned) = self.dispatch(operation, args)? else {
            return Ok(None);
        };
        match returned.value.downcast::<R>() {
            Ok(value) => Ok(Some(*value)),
            Err(_) => Err(MockError::ReturnTypeMismatch {
                operation: format!("{}.{}", self.name, operation),
                expected: any::type_name::<R>(),
                actual: returned.type_name,
            }),
        }
    }

    /// Forward a call and resolve its return value, panicking on caller errors.
    pub fn call<R: 'static>(&self, operation: &str, args: Vec<Option<Value>>) -> Option<R> {
        match self.try_call(operation, args) {
            Ok(value) => value,
            Err(e) => panic!("{}", e),
        }
    }

    /// Forward a call whose operation returns nothing. Any stubbed value is dropped.
    pub fn call_void(&self, operation: &str, args: Vec<Option<Value>>) {
        if let Err(e) = self.dispatch(operation, args) {
            panic!("{}", e);
        }
    }

    /// Forward a call whose operation must produce a value.
    pub fn try_call_required<R: 'static>(
        &self,
        operation: &str,
        args: Vec<Option<Value>>,
    ) -> Result<R> {
        self.try_call(operation, args)?
            .ok_or_else(|| MockError::MissingValue {
                mock: self.name.clone(),
                operation: operation.to_string(),
            })
    }

    /// Forward a call whose operation must produce a value. A call that no
    /// stub answers panics instead of inventing a default.
    pub fn call_required<R: 'static>(&self, operation: &str, args: Vec<Option<Value>>) -> R {
        match self.try_call_required(operation, args) {
            Ok(value) => value,
            Err(e) => panic!("{}", e),
        }
    }

    /// Check every expectation, reporting all unmet ones at once.
    pub fn verify(&self) -> Result<()> {
        let report = self.report();
        if report.is_ok() {
            Ok(())
        } else {
            Err(MockError::Verification(report))
        }
    }

    pub fn report(&self) -> VerificationReport {
        let store = self.store.borrow();
        let report = verify::verify(&self.name, &store);
        logging::log_verification(&self.name, store.expectations().count(), report.len());
        report
    }

    /// Panic with the rendered report when any expectation is unmet.
    pub fn assert_verified(&self) {
        let report = self.report();
        if !report.is_ok() {
            panic!("{}", report.render(self.config.report.format));
        }
    }

    /// The full call history, in call order.
    pub fn calls(&self) -> Vec<Call> {
        self.store.borrow().history().to_vec()
    }

    pub fn calls_to(&self, operation: &str) -> Vec<Call> {
        self.store
            .borrow()
            .history()
            .iter()
            .filter(|call| call.operation() == operation)
            .cloned()
            .collect()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.store
            .borrow()
            .history()
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    /// Calls that no stub matched.
    pub fn unstubbed_calls(&self) -> Vec<Call> {
        self.store.borrow().unstubbed().cloned().collect()
    }

    pub fn matched_count(&self, id: RegistrationId) -> usize {
        self.store
            .borrow()
            .get(id)
            .map_or(0, Registration::matched_count)
    }

    pub fn registration_count(&self) -> usize {
        self.store.borrow().registrations().len()
    }
}

impl std::fmt::Debug for Mock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.store.borrow();
        f.debug_struct("Mock")
            .field("name", &self.name)
            .field("registrations", &store.registrations().len())
            .field("calls", &store.history().len())
            .finish()
    }
}

/// Declares stubs on a mock.
pub struct StubBuilder<'a> {
    mock: &'a Mock,
}

impl<'a> StubBuilder<'a> {
    pub fn try_call(self, pattern: Pattern) -> Result<StubHandle<'a>> {
        let id = self.mock.register(pattern, RegistrationKind::Stub, 0)?;
        Ok(StubHandle {
            mock: self.mock,
            id,
        })
    }

    /// Register a stub for `pattern`. Panics when the pattern does not fit a
    /// declared operation signature.
    pub fn call(self, pattern: Pattern) -> StubHandle<'a> {
        match self.try_call(pattern) {
            Ok(handle) => handle,
            Err(e) => panic!("{}", e),
        }
    }
}

/// Chains actions onto a registered stub.
pub struct StubHandle<'a> {
    mock: &'a Mock,
    id: RegistrationId,
}

impl<'a> StubHandle<'a> {
    pub fn id(&self) -> RegistrationId {
        self.id
    }

    pub fn and_return<R: Clone + 'static>(self, value: R) -> Self {
        self.mock.push_action(self.id, Action::return_value(value));
        self
    }

    pub fn and_return_computing<R, F>(self, compute: F) -> Self
    where
        R: 'static,
        F: Fn(&Call) -> R + 'static,
    {
        self.mock.push_action(self.id, Action::return_computed(compute));
        self
    }

    pub fn and_do<F: Fn(&Call) + 'static>(self, side_effect: F) -> Self {
        self.mock.push_action(self.id, Action::side_effect(side_effect));
        self
    }
}

/// Declares expectations on a mock.
pub struct ExpectationBuilder<'a> {
    mock: &'a Mock,
}

impl<'a> ExpectationBuilder<'a> {
    pub fn try_call_times(self, pattern: Pattern, times: usize) -> Result<RegistrationId> {
        self.mock.register(pattern, RegistrationKind::Expectation, times)
    }

    /// Expect `pattern` to match exactly once.
    pub fn call(self, pattern: Pattern) -> RegistrationId {
        self.call_times(pattern, 1)
    }

    /// Expect `pattern` to match exactly `times` times.
    pub fn call_times(self, pattern: Pattern, times: usize) -> RegistrationId {
        match self.try_call_times(pattern, times) {
            Ok(id) => id,
            Err(e) => panic!("{}", e),
        }
    }
}

/// A substitute object backed by a [`Mock`].
///
/// Implement it by holding a mock and returning it from [`Substitute::mock`];
/// a type that derefs to `Mock` gets the same API directly.
pub trait Substitute {
    fn mock(&self) -> &Mock;

    fn stub(&self) -> StubBuilder<'_> {
        self.mock().stub()
    }

    fn expect(&self) -> ExpectationBuilder<'_> {
        self.mock().expect()
    }

    fn verify(&self) -> Result<()> {
        self.mock().verify()
    }
}

impl Substitute for Mock {
    fn mock(&self) -> &Mock {
        self
    }
}
