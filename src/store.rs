use crate::matcher::Pattern;
use crate::registration::{Action, Registration, RegistrationId, RegistrationKind};
use crate::value::{Comparable, Value};
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt;

/// One recorded invocation: the operation name and its actual arguments.
#[derive(Clone, Debug)]
pub struct Call {
    operation: String,
    args: Vec<Option<Value>>,
    sequence: usize,
}

impl Call {
    pub fn new(operation: impl Into<String>, args: Vec<Option<Value>>) -> Self {
        Self {
            operation: operation.into(),
            args,
            sequence: 0,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn args(&self) -> &[Option<Value>] {
        &self.args
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Position of this call in its mock's history.
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// Typed access to the argument at `index`. `None` when the argument is
    /// null, out of range or of another type.
    pub fn arg<T: 'static>(&self, index: usize) -> Option<&T> {
        self.args.get(index)?.as_ref()?.downcast_ref::<T>()
    }

    /// The argument at `index`, or the type's placeholder when it is null or
    /// of another type.
    pub fn arg_or_placeholder<T: Comparable>(&self, index: usize) -> T {
        self.arg::<T>(index).cloned().unwrap_or_else(T::placeholder)
    }

    pub fn is_null(&self, index: usize) -> bool {
        matches!(self.args.get(index), Some(None))
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self.args.iter().map(|arg| match arg {
            Some(value) => format!("{:?}", value),
            None => "null".to_string(),
        });
        write!(f, "{}({})", self.operation, args.format(", "))
    }
}

/// Insertion-ordered registrations plus the append-only call history of one mock.
#[derive(Debug, Default)]
pub struct RegistrationStore {
    registrations: Vec<Registration>,
    history: Vec<Call>,
    unstubbed: BTreeSet<usize>,
}

impl RegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register_stub(&mut self, pattern: Pattern) -> RegistrationId {
        let id = RegistrationId(self.registrations.len());
        self.registrations.push(Registration::stub(id, pattern));
        id
    }

    pub(crate) fn register_expectation(
        &mut self,
        pattern: Pattern,
        expected: usize,
    ) -> RegistrationId {
        let id = RegistrationId(self.registrations.len());
        self.registrations
            .push(Registration::expectation(id, pattern, expected));
        id
    }

    pub(crate) fn push_action(&mut self, id: RegistrationId, action: Action) {
        if let Some(registration) = self.registrations.get_mut(id.0) {
            registration.push_action(action);
        }
    }

    pub fn get(&self, id: RegistrationId) -> Option<&Registration> {
        self.registrations.get(id.0)
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    pub(crate) fn registrations_mut(&mut self) -> &mut [Registration] {
        &mut self.registrations
    }

    pub fn stubs(&self) -> impl Iterator<Item = &Registration> {
        self.of_kind(RegistrationKind::Stub)
    }

    pub fn expectations(&self) -> impl Iterator<Item = &Registration> {
        self.of_kind(RegistrationKind::Expectation)
    }

    fn of_kind(&self, kind: RegistrationKind) -> impl Iterator<Item = &Registration> {
        self.registrations.iter().filter(move |r| r.kind() == kind)
    }

    /// Append a call to the history, stamping its sequence number.
    pub(crate) fn record(&mut self, mut call: Call) -> Call {
        call.sequence = self.history.len();
        self.history.push(call.clone());
        call
    }

    pub(crate) fn mark_unstubbed(&mut self, sequence: usize) {
        self.unstubbed.insert(sequence);
    }

    pub fn history(&self) -> &[Call] {
        &self.history
    }

    pub fn was_stubbed(&self, call: &Call) -> bool {
        !self.unstubbed.contains(&call.sequence)
    }

    pub fn unstubbed(&self) -> impl Iterator<Item = &Call> {
        self.unstubbed.iter().filter_map(|seq| self.history.get(*seq))
    }
}
