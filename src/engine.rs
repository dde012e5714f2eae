//! Resolution of an incoming call against a mock's registrations.
//!
//! Resolution runs in two phases. [`resolve`] works on the store: it appends
//! the call to the history, finds every matching registration in insertion
//! order, runs their capture steps, bumps their match counters and picks the
//! actions to run. [`Resolution::execute`] then runs those actions without
//! touching the store, so a side effect may call back into the same mock.
//!
//! Action precedence across all matching stubs, scanning the most recently
//! declared action first:
//! - only the first side effect found runs;
//! - the first `ReturnValue` found supplies the result;
//! - otherwise the first `ReturnComputed` found computes it.
//!
//! A `ReturnValue` therefore wins over a `ReturnComputed` even when the
//! computed one was declared later.

use crate::matcher::MatchContext;
use crate::registration::{
    Action, ComputeFn, EffectFn, ProduceFn, RegistrationId, RegistrationKind,
};
use crate::store::{Call, RegistrationStore};
use std::any::Any;

enum ReturnSource {
    Value(ProduceFn, &'static str),
    Computed(ComputeFn, &'static str),
}

/// Outcome of matching one call, ready to execute.
pub struct Resolution {
    call: Call,
    matched: Vec<RegistrationId>,
    matched_stubs: usize,
    side_effect: Option<EffectFn>,
    returns: Option<ReturnSource>,
}

/// A value produced by a stub, still type-erased.
pub struct Returned {
    pub value: Box<dyn Any>,
    pub type_name: &'static str,
}

impl Resolution {
    pub fn call(&self) -> &Call {
        &self.call
    }

    /// Every registration, stub or expectation, that matched the call.
    pub fn matched(&self) -> &[RegistrationId] {
        &self.matched
    }

    /// Number of stubs among the matched registrations.
    pub fn matched_stubs(&self) -> usize {
        self.matched_stubs
    }

    /// Whether at least one stub matched.
    pub fn is_stubbed(&self) -> bool {
        self.matched_stubs > 0
    }

    pub fn has_return(&self) -> bool {
        self.returns.is_some()
    }

    /// Run the selected side effect, then produce the return value.
    pub fn execute(self) -> Option<Returned> {
        if let Some(effect) = &self.side_effect {
            effect(&self.call);
        }
        self.returns.map(|source| match source {
            ReturnSource::Value(produce, type_name) => Returned {
                value: produce(),
                type_name,
            },
            ReturnSource::Computed(compute, type_name) => Returned {
                value: compute(&self.call),
                type_name,
            },
        })
    }
}

/// Record `call` and resolve it against the registrations in `store`.
pub fn resolve(store: &mut RegistrationStore, call: Call, ctx: &MatchContext) -> Resolution {
    let call = store.record(call);

    let mut matched = Vec::new();
    let mut acting: Vec<Vec<Action>> = Vec::new();
    for registration in store.registrations_mut() {
        if !registration.accepts(&call, ctx) {
            continue;
        }
        registration.capture(&call);
        registration.record_match();
        matched.push(registration.id());
        if registration.kind() == RegistrationKind::Stub {
            acting.push(registration.actions().to_vec());
        }
    }

    let matched_stubs = acting.len();
    if matched_stubs == 0 {
        store.mark_unstubbed(call.sequence());
    }

    let mut side_effect = None;
    let mut value = None;
    let mut computed = None;
    for action in acting.iter().rev().flat_map(|actions| actions.iter().rev()) {
        match action {
            Action::SideEffect(effect) => {
                if side_effect.is_none() {
                    side_effect = Some(effect.clone());
                }
            }
            Action::ReturnValue { produce, type_name } => {
                if value.is_none() {
                    value = Some(ReturnSource::Value(produce.clone(), *type_name));
                }
            }
            Action::ReturnComputed { compute, type_name } => {
                if computed.is_none() {
                    computed = Some(ReturnSource::Computed(compute.clone(), *type_name));
                }
            }
        }
    }

    Resolution {
        call,
        matched,
        matched_stubs,
        side_effect,
        returns: value.or(computed),
    }
}
