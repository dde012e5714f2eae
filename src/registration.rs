use crate::matcher::{MatchContext, Pattern};
use crate::store::Call;
use serde::Serialize;
use std::any::{self, Any};
use std::fmt;
use std::rc::Rc;

/// Position of a registration in its mock's store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(pub(crate) usize);

impl RegistrationId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationKind {
    Stub,
    Expectation,
}

pub(crate) type ProduceFn = Rc<dyn Fn() -> Box<dyn Any>>;
pub(crate) type ComputeFn = Rc<dyn Fn(&Call) -> Box<dyn Any>>;
pub(crate) type EffectFn = Rc<dyn Fn(&Call)>;

/// One stub action. Declaration order matters; see [`crate::engine`].
#[derive(Clone)]
pub enum Action {
    ReturnValue {
        produce: ProduceFn,
        type_name: &'static str,
    },
    ReturnComputed {
        compute: ComputeFn,
        type_name: &'static str,
    },
    SideEffect(EffectFn),
}

impl Action {
    pub fn return_value<R: Clone + 'static>(value: R) -> Self {
        Action::ReturnValue {
            produce: Rc::new(move || Box::new(value.clone()) as Box<dyn Any>),
            type_name: any::type_name::<R>(),
        }
    }

    pub fn return_computed<R, F>(compute: F) -> Self
    where
        R: 'static,
        F: Fn(&Call) -> R + 'static,
    {
        Action::ReturnComputed {
            compute: Rc::new(move |call: &Call| Box::new(compute(call)) as Box<dyn Any>),
            type_name: any::type_name::<R>(),
        }
    }

    pub fn side_effect<F: Fn(&Call) + 'static>(effect: F) -> Self {
        Action::SideEffect(Rc::new(effect))
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::ReturnValue { type_name, .. } => write!(f, "ReturnValue<{}>", type_name),
            Action::ReturnComputed { type_name, .. } => {
                write!(f, "ReturnComputed<{}>", type_name)
            }
            Action::SideEffect(_) => f.write_str("SideEffect"),
        }
    }
}

#[derive(Debug)]
enum Payload {
    Stub { actions: Vec<Action> },
    Expectation { expected: usize },
}

/// A declared pattern together with its stub actions or expected count.
#[derive(Debug)]
pub struct Registration {
    id: RegistrationId,
    pattern: Pattern,
    payload: Payload,
    matched_count: usize,
}

impl Registration {
    pub(crate) fn stub(id: RegistrationId, pattern: Pattern) -> Self {
        Self {
            id,
            pattern,
            payload: Payload::Stub {
                actions: Vec::new(),
            },
            matched_count: 0,
        }
    }

    pub(crate) fn expectation(id: RegistrationId, pattern: Pattern, expected: usize) -> Self {
        Self {
            id,
            pattern,
            payload: Payload::Expectation { expected },
            matched_count: 0,
        }
    }

    pub fn id(&self) -> RegistrationId {
        self.id
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn kind(&self) -> RegistrationKind {
        match self.payload {
            Payload::Stub { .. } => RegistrationKind::Stub,
            Payload::Expectation { .. } => RegistrationKind::Expectation,
        }
    }

    /// Stub actions in declaration order; empty for expectations.
    pub fn actions(&self) -> &[Action] {
        match &self.payload {
            Payload::Stub { actions } => actions,
            Payload::Expectation { .. } => &[],
        }
    }

    pub fn expected_count(&self) -> Option<usize> {
        match self.payload {
            Payload::Stub { .. } => None,
            Payload::Expectation { expected } => Some(expected),
        }
    }

    pub fn matched_count(&self) -> usize {
        self.matched_count
    }

    pub fn accepts(&self, call: &Call, ctx: &MatchContext) -> bool {
        self.pattern.accepts(call.operation(), call.args(), ctx)
    }

    pub(crate) fn push_action(&mut self, action: Action) {
        if let Payload::Stub { actions } = &mut self.payload {
            actions.push(action);
        }
    }

    /// Feed the actual arguments to every positional matcher's capture step.
    pub(crate) fn capture(&self, call: &Call) {
        for (matcher, actual) in self.pattern.matchers().iter().zip(call.args()) {
            matcher.capture(actual.as_ref());
        }
    }

    pub(crate) fn record_match(&mut self) {
        self.matched_count += 1;
    }
}
