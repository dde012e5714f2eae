//! Argument matchers and invocation patterns.

use crate::config::Config;
use crate::value::{short_type_name, Comparable, Value};
use crate::{MockError, Result};
use itertools::Itertools;
use regex::Regex;
use std::any;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// Settings that influence matching and that come from the owning mock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchContext {
    /// Whether `Arg::any` accepts a null actual argument.
    pub any_matches_null: bool,
}

impl MatchContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            any_matches_null: config.matching.any_matches_null,
        }
    }
}

/// A predicate over one actual call argument.
///
/// Implement this to plug a custom matcher into a pattern with [`Arg::custom`].
pub trait ArgMatcher {
    fn matches(&self, actual: Option<&Value>, ctx: &MatchContext) -> bool;

    /// Called with the actual argument after the whole registration matched.
    fn capture(&self, _actual: Option<&Value>) {}

    fn describe(&self) -> String;
}

/// Cheaply clonable handle to an argument matcher.
#[derive(Clone)]
pub struct Arg(Rc<dyn ArgMatcher>);

impl Arg {
    /// Matches a non-null actual argument equal to `value`.
    ///
    /// The comparison includes the concrete type: `Arg::eq(5)` holds an
    /// `i32` and never matches an `i64` argument. Suffix literals
    /// (`Arg::eq(5i64)`) when the parameter is not `i32`.
    pub fn eq<T: Comparable>(value: T) -> Arg {
        Arg::custom(Exact {
            expected: Some(Value::of(value)),
        })
    }

    /// Matches only a null actual argument.
    pub fn null() -> Arg {
        Arg::custom(Exact { expected: None })
    }

    /// Matches any value of type `T`. Nulls follow `matching.any_matches_null`.
    pub fn any<T: Comparable>() -> Arg {
        Arg::custom(AnyOfType::<T> {
            nulls: NullPolicy::Inherit,
            _type: PhantomData,
        })
    }

    /// Matches any value of type `T`, and null.
    pub fn any_or_null<T: Comparable>() -> Arg {
        Arg::custom(AnyOfType::<T> {
            nulls: NullPolicy::Accept,
            _type: PhantomData,
        })
    }

    /// Matches when `predicate` accepts the actual argument. Null arguments
    /// and arguments of another type never reach the predicate.
    pub fn verify<T, F>(predicate: F) -> Arg
    where
        T: 'static,
        F: Fn(&T) -> bool + 'static,
    {
        Arg::verify_nullable(move |actual: Option<&T>| actual.is_some_and(|v| predicate(v)))
    }

    /// Like [`Arg::verify`] but the predicate also sees null arguments.
    pub fn verify_nullable<T, F>(predicate: F) -> Arg
    where
        T: 'static,
        F: Fn(Option<&T>) -> bool + 'static,
    {
        Arg::custom(Predicate {
            predicate: Box::new(predicate),
        })
    }

    /// Matches every argument. Used in the positions of function-typed
    /// parameters, which cannot be compared.
    pub fn function_value() -> Arg {
        Arg::custom(FunctionValue)
    }

    /// Matches `String` and `&'static str` arguments against a regular expression.
    pub fn regex(pattern: &str) -> Result<Arg> {
        let regex = Regex::new(pattern).map_err(|e| MockError::InvalidPattern(e.to_string()))?;
        Ok(Arg::custom(RegexMatch { regex }))
    }

    /// Inverts another matcher.
    pub fn not(inner: Arg) -> Arg {
        Arg::custom(Not { inner })
    }

    pub fn custom<M: ArgMatcher + 'static>(matcher: M) -> Arg {
        Arg(Rc::new(matcher))
    }

    pub fn matches(&self, actual: Option<&Value>, ctx: &MatchContext) -> bool {
        self.0.matches(actual, ctx)
    }

    pub fn capture(&self, actual: Option<&Value>) {
        self.0.capture(actual)
    }

    pub fn describe(&self) -> String {
        self.0.describe()
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

struct Exact {
    expected: Option<Value>,
}

impl ArgMatcher for Exact {
    fn matches(&self, actual: Option<&Value>, _ctx: &MatchContext) -> bool {
        match (&self.expected, actual) {
            (None, None) => true,
            (Some(expected), Some(actual)) => expected.equals(actual),
            _ => false,
        }
    }

    fn describe(&self) -> String {
        match &self.expected {
            Some(value) => format!("eq({:?})", value),
            None => "null".to_string(),
        }
    }
}

#[derive(Clone, Copy)]
enum NullPolicy {
    Inherit,
    Accept,
}

struct AnyOfType<T> {
    nulls: NullPolicy,
    _type: PhantomData<T>,
}

impl<T: Comparable> ArgMatcher for AnyOfType<T> {
    fn matches(&self, actual: Option<&Value>, ctx: &MatchContext) -> bool {
        match actual {
            Some(value) => value.is::<T>(),
            None => match self.nulls {
                NullPolicy::Inherit => ctx.any_matches_null,
                NullPolicy::Accept => true,
            },
        }
    }

    fn describe(&self) -> String {
        let name = short_type_name(any::type_name::<T>());
        match self.nulls {
            NullPolicy::Inherit => format!("any<{}>", name),
            NullPolicy::Accept => format!("any<{}>?", name),
        }
    }
}

type PredicateFn<T> = Box<dyn Fn(Option<&T>) -> bool>;

struct Predicate<T> {
    predicate: PredicateFn<T>,
}

impl<T: 'static> ArgMatcher for Predicate<T> {
    fn matches(&self, actual: Option<&Value>, _ctx: &MatchContext) -> bool {
        match actual {
            None => (self.predicate)(None),
            Some(value) => match value.downcast_ref::<T>() {
                Some(typed) => (self.predicate)(Some(typed)),
                None => false,
            },
        }
    }

    fn describe(&self) -> String {
        format!("verify<{}>(..)", short_type_name(any::type_name::<T>()))
    }
}

struct FunctionValue;

impl ArgMatcher for FunctionValue {
    fn matches(&self, _actual: Option<&Value>, _ctx: &MatchContext) -> bool {
        true
    }

    fn describe(&self) -> String {
        "function".to_string()
    }
}

struct RegexMatch {
    regex: Regex,
}

impl ArgMatcher for RegexMatch {
    fn matches(&self, actual: Option<&Value>, _ctx: &MatchContext) -> bool {
        let Some(value) = actual else {
            return false;
        };
        if let Some(s) = value.downcast_ref::<String>() {
            return self.regex.is_match(s);
        }
        if let Some(s) = value.downcast_ref::<&'static str>() {
            return self.regex.is_match(s);
        }
        false
    }

    fn describe(&self) -> String {
        format!("regex({:?})", self.regex.as_str())
    }
}

struct Not {
    inner: Arg,
}

impl ArgMatcher for Not {
    fn matches(&self, actual: Option<&Value>, ctx: &MatchContext) -> bool {
        !self.inner.matches(actual, ctx)
    }

    fn describe(&self) -> String {
        format!("not({})", self.inner.describe())
    }
}

/// An invocation-shaped pattern: the operation name plus one matcher per
/// parameter. Usually built with [`pattern!`](crate::pattern).
#[derive(Clone, Debug)]
pub struct Pattern {
    operation: String,
    matchers: Vec<Arg>,
}

impl Pattern {
    pub fn new(operation: impl Into<String>, matchers: Vec<Arg>) -> Self {
        Self {
            operation: operation.into(),
            matchers,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn matchers(&self) -> &[Arg] {
        &self.matchers
    }

    pub fn arity(&self) -> usize {
        self.matchers.len()
    }

    /// True when the operation and arity agree and every positional matcher
    /// accepts its actual argument.
    pub fn accepts(&self, operation: &str, actual: &[Option<Value>], ctx: &MatchContext) -> bool {
        self.operation == operation
            && self.matchers.len() == actual.len()
            && self
                .matchers
                .iter()
                .zip(actual)
                .all(|(matcher, arg)| matcher.matches(arg.as_ref(), ctx))
    }

    pub fn describe_matchers(&self) -> Vec<String> {
        self.matchers.iter().map(Arg::describe).collect()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            self.operation,
            self.matchers.iter().map(Arg::describe).join(", ")
        )
    }
}

/// Build a [`Pattern`] in the shape of the invocation it matches.
///
/// ```
/// use parrot::{pattern, Arg};
/// let p = pattern!(bar(Arg::eq("hello"), Arg::any::<i32>()));
/// assert_eq!(p.to_string(), r#"bar(eq("hello"), any<i32>)"#);
/// ```
#[macro_export]
macro_rules! pattern {
    ($operation:ident ( $($matcher:expr),* $(,)? )) => {
        $crate::Pattern::new(::std::stringify!($operation), ::std::vec![$($matcher),*])
    };
}
