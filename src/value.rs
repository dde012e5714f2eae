//! Comparable values and the type-erased argument container.
//!
//! Actual call arguments are carried as `Option<Value>`: `None` is a null
//! argument, `Some(Value::Data(..))` a value that can be compared through the
//! [`Comparable`] capability and `Some(Value::Function(..))` a function value
//! that can only be matched by type or captured.

use regex::Regex;
use std::any::{self, Any};
use std::fmt;
use std::rc::Rc;
use std::sync::OnceLock;

/// Capability a type implements to be usable inside argument patterns.
///
/// `placeholder` is the canonical "any value of this type" instance, and
/// `value_eq` is the equality used by exact matchers.
pub trait Comparable: Clone + PartialEq + fmt::Debug + 'static {
    fn placeholder() -> Self;

    fn value_eq(&self, other: &Self) -> bool {
        self == other
    }
}

/// Object-safe view of a [`Comparable`] value.
///
/// Implemented for every `Comparable` type. Comparing against a value of a
/// different concrete type yields `false`.
pub trait AnyComparable: fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    fn type_name(&self) -> &'static str;

    fn equals(&self, other: &dyn AnyComparable) -> bool;
}

impl<T: Comparable> AnyComparable for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        any::type_name::<T>()
    }

    fn equals(&self, other: &dyn AnyComparable) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self.value_eq(other))
    }
}

macro_rules! comparable_via_default {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Comparable for $ty {
                fn placeholder() -> Self {
                    <$ty>::default()
                }
            }
        )*
    };
}

comparable_via_default!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
);

impl Comparable for &'static str {
    fn placeholder() -> Self {
        ""
    }
}

impl<T: Comparable> Comparable for Vec<T> {
    fn placeholder() -> Self {
        Vec::new()
    }
}

impl<A: Comparable, B: Comparable> Comparable for (A, B) {
    fn placeholder() -> Self {
        (A::placeholder(), B::placeholder())
    }
}

/// A single non-null actual argument.
#[derive(Clone)]
pub enum Value {
    Data(Rc<dyn AnyComparable>),
    /// Function-typed arguments cannot be compared for equality.
    Function(Rc<dyn Any>),
}

impl Value {
    pub fn of<T: Comparable>(value: T) -> Self {
        Value::Data(Rc::new(value))
    }

    /// Wrap a function value. Downcast it later with the exact type stored
    /// here, e.g. `Rc<dyn Fn(i32)>`.
    pub fn function<F: Any>(function: F) -> Self {
        Value::Function(Rc::new(function))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            Value::Data(data) => data.as_any().downcast_ref::<T>(),
            Value::Function(function) => function.downcast_ref::<T>(),
        }
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Data(data) => data.type_name(),
            Value::Function(_) => "function",
        }
    }

    /// Capability equality. Function values never compare equal.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Data(lhs), Value::Data(rhs)) => lhs.equals(&**rhs),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Data(data) => write!(f, "{:?}", data),
            Value::Function(_) => f.write_str("<function>"),
        }
    }
}

/// Wrapper marking an actual argument as a function value.
pub struct FnArg(Value);

impl FnArg {
    pub fn new<F: Any>(function: F) -> Self {
        Self(Value::function(function))
    }
}

/// Conversion of a call-site argument into an actual argument slot.
pub trait IntoArg {
    fn into_arg(self) -> Option<Value>;
}

impl<T: Comparable> IntoArg for T {
    fn into_arg(self) -> Option<Value> {
        Some(Value::of(self))
    }
}

impl<T: Comparable> IntoArg for Option<T> {
    fn into_arg(self) -> Option<Value> {
        self.map(Value::of)
    }
}

impl IntoArg for Value {
    fn into_arg(self) -> Option<Value> {
        Some(self)
    }
}

impl IntoArg for Option<Value> {
    fn into_arg(self) -> Option<Value> {
        self
    }
}

impl IntoArg for FnArg {
    fn into_arg(self) -> Option<Value> {
        Some(self.0)
    }
}

/// A null actual argument.
pub fn null() -> Option<Value> {
    None
}

/// Build the actual argument list of a call.
///
/// ```
/// use parrot::{args, null};
/// let actual = args!["hello", 42, null()];
/// assert_eq!(actual.len(), 3);
/// assert!(actual[2].is_none());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<::std::option::Option<$crate::Value>>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::IntoArg::into_arg($arg)),+]
    };
}

/// Strip module paths from a type name: `alloc::vec::Vec<alloc::string::String>`
/// becomes `Vec<String>`.
pub(crate) fn short_type_name(full: &str) -> String {
    static PATH: OnceLock<Option<Regex>> = OnceLock::new();
    match PATH.get_or_init(|| Regex::new(r"\b(?:[a-z_][a-z0-9_]*::)+").ok()) {
        Some(re) => re.replace_all(full, "").into_owned(),
        None => full.to_string(),
    }
}
