use crate::logging;
use crate::matcher::{Arg, ArgMatcher, MatchContext};
use crate::value::{short_type_name, Value};
use std::any;
use std::cell::RefCell;
use std::rc::Rc;

/// Records every actual argument it is compared against.
///
/// The matcher returned by [`Captor::capture`] accepts every argument, so a
/// captor never filters calls. Clones share the same history, and one captor
/// may be placed in several patterns. Capturing a non-null argument that is
/// not a `T` panics, so a `None` in the history is always a null argument.
///
/// ```
/// use parrot::{args, pattern, Arg, Captor, Mock};
///
/// let mock = Mock::new("Greeter");
/// let captor = Captor::<&str>::new();
/// mock.stub().call(pattern!(greet(captor.capture()))).and_return(true);
/// mock.call::<bool>("greet", args!["a"]);
/// mock.call::<bool>("greet", args!["b"]);
/// assert_eq!(captor.all(), vec![Some("a"), Some("b")]);
/// assert_eq!(captor.latest(), Some(Some("b")));
/// ```
pub struct Captor<T> {
    values: Rc<RefCell<Vec<Option<T>>>>,
}

impl<T: Clone + 'static> Captor<T> {
    pub fn new() -> Self {
        Self {
            values: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A matcher to place in a pattern.
    pub fn capture(&self) -> Arg {
        Arg::custom(Capturing {
            values: Rc::clone(&self.values),
        })
    }

    /// The last captured argument; `Some(None)` when it was null.
    pub fn latest(&self) -> Option<Option<T>> {
        self.values.borrow().last().cloned()
    }

    /// Every captured argument in call order. Null arguments are kept as
    /// `None`; an argument of another type panics when it is captured.
    pub fn all(&self) -> Vec<Option<T>> {
        self.values.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl<T: Clone + 'static> Default for Captor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Captor<T> {
    fn clone(&self) -> Self {
        Self {
            values: Rc::clone(&self.values),
        }
    }
}

struct Capturing<T> {
    values: Rc<RefCell<Vec<Option<T>>>>,
}

impl<T: Clone + 'static> ArgMatcher for Capturing<T> {
    fn matches(&self, _actual: Option<&Value>, _ctx: &MatchContext) -> bool {
        true
    }

    fn capture(&self, actual: Option<&Value>) {
        let captured = match actual {
            None => None,
            Some(value) => match value.downcast_ref::<T>() {
                Some(typed) => Some(typed.clone()),
                None => panic!(
                    "capture<{}> was given a {} argument",
                    short_type_name(any::type_name::<T>()),
                    short_type_name(value.type_name())
                ),
            },
        };
        logging::log_capture(any::type_name::<T>(), captured.is_none());
        self.values.borrow_mut().push(captured);
    }

    fn describe(&self) -> String {
        format!("capture<{}>", short_type_name(any::type_name::<T>()))
    }
}
