//! Case results and match keys.

use crate::spec::TestSpec;
use crate::subject::Subject;
use std::fmt;
use std::sync::Arc;

/// A result computed at match time from the matched key, the subject, and
/// any extra arguments passed to [`Matcher::match_with`](crate::Matcher::match_with).
pub type Callback<T, R> = Arc<dyn Fn(MatchKey<'_, T>, &T, &[T]) -> R + Send + Sync>;

/// What a case (or the default) resolves to.
pub enum Outcome<T, R> {
    /// Returned as-is.
    Value(R),
    /// Invoked on match when the matcher's `invoke_callable_result` option is set.
    Callback(Callback<T, R>),
}

impl<T, R> Outcome<T, R> {
    pub fn value(value: R) -> Self {
        Self::Value(value)
    }

    pub fn callback<F>(callback: F) -> Self
    where
        F: Fn(MatchKey<'_, T>, &T, &[T]) -> R + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(callback))
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, Self::Callback(_))
    }

    pub fn as_value(&self) -> Option<&R> {
        match self {
            Self::Value(value) => Some(value),
            Self::Callback(_) => None,
        }
    }

    pub fn into_value(self) -> Option<R> {
        match self {
            Self::Value(value) => Some(value),
            Self::Callback(_) => None,
        }
    }
}

impl<T, R> From<R> for Outcome<T, R> {
    fn from(value: R) -> Self {
        Self::Value(value)
    }
}

impl<T, R: Clone> Clone for Outcome<T, R> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(value) => Self::Value(value.clone()),
            Self::Callback(callback) => Self::Callback(Arc::clone(callback)),
        }
    }
}

impl<T, R: fmt::Debug> fmt::Debug for Outcome<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Which entry produced a match: a case (identified by its test spec) or
/// the matcher default.
pub enum MatchKey<'a, T> {
    Case(&'a TestSpec<T>),
    Default,
}

impl<'a, T> MatchKey<'a, T> {
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    pub fn spec(&self) -> Option<&'a TestSpec<T>> {
        match self {
            Self::Case(spec) => Some(*spec),
            Self::Default => None,
        }
    }
}

impl<T> Clone for MatchKey<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MatchKey<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for MatchKey<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Case(spec) => f.debug_tuple("Case").field(spec).finish(),
            Self::Default => f.write_str("Default"),
        }
    }
}

/// The default key renders as `default`.
impl<T: Subject> fmt::Display for MatchKey<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Case(spec) => fmt::Display::fmt(spec, f),
            Self::Default => f.write_str("default"),
        }
    }
}
