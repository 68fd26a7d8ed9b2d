//! Test specifications.
//!
//! The kind of a test is fixed when the case is built, so equality never
//! has to inspect a value to decide how to compare it.

use crate::subject::Subject;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// A unary test over subjects.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// What a case tests the subject against.
pub enum TestSpec<T> {
    /// Compare with SameValueZero.
    Literal(T),
    /// Call the function with the subject.
    Predicate(Predicate<T>),
    /// Match the regular expression against the subject's match text.
    Pattern(Regex),
}

/// Discriminant of a [`TestSpec`], for logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecKind {
    Literal,
    Predicate,
    Pattern,
}

impl<T> TestSpec<T> {
    pub fn literal(value: T) -> Self {
        Self::Literal(value)
    }

    pub fn predicate<F>(test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(test))
    }

    pub fn pattern(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }

    /// Compile `source` into a pattern spec.
    pub fn try_pattern(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self::Pattern)
    }

    pub fn kind(&self) -> SpecKind {
        match self {
            Self::Literal(_) => SpecKind::Literal,
            Self::Predicate(_) => SpecKind::Predicate,
            Self::Pattern(_) => SpecKind::Pattern,
        }
    }

    /// The literal value, when this is a literal spec.
    ///
    /// Custom case methods usually only make sense for literals:
    ///
    /// ```
    /// use caseline_kernel::TestSpec;
    ///
    /// let divisible_by = |spec: &TestSpec<i64>, subject: &i64| {
    ///     spec.as_literal().is_some_and(|d| *d != 0 && subject % d == 0)
    /// };
    /// assert!(divisible_by(&TestSpec::literal(7), &49));
    /// ```
    pub fn as_literal(&self) -> Option<&T> {
        match self {
            Self::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&Regex> {
        match self {
            Self::Pattern(pattern) => Some(pattern),
            _ => None,
        }
    }
}

impl<T> From<Regex> for TestSpec<T> {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

impl<T: Clone> Clone for TestSpec<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(value) => Self::Literal(value.clone()),
            Self::Predicate(test) => Self::Predicate(Arc::clone(test)),
            Self::Pattern(pattern) => Self::Pattern(pattern.clone()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for TestSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::Pattern(pattern) => f.debug_tuple("Pattern").field(&pattern.as_str()).finish(),
        }
    }
}

impl<T: Subject> fmt::Display for TestSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.write_str(&value.match_text()),
            Self::Predicate(_) => f.write_str("<predicate>"),
            Self::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
        }
    }
}
