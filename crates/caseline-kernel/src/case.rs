//! Case engine.
//!
//! ```text
//! CaseMethod  (spec, subject) -> bool      equality strategy
//!     │
//! CaseFactory method + negate              negation wrapping
//!     │
//! Case        key + result                 storage, test(subject)
//!     │
//! find_match  first firing case | default
//! ```
//!
//! A case that does not fire reports `None`. That is the no-match signal,
//! kept apart from every result a case can carry, including `false`.

use crate::outcome::{MatchKey, Outcome};
use crate::spec::TestSpec;
use crate::subject::Subject;
use std::fmt;
use std::sync::Arc;

/// Binary comparison between a case's test spec and the subject.
pub type CaseMethod<T> = Arc<dyn Fn(&TestSpec<T>, &T) -> bool + Send + Sync>;

/// Built-in comparison used by `is` and `not` cases.
pub fn equals<T: Subject>(spec: &TestSpec<T>, subject: &T) -> bool {
    match spec {
        TestSpec::Literal(value) => value.same_value_zero(subject),
        TestSpec::Predicate(test) => test(subject),
        TestSpec::Pattern(pattern) => pattern.is_match(&subject.match_text()),
    }
}

/// One test/result rule.
pub struct Case<T, R> {
    key: TestSpec<T>,
    method: CaseMethod<T>,
    negate: bool,
    result: Outcome<T, R>,
}

impl<T, R> Case<T, R> {
    /// The test spec this case was built from.
    pub fn key(&self) -> &TestSpec<T> {
        &self.key
    }

    pub fn result(&self) -> &Outcome<T, R> {
        &self.result
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }

    /// The case's result if it fires for `subject`, `None` otherwise.
    pub fn test(&self, subject: &T) -> Option<&Outcome<T, R>> {
        let hit = (self.method)(&self.key, subject);
        (hit != self.negate).then_some(&self.result)
    }
}

impl<T: fmt::Debug, R: fmt::Debug> fmt::Debug for Case<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case")
            .field("key", &self.key)
            .field("negate", &self.negate)
            .field("result", &self.result)
            .finish()
    }
}

/// Builds cases that share one comparison method and negation flag.
pub struct CaseFactory<T> {
    method: CaseMethod<T>,
    negate: bool,
}

impl<T> CaseFactory<T> {
    pub fn new<F>(method: F, negate: bool) -> Self
    where
        F: Fn(&TestSpec<T>, &T) -> bool + Send + Sync + 'static,
    {
        Self::from_method(Arc::new(method), negate)
    }

    pub fn from_method(method: CaseMethod<T>, negate: bool) -> Self {
        Self { method, negate }
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }

    pub fn method(&self) -> &CaseMethod<T> {
        &self.method
    }

    pub fn make<R>(
        &self,
        spec: impl Into<TestSpec<T>>,
        result: impl Into<Outcome<T, R>>,
    ) -> Case<T, R> {
        Case {
            key: spec.into(),
            method: Arc::clone(&self.method),
            negate: self.negate,
            result: result.into(),
        }
    }

    /// Build a case whose result is `true`.
    pub fn make_flag<R: From<bool>>(&self, spec: impl Into<TestSpec<T>>) -> Case<T, R> {
        self.make(spec, Outcome::Value(R::from(true)))
    }
}

impl<T> Clone for CaseFactory<T> {
    fn clone(&self) -> Self {
        Self {
            method: Arc::clone(&self.method),
            negate: self.negate,
        }
    }
}

impl<T> fmt::Debug for CaseFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseFactory")
            .field("negate", &self.negate)
            .finish_non_exhaustive()
    }
}

/// Factory for cases that fire when the subject equals the spec.
pub fn is_case<T: Subject + 'static>() -> CaseFactory<T> {
    CaseFactory::new(equals::<T>, false)
}

/// Factory for cases that fire when the subject does not equal the spec.
pub fn not_case<T: Subject + 'static>() -> CaseFactory<T> {
    CaseFactory::new(equals::<T>, true)
}

/// A resolved match: the key that produced it and the unevaluated outcome.
pub struct Resolved<'a, T, R> {
    pub key: MatchKey<'a, T>,
    pub outcome: &'a Outcome<T, R>,
}

impl<T: fmt::Debug, R: fmt::Debug> fmt::Debug for Resolved<'_, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("key", &self.key)
            .field("outcome", self.outcome)
            .finish()
    }
}

/// Scan `cases` in order and return the first that fires, falling back to
/// `default` under [`MatchKey::Default`].
///
/// Returns `None` only when nothing fires and there is no default.
pub fn find_match<'a, T, R>(
    cases: &'a [Arc<Case<T, R>>],
    subject: &T,
    default: Option<&'a Outcome<T, R>>,
) -> Option<Resolved<'a, T, R>> {
    for (position, case) in cases.iter().enumerate() {
        if let Some(outcome) = case.test(subject) {
            tracing::trace!(position, "case fired");
            return Some(Resolved {
                key: MatchKey::Case(case.key()),
                outcome,
            });
        }
    }
    tracing::trace!(cases = cases.len(), "no case fired");
    default.map(|outcome| Resolved {
        key: MatchKey::Default,
        outcome,
    })
}
