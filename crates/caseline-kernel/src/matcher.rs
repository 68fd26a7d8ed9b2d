//! The immutable matcher.
//!
//! Every builder method borrows the receiver and returns a new matcher.
//! Cases are reference-counted, so a successor shares every case of its
//! predecessor and only the case list itself is copied.

use crate::case::{Case, CaseFactory, Resolved, find_match, is_case, not_case};
use crate::error::CaselineError;
use crate::options::MatchOptions;
use crate::outcome::Outcome;
use crate::registry::{CaseRegistry, global_registry};
use crate::spec::TestSpec;
use crate::subject::Subject;
use std::fmt;
use std::sync::Arc;

/// An ordered list of cases plus a default, matched first-case-wins.
pub struct Matcher<T, R> {
    options: MatchOptions,
    cases: Vec<Arc<Case<T, R>>>,
    default: Option<Arc<Outcome<T, R>>>,
}

impl<T, R> Matcher<T, R> {
    pub fn new() -> Self {
        Self::with_options(MatchOptions::default())
    }

    pub fn with_options(options: MatchOptions) -> Self {
        Self::from_parts(options, Vec::new(), None)
    }

    pub fn from_parts(
        options: MatchOptions,
        cases: Vec<Arc<Case<T, R>>>,
        default: Option<Outcome<T, R>>,
    ) -> Self {
        Self {
            options,
            cases,
            default: default.map(Arc::new),
        }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn cases(&self) -> &[Arc<Case<T, R>>] {
        &self.cases
    }

    /// The default outcome, `None` if it was never set.
    pub fn default_outcome(&self) -> Option<&Outcome<T, R>> {
        self.default.as_deref()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn set_default(&self, default: impl Into<Outcome<T, R>>) -> Self {
        Self {
            options: self.options.clone(),
            cases: self.cases.clone(),
            default: Some(Arc::new(default.into())),
        }
    }

    /// Append a prebuilt case.
    pub fn push_case(&self, case: Case<T, R>) -> Self {
        let mut cases = Vec::with_capacity(self.cases.len() + 1);
        cases.extend(self.cases.iter().cloned());
        cases.push(Arc::new(case));
        Self {
            options: self.options.clone(),
            cases,
            default: self.default.clone(),
        }
    }

    /// Append a case built by `factory`.
    pub fn with_case(
        &self,
        factory: &CaseFactory<T>,
        spec: impl Into<TestSpec<T>>,
        result: impl Into<Outcome<T, R>>,
    ) -> Self {
        self.push_case(factory.make(spec, result))
    }

    /// Fold `others` into a new matcher, left to right.
    ///
    /// Options merge shallowly with later keys winning, cases concatenate in
    /// encounter order, and a later default replaces an earlier one only if
    /// it was set.
    pub fn merge_with<'a, I>(&self, others: I) -> Self
    where
        I: IntoIterator<Item = &'a Matcher<T, R>>,
        T: 'a,
        R: 'a,
    {
        others.into_iter().fold(self.clone(), |merged, other| {
            let mut cases = merged.cases;
            cases.extend(other.cases.iter().cloned());
            Self {
                options: merged.options.merged(&other.options),
                cases,
                default: other.default.clone().or(merged.default),
            }
        })
    }

    /// The first firing case, or the default, without evaluating callbacks.
    pub fn resolve<'a>(&'a self, subject: &T) -> Option<Resolved<'a, T, R>> {
        find_match(&self.cases, subject, self.default.as_deref())
    }
}

impl<T: Subject + 'static, R> Matcher<T, R> {
    pub fn add_is_case(
        &self,
        spec: impl Into<TestSpec<T>>,
        result: impl Into<Outcome<T, R>>,
    ) -> Self {
        self.with_case(&is_case(), spec, result)
    }

    pub fn add_not_case(
        &self,
        spec: impl Into<TestSpec<T>>,
        result: impl Into<Outcome<T, R>>,
    ) -> Self {
        self.with_case(&not_case(), spec, result)
    }

    /// Append a case from a kind registered in `registry`.
    pub fn add_registered_case(
        &self,
        registry: &CaseRegistry<T>,
        kind: &str,
        spec: impl Into<TestSpec<T>>,
        result: impl Into<Outcome<T, R>>,
    ) -> Result<Self, CaselineError> {
        let factory = registry.resolve(kind)?;
        Ok(self.with_case(&factory, spec, result))
    }

    /// Append a case from a kind in the process-wide registry for `T`.
    pub fn add_case(
        &self,
        kind: &str,
        spec: impl Into<TestSpec<T>>,
        result: impl Into<Outcome<T, R>>,
    ) -> Result<Self, CaselineError> {
        self.add_registered_case(&global_registry::<T>(), kind, spec, result)
    }
}

impl<T: Subject + 'static, R: From<bool>> Matcher<T, R> {
    /// [`add_is_case`](Self::add_is_case) with a `true` result.
    pub fn add_is_flag(&self, spec: impl Into<TestSpec<T>>) -> Self {
        self.push_case(is_case().make_flag(spec))
    }

    /// [`add_not_case`](Self::add_not_case) with a `true` result.
    pub fn add_not_flag(&self, spec: impl Into<TestSpec<T>>) -> Self {
        self.push_case(not_case().make_flag(spec))
    }

    /// [`add_case`](Self::add_case) with a `true` result.
    pub fn add_case_flag(
        &self,
        kind: &str,
        spec: impl Into<TestSpec<T>>,
    ) -> Result<Self, CaselineError> {
        let factory = global_registry::<T>().resolve(kind)?;
        Ok(self.push_case(factory.make_flag(spec)))
    }
}

impl<T, R: Clone> Matcher<T, R> {
    /// Match `subject`, applying the callback policy.
    ///
    /// A callback outcome is invoked with the matched key, the subject and
    /// `extra` when `invoke_callable_result` is set, and handed back
    /// uninvoked otherwise. `None` means nothing fired and no default is set.
    pub fn match_outcome(&self, subject: &T, extra: &[T]) -> Option<Outcome<T, R>> {
        let Resolved { key, outcome } = self.resolve(subject)?;
        match outcome {
            Outcome::Callback(callback) if self.options.invoke_callable_result => {
                Some(Outcome::Value(callback(key, subject, extra)))
            }
            other => Some(other.clone()),
        }
    }

    /// Match `subject` and return the resulting value, or `None` when nothing
    /// fired without a default or the match is an uninvoked callback.
    ///
    /// The two `None` cases are indistinguishable here; use
    /// [`match_outcome`](Self::match_outcome) to receive uninvoked callbacks.
    pub fn match_value(&self, subject: &T) -> Option<R> {
        self.match_with(subject, &[])
    }

    /// [`match_value`](Self::match_value) with extra callback arguments.
    pub fn match_with(&self, subject: &T, extra: &[T]) -> Option<R> {
        self.match_outcome(subject, extra)
            .and_then(Outcome::into_value)
    }
}

impl<T, R> Clone for Matcher<T, R> {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            cases: self.cases.clone(),
            default: self.default.clone(),
        }
    }
}

impl<T, R> Default for Matcher<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, R: fmt::Debug> fmt::Debug for Matcher<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("options", &self.options)
            .field("cases", &self.cases)
            .field("default", &self.default)
            .finish()
    }
}
