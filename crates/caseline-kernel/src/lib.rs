//! # Caseline Kernel
//!
//! A functional switch: an immutable, ordered list of test/result cases plus
//! a default. Matching a subject returns the result of the first case whose
//! test fires, or the default when none does.
//!
//! ## Architecture
//!
//! ```text
//! Subject             ← SameValueZero equality + match text
//!     │
//! TestSpec            ← Literal | Predicate | Pattern
//!     │
//! Case / CaseFactory  ← comparison method + negation + result
//!     │
//! CaseRegistry        ← named case kinds (explicit or process-wide)
//!     │
//! Matcher             ← immutable case list, default, options
//! ```
//!
//! ## Example
//!
//! ```
//! use caseline_kernel::{Matcher, TestSpec};
//!
//! let matcher = Matcher::<i64, &str>::new()
//!     .set_default("nope")
//!     .add_is_case(TestSpec::literal(5), "five")
//!     .add_is_case(TestSpec::predicate(|v: &i64| v % 2 == 0), "even");
//!
//! assert_eq!(matcher.match_value(&5), Some("five"));
//! assert_eq!(matcher.match_value(&4), Some("even"));
//! assert_eq!(matcher.match_value(&3), Some("nope"));
//! ```

pub mod case;
pub mod error;
pub mod matcher;
pub mod options;
pub mod outcome;
pub mod registry;
pub mod spec;
pub mod subject;

pub use case::{
    Case, CaseFactory, CaseMethod, Resolved, equals, find_match, is_case, not_case,
};
pub use error::CaselineError;
pub use matcher::Matcher;
pub use options::MatchOptions;
pub use outcome::{Callback, MatchKey, Outcome};
pub use registry::{
    CaseRegistry, IS_KIND, NOT_KIND, RESERVED_CASE_NAMES, global_registry, register_case_kind,
};
pub use spec::{Predicate, SpecKind, TestSpec};
pub use subject::{Subject, same_value_zero};
