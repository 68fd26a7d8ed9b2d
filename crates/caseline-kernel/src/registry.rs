//! Named case kinds.
//!
//! A [`CaseRegistry`] maps a case-kind name to the [`CaseFactory`] that
//! builds its cases. Registries are explicit values that callers can thread
//! through; [`global_registry`] additionally keeps one process-wide registry
//! per subject type, which is what [`register_case_kind`] and
//! [`Matcher::add_case`](crate::Matcher::add_case) use.
//!
//! Names are looked up when a case is added, so a kind registered after a
//! matcher was built is still usable from that matcher. A name moves from
//! unregistered to registered once and is never removed.

use crate::case::{CaseFactory, CaseMethod, is_case, not_case};
use crate::error::CaselineError;
use crate::spec::TestSpec;
use crate::subject::Subject;
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::{debug, warn};

/// Name of the built-in equality case kind.
pub const IS_KIND: &str = "is";
/// Name of the built-in inequality case kind.
pub const NOT_KIND: &str = "not";

/// Operation names a custom case kind may not take: the built-in kinds and
/// every public [`Matcher`](crate::Matcher) method.
pub const RESERVED_CASE_NAMES: &[&str] = &[
    IS_KIND,
    NOT_KIND,
    "default",
    "match",
    "merge",
    "new",
    "with_options",
    "from_parts",
    "options",
    "cases",
    "default_outcome",
    "len",
    "is_empty",
    "push_case",
    "add_registered_case",
    "set_default",
    "add_is_case",
    "add_not_case",
    "add_is_flag",
    "add_not_flag",
    "add_case",
    "add_case_flag",
    "with_case",
    "match_value",
    "match_with",
    "match_outcome",
    "merge_with",
    "resolve",
];

/// Case kinds registered by name.
pub struct CaseRegistry<T> {
    kinds: RwLock<BTreeMap<String, CaseFactory<T>>>,
}

impl<T> CaseRegistry<T> {
    pub fn new() -> Self {
        Self {
            kinds: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register `method` under `name`.
    ///
    /// The duplicate check and the insert happen under one write lock, so
    /// concurrent registrations of the same name cannot both succeed.
    pub fn register<F>(
        &self,
        name: &str,
        method: F,
        negate: bool,
    ) -> Result<CaseFactory<T>, CaselineError>
    where
        F: Fn(&TestSpec<T>, &T) -> bool + Send + Sync + 'static,
    {
        self.register_method(name, Some(Arc::new(method)), negate)
    }

    /// Register an already-boxed method. A missing method is an
    /// [`CaselineError::InvalidArgument`]; this is the path for methods
    /// looked up from a catalog by name.
    pub fn register_method(
        &self,
        name: &str,
        method: Option<CaseMethod<T>>,
        negate: bool,
    ) -> Result<CaseFactory<T>, CaselineError> {
        let result = self.try_register(name, method, negate);
        match &result {
            Ok(_) => debug!(kind = name, negate, "case kind registered"),
            Err(err) => warn!(kind = name, error = %err, "case kind rejected"),
        }
        result
    }

    fn try_register(
        &self,
        name: &str,
        method: Option<CaseMethod<T>>,
        negate: bool,
    ) -> Result<CaseFactory<T>, CaselineError> {
        validate_name(name)?;
        let Some(method) = method else {
            return Err(CaselineError::invalid_argument(
                name,
                "case method must be a function",
            ));
        };
        if RESERVED_CASE_NAMES.contains(&name) {
            return Err(CaselineError::DuplicateName(name.to_string()));
        }

        let mut kinds = self.kinds.write().unwrap_or_else(PoisonError::into_inner);
        if kinds.contains_key(name) {
            return Err(CaselineError::DuplicateName(name.to_string()));
        }
        let factory = CaseFactory::from_method(method, negate);
        kinds.insert(name.to_string(), factory.clone());
        Ok(factory)
    }

    /// The custom kind registered under `name`.
    pub fn get(&self, name: &str) -> Option<CaseFactory<T>> {
        self.kinds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered custom kind names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.kinds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.kinds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Subject + 'static> CaseRegistry<T> {
    /// Resolve a kind name, built-ins included.
    pub fn resolve(&self, name: &str) -> Result<CaseFactory<T>, CaselineError> {
        match name {
            IS_KIND => Ok(is_case()),
            NOT_KIND => Ok(not_case()),
            _ => self
                .get(name)
                .ok_or_else(|| CaselineError::CaseKindUnknown(name.to_string())),
        }
    }
}

impl<T> Default for CaseRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_name(name: &str) -> Result<(), CaselineError> {
    if name.trim().is_empty() {
        return Err(CaselineError::invalid_argument(
            name,
            "case name must not be empty",
        ));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(CaselineError::invalid_argument(
            name,
            "case name must not contain whitespace",
        ));
    }
    Ok(())
}

type AnyRegistry = Arc<dyn Any + Send + Sync>;

fn registries() -> &'static RwLock<HashMap<TypeId, AnyRegistry>> {
    static REGISTRIES: OnceLock<RwLock<HashMap<TypeId, AnyRegistry>>> = OnceLock::new();
    REGISTRIES.get_or_init(|| RwLock::new(HashMap::new()))
}

/// The process-wide registry for subjects of type `T`.
pub fn global_registry<T: 'static>() -> Arc<CaseRegistry<T>> {
    let id = TypeId::of::<T>();
    let existing = registries()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .cloned();
    let registry = match existing {
        Some(registry) => registry,
        None => registries()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_insert_with(|| Arc::new(CaseRegistry::<T>::new()) as AnyRegistry)
            .clone(),
    };
    // Each entry is inserted under `TypeId::of::<T>()` as a `CaseRegistry<T>`.
    registry
        .downcast::<CaseRegistry<T>>()
        .unwrap_or_else(|_| unreachable!("registry keyed by TypeId of its subject type"))
}

/// Register a case kind for every matcher over `T`, including matchers
/// built before this call.
pub fn register_case_kind<T, F>(
    name: &str,
    method: F,
    negate: bool,
) -> Result<CaseFactory<T>, CaselineError>
where
    T: 'static,
    F: Fn(&TestSpec<T>, &T) -> bool + Send + Sync + 'static,
{
    global_registry::<T>().register(name, method, negate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::Case;

    fn divisible_by(spec: &TestSpec<u32>, subject: &u32) -> bool {
        spec.as_literal()
            .is_some_and(|divisor| *divisor != 0 && subject % divisor == 0)
    }

    #[test]
    fn registers_and_resolves_custom_kind() {
        let registry = CaseRegistry::<u32>::new();
        registry
            .register("divisibleBy", divisible_by, false)
            .expect("registration");

        assert!(registry.contains("divisibleBy"));
        assert_eq!(registry.names(), vec!["divisibleBy".to_string()]);

        let factory = registry.resolve("divisibleBy").expect("resolve");
        let case: Case<u32, &str> = factory.make(TestSpec::literal(7), "yes");
        assert!(case.test(&49).is_some());
        assert!(case.test(&50).is_none());
    }

    #[test]
    fn resolves_builtin_kinds() {
        let registry = CaseRegistry::<u32>::new();
        assert!(!registry.resolve(IS_KIND).expect("is").is_negated());
        assert!(registry.resolve(NOT_KIND).expect("not").is_negated());
        assert!(registry.is_empty());
    }

    #[test]
    fn unknown_kind_is_reported() {
        let registry = CaseRegistry::<u32>::new();
        let err = registry.resolve("missing").err().expect("unknown");
        assert!(matches!(err, CaselineError::CaseKindUnknown(name) if name == "missing"));
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let registry = CaseRegistry::<u32>::new();
        registry
            .register("divisibleBy", divisible_by, false)
            .expect("first registration");
        let err = registry
            .register("divisibleBy", divisible_by, true)
            .err()
            .expect("duplicate");
        assert!(matches!(err, CaselineError::DuplicateName(_)));
        assert!(!registry.get("divisibleBy").expect("kept").is_negated());
    }

    #[test]
    fn builtin_operation_names_are_reserved() {
        let registry = CaseRegistry::<u32>::new();
        for name in [
            "is",
            "not",
            "match",
            "set_default",
            "merge_with",
            "push_case",
            "add_registered_case",
            "from_parts",
            "with_options",
            "default_outcome",
        ] {
            let err = registry
                .register(name, divisible_by, false)
                .err()
                .expect("reserved");
            assert!(matches!(err, CaselineError::DuplicateName(_)), "{name}");
        }
    }

    #[test]
    fn missing_method_is_invalid_argument() {
        let registry = CaseRegistry::<u32>::new();
        let err = registry
            .register_method("divisibleBy", None, false)
            .err()
            .expect("invalid");
        assert!(matches!(err, CaselineError::InvalidArgument { .. }));
        assert!(!registry.contains("divisibleBy"));
    }

    #[test]
    fn malformed_names_are_invalid_arguments() {
        let registry = CaseRegistry::<u32>::new();
        for name in ["", "  ", "divisible by"] {
            let err = registry
                .register(name, divisible_by, false)
                .err()
                .expect("invalid");
            assert!(matches!(err, CaselineError::InvalidArgument { .. }), "{name:?}");
        }
    }

    #[test]
    fn global_registry_is_shared_per_subject_type() {
        struct Marker;

        register_case_kind::<Marker, _>("always", |_, _| true, false).expect("register");
        assert!(global_registry::<Marker>().contains("always"));
        assert!(!global_registry::<u16>().contains("always"));
        assert!(Arc::ptr_eq(
            &global_registry::<Marker>(),
            &global_registry::<Marker>()
        ));
    }

    #[test]
    fn concurrent_registration_admits_one_winner() {
        let registry = Arc::new(CaseRegistry::<u32>::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.register("race", divisible_by, false).is_ok())
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread"))
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
