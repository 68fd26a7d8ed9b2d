//! Named comparison methods that rule documents can bind case kinds to.

use caseline_kernel::{CaseMethod, TestSpec};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Comparison methods addressable by name from a rule document's `kinds`.
#[derive(Clone, Default)]
pub struct MethodCatalog {
    methods: BTreeMap<String, CaseMethod<Value>>,
}

impl MethodCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<F>(&mut self, name: impl Into<String>, method: F)
    where
        F: Fn(&TestSpec<Value>, &Value) -> bool + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(method));
    }

    pub fn with_method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&TestSpec<Value>, &Value) -> bool + Send + Sync + 'static,
    {
        self.insert(name, method);
        self
    }

    pub fn get(&self, name: &str) -> Option<CaseMethod<Value>> {
        self.methods.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for MethodCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.methods.keys()).finish()
    }
}
